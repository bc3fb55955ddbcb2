/// Tunables for graph generation, interaction thresholds and animation.
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkConfig {
	pub node_count: usize,
	/// Side of the cube, centred on the origin, that nodes are placed in.
	pub bounds: f64,
	/// Nodes closer than this are connected.
	pub edge_threshold: f64,
	pub node_size: (f64, f64),
	/// Radius around an interacted node within which nodes light up.
	pub nearby_radius: f64,
	pub keyword_threshold: u32,
	pub transform_threshold: u32,
	/// Seconds between entering the transforming phase and completion.
	pub completion_delay: f64,
	pub particle_count: usize,
	/// Phase offset between consecutive particles on one edge.
	pub particle_spacing: f64,
	/// Radians added to (x, y) node rotation every frame.
	pub rotation_step: (f64, f64),
	pub highlight_opacity: f64,
	pub idle_opacity: (f64, f64),
	pub edge_opacity_active: f64,
	pub edge_opacity_idle: f64,
	pub particle_opacity: f64,
	pub keyword_opacity: f64,
	pub keyword_opacity_transforming: f64,
}

impl Default for NetworkConfig {
	fn default() -> Self {
		Self {
			node_count: 30,
			bounds: 10.0,
			edge_threshold: 5.0,
			node_size: (0.2, 0.5),
			nearby_radius: 4.0,
			keyword_threshold: 5,
			transform_threshold: 15,
			completion_delay: 3.0,
			particle_count: 5,
			particle_spacing: 0.1,
			rotation_step: (0.002, 0.003),
			highlight_opacity: 0.9,
			idle_opacity: (0.3, 0.8),
			edge_opacity_active: 0.6,
			edge_opacity_idle: 0.2,
			particle_opacity: 0.8,
			keyword_opacity: 0.5,
			keyword_opacity_transforming: 0.8,
		}
	}
}

/// Samples `[min, max)` without panicking on empty or inverted ranges.
pub(crate) fn sample_range<R: rand::Rng + ?Sized>(rng: &mut R, (min, max): (f64, f64)) -> f64 {
	min + rng.r#gen::<f64>() * (max - min)
}
