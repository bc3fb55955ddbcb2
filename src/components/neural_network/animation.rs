use rand::Rng;

use super::config::{NetworkConfig, sample_range};
use super::types::{Edge, Position};

/// Per-node animation state, indexed by node id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeAnim {
	pub rotation: (f64, f64),
	pub hovered: bool,
	idle_opacity: f64,
}

pub struct AnimationDriver {
	nodes: Vec<NodeAnim>,
	rotation_step: (f64, f64),
	highlight_opacity: f64,
	idle_opacity: (f64, f64),
	edge_opacity: (f64, f64),
	particle_count: usize,
	particle_spacing: f64,
	particle_opacity: f64,
}

impl AnimationDriver {
	pub fn new<R: Rng + ?Sized>(config: &NetworkConfig, node_count: usize, rng: &mut R) -> Self {
		let nodes = (0..node_count)
			.map(|_| NodeAnim {
				idle_opacity: sample_range(rng, config.idle_opacity),
				..NodeAnim::default()
			})
			.collect();
		Self {
			nodes,
			rotation_step: config.rotation_step,
			highlight_opacity: config.highlight_opacity,
			idle_opacity: config.idle_opacity,
			edge_opacity: (config.edge_opacity_idle, config.edge_opacity_active),
			particle_count: config.particle_count,
			particle_spacing: config.particle_spacing,
			particle_opacity: config.particle_opacity,
		}
	}

	pub fn node(&self, id: usize) -> Option<&NodeAnim> {
		self.nodes.get(id)
	}

	pub fn particle_count(&self) -> usize {
		self.particle_count
	}

	/// Spins every node by one frame's worth of rotation.
	pub fn advance_frame(&mut self) {
		let (dx, dy) = self.rotation_step;
		for n in &mut self.nodes {
			n.rotation.0 += dx;
			n.rotation.1 += dy;
		}
	}

	/// Idle opacity is redrawn whenever a node leaves hover while inactive.
	pub fn set_hovered<R: Rng + ?Sized>(
		&mut self,
		id: usize,
		hovered: bool,
		active: bool,
		rng: &mut R,
	) {
		let Some(n) = self.nodes.get_mut(id) else {
			return;
		};
		if n.hovered == hovered {
			return;
		}
		n.hovered = hovered;
		if !hovered && !active {
			n.idle_opacity = sample_range(rng, self.idle_opacity);
		}
	}

	/// Returns `(opacity, emissive_intensity)`.
	pub fn node_appearance(&self, id: usize, active: bool) -> (f64, f64) {
		match self.nodes.get(id) {
			Some(n) if n.hovered || active => (self.highlight_opacity, 2.0),
			Some(n) => (n.idle_opacity, 1.0),
			None => (self.highlight_opacity, 1.0),
		}
	}

	pub fn edge_opacity(&self, active: bool) -> f64 {
		if active { self.edge_opacity.1 } else { self.edge_opacity.0 }
	}

	pub fn particle_opacity(&self, active: bool) -> f64 {
		if active { self.particle_opacity } else { 0.0 }
	}

	/// Particle positions along `edge` at `elapsed` seconds.
	pub fn particles(&self, edge: &Edge, elapsed: f64) -> impl Iterator<Item = Position> + '_ {
		let (start, end) = (edge.start, edge.end);
		(0..self.particle_count)
			.map(move |i| start.lerp(end, particle_fraction(elapsed, i, self.particle_spacing)))
	}
}

/// `(t + i * spacing) mod 1`, always in `[0, 1)`.
pub fn particle_fraction(elapsed: f64, index: usize, spacing: f64) -> f64 {
	let f = (elapsed + index as f64 * spacing).rem_euclid(1.0);
	// rem_euclid can round up to exactly 1.0 for tiny negative inputs
	if f >= 1.0 { 0.0 } else { f }
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::super::types::EdgeKey;
	use super::*;

	const EPS: f64 = 1e-9;

	fn driver(n: usize) -> (AnimationDriver, StdRng) {
		let mut rng = StdRng::seed_from_u64(3);
		(AnimationDriver::new(&NetworkConfig::default(), n, &mut rng), rng)
	}

	#[test]
	fn fraction_samples() {
		assert!((particle_fraction(0.95, 1, 0.1) - 0.05).abs() < EPS);
		assert!((particle_fraction(0.0, 0, 0.1)).abs() < EPS);
		assert!((particle_fraction(2.25, 4, 0.1) - 0.65).abs() < EPS);
		assert!((particle_fraction(0.5, 3, 0.1) - 0.8).abs() < EPS);
		for i in 0..5 {
			let f = particle_fraction(-0.3, i, 0.1);
			assert!((0.0..1.0).contains(&f));
		}
	}

	#[test]
	fn particles_interpolate_along_edge() {
		let (d, _) = driver(0);
		let edge = Edge {
			key: EdgeKey::new(0, 1),
			start: Position::default(),
			end: Position::new(10.0, 0.0, 0.0),
		};
		let xs: Vec<f64> = d.particles(&edge, 0.2).map(|p| p.x).collect();
		assert_eq!(xs.len(), 5);
		for (i, x) in xs.iter().enumerate() {
			assert!((x - (2.0 + i as f64)).abs() < 1e-6);
		}
	}

	#[test]
	fn degenerate_edge_keeps_particles_still() {
		let (d, _) = driver(0);
		let p = Position::new(1.0, 2.0, 3.0);
		let edge = Edge {
			key: EdgeKey::new(0, 1),
			start: p,
			end: p,
		};
		assert!(d.particles(&edge, 0.37).all(|q| q == p));
	}

	#[test]
	fn rotation_accumulates_per_frame() {
		let (mut d, _) = driver(2);
		for _ in 0..100 {
			d.advance_frame();
		}
		let rot = d.node(1).map(|n| n.rotation).unwrap_or_default();
		assert!((rot.0 - 0.2).abs() < 1e-9);
		assert!((rot.1 - 0.3).abs() < 1e-9);
	}

	#[test]
	fn opacity_follows_hover_and_activation() {
		let (mut d, mut rng) = driver(1);
		let (idle, emissive) = d.node_appearance(0, false);
		assert!((0.3..0.8).contains(&idle));
		assert_eq!(emissive, 1.0);

		d.set_hovered(0, true, false, &mut rng);
		assert_eq!(d.node_appearance(0, false), (0.9, 2.0));

		for _ in 0..20 {
			d.set_hovered(0, false, false, &mut rng);
			let (o, e) = d.node_appearance(0, false);
			assert!((0.3..0.8).contains(&o));
			assert_eq!(e, 1.0);
			d.set_hovered(0, true, false, &mut rng);
		}

		d.set_hovered(0, false, true, &mut rng);
		assert_eq!(d.node_appearance(0, true), (0.9, 2.0));
	}

	#[test]
	fn edge_and_particle_opacity() {
		let (d, _) = driver(0);
		assert_eq!(d.edge_opacity(true), 0.6);
		assert_eq!(d.edge_opacity(false), 0.2);
		assert_eq!(d.particle_opacity(true), 0.8);
		assert_eq!(d.particle_opacity(false), 0.0);
	}
}
