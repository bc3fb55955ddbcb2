use std::collections::VecDeque;

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::accumulator::{ActivationState, InteractionAccumulator};
use super::animation::AnimationDriver;
use super::builder::SpatialGraphBuilder;
use super::camera::{Camera, OrbitState};
use super::config::NetworkConfig;
use super::timer::OneShotTimer;
use super::types::{Graph, KEYWORDS, NodeId, Position};

/// Extra pixels around a node's disc that still count as a hit.
pub const HIT_PADDING: f64 = 4.0;

#[derive(Clone, Debug, PartialEq)]
pub struct NodeAttrs {
	pub position: Position,
	pub size: f64,
	/// Absolute (x, y) spin in radians. Grows by `rotation_step` every tick,
	/// so the per-frame delta is the difference between consecutive frames.
	pub rotation: (f64, f64),
	pub opacity: f64,
	pub emissive: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeAttrs {
	pub start: Position,
	pub end: Position,
	pub opacity: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParticleAttrs {
	pub position: Position,
	pub opacity: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct KeywordAttrs {
	pub text: &'static str,
	pub position: Position,
	pub opacity: f64,
}

/// Everything the renderer needs for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
	pub nodes: Vec<NodeAttrs>,
	pub edges: Vec<EdgeAttrs>,
	pub particles: Vec<ParticleAttrs>,
	pub keywords: Vec<KeywordAttrs>,
}

/// Signals raised towards the host.
#[derive(Clone, Debug, PartialEq)]
pub enum SceneEvent {
	ActivationChanged(ActivationState),
	Completed,
}

/// One visualization session: the graph plus everything that reacts to it.
pub struct NeuralNetworkState {
	pub graph: Graph,
	pub camera: Camera,
	pub orbit: OrbitState,
	config: NetworkConfig,
	accumulator: InteractionAccumulator,
	driver: AnimationDriver,
	completion: OneShotTimer,
	pending: VecDeque<Position>,
	hovered: Option<NodeId>,
	elapsed: f64,
	completed: bool,
	disposed: bool,
	rng: StdRng,
}

impl NeuralNetworkState {
	pub fn new(config: NetworkConfig, width: f64, height: f64) -> Self {
		Self::with_rng(config, width, height, StdRng::from_entropy())
	}

	pub fn with_rng(config: NetworkConfig, width: f64, height: f64, mut rng: StdRng) -> Self {
		let graph = SpatialGraphBuilder::from_config(&config).build(&mut rng);
		Self::from_graph(config, graph, width, height, rng)
	}

	pub fn from_graph(
		config: NetworkConfig,
		graph: Graph,
		width: f64,
		height: f64,
		mut rng: StdRng,
	) -> Self {
		let driver = AnimationDriver::new(&config, graph.nodes.len(), &mut rng);
		Self {
			accumulator: InteractionAccumulator::new(&config),
			driver,
			graph,
			camera: Camera::new(width, height),
			orbit: OrbitState::default(),
			config,
			completion: OneShotTimer::default(),
			pending: VecDeque::new(),
			hovered: None,
			elapsed: 0.0,
			completed: false,
			disposed: false,
			rng,
		}
	}

	/// Queues an interaction; it is applied on the next tick.
	pub fn interact(&mut self, position: Position) {
		if !self.disposed {
			self.pending.push_back(position);
		}
	}

	/// Every change onto a node counts as one interaction at its position.
	pub fn set_hover(&mut self, node: Option<NodeId>) {
		if self.hovered == node || self.disposed {
			return;
		}
		if let Some(prev) = self.hovered.take() {
			let active = self.accumulator.activation().is_node_active(prev);
			self.driver.set_hovered(prev, false, active, &mut self.rng);
		}
		self.hovered = node;
		if let Some(idx) = node {
			let active = self.accumulator.activation().is_node_active(idx);
			self.driver.set_hovered(idx, true, active, &mut self.rng);
			if let Some(position) = self.graph.node(idx).map(|n| n.position) {
				self.interact(position);
			}
		}
	}

	/// Advances the session clock by `dt` seconds and applies queued input.
	pub fn tick(&mut self, dt: f64) -> Vec<SceneEvent> {
		let mut events = Vec::new();
		if self.disposed {
			return events;
		}
		self.elapsed += dt.max(0.0);
		self.driver.advance_frame();

		while let Some(position) = self.pending.pop_front() {
			let outcome = self.accumulator.on_interact(&self.graph, position);
			if outcome.transform_started && !self.completed {
				self.completion.schedule(self.elapsed, self.config.completion_delay);
				info!("Completion scheduled in {:.1}s", self.config.completion_delay);
			}
			events.push(SceneEvent::ActivationChanged(self.accumulator.activation().clone()));
		}

		if self.completion.poll(self.elapsed) && !self.completed {
			self.completed = true;
			info!("Onboarding animation complete at {:.2}s", self.elapsed);
			events.push(SceneEvent::Completed);
		}
		events
	}

	/// Completes immediately. Has no effect once completed or disposed.
	pub fn skip(&mut self) -> Option<SceneEvent> {
		if self.disposed || self.completed {
			return None;
		}
		self.completion.cancel();
		self.completed = true;
		info!("Onboarding animation skipped");
		Some(SceneEvent::Completed)
	}

	/// Tears the session down; a pending completion will never fire.
	pub fn dispose(&mut self) {
		if self.disposed {
			return;
		}
		self.disposed = true;
		self.completion.cancel();
		self.pending.clear();
		info!("Neural network session disposed");
	}

	pub fn frame(&self) -> Frame {
		let activation = self.accumulator.activation();
		let reveal = self.accumulator.reveal();

		let nodes = self
			.graph
			.nodes
			.iter()
			.map(|n| {
				let (opacity, emissive) =
					self.driver.node_appearance(n.id, activation.is_node_active(n.id));
				NodeAttrs {
					position: n.position,
					size: n.size,
					rotation: self.driver.node(n.id).map(|a| a.rotation).unwrap_or_default(),
					opacity,
					emissive,
				}
			})
			.collect();

		let mut edges = Vec::with_capacity(self.graph.edges.len());
		let mut particles =
			Vec::with_capacity(self.graph.edges.len() * self.driver.particle_count());
		for edge in &self.graph.edges {
			let active = activation.is_edge_active(&edge.key);
			edges.push(EdgeAttrs {
				start: edge.start,
				end: edge.end,
				opacity: self.driver.edge_opacity(active),
			});
			let opacity = self.driver.particle_opacity(active);
			particles.extend(
				self.driver
					.particles(edge, self.elapsed)
					.map(|position| ParticleAttrs { position, opacity }),
			);
		}

		let keywords = if reveal.show_keywords {
			let opacity = if reveal.transforming {
				self.config.keyword_opacity_transforming
			} else {
				self.config.keyword_opacity
			};
			KEYWORDS
				.iter()
				.map(|k| KeywordAttrs {
					text: k.text,
					position: k.anchor,
					opacity,
				})
				.collect()
		} else {
			Vec::new()
		};

		Frame {
			nodes,
			edges,
			particles,
			keywords,
		}
	}

	/// Front-most node whose projected disc contains the screen point.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<NodeId> {
		let mut found: Option<(NodeId, f64)> = None;
		for node in &self.graph.nodes {
			let Some(p) = self.camera.project(node.position) else {
				continue;
			};
			let (dx, dy) = (p.x - sx, p.y - sy);
			let radius = node.size * p.scale + HIT_PADDING;
			if dx * dx + dy * dy < radius * radius
				&& found.is_none_or(|(_, depth)| p.depth < depth)
			{
				found = Some((node.id, p.depth));
			}
		}
		found.map(|(id, _)| id)
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		debug!("Resize to {width}x{height}");
		self.camera.resize(width, height);
	}
}

#[cfg(test)]
mod tests {
	use super::super::builder::connect;
	use super::super::types::Node;
	use super::*;

	fn session(points: &[[f64; 3]]) -> NeuralNetworkState {
		let config = NetworkConfig::default();
		let nodes = points
			.iter()
			.enumerate()
			.map(|(id, &p)| Node {
				id,
				position: p.into(),
				size: 0.3,
			})
			.collect();
		let graph = connect(nodes, config.edge_threshold);
		NeuralNetworkState::from_graph(config, graph, 800.0, 600.0, StdRng::seed_from_u64(11))
	}

	fn completions(events: &[SceneEvent]) -> usize {
		events.iter().filter(|e| **e == SceneEvent::Completed).count()
	}

	fn run(s: &mut NeuralNetworkState, seconds: f64) -> usize {
		let mut fired = 0;
		let steps = (seconds / 0.016).ceil() as usize;
		for _ in 0..steps {
			fired += completions(&s.tick(0.016));
		}
		fired
	}

	#[test]
	fn interactions_apply_on_tick_in_order() {
		let mut s = session(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
		s.interact(Position::default());
		assert_eq!(s.accumulator.activation().interaction_count(), 0);

		let events = s.tick(0.016);
		assert_eq!(events.len(), 1);
		let SceneEvent::ActivationChanged(state) = &events[0] else {
			panic!("expected activation change");
		};
		assert_eq!(state.interaction_count(), 1);
		assert_eq!(state.active_nodes().len(), 2);
		assert_eq!(state.active_edges().len(), 1);
	}

	#[test]
	fn isolated_node_reaches_transforming_and_completes_once() {
		let mut s = session(&[[0.0, 0.0, 0.0]]);
		for _ in 0..15 {
			s.interact(Position::default());
			assert!(s.tick(0.016).iter().all(|e| *e != SceneEvent::Completed));
		}
		assert_eq!(s.accumulator.activation().interaction_count(), 15);
		assert!(s.accumulator.reveal().show_keywords);
		assert!(s.accumulator.reveal().transforming);
		assert!(matches!(s.completion, OneShotTimer::Pending { .. }));

		assert_eq!(run(&mut s, 2.9), 0);
		assert_eq!(run(&mut s, 0.2), 1);
		assert!(s.completed);

		for _ in 0..5 {
			s.interact(Position::default());
		}
		assert_eq!(run(&mut s, 5.0), 0);
		assert_eq!(s.accumulator.activation().interaction_count(), 20);
	}

	#[test]
	fn disposed_session_never_completes() {
		let mut s = session(&[[0.0, 0.0, 0.0]]);
		for _ in 0..15 {
			s.interact(Position::default());
		}
		s.tick(0.016);
		assert!(matches!(s.completion, OneShotTimer::Pending { .. }));
		s.dispose();
		assert_eq!(run(&mut s, 10.0), 0);
		assert!(s.skip().is_none());
		assert!(!s.completed);
	}

	#[test]
	fn skip_completes_once() {
		let mut s = session(&[[0.0, 0.0, 0.0]]);
		for _ in 0..15 {
			s.interact(Position::default());
		}
		s.tick(0.016);
		assert_eq!(s.skip(), Some(SceneEvent::Completed));
		assert_eq!(s.skip(), None);
		assert_eq!(run(&mut s, 10.0), 0);
	}

	#[test]
	fn hover_enter_counts_once_per_entry() {
		let mut s = session(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
		s.set_hover(Some(0));
		s.set_hover(Some(0));
		s.tick(0.016);
		assert_eq!(s.accumulator.activation().interaction_count(), 1);

		s.set_hover(None);
		s.set_hover(Some(0));
		s.set_hover(Some(1));
		s.tick(0.016);
		assert_eq!(s.accumulator.activation().interaction_count(), 3);
		assert_eq!(s.hovered, Some(1));
	}

	#[test]
	fn frame_reflects_activation() {
		let mut s = session(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [9.0, 9.0, 9.0]]);
		let frame = s.frame();
		assert_eq!(frame.edges.len(), 1);
		assert_eq!(frame.edges[0].opacity, 0.2);
		assert_eq!(frame.particles.len(), 5);
		assert!(frame.particles.iter().all(|p| p.opacity == 0.0));
		assert!(frame.keywords.is_empty());

		s.interact(Position::default());
		s.tick(0.5);
		let frame = s.frame();
		assert_eq!(frame.edges[0].opacity, 0.6);
		assert!(frame.particles.iter().all(|p| p.opacity == 0.8));
		assert_eq!(frame.nodes[0].opacity, 0.9);
		assert_eq!(frame.nodes[0].emissive, 2.0);
		assert_eq!(frame.nodes[2].emissive, 1.0);
		assert!((0.3..0.8).contains(&frame.nodes[2].opacity));
		// elapsed 0.5, first particle halfway along the unit edge
		assert!((frame.particles[0].position.x - 0.5).abs() < 1e-9);
	}

	#[test]
	fn keywords_appear_then_brighten() {
		let mut s = session(&[[0.0, 0.0, 0.0]]);
		for _ in 0..5 {
			s.interact(Position::default());
		}
		s.tick(0.016);
		let frame = s.frame();
		let texts: Vec<_> = frame.keywords.iter().map(|k| k.text).collect();
		assert_eq!(texts, vec!["Automate", "Optimize", "Analyze", "Connect"]);
		assert!(frame.keywords.iter().all(|k| k.opacity == 0.5));

		for _ in 0..10 {
			s.interact(Position::default());
		}
		s.tick(0.016);
		assert!(s.frame().keywords.iter().all(|k| k.opacity == 0.8));
	}

	#[test]
	fn rotation_accumulates_one_step_per_tick() {
		let mut s = session(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
		let (dx, dy) = NetworkConfig::default().rotation_step;
		assert_eq!(s.frame().nodes[0].rotation, (0.0, 0.0));

		s.tick(0.016);
		let first = s.frame().nodes[0].rotation;
		for _ in 0..9 {
			s.tick(0.016);
		}
		let tenth = s.frame().nodes[1].rotation;

		assert!((first.0 - dx).abs() < 1e-12 && (first.1 - dy).abs() < 1e-12);
		assert!((tenth.0 - 10.0 * dx).abs() < 1e-9);
		assert!((tenth.1 - 10.0 * dy).abs() < 1e-9);
	}

	#[test]
	fn hit_test_finds_centre_node() {
		let s = session(&[[0.0, 0.0, 0.0], [4.0, 0.0, 0.0]]);
		assert_eq!(s.node_at_position(400.0, 300.0), Some(0));
		assert_eq!(s.node_at_position(5.0, 5.0), None);
	}

	#[test]
	fn hit_test_prefers_front_node() {
		let s = session(&[[0.0, 0.0, -2.0], [0.0, 0.0, 2.0]]);
		assert_eq!(s.node_at_position(400.0, 300.0), Some(1));
	}
}
