use std::collections::BTreeSet;

use log::{debug, info};

use super::config::NetworkConfig;
use super::types::{EdgeKey, Graph, NodeId, Position};

/// Nodes and edges lit up so far, plus the number of interaction events.
///
/// Both sets only ever grow during a session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActivationState {
	active_nodes: BTreeSet<NodeId>,
	active_edges: BTreeSet<EdgeKey>,
	interaction_count: u32,
}

impl ActivationState {
	pub fn active_nodes(&self) -> &BTreeSet<NodeId> {
		&self.active_nodes
	}

	pub fn active_edges(&self) -> &BTreeSet<EdgeKey> {
		&self.active_edges
	}

	pub fn interaction_count(&self) -> u32 {
		self.interaction_count
	}

	pub fn is_node_active(&self, id: NodeId) -> bool {
		self.active_nodes.contains(&id)
	}

	pub fn is_edge_active(&self, key: &EdgeKey) -> bool {
		self.active_edges.contains(key)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
	Idle,
	Revealing,
	Transforming,
}

/// Latched flags: once set they stay set for the session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RevealState {
	pub show_keywords: bool,
	pub transforming: bool,
}

impl RevealState {
	pub fn phase(&self) -> Phase {
		if self.transforming {
			Phase::Transforming
		} else if self.show_keywords {
			Phase::Revealing
		} else {
			Phase::Idle
		}
	}
}

/// What a single interaction changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InteractOutcome {
	pub new_nodes: usize,
	pub new_edges: usize,
	pub keywords_revealed: bool,
	pub transform_started: bool,
}

pub struct InteractionAccumulator {
	activation: ActivationState,
	reveal: RevealState,
	nearby_radius: f64,
	keyword_threshold: u32,
	transform_threshold: u32,
}

impl InteractionAccumulator {
	pub fn new(config: &NetworkConfig) -> Self {
		Self {
			activation: ActivationState::default(),
			reveal: RevealState::default(),
			nearby_radius: config.nearby_radius,
			keyword_threshold: config.keyword_threshold,
			transform_threshold: config.transform_threshold,
		}
	}

	pub fn activation(&self) -> &ActivationState {
		&self.activation
	}

	pub fn reveal(&self) -> RevealState {
		self.reveal
	}

	/// Records one interaction at `position`.
	///
	/// Nodes are matched by exact coordinates, so coincident nodes count as
	/// one entity. A position that matches no node activates nothing but the
	/// event is still counted.
	pub fn on_interact(&mut self, graph: &Graph, position: Position) -> InteractOutcome {
		let mut outcome = InteractOutcome::default();

		if graph.nodes_at(position).next().is_some() {
			let nearby = graph.nodes_within(position, self.nearby_radius);
			for id in graph.nodes_at(position).chain(nearby) {
				if self.activation.active_nodes.insert(id) {
					outcome.new_nodes += 1;
				}
			}
			for key in graph.edges_touching(position) {
				if self.activation.active_edges.insert(key) {
					outcome.new_edges += 1;
				}
			}
		}

		self.activation.interaction_count = self.activation.interaction_count.saturating_add(1);
		let count = self.activation.interaction_count;

		if !self.reveal.show_keywords && count >= self.keyword_threshold {
			self.reveal.show_keywords = true;
			outcome.keywords_revealed = true;
			info!("Entered {:?} after {count} interactions", self.reveal.phase());
		}
		if !self.reveal.transforming && count >= self.transform_threshold {
			self.reveal.transforming = true;
			outcome.transform_started = true;
			info!("Entered {:?} after {count} interactions", self.reveal.phase());
		}

		debug!(
			"Interaction #{count} at ({:.2}, {:.2}, {:.2}): +{} nodes, +{} edges",
			position.x, position.y, position.z, outcome.new_nodes, outcome.new_edges
		);
		outcome
	}
}
