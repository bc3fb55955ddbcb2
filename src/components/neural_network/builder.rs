use log::info;
use rand::Rng;

use super::config::{NetworkConfig, sample_range};
use super::types::{Edge, EdgeKey, Graph, Node, Position};

/// Scatters nodes in a cube and links every pair closer than a threshold.
#[derive(Clone, Debug)]
pub struct SpatialGraphBuilder {
	pub node_count: usize,
	pub bounds: f64,
	pub edge_threshold: f64,
	pub node_size: (f64, f64),
}

impl SpatialGraphBuilder {
	pub fn from_config(config: &NetworkConfig) -> Self {
		Self {
			node_count: config.node_count,
			bounds: config.bounds,
			edge_threshold: config.edge_threshold,
			node_size: config.node_size,
		}
	}

	pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Graph {
		let nodes = (0..self.node_count)
			.map(|id| {
				let mut coord = || (rng.r#gen::<f64>() - 0.5) * self.bounds;
				let position = Position::new(coord(), coord(), coord());
				Node {
					id,
					position,
					size: sample_range(rng, self.node_size),
				}
			})
			.collect();

		let graph = connect(nodes, self.edge_threshold);
		info!(
			"Built graph: {} nodes, {} edges (threshold {})",
			graph.nodes.len(),
			graph.edges.len(),
			self.edge_threshold
		);
		graph
	}
}

/// Derives edges for an existing node set. Node ids must equal their index.
///
/// Each unordered pair is checked once, so the result has no self-edges and
/// no duplicates. O(n²), which is fine at onboarding sizes.
pub fn connect(nodes: Vec<Node>, edge_threshold: f64) -> Graph {
	let mut edges = Vec::new();
	for (i, a) in nodes.iter().enumerate() {
		for b in &nodes[i + 1..] {
			if a.position.distance(b.position) < edge_threshold {
				edges.push(Edge {
					key: EdgeKey::new(a.id, b.id),
					start: a.position,
					end: b.position,
				});
			}
		}
	}
	Graph { nodes, edges }
}
