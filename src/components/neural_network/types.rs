use std::fmt;
use std::ops::{Add, Mul, Sub};

pub type NodeId = usize;

/// A point in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
	pub x: f64,
	pub y: f64,
	pub z: f64,
}

impl Position {
	pub const fn new(x: f64, y: f64, z: f64) -> Self {
		Self { x, y, z }
	}

	pub fn length(self) -> f64 {
		(self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
	}

	pub fn distance(self, other: Position) -> f64 {
		(other - self).length()
	}

	/// Linear interpolation; `t` is not clamped.
	pub fn lerp(self, other: Position, t: f64) -> Position {
		self + (other - self) * t
	}
}

impl From<[f64; 3]> for Position {
	fn from([x, y, z]: [f64; 3]) -> Self {
		Self::new(x, y, z)
	}
}

impl Add for Position {
	type Output = Position;

	fn add(self, rhs: Position) -> Position {
		Position::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
	}
}

impl Sub for Position {
	type Output = Position;

	fn sub(self, rhs: Position) -> Position {
		Position::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
	}
}

impl Mul<f64> for Position {
	type Output = Position;

	fn mul(self, k: f64) -> Position {
		Position::new(self.x * k, self.y * k, self.z * k)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: NodeId,
	pub position: Position,
	pub size: f64,
}

/// Unordered node pair, stored with the smaller id first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
	pub a: NodeId,
	pub b: NodeId,
}

impl EdgeKey {
	pub fn new(i: NodeId, j: NodeId) -> Self {
		if i <= j {
			Self { a: i, b: j }
		} else {
			Self { a: j, b: i }
		}
	}
}

impl fmt::Display for EdgeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}-{}", self.a, self.b)
	}
}

/// Endpoints are copies of the node positions taken at build time.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	pub key: EdgeKey,
	pub start: Position,
	pub end: Position,
}

impl Edge {
	pub fn touches_position(&self, position: Position) -> bool {
		self.start == position || self.end == position
	}
}

#[derive(Clone, Debug, Default)]
pub struct Graph {
	pub nodes: Vec<Node>,
	pub edges: Vec<Edge>,
}

impl Graph {
	pub fn node(&self, id: NodeId) -> Option<&Node> {
		self.nodes.get(id)
	}

	/// Nodes sitting exactly on `position`. Coincident nodes all match.
	pub fn nodes_at(&self, position: Position) -> impl Iterator<Item = NodeId> + '_ {
		self.nodes
			.iter()
			.filter(move |n| n.position == position)
			.map(|n| n.id)
	}

	pub fn nodes_within(
		&self,
		position: Position,
		radius: f64,
	) -> impl Iterator<Item = NodeId> + '_ {
		self.nodes
			.iter()
			.filter(move |n| n.position.distance(position) < radius)
			.map(|n| n.id)
	}

	pub fn edges_touching(&self, position: Position) -> impl Iterator<Item = EdgeKey> + '_ {
		self.edges
			.iter()
			.filter(move |e| e.touches_position(position))
			.map(|e| e.key)
	}
}

/// Floating label revealed after enough interactions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyword {
	pub text: &'static str,
	pub anchor: Position,
}

pub const KEYWORDS: [Keyword; 4] = [
	Keyword {
		text: "Automate",
		anchor: Position::new(3.0, 2.0, 0.0),
	},
	Keyword {
		text: "Optimize",
		anchor: Position::new(-3.0, -2.0, 1.0),
	},
	Keyword {
		text: "Analyze",
		anchor: Position::new(0.0, 3.0, -2.0),
	},
	Keyword {
		text: "Connect",
		anchor: Position::new(-2.0, 0.0, 3.0),
	},
];
