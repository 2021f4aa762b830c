//! The in-memory graph model (component A).
//!
//! A labeled, mixed directed/undirected multigraph. Nodes and edges each carry
//! a small set of well-known attributes plus an open-ended passthrough bag for
//! whatever the input document declared. Iteration order for [`Graph::nodes`]
//! and [`Graph::edges`] is insertion order: several invariants in the slicer
//! and the label-placement pass depend on this being deterministic.

use std::collections::HashMap;
use std::fmt;

pub mod attr;

pub use attr::{AttrType, AttrValue};

/// RGB color, defaulted to a neutral gray when the input does not supply one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
}

impl Color {
	pub const GRAY: Color = Color { r: 130, g: 130, b: 130 };

	pub fn new(r: u8, g: u8, b: u8) -> Self {
		Color { r, g, b }
	}
}

impl Default for Color {
	fn default() -> Self {
		Color::GRAY
	}
}

/// Well-known node attributes plus an open passthrough bag.
#[derive(Debug, Clone, Default)]
pub struct NodeAttrs {
	pub label: String,
	pub size: f64,
	pub x: Option<f64>,
	pub y: Option<f64>,
	pub color: Option<Color>,
	/// Integer id assigned by the Voronoi pass; 0 means "not yet assigned".
	pub vid: u32,
	pub passthrough: HashMap<String, AttrValue>,
}

/// Well-known edge attributes plus an open passthrough bag.
#[derive(Debug, Clone)]
pub struct EdgeAttrs {
	pub start: Option<f64>,
	pub end: Option<f64>,
	pub timestamp: Option<f64>,
	pub opacity: f64,
	pub passthrough: HashMap<String, AttrValue>,
}

impl Default for EdgeAttrs {
	fn default() -> Self {
		EdgeAttrs { start: None, end: None, timestamp: None, opacity: 1.0, passthrough: HashMap::new() }
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directedness {
	Directed,
	Undirected,
}

/// One multigraph edge: an ordered pair of node ids plus directedness and attributes.
#[derive(Debug, Clone)]
pub struct Edge {
	pub source: String,
	pub target: String,
	pub directedness: Directedness,
	pub attrs: EdgeAttrs,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("node id {0:?} is not present in the graph")]
	UnknownNode(String),
	#[error("self-loops are not allowed (node {0:?})")]
	SelfLoop(String),
	#[error("duplicate node id {0:?}")]
	DuplicateNode(String),
}

/// A labeled, mixed directed/undirected multigraph.
///
/// Nodes are keyed by a unique string id. Internally each node also gets a
/// small integer index so that `forEachNeighbor` and degree bookkeeping don't
/// need string hashing on the hot path; the public API stays string-id based
/// per the data model.
#[derive(Debug, Default, Clone)]
pub struct Graph {
	node_order: Vec<String>,
	node_index: HashMap<String, usize>,
	nodes: Vec<NodeAttrs>,
	edges: Vec<Edge>,
	/// Adjacency by node index: (neighbor index, incoming-directed-or-undirected).
	adjacency: Vec<Vec<(usize, bool)>>,
	in_degree: Vec<u64>,
}

impl Graph {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_node(&mut self, id: impl Into<String>, attrs: NodeAttrs) -> Result<(), Error> {
		let id = id.into();
		if self.node_index.contains_key(&id) {
			return Err(Error::DuplicateNode(id));
		}
		let idx = self.nodes.len();
		self.node_index.insert(id.clone(), idx);
		self.node_order.push(id);
		self.nodes.push(attrs);
		self.adjacency.push(Vec::new());
		self.in_degree.push(0);
		Ok(())
	}

	pub fn add_edge(
		&mut self,
		source: impl Into<String>,
		target: impl Into<String>,
		directedness: Directedness,
		attrs: EdgeAttrs,
	) -> Result<(), Error> {
		let source = source.into();
		let target = target.into();
		if source == target {
			return Err(Error::SelfLoop(source));
		}
		let si = *self.node_index.get(&source).ok_or_else(|| Error::UnknownNode(source.clone()))?;
		let ti = *self.node_index.get(&target).ok_or_else(|| Error::UnknownNode(target.clone()))?;

		match directedness {
			Directedness::Directed => {
				self.adjacency[si].push((ti, false));
				self.adjacency[ti].push((si, false));
				self.in_degree[ti] += 1;
			},
			Directedness::Undirected => {
				self.adjacency[si].push((ti, true));
				self.adjacency[ti].push((si, true));
				self.in_degree[si] += 1;
				self.in_degree[ti] += 1;
			},
		}

		self.edges.push(Edge { source, target, directedness, attrs });
		Ok(())
	}

	pub fn get_node_attributes(&self, id: &str) -> Option<&NodeAttrs> {
		self.node_index.get(id).map(|&i| &self.nodes[i])
	}

	pub fn get_node_attributes_mut(&mut self, id: &str) -> Option<&mut NodeAttrs> {
		if let Some(&i) = self.node_index.get(id) { Some(&mut self.nodes[i]) } else { None }
	}

	pub fn get_edge_attributes(&self, index: usize) -> Option<&EdgeAttrs> {
		self.edges.get(index).map(|e| &e.attrs)
	}

	/// Nodes in insertion order.
	pub fn nodes(&self) -> impl Iterator<Item = (&str, &NodeAttrs)> {
		self.node_order.iter().map(|id| id.as_str()).zip(self.nodes.iter())
	}

	/// Edges in insertion order.
	pub fn edges(&self) -> impl Iterator<Item = &Edge> {
		self.edges.iter()
	}

	pub fn for_each_neighbor(&self, id: &str, mut f: impl FnMut(&str)) {
		if let Some(&i) = self.node_index.get(id) {
			for &(j, _) in &self.adjacency[i] {
				f(&self.node_order[j]);
			}
		}
	}

	/// Number of nodes.
	pub fn order(&self) -> usize {
		self.nodes.len()
	}

	/// Number of edges.
	pub fn size(&self) -> usize {
		self.edges.len()
	}

	/// Incoming directed edges plus all undirected incident edges.
	pub fn in_degree(&self, id: &str) -> u64 {
		self.node_index.get(id).map(|&i| self.in_degree[i]).unwrap_or(0)
	}

	pub fn contains_node(&self, id: &str) -> bool {
		self.node_index.contains_key(id)
	}
}

impl fmt::Display for Graph {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Graph(order={}, size={})", self.order(), self.size())
	}
}
