//! Node sizing: `size = sqrt(sizeMin + sizeFactor * inDegree^sizePower)`.

use crate::slicer::{Snapshot, SnapshotNode};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
pub struct SizingSettings {
	pub size_min: f64,
	pub size_factor: f64,
	pub size_power: f64,
}

impl Default for SizingSettings {
	fn default() -> Self {
		SizingSettings { size_min: 10.0, size_factor: 2.0, size_power: 1.0 }
	}
}

/// In-degree within one snapshot: incoming directed edges plus all undirected
/// incident edges, matching `Graph::in_degree`'s semantics but scoped to the
/// snapshot's own edge list.
fn in_degrees(snapshot: &Snapshot) -> HashMap<String, u64> {
	let mut degrees: HashMap<String, u64> = snapshot.nodes.iter().map(|n| (n.id.clone(), 0)).collect();
	for edge in &snapshot.edges {
		if edge.directed {
			*degrees.entry(edge.target.clone()).or_insert(0) += 1;
		} else {
			*degrees.entry(edge.source.clone()).or_insert(0) += 1;
			*degrees.entry(edge.target.clone()).or_insert(0) += 1;
		}
	}
	degrees
}

pub fn apply_node_sizes(snapshot: &mut Snapshot, settings: &SizingSettings) {
	let degrees = in_degrees(snapshot);
	for node in &mut snapshot.nodes {
		let deg = *degrees.get(&node.id).unwrap_or(&0);
		let size = (settings.size_min + settings.size_factor * (deg as f64).powf(settings.size_power)).sqrt();
		set_size(node, size);
	}
}

pub fn set_size(node: &mut SnapshotNode, size: f64) {
	node.attrs.insert("size".to_string(), crate::graph::AttrValue::Double(size));
}

pub fn get_size(node: &SnapshotNode) -> Option<f64> {
	node.attrs.get("size").and_then(|v| v.as_f64())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::slicer::SnapshotEdge;
	use std::collections::HashMap as Map;

	fn node(id: &str) -> SnapshotNode {
		SnapshotNode { id: id.to_string(), label: id.to_string(), attrs: Map::new() }
	}

	#[test]
	fn isolated_node_gets_sqrt_size_min() {
		let mut snap = Snapshot { start: 0.0, end: 1.0, nodes: vec![node("a")], edges: vec![] };
		apply_node_sizes(&mut snap, &SizingSettings::default());
		assert_eq!(get_size(&snap.nodes[0]).unwrap(), (10.0f64).sqrt());
	}

	#[test]
	fn directed_edge_increments_only_target_in_degree() {
		let mut snap = Snapshot {
			start: 0.0,
			end: 1.0,
			nodes: vec![node("a"), node("b")],
			edges: vec![SnapshotEdge {
				source: "a".into(),
				target: "b".into(),
				directed: true,
				attrs: Map::new(),
			}],
		};
		apply_node_sizes(&mut snap, &SizingSettings::default());
		let size_a = get_size(&snap.nodes[0]).unwrap();
		let size_b = get_size(&snap.nodes[1]).unwrap();
		assert_eq!(size_a, (10.0f64).sqrt());
		assert_eq!(size_b, (12.0f64).sqrt());
	}
}
