//! The slicer (component B): parses a dynamic graph-exchange document and
//! produces an ordered sequence of temporal snapshots under a sliding-window
//! policy.
//!
//! A snapshot includes any node or edge whose declared interval overlaps the
//! window; window range and step default from the document's own
//! dateMin/dateMax span when not given explicitly.

pub mod gexf;

use crate::graph::attr::AttrType;
use crate::graph::AttrValue;
use crate::time::{Error as TimeError, TimeFormat, TimeRepresentation};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

const LOG_TARGET: &str = "slicer";

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("I/O error reading '{0}': {1}")]
	Io(std::path::PathBuf, std::io::Error),
	#[error("unsupported graph-exchange format (root element is not <gexf>): {0}")]
	UnsupportedFormat(String),
	#[error("unsupported graph mode {0:?}, expected \"dynamic\"")]
	UnsupportedMode(String),
	#[error("unsupported timeformat: {0}")]
	UnsupportedTimeFormat(#[from] TimeError),
	#[error("edge {0:?}->{1:?} references an unknown node")]
	DanglingEdge(String, String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttrMode {
	Static,
	Dynamic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttrClass {
	Node,
	Edge,
}

/// A declared node/edge attribute: id, title, value type, and which
/// elements (nodes or edges) it applies to.
#[derive(Debug, Clone, Serialize)]
pub struct AttributeDescriptor {
	pub id: String,
	pub title: String,
	pub ty: AttrType,
	pub mode: AttrMode,
	pub class: AttrClass,
	pub default: Option<AttrValue>,
}

/// One element's (node's or edge's) temporal activity.
#[derive(Debug, Clone)]
enum Activity {
	Interval { own: Option<(Option<f64>, Option<f64>)>, spells: Vec<(Option<f64>, Option<f64>)> },
	Timestamp { own: Option<f64>, spells: Vec<f64> },
}

impl Activity {
	fn has_any_temporal_data(&self) -> bool {
		match self {
			Activity::Interval { own, spells } => own.is_some() || !spells.is_empty(),
			Activity::Timestamp { own, spells } => own.is_some() || !spells.is_empty(),
		}
	}

	/// Overlap test: `NOT(end < win_start OR win_end < start)`, with a
	/// missing bound treated as -inf/+inf. For the timestamp representation
	/// membership is a half-open containment test.
	fn is_active(&self, win_start: f64, win_end: f64) -> bool {
		if !self.has_any_temporal_data() {
			return false;
		}
		match self {
			Activity::Interval { own, spells } => {
				let overlaps = |span: &(Option<f64>, Option<f64>)| {
					let s = span.0.unwrap_or(f64::NEG_INFINITY);
					let e = span.1.unwrap_or(f64::INFINITY);
					!(e < win_start || win_end < s)
				};
				own.as_ref().is_some_and(overlaps) || spells.iter().any(overlaps)
			},
			Activity::Timestamp { own, spells } => {
				let within = |&t: &f64| t >= win_start && t < win_end;
				own.as_ref().is_some_and(within) || spells.iter().any(within)
			},
		}
	}

	/// Every finite bound this element contributes, for dateMin/dateMax discovery.
	fn finite_bounds(&self) -> Vec<f64> {
		let mut out = Vec::new();
		match self {
			Activity::Interval { own, spells } => {
				for span in own.iter().chain(spells.iter()) {
					if let Some(s) = span.0 {
						out.push(s);
					}
					if let Some(e) = span.1 {
						out.push(e);
					}
				}
			},
			Activity::Timestamp { own, spells } => {
				out.extend(own.iter().copied());
				out.extend(spells.iter().copied());
			},
		}
		out
	}
}

/// One attribute value attached to a window of time, or unbounded if the
/// source attvalue carried no start/end.
#[derive(Debug, Clone)]
struct TimedValue {
	start: Option<f64>,
	end: Option<f64>,
	value: AttrValue,
}

#[derive(Debug, Clone, Default)]
struct DynamicAttrs {
	/// attribute id -> timed values, in document order.
	values: HashMap<String, Vec<TimedValue>>,
}

impl DynamicAttrs {
	/// Resolves the projected value for one attribute at a given snapshot:
	/// the sub-spell containing the snapshot start, else the one containing
	/// the midpoint, else the attribute's own unbounded value, else the
	/// descriptor default.
	fn resolve(&self, attr_id: &str, win_start: f64, win_mid: f64, default: Option<&AttrValue>) -> Option<AttrValue> {
		let entries = self.values.get(attr_id)?;
		let contains = |tv: &&TimedValue, t: f64| {
			let s = tv.start.unwrap_or(f64::NEG_INFINITY);
			let e = tv.end.unwrap_or(f64::INFINITY);
			s <= t && t < e
		};
		entries
			.iter()
			.find(|tv| contains(tv, win_start))
			.or_else(|| entries.iter().find(|tv| contains(tv, win_mid)))
			.map(|tv| tv.value.clone())
			.or_else(|| entries.iter().find(|tv| tv.start.is_none() && tv.end.is_none()).map(|tv| tv.value.clone()))
			.or_else(|| default.cloned())
	}
}

struct NodeRecord {
	id: String,
	label: String,
	activity: Activity,
	static_attrs: HashMap<String, AttrValue>,
	dynamic_attrs: DynamicAttrs,
}

struct EdgeRecord {
	source: String,
	target: String,
	directed: bool,
	activity: Activity,
	static_attrs: HashMap<String, AttrValue>,
	dynamic_attrs: DynamicAttrs,
}

/// One node's attributes as projected onto a specific snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotNode {
	pub id: String,
	pub label: String,
	pub attrs: HashMap<String, AttrValue>,
}

/// One edge's attributes as projected onto a specific snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotEdge {
	pub source: String,
	pub target: String,
	pub directed: bool,
	pub attrs: HashMap<String, AttrValue>,
}

/// One time-window projection of the graph: `Sₖ = {start, end, nodes, edges}`.
#[derive(Debug, Clone)]
pub struct Snapshot {
	pub start: f64,
	pub end: f64,
	pub nodes: Vec<SnapshotNode>,
	pub edges: Vec<SnapshotEdge>,
}

impl Snapshot {
	pub fn contains_node(&self, id: &str) -> bool {
		self.nodes.iter().any(|n| n.id == id)
	}
}

/// Output of the slicer: the ordered snapshot sequence plus the attribute
/// schema declared by the document.
pub struct SliceSet {
	pub snapshots: Vec<Snapshot>,
	pub attributes: Vec<AttributeDescriptor>,
	pub time_format: TimeFormat,
}

/// Parses `path` and produces the ordered snapshot sequence.
///
/// `range`/`step` are already-normalized scalars (same unit as the document's
/// `timeformat`, i.e. milliseconds for date-like formats); when `None`, a
/// document-derived default window is used.
pub fn slice_file(path: &Path, range: Option<f64>, step: Option<f64>) -> Result<SliceSet, Error> {
	let xml = std::fs::read_to_string(path).map_err(|e| Error::Io(path.to_path_buf(), e))?;
	slice_str(&xml, range, step)
}

pub fn slice_str(xml: &str, range: Option<f64>, step: Option<f64>) -> Result<SliceSet, Error> {
	let doc = gexf::GexfDocument::parse(xml).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;

	if doc.version != "1.3" {
		tracing::warn!(target: LOG_TARGET, version = %doc.version, "unexpected gexf version, proceeding anyway");
	}
	if doc.graph.mode != "dynamic" {
		return Err(Error::UnsupportedMode(doc.graph.mode.clone()));
	}

	let time_format = TimeFormat::parse(&doc.graph.timeformat)?;
	let time_repr = TimeRepresentation::parse(&doc.graph.timerepresentation)?;

	let mut node_attr_descriptors = Vec::new();
	let mut edge_attr_descriptors = Vec::new();
	for block in &doc.graph.attributes {
		let class = if block.class == "edge" { AttrClass::Edge } else { AttrClass::Node };
		let mode = if block.mode == "dynamic" { AttrMode::Dynamic } else { AttrMode::Static };
		for attr in &block.attribute {
			let ty: AttrType = attr.ty.parse().unwrap_or(AttrType::String);
			let descriptor = AttributeDescriptor {
				id: attr.id.clone(),
				title: if attr.title.is_empty() { attr.id.clone() } else { attr.title.clone() },
				ty,
				mode,
				class,
				default: attr.default.as_ref().map(|d| ty.parse_value(&d.value)),
			};
			match class {
				AttrClass::Node => node_attr_descriptors.push(descriptor),
				AttrClass::Edge => edge_attr_descriptors.push(descriptor),
			}
		}
	}

	let nodes = doc
		.graph
		.nodes
		.node
		.iter()
		.map(|n| build_node_record(n, time_format, time_repr, &node_attr_descriptors))
		.collect::<Result<Vec<_>, _>>()?;

	let node_ids: std::collections::HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();

	let edges = match &doc.graph.edges {
		Some(edges_xml) => edges_xml
			.edge
			.iter()
			.map(|e| {
				if !node_ids.contains(e.source.as_str()) || !node_ids.contains(e.target.as_str()) {
					return Err(Error::DanglingEdge(e.source.clone(), e.target.clone()));
				}
				build_edge_record(e, time_format, time_repr, &edge_attr_descriptors)
			})
			.collect::<Result<Vec<_>, _>>()?,
		None => Vec::new(),
	};

	// dateMin/dateMax discovery: nodes only, matching the envelope edges are drawn within.
	let mut bounds: Vec<f64> = nodes.iter().flat_map(|n| n.activity.finite_bounds()).collect();
	bounds.retain(|b| b.is_finite());
	let (date_min, date_max) = match (bounds.iter().cloned().fold(f64::INFINITY, f64::min), bounds.iter().cloned().fold(f64::NEG_INFINITY, f64::max)) {
		(min, max) if min.is_finite() && max.is_finite() => (min, max),
		_ => (0.0, 0.0),
	};

	let (default_range, default_step) = default_window(time_format);
	let range = range.unwrap_or(default_range);
	let step = step.unwrap_or(default_step);

	let mut snapshots = Vec::new();
	if range > 0.0 {
		let mut k: u64 = 0;
		loop {
			let start = date_min + (k as f64) * step;
			let end = start + range;
			if end > date_max {
				break;
			}
			snapshots.push(project_snapshot(&nodes, &edges, start, end));
			k += 1;
			if step <= 0.0 {
				// A non-positive step would loop forever; one window is all
				// that can be meaningfully produced.
				break;
			}
		}
	}

	let mut attributes = node_attr_descriptors;
	attributes.extend(edge_attr_descriptors);

	Ok(SliceSet { snapshots, attributes, time_format })
}

/// Default `(range, step)` when the caller and the settings file both
/// leave them unset, already in milliseconds for date-like formats.
fn default_window(time_format: TimeFormat) -> (f64, f64) {
	if time_format.is_date_like() {
		let range = 7.0 * 24.0 * 60.0 * 60.0 * 1000.0;
		let step = 24.0 * 60.0 * 60.0 * 1000.0;
		(range, step)
	} else {
		(1.0, 0.1)
	}
}

fn parse_opt(raw: &Option<String>, fmt: TimeFormat) -> Result<Option<f64>, Error> {
	match raw {
		Some(s) => Ok(Some(fmt.normalize(s)?)),
		None => Ok(None),
	}
}

fn build_activity_interval(
	start: &Option<String>,
	end: &Option<String>,
	spells: &Option<gexf::SpellsXml>,
	fmt: TimeFormat,
) -> Result<Activity, Error> {
	let s = parse_opt(start, fmt)?;
	let e = parse_opt(end, fmt)?;
	let own = if s.is_some() || e.is_some() { Some((s, e)) } else { None };
	let mut spans = Vec::new();
	if let Some(spells) = spells {
		for spell in &spells.spell {
			let ss = parse_opt(&spell.start, fmt)?;
			let se = parse_opt(&spell.end, fmt)?;
			if ss.is_some() || se.is_some() {
				spans.push((ss, se));
			}
		}
	}
	Ok(Activity::Interval { own, spells: spans })
}

fn build_activity_timestamp(
	timestamp: &Option<String>,
	spells: &Option<gexf::SpellsXml>,
	fmt: TimeFormat,
) -> Result<Activity, Error> {
	let own = parse_opt(timestamp, fmt)?;
	let mut spans = Vec::new();
	if let Some(spells) = spells {
		for spell in &spells.spell {
			if let Some(t) = parse_opt(&spell.timestamp, fmt)? {
				spans.push(t);
			}
		}
	}
	Ok(Activity::Timestamp { own, spells: spans })
}

fn build_attrs(
	attvalues: &Option<gexf::AttvaluesXml>,
	descriptors: &[AttributeDescriptor],
	fmt: TimeFormat,
) -> Result<(HashMap<String, AttrValue>, DynamicAttrs), Error> {
	let mut static_attrs = HashMap::new();
	let mut dynamic = DynamicAttrs::default();

	if let Some(attvalues) = attvalues {
		for av in &attvalues.attvalue {
			let descriptor = descriptors.iter().find(|d| d.id == av.for_);
			let ty = descriptor.map(|d| d.ty).unwrap_or(AttrType::String);
			let value = ty.parse_value(&av.value);
			let is_dynamic = descriptor.map(|d| d.mode == AttrMode::Dynamic).unwrap_or(false);

			if is_dynamic {
				let start = parse_opt(&av.start, fmt)?;
				let end = parse_opt(&av.end, fmt)?;
				dynamic.values.entry(av.for_.clone()).or_default().push(TimedValue { start, end, value });
			} else {
				static_attrs.insert(av.for_.clone(), value);
			}
		}
	}

	Ok((static_attrs, dynamic))
}

fn build_node_record(
	n: &gexf::NodeXml,
	fmt: TimeFormat,
	repr: TimeRepresentation,
	descriptors: &[AttributeDescriptor],
) -> Result<NodeRecord, Error> {
	let activity = match repr {
		TimeRepresentation::Interval => build_activity_interval(&n.start, &n.end, &n.spells, fmt)?,
		TimeRepresentation::Timestamp => build_activity_timestamp(&n.timestamp, &n.spells, fmt)?,
	};
	let (static_attrs, dynamic_attrs) = build_attrs(&n.attvalues, descriptors, fmt)?;
	Ok(NodeRecord { id: n.id.clone(), label: n.label.clone(), activity, static_attrs, dynamic_attrs })
}

fn build_edge_record(
	e: &gexf::EdgeXml,
	fmt: TimeFormat,
	repr: TimeRepresentation,
	descriptors: &[AttributeDescriptor],
) -> Result<EdgeRecord, Error> {
	let activity = match repr {
		TimeRepresentation::Interval => build_activity_interval(&e.start, &e.end, &e.spells, fmt)?,
		TimeRepresentation::Timestamp => build_activity_timestamp(&e.timestamp, &e.spells, fmt)?,
	};
	let (static_attrs, dynamic_attrs) = build_attrs(&e.attvalues, descriptors, fmt)?;
	Ok(EdgeRecord {
		source: e.source.clone(),
		target: e.target.clone(),
		directed: e.ty != "undirected",
		activity,
		static_attrs,
		dynamic_attrs,
	})
}

fn project_attrs(static_attrs: &HashMap<String, AttrValue>, dynamic_attrs: &DynamicAttrs, win_start: f64, win_mid: f64) -> HashMap<String, AttrValue> {
	let mut out = static_attrs.clone();
	for (id, _) in &dynamic_attrs.values {
		if let Some(v) = dynamic_attrs.resolve(id, win_start, win_mid, None) {
			out.insert(id.clone(), v);
		}
	}
	out
}

fn project_snapshot(nodes: &[NodeRecord], edges: &[EdgeRecord], start: f64, end: f64) -> Snapshot {
	let mid = start + (end - start) / 2.0;

	let active_nodes: Vec<&NodeRecord> = nodes.iter().filter(|n| n.activity.is_active(start, end)).collect();
	let active_ids: std::collections::HashSet<&str> = active_nodes.iter().map(|n| n.id.as_str()).collect();

	let snapshot_nodes = active_nodes
		.iter()
		.map(|n| SnapshotNode {
			id: n.id.clone(),
			label: n.label.clone(),
			attrs: project_attrs(&n.static_attrs, &n.dynamic_attrs, start, mid),
		})
		.collect();

	let snapshot_edges = edges
		.iter()
		.filter(|e| e.activity.is_active(start, end))
		.filter(|e| active_ids.contains(e.source.as_str()) && active_ids.contains(e.target.as_str()))
		.map(|e| SnapshotEdge {
			source: e.source.clone(),
			target: e.target.clone(),
			directed: e.directed,
			attrs: project_attrs(&e.static_attrs, &e.dynamic_attrs, start, mid),
		})
		.collect();

	Snapshot { start, end, nodes: snapshot_nodes, edges: snapshot_edges }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn single_node_interval_graph_yields_two_overlapping_snapshots() {
		let xml = r#"
			<gexf version="1.3">
			  <graph mode="dynamic" timeformat="integer" timerepresentation="interval">
			    <nodes><node id="a" label="A" start="0" end="10"/></nodes>
			  </graph>
			</gexf>"#;
		let slices = slice_str(xml, Some(10.0), Some(5.0)).unwrap();
		assert_eq!(slices.snapshots.len(), 2);
		assert_eq!((slices.snapshots[0].start, slices.snapshots[0].end), (0.0, 10.0));
		assert_eq!((slices.snapshots[1].start, slices.snapshots[1].end), (5.0, 15.0));
		assert!(slices.snapshots[0].contains_node("a"));
		assert!(slices.snapshots[1].contains_node("a"));
	}

	#[test]
	fn two_node_timestamp_graph() {
		let xml = r#"
			<gexf version="1.3">
			  <graph mode="dynamic" timeformat="integer" timerepresentation="timestamp">
			    <nodes>
			      <node id="a" label="A" timestamp="3"/>
			      <node id="b" label="B" timestamp="7"/>
			    </nodes>
			  </graph>
			</gexf>"#;
		let slices = slice_str(xml, Some(4.0), Some(2.0)).unwrap();
		assert!(!slices.snapshots.is_empty());
		assert_eq!(slices.snapshots[0].start, 3.0);
		assert!(slices.snapshots[0].contains_node("a"));
	}

	#[test]
	fn range_zero_yields_zero_snapshots() {
		let xml = r#"
			<gexf version="1.3">
			  <graph mode="dynamic" timeformat="integer" timerepresentation="interval">
			    <nodes><node id="a" label="A" start="0" end="10"/></nodes>
			  </graph>
			</gexf>"#;
		let slices = slice_str(xml, Some(0.0), Some(5.0)).unwrap();
		assert_eq!(slices.snapshots.len(), 0);
	}

	#[test]
	fn step_larger_than_span_yields_at_most_one_snapshot() {
		let xml = r#"
			<gexf version="1.3">
			  <graph mode="dynamic" timeformat="integer" timerepresentation="interval">
			    <nodes><node id="a" label="A" start="0" end="10"/></nodes>
			  </graph>
			</gexf>"#;
		let slices = slice_str(xml, Some(5.0), Some(100.0)).unwrap();
		assert!(slices.snapshots.len() <= 1);
	}

	#[test]
	fn edge_requires_both_endpoints_active_in_the_same_snapshot() {
		let xml = r#"
			<gexf version="1.3">
			  <graph mode="dynamic" timeformat="integer" timerepresentation="interval">
			    <nodes>
			      <node id="a" label="A" start="0" end="5"/>
			      <node id="b" label="B" start="20" end="25"/>
			    </nodes>
			    <edges><edge id="e0" source="a" target="b" start="0" end="25"/></edges>
			  </graph>
			</gexf>"#;
		let slices = slice_str(xml, Some(5.0), Some(5.0)).unwrap();
		for s in &slices.snapshots {
			for e in &s.edges {
				assert!(s.contains_node(&e.source));
				assert!(s.contains_node(&e.target));
			}
		}
	}

	#[test]
	fn element_with_no_interval_and_no_spells_is_always_inactive() {
		let xml = r#"
			<gexf version="1.3">
			  <graph mode="dynamic" timeformat="integer" timerepresentation="interval">
			    <nodes>
			      <node id="a" label="A" start="0" end="10"/>
			      <node id="b" label="B"/>
			    </nodes>
			  </graph>
			</gexf>"#;
		let slices = slice_str(xml, Some(10.0), Some(5.0)).unwrap();
		for s in &slices.snapshots {
			assert!(!s.contains_node("b"));
		}
	}

	#[test]
	fn non_dynamic_mode_is_rejected() {
		let xml = r#"
			<gexf version="1.3">
			  <graph mode="static">
			    <nodes><node id="a" label="A"/></nodes>
			  </graph>
			</gexf>"#;
		let err = slice_str(xml, None, None).unwrap_err();
		assert!(matches!(err, Error::UnsupportedMode(_)));
	}

	#[test]
	fn every_snapshot_edge_endpoint_is_in_its_node_list_invariant() {
		let xml = r#"
			<gexf version="1.3">
			  <graph mode="dynamic" timeformat="integer" timerepresentation="interval">
			    <nodes>
			      <node id="a" label="A" start="0" end="100"/>
			      <node id="b" label="B" start="0" end="50"/>
			      <node id="c" label="C" start="40" end="100"/>
			    </nodes>
			    <edges>
			      <edge id="e0" source="a" target="b" start="0" end="100"/>
			      <edge id="e1" source="b" target="c" start="0" end="100"/>
			    </edges>
			  </graph>
			</gexf>"#;
		let slices = slice_str(xml, Some(10.0), Some(10.0)).unwrap();
		for s in &slices.snapshots {
			for e in &s.edges {
				assert!(s.contains_node(&e.source));
				assert!(s.contains_node(&e.target));
			}
			assert_eq!(s.end, s.start + 10.0);
		}
	}
}
