//! The rasterizer (component D): turns one laid-out [`Snapshot`] into a
//! composited RGBA frame plus its placed label metadata.
//!
//! Pipeline per snapshot: fit node positions to the canvas, build the
//! Voronoi ownership field, build the additive heatmap field and hillshade
//! it, render edges (Voronoi-attenuated) and nodes, place labels, then
//! composite everything in `compose`'s layer order.

pub mod compose;
pub mod coords;
pub mod edges;
pub mod frame;
pub mod heatmap;
pub mod hillshade;
pub mod labels;
pub mod nodes;
pub mod rescale;
pub mod text;
pub mod voronoi;

use crate::layout::{seeding, sizing};
use crate::slicer::Snapshot;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("frame encoding error: {0}")]
	Frame(#[from] frame::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterSettings {
	pub canvas_width: u32,
	pub canvas_height: u32,
	pub output_dpi: f64,
	pub voronoi_enabled: bool,
	pub hillshade_enabled: bool,
	pub labels_enabled: bool,
}

impl Default for RasterSettings {
	fn default() -> Self {
		RasterSettings { canvas_width: 1600, canvas_height: 1200, output_dpi: 96.0, voronoi_enabled: true, hillshade_enabled: true, labels_enabled: true }
	}
}

/// Renders one snapshot (already laid out — positions and sizes already
/// written into its nodes' attribute bags) into a composited [`compose::Frame`].
pub fn render_snapshot(snapshot: &Snapshot, settings: &RasterSettings) -> compose::Frame {
	let width = settings.canvas_width;
	let height = settings.canvas_height;

	let points: Vec<(f64, f64, f64)> = snapshot
		.nodes
		.iter()
		.map(|n| {
			let (x, y) = seeding::get_position(n).unwrap_or((0.0, 0.0));
			let size = sizing::get_size(n).unwrap_or(1.0);
			(x, y, size)
		})
		.collect();

	let rescale_settings = rescale::RescaleSettings::default();
	let transform = rescale::fit_to_canvas(&points, width as f64, height as f64, &rescale_settings);

	let pixel_points: Vec<(f64, f64, f64)> = points
		.iter()
		.map(|&(x, y, size)| {
			let (px, py) = transform.apply(x, y);
			(px, py, size * transform.scale)
		})
		.collect();

	let index_of: std::collections::HashMap<&str, usize> =
		snapshot.nodes.iter().enumerate().map(|(i, n)| (n.id.as_str(), i)).collect();

	let voronoi_field = if settings.voronoi_enabled {
		let sites: Vec<(f64, f64)> = pixel_points.iter().map(|&(x, y, _)| (x, y)).collect();
		Some(voronoi::compute(width, height, &sites))
	} else {
		None
	};

	let hillshade_layer = if settings.hillshade_enabled {
		let sites: Vec<(f64, f64, f64)> = pixel_points.clone();
		let field = heatmap::compute(width, height, &sites, &heatmap::HeatmapSettings::default());
		Some(hillshade::render(&field, &hillshade::HillshadeSettings::default()))
	} else {
		None
	};

	let edge_segments: Vec<edges::EdgeSegment> = snapshot
		.edges
		.iter()
		.filter_map(|e| {
			let si = *index_of.get(e.source.as_str())?;
			let ti = *index_of.get(e.target.as_str())?;
			let (sx, sy, _) = pixel_points[si];
			let (tx, ty, _) = pixel_points[ti];
			Some(edges::EdgeSegment { p0: (sx, sy), p1: (tx, ty), source_vid: si as u32, target_vid: ti as u32 })
		})
		.collect();
	let edges_layer = edges::render(width, height, &edge_segments, voronoi_field.as_ref(), &edges::EdgeSettings::default());

	let node_settings = nodes::NodeDrawSettings::default();
	let discs: Vec<(f64, f64, f64, (f32, f32, f32))> =
		pixel_points.iter().map(|&(x, y, r)| (x, y, r, node_settings.fill)).collect();
	let nodes_layer = nodes::render(width, height, &discs, &node_settings);

	let label_settings = labels::LabelSettings::default();
	let placed = if settings.labels_enabled {
		let candidates: Vec<labels::LabelCandidate> = snapshot
			.nodes
			.iter()
			.zip(&pixel_points)
			.map(|(n, &(x, y, r))| labels::LabelCandidate {
				text: n.label.clone(),
				anchor_x: x,
				anchor_y: y - r - 2.0,
				font_size_pt: labels::font_size_for(r, &label_settings),
			})
			.collect();
		labels::place_labels(width, height, &candidates, &text::MonospaceEstimate::new(), &label_settings)
	} else {
		Vec::new()
	};

	compose::compose(width, height, &compose::BackgroundSettings::default(), hillshade_layer.as_ref(), &edges_layer, &nodes_layer, placed)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::slicer::SnapshotNode;
	use std::collections::HashMap as Map;

	#[test]
	fn rendering_an_empty_snapshot_yields_a_blank_frame_of_the_right_size() {
		let snap = Snapshot { start: 0.0, end: 1.0, nodes: vec![], edges: vec![] };
		let settings = RasterSettings { canvas_width: 20, canvas_height: 10, ..RasterSettings::default() };
		let frame = render_snapshot(&snap, &settings);
		assert_eq!(frame.layer.width, 20);
		assert_eq!(frame.layer.height, 10);
	}

	#[test]
	fn a_single_node_produces_a_non_transparent_pixel() {
		let mut node = SnapshotNode { id: "a".into(), label: "A".into(), attrs: Map::new() };
		seeding::set_position(&mut node, 0.0, 0.0);
		sizing::set_size(&mut node, 5.0);
		let snap = Snapshot { start: 0.0, end: 1.0, nodes: vec![node], edges: vec![] };
		let frame = render_snapshot(&snap, &RasterSettings::default());
		assert!(frame.layer.pixels.iter().any(|p| p.a > 0.0 && (p.r - 0.97).abs() > 1e-3));
	}
}
