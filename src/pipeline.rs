//! Orchestrates the three components end to end: slice a document into
//! snapshots, lay each one out (seeding continuity from the previous
//! snapshot's positions), rasterize it, and write the PNG sequence.

use crate::cli::RenderArgs;
use crate::error::Error;
use crate::layout::{self, LayoutSettings, NodePositionIndex};
use crate::logging::APPV;
use crate::raster::{self, RasterSettings};
use crate::settings::Settings;
use crate::slicer::{self, SliceSet};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

pub fn resolve_settings(args: &RenderArgs) -> Result<Settings, Error> {
	let mut settings = match &args.config {
		Some(path) => Settings::load_from_file(path)?,
		None => Settings::default(),
	};
	if args.range.is_some() {
		settings.range = args.range;
	}
	if args.step.is_some() {
		settings.step = args.step;
	}
	settings.raster.canvas_width = args.width;
	settings.raster.canvas_height = args.height;
	settings.raster.output_dpi = args.dpi;
	Ok(settings)
}

pub fn run_render(args: &RenderArgs) -> Result<(), Error> {
	let settings = resolve_settings(args)?;

	let now = Instant::now();
	let slice_set: SliceSet = slicer::slice_file(&args.input, settings.range, settings.step)?;
	debug!(target: APPV, "sliced {} snapshot(s) in {:?}", slice_set.snapshots.len(), now.elapsed());

	std::fs::create_dir_all(&args.output).map_err(|e| Error::Io(args.output.display().to_string(), e))?;

	let layout_settings: LayoutSettings = settings.layout.clone().into_layout_settings();
	let raster_settings: RasterSettings = settings.raster.clone();
	let mut rng = StdRng::seed_from_u64(0xA11CE);
	let mut prev_positions = NodePositionIndex::new();

	for (index, mut snapshot) in slice_set.snapshots.into_iter().enumerate() {
		let standalone = index == 0;

		let now = Instant::now();
		prev_positions = layout::layout_snapshot(&mut snapshot, &prev_positions, &layout_settings, standalone, &mut rng);
		debug!(target: APPV, "snapshot {index} laid out in {:?}", now.elapsed());

		let now = Instant::now();
		let frame = raster::render_snapshot(&snapshot, &raster_settings);
		debug!(target: APPV, "snapshot {index} rasterized in {:?} ({} label(s) placed)", now.elapsed(), frame.labels.len());

		let frame_path = frame_path(&args.output, index);
		frame.layer.encode_png(&frame_path).map_err(crate::raster::Error::from)?;
		info!("wrote {}", frame_path.display());
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct SnapshotBoundary {
	index: usize,
	start: f64,
	end: f64,
	nodes: usize,
	edges: usize,
}

#[derive(serde::Serialize)]
struct InspectReport<'a> {
	time_format: crate::time::TimeFormat,
	attributes: &'a [slicer::AttributeDescriptor],
	snapshots: Vec<SnapshotBoundary>,
}

pub fn run_inspect(args: &crate::cli::InspectArgs) -> Result<(), Error> {
	let slice_set = slicer::slice_file(&args.input, args.range, args.step)?;
	let report = InspectReport {
		time_format: slice_set.time_format,
		attributes: &slice_set.attributes,
		snapshots: slice_set
			.snapshots
			.iter()
			.enumerate()
			.map(|(index, s)| SnapshotBoundary { index, start: s.start, end: s.end, nodes: s.nodes.len(), edges: s.edges.len() })
			.collect(),
	};
	println!("{}", serde_json::to_string_pretty(&report).expect("InspectReport always serializes"));
	Ok(())
}

fn frame_path(output_dir: &Path, index: usize) -> std::path::PathBuf {
	output_dir.join(format!("frame-{index:05}.png"))
}
