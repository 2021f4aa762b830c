//! Per-snapshot layout: node sizing, position seeding from the previous
//! snapshot, three ForceAtlas2 passes, and a three-sweep overlap removal
//! post-pass.
//!
//! A pass or sweep that fails (non-finite positions, non-convergence) is
//! logged and skipped rather than aborting the whole render: the snapshot
//! keeps whatever positions the last successful stage produced, per the
//! pipeline's "log and continue" recovery policy.

pub mod barnes_hut;
pub mod forceatlas2;
pub mod overlap;
pub mod seeding;
pub mod sizing;

use crate::slicer::Snapshot;
use rand::Rng;
use std::collections::HashMap;

/// Node id -> (x, y), carried from one snapshot to the next to seed layout
/// continuity.
pub type NodePositionIndex = HashMap<String, (f64, f64)>;

#[derive(Debug, Clone)]
pub struct LayoutSettings {
	pub sizing: sizing::SizingSettings,
	pub fa2: forceatlas2::Fa2Settings,
	/// The 3 ForceAtlas2 passes run after random-init seeding: rough, precision, slow refine.
	pub passes: [forceatlas2::Pass; 3],
	pub overlap_enabled: bool,
	pub overlap_sweeps: [overlap::Sweep; 3],
}

impl Default for LayoutSettings {
	fn default() -> Self {
		LayoutSettings::with_iterations_factor(1.0)
	}
}

impl LayoutSettings {
	/// Builds the 3-pass schedule with every iteration count scaled by `f`
	/// (the `iterationsfactor` tunable), keeping the table's slowDown/θ/
	/// barnesHut values fixed: rough (barnesHut on, θ=1.2), precision
	/// (barnesHut on, θ=0.3), slow refine (barnesHut off, θ=0.3).
	pub fn with_iterations_factor(f: f64) -> Self {
		LayoutSettings {
			sizing: sizing::SizingSettings::default(),
			fa2: forceatlas2::Fa2Settings::default(),
			passes: [
				forceatlas2::Pass { name: "rough", iterations: (100.0 * f) as u32, barnes_hut: true, theta: 1.2, slow_down: 5.0 },
				forceatlas2::Pass { name: "precision", iterations: (10.0 * f) as u32, barnes_hut: true, theta: 0.3, slow_down: 20.0 },
				forceatlas2::Pass { name: "slow refine", iterations: (2.0 * f) as u32, barnes_hut: false, theta: 0.3, slow_down: 20.0 },
			],
			overlap_enabled: true,
			overlap_sweeps: [
				overlap::Sweep { name: "coarse", max_iterations: 120, margin: 0.9, speed: 8.0, grid_size: 64.0, ratio: 1.05 },
				overlap::Sweep { name: "medium", max_iterations: 80, margin: 0.6, speed: 4.0, grid_size: 64.0, ratio: 1.05 },
				overlap::Sweep { name: "fine", max_iterations: 40, margin: 0.3, speed: 1.0, grid_size: 64.0, ratio: 1.05 },
			],
		}
	}
}

/// Runs sizing, seeding, ForceAtlas2 and overlap removal over one snapshot in
/// place, returning the position index for the next snapshot to seed from.
pub fn layout_snapshot(
	snapshot: &mut Snapshot,
	prev: &NodePositionIndex,
	settings: &LayoutSettings,
	standalone: bool,
	rng: &mut impl Rng,
) -> NodePositionIndex {
	sizing::apply_node_sizes(snapshot, &settings.sizing);
	seeding::seed_positions(snapshot, prev, standalone, rng);

	for pass in &settings.passes {
		if let Err(err) = forceatlas2::run_pass(snapshot, &settings.fa2, pass) {
			tracing::warn!(
				target: crate::logging::APPV,
				pass = pass.name,
				error = %err,
				"forceatlas2 pass failed; keeping pre-pass positions"
			);
		}
	}

	if settings.overlap_enabled {
		for sweep in &settings.overlap_sweeps {
			if let Err(err) = overlap::run_sweep(snapshot, sweep) {
				tracing::warn!(
					target: crate::logging::APPV,
					sweep = sweep.name,
					error = %err,
					"overlap removal sweep did not converge; continuing with partial separation"
				);
			}
		}
	}

	snapshot.nodes.iter().filter_map(|n| seeding::get_position(n).map(|pos| (n.id.clone(), pos))).collect()
}
