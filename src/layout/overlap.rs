//! Overlap removal: a post-pass that nudges nodes apart until no two discs
//! overlap by more than `margin`, run three times with decreasing margin and
//! increasing iteration budget so coarse overlaps clear first and only a
//! small residual jitter remains by the final sweep.
//!
//! Candidate pairs are found via a uniform grid keyed on `grid_size`, so a
//! sweep over a snapshot with widely spread nodes doesn't degrade to the full
//! O(n^2) pair count.

use super::seeding::{get_position, set_position};
use super::sizing::get_size;
use crate::slicer::Snapshot;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
pub struct Sweep {
	pub name: &'static str,
	pub max_iterations: u32,
	pub margin: f64,
	pub speed: f64,
	pub grid_size: f64,
	pub ratio: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("overlap removal sweep {0:?} did not converge within {1} iterations")]
	DidNotConverge(&'static str, u32),
}

fn cell_of(x: f64, y: f64, grid_size: f64) -> (i64, i64) {
	((x / grid_size).floor() as i64, (y / grid_size).floor() as i64)
}

/// Runs one sweep to fixpoint (no pair overlaps by more than `margin`) or
/// until `max_iterations` is exhausted, in which case it returns an error the
/// caller may choose to log and continue past rather than treat as fatal.
pub fn run_sweep(snapshot: &mut Snapshot, sweep: &Sweep) -> Result<(), Error> {
	let mut positions: Vec<(f64, f64)> = Vec::with_capacity(snapshot.nodes.len());
	let mut sizes: Vec<f64> = Vec::with_capacity(snapshot.nodes.len());
	for node in &snapshot.nodes {
		positions.push(get_position(node).unwrap_or((0.0, 0.0)));
		sizes.push(get_size(node).unwrap_or(1.0));
	}

	for _ in 0..sweep.max_iterations {
		let mut grid: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
		for (i, &(x, y)) in positions.iter().enumerate() {
			grid.entry(cell_of(x, y, sweep.grid_size)).or_default().push(i);
		}

		let mut moved = false;
		for i in 0..positions.len() {
			let (cx, cy) = cell_of(positions[i].0, positions[i].1, sweep.grid_size);
			for dx in -1..=1 {
				for dy in -1..=1 {
					let Some(bucket) = grid.get(&(cx + dx, cy + dy)) else { continue };
					for &j in bucket {
						if j <= i {
							continue;
						}
						let (xi, yi) = positions[i];
						let (xj, yj) = positions[j];
						let ddx = xj - xi;
						let ddy = yj - yi;
						let dist = (ddx * ddx + ddy * ddy).sqrt().max(0.001);
						let min_dist = (sizes[i] + sizes[j]) * sweep.ratio + sweep.margin;
						if dist < min_dist {
							let overlap = (min_dist - dist) * 0.5 * sweep.speed;
							let ux = ddx / dist;
							let uy = ddy / dist;
							positions[i].0 -= ux * overlap;
							positions[i].1 -= uy * overlap;
							positions[j].0 += ux * overlap;
							positions[j].1 += uy * overlap;
							moved = true;
						}
					}
				}
			}
		}

		if !moved {
			write_back(snapshot, &positions);
			return Ok(());
		}
	}

	write_back(snapshot, &positions);
	Err(Error::DidNotConverge(sweep.name, sweep.max_iterations))
}

fn write_back(snapshot: &mut Snapshot, positions: &[(f64, f64)]) {
	for (node, &(x, y)) in snapshot.nodes.iter_mut().zip(positions) {
		set_position(node, x, y);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::slicer::SnapshotNode;
	use std::collections::HashMap as Map;

	fn node(id: &str, x: f64, y: f64, size: f64) -> SnapshotNode {
		let mut n = SnapshotNode { id: id.to_string(), label: id.to_string(), attrs: Map::new() };
		set_position(&mut n, x, y);
		super::super::sizing::set_size(&mut n, size);
		n
	}

	#[test]
	fn overlapping_pair_is_separated_past_the_margin() {
		let mut snap =
			Snapshot { start: 0.0, end: 1.0, nodes: vec![node("a", 0.0, 0.0, 10.0), node("b", 1.0, 0.0, 10.0)], edges: vec![] };
		let sweep = Sweep { name: "test", max_iterations: 200, margin: 0.9, speed: 8.0, grid_size: 64.0, ratio: 1.05 };
		run_sweep(&mut snap, &sweep).unwrap();
		let (ax, ay) = get_position(&snap.nodes[0]).unwrap();
		let (bx, by) = get_position(&snap.nodes[1]).unwrap();
		let dist = ((bx - ax).powi(2) + (by - ay).powi(2)).sqrt();
		assert!(dist >= (10.0 + 10.0) * 1.05 + 0.9 - 1e-6);
	}

	#[test]
	fn already_separated_pair_does_not_move() {
		let mut snap =
			Snapshot { start: 0.0, end: 1.0, nodes: vec![node("a", 0.0, 0.0, 1.0), node("b", 1000.0, 0.0, 1.0)], edges: vec![] };
		let sweep = Sweep { name: "test", max_iterations: 120, margin: 0.9, speed: 8.0, grid_size: 64.0, ratio: 1.05 };
		run_sweep(&mut snap, &sweep).unwrap();
		assert_eq!(get_position(&snap.nodes[0]).unwrap(), (0.0, 0.0));
		assert_eq!(get_position(&snap.nodes[1]).unwrap(), (1000.0, 0.0));
	}

	proptest::proptest! {
		/// After a converged sweep, no pair of nodes is closer than `(size(i)+size(j))*ratio + margin`,
		/// regardless of the random starting cluster the generator hands us.
		#[test]
		fn converged_sweep_leaves_no_pair_overlapping(
			coords in proptest::collection::vec((-50.0f64..50.0, -50.0f64..50.0, 1.0f64..8.0), 2..20)
		) {
			let nodes: Vec<SnapshotNode> = coords.iter().enumerate().map(|(i, &(x, y, s))| node(&i.to_string(), x, y, s)).collect();
			let mut snap = Snapshot { start: 0.0, end: 1.0, nodes, edges: vec![] };
			let sweep = Sweep { name: "prop", max_iterations: 500, margin: 0.9, speed: 8.0, grid_size: 64.0, ratio: 1.05 };
			if run_sweep(&mut snap, &sweep).is_ok() {
				for i in 0..snap.nodes.len() {
					for j in (i + 1)..snap.nodes.len() {
						let (xi, yi) = get_position(&snap.nodes[i]).unwrap();
						let (xj, yj) = get_position(&snap.nodes[j]).unwrap();
						let dist = ((xj - xi).powi(2) + (yj - yi).powi(2)).sqrt();
						let si = super::super::sizing::get_size(&snap.nodes[i]).unwrap();
						let sj = super::super::sizing::get_size(&snap.nodes[j]).unwrap();
						let min_dist = (si + sj) * sweep.ratio + sweep.margin;
						proptest::prop_assert!(dist >= min_dist - 1e-6);
					}
				}
			}
		}
	}
}
