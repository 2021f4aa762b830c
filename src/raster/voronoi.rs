//! Per-pixel Voronoi ownership: which node is nearest to each pixel, and how
//! far away it is. Used both to tint regions by their owning node's color and
//! to attenuate edge opacity near a cell boundary.
//!
//! Rows are independent, so the scan is split across rayon's thread pool one
//! scanline at a time.

use rayon::prelude::*;

#[derive(Debug, Clone)]
pub struct VoronoiField {
	pub width: u32,
	pub height: u32,
	/// Index into the `sites` slice passed to [`compute`], or `u32::MAX` when
	/// there were no sites at all.
	pub owner: Vec<u32>,
	pub distance: Vec<f32>,
}

impl VoronoiField {
	pub fn owner_at(&self, x: u32, y: u32) -> Option<u32> {
		let v = self.owner[(y as usize) * (self.width as usize) + (x as usize)];
		(v != u32::MAX).then_some(v)
	}

	pub fn distance_at(&self, x: u32, y: u32) -> f32 {
		self.distance[(y as usize) * (self.width as usize) + (x as usize)]
	}
}

/// Computes the Voronoi field for `sites` (pixel-space `(x, y)`) over a
/// `width`x`height` canvas.
pub fn compute(width: u32, height: u32, sites: &[(f64, f64)]) -> VoronoiField {
	let mut owner = vec![u32::MAX; (width as usize) * (height as usize)];
	let mut distance = vec![f32::INFINITY; (width as usize) * (height as usize)];

	if sites.is_empty() {
		return VoronoiField { width, height, owner, distance };
	}

	let rows: Vec<(Vec<u32>, Vec<f32>)> = (0..height)
		.into_par_iter()
		.map(|y| {
			let mut row_owner = vec![u32::MAX; width as usize];
			let mut row_distance = vec![f32::INFINITY; width as usize];
			for x in 0..width {
				let (px, py) = (x as f64 + 0.5, y as f64 + 0.5);
				let mut best = (u32::MAX, f64::INFINITY);
				for (i, &(sx, sy)) in sites.iter().enumerate() {
					let d2 = (px - sx).powi(2) + (py - sy).powi(2);
					if d2 < best.1 {
						best = (i as u32, d2);
					}
				}
				row_owner[x as usize] = best.0;
				row_distance[x as usize] = (best.1.sqrt()) as f32;
			}
			(row_owner, row_distance)
		})
		.collect();

	for (y, (row_owner, row_distance)) in rows.into_iter().enumerate() {
		let start = y * width as usize;
		owner[start..start + width as usize].copy_from_slice(&row_owner);
		distance[start..start + width as usize].copy_from_slice(&row_distance);
	}

	VoronoiField { width, height, owner, distance }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn every_pixel_has_the_unique_site_as_owner() {
		let field = compute(4, 4, &[(2.0, 2.0)]);
		assert!(field.owner.iter().all(|&o| o == 0));
	}

	#[test]
	fn no_sites_leaves_every_pixel_unowned() {
		let field = compute(4, 4, &[]);
		assert!(field.owner.iter().all(|&o| o == u32::MAX));
	}

	#[test]
	fn closer_site_wins_ownership() {
		let field = compute(10, 1, &[(1.0, 0.5), (9.0, 0.5)]);
		assert_eq!(field.owner_at(0, 0), Some(0));
		assert_eq!(field.owner_at(9, 0), Some(1));
	}

	proptest::proptest! {
		/// Every owner is either unowned (no sites) or a valid index into the site list
		/// passed to `compute`, never an out-of-range index from a stale buffer.
		#[test]
		fn owner_is_always_a_valid_site_index_or_unowned(
			sites in proptest::collection::vec((0.0f64..20.0, 0.0f64..20.0), 0..10)
		) {
			let field = compute(20, 20, &sites);
			for &owner in &field.owner {
				proptest::prop_assert!(owner == u32::MAX || (owner as usize) < sites.len());
			}
		}
	}
}
