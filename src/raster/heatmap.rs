//! Additive heatmap field: each node contributes
//! `1 / (1 + (max(0, d - size*ratio) / spread_px)^2)`, summed per pixel and
//! normalized by node count (not by the field's own maximum). The running
//! maximum (`h_max`) is tracked separately so [`hillshade`](super::hillshade)
//! can normalize slope computations against the field's actual dynamic range.

use rayon::prelude::*;

#[derive(Debug, Clone, Copy)]
pub struct HeatmapSettings {
	/// Distance, in pixels, past `size*size_ratio` at which a node's
	/// contribution has fallen to half its peak.
	pub spread_px: f64,
	/// Node-size multiple inside which a pixel gets the node's full, unfalling
	/// contribution.
	pub size_ratio: f64,
}

impl Default for HeatmapSettings {
	fn default() -> Self {
		HeatmapSettings { spread_px: 30.0, size_ratio: 1.0 }
	}
}

#[derive(Debug, Clone)]
pub struct HeatmapField {
	pub width: u32,
	pub height: u32,
	pub values: Vec<f32>,
	pub h_max: f32,
}

impl HeatmapField {
	pub fn at(&self, x: u32, y: u32) -> f32 {
		self.values[(y as usize) * (self.width as usize) + (x as usize)]
	}
}

/// `sites` are `(x, y, size)` in pixel space.
pub fn compute(width: u32, height: u32, sites: &[(f64, f64, f64)], settings: &HeatmapSettings) -> HeatmapField {
	let n = sites.len().max(1) as f64;
	let spread = settings.spread_px.max(0.001);

	let rows: Vec<Vec<f32>> = (0..height)
		.into_par_iter()
		.map(|y| {
			let mut row = vec![0.0f32; width as usize];
			for x in 0..width {
				let (px, py) = (x as f64 + 0.5, y as f64 + 0.5);
				let mut acc = 0.0;
				for &(sx, sy, size) in sites {
					let d = ((px - sx).powi(2) + (py - sy).powi(2)).sqrt();
					let excess = (d - size * settings.size_ratio).max(0.0);
					acc += 1.0 / (1.0 + (excess / spread).powi(2));
				}
				row[x as usize] = (acc / n) as f32;
			}
			row
		})
		.collect();

	let mut values = Vec::with_capacity((width as usize) * (height as usize));
	let mut h_max = 0.0f32;
	for row in rows {
		h_max = h_max.max(row.iter().cloned().fold(0.0, f32::max));
		values.extend(row);
	}

	HeatmapField { width, height, values, h_max }
}
