//! Node rendering: filled, stroked discs. Larger nodes are drawn first so
//! smaller, more specific nodes always sit on top of whatever larger node
//! they happen to overlap.

use super::frame::{Layer, Pixel};

#[derive(Debug, Clone, Copy)]
pub struct NodeDrawSettings {
	pub fill: (f32, f32, f32),
	pub stroke: (f32, f32, f32),
	pub stroke_width_px: f64,
}

impl Default for NodeDrawSettings {
	fn default() -> Self {
		NodeDrawSettings { fill: (0.35, 0.55, 0.85), stroke: (0.1, 0.15, 0.25), stroke_width_px: 1.0 }
	}
}

/// `discs` are `(x, y, radius_px, fill_color)` in pixel space.
pub fn render(width: u32, height: u32, discs: &[(f64, f64, f64, (f32, f32, f32))], settings: &NodeDrawSettings) -> Layer {
	let mut layer = Layer::new(width, height);
	// Largest first; same-size discs break ties on x for a deterministic draw order.
	let mut ordered: Vec<usize> = (0..discs.len()).collect();
	ordered.sort_by(|&a, &b| {
		discs[b]
			.2
			.partial_cmp(&discs[a].2)
			.unwrap_or(std::cmp::Ordering::Equal)
			.then_with(|| discs[a].0.partial_cmp(&discs[b].0).unwrap_or(std::cmp::Ordering::Equal))
	});

	for &i in &ordered {
		let (cx, cy, radius, fill) = discs[i];
		let outer = radius + settings.stroke_width_px;
		let x0 = ((cx - outer).floor().max(0.0)) as i64;
		let x1 = ((cx + outer).ceil().min(width as f64 - 1.0)) as i64;
		let y0 = ((cy - outer).floor().max(0.0)) as i64;
		let y1 = ((cy + outer).ceil().min(height as f64 - 1.0)) as i64;

		for py in y0..=y1 {
			for px in x0..=x1 {
				let d = ((px as f64 + 0.5 - cx).powi(2) + (py as f64 + 0.5 - cy).powi(2)).sqrt();
				if d > outer {
					continue;
				}
				let aa = (outer - d).clamp(0.0, 1.0) as f32;
				let pixel = if d <= radius {
					Pixel::with_alpha(fill.0, fill.1, fill.2, aa.max(if d <= radius - 1.0 { 1.0 } else { aa }))
				} else {
					Pixel::with_alpha(settings.stroke.0, settings.stroke.1, settings.stroke.2, aa)
				};
				let idx = (py as usize) * (width as usize) + (px as usize);
				layer.pixels[idx] = pixel.over(layer.pixels[idx]);
			}
		}
	}

	layer
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn larger_disc_is_drawn_beneath_a_smaller_overlapping_one() {
		let discs = [(10.0, 10.0, 8.0, (1.0, 0.0, 0.0)), (12.0, 10.0, 2.0, (0.0, 1.0, 0.0))];
		let layer = render(24, 24, &discs, &NodeDrawSettings::default());
		let center = layer.get(12, 10);
		assert!(center.g > 0.0);
	}

	#[test]
	fn no_discs_yields_a_transparent_layer() {
		let layer = render(10, 10, &[], &NodeDrawSettings::default());
		assert!(layer.pixels.iter().all(|p| p.a == 0.0));
	}
}
