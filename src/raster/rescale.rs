//! Pre-render rescale: fits the layout's node positions into the output
//! canvas, optionally flipping/rotating and blending the layout's barycenter
//! (size-weighted centroid) with its geocenter (bounding-box center) before
//! choosing the scale factor.

#[derive(Debug, Clone, Copy)]
pub struct RescaleSettings {
	pub flip_y: bool,
	pub rotate_degrees: f64,
	/// 0.0 = center on the geocenter, 1.0 = center on the barycenter.
	pub barycenter_blend: f64,
	pub padding_fraction: f64,
	pub inscribed_circle: bool,
}

impl Default for RescaleSettings {
	fn default() -> Self {
		RescaleSettings { flip_y: true, rotate_degrees: 0.0, barycenter_blend: 0.3, padding_fraction: 0.08, inscribed_circle: false }
	}
}

/// An affine map from layout space to canvas pixel space.
#[derive(Debug, Clone, Copy)]
pub struct Transform {
	pub scale: f64,
	pub offset_x: f64,
	pub offset_y: f64,
	pub flip_y: bool,
	pub rotate_radians: f64,
}

impl Transform {
	pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
		let (sin, cos) = self.rotate_radians.sin_cos();
		let rx = x * cos - y * sin;
		let ry = x * sin + y * cos;
		let py = if self.flip_y { -ry } else { ry };
		(rx * self.scale + self.offset_x, py * self.scale + self.offset_y)
	}
}

/// Computes the [`Transform`] that fits `points` (with per-point radius, so a
/// node's disc stays fully inside the canvas) into a `canvas_w`x`canvas_h`
/// pixel canvas.
pub fn fit_to_canvas(points: &[(f64, f64, f64)], canvas_w: f64, canvas_h: f64, settings: &RescaleSettings) -> Transform {
	if points.is_empty() {
		return Transform { scale: 1.0, offset_x: canvas_w / 2.0, offset_y: canvas_h / 2.0, flip_y: settings.flip_y, rotate_radians: 0.0 };
	}

	let rotate_radians = settings.rotate_degrees.to_radians();
	let rotated: Vec<(f64, f64, f64)> = points
		.iter()
		.map(|&(x, y, r)| {
			let (sin, cos) = rotate_radians.sin_cos();
			(x * cos - y * sin, x * sin + y * cos, r)
		})
		.collect();

	let (mut min_x, mut min_y, mut max_x, mut max_y) = (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
	let (mut bary_x, mut bary_y, mut bary_w) = (0.0, 0.0, 0.0);
	for &(x, y, r) in &rotated {
		min_x = min_x.min(x - r);
		min_y = min_y.min(y - r);
		max_x = max_x.max(x + r);
		max_y = max_y.max(y + r);
		let w = r.max(0.01);
		bary_x += x * w;
		bary_y += y * w;
		bary_w += w;
	}

	let geo_x = (min_x + max_x) / 2.0;
	let geo_y = (min_y + max_y) / 2.0;
	let (bary_x, bary_y) = if bary_w > 0.0 { (bary_x / bary_w, bary_y / bary_w) } else { (geo_x, geo_y) };
	let t = settings.barycenter_blend;
	let center_x = geo_x * (1.0 - t) + bary_x * t;
	let center_y = geo_y * (1.0 - t) + bary_y * t;

	let span_x = (max_x - min_x).max(1.0);
	let span_y = (max_y - min_y).max(1.0);
	let padding = 1.0 + settings.padding_fraction * 2.0;

	let scale = if settings.inscribed_circle {
		(canvas_w.min(canvas_h) / padding) / span_x.max(span_y)
	} else {
		(canvas_w / padding / span_x).min(canvas_h / padding / span_y)
	};

	Transform {
		scale,
		offset_x: canvas_w / 2.0 - center_x * scale,
		offset_y: canvas_h / 2.0 + if settings.flip_y { center_y * scale } else { -center_y * scale },
		flip_y: settings.flip_y,
		rotate_radians,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn a_single_point_lands_at_canvas_center() {
		let t = fit_to_canvas(&[(5.0, 5.0, 1.0)], 100.0, 100.0, &RescaleSettings::default());
		let (x, y) = t.apply(5.0, 5.0);
		assert!((x - 50.0).abs() < 1e-6);
		assert!((y - 50.0).abs() < 1e-6);
	}

	#[test]
	fn two_points_fit_within_the_padded_canvas() {
		let points = [(-10.0, 0.0, 1.0), (10.0, 0.0, 1.0)];
		let t = fit_to_canvas(&points, 200.0, 200.0, &RescaleSettings::default());
		for &(x, y, _) in &points {
			let (px, py) = t.apply(x, y);
			assert!(px >= 0.0 && px <= 200.0);
			assert!(py >= 0.0 && py <= 200.0);
		}
	}
}
