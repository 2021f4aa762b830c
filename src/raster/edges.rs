//! Edge rendering: polylines (straight or gently curved) between node
//! centers, with opacity attenuated where the edge crosses deep into a third
//! node's Voronoi cell, and a 5-tap box-blur smoothing pass so thin strokes
//! don't alias at the rendering DPI.

use super::frame::{Layer, Pixel};
use super::voronoi::VoronoiField;
use std::f64::consts::PI;

/// One polyline to draw, tagged with the Voronoi site indices of its two
/// endpoints so attenuation can tell "inside an endpoint's own cell" (full
/// opacity) apart from "crossing a third party's cell" (falls off with
/// distance from that cell's owner).
#[derive(Debug, Clone, Copy)]
pub struct EdgeSegment {
	pub p0: (f64, f64),
	pub p1: (f64, f64),
	pub source_vid: u32,
	pub target_vid: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct EdgeSettings {
	pub curved: bool,
	/// Perpendicular offset of the curve's control point, as a fraction of
	/// edge length.
	pub curvature: f64,
	pub width_px: f64,
	pub color: (f32, f32, f32),
	pub base_opacity: f32,
	pub voronoi_attenuation: bool,
}

impl Default for EdgeSettings {
	fn default() -> Self {
		EdgeSettings { curved: true, curvature: 0.08, width_px: 1.2, color: (0.55, 0.55, 0.6), base_opacity: 0.65, voronoi_attenuation: true }
	}
}

fn quadratic_point(p0: (f64, f64), control: (f64, f64), p1: (f64, f64), t: f64) -> (f64, f64) {
	let u = 1.0 - t;
	(u * u * p0.0 + 2.0 * u * t * control.0 + t * t * p1.0, u * u * p0.1 + 2.0 * u * t * control.1 + t * t * p1.1)
}

fn stamp(alpha: &mut [f32], width: u32, height: u32, x: f64, y: f64, radius: f64, strength: f32) {
	let x0 = ((x - radius).floor().max(0.0)) as i64;
	let x1 = ((x + radius).ceil().min(width as f64 - 1.0)) as i64;
	let y0 = ((y - radius).floor().max(0.0)) as i64;
	let y1 = ((y + radius).ceil().min(height as f64 - 1.0)) as i64;
	for py in y0..=y1 {
		for px in x0..=x1 {
			let d = ((px as f64 + 0.5 - x).powi(2) + (py as f64 + 0.5 - y).powi(2)).sqrt();
			if d <= radius {
				let falloff = (1.0 - (d / radius)) as f32;
				let idx = (py as usize) * (width as usize) + (px as usize);
				alpha[idx] = alpha[idx].max(strength * falloff);
			}
		}
	}
}

/// Separable 5-tap box blur, applied to soften the stamped alpha mask.
fn smooth_5tap(alpha: &[f32], width: u32, height: u32) -> Vec<f32> {
	let w = width as i64;
	let h = height as i64;
	let sample = |buf: &[f32], x: i64, y: i64| -> f32 {
		if x < 0 || y < 0 || x >= w || y >= h { 0.0 } else { buf[(y as usize) * (width as usize) + (x as usize)] }
	};

	let mut horizontal = vec![0.0f32; alpha.len()];
	for y in 0..h {
		for x in 0..w {
			let sum: f32 = (-2..=2).map(|dx| sample(alpha, x + dx, y)).sum();
			horizontal[(y as usize) * (width as usize) + (x as usize)] = sum / 5.0;
		}
	}
	let mut out = vec![0.0f32; alpha.len()];
	for y in 0..h {
		for x in 0..w {
			let sum: f32 = (-2..=2).map(|dy| sample(&horizontal, x, y + dy)).sum();
			out[(y as usize) * (width as usize) + (x as usize)] = sum / 5.0;
		}
	}
	out
}

pub fn render(
	width: u32,
	height: u32,
	edges: &[EdgeSegment],
	voronoi: Option<&VoronoiField>,
	settings: &EdgeSettings,
) -> Layer {
	let mut alpha = vec![0.0f32; (width as usize) * (height as usize)];

	for seg in edges {
		let (p0, p1) = (seg.p0, seg.p1);
		let dx = p1.0 - p0.0;
		let dy = p1.1 - p0.1;
		let len = (dx * dx + dy * dy).sqrt().max(0.001);
		let control = if settings.curved {
			let mid = ((p0.0 + p1.0) / 2.0, (p0.1 + p1.1) / 2.0);
			let perp = (-dy / len, dx / len);
			(mid.0 + perp.0 * len * settings.curvature, mid.1 + perp.1 * len * settings.curvature)
		} else {
			((p0.0 + p1.0) / 2.0, (p0.1 + p1.1) / 2.0)
		};

		let steps = (len / 2.0).clamp(4.0, 256.0) as usize;
		for i in 0..=steps {
			let t = i as f64 / steps as f64;
			let (x, y) = quadratic_point(p0, control, p1, t);
			let attenuation = match (settings.voronoi_attenuation, voronoi) {
				(true, Some(field)) if x >= 0.0 && y >= 0.0 && (x as u32) < width && (y as u32) < height => {
					match field.owner_at(x as u32, y as u32) {
						// Inside one of the edge's own endpoint cells: full opacity.
						Some(owner) if owner == seg.source_vid || owner == seg.target_vid => 1.0,
						// A third party's cell: fall off with distance from that cell's owner.
						Some(_) => {
							let d_prime = (field.distance_at(x as u32, y as u32) as f64).min(255.0);
							(0.5 + 0.5 * (PI - (d_prime / 255.0).powi(2) * PI).cos()).clamp(0.0, 1.0) as f32
						},
						None => 1.0,
					}
				},
				_ => 1.0,
			};
			stamp(&mut alpha, width, height, x, y, settings.width_px, settings.base_opacity * attenuation);
		}
	}

	let smoothed = smooth_5tap(&alpha, width, height);
	let mut layer = Layer::new(width, height);
	for (i, &a) in smoothed.iter().enumerate() {
		if a > 0.0 {
			let (r, g, b) = settings.color;
			layer.pixels[i] = Pixel::with_alpha(r, g, b, a.clamp(0.0, 1.0));
		}
	}
	layer
}

#[cfg(test)]
mod tests {
	use super::*;

	fn seg(p0: (f64, f64), p1: (f64, f64), source_vid: u32, target_vid: u32) -> EdgeSegment {
		EdgeSegment { p0, p1, source_vid, target_vid }
	}

	#[test]
	fn a_single_edge_paints_pixels_along_its_path() {
		let layer = render(50, 50, &[seg((5.0, 25.0), (45.0, 25.0), 0, 1)], None, &EdgeSettings::default());
		assert!(layer.pixels.iter().any(|p| p.a > 0.0));
	}

	#[test]
	fn no_edges_yields_a_transparent_layer() {
		let layer = render(10, 10, &[], None, &EdgeSettings::default());
		assert!(layer.pixels.iter().all(|p| p.a == 0.0));
	}

	#[test]
	fn an_edge_between_two_isolated_nodes_keeps_full_opacity_along_its_whole_path() {
		// With only two sites, every pixel's Voronoi owner is one of the edge's
		// own endpoints, so attenuation must never engage even at the midpoint.
		let voronoi = super::super::voronoi::compute(50, 50, &[(10.0, 25.0), (40.0, 25.0)]);
		let settings = EdgeSettings { curved: false, ..EdgeSettings::default() };
		let layer = render(50, 50, &[seg((10.0, 25.0), (40.0, 25.0), 0, 1)], Some(&voronoi), &settings);
		let midpoint = layer.get(25, 25);
		assert!(midpoint.a >= settings.base_opacity - 1e-3);
	}

	#[test]
	fn an_edge_crossing_a_third_partys_cell_is_attenuated() {
		let voronoi = super::super::voronoi::compute(50, 50, &[(5.0, 25.0), (45.0, 25.0), (25.0, 25.0)]);
		let settings = EdgeSettings { curved: false, ..EdgeSettings::default() };
		let layer = render(50, 50, &[seg((5.0, 25.0), (45.0, 25.0), 0, 1)], Some(&voronoi), &settings);
		let midpoint = layer.get(25, 25);
		assert!(midpoint.a < settings.base_opacity - 1e-3);
	}
}
