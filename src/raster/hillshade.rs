//! Hillshading: treats the [`HeatmapField`](super::heatmap::HeatmapField) as
//! an elevation model, computes per-pixel slope and aspect by central
//! differences, and shades each pixel by a Lambertian reflectance model
//! against a fixed light direction. The result is tinted by a hypsometric
//! (elevation-to-color) gradient before being handed to compositing.

use super::frame::{Layer, Pixel};
use super::heatmap::HeatmapField;

#[derive(Debug, Clone, Copy)]
pub struct HillshadeSettings {
	/// Azimuth of the light source, degrees clockwise from north.
	pub azimuth_degrees: f64,
	/// Altitude of the light source above the horizon, degrees.
	pub altitude_degrees: f64,
	pub vertical_exaggeration: f64,
	pub opacity: f32,
}

impl Default for HillshadeSettings {
	fn default() -> Self {
		HillshadeSettings { azimuth_degrees: 315.0, altitude_degrees: 45.0, vertical_exaggeration: 2.0, opacity: 0.6 }
	}
}

/// Low (valley) to high (peak) hypsometric tint, sampled by normalized
/// elevation `t` in `[0, 1]`.
fn hypsometric_tint(t: f32) -> (f32, f32, f32) {
	let stops: [(f32, (f32, f32, f32)); 4] =
		[(0.0, (0.10, 0.10, 0.18)), (0.33, (0.12, 0.22, 0.35)), (0.66, (0.25, 0.45, 0.35)), (1.0, (0.95, 0.85, 0.55))];
	for pair in stops.windows(2) {
		let (t0, c0) = pair[0];
		let (t1, c1) = pair[1];
		if t <= t1 || t1 == 1.0 {
			let local = if t1 > t0 { ((t - t0) / (t1 - t0)).clamp(0.0, 1.0) } else { 0.0 };
			return (c0.0 + (c1.0 - c0.0) * local, c0.1 + (c1.1 - c0.1) * local, c0.2 + (c1.2 - c0.2) * local);
		}
	}
	stops[3].1
}

pub fn render(field: &HeatmapField, settings: &HillshadeSettings) -> Layer {
	let mut layer = Layer::new(field.width, field.height);
	if field.h_max <= 0.0 {
		return layer;
	}

	let azimuth = settings.azimuth_degrees.to_radians();
	let altitude = settings.altitude_degrees.to_radians();
	let light = (azimuth.sin() * altitude.cos(), -azimuth.cos() * altitude.cos(), altitude.sin());

	for y in 0..field.height {
		for x in 0..field.width {
			let xm1 = x.saturating_sub(1);
			let xp1 = (x + 1).min(field.width - 1);
			let ym1 = y.saturating_sub(1);
			let yp1 = (y + 1).min(field.height - 1);

			let dzdx = (field.at(xp1, y) - field.at(xm1, y)) as f64 * settings.vertical_exaggeration;
			let dzdy = (field.at(x, yp1) - field.at(x, ym1)) as f64 * settings.vertical_exaggeration;
			let normal_len = (dzdx * dzdx + dzdy * dzdy + 1.0).sqrt();
			let normal = (-dzdx / normal_len, -dzdy / normal_len, 1.0 / normal_len);

			let reflectance = (normal.0 * light.0 + normal.1 * light.1 + normal.2 * light.2).max(0.0);
			let elevation_t = (field.at(x, y) / field.h_max).clamp(0.0, 1.0);
			let (tr, tg, tb) = hypsometric_tint(elevation_t);
			let shade = 0.3 + 0.7 * reflectance as f32;

			layer.set(x, y, Pixel::with_alpha(tr * shade, tg * shade, tb * shade, settings.opacity));
		}
	}

	layer
}
