//! Final layer compositing: hillshade multiplies over a flat background,
//! then edges, then nodes are composited on top in Porter-Duff "over" order.
//! Label placement is carried alongside the pixel data rather than baked
//! into it — see `text.rs` for why glyph rasterization isn't done here.

use super::frame::{Layer, Pixel};
use super::labels::PlacedLabel;

#[derive(Debug, Clone, Copy)]
pub struct BackgroundSettings {
	pub color: (f32, f32, f32),
}

impl Default for BackgroundSettings {
	fn default() -> Self {
		BackgroundSettings { color: (0.97, 0.97, 0.95) }
	}
}

pub struct Frame {
	pub layer: Layer,
	pub labels: Vec<PlacedLabel>,
}

/// Composites `hillshade` (may be `None` if the pass was skipped), `edges`
/// and `nodes` over a flat `background`-colored canvas, in that order.
pub fn compose(width: u32, height: u32, background: &BackgroundSettings, hillshade: Option<&Layer>, edges: &Layer, nodes: &Layer, labels: Vec<PlacedLabel>) -> Frame {
	let mut canvas = Layer::new(width, height);
	let (r, g, b) = background.color;
	for p in &mut canvas.pixels {
		*p = Pixel::opaque(r, g, b);
	}

	if let Some(hillshade) = hillshade {
		canvas.multiply(hillshade);
	}

	canvas.blend_over(edges);
	canvas.blend_over(nodes);

	Frame { layer: canvas, labels }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn composing_with_no_overlays_leaves_the_flat_background() {
		let empty = Layer::new(4, 4);
		let frame = compose(4, 4, &BackgroundSettings::default(), None, &empty, &empty, Vec::new());
		let bg = BackgroundSettings::default().color;
		let p = frame.layer.get(0, 0);
		assert!((p.r - bg.0).abs() < 1e-6);
	}
}
