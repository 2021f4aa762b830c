//! Label sizing and placement: each node's label gets a font size linearly
//! interpolated from its disc size, a font weight quantized to the nearest
//! standard CSS-style weight step, and a placement decided by greedy
//! collision-bitmap scanning — largest labels place first, and a label that
//! would collide with an already-placed one is dropped rather than displaced.

use super::text::TextMeasure;

#[derive(Debug, Clone, Copy)]
pub struct LabelSettings {
	pub min_font_pt: f64,
	pub max_font_pt: f64,
	pub min_node_size: f64,
	pub max_node_size: f64,
	pub color: (f32, f32, f32),
	/// Bitmap cell size in pixels; coarser cells mean faster, looser collision checks.
	pub bitmap_cell_px: f64,
	/// Stop placing once this many labels have been kept, even if more
	/// non-colliding candidates remain.
	pub label_count: usize,
}

impl Default for LabelSettings {
	fn default() -> Self {
		LabelSettings {
			min_font_pt: 6.0,
			max_font_pt: 24.0,
			min_node_size: 3.0,
			max_node_size: 40.0,
			color: (0.1, 0.1, 0.12),
			bitmap_cell_px: 4.0,
			label_count: 200,
		}
	}
}

/// Standard CSS weight -> target stroke thickness (arbitrary units, increasing
/// with weight); a font size quantizes to whichever step its proportional
/// thickness sits closest to.
pub const WEIGHT_STEPS: [(u16, f64); 9] = [
	(100, 2.0),
	(200, 3.5),
	(300, 5.0),
	(400, 7.0),
	(500, 9.5),
	(600, 12.0),
	(700, 15.0),
	(800, 18.0),
	(900, 21.0),
];

pub fn font_size_for(node_size: f64, settings: &LabelSettings) -> f64 {
	let span = (settings.max_node_size - settings.min_node_size).max(0.001);
	let t = ((node_size - settings.min_node_size) / span).clamp(0.0, 1.0);
	settings.min_font_pt + t * (settings.max_font_pt - settings.min_font_pt)
}

/// Quantizes a font size to the nearest entry in [`WEIGHT_STEPS`], treating the
/// font size itself as a proxy for the target pen thickness (a real backend
/// would derive thickness from glyph metrics instead).
pub fn weight_for(font_size_pt: f64, settings: &LabelSettings) -> u16 {
	let span = (settings.max_font_pt - settings.min_font_pt).max(0.001);
	let thickness = (font_size_pt - settings.min_font_pt) / span * WEIGHT_STEPS.last().unwrap().1;
	WEIGHT_STEPS
		.iter()
		.min_by(|a, b| (a.1 - thickness).abs().partial_cmp(&(b.1 - thickness).abs()).unwrap())
		.map(|&(weight, _)| weight)
		.unwrap_or(400)
}

#[derive(Debug, Clone)]
pub struct LabelCandidate {
	pub text: String,
	pub anchor_x: f64,
	pub anchor_y: f64,
	pub font_size_pt: f64,
}

#[derive(Debug, Clone)]
pub struct PlacedLabel {
	pub text: String,
	pub x: f64,
	pub y: f64,
	pub font_size_pt: f64,
	pub weight: u16,
}

/// Greedily places labels biggest-first, rejecting any whose bounding box
/// would collide with an already-occupied bitmap cell.
pub fn place_labels(
	width: u32,
	height: u32,
	candidates: &[LabelCandidate],
	measure: &dyn TextMeasure,
	settings: &LabelSettings,
) -> Vec<PlacedLabel> {
	let cell = settings.bitmap_cell_px.max(1.0);
	let grid_w = ((width as f64) / cell).ceil() as usize + 1;
	let grid_h = ((height as f64) / cell).ceil() as usize + 1;
	let mut occupied = vec![false; grid_w * grid_h];

	// Largest font first; same-size candidates break ties on anchor x so the
	// placement order (and therefore the placed set) doesn't depend on the
	// candidate list's input order.
	let mut order: Vec<usize> = (0..candidates.len()).collect();
	order.sort_by(|&a, &b| {
		candidates[b]
			.font_size_pt
			.partial_cmp(&candidates[a].font_size_pt)
			.unwrap_or(std::cmp::Ordering::Equal)
			.then_with(|| candidates[a].anchor_x.partial_cmp(&candidates[b].anchor_x).unwrap_or(std::cmp::Ordering::Equal))
	});

	let mut placed = Vec::new();
	for &i in &order {
		if placed.len() >= settings.label_count {
			break;
		}
		let c = &candidates[i];
		let w = measure.advance_width(&c.text, c.font_size_pt);
		let h = c.font_size_pt * 1.2;
		let x0 = c.anchor_x - w / 2.0;
		let y0 = c.anchor_y - h;

		let gx0 = ((x0 / cell).floor().max(0.0)) as usize;
		let gx1 = (((x0 + w) / cell).ceil().max(0.0) as usize).min(grid_w - 1);
		let gy0 = ((y0 / cell).floor().max(0.0)) as usize;
		let gy1 = (((y0 + h) / cell).ceil().max(0.0) as usize).min(grid_h - 1);

		let mut collides = false;
		'scan: for gy in gy0..=gy1 {
			for gx in gx0..=gx1 {
				if occupied[gy * grid_w + gx] {
					collides = true;
					break 'scan;
				}
			}
		}
		if collides {
			continue;
		}

		for gy in gy0..=gy1 {
			for gx in gx0..=gx1 {
				occupied[gy * grid_w + gx] = true;
			}
		}

		placed.push(PlacedLabel {
			text: c.text.clone(),
			x: c.anchor_x,
			y: c.anchor_y,
			font_size_pt: c.font_size_pt,
			weight: weight_for(c.font_size_pt, settings),
		});
	}

	placed
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::raster::text::MonospaceEstimate;

	#[test]
	fn larger_node_gets_a_larger_font_size() {
		let settings = LabelSettings::default();
		assert!(font_size_for(40.0, &settings) > font_size_for(3.0, &settings));
	}

	#[test]
	fn smallest_and_largest_font_sizes_quantize_to_the_extreme_weights() {
		let settings = LabelSettings::default();
		assert_eq!(weight_for(settings.min_font_pt, &settings), 100);
		assert_eq!(weight_for(settings.max_font_pt, &settings), 900);
	}

	#[test]
	fn overlapping_labels_drop_the_smaller_one() {
		let candidates = vec![
			LabelCandidate { text: "alpha".into(), anchor_x: 50.0, anchor_y: 50.0, font_size_pt: 20.0 },
			LabelCandidate { text: "beta".into(), anchor_x: 52.0, anchor_y: 50.0, font_size_pt: 10.0 },
		];
		let placed = place_labels(200, 200, &candidates, &MonospaceEstimate::new(), &LabelSettings::default());
		assert_eq!(placed.len(), 1);
		assert_eq!(placed[0].text, "alpha");
	}

	#[test]
	fn far_apart_labels_are_both_placed() {
		let candidates = vec![
			LabelCandidate { text: "alpha".into(), anchor_x: 10.0, anchor_y: 10.0, font_size_pt: 10.0 },
			LabelCandidate { text: "beta".into(), anchor_x: 190.0, anchor_y: 190.0, font_size_pt: 10.0 },
		];
		let placed = place_labels(200, 200, &candidates, &MonospaceEstimate::new(), &LabelSettings::default());
		assert_eq!(placed.len(), 2);
	}

	#[test]
	fn placement_stops_once_label_count_is_reached() {
		let candidates: Vec<LabelCandidate> = (0..5)
			.map(|i| LabelCandidate { text: format!("n{i}"), anchor_x: i as f64 * 40.0, anchor_y: 10.0, font_size_pt: 8.0 })
			.collect();
		let settings = LabelSettings { label_count: 2, ..LabelSettings::default() };
		let placed = place_labels(200, 200, &candidates, &MonospaceEstimate::new(), &settings);
		assert_eq!(placed.len(), 2);
	}

	proptest::proptest! {
		/// Reordering same-size, same-position candidates must not change which
		/// text ends up in the placed set: the tie-break is anchor x, never
		/// input order.
		#[test]
		fn same_size_candidates_place_the_same_set_regardless_of_input_order(
			xs in proptest::collection::vec(0.0f64..190.0, 2..8),
		) {
			let candidates: Vec<LabelCandidate> = xs
				.iter()
				.enumerate()
				.map(|(i, &x)| LabelCandidate { text: format!("n{i}"), anchor_x: x, anchor_y: 50.0, font_size_pt: 12.0 })
				.collect();
			let mut shuffled = candidates.clone();
			shuffled.reverse();

			let measure = MonospaceEstimate::new();
			let settings = LabelSettings::default();
			let mut a: Vec<String> = place_labels(200, 200, &candidates, &measure, &settings).into_iter().map(|p| p.text).collect();
			let mut b: Vec<String> = place_labels(200, 200, &shuffled, &measure, &settings).into_iter().map(|p| p.text).collect();
			a.sort();
			b.sort();
			proptest::prop_assert_eq!(a, b);
		}
	}
}
