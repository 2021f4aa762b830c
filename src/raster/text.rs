//! The text-measurement boundary. Actual glyph shaping and rasterization is
//! out of scope; this trait is the seam where a real font backend would plug
//! in, and [`MonospaceEstimate`] is the stand-in used until one is wired up.

/// Measures how much horizontal space a label would take at a given point
/// size, without actually shaping or rasterizing glyphs.
pub trait TextMeasure {
	fn advance_width(&self, text: &str, size_pt: f64) -> f64;
}

/// A crude fixed-advance estimate: width is proportional to character count.
/// Adequate for collision-bitmap placement, which only needs a bounding box.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonospaceEstimate {
	pub advance_fraction_of_em: f64,
}

impl MonospaceEstimate {
	pub fn new() -> Self {
		MonospaceEstimate { advance_fraction_of_em: 0.6 }
	}
}

impl TextMeasure for MonospaceEstimate {
	fn advance_width(&self, text: &str, size_pt: f64) -> f64 {
		text.chars().count() as f64 * size_pt * self.advance_fraction_of_em
	}
}
