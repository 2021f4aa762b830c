//! Resolved render settings: every tunable from sizing, ForceAtlas2, overlap
//! removal and the rasterizer, loaded from an optional TOML file and then
//! overridden by whatever the CLI specified.
//!
//! Mirrors the config-file loading shape the CLI layer used to hand-roll:
//! read the file, parse it as TOML, and on failure render a pretty
//! source-annotated diagnostic instead of a bare serde error.

use crate::layout::LayoutSettings;
use crate::raster::RasterSettings;
use annotate_snippets::{Level, Renderer, Snippet};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("I/O error: path '{0}': {1}")]
	Io(String, std::io::Error),
	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),
}

/// The full set of numeric knobs governing one render, independent of the
/// CLI surface. `Default` matches the values documented for each stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	pub range: Option<f64>,
	pub step: Option<f64>,
	pub layout: SerializableLayout,
	pub raster: RasterSettings,
}

impl Default for Settings {
	fn default() -> Self {
		Settings { range: None, step: None, layout: SerializableLayout::default(), raster: RasterSettings::default() }
	}
}

/// [`LayoutSettings`] is not itself `Serialize`/`Deserialize` (its fixed-size
/// pass/sweep arrays carry `&'static str` names); this mirrors the handful of
/// fields a config file is actually expected to override and folds them back
/// in over [`LayoutSettings::default`] at resolve time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializableLayout {
	pub size_min: f64,
	pub size_factor: f64,
	pub size_power: f64,
	pub lin_log: bool,
	pub strong_gravity: bool,
	pub gravity: f64,
	pub scaling: f64,
	pub overlap_enabled: bool,
}

impl Default for SerializableLayout {
	fn default() -> Self {
		let defaults = LayoutSettings::default();
		SerializableLayout {
			size_min: defaults.sizing.size_min,
			size_factor: defaults.sizing.size_factor,
			size_power: defaults.sizing.size_power,
			lin_log: defaults.fa2.lin_log,
			strong_gravity: defaults.fa2.strong_gravity,
			gravity: defaults.fa2.gravity,
			scaling: defaults.fa2.scaling,
			overlap_enabled: defaults.overlap_enabled,
		}
	}
}

impl SerializableLayout {
	pub fn into_layout_settings(self) -> LayoutSettings {
		let mut layout = LayoutSettings::default();
		layout.sizing.size_min = self.size_min;
		layout.sizing.size_factor = self.size_factor;
		layout.sizing.size_power = self.size_power;
		layout.fa2.lin_log = self.lin_log;
		layout.fa2.strong_gravity = self.strong_gravity;
		layout.fa2.gravity = self.gravity;
		layout.fa2.scaling = self.scaling;
		layout.overlap_enabled = self.overlap_enabled;
		layout
	}
}

impl Settings {
	pub fn load_from_file(path: &Path) -> Result<Self, Error> {
		let content = std::fs::read_to_string(path).map_err(|e| Error::Io(path.display().to_string(), e))?;
		toml::from_str(&content).map_err(|e| {
			error!("{}", annotate_toml_error(&e, &content, &path.display().to_string()));
			e.into()
		})
	}

	pub fn save_to_file(&self, path: &Path) -> Result<(), Error> {
		let toml_string = toml::to_string_pretty(self).expect("Settings always serializes to TOML");
		std::fs::write(path, toml_string).map_err(|e| Error::Io(path.display().to_string(), e))
	}
}

pub fn annotate_toml_error(err: &toml::de::Error, source: &str, filename: &str) -> String {
	if let Some(span) = err.span() {
		let snippet =
			Snippet::source(source).line_start(1).origin(filename).fold(true).annotation(Level::Error.span(span).label(err.message()));
		let title = format!("failed to parse {filename}");
		let message = Level::Error.title(&title).snippet(snippet);
		format!("{}", Renderer::styled().render(message))
	} else {
		err.to_string()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_settings_round_trip_through_toml() {
		let settings = Settings::default();
		let serialized = toml::to_string(&settings).unwrap();
		let parsed: Settings = toml::from_str(&serialized).unwrap();
		assert_eq!(parsed.layout.size_min, settings.layout.size_min);
	}

	#[test]
	fn malformed_toml_is_annotated_with_a_span() {
		let err = toml::from_str::<Settings>("range = not_a_number").unwrap_err();
		let annotated = annotate_toml_error(&err, "range = not_a_number", "settings.toml");
		assert!(annotated.contains("settings.toml"));
	}
}
