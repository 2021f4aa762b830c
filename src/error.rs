//! Error handling for gexf-render.
//!
//! Defines the crate-level `Error` type, which aggregates every module's own
//! error type via `#[from]` so `main.rs` only has to match one enum.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("I/O error: path '{0}': {1}")]
	Io(String, io::Error),

	#[error("slicer error: {0}")]
	Slicer(#[from] crate::slicer::Error),

	#[error("graph error: {0}")]
	Graph(#[from] crate::graph::Error),

	#[error("rasterizer error: {0}")]
	Raster(#[from] crate::raster::Error),

	#[error("settings error: {0}")]
	Settings(#[from] crate::settings::Error),

	#[error("time error: {0}")]
	Time(#[from] crate::time::Error),
}
