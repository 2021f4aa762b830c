//! Time value normalization.
//!
//! The input document declares one of four time formats (`date`, `dateTime`,
//! `integer`, `double`) and one of two time representations (`interval`,
//! `timestamp`). Every concrete time value is normalized here to a single
//! `f64` scalar — milliseconds since the Unix epoch for the date-like
//! formats, the raw number otherwise — so the rest of the pipeline never has
//! to branch on the declared format again.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unsupported timeformat {0:?}, expected one of date, dateTime, integer, double, \"\"")]
	UnsupportedTimeFormat(String),
	#[error(
		"unsupported timerepresentation {0:?}, expected one of interval, timestamp, \"\""
	)]
	UnsupportedTimeRepresentation(String),
	#[error("value {0:?} could not be parsed as {1:?}")]
	BadValue(String, TimeFormat),
}

/// Declared scalar shape of every time value in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeFormat {
	Date,
	DateTime,
	Integer,
	Double,
}

impl TimeFormat {
	/// Parses the `timeformat` graph attribute, treating `""` as `integer`.
	pub fn parse(raw: &str) -> Result<Self, Error> {
		match raw {
			"date" => Ok(TimeFormat::Date),
			"dateTime" => Ok(TimeFormat::DateTime),
			"integer" => Ok(TimeFormat::Integer),
			"double" => Ok(TimeFormat::Double),
			"" => Ok(TimeFormat::Integer),
			other => Err(Error::UnsupportedTimeFormat(other.to_string())),
		}
	}

	pub fn is_date_like(&self) -> bool {
		matches!(self, TimeFormat::Date | TimeFormat::DateTime)
	}

	/// Normalizes a raw attribute value to the internal scalar.
	pub fn normalize(&self, raw: &str) -> Result<f64, Error> {
		match self {
			TimeFormat::Integer | TimeFormat::Double => {
				raw.parse::<f64>().map_err(|_| Error::BadValue(raw.to_string(), *self))
			},
			TimeFormat::Date => {
				let d = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
					.map_err(|_| Error::BadValue(raw.to_string(), *self))?;
				let dt = d.and_hms_opt(0, 0, 0).expect("midnight is always valid");
				Ok(dt.and_utc().timestamp_millis() as f64)
			},
			TimeFormat::DateTime => {
				let dt = parse_iso8601(raw).ok_or_else(|| Error::BadValue(raw.to_string(), *self))?;
				Ok(dt.and_utc().timestamp_millis() as f64)
			},
		}
	}

	/// Formats a normalized scalar back for human-facing reporting.
	pub fn format(&self, value: f64) -> String {
		match self {
			TimeFormat::Integer => format!("{}", value as i64),
			TimeFormat::Double => format!("{value}"),
			TimeFormat::Date => chrono::DateTime::from_timestamp_millis(value as i64)
				.map(|dt| dt.format("%Y-%m-%d").to_string())
				.unwrap_or_else(|| value.to_string()),
			TimeFormat::DateTime => chrono::DateTime::from_timestamp_millis(value as i64)
				.map(|dt| dt.format("%Y-%m-%dT%H:%M:%S%.3f").to_string())
				.unwrap_or_else(|| value.to_string()),
		}
	}
}

fn parse_iso8601(raw: &str) -> Option<NaiveDateTime> {
	if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
		return Some(dt.naive_utc());
	}
	for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
		if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
			return Some(dt);
		}
	}
	None
}

/// Whether an element's activity is expressed as intervals (with optional
/// sub-spell intervals) or single timestamps (with optional sub-spell
/// timestamps).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRepresentation {
	Interval,
	Timestamp,
}

impl TimeRepresentation {
	/// Parses the `timerepresentation` graph attribute, treating `""` as `interval`.
	pub fn parse(raw: &str) -> Result<Self, Error> {
		match raw {
			"interval" => Ok(TimeRepresentation::Interval),
			"timestamp" => Ok(TimeRepresentation::Timestamp),
			"" => Ok(TimeRepresentation::Interval),
			other => Err(Error::UnsupportedTimeRepresentation(other.to_string())),
		}
	}
}
