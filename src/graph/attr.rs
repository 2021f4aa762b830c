//! Tagged-union representation for passthrough node/edge attribute values.
//!
//! The GEXF `<attribute>` declaration names a type (`string`, `integer`,
//! `double`, `boolean`, …); this enum is the in-memory counterpart so
//! downstream code does not need to re-parse strings at every use site.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
	String(String),
	Integer(i64),
	Double(f64),
	Boolean(bool),
}

impl AttrValue {
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			AttrValue::Integer(i) => Some(*i as f64),
			AttrValue::Double(d) => Some(*d),
			AttrValue::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
			AttrValue::String(s) => s.parse().ok(),
		}
	}

	pub fn as_str(&self) -> String {
		match self {
			AttrValue::String(s) => s.clone(),
			AttrValue::Integer(i) => i.to_string(),
			AttrValue::Double(d) => d.to_string(),
			AttrValue::Boolean(b) => b.to_string(),
		}
	}
}

/// Declared type of a [`crate::slicer::AttributeDescriptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttrType {
	String,
	Integer,
	Double,
	Boolean,
}

impl AttrType {
	pub fn parse_value(&self, raw: &str) -> AttrValue {
		match self {
			AttrType::String => AttrValue::String(raw.to_string()),
			AttrType::Integer => raw
				.parse::<i64>()
				.map(AttrValue::Integer)
				.unwrap_or_else(|_| AttrValue::String(raw.to_string())),
			AttrType::Double => raw
				.parse::<f64>()
				.map(AttrValue::Double)
				.unwrap_or_else(|_| AttrValue::String(raw.to_string())),
			AttrType::Boolean => raw
				.parse::<bool>()
				.map(AttrValue::Boolean)
				.unwrap_or_else(|_| AttrValue::String(raw.to_string())),
		}
	}
}

impl std::str::FromStr for AttrType {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"string" => Ok(AttrType::String),
			"integer" | "int" | "long" | "short" | "byte" => Ok(AttrType::Integer),
			"double" | "float" => Ok(AttrType::Double),
			"boolean" => Ok(AttrType::Boolean),
			_ => Err(()),
		}
	}
}
