// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// A scalar value as read from or written to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
	Undefined,
	Boolean(bool),
	Int8(i64),
	Utf8(String),
}

impl Value {
	/// Renders the value as a SQL literal.
	pub fn to_literal(&self) -> String {
		match self {
			Value::Undefined => "NULL".to_string(),
			Value::Boolean(true) => "ON".to_string(),
			Value::Boolean(false) => "OFF".to_string(),
			Value::Int8(i) => i.to_string(),
			Value::Utf8(s) => format!("'{}'", s.replace('\'', "''")),
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Value::Undefined => f.write_str("undefined"),
			Value::Boolean(b) => Display::fmt(b, f),
			Value::Int8(i) => Display::fmt(i, f),
			Value::Utf8(s) => f.write_str(s),
		}
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Value::Boolean(value)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Value::Int8(value)
	}
}

impl From<u32> for Value {
	fn from(value: u32) -> Self {
		Value::Int8(value as i64)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Value::Utf8(value.to_string())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Value::Utf8(value)
	}
}
