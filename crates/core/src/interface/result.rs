// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::{Deserialize, Serialize};

use crate::Value;

/// Rows produced by one executed statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
	pub columns: Vec<String>,
	pub rows: Vec<Vec<Value>>,
}

impl ResultSet {
	pub fn empty() -> Self {
		Self::default()
	}

	pub fn single(column: impl Into<String>, value: Value) -> Self {
		Self {
			columns: vec![column.into()],
			rows: vec![vec![value]],
		}
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	/// First column of the first row, if any.
	pub fn first_value(&self) -> Option<&Value> {
		self.rows.first().and_then(|row| row.first())
	}
}
