// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialOrd, PartialEq, Ord, Eq, Hash, Serialize, Deserialize)]
pub struct TableId(pub u64);

impl Display for TableId {
	fn fmt(&self, f: &mut Formatter) -> fmt::Result {
		Display::fmt(&self.0, f)
	}
}

impl From<u64> for TableId {
	fn from(value: u64) -> Self {
		TableId(value)
	}
}

/// The physical table (or one partition of it) a TTL scan runs against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhysicalTable {
	pub id: TableId,
	pub namespace: String,
	pub name: String,
	pub partition: Option<String>,
}

impl PhysicalTable {
	pub fn new(id: impl Into<TableId>, namespace: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			namespace: namespace.into(),
			name: name.into(),
			partition: None,
		}
	}

	pub fn with_partition(mut self, partition: impl Into<String>) -> Self {
		self.partition = Some(partition.into());
		self
	}
}

impl Display for PhysicalTable {
	fn fmt(&self, f: &mut Formatter) -> fmt::Result {
		write!(f, "{}.{}", self.namespace, self.name)?;
		if let Some(partition) = &self.partition {
			write!(f, " partition({})", partition)?;
		}
		Ok(())
	}
}
