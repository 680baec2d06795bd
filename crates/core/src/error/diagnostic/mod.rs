// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

pub mod context;
pub mod pool;
pub mod render;
pub mod session;
pub mod ttl;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
	pub code: String,
	pub statement: Option<String>,
	pub message: String,
	pub label: Option<String>,
	pub help: Option<String>,
	pub notes: Vec<String>,
	pub cause: Option<Box<Diagnostic>>,
}

impl Diagnostic {
	/// Attaches the statement text the diagnostic was raised for.
	pub fn with_statement(mut self, statement: impl Into<String>) -> Self {
		self.statement = Some(statement.into());
		self
	}

	/// Walks the cause chain, starting with this diagnostic.
	pub fn chain(&self) -> impl Iterator<Item = &Diagnostic> {
		std::iter::successors(Some(self), |d| d.cause.as_deref())
	}

	/// The innermost diagnostic of the cause chain.
	pub fn root_cause(&self) -> &Diagnostic {
		self.chain().last().unwrap_or(self)
	}
}

impl Display for Diagnostic {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_fmt(format_args!("{}", self.code))
	}
}

pub trait IntoDiagnostic {
	fn into_diagnostic(self) -> Diagnostic;
}
