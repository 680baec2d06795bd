// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::{
	Error, Result,
	variable::{Assignment, SystemVariable},
};

/// A statement parsed just far enough for session-level handling.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
	text: String,
	kind: StatementKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
	Assignment(Assignment),
	Begin,
	Commit,
	Rollback,
	/// `SELECT @@variable`
	ShowVariable(SystemVariable),
	/// Anything else, left to the engine.
	Other,
}

impl Statement {
	/// Classifies `sql`. Errors carry the statement text.
	pub fn parse(sql: &str) -> Result<Statement> {
		let kind = Self::classify(sql).map_err(|err| Error(err.diagnostic().with_statement(sql)))?;
		Ok(Statement {
			text: sql.to_string(),
			kind,
		})
	}

	fn classify(sql: &str) -> Result<StatementKind> {
		let text = sql.trim().trim_end_matches(';').trim_end();

		let kind = if let Some(assignment) = Assignment::parse(text) {
			StatementKind::Assignment(assignment?)
		} else {
			let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ").to_ascii_uppercase();
			match normalized.as_str() {
				"BEGIN" | "START TRANSACTION" => StatementKind::Begin,
				"COMMIT" => StatementKind::Commit,
				"ROLLBACK" => StatementKind::Rollback,
				other => match other.strip_prefix("SELECT @@") {
					Some(name) => StatementKind::ShowVariable(name.parse()?),
					None => StatementKind::Other,
				},
			}
		};
		Ok(kind)
	}

	/// The statement text exactly as submitted.
	pub fn text(&self) -> &str {
		&self.text
	}

	pub fn kind(&self) -> &StatementKind {
		&self.kind
	}
}

impl From<Assignment> for Statement {
	fn from(assignment: Assignment) -> Self {
		Self {
			text: assignment.to_string(),
			kind: StatementKind::Assignment(assignment),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::{Statement, StatementKind};
	use crate::variable::{Assignment, SystemVariable};

	#[test]
	fn test_transaction_control() {
		assert_eq!(Statement::parse("rollback;").unwrap().kind(), &StatementKind::Rollback);
		assert_eq!(Statement::parse("start   transaction").unwrap().kind(), &StatementKind::Begin);
		assert_eq!(Statement::parse("COMMIT").unwrap().kind(), &StatementKind::Commit);
	}

	#[test]
	fn test_show_variable() {
		let statement = Statement::parse("select @@time_zone").unwrap();
		assert_eq!(statement.kind(), &StatementKind::ShowVariable(SystemVariable::TimeZone));
		assert_eq!(statement.text(), "select @@time_zone");
	}

	#[test]
	fn test_unknown_variable_is_an_error() {
		let err = Statement::parse("select @@bogus").unwrap_err();
		assert_eq!(err.code, "SESSION_001");
		assert_eq!(err.statement.as_deref(), Some("select @@bogus"));
	}

	#[test]
	fn test_invalid_assignment_keeps_statement() {
		let err = Statement::parse("set @@enable_paging = maybe").unwrap_err();
		assert_eq!(err.code, "SESSION_002");
		assert_eq!(err.statement.as_deref(), Some("set @@enable_paging = maybe"));
	}

	#[test]
	fn test_from_assignment_keeps_canonical_text() {
		let statement = Statement::from(Assignment::new(SystemVariable::EnablePaging, true));
		assert_eq!(statement.text(), "SET @@enable_paging = ON");
	}

	#[test]
	fn test_other() {
		assert_eq!(Statement::parse("DELETE FROM t").unwrap().kind(), &StatementKind::Other);
	}
}
