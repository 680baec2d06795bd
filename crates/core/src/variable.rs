// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Session-scoped system variables and the `SET @@name = value` statements
//! that change them.

use std::{
	fmt::{self, Display, Formatter},
	str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{
	Error, Value,
	error::diagnostic::{
		Diagnostic, IntoDiagnostic,
		session::{invalid_variable_value, unknown_variable, unsupported_statement},
	},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemVariable {
	/// Number of parallel fetches a single scan may issue.
	ScanConcurrency,
	/// Engine-managed paging of large results.
	EnablePaging,
	/// How often the engine retries a failed statement on its own.
	RetryLimit,
	TimeZone,
}

enum Kind {
	Integer {
		min: i64,
	},
	Boolean,
	Text,
}

impl SystemVariable {
	pub const ALL: [SystemVariable; 4] = [
		SystemVariable::ScanConcurrency,
		SystemVariable::EnablePaging,
		SystemVariable::RetryLimit,
		SystemVariable::TimeZone,
	];

	pub fn name(&self) -> &'static str {
		match self {
			SystemVariable::ScanConcurrency => "scan_concurrency",
			SystemVariable::EnablePaging => "enable_paging",
			SystemVariable::RetryLimit => "retry_limit",
			SystemVariable::TimeZone => "time_zone",
		}
	}

	fn kind(&self) -> Kind {
		match self {
			SystemVariable::ScanConcurrency => Kind::Integer {
				min: 1,
			},
			SystemVariable::EnablePaging => Kind::Boolean,
			SystemVariable::RetryLimit => Kind::Integer {
				min: 0,
			},
			SystemVariable::TimeZone => Kind::Text,
		}
	}

	fn invalid(&self, value: impl Into<String>) -> VariableError {
		let expected = match self.kind() {
			Kind::Integer {
				min: 0,
			} => "a non-negative integer",
			Kind::Integer {
				..
			} => "a positive integer",
			Kind::Boolean => "ON, OFF, TRUE, FALSE, 1 or 0",
			Kind::Text => "a quoted string",
		};
		VariableError::InvalidValue {
			name: self.name().to_string(),
			value: value.into(),
			expected,
		}
	}

	/// Checks that `value` fits this variable, normalising where unambiguous.
	pub fn coerce(&self, value: Value) -> Result<Value, VariableError> {
		match (self.kind(), value) {
			(
				Kind::Integer {
					min,
				},
				Value::Int8(i),
			) if i >= min && i <= u32::MAX as i64 => Ok(Value::Int8(i)),
			(Kind::Boolean, Value::Boolean(b)) => Ok(Value::Boolean(b)),
			(Kind::Boolean, Value::Int8(0)) => Ok(Value::Boolean(false)),
			(Kind::Boolean, Value::Int8(1)) => Ok(Value::Boolean(true)),
			(Kind::Text, Value::Utf8(s)) => Ok(Value::Utf8(s)),
			(_, other) => Err(self.invalid(other.to_literal())),
		}
	}

	/// Parses the right hand side of an assignment to this variable.
	pub fn parse_literal(&self, literal: &str) -> Result<Value, VariableError> {
		let literal = literal.trim();
		match self.kind() {
			Kind::Integer {
				..
			} => {
				let parsed = literal.parse::<i64>().map_err(|_| self.invalid(literal))?;
				self.coerce(Value::Int8(parsed))
			}
			Kind::Boolean => match literal.to_ascii_uppercase().as_str() {
				"ON" | "TRUE" | "1" => Ok(Value::Boolean(true)),
				"OFF" | "FALSE" | "0" => Ok(Value::Boolean(false)),
				_ => Err(self.invalid(literal)),
			},
			Kind::Text => unquote(literal).map(Value::Utf8).ok_or_else(|| self.invalid(literal)),
		}
	}
}

fn unquote(literal: &str) -> Option<String> {
	let inner = literal.strip_prefix('\'')?.strip_suffix('\'')?;
	let mut result = String::with_capacity(inner.len());
	let mut chars = inner.chars().peekable();
	while let Some(c) = chars.next() {
		if c == '\'' {
			// a lone quote inside the literal is unterminated
			if chars.next_if_eq(&'\'').is_none() {
				return None;
			}
		}
		result.push(c);
	}
	Some(result)
}

impl Display for SystemVariable {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for SystemVariable {
	type Err = VariableError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		SystemVariable::ALL.into_iter().find(|v| v.name().eq_ignore_ascii_case(s)).ok_or_else(|| {
			VariableError::Unknown {
				name: s.to_string(),
			}
		})
	}
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VariableError {
	#[error("Unknown session variable '{name}'")]
	Unknown {
		name: String,
	},

	#[error("Invalid value {value} for session variable '{name}'")]
	InvalidValue {
		name: String,
		value: String,
		expected: &'static str,
	},

	#[error("Malformed assignment")]
	Malformed {
		statement: String,
	},
}

impl IntoDiagnostic for VariableError {
	fn into_diagnostic(self) -> Diagnostic {
		match self {
			VariableError::Unknown {
				name,
			} => unknown_variable(&name),
			VariableError::InvalidValue {
				name,
				value,
				expected,
			} => invalid_variable_value(&name, &value, expected),
			VariableError::Malformed {
				statement,
			} => unsupported_statement(&statement),
		}
	}
}

impl From<VariableError> for Error {
	fn from(err: VariableError) -> Self {
		Error(err.into_diagnostic())
	}
}

/// The current values of all system variables of one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionVariables {
	scan_concurrency: u32,
	enable_paging: bool,
	retry_limit: u32,
	time_zone: String,
}

impl Default for SessionVariables {
	fn default() -> Self {
		Self {
			scan_concurrency: 15,
			enable_paging: true,
			retry_limit: 10,
			time_zone: "SYSTEM".to_string(),
		}
	}
}

impl SessionVariables {
	pub fn scan_concurrency(&self) -> u32 {
		self.scan_concurrency
	}

	pub fn enable_paging(&self) -> bool {
		self.enable_paging
	}

	pub fn retry_limit(&self) -> u32 {
		self.retry_limit
	}

	pub fn time_zone(&self) -> &str {
		&self.time_zone
	}

	pub fn get(&self, variable: SystemVariable) -> Value {
		match variable {
			SystemVariable::ScanConcurrency => Value::from(self.scan_concurrency),
			SystemVariable::EnablePaging => Value::Boolean(self.enable_paging),
			SystemVariable::RetryLimit => Value::from(self.retry_limit),
			SystemVariable::TimeZone => Value::Utf8(self.time_zone.clone()),
		}
	}

	pub fn get_by_name(&self, name: &str) -> Result<Value, VariableError> {
		Ok(self.get(name.parse()?))
	}

	/// Assigns `value`, leaving the variables untouched when it does not fit.
	pub fn set(&mut self, variable: SystemVariable, value: impl Into<Value>) -> Result<(), VariableError> {
		let value = variable.coerce(value.into())?;
		match (variable, value) {
			(SystemVariable::ScanConcurrency, Value::Int8(i)) => self.scan_concurrency = i as u32,
			(SystemVariable::EnablePaging, Value::Boolean(b)) => self.enable_paging = b,
			(SystemVariable::RetryLimit, Value::Int8(i)) => self.retry_limit = i as u32,
			(SystemVariable::TimeZone, Value::Utf8(s)) => self.time_zone = s,
			(variable, other) => return Err(variable.invalid(other.to_literal())),
		}
		Ok(())
	}

	pub fn set_by_name(&mut self, name: &str, value: impl Into<Value>) -> Result<(), VariableError> {
		self.set(name.parse()?, value)
	}

	pub fn apply(&mut self, assignment: Assignment) -> Result<(), VariableError> {
		self.set(assignment.variable, assignment.value)
	}
}

/// A `SET @@variable = value` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
	pub variable: SystemVariable,
	pub value: Value,
}

impl Assignment {
	pub fn new(variable: SystemVariable, value: impl Into<Value>) -> Self {
		Self {
			variable,
			value: value.into(),
		}
	}

	/// Parses an assignment statement.
	///
	/// Returns `None` if `sql` is not a `SET` statement at all.
	pub fn parse(sql: &str) -> Option<Result<Assignment, VariableError>> {
		let statement = sql.trim().trim_end_matches(';').trim_end();
		let keyword = statement.get(..3)?;
		if !keyword.eq_ignore_ascii_case("set") {
			return None;
		}
		let rest = &statement[3..];
		if !rest.starts_with(char::is_whitespace) {
			return None;
		}

		Some(Self::parse_body(sql, rest))
	}

	fn parse_body(sql: &str, body: &str) -> Result<Assignment, VariableError> {
		let malformed = || VariableError::Malformed {
			statement: sql.to_string(),
		};

		let (name, literal) = body.split_once('=').ok_or_else(malformed)?;
		let name = name.trim();
		let name = name.strip_prefix("@@").unwrap_or(name);
		if name.is_empty() || literal.trim().is_empty() {
			return Err(malformed());
		}

		let variable: SystemVariable = name.parse()?;
		let value = variable.parse_literal(literal)?;
		Ok(Assignment {
			variable,
			value,
		})
	}
}

impl Display for Assignment {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "SET @@{} = {}", self.variable, self.value.to_literal())
	}
}
