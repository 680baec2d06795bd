// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::Diagnostic;

/// Session variable name is not known to the engine
pub fn unknown_variable(name: &str) -> Diagnostic {
	Diagnostic {
		code: "SESSION_001".to_string(),
		statement: None,
		message: format!("Unknown session variable '{}'", name),
		label: None,
		help: Some(
			"Known variables are scan_concurrency, enable_paging, retry_limit and time_zone".to_string(),
		),
		notes: vec![],
		cause: None,
	}
}

/// Value cannot be assigned to a session variable
pub fn invalid_variable_value(name: &str, value: &str, expected: &str) -> Diagnostic {
	Diagnostic {
		code: "SESSION_002".to_string(),
		statement: None,
		message: format!("Invalid value {} for session variable '{}'", value, name),
		label: Some(format!("expected {}", expected)),
		help: None,
		notes: vec![],
		cause: None,
	}
}

/// Statement is not understood by the session
pub fn unsupported_statement(sql: &str) -> Diagnostic {
	Diagnostic {
		code: "SESSION_003".to_string(),
		statement: Some(sql.to_string()),
		message: "Unsupported statement".to_string(),
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

/// Number of bound arguments does not match the statement placeholders
pub fn argument_count_mismatch(sql: &str, expected: usize, actual: usize) -> Diagnostic {
	Diagnostic {
		code: "SESSION_004".to_string(),
		statement: Some(sql.to_string()),
		message: format!("Statement expects {} arguments, got {}", expected, actual),
		label: None,
		help: Some("Bind exactly one argument per '?' placeholder".to_string()),
		notes: vec![],
		cause: None,
	}
}
