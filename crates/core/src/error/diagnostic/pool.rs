// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::Diagnostic;

/// All sessions of the pool are in use
pub fn pool_exhausted(capacity: usize) -> Diagnostic {
	Diagnostic {
		code: "POOL_001".to_string(),
		statement: None,
		message: format!("Session pool exhausted, all {} sessions are in use", capacity),
		label: None,
		help: Some("Return sessions to the pool or increase its capacity".to_string()),
		notes: vec![],
		cause: None,
	}
}
