// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::Diagnostic;

pub fn cancelled() -> Diagnostic {
	Diagnostic {
		code: "CONTEXT_001".to_string(),
		statement: None,
		message: "Operation cancelled".to_string(),
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

pub fn deadline_exceeded() -> Diagnostic {
	Diagnostic {
		code: "CONTEXT_002".to_string(),
		statement: None,
		message: "Operation deadline exceeded".to_string(),
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}
