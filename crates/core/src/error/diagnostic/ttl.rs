// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::time::Duration;

use super::Diagnostic;

/// Every attempt to fetch and initialize a session failed
pub fn acquire_attempts_exhausted(attempts: u32, last: Diagnostic) -> Diagnostic {
	Diagnostic {
		code: "TTL_001".to_string(),
		statement: None,
		message: format!("Failed to acquire a TTL session after {} attempts", attempts),
		label: None,
		help: Some("Check that the session pool has capacity and that sessions accept statements".to_string()),
		notes: vec![],
		cause: Some(Box::new(last)),
	}
}

/// Acquisition ran out of wall-clock time before a session could be initialized
pub fn acquire_deadline_exceeded(elapsed: Duration, attempts: u32, last: Diagnostic) -> Diagnostic {
	Diagnostic {
		code: "TTL_002".to_string(),
		statement: None,
		message: format!(
			"TTL session acquisition deadline exceeded after {:?} and {} attempts",
			elapsed, attempts
		),
		label: None,
		help: Some("Increase the acquire deadline or the pool capacity".to_string()),
		notes: vec![],
		cause: Some(Box::new(last)),
	}
}

/// Acquisition was cancelled by the owning task
pub fn acquire_cancelled(attempts: u32) -> Diagnostic {
	Diagnostic {
		code: "TTL_003".to_string(),
		statement: None,
		message: format!("TTL session acquisition cancelled after {} attempts", attempts),
		label: None,
		help: None,
		notes: vec!["The worker task was stopped while waiting for a session".to_string()],
		cause: None,
	}
}
