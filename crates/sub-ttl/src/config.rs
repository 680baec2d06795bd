// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for acquiring TTL worker sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquireConfig {
	/// Total attempts to fetch and initialize a session, at least one.
	pub max_attempts: u32,
	/// Pause before the first retry. Doubles on every further retry.
	pub initial_backoff: Duration,
	/// Upper bound for a single pause.
	pub max_backoff: Duration,
	/// Wall-clock limit across all attempts (None = only `max_attempts` applies)
	pub deadline: Option<Duration>,
}

impl Default for AcquireConfig {
	fn default() -> Self {
		Self {
			max_attempts: 3,
			initial_backoff: Duration::from_millis(50),
			max_backoff: Duration::from_secs(1),
			deadline: None,
		}
	}
}

impl AcquireConfig {
	pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
		self.max_attempts = max_attempts;
		self
	}

	pub fn with_backoff(mut self, initial: Duration, max: Duration) -> Self {
		self.initial_backoff = initial;
		self.max_backoff = max;
		self
	}

	/// Retry immediately, without pausing between attempts.
	pub fn without_backoff(self) -> Self {
		self.with_backoff(Duration::ZERO, Duration::ZERO)
	}

	pub fn with_deadline(mut self, deadline: Duration) -> Self {
		self.deadline = Some(deadline);
		self
	}

	pub(crate) fn attempts(&self) -> u32 {
		self.max_attempts.max(1)
	}
}
