// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::time::Duration;

use crate::AcquireConfig;

/// Exponentially growing pauses, capped at a maximum. Never ends.
#[derive(Debug, Clone)]
pub struct Backoff {
	next: Duration,
	max: Duration,
}

impl Backoff {
	pub fn new(initial: Duration, max: Duration) -> Self {
		Self {
			next: initial.min(max),
			max,
		}
	}

	pub fn from_config(config: &AcquireConfig) -> Self {
		Self::new(config.initial_backoff, config.max_backoff)
	}
}

impl Iterator for Backoff {
	type Item = Duration;

	fn next(&mut self) -> Option<Duration> {
		let current = self.next;
		self.next = current.saturating_mul(2).min(self.max);
		Some(current)
	}
}
