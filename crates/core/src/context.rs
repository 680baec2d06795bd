// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Cancellation and deadlines for blocking session calls.
//!
//! A [`Context`] is handed to every statement execution and to session
//! acquisition so a stopped worker gives its pool resources back promptly.

use std::{
	sync::Arc,
	time::{Duration, Instant},
};

use parking_lot::{Condvar, Mutex};

use crate::{
	Result,
	error::diagnostic::context::{cancelled, deadline_exceeded},
	return_error,
};

/// A token for signalling cancellation to blocking operations.
#[derive(Clone)]
pub struct CancellationToken {
	inner: Arc<TokenState>,
}

struct TokenState {
	cancelled: Mutex<bool>,
	wakeup: Condvar,
}

impl CancellationToken {
	/// Create a new cancellation token.
	pub fn new() -> Self {
		Self {
			inner: Arc::new(TokenState {
				cancelled: Mutex::new(false),
				wakeup: Condvar::new(),
			}),
		}
	}

	/// Signal cancellation and wake every waiter.
	pub fn cancel(&self) {
		let mut cancelled = self.inner.cancelled.lock();
		*cancelled = true;
		self.inner.wakeup.notify_all();
	}

	/// Check if cancellation was requested.
	pub fn is_cancelled(&self) -> bool {
		*self.inner.cancelled.lock()
	}

	/// Block for at most `timeout`, returning early when cancelled.
	///
	/// Returns `true` if the token was cancelled. A timeout too large to
	/// represent as an instant waits for cancellation only.
	pub fn wait_timeout(&self, timeout: Duration) -> bool {
		let until = Instant::now().checked_add(timeout);
		let mut cancelled = self.inner.cancelled.lock();
		while !*cancelled {
			match until {
				Some(until) => {
					if self.inner.wakeup.wait_until(&mut cancelled, until).timed_out() {
						break;
					}
				}
				None => self.inner.wakeup.wait(&mut cancelled),
			}
		}
		*cancelled
	}
}

impl Default for CancellationToken {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for CancellationToken {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CancellationToken").field("cancelled", &self.is_cancelled()).finish()
	}
}

/// Execution context passed through session calls.
#[derive(Debug, Clone, Default)]
pub struct Context {
	cancel: CancellationToken,
	deadline: Option<Instant>,
}

impl Context {
	/// A context that is never cancelled and has no deadline of its own.
	pub fn background() -> Self {
		Self::default()
	}

	pub fn new(cancel: CancellationToken) -> Self {
		Self {
			cancel,
			deadline: None,
		}
	}

	/// Derive a context that expires at `deadline`, or earlier if this one does.
	pub fn with_deadline(&self, deadline: Instant) -> Self {
		let deadline = match self.deadline {
			Some(existing) => existing.min(deadline),
			None => deadline,
		};
		Self {
			cancel: self.cancel.clone(),
			deadline: Some(deadline),
		}
	}

	/// Derive a context that expires after `timeout`. A timeout past the
	/// representable range leaves the current deadline in place.
	pub fn with_timeout(&self, timeout: Duration) -> Self {
		match Instant::now().checked_add(timeout) {
			Some(deadline) => self.with_deadline(deadline),
			None => self.clone(),
		}
	}

	pub fn cancellation_token(&self) -> CancellationToken {
		self.cancel.clone()
	}

	pub fn deadline(&self) -> Option<Instant> {
		self.deadline
	}

	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}

	/// Time left until the deadline, `None` when there is no deadline.
	pub fn remaining(&self) -> Option<Duration> {
		self.deadline.map(|d| d.saturating_duration_since(Instant::now()))
	}

	/// Fails if the context was cancelled or its deadline passed.
	pub fn check(&self) -> Result<()> {
		if self.is_cancelled() {
			return_error!(cancelled());
		}
		if let Some(deadline) = self.deadline {
			if Instant::now() >= deadline {
				return_error!(deadline_exceeded());
			}
		}
		Ok(())
	}

	/// Sleep for `duration`, waking early on cancellation.
	///
	/// A sleep that would cross the deadline stops at the deadline and fails.
	pub fn sleep(&self, duration: Duration) -> Result<()> {
		let (duration, hits_deadline) = match self.remaining() {
			Some(remaining) if remaining <= duration => (remaining, true),
			_ => (duration, false),
		};

		if self.cancel.wait_timeout(duration) {
			return_error!(cancelled());
		}
		if hits_deadline {
			return_error!(deadline_exceeded());
		}
		Ok(())
	}
}
