// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	ops::{Deref, DerefMut},
	time::Instant,
};

use reifydb_core::{
	Context, Error, Result, Session, SessionPool, SessionVariables, SystemVariable,
	error::diagnostic::ttl::{acquire_attempts_exhausted, acquire_cancelled, acquire_deadline_exceeded},
	return_error,
	variable::Assignment,
};
use tracing::{debug, error, instrument, warn};

use crate::{AcquireConfig, Backoff};

/// Leaves any explicit transaction a previous user of the session forgot.
const ROLLBACK: &str = "ROLLBACK";

/// Variables every worker session runs with. The worker retries on its own,
/// and expiration timestamps are evaluated in UTC.
fn worker_defaults() -> [Assignment; 2] {
	[Assignment::new(SystemVariable::RetryLimit, 0u32), Assignment::new(SystemVariable::TimeZone, "UTC")]
}

/// Fetches sessions from a pool and prepares them for the TTL worker.
#[derive(Debug, Clone, Default)]
pub struct SessionAcquirer {
	config: AcquireConfig,
}

impl SessionAcquirer {
	pub fn new(config: AcquireConfig) -> Self {
		Self {
			config,
		}
	}

	pub fn config(&self) -> &AcquireConfig {
		&self.config
	}

	/// Take a session from `pool` and initialize it with the worker defaults.
	///
	/// A failing `get` is retried. A session that fails initialization is
	/// destroyed, never put back, before the next attempt; only a session
	/// whose initialization was cut short by `ctx` itself goes back to the
	/// pool, after a rollback and a reset. Once the attempts,
	/// the deadline or the context run out the last failure is reported as
	/// the cause of the returned error.
	#[instrument(name = "ttl::session::acquire", level = "debug", skip_all, fields(max_attempts = self.config.attempts()))]
	pub fn acquire<'p, P: SessionPool>(&self, ctx: &Context, pool: &'p P) -> Result<WorkerSession<'p, P>> {
		let started = Instant::now();
		// a deadline beyond the representable range is no deadline
		let ctx = match self.config.deadline.and_then(|deadline| started.checked_add(deadline)) {
			Some(deadline) => ctx.with_deadline(deadline),
			None => ctx.clone(),
		};
		let max_attempts = self.config.attempts();
		let mut backoff = Backoff::from_config(&self.config);
		let mut attempt = 0;

		loop {
			if ctx.is_cancelled() {
				return_error!(acquire_cancelled(attempt));
			}
			attempt += 1;

			let err = match try_acquire(&ctx, pool) {
				Ok((session, snapshot)) => {
					debug!(attempt, "acquired ttl session");
					return Ok(WorkerSession {
						pool,
						session: Some(session),
						snapshot,
					});
				}
				Err(err) => err,
			};

			if ctx.is_cancelled() {
				return_error!(acquire_cancelled(attempt));
			}
			if attempt >= max_attempts {
				return Err(Error(acquire_attempts_exhausted(attempt, err.diagnostic())));
			}

			let delay = backoff.next().unwrap_or(self.config.max_backoff);
			warn!(attempt, max_attempts, ?delay, error = %err.message, "failed to acquire ttl session, retrying");

			if ctx.sleep(delay).is_err() {
				if ctx.is_cancelled() {
					return_error!(acquire_cancelled(attempt));
				}
				return Err(Error(acquire_deadline_exceeded(started.elapsed(), attempt, err.diagnostic())));
			}
		}
	}
}

/// Acquire with the default [`AcquireConfig`].
pub fn get_session<'p, P: SessionPool>(ctx: &Context, pool: &'p P) -> Result<WorkerSession<'p, P>> {
	SessionAcquirer::default().acquire(ctx, pool)
}

fn try_acquire<P: SessionPool>(ctx: &Context, pool: &P) -> Result<(P::Session, SessionVariables)> {
	let mut session = pool.get()?;
	let snapshot = session.variables().clone();

	if let Err(err) = initialize(ctx, &mut session) {
		if interrupted(&err) {
			debug!(error = %err.message, "initialization interrupted, returning session");
			reclaim(pool, session, &snapshot);
		} else {
			warn!(error = %err.message, "destroying session that failed initialization");
			pool.destroy(session);
		}
		return Err(err);
	}

	Ok((session, snapshot))
}

/// Failures raised by the caller's context rather than by the session.
fn interrupted(err: &Error) -> bool {
	matches!(err.code.as_str(), "CONTEXT_001" | "CONTEXT_002")
}

/// Puts back a healthy session whose initialization was cut short.
///
/// The session is rolled back and reset to its snapshot first; if either
/// fails it is destroyed.
fn reclaim<P: SessionPool>(pool: &P, mut session: P::Session, snapshot: &SessionVariables) {
	let ctx = Context::background();
	if let Err(err) = session.execute(&ctx, ROLLBACK) {
		warn!(error = %err.message, "destroying interrupted session that failed to roll back");
		pool.destroy(session);
		return;
	}
	let _ = release(pool, session, snapshot, &ctx);
}

fn initialize<S: Session>(ctx: &Context, session: &mut S) -> Result<()> {
	session.execute(ctx, ROLLBACK)?;
	for assignment in worker_defaults() {
		session.execute_assignment(ctx, &assignment)?;
	}
	Ok(())
}

/// A pooled session owned by the TTL worker.
///
/// Give it back with [`WorkerSession::close`]; dropping it closes it as well.
pub struct WorkerSession<'p, P: SessionPool> {
	pool: &'p P,
	session: Option<P::Session>,
	snapshot: SessionVariables,
}

impl<'p, P: SessionPool> WorkerSession<'p, P> {
	/// Variables of the session as they were before worker initialization.
	pub fn snapshot(&self) -> &SessionVariables {
		&self.snapshot
	}

	/// Reset the worker defaults and put the session back into the pool.
	///
	/// If the reset fails the session is destroyed instead.
	pub fn close(mut self, ctx: &Context) -> Result<()> {
		match self.session.take() {
			Some(session) => release(self.pool, session, &self.snapshot, ctx),
			None => Ok(()),
		}
	}

	/// Discard the session for good.
	pub fn destroy(mut self) {
		if let Some(session) = self.session.take() {
			self.pool.destroy(session);
		}
	}
}

fn release<P: SessionPool>(pool: &P, mut session: P::Session, snapshot: &SessionVariables, ctx: &Context) -> Result<()> {
	for assignment in worker_defaults() {
		let original = Assignment::new(assignment.variable, snapshot.get(assignment.variable));
		if let Err(err) = session.execute_assignment(ctx, &original) {
			error!(variable = %assignment.variable, error = %err.message, "failed to reset ttl session, destroying it");
			pool.destroy(session);
			return Err(err);
		}
	}
	pool.put(session);
	Ok(())
}

impl<P: SessionPool> Deref for WorkerSession<'_, P> {
	type Target = P::Session;

	fn deref(&self) -> &Self::Target {
		self.session.as_ref().expect("session already released")
	}
}

impl<P: SessionPool> DerefMut for WorkerSession<'_, P> {
	fn deref_mut(&mut self) -> &mut Self::Target {
		self.session.as_mut().expect("session already released")
	}
}

impl<P: SessionPool> Drop for WorkerSession<'_, P> {
	fn drop(&mut self) {
		let Some(session) = self.session.take() else {
			return;
		};
		if let Err(err) = release(self.pool, session, &self.snapshot, &Context::background()) {
			error!("implicit ttl session release failed: {}", err.message);
		}
	}
}
