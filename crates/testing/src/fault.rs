// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Fault injection for sessions and pools.
//!
//! A [`Fault`] policy decides per statement whether to fail. The policy is
//! handed to [`FaultSessionPool`] or [`FaultSession`] when they are built, and
//! every session a fault pool hands out shares that same policy.

use std::{
	fmt::{self, Debug, Formatter},
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
};

use reifydb_core::{
	Context, Diagnostic, Error, Result, ResultSet, Session, SessionPool, SessionVariables, Statement, Value,
	variable::Assignment,
};

/// Message carried by every injected failure.
pub const FAULT_MESSAGE: &str = "fault in test";

pub fn fault_in_test() -> Error {
	Error(Diagnostic {
		code: "TEST_001".to_string(),
		statement: None,
		message: FAULT_MESSAGE.to_string(),
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	})
}

pub trait Fault: Send + Sync {
	/// Whether the statement `sql` should fail this time.
	fn should_fault(&self, sql: &str) -> bool;
}

/// Lets the first `fault_count` checks pass, then fails every one after.
pub struct FaultAfterCount {
	fault_count: usize,
	current: AtomicUsize,
}

impl FaultAfterCount {
	pub fn new(fault_count: usize) -> Self {
		Self {
			fault_count,
			current: AtomicUsize::new(0),
		}
	}

	/// Checks that passed so far.
	pub fn passed(&self) -> usize {
		self.current.load(Ordering::SeqCst)
	}
}

impl Fault for FaultAfterCount {
	fn should_fault(&self, _sql: &str) -> bool {
		self.current
			.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
				(current < self.fault_count).then_some(current + 1)
			})
			.is_err()
	}
}

/// Never fails.
pub struct NoFault;

impl Fault for NoFault {
	fn should_fault(&self, _sql: &str) -> bool {
		false
	}
}

/// Consults `fault` only for statements accepted by `filter`.
pub struct FaultWithFilter<F> {
	filter: F,
	fault: Box<dyn Fault>,
}

impl<F> FaultWithFilter<F>
where
	F: Fn(&str) -> bool + Send + Sync,
{
	pub fn new(filter: F, fault: impl Fault + 'static) -> Self {
		Self {
			filter,
			fault: Box::new(fault),
		}
	}
}

impl<F> Fault for FaultWithFilter<F>
where
	F: Fn(&str) -> bool + Send + Sync,
{
	fn should_fault(&self, sql: &str) -> bool {
		(self.filter)(sql) && self.fault.should_fault(sql)
	}
}

/// Filter that skips session-local `SET` statements, so only statements that
/// would reach the storage layer can fail.
pub fn skip_local_statements(sql: &str) -> bool {
	Assignment::parse(sql).is_none()
}

/// A session that fails statements chosen by a [`Fault`] and forwards the
/// rest to the wrapped session.
pub struct FaultSession<S> {
	inner: S,
	fault: Arc<dyn Fault>,
}

impl<S: Session> FaultSession<S> {
	pub fn new(inner: S, fault: Arc<dyn Fault>) -> Self {
		Self {
			inner,
			fault,
		}
	}

	pub fn inner(&self) -> &S {
		&self.inner
	}

	pub fn into_inner(self) -> S {
		self.inner
	}

	fn check(&self, sql: &str) -> Result<()> {
		if self.fault.should_fault(sql) {
			return Err(Error(fault_in_test().diagnostic().with_statement(sql)));
		}
		Ok(())
	}
}

impl<S: Debug> Debug for FaultSession<S> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("FaultSession").field("inner", &self.inner).finish_non_exhaustive()
	}
}

impl<S: Session> Session for FaultSession<S> {
	fn execute(&mut self, ctx: &Context, sql: &str) -> Result<Vec<ResultSet>> {
		self.check(sql)?;
		self.inner.execute(ctx, sql)
	}

	fn execute_statement(&mut self, ctx: &Context, statement: &Statement) -> Result<ResultSet> {
		self.check(statement.text())?;
		self.inner.execute_statement(ctx, statement)
	}

	fn execute_internal(&mut self, ctx: &Context, sql: &str, args: &[Value]) -> Result<ResultSet> {
		self.check(sql)?;
		self.inner.execute_internal(ctx, sql, args)
	}

	fn variables(&self) -> &SessionVariables {
		self.inner.variables()
	}

	fn variables_mut(&mut self) -> &mut SessionVariables {
		self.inner.variables_mut()
	}
}

/// A pool whose sessions are wrapped in [`FaultSession`]s sharing one policy.
///
/// `get` itself can fail through a separate policy, see
/// [`FaultSessionPool::with_get_fault`].
pub struct FaultSessionPool<P> {
	inner: P,
	fault: Arc<dyn Fault>,
	get_fault: Option<Arc<dyn Fault>>,
}

impl<P: SessionPool> FaultSessionPool<P> {
	pub fn new(inner: P, fault: Arc<dyn Fault>) -> Self {
		Self {
			inner,
			fault,
			get_fault: None,
		}
	}

	/// Make `get` fail whenever `fault` says so, before touching the inner pool.
	pub fn with_get_fault(mut self, fault: Arc<dyn Fault>) -> Self {
		self.get_fault = Some(fault);
		self
	}

	pub fn inner(&self) -> &P {
		&self.inner
	}
}

impl<P: SessionPool> SessionPool for FaultSessionPool<P> {
	type Session = FaultSession<P::Session>;

	fn get(&self) -> Result<Self::Session> {
		if let Some(fault) = &self.get_fault {
			if fault.should_fault("") {
				return Err(fault_in_test());
			}
		}
		let session = self.inner.get()?;
		Ok(FaultSession::new(session, Arc::clone(&self.fault)))
	}

	fn put(&self, session: Self::Session) {
		self.inner.put(session.into_inner())
	}

	fn destroy(&self, session: Self::Session) {
		self.inner.destroy(session.into_inner())
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use reifydb_core::{Context, Session, SessionPool};

	use super::{
		FAULT_MESSAGE, Fault, FaultAfterCount, FaultSession, FaultSessionPool, FaultWithFilter, NoFault,
		skip_local_statements,
	};
	use crate::{MemorySession, MemorySessionPool};

	#[test]
	fn test_fault_after_count() {
		let fault = FaultAfterCount::new(2);
		assert!(!fault.should_fault("a"));
		assert!(!fault.should_fault("b"));
		assert!(fault.should_fault("c"));
		assert!(fault.should_fault("d"));
		assert_eq!(fault.passed(), 2);
	}

	#[test]
	fn test_fault_after_zero_always_faults() {
		let fault = FaultAfterCount::new(0);
		assert!(fault.should_fault("a"));
	}

	#[test]
	fn test_filter_does_not_consume_count() {
		let fault = FaultWithFilter::new(skip_local_statements, FaultAfterCount::new(1));
		assert!(!fault.should_fault("SET @@retry_limit = 0"));
		assert!(!fault.should_fault("ROLLBACK"));
		assert!(!fault.should_fault("set @@time_zone = 'UTC'"));
		assert!(fault.should_fault("ROLLBACK"));
	}

	#[test]
	fn test_fault_session_forwards_or_fails() {
		let ctx = Context::background();
		let fault = Arc::new(FaultWithFilter::new(|sql: &str| sql == "ROLLBACK", FaultAfterCount::new(0)));
		let mut session = FaultSession::new(MemorySession::new(1), fault);

		session.execute(&ctx, "set @@retry_limit = 0").unwrap();
		assert_eq!(session.variables().retry_limit(), 0);

		let err = session.execute(&ctx, "ROLLBACK").unwrap_err();
		assert_eq!(err.message, FAULT_MESSAGE);
		assert_eq!(err.statement.as_deref(), Some("ROLLBACK"));
		assert_eq!(session.inner().history().len(), 1);
	}

	#[test]
	fn test_fault_pool_unwraps_on_return() {
		let pool = MemorySessionPool::new(2);
		let fault_pool = FaultSessionPool::new(&pool, Arc::new(NoFault));

		let kept = fault_pool.get().unwrap();
		let broken = fault_pool.get().unwrap();
		let broken_id = broken.inner().id();
		fault_pool.put(kept);
		fault_pool.destroy(broken);

		let stats = pool.stats();
		assert_eq!(stats.idle, 1);
		assert_eq!(stats.in_use, 0);
		assert!(pool.is_destroyed(broken_id));
	}

	#[test]
	fn test_get_fault() {
		let pool = MemorySessionPool::new(2);
		let fault_pool =
			FaultSessionPool::new(&pool, Arc::new(NoFault)).with_get_fault(Arc::new(FaultAfterCount::new(1)));

		assert!(fault_pool.get().is_ok());
		assert_eq!(fault_pool.get().unwrap_err().message, FAULT_MESSAGE);
		assert_eq!(pool.stats().created, 1);
	}

	#[test]
	fn test_fault_session_debug_shows_inner() {
		let session = FaultSession::new(MemorySession::new(7), Arc::new(NoFault));
		let rendered = format!("{:?}", session);
		assert!(rendered.starts_with("FaultSession"));
		assert!(rendered.contains("id: 7"));
	}
}
