// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	ops::{Deref, DerefMut},
	time::SystemTime,
};

use reifydb_core::{Context, PhysicalTable, Result, Session, SessionVariables, SystemVariable, variable::Assignment};
use tracing::{debug, error, instrument, warn};

/// Scan settings of a session before it was scoped for scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScanSnapshot {
	scan_concurrency: u32,
	enable_paging: bool,
}

impl ScanSnapshot {
	fn capture(variables: &SessionVariables) -> Self {
		Self {
			scan_concurrency: variables.scan_concurrency(),
			enable_paging: variables.enable_paging(),
		}
	}

	fn assignments(&self) -> [Assignment; 2] {
		[
			Assignment::new(SystemVariable::ScanConcurrency, self.scan_concurrency),
			Assignment::new(SystemVariable::EnablePaging, self.enable_paging),
		]
	}
}

/// A session narrowed for a full table expiration scan.
///
/// While it lives the session scans with a concurrency of one, which keeps
/// row order stable for the worker's cursor, and with engine paging off so it
/// does not interfere with the worker's own batching. [`ScanSession::restore`]
/// puts both settings back; a scope that is dropped unrestored restores itself.
pub struct ScanSession<'a, S: Session + ?Sized> {
	session: &'a mut S,
	table: &'a PhysicalTable,
	now: SystemTime,
	snapshot: Option<ScanSnapshot>,
}

/// Scope `session` for scanning `table`.
///
/// Either both overrides are in place when this returns `Ok`, or neither is:
/// if disabling paging fails the concurrency override is rolled back before
/// the error is returned unchanged.
#[instrument(name = "ttl::scan::new_session", level = "debug", skip_all, fields(table = %table))]
pub fn new_scan_session<'a, S: Session + ?Sized>(
	ctx: &Context,
	session: &'a mut S,
	table: &'a PhysicalTable,
	now: SystemTime,
) -> Result<ScanSession<'a, S>> {
	let snapshot = ScanSnapshot::capture(session.variables());

	session.execute_assignment(ctx, &Assignment::new(SystemVariable::ScanConcurrency, 1u32))?;

	if let Err(err) = session.execute_assignment(ctx, &Assignment::new(SystemVariable::EnablePaging, false)) {
		// compensate with a fresh context, a cancelled one must not leave the override behind
		let rollback = Assignment::new(SystemVariable::ScanConcurrency, snapshot.scan_concurrency);
		if let Err(rollback_err) = session.execute_assignment(&Context::background(), &rollback) {
			error!(error = %rollback_err.message, "failed to roll back scan concurrency");
		}
		return Err(err);
	}

	debug!(
		scan_concurrency = snapshot.scan_concurrency,
		enable_paging = snapshot.enable_paging,
		"scan session created"
	);

	Ok(ScanSession {
		session,
		table,
		now,
		snapshot: Some(snapshot),
	})
}

impl<'a, S: Session + ?Sized> ScanSession<'a, S> {
	/// The session being scanned with, the same one that was scoped.
	pub fn session(&self) -> &S {
		&*self.session
	}

	pub fn session_mut(&mut self) -> &mut S {
		&mut *self.session
	}

	pub fn table(&self) -> &PhysicalTable {
		self.table
	}

	/// Reference time the expiration cut-off is computed from.
	pub fn now(&self) -> SystemTime {
		self.now
	}

	/// Put scan concurrency and paging back to their values before scoping.
	///
	/// Both statements run even if the first fails; the first error is
	/// returned. Nothing is retried.
	pub fn restore(mut self) -> Result<()> {
		match self.snapshot.take() {
			Some(snapshot) => restore(&mut *self.session, self.table, snapshot),
			None => Ok(()),
		}
	}
}

fn restore<S: Session + ?Sized>(session: &mut S, table: &PhysicalTable, snapshot: ScanSnapshot) -> Result<()> {
	let ctx = Context::background();
	let mut first_err = None;

	for assignment in snapshot.assignments() {
		if let Err(err) = session.execute_assignment(&ctx, &assignment) {
			error!(table = %table, variable = %assignment.variable, error = %err.message, "failed to restore scan session");
			first_err.get_or_insert(err);
		}
	}

	match first_err {
		Some(err) => Err(err),
		None => Ok(()),
	}
}

impl<S: Session + ?Sized> Deref for ScanSession<'_, S> {
	type Target = S;

	fn deref(&self) -> &Self::Target {
		&*self.session
	}
}

impl<S: Session + ?Sized> DerefMut for ScanSession<'_, S> {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut *self.session
	}
}

impl<S: Session + ?Sized> Drop for ScanSession<'_, S> {
	fn drop(&mut self) {
		if let Some(snapshot) = self.snapshot.take() {
			warn!(table = %self.table, "scan session dropped without restore");
			let _ = restore(&mut *self.session, self.table, snapshot);
		}
	}
}

#[cfg(test)]
mod tests {
	use std::time::SystemTime;

	use reifydb_core::{Context, PhysicalTable, Session};
	use reifydb_testing::MemorySession;

	use super::new_scan_session;

	#[test]
	fn test_statements_in_order() {
		let ctx = Context::background();
		let table = PhysicalTable::new(1, "app", "events");
		let mut session = MemorySession::new(1);

		let scan = new_scan_session(&ctx, &mut session, &table, SystemTime::now()).unwrap();
		scan.restore().unwrap();

		assert_eq!(session.history(), [
			"SET @@scan_concurrency = 1",
			"SET @@enable_paging = OFF",
			"SET @@scan_concurrency = 15",
			"SET @@enable_paging = ON",
		]);
	}

	#[test]
	fn test_drop_restores() {
		let ctx = Context::background();
		let table = PhysicalTable::new(1, "app", "events");
		let mut session = MemorySession::new(1);

		{
			let scan = new_scan_session(&ctx, &mut session, &table, SystemTime::now()).unwrap();
			assert_eq!(scan.variables().scan_concurrency(), 1);
		}

		assert_eq!(session.variables().scan_concurrency(), 15);
		assert!(session.variables().enable_paging());
	}

	#[test]
	fn test_accessors() {
		let ctx = Context::background();
		let table = PhysicalTable::new(7, "app", "events").with_partition("p0");
		let now = SystemTime::UNIX_EPOCH;
		let mut session = MemorySession::new(1);

		let scan = new_scan_session(&ctx, &mut session, &table, now).unwrap();
		assert_eq!(scan.table(), &table);
		assert_eq!(scan.now(), now);
		assert!(!scan.session().variables().enable_paging());
		scan.restore().unwrap();
	}
}
