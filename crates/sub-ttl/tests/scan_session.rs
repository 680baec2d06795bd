// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
	time::SystemTime,
};

use reifydb_core::{Context, PhysicalTable, Session, SessionVariables};
use reifydb_sub_ttl::{get_session, new_scan_session};
use reifydb_testing::{
	MemorySession, MemorySessionPool,
	fault::{FAULT_MESSAGE, FaultAfterCount, FaultSession, FaultWithFilter, NoFault},
	logging,
};

/// A session with scan concurrency 123 and paging on.
fn configured_session() -> MemorySession {
	let ctx = Context::background();
	let mut session = MemorySession::new(1);
	session.execute(&ctx, "set @@scan_concurrency=123").unwrap();
	assert_eq!(session.variables().scan_concurrency(), 123);
	session.execute(&ctx, "set @@enable_paging=ON").unwrap();
	assert!(session.variables().enable_paging());
	session
}

/// Fails exactly the statement `failing_sql` and counts how often it did.
fn fail_statement(failing_sql: &'static str, fired: Arc<AtomicUsize>) -> FaultWithFilter<impl Fn(&str) -> bool + Send + Sync> {
	FaultWithFilter::new(
		move |sql: &str| {
			if sql == failing_sql {
				fired.fetch_add(1, Ordering::SeqCst);
				return true;
			}
			false
		},
		FaultAfterCount::new(0),
	)
}

#[test]
fn test_scan_session_overrides_and_restores() {
	logging::init();
	let ctx = Context::background();
	let table = PhysicalTable::new(1, "app", "events");
	let mut session = FaultSession::new(configured_session(), Arc::new(NoFault));
	let original: *const FaultSession<MemorySession> = &session;

	let scan = new_scan_session(&ctx, &mut session, &table, SystemTime::now()).unwrap();
	assert!(std::ptr::eq(scan.session(), original));
	assert_eq!(scan.variables().scan_concurrency(), 1);
	assert!(!scan.variables().enable_paging());

	scan.restore().unwrap();
	assert_eq!(session.variables().scan_concurrency(), 123);
	assert!(session.variables().enable_paging());
}

#[test]
fn test_scan_session_overrides_any_prior_values() {
	logging::init();
	let ctx = Context::background();
	let table = PhysicalTable::new(1, "app", "events");

	for (concurrency, paging) in [(1, false), (1, true), (64, false), (u32::MAX, true)] {
		let mut session = MemorySession::new(1);
		session.variables_mut().set_by_name("scan_concurrency", concurrency).unwrap();
		session.variables_mut().set_by_name("enable_paging", paging).unwrap();

		let scan = new_scan_session(&ctx, &mut session, &table, SystemTime::now()).unwrap();
		assert_eq!(scan.variables().scan_concurrency(), 1);
		assert!(!scan.variables().enable_paging());
		scan.restore().unwrap();

		assert_eq!(session.variables().scan_concurrency(), concurrency);
		assert_eq!(session.variables().enable_paging(), paging);
	}
}

#[test]
fn test_scan_session_fault_on_each_override() {
	logging::init();
	let ctx = Context::background();
	let table = PhysicalTable::new(1, "app", "events");

	for failing_sql in ["SET @@scan_concurrency = 1", "SET @@enable_paging = OFF"] {
		let fired = Arc::new(AtomicUsize::new(0));
		let fault = fail_statement(failing_sql, Arc::clone(&fired));
		let mut session = FaultSession::new(configured_session(), Arc::new(fault));

		let result = new_scan_session(&ctx, &mut session, &table, SystemTime::now());
		let err = result.err().unwrap_or_else(|| panic!("expected '{}' to fail", failing_sql));

		assert_eq!(fired.load(Ordering::SeqCst), 1, "{}", failing_sql);
		assert_eq!(err.message, FAULT_MESSAGE);
		assert_eq!(session.variables().scan_concurrency(), 123, "{}", failing_sql);
		assert!(session.variables().enable_paging(), "{}", failing_sql);
	}
}

#[test]
fn test_concurrency_fault_runs_nothing_else() {
	logging::init();
	let ctx = Context::background();
	let table = PhysicalTable::new(1, "app", "events");
	let fired = Arc::new(AtomicUsize::new(0));
	let mut session = FaultSession::new(
		configured_session(),
		Arc::new(fail_statement("SET @@scan_concurrency = 1", Arc::clone(&fired))),
	);
	let executed_before = session.inner().history().len();

	assert!(new_scan_session(&ctx, &mut session, &table, SystemTime::now()).is_err());
	assert_eq!(session.inner().history().len(), executed_before);
}

#[test]
fn test_paging_fault_is_compensated() {
	logging::init();
	let ctx = Context::background();
	let table = PhysicalTable::new(1, "app", "events");
	let fired = Arc::new(AtomicUsize::new(0));
	let mut session = FaultSession::new(
		configured_session(),
		Arc::new(fail_statement("SET @@enable_paging = OFF", Arc::clone(&fired))),
	);
	let executed_before = session.inner().history().len();

	assert!(new_scan_session(&ctx, &mut session, &table, SystemTime::now()).is_err());
	assert_eq!(&session.inner().history()[executed_before..], [
		"SET @@scan_concurrency = 1",
		"SET @@scan_concurrency = 123"
	]);
}

#[test]
fn test_failing_compensation_keeps_original_error() {
	logging::init();
	let ctx = Context::background();
	let table = PhysicalTable::new(1, "app", "events");
	let paging_fired = Arc::new(AtomicUsize::new(0));
	let rollback_fired = Arc::new(AtomicUsize::new(0));
	let fault = {
		let paging_fired = Arc::clone(&paging_fired);
		let rollback_fired = Arc::clone(&rollback_fired);
		FaultWithFilter::new(
			move |sql: &str| match sql {
				"SET @@enable_paging = OFF" => {
					paging_fired.fetch_add(1, Ordering::SeqCst);
					true
				}
				"SET @@scan_concurrency = 123" => {
					rollback_fired.fetch_add(1, Ordering::SeqCst);
					true
				}
				_ => false,
			},
			FaultAfterCount::new(0),
		)
	};
	let mut session = FaultSession::new(configured_session(), Arc::new(fault));

	let result = new_scan_session(&ctx, &mut session, &table, SystemTime::now());
	let err = result.err().unwrap_or_else(|| panic!("expected the scan session to fail"));

	assert_eq!(err.message, FAULT_MESSAGE);
	assert_eq!(err.statement.as_deref(), Some("SET @@enable_paging = OFF"));
	assert_eq!(paging_fired.load(Ordering::SeqCst), 1);
	assert_eq!(rollback_fired.load(Ordering::SeqCst), 1);
	assert_eq!(session.variables().scan_concurrency(), 1);
	assert!(session.variables().enable_paging());
}

#[test]
fn test_scan_session_can_be_rebuilt_after_restore() {
	logging::init();
	let ctx = Context::background();
	let table = PhysicalTable::new(1, "app", "events");
	let mut session = configured_session();

	for _ in 0..3 {
		let scan = new_scan_session(&ctx, &mut session, &table, SystemTime::now()).unwrap();
		scan.restore().unwrap();
	}

	assert_eq!(session.variables().scan_concurrency(), 123);
	assert!(session.variables().enable_paging());
}

#[test]
fn test_failing_restore_still_runs_both_statements() {
	logging::init();
	let ctx = Context::background();
	let table = PhysicalTable::new(1, "app", "events");
	let fired = Arc::new(AtomicUsize::new(0));
	let mut session = FaultSession::new(
		configured_session(),
		Arc::new(fail_statement("SET @@scan_concurrency = 123", Arc::clone(&fired))),
	);

	let scan = new_scan_session(&ctx, &mut session, &table, SystemTime::now()).unwrap();
	let err = scan.restore().unwrap_err();

	assert_eq!(err.message, FAULT_MESSAGE);
	assert_eq!(fired.load(Ordering::SeqCst), 1);
	assert_eq!(session.variables().scan_concurrency(), 1);
	assert!(session.variables().enable_paging());
}

#[test]
fn test_scan_with_worker_session() {
	logging::init();
	let ctx = Context::background();
	let pool = MemorySessionPool::new(1);
	let table = PhysicalTable::new(3, "app", "sessions").with_partition("p2024");

	let mut worker = get_session(&ctx, &pool).unwrap();
	{
		let scan = new_scan_session(&ctx, &mut *worker, &table, SystemTime::now()).unwrap();
		assert_eq!(scan.variables().scan_concurrency(), 1);
		assert_eq!(scan.variables().time_zone(), "UTC");
		scan.restore().unwrap();
	}
	assert_eq!(worker.variables().scan_concurrency(), 15);
	worker.close(&ctx).unwrap();

	let idle = pool.idle_sessions().remove(0);
	assert_eq!(idle.variables(), &SessionVariables::default());
	assert_eq!(idle.history(), [
		"ROLLBACK",
		"SET @@retry_limit = 0",
		"SET @@time_zone = 'UTC'",
		"SET @@scan_concurrency = 1",
		"SET @@enable_paging = OFF",
		"SET @@scan_concurrency = 15",
		"SET @@enable_paging = ON",
		"SET @@retry_limit = 10",
		"SET @@time_zone = 'SYSTEM'",
	]);
}
