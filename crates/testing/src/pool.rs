// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::HashSet;

use parking_lot::Mutex;
use reifydb_core::{Result, SessionPool, SessionVariables, error::diagnostic::pool::pool_exhausted, return_error};
use tracing::{trace, warn};

use crate::MemorySession;

/// A bounded pool of [`MemorySession`]s that keeps count of what happened to
/// every session it handed out.
pub struct MemorySessionPool {
	capacity: usize,
	defaults: SessionVariables,
	state: Mutex<PoolState>,
}

#[derive(Default)]
struct PoolState {
	idle: Vec<MemorySession>,
	in_use: HashSet<u64>,
	destroyed: Vec<u64>,
	next_id: u64,
	puts: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolStats {
	pub idle: usize,
	pub in_use: usize,
	/// Sessions created over the lifetime of the pool.
	pub created: u64,
	pub destroyed: usize,
	pub puts: usize,
}

impl MemorySessionPool {
	pub fn new(capacity: usize) -> Self {
		Self::with_defaults(capacity, SessionVariables::default())
	}

	/// Newly created sessions start with a copy of `defaults`.
	pub fn with_defaults(capacity: usize, defaults: SessionVariables) -> Self {
		Self {
			capacity,
			defaults,
			state: Mutex::new(PoolState::default()),
		}
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}

	pub fn stats(&self) -> PoolStats {
		let state = self.state.lock();
		PoolStats {
			idle: state.idle.len(),
			in_use: state.in_use.len(),
			created: state.next_id,
			destroyed: state.destroyed.len(),
			puts: state.puts,
		}
	}

	pub fn is_destroyed(&self, id: u64) -> bool {
		self.state.lock().destroyed.contains(&id)
	}

	/// Idle sessions, most recently returned last.
	pub fn idle_sessions(&self) -> Vec<MemorySession> {
		self.state.lock().idle.clone()
	}
}

impl SessionPool for MemorySessionPool {
	type Session = MemorySession;

	fn get(&self) -> Result<MemorySession> {
		let mut state = self.state.lock();

		let session = match state.idle.pop() {
			Some(session) => session,
			None => {
				if state.in_use.len() >= self.capacity {
					return_error!(pool_exhausted(self.capacity));
				}
				state.next_id += 1;
				MemorySession::with_variables(state.next_id, self.defaults.clone())
			}
		};

		state.in_use.insert(session.id());
		trace!(session = session.id(), "session handed out");
		Ok(session)
	}

	fn put(&self, session: MemorySession) {
		let mut state = self.state.lock();
		if !state.in_use.remove(&session.id()) {
			warn!(session = session.id(), "session returned that was not handed out");
		}
		state.puts += 1;
		state.idle.push(session);
	}

	fn destroy(&self, session: MemorySession) {
		let mut state = self.state.lock();
		state.in_use.remove(&session.id());
		state.destroyed.push(session.id());
		trace!(session = session.id(), "session destroyed");
	}
}
