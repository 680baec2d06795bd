// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::{Result, interface::Session};

/// A shared pool of sessions, one implementation per backend.
///
/// `get` hands out exclusive ownership; the caller gives it back with either
/// `put` (healthy) or `destroy` (suspected corrupt, never reused).
pub trait SessionPool: Send + Sync {
	type Session: Session;

	fn get(&self) -> Result<Self::Session>;

	fn put(&self, session: Self::Session);

	fn destroy(&self, session: Self::Session);
}

impl<P: SessionPool + ?Sized> SessionPool for &P {
	type Session = P::Session;

	fn get(&self) -> Result<Self::Session> {
		(**self).get()
	}

	fn put(&self, session: Self::Session) {
		(**self).put(session)
	}

	fn destroy(&self, session: Self::Session) {
		(**self).destroy(session)
	}
}
