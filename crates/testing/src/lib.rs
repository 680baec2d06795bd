// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Test doubles for the session layer.
//!
//! [`MemorySession`] and [`MemorySessionPool`] stand in for the engine's
//! sessions. The [`fault`] module wraps any session or pool so that chosen
//! statements fail on demand.

pub mod fault;
pub mod logging;
mod pool;
mod session;

pub use pool::{MemorySessionPool, PoolStats};
pub use session::MemorySession;
