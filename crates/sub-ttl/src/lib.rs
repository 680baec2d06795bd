// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Sessions for the row expiration (TTL) worker.
//!
//! The worker takes a session from the shared pool with a
//! [`SessionAcquirer`], which prepares it with worker defaults and retries
//! transient failures. For each table scan it narrows the session with
//! [`new_scan_session`], which serializes scan concurrency and turns off
//! engine paging until the returned [`ScanSession`] is restored.

#![cfg_attr(not(debug_assertions), deny(warnings))]

mod acquire;
mod backoff;
mod config;
mod scan;

pub use acquire::{SessionAcquirer, WorkerSession, get_session};
pub use backoff::Backoff;
pub use config::AcquireConfig;
pub use reifydb_core::Result;
pub use scan::{ScanSession, new_scan_session};
