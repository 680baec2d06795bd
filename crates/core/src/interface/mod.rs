// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod pool;
mod result;
mod session;
mod statement;

pub use pool::SessionPool;
pub use result::ResultSet;
pub use session::Session;
pub use statement::{Statement, StatementKind};
