// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub use context::{CancellationToken, Context};
pub use error::{
	Error,
	diagnostic::{Diagnostic, IntoDiagnostic},
};
pub use interface::{ResultSet, Session, SessionPool, Statement};
pub use table::{PhysicalTable, TableId};
pub use value::Value;
pub use variable::{Assignment, SessionVariables, SystemVariable, VariableError};

pub mod context;
pub mod error;
pub mod interface;
mod table;
mod value;
pub mod variable;

pub type Result<T> = std::result::Result<T, Error>;
