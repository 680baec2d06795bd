// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::{
	Context, Result, Value,
	interface::{ResultSet, Statement},
	variable::{Assignment, SessionVariables},
};

/// A live execution context owned by exactly one caller at a time.
pub trait Session: Send {
	/// Execute SQL text, one result set per statement.
	fn execute(&mut self, ctx: &Context, sql: &str) -> Result<Vec<ResultSet>>;

	fn execute_statement(&mut self, ctx: &Context, statement: &Statement) -> Result<ResultSet>;

	/// Execute SQL with `?` placeholders bound to `args` in order.
	fn execute_internal(&mut self, ctx: &Context, sql: &str, args: &[Value]) -> Result<ResultSet>;

	fn variables(&self) -> &SessionVariables;

	fn variables_mut(&mut self) -> &mut SessionVariables;

	/// Run a `SET @@variable = value` statement through [`Session::execute`].
	fn execute_assignment(&mut self, ctx: &Context, assignment: &Assignment) -> Result<()> {
		self.execute(ctx, &assignment.to_string())?;
		Ok(())
	}
}

impl<S: Session + ?Sized> Session for Box<S> {
	fn execute(&mut self, ctx: &Context, sql: &str) -> Result<Vec<ResultSet>> {
		(**self).execute(ctx, sql)
	}

	fn execute_statement(&mut self, ctx: &Context, statement: &Statement) -> Result<ResultSet> {
		(**self).execute_statement(ctx, statement)
	}

	fn execute_internal(&mut self, ctx: &Context, sql: &str, args: &[Value]) -> Result<ResultSet> {
		(**self).execute_internal(ctx, sql, args)
	}

	fn variables(&self) -> &SessionVariables {
		(**self).variables()
	}

	fn variables_mut(&mut self) -> &mut SessionVariables {
		(**self).variables_mut()
	}

	fn execute_assignment(&mut self, ctx: &Context, assignment: &Assignment) -> Result<()> {
		(**self).execute_assignment(ctx, assignment)
	}
}
