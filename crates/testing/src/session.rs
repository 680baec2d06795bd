// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use reifydb_core::{
	Context, Result, ResultSet, Session, SessionVariables, Statement, Value,
	error::diagnostic::session::{argument_count_mismatch, unsupported_statement},
	interface::StatementKind,
	return_error,
};

/// A session that understands transaction control, variable assignment and
/// `SELECT @@variable`, and records every statement it ran.
#[derive(Debug, Clone)]
pub struct MemorySession {
	id: u64,
	variables: SessionVariables,
	in_transaction: bool,
	history: Vec<String>,
}

impl MemorySession {
	pub fn new(id: u64) -> Self {
		Self::with_variables(id, SessionVariables::default())
	}

	pub fn with_variables(id: u64, variables: SessionVariables) -> Self {
		Self {
			id,
			variables,
			in_transaction: false,
			history: Vec::new(),
		}
	}

	pub fn id(&self) -> u64 {
		self.id
	}

	pub fn in_transaction(&self) -> bool {
		self.in_transaction
	}

	/// Statements that executed successfully, in order.
	pub fn history(&self) -> &[String] {
		&self.history
	}

	fn run(&mut self, statement: &Statement) -> Result<ResultSet> {
		let result = match statement.kind() {
			StatementKind::Assignment(assignment) => {
				self.variables.apply(assignment.clone())?;
				ResultSet::empty()
			}
			StatementKind::Begin => {
				self.in_transaction = true;
				ResultSet::empty()
			}
			StatementKind::Commit | StatementKind::Rollback => {
				self.in_transaction = false;
				ResultSet::empty()
			}
			StatementKind::ShowVariable(variable) => {
				ResultSet::single(format!("@@{}", variable), self.variables.get(*variable))
			}
			StatementKind::Other => return_error!(unsupported_statement(statement.text())),
		};

		self.history.push(statement.text().to_string());
		Ok(result)
	}
}

impl Session for MemorySession {
	fn execute(&mut self, ctx: &Context, sql: &str) -> Result<Vec<ResultSet>> {
		let mut results = Vec::new();
		for text in split_statements(sql) {
			ctx.check()?;
			let statement = Statement::parse(text)?;
			results.push(self.run(&statement)?);
		}
		Ok(results)
	}

	fn execute_statement(&mut self, ctx: &Context, statement: &Statement) -> Result<ResultSet> {
		ctx.check()?;
		self.run(statement)
	}

	fn execute_internal(&mut self, ctx: &Context, sql: &str, args: &[Value]) -> Result<ResultSet> {
		ctx.check()?;
		let bound = bind(sql, args)?;
		let statement = Statement::parse(&bound)?;
		self.run(&statement)
	}

	fn variables(&self) -> &SessionVariables {
		&self.variables
	}

	fn variables_mut(&mut self) -> &mut SessionVariables {
		&mut self.variables
	}
}

/// Splits on `;` outside of quoted literals, dropping empty statements.
fn split_statements(sql: &str) -> Vec<&str> {
	let mut statements = Vec::new();
	let mut in_quote = false;
	let mut start = 0;

	for (idx, c) in sql.char_indices() {
		match c {
			'\'' => in_quote = !in_quote,
			';' if !in_quote => {
				statements.push(&sql[start..idx]);
				start = idx + 1;
			}
			_ => {}
		}
	}
	statements.push(&sql[start..]);

	statements.into_iter().map(str::trim).filter(|s| !s.is_empty()).collect()
}

/// Replaces `?` placeholders outside of quoted literals with `args`.
fn bind(sql: &str, args: &[Value]) -> Result<String> {
	let mut bound = String::with_capacity(sql.len());
	let mut in_quote = false;
	let mut used = 0;

	for c in sql.chars() {
		match c {
			'\'' => {
				in_quote = !in_quote;
				bound.push(c);
			}
			'?' if !in_quote => {
				if let Some(arg) = args.get(used) {
					bound.push_str(&arg.to_literal());
				}
				used += 1;
			}
			_ => bound.push(c),
		}
	}

	if used != args.len() {
		return_error!(argument_count_mismatch(sql, used, args.len()));
	}
	Ok(bound)
}
