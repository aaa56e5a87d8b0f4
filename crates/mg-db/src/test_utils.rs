//! Shared test utilities for mg-db consumers

use crate::error::{DbError, DbResult};
use crate::traits::{Row, SqlExecutor};
use std::collections::BTreeSet;

/// Which kind of call a [`FaultInjector`] recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Batch,
    Transaction,
    Query,
}

/// Wraps a real executor, records every statement, and fails chosen calls
/// with a transient connection error.
///
/// Calls are counted per kind starting at 1, so `fail_transaction(2)` makes
/// the second `execute_in_transaction` call fail without touching the
/// database.
pub struct FaultInjector<E> {
    inner: E,
    failing_transactions: BTreeSet<usize>,
    failing_queries: BTreeSet<usize>,
    failing_all_transactions: bool,
    transactions: usize,
    queries: usize,
    reconnects: usize,
    log: Vec<(CallKind, String)>,
}

impl<E: SqlExecutor> FaultInjector<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            failing_transactions: BTreeSet::new(),
            failing_queries: BTreeSet::new(),
            failing_all_transactions: false,
            transactions: 0,
            queries: 0,
            reconnects: 0,
            log: Vec::new(),
        }
    }

    /// Fail the `n`th transaction (1-based).
    pub fn fail_transaction(mut self, n: usize) -> Self {
        self.failing_transactions.insert(n);
        self
    }

    /// Fail every transaction.
    pub fn fail_all_transactions(mut self) -> Self {
        self.failing_all_transactions = true;
        self
    }

    /// Fail the `n`th query (1-based).
    pub fn fail_query(mut self, n: usize) -> Self {
        self.failing_queries.insert(n);
        self
    }

    /// Every successfully executed transaction batch, in order.
    pub fn committed(&self) -> Vec<&str> {
        self.log
            .iter()
            .filter(|(kind, _)| *kind == CallKind::Transaction)
            .map(|(_, sql)| sql.as_str())
            .collect()
    }

    /// Full call log, including queries and auto-commit batches.
    pub fn calls(&self) -> &[(CallKind, String)] {
        &self.log
    }

    pub fn transaction_attempts(&self) -> usize {
        self.transactions
    }

    pub fn reconnects(&self) -> usize {
        self.reconnects
    }

    pub fn inner_mut(&mut self) -> &mut E {
        &mut self.inner
    }

    fn injected(what: &str, n: usize) -> DbError {
        DbError::ConnectionError(format!("injected failure on {what} #{n}"))
    }
}

impl<E: SqlExecutor> SqlExecutor for FaultInjector<E> {
    fn reconnect(&mut self) -> DbResult<()> {
        self.reconnects += 1;
        self.inner.reconnect()
    }

    fn execute_batch(&mut self, sql: &str) -> DbResult<()> {
        self.inner.execute_batch(sql)?;
        self.log.push((CallKind::Batch, sql.to_string()));
        Ok(())
    }

    fn execute_in_transaction(&mut self, sql: &str) -> DbResult<()> {
        self.transactions += 1;
        let n = self.transactions;
        if self.failing_all_transactions || self.failing_transactions.contains(&n) {
            return Err(Self::injected("transaction", n));
        }
        self.inner.execute_in_transaction(sql)?;
        self.log.push((CallKind::Transaction, sql.to_string()));
        Ok(())
    }

    fn query(&mut self, sql: &str) -> DbResult<Vec<Row>> {
        self.queries += 1;
        let n = self.queries;
        if self.failing_queries.contains(&n) {
            return Err(Self::injected("query", n));
        }
        let rows = self.inner.query(sql)?;
        self.log.push((CallKind::Query, sql.to_string()));
        Ok(rows)
    }

    fn table_exists(&mut self, name: &str) -> DbResult<bool> {
        self.inner.table_exists(name)
    }

    fn db_type(&self) -> &'static str {
        self.inner.db_type()
    }
}
