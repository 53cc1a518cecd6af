//! Caller-facing statement builder.
//!
//! A [`DbAdapter`] is bound to one table and assembles one statement at a
//! time. Configuration calls are chainable; [`DbAdapter::build`] (and every
//! `exec_*` call, which builds first) consumes the pending state and leaves
//! the adapter empty, ready for the next unrelated statement.
//!
//! ```ignore
//! use querykit::{DbAdapter, TableDetails, Clause, WhereGroup, fragment, params};
//!
//! let mut customers = DbAdapter::new(TableDetails::new("customers"));
//!
//! let rows = customers
//!     .select_columns(["customer_id", "last_name"])
//!     .where_group(WhereGroup::and(vec![
//!         Clause::and("state", fragment::eq("California")),
//!         Clause::and("last_name", fragment::eq("Johnson")),
//!     ]))
//!     .limit(20)
//!     .exec_select(&client)
//!     .await?;
//!
//! let updated = customers
//!     .update(["status"], params!["inactive"])
//!     .where_group(WhereGroup::and(vec![Clause::and("customer_id", fragment::eq(42_i64))]))
//!     .exec_update(&client)
//!     .await?;
//! ```

use crate::clause::WhereGroup;
use crate::client::GenericClient;
use crate::config::TableDetails;
use crate::error::{DbError, DbResult};
use crate::param::Param;
use crate::render::render;
use crate::row::{FromRow, RowExt};
use crate::statement::{
    Direction, Join, JoinKind, Limit, OrderBy, Statement, StatementKind, StatementState,
};
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

const LOG_TARGET: &str = "querykit.sql";

/// Statement builder bound to a table.
///
/// Not meant to be shared: one adapter assembles one statement at a time.
#[derive(Debug, Default)]
pub struct DbAdapter {
    table: TableDetails,
    state: StatementState,
    last_statement: Option<Statement>,
}

impl DbAdapter {
    pub fn new(table: TableDetails) -> Self {
        Self {
            table,
            state: StatementState::new(),
            last_statement: None,
        }
    }

    /// Adapter for `table` without a column prefix.
    pub fn for_table(table: impl Into<String>) -> Self {
        Self::new(TableDetails::new(table))
    }

    pub fn table(&self) -> &str {
        &self.table.table
    }

    pub fn prefix(&self) -> &str {
        &self.table.prefix
    }

    pub fn table_details(&self) -> &TableDetails {
        &self.table
    }

    /// Retarget the adapter. Pending statement state is kept.
    pub fn set_table(&mut self, table: TableDetails) -> &mut Self {
        self.table = table;
        self
    }

    /// The statement being assembled.
    pub fn state(&self) -> &StatementState {
        &self.state
    }

    // ==================== Statement kind ====================

    /// `SELECT * FROM table`
    pub fn select(&mut self) -> &mut Self {
        self.state.kind = Some(StatementKind::Select);
        self
    }

    /// `SELECT *` expecting a single row.
    pub fn select_row(&mut self) -> &mut Self {
        self.state.kind = Some(StatementKind::SelectRow);
        self
    }

    /// `SELECT col1, col2 FROM table`. Columns accumulate across calls.
    pub fn select_columns<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.kind = Some(StatementKind::Select);
        self.add_columns(columns)
    }

    /// Column SELECT expecting a single row.
    pub fn select_row_columns<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.kind = Some(StatementKind::SelectRow);
        self.add_columns(columns)
    }

    /// `UPDATE table SET col = ?, ...` with values matched positionally.
    pub fn update<I, S>(&mut self, columns: I, values: Vec<Param>) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.kind = Some(StatementKind::Update);
        self.add_columns(columns);
        self.state.values.extend(values);
        self
    }

    /// Add one `col = ?` assignment to an UPDATE.
    pub fn update_set<T>(&mut self, column: impl Into<String>, value: T) -> &mut Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        self.state.kind = Some(StatementKind::Update);
        self.push_value(column, value)
    }

    /// `DELETE FROM table`
    pub fn delete(&mut self) -> &mut Self {
        self.state.kind = Some(StatementKind::Delete);
        self
    }

    /// `INSERT INTO table (cols) VALUES (?, ...)` with values matched positionally.
    pub fn insert<I, S>(&mut self, columns: I, values: Vec<Param>) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.kind = Some(StatementKind::Insert);
        self.add_columns(columns);
        self.state.values.extend(values);
        self
    }

    /// Add one column/value pair to an INSERT.
    pub fn insert_value<T>(&mut self, column: impl Into<String>, value: T) -> &mut Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        self.state.kind = Some(StatementKind::Insert);
        self.push_value(column, value)
    }

    /// `INSERT ... RETURNING column`.
    ///
    /// Only INSERT renders RETURNING; building any other kind with a
    /// returning column set is a configuration error.
    pub fn returning(&mut self, column: impl Into<String>) -> &mut Self {
        self.state.returning = Some(column.into());
        self
    }

    fn add_columns<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    fn push_value<T>(&mut self, column: impl Into<String>, value: T) -> &mut Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        self.state.columns.push(column.into());
        self.state.values.push(Param::new(value));
        self
    }

    // ==================== Sections ====================

    /// Append a WHERE group.
    pub fn where_group(&mut self, group: WhereGroup) -> &mut Self {
        self.state.where_groups.push(group);
        self
    }

    /// Append several WHERE groups in order.
    pub fn where_groups(&mut self, groups: impl IntoIterator<Item = WhereGroup>) -> &mut Self {
        self.state.where_groups.extend(groups);
        self
    }

    /// Append `KIND JOIN foreign_table ON local_key = foreign_key`.
    pub fn join(
        &mut self,
        kind: JoinKind,
        foreign_table: impl Into<String>,
        local_key: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> &mut Self {
        self.state.joins.push(Join {
            kind,
            foreign_table: foreign_table.into(),
            local_key: local_key.into(),
            foreign_key: foreign_key.into(),
        });
        self
    }

    pub fn inner_join(
        &mut self,
        foreign_table: impl Into<String>,
        local_key: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> &mut Self {
        self.join(JoinKind::Inner, foreign_table, local_key, foreign_key)
    }

    pub fn left_join(
        &mut self,
        foreign_table: impl Into<String>,
        local_key: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> &mut Self {
        self.join(JoinKind::Left, foreign_table, local_key, foreign_key)
    }

    pub fn right_join(
        &mut self,
        foreign_table: impl Into<String>,
        local_key: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> &mut Self {
        self.join(JoinKind::Right, foreign_table, local_key, foreign_key)
    }

    /// Append an ORDER BY term.
    pub fn order_by(&mut self, column: impl Into<String>, direction: Direction) -> &mut Self {
        self.state.order_by.push(OrderBy {
            column: column.into(),
            direction,
        });
        self
    }

    pub fn order_by_asc(&mut self, column: impl Into<String>) -> &mut Self {
        self.order_by(column, Direction::Asc)
    }

    pub fn order_by_desc(&mut self, column: impl Into<String>) -> &mut Self {
        self.order_by(column, Direction::Desc)
    }

    /// Replace the GROUP BY column list.
    pub fn group_by<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.group_by = columns.into_iter().map(Into::into).collect();
        self
    }

    /// `LIMIT n` (with `OFFSET 0` on reads). Zero disables the limit.
    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.limit_offset(limit, 0)
    }

    /// `LIMIT n OFFSET m`; OFFSET only renders on reads.
    pub fn limit_offset(&mut self, limit: u64, offset: u64) -> &mut Self {
        self.state.limit = Limit { limit, offset };
        self
    }

    // ==================== Build / lifecycle ====================

    /// Render the pending statement and reset the adapter.
    ///
    /// The pending state is consumed whether or not rendering succeeds.
    /// With nothing configured this returns the empty statement.
    pub fn build(&mut self) -> DbResult<Statement> {
        let state = std::mem::take(&mut self.state);
        match render(&self.table.table, &state) {
            Ok(statement) => {
                self.last_statement = Some(statement.clone());
                Ok(statement)
            }
            Err(err) => {
                tracing::warn!(
                    target: LOG_TARGET,
                    table = %self.table.table,
                    kind = ?state.kind,
                    columns = ?state.columns,
                    value_count = state.values.len(),
                    error = %err,
                    "statement not built"
                );
                Err(err)
            }
        }
    }

    /// Discard everything configured since the last build.
    pub fn reset(&mut self) -> &mut Self {
        self.state = StatementState::new();
        self
    }

    /// The last successfully rendered statement, for diagnostics.
    ///
    /// Kept regardless of whether its execution succeeded.
    pub fn last_statement(&self) -> Option<&Statement> {
        self.last_statement.as_ref()
    }

    /// `"<sql>, [<params>]"` of the last rendered statement.
    pub fn last_statement_sql(&self) -> String {
        match &self.last_statement {
            Some(statement) => statement.to_string(),
            None => "There was no statement to print".to_string(),
        }
    }

    /// Build, requiring one of `kinds`. The state is consumed either way.
    fn build_expecting(&mut self, kinds: &[StatementKind], op: &str) -> DbResult<Statement> {
        let kind = self.state.kind;
        if !kind.is_some_and(|k| kinds.contains(&k)) {
            self.reset();
            let err = DbError::configuration(format!(
                "{op} called on {} statement",
                kind.map_or("an empty", StatementKind::keyword)
            ));
            tracing::warn!(
                target: LOG_TARGET,
                table = %self.table.table,
                error = %err,
                "statement not built"
            );
            return Err(err);
        }
        self.build()
    }

    // ==================== Execution ====================

    /// Run the pending SELECT and return all rows.
    pub async fn exec_select(&mut self, conn: &impl GenericClient) -> DbResult<Vec<Row>> {
        let statement = self.build_expecting(
            &[StatementKind::Select, StatementKind::SelectRow],
            "exec_select",
        )?;
        run_query(conn, &statement).await
    }

    /// Run the pending SELECT and map every row to `T`.
    pub async fn exec_select_as<T: FromRow>(
        &mut self,
        conn: &impl GenericClient,
    ) -> DbResult<Vec<T>> {
        let rows = self.exec_select(conn).await?;
        rows.iter().map(T::from_row).collect()
    }

    /// Run the pending SELECT; `Some` only when exactly one row came back.
    pub async fn exec_select_row(&mut self, conn: &impl GenericClient) -> DbResult<Option<Row>> {
        let mut rows = self.exec_select(conn).await?;
        if rows.len() == 1 {
            return Ok(rows.pop());
        }
        if rows.len() > 1 {
            tracing::debug!(
                target: LOG_TARGET,
                rows = rows.len(),
                "select_row matched more than one row"
            );
        }
        Ok(None)
    }

    /// Run the pending UPDATE and return the number of affected rows.
    pub async fn exec_update(&mut self, conn: &impl GenericClient) -> DbResult<u64> {
        let statement = self.build_expecting(&[StatementKind::Update], "exec_update")?;
        run_execute(conn, &statement).await
    }

    /// Run the pending DELETE and return the number of affected rows.
    pub async fn exec_delete(&mut self, conn: &impl GenericClient) -> DbResult<u64> {
        let statement = self.build_expecting(&[StatementKind::Delete], "exec_delete")?;
        run_execute(conn, &statement).await
    }

    /// Run the pending INSERT and return the number of inserted rows.
    pub async fn exec_insert(&mut self, conn: &impl GenericClient) -> DbResult<u64> {
        let statement = self.build_expecting(&[StatementKind::Insert], "exec_insert")?;
        run_execute(conn, &statement).await
    }

    /// Run the pending INSERT and return the identity assigned to `id_column`.
    ///
    /// `SMALLINT`, `INTEGER` and `BIGINT` identities (including the serial
    /// types) are all returned as `i64`.
    pub async fn exec_insert_returning_id(
        &mut self,
        conn: &impl GenericClient,
        id_column: &str,
    ) -> DbResult<i64> {
        self.returning(id_column);
        let statement =
            self.build_expecting(&[StatementKind::Insert], "exec_insert_returning_id")?;
        let rows = run_query(conn, &statement).await?;
        let row = rows
            .first()
            .ok_or_else(|| DbError::not_found("INSERT returned no row"))?;
        row.try_get_identity(id_column)
    }
}

async fn run_query(conn: &impl GenericClient, statement: &Statement) -> DbResult<Vec<Row>> {
    log_execution(statement);
    let params = statement.params().as_refs();
    conn.query(statement.sql(), &params)
        .await
        .inspect_err(|err| log_failure(statement, err))
}

async fn run_execute(conn: &impl GenericClient, statement: &Statement) -> DbResult<u64> {
    log_execution(statement);
    let params = statement.params().as_refs();
    conn.execute(statement.sql(), &params)
        .await
        .inspect_err(|err| log_failure(statement, err))
}

fn log_execution(statement: &Statement) {
    tracing::debug!(
        target: LOG_TARGET,
        sql = %statement.sql(),
        param_count = statement.params().len(),
        "executing statement"
    );
}

fn log_failure(statement: &Statement, err: &DbError) {
    tracing::warn!(
        target: LOG_TARGET,
        sql = %statement.sql(),
        params = ?statement.params(),
        error = %err,
        "statement failed"
    );
}
