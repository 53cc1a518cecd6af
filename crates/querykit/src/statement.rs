//! Pending statement state and the rendered result.

use crate::clause::WhereGroup;
use crate::param::{Param, ParamList};
use std::fmt;

/// Statement category; controls which sections render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    /// SELECT expected to yield a single row.
    SelectRow,
    Update,
    Delete,
    Insert,
}

impl StatementKind {
    /// SELECT and SELECT-ROW.
    pub fn is_read(self) -> bool {
        matches!(self, StatementKind::Select | StatementKind::SelectRow)
    }

    /// Leading SQL keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            StatementKind::Select | StatementKind::SelectRow => "SELECT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
            StatementKind::Insert => "INSERT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
}

impl JoinKind {
    pub fn as_str(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
        }
    }
}

/// `KIND JOIN foreign_table ON local_key = foreign_key`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub kind: JoinKind,
    pub foreign_table: String,
    pub local_key: String,
    pub foreign_key: String,
}

impl fmt::Display for Join {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ON {} = {}",
            self.kind.as_str(),
            self.foreign_table,
            self.local_key,
            self.foreign_key
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Desc,
        }
    }
}

/// `LIMIT n [OFFSET m]`. A zero limit renders nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Limit {
    pub limit: u64,
    pub offset: u64,
}

/// Everything configured for the statement currently being assembled.
///
/// Owned by [`DbAdapter`](crate::DbAdapter) and consumed by a single build.
#[derive(Debug, Clone, Default)]
pub struct StatementState {
    pub kind: Option<StatementKind>,
    /// Requested columns: the SELECT list, or the UPDATE / INSERT target columns.
    pub columns: Vec<String>,
    /// UPDATE / INSERT values, positionally matched with `columns`.
    pub values: Vec<Param>,
    pub where_groups: Vec<WhereGroup>,
    pub joins: Vec<Join>,
    pub order_by: Vec<OrderBy>,
    pub group_by: Vec<String>,
    pub limit: Limit,
    /// INSERT ... RETURNING column.
    pub returning: Option<String>,
}

impl StatementState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing has been configured.
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.columns.is_empty()
            && self.values.is_empty()
            && self.where_groups.is_empty()
            && self.joins.is_empty()
            && self.order_by.is_empty()
            && self.group_by.is_empty()
            && self.limit == Limit::default()
            && self.returning.is_none()
    }
}

/// Rendered statement text and the parameters for its placeholders.
#[derive(Clone, Debug, Default)]
pub struct Statement {
    sql: String,
    params: ParamList,
}

impl Statement {
    pub(crate) fn new(sql: String, params: ParamList) -> Self {
        Self { sql, params }
    }

    /// The empty statement produced when nothing was configured.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &ParamList {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// Number of `?` placeholders outside quoted text.
    pub fn placeholder_count(&self) -> usize {
        crate::placeholder::count(&self.sql)
    }

    pub fn into_parts(self) -> (String, ParamList) {
        (self.sql, self.params)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {:?}", self.sql, self.params)
    }
}
