//! Clause fragment makers.
//!
//! Each maker turns one comparison, range, set-membership or full-text
//! expression into a [`Fragment`]: the operator text with one `?` per value,
//! plus the values themselves in the same left-to-right order. A fragment is
//! attached to a column through [`Clause`](crate::Clause); the renderer emits
//! the text and appends the values in a single pass, so placeholders and
//! parameters cannot drift apart.
//!
//! ```ignore
//! use querykit::fragment;
//!
//! let price = fragment::between(100_i32, 1000_i32); // "BETWEEN ? AND ?"
//! let status = fragment::in_list(vec!["active", "pending"]); // "IN (?, ?)"
//! let column = fragment::function(SqlFunction::Year, "created_at"); // "YEAR(created_at)"
//! ```

use crate::param::{Param, ParamList};
use std::fmt;
use tokio_postgres::types::ToSql;

const PLACEHOLDER: &str = "?";

/// Binary comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    Like,
    NotLike,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::GreaterThan => ">",
            Operator::LessThan => "<",
            Operator::GreaterThanOrEqual => ">=",
            Operator::LessThanOrEqual => "<=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SQL function wrapper applied to a column expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlFunction {
    Avg,
    Count,
    Max,
    Min,
    Sum,
    Year,
    /// `NOW()`; the column argument is ignored.
    Now,
}

impl SqlFunction {
    fn name(self) -> &'static str {
        match self {
            SqlFunction::Avg => "AVG",
            SqlFunction::Count => "COUNT",
            SqlFunction::Max => "MAX",
            SqlFunction::Min => "MIN",
            SqlFunction::Sum => "SUM",
            SqlFunction::Year => "YEAR",
            SqlFunction::Now => "NOW",
        }
    }
}

#[derive(Clone, Debug)]
enum FragmentInner {
    /// Operator text with placeholders and the values bound to them.
    Expr { sql: String, params: Vec<Param> },
    /// Constant predicate replacing the whole condition (empty IN / NOT IN).
    Constant(bool),
}

/// Rendered right-hand side of a condition, owning its placeholder values.
#[derive(Clone, Debug)]
pub struct Fragment(FragmentInner);

impl Fragment {
    fn expr(sql: String, params: Vec<Param>) -> Self {
        Fragment(FragmentInner::Expr { sql, params })
    }

    /// Raw operator text without values.
    ///
    /// The text must not contain `?`: raw fragments never bind anything.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::expr(sql.into(), Vec::new())
    }

    /// The fragment text, e.g. `"BETWEEN ? AND ?"`.
    ///
    /// Constant fragments render as `1=1` / `1=0`.
    pub fn sql(&self) -> &str {
        match &self.0 {
            FragmentInner::Expr { sql, .. } => sql,
            FragmentInner::Constant(true) => "1=1",
            FragmentInner::Constant(false) => "1=0",
        }
    }

    /// Values bound by this fragment, in placeholder order.
    pub fn params(&self) -> &[Param] {
        match &self.0 {
            FragmentInner::Expr { params, .. } => params,
            FragmentInner::Constant(_) => &[],
        }
    }

    /// Whether this fragment replaces its condition with a constant predicate.
    pub fn is_constant(&self) -> bool {
        matches!(self.0, FragmentInner::Constant(_))
    }

    /// Write `column <fragment>` and append the bound values.
    pub(crate) fn write_condition(&self, column: &str, out: &mut String, params: &mut ParamList) {
        match &self.0 {
            FragmentInner::Expr { sql, params: values } => {
                out.push_str(column);
                if !sql.is_empty() {
                    out.push(' ');
                    out.push_str(sql);
                }
                params.extend(values.iter().cloned());
            }
            FragmentInner::Constant(_) => out.push_str(self.sql()),
        }
    }
}

/// `op ?`
pub fn compare<T>(op: Operator, value: T) -> Fragment
where
    T: ToSql + Send + Sync + 'static,
{
    Fragment::expr(format!("{op} {PLACEHOLDER}"), vec![Param::new(value)])
}

/// `= ?`
pub fn eq<T: ToSql + Send + Sync + 'static>(value: T) -> Fragment {
    compare(Operator::Equal, value)
}

/// `!= ?`
pub fn ne<T: ToSql + Send + Sync + 'static>(value: T) -> Fragment {
    compare(Operator::NotEqual, value)
}

/// `> ?`
pub fn gt<T: ToSql + Send + Sync + 'static>(value: T) -> Fragment {
    compare(Operator::GreaterThan, value)
}

/// `>= ?`
pub fn gte<T: ToSql + Send + Sync + 'static>(value: T) -> Fragment {
    compare(Operator::GreaterThanOrEqual, value)
}

/// `< ?`
pub fn lt<T: ToSql + Send + Sync + 'static>(value: T) -> Fragment {
    compare(Operator::LessThan, value)
}

/// `<= ?`
pub fn lte<T: ToSql + Send + Sync + 'static>(value: T) -> Fragment {
    compare(Operator::LessThanOrEqual, value)
}

/// `LIKE ?`
pub fn like<T: ToSql + Send + Sync + 'static>(pattern: T) -> Fragment {
    compare(Operator::Like, pattern)
}

/// `NOT LIKE ?`
pub fn not_like<T: ToSql + Send + Sync + 'static>(pattern: T) -> Fragment {
    compare(Operator::NotLike, pattern)
}

pub fn is_null() -> Fragment {
    Fragment::raw("IS NULL")
}

pub fn is_not_null() -> Fragment {
    Fragment::raw("IS NOT NULL")
}

/// `BETWEEN ? AND ?`, binding `low` then `high`.
pub fn between<T>(low: T, high: T) -> Fragment
where
    T: ToSql + Send + Sync + 'static,
{
    Fragment::expr(
        format!("BETWEEN {PLACEHOLDER} AND {PLACEHOLDER}"),
        vec![Param::new(low), Param::new(high)],
    )
}

/// `IN (?, ?, ...)`.
///
/// An empty list yields the constant predicate `1=0`: nothing is a member of
/// the empty set.
pub fn in_list<T>(values: impl IntoIterator<Item = T>) -> Fragment
where
    T: ToSql + Send + Sync + 'static,
{
    membership("IN", values, false)
}

/// `NOT IN (?, ?, ...)`.
///
/// An empty list yields the constant predicate `1=1`.
pub fn not_in<T>(values: impl IntoIterator<Item = T>) -> Fragment
where
    T: ToSql + Send + Sync + 'static,
{
    membership("NOT IN", values, true)
}

fn membership<T>(keyword: &str, values: impl IntoIterator<Item = T>, when_empty: bool) -> Fragment
where
    T: ToSql + Send + Sync + 'static,
{
    let params: Vec<Param> = values.into_iter().map(Param::new).collect();
    if params.is_empty() {
        return Fragment(FragmentInner::Constant(when_empty));
    }
    let placeholders = vec![PLACEHOLDER; params.len()].join(", ");
    Fragment::expr(format!("{keyword} ({placeholders})"), params)
}

/// `MATCH(col1, col2, ...)`, used as the column side of a full-text condition.
pub fn match_columns<S: AsRef<str>>(columns: &[S]) -> String {
    let cols: Vec<&str> = columns.iter().map(AsRef::as_ref).collect();
    format!("MATCH({})", cols.join(", "))
}

/// `AGAINST(?)`, binding the search term.
pub fn against<T>(search_term: T) -> Fragment
where
    T: ToSql + Send + Sync + 'static,
{
    Fragment::expr(format!("AGAINST({PLACEHOLDER})"), vec![Param::new(search_term)])
}

/// Wrap a column in a SQL function: `COUNT(id)`, `YEAR(created_at)`, `NOW()`.
pub fn function(func: SqlFunction, column: &str) -> String {
    match func {
        SqlFunction::Now => "NOW()".to_string(),
        other => format!("{}({column})", other.name()),
    }
}

/// `column AS name`
pub fn alias(column: &str, name: &str) -> String {
    format!("{column} AS {name}")
}

/// `DISTINCT column`
pub fn distinct(column: &str) -> String {
    format!("DISTINCT {column}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholders(f: &Fragment) -> usize {
        f.sql().matches('?').count()
    }

    #[test]
    fn comparison_binds_one_value() {
        let f = gt(4500_i64);
        assert_eq!(f.sql(), "> ?");
        assert_eq!(format!("{:?}", f.params()), "[4500]");
    }

    #[test]
    fn between_binds_low_then_high() {
        let f = between(100_i32, 1000_i32);
        assert_eq!(f.sql(), "BETWEEN ? AND ?");
        assert_eq!(format!("{:?}", f.params()), "[100, 1000]");
    }

    #[test]
    fn in_list_keeps_input_order() {
        let f = in_list(vec!["b", "a", "c"]);
        assert_eq!(f.sql(), "IN (?, ?, ?)");
        assert_eq!(format!("{:?}", f.params()), r#"["b", "a", "c"]"#);
        assert_eq!(placeholders(&f), f.params().len());
    }

    #[test]
    fn not_in_renders_keyword() {
        let f = not_in(vec![1_i32, 2]);
        assert_eq!(f.sql(), "NOT IN (?, ?)");
    }

    #[test]
    fn empty_membership_is_constant() {
        let f = in_list(Vec::<i32>::new());
        assert!(f.is_constant());
        assert_eq!(f.sql(), "1=0");
        assert!(f.params().is_empty());

        let f = not_in(Vec::<i32>::new());
        assert_eq!(f.sql(), "1=1");
    }

    #[test]
    fn null_checks_bind_nothing() {
        assert_eq!(is_null().sql(), "IS NULL");
        assert_eq!(is_not_null().sql(), "IS NOT NULL");
        assert!(is_not_null().params().is_empty());
    }

    #[test]
    fn full_text_search() {
        assert_eq!(match_columns(&["title", "body"]), "MATCH(title, body)");
        let f = against("rust");
        assert_eq!(f.sql(), "AGAINST(?)");
        assert_eq!(f.params().len(), 1);
    }

    #[test]
    fn function_wrappers() {
        assert_eq!(function(SqlFunction::Count, "*"), "COUNT(*)");
        assert_eq!(function(SqlFunction::Min, "price"), "MIN(price)");
        assert_eq!(function(SqlFunction::Year, "created_at"), "YEAR(created_at)");
        assert_eq!(function(SqlFunction::Now, "ignored"), "NOW()");
    }

    #[test]
    fn alias_and_distinct() {
        assert_eq!(alias("COUNT(id)", "total"), "COUNT(id) AS total");
        assert_eq!(distinct("state"), "DISTINCT state");
    }

    #[test]
    fn write_condition_appends_values() {
        let mut out = String::new();
        let mut params = ParamList::new();
        like("%son").write_condition("last_name", &mut out, &mut params);
        assert_eq!(out, "last_name LIKE ?");
        assert_eq!(params.len(), 1);

        out.clear();
        in_list(Vec::<i64>::new()).write_condition("id", &mut out, &mut params);
        assert_eq!(out, "1=0");
        assert_eq!(params.len(), 1);
    }
}
