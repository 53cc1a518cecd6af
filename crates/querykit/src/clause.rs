//! WHERE clause model: conditions grouped into parenthesized groups.
//!
//! ```ignore
//! use querykit::{Clause, WhereGroup, fragment};
//!
//! // (state = ? AND last_name = ?) OR (customer_id > ?)
//! adapter
//!     .where_group(WhereGroup::and(vec![
//!         Clause::and("state", fragment::eq("California")),
//!         Clause::and("last_name", fragment::eq("Johnson")),
//!     ]))
//!     .where_group(WhereGroup::or(vec![Clause::and(
//!         "customer_id",
//!         fragment::gt(4500_i64),
//!     )]));
//! ```

use crate::fragment::Fragment;
use crate::param::ParamList;
use std::fmt;

/// Boolean connective between conditions or groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Logic {
    #[default]
    And,
    Or,
}

impl Logic {
    pub fn as_str(self) -> &'static str {
        match self {
            Logic::And => "AND",
            Logic::Or => "OR",
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One condition inside a [`WhereGroup`].
///
/// `logic` joins this condition to the *next* one in its group and is
/// ignored on the last condition.
#[derive(Debug, Clone)]
pub struct Clause {
    pub logic: Logic,
    pub column: String,
    pub fragment: Fragment,
}

impl Clause {
    pub fn new(logic: Logic, column: impl Into<String>, fragment: Fragment) -> Self {
        Self {
            logic,
            column: column.into(),
            fragment,
        }
    }

    /// Condition followed by `AND`.
    pub fn and(column: impl Into<String>, fragment: Fragment) -> Self {
        Self::new(Logic::And, column, fragment)
    }

    /// Condition followed by `OR`.
    pub fn or(column: impl Into<String>, fragment: Fragment) -> Self {
        Self::new(Logic::Or, column, fragment)
    }
}

/// A parenthesized set of conditions.
///
/// `logic` joins this group to the *previous* group and is ignored on the
/// first rendered group.
#[derive(Debug, Clone, Default)]
pub struct WhereGroup {
    pub logic: Logic,
    pub clauses: Vec<Clause>,
}

impl WhereGroup {
    pub fn new(logic: Logic, clauses: Vec<Clause>) -> Self {
        Self { logic, clauses }
    }

    /// Group preceded by `AND`.
    pub fn and(clauses: Vec<Clause>) -> Self {
        Self::new(Logic::And, clauses)
    }

    /// Group preceded by `OR`.
    pub fn or(clauses: Vec<Clause>) -> Self {
        Self::new(Logic::Or, clauses)
    }

    /// Append a condition.
    pub fn push(&mut self, clause: Clause) -> &mut Self {
        self.clauses.push(clause);
        self
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Render `(c1 LOGIC c2 ...)` and append the bound values in placeholder order.
    pub(crate) fn write_sql(&self, out: &mut String, params: &mut ParamList) {
        out.push('(');
        let last = self.clauses.len().saturating_sub(1);
        for (i, clause) in self.clauses.iter().enumerate() {
            clause.fragment.write_condition(&clause.column, out, params);
            if i < last {
                out.push(' ');
                out.push_str(clause.logic.as_str());
                out.push(' ');
            }
        }
        out.push(')');
    }
}

/// Render `WHERE (...) LOGIC (...)` for the non-empty groups, or `None`.
pub(crate) fn render_where(groups: &[WhereGroup], params: &mut ParamList) -> Option<String> {
    let mut out = String::new();
    for group in groups.iter().filter(|g| !g.is_empty()) {
        if out.is_empty() {
            out.push_str("WHERE ");
        } else {
            out.push(' ');
            out.push_str(group.logic.as_str());
            out.push(' ');
        }
        group.write_sql(&mut out, params);
    }
    (!out.is_empty()).then_some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment;

    #[test]
    fn last_condition_has_no_connective() {
        let group = WhereGroup::and(vec![
            Clause::or("a", fragment::eq(1_i32)),
            Clause::and("b", fragment::eq(2_i32)),
            Clause::or("c", fragment::eq(3_i32)),
        ]);
        let mut out = String::new();
        let mut params = ParamList::new();
        group.write_sql(&mut out, &mut params);
        assert_eq!(out, "(a = ? OR b = ? AND c = ?)");
        assert_eq!(format!("{params:?}"), "[1, 2, 3]");
    }

    #[test]
    fn first_group_logic_is_omitted() {
        let groups = vec![
            WhereGroup::or(vec![Clause::and("a", fragment::eq(1_i32))]),
            WhereGroup::or(vec![Clause::and("b", fragment::eq(2_i32))]),
            WhereGroup::and(vec![Clause::and("c", fragment::is_null())]),
        ];
        let mut params = ParamList::new();
        let sql = render_where(&groups, &mut params);
        assert_eq!(
            sql.as_deref(),
            Some("WHERE (a = ?) OR (b = ?) AND (c IS NULL)")
        );
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn empty_groups_are_skipped() {
        let groups = vec![
            WhereGroup::and(Vec::new()),
            WhereGroup::or(vec![Clause::and("a", fragment::eq(1_i32))]),
        ];
        let mut params = ParamList::new();
        assert_eq!(
            render_where(&groups, &mut params).as_deref(),
            Some("WHERE (a = ?)")
        );

        assert_eq!(render_where(&[], &mut params), None);
        assert_eq!(render_where(&[WhereGroup::default()], &mut params), None);
    }
}
