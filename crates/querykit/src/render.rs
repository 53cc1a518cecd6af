//! Statement renderer.
//!
//! Sections are emitted in a fixed order and every placeholder value is
//! appended to the parameter list at the moment its `?` is written, so the
//! list always matches the text left to right:
//!
//! 1. head (`SELECT .. FROM` / `UPDATE` / `DELETE FROM` / `INSERT INTO .. VALUES`)
//! 2. JOIN (reads after the head; UPDATE before SET; never DELETE/INSERT)
//! 3. SET (UPDATE)
//! 4. WHERE
//! 5. ORDER BY
//! 6. GROUP BY
//! 7. LIMIT / OFFSET
//! 8. RETURNING (INSERT)

use crate::clause::render_where;
use crate::error::{DbError, DbResult};
use crate::param::ParamList;
use crate::statement::{Join, Limit, OrderBy, Statement, StatementKind, StatementState};

/// Render `state` against `table`.
///
/// A state without a statement kind renders the empty statement.
pub fn render(table: &str, state: &StatementState) -> DbResult<Statement> {
    let Some(kind) = state.kind else {
        return Ok(Statement::empty());
    };
    validate(table, kind, state)?;

    let mut sections: Vec<String> = Vec::new();
    let mut params = ParamList::new();

    match kind {
        StatementKind::Select | StatementKind::SelectRow => {
            sections.push(select_head(table, &state.columns));
            sections.extend(render_joins(&state.joins));
        }
        StatementKind::Update => {
            sections.push(format!("UPDATE {table}"));
            sections.extend(render_joins(&state.joins));
            sections.push(render_set(state, &mut params));
        }
        StatementKind::Delete => sections.push(format!("DELETE FROM {table}")),
        StatementKind::Insert => {
            sections.push(render_insert(table, state, &mut params));
            if let Some(col) = &state.returning {
                sections.push(format!("RETURNING {col}"));
            }
            return Ok(Statement::new(sections.join(" "), params));
        }
    }

    sections.extend(render_where(&state.where_groups, &mut params));
    sections.extend(render_order_by(&state.order_by));
    sections.extend(render_group_by(&state.group_by));
    sections.extend(render_limit(kind, state.limit));

    Ok(Statement::new(sections.join(" "), params))
}

fn validate(table: &str, kind: StatementKind, state: &StatementState) -> DbResult<()> {
    if table.trim().is_empty() {
        return Err(DbError::configuration("no table set for statement"));
    }
    if kind != StatementKind::Insert && state.returning.is_some() {
        return Err(DbError::configuration(format!(
            "RETURNING is only rendered for INSERT, not {}",
            kind.keyword()
        )));
    }
    if !matches!(kind, StatementKind::Update | StatementKind::Insert) {
        return Ok(());
    }
    if state.columns.is_empty() {
        return Err(DbError::configuration(format!(
            "{} requires at least one column",
            kind.keyword()
        )));
    }
    if state.columns.len() != state.values.len() {
        return Err(DbError::configuration(format!(
            "{} columns({}) != values({})",
            kind.keyword(),
            state.columns.len(),
            state.values.len()
        )));
    }
    Ok(())
}

fn select_head(table: &str, columns: &[String]) -> String {
    if columns.is_empty() {
        format!("SELECT * FROM {table}")
    } else {
        format!("SELECT {} FROM {table}", columns.join(", "))
    }
}

fn render_joins(joins: &[Join]) -> Option<String> {
    if joins.is_empty() {
        return None;
    }
    let parts: Vec<String> = joins.iter().map(Join::to_string).collect();
    Some(parts.join(" "))
}

fn render_set(state: &StatementState, params: &mut ParamList) -> String {
    let mut pairs = Vec::with_capacity(state.columns.len());
    for (column, value) in state.columns.iter().zip(&state.values) {
        pairs.push(format!("{column} = ?"));
        params.push_param(value.clone());
    }
    format!("SET {}", pairs.join(", "))
}

fn render_insert(table: &str, state: &StatementState, params: &mut ParamList) -> String {
    params.extend(state.values.iter().cloned());
    let placeholders = vec!["?"; state.values.len()].join(", ");
    format!(
        "INSERT INTO {table} ({}) VALUES ({placeholders})",
        state.columns.join(", ")
    )
}

fn render_order_by(order_by: &[OrderBy]) -> Option<String> {
    if order_by.is_empty() {
        return None;
    }
    let parts: Vec<String> = order_by
        .iter()
        .map(|o| format!("{} {}", o.column, o.direction.as_str()))
        .collect();
    Some(format!("ORDER BY {}", parts.join(", ")))
}

fn render_group_by(group_by: &[String]) -> Option<String> {
    if group_by.is_empty() {
        return None;
    }
    Some(format!("GROUP BY {}", group_by.join(", ")))
}

fn render_limit(kind: StatementKind, limit: Limit) -> Option<String> {
    if limit.limit == 0 {
        return None;
    }
    if kind.is_read() {
        Some(format!("LIMIT {} OFFSET {}", limit.limit, limit.offset))
    } else {
        Some(format!("LIMIT {}", limit.limit))
    }
}
