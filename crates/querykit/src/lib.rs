//! # querykit
//!
//! A small SQL statement builder for Postgres.
//!
//! A [`DbAdapter`] is bound to one table. Callers pick a statement kind,
//! add WHERE groups, JOINs, ORDER BY, GROUP BY and LIMIT, then build or
//! execute. The result is statement text with `?` placeholders plus one
//! ordered parameter list; the `i`-th value always binds the `i`-th
//! placeholder.
//!
//! ```ignore
//! use querykit::prelude::*;
//!
//! let pool = querykit::connect(&ConnectionConfig::new("app", "secret", "shop")).await?;
//! let client = pool.get().await?;
//!
//! let mut customers = DbAdapter::for_table("customers");
//!
//! // SELECT customer_id, last_name FROM customers WHERE (state = ? AND last_name = ?)
//! let rows = customers
//!     .select_columns(["customer_id", "last_name"])
//!     .where_group(WhereGroup::and(vec![
//!         Clause::and("state", fragment::eq("California")),
//!         Clause::and("last_name", fragment::eq("Johnson")),
//!     ]))
//!     .exec_select(&client)
//!     .await?;
//!
//! // UPDATE customers SET status = ? WHERE (customer_id IN (?, ?))
//! customers
//!     .update(["status"], params!["inactive"])
//!     .where_group(WhereGroup::and(vec![Clause::and(
//!         "customer_id",
//!         fragment::in_list([4_i64, 8]),
//!     )]))
//!     .exec_update(&client)
//!     .await?;
//! ```
//!
//! Executing against Postgres numbers the placeholders (`$1`, `$2`, ...)
//! just before hand-off; see [`placeholder::to_numbered`].
//!
//! ## Dialect
//!
//! Rendering follows a fixed, MySQL-flavoured layout and does not adapt it
//! to the server. Postgres rejects these forms at execution time:
//!
//! - `UPDATE t INNER JOIN .. SET ..` (joins on UPDATE)
//! - `DELETE FROM t .. LIMIT n`
//! - `MATCH(..) AGAINST(?)` and the `YEAR(..)` function wrapper
//! - ORDER BY together with GROUP BY, since ORDER BY renders first
//!
//! Build these statements for inspection or for other drivers, but do not
//! send them through the bundled Postgres clients.

pub mod adapter;
pub mod clause;
pub mod client;
pub mod config;
pub mod error;
pub mod fragment;
pub mod param;
pub mod placeholder;
pub mod prelude;
pub mod render;
pub mod row;
pub mod statement;

pub use adapter::DbAdapter;
pub use clause::{Clause, Logic, WhereGroup};
pub use client::GenericClient;
pub use config::{ConnectionConfig, TableDetails};
pub use error::{DbError, DbResult};
pub use fragment::{Fragment, Operator, SqlFunction};
pub use param::{Param, ParamList};
pub use row::{FromRow, RowExt};
pub use statement::{
    Direction, Join, JoinKind, Limit, OrderBy, Statement, StatementKind, StatementState,
};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{connect, create_pool, create_pool_with_manager_config, create_pool_with_tls};
