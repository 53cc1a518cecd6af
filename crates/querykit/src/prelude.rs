//! Convenient imports for typical `querykit` usage.
//!
//! ```ignore
//! use querykit::prelude::*;
//! ```

pub use crate::fragment;
pub use crate::params;
pub use crate::{
    Clause, ConnectionConfig, DbAdapter, DbError, DbResult, Direction, FromRow, GenericClient,
    JoinKind, Logic, RowExt, Statement, TableDetails, WhereGroup,
};

#[cfg(feature = "pool")]
pub use crate::{connect, create_pool};
