//! Row mapping traits

use crate::error::{DbError, DbResult};
use tokio_postgres::Row;
use tokio_postgres::types::Type;

/// Trait for types that can be built from a database row
pub trait FromRow: Sized {
    /// Convert a database row into Self
    fn from_row(row: &Row) -> DbResult<Self>;
}

/// Extension trait for Row to provide typed access
pub trait RowExt {
    /// Try to get a column value, returning DbError::Decode on failure
    fn try_get_column<T>(&self, column: &str) -> DbResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>;

    /// Try to get a value by position, returning DbError::Decode on failure
    fn try_get_index<T>(&self, index: usize) -> DbResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>;

    /// Read an integer identity column as `i64`, widening INT2 and INT4.
    fn try_get_identity(&self, column: &str) -> DbResult<i64>;
}

/// Integer column types accepted as identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IdentityType {
    Int2,
    Int4,
    Int8,
}

impl IdentityType {
    fn of(ty: &Type) -> Option<Self> {
        if *ty == Type::INT2 {
            Some(Self::Int2)
        } else if *ty == Type::INT4 {
            Some(Self::Int4)
        } else if *ty == Type::INT8 {
            Some(Self::Int8)
        } else {
            None
        }
    }
}

impl RowExt for Row {
    fn try_get_column<T>(&self, column: &str) -> DbResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| DbError::decode(column, e.to_string()))
    }

    fn try_get_index<T>(&self, index: usize) -> DbResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>,
    {
        self.try_get(index).map_err(|e| {
            let column = self
                .columns()
                .get(index)
                .map(|c| c.name().to_string())
                .unwrap_or_else(|| format!("#{index}"));
            DbError::decode(column, e.to_string())
        })
    }

    fn try_get_identity(&self, column: &str) -> DbResult<i64> {
        let ty = self
            .columns()
            .iter()
            .find(|c| c.name() == column)
            .map(|c| c.type_().clone())
            .ok_or_else(|| DbError::decode(column, "column not in row"))?;
        match IdentityType::of(&ty) {
            Some(IdentityType::Int2) => self.try_get_column::<i16>(column).map(i64::from),
            Some(IdentityType::Int4) => self.try_get_column::<i32>(column).map(i64::from),
            Some(IdentityType::Int8) => self.try_get_column::<i64>(column),
            None => Err(DbError::decode(
                column,
                format!("expected an integer identity, found {ty}"),
            )),
        }
    }
}
