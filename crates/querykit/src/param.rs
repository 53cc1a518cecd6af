//! Parameter storage for positional placeholders.

use std::fmt;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// A clone-friendly bound value.
///
/// `Debug` forwards to the wrapped value so rendered statements can be logged
/// together with their parameters.
#[derive(Clone)]
pub struct Param(pub(crate) Arc<dyn ToSql + Send + Sync>);

impl Param {
    /// Wrap any `ToSql` value.
    pub fn new<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        Param(Arc::new(value))
    }

    /// Borrow the value as a driver-facing trait object.
    pub fn as_sql(&self) -> &(dyn ToSql + Sync) {
        &*self.0 as &(dyn ToSql + Sync)
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// Ordered parameter list. Position `i` binds the `i`-th placeholder.
#[derive(Clone, Default)]
pub struct ParamList {
    params: Vec<Param>,
}

impl ParamList {
    /// Create a new empty parameter list.
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Add a value and return its 1-based position.
    pub fn push<T: ToSql + Send + Sync + 'static>(&mut self, value: T) -> usize {
        self.push_param(Param::new(value))
    }

    /// Add a pre-wrapped Param and return its 1-based position.
    pub fn push_param(&mut self, param: Param) -> usize {
        self.params.push(param);
        self.params.len()
    }

    /// Append parameters in iteration order.
    pub fn extend(&mut self, params: impl IntoIterator<Item = Param>) {
        self.params.extend(params);
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Param> {
        self.params.iter()
    }

    /// All parameters as references for tokio-postgres.
    pub fn as_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(Param::as_sql).collect()
    }

    pub fn clear(&mut self) {
        self.params.clear();
    }
}

impl fmt::Debug for ParamList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.params).finish()
    }
}

impl<'a> IntoIterator for &'a ParamList {
    type Item = &'a Param;
    type IntoIter = std::slice::Iter<'a, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

/// Build a `Vec<Param>` from heterogeneous values.
///
/// ```ignore
/// adapter.update(["status", "score"], params!["inactive", 0_i32]);
/// ```
#[macro_export]
macro_rules! params {
    ($($value:expr),* $(,)?) => {
        vec![$($crate::Param::new($value)),*]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_macro_wraps_each_value() {
        let values: Vec<Param> = crate::params!["a", 1_i64, true];
        assert_eq!(format!("{values:?}"), r#"["a", 1, true]"#);
        let empty: Vec<Param> = crate::params![];
        assert!(empty.is_empty());
    }

    #[test]
    fn push_returns_one_based_position() {
        let mut params = ParamList::new();
        assert_eq!(params.push("California"), 1);
        assert_eq!(params.push(4500_i64), 2);
        assert_eq!(params.len(), 2);
        assert_eq!(params.as_refs().len(), 2);
    }

    #[test]
    fn debug_shows_values_in_order() {
        let mut params = ParamList::new();
        params.push("Johnson");
        params.push(7_i32);
        assert_eq!(format!("{params:?}"), r#"["Johnson", 7]"#);
    }
}
