use std::collections::HashMap;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::types::RowValues;

/// Column layout shared by every row of one drain.
#[derive(Debug, Clone, Default)]
pub(crate) struct RowShape {
    column_names: Arc<Vec<String>>,
    column_index_cache: Arc<HashMap<String, usize>>,
}

impl RowShape {
    pub(crate) fn new(column_names: Vec<String>) -> Self {
        // A later duplicate overwrites the earlier index, so the last column of a name wins.
        let cache = column_names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect::<HashMap<_, _>>();
        Self {
            column_names: Arc::new(column_names),
            column_index_cache: Arc::new(cache),
        }
    }

    pub(crate) fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub(crate) fn width(&self) -> usize {
        self.column_names.len()
    }

    pub(crate) fn row(&self, values: Vec<RowValues>) -> ResultRow {
        ResultRow {
            column_names: Arc::clone(&self.column_names),
            values,
            column_index_cache: Arc::clone(&self.column_index_cache),
        }
    }
}

/// One fetched row: column name to value, in column order.
///
/// Each row owns its values; rows handed out by a drain never alias the driver's
/// output buffer or each other.
#[derive(Debug, Clone, Default)]
pub struct ResultRow {
    column_names: Arc<Vec<String>>,
    values: Vec<RowValues>,
    column_index_cache: Arc<HashMap<String, usize>>,
}

impl ResultRow {
    /// A row with no columns, returned by `fetch_one` when nothing matched.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a row from parallel name/value lists.
    #[must_use]
    pub fn new(column_names: Vec<String>, values: Vec<RowValues>) -> Self {
        RowShape::new(column_names).row(values)
    }

    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        self.column_index_cache.get(column_name).copied()
    }

    /// Value of the named column. With duplicate names the last one wins.
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.get_column_index(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.values.get(index)
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.column_names
    }

    #[must_use]
    pub fn values(&self) -> &[RowValues] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RowValues)> {
        self.column_names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    /// Owned name/value mapping.
    #[must_use]
    pub fn into_map(self) -> HashMap<String, RowValues> {
        let names = Arc::unwrap_or_clone(self.column_names);
        names.into_iter().zip(self.values).collect()
    }
}

impl PartialEq for ResultRow {
    fn eq(&self, other: &Self) -> bool {
        self.column_names == other.column_names && self.values == other.values
    }
}

impl Serialize for ResultRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
