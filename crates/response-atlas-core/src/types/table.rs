//! Minimal column-oriented input table.
//!
//! The pipeline owns no ingestion format; callers build an [`InputTable`]
//! from whatever source they have (CSV, database, form submissions). One
//! designated column holds the free text; every other column is an opaque
//! demographic value carried through untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::InputError;

/// A named column of JSON values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Row values, in input order.
    pub values: Vec<Value>,
}

/// Column-oriented input for one pipeline run.
///
/// # Example
///
/// ```
/// use response_atlas_core::types::InputTable;
///
/// let table = InputTable::from_responses(vec![
///     Some("Great service".to_string()),
///     None, // missing answers are allowed; they become empty strings
/// ]);
/// assert_eq!(table.n_rows(), 2);
/// assert!(table.column("responses").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputTable {
    columns: Vec<Column>,
}

impl InputTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table with just a `responses` column.
    pub fn from_responses(responses: Vec<Option<String>>) -> Self {
        let values = responses
            .into_iter()
            .map(|r| r.map(Value::String).unwrap_or(Value::Null))
            .collect();
        Self {
            columns: vec![Column {
                name: "responses".to_string(),
                values,
            }],
        }
    }

    /// Append a column.
    #[must_use]
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<Value>) -> Self {
        self.columns.push(Column {
            name: name.into(),
            values,
        });
        self
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// All columns except `text_column`, in input order.
    pub fn demographic_columns(&self, text_column: &str) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|c| c.name != text_column)
            .collect()
    }

    /// Number of rows (length of the longest column).
    pub fn n_rows(&self) -> usize {
        self.columns.iter().map(|c| c.values.len()).max().unwrap_or(0)
    }

    /// Extract the text column as plain strings.
    ///
    /// Missing values (`null`) and non-string values become empty strings;
    /// absence of data is never a failure, absence of the column is.
    ///
    /// # Errors
    ///
    /// - `InputError::MissingColumn` if `name` is not present
    /// - `InputError::EmptyTable` if the table has no rows
    pub fn text_values(&self, name: &str) -> Result<Vec<String>, InputError> {
        if self.n_rows() == 0 {
            return Err(InputError::EmptyTable);
        }
        let column = self.column(name).ok_or_else(|| InputError::MissingColumn {
            column: name.to_string(),
        })?;
        Ok(column
            .values
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                _ => String::new(),
            })
            .collect())
    }
}
