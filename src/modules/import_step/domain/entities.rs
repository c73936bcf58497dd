use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque reference to an import session, owned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImportId(String);

impl ImportId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for ImportId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for ImportId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ImportId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Mapping from target field name to the source file column feeding it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectedColumns(BTreeMap<String, String>);

impl SelectedColumns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, target_field: impl Into<String>, source_column: impl Into<String>) -> Self {
        self.0.insert(target_field.into(), source_column.into());
        self
    }

    pub fn source_for(&self, target_field: &str) -> Option<&str> {
        self.0.get(target_field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SelectedColumns {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Columns added by the user that do not exist in the source file, with their fill value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddedColumns(BTreeMap<String, String>);

impl AddedColumns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn value_for(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AddedColumns {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Everything the parent view hands to the import step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepInputs {
    pub import_id: Option<ImportId>,
    pub selected_columns: SelectedColumns,
    pub added_columns: AddedColumns,
}

impl StepInputs {
    pub fn new(import_id: impl Into<ImportId>) -> Self {
        Self {
            import_id: Some(import_id.into()),
            ..Default::default()
        }
    }

    pub fn with_selected_columns(mut self, selected_columns: SelectedColumns) -> Self {
        self.selected_columns = selected_columns;
        self
    }

    pub fn with_added_columns(mut self, added_columns: AddedColumns) -> Self {
        self.added_columns = added_columns;
        self
    }
}

/// Result of the validation call. Only `total_columns` is interpreted here,
/// the rest of the body is kept as the backend sent it.
///
/// A body without an integer `total_columns` is still a valid response, the
/// count is simply unknown and importing stays blocked until a later
/// validation provides it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidDataResponse {
    #[serde(
        default,
        deserialize_with = "column_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_columns: Option<usize>,
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

impl ValidDataResponse {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.body.get(name)
    }
}

fn column_count<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_u64)
        .and_then(|count| usize::try_from(count).ok()))
}

/// Raw report returned by the import call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImportDataResponse(pub Value);

impl ImportDataResponse {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }
}

/// CSV document produced by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvExport {
    pub content: String,
    pub content_type: Option<String>,
    pub filename: Option<String>,
}

impl CsvExport {
    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }
}
