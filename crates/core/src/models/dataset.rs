use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::CoreError;

/// A named column of values to be charted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataField {
    pub name: String,
    pub values: Vec<Value>,
}

/// Field name → sequence of values, in insertion order.
///
/// Insertion order is significant: the line chart falls back to the first
/// field as its x-axis when no temporal field exists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct ChartableDataset {
    fields: Vec<DataField>,
}

impl ChartableDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, replacing any existing field of the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<Value>) {
        let name = name.into();
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(existing) => existing.values = values,
            None => self.fields.push(DataField { name, values }),
        }
    }

    /// Builder-style `insert`.
    pub fn with_field<V: Into<Value>>(mut self, name: impl Into<String>, values: Vec<V>) -> Self {
        self.insert(name, values.into_iter().map(Into::into).collect());
        self
    }

    /// Parse a request body. Must be a non-empty JSON object; members that
    /// are not arrays are dropped.
    pub fn from_json(value: Value) -> Result<Self, CoreError> {
        match value {
            Value::Object(map) if !map.is_empty() => Ok(Self::from(map)),
            Value::Object(_) => Err(CoreError::ValidationError("Data is required".into())),
            _ => Err(CoreError::ValidationError(
                "Data must be a dictionary/object".into(),
            )),
        }
    }

    pub fn get(&self, name: &str) -> Option<&[Value]> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.values.as_slice())
    }

    pub fn fields(&self) -> &[DataField] {
        &self.fields
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Map<String, Value>> for ChartableDataset {
    fn from(map: Map<String, Value>) -> Self {
        let mut dataset = Self::new();
        for (name, value) in map {
            match value {
                Value::Array(values) => dataset.insert(name, values),
                _ => tracing::debug!(field = %name, "dropping non-array dataset member"),
            }
        }
        dataset
    }
}

impl From<ChartableDataset> for Map<String, Value> {
    fn from(dataset: ChartableDataset) -> Self {
        dataset
            .fields
            .into_iter()
            .map(|f| (f.name, Value::Array(f.values)))
            .collect()
    }
}
