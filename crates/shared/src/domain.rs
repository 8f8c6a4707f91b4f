use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DomainError;

/// Server-assigned identity of a resource. Backends hand out either numeric
/// or string keys; both render as a single path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Int(i64),
    Str(String),
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Str(value) => f.write_str(value),
        }
    }
}

impl From<i64> for ResourceId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl ResourceId {
    /// Parses a route segment; numeric segments become `Int` so they compare
    /// equal to ids decoded from JSON numbers.
    pub fn from_route(segment: &str) -> Self {
        match segment.parse::<i64>() {
            Ok(value) => Self::Int(value),
            Err(_) => Self::Str(segment.to_string()),
        }
    }
}

/// A record managed by the list. Only `id` is interpreted; every other field
/// travels through untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ResourceId>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Resource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(id: impl Into<ResourceId>) -> Self {
        Self {
            id: Some(id.into()),
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = DomainError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ASC" | "ASCENDING" => Ok(Self::Asc),
            "DESC" | "DESCENDING" => Ok(Self::Desc),
            _ => Err(DomainError::UnknownSortDirection(raw.to_string())),
        }
    }
}

/// Name of a field the backend accepts in `sortBy`. Which names are permitted
/// is decided by [`SortFields`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortField(String);

impl SortField {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The closed set of sortable fields for one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortFields {
    permitted: Vec<String>,
}

impl SortFields {
    pub fn new<I, S>(permitted: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let permitted: Vec<String> = permitted
            .into_iter()
            .map(Into::into)
            .map(|name: String| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        if permitted.is_empty() {
            return Err(DomainError::NoSortableFields);
        }
        Ok(Self { permitted })
    }

    pub fn field(&self, name: &str) -> Result<SortField, DomainError> {
        let name = name.trim();
        self.permitted
            .iter()
            .find(|candidate| candidate.as_str() == name)
            .map(|candidate| SortField(candidate.clone()))
            .ok_or_else(|| DomainError::UnsupportedSortField(name.to_string()))
    }

    /// `name` when permitted, otherwise the first permitted field.
    pub fn field_or_first(&self, name: &str) -> SortField {
        self.field(name)
            .unwrap_or_else(|_| SortField(self.permitted[0].clone()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.permitted.iter().map(String::as_str)
    }
}

impl Default for SortFields {
    fn default() -> Self {
        Self {
            permitted: vec!["firstName".to_string(), "lastName".to_string()],
        }
    }
}

/// Page sizes offered by the list view.
pub const PAGE_SIZE_OPTIONS: [u32; 4] = [5, 10, 25, 50];

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
