use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Comparison operators understood by the record store's filter language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterCondition {
    #[serde(rename = "~")] Like,
    #[serde(rename = "=")] Equal,
    #[serde(rename = "!=")] NotEqual,
    #[serde(rename = ">")] GreaterThan,
    #[serde(rename = ">=")] GreaterThanOrEqual,
    #[serde(rename = "<")] LessThan,
    #[serde(rename = "<=")] LessThanOrEqual,
}

impl FilterCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterCondition::Like => "~",
            FilterCondition::Equal => "=",
            FilterCondition::NotEqual => "!=",
            FilterCondition::GreaterThan => ">",
            FilterCondition::GreaterThanOrEqual => ">=",
            FilterCondition::LessThan => "<",
            FilterCondition::LessThanOrEqual => "<=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterClause {
    pub field_name: String,
    #[serde(deserialize_with = "scalar_as_string")]
    pub field_value: String,
    pub filter_condition: FilterCondition,
}

impl FilterClause {
    pub fn new(field_name: impl Into<String>, filter_condition: FilterCondition, field_value: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            field_value: field_value.into(),
            filter_condition,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "ASC", alias = "asc")]
    Asc,
    #[serde(rename = "DESC", alias = "desc")]
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortSpec {
    pub sort_field: String,
    pub sort_type: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self { sort_field: field.into(), sort_type: SortDirection::Asc }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self { sort_field: field.into(), sort_type: SortDirection::Desc }
    }
}

impl Default for SortSpec {
    /// Newest records first
    fn default() -> Self {
        Self::desc("created")
    }
}

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A validated search envelope
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub page: u32,
    pub size: u32,
    pub filters: Vec<FilterClause>,
    pub sort: SortSpec,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
            filters: Vec::new(),
            sort: SortSpec::default(),
        }
    }
}

/// Filter values are always rendered as quoted strings, so numbers and
/// booleans sent by clients are accepted and stringified.
fn scalar_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "fieldValue must be a scalar, got {}",
            other
        ))),
    }
}
