//! Typed leaf values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use logsearch_types::Field;

/// Single comparison value of a match or term leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Integer(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<&String> for Scalar {
    fn from(s: &String) -> Self {
        Scalar::Text(s.clone())
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<i32> for Scalar {
    fn from(i: i32) -> Self {
        Scalar::Integer(i64::from(i))
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Integer(i)
    }
}

impl From<u32> for Scalar {
    fn from(i: u32) -> Self {
        Scalar::Integer(i64::from(i))
    }
}

impl From<f64> for Scalar {
    fn from(x: f64) -> Self {
        Scalar::Float(x)
    }
}

/// Timestamps are indexed as epoch milliseconds (`timeMillis`).
impl From<DateTime<Utc>> for Scalar {
    fn from(t: DateTime<Utc>) -> Self {
        Scalar::Integer(t.timestamp_millis())
    }
}

/// Inclusive bounds of a range leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeValue {
    pub from: Scalar,
    pub to: Scalar,
}

impl RangeValue {
    pub fn new(from: impl Into<Scalar>, to: impl Into<Scalar>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Fields a query-string leaf searches.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum QueryTarget {
    /// Every eligible field of the index
    #[default]
    AllFields,
    /// A single default field
    Field(Field),
    /// An explicit field list
    Fields(Vec<Field>),
}

impl QueryTarget {
    /// The single bound field, if there is exactly one.
    pub fn single(&self) -> Option<Field> {
        match self {
            QueryTarget::Field(f) => Some(*f),
            QueryTarget::Fields(fields) if fields.len() == 1 => Some(fields[0]),
            _ => None,
        }
    }

    /// All explicitly bound fields (empty for `AllFields`).
    pub fn fields(&self) -> Vec<Field> {
        match self {
            QueryTarget::AllFields => Vec::new(),
            QueryTarget::Field(f) => vec![*f],
            QueryTarget::Fields(fields) => fields.clone(),
        }
    }

    pub(crate) fn paths(&self) -> Vec<String> {
        self.fields().iter().map(|f| f.path().to_string()).collect()
    }
}

impl From<Field> for QueryTarget {
    fn from(field: Field) -> Self {
        QueryTarget::Field(field)
    }
}

impl From<Vec<Field>> for QueryTarget {
    fn from(fields: Vec<Field>) -> Self {
        if fields.is_empty() {
            QueryTarget::AllFields
        } else {
            QueryTarget::Fields(fields)
        }
    }
}

impl From<&[Field]> for QueryTarget {
    fn from(fields: &[Field]) -> Self {
        QueryTarget::from(fields.to_vec())
    }
}

/// How terms of an analyzed query combine when no explicit operator is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DefaultOperator {
    And,
    Or,
}

impl DefaultOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefaultOperator::And => "AND",
            DefaultOperator::Or => "OR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(Scalar::from("error"), Scalar::Text("error".to_string()));
        assert_eq!(Scalar::from(42), Scalar::Integer(42));
        assert_eq!(Scalar::from(true), Scalar::Bool(true));
        let t = Utc.timestamp_millis_opt(1_000).unwrap();
        assert_eq!(Scalar::from(t), Scalar::Integer(1_000));
    }

    #[test]
    fn test_scalar_serializes_untagged() {
        assert_eq!(serde_json::to_string(&Scalar::from("x")).unwrap(), "\"x\"");
        assert_eq!(serde_json::to_string(&Scalar::from(7)).unwrap(), "7");
        assert_eq!(serde_json::to_string(&Scalar::from(2.5)).unwrap(), "2.5");
    }

    #[test]
    fn test_query_target_from_fields() {
        assert_eq!(QueryTarget::from(Vec::new()), QueryTarget::AllFields);
        assert_eq!(
            QueryTarget::from(vec![Field::Message]).single(),
            Some(Field::Message)
        );
        let many = QueryTarget::from(vec![Field::Message, Field::LoggerName]);
        assert_eq!(many.single(), None);
        assert_eq!(many.paths(), vec!["message", "loggerName"]);
    }
}
