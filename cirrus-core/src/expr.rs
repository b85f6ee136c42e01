//! Expr - String-valued template expressions
//!
//! Most properties are plain strings, but properties that point at another
//! resource in the same template are emitted as `Ref` / `Fn::GetAtt`
//! intrinsics so CloudFormation resolves them at deploy time.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::resource::LogicalId;

/// A string-valued template expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StringExpr {
    /// Literal string value
    Literal(String),
    /// `{"Ref": "<logical id>"}`
    Ref(LogicalId),
    /// `{"Fn::GetAtt": ["<logical id>", "<attribute>"]}`
    GetAtt(LogicalId, String),
}

impl StringExpr {
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    pub fn reference(id: &LogicalId) -> Self {
        Self::Ref(id.clone())
    }

    pub fn get_att(id: &LogicalId, attribute: impl Into<String>) -> Self {
        Self::GetAtt(id.clone(), attribute.into())
    }
}

impl From<&str> for StringExpr {
    fn from(value: &str) -> Self {
        Self::Literal(value.to_string())
    }
}

impl From<String> for StringExpr {
    fn from(value: String) -> Self {
        Self::Literal(value)
    }
}

impl From<&LogicalId> for StringExpr {
    fn from(id: &LogicalId) -> Self {
        Self::Ref(id.clone())
    }
}

impl Serialize for StringExpr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Literal(value) => serializer.serialize_str(value),
            Self::Ref(id) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Ref", id.as_str())?;
                map.end()
            }
            Self::GetAtt(id, attribute) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::GetAtt", &[id.as_str(), attribute.as_str()])?;
                map.end()
            }
        }
    }
}
