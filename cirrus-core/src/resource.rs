//! Resource - Typed CloudFormation resources and their rendered form

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value, json};

use crate::template::TemplateError;

/// Logical ID of a resource within a template
///
/// CloudFormation requires logical IDs to be ASCII alphanumeric.
/// `from_name` derives one from a free-form construct name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogicalId(String);

impl LogicalId {
    /// Maximum length CloudFormation accepts for a logical ID
    pub const MAX_LEN: usize = 255;

    pub fn new(id: impl Into<String>) -> Result<Self, TemplateError> {
        let id = id.into();
        if id.is_empty()
            || id.len() > Self::MAX_LEN
            || !id.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(TemplateError::InvalidLogicalId(id));
        }
        Ok(Self(id))
    }

    /// Derive a logical ID from a free-form name
    /// e.g. "web-servers" -> "WebServers"
    pub fn from_name(name: &str) -> Self {
        use heck::ToUpperCamelCase;

        let spaced: String = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
            .collect();
        let mut id = spaced.to_upper_camel_case();
        if id.is_empty() {
            id = "Resource".to_string();
        }
        id.truncate(Self::MAX_LEN);
        Self(id)
    }

    /// Append a derived suffix, e.g. `WebServers` + "scale-up" -> `WebServersScaleUp`
    pub fn child(&self, suffix: &str) -> Self {
        let mut id = format!("{}{}", self.0, Self::from_name(suffix).0);
        id.truncate(Self::MAX_LEN);
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for LogicalId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// What CloudFormation does with the physical resource when it leaves the stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeletionPolicy {
    Delete,
    Retain,
    Snapshot,
}

/// A typed CloudFormation resource
///
/// Implementors expose their CloudFormation type name and render their
/// `Properties` block; the provided `render` packages everything into a
/// [`ResourceNode`] ready to be placed in a template.
pub trait CfnResource {
    /// CloudFormation type name, e.g. `AWS::AutoScaling::AutoScalingGroup`
    fn type_name(&self) -> &'static str;

    /// The `Properties` block
    fn properties(&self) -> Result<Value, TemplateError>;

    /// Optional `CreationPolicy` block
    fn creation_policy(&self) -> Option<Value> {
        None
    }

    /// Optional `UpdatePolicy` block
    fn update_policy(&self) -> Option<Value> {
        None
    }

    /// Logical IDs this resource explicitly depends on
    fn depends_on(&self) -> Vec<LogicalId> {
        Vec::new()
    }

    /// Optional `DeletionPolicy`
    fn deletion_policy(&self) -> Option<DeletionPolicy> {
        None
    }

    fn render(&self) -> Result<ResourceNode, TemplateError> {
        Ok(ResourceNode {
            type_name: self.type_name().to_string(),
            properties: self.properties()?,
            creation_policy: self.creation_policy(),
            update_policy: self.update_policy(),
            depends_on: self.depends_on(),
            deletion_policy: self.deletion_policy(),
        })
    }
}

/// Rendered form of a resource
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceNode {
    pub type_name: String,
    pub properties: Value,
    pub creation_policy: Option<Value>,
    pub update_policy: Option<Value>,
    pub depends_on: Vec<LogicalId>,
    pub deletion_policy: Option<DeletionPolicy>,
}

impl ResourceNode {
    /// Emit the template fragment for this resource
    ///
    /// Absent blocks are omitted entirely, never emitted empty.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("Type".to_string(), json!(self.type_name));

        let has_properties = match &self.properties {
            Value::Object(props) => !props.is_empty(),
            Value::Null => false,
            _ => true,
        };
        if has_properties {
            map.insert("Properties".to_string(), self.properties.clone());
        }
        if !self.depends_on.is_empty() {
            map.insert("DependsOn".to_string(), json!(self.depends_on));
        }
        if let Some(policy) = &self.creation_policy {
            map.insert("CreationPolicy".to_string(), policy.clone());
        }
        if let Some(policy) = &self.update_policy {
            map.insert("UpdatePolicy".to_string(), policy.clone());
        }
        if let Some(policy) = &self.deletion_policy {
            map.insert("DeletionPolicy".to_string(), json!(policy));
        }

        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Queue;

    impl CfnResource for Queue {
        fn type_name(&self) -> &'static str {
            "AWS::SQS::Queue"
        }

        fn properties(&self) -> Result<Value, TemplateError> {
            Ok(json!({"QueueName": "jobs"}))
        }
    }

    #[test]
    fn logical_id_accepts_alphanumeric() {
        assert!(LogicalId::new("WebServers1").is_ok());
    }

    #[test]
    fn logical_id_rejects_empty() {
        assert!(LogicalId::new("").is_err());
    }

    #[test]
    fn logical_id_rejects_punctuation() {
        assert!(LogicalId::new("web-servers").is_err());
        assert!(LogicalId::new("web servers").is_err());
    }

    #[test]
    fn logical_id_from_name_pascal_cases() {
        assert_eq!(LogicalId::from_name("web-servers").as_str(), "WebServers");
        assert_eq!(LogicalId::from_name("api_fleet").as_str(), "ApiFleet");
        assert_eq!(LogicalId::from_name("Fleet").as_str(), "Fleet");
    }

    #[test]
    fn logical_id_from_name_falls_back_when_nothing_remains() {
        assert_eq!(LogicalId::from_name("--").as_str(), "Resource");
    }

    #[test]
    fn logical_id_child_appends_derived_suffix() {
        let id = LogicalId::from_name("web");
        assert_eq!(id.child("scale-up").as_str(), "WebScaleUp");
    }

    #[test]
    fn render_produces_type_and_properties() {
        let node = Queue.render().unwrap();
        assert_eq!(
            node.to_value(),
            json!({
                "Type": "AWS::SQS::Queue",
                "Properties": {"QueueName": "jobs"},
            })
        );
    }

    #[test]
    fn empty_properties_block_is_omitted() {
        let node = ResourceNode {
            type_name: "AWS::EC2::EIP".to_string(),
            properties: json!({}),
            creation_policy: None,
            update_policy: None,
            depends_on: Vec::new(),
            deletion_policy: None,
        };
        assert_eq!(node.to_value(), json!({"Type": "AWS::EC2::EIP"}));
    }

    #[test]
    fn depends_on_and_policies_are_emitted() {
        let node = ResourceNode {
            type_name: "AWS::SQS::Queue".to_string(),
            properties: json!({"QueueName": "jobs"}),
            creation_policy: Some(json!({"ResourceSignal": {"Count": 1}})),
            update_policy: None,
            depends_on: vec![LogicalId::from_name("other")],
            deletion_policy: Some(DeletionPolicy::Retain),
        };
        let value = node.to_value();
        assert_eq!(value["DependsOn"], json!(["Other"]));
        assert_eq!(value["CreationPolicy"]["ResourceSignal"]["Count"], 1);
        assert_eq!(value["DeletionPolicy"], "Retain");
    }
}
