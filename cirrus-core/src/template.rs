//! Template - An in-memory CloudFormation template under construction
//!
//! Resources are added under unique logical IDs; nothing is written
//! anywhere until the template is synthesized to JSON.

use std::collections::BTreeMap;

use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::resource::{CfnResource, LogicalId, ResourceNode};

/// Template format version understood by CloudFormation
pub const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";

/// Error raised while assembling or serializing a template
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("duplicate logical ID '{0}'")]
    DuplicateLogicalId(String),

    #[error("invalid logical ID '{0}': must be 1-255 ASCII alphanumeric characters")]
    InvalidLogicalId(String),

    #[error("duplicate output '{0}'")]
    DuplicateOutput(String),

    #[error("{resource}: required property '{property}' is missing")]
    MissingProperty {
        resource: &'static str,
        property: &'static str,
    },

    #[error("{resource}: {message}")]
    InvalidProperty {
        resource: &'static str,
        message: String,
    },

    #[error("template serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A stack output
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    pub value: Value,
    pub description: Option<String>,
    pub export_name: Option<String>,
}

impl Output {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            description: None,
            export_name: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_export_name(mut self, name: impl Into<String>) -> Self {
        self.export_name = Some(name.into());
        self
    }

    fn to_value(&self) -> Value {
        let mut map = Map::new();
        if let Some(description) = &self.description {
            map.insert("Description".to_string(), json!(description));
        }
        map.insert("Value".to_string(), self.value.clone());
        if let Some(name) = &self.export_name {
            map.insert("Export".to_string(), json!({"Name": name}));
        }
        Value::Object(map)
    }
}

/// CloudFormation template being assembled
#[derive(Debug, Clone, Default)]
pub struct Template {
    description: Option<String>,
    resources: BTreeMap<LogicalId, ResourceNode>,
    outputs: BTreeMap<String, Output>,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Render a typed resource and add it under the given logical ID
    pub fn add_resource(
        &mut self,
        id: LogicalId,
        resource: &dyn CfnResource,
    ) -> Result<(), TemplateError> {
        let node = resource.render()?;
        self.add_node(id, node)
    }

    /// Add an already-rendered resource node
    pub fn add_node(&mut self, id: LogicalId, node: ResourceNode) -> Result<(), TemplateError> {
        if self.resources.contains_key(&id) {
            return Err(TemplateError::DuplicateLogicalId(id.as_str().to_string()));
        }
        self.resources.insert(id, node);
        Ok(())
    }

    pub fn add_output(&mut self, name: impl Into<String>, output: Output) -> Result<(), TemplateError> {
        let name = name.into();
        if self.outputs.contains_key(&name) {
            return Err(TemplateError::DuplicateOutput(name));
        }
        self.outputs.insert(name, output);
        Ok(())
    }

    pub fn resource(&self, id: &LogicalId) -> Option<&ResourceNode> {
        self.resources.get(id)
    }

    pub fn resource_ids(&self) -> impl Iterator<Item = &LogicalId> {
        self.resources.keys()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Produce the template document
    pub fn synth(&self) -> Value {
        let mut map = Map::new();
        map.insert(
            "AWSTemplateFormatVersion".to_string(),
            json!(TEMPLATE_FORMAT_VERSION),
        );
        if let Some(description) = &self.description {
            map.insert("Description".to_string(), json!(description));
        }

        let mut resources = Map::new();
        for (id, node) in &self.resources {
            resources.insert(id.as_str().to_string(), node.to_value());
        }
        map.insert("Resources".to_string(), Value::Object(resources));

        if !self.outputs.is_empty() {
            let mut outputs = Map::new();
            for (name, output) in &self.outputs {
                outputs.insert(name.clone(), output.to_value());
            }
            map.insert("Outputs".to_string(), Value::Object(outputs));
        }

        Value::Object(map)
    }

    /// Pretty-printed JSON form of the template
    pub fn to_json(&self) -> Result<String, TemplateError> {
        Ok(serde_json::to_string_pretty(&self.synth())?)
    }
}

#[cfg(test)]
mod tests {
    use crate::resource::CfnResource;

    use super::*;

    struct Bucket {
        name: &'static str,
    }

    impl CfnResource for Bucket {
        fn type_name(&self) -> &'static str {
            "AWS::S3::Bucket"
        }

        fn properties(&self) -> Result<Value, TemplateError> {
            Ok(json!({"BucketName": self.name}))
        }
    }

    #[test]
    fn empty_template_synthesizes_empty_resources() {
        let template = Template::new();
        assert_eq!(
            template.synth(),
            json!({
                "AWSTemplateFormatVersion": "2010-09-09",
                "Resources": {},
            })
        );
    }

    #[test]
    fn description_appears_when_set() {
        let template = Template::new().with_description("web tier");
        assert_eq!(template.synth()["Description"], "web tier");
    }

    #[test]
    fn added_resource_appears_under_its_logical_id() {
        let mut template = Template::new();
        template
            .add_resource(LogicalId::from_name("assets"), &Bucket { name: "assets" })
            .unwrap();

        let doc = template.synth();
        assert_eq!(doc["Resources"]["Assets"]["Type"], "AWS::S3::Bucket");
        assert_eq!(
            doc["Resources"]["Assets"]["Properties"]["BucketName"],
            "assets"
        );
    }

    #[test]
    fn duplicate_logical_id_is_rejected() {
        let mut template = Template::new();
        let id = LogicalId::from_name("assets");
        template
            .add_resource(id.clone(), &Bucket { name: "assets" })
            .unwrap();

        let err = template
            .add_resource(id, &Bucket { name: "assets2" })
            .unwrap_err();
        assert!(matches!(err, TemplateError::DuplicateLogicalId(ref s) if s == "Assets"));
    }

    #[test]
    fn outputs_render_value_description_and_export() {
        let mut template = Template::new();
        template
            .add_output(
                "BucketName",
                Output::new(json!({"Ref": "Assets"}))
                    .with_description("name of the asset bucket")
                    .with_export_name("assets-bucket"),
            )
            .unwrap();

        let outputs = &template.synth()["Outputs"]["BucketName"];
        assert_eq!(outputs["Value"], json!({"Ref": "Assets"}));
        assert_eq!(outputs["Description"], "name of the asset bucket");
        assert_eq!(outputs["Export"]["Name"], "assets-bucket");
    }

    #[test]
    fn duplicate_output_is_rejected() {
        let mut template = Template::new();
        template
            .add_output("Name", Output::new(json!("a")))
            .unwrap();
        assert!(matches!(
            template.add_output("Name", Output::new(json!("b"))),
            Err(TemplateError::DuplicateOutput(_))
        ));
    }

    #[test]
    fn outputs_block_omitted_when_empty() {
        let template = Template::new();
        assert!(template.synth().get("Outputs").is_none());
    }
}
