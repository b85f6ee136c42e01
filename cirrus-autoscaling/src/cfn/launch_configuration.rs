//! `AWS::AutoScaling::LaunchConfiguration`

use cirrus_core::expr::StringExpr;
use cirrus_core::resource::CfnResource;
use cirrus_core::template::TemplateError;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::types::EbsDeviceVolumeType;

/// Instance configuration a group launches from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CfnLaunchConfiguration {
    pub image_id: String,
    pub instance_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub associate_public_ip_address: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub block_device_mappings: Vec<BlockDeviceMapping>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ebs_optimized: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iam_instance_profile: Option<StringExpr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_monitoring: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kernel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_configuration_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_options: Option<MetadataOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement_tenancy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ram_disk_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub security_groups: Vec<StringExpr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spot_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_data: Option<UserData>,
}

impl CfnLaunchConfiguration {
    pub fn new(image_id: impl Into<String>, instance_type: impl Into<String>) -> Self {
        Self {
            image_id: image_id.into(),
            instance_type: instance_type.into(),
            associate_public_ip_address: None,
            block_device_mappings: Vec::new(),
            ebs_optimized: None,
            iam_instance_profile: None,
            instance_id: None,
            instance_monitoring: None,
            kernel_id: None,
            key_name: None,
            launch_configuration_name: None,
            metadata_options: None,
            placement_tenancy: None,
            ram_disk_id: None,
            security_groups: Vec::new(),
            spot_price: None,
            user_data: None,
        }
    }

    pub fn with_associate_public_ip_address(mut self, associate: bool) -> Self {
        self.associate_public_ip_address = Some(associate);
        self
    }

    pub fn with_block_device_mapping(mut self, mapping: BlockDeviceMapping) -> Self {
        self.block_device_mappings.push(mapping);
        self
    }

    pub fn with_ebs_optimized(mut self, optimized: bool) -> Self {
        self.ebs_optimized = Some(optimized);
        self
    }

    pub fn with_iam_instance_profile(mut self, profile: impl Into<StringExpr>) -> Self {
        self.iam_instance_profile = Some(profile.into());
        self
    }

    pub fn with_instance_monitoring(mut self, detailed: bool) -> Self {
        self.instance_monitoring = Some(detailed);
        self
    }

    pub fn with_key_name(mut self, key_name: impl Into<String>) -> Self {
        self.key_name = Some(key_name.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.launch_configuration_name = Some(name.into());
        self
    }

    pub fn with_metadata_options(mut self, options: MetadataOptions) -> Self {
        self.metadata_options = Some(options);
        self
    }

    pub fn with_placement_tenancy(mut self, tenancy: impl Into<String>) -> Self {
        self.placement_tenancy = Some(tenancy.into());
        self
    }

    pub fn with_security_group(mut self, group: impl Into<StringExpr>) -> Self {
        self.security_groups.push(group.into());
        self
    }

    pub fn with_spot_price(mut self, price: impl Into<String>) -> Self {
        self.spot_price = Some(price.into());
        self
    }

    pub fn with_user_data(mut self, user_data: impl Into<String>) -> Self {
        self.user_data = Some(UserData(user_data.into()));
        self
    }
}

impl CfnResource for CfnLaunchConfiguration {
    fn type_name(&self) -> &'static str {
        "AWS::AutoScaling::LaunchConfiguration"
    }

    fn properties(&self) -> Result<Value, TemplateError> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Instance user data, emitted as `Fn::Base64` so the template stays readable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserData(pub String);

impl Serialize for UserData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("Fn::Base64", &self.0)?;
        map.end()
    }
}

/// Mapping of a device name to a volume
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BlockDeviceMapping {
    pub device_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ebs: Option<EbsDevice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_device: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub virtual_name: Option<String>,
}

/// EBS volume settings for a block device mapping
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EbsDevice {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_on_termination: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iops: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub throughput: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_type: Option<EbsDeviceVolumeType>,
}

/// Instance metadata service settings
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetadataOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_put_response_hop_limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_tokens: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn minimal_configuration_has_only_required_fields() {
        let config = CfnLaunchConfiguration::new("ami-12345678", "t3.micro");
        assert_eq!(
            config.properties().unwrap(),
            json!({"ImageId": "ami-12345678", "InstanceType": "t3.micro"})
        );
    }

    #[test]
    fn round_trip_of_optional_fields() {
        let config = CfnLaunchConfiguration::new("ami-1", "t3.micro")
            .with_key_name("deploy")
            .with_spot_price("0.05");
        assert_eq!(config.key_name.as_deref(), Some("deploy"));
        assert_eq!(config.spot_price.as_deref(), Some("0.05"));
        assert_eq!(config.kernel_id, None);
    }

    #[test]
    fn user_data_is_wrapped_in_base64_intrinsic() {
        let config =
            CfnLaunchConfiguration::new("ami-1", "t3.micro").with_user_data("#!/bin/bash\necho ok");
        assert_eq!(
            config.properties().unwrap()["UserData"],
            json!({"Fn::Base64": "#!/bin/bash\necho ok"})
        );
    }

    #[test]
    fn block_device_mapping_serializes_nested_ebs() {
        let config = CfnLaunchConfiguration::new("ami-1", "m5.large").with_block_device_mapping(
            BlockDeviceMapping {
                device_name: "/dev/xvda".to_string(),
                ebs: Some(EbsDevice {
                    volume_size: Some(100),
                    volume_type: Some(EbsDeviceVolumeType::Gp3),
                    throughput: Some(250),
                    ..Default::default()
                }),
                no_device: None,
                virtual_name: None,
            },
        );
        let mapping = &config.properties().unwrap()["BlockDeviceMappings"][0];
        assert_eq!(mapping["DeviceName"], "/dev/xvda");
        assert_eq!(mapping["Ebs"]["VolumeSize"], 100);
        assert_eq!(mapping["Ebs"]["VolumeType"], "gp3");
        assert!(mapping["Ebs"].get("Iops").is_none());
    }

    #[test]
    fn security_groups_accept_literals_and_refs() {
        use cirrus_core::resource::LogicalId;

        let sg = LogicalId::from_name("web-sg");
        let config = CfnLaunchConfiguration::new("ami-1", "t3.micro")
            .with_security_group("sg-0123")
            .with_security_group(&sg);
        assert_eq!(
            config.properties().unwrap()["SecurityGroups"],
            json!(["sg-0123", {"Ref": "WebSg"}])
        );
    }

    #[test]
    fn equality_is_field_by_field() {
        let a = CfnLaunchConfiguration::new("ami-1", "t3.micro").with_key_name("k");
        let b = CfnLaunchConfiguration::new("ami-1", "t3.micro").with_key_name("k");
        let c = CfnLaunchConfiguration::new("ami-1", "t3.small").with_key_name("k");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
