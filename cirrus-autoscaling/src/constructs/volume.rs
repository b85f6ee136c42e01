//! Block devices - Instance storage declarations
//!
//! Maps user-facing volume declarations onto launch configuration block
//! device mappings.

use crate::cfn::launch_configuration::{BlockDeviceMapping, EbsDevice};
use crate::types::EbsDeviceVolumeType;

use super::AutoScalingError;

/// A device name and the volume behind it
#[derive(Debug, Clone, PartialEq)]
pub struct BlockDevice {
    pub device_name: String,
    pub volume: BlockDeviceVolume,
}

impl BlockDevice {
    pub fn new(device_name: impl Into<String>, volume: BlockDeviceVolume) -> Self {
        Self {
            device_name: device_name.into(),
            volume,
        }
    }
}

/// What backs a block device
#[derive(Debug, Clone, PartialEq)]
pub enum BlockDeviceVolume {
    /// EBS volume
    Ebs(EbsDeviceProps),
    /// Instance store volume by index (`ephemeral0`, `ephemeral1`, ...)
    Ephemeral { volume_index: u32 },
    /// Suppress a device the AMI would otherwise map
    NoDevice,
}

impl BlockDeviceVolume {
    pub fn ebs(volume_size_gib: u32) -> Self {
        Self::Ebs(EbsDeviceProps {
            volume_size: Some(volume_size_gib),
            ..Default::default()
        })
    }

    pub fn ebs_from_snapshot(snapshot_id: impl Into<String>) -> Self {
        Self::Ebs(EbsDeviceProps {
            snapshot_id: Some(snapshot_id.into()),
            ..Default::default()
        })
    }

    pub fn ephemeral(volume_index: u32) -> Self {
        Self::Ephemeral { volume_index }
    }

    pub fn no_device() -> Self {
        Self::NoDevice
    }
}

/// EBS volume settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EbsDeviceProps {
    pub volume_size: Option<u32>,
    pub snapshot_id: Option<String>,
    pub volume_type: Option<EbsDeviceVolumeType>,
    pub iops: Option<u32>,
    pub throughput: Option<u32>,
    pub delete_on_termination: Option<bool>,
    pub encrypted: Option<bool>,
}

impl EbsDeviceProps {
    fn validate(&self, device_name: &str) -> Result<(), AutoScalingError> {
        let volume_type = self.volume_type.unwrap_or(EbsDeviceVolumeType::Gp2);
        let provisioned_iops = matches!(
            volume_type,
            EbsDeviceVolumeType::Io1 | EbsDeviceVolumeType::Io2
        );

        if provisioned_iops && self.iops.is_none() {
            return Err(AutoScalingError::validation(format!(
                "device '{}': {} volumes need 'iops'",
                device_name, volume_type
            )));
        }
        if self.iops.is_some() && !provisioned_iops && volume_type != EbsDeviceVolumeType::Gp3 {
            return Err(AutoScalingError::validation(format!(
                "device '{}': 'iops' is only supported for io1, io2 and gp3 volumes",
                device_name
            )));
        }
        if let Some(throughput) = self.throughput {
            if volume_type != EbsDeviceVolumeType::Gp3 {
                return Err(AutoScalingError::validation(format!(
                    "device '{}': 'throughput' is only supported for gp3 volumes",
                    device_name
                )));
            }
            if !(125..=1000).contains(&throughput) {
                return Err(AutoScalingError::validation(format!(
                    "device '{}': throughput must be between 125 and 1000 MiB/s, got {}",
                    device_name, throughput
                )));
            }
        }
        Ok(())
    }
}

/// Render block devices into launch configuration mappings
pub fn render_block_devices(
    devices: &[BlockDevice],
) -> Result<Vec<BlockDeviceMapping>, AutoScalingError> {
    devices
        .iter()
        .map(|device| {
            let mut mapping = BlockDeviceMapping {
                device_name: device.device_name.clone(),
                ebs: None,
                no_device: None,
                virtual_name: None,
            };
            match &device.volume {
                BlockDeviceVolume::Ebs(props) => {
                    props.validate(&device.device_name)?;
                    mapping.ebs = Some(EbsDevice {
                        delete_on_termination: props.delete_on_termination,
                        encrypted: props.encrypted,
                        iops: props.iops,
                        snapshot_id: props.snapshot_id.clone(),
                        throughput: props.throughput,
                        volume_size: props.volume_size,
                        volume_type: props.volume_type,
                    });
                }
                BlockDeviceVolume::Ephemeral { volume_index } => {
                    mapping.virtual_name = Some(format!("ephemeral{}", volume_index));
                }
                BlockDeviceVolume::NoDevice => {
                    mapping.no_device = Some(true);
                }
            }
            Ok(mapping)
        })
        .collect()
}
