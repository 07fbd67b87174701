//! Typed create parameters, one structure per resource kind

use crate::error::{CloudError, Result};
use crate::provider::ResourceKind;
use serde::{Deserialize, Serialize};

/// Parameters of a create call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum CreateParams {
    Cluster,
    LaunchConfiguration(LaunchConfigurationParams),
    AutoScalingGroup(AutoScalingGroupParams),
    SecurityGroup(SecurityGroupParams),
    TaskDefinition(TaskDefinitionParams),
    Task(TaskParams),
    Service(ServiceParams),
}

impl CreateParams {
    /// Resource kind these parameters create
    pub fn kind(&self) -> ResourceKind {
        match self {
            CreateParams::Cluster => ResourceKind::Cluster,
            CreateParams::LaunchConfiguration(_) => ResourceKind::LaunchConfiguration,
            CreateParams::AutoScalingGroup(_) => ResourceKind::AutoScalingGroup,
            CreateParams::SecurityGroup(_) => ResourceKind::SecurityGroup,
            CreateParams::TaskDefinition(_) => ResourceKind::TaskDefinition,
            CreateParams::Task(_) => ResourceKind::Task,
            CreateParams::Service(_) => ResourceKind::Service,
        }
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CloudError::InvalidParams(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(())
}

/// Launch configuration for an auto scaling group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchConfigurationParams {
    pub image_id: String,
    pub instance_type: String,
    pub instance_profile: Option<String>,
    pub security_groups: Vec<String>,
    pub key_pair: Option<String>,
    /// Init script, sent as-is; the provider client handles encoding
    pub user_data: Option<String>,
    /// Only meaningful inside a VPC
    pub public_ip: bool,
}

impl LaunchConfigurationParams {
    pub fn new(image_id: impl Into<String>, instance_type: impl Into<String>) -> Result<Self> {
        let image_id = image_id.into();
        let instance_type = instance_type.into();
        require("Image ID", &image_id)?;
        require("Instance type", &instance_type)?;

        Ok(Self {
            image_id,
            instance_type,
            instance_profile: None,
            security_groups: Vec::new(),
            key_pair: None,
            user_data: None,
            public_ip: false,
        })
    }

    pub fn with_instance_profile(mut self, instance_profile: impl Into<String>) -> Self {
        self.instance_profile = Some(instance_profile.into());
        self
    }

    pub fn with_security_groups(mut self, groups: impl IntoIterator<Item = String>) -> Self {
        self.security_groups.extend(groups);
        self
    }

    pub fn with_key_pair(mut self, key_pair: impl Into<String>) -> Self {
        self.key_pair = Some(key_pair.into());
        self
    }

    pub fn with_user_data(mut self, user_data: impl Into<String>) -> Self {
        self.user_data = Some(user_data.into());
        self
    }

    pub fn with_public_ip(mut self, public_ip: bool) -> Self {
        self.public_ip = public_ip;
        self
    }
}

/// Auto scaling group running instances from a launch configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoScalingGroupParams {
    pub launch_configuration: String,
    pub min_size: u32,
    pub max_size: u32,
    pub desired_size: u32,
    /// Availability zones to launch into (EC2 classic / default VPC)
    pub zones: Vec<String>,
    /// Subnets to launch into (VPC)
    pub subnets: Vec<String>,
}

impl AutoScalingGroupParams {
    pub fn new(
        launch_configuration: impl Into<String>,
        min_size: u32,
        max_size: u32,
        desired_size: u32,
    ) -> Result<Self> {
        let launch_configuration = launch_configuration.into();
        require("Launch configuration", &launch_configuration)?;

        if min_size > max_size {
            return Err(CloudError::InvalidParams(format!(
                "Minimum size {} is larger than maximum size {}",
                min_size, max_size
            )));
        }
        if desired_size < min_size || desired_size > max_size {
            return Err(CloudError::InvalidParams(format!(
                "Desired size {} must be between {} and {}",
                desired_size, min_size, max_size
            )));
        }

        Ok(Self {
            launch_configuration,
            min_size,
            max_size,
            desired_size,
            zones: Vec::new(),
            subnets: Vec::new(),
        })
    }

    pub fn with_zones(mut self, zones: impl IntoIterator<Item = String>) -> Self {
        self.zones = zones.into_iter().collect();
        self
    }

    pub fn with_subnets(mut self, subnets: impl IntoIterator<Item = String>) -> Self {
        self.subnets = subnets.into_iter().collect();
        self
    }

    /// A group needs somewhere to place instances
    pub fn validate_placement(&self) -> Result<()> {
        if self.zones.is_empty() && self.subnets.is_empty() {
            return Err(CloudError::InvalidParams(
                "Auto scaling group needs at least one availability zone or subnet".to_string(),
            ));
        }
        Ok(())
    }
}

/// EC2 security group
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityGroupParams {
    /// Defaults to the group name
    pub description: Option<String>,
    /// Defaults to the account's default VPC
    pub vpc: Option<String>,
}

impl SecurityGroupParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_vpc(mut self, vpc: impl Into<String>) -> Self {
        self.vpc = Some(vpc.into());
        self
    }
}

/// Task definition document
///
/// The family is always taken from the target name, so any `family` in the
/// document is overwritten by the provider client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDefinitionParams {
    pub document: serde_json::Value,
}

impl TaskDefinitionParams {
    pub fn new(document: serde_json::Value) -> Result<Self> {
        let Some(fields) = document.as_object() else {
            return Err(CloudError::InvalidParams(
                "Task definition document must be a JSON object".to_string(),
            ));
        };

        let has_containers = fields
            .get("containerDefinitions")
            .and_then(|c| c.as_array())
            .is_some_and(|c| !c.is_empty());
        if !has_containers {
            return Err(CloudError::InvalidParams(
                "Task definition document needs at least one entry in 'containerDefinitions'"
                    .to_string(),
            ));
        }

        Ok(Self { document })
    }

    /// Parse a document from its JSON text
    pub fn from_json(contents: &str) -> Result<Self> {
        let document: serde_json::Value = serde_json::from_str(contents).map_err(|e| {
            CloudError::InvalidParams(format!("Task definition is not valid JSON: {}", e))
        })?;
        Self::new(document)
    }
}

/// One-off task run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskParams {
    /// `family` or `family:revision`
    pub task_definition: String,
}

impl TaskParams {
    pub fn new(task_definition: impl Into<String>) -> Result<Self> {
        let task_definition = task_definition.into();
        require("Task definition", &task_definition)?;
        Ok(Self { task_definition })
    }
}

/// Long-running service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceParams {
    pub task_definition: String,
    pub desired_count: u32,
}

impl ServiceParams {
    pub fn new(task_definition: impl Into<String>, desired_count: u32) -> Result<Self> {
        let task_definition = task_definition.into();
        require("Task definition", &task_definition)?;
        Ok(Self {
            task_definition,
            desired_count,
        })
    }
}
