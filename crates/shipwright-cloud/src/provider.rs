//! Provider client trait and the values it exchanges with the core

use crate::error::{CloudError, Result};
use crate::params::CreateParams;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Control-plane client for one cloud provider.
///
/// Implementations return already-decoded responses. The core never looks
/// inside a record beyond its name, and only inspects an envelope's success
/// indicator.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Returns the provider name (e.g., "aws")
    fn name(&self) -> &str;

    /// List every record of `kind`, optionally inside the owning `scope`
    async fn list(
        &self,
        profile: &Profile,
        kind: ResourceKind,
        scope: Option<&str>,
    ) -> std::result::Result<Vec<ProviderRecord>, ProviderError>;

    /// Issue one create call
    async fn create(
        &self,
        target: &ResourceDescriptor<'_>,
        params: &CreateParams,
    ) -> std::result::Result<ResponseEnvelope, ProviderError>;

    /// Issue one delete call
    async fn delete(
        &self,
        target: &ResourceDescriptor<'_>,
    ) -> std::result::Result<ResponseEnvelope, ProviderError>;
}

/// Transport-level failure reported by a provider client
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Static access key pair
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl std::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// Credential/session handle handed to the provider client on every call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Named profile from the provider's own configuration
    pub name: Option<String>,

    /// Region override
    pub region: Option<String>,

    /// Ephemeral credentials, taking precedence over `name`
    pub credentials: Option<StaticCredentials>,
}

impl Profile {
    /// Default session of the provider tooling
    pub fn default_session() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn ephemeral(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            credentials: Some(StaticCredentials {
                access_key_id: access_key_id.into(),
                secret_access_key: secret_access_key.into(),
            }),
            ..Self::default()
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}

/// Category of managed resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Cluster,
    LaunchConfiguration,
    AutoScalingGroup,
    SecurityGroup,
    TaskDefinition,
    Task,
    Service,
    /// Read-only; never the target of a job
    AvailabilityZone,
}

impl ResourceKind {
    /// Human-readable singular label, capitalized for sentence starts
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Cluster => "Cluster",
            ResourceKind::LaunchConfiguration => "Launch configuration",
            ResourceKind::AutoScalingGroup => "Auto scaling group",
            ResourceKind::SecurityGroup => "Security group",
            ResourceKind::TaskDefinition => "Task definition",
            ResourceKind::Task => "Task",
            ResourceKind::Service => "Service",
            ResourceKind::AvailabilityZone => "Availability zone",
        }
    }

    /// Lowercase plural used in progress messages
    pub fn plural(&self) -> &'static str {
        match self {
            ResourceKind::Cluster => "clusters",
            ResourceKind::LaunchConfiguration => "launch configurations",
            ResourceKind::AutoScalingGroup => "auto scaling groups",
            ResourceKind::SecurityGroup => "security groups",
            ResourceKind::TaskDefinition => "task definitions",
            ResourceKind::Task => "tasks",
            ResourceKind::Service => "services",
            ResourceKind::AvailabilityZone => "availability zones",
        }
    }

    /// Whether records live inside an owning cluster
    pub fn is_scoped(&self) -> bool {
        matches!(self, ResourceKind::Task | ResourceKind::Service)
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Cluster => write!(f, "cluster"),
            ResourceKind::LaunchConfiguration => write!(f, "launch-configuration"),
            ResourceKind::AutoScalingGroup => write!(f, "auto-scaling-group"),
            ResourceKind::SecurityGroup => write!(f, "security-group"),
            ResourceKind::TaskDefinition => write!(f, "task-definition"),
            ResourceKind::Task => write!(f, "task"),
            ResourceKind::Service => write!(f, "service"),
            ResourceKind::AvailabilityZone => write!(f, "availability-zone"),
        }
    }
}

/// Identifies one target resource within an account/region
#[derive(Debug, Clone)]
pub struct ResourceDescriptor<'p> {
    pub kind: ResourceKind,
    pub name: String,
    /// Owning cluster for scoped kinds
    pub scope: Option<String>,
    pub profile: &'p Profile,
}

impl<'p> ResourceDescriptor<'p> {
    /// Descriptor for an unscoped kind
    pub fn new(kind: ResourceKind, name: impl Into<String>, profile: &'p Profile) -> Result<Self> {
        Self::build(kind, name.into(), None, profile)
    }

    /// Descriptor for a kind that lives inside a cluster
    pub fn scoped(
        kind: ResourceKind,
        name: impl Into<String>,
        cluster: impl Into<String>,
        profile: &'p Profile,
    ) -> Result<Self> {
        Self::build(kind, name.into(), Some(cluster.into()), profile)
    }

    fn build(
        kind: ResourceKind,
        name: String,
        scope: Option<String>,
        profile: &'p Profile,
    ) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(CloudError::InvalidParams(format!(
                "{} name must not be empty",
                kind.label()
            )));
        }

        match (&scope, kind.is_scoped()) {
            (None, true) => {
                return Err(CloudError::InvalidParams(format!(
                    "{} '{}' needs an owning cluster",
                    kind.label(),
                    name
                )));
            }
            (Some(_), false) => {
                return Err(CloudError::InvalidParams(format!(
                    "{} '{}' does not belong to a cluster",
                    kind.label(),
                    name
                )));
            }
            (Some(cluster), true) if cluster.trim().is_empty() => {
                return Err(CloudError::InvalidParams(
                    "Cluster name must not be empty".to_string(),
                ));
            }
            _ => {}
        }

        Ok(Self {
            kind,
            name,
            scope,
            profile,
        })
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// `Cluster 'web'` or `Service 'api' in cluster 'web'`
    pub fn display(&self) -> String {
        match &self.scope {
            Some(cluster) => format!(
                "{} '{}' in cluster '{}'",
                self.kind.label(),
                self.name,
                cluster
            ),
            None => format!("{} '{}'", self.kind.label(), self.name),
        }
    }
}

/// Decoded description of a resource's current state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderRecord {
    /// Name used for matching, extracted by the provider client
    pub name: String,

    /// Raw record as returned by the provider
    pub body: serde_json::Value,
}

impl ProviderRecord {
    pub fn new(name: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            body,
        }
    }
}

/// Response to a mutating call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// `None` when the reply carried no recognizable success indicator
    pub succeeded: Option<bool>,

    pub body: serde_json::Value,
}

impl ResponseEnvelope {
    pub fn ok(body: serde_json::Value) -> Self {
        Self {
            succeeded: Some(true),
            body,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            succeeded: Some(false),
            body: serde_json::json!({ "message": message.into() }),
        }
    }

    pub fn malformed(body: serde_json::Value) -> Self {
        Self {
            succeeded: None,
            body,
        }
    }

    /// Provider-supplied failure message, if any
    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(|m| m.as_str())
    }
}
