//! AWS provider for Shipwright
//!
//! This crate implements the ProviderClient trait for AWS, letting the
//! Shipwright core manage ECS clusters, task definitions, tasks and services
//! as well as Auto Scaling launch configurations.
//!
//! # Requirements
//!
//! - `aws` CLI must be installed
//! - Credentials come from the aws CLI configuration (named profiles) or
//!   from a static key pair on the [`Profile`](shipwright_cloud::Profile)
//!
//! # Example
//!
//! ```ignore
//! use shipwright_cloud::{JobContext, JobOrchestrator, Profile, ResourceDescriptor, ResourceKind};
//! use shipwright_cloud_aws::AwsProvider;
//!
//! let provider = AwsProvider::new();
//! let profile = Profile::named("prod").with_region("us-east-1");
//! let target = ResourceDescriptor::new(ResourceKind::Cluster, "web", &profile)?;
//!
//! let mut ctx = JobContext::default();
//! JobOrchestrator::new(&provider).delete_full(&target, &mut ctx).await?;
//! ```

pub mod ami;
pub mod awscli;
pub mod error;
pub mod provider;

pub use ami::ecs_optimized_ami;
pub use awscli::{AwsCli, CliOutput};
pub use error::{AwsError, Result};
pub use provider::AwsProvider;
