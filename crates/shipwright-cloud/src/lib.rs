//! Shipwright resource lifecycle core
//!
//! This crate wraps every create/delete against a cloud control plane in a
//! verify-act-verify job, reports each phase through independent channels,
//! and raises typed failures.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                 Shipwright CLI                   │
//! │        (clusters / services / tasks ...)         │
//! └─────────────────┬───────────────────────────────┘
//!                   │  JobContext (report sinks)
//! ┌─────────────────▼───────────────────────────────┐
//! │                shipwright-cloud                  │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │             JobOrchestrator               │   │
//! │  └───────┬──────────────┬───────────────────┘   │
//! │  ┌───────▼──────┐ ┌─────▼────────┐              │
//! │  │ Verification │ │  Resource    │              │
//! │  │    Gate      │ │  Mutator     │              │
//! │  └───────┬──────┘ └─────┬────────┘              │
//! │  ┌───────▼──────┐       │                       │
//! │  │   Fetcher    │       │                       │
//! │  └───────┬──────┘       │                       │
//! └──────────┼──────────────┼───────────────────────┘
//!            │              │
//! ┌──────────▼──────────────▼───────────────────────┐
//! │        trait ProviderClient (e.g. AWS)           │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod fetch;
pub mod gate;
pub mod job;
pub mod mutate;
pub mod params;
pub mod provider;
pub mod report;

// Re-exports
pub use error::{CloudError, Result};
pub use fetch::ResourceFetcher;
pub use gate::VerificationGate;
pub use job::JobOrchestrator;
pub use mutate::{Mutation, ResourceMutator};
pub use params::{
    AutoScalingGroupParams, CreateParams, LaunchConfigurationParams, SecurityGroupParams,
    ServiceParams, TaskDefinitionParams, TaskParams,
};
pub use provider::{
    Profile, ProviderClient, ProviderError, ProviderRecord, ResourceDescriptor, ResourceKind,
    ResponseEnvelope, StaticCredentials,
};
pub use report::{
    Channel, JobContext, MemorySink, Payload, ReportEvent, ReportLevel, Reports, Silent, Sink,
};
