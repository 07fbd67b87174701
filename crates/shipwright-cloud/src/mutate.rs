//! Single mutating calls and response validation

use crate::error::{CloudError, Result};
use crate::params::CreateParams;
use crate::provider::{ProviderClient, ResourceDescriptor, ResponseEnvelope};
use crate::report::JobContext;

/// Mutating primitive to invoke
#[derive(Debug, Clone, Copy)]
pub enum Mutation<'p> {
    Create(&'p CreateParams),
    Delete,
}

impl std::fmt::Display for Mutation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mutation::Create(_) => write!(f, "create"),
            Mutation::Delete => write!(f, "delete"),
        }
    }
}

/// Issues exactly one create/delete call per invocation
pub struct ResourceMutator<'c> {
    client: &'c dyn ProviderClient,
}

impl<'c> ResourceMutator<'c> {
    pub fn new(client: &'c dyn ProviderClient) -> Self {
        Self { client }
    }

    /// Call the provider once and validate the envelope.
    ///
    /// Transport errors, a missing success indicator and a reported failure
    /// all surface as `BadResponse`.
    pub async fn invoke(
        &self,
        mutation: Mutation<'_>,
        target: &ResourceDescriptor<'_>,
        ctx: &mut JobContext<'_>,
    ) -> Result<ResponseEnvelope> {
        tracing::debug!(
            provider = self.client.name(),
            action = %mutation,
            resource = %target.display(),
            "invoking provider"
        );

        let reply = match mutation {
            Mutation::Create(params) => self.client.create(target, params).await,
            Mutation::Delete => self.client.delete(target).await,
        };

        let envelope = match reply {
            Ok(envelope) => envelope,
            Err(e) => {
                return Err(ctx.fail(CloudError::BadResponse(format!(
                    "Could not {} {}: {}",
                    mutation,
                    target.display(),
                    e
                ))));
            }
        };

        ctx.response(envelope.body.clone());

        match envelope.succeeded {
            Some(true) => Ok(envelope),
            Some(false) => {
                let reason = envelope.message().unwrap_or("no details given");
                Err(ctx.fail(CloudError::BadResponse(format!(
                    "Provider refused to {} {}: {}",
                    mutation,
                    target.display(),
                    reason
                ))))
            }
            None => Err(ctx.fail(CloudError::BadResponse(format!(
                "Could not find a success indicator in the response to {} {}.",
                mutation,
                target.display()
            )))),
        }
    }
}
