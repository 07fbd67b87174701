//! Full lifecycle jobs
//!
//! ```text
//! create_full:  heading ─▶ absent? ─▶ create ─▶ report ─▶ present? ─▶ record
//! delete_full:  heading ─▶ present? ─▶ delete ─▶ report ─▶ gone? ─▶ true
//! ```
//!
//! Every phase either advances or raises one typed failure. Nothing between
//! the checks and the mutation is atomic with respect to other actors.

use crate::error::{CloudError, Result};
use crate::fetch::ResourceFetcher;
use crate::gate::VerificationGate;
use crate::mutate::{Mutation, ResourceMutator};
use crate::params::CreateParams;
use crate::provider::{Profile, ProviderClient, ProviderRecord, ResourceDescriptor, ResourceKind};
use crate::report::JobContext;

/// Runs verify-act-verify jobs against one provider client
pub struct JobOrchestrator<'c> {
    client: &'c dyn ProviderClient,
}

impl<'c> JobOrchestrator<'c> {
    pub fn new(client: &'c dyn ProviderClient) -> Self {
        Self { client }
    }

    fn gate(&self) -> VerificationGate<'c> {
        VerificationGate::new(self.client)
    }

    /// Create `target` and return the record the provider reports for it
    pub async fn create_full(
        &self,
        target: &ResourceDescriptor<'_>,
        params: &CreateParams,
        ctx: &mut JobContext<'_>,
    ) -> Result<ProviderRecord> {
        ctx.heading(format!("Creating {}", target.display()));
        tracing::info!(resource = %target.display(), "create job started");

        if params.kind() != target.kind {
            return Err(ctx.fail(CloudError::InvalidParams(format!(
                "{} parameters cannot create a {}.",
                params.kind().label(),
                target.kind
            ))));
        }

        let gate = self.gate();
        gate.assert_absent_before_create(target, ctx).await?;

        let envelope = ResourceMutator::new(self.client)
            .invoke(Mutation::Create(params), target, ctx)
            .await?;

        ctx.text(format!("{} created.", target.kind.label()));
        if !envelope.body.is_null() {
            ctx.data(envelope.body);
        }

        let record = gate.assert_present_after_create(target, ctx).await?;
        ctx.stdout(format!("{} created.", target.display()));
        tracing::info!(resource = %target.display(), "create job finished");
        Ok(record)
    }

    /// Delete `target`; `true` once the resource is confirmed gone
    pub async fn delete_full(
        &self,
        target: &ResourceDescriptor<'_>,
        ctx: &mut JobContext<'_>,
    ) -> Result<bool> {
        ctx.heading(format!("Deleting {}", target.display()));
        tracing::info!(resource = %target.display(), "delete job started");

        let gate = self.gate();
        let existing = gate.assert_present_before_delete(target, ctx).await?;
        ctx.data(existing.body);

        ResourceMutator::new(self.client)
            .invoke(Mutation::Delete, target, ctx)
            .await?;
        ctx.text(format!("{} deletion requested.", target.kind.label()));

        gate.assert_gone_after_delete(target, ctx).await?;
        ctx.text(format!("{} deleted.", target.kind.label()));
        ctx.stdout(format!("{} deleted.", target.display()));
        tracing::info!(resource = %target.display(), "delete job finished");
        Ok(true)
    }

    /// Read-only listing for `list` commands; not a job, so no heading
    pub async fn list(
        &self,
        profile: &Profile,
        kind: ResourceKind,
        scope: Option<&str>,
        ctx: &mut JobContext<'_>,
    ) -> Result<Vec<ProviderRecord>> {
        let records = ResourceFetcher::new(self.client)
            .get_all(profile, kind, scope, ctx)
            .await?;
        Ok(records.unwrap_or_default())
    }
}
