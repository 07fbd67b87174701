//! Pre- and post-condition checks around mutations
//!
//! Each check is one lookup. Post-checks do not poll: a resource that has
//! not settled by the time of the re-query is reported as a failure.

use crate::error::{CloudError, Result};
use crate::fetch::ResourceFetcher;
use crate::provider::{ProviderClient, ProviderRecord, ResourceDescriptor};
use crate::report::JobContext;

pub struct VerificationGate<'c> {
    fetcher: ResourceFetcher<'c>,
}

impl<'c> VerificationGate<'c> {
    pub fn new(client: &'c dyn ProviderClient) -> Self {
        Self {
            fetcher: ResourceFetcher::new(client),
        }
    }

    pub async fn assert_absent_before_create(
        &self,
        target: &ResourceDescriptor<'_>,
        ctx: &mut JobContext<'_>,
    ) -> Result<()> {
        tracing::debug!(resource = %target.display(), "checking absence before create");
        match self.fetcher.get_by_name(target, ctx).await? {
            Some(_) => Err(ctx.fail(CloudError::ResourceAlreadyExists(format!(
                "{} already exists.",
                target.display()
            )))),
            None => Ok(()),
        }
    }

    pub async fn assert_present_before_delete(
        &self,
        target: &ResourceDescriptor<'_>,
        ctx: &mut JobContext<'_>,
    ) -> Result<ProviderRecord> {
        tracing::debug!(resource = %target.display(), "checking presence before delete");
        match self.fetcher.get_by_name(target, ctx).await? {
            Some(record) => Ok(record),
            None => Err(ctx.fail(CloudError::ResourceDoesNotExist(format!(
                "{} does not exist.",
                target.display()
            )))),
        }
    }

    pub async fn assert_gone_after_delete(
        &self,
        target: &ResourceDescriptor<'_>,
        ctx: &mut JobContext<'_>,
    ) -> Result<()> {
        tracing::debug!(resource = %target.display(), "checking absence after delete");
        match self.fetcher.get_by_name(target, ctx).await? {
            Some(_) => Err(ctx.fail(CloudError::ResourceNotDeleted(format!(
                "{} was not deleted.",
                target.display()
            )))),
            None => Ok(()),
        }
    }

    pub async fn assert_present_after_create(
        &self,
        target: &ResourceDescriptor<'_>,
        ctx: &mut JobContext<'_>,
    ) -> Result<ProviderRecord> {
        tracing::debug!(resource = %target.display(), "checking presence after create");
        match self.fetcher.get_by_name(target, ctx).await? {
            Some(record) => Ok(record),
            None => Err(ctx.fail(CloudError::ResourceNotCreated(format!(
                "{} was not created.",
                target.display()
            )))),
        }
    }
}
