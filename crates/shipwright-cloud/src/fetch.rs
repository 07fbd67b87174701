//! Read access to provider records

use crate::error::{CloudError, Result};
use crate::provider::{Profile, ProviderClient, ProviderRecord, ResourceDescriptor, ResourceKind};
use crate::report::JobContext;

/// Queries the provider for one or all records of a kind
pub struct ResourceFetcher<'c> {
    client: &'c dyn ProviderClient,
}

impl<'c> ResourceFetcher<'c> {
    pub fn new(client: &'c dyn ProviderClient) -> Self {
        Self { client }
    }

    async fn list(
        &self,
        profile: &Profile,
        kind: ResourceKind,
        scope: Option<&str>,
        ctx: &mut JobContext<'_>,
    ) -> Result<Vec<ProviderRecord>> {
        tracing::debug!(
            provider = self.client.name(),
            %kind,
            scope = scope.unwrap_or("-"),
            "listing records"
        );

        self.client
            .list(profile, kind, scope)
            .await
            .map_err(|e| {
                ctx.fail(CloudError::BadResponse(format!(
                    "Could not list {}: {}",
                    kind.plural(),
                    e
                )))
            })
    }

    /// All records of `kind`, or `None` when the provider has none
    pub async fn get_all(
        &self,
        profile: &Profile,
        kind: ResourceKind,
        scope: Option<&str>,
        ctx: &mut JobContext<'_>,
    ) -> Result<Option<Vec<ProviderRecord>>> {
        let records = self.list(profile, kind, scope, ctx).await?;
        ctx.text(format!("Found {} {}.", records.len(), kind.plural()));

        if records.is_empty() {
            Ok(None)
        } else {
            Ok(Some(records))
        }
    }

    /// The single record named like `target`.
    ///
    /// Several matches mean the provider's naming assumption broke; that is a
    /// `TooManyRecords` failure, never a silent pick.
    pub async fn get_by_name(
        &self,
        target: &ResourceDescriptor<'_>,
        ctx: &mut JobContext<'_>,
    ) -> Result<Option<ProviderRecord>> {
        let records = self
            .list(target.profile, target.kind, target.scope(), ctx)
            .await?;

        let mut matches: Vec<ProviderRecord> = records
            .into_iter()
            .filter(|r| r.name == target.name)
            .collect();

        tracing::debug!(resource = %target.display(), matches = matches.len(), "lookup by name");

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            n => Err(ctx.fail(CloudError::TooManyRecords(format!(
                "Found {} records for {}, expected at most one.",
                n,
                target.display()
            )))),
        }
    }
}
