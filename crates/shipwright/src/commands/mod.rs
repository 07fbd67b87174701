pub mod clusters;
pub mod launchconfigs;
pub mod scalinggroups;
pub mod securitygroups;
pub mod services;
pub mod taskdefinitions;
pub mod tasks;
pub mod zones;

use crate::reporter::TerminalSink;
use shipwright_cloud::{
    CloudError, CreateParams, JobContext, JobOrchestrator, Profile, ProviderRecord, ReportLevel,
    Reports, ResourceDescriptor, ResourceKind,
};
use shipwright_cloud_aws::{AwsCli, AwsProvider};

/// Job failure that has already been delivered through the error channel
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct Reported(#[from] pub CloudError);

/// Everything one command invocation needs
pub struct Session {
    pub profile: Profile,
    pub reports: Reports,
    client: AwsProvider,
}

impl Session {
    pub fn new(profile: Profile, reports: Reports, aws_cli: &str) -> Self {
        Self {
            profile,
            reports,
            client: AwsProvider::with_cli(AwsCli::with_program(aws_cli)),
        }
    }

    fn context(&self) -> JobContext<'static> {
        JobContext::new(self.reports.clone()).with_all(TerminalSink)
    }

    fn orchestrator(&self) -> JobOrchestrator<'_> {
        JobOrchestrator::new(&self.client)
    }

    fn descriptor(
        &self,
        kind: ResourceKind,
        name: &str,
        cluster: Option<&str>,
    ) -> anyhow::Result<ResourceDescriptor<'_>> {
        let descriptor = match cluster {
            Some(cluster) => ResourceDescriptor::scoped(kind, name, cluster, &self.profile)?,
            None => ResourceDescriptor::new(kind, name, &self.profile)?,
        };
        Ok(descriptor)
    }

    fn print_record(&self, record: &ProviderRecord) {
        if self.reports.contains(ReportLevel::Records) {
            println!("{}", crate::reporter::pretty(&record.body));
        }
    }
}

pub(crate) async fn list(
    session: &Session,
    kind: ResourceKind,
    cluster: Option<&str>,
) -> anyhow::Result<()> {
    let mut ctx = session.context();
    let records = session
        .orchestrator()
        .list(&session.profile, kind, cluster, &mut ctx)
        .await
        .map_err(Reported)?;

    if session.reports.contains(ReportLevel::Quiet) {
        return Ok(());
    }

    for record in &records {
        if session.reports.contains(ReportLevel::Records) {
            session.print_record(record);
        } else {
            println!("{}", record.name);
        }
    }
    Ok(())
}

pub(crate) async fn create(
    session: &Session,
    kind: ResourceKind,
    name: &str,
    cluster: Option<&str>,
    params: CreateParams,
) -> anyhow::Result<()> {
    let target = session.descriptor(kind, name, cluster)?;
    let mut ctx = session.context();
    let record = session
        .orchestrator()
        .create_full(&target, &params, &mut ctx)
        .await
        .map_err(Reported)?;

    session.print_record(&record);
    Ok(())
}

pub(crate) async fn delete(
    session: &Session,
    kind: ResourceKind,
    name: &str,
    cluster: Option<&str>,
) -> anyhow::Result<()> {
    let target = session.descriptor(kind, name, cluster)?;
    let mut ctx = session.context();
    session
        .orchestrator()
        .delete_full(&target, &mut ctx)
        .await
        .map_err(Reported)?;
    Ok(())
}
