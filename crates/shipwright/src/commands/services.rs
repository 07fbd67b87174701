use super::Session;
use shipwright_cloud::{CreateParams, ResourceKind, ServiceParams};

pub async fn list(session: &Session, cluster: &str) -> anyhow::Result<()> {
    super::list(session, ResourceKind::Service, Some(cluster)).await
}

pub async fn create(
    session: &Session,
    cluster: &str,
    name: &str,
    task_definition: &str,
    desired_count: u32,
) -> anyhow::Result<()> {
    let params = CreateParams::Service(ServiceParams::new(task_definition, desired_count)?);
    super::create(session, ResourceKind::Service, name, Some(cluster), params).await
}

pub async fn delete(session: &Session, cluster: &str, name: &str) -> anyhow::Result<()> {
    super::delete(session, ResourceKind::Service, name, Some(cluster)).await
}
