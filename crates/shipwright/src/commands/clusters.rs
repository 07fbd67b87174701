use super::Session;
use shipwright_cloud::{CreateParams, ResourceKind};

pub async fn list(session: &Session) -> anyhow::Result<()> {
    super::list(session, ResourceKind::Cluster, None).await
}

pub async fn create(session: &Session, name: &str) -> anyhow::Result<()> {
    super::create(session, ResourceKind::Cluster, name, None, CreateParams::Cluster).await
}

pub async fn delete(session: &Session, name: &str) -> anyhow::Result<()> {
    super::delete(session, ResourceKind::Cluster, name, None).await
}
