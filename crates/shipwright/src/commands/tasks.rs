use super::Session;
use shipwright_cloud::{CreateParams, ResourceKind, TaskParams};

pub async fn list(session: &Session, cluster: &str) -> anyhow::Result<()> {
    super::list(session, ResourceKind::Task, Some(cluster)).await
}

/// Run one task tagged with `name` as its started-by value
pub async fn create(
    session: &Session,
    cluster: &str,
    name: &str,
    task_definition: &str,
) -> anyhow::Result<()> {
    let params = CreateParams::Task(TaskParams::new(task_definition)?);
    super::create(session, ResourceKind::Task, name, Some(cluster), params).await
}

pub async fn delete(session: &Session, cluster: &str, name: &str) -> anyhow::Result<()> {
    super::delete(session, ResourceKind::Task, name, Some(cluster)).await
}
