use super::Session;
use anyhow::Context;
use shipwright_cloud::{CreateParams, ResourceKind, TaskDefinitionParams};
use std::path::Path;

pub async fn list(session: &Session) -> anyhow::Result<()> {
    super::list(session, ResourceKind::TaskDefinition, None).await
}

/// Register `file` as the first revision of family `name`
pub async fn create(session: &Session, name: &str, file: &Path) -> anyhow::Result<()> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read task definition {}", file.display()))?;
    let params = CreateParams::TaskDefinition(TaskDefinitionParams::from_json(&contents)?);
    super::create(session, ResourceKind::TaskDefinition, name, None, params).await
}

pub async fn delete(session: &Session, name: &str) -> anyhow::Result<()> {
    super::delete(session, ResourceKind::TaskDefinition, name, None).await
}
