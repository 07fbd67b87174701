use super::Session;
use shipwright_cloud::{CreateParams, ResourceKind, SecurityGroupParams};

pub async fn list(session: &Session) -> anyhow::Result<()> {
    super::list(session, ResourceKind::SecurityGroup, None).await
}

pub async fn create(
    session: &Session,
    name: &str,
    description: Option<String>,
    vpc: Option<String>,
) -> anyhow::Result<()> {
    let mut params = SecurityGroupParams::new();
    if let Some(description) = description {
        params = params.with_description(description);
    }
    if let Some(vpc) = vpc {
        params = params.with_vpc(vpc);
    }

    super::create(
        session,
        ResourceKind::SecurityGroup,
        name,
        None,
        CreateParams::SecurityGroup(params),
    )
    .await
}

pub async fn delete(session: &Session, name: &str) -> anyhow::Result<()> {
    super::delete(session, ResourceKind::SecurityGroup, name, None).await
}
