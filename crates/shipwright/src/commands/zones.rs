use super::Session;
use shipwright_cloud::ResourceKind;

pub async fn list(session: &Session) -> anyhow::Result<()> {
    super::list(session, ResourceKind::AvailabilityZone, None).await
}
