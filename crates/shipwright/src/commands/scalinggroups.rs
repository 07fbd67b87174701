use super::Session;
use shipwright_cloud::{AutoScalingGroupParams, CreateParams, ResourceKind};

/// `scalinggroups create` options
#[derive(Debug, Clone)]
pub struct CreateOptions {
    pub launch_config: String,
    pub min_size: u32,
    pub max_size: u32,
    pub desired_size: u32,
    pub zones: Vec<String>,
    pub subnets: Vec<String>,
}

pub async fn list(session: &Session) -> anyhow::Result<()> {
    super::list(session, ResourceKind::AutoScalingGroup, None).await
}

pub async fn create(session: &Session, name: &str, options: CreateOptions) -> anyhow::Result<()> {
    let params = build_params(options)?;
    super::create(
        session,
        ResourceKind::AutoScalingGroup,
        name,
        None,
        CreateParams::AutoScalingGroup(params),
    )
    .await
}

pub async fn delete(session: &Session, name: &str) -> anyhow::Result<()> {
    super::delete(session, ResourceKind::AutoScalingGroup, name, None).await
}

fn build_params(options: CreateOptions) -> anyhow::Result<AutoScalingGroupParams> {
    let params = AutoScalingGroupParams::new(
        options.launch_config,
        options.min_size,
        options.max_size,
        options.desired_size,
    )?
    .with_zones(options.zones)
    .with_subnets(options.subnets);

    params.validate_placement()?;
    Ok(params)
}
