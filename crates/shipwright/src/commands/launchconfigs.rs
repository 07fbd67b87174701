use super::Session;
use anyhow::Context;
use shipwright_cloud::{CreateParams, LaunchConfigurationParams, ResourceKind};
use std::path::PathBuf;

/// `launchconfigs create` options
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    pub ami: Option<String>,
    pub instance_type: String,
    pub instance_profile: Option<String>,
    pub security_groups: Vec<String>,
    pub key_pair: Option<String>,
    pub user_data: Option<PathBuf>,
    pub public_ip: bool,
}

pub async fn list(session: &Session) -> anyhow::Result<()> {
    super::list(session, ResourceKind::LaunchConfiguration, None).await
}

pub async fn create(session: &Session, name: &str, options: CreateOptions) -> anyhow::Result<()> {
    let params = build_params(session.profile.region.as_deref(), options)?;
    super::create(
        session,
        ResourceKind::LaunchConfiguration,
        name,
        None,
        CreateParams::LaunchConfiguration(params),
    )
    .await
}

pub async fn delete(session: &Session, name: &str) -> anyhow::Result<()> {
    super::delete(session, ResourceKind::LaunchConfiguration, name, None).await
}

fn build_params(
    region: Option<&str>,
    options: CreateOptions,
) -> anyhow::Result<LaunchConfigurationParams> {
    let image_id = match options.ami {
        Some(ami) => ami,
        None => {
            let region = region.context(
                "No region configured; pass --region or --ami to pick an image",
            )?;
            shipwright_cloud_aws::ecs_optimized_ami(region)
                .with_context(|| {
                    format!("No default ECS-optimized AMI for region {}; pass --ami", region)
                })?
                .to_string()
        }
    };

    let mut params = LaunchConfigurationParams::new(image_id, options.instance_type)?
        .with_security_groups(options.security_groups)
        .with_public_ip(options.public_ip);

    if let Some(instance_profile) = options.instance_profile {
        params = params.with_instance_profile(instance_profile);
    }
    if let Some(key_pair) = options.key_pair {
        params = params.with_key_pair(key_pair);
    }
    if let Some(path) = options.user_data {
        let user_data = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read user data {}", path.display()))?;
        params = params.with_user_data(user_data);
    }

    Ok(params)
}
