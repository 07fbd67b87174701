//! AWS provider implementation

use crate::awscli::{AwsCli, CliOutput, args};
use crate::error::{AwsError, Result};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::Value;
use shipwright_cloud::{
    AutoScalingGroupParams, CreateParams, LaunchConfigurationParams, Profile, ProviderClient,
    ProviderError, ProviderRecord, ResourceDescriptor, ResourceKind, ResponseEnvelope,
    SecurityGroupParams, ServiceParams, TaskDefinitionParams, TaskParams,
};

/// describe-clusters / describe-tasks accept at most 100 identifiers
const DESCRIBE_BATCH: usize = 100;
/// describe-services accepts at most 10 identifiers
const DESCRIBE_SERVICES_BATCH: usize = 10;

/// AWS provider (ECS, Auto Scaling, EC2) backed by the aws CLI
#[derive(Debug, Clone, Default)]
pub struct AwsProvider {
    cli: AwsCli,
}

impl AwsProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cli(cli: AwsCli) -> Self {
        Self { cli }
    }

    /// Run a mutating command and wrap the outcome in an envelope
    async fn mutate(&self, profile: &Profile, args: &[String]) -> Result<ResponseEnvelope> {
        let output = self.cli.run(profile, args).await?;
        Ok(envelope_from(&output))
    }

    /// Describe `ids` in batches and collect the `key` arrays
    async fn describe_batched(
        &self,
        profile: &Profile,
        command: &[String],
        id_flag: &str,
        ids: &[String],
        batch: usize,
        key: &str,
    ) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        for chunk in ids.chunks(batch) {
            let mut call = command.to_vec();
            call.push(id_flag.to_string());
            call.extend(chunk.iter().cloned());

            let response = self.cli.query(profile, &call).await?;
            items.extend(array_at(&response, key)?);
        }
        Ok(items)
    }

    // ========== Clusters ==========

    async fn list_clusters(&self, profile: &Profile) -> Result<Vec<ProviderRecord>> {
        let response = self
            .cli
            .query(profile, &args(&["ecs", "list-clusters"]))
            .await?;
        let arns = string_array_at(&response, "clusterArns")?;

        let clusters = self
            .describe_batched(
                profile,
                &args(&["ecs", "describe-clusters"]),
                "--clusters",
                &arns,
                DESCRIBE_BATCH,
                "clusters",
            )
            .await?;

        Ok(to_records(clusters, "clusterName", true))
    }

    // ========== Launch configurations ==========

    async fn list_launch_configurations(&self, profile: &Profile) -> Result<Vec<ProviderRecord>> {
        let response = self
            .cli
            .query(
                profile,
                &args(&["autoscaling", "describe-launch-configurations"]),
            )
            .await?;
        let items = array_at(&response, "LaunchConfigurations")?;
        Ok(to_records(items, "LaunchConfigurationName", false))
    }

    // ========== Auto scaling groups ==========

    /// Groups being torn down still show up with a `Status`; they count as gone
    async fn list_auto_scaling_groups(&self, profile: &Profile) -> Result<Vec<ProviderRecord>> {
        let response = self
            .cli
            .query(profile, &args(&["autoscaling", "describe-auto-scaling-groups"]))
            .await?;
        let groups = array_at(&response, "AutoScalingGroups")?
            .into_iter()
            .filter(|group| !is_being_deleted(group))
            .collect();
        Ok(to_records(groups, "AutoScalingGroupName", false))
    }

    // ========== Security groups ==========

    async fn list_security_groups(&self, profile: &Profile) -> Result<Vec<ProviderRecord>> {
        let response = self
            .cli
            .query(profile, &args(&["ec2", "describe-security-groups"]))
            .await?;
        let groups = array_at(&response, "SecurityGroups")?;
        Ok(to_records(groups, "GroupName", false))
    }

    /// delete-security-group wants the group id, and names are only unique per VPC
    async fn delete_security_group(&self, profile: &Profile, name: &str) -> Result<ResponseEnvelope> {
        let groups = self.list_security_groups(profile).await?;
        let ids: Vec<&str> = groups
            .iter()
            .filter(|g| g.name == name)
            .filter_map(|g| g.body.get("GroupId").and_then(Value::as_str))
            .collect();

        let [id] = ids.as_slice() else {
            return Ok(ResponseEnvelope::failed(format!(
                "Expected one security group named '{}', found {}",
                name,
                ids.len()
            )));
        };

        self.mutate(profile, &args(&["ec2", "delete-security-group", "--group-id", *id]))
            .await
    }

    // ========== Task definitions ==========

    async fn list_task_definition_families(
        &self,
        profile: &Profile,
    ) -> Result<Vec<ProviderRecord>> {
        let response = self
            .cli
            .query(
                profile,
                &args(&["ecs", "list-task-definition-families", "--status", "ACTIVE"]),
            )
            .await?;

        Ok(string_array_at(&response, "families")?
            .into_iter()
            .map(|family| {
                let body = serde_json::json!({ "family": family, "status": "ACTIVE" });
                ProviderRecord::new(family, body)
            })
            .collect())
    }

    /// Every active revision ARN of exactly `family`
    async fn active_revisions(&self, profile: &Profile, family: &str) -> Result<Vec<String>> {
        let response = self
            .cli
            .query(
                profile,
                &args(&[
                    "ecs",
                    "list-task-definitions",
                    "--family-prefix",
                    family,
                    "--status",
                    "ACTIVE",
                ]),
            )
            .await?;

        // --family-prefix also matches longer families
        Ok(string_array_at(&response, "taskDefinitionArns")?
            .into_iter()
            .filter(|arn| family_of(arn) == Some(family))
            .collect())
    }

    async fn deregister_family(&self, profile: &Profile, family: &str) -> Result<ResponseEnvelope> {
        let revisions = self.active_revisions(profile, family).await?;
        if revisions.is_empty() {
            return Ok(ResponseEnvelope::failed(format!(
                "No active revisions of task definition family '{}'",
                family
            )));
        }

        let mut deregistered = Vec::new();
        for arn in &revisions {
            let envelope = self
                .mutate(
                    profile,
                    &args(&["ecs", "deregister-task-definition", "--task-definition", arn.as_str()]),
                )
                .await?;
            if envelope.succeeded != Some(true) {
                return Ok(envelope);
            }
            deregistered.push(envelope.body);
        }

        Ok(ResponseEnvelope::ok(
            serde_json::json!({ "taskDefinitions": deregistered }),
        ))
    }

    // ========== Tasks ==========

    async fn list_tasks(&self, profile: &Profile, cluster: &str) -> Result<Vec<ProviderRecord>> {
        let response = self
            .cli
            .query(profile, &args(&["ecs", "list-tasks", "--cluster", cluster]))
            .await?;
        let arns = string_array_at(&response, "taskArns")?;

        let tasks = self
            .describe_batched(
                profile,
                &args(&["ecs", "describe-tasks", "--cluster", cluster]),
                "--tasks",
                &arns,
                DESCRIBE_BATCH,
                "tasks",
            )
            .await?;

        Ok(tasks
            .into_iter()
            .filter_map(|task| {
                let name = task
                    .get("startedBy")
                    .or_else(|| task.get("taskArn"))
                    .and_then(Value::as_str)?
                    .to_string();
                Some(ProviderRecord::new(name, task))
            })
            .collect())
    }

    async fn stop_task(&self, profile: &Profile, cluster: &str, name: &str) -> Result<ResponseEnvelope> {
        let tasks = self.list_tasks(profile, cluster).await?;
        let arns: Vec<&str> = tasks
            .iter()
            .filter(|t| t.name == name)
            .filter_map(|t| t.body.get("taskArn").and_then(Value::as_str))
            .collect();

        let [arn] = arns.as_slice() else {
            return Ok(ResponseEnvelope::failed(format!(
                "Expected one running task started by '{}' in cluster '{}', found {}",
                name,
                cluster,
                arns.len()
            )));
        };

        self.mutate(
            profile,
            &args(&["ecs", "stop-task", "--cluster", cluster, "--task", *arn]),
        )
        .await
    }

    // ========== Services ==========

    async fn list_services(&self, profile: &Profile, cluster: &str) -> Result<Vec<ProviderRecord>> {
        let response = self
            .cli
            .query(profile, &args(&["ecs", "list-services", "--cluster", cluster]))
            .await?;
        let arns = string_array_at(&response, "serviceArns")?;

        let services = self
            .describe_batched(
                profile,
                &args(&["ecs", "describe-services", "--cluster", cluster]),
                "--services",
                &arns,
                DESCRIBE_SERVICES_BATCH,
                "services",
            )
            .await?;

        Ok(to_records(services, "serviceName", true))
    }

    /// Scale to zero first; ECS refuses to delete a service with running tasks
    async fn delete_service(&self, profile: &Profile, cluster: &str, name: &str) -> Result<ResponseEnvelope> {
        let scaled = self
            .mutate(
                profile,
                &args(&[
                    "ecs",
                    "update-service",
                    "--cluster",
                    cluster,
                    "--service",
                    name,
                    "--desired-count",
                    "0",
                ]),
            )
            .await?;
        if scaled.succeeded != Some(true) {
            return Ok(scaled);
        }

        self.mutate(
            profile,
            &args(&["ecs", "delete-service", "--cluster", cluster, "--service", name]),
        )
        .await
    }

    // ========== Availability zones ==========

    async fn list_zones(&self, profile: &Profile) -> Result<Vec<ProviderRecord>> {
        let response = self
            .cli
            .query(profile, &args(&["ec2", "describe-availability-zones"]))
            .await?;
        let zones = array_at(&response, "AvailabilityZones")?;
        Ok(to_records(zones, "ZoneName", false))
    }
}

#[async_trait]
impl ProviderClient for AwsProvider {
    fn name(&self) -> &str {
        "aws"
    }

    async fn list(
        &self,
        profile: &Profile,
        kind: ResourceKind,
        scope: Option<&str>,
    ) -> std::result::Result<Vec<ProviderRecord>, ProviderError> {
        let records = match kind {
            ResourceKind::Cluster => self.list_clusters(profile).await?,
            ResourceKind::LaunchConfiguration => self.list_launch_configurations(profile).await?,
            ResourceKind::AutoScalingGroup => self.list_auto_scaling_groups(profile).await?,
            ResourceKind::SecurityGroup => self.list_security_groups(profile).await?,
            ResourceKind::TaskDefinition => self.list_task_definition_families(profile).await?,
            ResourceKind::Task => self.list_tasks(profile, cluster_of(kind, scope)?).await?,
            ResourceKind::Service => self.list_services(profile, cluster_of(kind, scope)?).await?,
            ResourceKind::AvailabilityZone => self.list_zones(profile).await?,
        };
        Ok(records)
    }

    async fn create(
        &self,
        target: &ResourceDescriptor<'_>,
        params: &CreateParams,
    ) -> std::result::Result<ResponseEnvelope, ProviderError> {
        let profile = target.profile;
        let name = target.name.as_str();

        let envelope = match params {
            CreateParams::Cluster => {
                self.mutate(profile, &args(&["ecs", "create-cluster", "--cluster-name", name]))
                    .await?
            }
            CreateParams::LaunchConfiguration(lc) => {
                self.mutate(profile, &launch_configuration_args(name, lc)).await?
            }
            CreateParams::AutoScalingGroup(group) => {
                self.mutate(profile, &auto_scaling_group_args(name, group))
                    .await?
            }
            CreateParams::SecurityGroup(group) => {
                self.mutate(profile, &security_group_args(name, group)).await?
            }
            CreateParams::TaskDefinition(td) => {
                let input = task_definition_input(name, td).to_string();
                self.mutate(
                    profile,
                    &args(&["ecs", "register-task-definition", "--cli-input-json", input.as_str()]),
                )
                .await?
            }
            CreateParams::Task(task) => {
                let cluster = cluster_of(target.kind, target.scope())?;
                let envelope = self
                    .mutate(profile, &run_task_args(cluster, name, task))
                    .await?;
                match run_task_failure(&envelope) {
                    Some(reason) => ResponseEnvelope::failed(reason),
                    None => envelope,
                }
            }
            CreateParams::Service(service) => {
                let cluster = cluster_of(target.kind, target.scope())?;
                self.mutate(profile, &create_service_args(cluster, name, service))
                    .await?
            }
        };
        Ok(envelope)
    }

    async fn delete(
        &self,
        target: &ResourceDescriptor<'_>,
    ) -> std::result::Result<ResponseEnvelope, ProviderError> {
        let profile = target.profile;
        let name = target.name.as_str();

        let envelope = match target.kind {
            ResourceKind::Cluster => {
                self.mutate(profile, &args(&["ecs", "delete-cluster", "--cluster", name]))
                    .await?
            }
            ResourceKind::LaunchConfiguration => {
                self.mutate(
                    profile,
                    &args(&[
                        "autoscaling",
                        "delete-launch-configuration",
                        "--launch-configuration-name",
                        name,
                    ]),
                )
                .await?
            }
            ResourceKind::AutoScalingGroup => {
                self.mutate(
                    profile,
                    &args(&[
                        "autoscaling",
                        "delete-auto-scaling-group",
                        "--auto-scaling-group-name",
                        name,
                        "--force-delete",
                    ]),
                )
                .await?
            }
            ResourceKind::SecurityGroup => self.delete_security_group(profile, name).await?,
            ResourceKind::TaskDefinition => self.deregister_family(profile, name).await?,
            ResourceKind::Task => {
                let cluster = cluster_of(target.kind, target.scope())?;
                self.stop_task(profile, cluster, name).await?
            }
            ResourceKind::Service => {
                let cluster = cluster_of(target.kind, target.scope())?;
                self.delete_service(profile, cluster, name).await?
            }
            ResourceKind::AvailabilityZone => {
                return Err(ProviderError::Unsupported(
                    "availability zones cannot be deleted".to_string(),
                ));
            }
        };
        Ok(envelope)
    }
}

fn cluster_of(kind: ResourceKind, scope: Option<&str>) -> Result<&str> {
    scope.ok_or_else(|| AwsError::Unsupported(format!("{} needs a cluster", kind.plural())))
}

/// Envelope for a mutating run: exit status is the success indicator
pub(crate) fn envelope_from(output: &CliOutput) -> ResponseEnvelope {
    if !output.success {
        let message = output.stderr.trim();
        return ResponseEnvelope::failed(if message.is_empty() {
            "aws command exited with an error"
        } else {
            message
        });
    }

    match output.json() {
        Ok(body) => ResponseEnvelope::ok(body),
        Err(_) => ResponseEnvelope::malformed(Value::String(output.stdout.clone())),
    }
}

fn array_at(response: &Value, key: &str) -> Result<Vec<Value>> {
    response
        .get(key)
        .and_then(Value::as_array)
        .cloned()
        .ok_or_else(|| AwsError::MissingKey(key.to_string()))
}

fn string_array_at(response: &Value, key: &str) -> Result<Vec<String>> {
    Ok(array_at(response, key)?
        .into_iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect())
}

/// Records named by `name_field`; items without a name are skipped
fn to_records(items: Vec<Value>, name_field: &str, active_only: bool) -> Vec<ProviderRecord> {
    items
        .into_iter()
        .filter(|item| !active_only || item.get("status").and_then(Value::as_str) == Some("ACTIVE"))
        .filter_map(|item| {
            let name = item.get(name_field).and_then(Value::as_str)?.to_string();
            Some(ProviderRecord::new(name, item))
        })
        .collect()
}

/// `arn:aws:ecs:us-east-1:123:task-definition/web:7` -> `web`
fn family_of(arn: &str) -> Option<&str> {
    let (_, tail) = arn.rsplit_once('/')?;
    let (family, _revision) = tail.rsplit_once(':')?;
    Some(family)
}

fn launch_configuration_args(name: &str, params: &LaunchConfigurationParams) -> Vec<String> {
    let mut call = args(&[
        "autoscaling",
        "create-launch-configuration",
        "--launch-configuration-name",
        name,
        "--image-id",
        params.image_id.as_str(),
        "--instance-type",
        params.instance_type.as_str(),
    ]);

    if let Some(profile) = &params.instance_profile {
        call.push("--iam-instance-profile".to_string());
        call.push(profile.clone());
    }

    if !params.security_groups.is_empty() {
        call.push("--security-groups".to_string());
        call.extend(params.security_groups.iter().cloned());
    }

    if let Some(key_pair) = &params.key_pair {
        call.push("--key-name".to_string());
        call.push(key_pair.clone());
    }

    // The API expects user data already base64 encoded
    if let Some(user_data) = &params.user_data {
        call.push("--user-data".to_string());
        call.push(BASE64.encode(user_data));
    }

    if params.public_ip {
        call.push("--associate-public-ip-address".to_string());
    }

    call
}

fn is_being_deleted(group: &Value) -> bool {
    group
        .get("Status")
        .and_then(Value::as_str)
        .is_some_and(|status| status.starts_with("Delete"))
}

fn auto_scaling_group_args(name: &str, params: &AutoScalingGroupParams) -> Vec<String> {
    let min = params.min_size.to_string();
    let max = params.max_size.to_string();
    let desired = params.desired_size.to_string();
    let mut call = args(&[
        "autoscaling",
        "create-auto-scaling-group",
        "--auto-scaling-group-name",
        name,
        "--launch-configuration-name",
        params.launch_configuration.as_str(),
        "--min-size",
        min.as_str(),
        "--max-size",
        max.as_str(),
        "--desired-capacity",
        desired.as_str(),
    ]);

    if !params.zones.is_empty() {
        call.push("--availability-zones".to_string());
        call.extend(params.zones.iter().cloned());
    }

    // Subnets go in as one comma separated value
    if !params.subnets.is_empty() {
        call.push("--vpc-zone-identifier".to_string());
        call.push(params.subnets.join(","));
    }

    call
}

fn security_group_args(name: &str, params: &SecurityGroupParams) -> Vec<String> {
    let description = params.description.as_deref().unwrap_or(name);
    let mut call = args(&[
        "ec2",
        "create-security-group",
        "--group-name",
        name,
        "--description",
        description,
    ]);

    if let Some(vpc) = &params.vpc {
        call.push("--vpc-id".to_string());
        call.push(vpc.clone());
    }

    call
}

fn task_definition_input(family: &str, params: &TaskDefinitionParams) -> Value {
    let mut input = params.document.clone();
    if let Some(fields) = input.as_object_mut() {
        fields.insert("family".to_string(), Value::String(family.to_string()));
    }
    input
}

fn run_task_args(cluster: &str, name: &str, params: &TaskParams) -> Vec<String> {
    args(&[
        "ecs",
        "run-task",
        "--cluster",
        cluster,
        "--task-definition",
        params.task_definition.as_str(),
        "--started-by",
        name,
        "--count",
        "1",
    ])
}

fn create_service_args(cluster: &str, name: &str, params: &ServiceParams) -> Vec<String> {
    let desired = params.desired_count.to_string();
    args(&[
        "ecs",
        "create-service",
        "--cluster",
        cluster,
        "--service-name",
        name,
        "--task-definition",
        params.task_definition.as_str(),
        "--desired-count",
        desired.as_str(),
    ])
}

/// run-task exits 0 even when no task could be placed
fn run_task_failure(envelope: &ResponseEnvelope) -> Option<String> {
    if envelope.succeeded != Some(true) {
        return None;
    }

    let started = envelope
        .body
        .get("tasks")
        .and_then(Value::as_array)
        .is_some_and(|tasks| !tasks.is_empty());
    if started {
        return None;
    }

    let reasons: Vec<String> = envelope
        .body
        .get("failures")
        .and_then(Value::as_array)
        .map(|failures| {
            failures
                .iter()
                .filter_map(|f| f.get("reason").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    if reasons.is_empty() {
        Some("No task was started".to_string())
    } else {
        Some(format!("No task was started: {}", reasons.join(", ")))
    }
}
