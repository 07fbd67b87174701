mod common;

use common::{FakeProvider, job_events, recording_context};
use shipwright_cloud::{
    AutoScalingGroupParams, Channel, CloudError, CreateParams, JobOrchestrator,
    LaunchConfigurationParams, Payload, Profile, ResourceDescriptor, ResourceFetcher, ResourceKind,
    ResponseEnvelope, SecurityGroupParams, ServiceParams,
};

fn profile() -> Profile {
    Profile::named("test").with_region("us-east-1")
}

/// Error events must come right before the failure and only once
fn assert_failed_with_one_error(log: &shipwright_cloud::MemorySink) {
    let events = job_events(log);
    let errors: Vec<_> = events.iter().filter(|e| e.channel == Channel::Error).collect();
    assert_eq!(errors.len(), 1, "expected exactly one error event: {:?}", events);
    assert!(!errors[0].payload.to_string().is_empty());
    assert_eq!(events.first().map(|e| e.channel), Some(Channel::Heading));
    assert_eq!(events.last().map(|e| e.channel), Some(Channel::Error));
    assert_eq!(log.events().last().map(|e| e.channel), Some(Channel::Error));
}

fn assert_succeeded_without_error(log: &shipwright_cloud::MemorySink) {
    let events = job_events(log);
    let headings = events.iter().filter(|e| e.channel == Channel::Heading).count();
    assert_eq!(headings, 1);
    assert_eq!(events.first().map(|e| e.channel), Some(Channel::Heading));
    assert!(events.iter().all(|e| e.channel != Channel::Error));
    assert!(log.channel(Channel::Stderr).is_empty());
}

// ========== ResourceFetcher ==========

#[tokio::test]
async fn test_get_by_name_absent_when_nothing_matches() {
    let provider = FakeProvider::new().with_record(ResourceKind::Cluster, "other");
    let profile = profile();
    let target = ResourceDescriptor::new(ResourceKind::Cluster, "web", &profile).unwrap();
    let (mut ctx, log) = recording_context();

    let found = ResourceFetcher::new(&provider)
        .get_by_name(&target, &mut ctx)
        .await
        .unwrap();

    assert!(found.is_none());
    assert!(log.channel(Channel::Error).is_empty());
}

#[tokio::test]
async fn test_get_by_name_returns_single_match() {
    let provider = FakeProvider::new()
        .with_record(ResourceKind::Cluster, "web")
        .with_record(ResourceKind::Cluster, "web-staging")
        .with_record(ResourceKind::Service, "web");
    let profile = profile();
    let target = ResourceDescriptor::new(ResourceKind::Cluster, "web", &profile).unwrap();
    let (mut ctx, _log) = recording_context();

    let found = ResourceFetcher::new(&provider)
        .get_by_name(&target, &mut ctx)
        .await
        .unwrap()
        .expect("record");

    assert_eq!(found.name, "web");
}

#[tokio::test]
async fn test_get_by_name_rejects_duplicates() {
    let provider = FakeProvider::new()
        .with_record(ResourceKind::LaunchConfiguration, "lc-1")
        .with_record(ResourceKind::LaunchConfiguration, "lc-1");
    let profile = profile();
    let target =
        ResourceDescriptor::new(ResourceKind::LaunchConfiguration, "lc-1", &profile).unwrap();
    let (mut ctx, log) = recording_context();

    let err = ResourceFetcher::new(&provider)
        .get_by_name(&target, &mut ctx)
        .await
        .unwrap_err();

    assert!(matches!(err, CloudError::TooManyRecords(_)));
    assert_eq!(log.channel(Channel::Error).len(), 1);
}

#[tokio::test]
async fn test_get_by_name_respects_cluster_scope() {
    let provider = FakeProvider::new()
        .with_scoped_record(ResourceKind::Service, "api", Some("blue"))
        .with_scoped_record(ResourceKind::Service, "api", Some("green"));
    let profile = profile();
    let target =
        ResourceDescriptor::scoped(ResourceKind::Service, "api", "blue", &profile).unwrap();
    let (mut ctx, _log) = recording_context();

    let found = ResourceFetcher::new(&provider)
        .get_by_name(&target, &mut ctx)
        .await
        .unwrap();

    assert!(found.is_some());
}

#[tokio::test]
async fn test_get_all_absent_when_empty() {
    let provider = FakeProvider::new();
    let profile = profile();
    let (mut ctx, _log) = recording_context();
    let fetcher = ResourceFetcher::new(&provider);

    let all = fetcher
        .get_all(&profile, ResourceKind::Cluster, None, &mut ctx)
        .await
        .unwrap();
    assert!(all.is_none());
}

#[tokio::test]
async fn test_get_all_returns_every_record() {
    let provider = FakeProvider::new()
        .with_record(ResourceKind::AvailabilityZone, "us-east-1a")
        .with_record(ResourceKind::AvailabilityZone, "us-east-1b");
    let profile = profile();
    let (mut ctx, log) = recording_context();

    let all = ResourceFetcher::new(&provider)
        .get_all(&profile, ResourceKind::AvailabilityZone, None, &mut ctx)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(all.len(), 2);
    let texts = log.channel(Channel::Text);
    assert_eq!(texts[0].payload.as_text(), Some("Found 2 availability zones."));
}

#[tokio::test]
async fn test_list_failure_is_bad_response() {
    let provider = FakeProvider::new().failing_lists();
    let profile = profile();
    let (mut ctx, log) = recording_context();

    let err = ResourceFetcher::new(&provider)
        .get_all(&profile, ResourceKind::Cluster, None, &mut ctx)
        .await
        .unwrap_err();

    assert!(matches!(err, CloudError::BadResponse(_)));
    assert_eq!(log.channel(Channel::Error).len(), 1);
}

// ========== create_full ==========

#[tokio::test]
async fn test_create_cluster_returns_fetched_record() {
    let provider = FakeProvider::new();
    let profile = profile();
    let target =
        ResourceDescriptor::new(ResourceKind::Cluster, "my-app-cluster", &profile).unwrap();
    let (mut ctx, log) = recording_context();

    let record = JobOrchestrator::new(&provider)
        .create_full(&target, &CreateParams::Cluster, &mut ctx)
        .await
        .unwrap();

    assert_eq!(record.name, "my-app-cluster");
    assert_eq!(record.body["status"], "ACTIVE");
    assert_eq!(provider.creates(), 1);
    assert_succeeded_without_error(&log);
    assert_eq!(
        log.channel(Channel::Stdout)[0].payload.as_text(),
        Some("Cluster 'my-app-cluster' created.")
    );
}

#[tokio::test]
async fn test_create_existing_never_mutates() {
    let provider = FakeProvider::new().with_record(ResourceKind::Cluster, "my-app-cluster");
    let profile = profile();
    let target =
        ResourceDescriptor::new(ResourceKind::Cluster, "my-app-cluster", &profile).unwrap();
    let (mut ctx, log) = recording_context();

    let err = JobOrchestrator::new(&provider)
        .create_full(&target, &CreateParams::Cluster, &mut ctx)
        .await
        .unwrap_err();

    assert!(matches!(err, CloudError::ResourceAlreadyExists(_)));
    assert_eq!(provider.creates(), 0);
    assert_eq!(provider.count(ResourceKind::Cluster, "my-app-cluster"), 1);
    assert_failed_with_one_error(&log);
}

#[tokio::test]
async fn test_create_missing_after_mutation_is_not_created() {
    let provider = FakeProvider::new().dropping_creates();
    let profile = profile();
    let target =
        ResourceDescriptor::new(ResourceKind::Cluster, "my-app-cluster", &profile).unwrap();
    let (mut ctx, log) = recording_context();

    let err = JobOrchestrator::new(&provider)
        .create_full(&target, &CreateParams::Cluster, &mut ctx)
        .await
        .unwrap_err();

    assert!(matches!(err, CloudError::ResourceNotCreated(_)));
    assert_eq!(provider.creates(), 1);
    assert_failed_with_one_error(&log);
}

#[tokio::test]
async fn test_create_with_malformed_envelope_is_bad_response() {
    let provider = FakeProvider::new()
        .replying(ResponseEnvelope::malformed(serde_json::json!("<html>oops</html>")));
    let profile = profile();
    let target = ResourceDescriptor::new(ResourceKind::Cluster, "web", &profile).unwrap();
    let (mut ctx, log) = recording_context();

    let err = JobOrchestrator::new(&provider)
        .create_full(&target, &CreateParams::Cluster, &mut ctx)
        .await
        .unwrap_err();

    assert!(matches!(err, CloudError::BadResponse(_)));
    assert_eq!(provider.creates(), 1);
    assert_eq!(log.channel(Channel::Response).len(), 1);
    assert_failed_with_one_error(&log);
}

#[tokio::test]
async fn test_create_auto_scaling_group() {
    let provider = FakeProvider::new().with_record(ResourceKind::LaunchConfiguration, "ecs-lc");
    let profile = profile();
    let params = CreateParams::AutoScalingGroup(
        AutoScalingGroupParams::new("ecs-lc", 1, 2, 1)
            .unwrap()
            .with_zones(vec!["us-east-1a".to_string()]),
    );
    let target =
        ResourceDescriptor::new(ResourceKind::AutoScalingGroup, "ecs-hosts", &profile).unwrap();
    let (mut ctx, log) = recording_context();

    let record = JobOrchestrator::new(&provider)
        .create_full(&target, &params, &mut ctx)
        .await
        .unwrap();

    assert_eq!(record.name, "ecs-hosts");
    assert_eq!(provider.count(ResourceKind::AutoScalingGroup, "ecs-hosts"), 1);
    assert_succeeded_without_error(&log);
    assert_eq!(
        log.channel(Channel::Stdout)[0].payload.as_text(),
        Some("Auto scaling group 'ecs-hosts' created.")
    );
}

#[tokio::test]
async fn test_delete_existing_security_group() {
    let provider = FakeProvider::new().with_record(ResourceKind::SecurityGroup, "web");
    let profile = profile();
    let target = ResourceDescriptor::new(ResourceKind::SecurityGroup, "web", &profile).unwrap();
    let (mut ctx, log) = recording_context();

    JobOrchestrator::new(&provider)
        .delete_full(&target, &mut ctx)
        .await
        .unwrap();

    assert_eq!(provider.count(ResourceKind::SecurityGroup, "web"), 0);
    assert_succeeded_without_error(&log);

    let (mut ctx, _) = recording_context();
    let recreate = JobOrchestrator::new(&provider)
        .create_full(
            &target,
            &CreateParams::SecurityGroup(SecurityGroupParams::new()),
            &mut ctx,
        )
        .await;
    assert!(recreate.is_ok());
    assert_eq!(provider.count(ResourceKind::SecurityGroup, "web"), 1);
}

#[tokio::test]
async fn test_response_channel_carries_raw_provider_body() {
    let provider = FakeProvider::new();
    let profile = profile();
    let target = ResourceDescriptor::new(ResourceKind::Cluster, "web", &profile).unwrap();
    let (mut ctx, log) = recording_context();

    JobOrchestrator::new(&provider)
        .create_full(&target, &CreateParams::Cluster, &mut ctx)
        .await
        .unwrap();

    let responses = log.channel(Channel::Response);
    assert_eq!(responses.len(), 1);
    assert_eq!(
        responses[0].payload,
        Payload::Data(serde_json::json!({ "name": "web", "status": "ACTIVE" }))
    );
}

#[tokio::test]
async fn test_create_with_refused_envelope_carries_message() {
    let provider = FakeProvider::new().replying(ResponseEnvelope::failed("LimitExceeded"));
    let profile = profile();
    let params = CreateParams::LaunchConfiguration(
        LaunchConfigurationParams::new("ami-ddc7b6b7", "t2.micro").unwrap(),
    );
    let target =
        ResourceDescriptor::new(ResourceKind::LaunchConfiguration, "lc-1", &profile).unwrap();
    let (mut ctx, log) = recording_context();

    let err = JobOrchestrator::new(&provider)
        .create_full(&target, &params, &mut ctx)
        .await
        .unwrap_err();

    match err {
        CloudError::BadResponse(message) => assert!(message.contains("LimitExceeded")),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_failed_with_one_error(&log);
}

#[tokio::test]
async fn test_create_transport_error_is_bad_response() {
    let provider = FakeProvider::new().failing_mutations();
    let profile = profile();
    let target = ResourceDescriptor::new(ResourceKind::Cluster, "web", &profile).unwrap();
    let (mut ctx, log) = recording_context();

    let err = JobOrchestrator::new(&provider)
        .create_full(&target, &CreateParams::Cluster, &mut ctx)
        .await
        .unwrap_err();

    assert!(matches!(err, CloudError::BadResponse(_)));
    assert_failed_with_one_error(&log);
}

#[tokio::test]
async fn test_create_with_mismatched_params_is_rejected() {
    let provider = FakeProvider::new();
    let profile = profile();
    let target = ResourceDescriptor::scoped(ResourceKind::Service, "api", "web", &profile).unwrap();
    let (mut ctx, log) = recording_context();

    let err = JobOrchestrator::new(&provider)
        .create_full(&target, &CreateParams::Cluster, &mut ctx)
        .await
        .unwrap_err();

    assert!(matches!(err, CloudError::InvalidParams(_)));
    assert_eq!(provider.lists(), 0);
    assert_eq!(provider.creates(), 0);
    assert_failed_with_one_error(&log);
}

#[tokio::test]
async fn test_create_scoped_service() {
    let provider = FakeProvider::new().with_scoped_record(ResourceKind::Service, "api", Some("blue"));
    let profile = profile();
    let params = CreateParams::Service(ServiceParams::new("api:4", 2).unwrap());
    let target =
        ResourceDescriptor::scoped(ResourceKind::Service, "api", "green", &profile).unwrap();
    let (mut ctx, log) = recording_context();

    let record = JobOrchestrator::new(&provider)
        .create_full(&target, &params, &mut ctx)
        .await
        .unwrap();

    assert_eq!(record.name, "api");
    assert_eq!(provider.count(ResourceKind::Service, "api"), 2);
    assert_succeeded_without_error(&log);
}

// ========== delete_full ==========

#[tokio::test]
async fn test_delete_missing_launch_configuration() {
    let provider = FakeProvider::new().with_record(ResourceKind::LaunchConfiguration, "lc-2");
    let profile = profile();
    let target =
        ResourceDescriptor::new(ResourceKind::LaunchConfiguration, "lc-1", &profile).unwrap();
    let (mut ctx, log) = recording_context();

    let err = JobOrchestrator::new(&provider)
        .delete_full(&target, &mut ctx)
        .await
        .unwrap_err();

    assert!(matches!(err, CloudError::ResourceDoesNotExist(_)));
    assert_eq!(provider.deletes(), 0);
    assert_eq!(provider.count(ResourceKind::LaunchConfiguration, "lc-2"), 1);
    assert_failed_with_one_error(&log);
}

#[tokio::test]
async fn test_delete_present_launch_configuration() {
    let provider = FakeProvider::new().with_record(ResourceKind::LaunchConfiguration, "lc-1");
    let profile = profile();
    let target =
        ResourceDescriptor::new(ResourceKind::LaunchConfiguration, "lc-1", &profile).unwrap();
    let (mut ctx, log) = recording_context();

    let deleted = JobOrchestrator::new(&provider)
        .delete_full(&target, &mut ctx)
        .await
        .unwrap();

    assert!(deleted);
    assert_eq!(provider.deletes(), 1);
    // pre-check plus post-check
    assert_eq!(provider.lists(), 2);
    assert_eq!(provider.count(ResourceKind::LaunchConfiguration, "lc-1"), 0);
    assert_succeeded_without_error(&log);
}

#[tokio::test]
async fn test_delete_still_present_is_not_deleted() {
    let provider = FakeProvider::new()
        .with_record(ResourceKind::LaunchConfiguration, "lc-1")
        .ignoring_deletes();
    let profile = profile();
    let target =
        ResourceDescriptor::new(ResourceKind::LaunchConfiguration, "lc-1", &profile).unwrap();
    let (mut ctx, log) = recording_context();

    let err = JobOrchestrator::new(&provider)
        .delete_full(&target, &mut ctx)
        .await
        .unwrap_err();

    assert!(matches!(err, CloudError::ResourceNotDeleted(_)));
    assert_eq!(provider.deletes(), 1);
    assert_eq!(provider.lists(), 2);
    assert_failed_with_one_error(&log);
}

#[tokio::test]
async fn test_delete_with_duplicates_never_mutates() {
    let provider = FakeProvider::new()
        .with_scoped_record(ResourceKind::Task, "nightly", Some("batch"))
        .with_scoped_record(ResourceKind::Task, "nightly", Some("batch"));
    let profile = profile();
    let target =
        ResourceDescriptor::scoped(ResourceKind::Task, "nightly", "batch", &profile).unwrap();
    let (mut ctx, log) = recording_context();

    let err = JobOrchestrator::new(&provider)
        .delete_full(&target, &mut ctx)
        .await
        .unwrap_err();

    assert!(matches!(err, CloudError::TooManyRecords(_)));
    assert_eq!(provider.deletes(), 0);
    assert_failed_with_one_error(&log);
}

#[tokio::test]
async fn test_delete_refused_is_bad_response() {
    let provider = FakeProvider::new()
        .with_record(ResourceKind::TaskDefinition, "web")
        .replying(ResponseEnvelope::failed("ClientException"));
    let profile = profile();
    let target = ResourceDescriptor::new(ResourceKind::TaskDefinition, "web", &profile).unwrap();
    let (mut ctx, log) = recording_context();

    let err = JobOrchestrator::new(&provider)
        .delete_full(&target, &mut ctx)
        .await
        .unwrap_err();

    assert!(matches!(err, CloudError::BadResponse(_)));
    assert_eq!(provider.count(ResourceKind::TaskDefinition, "web"), 1);
    assert_failed_with_one_error(&log);
}

// ========== full round trip ==========

#[tokio::test]
async fn test_create_then_delete_then_recreate() {
    let provider = FakeProvider::new();
    let profile = profile();
    let target = ResourceDescriptor::new(ResourceKind::Cluster, "web", &profile).unwrap();
    let jobs = JobOrchestrator::new(&provider);

    let (mut ctx, _log) = recording_context();
    jobs.create_full(&target, &CreateParams::Cluster, &mut ctx)
        .await
        .unwrap();

    let (mut ctx, _log) = recording_context();
    assert!(jobs.delete_full(&target, &mut ctx).await.unwrap());

    let (mut ctx, _log) = recording_context();
    jobs.create_full(&target, &CreateParams::Cluster, &mut ctx)
        .await
        .unwrap();

    assert_eq!(provider.creates(), 2);
    assert_eq!(provider.deletes(), 1);
    assert_eq!(provider.count(ResourceKind::Cluster, "web"), 1);
}

#[tokio::test]
async fn test_list_is_not_a_job() {
    let provider = FakeProvider::new().with_record(ResourceKind::Cluster, "web");
    let profile = profile();
    let (mut ctx, log) = recording_context();

    let records = JobOrchestrator::new(&provider)
        .list(&profile, ResourceKind::Cluster, None, &mut ctx)
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert!(log.channel(Channel::Heading).is_empty());
}
