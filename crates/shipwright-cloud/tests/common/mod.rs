use async_trait::async_trait;
use serde_json::json;
use shipwright_cloud::{
    Channel, CreateParams, JobContext, MemorySink, Profile, ProviderClient, ProviderError,
    ProviderRecord, ReportEvent, ResourceDescriptor, ResourceKind, ResponseEnvelope,
};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory provider that counts mutating calls
pub struct FakeProvider {
    records: Mutex<Vec<(ResourceKind, Option<String>, ProviderRecord)>>,
    creates: AtomicUsize,
    deletes: AtomicUsize,
    lists: AtomicUsize,
    persist_creates: bool,
    honour_deletes: bool,
    reply: Option<ResponseEnvelope>,
    fail_lists: bool,
    fail_mutations: bool,
}

#[allow(dead_code)]
impl FakeProvider {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            creates: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
            lists: AtomicUsize::new(0),
            persist_creates: true,
            honour_deletes: true,
            reply: None,
            fail_lists: false,
            fail_mutations: false,
        }
    }

    pub fn with_record(self, kind: ResourceKind, name: &str) -> Self {
        self.with_scoped_record(kind, name, None)
    }

    pub fn with_scoped_record(self, kind: ResourceKind, name: &str, scope: Option<&str>) -> Self {
        self.records.lock().unwrap().push((
            kind,
            scope.map(str::to_string),
            ProviderRecord::new(name, json!({ "name": name, "status": "ACTIVE" })),
        ));
        self
    }

    /// Create calls succeed but nothing shows up afterwards
    pub fn dropping_creates(mut self) -> Self {
        self.persist_creates = false;
        self
    }

    /// Delete calls succeed but the record stays
    pub fn ignoring_deletes(mut self) -> Self {
        self.honour_deletes = false;
        self
    }

    /// Every mutating call answers with `reply` and changes nothing
    pub fn replying(mut self, reply: ResponseEnvelope) -> Self {
        self.reply = Some(reply);
        self
    }

    pub fn failing_lists(mut self) -> Self {
        self.fail_lists = true;
        self
    }

    pub fn failing_mutations(mut self) -> Self {
        self.fail_mutations = true;
        self
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub fn lists(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }

    pub fn count(&self, kind: ResourceKind, name: &str) -> usize {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _, r)| *k == kind && r.name == name)
            .count()
    }
}

#[async_trait]
impl ProviderClient for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    async fn list(
        &self,
        _profile: &Profile,
        kind: ResourceKind,
        scope: Option<&str>,
    ) -> Result<Vec<ProviderRecord>, ProviderError> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        if self.fail_lists {
            return Err(ProviderError::CommandFailed("throttled".to_string()));
        }

        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, s, _)| *k == kind && s.as_deref() == scope)
            .map(|(_, _, r)| r.clone())
            .collect())
    }

    async fn create(
        &self,
        target: &ResourceDescriptor<'_>,
        _params: &CreateParams,
    ) -> Result<ResponseEnvelope, ProviderError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        if self.fail_mutations {
            return Err(ProviderError::CommandFailed("connection reset".to_string()));
        }
        if let Some(reply) = &self.reply {
            return Ok(reply.clone());
        }

        let body = json!({ "name": target.name, "status": "ACTIVE" });
        if self.persist_creates {
            self.records.lock().unwrap().push((
                target.kind,
                target.scope.clone(),
                ProviderRecord::new(target.name.clone(), body.clone()),
            ));
        }
        Ok(ResponseEnvelope::ok(body))
    }

    async fn delete(
        &self,
        target: &ResourceDescriptor<'_>,
    ) -> Result<ResponseEnvelope, ProviderError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_mutations {
            return Err(ProviderError::CommandFailed("connection reset".to_string()));
        }
        if let Some(reply) = &self.reply {
            return Ok(reply.clone());
        }

        if self.honour_deletes {
            self.records
                .lock()
                .unwrap()
                .retain(|(k, s, r)| !(*k == target.kind && *s == target.scope && r.name == target.name));
        }
        Ok(ResponseEnvelope::ok(serde_json::Value::Null))
    }
}

/// Context wired to a shared event log on every channel
pub fn recording_context() -> (JobContext<'static>, MemorySink) {
    let log = MemorySink::new();
    let ctx = JobContext::default().with_all(log.clone());
    (ctx, log)
}

/// Events on the job channels (stdout/stderr/response mirrors excluded)
#[allow(dead_code)]
pub fn job_events(log: &MemorySink) -> Vec<ReportEvent> {
    log.events()
        .into_iter()
        .filter(|e| {
            matches!(
                e.channel,
                Channel::Heading | Channel::Data | Channel::Text | Channel::Warning | Channel::Error
            )
        })
        .collect()
}
