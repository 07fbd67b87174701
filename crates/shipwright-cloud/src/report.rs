//! Reporting channels for job activity
//!
//! A [`JobContext`] carries one [`Sink`] per channel. Channels are fully
//! independent: a job writes to whichever channel fits the message and each
//! sink decides, from the selected [`Reports`], whether to render it. A
//! channel nobody attached is backed by [`Silent`].

use crate::error::{CloudError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

/// Output channel of the reporting bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Opens a job
    Heading,
    /// Structured progress/results
    Data,
    /// Plain progress/results
    Text,
    /// Advisory; never stops a job
    Warning,
    /// Always followed by a raised failure
    Error,
    /// Terminal mirror of results
    Stdout,
    /// Terminal mirror of errors
    Stderr,
    /// Raw provider responses
    Response,
}

impl Channel {
    pub const ALL: [Channel; 8] = [
        Channel::Heading,
        Channel::Data,
        Channel::Text,
        Channel::Warning,
        Channel::Error,
        Channel::Stdout,
        Channel::Stderr,
        Channel::Response,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Text(String),
    Data(serde_json::Value),
}

impl Payload {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            Payload::Data(_) => None,
        }
    }
}

impl std::fmt::Display for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Payload::Text(text) => write!(f, "{}", text),
            Payload::Data(value) => match serde_json::to_string_pretty(value) {
                Ok(pretty) => write!(f, "{}", pretty),
                Err(_) => write!(f, "{}", value),
            },
        }
    }
}

/// A single message delivered to one channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEvent {
    pub channel: Channel,
    pub payload: Payload,
}

/// Report level a user can opt into
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportLevel {
    /// Failures only
    Quiet,
    /// Full provider records in listings
    Records,
    /// Job progress
    Jobs,
    /// Raw provider responses
    Provider,
}

impl FromStr for ReportLevel {
    type Err = CloudError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" => Ok(ReportLevel::Quiet),
            "records" => Ok(ReportLevel::Records),
            "jobs" => Ok(ReportLevel::Jobs),
            "aws" | "provider" => Ok(ReportLevel::Provider),
            _ => Err(CloudError::InvalidParams(format!(
                "Bad report '{}'. Must be one of: quiet, records, jobs, aws",
                s
            ))),
        }
    }
}

/// The set of report levels selected for a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reports(BTreeSet<ReportLevel>);

impl Reports {
    pub fn new(levels: impl IntoIterator<Item = ReportLevel>) -> Self {
        Self(levels.into_iter().collect())
    }

    /// Parse user-supplied level names
    pub fn parse<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        names
            .iter()
            .map(|name| name.as_ref().parse::<ReportLevel>())
            .collect::<Result<BTreeSet<_>>>()
            .map(Self)
    }

    pub fn quiet() -> Self {
        Self::new([ReportLevel::Quiet])
    }

    pub fn contains(&self, level: ReportLevel) -> bool {
        self.0.contains(&level)
    }

    pub fn iter(&self) -> impl Iterator<Item = ReportLevel> + '_ {
        self.0.iter().copied()
    }
}

impl Default for Reports {
    fn default() -> Self {
        Self::new([ReportLevel::Jobs])
    }
}

/// Receiver behind one channel
pub trait Sink: Send {
    fn emit(&mut self, reports: &Reports, event: &ReportEvent);
}

/// Sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Sink for Silent {
    fn emit(&mut self, _reports: &Reports, _event: &ReportEvent) {}
}

/// Shared in-memory log of every event, in delivery order
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<ReportEvent>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ReportEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Events of one channel only
    pub fn channel(&self, channel: Channel) -> Vec<ReportEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.channel == channel)
            .collect()
    }
}

impl Sink for MemorySink {
    fn emit(&mut self, _reports: &Reports, event: &ReportEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}

type BoxedSink<'a> = Box<dyn Sink + 'a>;

/// Reporter channels plus report selection for one job invocation
pub struct JobContext<'a> {
    reports: Reports,
    heading: BoxedSink<'a>,
    data: BoxedSink<'a>,
    text: BoxedSink<'a>,
    warning: BoxedSink<'a>,
    error: BoxedSink<'a>,
    stdout: BoxedSink<'a>,
    stderr: BoxedSink<'a>,
    response: BoxedSink<'a>,
}

impl<'a> JobContext<'a> {
    /// Context with every channel silent
    pub fn new(reports: Reports) -> Self {
        Self {
            reports,
            heading: Box::new(Silent),
            data: Box::new(Silent),
            text: Box::new(Silent),
            warning: Box::new(Silent),
            error: Box::new(Silent),
            stdout: Box::new(Silent),
            stderr: Box::new(Silent),
            response: Box::new(Silent),
        }
    }

    /// Attach a sink to one channel, replacing what was there
    pub fn with_sink(mut self, channel: Channel, sink: impl Sink + 'a) -> Self {
        *self.slot(channel) = Box::new(sink);
        self
    }

    /// Attach clones of `sink` to every channel
    pub fn with_all<S: Sink + Clone + 'a>(mut self, sink: S) -> Self {
        for channel in Channel::ALL {
            *self.slot(channel) = Box::new(sink.clone());
        }
        self
    }

    pub fn reports(&self) -> &Reports {
        &self.reports
    }

    fn slot(&mut self, channel: Channel) -> &mut BoxedSink<'a> {
        match channel {
            Channel::Heading => &mut self.heading,
            Channel::Data => &mut self.data,
            Channel::Text => &mut self.text,
            Channel::Warning => &mut self.warning,
            Channel::Error => &mut self.error,
            Channel::Stdout => &mut self.stdout,
            Channel::Stderr => &mut self.stderr,
            Channel::Response => &mut self.response,
        }
    }

    fn emit(&mut self, channel: Channel, payload: Payload) {
        let event = ReportEvent { channel, payload };
        let reports = self.reports.clone();
        self.slot(channel).emit(&reports, &event);
    }

    pub fn heading(&mut self, message: impl Into<String>) {
        self.emit(Channel::Heading, Payload::Text(message.into()));
    }

    pub fn data(&mut self, value: serde_json::Value) {
        self.emit(Channel::Data, Payload::Data(value));
    }

    pub fn text(&mut self, message: impl Into<String>) {
        self.emit(Channel::Text, Payload::Text(message.into()));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.emit(Channel::Warning, Payload::Text(message.into()));
    }

    /// Prefer [`JobContext::fail`], which keeps errors paired with failures
    pub fn error(&mut self, message: impl Into<String>) {
        self.emit(Channel::Error, Payload::Text(message.into()));
    }

    pub fn stdout(&mut self, message: impl Into<String>) {
        self.emit(Channel::Stdout, Payload::Text(message.into()));
    }

    pub fn stderr(&mut self, message: impl Into<String>) {
        self.emit(Channel::Stderr, Payload::Text(message.into()));
    }

    pub fn response(&mut self, value: serde_json::Value) {
        self.emit(Channel::Response, Payload::Data(value));
    }

    /// Report `err` and hand it back for raising.
    ///
    /// The stderr mirror goes out first so the `error` event is the last one
    /// delivered before the job exits.
    pub fn fail(&mut self, err: CloudError) -> CloudError {
        let message = err.to_string();
        tracing::debug!(kind = err.kind(), "job failed: {}", message);
        self.stderr(message.clone());
        self.error(message);
        err
    }
}

impl Default for JobContext<'_> {
    fn default() -> Self {
        Self::new(Reports::default())
    }
}
