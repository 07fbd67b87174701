//! Terminal rendering of job reports

use colored::Colorize;
use shipwright_cloud::{Channel, Payload, ReportEvent, ReportLevel, Reports, Sink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Out,
    Err,
}

/// Sink writing selected channels to stdout/stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalSink;

impl Sink for TerminalSink {
    fn emit(&mut self, reports: &Reports, event: &ReportEvent) {
        match render(reports, event) {
            Some((Stream::Out, line)) => println!("{}", line),
            Some((Stream::Err, line)) => eprintln!("{}", line),
            None => {}
        }
    }
}

pub fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("    {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn payload_text(payload: &Payload) -> String {
    match payload {
        Payload::Text(text) => text.clone(),
        Payload::Data(value) => pretty(value),
    }
}

/// Decide whether and where an event is printed.
///
/// Job channels print under `jobs`. The stdout/stderr mirrors stand in for
/// them when `jobs` is off, so nothing is printed twice. Failures always
/// print, `quiet` included.
pub fn render(reports: &Reports, event: &ReportEvent) -> Option<(Stream, String)> {
    let text = payload_text(&event.payload);

    if reports.contains(ReportLevel::Quiet) {
        return match event.channel {
            Channel::Stderr => Some((Stream::Err, text.red().to_string())),
            _ => None,
        };
    }

    let jobs = reports.contains(ReportLevel::Jobs);

    match event.channel {
        Channel::Heading if jobs => Some((Stream::Out, format!("==> {}", text).bold().to_string())),
        Channel::Text if jobs => Some((Stream::Out, format!("    {}", text))),
        Channel::Data if jobs => Some((Stream::Out, indent(&text).dimmed().to_string())),
        Channel::Warning if jobs => Some((
            Stream::Err,
            format!("{} {}", "Warning:".yellow().bold(), text),
        )),
        Channel::Error if jobs => Some((
            Stream::Err,
            format!("{} {}", "Error:".red().bold(), text),
        )),
        Channel::Stdout if !jobs => Some((Stream::Out, text)),
        Channel::Stderr if !jobs => Some((Stream::Err, text.red().to_string())),
        Channel::Response if reports.contains(ReportLevel::Provider) => {
            Some((Stream::Out, text.cyan().to_string()))
        }
        _ => None,
    }
}
