//! Namespaced, togglable structured logger.
//!
//! Every call is buffered in memory and can be exported later. `info`, `warn`
//! and `error` entries are always echoed to the sink; `debug` entries are
//! echoed only while debug output is enabled.
//!
//! # Separation of Concerns
//!
//! - **Logger (this module)**: the product audit trail. Entries are part of a
//!   module's observable behavior and are always recorded.
//! - **Tracing (`crate::logging`)**: developer diagnostics via `RUST_LOG`.

use std::collections::VecDeque;

use anyhow::{Result, anyhow};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::core::outcome::Outcome;
use crate::core::sink::{Channel, ConsoleSink, Sink};
use crate::core::validator::{validate_boolean, validate_string};

/// Namespace used when none (or an invalid one) is configured.
pub const DEFAULT_NAMESPACE: &str = "PROVOWARE";

/// Structured context attached to an entry.
pub type Meta = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Debug,
}

impl LogLevel {
    pub fn label(self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Debug => "DEBUG",
        }
    }

    pub fn channel(self) -> Channel {
        match self {
            LogLevel::Info | LogLevel::Debug => Channel::Log,
            LogLevel::Warn => Channel::Warn,
            LogLevel::Error => Channel::Error,
        }
    }
}

/// A recorded log call. Only constructible from a validated message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    level: LogLevel,
    message: String,
    timestamp: String,
    meta: Meta,
}

impl LogEntry {
    /// Build an entry from a raw message, failing if it is not a string.
    pub fn new(level: LogLevel, message: &Value, meta: Value) -> Result<Self> {
        match validate_string(message, "message") {
            Outcome::Success { payload, .. } => Ok(Self::stamped(level, payload, meta)),
            Outcome::Failure { message } => Err(anyhow!(message)),
        }
    }

    fn stamped(level: LogLevel, message: String, meta: Value) -> Self {
        Self {
            level,
            message,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            meta: normalize_meta(meta),
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// ISO-8601 UTC instant, e.g. `2024-05-01T09:30:00.125Z`.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    fn echo_line(&self, namespace: &str) -> String {
        format!(
            "[{namespace}] {} {}: {} {}",
            self.timestamp,
            self.level.label(),
            self.message,
            Value::Object(self.meta.clone())
        )
    }
}

/// Metadata never fails: objects pass through, `null` is empty, anything else
/// is kept under a `value` key.
fn normalize_meta(meta: Value) -> Meta {
    match meta {
        Value::Object(map) => map,
        Value::Null => Meta::new(),
        other => {
            let mut map = Meta::new();
            map.insert("value".to_string(), other);
            map
        }
    }
}

/// Typed logger configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerOptions {
    pub debug: bool,
    pub namespace: String,
    /// Keep at most this many entries (newest win). `None` keeps everything;
    /// a cap of 0 is treated as 1.
    pub max_entries: Option<usize>,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            debug: false,
            namespace: DEFAULT_NAMESPACE.to_string(),
            max_entries: None,
        }
    }
}

impl LoggerOptions {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_max_entries(mut self, max_entries: Option<usize>) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Parse `{ "debug"?: bool, "namespace"?: string }`.
    ///
    /// Invalid fields fall back to their defaults instead of failing.
    pub fn from_value(options: &Value) -> Self {
        let defaults = Self::default();

        let debug = match options.get("debug") {
            None | Some(Value::Null) => defaults.debug,
            Some(raw) => validate_boolean(raw, "debug")
                .into_payload()
                .unwrap_or_else(|| {
                    debug!(value = %raw, "invalid debug option, using default");
                    defaults.debug
                }),
        };

        let namespace = match options.get("namespace") {
            None | Some(Value::Null) => defaults.namespace,
            Some(raw) => validate_string(raw, "namespace")
                .into_payload()
                .unwrap_or_else(|| {
                    debug!(value = %raw, "invalid namespace option, using default");
                    defaults.namespace
                }),
        };

        Self {
            debug,
            namespace,
            max_entries: defaults.max_entries,
        }
    }
}

struct LoggerState {
    debug_enabled: bool,
    namespace: String,
    entries: VecDeque<LogEntry>,
    max_entries: Option<usize>,
}

/// Per-namespace structured logger. Each instance owns its own state.
pub struct Logger {
    state: LoggerState,
    sink: Box<dyn Sink>,
}

/// Create a console logger from raw options, degrading invalid fields.
pub fn create_logger(options: &Value) -> Logger {
    Logger::new(LoggerOptions::from_value(options), ConsoleSink)
}

impl Logger {
    pub fn new(options: LoggerOptions, sink: impl Sink + 'static) -> Self {
        Self {
            state: LoggerState {
                debug_enabled: options.debug,
                namespace: options.namespace,
                entries: VecDeque::new(),
                max_entries: options.max_entries.map(|limit| limit.max(1)),
            },
            sink: Box::new(sink),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.state.namespace
    }

    pub fn debug_enabled(&self) -> bool {
        self.state.debug_enabled
    }

    pub fn info(&mut self, message: &str, meta: Value) -> Outcome<LogEntry> {
        self.push(LogEntry::stamped(LogLevel::Info, message.to_string(), meta))
    }

    pub fn warn(&mut self, message: &str, meta: Value) -> Outcome<LogEntry> {
        self.push(LogEntry::stamped(LogLevel::Warn, message.to_string(), meta))
    }

    pub fn error(&mut self, message: &str, meta: Value) -> Outcome<LogEntry> {
        self.push(LogEntry::stamped(LogLevel::Error, message.to_string(), meta))
    }

    /// Always recorded; echoed only while debug output is enabled.
    pub fn debug(&mut self, message: &str, meta: Value) -> Outcome<LogEntry> {
        self.push(LogEntry::stamped(LogLevel::Debug, message.to_string(), meta))
    }

    /// Log a raw, untyped message.
    ///
    /// A non-string message is a caller defect: it returns `Err` and nothing
    /// is recorded.
    pub fn record(
        &mut self,
        level: LogLevel,
        message: &Value,
        meta: Value,
    ) -> Result<Outcome<LogEntry>> {
        let entry = LogEntry::new(level, message, meta)?;
        Ok(self.push(entry))
    }

    /// Toggle debug echo. Invalid input leaves the current state untouched.
    pub fn enable_debug(&mut self, value: impl Into<Value>) -> Outcome<bool> {
        let outcome = validate_boolean(&value.into(), "debug");
        if let Some(enabled) = outcome.payload() {
            self.state.debug_enabled = *enabled;
        }
        outcome
    }

    /// Copy of every retained entry in insertion order.
    pub fn export_logs(&self) -> Outcome<Vec<LogEntry>> {
        Outcome::success(
            "Logs exported",
            self.state.entries.iter().cloned().collect(),
        )
    }

    fn push(&mut self, entry: LogEntry) -> Outcome<LogEntry> {
        if entry.level != LogLevel::Debug || self.state.debug_enabled {
            let line = entry.echo_line(&self.state.namespace);
            self.sink.echo(entry.level.channel(), &line);
        }

        self.state.entries.push_back(entry.clone());
        if let Some(limit) = self.state.max_entries {
            while self.state.entries.len() > limit {
                self.state.entries.pop_front();
            }
        }

        Outcome::success("Log stored", entry)
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("namespace", &self.state.namespace)
            .field("debug_enabled", &self.state.debug_enabled)
            .field("entries", &self.state.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sink::CaptureSink;
    use chrono::DateTime;
    use serde_json::json;

    fn capture(options: LoggerOptions) -> (Logger, CaptureSink) {
        let sink = CaptureSink::new();
        (Logger::new(options, sink.clone()), sink)
    }

    #[test]
    fn debug_is_buffered_but_silent_by_default() {
        let (mut logger, sink) = capture(LoggerOptions::new("T"));
        let outcome = logger.debug("m", Value::Null);

        assert!(outcome.is_success());
        assert!(sink.is_empty());
        assert_eq!(logger.export_logs().payload().map(Vec::len), Some(1));
    }

    #[test]
    fn info_is_buffered_and_echoed() {
        let (mut logger, sink) = capture(LoggerOptions::new("T"));
        logger.info("m", Value::Null);

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].channel, Channel::Log);
        assert!(lines[0].line.starts_with("[T] "));
        assert!(lines[0].line.contains(" INFO: m {}"));
    }

    #[test]
    fn levels_map_to_channels() {
        let (mut logger, sink) = capture(LoggerOptions::new("T").with_debug(true));
        logger.debug("d", Value::Null);
        logger.info("i", Value::Null);
        logger.warn("w", Value::Null);
        logger.error("e", Value::Null);

        let channels: Vec<Channel> = sink.lines().iter().map(|l| l.channel).collect();
        assert_eq!(
            channels,
            vec![Channel::Log, Channel::Log, Channel::Warn, Channel::Error]
        );
    }

    #[test]
    fn enable_debug_turns_on_echo() {
        let (mut logger, sink) = capture(LoggerOptions::new("T"));
        assert!(logger.enable_debug(true).is_success());
        logger.debug("now visible", json!({ "step": 1 }));

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].line.contains("DEBUG: now visible {\"step\":1}"));
    }

    #[test]
    fn invalid_enable_debug_leaves_state_unchanged() {
        let (mut logger, _sink) = capture(LoggerOptions::new("T").with_debug(true));
        let outcome = logger.enable_debug("not a bool");

        assert!(!outcome.is_success());
        assert!(logger.debug_enabled());

        logger.enable_debug(false);
        logger.enable_debug(json!(0));
        assert!(!logger.debug_enabled());
    }

    #[test]
    fn record_rejects_non_string_messages() {
        let (mut logger, sink) = capture(LoggerOptions::new("T"));
        let err = logger
            .record(LogLevel::Info, &json!(42), Value::Null)
            .expect_err("non-string message must fail");

        assert!(err.to_string().contains("message must be a string"));
        assert!(sink.is_empty());
        assert_eq!(logger.export_logs().payload().map(Vec::len), Some(0));
    }

    #[test]
    fn record_accepts_string_values() {
        let (mut logger, _sink) = capture(LoggerOptions::new("T"));
        let outcome = logger
            .record(LogLevel::Warn, &json!("raw"), json!({ "k": "v" }))
            .expect("record");
        let entry = outcome.payload().expect("entry");
        assert_eq!(entry.level(), LogLevel::Warn);
        assert_eq!(entry.message(), "raw");
    }

    #[test]
    fn export_returns_independent_copies() {
        let (mut logger, _sink) = capture(LoggerOptions::new("T"));
        logger.info("first", Value::Null);

        let mut first = logger.export_logs().into_payload().expect("payload");
        let second = logger.export_logs().into_payload().expect("payload");
        assert_eq!(first, second);

        first.clear();
        assert_eq!(second.len(), 1);
        assert_eq!(logger.export_logs().payload().map(Vec::len), Some(1));
    }

    #[test]
    fn meta_is_normalized_not_rejected() {
        let (mut logger, _sink) = capture(LoggerOptions::new("T"));
        let entry = logger.info("m", json!("loose")).into_payload().expect("entry");
        assert_eq!(entry.meta().get("value"), Some(&json!("loose")));

        let entry = logger.info("m", Value::Null).into_payload().expect("entry");
        assert!(entry.meta().is_empty());
    }

    #[test]
    fn timestamps_are_iso_8601() {
        let (mut logger, _sink) = capture(LoggerOptions::new("T"));
        let entry = logger.warn("m", Value::Null).into_payload().expect("entry");
        assert!(DateTime::parse_from_rfc3339(entry.timestamp()).is_ok());
        assert!(entry.timestamp().ends_with('Z'));
    }

    #[test]
    fn capped_logger_keeps_newest_entries() {
        let (mut logger, _sink) = capture(LoggerOptions::new("T").with_max_entries(Some(2)));
        for message in ["a", "b", "c"] {
            logger.info(message, Value::Null);
        }

        let entries = logger.export_logs().into_payload().expect("payload");
        let messages: Vec<&str> = entries.iter().map(LogEntry::message).collect();
        assert_eq!(messages, vec!["b", "c"]);
    }

    #[test]
    fn zero_cap_still_keeps_the_latest_entry() {
        let (mut logger, _sink) = capture(LoggerOptions::new("T").with_max_entries(Some(0)));
        logger.info("a", Value::Null);
        let stored = logger.info("b", Value::Null);
        assert_eq!(stored.message(), "Log stored");

        let entries = logger.export_logs().into_payload().expect("payload");
        let messages: Vec<&str> = entries.iter().map(LogEntry::message).collect();
        assert_eq!(messages, vec!["b"]);
    }

    #[test]
    fn options_fall_back_on_invalid_values() {
        let options = LoggerOptions::from_value(&json!({ "debug": "yes", "namespace": 7 }));
        assert_eq!(options, LoggerOptions::default());

        let options = LoggerOptions::from_value(&json!({ "debug": true, "namespace": "Lint" }));
        assert!(options.debug);
        assert_eq!(options.namespace, "Lint");

        let options = LoggerOptions::from_value(&Value::Null);
        assert_eq!(options.namespace, DEFAULT_NAMESPACE);
    }
}
