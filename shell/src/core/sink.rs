//! Output channels a [`Logger`](crate::core::logger::Logger) echoes into.

use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

/// Console-style stream an echoed line is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Plain log stream, shared by `info` and `debug`.
    Log,
    Warn,
    Error,
}

/// Destination for echoed log lines.
pub trait Sink: Send {
    fn echo(&mut self, channel: Channel, line: &str);
}

/// Writes `Log` lines to stdout and `Warn`/`Error` lines to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl Sink for ConsoleSink {
    fn echo(&mut self, channel: Channel, line: &str) {
        // A closed pipe must not take the logger down with it.
        let _ = match channel {
            Channel::Log => writeln!(std::io::stdout().lock(), "{line}"),
            Channel::Warn | Channel::Error => writeln!(std::io::stderr().lock(), "{line}"),
        };
    }
}

/// One captured echo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoLine {
    pub channel: Channel,
    pub line: String,
}

/// In-memory sink. Clones share the same buffer, so a caller can keep one
/// handle and give another to a logger.
#[derive(Debug, Clone, Default)]
pub struct CaptureSink {
    lines: Arc<Mutex<Vec<EchoLine>>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line echoed so far.
    pub fn lines(&self) -> Vec<EchoLine> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_empty(&self) -> bool {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl Sink for CaptureSink {
    fn echo(&mut self, channel: Channel, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(EchoLine {
                channel,
                line: line.to_string(),
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_clones_share_buffer() {
        let handle = CaptureSink::new();
        let mut writer = handle.clone();
        writer.echo(Channel::Warn, "careful");

        assert_eq!(
            handle.lines(),
            vec![EchoLine {
                channel: Channel::Warn,
                line: "careful".to_string()
            }]
        );
    }
}
