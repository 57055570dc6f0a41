use std::io::{self, IsTerminal, Write};

use tracing::debug;

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// Transient user feedback: task added, task deleted, empty-input rejection.
#[derive(Debug, Clone)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

impl Notice {
    pub fn info(title: &str, message: &str) -> Self {
        Self {
            title: title.to_string(),
            message: message.to_string(),
            severity: Severity::Info,
        }
    }

    pub fn error(title: &str, message: &str) -> Self {
        Self {
            title: title.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notifier {
    color: bool,
}

impl Notifier {
    pub fn new(cfg: &Config) -> Self {
        let color = cfg.get_bool("color").unwrap_or(true);
        debug!(color, "initialized notifier");
        Self { color }
    }

    /// Notices go to stderr so they never mix into command output.
    pub fn emit(&self, notice: Notice) {
        debug!(title = %notice.title, severity = ?notice.severity, "emitting notice");

        let mut err = io::stderr().lock();
        let title = self.paint(&notice.title, notice.severity);
        let _ = writeln!(err, "{}: {}", title, notice.message);
    }

    fn paint(&self, text: &str, severity: Severity) -> String {
        if !self.color || !io::stderr().is_terminal() {
            return text.to_string();
        }
        let code = match severity {
            Severity::Info => "36",
            Severity::Error => "31",
        };
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}
