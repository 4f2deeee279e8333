//! Collects engine diagnostics for one transformation

use tracing::debug;
use xslt_engine_traits::{Diagnostic, DiagnosticOrigin, DiagnosticSink, Severity, SourceLocation};

/// One recorded error or fatal error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRecord {
    pub severity: Severity,
    pub origin: DiagnosticOrigin,
    pub location: Option<SourceLocation>,
    pub message: String,
}

impl DiagnosticRecord {
    /// `[Error : line 3, column 9] message`, or the bare message without a location
    pub fn located_message(&self) -> String {
        match self.location {
            Some(location) => format!("[{} : {}] {}", self.severity.label(), location, self.message),
            None => self.message.clone(),
        }
    }
}

/// [`DiagnosticSink`] that records errors and fatal errors and drops warnings.
///
/// Scoped to a single transformation; it never fails and never propagates.
#[derive(Debug, Default)]
pub struct DiagnosticsCollector {
    ledger: Vec<DiagnosticRecord>,
    echo_bare_messages: bool,
}

impl DiagnosticsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also emit the bare message after each located stylesheet diagnostic
    pub fn with_bare_message_echo(mut self, enabled: bool) -> Self {
        self.echo_bare_messages = enabled;
        self
    }

    /// Every record in arrival order
    pub fn records(&self) -> &[DiagnosticRecord] {
        &self.ledger
    }

    pub fn is_empty(&self) -> bool {
        self.ledger.is_empty()
    }

    /// Rendered messages of the error bucket
    pub fn errors(&self) -> Vec<String> {
        self.bucket(Severity::Error)
    }

    /// Rendered messages of the fatal bucket
    pub fn fatal_errors(&self) -> Vec<String> {
        self.bucket(Severity::Fatal)
    }

    /// Error bucket followed by fatal bucket
    pub fn into_messages(self) -> Vec<String> {
        let mut messages = self.errors();
        messages.extend(self.fatal_errors());
        messages
    }

    fn bucket(&self, severity: Severity) -> Vec<String> {
        let mut messages = Vec::new();
        for record in self.ledger.iter().filter(|r| r.severity == severity) {
            messages.push(record.located_message());
            if self.echo_bare_messages
                && record.origin == DiagnosticOrigin::Stylesheet
                && record.location.is_some()
            {
                messages.push(record.message.clone());
            }
        }
        messages
    }

    fn record(&mut self, severity: Severity, diagnostic: Diagnostic) {
        debug!(
            severity = severity.label(),
            origin = ?diagnostic.origin,
            message = %diagnostic.message,
            "engine diagnostic"
        );
        self.ledger.push(DiagnosticRecord {
            severity,
            origin: diagnostic.origin,
            location: diagnostic.location,
            message: diagnostic.message,
        });
    }
}

impl DiagnosticSink for DiagnosticsCollector {
    fn error(&mut self, diagnostic: Diagnostic) {
        self.record(Severity::Error, diagnostic);
    }

    fn fatal_error(&mut self, diagnostic: Diagnostic) {
        self.record(Severity::Fatal, diagnostic);
    }

    fn warning(&mut self, diagnostic: Diagnostic) {
        debug!(message = %diagnostic.message, "engine warning discarded");
    }
}
