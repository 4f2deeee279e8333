//! Diagnostic callback surface
//!
//! Engines report problems found while parsing, compiling and executing
//! through a [`DiagnosticSink`] rather than only through returned errors.
//! A sink never fails; what it does with a diagnostic is its own business.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of a reported diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Informational, the transformation is unaffected
    Warning,
    /// Recoverable error, the engine may carry on
    Error,
    /// Non-recoverable error
    Fatal,
}

impl Severity {
    /// Label used when rendering a location-prefixed message
    pub fn label(self) -> &'static str {
        match self {
            Severity::Warning => "Warning",
            Severity::Error => "Error",
            Severity::Fatal => "Fatal error",
        }
    }
}

/// Which part of the engine raised a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticOrigin {
    /// Stylesheet compilation or execution, located via the stylesheet source
    Stylesheet,
    /// XML document parsing, located by line and column of the parsed text
    Parser,
}

/// Position of a diagnostic in its source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// A single signal emitted by an engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub origin: DiagnosticOrigin,
    pub location: Option<SourceLocation>,
    pub message: String,
}

impl Diagnostic {
    /// A diagnostic raised while compiling or running a stylesheet
    pub fn stylesheet<S: Into<String>>(message: S) -> Self {
        Self {
            origin: DiagnosticOrigin::Stylesheet,
            location: None,
            message: message.into(),
        }
    }

    /// A diagnostic raised by the XML parser
    pub fn parser<S: Into<String>>(message: S, line: u32, column: u32) -> Self {
        Self {
            origin: DiagnosticOrigin::Parser,
            location: Some(SourceLocation { line, column }),
            message: message.into(),
        }
    }

    /// Attach a source location
    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.location = Some(SourceLocation { line, column });
        self
    }
}

/// Receiver for engine diagnostics.
///
/// Implementations must not panic or block; they are called synchronously
/// from inside the engine.
pub trait DiagnosticSink {
    /// A recoverable error
    fn error(&mut self, diagnostic: Diagnostic);

    /// A non-recoverable error
    fn fatal_error(&mut self, diagnostic: Diagnostic);

    /// A warning
    fn warning(&mut self, diagnostic: Diagnostic);

    /// Dispatch on severity
    fn report(&mut self, severity: Severity, diagnostic: Diagnostic) {
        match severity {
            Severity::Warning => self.warning(diagnostic),
            Severity::Error => self.error(diagnostic),
            Severity::Fatal => self.fatal_error(diagnostic),
        }
    }
}
