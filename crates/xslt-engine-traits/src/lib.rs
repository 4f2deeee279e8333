//! Core trait abstractions for XSLT 3.0 processing engines.
//!
//! This crate defines the interface a transformation service needs from an
//! XSLT engine: document parsing, stylesheet compilation, execution, and a
//! callback surface through which the engine reports diagnostics.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod xslt;

pub use config::{EngineConfiguration, DEFAULT_INITIAL_TEMPLATE};
pub use diagnostics::{Diagnostic, DiagnosticOrigin, DiagnosticSink, Severity, SourceLocation};
pub use error::Error;
pub use xslt::{ExtendedXsltProcessor, OutputMethod, ProcessorFactory, XsltProcessor};

/// Namespace URI of XSLT instructions and declarations
pub const XSLT_NAMESPACE: &str = "http://www.w3.org/1999/XSL/Transform";
