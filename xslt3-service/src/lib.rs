//! xslt3-service: XSLT 3.0 transformations over HTTP
//!
//! Uploaded documents are checked against size limits, parsed, handed to an
//! XSLT engine together with the requested options, and the engine's
//! diagnostics decide whether the caller gets the result document or a list
//! of messages.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use xee_adapter::XeeProcessorFactory;
//! use xslt3_service::{build_router, TransformSettings, Transformer};
//!
//! let transformer = Transformer::new(XeeProcessorFactory, TransformSettings::default());
//! let app = build_router(transformer);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod http;
pub mod limits;
pub mod materialize;
pub mod options;
pub mod orchestrator;
pub mod request;
pub mod response;
pub mod result;

// Re-export core types
pub use diagnostics::{DiagnosticRecord, DiagnosticsCollector};
pub use error::Error;
pub use http::build_router;
pub use limits::SizeLimits;
pub use orchestrator::{Stage, TransformSettings, Transformer};
pub use request::{RawOptions, TransformRequest, Upload};
pub use result::TransformOutcome;
