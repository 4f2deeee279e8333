//! xee engine adapter for the XSLT processor abstraction
//!
//! This adapter wraps the xee XSLT 3.0 engine to implement the
//! xslt-engine-traits interfaces.

pub mod tree;
pub mod xslt;

// Re-export main types
pub use tree::XotTree;
pub use xslt::{XeeProcessor, XeeProcessorFactory, XeeStylesheet};

// Re-export key types for convenience
pub use xot::Node;
