//! Error types for XSLT engine operations

/// Result type for XSLT engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for all XSLT engine operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// XML parsing failed
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    /// XSLT compilation failed
    #[error("XSLT compilation error: {0}")]
    XsltCompile(String),

    /// XSLT transformation failed
    #[error("XSLT transformation error: {0}")]
    XsltTransform(String),

    /// Result serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Requested feature is not supported by this engine
    #[error("Feature not supported: {0}")]
    FeatureNotSupported(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new XML parsing error
    pub fn xml_parse<S: Into<String>>(msg: S) -> Self {
        Error::XmlParse(msg.into())
    }

    /// Create a new XSLT compilation error
    pub fn xslt_compile<S: Into<String>>(msg: S) -> Self {
        Error::XsltCompile(msg.into())
    }

    /// Create a new XSLT transformation error
    pub fn xslt_transform<S: Into<String>>(msg: S) -> Self {
        Error::XsltTransform(msg.into())
    }

    /// Create a new serialization error
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        Error::Serialization(msg.into())
    }
}
