//! Per-call transformation request

/// An uploaded file part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// File name as supplied by the client
    pub filename: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: Some(filename.into()),
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Payload decoded as text, replacing invalid UTF-8 sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Loosely typed options, exactly as received
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOptions {
    pub init_template: Option<String>,
    pub init_mode: Option<String>,
    pub enable_assert: Option<String>,
    pub enable_xsl_evaluate: Option<String>,
}

/// Everything one transformation call receives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformRequest {
    pub xml: Option<Upload>,
    pub stylesheet: Upload,
    pub auxiliary: Option<Upload>,
    pub options: RawOptions,
}

impl TransformRequest {
    pub fn new(stylesheet: Upload) -> Self {
        Self {
            xml: None,
            stylesheet,
            auxiliary: None,
            options: RawOptions::default(),
        }
    }

    pub fn with_xml(mut self, xml: Upload) -> Self {
        self.xml = Some(xml);
        self
    }

    pub fn with_auxiliary(mut self, auxiliary: Upload) -> Self {
        self.auxiliary = Some(auxiliary);
        self
    }

    pub fn with_init_template(mut self, name: impl Into<String>) -> Self {
        self.options.init_template = Some(name.into());
        self
    }

    pub fn with_init_mode(mut self, name: impl Into<String>) -> Self {
        self.options.init_mode = Some(name.into());
        self
    }

    pub fn with_enable_assert(mut self, value: impl Into<String>) -> Self {
        self.options.enable_assert = Some(value.into());
        self
    }

    pub fn with_enable_xsl_evaluate(mut self, value: impl Into<String>) -> Self {
        self.options.enable_xsl_evaluate = Some(value.into());
        self
    }
}
