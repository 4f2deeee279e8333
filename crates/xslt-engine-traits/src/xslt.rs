//! XSLT processor abstraction traits

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::config::EngineConfiguration;
use crate::diagnostics::DiagnosticSink;
use crate::error::Result;

/// Serialization method declared by a stylesheet's `xsl:output`
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OutputMethod {
    #[default]
    Xml,
    Text,
    #[strum(to_string = "html", serialize = "xhtml")]
    Html,
    Json,
}

impl OutputMethod {
    /// Resolve an `xsl:output/@method` value
    pub fn from_method_name(name: &str) -> Option<Self> {
        name.trim().parse().ok()
    }
}

/// Trait for XSLT 3.0 processors.
///
/// A processor instance serves exactly one transformation request; documents
/// and compiled stylesheets are only meaningful to the processor that
/// produced them.
pub trait XsltProcessor {
    /// Handle to a parsed XML document
    type Document;

    /// Type representing a compiled stylesheet
    type Stylesheet;

    /// Parse XML text into a namespace-aware document.
    ///
    /// `system_id` is the location relative references inside the document
    /// resolve against, when the engine supports it.
    fn parse_document(
        &mut self,
        xml: &str,
        system_id: Option<&str>,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Self::Document>;

    /// Compile a parsed stylesheet document under the given configuration
    fn compile(
        &mut self,
        stylesheet: &Self::Document,
        config: &EngineConfiguration,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Self::Stylesheet>;

    /// Output method declared by the stylesheet itself
    fn output_method(&self, stylesheet: &Self::Stylesheet) -> OutputMethod;

    /// Run a compiled stylesheet and return the serialized primary result
    fn execute(
        &mut self,
        stylesheet: &Self::Stylesheet,
        context: Option<&Self::Document>,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<String>;

    /// Get the XSLT version supported by this engine
    fn xslt_version(&self) -> &'static str;

    /// Get the list of feature strings supported by this engine
    fn supported_features(&self) -> Vec<String>;

    /// Check if a specific feature is supported
    fn supports_feature(&self, feature: &str) -> bool {
        self.supported_features()
            .iter()
            .any(|f| f.eq_ignore_ascii_case(feature))
    }
}

/// Creates one fresh processor per transformation.
///
/// This is the only engine state a service holds across requests.
pub trait ProcessorFactory: Send + Sync {
    type Processor: XsltProcessor;

    /// Create a processor for a single request
    fn create(&self) -> Self::Processor;

    /// Short name of the backend
    fn engine_name(&self) -> &'static str;
}

/// Extended XSLT processor capabilities
pub trait ExtendedXsltProcessor: XsltProcessor {
    /// Parse, compile and run in one step with a default configuration
    fn transform_text(
        &mut self,
        xslt: &str,
        source_xml: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<(String, OutputMethod)> {
        let stylesheet_doc = self.parse_document(xslt, None, sink)?;
        let source = self.parse_document(source_xml, None, sink)?;
        let stylesheet = self.compile(&stylesheet_doc, &EngineConfiguration::default(), sink)?;
        let method = self.output_method(&stylesheet);
        let output = self.execute(&stylesheet, Some(&source), sink)?;
        Ok((output, method))
    }
}

// Blanket implementation for all XSLT processors
impl<T: XsltProcessor> ExtendedXsltProcessor for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_method_names() {
        assert_eq!(OutputMethod::from_method_name("xml"), Some(OutputMethod::Xml));
        assert_eq!(OutputMethod::from_method_name("text"), Some(OutputMethod::Text));
        assert_eq!(OutputMethod::from_method_name("html"), Some(OutputMethod::Html));
        assert_eq!(OutputMethod::from_method_name("xhtml"), Some(OutputMethod::Html));
        assert_eq!(OutputMethod::from_method_name("json"), Some(OutputMethod::Json));
        assert_eq!(OutputMethod::from_method_name("adaptive"), None);
        assert_eq!(OutputMethod::from_method_name("XML"), None);
    }

    #[test]
    fn output_method_display_is_canonical() {
        assert_eq!(OutputMethod::Html.to_string(), "html");
        assert_eq!(OutputMethod::Json.to_string(), "json");
        assert_eq!(OutputMethod::default(), OutputMethod::Xml);
    }
}
