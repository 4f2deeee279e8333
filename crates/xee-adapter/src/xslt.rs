//! XsltProcessor implementation for xee
//!
//! Supports:
//! - XSLT 3.0 (partial) via `xee-xslt-compiler`, including simplified
//!   stylesheet modules
//! - xml, text, html and json output method declarations
//! - nodes and atomic values in the result sequence
//!
//! Does NOT support:
//! - initial template or initial mode selection
//! - toggling `xsl:assert` or `xsl:evaluate`

use xot::Node;
use xslt_engine_traits::{
    error::{Error, Result},
    Diagnostic, DiagnosticSink, EngineConfiguration, OutputMethod, ProcessorFactory,
    XsltProcessor,
};

use crate::tree::XotTree;

/// xee XSLT processor; one per transformation
pub struct XeeProcessor {
    tree: XotTree,
}

impl XeeProcessor {
    pub fn new() -> Self {
        Self {
            tree: XotTree::new(),
        }
    }

    /// Get a reference to the document tree
    pub fn tree(&self) -> &XotTree {
        &self.tree
    }
}

impl Default for XeeProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Stylesheet accepted by [`XeeProcessor::compile`].
///
/// xee compiles and runs in a single call, so the checked source text is
/// kept and handed to the engine at execution time.
#[derive(Debug, Clone)]
pub struct XeeStylesheet {
    source: String,
    output_method: OutputMethod,
}

impl XsltProcessor for XeeProcessor {
    type Document = Node;
    type Stylesheet = XeeStylesheet;

    fn parse_document(
        &mut self,
        xml: &str,
        _system_id: Option<&str>,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Self::Document> {
        // xee resolves nothing relative to a base URI, so the system id is unused
        self.tree.parse_with_location(xml).map_err(|failure| {
            sink.fatal_error(Diagnostic::parser(
                failure.message.clone(),
                failure.line,
                failure.column,
            ));
            Error::xml_parse(failure.message)
        })
    }

    fn compile(
        &mut self,
        stylesheet: &Self::Document,
        config: &EngineConfiguration,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Self::Stylesheet> {
        let accepted = self.tree.is_stylesheet(*stylesheet)?
            || self.tree.is_simplified_stylesheet(*stylesheet)?;
        if !accepted {
            let (local, _) = self.tree.document_element_name(*stylesheet)?;
            let message = format!(
                "XTSE0150: document element {local} is neither xsl:stylesheet, xsl:transform \
                 nor a literal result element with an xsl:version attribute"
            );
            sink.fatal_error(Diagnostic::stylesheet(message.clone()).at(1, 1));
            return Err(Error::xslt_compile(message));
        }

        let output_method = match self.tree.declared_output_method(*stylesheet)? {
            None => OutputMethod::Xml,
            Some(name) => OutputMethod::from_method_name(&name).unwrap_or_else(|| {
                sink.error(Diagnostic::stylesheet(format!(
                    "output method {name} is not supported"
                )));
                OutputMethod::Xml
            }),
        };

        if config.is_template_driven() {
            sink.error(Diagnostic::stylesheet(format!(
                "initial template {} cannot be selected, the xee engine starts from the source document",
                config.initial_template.as_deref().unwrap_or_default()
            )));
        }
        if let Some(mode) = &config.initial_mode {
            sink.error(Diagnostic::stylesheet(format!(
                "initial mode {mode} cannot be selected, the xee engine starts in the default mode"
            )));
        }
        if config.assert_enabled.is_some() {
            sink.warning(Diagnostic::stylesheet(
                "enable_assert has no effect on the xee engine",
            ));
        }
        if config.evaluate_enabled.is_some() {
            sink.warning(Diagnostic::stylesheet(
                "enable_xsl_evaluate has no effect on the xee engine",
            ));
        }

        Ok(XeeStylesheet {
            source: self.tree.serialize(*stylesheet)?,
            output_method,
        })
    }

    fn output_method(&self, stylesheet: &Self::Stylesheet) -> OutputMethod {
        stylesheet.output_method
    }

    fn execute(
        &mut self,
        stylesheet: &Self::Stylesheet,
        context: Option<&Self::Document>,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<String> {
        let context = context
            .ok_or_else(|| Error::xslt_transform("the xee engine requires a source document"))?;
        let xml_str = self.tree.serialize(*context)?;

        let sequence =
            match xee_xslt_compiler::evaluate(self.tree.xot_mut(), &xml_str, &stylesheet.source) {
                Ok(sequence) => sequence,
                Err(e) => {
                    let message = format!("{:?}", e);
                    sink.fatal_error(Diagnostic::stylesheet(message.clone()));
                    return Err(Error::xslt_transform(message));
                }
            };

        let mut result = String::new();
        // Adjacent atomic values are separated by a single space
        let mut after_atomic = false;
        for (position, item) in sequence.iter().enumerate() {
            if let Ok(node) = item.to_node() {
                match stylesheet.output_method {
                    OutputMethod::Text => result.push_str(&self.tree.string_value(node)),
                    _ => result.push_str(&self.tree.serialize(node)?),
                }
                after_atomic = false;
            } else if item.to_atomic().is_ok() {
                if after_atomic {
                    result.push(' ');
                }
                let text = item
                    .string_value(self.tree.xot())
                    .map_err(|e| Error::xslt_transform(format!("{:?}", e)))?;
                match stylesheet.output_method {
                    OutputMethod::Xml | OutputMethod::Html => result.push_str(&escape_text(&text)),
                    OutputMethod::Text | OutputMethod::Json => result.push_str(&text),
                }
                after_atomic = true;
            } else {
                sink.error(Diagnostic::stylesheet(format!(
                    "SENR0001: item {} of the result sequence is a function, map or array \
                     and cannot be serialized",
                    position + 1
                )));
                after_atomic = false;
            }
        }

        Ok(result)
    }

    fn xslt_version(&self) -> &'static str {
        "3.0"
    }

    fn supported_features(&self) -> Vec<String> {
        vec![
            "xslt-3.0".to_string(),
            "xpath-3.1".to_string(),
            "output-xml".to_string(),
            "output-text".to_string(),
        ]
    }
}

/// Escape character data for markup output
fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Creates a fresh [`XeeProcessor`] for every request
#[derive(Debug, Clone, Copy, Default)]
pub struct XeeProcessorFactory;

impl ProcessorFactory for XeeProcessorFactory {
    type Processor = XeeProcessor;

    fn create(&self) -> Self::Processor {
        XeeProcessor::new()
    }

    fn engine_name(&self) -> &'static str {
        "xee"
    }
}
