//! Document handling on top of xot

use xot::{Node, Xot};
use xslt_engine_traits::{
    error::{Error, Result},
    XSLT_NAMESPACE,
};

/// Owns the xot arena every document of one processor lives in
#[derive(Debug)]
pub struct XotTree {
    pub(crate) xot: Xot,
}

impl XotTree {
    /// Create a new XotTree
    pub fn new() -> Self {
        Self { xot: Xot::new() }
    }

    /// Get a reference to the underlying Xot
    pub fn xot(&self) -> &Xot {
        &self.xot
    }

    /// Get a mutable reference to the underlying Xot
    pub fn xot_mut(&mut self) -> &mut Xot {
        &mut self.xot
    }

    /// Parse XML text into a document node
    pub fn parse(&mut self, xml: &str) -> Result<Node> {
        self.parse_with_location(xml)
            .map_err(|failure| Error::xml_parse(failure.message))
    }

    /// Parse XML text, reporting where in the text a failure was found
    pub fn parse_with_location(&mut self, xml: &str) -> std::result::Result<Node, ParseFailure> {
        self.xot.parse(xml).map_err(|e| {
            let (line, column) = line_column(xml, e.span().start);
            ParseFailure {
                message: e.to_string(),
                line,
                column,
            }
        })
    }

    /// Serialize a node as XML
    pub fn serialize(&self, node: Node) -> Result<String> {
        self.xot
            .to_string(node)
            .map_err(|e| Error::serialization(e.to_string()))
    }

    /// XPath string value of a node
    pub fn string_value(&self, node: Node) -> String {
        self.xot.string_value(node)
    }

    /// Expanded name of the document element as `(local name, namespace uri)`
    pub fn document_element_name(&self, doc: Node) -> Result<(String, String)> {
        let root = self
            .xot
            .document_element(doc)
            .map_err(|e| Error::xslt_compile(e.to_string()))?;
        let element = self
            .xot
            .element(root)
            .ok_or_else(|| Error::xslt_compile("document element is not an element"))?;
        let (local, ns) = self.xot.name_ns_str(element.name());
        Ok((local.to_string(), ns.to_string()))
    }

    /// True when the document element is `xsl:stylesheet` or `xsl:transform`
    pub fn is_stylesheet(&self, doc: Node) -> Result<bool> {
        let (local, ns) = self.document_element_name(doc)?;
        Ok(ns == XSLT_NAMESPACE && (local == "stylesheet" || local == "transform"))
    }

    /// True for a simplified stylesheet module: a literal result element
    /// carrying `xsl:version`
    pub fn is_simplified_stylesheet(&self, doc: Node) -> Result<bool> {
        let root = self
            .xot
            .document_element(doc)
            .map_err(|e| Error::xslt_compile(e.to_string()))?;
        let attrs = self.xot.attributes(root);
        let simplified = attrs.iter().any(|(name_id, _)| {
            let (local, ns) = self.xot.name_ns_str(name_id);
            local == "version" && ns == XSLT_NAMESPACE
        });
        Ok(simplified)
    }

    /// The `method` attribute of the first top-level `xsl:output` declaration
    pub fn declared_output_method(&self, doc: Node) -> Result<Option<String>> {
        let root = self
            .xot
            .document_element(doc)
            .map_err(|e| Error::xslt_compile(e.to_string()))?;
        for child in self.xot.children(root) {
            let Some(element) = self.xot.element(child) else {
                continue;
            };
            let (local, ns) = self.xot.name_ns_str(element.name());
            if ns != XSLT_NAMESPACE || local != "output" {
                continue;
            }
            let attrs = self.xot.attributes(child);
            for (name_id, value) in attrs.iter() {
                let (attr_local, attr_ns) = self.xot.name_ns_str(name_id);
                if attr_local == "method" && attr_ns.is_empty() {
                    return Ok(Some(value.to_string()));
                }
            }
        }
        Ok(None)
    }
}

/// A document that is not well-formed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub message: String,
    pub line: u32,
    pub column: u32,
}

/// 1-based line and column of a byte offset; columns count characters
fn line_column(text: &str, offset: usize) -> (u32, u32) {
    let mut end = offset.min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let before = &text[..end];
    let line = before.matches('\n').count() + 1;
    let column = before
        .rsplit('\n')
        .next()
        .map_or(0, |current| current.chars().count())
        + 1;
    (
        u32::try_from(line).unwrap_or(u32::MAX),
        u32::try_from(column).unwrap_or(u32::MAX),
    )
}

impl Default for XotTree {
    fn default() -> Self {
        Self::new()
    }
}
