//! Typed engine configuration

use serde::{Deserialize, Serialize};

/// Name the engine uses when an initial template is requested without a name.
pub const DEFAULT_INITIAL_TEMPLATE: &str = "xsl:initial-template";

/// Settings applied to an engine before a stylesheet is compiled.
///
/// Every field is optional: `None` means the attribute is left at the
/// engine's own default, which is distinct from explicitly disabling it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfiguration {
    /// Named template to start the transformation from
    pub initial_template: Option<String>,
    /// Mode to start the transformation in
    pub initial_mode: Option<String>,
    /// Whether `xsl:assert` instructions are evaluated
    pub assert_enabled: Option<bool>,
    /// Whether `xsl:evaluate` instructions are permitted
    pub evaluate_enabled: Option<bool>,
}

impl EngineConfiguration {
    /// True when the transformation is started from a named template rather
    /// than from a source document.
    pub fn is_template_driven(&self) -> bool {
        self.initial_template.is_some()
    }
}
