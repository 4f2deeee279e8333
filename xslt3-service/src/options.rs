//! Maps raw request options onto [`EngineConfiguration`]

use xslt_engine_traits::{EngineConfiguration, DEFAULT_INITIAL_TEMPLATE};

use crate::request::RawOptions;

pub const ENABLE_ASSERT: &str = "enable_assert";
pub const ENABLE_XSL_EVALUATE: &str = "enable_xsl_evaluate";

/// Build the engine configuration, or every violation found.
///
/// Both boolean flags are always checked so that several bad values are
/// reported together.
pub fn engine_configuration(options: &RawOptions) -> Result<EngineConfiguration, Vec<String>> {
    let mut violations = Vec::new();

    let assert_enabled = parse_flag(ENABLE_ASSERT, options.enable_assert.as_deref())
        .unwrap_or_else(|message| {
            violations.push(message);
            None
        });
    let evaluate_enabled = parse_flag(ENABLE_XSL_EVALUATE, options.enable_xsl_evaluate.as_deref())
        .unwrap_or_else(|message| {
            violations.push(message);
            None
        });

    if !violations.is_empty() {
        return Err(violations);
    }

    let initial_template = options.init_template.as_ref().map(|name| {
        if name.is_empty() {
            DEFAULT_INITIAL_TEMPLATE.to_string()
        } else {
            name.clone()
        }
    });

    Ok(EngineConfiguration {
        initial_template,
        initial_mode: options.init_mode.clone(),
        assert_enabled,
        evaluate_enabled,
    })
}

/// Parse a case-sensitive boolean spelling; `None` in, `None` out
pub fn parse_flag(field: &str, value: Option<&str>) -> Result<Option<bool>, String> {
    match value {
        None => Ok(None),
        Some("true" | "yes" | "1") => Ok(Some(true)),
        Some("false" | "no" | "0") => Ok(Some(false)),
        Some(other) => Err(format!(
            "Error : XSL transformation's {field} configuration value, may have the values \
             true, yes, 1, false, no, 0. The supplied value {other}, is incorrect."
        )),
    }
}
