//! Upload size limits
//!
//! Checked before anything is parsed. A payload violates its limit when its
//! exact byte length is strictly greater than the configured number of
//! bytes; fractional megabytes are not truncated away.

use serde::{Deserialize, Serialize};

pub const MEGABYTE: u64 = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeLimits {
    pub xml_bytes: u64,
    pub stylesheet_bytes: u64,
    pub auxiliary_bytes: u64,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            xml_bytes: MEGABYTE,
            stylesheet_bytes: MEGABYTE,
            auxiliary_bytes: MEGABYTE,
        }
    }
}

impl SizeLimits {
    pub fn from_megabytes(xml: f64, stylesheet: f64, auxiliary: f64) -> Self {
        Self {
            xml_bytes: to_bytes(xml),
            stylesheet_bytes: to_bytes(stylesheet),
            auxiliary_bytes: to_bytes(auxiliary),
        }
    }

    /// Largest request body that can still carry payloads within limits
    pub fn total_bytes(&self) -> u64 {
        self.xml_bytes
            .saturating_add(self.stylesheet_bytes)
            .saturating_add(self.auxiliary_bytes)
    }

    /// One message per payload over its limit, in xml, stylesheet, auxiliary order
    pub fn check(&self, xml: Option<usize>, stylesheet: usize, auxiliary: Option<usize>) -> Vec<String> {
        let mut violations = Vec::new();

        if xml.is_some_and(|len| len as u64 > self.xml_bytes) {
            violations.push(format!(
                "Error : An XML document's max size, for an uploaded XML document can be {} MB.",
                megabytes(self.xml_bytes)
            ));
        }
        if stylesheet as u64 > self.stylesheet_bytes {
            violations.push(format!(
                "Error : An XSL stylesheet document's max size, for an uploaded XSL stylesheet can be {} MB.",
                megabytes(self.stylesheet_bytes)
            ));
        }
        if auxiliary.is_some_and(|len| len as u64 > self.auxiliary_bytes) {
            violations.push(format!(
                "Error : An auxiliary document's max size, for an uploaded auxiliary document can be {} MB.",
                megabytes(self.auxiliary_bytes)
            ));
        }

        violations
    }
}

fn to_bytes(megabytes: f64) -> u64 {
    (megabytes.max(0.0) * MEGABYTE as f64).round() as u64
}

fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / MEGABYTE as f64
}
