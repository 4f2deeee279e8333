//! Server configuration from command line flags and environment

use clap::Parser;

use crate::limits::SizeLimits;
use crate::orchestrator::TransformSettings;

#[derive(Debug, Clone, Parser)]
#[command(name = "xslt3-server", about = "XSLT 3.0 transformation service", version)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "XSLT3_BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: String,

    /// Largest accepted XML document, in MB
    #[arg(long, env = "XSLT3_XML_LIMIT_MB", default_value_t = 1.0)]
    pub xml_limit_mb: f64,

    /// Largest accepted XSL stylesheet, in MB
    #[arg(long, env = "XSLT3_XSL_LIMIT_MB", default_value_t = 1.0)]
    pub xsl_limit_mb: f64,

    /// Largest accepted auxiliary document, in MB
    #[arg(long, env = "XSLT3_AUX_LIMIT_MB", default_value_t = 1.0)]
    pub aux_limit_mb: f64,

    /// Report each located stylesheet diagnostic twice: with and without its location
    #[arg(long, env = "XSLT3_LEGACY_DIAGNOSTICS")]
    pub legacy_diagnostics: bool,
}

impl ServerConfig {
    pub fn transform_settings(&self) -> TransformSettings {
        TransformSettings {
            limits: SizeLimits::from_megabytes(
                self.xml_limit_mb,
                self.xsl_limit_mb,
                self.aux_limit_mb,
            ),
            legacy_diagnostics: self.legacy_diagnostics,
        }
    }
}
