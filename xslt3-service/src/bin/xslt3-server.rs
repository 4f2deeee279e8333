//! xslt3-server: XSLT 3.0 transformation service.
//!
//! Reads config from flags or env vars:
//!   XSLT3_BIND_ADDR          : listen address (default: 0.0.0.0:8080)
//!   XSLT3_XML_LIMIT_MB       : XML upload limit (default: 1)
//!   XSLT3_XSL_LIMIT_MB       : stylesheet upload limit (default: 1)
//!   XSLT3_AUX_LIMIT_MB       : auxiliary upload limit (default: 1)
//!   XSLT3_LEGACY_DIAGNOSTICS : duplicate located messages (default: off)

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use xee_adapter::XeeProcessorFactory;
use xslt3_service::config::ServerConfig;
use xslt3_service::{build_router, Transformer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,xslt3_service=debug".into()),
        )
        .init();

    let settings = config.transform_settings();
    tracing::info!(
        xml_limit_bytes = settings.limits.xml_bytes,
        xsl_limit_bytes = settings.limits.stylesheet_bytes,
        aux_limit_bytes = settings.limits.auxiliary_bytes,
        legacy_diagnostics = settings.legacy_diagnostics,
        "transformation settings"
    );

    let app = build_router(Transformer::new(XeeProcessorFactory, settings));

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;
    tracing::info!("xslt3-server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
