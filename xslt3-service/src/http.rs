//! HTTP surface: routes, multipart decoding, blocking hand-off to the engine

use std::sync::Arc;

use axum::{
    extract::{
        multipart::{Field, MultipartError},
        DefaultBodyLimit, Multipart, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use xslt_engine_traits::{ProcessorFactory, XsltProcessor};

use crate::error::Error;
use crate::limits::SizeLimits;
use crate::orchestrator::Transformer;
use crate::request::{RawOptions, TransformRequest, Upload};
use crate::response;

pub const TRANSFORM_PATH: &str = "/xsl3/transform";
pub const ENGINE_PATH: &str = "/xsl3/engine";
pub const HEALTH_PATH: &str = "/health";

pub struct AppState<F> {
    transformer: Arc<Transformer<F>>,
}

impl<F> Clone for AppState<F> {
    fn clone(&self) -> Self {
        Self {
            transformer: Arc::clone(&self.transformer),
        }
    }
}

/// Description of the active backend
#[derive(Debug, Serialize)]
pub struct EngineInfo {
    pub engine: String,
    pub xslt_version: String,
    pub features: Vec<String>,
}

/// Build the router with all routes and middleware
pub fn build_router<F>(transformer: Transformer<F>) -> Router
where
    F: ProcessorFactory + 'static,
{
    // Twice the payload limits leaves room for multipart framing; oversize
    // parts are reported by the size guard even when this limit cuts them off
    let body_limit = usize::try_from(transformer.settings().limits.total_bytes().saturating_mul(2))
        .unwrap_or(usize::MAX);

    let state = AppState {
        transformer: Arc::new(transformer),
    };

    Router::new()
        .route(TRANSFORM_PATH, post(transform::<F>))
        .route(ENGINE_PATH, get(engine_info::<F>))
        .route(HEALTH_PATH, get(health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// POST /xsl3/transform
async fn transform<F>(State(state): State<AppState<F>>, multipart: Multipart) -> Response
where
    F: ProcessorFactory + 'static,
{
    let limits = state.transformer.settings().limits;
    let request = match read_transform_request(multipart, &limits).await {
        Ok(request) => request,
        Err(messages) => return response::failure(messages),
    };

    let transformer = Arc::clone(&state.transformer);
    let result = tokio::task::spawn_blocking(move || transformer.transform(&request))
        .await
        .unwrap_or_else(|e| Err(Error::Task(e.to_string())));

    response::classify(result)
}

/// GET /xsl3/engine
async fn engine_info<F>(State(state): State<AppState<F>>) -> Json<EngineInfo>
where
    F: ProcessorFactory + 'static,
{
    let factory = state.transformer.factory();
    let processor = factory.create();
    Json(EngineInfo {
        engine: factory.engine_name().to_string(),
        xslt_version: processor.xslt_version().to_string(),
        features: processor.supported_features(),
    })
}

/// GET /health
async fn health() -> impl IntoResponse {
    Json("OK")
}

/// Collect the form parts of a transformation request.
///
/// File parts are read chunk by chunk. A part over its size limit stops being
/// buffered and is reported with the size guard's message, also when the
/// request body limit cuts the upload short.
pub async fn read_transform_request(
    mut multipart: Multipart,
    limits: &SizeLimits,
) -> std::result::Result<TransformRequest, Vec<String>> {
    let mut xml = ReceivedFile::default();
    let mut stylesheet = ReceivedFile::default();
    let mut auxiliary = ReceivedFile::default();
    let mut options = RawOptions::default();
    let mut truncated = false;

    while !truncated {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) if is_body_limit(&e) => {
                truncated = true;
                break;
            }
            Err(e) => return Err(vec![malformed(&e)]),
        };
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        let (received, limit) = match name.as_str() {
            "xml_file" => (&mut xml, limits.xml_bytes),
            "xsl_file" => (&mut stylesheet, limits.stylesheet_bytes),
            "aux_file" => (&mut auxiliary, limits.auxiliary_bytes),
            "init_template" => {
                options.init_template = Some(read_text(field).await?);
                continue;
            }
            "init_mode" => {
                options.init_mode = Some(read_text(field).await?);
                continue;
            }
            "enable_assert" => {
                options.enable_assert = Some(read_text(field).await?);
                continue;
            }
            "enable_xsl_evaluate" => {
                options.enable_xsl_evaluate = Some(read_text(field).await?);
                continue;
            }
            other => {
                debug!(part = other, "ignoring unknown form part");
                continue;
            }
        };
        *received = read_upload(field, limit).await?;
        truncated = received.truncated;
    }

    let violations = limits.check(xml.seen, stylesheet.seen.unwrap_or(0), auxiliary.seen);
    if !violations.is_empty() {
        info!(count = violations.len(), "upload size limits exceeded");
        return Err(violations);
    }
    if truncated {
        return Err(vec![REQUEST_TOO_LARGE.to_string()]);
    }

    let stylesheet = stylesheet.upload.ok_or_else(|| {
        vec!["Error : Required request part 'xsl_file' is not present.".to_string()]
    })?;

    Ok(TransformRequest {
        xml: xml.upload,
        stylesheet,
        auxiliary: auxiliary.upload,
        options,
    })
}

const REQUEST_TOO_LARGE: &str = "Error : The request is larger than the service accepts.";

/// A file part as far as it was read
#[derive(Debug, Default)]
struct ReceivedFile {
    /// Kept only while within its limit
    upload: Option<Upload>,
    /// Bytes seen, when the part was uploaded at all
    seen: Option<usize>,
    /// The request body limit was reached while reading this part
    truncated: bool,
}

/// A file part; an empty part without a file name counts as not uploaded
async fn read_upload(
    mut field: Field<'_>,
    limit: u64,
) -> std::result::Result<ReceivedFile, Vec<String>> {
    let filename = field
        .file_name()
        .filter(|name| !name.is_empty())
        .map(str::to_owned);
    let mut bytes = Vec::new();
    let mut seen = 0usize;
    let mut truncated = false;

    loop {
        match field.chunk().await {
            Ok(Some(chunk)) => {
                seen = seen.saturating_add(chunk.len());
                if seen as u64 > limit {
                    // Over the limit: count the rest without keeping it
                    bytes = Vec::new();
                } else {
                    bytes.extend_from_slice(&chunk);
                }
            }
            Ok(None) => break,
            Err(e) if is_body_limit(&e) => {
                // The part is cut short, so it can only be over its limit
                let over_limit = usize::try_from(limit).unwrap_or(usize::MAX).saturating_add(1);
                seen = seen.max(over_limit);
                truncated = true;
                break;
            }
            Err(e) => return Err(vec![malformed(&e)]),
        }
    }

    if filename.is_none() && seen == 0 {
        return Ok(ReceivedFile::default());
    }
    let within_limit = seen as u64 <= limit;
    Ok(ReceivedFile {
        upload: within_limit.then(|| Upload { filename, bytes }),
        seen: Some(seen),
        truncated,
    })
}

async fn read_text(field: Field<'_>) -> std::result::Result<String, Vec<String>> {
    field.text().await.map_err(|e| {
        if is_body_limit(&e) {
            vec![REQUEST_TOO_LARGE.to_string()]
        } else {
            vec![format!("Error : failed to read form value, {}", e.body_text())]
        }
    })
}

fn is_body_limit(error: &MultipartError) -> bool {
    error.status() == StatusCode::PAYLOAD_TOO_LARGE
}

fn malformed(error: &MultipartError) -> String {
    format!("Error : malformed multipart request, {}", error.body_text())
}
