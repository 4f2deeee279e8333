//! Runs one transformation from validation to a classified outcome

use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, info, instrument, warn};
use xslt_engine_traits::{ProcessorFactory, XsltProcessor};

use crate::diagnostics::DiagnosticsCollector;
use crate::error::{Error, Result};
use crate::limits::SizeLimits;
use crate::materialize::materialize;
use crate::options::engine_configuration;
use crate::request::TransformRequest;
use crate::result::TransformOutcome;

/// Steps of a transformation, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Stage {
    Validating,
    Parsing,
    Configuring,
    Compiling,
    Executing,
    Classifying,
    Done,
}

/// Per-service knobs of the orchestrator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformSettings {
    pub limits: SizeLimits,
    /// Repeat the bare message after each located stylesheet diagnostic
    pub legacy_diagnostics: bool,
}

/// Sequences a single engine call per request.
///
/// Holds no per-request state; every call gets its own processor and
/// diagnostics collector, so one `Transformer` can serve concurrent requests.
pub struct Transformer<F> {
    factory: F,
    settings: TransformSettings,
}

impl<F: ProcessorFactory> Transformer<F> {
    pub fn new(factory: F, settings: TransformSettings) -> Self {
        Self { factory, settings }
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn settings(&self) -> &TransformSettings {
        &self.settings
    }

    /// Transform one request.
    ///
    /// `Ok` carries either the result document or the messages explaining
    /// the failure. `Err` is a fault the engine left unexplained: it is only
    /// returned when no error or fatal diagnostic had been recorded.
    #[instrument(
        skip_all,
        fields(
            engine = self.factory.engine_name(),
            stylesheet = request.stylesheet.filename.as_deref().unwrap_or_default(),
        )
    )]
    pub fn transform(&self, request: &TransformRequest) -> Result<TransformOutcome> {
        debug!(stage = %Stage::Validating);
        let violations = self.settings.limits.check(
            request.xml.as_ref().map(|u| u.len()),
            request.stylesheet.len(),
            request.auxiliary.as_ref().map(|u| u.len()),
        );
        if !violations.is_empty() {
            info!(count = violations.len(), "upload size limits exceeded");
            return Ok(TransformOutcome::failure(violations));
        }

        let mut collector =
            DiagnosticsCollector::new().with_bare_message_echo(self.settings.legacy_diagnostics);
        let mut processor = self.factory.create();

        debug!(stage = %Stage::Parsing);
        // Holds the staged auxiliary file until this function returns
        let inputs = match materialize(&mut processor, request, &mut collector) {
            Ok(inputs) => inputs,
            Err(fault) => return explain(collector, fault),
        };

        debug!(stage = %Stage::Configuring);
        let config = match engine_configuration(&request.options) {
            Ok(config) => config,
            Err(violations) => {
                info!(count = violations.len(), "invalid transformation options");
                return Ok(TransformOutcome::failure(violations));
            }
        };

        debug!(stage = %Stage::Compiling);
        let stylesheet = match processor.compile(&inputs.stylesheet, &config, &mut collector) {
            Ok(stylesheet) => stylesheet,
            Err(fault) => return explain(collector, fault.into()),
        };
        let output_method = processor.output_method(&stylesheet);

        debug!(stage = %Stage::Executing, %output_method);
        let body = match processor.execute(&stylesheet, inputs.context.as_ref(), &mut collector) {
            Ok(body) => body,
            Err(fault) => return explain(collector, fault.into()),
        };

        debug!(stage = %Stage::Classifying);
        let outcome = if collector.is_empty() {
            TransformOutcome::success(body, output_method)
        } else {
            info!(
                diagnostics = collector.records().len(),
                "engine reported errors, discarding output"
            );
            TransformOutcome::failure(collector.into_messages())
        };

        debug!(stage = %Stage::Done, success = outcome.is_success());
        Ok(outcome)
    }
}

/// Recorded diagnostics take precedence over the fault that followed them
fn explain(collector: DiagnosticsCollector, fault: Error) -> Result<TransformOutcome> {
    if collector.is_empty() {
        warn!(error = %fault, "transformation fault");
        Err(fault)
    } else {
        debug!(error = %fault, "fault superseded by engine diagnostics");
        Ok(TransformOutcome::failure(collector.into_messages()))
    }
}
