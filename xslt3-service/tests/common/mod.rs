//! Scripted engine shared by the integration tests
#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use http_body_util::BodyExt;
use tower::ServiceExt;
use xslt_engine_traits::{
    error::{Error, Result},
    Diagnostic, DiagnosticSink, EngineConfiguration, OutputMethod, ProcessorFactory, Severity,
    XsltProcessor,
};

pub const STYLESHEET: &str = r#"<xsl:stylesheet version="3.0" xmlns:xsl="http://www.w3.org/1999/XSL/Transform"/>"#;
pub const SOURCE: &str = "<root><item>1</item></root>";

/// What the fake engine does when called
#[derive(Debug, Clone)]
pub struct Script {
    pub output: String,
    pub output_method: OutputMethod,
    pub compile_diagnostics: Vec<(Severity, Diagnostic)>,
    pub execute_diagnostics: Vec<(Severity, Diagnostic)>,
    /// Parse failures also report a located parser diagnostic
    pub parse_errors_are_diagnosed: bool,
    pub compile_fault: Option<String>,
    pub execute_fault: Option<String>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            output: "<result/>".to_string(),
            output_method: OutputMethod::Xml,
            compile_diagnostics: Vec::new(),
            execute_diagnostics: Vec::new(),
            parse_errors_are_diagnosed: false,
            compile_fault: None,
            execute_fault: None,
        }
    }
}

/// What the fake engine saw
#[derive(Debug, Default)]
pub struct Observations {
    /// Every parsed text with its system id
    pub parsed: Vec<(String, Option<String>)>,
    pub compiles: usize,
    pub executions: usize,
    pub config: Option<EngineConfiguration>,
    /// Context document handed to execute; outer `None` means never executed
    pub context: Option<Option<String>>,
    /// Files next to the stylesheet while it was executing
    pub files_during_execution: Vec<String>,
    pub stylesheet_system_id: Option<String>,
}

#[derive(Clone, Default)]
pub struct ScriptedFactory {
    pub script: Script,
    pub observed: Arc<Mutex<Observations>>,
}

impl ScriptedFactory {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            observed: Arc::default(),
        }
    }

    pub fn observed(&self) -> std::sync::MutexGuard<'_, Observations> {
        self.observed.lock().unwrap()
    }
}

impl ProcessorFactory for ScriptedFactory {
    type Processor = ScriptedProcessor;

    fn create(&self) -> Self::Processor {
        ScriptedProcessor {
            script: self.script.clone(),
            observed: Arc::clone(&self.observed),
        }
    }

    fn engine_name(&self) -> &'static str {
        "scripted"
    }
}

pub struct ScriptedProcessor {
    script: Script,
    observed: Arc<Mutex<Observations>>,
}

#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub text: String,
    pub system_id: Option<String>,
}

impl XsltProcessor for ScriptedProcessor {
    type Document = ParsedDocument;
    type Stylesheet = ParsedDocument;

    fn parse_document(
        &mut self,
        xml: &str,
        system_id: Option<&str>,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Self::Document> {
        self.observed
            .lock()
            .unwrap()
            .parsed
            .push((xml.to_string(), system_id.map(str::to_owned)));

        if !xml.trim_start().starts_with('<') {
            if self.script.parse_errors_are_diagnosed {
                sink.fatal_error(Diagnostic::parser("Content is not allowed in prolog.", 1, 1));
            }
            return Err(Error::xml_parse("Content is not allowed in prolog."));
        }
        Ok(ParsedDocument {
            text: xml.to_string(),
            system_id: system_id.map(str::to_owned),
        })
    }

    fn compile(
        &mut self,
        stylesheet: &Self::Document,
        config: &EngineConfiguration,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Self::Stylesheet> {
        {
            let mut observed = self.observed.lock().unwrap();
            observed.compiles += 1;
            observed.config = Some(config.clone());
            observed.stylesheet_system_id = stylesheet.system_id.clone();
        }
        for (severity, diagnostic) in &self.script.compile_diagnostics {
            sink.report(*severity, diagnostic.clone());
        }
        match &self.script.compile_fault {
            Some(message) => Err(Error::xslt_compile(message.clone())),
            None => Ok(stylesheet.clone()),
        }
    }

    fn output_method(&self, _stylesheet: &Self::Stylesheet) -> OutputMethod {
        self.script.output_method
    }

    fn execute(
        &mut self,
        stylesheet: &Self::Stylesheet,
        context: Option<&Self::Document>,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<String> {
        {
            let mut observed = self.observed.lock().unwrap();
            observed.executions += 1;
            observed.context = Some(context.map(|doc| doc.text.clone()));
            if let Some(dir) = stylesheet
                .system_id
                .as_deref()
                .and_then(|id| Path::new(id).parent())
                .filter(|dir| !dir.as_os_str().is_empty())
            {
                if let Ok(entries) = fs::read_dir(dir) {
                    observed.files_during_execution = entries
                        .filter_map(|entry| entry.ok())
                        .map(|entry| entry.file_name().to_string_lossy().into_owned())
                        .collect();
                }
            }
        }
        for (severity, diagnostic) in &self.script.execute_diagnostics {
            sink.report(*severity, diagnostic.clone());
        }
        match &self.script.execute_fault {
            Some(message) => Err(Error::xslt_transform(message.clone())),
            None => Ok(self.script.output.clone()),
        }
    }

    fn xslt_version(&self) -> &'static str {
        "3.0"
    }

    fn supported_features(&self) -> Vec<String> {
        vec!["xslt-3.0".to_string()]
    }
}

// Multipart requests against a router

pub const BOUNDARY: &str = "xslt3-test-boundary";

pub enum Part<'a> {
    File(&'a str, &'a str, &'a str),
    Text(&'a str, &'a str),
}

pub fn multipart_body(parts: &[Part<'_>]) -> String {
    let mut body = String::new();
    for part in parts {
        body.push_str(&format!("--{BOUNDARY}\r\n"));
        match part {
            Part::File(name, filename, content) => {
                body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n{content}\r\n"
                ));
            }
            Part::Text(name, value) => {
                body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                ));
            }
        }
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body
}

pub async fn post_transform(app: axum::Router, parts: &[Part<'_>]) -> Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri("/xsl3/transform")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn get(app: axum::Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub fn content_type(resp: &Response) -> &str {
    resp.headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
}

pub async fn body_text(resp: Response) -> String {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_messages(resp: Response) -> Vec<String> {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
