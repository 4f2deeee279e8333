//! Router tests: multipart in, classified response out

mod common;

use axum::http::StatusCode;
use http_body_util::BodyExt;

use common::{
    body_messages, body_text, content_type, get, post_transform, Part, Script, ScriptedFactory,
    SOURCE, STYLESHEET,
};
use xslt3_service::{build_router, TransformSettings, Transformer};
use xslt_engine_traits::{Diagnostic, OutputMethod, Severity};

fn app(script: Script) -> axum::Router {
    build_router(Transformer::new(
        ScriptedFactory::new(script),
        TransformSettings::default(),
    ))
}

#[tokio::test]
async fn test_xml_result_is_returned_as_application_xml() {
    let resp = post_transform(
        app(Script {
            output: "<out>1</out>".to_string(),
            ..Script::default()
        }),
        &[
            Part::File("xml_file", "source.xml", SOURCE),
            Part::File("xsl_file", "main.xsl", STYLESHEET),
        ],
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp), "application/xml");
    assert_eq!(body_text(resp).await, "<out>1</out>");
}

#[tokio::test]
async fn test_text_result_content_type() {
    let resp = post_transform(
        app(Script {
            output: "plain".to_string(),
            output_method: OutputMethod::Text,
            ..Script::default()
        }),
        &[Part::File("xsl_file", "main.xsl", STYLESHEET)],
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp), "application/text");
}

#[tokio::test]
async fn test_diagnostics_are_a_json_error_list() {
    let resp = post_transform(
        app(Script {
            compile_diagnostics: vec![(
                Severity::Error,
                Diagnostic::stylesheet("XTSE0010: unknown element").at(2, 5),
            )],
            ..Script::default()
        }),
        &[
            Part::File("xml_file", "source.xml", SOURCE),
            Part::File("xsl_file", "main.xsl", STYLESHEET),
        ],
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(content_type(&resp), "application/json");
    assert_eq!(
        body_messages(resp).await,
        ["[Error : line 2, column 5] XTSE0010: unknown element"]
    );
}

#[tokio::test]
async fn test_bad_option_value_is_rejected() {
    let resp = post_transform(
        app(Script::default()),
        &[
            Part::File("xsl_file", "main.xsl", STYLESHEET),
            Part::Text("enable_assert", "sometimes"),
        ],
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let messages = body_messages(resp).await;
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("enable_assert"));
    assert!(messages[0].contains("sometimes"));
}

#[tokio::test]
async fn test_missing_stylesheet_part() {
    let resp = post_transform(
        app(Script::default()),
        &[Part::File("xml_file", "source.xml", SOURCE)],
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_messages(resp).await,
        ["Error : Required request part 'xsl_file' is not present."]
    );
}

#[tokio::test]
async fn test_unexplained_fault_is_reported_as_single_message() {
    let resp = post_transform(
        app(Script {
            execute_fault: Some("engine crashed".to_string()),
            ..Script::default()
        }),
        &[
            Part::File("xml_file", "source.xml", SOURCE),
            Part::File("xsl_file", "main.xsl", STYLESHEET),
        ],
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_messages(resp).await,
        ["XSLT transformation error: engine crashed"]
    );
}

#[tokio::test]
async fn test_empty_xml_part_counts_as_absent() {
    let factory = ScriptedFactory::new(Script::default());
    let app = build_router(Transformer::new(factory.clone(), TransformSettings::default()));

    let resp = post_transform(
        app,
        &[
            Part::Text("xml_file", ""),
            Part::File("xsl_file", "main.xsl", STYLESHEET),
        ],
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(factory.observed().context, Some(None));
}

#[tokio::test]
async fn test_engine_info() {
    let resp = get(app(Script::default()), "/xsl3/engine").await;

    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let info: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(info["engine"], "scripted");
    assert_eq!(info["xslt_version"], "3.0");
    assert_eq!(info["features"][0], "xslt-3.0");
}

#[tokio::test]
async fn test_health() {
    let resp = get(app(Script::default()), "/health").await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "\"OK\"");
}

const MIB: usize = 1024 * 1024;

#[tokio::test]
async fn test_upload_past_request_limit_is_reported_by_size_guard() {
    let factory = ScriptedFactory::new(Script::default());
    let app = build_router(Transformer::new(factory.clone(), TransformSettings::default()));
    let huge = format!("<root>{}</root>", "a".repeat(7 * MIB));

    let resp = post_transform(
        app,
        &[
            Part::File("xml_file", "source.xml", &huge),
            Part::File("xsl_file", "main.xsl", STYLESHEET),
        ],
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_messages(resp).await,
        ["Error : An XML document's max size, for an uploaded XML document can be 1 MB."]
    );
    assert!(factory.observed().parsed.is_empty());
}

#[tokio::test]
async fn test_oversize_stylesheet_is_rejected_before_parsing() {
    let factory = ScriptedFactory::new(Script::default());
    let app = build_router(Transformer::new(factory.clone(), TransformSettings::default()));
    let padded = format!("{STYLESHEET}<!--{}-->", " ".repeat(2 * MIB));

    let resp = post_transform(
        app,
        &[
            Part::File("xml_file", "source.xml", SOURCE),
            Part::File("xsl_file", "main.xsl", &padded),
        ],
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_messages(resp).await,
        ["Error : An XSL stylesheet document's max size, for an uploaded XSL stylesheet can be 1 MB."]
    );
    let observed = factory.observed();
    assert!(observed.parsed.is_empty());
    assert_eq!(observed.compiles, 0);
}
