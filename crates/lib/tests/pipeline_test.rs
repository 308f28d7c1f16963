//! # Pipeline Tests
//!
//! End-to-end runs against a mock catalogue and a scripted collaborator.
#![cfg(unix)]

use bookpipe::{render_books, OutputFormat, PageFetcher, Pipeline, PipelineError};
use bookpipe_test_utils::{
    catalogue_url, start_catalogue, unreachable_url, ScriptedTransform, CANNED_BOOK_A_LINE,
    CANNED_BOOK_B_LINE, CANNED_PAGE_JSON, SAMPLE_HTML,
};
use std::sync::Once;

static INIT: Once = Once::new();

/// Initializes tracing for tests.
pub fn setup_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt().with_test_writer().init();
    });
}

fn pipeline(url: String, script: &ScriptedTransform, count: usize) -> Pipeline {
    Pipeline::new(
        PageFetcher::new().unwrap(),
        Box::new(script.transform()),
        url,
        count,
    )
}

#[tokio::test]
async fn test_canned_page_renders_first_two_books() {
    // --- 1. Arrange ---
    setup_tracing();
    let server = start_catalogue(200, SAMPLE_HTML).await;
    let script = ScriptedTransform::new(CANNED_PAGE_JSON, 0).unwrap();

    // --- 2. Act ---
    let books = pipeline(catalogue_url(&server), &script, 2)
        .run()
        .await
        .unwrap();
    let mut out = Vec::new();
    render_books(&mut out, &books, OutputFormat::Text).unwrap();

    // --- 3. Assert ---
    assert_eq!(script.received_stdin().unwrap(), SAMPLE_HTML.as_bytes());
    assert_eq!(
        String::from_utf8(out).unwrap(),
        format!("{CANNED_BOOK_A_LINE}\n{CANNED_BOOK_B_LINE}\n")
    );
}

#[tokio::test]
async fn test_single_book_page_is_fatal() {
    setup_tracing();
    let server = start_catalogue(200, SAMPLE_HTML).await;
    let script = ScriptedTransform::new(r#"{"books":[{"name":"Lonely"}]}"#, 0).unwrap();

    let err = pipeline(catalogue_url(&server), &script, 2)
        .run()
        .await
        .unwrap_err();

    assert!(
        matches!(err, PipelineError::NotEnoughBooks { needed: 2, found: 1 }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_invalid_json_is_fatal() {
    setup_tracing();
    let server = start_catalogue(200, SAMPLE_HTML).await;
    let script = ScriptedTransform::new("Traceback (most recent call last):", 0).unwrap();

    let err = pipeline(catalogue_url(&server), &script, 2)
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Decode(_)), "got {err:?}");
    assert!(!err.is_transport());
}

#[tokio::test]
async fn test_failed_transform_output_is_not_decoded() {
    setup_tracing();
    let server = start_catalogue(200, SAMPLE_HTML).await;
    // Valid JSON on stdout, but the exit status wins.
    let script = ScriptedTransform::new(CANNED_PAGE_JSON, 1).unwrap();

    let err = pipeline(catalogue_url(&server), &script, 2)
        .run()
        .await
        .unwrap_err();

    assert!(
        matches!(err, PipelineError::TransformFailed { .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_transport_failure_skips_transform() {
    setup_tracing();
    let script = ScriptedTransform::new(CANNED_PAGE_JSON, 0).unwrap();

    let err = pipeline(unreachable_url().unwrap(), &script, 2)
        .run()
        .await
        .unwrap_err();

    assert!(err.is_transport(), "got {err:?}");
    assert!(!script.was_invoked());
}

#[tokio::test]
async fn test_count_selects_leading_books() {
    setup_tracing();
    let server = start_catalogue(200, SAMPLE_HTML).await;
    let script = ScriptedTransform::new(CANNED_PAGE_JSON, 0).unwrap();

    let books = pipeline(catalogue_url(&server), &script, 1)
        .run()
        .await
        .unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].name, "Book A");

    let err = pipeline(catalogue_url(&server), &script, 3)
        .run()
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::NotEnoughBooks { needed: 3, found: 2 }
    ));
}
