/*!
 * Document-level runs through the controller
 */

use typeshift::app_config::{Config, TranslationProvider};
use typeshift::app_controller::Controller;
use typeshift::document::{Document, ReadingDirection, Selection};
use typeshift::errors::{AppError, PipelineError};
use typeshift::file_utils::FileManager;

use crate::common::mock_clients::{FailingClient, Reply, ScriptedClient, UppercaseClient};
use crate::common::{create_temp_dir, document_with, hello_document, init_test_logging, styled};

/// Default config with every wait removed, logging enabled
fn fast_config() -> Config {
    init_test_logging();
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Ollama;
    config.translation.common.rate_limit_delay_ms = 0;
    config.translation.common.retry_delay_ms = 0;
    config.formatting.settle_delay_ms = 0;
    config.formatting.corrective_delay_ms = 0;
    config
}

fn two_frames(first: &str, second: &str) -> Document {
    let mut document = Document::new("two-frames");
    for (index, text) in [first, second].into_iter().enumerate() {
        let frame = document.add_frame(format!("frame-{}", index));
        document.append_text(frame, text, &styled("Arial", 12.0, "Red")).unwrap();
    }
    document
}

#[tokio::test]
async fn test_translateDocument_withSavedDocument_shouldRoundTripThroughFiles() {
    let dir = create_temp_dir().unwrap();
    let input = dir.path().join("hello.json");
    FileManager::save_document(&hello_document(), &input).unwrap();

    let controller = Controller::with_config(fast_config()).unwrap();
    let mut document = FileManager::load_document(&input).unwrap();
    let client = ScriptedClient::new([Reply::Text("bonjour")]);
    let summary = controller.translate_document(&mut document, &client, &[]).await.unwrap();

    let output = FileManager::generate_output_path(&input, &controller.config().target_language);
    FileManager::save_document(&document, &output).unwrap();
    let reloaded = FileManager::load_document(&output).unwrap();

    assert_eq!(summary.translated_spans(), 1);
    assert_eq!(summary.translated_paragraphs(), 1);
    assert_eq!(reloaded.frame_text(0).as_deref(), Some("bonjour"));
    assert_eq!(reloaded.style_at(0, 6).unwrap().without_handles(), styled("Arial", 12.0, "Red"));
    assert_eq!(
        FileManager::load_document(&input).unwrap().frame_text(0).as_deref(),
        Some("hello")
    );
}

#[tokio::test]
async fn test_translateDocument_withBlankDocument_shouldReportNoTextFound() {
    let controller = Controller::with_config(fast_config()).unwrap();
    let mut document = document_with(&[("   ", styled("Arial", 12.0, "Red"))]);
    let client = UppercaseClient::default();

    let result = controller.translate_document(&mut document, &client, &[]).await;

    assert!(matches!(result, Err(AppError::NoTextFound)));
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_translateDocument_withOneFrameFailing_shouldTranslateTheOther() {
    let controller = Controller::with_config(fast_config()).unwrap();
    let mut document = two_frames("hello", "world");
    let client = ScriptedClient::new([Reply::Empty, Reply::Empty, Reply::Text("monde")]);
    let selections = [Selection::Frame { frame: 0 }, Selection::Frame { frame: 1 }];

    let summary = controller.translate_document(&mut document, &client, &selections).await.unwrap();

    assert_eq!(summary.translated_spans(), 1);
    assert_eq!(summary.failed_spans, 1);
    assert_eq!(summary.calls(), 1);
    assert_eq!(document.frame_text(0).as_deref(), Some("hello"));
    assert_eq!(document.frame_text(1).as_deref(), Some("monde"));
}

#[tokio::test]
async fn test_translateDocument_withEverySpanFailing_shouldReturnPipelineError() {
    let controller = Controller::with_config(fast_config()).unwrap();
    let mut document = two_frames("hello", "world");
    let before = document.clone();
    let selections = [Selection::Frame { frame: 0 }, Selection::Frame { frame: 1 }];

    let result = controller.translate_document(&mut document, &FailingClient, &selections).await;

    assert!(matches!(result, Err(AppError::Pipeline(PipelineError::NothingTranslated { .. }))));
    assert_eq!(document, before);
}

#[tokio::test]
async fn test_translateDocument_withTwoRangesInOneFrame_shouldTranslateBoth() {
    let controller = Controller::with_config(fast_config()).unwrap();
    let mut document = document_with(&[("alpha", styled("Arial", 12.0, "Red")), ("omega", styled("Times", 9.0, "Blue"))]);
    let client = UppercaseClient::default();
    let selections = [
        Selection::Text { frame: 0, start: 0, end: 5 },
        Selection::Text { frame: 0, start: 6, end: 11 },
    ];

    let summary = controller.translate_document(&mut document, &client, &selections).await.unwrap();

    assert_eq!(summary.translated_spans(), 2);
    assert_eq!(document.frame_text(0).as_deref(), Some("ALPHA\rOMEGA"));
    assert_eq!(document.style_at(0, 6).unwrap().font(), Some("Times"));
}

#[tokio::test]
async fn test_translateDocument_withRightToLeftTarget_shouldKeepDirection() {
    let mut config = fast_config();
    config.source_language = "en".to_string();
    config.target_language = "ar".to_string();
    let controller = Controller::with_config(config).unwrap();
    let mut document = hello_document();
    for ch in document.frames[0].story.iter_mut() {
        ch.direction = ReadingDirection::RightToLeft;
    }

    let client = ScriptedClient::new([Reply::Text("مرحبا")]);
    let summary = controller.translate_document(&mut document, &client, &[]).await.unwrap();

    assert!(summary.reports[0].direction.is_none());
    assert!(document.frames[0].story.iter().all(|c| c.direction == ReadingDirection::RightToLeft));
}

#[tokio::test]
async fn test_run_withUnreachableProvider_shouldFailWithoutWritingOutput() {
    let dir = create_temp_dir().unwrap();
    let input = dir.path().join("hello.json");
    let output = dir.path().join("hello.out.json");
    FileManager::save_document(&hello_document(), &input).unwrap();

    let mut config = fast_config();
    config.translation.set_endpoint("http://127.0.0.1:9");
    let controller = Controller::with_config(config).unwrap();

    let result = controller.run(input, Some(output.clone()), &[]).await;

    assert!(result.is_err());
    assert!(!output.exists());
}
