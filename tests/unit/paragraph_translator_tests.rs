/*!
 * Tests for per-paragraph translation and soft-failure retry
 */

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use typeshift::translation::{ParagraphTranslator, ProgressFn, RetryPolicy, TranslationOutcome};

use crate::common::mock_clients::{FailingClient, Reply, ScriptedClient};

#[tokio::test]
async fn test_translateParagraphs_withEchoThenAnswer_shouldRetryOnce() {
    let client = ScriptedClient::new([Reply::Echo, Reply::Text("bonjour")]);
    let translator = ParagraphTranslator::new(&client, RetryPolicy::immediate());

    let batch = translator.translate_paragraphs(&["hello"]).await;

    assert_eq!(client.call_count(), 2);
    assert_eq!(batch.paragraphs[0].outcome, TranslationOutcome::Translated("bonjour".to_string()));
    assert_eq!(batch.calls(), 2);
}

#[tokio::test]
async fn test_translateParagraphs_withPersistentEcho_shouldKeepSource() {
    let client = ScriptedClient::new([]);
    let translator = ParagraphTranslator::new(&client, RetryPolicy::immediate());

    let batch = translator.translate_paragraphs(&["hello"]).await;

    assert_eq!(client.call_count(), 2);
    assert_eq!(batch.unchanged(), 1);
    assert_eq!(batch.texts(), vec!["hello"]);
    assert!(!batch.has_translated_content());
}

#[tokio::test]
async fn test_translateParagraphs_withErrors_shouldCountAsEmpty() {
    let client = FailingClient;
    let translator = ParagraphTranslator::new(&client, RetryPolicy::immediate());

    let batch = translator.translate_paragraphs(&["one", "two"]).await;

    assert_eq!(batch.empty(), 2);
    assert_eq!(batch.calls(), 4);
    assert_eq!(batch.texts(), vec!["one", "two"]);
}

#[tokio::test]
async fn test_translateParagraphs_withBlankParagraph_shouldNotCallClient() {
    let client = ScriptedClient::new([Reply::Text("A"), Reply::Text("C")]);
    let translator = ParagraphTranslator::new(&client, RetryPolicy::immediate());

    let batch = translator.translate_paragraphs(&["a", "  ", "c"]).await;

    assert_eq!(client.requests(), vec!["a".to_string(), "c".to_string()]);
    assert_eq!(batch.skipped(), 1);
    assert_eq!(batch.attempted(), 2);
    assert_eq!(batch.texts(), vec!["A", "  ", "C"]);
}

#[tokio::test]
async fn test_translateParagraphs_shouldStripBreaksFromRequests() {
    let client = ScriptedClient::new([Reply::Text("ONE")]);
    let translator = ParagraphTranslator::new(&client, RetryPolicy::immediate());

    translator.translate_paragraphs(&["one\r"]).await;

    assert_eq!(client.requests(), vec!["one".to_string()]);
}

#[tokio::test]
async fn test_translateParagraphs_withTrailingBreakInAnswer_shouldTrimIt() {
    let client = ScriptedClient::new([Reply::Text("bonjour\n")]);
    let translator = ParagraphTranslator::new(&client, RetryPolicy::immediate());

    let batch = translator.translate_paragraphs(&["hello"]).await;

    assert_eq!(batch.texts(), vec!["bonjour"]);
}

#[tokio::test]
async fn test_translateParagraphs_withEmptyThenEmpty_shouldReportEmpty() {
    let client = ScriptedClient::new([Reply::Empty, Reply::Empty]);
    let translator = ParagraphTranslator::new(&client, RetryPolicy::immediate());

    let batch = translator.translate_paragraphs(&["hello"]).await;

    assert_eq!(batch.paragraphs[0].outcome, TranslationOutcome::Empty);
    assert_eq!(batch.paragraphs[0].attempts, 2);
}

#[tokio::test(start_paused = true)]
async fn test_translateParagraphs_shouldWaitBetweenCallsAndBeforeRetry() {
    let client = ScriptedClient::new([Reply::Echo, Reply::Text("A"), Reply::Text("B")]);
    let policy = RetryPolicy {
        inter_call_delay: Duration::from_millis(200),
        retry_delay: Duration::from_millis(300),
    };
    let translator = ParagraphTranslator::new(&client, policy);

    let started = tokio::time::Instant::now();
    let batch = translator.translate_paragraphs(&["a", "b"]).await;

    assert_eq!(batch.translated(), 2);
    assert_eq!(started.elapsed(), Duration::from_millis(500));
}

#[tokio::test]
async fn test_translateParagraphs_shouldReportProgressPerParagraph() {
    let client = ScriptedClient::new([Reply::Text("A"), Reply::Text("B")]);
    let seen = AtomicUsize::new(0);
    let progress: &ProgressFn<'_> = &|done: usize, total: usize| {
        assert_eq!(total, 3);
        seen.store(done, Ordering::SeqCst);
    };
    let translator = ParagraphTranslator::new(&client, RetryPolicy::immediate()).with_progress(progress);

    translator.translate_paragraphs(&["a", "", "b"]).await;

    assert_eq!(seen.load(Ordering::SeqCst), 3);
}
