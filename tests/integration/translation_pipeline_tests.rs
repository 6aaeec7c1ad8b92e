/*!
 * End-to-end span runs against the in-memory document host
 */

use typeshift::document::{
    DirectionMechanism, Document, InteractionLevel, Justification, ReadingDirection, SpanTarget, StyleKey, TextSpan,
};
use typeshift::errors::{HostError, PipelineError};
use typeshift::formatting::{DirectionNormalizer, FormattingSnapshot, StyleReapplier};
use typeshift::translation::{PipelineOptions, SpanPipeline};

use crate::common::mock_clients::{FailingClient, Reply, ScriptedClient, UppercaseClient};
use crate::common::{document_with, fully_styled, hello_document, init_test_logging, styled};

#[tokio::test]
async fn test_translateSpan_withRightToLeftSource_shouldKeepStyleAndReadLeftToRight() {
    init_test_logging();
    let mut document = hello_document();
    for ch in document.frames[0].story.iter_mut() {
        ch.direction = ReadingDirection::RightToLeft;
    }
    let client = ScriptedClient::new([Reply::Text("bonjour")]);
    let pipeline = SpanPipeline::new(&client, PipelineOptions::immediate());

    let report = {
        let mut span = document.frame_span(0).unwrap();
        pipeline.translate_span(&mut span, None).await.unwrap()
    };

    assert_eq!(document.frame_text(0).as_deref(), Some("bonjour"));
    for index in 0..7 {
        let style = document.style_at(0, index).unwrap().without_handles();
        assert_eq!(style, styled("Arial", 12.0, "Red"), "character {}", index);
    }
    assert!(document.frames[0].story.iter().all(|c| c.direction == ReadingDirection::LeftToRight));
    assert_eq!(report.direction.map(|d| d.direct), Some(1));
    assert_eq!(report.calls, 1);
}

#[tokio::test]
async fn test_translateSpan_withEchoThenAnswer_shouldUseExactlyTwoCalls() {
    let mut document = hello_document();
    let client = ScriptedClient::new([Reply::Echo, Reply::Text("bonjour")]);
    let pipeline = SpanPipeline::new(&client, PipelineOptions::immediate());

    let report = {
        let mut span = document.frame_span(0).unwrap();
        pipeline.translate_span(&mut span, None).await.unwrap()
    };

    assert_eq!(client.call_count(), 2);
    assert_eq!(report.calls, 2);
    assert_eq!(document.frame_text(0).as_deref(), Some("bonjour"));
}

#[tokio::test]
async fn test_translateSpan_withPartialSuccess_shouldKeepUntranslatedParagraph() {
    let mut document = document_with(&[
        ("a", styled("Arial", 12.0, "Red")),
        ("b", styled("Times", 9.0, "Blue")),
    ]);
    let client = ScriptedClient::new([Reply::Text("A"), Reply::Empty, Reply::Empty]);
    let pipeline = SpanPipeline::new(&client, PipelineOptions::immediate());

    let report = {
        let mut span = document.frame_span(0).unwrap();
        pipeline.translate_span(&mut span, None).await.unwrap()
    };

    assert_eq!(document.frame_text(0).as_deref(), Some("A\rb"));
    assert_eq!(report.translated, 1);
    assert_eq!(report.empty, 1);
    assert_eq!(report.unchanged, 0);
    assert_eq!(client.call_count(), 3);
    assert_eq!(document.style_at(0, 2).unwrap().font(), Some("Times"));
}

#[tokio::test]
async fn test_translateSpan_withSameLengthAnswer_shouldApplyParagraphStyleToEveryCharacter() {
    let mut document = Document::new("test");
    let frame = document.add_frame("frame-0");
    document.append_text(frame, "ab", &styled("Arial", 12.0, "Red")).unwrap();
    document.append_text(frame, "c", &styled("Arial Bold", 12.0, "Red")).unwrap();
    let client = ScriptedClient::new([Reply::Text("xyz")]);
    let pipeline = SpanPipeline::new(&client, PipelineOptions::immediate());

    let report = {
        let mut span = document.frame_span(frame).unwrap();
        pipeline.translate_span(&mut span, None).await.unwrap()
    };

    assert_eq!(document.frame_text(frame).as_deref(), Some("xyz"));
    assert_eq!(report.reapply.refined_paragraphs, 0);
    for index in 0..3 {
        assert_eq!(document.style_at(frame, index).unwrap().font(), Some("Arial"), "character {}", index);
    }
}

#[tokio::test]
async fn test_translateSpan_withPartOfRightToLeftParagraph_shouldTurnWholeParagraph() {
    let mut document = document_with(&[("abc def ghi", styled("Arial", 12.0, "Red"))]);
    for ch in document.frames[0].story.iter_mut() {
        ch.direction = ReadingDirection::RightToLeft;
    }
    let client = ScriptedClient::new([Reply::Text("DEF")]);
    let pipeline = SpanPipeline::new(&client, PipelineOptions::immediate());

    {
        let mut span = document.span(SpanTarget::new(0, 4, 7)).unwrap();
        pipeline.translate_span(&mut span, None).await.unwrap();
        assert_eq!(span.paragraph_direction(0), Ok(ReadingDirection::LeftToRight));
    }

    assert_eq!(document.frame_text(0).as_deref(), Some("abc DEF ghi"));
    let directions: Vec<_> = document.frames[0].story.iter().map(|c| c.direction).collect();
    assert_eq!(directions, vec![ReadingDirection::LeftToRight; 11]);
}

#[tokio::test]
async fn test_translateSpan_withEveryCallFailing_shouldLeaveDocumentUntouched() {
    let mut document = document_with(&[("one", fully_styled()), ("two", styled("Arial", 12.0, "Red"))]);
    let before = document.clone();
    let client = FailingClient;
    let pipeline = SpanPipeline::new(&client, PipelineOptions::immediate());

    let result = {
        let mut span = document.frame_span(0).unwrap();
        pipeline.translate_span(&mut span, None).await
    };

    assert!(matches!(result, Err(PipelineError::NothingTranslated { paragraphs: 2 })));
    assert_eq!(document, before);
}

#[tokio::test]
async fn test_translateSpan_withBlankSpan_shouldReportEmptySpan() {
    let mut document = document_with(&[("  ", styled("Arial", 12.0, "Red"))]);
    let client = ScriptedClient::new([]);
    let pipeline = SpanPipeline::new(&client, PipelineOptions::immediate());

    let result = {
        let mut span = document.frame_span(0).unwrap();
        pipeline.translate_span(&mut span, None).await
    };

    assert!(matches!(result, Err(PipelineError::EmptySpan)));
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_reapply_runTwice_shouldBeIdempotent() {
    let mut document = document_with(&[("first", fully_styled()), ("second", styled("Arial", 12.0, "Red"))]);
    let snapshot = {
        let span = document.frame_span(0).unwrap();
        FormattingSnapshot::capture(&span, true).unwrap()
    };
    let client = ScriptedClient::new([Reply::Text("premier"), Reply::Text("second!")]);
    let pipeline = SpanPipeline::new(&client, PipelineOptions::immediate());
    {
        let mut span = document.frame_span(0).unwrap();
        pipeline.translate_span(&mut span, None).await.unwrap();
    }
    let after_first = document.clone();

    {
        let mut span = document.frame_span(0).unwrap();
        StyleReapplier::new().apply(&mut span, &snapshot);
        DirectionNormalizer::left_to_right().normalize(&mut span);
    }

    assert_eq!(document, after_first);
}

#[tokio::test]
async fn test_translateSpan_withUnwritableKey_shouldRestoreEveryOtherAttribute() {
    init_test_logging();
    let mut document = document_with(&[("lead", styled("Arial", 12.0, "Red")), ("body", fully_styled())]);
    document.faults.unwritable.insert(StyleKey::Tracking);
    let client = UppercaseClient::default();
    let pipeline = SpanPipeline::new(&client, PipelineOptions::immediate());

    let report = {
        let mut span = document.frame_span(0).unwrap();
        pipeline.translate_span(&mut span, None).await.unwrap()
    };

    assert!(report.reapply.failed > 0);
    let body = document.style_at(0, 5).unwrap();
    assert!(!body.contains(StyleKey::Tracking));
    assert_eq!(body.font(), Some("Minion Pro"));
    assert!(body.contains(StyleKey::HorizontalScale));
    assert!(body.contains(StyleKey::SmallCaps));
    assert_eq!(body.stroke_color().map(|c| c.name.as_str()), Some("Paper"));
}

#[tokio::test]
async fn test_translateSpan_withTrailingBreakAndBlankParagraph_shouldPreserveStructure() {
    let mut document = document_with(&[
        ("one", styled("Arial", 12.0, "Red")),
        ("", styled("Arial", 12.0, "Red")),
        ("three", styled("Arial", 12.0, "Red")),
    ]);
    document.append_text(0, "\r", &styled("Arial", 12.0, "Red")).unwrap();
    let client = UppercaseClient::default();
    let pipeline = SpanPipeline::new(&client, PipelineOptions::immediate());

    let report = {
        let mut span = document.frame_span(0).unwrap();
        pipeline.translate_span(&mut span, None).await.unwrap()
    };

    assert_eq!(document.frame_text(0).as_deref(), Some("ONE\r\rTHREE\r"));
    assert!(report.is_structure_preserved());
    assert_eq!(report.skipped, 1);
    assert_eq!(client.call_count(), 2);
}

#[tokio::test]
async fn test_translateSpan_withRejectedReplace_shouldRestoreInteractionLevel() {
    let mut document = hello_document();
    document.faults.reject_replace = true;
    let client = ScriptedClient::new([Reply::Text("bonjour")]);
    let pipeline = SpanPipeline::new(&client, PipelineOptions::immediate());

    let result = {
        let mut span = document.frame_span(0).unwrap();
        pipeline.translate_span(&mut span, None).await
    };

    assert!(matches!(result, Err(PipelineError::Host(HostError::Rejected(_)))));
    assert_eq!(document.interaction_level, InteractionLevel::InteractWithAll);
    assert_eq!(document.frame_text(0).as_deref(), Some("hello"));
}

#[tokio::test]
async fn test_translateSpan_withParagraphDirectionUnavailable_shouldUseFallback() {
    let mut document = document_with(&[("one", styled("Arial", 12.0, "Red")), ("two", styled("Arial", 12.0, "Red"))]);
    for ch in document.frames[0].story.iter_mut() {
        ch.direction = ReadingDirection::RightToLeft;
        ch.justification = Justification::Right;
    }
    document.faults.unsupported_mechanisms.insert(DirectionMechanism::ParagraphDirection);
    let client = UppercaseClient::default();
    let pipeline = SpanPipeline::new(&client, PipelineOptions::immediate());

    let report = {
        let mut span = document.frame_span(0).unwrap();
        pipeline.translate_span(&mut span, None).await.unwrap()
    };

    let direction = report.direction.unwrap();
    assert_eq!(direction.fallback, 2);
    assert_eq!(direction.failed, 0);
    assert!(document.frames[0].story.iter().all(|c| c.direction == ReadingDirection::LeftToRight));
}

#[tokio::test]
async fn test_translateSpan_withoutDirection_shouldLeaveDirectionAlone() {
    let mut document = hello_document();
    for ch in document.frames[0].story.iter_mut() {
        ch.direction = ReadingDirection::RightToLeft;
    }
    let client = ScriptedClient::new([Reply::Text("שלום")]);
    let pipeline = SpanPipeline::new(&client, PipelineOptions::immediate().with_direction(None));

    let report = {
        let mut span = document.frame_span(0).unwrap();
        pipeline.translate_span(&mut span, None).await.unwrap()
    };

    assert!(report.direction.is_none());
    assert!(document.frames[0].story.iter().all(|c| c.direction == ReadingDirection::RightToLeft));
}

#[tokio::test]
async fn test_translateSpan_withBreakInsideAnswer_shouldReportChangedStructure() {
    init_test_logging();
    let mut document = hello_document();
    let client = ScriptedClient::new([Reply::Text("bon\rjour")]);
    let pipeline = SpanPipeline::new(&client, PipelineOptions::immediate());

    let report = {
        let mut span = document.frame_span(0).unwrap();
        pipeline.translate_span(&mut span, None).await.unwrap()
    };

    assert_eq!(report.paragraphs, 1);
    assert_eq!(report.new_paragraphs, 2);
    assert!(!report.is_structure_preserved());
    assert!(report.summary().contains("paragraph count changed 1 -> 2"));
    assert_eq!(document.style_at(0, 0).unwrap().font(), Some("Arial"));
}

#[tokio::test]
async fn test_translateSpan_withCorrectivePassDisabled_shouldWriteFewerAttributes() {
    let mut with_pass = hello_document();
    let mut without_pass = hello_document();

    let client = UppercaseClient::default();
    let full = SpanPipeline::new(&client, PipelineOptions::immediate());
    let single = SpanPipeline::new(&client, PipelineOptions::immediate().with_corrective_pass(false));

    let full_report = {
        let mut span = with_pass.frame_span(0).unwrap();
        full.translate_span(&mut span, None).await.unwrap()
    };
    let single_report = {
        let mut span = without_pass.frame_span(0).unwrap();
        single.translate_span(&mut span, None).await.unwrap()
    };

    assert_eq!(single_report.reapply.applied * 2, full_report.reapply.applied);
    assert_eq!(with_pass, without_pass);
}
