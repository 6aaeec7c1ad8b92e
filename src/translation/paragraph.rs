/*!
 * Paragraph-by-paragraph translation with soft-failure retry.
 *
 * Each non-blank paragraph is sent to the client on its own. An answer that
 * is empty, an echo of the source, or an error counts as a soft failure:
 * the paragraph is retried once after a short wait and otherwise keeps its
 * original text. Requests are strictly sequential.
 */

use log::{debug, info, warn};
use std::time::Duration;

use crate::app_config::TranslationCommonConfig;
use crate::document::PARAGRAPH_BREAK;
use super::client::TranslationClient;

/// Waits inserted around provider calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Wait before every call except the first of a span
    pub inter_call_delay: Duration,
    /// Wait before the single retry of a soft failure
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            inter_call_delay: Duration::from_millis(200),
            retry_delay: Duration::from_millis(300),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(common: &TranslationCommonConfig) -> Self {
        Self {
            inter_call_delay: Duration::from_millis(common.rate_limit_delay_ms),
            retry_delay: Duration::from_millis(common.retry_delay_ms),
        }
    }

    /// No waiting at all
    pub fn immediate() -> Self {
        Self {
            inter_call_delay: Duration::ZERO,
            retry_delay: Duration::ZERO,
        }
    }
}

/// What happened to one paragraph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    /// Accepted translation
    Translated(String),
    /// The provider echoed the source back; original text kept
    Unchanged,
    /// The provider returned nothing or failed; original text kept
    Empty,
    /// Blank paragraph, never sent
    Skipped,
}

/// One paragraph's source text and outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphResult {
    pub source: String,
    pub outcome: TranslationOutcome,
    /// Provider calls spent on this paragraph
    pub attempts: u32,
}

impl ParagraphResult {
    /// Text to write back: the translation if accepted, the source otherwise
    pub fn text(&self) -> &str {
        match &self.outcome {
            TranslationOutcome::Translated(text) => text,
            _ => &self.source,
        }
    }

    pub fn is_translated(&self) -> bool {
        matches!(self.outcome, TranslationOutcome::Translated(_))
    }
}

/// Results for every paragraph of a span, in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationBatch {
    pub paragraphs: Vec<ParagraphResult>,
}

impl TranslationBatch {
    /// At least one paragraph was actually translated
    pub fn has_translated_content(&self) -> bool {
        self.paragraphs.iter().any(ParagraphResult::is_translated)
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Texts to write back, in paragraph order
    pub fn texts(&self) -> Vec<&str> {
        self.paragraphs.iter().map(ParagraphResult::text).collect()
    }

    pub fn count(&self, predicate: impl Fn(&TranslationOutcome) -> bool) -> usize {
        self.paragraphs.iter().filter(|p| predicate(&p.outcome)).count()
    }

    pub fn translated(&self) -> usize {
        self.count(|o| matches!(o, TranslationOutcome::Translated(_)))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| *o == TranslationOutcome::Unchanged)
    }

    pub fn empty(&self) -> usize {
        self.count(|o| *o == TranslationOutcome::Empty)
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| *o == TranslationOutcome::Skipped)
    }

    /// Paragraphs that were sent to the provider
    pub fn attempted(&self) -> usize {
        self.paragraphs.len() - self.skipped()
    }

    /// Total provider calls, retries included
    pub fn calls(&self) -> u32 {
        self.paragraphs.iter().map(|p| p.attempts).sum()
    }
}

/// Progress notification: (paragraphs done, paragraphs total)
pub type ProgressFn<'a> = dyn Fn(usize, usize) + Send + Sync + 'a;

/// Classification of a single provider answer
enum Attempt {
    Accepted(String),
    Echo,
    Empty,
}

/// Drives a `TranslationClient` over the paragraphs of a span
pub struct ParagraphTranslator<'a, C: TranslationClient + ?Sized> {
    client: &'a C,
    policy: RetryPolicy,
    progress: Option<&'a ProgressFn<'a>>,
}

impl<'a, C: TranslationClient + ?Sized> ParagraphTranslator<'a, C> {
    pub fn new(client: &'a C, policy: RetryPolicy) -> Self {
        Self {
            client,
            policy,
            progress: None,
        }
    }

    /// Report progress after every paragraph
    pub fn with_progress(mut self, progress: &'a ProgressFn<'a>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Translate paragraphs in order, one request in flight at a time
    pub async fn translate_paragraphs<T: AsRef<str>>(&self, paragraphs: &[T]) -> TranslationBatch {
        let total = paragraphs.len();
        let mut results = Vec::with_capacity(total);
        let mut calls_made = 0u32;

        for (index, paragraph) in paragraphs.iter().enumerate() {
            let source = paragraph.as_ref();
            let result = if source.trim().is_empty() {
                ParagraphResult {
                    source: source.to_string(),
                    outcome: TranslationOutcome::Skipped,
                    attempts: 0,
                }
            } else {
                let result = self.translate_one(index, source, calls_made).await;
                calls_made += result.attempts;
                result
            };
            results.push(result);

            if let Some(progress) = self.progress {
                progress(index + 1, total);
            }
        }

        let batch = TranslationBatch { paragraphs: results };
        info!(
            "Translated {}/{} paragraph(s) ({} unchanged, {} empty, {} blank) in {} call(s)",
            batch.translated(),
            batch.len(),
            batch.unchanged(),
            batch.empty(),
            batch.skipped(),
            batch.calls()
        );
        batch
    }

    async fn translate_one(&self, index: usize, source: &str, calls_made: u32) -> ParagraphResult {
        let request = source.replace([PARAGRAPH_BREAK, '\n'], "");

        if calls_made > 0 {
            pause(self.policy.inter_call_delay).await;
        }
        let first = self.attempt(&request).await;
        if let Attempt::Accepted(text) = first {
            return ParagraphResult {
                source: source.to_string(),
                outcome: TranslationOutcome::Translated(text),
                attempts: 1,
            };
        }

        debug!(
            "Paragraph {} came back {}, retrying once",
            index,
            if matches!(first, Attempt::Echo) { "unchanged" } else { "empty" }
        );
        pause(self.policy.retry_delay).await;
        let outcome = match self.attempt(&request).await {
            Attempt::Accepted(text) => TranslationOutcome::Translated(text),
            Attempt::Echo => TranslationOutcome::Unchanged,
            Attempt::Empty => TranslationOutcome::Empty,
        };
        if !matches!(outcome, TranslationOutcome::Translated(_)) {
            warn!("Paragraph {} kept its original text after retry", index);
        }
        ParagraphResult {
            source: source.to_string(),
            outcome,
            attempts: 2,
        }
    }

    async fn attempt(&self, request: &str) -> Attempt {
        match self.client.translate(request).await {
            Ok(answer) => {
                let answer = answer.trim_end_matches([PARAGRAPH_BREAK, '\n']);
                if answer.trim().is_empty() {
                    Attempt::Empty
                } else if answer.trim() == request.trim() {
                    Attempt::Echo
                } else {
                    Attempt::Accepted(answer.to_string())
                }
            }
            Err(e) => {
                warn!("Translation request failed: {}", e);
                Attempt::Empty
            }
        }
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
