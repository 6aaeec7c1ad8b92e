/*!
 * Span pipeline orchestrator.
 *
 * Runs one span through the five phases in order:
 * 1. Capture: paragraph texts and the formatting snapshot
 * 2. Translate: paragraph by paragraph, soft failures retried once
 * 3. Rebuild: one content replacement with the joined result
 * 4. Restyle: full reapplication pass, then direction normalization
 * 5. Correct: font, size and fill color again, then direction again
 *
 * Nothing is written before phase 3, so a span where no paragraph
 * translated is left exactly as it was. Host interaction is suppressed
 * from phase 3 until the function returns, on every path.
 */

use log::{debug, info};
use std::time::{Duration, Instant};

use crate::app_config::{Config, FormattingConfig};
use crate::document::{InteractionGuard, PARAGRAPH_BREAK, ReadingDirection, TextSpan};
use crate::errors::PipelineError;
use crate::formatting::{DirectionNormalizer, DirectionReport, FormattingSnapshot, ReapplyReport, StyleReapplier};
use crate::translation::client::TranslationClient;
use crate::translation::paragraph::{ParagraphTranslator, ProgressFn, RetryPolicy};
use crate::translation::reconstruct::TextReconstructor;

/// Knobs for one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    /// Capture per-character styles for same-length paragraphs
    pub fine_grained: bool,

    /// Run the font/size/fill corrective pass
    pub corrective_pass: bool,

    /// Wait between content replacement and restyling
    pub settle_delay: Duration,

    /// Wait before the corrective pass
    pub corrective_delay: Duration,

    /// Direction to force after restyling, `None` to leave it alone
    pub direction: Option<ReadingDirection>,

    /// Waits around provider calls
    pub retry: RetryPolicy,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::from_formatting(&FormattingConfig::default(), RetryPolicy::default(), Some(ReadingDirection::LeftToRight))
    }
}

impl PipelineOptions {
    /// Options for the configured formatting, delays and target language
    pub fn from_config(config: &Config) -> Self {
        let direction = config.formatting.direction_policy.direction_for(&config.target_language);
        Self::from_formatting(
            &config.formatting,
            RetryPolicy::from_config(&config.translation.common),
            direction,
        )
    }

    fn from_formatting(formatting: &FormattingConfig, retry: RetryPolicy, direction: Option<ReadingDirection>) -> Self {
        Self {
            fine_grained: formatting.fine_grained_capture,
            corrective_pass: formatting.corrective_pass,
            settle_delay: Duration::from_millis(formatting.settle_delay_ms),
            corrective_delay: Duration::from_millis(formatting.corrective_delay_ms),
            direction,
            retry,
        }
    }

    /// Default behavior with every wait removed
    pub fn immediate() -> Self {
        Self {
            settle_delay: Duration::ZERO,
            corrective_delay: Duration::ZERO,
            retry: RetryPolicy::immediate(),
            ..Self::default()
        }
    }

    pub fn with_direction(mut self, direction: Option<ReadingDirection>) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_fine_grained(mut self, enabled: bool) -> Self {
        self.fine_grained = enabled;
        self
    }

    pub fn with_corrective_pass(mut self, enabled: bool) -> Self {
        self.corrective_pass = enabled;
        self
    }
}

/// What happened to one span
#[derive(Debug, Clone, PartialEq)]
pub struct SpanReport {
    /// Owning frame of the span
    pub owner: String,

    /// Paragraphs before translation
    pub paragraphs: usize,

    pub translated: usize,
    pub unchanged: usize,
    pub empty: usize,
    pub skipped: usize,

    /// Provider calls, retries included
    pub calls: u32,

    /// Paragraphs after the content replacement
    pub new_paragraphs: usize,

    /// Combined counters of the reapplication passes
    pub reapply: ReapplyReport,

    /// Outcome of the last direction normalization, if any ran
    pub direction: Option<DirectionReport>,

    pub duration: Duration,
}

impl SpanReport {
    pub fn is_structure_preserved(&self) -> bool {
        self.paragraphs == self.new_paragraphs
    }

    /// Paragraphs that kept their original text after being sent
    pub fn kept_original(&self) -> usize {
        self.unchanged + self.empty
    }

    /// One-line human summary
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "'{}': {}/{} paragraph(s) translated in {} call(s), {:.1}s",
            self.owner,
            self.translated,
            self.paragraphs,
            self.calls,
            self.duration.as_secs_f64()
        );
        if self.kept_original() > 0 {
            summary.push_str(&format!(", {} kept original text", self.kept_original()));
        }
        if !self.is_structure_preserved() {
            summary.push_str(&format!(
                ", paragraph count changed {} -> {}",
                self.paragraphs, self.new_paragraphs
            ));
        }
        if self.reapply.has_failures() {
            summary.push_str(&format!(
                ", {} style write(s) failed, {} unresolved",
                self.reapply.failed, self.reapply.unresolved
            ));
        }
        summary
    }
}

/// Translates spans in place while keeping their formatting
pub struct SpanPipeline<'c, C: TranslationClient + ?Sized> {
    client: &'c C,
    options: PipelineOptions,
}

impl<'c, C: TranslationClient + ?Sized> SpanPipeline<'c, C> {
    pub fn new(client: &'c C, options: PipelineOptions) -> Self {
        Self { client, options }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Translate a span and restore its formatting.
    ///
    /// Fails with `EmptySpan` when there is nothing to translate and with
    /// `NothingTranslated` when every paragraph kept its source text; in
    /// both cases the span is untouched.
    pub async fn translate_span<S: TextSpan + ?Sized>(
        &self,
        span: &mut S,
        progress: Option<&ProgressFn<'_>>,
    ) -> Result<SpanReport, PipelineError> {
        let started = Instant::now();
        let owner = span.owner().to_string();

        // Phase 1: capture
        let count = span.paragraph_count()?;
        if count == 0 {
            return Err(PipelineError::EmptySpan);
        }
        let trailing_break = span.contents()?.ends_with(PARAGRAPH_BREAK);
        let sources = (0..count)
            .map(|paragraph| span.paragraph_text(paragraph))
            .collect::<Result<Vec<String>, _>>()?;
        if sources.iter().all(|text| text.trim().is_empty()) {
            return Err(PipelineError::EmptySpan);
        }
        let snapshot = FormattingSnapshot::capture(&*span, self.options.fine_grained)?;
        debug!(
            "Captured {} paragraph style(s) from '{}'{}",
            snapshot.paragraph_count(),
            owner,
            if snapshot.is_fine_grained() { " with character styles" } else { "" }
        );

        // Phase 2: translate
        let mut translator = ParagraphTranslator::new(self.client, self.options.retry);
        if let Some(progress) = progress {
            translator = translator.with_progress(progress);
        }
        let batch = translator.translate_paragraphs(&sources).await;
        if !batch.has_translated_content() {
            return Err(PipelineError::NothingTranslated {
                paragraphs: batch.attempted(),
            });
        }

        // Phase 3: rebuild
        let mut host = InteractionGuard::engage(span);
        let reconstruction = TextReconstructor::rebuild(&mut *host, &batch, trailing_break)?;

        // Phase 4: restyle
        tokio::time::sleep(self.options.settle_delay).await;
        let translated = batch.paragraphs.iter().map(|p| p.is_translated()).collect();
        let reapplier = StyleReapplier::new()
            .with_refinement(self.options.fine_grained)
            .with_translated(translated);
        let mut reapply = reapplier.apply(&mut *host, &snapshot);
        let normalizer = self.options.direction.map(DirectionNormalizer::new);
        let mut direction = normalizer.map(|n| n.normalize(&mut *host));

        // Phase 5: correct
        if self.options.corrective_pass {
            tokio::time::sleep(self.options.corrective_delay).await;
            reapply.merge(&reapplier.apply_corrective(&mut *host, &snapshot));
            if let Some(normalizer) = normalizer {
                direction = Some(normalizer.normalize(&mut *host));
            }
        }
        drop(host);

        let report = SpanReport {
            owner,
            paragraphs: count,
            translated: batch.translated(),
            unchanged: batch.unchanged(),
            empty: batch.empty(),
            skipped: batch.skipped(),
            calls: batch.calls(),
            new_paragraphs: reconstruction.new_paragraphs,
            reapply,
            direction,
            duration: started.elapsed(),
        };
        info!("{}", report.summary());
        Ok(report)
    }
}
