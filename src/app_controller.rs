use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::document::{Document, Selection, SelectionResolver, SpanTarget, order_for_processing};
use crate::errors::{AppError, PipelineError};
use crate::file_utils::FileManager;
use crate::translation::{PipelineOptions, ProgressFn, SpanPipeline, SpanReport, TranslationClient, TranslationService};

// @module: Application controller for document translation

/// Totals of one run over a document
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Spans that were translated
    pub reports: Vec<SpanReport>,

    /// Spans that were skipped or failed
    pub failed_spans: usize,

    pub duration: Duration,
}

impl RunSummary {
    pub fn translated_spans(&self) -> usize {
        self.reports.len()
    }

    pub fn translated_paragraphs(&self) -> usize {
        self.reports.iter().map(|r| r.translated).sum()
    }

    pub fn calls(&self) -> u32 {
        self.reports.iter().map(|r| r.calls).sum()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} span(s) translated, {} skipped, {} paragraph(s) in {} call(s), {}",
            self.translated_spans(),
            self.failed_spans,
            self.translated_paragraphs(),
            self.calls(),
            format_duration(self.duration)
        )
    }
}

/// Main application controller for document translation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load a document, translate the selection and save the result.
    ///
    /// Without an explicit output path the result goes next to the input,
    /// with the target language inserted before the extension.
    pub async fn run(&self, input_file: PathBuf, output_file: Option<PathBuf>, selections: &[Selection]) -> Result<RunSummary> {
        let mut document = FileManager::load_document(&input_file)?;

        let service = TranslationService::new(&self.config).context("Failed to create translation service")?;
        if let Err(e) = service.test_connection().await {
            warn!("{}", e);
        }
        info!(
            "Typeshift: {} - {} ({} -> {})",
            self.config.translation.provider.display_name(),
            self.config.translation.get_model(),
            self.config.source_language,
            self.config.target_language
        );

        let summary = self.translate_document(&mut document, &service, selections).await?;

        let output_path =
            output_file.unwrap_or_else(|| FileManager::generate_output_path(&input_file, &self.config.target_language));
        FileManager::save_document(&document, &output_path)?;

        let cache = service.cache.stats();
        if cache.hits > 0 {
            info!("Reused {} cached translation(s)", cache.hits);
        }
        info!("{}", summary.summary());
        info!("Success: {}", output_path.display());
        Ok(summary)
    }

    /// Translate every span a selection resolves to.
    ///
    /// A span that translates nothing is logged and skipped. The run fails
    /// only if the selection is empty or no span translates at all.
    pub async fn translate_document<C: TranslationClient + ?Sized>(
        &self,
        document: &mut Document,
        client: &C,
        selections: &[Selection],
    ) -> Result<RunSummary, AppError> {
        let start_time = Instant::now();
        let mut targets = SelectionResolver::new(document).resolve(selections);
        if targets.is_empty() {
            return Err(AppError::NoTextFound);
        }
        order_for_processing(&mut targets);
        info!("Translating {} span(s), please wait…", targets.len());

        let pipeline = SpanPipeline::new(client, PipelineOptions::from_config(&self.config));
        let mut summary = RunSummary::default();
        let mut last_error = None;

        for target in targets {
            match self.translate_target(document, &pipeline, target).await {
                Ok(report) => summary.reports.push(report),
                Err(e) => {
                    match &e {
                        PipelineError::EmptySpan | PipelineError::NothingTranslated { .. } => {
                            warn!("Skipping frame {}: {}", target.frame, e)
                        }
                        PipelineError::Host(_) => error!("Frame {} failed: {}", target.frame, e),
                    }
                    summary.failed_spans += 1;
                    last_error = Some(e);
                }
            }
        }

        summary.duration = start_time.elapsed();
        match last_error {
            Some(e) if summary.reports.is_empty() => Err(AppError::Pipeline(e)),
            _ => Ok(summary),
        }
    }

    async fn translate_target<C: TranslationClient + ?Sized>(
        &self,
        document: &mut Document,
        pipeline: &SpanPipeline<'_, C>,
        target: SpanTarget,
    ) -> Result<SpanReport, PipelineError> {
        let mut span = document.span(target)?;

        let progress_bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} paragraphs {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar.set_message(format!("frame {}", target.frame));

        let pb = progress_bar.clone();
        let progress: &ProgressFn<'_> = &move |done: usize, total: usize| {
            pb.set_length(total as u64);
            pb.set_position(done as u64);
        };
        let result = pipeline.translate_span(&mut span, Some(progress)).await;
        progress_bar.finish_and_clear();
        result
    }
}

// Format duration in a human-readable format
fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}.{:03}s", seconds, duration.subsec_millis())
    }
}
