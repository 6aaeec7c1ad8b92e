/*!
 * Translation of text spans.
 *
 * - `client`: the single-paragraph translation call the pipeline depends on
 * - `core`: provider-backed `TranslationService`
 * - `cache`: memo of accepted translations
 * - `paragraph`: per-paragraph driving with soft-failure retry
 * - `reconstruct`: writing translated paragraphs back into a span
 * - `pipeline`: the full capture, translate, rebuild and restyle run
 */

pub use self::cache::{CacheStats, TranslationCache};
pub use self::client::TranslationClient;
pub use self::core::TranslationService;
pub use self::paragraph::{
    ParagraphResult, ParagraphTranslator, ProgressFn, RetryPolicy, TranslationBatch, TranslationOutcome,
};
pub use self::pipeline::{PipelineOptions, SpanPipeline, SpanReport};
pub use self::reconstruct::{Reconstruction, TextReconstructor};

pub mod cache;
pub mod client;
pub mod core;
pub mod paragraph;
pub mod pipeline;
pub mod reconstruct;
