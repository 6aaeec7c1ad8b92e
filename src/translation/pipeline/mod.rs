/*!
 * Translate-and-restyle pipeline for one text span.
 */

pub mod orchestrator;

pub use orchestrator::{PipelineOptions, SpanPipeline, SpanReport};
