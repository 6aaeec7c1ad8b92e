/*!
 * Paragraph direction normalization.
 *
 * Text translated out of a right-to-left language keeps the source
 * paragraphs' direction after replacement. `DirectionNormalizer` sets the
 * direction of every paragraph in the span, trying each
 * `DirectionMechanism` in turn until the host accepts one.
 */

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::document::{DirectionMechanism, ReadingDirection, TextSpan};
use crate::language_utils;

/// When to touch paragraph direction after translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DirectionPolicy {
    /// Left-to-right unless the target language reads right to left
    #[default]
    Auto,
    /// Always left-to-right
    ForceLeftToRight,
    /// Never change direction
    Preserve,
}

impl DirectionPolicy {
    /// Direction to enforce for a target language, `None` to leave paragraphs alone
    pub fn direction_for(self, target_language: &str) -> Option<ReadingDirection> {
        match self {
            Self::Auto if language_utils::is_right_to_left(target_language) => None,
            Self::Auto | Self::ForceLeftToRight => Some(ReadingDirection::LeftToRight),
            Self::Preserve => None,
        }
    }
}

impl fmt::Display for DirectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Auto => "auto",
            Self::ForceLeftToRight => "force-left-to-right",
            Self::Preserve => "preserve",
        };
        f.write_str(name)
    }
}

/// Per-run direction outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionReport {
    /// Paragraphs set through the paragraph direction property
    pub direct: usize,
    /// Paragraphs that needed the legacy property or alignment
    pub fallback: usize,
    /// Paragraphs no mechanism could change
    pub failed: usize,
}

/// Applies a reading direction to every paragraph of a span
#[derive(Debug, Clone, Copy)]
pub struct DirectionNormalizer {
    direction: ReadingDirection,
}

impl DirectionNormalizer {
    pub fn new(direction: ReadingDirection) -> Self {
        Self { direction }
    }

    pub fn left_to_right() -> Self {
        Self::new(ReadingDirection::LeftToRight)
    }

    /// Set the direction of every paragraph; failures are counted, never raised
    pub fn normalize<S: TextSpan + ?Sized>(&self, span: &mut S) -> DirectionReport {
        let mut report = DirectionReport::default();
        let count = match span.paragraph_count() {
            Ok(count) => count,
            Err(e) => {
                debug!("Cannot enumerate paragraphs for direction change: {}", e);
                return report;
            }
        };

        for paragraph in 0..count {
            let accepted = DirectionMechanism::FALLBACK_CHAIN.into_iter().find(|&mechanism| {
                match span.set_paragraph_direction(paragraph, self.direction, mechanism) {
                    Ok(()) => true,
                    Err(e) => {
                        trace!("{:?} refused for paragraph {}: {}", mechanism, paragraph, e);
                        false
                    }
                }
            });
            match accepted {
                Some(DirectionMechanism::ParagraphDirection) => report.direct += 1,
                Some(_) => report.fallback += 1,
                None => report.failed += 1,
            }
        }

        debug!(
            "Direction {:?} on '{}': {} direct, {} fallback, {} failed",
            self.direction,
            span.owner(),
            report.direct,
            report.fallback,
            report.failed
        );
        report
    }
}
