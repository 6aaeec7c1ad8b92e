/*!
 * Writing translated paragraphs back into a span.
 */

use log::{debug, warn};

use crate::document::{PARAGRAPH_BREAK, TextSpan};
use crate::errors::HostError;

use super::paragraph::TranslationBatch;

/// Paragraph structure before and after the content replacement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconstruction {
    pub original_paragraphs: usize,
    pub new_paragraphs: usize,
    /// Characters written, terminators included
    pub written_chars: usize,
}

impl Reconstruction {
    /// Paragraphs that have a captured style to receive
    pub fn overlap(&self) -> usize {
        self.original_paragraphs.min(self.new_paragraphs)
    }

    pub fn is_structure_preserved(&self) -> bool {
        self.original_paragraphs == self.new_paragraphs
    }
}

/// Replaces span content with translated paragraphs
pub struct TextReconstructor;

impl TextReconstructor {
    /// Join paragraphs with the host's paragraph break
    pub fn join<T: AsRef<str>>(paragraphs: &[T], trailing_break: bool) -> String {
        let mut text = paragraphs
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<&str>>()
            .join(&PARAGRAPH_BREAK.to_string());
        if trailing_break {
            text.push(PARAGRAPH_BREAK);
        }
        text
    }

    /// Replace the whole span in one write and re-enumerate its paragraphs.
    ///
    /// A changed paragraph count is tolerated; styles are then restored over
    /// the overlapping prefix only.
    pub fn rebuild<S: TextSpan + ?Sized>(
        span: &mut S,
        batch: &TranslationBatch,
        trailing_break: bool,
    ) -> Result<Reconstruction, HostError> {
        let text = Self::join(&batch.texts(), trailing_break);
        span.replace_contents(&text)?;
        let new_paragraphs = span.paragraph_count()?;

        let reconstruction = Reconstruction {
            original_paragraphs: batch.len(),
            new_paragraphs,
            written_chars: text.chars().count(),
        };
        if reconstruction.is_structure_preserved() {
            debug!("Rebuilt '{}' with {} paragraph(s)", span.owner(), new_paragraphs);
        } else {
            warn!(
                "Paragraph count of '{}' changed from {} to {}; restoring styles on the first {} only",
                span.owner(),
                reconstruction.original_paragraphs,
                new_paragraphs,
                reconstruction.overlap()
            );
        }
        Ok(reconstruction)
    }
}
