/*!
 * Pre-translation style capture.
 *
 * A `FormattingSnapshot` records one `StyleAttributeSet` per paragraph,
 * read from the paragraph's first character, and optionally one set per
 * character. Every attribute read is isolated: a failing read leaves that
 * attribute absent and capture carries on.
 */

use log::{debug, trace};

use crate::document::{CharPos, StyleAttributeSet, StyleKey, TextSpan};
use crate::errors::HostError;

/// Captured style state of a span, taken once before its text is replaced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormattingSnapshot {
    paragraph_styles: Vec<StyleAttributeSet>,
    paragraph_lengths: Vec<usize>,
    character_styles: Option<Vec<Vec<StyleAttributeSet>>>,
}

impl FormattingSnapshot {
    /// Capture the styles of every paragraph in `span`.
    ///
    /// Only the paragraph count is required to succeed; everything else
    /// degrades to absent attributes.
    pub fn capture<S: TextSpan + ?Sized>(span: &S, fine_grained: bool) -> Result<Self, HostError> {
        let count = span.paragraph_count()?;
        let mut paragraph_styles = Vec::with_capacity(count);
        let mut paragraph_lengths = Vec::with_capacity(count);
        let mut character_styles = fine_grained.then(|| Vec::with_capacity(count));

        for paragraph in 0..count {
            let len = span.paragraph_len(paragraph).unwrap_or_else(|e| {
                debug!("Paragraph {} length unavailable, treating as empty: {}", paragraph, e);
                0
            });

            let style = if len > 0 {
                capture_character(span, CharPos::new(paragraph, 0))
            } else {
                StyleAttributeSet::new()
            };
            paragraph_styles.push(style);
            paragraph_lengths.push(len);

            if let Some(chars) = character_styles.as_mut() {
                chars.push(
                    (0..len)
                        .map(|offset| capture_character(span, CharPos::new(paragraph, offset)))
                        .collect(),
                );
            }
        }

        debug!(
            "Captured formatting for {} paragraph(s) in '{}'{}",
            count,
            span.owner(),
            if fine_grained { " with character detail" } else { "" }
        );

        Ok(Self {
            paragraph_styles,
            paragraph_lengths,
            character_styles,
        })
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraph_styles.len()
    }

    /// Style of the first character of a paragraph
    pub fn paragraph_style(&self, paragraph: usize) -> Option<&StyleAttributeSet> {
        self.paragraph_styles.get(paragraph)
    }

    pub fn paragraph_styles(&self) -> &[StyleAttributeSet] {
        &self.paragraph_styles
    }

    /// Character count of a paragraph at capture time
    pub fn paragraph_len(&self, paragraph: usize) -> Option<usize> {
        self.paragraph_lengths.get(paragraph).copied()
    }

    /// Per-character styles of a paragraph, when character detail was captured
    pub fn character_styles(&self, paragraph: usize) -> Option<&[StyleAttributeSet]> {
        self.character_styles
            .as_ref()
            .and_then(|paragraphs| paragraphs.get(paragraph))
            .map(Vec::as_slice)
    }

    pub fn is_fine_grained(&self) -> bool {
        self.character_styles.is_some()
    }
}

/// Read every attribute of one character independently
fn capture_character<S: TextSpan + ?Sized>(span: &S, at: CharPos) -> StyleAttributeSet {
    let mut set = StyleAttributeSet::new();
    for key in StyleKey::ALL {
        match span.read_attribute(at, key) {
            Ok(Some(value)) => {
                if !set.insert(key, value) {
                    trace!("Ignoring mismatched value for {} at {:?}", key, at);
                }
            }
            Ok(None) => {}
            Err(e) => trace!("Could not capture {} at {:?}: {}", key, at, e),
        }
    }
    set
}
