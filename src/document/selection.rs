/*!
 * Selection resolution.
 *
 * Turns what the user had selected (a frame, a highlighted range, a text
 * element, or just an insertion point) into the list of spans the pipeline
 * should translate. Every rule falls back to the owning frame's whole text
 * when the narrower choice has nothing to translate, and the whole document
 * falls back to its first non-blank frame.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;

use super::host::PARAGRAPH_BREAK;
use super::memory::Document;

/// Granularity of a selected text element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Character,
    Word,
    Line,
    Paragraph,
}

/// What the user had selected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A whole text frame
    Frame { frame: usize },
    /// A highlighted range
    Text { frame: usize, start: usize, end: usize },
    /// A character, word, line or paragraph object
    Element {
        kind: ElementKind,
        frame: usize,
        start: usize,
        end: usize,
    },
    /// A blinking cursor
    InsertionPoint { frame: usize, offset: usize },
}

impl Selection {
    pub fn frame(&self) -> usize {
        match self {
            Self::Frame { frame }
            | Self::Text { frame, .. }
            | Self::Element { frame, .. }
            | Self::InsertionPoint { frame, .. } => *frame,
        }
    }
}

static SELECTION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(frame|text|char|word|line|paragraph|ip):(\d+)(?::(\d+))?(?::(\d+))?$")
        .expect("selection pattern is valid")
});

impl FromStr for Selection {
    type Err = anyhow::Error;

    /// Parse `frame:F`, `text:F:START:END`, `char|word|line|paragraph:F:START:END` or `ip:F:OFFSET`
    fn from_str(s: &str) -> anyhow::Result<Self> {
        let caps = SELECTION_REGEX
            .captures(s.trim())
            .ok_or_else(|| anyhow::anyhow!("Invalid selection: {}", s))?;
        let number = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<usize>().ok());
        let frame = number(2).ok_or_else(|| anyhow::anyhow!("Missing frame index: {}", s))?;
        let kind = &caps[1];
        let selection = match (kind, number(3), number(4)) {
            ("frame", None, None) => Self::Frame { frame },
            ("ip", Some(offset), None) => Self::InsertionPoint { frame, offset },
            ("text", Some(start), Some(end)) => Self::Text { frame, start, end },
            ("char" | "word" | "line" | "paragraph", Some(start), Some(end)) => {
                let kind = match kind {
                    "char" => ElementKind::Character,
                    "word" => ElementKind::Word,
                    "line" => ElementKind::Line,
                    _ => ElementKind::Paragraph,
                };
                Self::Element { kind, frame, start, end }
            }
            _ => return Err(anyhow::anyhow!("Wrong number of offsets in selection: {}", s)),
        };
        Ok(selection)
    }
}

/// Character range of one frame to translate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpanTarget {
    pub frame: usize,
    pub start: usize,
    pub end: usize,
}

impl SpanTarget {
    pub fn new(frame: usize, start: usize, end: usize) -> Self {
        Self { frame, start, end }
    }

    /// True when both targets share characters of the same frame
    pub fn overlaps(&self, other: &SpanTarget) -> bool {
        self.frame == other.frame && self.start < other.end && other.start < self.end
    }
}

/// Resolves selections against a document
pub struct SelectionResolver<'d> {
    document: &'d Document,
}

impl<'d> SelectionResolver<'d> {
    pub fn new(document: &'d Document) -> Self {
        Self { document }
    }

    /// Resolve selections into non-overlapping span targets, in selection order.
    ///
    /// When nothing in the selection has text, the first frame with
    /// non-blank content is used instead.
    pub fn resolve(&self, selections: &[Selection]) -> Vec<SpanTarget> {
        let mut targets: Vec<SpanTarget> = Vec::new();
        for selection in selections {
            match self.resolve_one(selection) {
                Some(target) if !targets.iter().any(|t| t.overlaps(&target)) => targets.push(target),
                Some(_) => debug!("Skipping selection {:?}, it overlaps an earlier one", selection),
                None => debug!("Selection {:?} has no translatable text", selection),
            }
        }

        if targets.is_empty() {
            if let Some(target) = self.first_frame_with_text() {
                debug!("Falling back to first frame with text: {}", target.frame);
                targets.push(target);
            }
        }
        targets
    }

    fn resolve_one(&self, selection: &Selection) -> Option<SpanTarget> {
        let frame = selection.frame();
        let story_len = self.document.frames.get(frame)?.story.len();
        let narrow = match *selection {
            Selection::Frame { .. } => None,
            Selection::Text { start, end, .. } | Selection::Element { start, end, .. } => {
                let end = end.min(story_len);
                (start < end).then(|| SpanTarget::new(frame, start, end))
            }
            Selection::InsertionPoint { offset, .. } => self.containing_paragraph(frame, offset),
        };

        narrow
            .filter(|t| self.has_text(t))
            .or_else(|| Some(SpanTarget::new(frame, 0, story_len)).filter(|t| self.has_text(t)))
    }

    /// Paragraph around an insertion point, terminator included
    fn containing_paragraph(&self, frame: usize, offset: usize) -> Option<SpanTarget> {
        let story = &self.document.frames.get(frame)?.story;
        let offset = offset.min(story.len());
        let start = story[..offset]
            .iter()
            .rposition(|c| c.ch == PARAGRAPH_BREAK)
            .map_or(0, |i| i + 1);
        let end = story[offset..]
            .iter()
            .position(|c| c.ch == PARAGRAPH_BREAK)
            .map_or(story.len(), |i| offset + i + 1);
        Some(SpanTarget::new(frame, start, end))
    }

    fn has_text(&self, target: &SpanTarget) -> bool {
        self.document
            .frames
            .get(target.frame)
            .and_then(|f| f.story.get(target.start..target.end))
            .is_some_and(|chars| chars.iter().any(|c| !c.ch.is_whitespace()))
    }

    fn first_frame_with_text(&self) -> Option<SpanTarget> {
        self.document
            .frames
            .iter()
            .enumerate()
            .map(|(i, f)| SpanTarget::new(i, 0, f.story.len()))
            .find(|t| self.has_text(t))
    }
}

/// Sort targets so that later spans in a frame are processed first.
///
/// Replacing text shifts every offset after it, so working backwards keeps
/// the remaining targets valid.
pub fn order_for_processing(targets: &mut [SpanTarget]) {
    targets.sort_by(|a, b| a.frame.cmp(&b.frame).then(b.start.cmp(&a.start)));
}
