/*!
 * In-memory document host.
 *
 * A JSON-serializable stand-in for a desktop-publishing document: frames
 * holding stories of styled characters, plus the named resource tables
 * (fonts, swatches, paragraph and character styles) that character styles
 * point into. `MemorySpan` implements `TextSpan` over a character range of
 * one frame.
 *
 * Replacing a span's content behaves like a real layout host: every new
 * character inherits the style of the first replaced character, and every
 * paragraph inherits the first paragraph's direction and alignment. The
 * reapplication passes exist to undo exactly that.
 */

use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::ops::Range;

use crate::errors::HostError;
use super::host::{
    CharPos, DirectionMechanism, InteractionControl, InteractionLevel, Justification, PARAGRAPH_BREAK,
    ReadingDirection, TextSpan,
};
use super::selection::SpanTarget;
use super::style::{
    AppliedValue, AttributeValue, ColorRef, ResourceHandle, ResourceKind, StyleAttributeSet, StyleKey,
};

/// One named resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceEntry {
    pub id: u64,
    pub name: String,
}

/// A named resource table with stable handles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceTable {
    #[serde(default)]
    entries: Vec<ResourceEntry>,
    #[serde(default)]
    next_id: u64,
}

impl ResourceTable {
    /// Add a resource, or return the existing handle for that name
    pub fn add(&mut self, name: &str) -> ResourceHandle {
        if let Some(handle) = self.by_name(name) {
            return handle;
        }
        // Hand-written documents may omit next_id
        let id = self
            .entries
            .iter()
            .map(|e| e.id + 1)
            .max()
            .unwrap_or(0)
            .max(self.next_id);
        self.next_id = id + 1;
        self.entries.push(ResourceEntry {
            id,
            name: name.to_string(),
        });
        ResourceHandle(id)
    }

    /// Remove a resource by name; handles to it go stale
    pub fn remove(&mut self, name: &str) -> Option<ResourceHandle> {
        let pos = self.entries.iter().position(|e| e.name == name)?;
        let entry = self.entries.remove(pos);
        Some(ResourceHandle(entry.id))
    }

    pub fn by_name(&self, name: &str) -> Option<ResourceHandle> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| ResourceHandle(e.id))
    }

    pub fn name_of(&self, handle: ResourceHandle) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.id == handle.0)
            .map(|e| e.name.as_str())
    }

    pub fn entries(&self) -> &[ResourceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A character together with its local formatting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyledChar {
    pub ch: char,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<StyleKey, AppliedValue>,
    #[serde(default)]
    pub direction: ReadingDirection,
    #[serde(default)]
    pub justification: Justification,
}

impl StyledChar {
    pub fn plain(ch: char) -> Self {
        Self {
            ch,
            style: BTreeMap::new(),
            direction: ReadingDirection::default(),
            justification: Justification::default(),
        }
    }
}

/// A text frame and the story it displays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFrame {
    pub id: String,
    #[serde(default)]
    pub story: Vec<StyledChar>,
}

impl TextFrame {
    pub fn text(&self) -> String {
        self.story.iter().map(|c| c.ch).collect()
    }
}

/// Failures to inject into a document, for exercising the fallback paths
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaultPlan {
    /// Keys whose reads fail
    pub unreadable: HashSet<StyleKey>,
    /// Keys whose writes fail
    pub unwritable: HashSet<StyleKey>,
    /// Resource tables whose by-name lookup fails while enumeration still works
    pub failing_lookups: HashSet<ResourceKind>,
    /// Direction mechanisms the host does not accept
    pub unsupported_mechanisms: HashSet<DirectionMechanism>,
    /// Refuse whole-span content replacement
    pub reject_replace: bool,
}

/// In-memory desktop-publishing document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub frames: Vec<TextFrame>,
    #[serde(default)]
    pub fonts: ResourceTable,
    #[serde(default)]
    pub swatches: ResourceTable,
    #[serde(default)]
    pub paragraph_styles: ResourceTable,
    #[serde(default)]
    pub character_styles: ResourceTable,
    #[serde(default)]
    pub interaction_level: InteractionLevel,
    #[serde(skip)]
    pub faults: FaultPlan,
}

impl Document {
    /// Create an empty document
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Parse a document from its JSON form
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serialize the document to pretty JSON
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn table(&self, kind: ResourceKind) -> &ResourceTable {
        match kind {
            ResourceKind::Font => &self.fonts,
            ResourceKind::Swatch => &self.swatches,
            ResourceKind::ParagraphStyle => &self.paragraph_styles,
            ResourceKind::CharacterStyle => &self.character_styles,
        }
    }

    pub fn table_mut(&mut self, kind: ResourceKind) -> &mut ResourceTable {
        match kind {
            ResourceKind::Font => &mut self.fonts,
            ResourceKind::Swatch => &mut self.swatches,
            ResourceKind::ParagraphStyle => &mut self.paragraph_styles,
            ResourceKind::CharacterStyle => &mut self.character_styles,
        }
    }

    /// Delete a named resource; characters still pointing at it keep a stale handle
    pub fn remove_resource(&mut self, kind: ResourceKind, name: &str) -> bool {
        self.table_mut(kind).remove(name).is_some()
    }

    /// Add an empty frame and return its index
    pub fn add_frame(&mut self, id: impl Into<String>) -> usize {
        self.frames.push(TextFrame {
            id: id.into(),
            story: Vec::new(),
        });
        self.frames.len() - 1
    }

    pub fn frame_index(&self, id: &str) -> Option<usize> {
        self.frames.iter().position(|f| f.id == id)
    }

    pub fn frame_text(&self, frame: usize) -> Option<String> {
        self.frames.get(frame).map(TextFrame::text)
    }

    /// Append styled text to a frame, registering any named resources the style uses
    pub fn append_text(&mut self, frame: usize, text: &str, style: &StyleAttributeSet) -> Result<(), HostError> {
        let applied: BTreeMap<StyleKey, AppliedValue> = style
            .iter()
            .map(|(key, value)| (key, self.intern(key, value)))
            .collect();
        let len = self.frames.len();
        let target = self
            .frames
            .get_mut(frame)
            .ok_or(HostError::OutOfRange { index: frame, len })?;
        target.story.extend(text.chars().map(|ch| StyledChar {
            ch,
            style: applied.clone(),
            direction: ReadingDirection::default(),
            justification: Justification::default(),
        }));
        Ok(())
    }

    /// Turn a captured value into a storable one, creating named resources as needed
    fn intern(&mut self, key: StyleKey, value: &AttributeValue) -> AppliedValue {
        match (key.resource_kind(), value.resource_name()) {
            (Some(kind), Some(name)) => AppliedValue::Resource(self.table_mut(kind).add(name)),
            _ => AppliedValue::direct(value).unwrap_or(AppliedValue::Flag(false)),
        }
    }

    /// Turn a stored value back into its captured form
    fn resolve(&self, key: StyleKey, value: &AppliedValue) -> Result<AttributeValue, HostError> {
        match (key.resource_kind(), value) {
            (Some(kind), AppliedValue::Resource(handle)) => {
                let name = self
                    .table(kind)
                    .name_of(*handle)
                    .ok_or(HostError::StaleHandle(kind))?
                    .to_string();
                Ok(match kind {
                    ResourceKind::Font => AttributeValue::Font(name),
                    ResourceKind::Swatch => AttributeValue::Color(ColorRef {
                        name,
                        handle: Some(*handle),
                    }),
                    ResourceKind::ParagraphStyle | ResourceKind::CharacterStyle => AttributeValue::StyleName(name),
                })
            }
            (None, AppliedValue::Number(n)) => Ok(AttributeValue::Number(*n)),
            (None, AppliedValue::Leading(l)) => Ok(AttributeValue::Leading(*l)),
            (None, AppliedValue::Flag(b)) => Ok(AttributeValue::Flag(*b)),
            _ => Err(HostError::Rejected(format!("stored value does not fit {}", key))),
        }
    }

    /// Resolved style of one story character; unresolvable attributes are left out
    pub fn style_at(&self, frame: usize, index: usize) -> Option<StyleAttributeSet> {
        let ch = self.frames.get(frame)?.story.get(index)?;
        Some(
            ch.style
                .iter()
                .filter_map(|(key, value)| self.resolve(*key, value).ok().map(|v| (*key, v)))
                .collect(),
        )
    }

    /// Open a span over part of a frame
    pub fn span(&mut self, target: SpanTarget) -> Result<MemorySpan<'_>, HostError> {
        let frames = self.frames.len();
        let frame = self
            .frames
            .get(target.frame)
            .ok_or(HostError::OutOfRange { index: target.frame, len: frames })?;
        if target.start > target.end || target.end > frame.story.len() {
            return Err(HostError::OutOfRange {
                index: target.end,
                len: frame.story.len(),
            });
        }
        Ok(MemorySpan {
            doc: self,
            frame: target.frame,
            start: target.start,
            end: target.end,
        })
    }

    /// Open a span over a frame's whole story
    pub fn frame_span(&mut self, frame: usize) -> Result<MemorySpan<'_>, HostError> {
        let len = self
            .frames
            .get(frame)
            .map(|f| f.story.len())
            .ok_or(HostError::OutOfRange { index: frame, len: self.frames.len() })?;
        self.span(SpanTarget::new(frame, 0, len))
    }
}

impl InteractionControl for Document {
    fn interaction_level(&self) -> InteractionLevel {
        self.interaction_level
    }

    fn set_interaction_level(&mut self, level: InteractionLevel) {
        self.interaction_level = level;
    }
}

/// Story index range of one paragraph in a span
#[derive(Debug, Clone, Copy)]
struct ParagraphRange {
    start: usize,
    len: usize,
    terminator: Option<usize>,
}

impl ParagraphRange {
    /// Story indices of the whole paragraph this range sits in, terminator included.
    ///
    /// A span may cover only part of a paragraph, but paragraph properties
    /// belong to every character from one break to the next.
    fn paragraph_bounds(&self, story: &[StyledChar]) -> Range<usize> {
        let start = story[..self.start]
            .iter()
            .rposition(|c| c.ch == PARAGRAPH_BREAK)
            .map_or(0, |i| i + 1);
        let tail = self.start + self.len;
        let end = match self.terminator {
            Some(t) => t + 1,
            None => story[tail..]
                .iter()
                .position(|c| c.ch == PARAGRAPH_BREAK)
                .map_or(story.len(), |i| tail + i + 1),
        };
        start..end
    }
}

/// `TextSpan` over a character range of one frame
pub struct MemorySpan<'a> {
    doc: &'a mut Document,
    frame: usize,
    start: usize,
    end: usize,
}

impl MemorySpan<'_> {
    /// Where the span currently sits in its frame
    pub fn target(&self) -> SpanTarget {
        SpanTarget::new(self.frame, self.start, self.end)
    }

    pub fn document(&self) -> &Document {
        self.doc
    }

    fn story(&self) -> &[StyledChar] {
        &self.doc.frames[self.frame].story
    }

    fn paragraph_ranges(&self) -> Vec<ParagraphRange> {
        let story = self.story();
        let mut ranges = Vec::new();
        let mut para_start = self.start;
        for idx in self.start..self.end {
            if story[idx].ch == PARAGRAPH_BREAK {
                ranges.push(ParagraphRange {
                    start: para_start,
                    len: idx - para_start,
                    terminator: Some(idx),
                });
                para_start = idx + 1;
            }
        }
        if para_start < self.end {
            ranges.push(ParagraphRange {
                start: para_start,
                len: self.end - para_start,
                terminator: None,
            });
        }
        ranges
    }

    fn paragraph(&self, paragraph: usize) -> Result<ParagraphRange, HostError> {
        let ranges = self.paragraph_ranges();
        let len = ranges.len();
        ranges
            .get(paragraph)
            .copied()
            .ok_or(HostError::OutOfRange { index: paragraph, len })
    }

    fn char_index(&self, at: CharPos) -> Result<usize, HostError> {
        let range = self.paragraph(at.paragraph)?;
        if at.offset >= range.len {
            return Err(HostError::OutOfRange {
                index: at.offset,
                len: range.len,
            });
        }
        Ok(range.start + at.offset)
    }
}

impl InteractionControl for MemorySpan<'_> {
    fn interaction_level(&self) -> InteractionLevel {
        self.doc.interaction_level
    }

    fn set_interaction_level(&mut self, level: InteractionLevel) {
        self.doc.interaction_level = level;
    }
}

impl TextSpan for MemorySpan<'_> {
    fn owner(&self) -> &str {
        &self.doc.frames[self.frame].id
    }

    fn contents(&self) -> Result<String, HostError> {
        Ok(self.story()[self.start..self.end].iter().map(|c| c.ch).collect())
    }

    fn replace_contents(&mut self, text: &str) -> Result<(), HostError> {
        if self.doc.faults.reject_replace {
            return Err(HostError::Rejected("content replacement refused".to_string()));
        }
        let story = &mut self.doc.frames[self.frame].story;
        let template = story
            .get(self.start)
            .filter(|_| self.start < self.end)
            .or_else(|| self.start.checked_sub(1).and_then(|i| story.get(i)))
            .cloned()
            .unwrap_or_else(|| StyledChar::plain(' '));
        let replacement: Vec<StyledChar> = text
            .chars()
            .map(|ch| StyledChar {
                ch,
                style: template.style.clone(),
                direction: template.direction,
                justification: template.justification,
            })
            .collect();
        let count = replacement.len();
        story.splice(self.start..self.end, replacement);
        self.end = self.start + count;
        trace!("Replaced span content in frame '{}' ({} chars)", self.doc.frames[self.frame].id, count);
        Ok(())
    }

    fn paragraph_count(&self) -> Result<usize, HostError> {
        Ok(self.paragraph_ranges().len())
    }

    fn paragraph_text(&self, paragraph: usize) -> Result<String, HostError> {
        let range = self.paragraph(paragraph)?;
        Ok(self.story()[range.start..range.start + range.len]
            .iter()
            .map(|c| c.ch)
            .collect())
    }

    fn paragraph_len(&self, paragraph: usize) -> Result<usize, HostError> {
        Ok(self.paragraph(paragraph)?.len)
    }

    fn read_attribute(&self, at: CharPos, key: StyleKey) -> Result<Option<AttributeValue>, HostError> {
        if self.doc.faults.unreadable.contains(&key) {
            return Err(HostError::Unsupported(key));
        }
        let idx = self.char_index(at)?;
        match self.story()[idx].style.get(&key) {
            Some(value) => self.doc.resolve(key, value).map(Some),
            None => Ok(None),
        }
    }

    fn write_attribute(&mut self, at: CharPos, key: StyleKey, value: &AppliedValue) -> Result<(), HostError> {
        if self.doc.faults.unwritable.contains(&key) {
            return Err(HostError::Unsupported(key));
        }
        if !value.fits(key) {
            return Err(HostError::Rejected(format!("{:?} does not fit {}", value, key)));
        }
        if let (Some(kind), AppliedValue::Resource(handle)) = (key.resource_kind(), value) {
            if self.doc.table(kind).name_of(*handle).is_none() {
                return Err(HostError::StaleHandle(kind));
            }
        }
        let idx = self.char_index(at)?;
        self.doc.frames[self.frame].story[idx].style.insert(key, *value);
        Ok(())
    }

    fn lookup(&self, kind: ResourceKind, name: &str) -> Result<ResourceHandle, HostError> {
        if self.doc.faults.failing_lookups.contains(&kind) {
            return Err(HostError::Rejected(format!("{} lookup by name failed", kind)));
        }
        self.doc.table(kind).by_name(name).ok_or_else(|| HostError::Unresolved {
            kind,
            name: name.to_string(),
        })
    }

    fn list_resources(&self, kind: ResourceKind) -> Result<Vec<(String, ResourceHandle)>, HostError> {
        Ok(self
            .doc
            .table(kind)
            .entries()
            .iter()
            .map(|e| (e.name.clone(), ResourceHandle(e.id)))
            .collect())
    }

    fn paragraph_direction(&self, paragraph: usize) -> Result<ReadingDirection, HostError> {
        let range = self.paragraph(paragraph)?;
        let story = self.story();
        let bounds = range.paragraph_bounds(story);
        if bounds.is_empty() {
            return Err(HostError::InvalidObject(format!("paragraph {} has no characters", paragraph)));
        }
        Ok(story[bounds.start].direction)
    }

    fn set_paragraph_direction(
        &mut self,
        paragraph: usize,
        direction: ReadingDirection,
        mechanism: DirectionMechanism,
    ) -> Result<(), HostError> {
        if self.doc.faults.unsupported_mechanisms.contains(&mechanism) {
            return Err(HostError::Rejected(format!("{:?} is not available", mechanism)));
        }
        let range = self.paragraph(paragraph)?;
        let bounds = range.paragraph_bounds(self.story());
        let story = &mut self.doc.frames[self.frame].story;
        for idx in bounds {
            match mechanism {
                DirectionMechanism::ParagraphDirection | DirectionMechanism::LegacyDirection => {
                    story[idx].direction = direction;
                }
                DirectionMechanism::Alignment => {
                    story[idx].justification = match direction {
                        ReadingDirection::LeftToRight => Justification::Left,
                        ReadingDirection::RightToLeft => Justification::Right,
                    };
                }
            }
        }
        Ok(())
    }
}
