/*!
 * Host document interfaces.
 *
 * The pipeline never touches a concrete document type. It talks to a
 * `TextSpan`, which exposes paragraph enumeration, per-character attribute
 * access, whole-span content replacement and named resource lookup. Every
 * call is individually fallible.
 */

use log::debug;
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

use crate::errors::HostError;
use super::style::{AppliedValue, AttributeValue, ResourceHandle, ResourceKind, StyleKey};

/// Paragraph terminator used by the host
pub const PARAGRAPH_BREAK: char = '\r';

/// Address of one character inside a span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CharPos {
    /// Paragraph index within the span
    pub paragraph: usize,
    /// Character offset within the paragraph, terminator excluded
    pub offset: usize,
}

impl CharPos {
    pub fn new(paragraph: usize, offset: usize) -> Self {
        Self { paragraph, offset }
    }
}

/// Reading direction of a paragraph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReadingDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

/// Horizontal alignment of a paragraph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Justification {
    #[default]
    Left,
    Right,
    Center,
}

/// Ways a host may accept a direction change, tried in this order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DirectionMechanism {
    /// Dedicated paragraph direction property
    ParagraphDirection,
    /// Older direction property some host versions expose instead
    LegacyDirection,
    /// Align the paragraph to the reading edge when direction cannot be set
    Alignment,
}

impl DirectionMechanism {
    pub const FALLBACK_CHAIN: [DirectionMechanism; 3] = [
        DirectionMechanism::ParagraphDirection,
        DirectionMechanism::LegacyDirection,
        DirectionMechanism::Alignment,
    ];
}

/// Whether the host may interrupt with dialogs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InteractionLevel {
    #[default]
    InteractWithAll,
    NeverInteract,
}

/// Host-wide interaction mode switch
pub trait InteractionControl {
    fn interaction_level(&self) -> InteractionLevel;

    fn set_interaction_level(&mut self, level: InteractionLevel);
}

/// A contiguous run of paragraphs inside one owning frame
pub trait TextSpan: InteractionControl {
    /// Identifier of the owning frame
    fn owner(&self) -> &str;

    /// Full span text, paragraph breaks included
    fn contents(&self) -> Result<String, HostError>;

    /// Replace the whole span text in one write
    fn replace_contents(&mut self, text: &str) -> Result<(), HostError>;

    fn paragraph_count(&self) -> Result<usize, HostError>;

    /// Paragraph text without its terminator
    fn paragraph_text(&self, paragraph: usize) -> Result<String, HostError>;

    /// Number of characters in a paragraph, terminator excluded
    fn paragraph_len(&self, paragraph: usize) -> Result<usize, HostError>;

    /// Read one attribute; `Ok(None)` means the character has no value for it
    fn read_attribute(&self, at: CharPos, key: StyleKey) -> Result<Option<AttributeValue>, HostError>;

    fn write_attribute(&mut self, at: CharPos, key: StyleKey, value: &AppliedValue) -> Result<(), HostError>;

    /// Resolve a named resource
    fn lookup(&self, kind: ResourceKind, name: &str) -> Result<ResourceHandle, HostError>;

    /// Enumerate a resource table
    fn list_resources(&self, kind: ResourceKind) -> Result<Vec<(String, ResourceHandle)>, HostError>;

    fn paragraph_direction(&self, paragraph: usize) -> Result<ReadingDirection, HostError>;

    /// Apply a reading direction through one specific mechanism
    fn set_paragraph_direction(
        &mut self,
        paragraph: usize,
        direction: ReadingDirection,
        mechanism: DirectionMechanism,
    ) -> Result<(), HostError>;
}

/// Suppresses host interaction for as long as it lives.
///
/// The previous level is restored on drop, so early returns and unwinding
/// release the host as well.
pub struct InteractionGuard<'a, H: InteractionControl + ?Sized> {
    host: &'a mut H,
    previous: InteractionLevel,
}

impl<'a, H: InteractionControl + ?Sized> InteractionGuard<'a, H> {
    /// Switch the host to `NeverInteract` until the guard is dropped
    pub fn engage(host: &'a mut H) -> Self {
        let previous = host.interaction_level();
        host.set_interaction_level(InteractionLevel::NeverInteract);
        debug!("Host interaction suppressed (was {:?})", previous);
        Self { host, previous }
    }
}

impl<H: InteractionControl + ?Sized> Deref for InteractionGuard<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        self.host
    }
}

impl<H: InteractionControl + ?Sized> DerefMut for InteractionGuard<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        self.host
    }
}

impl<H: InteractionControl + ?Sized> Drop for InteractionGuard<'_, H> {
    fn drop(&mut self) {
        self.host.set_interaction_level(self.previous);
        debug!("Host interaction restored to {:?}", self.previous);
    }
}
