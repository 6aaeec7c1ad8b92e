/*!
 * Style attribute value types.
 *
 * A `StyleAttributeSet` is a partially populated map from the fixed set of
 * `StyleKey`s to captured values. A missing key means "leave this attribute
 * alone", never "reset it".
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Every visual attribute the pipeline captures and restores
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleKey {
    FillColor,
    StrokeColor,
    Font,
    PointSize,
    Leading,
    Tracking,
    HorizontalScale,
    VerticalScale,
    BaselineShift,
    Skew,
    Underline,
    Strikethrough,
    AllCaps,
    SmallCaps,
    Superscript,
    Subscript,
    ParagraphStyleName,
    CharacterStyleName,
}

/// Shape of the value a key carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Color,
    Font,
    Number,
    Leading,
    Flag,
    StyleName,
}

impl StyleKey {
    /// All keys in declaration order
    pub const ALL: [StyleKey; 18] = [
        StyleKey::FillColor,
        StyleKey::StrokeColor,
        StyleKey::Font,
        StyleKey::PointSize,
        StyleKey::Leading,
        StyleKey::Tracking,
        StyleKey::HorizontalScale,
        StyleKey::VerticalScale,
        StyleKey::BaselineShift,
        StyleKey::Skew,
        StyleKey::Underline,
        StyleKey::Strikethrough,
        StyleKey::AllCaps,
        StyleKey::SmallCaps,
        StyleKey::Superscript,
        StyleKey::Subscript,
        StyleKey::ParagraphStyleName,
        StyleKey::CharacterStyleName,
    ];

    /// Write order for a reapplication pass.
    ///
    /// The host lets earlier writes shadow later ones, so font and size go
    /// first and colors go last.
    pub const APPLY_ORDER: [StyleKey; 18] = [
        StyleKey::Font,
        StyleKey::PointSize,
        StyleKey::Leading,
        StyleKey::Tracking,
        StyleKey::HorizontalScale,
        StyleKey::VerticalScale,
        StyleKey::BaselineShift,
        StyleKey::Skew,
        StyleKey::Underline,
        StyleKey::Strikethrough,
        StyleKey::AllCaps,
        StyleKey::SmallCaps,
        StyleKey::Superscript,
        StyleKey::Subscript,
        StyleKey::ParagraphStyleName,
        StyleKey::CharacterStyleName,
        StyleKey::FillColor,
        StyleKey::StrokeColor,
    ];

    /// Attributes the host is most likely to reset after a content change
    pub const CORRECTIVE: [StyleKey; 3] = [StyleKey::Font, StyleKey::PointSize, StyleKey::FillColor];

    /// Name of the key as the host spells it
    pub fn name(self) -> &'static str {
        match self {
            Self::FillColor => "fillColor",
            Self::StrokeColor => "strokeColor",
            Self::Font => "font",
            Self::PointSize => "pointSize",
            Self::Leading => "leading",
            Self::Tracking => "tracking",
            Self::HorizontalScale => "horizontalScale",
            Self::VerticalScale => "verticalScale",
            Self::BaselineShift => "baselineShift",
            Self::Skew => "skew",
            Self::Underline => "underline",
            Self::Strikethrough => "strikethrough",
            Self::AllCaps => "allCaps",
            Self::SmallCaps => "smallCaps",
            Self::Superscript => "superscript",
            Self::Subscript => "subscript",
            Self::ParagraphStyleName => "paragraphStyleName",
            Self::CharacterStyleName => "characterStyleName",
        }
    }

    /// The value shape this key accepts
    pub fn kind(self) -> ValueKind {
        match self {
            Self::FillColor | Self::StrokeColor => ValueKind::Color,
            Self::Font => ValueKind::Font,
            Self::PointSize
            | Self::Tracking
            | Self::HorizontalScale
            | Self::VerticalScale
            | Self::BaselineShift
            | Self::Skew => ValueKind::Number,
            Self::Leading => ValueKind::Leading,
            Self::Underline
            | Self::Strikethrough
            | Self::AllCaps
            | Self::SmallCaps
            | Self::Superscript
            | Self::Subscript => ValueKind::Flag,
            Self::ParagraphStyleName | Self::CharacterStyleName => ValueKind::StyleName,
        }
    }

    /// Resource table backing this key, for keys whose values are named resources
    pub fn resource_kind(self) -> Option<ResourceKind> {
        match self {
            Self::FillColor | Self::StrokeColor => Some(ResourceKind::Swatch),
            Self::Font => Some(ResourceKind::Font),
            Self::ParagraphStyleName => Some(ResourceKind::ParagraphStyle),
            Self::CharacterStyleName => Some(ResourceKind::CharacterStyle),
            _ => None,
        }
    }
}

impl fmt::Display for StyleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Named resource tables a document exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceKind {
    Font,
    Swatch,
    ParagraphStyle,
    CharacterStyle,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Font => "font",
            Self::Swatch => "swatch",
            Self::ParagraphStyle => "paragraph style",
            Self::CharacterStyle => "character style",
        };
        f.write_str(name)
    }
}

/// Opaque reference to a live resource in the host document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceHandle(pub u64);

/// A captured color: the swatch name plus, when the host handed one out, a direct handle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorRef {
    /// Swatch name, used when the handle is missing or rejected
    pub name: String,

    /// Direct handle, skips the name lookup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<ResourceHandle>,
}

impl ColorRef {
    /// Color known only by name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handle: None,
        }
    }
}

/// Line spacing: either derived from the point size or fixed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Leading {
    Auto,
    Points(f64),
}

/// A captured attribute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttributeValue {
    Color(ColorRef),
    Font(String),
    Number(f64),
    Leading(Leading),
    Flag(bool),
    StyleName(String),
}

impl AttributeValue {
    /// Shape of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Color(_) => ValueKind::Color,
            Self::Font(_) => ValueKind::Font,
            Self::Number(_) => ValueKind::Number,
            Self::Leading(_) => ValueKind::Leading,
            Self::Flag(_) => ValueKind::Flag,
            Self::StyleName(_) => ValueKind::StyleName,
        }
    }

    /// Name of the resource this value refers to, if it is a named resource
    pub fn resource_name(&self) -> Option<&str> {
        match self {
            Self::Color(color) => Some(&color.name),
            Self::Font(name) | Self::StyleName(name) => Some(name),
            _ => None,
        }
    }
}

/// A value ready to be written to the host, with names already resolved to handles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AppliedValue {
    Resource(ResourceHandle),
    Number(f64),
    Leading(Leading),
    Flag(bool),
}

impl AppliedValue {
    /// Convert a captured value that needs no lookup
    pub fn direct(value: &AttributeValue) -> Option<Self> {
        match value {
            AttributeValue::Number(n) => Some(Self::Number(*n)),
            AttributeValue::Leading(l) => Some(Self::Leading(*l)),
            AttributeValue::Flag(b) => Some(Self::Flag(*b)),
            _ => None,
        }
    }

    /// Whether this value can be stored under `key`
    pub fn fits(&self, key: StyleKey) -> bool {
        matches!(
            (self, key.kind()),
            (Self::Resource(_), ValueKind::Color | ValueKind::Font | ValueKind::StyleName)
                | (Self::Number(_), ValueKind::Number)
                | (Self::Leading(_), ValueKind::Leading)
                | (Self::Flag(_), ValueKind::Flag)
        )
    }
}

/// Full visual style of one character or paragraph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleAttributeSet {
    values: BTreeMap<StyleKey, AttributeValue>,
}

impl StyleAttributeSet {
    /// Create an empty set; every attribute absent
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: StyleKey, value: AttributeValue) -> Self {
        self.insert(key, value);
        self
    }

    /// Store a value, returning false if the value shape does not match the key
    pub fn insert(&mut self, key: StyleKey, value: AttributeValue) -> bool {
        if value.kind() != key.kind() {
            return false;
        }
        self.values.insert(key, value);
        true
    }

    pub fn get(&self, key: StyleKey) -> Option<&AttributeValue> {
        self.values.get(&key)
    }

    pub fn remove(&mut self, key: StyleKey) -> Option<AttributeValue> {
        self.values.remove(&key)
    }

    pub fn contains(&self, key: StyleKey) -> bool {
        self.values.contains_key(&key)
    }

    /// Number of captured attributes
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing was captured
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Captured attributes in key order
    pub fn iter(&self) -> impl Iterator<Item = (StyleKey, &AttributeValue)> {
        self.values.iter().map(|(key, value)| (*key, value))
    }

    pub fn font(&self) -> Option<&str> {
        match self.get(StyleKey::Font) {
            Some(AttributeValue::Font(name)) => Some(name),
            _ => None,
        }
    }

    pub fn point_size(&self) -> Option<f64> {
        match self.get(StyleKey::PointSize) {
            Some(AttributeValue::Number(size)) => Some(*size),
            _ => None,
        }
    }

    pub fn fill_color(&self) -> Option<&ColorRef> {
        match self.get(StyleKey::FillColor) {
            Some(AttributeValue::Color(color)) => Some(color),
            _ => None,
        }
    }

    pub fn stroke_color(&self) -> Option<&ColorRef> {
        match self.get(StyleKey::StrokeColor) {
            Some(AttributeValue::Color(color)) => Some(color),
            _ => None,
        }
    }

    /// Copy with every color handle dropped, for comparing sets captured at different times
    pub fn without_handles(&self) -> Self {
        let values = self
            .values
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    AttributeValue::Color(color) => AttributeValue::Color(ColorRef::named(color.name.clone())),
                    other => other.clone(),
                };
                (*key, value)
            })
            .collect();
        Self { values }
    }
}

impl FromIterator<(StyleKey, AttributeValue)> for StyleAttributeSet {
    fn from_iter<I: IntoIterator<Item = (StyleKey, AttributeValue)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (key, value) in iter {
            set.insert(key, value);
        }
        set
    }
}
