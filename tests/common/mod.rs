/*!
 * Common test utilities for the typeshift test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use typeshift::document::{AttributeValue, ColorRef, Document, StyleAttributeSet, StyleKey};


/// Routes log output through the test harness; `RUST_LOG` picks the level
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Font, size and fill color
pub fn styled(font: &str, size: f64, fill: &str) -> StyleAttributeSet {
    StyleAttributeSet::new()
        .with(StyleKey::Font, AttributeValue::Font(font.to_string()))
        .with(StyleKey::PointSize, AttributeValue::Number(size))
        .with(StyleKey::FillColor, AttributeValue::Color(ColorRef::named(fill)))
}

/// Every kind of attribute, for isolation and idempotence checks
pub fn fully_styled() -> StyleAttributeSet {
    styled("Minion Pro", 11.0, "Ink")
        .with(StyleKey::StrokeColor, AttributeValue::Color(ColorRef::named("Paper")))
        .with(StyleKey::Tracking, AttributeValue::Number(25.0))
        .with(StyleKey::HorizontalScale, AttributeValue::Number(90.0))
        .with(StyleKey::BaselineShift, AttributeValue::Number(-1.5))
        .with(StyleKey::Underline, AttributeValue::Flag(true))
        .with(StyleKey::SmallCaps, AttributeValue::Flag(true))
        .with(StyleKey::ParagraphStyleName, AttributeValue::StyleName("Body".to_string()))
        .with(StyleKey::CharacterStyleName, AttributeValue::StyleName("Emphasis".to_string()))
}

/// Document with one frame holding the given paragraphs, each with its own style
pub fn document_with(paragraphs: &[(&str, StyleAttributeSet)]) -> Document {
    let mut document = Document::new("test");
    let frame = document.add_frame("frame-0");
    let last = paragraphs.len().saturating_sub(1);
    for (index, (text, style)) in paragraphs.iter().enumerate() {
        let text = if index < last { format!("{}\r", text) } else { text.to_string() };
        document
            .append_text(frame, &text, style)
            .expect("frame exists");
    }
    document
}

/// Single-paragraph document "hello" in Arial 12 red
pub fn hello_document() -> Document {
    document_with(&[("hello", styled("Arial", 12.0, "Red"))])
}
