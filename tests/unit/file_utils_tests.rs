/*!
 * Tests for document and configuration file handling
 */

use typeshift::app_config::TranslationProvider;
use typeshift::document::Document;
use typeshift::file_utils::FileManager;

use crate::common::{create_temp_dir, create_test_file, hello_document};

#[test]
fn test_saveAndLoadDocument_shouldPreserveTextAndStyles() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("nested/out/hello.json");
    let document = hello_document();

    FileManager::save_document(&document, &path).unwrap();
    let loaded = FileManager::load_document(&path).unwrap();

    assert_eq!(loaded.frame_text(0).as_deref(), Some("hello"));
    assert_eq!(
        loaded.style_at(0, 0).map(|s| s.without_handles()),
        document.style_at(0, 0).map(|s| s.without_handles())
    );
}

#[test]
fn test_loadDocument_withMissingFile_shouldFail() {
    let dir = create_temp_dir().unwrap();
    assert!(FileManager::load_document(dir.path().join("missing.json")).is_err());
}

#[test]
fn test_loadDocument_withInvalidJson_shouldFail() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(dir.path(), "broken.json", "{ not json").unwrap();
    let error = FileManager::load_document(&path).unwrap_err();
    assert!(format!("{:#}", error).contains("Failed to parse document"));
}

#[test]
fn test_loadDocument_withMinimalJson_shouldDefaultMissingFields() {
    let dir = create_temp_dir().unwrap();
    let json = r#"{ "frames": [ { "id": "f", "story": [ { "ch": "h" }, { "ch": "i" } ] } ] }"#;
    let path = create_test_file(dir.path(), "minimal.json", json).unwrap();

    let document: Document = FileManager::load_document(&path).unwrap();
    assert_eq!(document.frame_text(0).as_deref(), Some("hi"));
}

#[test]
fn test_loadOrCreateConfig_withMissingFile_shouldWriteDefaults() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let config = FileManager::load_or_create_config(&path).unwrap();

    assert!(FileManager::file_exists(&path));
    assert_eq!(config.translation.provider, TranslationProvider::Gemini);
    let reloaded = FileManager::load_or_create_config(&path).unwrap();
    assert_eq!(reloaded.target_language, config.target_language);
    assert_eq!(reloaded.formatting, config.formatting);
}

#[test]
fn test_loadOrCreateConfig_withExistingFile_shouldReadIt() {
    let dir = create_temp_dir().unwrap();
    let json = r#"{
        "source_language": "he",
        "target_language": "fr",
        "translation": { "provider": "ollama", "available_providers": [] }
    }"#;
    let path = create_test_file(dir.path(), "conf.json", json).unwrap();

    let config = FileManager::load_or_create_config(&path).unwrap();
    assert_eq!(config.source_language, "he");
    assert_eq!(config.translation.provider, TranslationProvider::Ollama);
}

#[test]
fn test_generateOutputPath_shouldStayInInputDirectory() {
    let dir = create_temp_dir().unwrap();
    let input = dir.path().join("brochure.json");
    let output = FileManager::generate_output_path(&input, "en");
    assert_eq!(output.parent(), Some(dir.path()));
    assert_eq!(output.file_name().and_then(|n| n.to_str()), Some("brochure.en.json"));
}
