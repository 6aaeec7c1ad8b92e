use anyhow::{Context, Result, anyhow};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::document::Document;

// @module: Document, config and path helpers

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path).with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: Output path for a translated document, next to the input
    // @params: input_file, target_language
    pub fn generate_output_path<P: AsRef<Path>>(input_file: P, target_language: &str) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default().to_string_lossy();
        let extension = input_file
            .extension()
            .map(|ext| ext.to_string_lossy().to_string())
            .unwrap_or_else(|| "json".to_string());

        input_file.with_file_name(format!("{}.{}.{}", stem, target_language.to_lowercase(), extension))
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path).with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file, creating parent directories
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))
    }

    // @loads: Document from its JSON form
    pub fn load_document<P: AsRef<Path>>(path: P) -> Result<Document> {
        let path = path.as_ref();
        if !Self::file_exists(path) {
            return Err(anyhow!("Document does not exist: {:?}", path));
        }
        let json = Self::read_to_string(path)?;
        let document =
            Document::from_json(&json).with_context(|| format!("Failed to parse document: {:?}", path))?;
        debug!("Loaded '{}' with {} frame(s) from {:?}", document.name, document.frames.len(), path);
        Ok(document)
    }

    // @saves: Document as pretty JSON
    pub fn save_document<P: AsRef<Path>>(document: &Document, path: P) -> Result<()> {
        let json = document.to_json_pretty().context("Failed to serialize document")?;
        Self::write_to_file(&path, &json)?;
        debug!("Saved '{}' to {:?}", document.name, path.as_ref());
        Ok(())
    }

    // @loads: Config file, writing the defaults first when it does not exist
    pub fn load_or_create_config<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        if Self::file_exists(path) {
            let json = Self::read_to_string(path)?;
            return serde_json::from_str(&json).with_context(|| format!("Failed to parse config file: {:?}", path));
        }

        warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        let json = serde_json::to_string_pretty(&config).context("Failed to serialize default config to JSON")?;
        Self::write_to_file(path, &json)?;
        Ok(config)
    }
}
