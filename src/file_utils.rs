use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};

// @module: File and directory utilities

/// Default output file name pattern, `{lang}` is replaced by the language code
pub const DEFAULT_OUTPUT_PATTERN: &str = "subtitles-{lang}.srt";

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
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        }
        Ok(())
    }

    // @generates: Output path for a translated subtitle file
    // @params: output_dir, pattern, language
    pub fn generate_output_path<P: AsRef<Path>>(output_dir: P, pattern: &str, language: &str) -> PathBuf {
        let file_name = pattern.replace("{lang}", &language.trim().to_lowercase());
        output_dir.as_ref().join(file_name)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        Self::write_bytes(path, content.as_bytes())
    }

    /// Write raw bytes to a file, creating the parent directory first
    pub fn write_bytes<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, bytes)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))
    }

    /// Detect whether a file is a subtitle file or a speech-to-text transcript
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> Result<FileType> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow::anyhow!("File does not exist: {:?}", path));
        }

        if let Some(ext) = path.extension() {
            match ext.to_string_lossy().to_lowercase().as_str() {
                "srt" => return Ok(FileType::Subtitle),
                "json" => return Ok(FileType::Transcript),
                _ => {}
            }
        }

        // Fall back to examining file contents
        let bytes = fs::read(path).with_context(|| format!("Failed to read file: {:?}", path))?;
        let content = String::from_utf8_lossy(&bytes);
        let head = content.trim_start_matches('\u{feff}').trim_start();
        if head.starts_with('{') {
            return Ok(FileType::Transcript);
        }
        if content.contains("-->") {
            return Ok(FileType::Subtitle);
        }

        Ok(FileType::Unknown)
    }
}

/// Enum representing the input file types the tool understands
#[derive(Debug, PartialEq, Eq)]
pub enum FileType {
    /// Subtitle file (SRT)
    Subtitle,
    /// Speech-to-text transcript (JSON)
    Transcript,
    /// Unknown file type
    Unknown,
}
