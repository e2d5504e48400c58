use anyhow::{anyhow, Context, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::cue_store::CueStore;
use crate::encoding::OutputEncoding;
use crate::file_utils::{FileManager, FileType};
use crate::language_utils;
use crate::transcript::Transcript;
use crate::translation::{ProportionalAllocator, TranslationService};

// @module: Application controller for subtitle processing

/// What a translation run starts from
#[derive(Debug, Clone)]
pub enum SourceInput {
    /// An existing SubRip file
    Subtitles(CueStore),
    /// A speech-to-text transcript and the cues segmented from it
    Transcript {
        transcript: Transcript,
        cues: CueStore,
    },
}

impl SourceInput {
    /// The timed cues every translation is mapped onto
    pub fn cues(&self) -> &CueStore {
        match self {
            SourceInput::Subtitles(cues) => cues,
            SourceInput::Transcript { cues, .. } => cues,
        }
    }
}

/// Main application controller for subtitle translation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Output encodings per target language
    encodings: OutputEncoding,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let encodings = OutputEncoding::from_labels(
            &config.subtitles.output_encodings,
            &config.subtitles.default_encoding,
        );
        Ok(Self { config, encodings })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn encodings(&self) -> &OutputEncoding {
        &self.encodings
    }

    /// Read the input file as subtitles or as a transcript
    pub fn load_source(&self, input_file: &Path) -> Result<SourceInput> {
        match FileManager::detect_file_type(input_file)? {
            FileType::Subtitle => {
                info!("Detected subtitle file");
                Ok(SourceInput::Subtitles(CueStore::read_from_file_for(
                    input_file,
                    &self.config.source_language,
                    &self.encodings,
                )?))
            }
            FileType::Transcript => {
                info!("Detected transcript file, segmenting into cues");
                let transcript = Transcript::read_from_file(input_file)?;
                let cues = transcript
                    .to_cue_store(self.config.subtitles.tokens_per_cue)
                    .context("Failed to segment transcript")?;
                Ok(SourceInput::Transcript { transcript, cues })
            }
            FileType::Unknown => Err(anyhow!(
                "Unsupported input file (expected .srt or transcript .json): {}",
                input_file.display()
            )),
        }
    }

    /// Turn a transcript into a source-language subtitle file
    pub fn segment_transcript(&self, input_file: &Path, output_file: Option<PathBuf>) -> Result<PathBuf> {
        let transcript = Transcript::read_from_file(input_file)?;
        let cues = transcript
            .to_cue_store(self.config.subtitles.tokens_per_cue)
            .context("Failed to segment transcript")?;

        let output_path = output_file.unwrap_or_else(|| input_file.with_extension("srt"));
        cues.write_to_file(&output_path, &self.config.source_language, &self.encodings)?;

        info!("Segmented {} cues", cues.len());
        info!("Success: {}", output_path.display());
        Ok(output_path)
    }

    /// Map an existing translation onto a subtitle file without calling any provider
    pub fn remap_file(
        &self,
        source_file: &Path,
        translated_file: &Path,
        target_language: &str,
        output_file: Option<PathBuf>,
    ) -> Result<PathBuf> {
        let source = self.load_source(source_file)?;
        let bytes = std::fs::read(translated_file)
            .with_context(|| format!("Failed to read translated text: {}", translated_file.display()))?;
        let translated_text = self.encodings.decode(&bytes, target_language);

        let allocator = ProportionalAllocator::from_config(&self.config.allocation);
        let translated = allocator
            .remap(source.cues(), &translated_text, target_language)
            .with_context(|| format!("Failed to map translation onto {}", source_file.display()))?;

        let output_path = output_file.unwrap_or_else(|| {
            let dir = source_file.parent().unwrap_or_else(|| Path::new("."));
            FileManager::generate_output_path(dir, &self.config.subtitles.output_pattern, target_language)
        });
        translated.write_to_file(&output_path, target_language, &self.encodings)?;

        info!("Success: {}", output_path.display());
        Ok(output_path)
    }

    /// Translate into every configured target language using the configured provider
    pub async fn run(&self, input_file: PathBuf, output_dir: PathBuf, force_overwrite: bool) -> Result<Vec<PathBuf>> {
        let service = TranslationService::from_config(&self.config)?;
        self.run_with_service(&service, input_file, output_dir, force_overwrite).await
    }

    /// Translate into every configured target language with the given service
    ///
    /// A failure for one language is logged and the remaining languages still run;
    /// the call fails at the end if any language failed.
    pub async fn run_with_service(
        &self,
        service: &TranslationService,
        input_file: PathBuf,
        output_dir: PathBuf,
        force_overwrite: bool,
    ) -> Result<Vec<PathBuf>> {
        let start_time = Instant::now();

        if !input_file.exists() {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }
        FileManager::ensure_dir(&output_dir)?;

        let source = self.load_source(&input_file)?;
        info!(
            "Loaded {} cues ({} words) from {}",
            source.cues().len(),
            source.cues().total_word_count(),
            input_file.display()
        );

        let multi_progress = MultiProgress::new();
        let mut written = Vec::new();
        let mut failed = Vec::new();

        for target_language in &self.config.target_languages {
            let output_path =
                FileManager::generate_output_path(&output_dir, &self.config.subtitles.output_pattern, target_language);

            if output_path.exists() && !force_overwrite {
                warn!(
                    "Skipping '{}', {} already exists (use -f to force overwrite)",
                    target_language,
                    output_path.display()
                );
                continue;
            }

            match self
                .translate_language(service, &source, target_language, &output_path, &multi_progress)
                .await
            {
                Ok(elapsed) => {
                    info!(
                        "Translated to '{}' in {}.",
                        target_language,
                        Self::format_duration(elapsed)
                    );
                    info!("Success: {}", output_path.display());
                    written.push(output_path);
                }
                Err(e) => {
                    error!("Translation to '{}' failed: {:#}", target_language, e);
                    failed.push(target_language.clone());
                }
            }
        }

        info!("Finished in {}.", Self::format_duration(start_time.elapsed()));

        if failed.is_empty() {
            Ok(written)
        } else {
            Err(anyhow!("Translation failed for: {}", failed.join(", ")))
        }
    }

    async fn translate_language(
        &self,
        service: &TranslationService,
        source: &SourceInput,
        target_language: &str,
        output_path: &Path,
        multi_progress: &MultiProgress,
    ) -> Result<Duration> {
        let start_time = Instant::now();
        let source_language = &self.config.source_language;

        if language_utils::language_codes_match(source_language, target_language) {
            debug!("'{}' is the source language, writing cues unchanged", target_language);
            source.cues().write_to_file(output_path, target_language, &self.encodings)?;
            return Ok(start_time.elapsed());
        }

        let chunks = match source {
            SourceInput::Subtitles(cues) => service.chunks_for_store(cues),
            SourceInput::Transcript { transcript, cues } => service.chunks_for_transcript(transcript, cues),
        };

        let progress_bar = multi_progress.add(ProgressBar::new(chunks.len() as u64));
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar.set_message(format!("Translating to {}", target_language));

        let pb = progress_bar.clone();
        let translated = service
            .translate_chunks(&chunks, source_language, target_language, move |done, _total| {
                pb.set_position(done as u64);
            })
            .await;

        progress_bar.finish_and_clear();
        let translated = translated?;

        let cues = service.assemble(source.cues(), &translated, target_language)?;
        cues.write_to_file(output_path, target_language, &self.encodings)?;

        Ok(start_time.elapsed())
    }

    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
