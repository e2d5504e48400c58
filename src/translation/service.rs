/*!
 * Translation service.
 *
 * Sends source text to a [`Translator`] chunk by chunk, retrying transient
 * failures with exponential backoff, then maps the translated block back
 * onto the original cue timings.
 */

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};

use super::allocator::ProportionalAllocator;
use super::chunking::{chunk_by_cues, chunk_by_sentences, join_chunks};
use crate::app_config::{ChunkStrategy, ChunkingConfig, Config};
use crate::cue_store::CueStore;
use crate::errors::{ProviderError, TranslationError};
use crate::providers::{create_translator, Translator};
use crate::transcript::Transcript;

/// Translates subtitle text and aligns it with the source cues
#[derive(Debug, Clone)]
pub struct TranslationService {
    translator: Arc<dyn Translator>,
    chunking: ChunkingConfig,
    /// Extra attempts after the first failure
    retry_count: u32,
    /// Base delay, doubled on every retry
    retry_backoff_ms: u64,
    allocator: ProportionalAllocator,
}

impl TranslationService {
    pub fn new(
        translator: Arc<dyn Translator>,
        chunking: ChunkingConfig,
        retry_count: u32,
        retry_backoff_ms: u64,
        allocator: ProportionalAllocator,
    ) -> Self {
        Self {
            translator,
            chunking,
            retry_count,
            retry_backoff_ms,
            allocator,
        }
    }

    /// Build the service and its provider from the application configuration
    pub fn from_config(config: &Config) -> Result<Self, TranslationError> {
        let translator = create_translator(&config.translation)?;
        Ok(Self::with_translator(translator, config))
    }

    /// Build the service around an existing translator, taking everything else from `config`
    pub fn with_translator(translator: Arc<dyn Translator>, config: &Config) -> Self {
        Self::new(
            translator,
            config.chunking.clone(),
            config.translation.common.retry_count,
            config.translation.common.retry_backoff_ms,
            ProportionalAllocator::from_config(&config.allocation),
        )
    }

    pub fn translator_name(&self) -> &str {
        self.translator.name()
    }

    pub fn allocator(&self) -> &ProportionalAllocator {
        &self.allocator
    }

    /// Translate one chunk, retrying transient provider errors
    pub async fn translate_chunk(
        &self,
        chunk: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        if chunk.trim().is_empty() {
            return Ok(String::new());
        }

        let max_attempts = self.retry_count.saturating_add(1);
        let mut attempt: u32 = 0;
        let mut last_error: Option<ProviderError> = None;

        while attempt < max_attempts {
            match self.translator.translate(chunk, source_language, target_language).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_transient() => {
                    warn!(
                        "{} request failed: {} - attempt {}/{}",
                        self.translator.name(),
                        e,
                        attempt + 1,
                        max_attempts
                    );
                    last_error = Some(e);
                }
                Err(e) => return Err(TranslationError::Provider(e)),
            }

            attempt += 1;

            if attempt < max_attempts {
                let backoff_ms = self.retry_backoff_ms.saturating_mul(1u64 << (attempt - 1).min(16));
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
        }

        Err(TranslationError::RetriesExhausted {
            attempts: max_attempts,
            last: last_error.unwrap_or_else(|| ProviderError::RequestFailed("no attempt was made".to_string())),
        })
    }

    /// Translate chunks in order, reporting `(done, total)` after each one
    pub async fn translate_chunks<F>(
        &self,
        chunks: &[String],
        source_language: &str,
        target_language: &str,
        mut on_progress: F,
    ) -> Result<Vec<String>, TranslationError>
    where
        F: FnMut(usize, usize),
    {
        let total = chunks.len();
        let mut translated = Vec::with_capacity(total);

        for (i, chunk) in chunks.iter().enumerate() {
            translated.push(self.translate_chunk(chunk, source_language, target_language).await?);
            on_progress(i + 1, total);
        }

        Ok(translated)
    }

    /// Chunks to send for a subtitle file
    pub fn chunks_for_store(&self, store: &CueStore) -> Vec<String> {
        match self.chunking.strategy {
            ChunkStrategy::Sentences => self.sentence_chunks(&store.full_text()),
            ChunkStrategy::Auto | ChunkStrategy::Cues => {
                chunk_by_cues(store, self.chunking.cues_per_chunk, self.chunking.max_chunk_bytes)
            }
        }
    }

    /// Chunks to send for a transcript and the cues segmented from it
    pub fn chunks_for_transcript(&self, transcript: &Transcript, store: &CueStore) -> Vec<String> {
        match self.chunking.strategy {
            ChunkStrategy::Cues => chunk_by_cues(store, self.chunking.cues_per_chunk, self.chunking.max_chunk_bytes),
            ChunkStrategy::Auto | ChunkStrategy::Sentences => self.sentence_chunks(&transcript.text),
        }
    }

    fn sentence_chunks(&self, text: &str) -> Vec<String> {
        chunk_by_sentences(text, self.chunking.sentences_per_chunk, self.chunking.max_chunk_bytes)
    }

    /// Translate free text by sentence batches
    pub async fn translate_text(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        let chunks = self.sentence_chunks(text);
        let translated = self.translate_chunks(&chunks, source_language, target_language, |_, _| {}).await?;
        Ok(join_chunks(&translated))
    }

    /// Translate a subtitle file into a new one with the same timings
    pub async fn translate_cue_store(
        &self,
        store: &CueStore,
        source_language: &str,
        target_language: &str,
    ) -> Result<CueStore, TranslationError> {
        let chunks = self.chunks_for_store(store);
        let translated = self.translate_chunks(&chunks, source_language, target_language, |_, _| {}).await?;
        self.assemble(store, &translated, target_language)
    }

    /// Translate a transcript and lay the result over the cues segmented from it
    pub async fn translate_transcript(
        &self,
        transcript: &Transcript,
        store: &CueStore,
        source_language: &str,
        target_language: &str,
    ) -> Result<CueStore, TranslationError> {
        let chunks = self.chunks_for_transcript(transcript, store);
        let translated = self.translate_chunks(&chunks, source_language, target_language, |_, _| {}).await?;
        self.assemble(store, &translated, target_language)
    }

    /// Join translated chunks and map them onto `store`
    pub fn assemble<S: AsRef<str>>(
        &self,
        store: &CueStore,
        translated_chunks: &[S],
        target_language: &str,
    ) -> Result<CueStore, TranslationError> {
        let text = join_chunks(translated_chunks);
        debug!(
            "Assembled {} chunks into {} bytes of '{}' text",
            translated_chunks.len(),
            text.len(),
            target_language
        );
        self.remap(store, &text, target_language)
    }

    /// Map an already translated text onto `store` without calling the provider
    pub fn remap(
        &self,
        store: &CueStore,
        translated_text: &str,
        target_language: &str,
    ) -> Result<CueStore, TranslationError> {
        let translated = self.allocator.remap(store, translated_text, target_language)?;
        info!(
            "Mapped '{}' translation onto {} cues",
            target_language,
            translated.len()
        );
        Ok(translated)
    }
}
