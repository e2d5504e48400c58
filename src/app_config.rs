use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    pub source_language: String,

    /// Target language codes (ISO), one output file each
    #[serde(default = "default_target_languages")]
    pub target_languages: Vec<String>,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// How source text is split for the translation provider
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Subtitle input/output settings
    #[serde(default)]
    pub subtitles: SubtitleConfig,

    /// Word allocation settings
    #[serde(default)]
    pub allocation: AllocationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Ollama
    #[default]
    Ollama,
    // @provider: Anthropic
    Anthropic,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Ollama => "Ollama",
            Self::Anthropic => "Anthropic",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Ollama => "ollama".to_string(),
            Self::Anthropic => "anthropic".to_string(),
        }
    }
}

// Implement Display trait for TranslationProvider
impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationProvider
impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "anthropic" => Ok(Self::Anthropic),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Max tokens per response (Anthropic)
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl ProviderConfig {
    /// Create a provider config populated with that provider's defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        let (model, endpoint) = match provider_type {
            TranslationProvider::Ollama => (default_ollama_model(), default_ollama_endpoint()),
            TranslationProvider::Anthropic => (default_anthropic_model(), default_anthropic_endpoint()),
        };

        Self {
            provider_type: provider_type.to_lowercase_string(),
            model,
            api_key: String::new(),
            endpoint,
            timeout_secs: default_timeout_secs(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default = "default_available_providers")]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// System prompt template for translation
    /// Placeholders: {source_language}, {target_language}
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Temperature parameter for text generation (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            temperature: default_temperature(),
        }
    }
}

/// How text is grouped into translation requests
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChunkStrategy {
    /// Sentences for transcripts, cues for subtitle files
    #[default]
    Auto,
    /// Batches of sentences split on '.'
    Sentences,
    /// Batches of cue bodies
    Cues,
}

/// Chunking limits for the translation provider
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChunkingConfig {
    #[serde(default)]
    pub strategy: ChunkStrategy,

    /// Sentences per request
    #[serde(default = "default_sentences_per_chunk")]
    pub sentences_per_chunk: usize,

    /// Cues per request
    #[serde(default = "default_cues_per_chunk")]
    pub cues_per_chunk: usize,

    /// Hard ceiling on request payload size in bytes
    #[serde(default = "default_max_chunk_bytes")]
    pub max_chunk_bytes: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            strategy: ChunkStrategy::default(),
            sentences_per_chunk: default_sentences_per_chunk(),
            cues_per_chunk: default_cues_per_chunk(),
            max_chunk_bytes: default_max_chunk_bytes(),
        }
    }
}

/// Configuration for subtitle input and output
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SubtitleConfig {
    /// Transcript items per cue when segmenting a transcript
    #[serde(default = "default_tokens_per_cue")]
    pub tokens_per_cue: usize,

    /// Output file name pattern, `{lang}` is replaced by the target language
    #[serde(default = "default_output_pattern")]
    pub output_pattern: String,

    /// Encoding used for languages without an explicit entry
    #[serde(default = "default_encoding")]
    pub default_encoding: String,

    /// Per-language output encoding labels
    #[serde(default = "default_output_encodings")]
    pub output_encodings: HashMap<String, String>,
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            tokens_per_cue: default_tokens_per_cue(),
            output_pattern: default_output_pattern(),
            default_encoding: default_encoding(),
            output_encodings: default_output_encodings(),
        }
    }
}

/// Rounding rule for turning a fractional word count into a whole one
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoundingPolicyConfig {
    /// Always round down
    Floor,
    /// Round up on every `every`-th cue (index 0 included), down otherwise
    PeriodicCeil { every: usize },
    /// Round down, then add `bonus` on cues whose index is divisible by any modulus
    PeriodicBonus { moduli: Vec<usize>, bonus: i64 },
}

/// How translated words are spread over the original cues
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AllocationStrategy {
    /// By each cue's share of the original words, rounded per language
    #[default]
    Proportional,
    /// The same count for every cue, leftover words spread at a fixed stride
    Uniform,
}

/// Configuration for word allocation
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AllocationConfig {
    /// Allocation strategy
    #[serde(default)]
    pub strategy: AllocationStrategy,

    /// Rounding policy per target language; unlisted languages use floor
    #[serde(default = "default_rounding_policies")]
    pub rounding_policies: HashMap<String, RoundingPolicyConfig>,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            strategy: AllocationStrategy::default(),
            rounding_policies: default_rounding_policies(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_target_languages() -> Vec<String> {
    vec!["es".to_string()]
}

fn default_available_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig::new(TranslationProvider::Ollama),
        ProviderConfig::new(TranslationProvider::Anthropic),
    ]
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_retry_count() -> u32 {
    3 // Default to 3 retries
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_temperature() -> f32 {
    0.3
}

fn default_sentences_per_chunk() -> usize {
    10
}

fn default_cues_per_chunk() -> usize {
    50
}

fn default_max_chunk_bytes() -> usize {
    5000
}

fn default_tokens_per_cue() -> usize {
    crate::transcript::DEFAULT_TOKENS_PER_CUE
}

fn default_output_pattern() -> String {
    crate::file_utils::DEFAULT_OUTPUT_PATTERN.to_string()
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

fn default_output_encodings() -> HashMap<String, String> {
    HashMap::from([
        ("es".to_string(), "windows-1252".to_string()),
        ("ru".to_string(), "windows-1251".to_string()),
    ])
}

fn default_rounding_policies() -> HashMap<String, RoundingPolicyConfig> {
    HashMap::from([
        ("es".to_string(), RoundingPolicyConfig::PeriodicCeil { every: 5 }),
        (
            "ru".to_string(),
            RoundingPolicyConfig::PeriodicBonus {
                moduli: vec![2, 3, 5],
                bonus: 1,
            },
        ),
    ])
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_anthropic_endpoint() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:3b".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-haiku-20240307".to_string()
}

fn default_system_prompt() -> String {
    "You are a professional translator. Translate the following text from {source_language} to {target_language}. Maintain the original meaning and tone. Reply with the translated text only.".to_string()
}

impl Config {
    /// Load the configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load the configuration, writing a default one first if the file is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        crate::file_utils::FileManager::write_to_file(&path, &config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.as_ref().display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        self.validate_offline()?;

        if self.translation.provider == TranslationProvider::Anthropic
            && self.translation.get_api_key().is_empty()
        {
            return Err(anyhow!("Translation API key is required for Anthropic provider"));
        }

        let endpoint = self.translation.get_endpoint();
        if !endpoint.is_empty() {
            url::Url::parse(&endpoint)
                .with_context(|| format!("Invalid provider endpoint '{}'", endpoint))?;
        }

        Ok(())
    }

    /// Validate everything except the provider settings, for commands that never call a provider
    pub fn validate_offline(&self) -> Result<()> {
        // Validate languages
        crate::language_utils::get_language_name(&self.source_language)
            .context("Invalid source language")?;

        if self.target_languages.is_empty() {
            return Err(anyhow!("At least one target language is required"));
        }
        for language in &self.target_languages {
            crate::language_utils::get_language_name(language)
                .with_context(|| format!("Invalid target language '{}'", language))?;
        }

        if self.chunking.sentences_per_chunk == 0 || self.chunking.cues_per_chunk == 0 {
            return Err(anyhow!("Chunk sizes must be greater than zero"));
        }
        if self.chunking.max_chunk_bytes == 0 {
            return Err(anyhow!("max_chunk_bytes must be greater than zero"));
        }
        if self.subtitles.tokens_per_cue == 0 {
            return Err(anyhow!("tokens_per_cue must be greater than zero"));
        }
        if !self.subtitles.output_pattern.contains("{lang}") && self.target_languages.len() > 1 {
            return Err(anyhow!(
                "output_pattern '{}' must contain {{lang}} when several target languages are configured",
                self.subtitles.output_pattern
            ));
        }

        for (language, policy) in &self.allocation.rounding_policies {
            match policy {
                RoundingPolicyConfig::PeriodicCeil { every: 0 } => {
                    return Err(anyhow!("Rounding policy for '{}' has every = 0", language));
                }
                RoundingPolicyConfig::PeriodicBonus { moduli, .. } if moduli.contains(&0) => {
                    return Err(anyhow!("Rounding policy for '{}' has a zero modulus", language));
                }
                _ => {}
            }
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: "en".to_string(),
            target_languages: default_target_languages(),
            translation: TranslationConfig::default(),
            chunking: ChunkingConfig::default(),
            subtitles: SubtitleConfig::default(),
            allocation: AllocationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Config block of the selected provider
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    pub fn get_provider_config(&self, provider_type: &TranslationProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers
            .iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Mutable config block of the selected provider, created with defaults if missing
    pub fn active_provider_config_mut(&mut self) -> &mut ProviderConfig {
        let provider_str = self.provider.to_lowercase_string();
        let position = match self
            .available_providers
            .iter()
            .position(|p| p.provider_type == provider_str)
        {
            Some(position) => position,
            None => {
                self.available_providers
                    .push(ProviderConfig::new(self.provider.clone()));
                self.available_providers.len() - 1
            }
        };
        &mut self.available_providers[position]
    }

    pub fn get_model(&self) -> String {
        match self.get_active_provider_config() {
            Some(config) if !config.model.is_empty() => config.model.clone(),
            _ => match self.provider {
                TranslationProvider::Ollama => default_ollama_model(),
                TranslationProvider::Anthropic => default_anthropic_model(),
            },
        }
    }

    pub fn get_api_key(&self) -> String {
        self.get_active_provider_config()
            .map(|c| c.api_key.clone())
            .unwrap_or_default()
    }

    pub fn get_endpoint(&self) -> String {
        match self.get_active_provider_config() {
            Some(config) if !config.endpoint.is_empty() => config.endpoint.clone(),
            _ => match self.provider {
                TranslationProvider::Ollama => default_ollama_endpoint(),
                TranslationProvider::Anthropic => default_anthropic_endpoint(),
            },
        }
    }

    pub fn get_timeout_secs(&self) -> u64 {
        self.get_active_provider_config()
            .map_or_else(default_timeout_secs, |c| c.timeout_secs)
    }

    pub fn get_max_tokens(&self) -> u32 {
        self.get_active_provider_config()
            .map_or_else(default_max_tokens, |c| c.max_tokens)
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            available_providers: default_available_providers(),
            common: TranslationCommonConfig::default(),
        }
    }
}
