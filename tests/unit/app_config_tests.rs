/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use srtalign::app_config::{
    AllocationStrategy, ChunkStrategy, Config, LogLevel, RoundingPolicyConfig, TranslationProvider,
};

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_shouldHaveReferenceValues() {
    let config = Config::default();

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_languages, vec!["es"]);
    assert_eq!(config.translation.provider, TranslationProvider::Ollama);
    assert_eq!(config.translation.get_endpoint(), "http://localhost:11434");
    assert_eq!(config.chunking.strategy, ChunkStrategy::Auto);
    assert_eq!(config.chunking.sentences_per_chunk, 10);
    assert_eq!(config.chunking.cues_per_chunk, 50);
    assert_eq!(config.chunking.max_chunk_bytes, 5000);
    assert_eq!(config.subtitles.tokens_per_cue, 10);
    assert_eq!(config.subtitles.output_pattern, "subtitles-{lang}.srt");
    assert_eq!(
        config.allocation.rounding_policies.get("es"),
        Some(&RoundingPolicyConfig::PeriodicCeil { every: 5 })
    );
    assert!(config.validate().is_ok());
}

/// Test minimal JSON with every section defaulted
#[test]
fn test_deserialize_withMinimalJson_shouldFillDefaults() -> Result<()> {
    let config: Config = serde_json::from_str(r#"{"source_language": "en", "target_languages": ["ru", "de"]}"#)?;

    assert_eq!(config.target_languages, vec!["ru", "de"]);
    assert_eq!(config.translation.common.retry_count, 3);
    assert_eq!(config.subtitles.output_encodings.get("ru").map(String::as_str), Some("windows-1251"));
    assert_eq!(config.log_level, LogLevel::Info);
    config.validate()?;
    Ok(())
}

#[test]
fn test_deserialize_withTaggedRoundingPolicies_shouldParse() -> Result<()> {
    let json = r#"{
        "source_language": "en",
        "allocation": {
            "rounding_policies": {
                "fr": { "type": "floor" },
                "it": { "type": "periodic_ceil", "every": 3 },
                "pl": { "type": "periodic_bonus", "moduli": [4], "bonus": 2 }
            }
        },
        "chunking": { "strategy": "sentences" }
    }"#;
    let config: Config = serde_json::from_str(json)?;

    let policies = &config.allocation.rounding_policies;
    assert_eq!(policies.len(), 3);
    assert_eq!(policies.get("fr"), Some(&RoundingPolicyConfig::Floor));
    assert_eq!(policies.get("it"), Some(&RoundingPolicyConfig::PeriodicCeil { every: 3 }));
    assert_eq!(
        policies.get("pl"),
        Some(&RoundingPolicyConfig::PeriodicBonus { moduli: vec![4], bonus: 2 })
    );
    assert_eq!(config.chunking.strategy, ChunkStrategy::Sentences);
    assert_eq!(config.allocation.strategy, AllocationStrategy::Proportional);
    Ok(())
}

#[test]
fn test_deserialize_withUniformStrategy_shouldKeepDefaultPolicies() -> Result<()> {
    let json = r#"{ "source_language": "en", "allocation": { "strategy": "uniform" } }"#;
    let config: Config = serde_json::from_str(json)?;

    assert_eq!(config.allocation.strategy, AllocationStrategy::Uniform);
    assert_eq!(config.allocation.rounding_policies.len(), 2);
    Ok(())
}

#[test]
fn test_validate_withInvalidLanguage_shouldFail() {
    let mut config = Config::default();
    config.target_languages = vec!["xx".to_string()];
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.source_language = "klingon".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withNoTargets_shouldFail() {
    let mut config = Config::default();
    config.target_languages.clear();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withAnthropicAndNoKey_shouldFail() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Anthropic;
    assert!(config.validate().is_err());

    config.translation.active_provider_config_mut().api_key = "test-key".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_offline_withAnthropicAndNoKey_shouldPass() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Anthropic;
    assert!(config.validate_offline().is_ok());

    config.source_language = "klingon".to_string();
    assert!(config.validate_offline().is_err());
}

#[test]
fn test_validate_withFixedPatternAndSeveralTargets_shouldFail() {
    let mut config = Config::default();
    config.target_languages = vec!["es".to_string(), "ru".to_string()];
    config.subtitles.output_pattern = "translated.srt".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withZeroModulus_shouldFail() {
    let mut config = Config::default();
    config.allocation.rounding_policies.insert(
        "de".to_string(),
        RoundingPolicyConfig::PeriodicBonus { moduli: vec![0], bonus: 1 },
    );
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withZeroChunkSize_shouldFail() {
    let mut config = Config::default();
    config.chunking.cues_per_chunk = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let created = Config::load_or_create(&path)?;
    assert!(path.exists());

    let loaded = Config::from_file(&path)?;
    assert_eq!(loaded.target_languages, created.target_languages);
    assert_eq!(loaded.allocation.rounding_policies, created.allocation.rounding_policies);
    Ok(())
}

#[test]
fn test_provider_fromStr_shouldParseNames() {
    assert_eq!("ollama".parse::<TranslationProvider>().unwrap(), TranslationProvider::Ollama);
    assert_eq!("Anthropic".parse::<TranslationProvider>().unwrap(), TranslationProvider::Anthropic);
    assert!("openai".parse::<TranslationProvider>().is_err());
}
