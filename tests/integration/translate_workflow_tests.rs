/*!
 * End-to-end translation runs through the controller with a mock translator
 */

use anyhow::Result;
use std::sync::Arc;

use srtalign::app_config::Config;
use srtalign::app_controller::Controller;
use srtalign::cue_store::CueStore;
use srtalign::encoding::OutputEncoding;
use srtalign::providers::mock::MockTranslator;
use srtalign::translation::TranslationService;

use crate::common::{self, SAMPLE_SRT};

fn config_for(targets: &[&str]) -> Config {
    let mut config = Config::default();
    config.target_languages = targets.iter().map(|t| t.to_string()).collect();
    config.translation.common.retry_backoff_ms = 0;
    config
}

fn service_for(mock: &MockTranslator, config: &Config) -> TranslationService {
    TranslationService::with_translator(Arc::new(mock.clone()), config)
}

#[tokio::test]
async fn test_run_withTwoTargets_shouldWriteOneFilePerLanguage() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let output_dir = temp_dir.path().join("out");

    let config = config_for(&["es", "ru"]);
    let mock = MockTranslator::working();
    let service = service_for(&mock, &config);
    let controller = Controller::with_config(config)?;

    let written = controller
        .run_with_service(&service, input, output_dir.clone(), false)
        .await?;

    assert_eq!(written, vec![output_dir.join("subtitles-es.srt"), output_dir.join("subtitles-ru.srt")]);
    assert_eq!(mock.request_count(), 2);

    let original = CueStore::parse(SAMPLE_SRT)?;
    for path in &written {
        let store = CueStore::read_from_file(path)?;
        assert_eq!(store.len(), original.len());
        assert_eq!(store.full_text(), original.full_text());
        assert_eq!(store.cues()[2].end, original.cues()[2].end);
    }
    Ok(())
}

#[tokio::test]
async fn test_run_withExistingOutput_shouldSkipUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let existing = common::create_test_file(temp_dir.path(), "subtitles-es.srt", "keep me")?;

    let config = config_for(&["es"]);
    let mock = MockTranslator::working();
    let service = service_for(&mock, &config);
    let controller = Controller::with_config(config)?;

    let written = controller
        .run_with_service(&service, input.clone(), temp_dir.path().to_path_buf(), false)
        .await?;
    assert!(written.is_empty());
    assert_eq!(std::fs::read_to_string(&existing)?, "keep me");
    assert_eq!(mock.request_count(), 0);

    let written = controller
        .run_with_service(&service, input, temp_dir.path().to_path_buf(), true)
        .await?;
    assert_eq!(written, vec![existing.clone()]);
    assert_eq!(CueStore::read_from_file(&existing)?.len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_run_withSourceLanguageTarget_shouldCopyWithoutTranslating() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;

    let config = config_for(&["eng"]);
    let mock = MockTranslator::working();
    let service = service_for(&mock, &config);
    let controller = Controller::with_config(config)?;

    let written = controller
        .run_with_service(&service, input, temp_dir.path().to_path_buf(), false)
        .await?;

    assert_eq!(mock.request_count(), 0);
    assert_eq!(std::fs::read_to_string(&written[0])?, SAMPLE_SRT.to_string() + "\n");
    Ok(())
}

#[tokio::test]
async fn test_run_withRejectingTranslator_shouldFailAndWriteNothing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;

    let config = config_for(&["es", "ru"]);
    let mock = MockTranslator::rejecting();
    let service = service_for(&mock, &config);
    let controller = Controller::with_config(config)?;

    let result = controller
        .run_with_service(&service, input, temp_dir.path().to_path_buf(), false)
        .await;

    let message = result.unwrap_err().to_string();
    assert!(message.contains("es"));
    assert!(message.contains("ru"));
    // Both languages were attempted
    assert_eq!(mock.request_count(), 2);
    assert!(!temp_dir.path().join("subtitles-es.srt").exists());
    assert!(!temp_dir.path().join("subtitles-ru.srt").exists());
    Ok(())
}

#[tokio::test]
async fn test_run_withTranscriptInput_shouldSegmentThenTranslate() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_transcript(temp_dir.path(), "talk.json")?;

    let mut config = config_for(&["fr"]);
    config.subtitles.tokens_per_cue = 3;
    let mock = MockTranslator::working().with_custom_response(|_| "Bonjour le monde. Comment allez-vous ?".to_string());
    let service = service_for(&mock, &config);
    let controller = Controller::with_config(config)?;

    let written = controller
        .run_with_service(&service, input, temp_dir.path().to_path_buf(), false)
        .await?;

    let store = CueStore::read_from_file(&written[0])?;
    assert_eq!(store.len(), 3);
    assert_eq!(store.cues()[0].start.as_millis(), 500);
    assert_eq!(store.full_text(), "Bonjour le monde. Comment allez-vous ?");
    assert_eq!(mock.requests()[0].text, "Hello world. How are you?");
    Ok(())
}

#[tokio::test]
async fn test_run_withMissingInput_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = config_for(&["es"]);
    let service = service_for(&MockTranslator::working(), &config);
    let controller = Controller::with_config(config)?;

    let result = controller
        .run_with_service(&service, temp_dir.path().join("nope.srt"), temp_dir.path().to_path_buf(), false)
        .await;
    assert!(result.is_err());
    Ok(())
}

#[tokio::test]
async fn test_run_withWindows1251RussianSource_shouldSendCyrillicToTranslator() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = temp_dir.path().join("movie.ru.srt");
    let source = common::store_from_bodies(&["Привет мир", "Как дела?"]);
    source.write_to_file(&input, "ru", &OutputEncoding::standard())?;

    let mut config = config_for(&["en"]);
    config.source_language = "ru".to_string();
    let mock = MockTranslator::working().with_custom_response(|_| "Hello world how are you?".to_string());
    let service = service_for(&mock, &config);
    let controller = Controller::with_config(config)?;

    let written = controller
        .run_with_service(&service, input, temp_dir.path().to_path_buf(), false)
        .await?;

    assert_eq!(mock.requests()[0].text, "Привет мир Как дела?");
    assert_eq!(CueStore::read_from_file(&written[0])?.full_text(), "Hello world how are you?");
    Ok(())
}
