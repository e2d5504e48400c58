/*!
 * Tests for transcript parsing and segmentation
 */

use srtalign::errors::SubtitleError;
use srtalign::transcript::{phrase_text, segment, ItemKind, Transcript, TranscriptItem};

use crate::common::{self, SAMPLE_TRANSCRIPT_JSON};

#[test]
fn test_from_json_withTranscribeOutput_shouldReadTextAndItems() {
    let transcript = Transcript::from_json(SAMPLE_TRANSCRIPT_JSON).unwrap();

    assert_eq!(transcript.text, "Hello world. How are you?");
    assert_eq!(transcript.items.len(), 7);
    assert_eq!(transcript.items[0].kind, ItemKind::Pronunciation);
    assert_eq!(transcript.items[0].start_time, Some(0.5));
    assert_eq!(transcript.items[2].kind, ItemKind::Punctuation);
    assert_eq!(transcript.items[2].start_time, None);
}

#[test]
fn test_from_json_withNumericTimes_shouldParse() {
    let json = r#"{"results": {"items": [
        {"type": "pronunciation", "start_time": 1.5, "end_time": 2, "alternatives": [{"content": "Hi"}]}
    ]}}"#;
    let transcript = Transcript::from_json(json).unwrap();

    assert_eq!(transcript.items[0].end_time, Some(2.0));
    // No transcripts array, text rebuilt from items
    assert_eq!(transcript.text, "Hi");
}

#[test]
fn test_from_json_withUntimedPronunciation_shouldFail() {
    let json = r#"{"results": {"items": [
        {"type": "pronunciation", "alternatives": [{"content": "Hi"}]}
    ]}}"#;
    assert!(matches!(Transcript::from_json(json), Err(SubtitleError::Transcript(_))));
}

#[test]
fn test_from_json_withMissingAlternatives_shouldFail() {
    let json = r#"{"results": {"items": [
        {"type": "punctuation", "alternatives": []}
    ]}}"#;
    assert!(matches!(Transcript::from_json(json), Err(SubtitleError::Transcript(_))));
}

#[test]
fn test_from_json_withInvalidJson_shouldFail() {
    assert!(matches!(Transcript::from_json("not json"), Err(SubtitleError::Transcript(_))));
}

/// Test grouping into fixed-size phrases
#[test]
fn test_to_cue_store_withThreeTokensPerCue_shouldKeepTrailingGroup() {
    let transcript = Transcript::from_json(SAMPLE_TRANSCRIPT_JSON).unwrap();
    let store = transcript.to_cue_store(3).unwrap();

    assert_eq!(store.len(), 3);

    let first = &store.cues()[0];
    assert_eq!(first.text, "Hello world.");
    assert_eq!(first.start.as_millis(), 500);
    assert_eq!(first.end.as_millis(), 1400);

    let second = &store.cues()[1];
    assert_eq!(second.text, "How are you");
    assert_eq!(second.start.as_millis(), 2000);
    assert_eq!(second.end.as_millis(), 2750);

    // Punctuation-only group sits at the previous end
    let last = &store.cues()[2];
    assert_eq!(last.text, "?");
    assert_eq!(last.start.as_millis(), 2750);
    assert_eq!(last.end.as_millis(), 2750);
}

#[test]
fn test_to_cue_store_withDefaultSize_shouldProduceSingleCue() {
    let transcript = Transcript::from_json(SAMPLE_TRANSCRIPT_JSON).unwrap();
    let store = transcript.to_cue_store(10).unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(store.cues()[0].text, "Hello world. How are you?");
    assert_eq!(store.cues()[0].to_string(), "1\n00:00:00,500 --> 00:00:02,750\nHello world. How are you?\n\n");
}

#[test]
fn test_segment_withNoItems_shouldReturnEmptyInput() {
    assert!(matches!(segment(&[], 10), Err(SubtitleError::EmptyInput(_))));
}

#[test]
fn test_segment_withZeroTokensPerCue_shouldUseOneTokenPerCue() {
    let items = vec![
        TranscriptItem::pronunciation("one", 0.0, 0.5),
        TranscriptItem::pronunciation("two", 0.5, 1.0),
    ];
    let store = segment(&items, 0).unwrap();
    assert_eq!(store.len(), 2);
}

#[test]
fn test_phrase_text_shouldGluePunctuation() {
    assert_eq!(phrase_text(&["Hello", ",", "world", "!"]), "Hello, world!");
    assert_eq!(phrase_text(&["Ça", "va", "?"]), "Ça va?");
    assert_eq!(phrase_text(&[]), "");
}

#[test]
fn test_read_from_file_withSampleTranscript_shouldParse() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_transcript(temp_dir.path(), "talk.json").unwrap();

    let transcript = Transcript::read_from_file(&path).unwrap();
    assert_eq!(transcript.items.len(), 7);
}
