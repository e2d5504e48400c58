/*!
 * Speech-to-text transcript ingestion and segmentation into cues.
 *
 * Transcripts follow the AWS Transcribe result shape: a flat list of items,
 * each either a timed `pronunciation` (a spoken word) or an untimed
 * `punctuation` mark. Items are grouped into fixed-size phrases to form the
 * source-language cue store.
 */

use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::cue_store::{Cue, CueStore, Timestamp};
use crate::errors::SubtitleError;

/// Default number of transcript items per cue
pub const DEFAULT_TOKENS_PER_CUE: usize = 10;

/// Kind of transcript item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Spoken word with timing
    Pronunciation,
    /// Punctuation mark, never timed
    Punctuation,
}

/// One word or punctuation mark of a transcript
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptItem {
    pub kind: ItemKind,
    pub content: String,
    /// Start in seconds, pronunciation only
    pub start_time: Option<f64>,
    /// End in seconds, pronunciation only
    pub end_time: Option<f64>,
}

impl TranscriptItem {
    pub fn pronunciation(content: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        Self {
            kind: ItemKind::Pronunciation,
            content: content.into(),
            start_time: Some(start_time),
            end_time: Some(end_time),
        }
    }

    pub fn punctuation(content: impl Into<String>) -> Self {
        Self {
            kind: ItemKind::Punctuation,
            content: content.into(),
            start_time: None,
            end_time: None,
        }
    }

    fn timing(&self) -> Option<(f64, f64)> {
        match (self.kind, self.start_time, self.end_time) {
            (ItemKind::Pronunciation, Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }
}

// Wire format

#[derive(Deserialize)]
struct RawTranscript {
    results: RawResults,
}

#[derive(Deserialize)]
struct RawResults {
    #[serde(default)]
    transcripts: Vec<RawTranscriptText>,
    #[serde(default)]
    items: Vec<RawItem>,
}

#[derive(Deserialize)]
struct RawTranscriptText {
    transcript: String,
}

#[derive(Deserialize)]
struct RawItem {
    #[serde(rename = "type")]
    kind: ItemKind,
    #[serde(default, deserialize_with = "deserialize_seconds")]
    start_time: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_seconds")]
    end_time: Option<f64>,
    #[serde(default)]
    alternatives: Vec<RawAlternative>,
}

#[derive(Deserialize)]
struct RawAlternative {
    content: String,
}

// Transcribe writes times as strings ("1.24"); accept plain numbers as well
fn deserialize_seconds<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid time value '{}'", s))),
        Some(other) => Err(serde::de::Error::custom(format!("invalid time value {}", other))),
    }
}

/// A parsed speech-to-text transcript
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    /// Full transcript text as one block
    pub text: String,
    /// Timed items in spoken order
    pub items: Vec<TranscriptItem>,
}

impl Transcript {
    pub fn new(text: impl Into<String>, items: Vec<TranscriptItem>) -> Self {
        Self {
            text: text.into(),
            items,
        }
    }

    /// Parse Transcribe JSON output
    pub fn from_json(json: &str) -> Result<Self, SubtitleError> {
        let raw: RawTranscript =
            serde_json::from_str(json).map_err(|e| SubtitleError::Transcript(e.to_string()))?;

        let mut items = Vec::with_capacity(raw.results.items.len());
        for (position, item) in raw.results.items.into_iter().enumerate() {
            let content = item
                .alternatives
                .into_iter()
                .next()
                .map(|a| a.content)
                .ok_or_else(|| {
                    SubtitleError::Transcript(format!("item {} has no alternatives", position + 1))
                })?;

            if item.kind == ItemKind::Pronunciation && (item.start_time.is_none() || item.end_time.is_none()) {
                return Err(SubtitleError::Transcript(format!(
                    "pronunciation item {} ('{}') has no timing",
                    position + 1,
                    content
                )));
            }

            items.push(TranscriptItem {
                kind: item.kind,
                content,
                start_time: item.start_time,
                end_time: item.end_time,
            });
        }

        let text = match raw.results.transcripts.into_iter().next() {
            Some(t) => t.transcript,
            None => {
                warn!("Transcript has no full text, rebuilding it from items");
                let contents: Vec<&str> = items.iter().map(|i| i.content.as_str()).collect();
                phrase_text(&contents)
            }
        };

        debug!("Loaded transcript with {} items", items.len());
        Ok(Self { text, items })
    }

    /// Read a Transcribe JSON file
    pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read transcript: {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Failed to parse transcript: {}", path.display()))
    }

    /// Segment into cues of `tokens_per_cue` items
    pub fn to_cue_store(&self, tokens_per_cue: usize) -> Result<CueStore, SubtitleError> {
        segment(&self.items, tokens_per_cue)
    }
}

/// Group transcript items into cues of `tokens_per_cue` items each.
///
/// Punctuation counts toward the group size but never contributes timing. A
/// cue starts at its first timed word and ends at its last timed word; a cue
/// with no timed word sits at the previous cue's end. The trailing partial
/// group becomes the last cue.
pub fn segment(items: &[TranscriptItem], tokens_per_cue: usize) -> Result<CueStore, SubtitleError> {
    if items.is_empty() {
        return Err(SubtitleError::EmptyInput("transcript has no items".to_string()));
    }

    let mut previous_end = Timestamp::default();
    let cues: Vec<Cue> = items
        .chunks(tokens_per_cue.max(1))
        .enumerate()
        .map(|(i, group)| {
            let mut timed = group.iter().filter_map(TranscriptItem::timing);
            let (start, end) = match timed.next() {
                Some((first_start, first_end)) => {
                    let last_end = timed.last().map_or(first_end, |(_, end)| end);
                    let start = Timestamp::from_seconds(first_start);
                    (start, Timestamp::from_seconds(last_end).max(start))
                }
                None => (previous_end, previous_end),
            };
            previous_end = end;

            let contents: Vec<&str> = group.iter().map(|item| item.content.as_str()).collect();
            Cue::new(i + 1, start, end, phrase_text(&contents))
        })
        .collect();

    debug!("Segmented {} transcript items into {} cues", items.len(), cues.len());
    CueStore::from_cues(cues)
}

/// Join tokens into display text.
///
/// Tokens starting with a letter or digit are separated by a space; anything
/// else (punctuation) is glued to the preceding token.
pub fn phrase_text(tokens: &[&str]) -> String {
    let mut out = String::new();
    for (i, token) in tokens.iter().enumerate() {
        let is_word = token.chars().next().is_some_and(char::is_alphanumeric);
        if is_word && i > 0 {
            out.push(' ');
        }
        out.push_str(token);
    }
    out
}
