use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::encoding::{self, EncodedText, OutputEncoding};
use crate::errors::{SubtitleError, TimestampError};
use crate::file_utils::FileManager;

// @module: SubRip cue parsing, representation and serialization

// @const: Single SRT timestamp, comma or dot before the milliseconds
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2,}):(\d{2}):(\d{2})[,.](\d{3})$").expect("timestamp pattern is valid")
});

const TIMING_SEPARATOR: &str = "-->";

/// Point in time within a subtitle file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp {
    // Field order matters for the derived ordering
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub milliseconds: u32,
}

impl Timestamp {
    /// Create a timestamp, rejecting components outside their natural range
    pub fn new(hours: u32, minutes: u32, seconds: u32, milliseconds: u32) -> Result<Self, TimestampError> {
        if minutes >= 60 || seconds >= 60 || milliseconds >= 1000 {
            return Err(TimestampError::OutOfRange(format!(
                "{:02}:{:02}:{:02},{:03}",
                hours, minutes, seconds, milliseconds
            )));
        }
        Ok(Self {
            hours,
            minutes,
            seconds,
            milliseconds,
        })
    }

    pub fn from_millis(ms: u64) -> Self {
        Self {
            hours: (ms / 3_600_000) as u32,
            minutes: ((ms % 3_600_000) / 60_000) as u32,
            seconds: ((ms % 60_000) / 1_000) as u32,
            milliseconds: (ms % 1_000) as u32,
        }
    }

    /// Build from fractional seconds as emitted by speech-to-text services.
    /// Rounds to the nearest millisecond; negative or non-finite input maps to zero.
    pub fn from_seconds(seconds: f64) -> Self {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Self::default();
        }
        Self::from_millis((seconds * 1000.0).round() as u64)
    }

    pub fn as_millis(&self) -> u64 {
        u64::from(self.hours) * 3_600_000
            + u64::from(self.minutes) * 60_000
            + u64::from(self.seconds) * 1_000
            + u64::from(self.milliseconds)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02},{:03}",
            self.hours, self.minutes, self.seconds, self.milliseconds
        )
    }
}

impl FromStr for Timestamp {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let caps = TIMESTAMP_REGEX
            .captures(trimmed)
            .ok_or_else(|| TimestampError::Malformed(trimmed.to_string()))?;

        // The pattern only admits digits, so overflow is the one way parsing can fail
        let part = |i: usize| -> Result<u32, TimestampError> {
            caps[i]
                .parse::<u32>()
                .map_err(|_| TimestampError::OutOfRange(trimmed.to_string()))
        };

        Self::new(part(1)?, part(2)?, part(3)?, part(4)?)
    }
}

/// One timed subtitle entry
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    /// 1-based sequence number
    pub index: usize,
    pub start: Timestamp,
    pub end: Timestamp,
    /// Body text, always a single line
    pub text: String,
}

impl Cue {
    pub fn new(index: usize, start: Timestamp, end: Timestamp, text: impl Into<String>) -> Self {
        Self {
            index,
            start,
            end,
            text: text.into(),
        }
    }

    /// Whitespace-separated tokens of the body
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.text.split_whitespace()
    }

    pub fn word_count(&self) -> usize {
        self.words().count()
    }

    pub fn duration_ms(&self) -> u64 {
        self.end.as_millis().saturating_sub(self.start.as_millis())
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{} {} {}", self.start, TIMING_SEPARATOR, self.end)?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Ordered, non-empty collection of cues forming one subtitle file
#[derive(Debug, Clone, PartialEq)]
pub struct CueStore {
    cues: Vec<Cue>,
}

impl CueStore {
    /// Wrap already-built cues.
    ///
    /// Rejects an empty list and any cue ending before it starts. Indices are
    /// renumbered 1..N if they are not already contiguous.
    pub fn from_cues(mut cues: Vec<Cue>) -> Result<Self, SubtitleError> {
        if cues.is_empty() {
            return Err(SubtitleError::EmptyInput("subtitle store has no cues".to_string()));
        }

        if let Some((position, cue)) = cues.iter().enumerate().find(|(_, c)| c.end < c.start) {
            return Err(SubtitleError::Format {
                block: position + 1,
                line: None,
                message: format!("cue {} ends at {} before it starts at {}", cue.index, cue.end, cue.start),
            });
        }

        Self::renumber(&mut cues);
        Ok(Self { cues })
    }

    /// Parse SubRip text.
    ///
    /// Blocks are separated by one or more blank lines. Each block needs an index
    /// line and a timing line; body lines are optional and are joined into a
    /// single line with spaces.
    pub fn parse(content: &str) -> Result<Self, SubtitleError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let mut cues = Vec::new();
        let mut block: Vec<(usize, &str)> = Vec::new();
        let mut block_number = 0;

        for (line_idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                if !block.is_empty() {
                    block_number += 1;
                    cues.push(Self::parse_block(block_number, &block)?);
                    block.clear();
                }
                continue;
            }
            block.push((line_idx + 1, trimmed));
        }

        if !block.is_empty() {
            block_number += 1;
            cues.push(Self::parse_block(block_number, &block)?);
        }

        if cues.is_empty() {
            warn!("No subtitle blocks found in content");
            return Err(SubtitleError::EmptyInput("no subtitle blocks found".to_string()));
        }

        debug!("Parsed {} subtitle cues", cues.len());
        Self::renumber(&mut cues);
        Ok(Self { cues })
    }

    fn parse_block(block: usize, lines: &[(usize, &str)]) -> Result<Cue, SubtitleError> {
        let format_error = |line: usize, message: String| SubtitleError::Format {
            block,
            line: Some(line),
            message,
        };

        let (index_line_no, index_line) = lines[0];
        if index_line.contains(TIMING_SEPARATOR) {
            return Err(format_error(index_line_no, "missing index line".to_string()));
        }
        let index = index_line
            .parse::<usize>()
            .map_err(|_| format_error(index_line_no, format!("invalid index line '{}'", index_line)))?;

        let (timing_line_no, timing_line) = lines
            .get(1)
            .copied()
            .ok_or_else(|| format_error(index_line_no, "missing timing line".to_string()))?;

        let (start_text, end_text) = timing_line
            .split_once(TIMING_SEPARATOR)
            .ok_or_else(|| format_error(timing_line_no, format!("missing timing line, found '{}'", timing_line)))?;

        let start = start_text
            .parse::<Timestamp>()
            .map_err(|e| format_error(timing_line_no, e.to_string()))?;
        let end = end_text
            .parse::<Timestamp>()
            .map_err(|e| format_error(timing_line_no, e.to_string()))?;

        if end < start {
            return Err(format_error(
                timing_line_no,
                format!("end time {} is before start time {}", end, start),
            ));
        }

        let text = lines[2..]
            .iter()
            .map(|(_, l)| *l)
            .collect::<Vec<_>>()
            .join(" ");

        Ok(Cue::new(index, start, end, text))
    }

    fn renumber(cues: &mut [Cue]) {
        let contiguous = cues.iter().enumerate().all(|(i, c)| c.index == i + 1);
        if !contiguous {
            warn!("Subtitle indices are not contiguous, renumbering {} cues", cues.len());
            for (i, cue) in cues.iter_mut().enumerate() {
                cue.index = i + 1;
            }
        }
    }

    /// Serialize to SubRip text
    pub fn to_srt_string(&self) -> String {
        self.to_string()
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cue> {
        self.cues.iter()
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    /// Always false for a constructed store; kept alongside `len`
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// End of the last cue in absolute milliseconds
    pub fn total_duration_ms(&self) -> u64 {
        self.cues.last().map_or(0, |c| c.end.as_millis())
    }

    /// Time between the first cue's start and the last cue's end
    pub fn span_ms(&self) -> u64 {
        match (self.cues.first(), self.cues.last()) {
            (Some(first), Some(last)) => last.end.as_millis().saturating_sub(first.start.as_millis()),
            _ => 0,
        }
    }

    pub fn total_word_count(&self) -> usize {
        self.cues.iter().map(Cue::word_count).sum()
    }

    /// All cue bodies joined with single spaces
    pub fn full_text(&self) -> String {
        self.cues
            .iter()
            .map(|c| c.text.as_str())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Read and parse a subtitle file
    pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read subtitle file: {}", path.display()))?;
        let content = encoding::decode_input(&bytes);
        Self::parse(&content).with_context(|| format!("Failed to parse subtitle file: {}", path.display()))
    }

    /// Read a subtitle file written for `language`.
    ///
    /// Non-UTF-8 input is decoded with the code page `encodings` assigns to the
    /// language, so files written by `write_to_file` read back unchanged.
    pub fn read_from_file_for<P: AsRef<Path>>(
        path: P,
        language: &str,
        encodings: &OutputEncoding,
    ) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read subtitle file: {}", path.display()))?;
        let content = encodings.decode(&bytes, language);
        Self::parse(&content).with_context(|| format!("Failed to parse subtitle file: {}", path.display()))
    }

    /// Encode for the target language and write in one go
    pub fn write_to_file<P: AsRef<Path>>(
        &self,
        path: P,
        language: &str,
        encodings: &OutputEncoding,
    ) -> Result<EncodedText> {
        let encoded = encodings.encode(&self.to_srt_string(), language);
        FileManager::write_bytes(&path, &encoded.bytes)?;
        debug!(
            "Wrote {} cues to {} ({})",
            self.len(),
            path.as_ref().display(),
            encoded.encoding.name()
        );
        Ok(encoded)
    }
}

impl fmt::Display for CueStore {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for cue in &self.cues {
            write!(f, "{}", cue)?;
        }
        Ok(())
    }
}

impl FromStr for CueStore {
    type Err = SubtitleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'a> IntoIterator for &'a CueStore {
    type Item = &'a Cue;
    type IntoIter = std::slice::Iter<'a, Cue>;

    fn into_iter(self) -> Self::IntoIter {
        self.cues.iter()
    }
}
