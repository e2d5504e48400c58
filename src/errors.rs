/*!
 * Error types for the srtalign application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to a translation provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Whether retrying the same request could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RequestFailed(_) | Self::ConnectionError(_) | Self::RateLimitExceeded(_) => true,
            Self::ApiError { status_code, .. } => *status_code >= 500,
            Self::ParseError(_) | Self::AuthenticationError(_) => false,
        }
    }
}

/// Errors that can occur when reading a single `HH:MM:SS,mmm` timestamp
#[derive(Error, Debug, PartialEq)]
pub enum TimestampError {
    /// The text does not look like a timestamp at all
    #[error("Invalid timestamp format: {0}")]
    Malformed(String),

    /// A component is outside its natural range
    #[error("Timestamp component out of range: {0}")]
    OutOfRange(String),
}

/// Errors that can occur while parsing, allocating or building subtitles
#[derive(Error, Debug, PartialEq)]
pub enum SubtitleError {
    /// A cue block could not be parsed
    #[error("Malformed subtitle block {block}{}: {message}", line_suffix(.line))]
    Format {
        /// 1-based position of the block in the input
        block: usize,
        /// 1-based physical line where the problem was detected, `None` for cues
        /// that were built in memory rather than parsed
        line: Option<usize>,
        /// What was wrong with the block
        message: String,
    },

    /// There was nothing to work with
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// A proportion denominator was zero
    #[error("Division by zero: {0}")]
    DivideByZero(String),

    /// An allocation does not line up with the cue store it is applied to
    #[error("Allocation has {ranges} ranges but the subtitle store has {cues} cues")]
    AllocationMismatch {
        /// Number of cues in the store
        cues: usize,
        /// Number of ranges in the allocation
        ranges: usize,
    },

    /// An allocation was computed for a different number of translated words
    #[error("Allocation covers {expected} words but {actual} translated words were supplied")]
    WordCountMismatch {
        /// Words the allocation covers
        expected: usize,
        /// Words actually supplied
        actual: usize,
    },

    /// The speech-to-text transcript could not be read
    #[error("Invalid transcript: {0}")]
    Transcript(String),
}

fn line_suffix(line: &Option<usize>) -> String {
    line.map(|l| format!(" at line {}", l)).unwrap_or_default()
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error with subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// The provider kept failing for a chunk
    #[error("Translation failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// The last provider error seen
        last: ProviderError,
    },
}
