/*!
 * Tests for error types
 */

use srtalign::errors::{ProviderError, SubtitleError, TranslationError};

#[test]
fn test_providerError_isTransient_shouldSeparateRetryableErrors() {
    assert!(ProviderError::ConnectionError("refused".into()).is_transient());
    assert!(ProviderError::RateLimitExceeded("slow down".into()).is_transient());
    assert!(ProviderError::RequestFailed("timeout".into()).is_transient());
    assert!(ProviderError::ApiError { status_code: 503, message: "busy".into() }.is_transient());

    assert!(!ProviderError::ApiError { status_code: 400, message: "bad".into() }.is_transient());
    assert!(!ProviderError::AuthenticationError("key".into()).is_transient());
    assert!(!ProviderError::ParseError("json".into()).is_transient());
}

#[test]
fn test_providerError_isTransient_withApiStatusBoundary_shouldRetryOnlyServerErrors() {
    let api = |status_code| ProviderError::ApiError { status_code, message: String::new() };

    assert!(!api(404).is_transient());
    assert!(!api(499).is_transient());
    assert!(api(500).is_transient());
    assert!(api(502).is_transient());
    assert!(api(599).is_transient());
}

#[test]
fn test_subtitleError_display_shouldNameBlockAndLine() {
    let err = SubtitleError::Format {
        block: 3,
        line: Some(12),
        message: "missing timing line".to_string(),
    };
    assert_eq!(err.to_string(), "Malformed subtitle block 3 at line 12: missing timing line");
}

#[test]
fn test_subtitleError_display_withoutLine_shouldOmitLine() {
    let err = SubtitleError::Format {
        block: 1,
        line: None,
        message: "cue ends before it starts".to_string(),
    };
    assert_eq!(err.to_string(), "Malformed subtitle block 1: cue ends before it starts");
}

#[test]
fn test_translationError_fromSubtitleError_shouldWrap() {
    let err: TranslationError = SubtitleError::DivideByZero("no words".into()).into();
    assert!(matches!(err, TranslationError::Subtitle(SubtitleError::DivideByZero(_))));
    assert!(err.to_string().contains("no words"));
}

#[test]
fn test_retriesExhausted_display_shouldIncludeLastError() {
    let err = TranslationError::RetriesExhausted {
        attempts: 4,
        last: ProviderError::ConnectionError("refused".into()),
    };
    assert_eq!(err.to_string(), "Translation failed after 4 attempts: Connection error: refused");
}
