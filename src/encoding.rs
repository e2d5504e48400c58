/*!
 * Character encodings for subtitle files.
 *
 * Legacy players still expect some languages in a Windows code page rather
 * than UTF-8. The choice is explicit configuration: a map from language code
 * to encoding label plus a default. Nothing here fails hard; an unusable label
 * or text the code page cannot represent falls back to UTF-8 with a warning.
 */

use std::collections::HashMap;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use log::{debug, warn};

use crate::language_utils;

/// Bytes ready to be written plus the encoding they are in
#[derive(Debug, Clone)]
pub struct EncodedText {
    /// Encoded bytes
    pub bytes: Vec<u8>,
    /// Encoding actually used (may differ from the configured one after a fallback)
    pub encoding: &'static Encoding,
}

/// Language code to output encoding map
#[derive(Debug, Clone)]
pub struct OutputEncoding {
    by_language: HashMap<String, &'static Encoding>,
    default: &'static Encoding,
}

impl Default for OutputEncoding {
    fn default() -> Self {
        Self::standard()
    }
}

impl OutputEncoding {
    /// Empty map with the given fallback encoding
    pub fn new(default: &'static Encoding) -> Self {
        Self {
            by_language: HashMap::new(),
            default,
        }
    }

    /// Spanish in windows-1252, Russian in windows-1251, everything else UTF-8
    pub fn standard() -> Self {
        Self::new(UTF_8)
            .with_language("es", WINDOWS_1252)
            .with_language("ru", encoding_rs::WINDOWS_1251)
    }

    /// Build from encoding labels as they appear in the config file.
    ///
    /// Labels are WHATWG names (`utf-8`, `windows-1252`, `cp1251`, ...).
    /// Unknown labels are skipped with a warning so the language uses the default.
    pub fn from_labels(labels: &HashMap<String, String>, default_label: &str) -> Self {
        let default = Self::resolve_label(default_label).unwrap_or_else(|| {
            warn!("Unknown default encoding '{}', using UTF-8", default_label);
            UTF_8
        });

        let mut encodings = Self::new(default);
        for (language, label) in labels {
            match Self::resolve_label(label) {
                Some(encoding) => encodings = encodings.with_language(language, encoding),
                None => warn!(
                    "Unknown encoding '{}' for language '{}', using {}",
                    label,
                    language,
                    default.name()
                ),
            }
        }
        encodings
    }

    /// Register (or replace) the encoding for a language
    pub fn with_language(mut self, language: &str, encoding: &'static Encoding) -> Self {
        self.by_language
            .insert(language_utils::registry_key(language), encoding);
        self
    }

    /// Encoding configured for a target language
    pub fn for_language(&self, language: &str) -> &'static Encoding {
        self.by_language
            .get(&language_utils::registry_key(language))
            .copied()
            .unwrap_or(self.default)
    }

    /// Encode subtitle text for a target language.
    ///
    /// Falls back to UTF-8 if the configured code page cannot represent every
    /// character; encoding_rs would otherwise substitute numeric character
    /// references into the subtitle text.
    pub fn encode(&self, text: &str, language: &str) -> EncodedText {
        let encoding = self.for_language(language);
        let (bytes, used, had_unmappable) = encoding.encode(text);

        if had_unmappable {
            warn!(
                "Text for '{}' cannot be represented in {}, writing UTF-8 instead",
                language,
                encoding.name()
            );
            return EncodedText {
                bytes: text.as_bytes().to_vec(),
                encoding: UTF_8,
            };
        }

        debug!("Encoded {} bytes for '{}' as {}", bytes.len(), language, used.name());
        EncodedText {
            bytes: bytes.into_owned(),
            encoding: used,
        }
    }

    /// Decode a file written for `language`.
    ///
    /// Valid UTF-8 is taken as is; anything else is read with the code page
    /// configured for the language, or windows-1252 when that is UTF-8.
    pub fn decode(&self, bytes: &[u8], language: &str) -> String {
        let fallback = match self.for_language(language) {
            encoding if encoding == UTF_8 => WINDOWS_1252,
            encoding => encoding,
        };
        decode_with_fallback(bytes, fallback)
    }

    fn resolve_label(label: &str) -> Option<&'static Encoding> {
        Encoding::for_label(label.trim().as_bytes())
    }
}

/// Decode a subtitle file read from disk.
///
/// UTF-8 (with or without BOM) is used when the bytes are valid UTF-8, otherwise
/// the content is read as windows-1252.
pub fn decode_input(bytes: &[u8]) -> String {
    decode_with_fallback(bytes, WINDOWS_1252)
}

/// Decode as UTF-8 (BOM stripped), or with `fallback` when the bytes are not UTF-8
pub fn decode_with_fallback(bytes: &[u8], fallback: &'static Encoding) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            debug!("Input is not valid UTF-8, decoding as {}", fallback.name());
            let (text, _had_errors) = fallback.decode_without_bom_handling(bytes);
            text.into_owned()
        }
    }
}
