/*!
 * Tests for per-language output encodings
 */

use std::collections::HashMap;

use encoding_rs::{UTF_8, WINDOWS_1251, WINDOWS_1252};
use srtalign::cue_store::CueStore;
use srtalign::encoding::{decode_input, OutputEncoding};

use crate::common;

#[test]
fn test_standard_shouldMapSpanishAndRussianToCodePages() {
    let encodings = OutputEncoding::standard();

    assert_eq!(encodings.for_language("es"), WINDOWS_1252);
    assert_eq!(encodings.for_language("spa"), WINDOWS_1252);
    assert_eq!(encodings.for_language("ru"), WINDOWS_1251);
    assert_eq!(encodings.for_language("fr"), UTF_8);
}

#[test]
fn test_encode_withSpanishText_shouldWriteSingleBytes() {
    let encoded = OutputEncoding::standard().encode("¿Qué tal?", "es");

    assert_eq!(encoded.encoding, WINDOWS_1252);
    assert_eq!(encoded.bytes, vec![0xBF, b'Q', b'u', 0xE9, b' ', b't', b'a', b'l', b'?']);
}

#[test]
fn test_encode_withCyrillic_shouldUseWindows1251() {
    let encoded = OutputEncoding::standard().encode("Привет", "ru");

    assert_eq!(encoded.encoding, WINDOWS_1251);
    assert_eq!(encoded.bytes.len(), 6);
    assert_eq!(encoded.bytes[0], 0xCF);
}

#[test]
fn test_encode_withUnmappableText_shouldFallBackToUtf8() {
    let text = "日本語";
    let encoded = OutputEncoding::standard().encode(text, "es");

    assert_eq!(encoded.encoding, UTF_8);
    assert_eq!(encoded.bytes, text.as_bytes());
}

#[test]
fn test_from_labels_withUnknownLabel_shouldUseDefault() {
    let mut labels = HashMap::new();
    labels.insert("es".to_string(), "not-an-encoding".to_string());
    labels.insert("ru".to_string(), "windows-1251".to_string());

    let encodings = OutputEncoding::from_labels(&labels, "utf-8");

    assert_eq!(encodings.for_language("es"), UTF_8);
    assert_eq!(encodings.for_language("ru"), WINDOWS_1251);
}

#[test]
fn test_from_labels_withCodePageAlias_shouldResolve() {
    let mut labels = HashMap::new();
    labels.insert("es".to_string(), "cp1252".to_string());

    let encodings = OutputEncoding::from_labels(&labels, "bogus");

    assert_eq!(encodings.for_language("es"), WINDOWS_1252);
    assert_eq!(encodings.for_language("de"), UTF_8);
}

#[test]
fn test_decode_input_withBomAndLatin1_shouldDecode() {
    assert_eq!(decode_input(b"\xEF\xBB\xBFhola"), "hola");
    assert_eq!(decode_input(&[b'a', 0xF1, b'o']), "año");
}

#[test]
fn test_write_to_file_withSpanish_shouldRoundTripThroughDecode() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("subtitles-es.srt");
    let store = common::store_from_bodies(&["¿Dónde está?", "Mañana"]);

    let encoded = store.write_to_file(&path, "es", &OutputEncoding::standard()).unwrap();
    assert_eq!(encoded.encoding, WINDOWS_1252);

    let reread = CueStore::read_from_file(&path).unwrap();
    assert_eq!(reread, store);
}

#[test]
fn test_read_from_file_for_withRussian_shouldRoundTripWindows1251() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("subtitles-ru.srt");
    let encodings = OutputEncoding::standard();
    let store = common::store_from_bodies(&["Привет мир", "Как дела?"]);

    let encoded = store.write_to_file(&path, "ru", &encodings).unwrap();
    assert_eq!(encoded.encoding, WINDOWS_1251);

    let reread = CueStore::read_from_file_for(&path, "ru", &encodings).unwrap();
    assert_eq!(reread, store);
    assert_eq!(reread.cues()[0].text, "Привет мир");
}

#[test]
fn test_read_from_file_for_withUtf8File_shouldIgnoreCodePage() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        temp_dir.path(),
        "utf8.srt",
        "1\n00:00:00,000 --> 00:00:01,000\nПривет\n",
    )
    .unwrap();

    let reread = CueStore::read_from_file_for(&path, "ru", &OutputEncoding::standard()).unwrap();
    assert_eq!(reread.full_text(), "Привет");
}
