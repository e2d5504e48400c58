/*!
 * Tests for request batching
 */

use srtalign::translation::chunking::{chunk_by_cues, chunk_by_sentences, join_chunks, split_sentences};

use crate::common;

fn word_count<S: AsRef<str>>(chunks: &[S]) -> usize {
    chunks.iter().map(|c| c.as_ref().split_whitespace().count()).sum()
}

#[test]
fn test_split_sentences_shouldKeepFullStops() {
    let sentences = split_sentences("One. Two two.  Three");
    assert_eq!(sentences, vec!["One.", "Two two.", "Three"]);
}

#[test]
fn test_chunk_by_sentences_withTwentyFiveSentences_shouldMakeThreeChunks() {
    let text = (1..=25).map(|i| format!("Sentence number {}.", i)).collect::<Vec<_>>().join(" ");
    let chunks = chunk_by_sentences(&text, 10, 5000);

    assert_eq!(chunks.len(), 3);
    assert!(chunks[0].starts_with("Sentence number 1."));
    assert!(chunks[0].ends_with("Sentence number 10."));
    assert!(chunks[2].ends_with("Sentence number 25."));
    assert_eq!(word_count(&chunks), 75);
}

#[test]
fn test_chunk_by_sentences_withByteCeiling_shouldRepackOnWordBoundaries() {
    let text = "alpha beta gamma delta epsilon zeta eta theta.";
    let chunks = chunk_by_sentences(text, 10, 12);

    assert!(chunks.len() > 1);
    assert!(chunks.iter().all(|c| c.len() <= 12));
    assert_eq!(join_chunks(&chunks), text);
}

#[test]
fn test_chunk_by_cues_shouldGroupBodies() {
    let bodies: Vec<String> = (1..=120).map(|i| format!("cue {}", i)).collect();
    let refs: Vec<&str> = bodies.iter().map(String::as_str).collect();
    let store = common::store_from_bodies(&refs);

    let chunks = chunk_by_cues(&store, 50, 5000);

    assert_eq!(chunks.len(), 3);
    assert!(chunks[1].starts_with("cue 51 "));
    assert!(chunks[2].ends_with("cue 120"));
    assert_eq!(word_count(&chunks), 240);
}

#[test]
fn test_chunk_by_cues_shouldSkipEmptyBodies() {
    let store = common::store_from_bodies(&["Hello", "", "world"]);
    assert_eq!(chunk_by_cues(&store, 50, 5000), vec!["Hello world"]);
}

#[test]
fn test_chunk_by_sentences_withEmptyText_shouldReturnNoChunks() {
    assert!(chunk_by_sentences("   ", 10, 5000).is_empty());
}

#[test]
fn test_join_chunks_shouldTrimAndDropEmpty() {
    assert_eq!(join_chunks(&[" Hola. ", "", "Adiós."]), "Hola. Adiós.");
}
