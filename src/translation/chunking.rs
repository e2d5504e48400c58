/*!
 * Splitting source text into translation requests.
 *
 * Providers cap the payload of a single call, so text is sent in batches:
 * either a fixed number of sentences or a fixed number of cue bodies. Every
 * batch is also held under a byte ceiling; a batch that would exceed it is
 * re-packed on word boundaries.
 */

use log::{debug, error};

use crate::cue_store::CueStore;

/// Split text after every full stop, dropping empty pieces
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split_inclusive('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Batch sentences, `per_chunk` at a time, each batch at most `max_bytes`
pub fn chunk_by_sentences(text: &str, per_chunk: usize, max_bytes: usize) -> Vec<String> {
    let sentences = split_sentences(text);
    let chunks = group_units(&sentences, per_chunk, max_bytes);
    debug!("Split {} sentences into {} chunks", sentences.len(), chunks.len());
    chunks
}

/// Batch cue bodies, `per_chunk` cues at a time, each batch at most `max_bytes`
pub fn chunk_by_cues(store: &CueStore, per_chunk: usize, max_bytes: usize) -> Vec<String> {
    let bodies: Vec<&str> = store
        .iter()
        .map(|c| c.text.trim())
        .filter(|t| !t.is_empty())
        .collect();
    let chunks = group_units(&bodies, per_chunk, max_bytes);
    debug!("Split {} cues into {} chunks", store.len(), chunks.len());
    chunks
}

/// Join translated chunks back into one block
pub fn join_chunks<S: AsRef<str>>(chunks: &[S]) -> String {
    chunks
        .iter()
        .map(|c| c.as_ref().trim())
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn group_units(units: &[&str], per_chunk: usize, max_bytes: usize) -> Vec<String> {
    let per_chunk = per_chunk.max(1);
    let max_bytes = max_bytes.max(1);

    let chunks: Vec<String> = units
        .chunks(per_chunk)
        .flat_map(|group| {
            let joined = group.join(" ");
            if joined.len() <= max_bytes {
                vec![joined]
            } else {
                pack_words(&joined, max_bytes)
            }
        })
        .collect();

    let words_in: usize = units.iter().map(|u| u.split_whitespace().count()).sum();
    let words_out: usize = chunks.iter().map(|c| c.split_whitespace().count()).sum();
    if words_in != words_out {
        error!("Lost words during chunking! Before: {}, after: {}", words_in, words_out);
    }

    chunks
}

/// Greedy word packing under a byte ceiling. A single word longer than the
/// ceiling is emitted on its own.
fn pack_words(text: &str, max_bytes: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() { word.len() } else { current.len() + 1 + word.len() };
        if needed > max_bytes && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
