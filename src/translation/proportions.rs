use crate::cue_store::CueStore;
use crate::errors::SubtitleError;

/// Share of the whole file held by one cue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CueProportion {
    /// Index of the cue this proportion belongs to
    pub index: usize,
    /// Cue duration over total duration
    pub time_percent: f64,
    /// Cue word count over total word count
    pub word_percent: f64,
}

/// Per-cue time and word proportions, in cue order
#[derive(Debug, Clone, PartialEq)]
pub struct ProportionMap {
    entries: Vec<CueProportion>,
}

impl ProportionMap {
    /// Compute proportions for every cue.
    ///
    /// The time denominator is the end of the last cue in absolute
    /// milliseconds, not the span from the first cue.
    pub fn compute(store: &CueStore) -> Result<Self, SubtitleError> {
        if store.is_empty() {
            return Err(SubtitleError::EmptyInput("no cues to compute proportions for".to_string()));
        }

        let total_ms = store.total_duration_ms();
        if total_ms == 0 {
            return Err(SubtitleError::DivideByZero("total subtitle duration is 0 ms".to_string()));
        }

        let total_words = store.total_word_count();
        if total_words == 0 {
            return Err(SubtitleError::DivideByZero("original subtitles contain no words".to_string()));
        }

        let entries = store
            .iter()
            .map(|cue| CueProportion {
                index: cue.index,
                time_percent: cue.duration_ms() as f64 / total_ms as f64,
                word_percent: cue.word_count() as f64 / total_words as f64,
            })
            .collect();

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CueProportion] {
        &self.entries
    }

    pub fn word_percents(&self) -> Vec<f64> {
        self.entries.iter().map(|p| p.word_percent).collect()
    }

    pub fn time_percents(&self) -> Vec<f64> {
        self.entries.iter().map(|p| p.time_percent).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Shorthand for [`ProportionMap::compute`]
pub fn compute_proportions(store: &CueStore) -> Result<ProportionMap, SubtitleError> {
    ProportionMap::compute(store)
}
