/*!
 * Proportional allocation of translated words onto original cues.
 *
 * The translated text arrives as one block with no timing. Each original cue
 * keeps its timestamps and receives a contiguous run of translated words sized
 * after the cue's share of the original word count. The ranges always
 * partition the translated words: nothing is dropped, nothing is repeated,
 * and the last cue absorbs whatever rounding left over.
 *
 * The uniform strategy ignores the original word counts and gives every cue
 * about the same number of words.
 */

use std::ops::Range;

use log::debug;

use super::proportions::ProportionMap;
use super::rounding::{RoundingPolicy, RoundingPolicyRegistry, UniformPolicy};
use crate::app_config::{AllocationConfig, AllocationStrategy};
use crate::cue_store::{Cue, CueStore};
use crate::errors::SubtitleError;

/// Split translated text into words
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// One word range per cue over the translated word sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    ranges: Vec<Range<usize>>,
    total_words: usize,
}

impl Allocation {
    pub fn ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }

    /// Ranges as `(start, end_exclusive)` pairs
    pub fn as_pairs(&self) -> Vec<(usize, usize)> {
        self.ranges.iter().map(|r| (r.start, r.end)).collect()
    }

    /// Words given to each cue
    pub fn counts(&self) -> Vec<usize> {
        self.ranges.iter().map(|r| r.len()).collect()
    }

    /// Number of translated words the allocation partitions
    pub fn total_words(&self) -> usize {
        self.total_words
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// Distributes translated words across cues by original word proportion
#[derive(Debug, Clone, Default)]
pub struct ProportionalAllocator {
    policies: RoundingPolicyRegistry,
    strategy: AllocationStrategy,
}

impl ProportionalAllocator {
    pub fn new(policies: RoundingPolicyRegistry) -> Self {
        Self {
            policies,
            strategy: AllocationStrategy::Proportional,
        }
    }

    /// Strategy and rounding policies from the config file
    pub fn from_config(config: &AllocationConfig) -> Self {
        Self::new(RoundingPolicyRegistry::from_config(config)).with_strategy(config.strategy)
    }

    pub fn with_strategy(mut self, strategy: AllocationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn policies(&self) -> &RoundingPolicyRegistry {
        &self.policies
    }

    pub fn strategy(&self) -> AllocationStrategy {
        self.strategy
    }

    /// Allocate `translated_words` using the rounding policy of `language`
    pub fn allocate(
        &self,
        word_percents: &[f64],
        translated_words: &[&str],
        language: &str,
    ) -> Result<Allocation, SubtitleError> {
        let policy = self.policies.policy_for(language);
        debug!("Allocating for '{}' with {} rounding", language, policy.name());
        allocate_with(policy, word_percents, translated_words.len())
    }

    /// One cue per original cue, same index and timestamps, allocated words as text
    pub fn build_translated_store(
        &self,
        original: &CueStore,
        allocation: &Allocation,
        translated_words: &[&str],
    ) -> Result<CueStore, SubtitleError> {
        build_translated_store(original, allocation, translated_words)
    }

    /// Full mapping: tokenization, allocation with the configured strategy and rebuild
    pub fn remap(
        &self,
        original: &CueStore,
        translated_text: &str,
        language: &str,
    ) -> Result<CueStore, SubtitleError> {
        let words = tokenize(translated_text);
        let allocation = match self.strategy {
            AllocationStrategy::Proportional => {
                let proportions = ProportionMap::compute(original)?;
                self.allocate(&proportions.word_percents(), &words, language)?
            }
            AllocationStrategy::Uniform => allocate_uniform(original.len(), words.len())?,
        };

        debug!(
            "Mapped {} translated words onto {} cues ({} original words)",
            words.len(),
            original.len(),
            original.total_word_count()
        );
        build_translated_store(original, &allocation, &words)
    }
}

/// Allocate `num_words` words across cues with an explicit policy.
///
/// Each cue takes `policy(i, word_percents[i] * num_words)` words, clamped to
/// zero below and to the remaining words above. The last cue always ends at
/// `num_words`.
pub fn allocate_with(
    policy: &dyn RoundingPolicy,
    word_percents: &[f64],
    num_words: usize,
) -> Result<Allocation, SubtitleError> {
    let last = word_percents
        .len()
        .checked_sub(1)
        .ok_or_else(|| SubtitleError::EmptyInput("no cues to allocate words to".to_string()))?;

    let (ranges, _) = word_percents.iter().enumerate().fold(
        (Vec::with_capacity(word_percents.len()), 0usize),
        |(mut ranges, start), (i, &percent)| {
            let raw = percent * num_words as f64;
            let count = usize::try_from(policy.word_count(i, raw).max(0)).unwrap_or(usize::MAX);
            let computed_end = start.saturating_add(count).min(num_words);

            let end = if i == last {
                if computed_end < num_words {
                    debug!("Last cue absorbs {} remaining words", num_words - computed_end);
                }
                num_words
            } else {
                computed_end
            };

            ranges.push(start..end);
            (ranges, end)
        },
    );

    Ok(Allocation {
        ranges,
        total_words: num_words,
    })
}

/// Allocate `num_words` words evenly over `num_cues` cues with [`UniformPolicy`].
///
/// The ranges partition the words like any other allocation: counts are
/// clamped to what is left and the last cue ends at `num_words`.
pub fn allocate_uniform(num_cues: usize, num_words: usize) -> Result<Allocation, SubtitleError> {
    let policy = UniformPolicy::for_counts(num_cues, num_words);
    debug!(
        "Uniform allocation of {} words over {} cues: {} per cue, extra every {}",
        num_words, num_cues, policy.per_cue, policy.every
    );
    let percents = vec![0.0; num_cues];
    allocate_with(&policy, &percents, num_words)
}

/// Rebuild a cue store with translated text
pub fn build_translated_store(
    original: &CueStore,
    allocation: &Allocation,
    translated_words: &[&str],
) -> Result<CueStore, SubtitleError> {
    if allocation.len() != original.len() {
        return Err(SubtitleError::AllocationMismatch {
            cues: original.len(),
            ranges: allocation.len(),
        });
    }
    if allocation.total_words() != translated_words.len() {
        return Err(SubtitleError::WordCountMismatch {
            expected: allocation.total_words(),
            actual: translated_words.len(),
        });
    }

    let cues = original
        .iter()
        .zip(allocation.ranges())
        .map(|(cue, range)| Cue::new(cue.index, cue.start, cue.end, translated_words[range.clone()].join(" ")))
        .collect();

    CueStore::from_cues(cues)
}
