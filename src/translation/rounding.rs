/*!
 * Rounding policies for proportional word allocation.
 *
 * A cue's share of the translated words is fractional (`wordPercent * n`).
 * A policy turns that raw value into a whole word count, given the cue's
 * 0-based position. Languages without a registered rule fall back to floor.
 */

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::app_config::{AllocationConfig, RoundingPolicyConfig};
use crate::language_utils;

/// Turns a fractional word count into a whole one
pub trait RoundingPolicy: Send + Sync {
    /// Word count for the cue at `index` given its raw proportional share.
    /// May be negative; the allocator clamps to zero.
    fn word_count(&self, index: usize, raw: f64) -> i64;

    /// Short identifier used in logs
    fn name(&self) -> &str;
}

/// Always rounds down
#[derive(Debug, Clone, Copy, Default)]
pub struct FloorPolicy;

impl RoundingPolicy for FloorPolicy {
    fn word_count(&self, _index: usize, raw: f64) -> i64 {
        raw.floor() as i64
    }

    fn name(&self) -> &str {
        "floor"
    }
}

/// Rounds up on every `every`-th cue, starting with the first
#[derive(Debug, Clone, Copy)]
pub struct PeriodicCeilPolicy {
    pub every: usize,
}

impl RoundingPolicy for PeriodicCeilPolicy {
    fn word_count(&self, index: usize, raw: f64) -> i64 {
        if self.every != 0 && index % self.every == 0 {
            raw.ceil() as i64
        } else {
            raw.floor() as i64
        }
    }

    fn name(&self) -> &str {
        "periodic_ceil"
    }
}

/// Rounds down, then adds a bonus when the index is divisible by any modulus
#[derive(Debug, Clone)]
pub struct PeriodicBonusPolicy {
    pub moduli: Vec<usize>,
    pub bonus: i64,
}

impl RoundingPolicy for PeriodicBonusPolicy {
    fn word_count(&self, index: usize, raw: f64) -> i64 {
        let base = raw.floor() as i64;
        let hit = self.moduli.iter().any(|&m| m != 0 && index % m == 0);
        if hit { base + self.bonus } else { base }
    }

    fn name(&self) -> &str {
        "periodic_bonus"
    }
}

/// Same count for every cue, plus one word on every `every`-th cue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformPolicy {
    pub per_cue: i64,
    /// Stride of the extra word; 0 means no cue gets one
    pub every: usize,
}

impl UniformPolicy {
    /// Policy spreading `num_words` over `num_cues` cues.
    ///
    /// Each cue gets `round(num_words / num_cues)` words. When that leaves words
    /// over, one extra goes to every `ceil(num_cues / leftover)`-th cue starting
    /// with the first.
    pub fn for_counts(num_cues: usize, num_words: usize) -> Self {
        if num_cues == 0 {
            return Self { per_cue: 0, every: 0 };
        }

        let per_cue = (num_words as f64 / num_cues as f64).round() as i64;
        let leftover = num_words as i64 - per_cue * num_cues as i64;
        let every = if leftover > 0 {
            num_cues.div_ceil(leftover as usize)
        } else {
            0
        };
        Self { per_cue, every }
    }
}

impl RoundingPolicy for UniformPolicy {
    fn word_count(&self, index: usize, _raw: f64) -> i64 {
        if self.every != 0 && index % self.every == 0 {
            self.per_cue + 1
        } else {
            self.per_cue
        }
    }

    fn name(&self) -> &str {
        "uniform"
    }
}

/// Adapts a plain function or closure into a policy
pub struct FnPolicy<F> {
    name: String,
    f: F,
}

impl<F> FnPolicy<F>
where
    F: Fn(usize, f64) -> i64 + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self { name: name.into(), f }
    }
}

impl<F> RoundingPolicy for FnPolicy<F>
where
    F: Fn(usize, f64) -> i64 + Send + Sync,
{
    fn word_count(&self, index: usize, raw: f64) -> i64 {
        (self.f)(index, raw)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl RoundingPolicyConfig {
    /// Instantiate the configured policy
    pub fn build(&self) -> Arc<dyn RoundingPolicy> {
        match self {
            RoundingPolicyConfig::Floor => Arc::new(FloorPolicy),
            RoundingPolicyConfig::PeriodicCeil { every } => Arc::new(PeriodicCeilPolicy { every: *every }),
            RoundingPolicyConfig::PeriodicBonus { moduli, bonus } => Arc::new(PeriodicBonusPolicy {
                moduli: moduli.clone(),
                bonus: *bonus,
            }),
        }
    }
}

/// Rounding policies keyed by target language
#[derive(Clone)]
pub struct RoundingPolicyRegistry {
    policies: HashMap<String, Arc<dyn RoundingPolicy>>,
    fallback: Arc<dyn RoundingPolicy>,
}

impl RoundingPolicyRegistry {
    /// Registry with no language entries; everything rounds down
    pub fn new() -> Self {
        Self {
            policies: HashMap::new(),
            fallback: Arc::new(FloorPolicy),
        }
    }

    /// Registry with the built-in Spanish and Russian rules
    pub fn with_defaults() -> Self {
        Self::from_config(&AllocationConfig::default())
    }

    /// Registry holding exactly the policies listed in the config
    pub fn from_config(config: &AllocationConfig) -> Self {
        config
            .rounding_policies
            .iter()
            .fold(Self::new(), |registry, (language, policy)| {
                registry.with_policy(language, policy.build())
            })
    }

    /// Register (or replace) the policy for a language
    pub fn with_policy(mut self, language: &str, policy: Arc<dyn RoundingPolicy>) -> Self {
        self.register(language, policy);
        self
    }

    pub fn register(&mut self, language: &str, policy: Arc<dyn RoundingPolicy>) {
        self.policies
            .insert(language_utils::registry_key(language), policy);
    }

    /// Replace the policy used for unlisted languages
    pub fn with_fallback(mut self, policy: Arc<dyn RoundingPolicy>) -> Self {
        self.fallback = policy;
        self
    }

    /// Policy for a target language, falling back to the default one
    pub fn policy_for(&self, language: &str) -> &dyn RoundingPolicy {
        self.policies
            .get(&language_utils::registry_key(language))
            .unwrap_or(&self.fallback)
            .as_ref()
    }

    /// Languages with a dedicated policy, sorted
    pub fn languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = self.policies.keys().map(String::as_str).collect();
        languages.sort_unstable();
        languages
    }
}

impl Default for RoundingPolicyRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for RoundingPolicyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<(&str, &str)> = self
            .policies
            .iter()
            .map(|(language, policy)| (language.as_str(), policy.name()))
            .collect();
        entries.sort_unstable();
        f.debug_struct("RoundingPolicyRegistry")
            .field("policies", &entries)
            .field("fallback", &self.fallback.name())
            .finish()
    }
}
