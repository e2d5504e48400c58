/*!
 * Translation and timing alignment.
 *
 * - `proportions`: per-cue share of time and words
 * - `rounding`: per-language rounding policies
 * - `allocator`: word allocation and store rebuild
 * - `chunking`: request batching
 * - `service`: provider calls with retries
 */

pub use self::allocator::{allocate_uniform, allocate_with, tokenize, Allocation, ProportionalAllocator};
pub use self::proportions::{compute_proportions, CueProportion, ProportionMap};
pub use self::rounding::{
    FloorPolicy, FnPolicy, PeriodicBonusPolicy, PeriodicCeilPolicy, RoundingPolicy, RoundingPolicyRegistry,
    UniformPolicy,
};
pub use self::service::TranslationService;

pub mod allocator;
pub mod chunking;
pub mod proportions;
pub mod rounding;
pub mod service;
