//! # Random Service
//!
//! Seeded random helpers shared by generation, combat and AI, plus the small
//! recursive grammar used by template legends to describe random content.

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Nested random content description.
///
/// Resolution walks the structure recursively until only literal values are
/// left, so every variant may wrap any other.
///
/// # Examples
///
/// ```
/// use shamble::{RandomData, RandomService};
///
/// let mut random = RandomService::from_seed(1);
/// let data = RandomData::Repeat(3, Box::new(RandomData::Literal("zombie")));
/// assert_eq!(random.resolve(&data), vec!["zombie", "zombie", "zombie"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RandomData<T> {
    /// A plain value
    Literal(T),
    /// Every entry is applied
    All(Vec<RandomData<T>>),
    /// Exactly one entry, chosen proportionally to its weight
    Weighted(Vec<(u32, RandomData<T>)>),
    /// Each entry is included independently with its percent chance
    Percent(Vec<(u32, RandomData<T>)>),
    /// The wrapped data resolved this many times
    Repeat(u32, Box<RandomData<T>>),
}

impl<T> RandomData<T> {
    /// Shorthand for a literal.
    pub fn literal(value: T) -> Self {
        RandomData::Literal(value)
    }
}

impl<T> From<T> for RandomData<T> {
    fn from(value: T) -> Self {
        RandomData::Literal(value)
    }
}

/// Deterministic random number helpers.
///
/// All randomness in a session flows through one service so that a seed
/// reproduces a floor and the fights on it.
#[derive(Debug, Clone)]
pub struct RandomService {
    rng: StdRng,
}

impl RandomService {
    /// Wraps an existing generator.
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }

    /// Creates a service seeded for reproducible output.
    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Direct access to the underlying generator.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// A float in `[min, max)`. Returns `min` when the range is empty.
    pub fn range_f64(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..max)
    }

    /// An integer in `[min, max]`.
    pub fn range_i32(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    /// A uniformly random index below `len`, or `None` for an empty range.
    pub fn index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.rng.gen_range(0..len))
        }
    }

    /// True with the given probability, clamped to `[0, 1]`.
    pub fn chance(&mut self, probability: f64) -> bool {
        if probability <= 0.0 {
            return false;
        }
        if probability >= 1.0 {
            return true;
        }
        self.rng.gen_bool(probability)
    }

    /// True with `percent` / 100 probability.
    pub fn percent(&mut self, percent: u32) -> bool {
        self.chance(f64::from(percent) / 100.0)
    }

    /// A random element of the slice.
    pub fn sample<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }

    /// Removes and returns a random element.
    pub fn remove_random<T>(&mut self, items: &mut Vec<T>) -> Option<T> {
        let index = self.index(items.len())?;
        Some(items.swap_remove(index))
    }

    /// Shuffles the slice in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }

    /// Picks an index proportionally to the weights.
    ///
    /// Returns `None` when there are no weights or all weights are zero.
    pub fn weighted_index(&mut self, weights: &[u32]) -> Option<usize> {
        let distribution = WeightedIndex::new(weights).ok()?;
        Some(distribution.sample(&mut self.rng))
    }

    /// Resolves nested random data into the literal values it produces.
    pub fn resolve<T: Clone>(&mut self, data: &RandomData<T>) -> Vec<T> {
        let mut out = Vec::new();
        self.resolve_into(data, &mut out);
        out
    }

    fn resolve_into<T: Clone>(&mut self, data: &RandomData<T>, out: &mut Vec<T>) {
        match data {
            RandomData::Literal(value) => out.push(value.clone()),
            RandomData::All(entries) => {
                for entry in entries {
                    self.resolve_into(entry, out);
                }
            }
            RandomData::Weighted(entries) => {
                let weights: Vec<u32> = entries.iter().map(|(weight, _)| *weight).collect();
                if let Some(index) = self.weighted_index(&weights) {
                    self.resolve_into(&entries[index].1, out);
                }
            }
            RandomData::Percent(entries) => {
                for (percent, entry) in entries {
                    if self.percent(*percent) {
                        self.resolve_into(entry, out);
                    }
                }
            }
            RandomData::Repeat(times, inner) => {
                for _ in 0..*times {
                    self.resolve_into(inner, out);
                }
            }
        }
    }
}
