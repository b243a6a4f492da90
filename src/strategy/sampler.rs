//! Bounded uniform integer draws.
//!
//! The randomized bid is the engine's only nondeterministic point, so the
//! draw sits behind a trait that tests can replace with a mock or a
//! scripted sequence.

use rand::Rng;

use crate::types::BidderError;

#[cfg(test)]
use mockall::automock;

/// Source of uniformly distributed integers in a half-open range.
#[cfg_attr(test, automock)]
pub trait BidSampler: Send {
    /// Uniform draw in `[min, max)`. Fails when the range is empty.
    fn pick(&mut self, min: i64, max: i64) -> Result<i64, BidderError>;
}

/// Production sampler backed by the thread-local RNG.
#[derive(Debug, Default)]
pub struct UniformSampler;

impl BidSampler for UniformSampler {
    fn pick(&mut self, min: i64, max: i64) -> Result<i64, BidderError> {
        if max <= min {
            return Err(BidderError::EmptyRange { min, max });
        }
        Ok(rand::thread_rng().gen_range(min..max))
    }
}
