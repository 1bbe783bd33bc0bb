// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Interval-weighted pitch selection.
//!
//! Given the previous sounding pitch, candidates closer in semitone
//! distance receive higher probability: `w = (|interval| + offset)^-factor`.
//! A larger factor sharpens the preference for small intervals. The first
//! note of a melody (no previous pitch) is drawn uniformly.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::music::Pitch;

/// Default probability exponent
pub const DEFAULT_PROB_FACTOR: f64 = 2.0;
/// Default interval offset
pub const DEFAULT_PROB_OFFSET: f64 = 5.0;

/// Why a selection could not be made. The caller maps this onto the
/// music-theory error class with the offending slot attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionError {
    /// The candidate set was empty
    NoCandidates,
    /// The weights summed to zero or were not finite
    DegenerateWeights,
}

/// Weighted random pitch selector
#[derive(Debug, Clone)]
pub struct PitchSelector {
    factor: f64,
    offset: f64,
}

impl Default for PitchSelector {
    fn default() -> Self {
        Self::new(DEFAULT_PROB_FACTOR, DEFAULT_PROB_OFFSET)
    }
}

impl PitchSelector {
    /// Create a selector with the given probability shape parameters
    pub fn new(factor: f64, offset: f64) -> Self {
        Self { factor, offset }
    }

    /// Normalized selection probabilities for each candidate relative to
    /// a previous pitch. Closer candidates weigh more.
    pub fn weights(&self, previous: Pitch, candidates: &[Pitch]) -> Vec<f64> {
        let raw: Vec<f64> = candidates
            .iter()
            .map(|&c| {
                let interval = previous.semitones_to(c).abs() as f64;
                (interval + self.offset).powf(-self.factor)
            })
            .collect();
        let total: f64 = raw.iter().sum();
        raw.iter().map(|w| w / total).collect()
    }

    /// Pick one candidate.
    ///
    /// Uniform when there is no previous pitch, interval-weighted
    /// otherwise.
    pub fn select(
        &self,
        rng: &mut StdRng,
        previous: Option<Pitch>,
        candidates: &[Pitch],
    ) -> Result<Pitch, SelectionError> {
        if candidates.is_empty() {
            return Err(SelectionError::NoCandidates);
        }

        let previous = match previous {
            Some(p) => p,
            None => {
                return candidates
                    .choose(rng)
                    .copied()
                    .ok_or(SelectionError::NoCandidates)
            }
        };

        let weights: Vec<f64> = candidates
            .iter()
            .map(|&c| {
                let interval = previous.semitones_to(c).abs() as f64;
                (interval + self.offset).powf(-self.factor)
            })
            .collect();

        let total: f64 = weights.iter().sum();
        if !total.is_finite() || total <= 0.0 {
            return Err(SelectionError::DegenerateWeights);
        }

        // Cumulative walk over the unnormalized weights
        let mut roll = rng.gen::<f64>() * total;
        for (i, &w) in weights.iter().enumerate() {
            roll -= w;
            if roll <= 0.0 {
                return Ok(candidates[i]);
            }
        }
        // Floating point residue lands on the last candidate
        Ok(candidates[candidates.len() - 1])
    }
}
