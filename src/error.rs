// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error taxonomy for melody composition.
//!
//! Configuration errors surface at construction time, before any
//! generation runs. Music-theory and candidate-exhaustion errors surface
//! during generation and abort the composition; there is no partial-output
//! contract and no retry policy, since every error here is deterministic
//! for a given seed and input.

use thiserror::Error;

/// Errors produced while configuring or running a composition.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// Invalid configuration (tempo, volume, section markers, instrument).
    /// Raised at construction, fatal to that composer instance.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A chord symbol that the parser does not recognize.
    #[error("unrecognized chord symbol: {symbol:?}")]
    ChordParse { symbol: String },

    /// No singable pitches for a chord slot, or degenerate selection
    /// weights. Names the offending slot and key so the caller can fix
    /// the progression or the sound range.
    #[error("music theory error at slot {slot} (chord {chord}, key {key}): {detail}")]
    MusicTheory {
        slot: usize,
        chord: String,
        key: String,
        detail: String,
    },

    /// Nearest-pitch search ran out of candidates during variation.
    #[error("no candidate pitches left near {target}")]
    CandidateExhausted { target: String },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ComposeError>;
