// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Music theory components: scales, keys, pitches, and chord symbols.

pub mod chord;
pub mod scale;

pub use chord::{Chord, ChordQuality};
pub use scale::{Key, Note, Pitch, Scale, ScaleType};
