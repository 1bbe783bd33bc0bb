// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Cantor: algorithmic melody composition over chord progressions.
//!
//! Given a key, a chord progression, and section boundary markers, the
//! composer produces a melody timeline of pitched note and rest events
//! with duration and velocity, using chord-tone-aware weighted pitch
//! selection and motif-based structural development. The result can be
//! serialized to a Standard MIDI File.

pub mod composer;
pub mod config;
pub mod error;
pub mod midi;
pub mod music;
pub mod timeline;

pub use composer::{Composer, ComposerSettings, PitchStrategy};
pub use config::SongFile;
pub use error::ComposeError;
pub use timeline::{Melody, NoteEvent, SectionMarkers};
