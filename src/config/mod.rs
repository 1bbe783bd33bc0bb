// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration system for Cantor.
//!
//! A song file holds the key, tempo, chord progression, section markers,
//! and the singer settings; instruments carry per-voice sound ranges and
//! note-generation knobs. Built-in instruments can be overridden or
//! extended from the song file itself.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::composer::{ComposerSettings, PitchStrategy};
use crate::error::ComposeError;
use crate::music::{Key, Pitch};
use crate::timeline::SectionMarkers;

/// Root configuration for a song
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SongFile {
    /// Song metadata and harmonic material
    pub song: SongConfig,
    /// Singer (melody generator) settings
    #[serde(default)]
    pub singer: SingerConfig,
    /// Instrument overrides and additions, keyed by name
    #[serde(default)]
    pub instruments: HashMap<String, InstrumentConfig>,
}

impl SongFile {
    /// Load a song configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read song file: {:?}", path.as_ref()))?;
        Self::from_yaml(&contents)
    }

    /// Parse a song configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    /// Resolve the configured instrument against the built-in table and
    /// any file-level overrides.
    pub fn instrument(&self) -> std::result::Result<InstrumentConfig, ComposeError> {
        let name = &self.singer.instrument;
        if let Some(inst) = self.instruments.get(name) {
            return Ok(inst.clone());
        }
        builtin_instruments()
            .remove(name.as_str())
            .ok_or_else(|| ComposeError::Config(format!("unsupported instrument: {name}")))
    }

    /// Validate and convert into composer settings.
    pub fn to_settings(
        &self,
        seed: Option<u64>,
    ) -> std::result::Result<ComposerSettings, ComposeError> {
        let song = &self.song;

        if !(40..=250).contains(&song.tempo) {
            return Err(ComposeError::Config(format!(
                "invalid tempo value: {}",
                song.tempo
            )));
        }

        let key = Key::parse(&song.key, &song.scale).ok_or_else(|| {
            ComposeError::Config(format!("unsupported key: {} {}", song.key, song.scale))
        })?;

        let instrument = self.instrument()?;
        let low = Pitch::from_str(&instrument.sound_range[0]).ok_or_else(|| {
            ComposeError::Config(format!("bad sound range pitch: {}", instrument.sound_range[0]))
        })?;
        let high = Pitch::from_str(&instrument.sound_range[1]).ok_or_else(|| {
            ComposeError::Config(format!("bad sound range pitch: {}", instrument.sound_range[1]))
        })?;

        Ok(ComposerSettings {
            key,
            chords: song.chords.clone(),
            markers: SectionMarkers(song.sections),
            strategy: self.singer.strategy,
            motif_length: self.singer.motif_length,
            continue_develop: self.singer.continue_develop,
            beats_per_slot: song.beats_per_bar,
            sound_range: (low, high),
            speeds: instrument.speed.clone(),
            rand_vol: instrument.rand_vol,
            rand_trig: instrument.rand_trig,
            volume: self.singer.volume,
            prob_factor: self.singer.prob_factor,
            prob_offset: self.singer.prob_offset,
            seed,
        })
    }
}

/// Song-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SongConfig {
    /// Song name
    pub name: String,
    /// Tempo in BPM (40-250)
    #[serde(default = "default_tempo")]
    pub tempo: u16,
    /// Musical key root (e.g., "C", "D", "F#")
    #[serde(default = "default_key")]
    pub key: String,
    /// Scale type (e.g., "major", "minor", "dorian")
    #[serde(default = "default_scale")]
    pub scale: String,
    /// Beats per bar (time signature numerator); one bar = one chord slot
    #[serde(default = "default_beats_per_bar")]
    pub beats_per_bar: u8,
    /// Chord progression, one symbol per slot
    pub chords: Vec<String>,
    /// Section boundary markers over chord-slot indices
    pub sections: [usize; 4],
}

fn default_tempo() -> u16 {
    110
}
fn default_key() -> String {
    "C".to_string()
}
fn default_scale() -> String {
    "major".to_string()
}
fn default_beats_per_bar() -> u8 {
    4
}

/// Singer configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SingerConfig {
    /// Instrument name (built-in table or file-level override)
    #[serde(default = "default_instrument")]
    pub instrument: String,
    /// Pitch-selection strategy
    #[serde(default)]
    pub strategy: PitchStrategy,
    /// Base volume (MIDI velocity, 0-127)
    #[serde(default = "default_volume")]
    pub volume: u8,
    /// Motif length in chord slots
    #[serde(default = "default_motif_length")]
    pub motif_length: usize,
    /// Chain each variation as the next motif seed
    #[serde(default)]
    pub continue_develop: bool,
    /// Interval-weight exponent; bigger prefers closer notes harder
    #[serde(default = "default_prob_factor")]
    pub prob_factor: f64,
    /// Interval-weight offset
    #[serde(default = "default_prob_offset")]
    pub prob_offset: f64,
}

fn default_instrument() -> String {
    "violin".to_string()
}
fn default_volume() -> u8 {
    90
}
fn default_motif_length() -> usize {
    4
}
fn default_prob_factor() -> f64 {
    2.0
}
fn default_prob_offset() -> f64 {
    5.0
}

impl Default for SingerConfig {
    fn default() -> Self {
        Self {
            instrument: default_instrument(),
            strategy: PitchStrategy::default(),
            volume: default_volume(),
            motif_length: default_motif_length(),
            continue_develop: false,
            prob_factor: default_prob_factor(),
            prob_offset: default_prob_offset(),
        }
    }
}

/// Per-instrument note-generation settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstrumentConfig {
    /// Closed sound range, low and high pitch names (e.g., ["C4", "G5"])
    pub sound_range: [String; 2],
    /// Note-rate choices (notes per whole note), usually powers of two
    #[serde(default = "default_speeds")]
    pub speed: Vec<u32>,
    /// Velocity jitter range (0-127)
    #[serde(default = "default_rand_vol")]
    pub rand_vol: u8,
    /// Probability of an event being a rest (0 triggers all notes,
    /// 1 mutes everything)
    #[serde(default = "default_rand_trig")]
    pub rand_trig: f64,
    /// General MIDI program number for export
    #[serde(default)]
    pub program: u8,
}

fn default_speeds() -> Vec<u32> {
    vec![4, 8, 16]
}
fn default_rand_vol() -> u8 {
    10
}
fn default_rand_trig() -> f64 {
    0.2
}

/// The built-in instrument table
pub fn builtin_instruments() -> HashMap<String, InstrumentConfig> {
    let mut table = HashMap::new();
    table.insert(
        "violin".to_string(),
        InstrumentConfig {
            sound_range: ["G3".to_string(), "A6".to_string()],
            speed: default_speeds(),
            rand_vol: default_rand_vol(),
            rand_trig: default_rand_trig(),
            program: 40,
        },
    );
    table.insert(
        "flute".to_string(),
        InstrumentConfig {
            sound_range: ["C4".to_string(), "C7".to_string()],
            speed: vec![8, 16],
            rand_vol: default_rand_vol(),
            rand_trig: 0.15,
            program: 73,
        },
    );
    table.insert(
        "piano".to_string(),
        InstrumentConfig {
            sound_range: ["C3".to_string(), "C6".to_string()],
            speed: default_speeds(),
            rand_vol: default_rand_vol(),
            rand_trig: default_rand_trig(),
            program: 0,
        },
    );
    table.insert(
        "tenor_saxophone".to_string(),
        InstrumentConfig {
            sound_range: ["C3".to_string(), "G5".to_string()],
            speed: vec![4, 8],
            rand_vol: 15,
            rand_trig: 0.25,
            program: 66,
        },
    );
    table
}
