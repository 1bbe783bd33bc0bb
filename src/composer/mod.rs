// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! The melody composition engine.
//!
//! A [`Composer`] walks the song's sections over a chord timeline and
//! fills a melody timeline, using an injected pitch-selection strategy:
//! uniform chord-tone arpeggiation, interval-weighted selection, or
//! motif-based structural composition where a short idea is generated
//! once per section and then propagated through controlled variation.
//!
//! Composition is single-threaded, sequential, and deterministic for a
//! fixed seed: each composer owns its random stream and its timelines,
//! so independent runs never share state.

pub mod motif;
pub mod selector;
pub mod variation;

use std::fmt;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ComposeError, Result};
use crate::music::{Key, Pitch};
use crate::timeline::{ChordSlot, ChordTimeline, Melody, NoteEvent, SectionMarkers};

use motif::jitter_velocity;
use selector::PitchSelector;

pub use motif::Motif;

/// How the composer picks pitches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitchStrategy {
    /// Uniform choice among the slot's chord tones (a random arpeggiator)
    Uniform,
    /// Interval-weighted choice relative to the previous sounding note
    IntervalWeighted,
    /// Motif generation plus variation across song sections
    #[default]
    Motif,
}

/// Song sections, in fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Intro,
    Main1,
    Fill,
    Main2,
    Outro,
}

impl Section {
    /// The next section, or `None` past the outro
    pub fn next(self) -> Option<Section> {
        match self {
            Section::Intro => Some(Section::Main1),
            Section::Main1 => Some(Section::Fill),
            Section::Fill => Some(Section::Main2),
            Section::Main2 => Some(Section::Outro),
            Section::Outro => None,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Intro => "intro",
            Section::Main1 => "main1",
            Section::Fill => "fill",
            Section::Main2 => "main2",
            Section::Outro => "outro",
        };
        write!(f, "{name}")
    }
}

/// Read-only context shared by motif generation and variation: the key,
/// the possible-pitch set, and the instrument's note-generation knobs.
#[derive(Debug, Clone)]
pub struct SingContext {
    /// The active key
    pub key: Key,
    /// All in-key pitches within the sound range, low to high
    pub possible: Vec<Pitch>,
    /// Beats per chord slot (time signature numerator)
    pub beats_per_slot: u8,
    /// Note-rate choices (notes per whole note), drawn per motif
    pub speeds: Vec<u32>,
    /// Probability that an event is a rest instead of a note
    pub rand_trig: f64,
    /// Velocity jitter range around the base volume
    pub rand_vol: u8,
    /// Base volume (velocity) of generated notes
    pub volume: u8,
    /// Interval-weighted selector
    pub selector: PitchSelector,
}

/// Candidate pitches for a slot: possible-pitch set ∩ chord tones.
pub(crate) fn slot_candidates(ctx: &SingContext, slot: &ChordSlot) -> Vec<Pitch> {
    ctx.possible
        .iter()
        .filter(|p| slot.chord().contains(p.note))
        .copied()
        .collect()
}

/// Everything a composer needs, validated at construction.
#[derive(Debug, Clone)]
pub struct ComposerSettings {
    /// The key the melody is sung in
    pub key: Key,
    /// Chord progression, one symbol per slot
    pub chords: Vec<String>,
    /// Section boundary markers over chord-slot indices
    pub markers: SectionMarkers,
    /// Pitch-selection strategy
    pub strategy: PitchStrategy,
    /// Motif length in chord slots (motif strategy only)
    pub motif_length: usize,
    /// Chain each variation as the next motif seed
    pub continue_develop: bool,
    /// Beats per chord slot
    pub beats_per_slot: u8,
    /// Closed sound range (low, high), inclusive
    pub sound_range: (Pitch, Pitch),
    /// Note-rate choices
    pub speeds: Vec<u32>,
    /// Velocity jitter range
    pub rand_vol: u8,
    /// Rest probability per event
    pub rand_trig: f64,
    /// Base volume
    pub volume: u8,
    /// Interval-weight exponent
    pub prob_factor: f64,
    /// Interval-weight offset
    pub prob_offset: f64,
    /// Random seed; `None` seeds from entropy
    pub seed: Option<u64>,
}

/// The melody composer: owns the chord timeline, the possible-pitch set,
/// and its random stream.
#[derive(Debug)]
pub struct Composer {
    timeline: ChordTimeline,
    markers: SectionMarkers,
    strategy: PitchStrategy,
    motif_length: usize,
    continue_develop: bool,
    ctx: SingContext,
    rng: StdRng,
}

impl Composer {
    /// Validate settings and build a composer. All configuration errors
    /// surface here, before any generation runs.
    pub fn new(settings: ComposerSettings) -> Result<Self> {
        let timeline = ChordTimeline::parse(&settings.chords)?;
        if timeline.is_empty() {
            return Err(ComposeError::Config(
                "chord progression is empty".to_string(),
            ));
        }
        settings.markers.validate(timeline.len())?;

        if settings.volume > 127 {
            return Err(ComposeError::Config(format!(
                "invalid default volume: {}",
                settings.volume
            )));
        }
        if !(0.0..=1.0).contains(&settings.rand_trig) {
            return Err(ComposeError::Config(format!(
                "rand_trig must be within [0, 1], got {}",
                settings.rand_trig
            )));
        }
        if settings.speeds.is_empty() || settings.speeds.contains(&0) {
            return Err(ComposeError::Config(format!(
                "invalid speed choices: {:?}",
                settings.speeds
            )));
        }
        if settings.beats_per_slot == 0 {
            return Err(ComposeError::Config(
                "beats per slot must be positive".to_string(),
            ));
        }

        let (low, high) = settings.sound_range;
        let possible = settings.key.pitches_in_range(low, high);
        if possible.is_empty() {
            return Err(ComposeError::Config(format!(
                "sound range {low}..={high} contains no pitches in key {}",
                settings.key
            )));
        }

        if settings.strategy == PitchStrategy::Motif {
            let [b0, b1, b2, b3] = settings.markers.0;
            if b0 < 1 || b2 < 1 {
                return Err(ComposeError::Config(format!(
                    "main section markers must be at least 1: {:?}",
                    settings.markers.0
                )));
            }
            if settings.motif_length == 0 {
                return Err(ComposeError::Config(
                    "motif length must be positive".to_string(),
                ));
            }
            // Each section must have room for at least its seed motif
            if settings.motif_length > b1 - (b0 - 1) || settings.motif_length > b3 - (b2 - 1) {
                return Err(ComposeError::Config(format!(
                    "motif length {} does not fit the section spans of {:?}",
                    settings.motif_length, settings.markers.0
                )));
            }
        }

        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            timeline,
            markers: settings.markers,
            strategy: settings.strategy,
            motif_length: settings.motif_length,
            continue_develop: settings.continue_develop,
            ctx: SingContext {
                key: settings.key,
                possible,
                beats_per_slot: settings.beats_per_slot,
                speeds: settings.speeds,
                rand_trig: settings.rand_trig,
                rand_vol: settings.rand_vol,
                volume: settings.volume,
                selector: PitchSelector::new(settings.prob_factor, settings.prob_offset),
            },
            rng,
        })
    }

    /// The chord timeline this composer sings over
    pub fn timeline(&self) -> &ChordTimeline {
        &self.timeline
    }

    /// The possible-pitch set (in-key pitches within the sound range)
    pub fn possible_pitches(&self) -> &[Pitch] {
        &self.ctx.possible
    }

    /// Compose the full melody timeline.
    pub fn compose(&mut self) -> Result<Melody> {
        info!(strategy = ?self.strategy, slots = self.timeline.len(), "composing melody");
        let melody = match self.strategy {
            PitchStrategy::Uniform => self.sing_uniform()?,
            PitchStrategy::IntervalWeighted => self.sing_weighted()?,
            PitchStrategy::Motif => self.sing_sections()?,
        };
        info!(
            events = melody.len(),
            beats = melody.total_beats(),
            "melody complete"
        );
        Ok(melody)
    }

    /// Uniform chord-tone arpeggiation over every slot.
    fn sing_uniform(&mut self) -> Result<Melody> {
        let speed = self.draw_speed()?;
        let notes_per_slot = (speed as usize * self.ctx.beats_per_slot as usize) / 4;
        let beat_len = 4.0 / speed as f64;

        let mut melody = Melody::new();
        for slot in self.timeline.slots() {
            let candidates = slot_candidates(&self.ctx, slot);
            if candidates.is_empty() {
                return Err(ComposeError::MusicTheory {
                    slot: slot.index(),
                    chord: slot.chord().symbol().to_string(),
                    key: self.ctx.key.to_string(),
                    detail: "no singable pitches".to_string(),
                });
            }
            for _ in 0..notes_per_slot {
                if self.rng.gen::<f64>() < self.ctx.rand_trig {
                    melody.push(NoteEvent::Rest { beats: beat_len });
                    continue;
                }
                let pitch = self
                    .ctx
                    .selector
                    .select(&mut self.rng, None, &candidates)
                    .map_err(|_| ComposeError::MusicTheory {
                        slot: slot.index(),
                        chord: slot.chord().symbol().to_string(),
                        key: self.ctx.key.to_string(),
                        detail: "pitch selection failed".to_string(),
                    })?;
                let velocity = jitter_velocity(&mut self.rng, self.ctx.volume, self.ctx.rand_vol);
                melody.push(NoteEvent::Note {
                    pitch,
                    beats: beat_len,
                    velocity,
                });
            }
        }
        Ok(melody)
    }

    /// Interval-weighted singing straight through every slot. One motif
    /// spanning the whole progression, no sectioning.
    fn sing_weighted(&mut self) -> Result<Melody> {
        let slots = self.timeline.slots();
        let motif = motif::generate(&mut self.rng, slots, &self.ctx, None)?;
        let mut melody = Melody::new();
        melody.extend_from(motif.events());
        Ok(melody)
    }

    /// The section state machine: Intro → Main1 → Fill → Main2 → Outro.
    fn sing_sections(&mut self) -> Result<Melody> {
        let mut melody = Melody::new();
        let mut section = Section::Intro;
        loop {
            debug!(section = %section, "entering section");
            match section {
                Section::Intro => {
                    // A single rest up to the first usable chord slot
                    let (b0, _) = self.markers.main1();
                    let beats = ((b0 - 1) * self.ctx.beats_per_slot as usize) as f64;
                    if beats > 0.0 {
                        melody.push(NoteEvent::Rest { beats });
                    }
                }
                Section::Main1 => {
                    let (b0, b1) = self.markers.main1();
                    self.sing_section(&mut melody, b0 - 1, b1)?;
                }
                // The fill carries no dedicated generation; Main1's loop
                // bound already stops short of it
                Section::Fill => {}
                Section::Main2 => {
                    let (b2, b3) = self.markers.main2();
                    self.sing_section(&mut melody, b2 - 1, b3)?;
                }
                // Silence/hold, left to the accompaniment
                Section::Outro => {}
            }
            section = match section.next() {
                Some(next) => next,
                None => break,
            };
        }
        Ok(melody)
    }

    /// Generate one section: a seed motif anchored at `anchor`, then
    /// variations over successive non-overlapping windows while the
    /// window end stays strictly before `end`.
    fn sing_section(&mut self, melody: &mut Melody, anchor: usize, end: usize) -> Result<()> {
        let window = self.timeline.window(anchor, anchor + self.motif_length);
        let seed_motif = motif::generate(&mut self.rng, window, &self.ctx, melody.last_pitch())?;
        melody.extend_from(seed_motif.events());
        debug!(anchor, end, events = seed_motif.len(), "section motif generated");

        let mut seed = seed_motif;
        let mut start = anchor + self.motif_length;
        let mut variations = 0usize;
        while start + self.motif_length < end {
            let window = self.timeline.window(start, start + self.motif_length);
            let varied = variation::vary(&mut self.rng, &seed, window, &self.ctx)?;
            melody.extend_from(varied.events());
            if self.continue_develop {
                seed = varied;
            }
            start += self.motif_length;
            variations += 1;
        }
        debug!(variations, "section complete");
        Ok(())
    }

    fn draw_speed(&mut self) -> Result<u32> {
        self.ctx
            .speeds
            .choose(&mut self.rng)
            .copied()
            .ok_or_else(|| ComposeError::Config("instrument has no speed choices".to_string()))
    }
}
