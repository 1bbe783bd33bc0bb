// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Timeline data model: note events, the melody timeline, chord slots,
//! and song-section boundary markers.
//!
//! The melody timeline is append-only; events are immutable values once
//! appended. Chord slots are built once from the configured progression
//! and read-only thereafter.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ComposeError;
use crate::music::{Chord, Pitch};

/// A single pitched or silent event on the melody timeline.
///
/// Durations are in beats (quarter notes). Velocity follows the MIDI
/// convention, 0-127.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoteEvent {
    /// A sounding note
    Note {
        pitch: Pitch,
        beats: f64,
        velocity: u8,
    },
    /// Silence
    Rest { beats: f64 },
}

impl NoteEvent {
    /// Duration in beats
    pub fn beats(&self) -> f64 {
        match *self {
            NoteEvent::Note { beats, .. } => beats,
            NoteEvent::Rest { beats } => beats,
        }
    }

    /// The pitch, if this event sounds
    pub fn pitch(&self) -> Option<Pitch> {
        match *self {
            NoteEvent::Note { pitch, .. } => Some(pitch),
            NoteEvent::Rest { .. } => None,
        }
    }

    /// Whether this event is a rest
    pub fn is_rest(&self) -> bool {
        matches!(self, NoteEvent::Rest { .. })
    }
}

impl fmt::Display for NoteEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteEvent::Note {
                pitch,
                beats,
                velocity,
            } => write!(f, "{pitch} ({beats} beats, vel {velocity})"),
            NoteEvent::Rest { beats } => write!(f, "rest ({beats} beats)"),
        }
    }
}

/// The ordered concatenation of all generated events: the output artifact.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Melody {
    events: Vec<NoteEvent>,
}

impl Melody {
    /// Create an empty melody
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one event
    pub fn push(&mut self, event: NoteEvent) {
        self.events.push(event);
    }

    /// Append a run of events
    pub fn extend_from(&mut self, events: &[NoteEvent]) {
        self.events.extend_from_slice(events);
    }

    /// All events, in order
    pub fn events(&self) -> &[NoteEvent] {
        &self.events
    }

    /// The most recent *sounding* pitch, looking back past rests.
    pub fn last_pitch(&self) -> Option<Pitch> {
        self.events.iter().rev().find_map(|e| e.pitch())
    }

    /// Total duration in beats
    pub fn total_beats(&self) -> f64 {
        self.events.iter().map(|e| e.beats()).sum()
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the melody holds no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// One harmonic unit of time (one measure-equivalent) carrying a chord.
#[derive(Debug, Clone, PartialEq)]
pub struct ChordSlot {
    index: usize,
    chord: Chord,
}

impl ChordSlot {
    /// Slot position within the progression
    pub fn index(&self) -> usize {
        self.index
    }

    /// The chord sounding in this slot
    pub fn chord(&self) -> &Chord {
        &self.chord
    }
}

/// The full harmonic timeline: one chord slot per progression entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ChordTimeline {
    slots: Vec<ChordSlot>,
}

impl ChordTimeline {
    /// Parse a chord progression into slots. Fails on the first
    /// unrecognized symbol.
    pub fn parse(progression: &[String]) -> Result<Self, ComposeError> {
        let slots = progression
            .iter()
            .enumerate()
            .map(|(index, symbol)| {
                Chord::parse(symbol).map(|chord| ChordSlot { index, chord })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { slots })
    }

    /// Number of chord slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the progression is empty
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All slots in order
    pub fn slots(&self) -> &[ChordSlot] {
        &self.slots
    }

    /// The slots covering `[start, end)`
    pub fn window(&self, start: usize, end: usize) -> &[ChordSlot] {
        &self.slots[start..end]
    }
}

/// Four non-decreasing chord-slot indices delimiting the song sections
/// Intro / Main-1 / Fill / Main-2 / Outro.
///
/// `markers[0]` is where melodic generation begins; everything before it
/// is filled with a single rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionMarkers(pub [usize; 4]);

impl SectionMarkers {
    /// Validate the markers against a progression of `slot_count` slots.
    ///
    /// Non-decreasing and bounded by the slot count, checked before any
    /// generation runs.
    pub fn validate(&self, slot_count: usize) -> Result<(), ComposeError> {
        let m = self.0;
        if m.windows(2).any(|w| w[1] < w[0]) {
            return Err(ComposeError::Config(format!(
                "section markers must be non-decreasing: {m:?}"
            )));
        }
        if m.iter().any(|&v| v > slot_count) {
            return Err(ComposeError::Config(format!(
                "section markers {m:?} exceed chord progression length {slot_count}"
            )));
        }
        Ok(())
    }

    /// The Main-1 generation region: anchor slot and exclusive bound
    pub fn main1(&self) -> (usize, usize) {
        (self.0[0], self.0[1])
    }

    /// The Main-2 generation region: anchor slot and exclusive bound
    pub fn main2(&self) -> (usize, usize) {
        (self.0[2], self.0[3])
    }
}
