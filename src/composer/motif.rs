// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Motif generation.
//!
//! A motif is a short ordered run of note/rest events spanning a fixed
//! number of chord slots. The note rate ("speed", notes per whole note)
//! is drawn once per motif and fixed for its whole length; each note's
//! pitch comes from the interval-weighted selector over the chord-tone
//! candidates of the slot sounding under it.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use super::{slot_candidates, SingContext};
use crate::error::{ComposeError, Result};
use crate::music::Pitch;
use crate::timeline::{ChordSlot, NoteEvent};

/// A short melodic idea: the seed material for one song section.
///
/// Motifs are values; variation clones them and never mutates the
/// original in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Motif {
    events: Vec<NoteEvent>,
    notes_per_slot: usize,
}

impl Motif {
    pub(crate) fn new(events: Vec<NoteEvent>, notes_per_slot: usize) -> Self {
        Self {
            events,
            notes_per_slot,
        }
    }

    /// The events of this motif, in order
    pub fn events(&self) -> &[NoteEvent] {
        &self.events
    }

    /// How many events cover one chord slot
    pub fn notes_per_slot(&self) -> usize {
        self.notes_per_slot
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the motif holds no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Replace the pitch of the event at `index`, keeping duration and
    /// velocity. No-op on rests.
    pub(crate) fn set_pitch(&mut self, index: usize, new_pitch: Pitch) {
        if let NoteEvent::Note { pitch, .. } = &mut self.events[index] {
            *pitch = new_pitch;
        }
    }
}

/// Base volume plus bounded random jitter, clamped to the MIDI range.
pub(crate) fn jitter_velocity(rng: &mut StdRng, volume: u8, rand_vol: u8) -> u8 {
    let jitter = (rand_vol as f64 * (2.0 * rng.gen::<f64>() - 1.0)) as i16;
    (volume as i16 + jitter).clamp(0, 127) as u8
}

/// Generate one motif over the given chord slots.
///
/// `previous` is the last sounding pitch of the melody so far (rests do
/// not count); it anchors the interval weighting of the motif's first
/// note.
pub fn generate(
    rng: &mut StdRng,
    slots: &[ChordSlot],
    ctx: &SingContext,
    previous: Option<Pitch>,
) -> Result<Motif> {
    let speed = ctx
        .speeds
        .choose(rng)
        .copied()
        .ok_or_else(|| ComposeError::Config("instrument has no speed choices".to_string()))?;

    let notes_per_slot = (speed as usize * ctx.beats_per_slot as usize) / 4;
    let beat_len = 4.0 / speed as f64;

    let mut events = Vec::with_capacity(notes_per_slot * slots.len());
    let mut previous = previous;

    for slot in slots {
        let candidates = slot_candidates(ctx, slot);
        if candidates.is_empty() {
            return Err(ComposeError::MusicTheory {
                slot: slot.index(),
                chord: slot.chord().symbol().to_string(),
                key: ctx.key.to_string(),
                detail: "no singable pitches".to_string(),
            });
        }

        for _ in 0..notes_per_slot {
            if rng.gen::<f64>() < ctx.rand_trig {
                events.push(NoteEvent::Rest { beats: beat_len });
                continue;
            }

            let pitch = ctx
                .selector
                .select(rng, previous, &candidates)
                .map_err(|_| ComposeError::MusicTheory {
                    slot: slot.index(),
                    chord: slot.chord().symbol().to_string(),
                    key: ctx.key.to_string(),
                    detail: "weighted pitch selection failed".to_string(),
                })?;

            events.push(NoteEvent::Note {
                pitch,
                beats: beat_len,
                velocity: jitter_velocity(rng, ctx.volume, ctx.rand_vol),
            });
            previous = Some(pitch);
        }
    }

    Ok(Motif::new(events, notes_per_slot))
}
