// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Motif variation.
//!
//! Derives a new motif from an existing one by mutating a random subset
//! of its notes. Mutation probability grows with position in the motif,
//! so the idea drifts as it develops. Four mutation rules are chosen
//! uniformly per marked note:
//!
//! 0. chord-tone toggle: move onto the sounding chord if off it, to the
//!    nearest other in-key pitch if on it
//! 1. passing tone: approximate the midpoint of the surrounding notes
//! 2. echo: copy the next sounding pitch verbatim
//! 3. snap to the key's tonic triad (degrees 1, 3, 5)

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use super::motif::Motif;
use super::{slot_candidates, SingContext};
use crate::error::{ComposeError, Result};
use crate::music::Pitch;
use crate::timeline::{ChordSlot, NoteEvent};

/// Bounds for the per-call position-curve base (>1 so the curve rises)
const BASE_RANGE: std::ops::RangeInclusive<f64> = 2.0..=16.0;
/// Bounds for the per-call position-curve offset (>0)
const OFFSET_RANGE: std::ops::RangeInclusive<f64> = 0.5..=2.0;

/// Position-weighted mutation probabilities for a motif of `n` events.
///
/// `p(i) = base^((i+1+offset)/n) / (max_i + offset)`, monotone
/// non-decreasing in `i` for `base > 1`, always within `[0, 1]`.
pub fn position_probabilities(n: usize, base: f64, offset: f64) -> Vec<f64> {
    let max = base.powf((n as f64 + offset) / n as f64);
    (0..n)
        .map(|i| base.powf((i as f64 + 1.0 + offset) / n as f64) / (max + offset))
        .collect()
}

/// Derive a variation of `motif` over the chord slots it will cover.
///
/// Returns a new motif; the input is never touched. Rests are skipped
/// silently. Errors surface when a mutation rule runs out of candidate
/// pitches, a fatal mismatch between the progression and the sound range.
pub fn vary(
    rng: &mut StdRng,
    motif: &Motif,
    slots: &[ChordSlot],
    ctx: &SingContext,
) -> Result<Motif> {
    let mut varied = motif.clone();
    let n = varied.len();
    if n == 0 {
        return Ok(varied);
    }

    // Fresh curve shape per call
    let base = rng.gen_range(BASE_RANGE);
    let offset = rng.gen_range(OFFSET_RANGE);
    let probs = position_probabilities(n, base, offset);

    let mut marked: Vec<usize> = (0..n).filter(|&i| rng.gen::<f64>() < probs[i]).collect();
    // Shuffled order, so later mutations can see earlier ones in this pass
    marked.shuffle(rng);

    for i in marked {
        let Some(pitch) = varied.events()[i].pitch() else {
            continue; // rests are never mutated
        };

        let new_pitch = match rng.gen_range(0..4u8) {
            0 => Some(toggle_chord_tone(&varied, i, pitch, slots, ctx)?),
            1 => passing_tone(&varied, i, pitch, ctx)?,
            2 => echo_next(&varied, i),
            _ => Some(snap_to_triad(pitch, ctx)?),
        };

        if let Some(p) = new_pitch {
            varied.set_pitch(i, p);
        }
    }

    Ok(varied)
}

/// Rule 0: push the note onto the sounding chord if it is off it; if it
/// is already on it, move to the nearest other in-key pitch.
fn toggle_chord_tone(
    motif: &Motif,
    index: usize,
    pitch: Pitch,
    slots: &[ChordSlot],
    ctx: &SingContext,
) -> Result<Pitch> {
    let slot = &slots[index / motif.notes_per_slot()];
    let candidates = if slot.chord().contains(pitch.note) {
        ctx.possible.clone()
    } else {
        slot_candidates(ctx, slot)
    };
    nearest_pitch(pitch, &candidates)
}

/// Rule 1: replace with the in-key pitch nearest the midpoint of the
/// surrounding sounding notes. Skips when either neighbor is missing.
fn passing_tone(
    motif: &Motif,
    index: usize,
    pitch: Pitch,
    ctx: &SingContext,
) -> Result<Option<Pitch>> {
    let before = previous_sounding(motif.events(), index);
    let after = next_sounding(motif.events(), index);
    let (Some(before), Some(after)) = (before, after) else {
        return Ok(None);
    };

    let midpoint = (before.midi_number() + after.midi_number()) as f64 / 2.0;
    nearest_to_value(pitch, midpoint, &ctx.possible).map(Some)
}

/// Rule 2: copy the next sounding pitch verbatim. Skips at the tail.
fn echo_next(motif: &Motif, index: usize) -> Option<Pitch> {
    next_sounding(motif.events(), index)
}

/// Rule 3: snap to the nearest in-range pitch on the tonic triad.
fn snap_to_triad(pitch: Pitch, ctx: &SingContext) -> Result<Pitch> {
    let triad = ctx.key.tonic_triad();
    let candidates: Vec<Pitch> = ctx
        .possible
        .iter()
        .filter(|p| triad.contains(&p.note))
        .copied()
        .collect();
    nearest_pitch(pitch, &candidates)
}

/// The nearest sounding pitch before `index`, skipping rests
fn previous_sounding(events: &[NoteEvent], index: usize) -> Option<Pitch> {
    events[..index].iter().rev().find_map(|e| e.pitch())
}

/// The nearest sounding pitch after `index`, skipping rests
fn next_sounding(events: &[NoteEvent], index: usize) -> Option<Pitch> {
    events[index + 1..].iter().find_map(|e| e.pitch())
}

/// Candidate with the minimum absolute semitone distance to `target`.
///
/// The target itself is removed from consideration so the mutation
/// always changes the pitch; ties go to the first occurrence.
fn nearest_pitch(target: Pitch, candidates: &[Pitch]) -> Result<Pitch> {
    let mut best: Option<(i32, Pitch)> = None;
    for &c in candidates {
        if c == target {
            continue;
        }
        let dist = target.semitones_to(c).abs();
        if best.map_or(true, |(d, _)| dist < d) {
            best = Some((dist, c));
        }
    }
    best.map(|(_, p)| p).ok_or(ComposeError::CandidateExhausted {
        target: target.to_string(),
    })
}

/// Candidate nearest an absolute pitch value, excluding `exclude`
fn nearest_to_value(exclude: Pitch, value: f64, candidates: &[Pitch]) -> Result<Pitch> {
    let mut best: Option<(f64, Pitch)> = None;
    for &c in candidates {
        if c == exclude {
            continue;
        }
        let dist = (c.midi_number() as f64 - value).abs();
        if best.map_or(true, |(d, _)| dist < d) {
            best = Some((dist, c));
        }
    }
    best.map(|(_, p)| p).ok_or(ComposeError::CandidateExhausted {
        target: exclude.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::motif::generate;
    use crate::composer::test_support::test_context;
    use crate::music::Note;
    use crate::timeline::ChordTimeline;
    use rand::SeedableRng;

    fn timeline(symbols: &[&str]) -> ChordTimeline {
        let symbols: Vec<String> = symbols.iter().map(|s| s.to_string()).collect();
        ChordTimeline::parse(&symbols).unwrap()
    }

    #[test]
    fn test_position_probabilities_monotone() {
        for &(base, offset) in &[(2.0, 0.5), (16.0, 1.0), (4.0, 2.0)] {
            let probs = position_probabilities(16, base, offset);
            assert_eq!(probs.len(), 16);
            for w in probs.windows(2) {
                assert!(w[0] <= w[1], "not monotone for base={base} offset={offset}");
            }
            assert!(probs[0] >= 0.0 && probs[0] <= 1.0);
            assert!(probs[15] >= 0.0 && probs[15] <= 1.0);
        }
    }

    #[test]
    fn test_vary_leaves_original_untouched() {
        let ctx = test_context();
        let timeline = timeline(&["C", "G"]);
        let mut rng = StdRng::seed_from_u64(21);

        let motif = generate(&mut rng, timeline.slots(), &ctx, None).unwrap();
        let snapshot = motif.clone();

        let _variation = vary(&mut rng, &motif, timeline.slots(), &ctx).unwrap();
        assert_eq!(motif, snapshot);
    }

    #[test]
    fn test_vary_preserves_shape() {
        let ctx = test_context();
        let timeline = timeline(&["C", "G"]);
        let mut rng = StdRng::seed_from_u64(33);

        let motif = generate(&mut rng, timeline.slots(), &ctx, None).unwrap();
        let variation = vary(&mut rng, &motif, timeline.slots(), &ctx).unwrap();

        // Same event count; rests stay rests, notes stay notes, durations
        // and velocities survive mutation
        assert_eq!(variation.len(), motif.len());
        for (a, b) in motif.events().iter().zip(variation.events()) {
            assert_eq!(a.is_rest(), b.is_rest());
            assert!((a.beats() - b.beats()).abs() < 1e-9);
            if let (
                NoteEvent::Note { velocity: va, .. },
                NoteEvent::Note { velocity: vb, .. },
            ) = (a, b)
            {
                assert_eq!(va, vb);
            }
        }
    }

    #[test]
    fn test_vary_pitches_stay_in_possible_set() {
        let ctx = test_context();
        let timeline = timeline(&["C", "Am"]);
        let mut rng = StdRng::seed_from_u64(8);

        let motif = generate(&mut rng, timeline.slots(), &ctx, None).unwrap();
        for _ in 0..20 {
            let variation = vary(&mut rng, &motif, timeline.slots(), &ctx).unwrap();
            for event in variation.events() {
                if let Some(p) = event.pitch() {
                    assert!(ctx.possible.contains(&p), "{p} escaped the sound range");
                }
            }
        }
    }

    #[test]
    fn test_nearest_pitch_excludes_target() {
        let c4 = Pitch::new(Note::C, 4);
        let d4 = Pitch::new(Note::D, 4);
        let e4 = Pitch::new(Note::E, 4);

        // The target itself never wins, even when present
        assert_eq!(nearest_pitch(c4, &[c4, d4, e4]).unwrap(), d4);

        // Tie between D4 (distance 2 up) and A#3 (distance 2 down):
        // first occurrence wins
        let as3 = Pitch::new(Note::As, 3);
        assert_eq!(nearest_pitch(c4, &[as3, d4]).unwrap(), as3);

        // Only the target left: candidate exhaustion
        let err = nearest_pitch(c4, &[c4]).unwrap_err();
        assert!(matches!(err, ComposeError::CandidateExhausted { .. }));
    }

    #[test]
    fn test_nearest_to_value() {
        let possible: Vec<Pitch> = (60..=72).map(Pitch::from_midi_number).collect();
        let exclude = Pitch::from_midi_number(65);

        let p = nearest_to_value(exclude, 64.9, &possible).unwrap();
        // 65 is excluded, so 64 is nearest to 64.9
        assert_eq!(p.midi_number(), 64);
    }

    #[test]
    fn test_snap_to_triad_lands_on_triad() {
        let ctx = test_context();
        let triad = ctx.key.tonic_triad();
        let pitch = Pitch::new(Note::D, 4);

        let snapped = snap_to_triad(pitch, &ctx).unwrap();
        assert!(triad.contains(&snapped.note));
        assert!(ctx.possible.contains(&snapped));
    }
}
