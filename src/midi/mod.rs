// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! MIDI file output.
//!
//! Serializes a composed melody timeline to a Standard MIDI File using
//! the `midly` crate. The melody is monophonic, so a single track with
//! sequential note on/off pairs suffices; rests become delta-time gaps.

use std::path::Path;

use anyhow::{Context, Result};
use midly::{
    num::{u15, u24, u28, u4, u7},
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
};

use crate::timeline::{Melody, NoteEvent};

/// Ticks per quarter note in MIDI output
pub const TICKS_PER_QUARTER: u16 = 480;

/// Duration in ticks for an event lasting `beats` quarter notes
fn beats_to_ticks(beats: f64) -> u32 {
    (beats * TICKS_PER_QUARTER as f64).round() as u32
}

/// Convert a melody to an in-memory SMF.
///
/// `tempo` is in BPM; `program` is the General MIDI program for the
/// melody voice.
pub fn melody_to_smf(melody: &Melody, tempo: u16, program: u8) -> Smf<'static> {
    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    let mut track: Track<'static> = Vec::new();

    let microseconds_per_beat = 60_000_000 / tempo.max(1) as u32;
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(microseconds_per_beat))),
    });
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Midi {
            channel: u4::new(0),
            message: MidiMessage::ProgramChange {
                program: u7::new(program.min(127)),
            },
        },
    });

    // Rests accumulate into the delta of the next note-on
    let mut pending_delta: u32 = 0;
    for event in melody.events() {
        let ticks = beats_to_ticks(event.beats());
        match *event {
            NoteEvent::Rest { .. } => pending_delta += ticks,
            NoteEvent::Note {
                pitch, velocity, ..
            } => {
                let key = u7::new(pitch.midi_number().clamp(0, 127) as u8);
                track.push(TrackEvent {
                    delta: u28::new(pending_delta),
                    kind: TrackEventKind::Midi {
                        channel: u4::new(0),
                        message: MidiMessage::NoteOn {
                            key,
                            vel: u7::new(velocity.min(127)),
                        },
                    },
                });
                track.push(TrackEvent {
                    delta: u28::new(ticks),
                    kind: TrackEventKind::Midi {
                        channel: u4::new(0),
                        message: MidiMessage::NoteOff {
                            key,
                            vel: u7::new(0),
                        },
                    },
                });
                pending_delta = 0;
            }
        }
    }

    track.push(TrackEvent {
        delta: u28::new(pending_delta),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    smf.tracks.push(track);
    smf
}

/// Convert a melody to MIDI and write it to a file.
pub fn write_midi(melody: &Melody, tempo: u16, program: u8, path: &Path) -> Result<()> {
    let smf = melody_to_smf(melody, tempo, program);
    let mut buf = Vec::new();
    smf.write(&mut buf)
        .map_err(|e| anyhow::anyhow!("failed to encode MIDI file: {e}"))?;
    std::fs::write(path, &buf).with_context(|| format!("Failed to write MIDI file: {path:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::{Note, Pitch};

    fn sample_melody() -> Melody {
        let mut melody = Melody::new();
        melody.push(NoteEvent::Rest { beats: 4.0 });
        melody.push(NoteEvent::Note {
            pitch: Pitch::new(Note::C, 4),
            beats: 0.5,
            velocity: 90,
        });
        melody.push(NoteEvent::Note {
            pitch: Pitch::new(Note::E, 4),
            beats: 0.5,
            velocity: 85,
        });
        melody
    }

    #[test]
    fn test_smf_structure() {
        let smf = melody_to_smf(&sample_melody(), 120, 40);

        assert_eq!(smf.header.format, Format::SingleTrack);
        assert_eq!(smf.tracks.len(), 1);

        let track = &smf.tracks[0];
        // tempo + program + 2 notes * (on + off) + end of track
        assert_eq!(track.len(), 7);

        // The leading rest becomes the first note-on's delta
        let first_on = &track[2];
        assert_eq!(first_on.delta.as_int(), 4 * TICKS_PER_QUARTER as u32);
        match first_on.kind {
            TrackEventKind::Midi {
                message: MidiMessage::NoteOn { key, vel },
                ..
            } => {
                assert_eq!(key.as_int(), 60);
                assert_eq!(vel.as_int(), 90);
            }
            ref other => panic!("expected note on, got {other:?}"),
        }

        // Eighth note duration
        let first_off = &track[3];
        assert_eq!(first_off.delta.as_int(), TICKS_PER_QUARTER as u32 / 2);
    }

    #[test]
    fn test_write_and_reparse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("melody.mid");

        write_midi(&sample_melody(), 110, 40, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let smf = Smf::parse(&bytes).unwrap();
        assert_eq!(smf.tracks.len(), 1);
        assert_eq!(
            smf.header.timing,
            Timing::Metrical(u15::new(TICKS_PER_QUARTER))
        );
    }
}
