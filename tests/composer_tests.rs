// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Integration tests for Cantor
//!
//! These exercise the public API end to end: configuration, section
//! composition, and MIDI export.

use cantor::composer::{Composer, ComposerSettings, PitchStrategy};
use cantor::music::{Key, Note, Pitch, ScaleType};
use cantor::timeline::{NoteEvent, SectionMarkers};
use cantor::{ComposeError, SongFile};

const SIXTEEN_IN_C: [&str; 16] = [
    "C", "Am", "F", "G7", "C", "Am", "F", "G7", "C", "Am", "F", "G7", "C", "Am", "F", "G7",
];

/// Settings matching the reference scenario: 16 slots in C, motif length
/// 2, markers [5, 8, 9, 13], a single fixed speed so event counts are
/// deterministic.
fn scenario_settings(seed: u64) -> ComposerSettings {
    ComposerSettings {
        key: Key::new(Note::C, ScaleType::Major),
        chords: SIXTEEN_IN_C.iter().map(|s| s.to_string()).collect(),
        markers: SectionMarkers([5, 8, 9, 13]),
        strategy: PitchStrategy::Motif,
        motif_length: 2,
        continue_develop: false,
        beats_per_slot: 4,
        sound_range: (Pitch::new(Note::C, 4), Pitch::new(Note::G, 5)),
        speeds: vec![8],
        rand_vol: 10,
        rand_trig: 0.2,
        volume: 90,
        prob_factor: 2.0,
        prob_offset: 5.0,
        seed: Some(seed),
    }
}

#[test]
fn test_end_to_end_section_structure() {
    let mut composer = Composer::new(scenario_settings(42)).unwrap();
    let melody = composer.compose().unwrap();

    // Intro: one rest spanning (5 - 1) * 4 = 16 beats
    match melody.events()[0] {
        NoteEvent::Rest { beats } => assert!((beats - 16.0).abs() < 1e-9),
        ref other => panic!("expected intro rest, got {other}"),
    }

    // With speed 8 each slot carries 8 events of half a beat.
    // Main1: one motif over slots [4, 5] and zero variations (the next
    // window would end exactly at marker 8, which is not strictly before
    // it). Main2: one motif over [8, 9] plus one variation over [10, 11].
    // 1 intro rest + 16 + 16 + 16 events in total.
    assert_eq!(melody.len(), 49);

    // 16 intro beats + 8 + (8 + 8)
    assert!((melody.total_beats() - 40.0).abs() < 1e-9);
}

#[test]
fn test_all_pitches_within_possible_set() {
    let mut composer = Composer::new(scenario_settings(7)).unwrap();
    let possible: Vec<Pitch> = composer.possible_pitches().to_vec();
    let melody = composer.compose().unwrap();

    for event in melody.events() {
        if let Some(pitch) = event.pitch() {
            assert!(possible.contains(&pitch), "{pitch} escaped the sound range");
        }
    }
}

#[test]
fn test_reproducible_for_fixed_seed() {
    let melody_a = Composer::new(scenario_settings(123))
        .unwrap()
        .compose()
        .unwrap();
    let melody_b = Composer::new(scenario_settings(123))
        .unwrap()
        .compose()
        .unwrap();
    assert_eq!(melody_a, melody_b);
}

#[test]
fn test_continue_develop_keeps_structure() {
    let mut settings = scenario_settings(55);
    settings.continue_develop = true;
    let mut composer = Composer::new(settings).unwrap();
    let melody = composer.compose().unwrap();

    // Chaining variations changes pitches, never the event layout
    assert_eq!(melody.len(), 49);
    assert!((melody.total_beats() - 40.0).abs() < 1e-9);
}

#[test]
fn test_intro_omitted_when_generation_starts_at_first_slot() {
    let mut settings = scenario_settings(3);
    settings.chords = ["C", "F", "G", "C"].iter().map(|s| s.to_string()).collect();
    settings.markers = SectionMarkers([1, 3, 3, 4]);
    let mut composer = Composer::new(settings).unwrap();
    let melody = composer.compose().unwrap();

    // No intro rest: the first event belongs to the Main1 motif
    assert!((melody.events()[0].beats() - 0.5).abs() < 1e-9);
    // Main1 motif over [0, 1], Main2 motif over [2, 3], no variations
    assert_eq!(melody.len(), 32);
}

#[test]
fn test_non_monotonic_markers_rejected() {
    let mut settings = scenario_settings(1);
    settings.markers = SectionMarkers([5, 3, 9, 12]);
    let err = Composer::new(settings).unwrap_err();
    assert!(matches!(err, ComposeError::Config(_)));
}

#[test]
fn test_markers_beyond_progression_rejected() {
    let mut settings = scenario_settings(1);
    settings.markers = SectionMarkers([5, 8, 9, 17]);
    let err = Composer::new(settings).unwrap_err();
    assert!(matches!(err, ComposeError::Config(_)));
}

#[test]
fn test_unsingable_progression_names_the_slot() {
    let mut settings = scenario_settings(1);
    // With the sound range pinned to the single pitch C4, a chord
    // without the pitch class C has nothing to sing
    settings.chords = ["C", "Em", "C", "C", "C"].iter().map(|s| s.to_string()).collect();
    settings.markers = SectionMarkers([1, 3, 3, 5]);
    settings.sound_range = (Pitch::new(Note::C, 4), Pitch::new(Note::C, 4));

    let mut composer = Composer::new(settings).unwrap();
    let err = composer.compose().unwrap_err();
    match err {
        ComposeError::MusicTheory { slot, chord, .. } => {
            assert_eq!(slot, 1);
            assert_eq!(chord, "Em");
        }
        other => panic!("expected music theory error, got {other}"),
    }
}

#[test]
fn test_yaml_to_midi_pipeline() {
    let yaml = r#"
song:
  name: "Pipeline"
  tempo: 110
  key: "D"
  scale: "major"
  chords: [D, Bm, G, A7, D, Bm, G, A7, D, Bm, G, A7, D, Bm, G, A7]
  sections: [5, 8, 9, 13]

singer:
  instrument: violin
  strategy: motif
  motif_length: 2
"#;
    let song = SongFile::from_yaml(yaml).unwrap();
    let instrument = song.instrument().unwrap();
    let settings = song.to_settings(Some(9)).unwrap();

    let mut composer = Composer::new(settings).unwrap();
    let melody = composer.compose().unwrap();
    assert!(!melody.is_empty());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pipeline.mid");
    cantor::midi::write_midi(&melody, song.song.tempo, instrument.program, &path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"MThd"));
}

#[test]
fn test_strategies_cover_whole_progression() {
    for strategy in [PitchStrategy::Uniform, PitchStrategy::IntervalWeighted] {
        let mut settings = scenario_settings(17);
        settings.strategy = strategy;
        let mut composer = Composer::new(settings).unwrap();
        let melody = composer.compose().unwrap();
        // 16 slots of 4 beats each, no sectioning
        assert!(
            (melody.total_beats() - 64.0).abs() < 1e-9,
            "{strategy:?} did not cover the progression"
        );
    }
}
