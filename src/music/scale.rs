// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scales, keys, and pitches.
//!
//! Provides the music-theory vocabulary the composer consumes: pitch
//! classes, octave-qualified pitches with semitone arithmetic, scale
//! definitions, and the derivation of all in-key pitches within a closed
//! sound range.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Note names (pitch classes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Note {
    C,
    Cs, // C# / Db
    D,
    Ds, // D# / Eb
    E,
    F,
    Fs, // F# / Gb
    G,
    Gs, // G# / Ab
    A,
    As, // A# / Bb
    B,
}

impl Note {
    /// All notes in chromatic order
    pub const ALL: [Note; 12] = [
        Note::C,
        Note::Cs,
        Note::D,
        Note::Ds,
        Note::E,
        Note::F,
        Note::Fs,
        Note::G,
        Note::Gs,
        Note::A,
        Note::As,
        Note::B,
    ];

    /// Get the pitch class (0-11) for this note
    pub fn pitch_class(self) -> u8 {
        match self {
            Note::C => 0,
            Note::Cs => 1,
            Note::D => 2,
            Note::Ds => 3,
            Note::E => 4,
            Note::F => 5,
            Note::Fs => 6,
            Note::G => 7,
            Note::Gs => 8,
            Note::A => 9,
            Note::As => 10,
            Note::B => 11,
        }
    }

    /// Get note from pitch class
    pub fn from_pitch_class(pc: u8) -> Self {
        Note::ALL[(pc % 12) as usize]
    }

    /// Parse note from string (e.g., "C", "C#", "Db", "F#")
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim().to_uppercase();
        match s.as_str() {
            "C" => Some(Note::C),
            "C#" | "CS" | "DB" => Some(Note::Cs),
            "D" => Some(Note::D),
            "D#" | "DS" | "EB" => Some(Note::Ds),
            "E" | "FB" => Some(Note::E),
            "F" | "E#" | "ES" => Some(Note::F),
            "F#" | "FS" | "GB" => Some(Note::Fs),
            "G" => Some(Note::G),
            "G#" | "GS" | "AB" => Some(Note::Gs),
            "A" => Some(Note::A),
            "A#" | "AS" | "BB" => Some(Note::As),
            "B" | "CB" => Some(Note::B),
            _ => None,
        }
    }

    /// Transpose by semitones
    pub fn transpose(self, semitones: i8) -> Self {
        let new_pc = (self.pitch_class() as i8 + semitones).rem_euclid(12) as u8;
        Note::from_pitch_class(new_pc)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Note::C => write!(f, "C"),
            Note::Cs => write!(f, "C#"),
            Note::D => write!(f, "D"),
            Note::Ds => write!(f, "D#"),
            Note::E => write!(f, "E"),
            Note::F => write!(f, "F"),
            Note::Fs => write!(f, "F#"),
            Note::G => write!(f, "G"),
            Note::Gs => write!(f, "G#"),
            Note::A => write!(f, "A"),
            Note::As => write!(f, "A#"),
            Note::B => write!(f, "B"),
        }
    }
}

/// An octave-qualified pitch (e.g., C#4).
///
/// Octaves follow the MIDI convention where middle C is C4 = MIDI 60.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pitch {
    pub note: Note,
    pub octave: i8,
}

impl Pitch {
    /// Create a pitch from a note name and octave
    pub fn new(note: Note, octave: i8) -> Self {
        Self { note, octave }
    }

    /// Parse a pitch with octave (e.g., "C4", "F#3", "Bb5")
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim();
        let digit_at = s.find(|c: char| c.is_ascii_digit() || c == '-')?;
        let note = Note::from_str(&s[..digit_at])?;
        let octave: i8 = s[digit_at..].parse().ok()?;
        Some(Self { note, octave })
    }

    /// Build a pitch from an absolute semitone number (MIDI numbering)
    pub fn from_midi_number(n: i32) -> Self {
        Self {
            note: Note::from_pitch_class(n.rem_euclid(12) as u8),
            octave: (n.div_euclid(12) - 1) as i8,
        }
    }

    /// Absolute semitone number (middle C = 60). May fall outside the
    /// 0-127 MIDI range for extreme octaves; callers clamp at export.
    pub fn midi_number(self) -> i32 {
        (self.octave as i32 + 1) * 12 + self.note.pitch_class() as i32
    }

    /// Signed semitone distance from this pitch to another
    pub fn semitones_to(self, other: Pitch) -> i32 {
        other.midi_number() - self.midi_number()
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.note, self.octave)
    }
}

/// Scale types supported by the composer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleType {
    Major,        // Ionian
    Dorian,       // Minor with raised 6th
    Mixolydian,   // Major with lowered 7th
    NaturalMinor, // Aeolian
    HarmonicMinor,
    MajorPentatonic,
    MinorPentatonic,
}

impl ScaleType {
    /// Get the intervals (semitones from root) for this scale type
    pub fn intervals(self) -> &'static [u8] {
        match self {
            ScaleType::Major => &[0, 2, 4, 5, 7, 9, 11],
            ScaleType::Dorian => &[0, 2, 3, 5, 7, 9, 10],
            ScaleType::Mixolydian => &[0, 2, 4, 5, 7, 9, 10],
            ScaleType::NaturalMinor => &[0, 2, 3, 5, 7, 8, 10],
            ScaleType::HarmonicMinor => &[0, 2, 3, 5, 7, 8, 11],
            ScaleType::MajorPentatonic => &[0, 2, 4, 7, 9],
            ScaleType::MinorPentatonic => &[0, 3, 5, 7, 10],
        }
    }

    /// Parse scale type from string
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase().replace([' ', '-', '_'], "");
        match s.as_str() {
            "major" | "ionian" => Some(ScaleType::Major),
            "dorian" => Some(ScaleType::Dorian),
            "mixolydian" => Some(ScaleType::Mixolydian),
            "minor" | "naturalminor" | "aeolian" => Some(ScaleType::NaturalMinor),
            "harmonicminor" => Some(ScaleType::HarmonicMinor),
            "majorpentatonic" | "pentatonicmajor" => Some(ScaleType::MajorPentatonic),
            "minorpentatonic" | "pentatonicminor" | "pentatonic" => {
                Some(ScaleType::MinorPentatonic)
            }
            _ => None,
        }
    }

    /// Get a human-readable name for this scale type
    pub fn name(self) -> &'static str {
        match self {
            ScaleType::Major => "Major",
            ScaleType::Dorian => "Dorian",
            ScaleType::Mixolydian => "Mixolydian",
            ScaleType::NaturalMinor => "Natural Minor",
            ScaleType::HarmonicMinor => "Harmonic Minor",
            ScaleType::MajorPentatonic => "Major Pentatonic",
            ScaleType::MinorPentatonic => "Minor Pentatonic",
        }
    }
}

impl fmt::Display for ScaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A complete scale with root and type
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    root: Note,
    scale_type: ScaleType,
    notes: Vec<Note>,
}

impl Scale {
    /// Create a new scale from root and type
    pub fn new(root: Note, scale_type: ScaleType) -> Self {
        let notes: Vec<Note> = scale_type
            .intervals()
            .iter()
            .map(|&i| root.transpose(i as i8))
            .collect();

        Self {
            root,
            scale_type,
            notes,
        }
    }

    /// Get the root note
    pub fn root(&self) -> Note {
        self.root
    }

    /// Get the scale type
    pub fn scale_type(&self) -> ScaleType {
        self.scale_type
    }

    /// Get the notes in this scale
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Check if a note is in this scale
    pub fn contains(&self, note: Note) -> bool {
        self.notes.contains(&note)
    }

    /// Get the note at a given scale degree (1-based)
    pub fn note_at_degree(&self, degree: usize) -> Option<Note> {
        if degree == 0 || degree > self.notes.len() {
            return None;
        }
        Some(self.notes[degree - 1])
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.root, self.scale_type)
    }
}

/// A musical key: a root note plus the scale it implies.
///
/// The key is the composer's oracle for "singable" material: it derives the
/// possible-pitch set (all in-key pitches within a sound range) and the
/// tonic-triad degrees used by the snap-to-triad mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    root: Note,
    scale: Scale,
}

impl Key {
    /// Create a new key
    pub fn new(root: Note, scale_type: ScaleType) -> Self {
        Self {
            root,
            scale: Scale::new(root, scale_type),
        }
    }

    /// Parse a key from strings (e.g., "D", "minor")
    pub fn parse(root_str: &str, scale_str: &str) -> Option<Self> {
        let root = Note::from_str(root_str)?;
        let scale_type = ScaleType::from_str(scale_str)?;
        Some(Key::new(root, scale_type))
    }

    /// Get the root note
    pub fn root(&self) -> Note {
        self.root
    }

    /// Get the scale
    pub fn scale(&self) -> &Scale {
        &self.scale
    }

    /// All in-key pitches within a closed range, low to high.
    ///
    /// Both bounds are inclusive. This is computed once per composition and
    /// is the selection-time candidate universe for every generated note.
    pub fn pitches_in_range(&self, low: Pitch, high: Pitch) -> Vec<Pitch> {
        let (lo, hi) = (low.midi_number(), high.midi_number());
        (lo..=hi)
            .map(Pitch::from_midi_number)
            .filter(|p| self.scale.contains(p.note))
            .collect()
    }

    /// The tonic triad pitch classes (scale degrees 1, 3, 5)
    pub fn tonic_triad(&self) -> [Note; 3] {
        let notes = self.scale.notes();
        [notes[0], notes[2 % notes.len()], notes[4 % notes.len()]]
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.scale)
    }
}
