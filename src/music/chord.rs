// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord symbol parsing.
//!
//! Turns lead-sheet chord symbols ("D", "Bm", "A7", "Cmaj7", "F#m7b5")
//! into ordered sets of chord-tone pitch classes. This is the composer's
//! harmony oracle; an unrecognized symbol is a hard parse error.

use std::fmt;

use crate::error::ComposeError;
use crate::music::scale::Note;

/// Chord qualities recognized by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
    Augmented,
    Dominant7,
    Major7,
    Minor7,
    Diminished7,
    HalfDiminished7,
    Major6,
    Minor6,
    Sus2,
    Sus4,
}

impl ChordQuality {
    /// Chord-tone intervals in semitones above the root
    pub fn intervals(self) -> &'static [u8] {
        match self {
            ChordQuality::Major => &[0, 4, 7],
            ChordQuality::Minor => &[0, 3, 7],
            ChordQuality::Diminished => &[0, 3, 6],
            ChordQuality::Augmented => &[0, 4, 8],
            ChordQuality::Dominant7 => &[0, 4, 7, 10],
            ChordQuality::Major7 => &[0, 4, 7, 11],
            ChordQuality::Minor7 => &[0, 3, 7, 10],
            ChordQuality::Diminished7 => &[0, 3, 6, 9],
            ChordQuality::HalfDiminished7 => &[0, 3, 6, 10],
            ChordQuality::Major6 => &[0, 4, 7, 9],
            ChordQuality::Minor6 => &[0, 3, 7, 9],
            ChordQuality::Sus2 => &[0, 2, 7],
            ChordQuality::Sus4 => &[0, 5, 7],
        }
    }

    /// Parse the quality suffix of a chord symbol ("" = major, "m7", ...)
    fn from_suffix(s: &str) -> Option<Self> {
        match s {
            "" | "maj" => Some(ChordQuality::Major),
            "m" | "min" | "-" => Some(ChordQuality::Minor),
            "dim" | "o" => Some(ChordQuality::Diminished),
            "aug" | "+" => Some(ChordQuality::Augmented),
            "7" => Some(ChordQuality::Dominant7),
            "maj7" | "M7" => Some(ChordQuality::Major7),
            "m7" | "min7" | "-7" => Some(ChordQuality::Minor7),
            "dim7" | "o7" => Some(ChordQuality::Diminished7),
            "m7b5" | "min7b5" => Some(ChordQuality::HalfDiminished7),
            "6" | "maj6" => Some(ChordQuality::Major6),
            "m6" | "min6" => Some(ChordQuality::Minor6),
            "sus2" => Some(ChordQuality::Sus2),
            "sus4" | "sus" => Some(ChordQuality::Sus4),
            _ => None,
        }
    }
}

/// A parsed chord: root pitch class, quality, and the original symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chord {
    root: Note,
    quality: ChordQuality,
    symbol: String,
}

impl Chord {
    /// Parse a lead-sheet chord symbol.
    ///
    /// The root is a letter plus optional accidental; the rest of the
    /// symbol is the quality suffix.
    pub fn parse(symbol: &str) -> Result<Self, ComposeError> {
        let s = symbol.trim();
        let err = || ComposeError::ChordParse {
            symbol: symbol.to_string(),
        };

        if s.is_empty() {
            return Err(err());
        }

        let root_len = if s.len() > 1 && matches!(s.as_bytes()[1], b'#' | b'b') {
            2
        } else {
            1
        };
        // Multibyte symbols would split a char boundary below
        if !s.is_char_boundary(root_len) {
            return Err(err());
        }
        let root = Note::from_str(&s[..root_len]).ok_or_else(err)?;
        let quality = ChordQuality::from_suffix(&s[root_len..]).ok_or_else(err)?;

        Ok(Self {
            root,
            quality,
            symbol: s.to_string(),
        })
    }

    /// The root pitch class
    pub fn root(&self) -> Note {
        self.root
    }

    /// The chord quality
    pub fn quality(&self) -> ChordQuality {
        self.quality
    }

    /// The symbol this chord was parsed from
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Ordered chord-tone pitch classes, root first
    pub fn tones(&self) -> Vec<Note> {
        self.quality
            .intervals()
            .iter()
            .map(|&i| self.root.transpose(i as i8))
            .collect()
    }

    /// Whether a pitch class is a tone of this chord
    pub fn contains(&self, note: Note) -> bool {
        self.quality
            .intervals()
            .iter()
            .any(|&i| self.root.transpose(i as i8) == note)
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_triads() {
        let d = Chord::parse("D").unwrap();
        assert_eq!(d.tones(), vec![Note::D, Note::Fs, Note::A]);

        let bm = Chord::parse("Bm").unwrap();
        assert_eq!(bm.tones(), vec![Note::B, Note::D, Note::Fs]);

        let fsdim = Chord::parse("F#dim").unwrap();
        assert_eq!(fsdim.tones(), vec![Note::Fs, Note::A, Note::C]);
    }

    #[test]
    fn test_parse_sevenths() {
        let a7 = Chord::parse("A7").unwrap();
        assert_eq!(a7.tones(), vec![Note::A, Note::Cs, Note::E, Note::G]);

        let cmaj7 = Chord::parse("Cmaj7").unwrap();
        assert_eq!(cmaj7.tones(), vec![Note::C, Note::E, Note::G, Note::B]);

        let em7 = Chord::parse("Em7").unwrap();
        assert_eq!(em7.tones(), vec![Note::E, Note::G, Note::B, Note::D]);

        let half_dim = Chord::parse("Bm7b5").unwrap();
        assert_eq!(half_dim.tones(), vec![Note::B, Note::D, Note::F, Note::A]);
    }

    #[test]
    fn test_parse_flat_roots() {
        let bb = Chord::parse("Bb").unwrap();
        assert_eq!(bb.root(), Note::As);
        // The 'b' belongs to the root, not the suffix
        assert_eq!(bb.quality(), ChordQuality::Major);

        let ebm = Chord::parse("Ebm").unwrap();
        assert_eq!(ebm.root(), Note::Ds);
        assert_eq!(ebm.quality(), ChordQuality::Minor);
    }

    #[test]
    fn test_contains() {
        let g = Chord::parse("G").unwrap();
        assert!(g.contains(Note::G));
        assert!(g.contains(Note::B));
        assert!(g.contains(Note::D));
        assert!(!g.contains(Note::F));
    }

    #[test]
    fn test_parse_errors() {
        assert!(Chord::parse("").is_err());
        assert!(Chord::parse("H").is_err());
        assert!(Chord::parse("Cmaj9#11").is_err());
        assert!(Chord::parse("Dwat").is_err());
    }

    #[test]
    fn test_parse_multibyte_symbols() {
        // Non-ASCII symbols must come back as parse errors, never panics
        assert!(matches!(
            Chord::parse("é7").unwrap_err(),
            ComposeError::ChordParse { .. }
        ));
        assert!(Chord::parse("♭7").is_err());
        assert!(Chord::parse("Cé").is_err());
    }
}
