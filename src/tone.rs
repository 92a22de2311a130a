use core::fmt;
use core::ops::{Add, Sub};
use core::str::FromStr;

use thiserror::Error;

/// Frequency of [`Tone`] `0` (`C0`) in Hz.
///
/// Every other frequency is derived from this anchor using twelve-tone
/// equal temperament, which puts `A4` at exactly 440 Hz.
pub const C0_FREQUENCY: f64 = 16.351_597_831_287_414;

/// Semitones per octave.
const OCTAVE: i32 = 12;

/// Offsets of the natural pitch classes from `C`.
const NATURALS: [(char, i32); 7] = [
    ('C', 0),
    ('D', 2),
    ('E', 4),
    ('F', 5),
    ('G', 7),
    ('A', 9),
    ('B', 11),
];

#[doc = r#"
An error produced while reading a [`Tone`] from notation such as `"Db3"`.
"#]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The notation string was empty
    #[error("Empty notation")]
    Empty,
    /// The first character was not a pitch letter between A and G
    #[error("Invalid pitch letter {0:?}, expected one of A-G")]
    InvalidLetter(char),
    /// A modifier other than `#` or `b` followed the letter
    #[error("Invalid modifier {0:?}, expected '#' or 'b'")]
    InvalidModifier(char),
    /// The octave was not a valid integer
    #[error("Invalid octave {0:?}")]
    InvalidOctave(String),
    /// The octave parsed, but the resulting pitch does not fit an `i32`
    #[error("Octave {0} is out of range")]
    OctaveOutOfRange(i32),
}

#[doc = r#"
A pitch on the chromatic scale.

A tone stores nothing but a signed number of semitones. `0` is `C0`,
`12` is `C1` and `57` is `A4`. Different spellings of the same pitch
collapse into the same tone: `Db3`, `C#3` and `B##2` are all pitch `37`.

# Example
```rust
# use melodia::prelude::*;
let tone = Tone::from_notation("Db3").unwrap();

assert_eq!(tone, Tone::new(37));
assert_eq!(tone.to_notation(false), "C#3");
assert_eq!(tone.to_notation(true), "Db3");
assert_eq!(tone.octave(), 3);
```
"#]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tone(i32);

impl Tone {
    /// Create a tone from a number of semitones above `C0`.
    pub const fn new(pitch: i32) -> Self {
        Self(pitch)
    }

    /// Returns the number of semitones above `C0`
    #[inline]
    pub const fn pitch(&self) -> i32 {
        self.0
    }

    /// Returns the octave of the tone. Tones below `C0` have negative octaves.
    #[inline]
    pub const fn octave(&self) -> i32 {
        self.0.div_euclid(OCTAVE)
    }

    /// Returns the position of the tone within its octave, from `0` (C) to `11` (B).
    #[inline]
    pub const fn pitch_class(&self) -> i32 {
        self.0.rem_euclid(OCTAVE)
    }

    /// Returns a copy of the tone moved by `semitones`.
    pub const fn transposed(&self, semitones: i32) -> Self {
        Self(self.0 + semitones)
    }

    /// Parse a tone from notation.
    ///
    /// The notation is a pitch letter, any number of `#` (one semitone up)
    /// and `b` (one semitone down) in any order, and an optional signed
    /// octave which defaults to `0`. A lowercase letter is read as its
    /// uppercase counterpart.
    ///
    /// ```rust
    /// # use melodia::prelude::*;
    /// assert_eq!(Tone::from_notation("C").unwrap().pitch(), 0);
    /// assert_eq!(Tone::from_notation("A4").unwrap().pitch(), 57);
    /// assert_eq!(Tone::from_notation("G#b#bb#5").unwrap().pitch(), 67);
    /// assert_eq!(Tone::from_notation("F-2").unwrap().pitch(), -19);
    /// ```
    pub fn from_notation(notation: &str) -> Result<Self, ParseError> {
        let mut chars = notation.char_indices().peekable();

        let (_, letter) = chars.next().ok_or(ParseError::Empty)?;
        let base = NATURALS
            .iter()
            .find(|(name, _)| *name == letter.to_ascii_uppercase())
            .map(|(_, offset)| *offset)
            .ok_or(ParseError::InvalidLetter(letter))?;

        let mut modifier = 0i32;
        let mut octave_start = notation.len();
        while let Some(&(index, c)) = chars.peek() {
            match c {
                '#' => modifier += 1,
                'b' => modifier -= 1,
                '-' | '0'..='9' => {
                    octave_start = index;
                    break;
                }
                other => return Err(ParseError::InvalidModifier(other)),
            }
            chars.next();
        }

        let octave_text = &notation[octave_start..];
        let octave = if octave_text.is_empty() {
            0
        } else {
            // `i32::from_str` would also accept a leading '+'
            if octave_text.starts_with('+') {
                return Err(ParseError::InvalidOctave(octave_text.to_owned()));
            }
            octave_text
                .parse::<i32>()
                .map_err(|_| ParseError::InvalidOctave(octave_text.to_owned()))?
        };

        octave
            .checked_mul(OCTAVE)
            .and_then(|p| p.checked_add(base))
            .and_then(|p| p.checked_add(modifier))
            .map(Self)
            .ok_or(ParseError::OctaveOutOfRange(octave))
    }

    /// Format the tone as notation.
    ///
    /// Natural pitch classes are written without modifiers. The other five
    /// use a single sharp on the natural below, or a single flat on the
    /// natural above when `transpose_down` is set. The result depends on the
    /// pitch only, never on how the tone was spelled when it was parsed.
    ///
    /// ```rust
    /// # use melodia::prelude::*;
    /// assert_eq!(Tone::new(0).to_notation(false), "C0");
    /// assert_eq!(Tone::new(13).to_notation(false), "C#1");
    /// assert_eq!(Tone::new(13).to_notation(true), "Db1");
    /// assert_eq!(Tone::new(113).to_notation(true), "F9");
    /// ```
    pub fn to_notation(&self, transpose_down: bool) -> String {
        let class = self.pitch_class();
        let octave = self.octave();

        match natural_name(class) {
            Some(name) => format!("{name}{octave}"),
            // B and E have naturals directly above, so neither branch wraps the octave
            None if transpose_down => {
                let name = natural_name(class + 1).unwrap_or('?');
                format!("{name}b{octave}")
            }
            None => {
                let name = natural_name(class - 1).unwrap_or('?');
                format!("{name}#{octave}")
            }
        }
    }

    /// Returns the equal-tempered frequency of the tone in Hz.
    ///
    /// ```rust
    /// # use melodia::prelude::*;
    /// let a4 = Tone::from_notation("A4").unwrap();
    /// assert!((a4.to_frequency() - 440.0).abs() < 1e-9);
    /// ```
    pub fn to_frequency(&self) -> f64 {
        C0_FREQUENCY * 2f64.powf(self.0 as f64 / OCTAVE as f64)
    }
}

fn natural_name(class: i32) -> Option<char> {
    NATURALS
        .iter()
        .find(|(_, offset)| *offset == class)
        .map(|(name, _)| *name)
}

impl FromStr for Tone {
    type Err = ParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_notation(s)
    }
}

impl From<i32> for Tone {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_notation(false))
    }
}

impl Add<i32> for Tone {
    type Output = Tone;
    fn add(self, rhs: i32) -> Self::Output {
        self.transposed(rhs)
    }
}

impl Sub<i32> for Tone {
    type Output = Tone;
    fn sub(self, rhs: i32) -> Self::Output {
        self.transposed(-rhs)
    }
}

#[test]
fn parse_naturals_and_octaves() {
    use pretty_assertions::assert_eq;
    assert_eq!(Tone::from_notation("C0").unwrap(), Tone::new(0));
    assert_eq!(Tone::from_notation("B0").unwrap(), Tone::new(11));
    assert_eq!(Tone::from_notation("C1").unwrap(), Tone::new(12));
    assert_eq!(Tone::from_notation("A4").unwrap(), Tone::new(57));
    assert_eq!(Tone::from_notation("C-1").unwrap(), Tone::new(-12));
    assert_eq!(Tone::from_notation("a4").unwrap(), Tone::new(57));
}

#[test]
fn parse_modifiers_are_cumulative() {
    use pretty_assertions::assert_eq;
    assert_eq!(Tone::from_notation("Db3").unwrap(), Tone::new(37));
    assert_eq!(Tone::from_notation("C#3").unwrap(), Tone::new(37));
    assert_eq!(Tone::from_notation("B##2").unwrap(), Tone::new(37));
    assert_eq!(Tone::from_notation("G#5").unwrap(), Tone::new(68));
    assert_eq!(Tone::from_notation("Cb0").unwrap(), Tone::new(-1));
    assert_eq!(Tone::from_notation("bb3").unwrap(), Tone::new(46));
}

#[test]
fn parse_errors() {
    use pretty_assertions::assert_eq;
    assert_eq!(Tone::from_notation(""), Err(ParseError::Empty));
    assert_eq!(Tone::from_notation("H4"), Err(ParseError::InvalidLetter('H')));
    assert_eq!(Tone::from_notation("re"), Err(ParseError::InvalidLetter('r')));
    assert_eq!(Tone::from_notation("C$4"), Err(ParseError::InvalidModifier('$')));
    assert_eq!(Tone::from_notation("Cx"), Err(ParseError::InvalidModifier('x')));
    assert_eq!(
        Tone::from_notation("C4x"),
        Err(ParseError::InvalidOctave("4x".to_owned()))
    );
    assert_eq!(
        Tone::from_notation("C-"),
        Err(ParseError::InvalidOctave("-".to_owned()))
    );
    assert_eq!(
        Tone::from_notation("C999999999"),
        Err(ParseError::OctaveOutOfRange(999_999_999))
    );
}

#[test]
fn notation_is_canonical() {
    use pretty_assertions::assert_eq;
    let flat = Tone::from_notation("Ab3").unwrap();
    let sharp = Tone::from_notation("G#3").unwrap();
    assert_eq!(flat.to_notation(false), "G#3");
    assert_eq!(sharp.to_notation(false), "G#3");
    assert_eq!(flat.to_notation(true), "Ab3");
    assert_eq!(Tone::new(-1).to_notation(false), "B-1");
    assert_eq!(Tone::new(-2).to_notation(true), "Bb-1");
}

#[test]
fn notation_round_trip() {
    for pitch in -600..600 {
        let tone = Tone::new(pitch);
        assert_eq!(Tone::from_notation(&tone.to_notation(false)).unwrap(), tone);
        assert_eq!(Tone::from_notation(&tone.to_notation(true)).unwrap(), tone);
    }
}

#[test]
fn frequencies() {
    let a4 = Tone::from_notation("A4").unwrap();
    assert!((a4.to_frequency() - 440.0).abs() < 1e-9);
    let a5 = Tone::from_notation("A5").unwrap();
    assert!((a5.to_frequency() - 880.0).abs() < 1e-9);
    assert!((Tone::new(0).to_frequency() - C0_FREQUENCY).abs() < 1e-12);
}

#[test]
fn ordering_and_transposition() {
    use pretty_assertions::assert_eq;
    let c4 = Tone::from_notation("C4").unwrap();
    assert!(c4 < Tone::from_notation("C#4").unwrap());
    assert!(c4 > Tone::from_notation("B3").unwrap());
    assert_eq!(c4 + 2, Tone::from_notation("D4").unwrap());
    assert_eq!(c4 - 2, Tone::from_notation("A#3").unwrap());
    assert_eq!(c4.transposed(-1).to_string(), "B3");
}
