use core::fmt;

use thiserror::Error;

use super::{Duration, Rational};

/// An error returned when building a [`Signature`] from a zero component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid time signature {beats}/{beat_unit}: both parts must be positive")]
pub struct SignatureError {
    /// The rejected number of beats per bar
    pub beats: u32,
    /// The rejected beat unit
    pub beat_unit: u32,
}

#[doc = r#"
The time signature of a track: `beats` per bar, each one `1/beat_unit` of
a whole note long.

The signature is metadata. It is written to and read from MIDI files and
helps with bar arithmetic, but it never constrains where notes go.

# Example
```rust
# use melodia::prelude::*;
let waltz = Signature::new(3, 4).unwrap();

assert_eq!(waltz.beats(), 3);
assert_eq!(waltz.bar_duration(), Duration::new(3, 4).unwrap());
assert_eq!(Signature::default(), Signature::new(4, 4).unwrap());
```
"#]
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "(u32, u32)", into = "(u32, u32)")
)]
pub struct Signature {
    beats: u32,
    beat_unit: u32,
}

impl Signature {
    /// Create a new signature.
    ///
    /// # Errors
    /// if either part is zero. The beat unit is conventionally a power of two,
    /// but only power-of-two units can be written to a MIDI file.
    pub const fn new(beats: u32, beat_unit: u32) -> Result<Self, SignatureError> {
        if beats == 0 || beat_unit == 0 {
            return Err(SignatureError { beats, beat_unit });
        }
        Ok(Self { beats, beat_unit })
    }

    /// Beats per bar
    #[inline]
    pub const fn beats(&self) -> u32 {
        self.beats
    }

    /// The note value of one beat, as the denominator of a whole note
    #[inline]
    pub const fn beat_unit(&self) -> u32 {
        self.beat_unit
    }

    /// Returns the length of one bar.
    pub fn bar_duration(&self) -> Duration {
        // both parts are positive, so the ratio is too
        Duration::from_ratio(Rational::new(self.beats as u64, self.beat_unit as u64))
            .unwrap_or_else(Duration::whole)
    }
}

impl Default for Signature {
    fn default() -> Self {
        Self {
            beats: 4,
            beat_unit: 4,
        }
    }
}

impl TryFrom<(u32, u32)> for Signature {
    type Error = SignatureError;
    fn try_from((beats, beat_unit): (u32, u32)) -> Result<Self, Self::Error> {
        Self::new(beats, beat_unit)
    }
}

impl From<Signature> for (u32, u32) {
    fn from(signature: Signature) -> Self {
        (signature.beats, signature.beat_unit)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.beats, self.beat_unit)
    }
}

#[test]
fn signatures_keep_their_spelling() {
    use pretty_assertions::assert_eq;
    // 6/8 and 3/4 are different signatures with the same bar length
    let six_eight = Signature::new(6, 8).unwrap();
    let three_four = Signature::new(3, 4).unwrap();
    assert_ne!(six_eight, three_four);
    assert_eq!(six_eight.bar_duration(), three_four.bar_duration());
    assert_eq!(six_eight.to_string(), "6/8");
}

#[test]
fn zero_signatures_are_rejected() {
    use pretty_assertions::assert_eq;
    assert_eq!(
        Signature::new(0, 4),
        Err(SignatureError {
            beats: 0,
            beat_unit: 4
        })
    );
    assert!(Signature::new(4, 0).is_err());
    assert!(Signature::try_from((3, 8)).is_ok());
}

#[test]
fn signatures_convert_through_pairs() {
    use pretty_assertions::assert_eq;
    let pair: (u32, u32) = Signature::new(6, 8).unwrap().into();
    assert_eq!(pair, (6, 8));
    assert_eq!(Signature::try_from(pair), Signature::new(6, 8));
    assert_eq!(
        Signature::try_from((3, 0)),
        Err(SignatureError {
            beats: 3,
            beat_unit: 0
        })
    );
}
