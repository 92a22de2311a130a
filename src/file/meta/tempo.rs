use core::fmt;

use thiserror::Error;

/// An error returned for tempos a MIDI file can't hold
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TempoError {
    /// Beats per minute must be a finite, positive number
    #[error("Invalid tempo of {0} beats per minute")]
    InvalidBpm(f64),
    /// The tempo meta event stores microseconds in 24 bits, and zero is meaningless
    #[error("{0} microseconds per quarter note is outside 1-16777215")]
    OutOfRange(u64),
}

#[doc = r#"
The speed of a track, stored as microseconds per quarter note.

This is the unit of the `FF 51 03 tt tt tt` meta event, so a tempo is
always representable in 24 bits.

# Example
```rust
# use melodia::prelude::*;
let tempo = Tempo::from_bpm(120.).unwrap();

assert_eq!(tempo.micros_per_quarter_note(), 500_000);
assert_eq!(tempo.to_bytes(), [0x07, 0xA1, 0x20]);
assert_eq!(tempo.bpm(), 120.);
```
"#]
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u32", into = "u32")
)]
pub struct Tempo(u32);

impl Tempo {
    /// 120 beats per minute
    pub const DEFAULT: Self = Self(500_000);

    const MAX_MICROS: u32 = 0x00FF_FFFF;

    /// Creates a tempo from microseconds per quarter note
    pub const fn from_micros_per_quarter(micros: u32) -> Result<Self, TempoError> {
        if micros == 0 || micros > Self::MAX_MICROS {
            return Err(TempoError::OutOfRange(micros as u64));
        }
        Ok(Self(micros))
    }

    /// Creates a tempo from quarter notes per minute, rounded to the
    /// nearest microsecond.
    pub fn from_bpm(bpm: f64) -> Result<Self, TempoError> {
        if !bpm.is_finite() || bpm <= 0. {
            return Err(TempoError::InvalidBpm(bpm));
        }
        let micros = (60_000_000. / bpm).round();
        if micros < 1. || micros > Self::MAX_MICROS as f64 {
            return Err(TempoError::OutOfRange(micros as u64));
        }
        Ok(Self(micros as u32))
    }

    /// Reads the three big-endian bytes of a tempo meta event
    pub const fn from_bytes(bytes: [u8; 3]) -> Result<Self, TempoError> {
        let micros = ((bytes[0] as u32) << 16) | ((bytes[1] as u32) << 8) | bytes[2] as u32;
        Self::from_micros_per_quarter(micros)
    }

    /// Returns the microseconds per quarter note
    #[inline]
    pub const fn micros_per_quarter_note(&self) -> u32 {
        self.0
    }

    /// Returns quarter notes per minute
    pub fn bpm(&self) -> f64 {
        60_000_000. / self.0 as f64
    }

    /// Returns the three big-endian bytes of a tempo meta event
    pub const fn to_bytes(&self) -> [u8; 3] {
        let [_, a, b, c] = self.0.to_be_bytes();
        [a, b, c]
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for Tempo {
    type Error = TempoError;
    fn try_from(micros: u32) -> Result<Self, Self::Error> {
        Self::from_micros_per_quarter(micros)
    }
}

impl From<Tempo> for u32 {
    fn from(tempo: Tempo) -> Self {
        tempo.0
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} bpm", self.bpm())
    }
}

#[test]
fn tempo_from_bpm() {
    use pretty_assertions::assert_eq;
    assert_eq!(Tempo::from_bpm(60.).unwrap().micros_per_quarter_note(), 1_000_000);
    assert_eq!(Tempo::from_bpm(90.).unwrap().micros_per_quarter_note(), 666_667);
    assert_eq!(Tempo::from_bpm(0.), Err(TempoError::InvalidBpm(0.)));
    assert!(Tempo::from_bpm(f64::NAN).is_err());
    // slower than ~3.58 bpm needs more than 24 bits
    assert!(Tempo::from_bpm(3.).is_err());
}

#[test]
fn tempo_bytes() {
    use pretty_assertions::assert_eq;
    let tempo = Tempo::from_bytes([0x0F, 0x42, 0x40]).unwrap();
    assert_eq!(tempo.micros_per_quarter_note(), 1_000_000);
    assert_eq!(tempo.to_bytes(), [0x0F, 0x42, 0x40]);
    assert_eq!(Tempo::from_bytes([0, 0, 0]), Err(TempoError::OutOfRange(0)));
    assert_eq!(
        Tempo::from_micros_per_quarter(0x0100_0000),
        Err(TempoError::OutOfRange(0x0100_0000))
    );
    assert_eq!(Tempo::try_from(0), Err(TempoError::OutOfRange(0)));
    assert_eq!(u32::from(Tempo::DEFAULT), 500_000);
}
