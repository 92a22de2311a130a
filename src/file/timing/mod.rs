use thiserror::Error;

use crate::prelude::*;

/// An error returned for a resolution outside `1..=0x7FFF`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimingError {
    /// A resolution of zero ticks can't place anything
    #[error("Ticks per quarter note must be positive")]
    Zero,
    /// The leading bit of the division is reserved for SMPTE timing
    #[error("{0} ticks per quarter note does not fit in 15 bits")]
    TooLarge(u16),
}

/// A duration with no exact tick count at the chosen resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error(
    "{numerator}/{denominator} of a whole note is not a whole number of ticks at {ticks_per_quarter} ticks per quarter note"
)]
pub struct QuantizationError {
    /// Numerator of the offending duration
    pub numerator: u64,
    /// Denominator of the offending duration
    pub denominator: u64,
    /// The resolution in use
    pub ticks_per_quarter: u16,
}

#[doc = r#"
The resolution of a MIDI file: how many ticks make a quarter note.

Converts between rational durations and integer ticks. The conversion
never rounds. A duration that falls between two ticks is an error, so
whatever is written can be read back exactly.

# Example
```rust
# use melodia::prelude::*;
let tpqn = TicksPerQuarterNote::new(480).unwrap();
let eighth = Duration::new(1, 8).unwrap();

assert_eq!(tpqn.ticks_for(eighth).unwrap(), 240);
assert_eq!(tpqn.duration_for(240), Some(eighth));
assert!(tpqn.ticks_for(Duration::new(1, 7).unwrap()).is_err());
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u16", into = "u16")
)]
pub struct TicksPerQuarterNote(u16);

impl TicksPerQuarterNote {
    /// The resolution used when none is configured
    pub const DEFAULT: Self = Self(480);

    /// The tickrate per quarter note defines what a "quarter note" means.
    ///
    /// The leading bit of the division is reserved, so 1-32767
    pub const fn new(tpqn: u16) -> Result<Self, TimingError> {
        if tpqn == 0 {
            return Err(TimingError::Zero);
        }
        if tpqn > 0x7FFF {
            return Err(TimingError::TooLarge(tpqn));
        }
        Ok(Self(tpqn))
    }

    /// Returns the ticks per quarter note
    #[inline]
    pub const fn get(&self) -> u16 {
        self.0
    }

    /// Returns the ticks in a whole note
    #[inline]
    pub const fn ticks_per_whole(&self) -> u64 {
        self.0 as u64 * 4
    }

    /// Returns the exact number of ticks `duration` lasts.
    ///
    /// `ticks = numerator * tpqn * 4 / denominator`
    pub fn ticks_for(&self, duration: Duration) -> Result<u64, QuantizationError> {
        let scaled = duration.numerator() as u128 * self.ticks_per_whole() as u128;
        let denominator = duration.denominator() as u128;
        let error = QuantizationError {
            numerator: duration.numerator(),
            denominator: duration.denominator(),
            ticks_per_quarter: self.0,
        };
        if scaled % denominator != 0 {
            return Err(error);
        }
        u64::try_from(scaled / denominator).map_err(|_| error)
    }

    /// Returns the duration of `ticks`, reduced to lowest terms. Zero ticks
    /// have no duration.
    pub fn duration_for(&self, ticks: u64) -> Option<Duration> {
        Duration::new(ticks, self.ticks_per_whole()).ok()
    }
}

impl Default for TicksPerQuarterNote {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u16> for TicksPerQuarterNote {
    type Error = TimingError;
    fn try_from(tpqn: u16) -> Result<Self, Self::Error> {
        Self::new(tpqn)
    }
}

impl From<TicksPerQuarterNote> for u16 {
    fn from(tpqn: TicksPerQuarterNote) -> Self {
        tpqn.0
    }
}

#[test]
fn resolution_bounds() {
    use pretty_assertions::assert_eq;
    assert_eq!(TicksPerQuarterNote::new(0), Err(TimingError::Zero));
    assert_eq!(
        TicksPerQuarterNote::new(0x8000),
        Err(TimingError::TooLarge(0x8000))
    );
    assert_eq!(TicksPerQuarterNote::new(0x7FFF).map(|t| t.get()), Ok(0x7FFF));
    assert_eq!(TicksPerQuarterNote::default().get(), 480);
    assert_eq!(TicksPerQuarterNote::try_from(0), Err(TimingError::Zero));
    assert_eq!(u16::from(TicksPerQuarterNote::DEFAULT), 480);
}

#[test]
fn ticks_from_durations() {
    use pretty_assertions::assert_eq;
    let one = TicksPerQuarterNote::new(1).unwrap();
    assert_eq!(one.ticks_for(Duration::whole()), Ok(4));
    assert_eq!(one.ticks_for(Duration::new(1, 2).unwrap()), Ok(2));
    assert_eq!(one.ticks_for(Duration::new(1, 4).unwrap()), Ok(1));
    assert_eq!(
        one.ticks_for(Duration::new(1, 8).unwrap()),
        Err(QuantizationError {
            numerator: 1,
            denominator: 8,
            ticks_per_quarter: 1
        })
    );

    let fine = TicksPerQuarterNote::new(32).unwrap();
    assert_eq!(fine.ticks_for(Duration::new(1, 8).unwrap()), Ok(16));

    let triplets = TicksPerQuarterNote::new(480).unwrap();
    assert_eq!(triplets.ticks_for(Duration::new(1, 12).unwrap()), Ok(160));
    assert!(triplets.ticks_for(Duration::new(1, 7).unwrap()).is_err());
}

#[test]
fn durations_from_ticks() {
    use pretty_assertions::assert_eq;
    let tpqn = TicksPerQuarterNote::new(96).unwrap();
    assert_eq!(tpqn.duration_for(0), None);
    assert_eq!(tpqn.duration_for(96), Duration::new(1, 4).ok());
    assert_eq!(tpqn.duration_for(72), Duration::new(3, 16).ok());
    assert_eq!(tpqn.duration_for(384 * 3), Duration::new(3, 1).ok());
}
