#![doc = r#"
Time Signature - how a track's beats group into bars

# Format

The time signature meta event carries four data bytes:

```text
FF 58 04 nn dd cc bb
```

- `nn`: beats per bar
- `dd`: the beat unit as a negative power of two (2 = quarter, 3 = eighth)
- `cc`: MIDI clocks per metronome click
- `bb`: notated 32nd notes per MIDI quarter note

Only `nn` and `dd` are musical. `cc` and `bb` are written with their
conventional values of 24 and 8 and are kept as read otherwise.
"#]

use thiserror::Error;

use crate::prelude::*;

/// Errors while converting between a [`Signature`] and its meta event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimeSignatureError {
    /// The meta event must be exactly four bytes
    #[error("Time signature is {0} bytes, expected 4")]
    Length(usize),
    /// A signature with zero beats
    #[error("Time signature has zero beats per bar")]
    ZeroBeats,
    /// The beat unit is 2 to a power over 31
    #[error("Time signature beat unit 2^{0} is too large")]
    UnitExponent(u8),
    /// More beats than fit in one byte
    #[error("{0} beats per bar can't be written, expected at most 255")]
    TooManyBeats(u32),
    /// Only powers of two can be encoded
    #[error("Beat unit {0} is not a power of two")]
    UnitNotPowerOfTwo(u32),
}

/// The raw time signature meta event
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TimeSignature {
    /// Beats per bar
    pub numerator: u8,
    /// Exponent of the beat unit
    pub denominator_exponent: u8,
    /// MIDI clocks per metronome click
    pub clocks_per_click: u8,
    /// 32nd notes per MIDI quarter note
    pub thirty_seconds_per_quarter: u8,
}

impl TimeSignature {
    /// Conventional clocks per metronome click
    pub const CLOCKS_PER_CLICK: u8 = 24;
    /// Conventional 32nd notes per quarter note
    pub const THIRTY_SECONDS_PER_QUARTER: u8 = 8;

    /// Encode a signature with the conventional click values.
    ///
    /// # Errors
    /// - `TimeSignatureError::TooManyBeats` if there are more than 255 beats
    /// - `TimeSignatureError::UnitNotPowerOfTwo` if the beat unit isn't a power of two
    pub const fn from_signature(signature: Signature) -> Result<Self, TimeSignatureError> {
        let beats = signature.beats();
        if beats > u8::MAX as u32 {
            return Err(TimeSignatureError::TooManyBeats(beats));
        }
        let unit = signature.beat_unit();
        if !unit.is_power_of_two() {
            return Err(TimeSignatureError::UnitNotPowerOfTwo(unit));
        }
        Ok(Self {
            numerator: beats as u8,
            denominator_exponent: unit.trailing_zeros() as u8,
            clocks_per_click: Self::CLOCKS_PER_CLICK,
            thirty_seconds_per_quarter: Self::THIRTY_SECONDS_PER_QUARTER,
        })
    }

    /// Parse a time signature from the 4 data bytes of its meta event.
    ///
    /// # Errors
    /// - `TimeSignatureError::Length` if data is not exactly 4 bytes
    /// - `TimeSignatureError::ZeroBeats` if `nn` is zero
    /// - `TimeSignatureError::UnitExponent` if `dd` is above 31
    pub const fn parse(data: &[u8]) -> Result<Self, TimeSignatureError> {
        if data.len() != 4 {
            return Err(TimeSignatureError::Length(data.len()));
        }
        if data[0] == 0 {
            return Err(TimeSignatureError::ZeroBeats);
        }
        if data[1] > 31 {
            return Err(TimeSignatureError::UnitExponent(data[1]));
        }
        Ok(Self {
            numerator: data[0],
            denominator_exponent: data[1],
            clocks_per_click: data[2],
            thirty_seconds_per_quarter: data[3],
        })
    }

    /// Returns the 4 data bytes of the meta event
    pub const fn to_bytes(&self) -> [u8; 4] {
        [
            self.numerator,
            self.denominator_exponent,
            self.clocks_per_click,
            self.thirty_seconds_per_quarter,
        ]
    }

    /// Returns the signature the event describes
    pub fn signature(&self) -> Signature {
        // parse and from_signature both rule out zero beats and oversized units
        Signature::new(self.numerator as u32, 1 << self.denominator_exponent)
            .unwrap_or_default()
    }
}

#[test]
fn encode_signatures() {
    use pretty_assertions::assert_eq;
    let three_four = TimeSignature::from_signature(Signature::new(3, 4).unwrap()).unwrap();
    assert_eq!(three_four.to_bytes(), [0x03, 0x02, 0x18, 0x08]);

    let odd = TimeSignature::from_signature(Signature::new(17, 16).unwrap()).unwrap();
    assert_eq!(odd.to_bytes(), [0x11, 0x04, 0x18, 0x08]);

    let whole = TimeSignature::from_signature(Signature::new(1, 1).unwrap()).unwrap();
    assert_eq!(whole.to_bytes(), [0x01, 0x00, 0x18, 0x08]);
}

#[test]
fn unencodable_signatures() {
    use pretty_assertions::assert_eq;
    assert_eq!(
        TimeSignature::from_signature(Signature::new(256, 4).unwrap()),
        Err(TimeSignatureError::TooManyBeats(256))
    );
    assert_eq!(
        TimeSignature::from_signature(Signature::new(4, 6).unwrap()),
        Err(TimeSignatureError::UnitNotPowerOfTwo(6))
    );
}

#[test]
fn parse_signatures() {
    use pretty_assertions::assert_eq;
    let parsed = TimeSignature::parse(&[0x06, 0x03, 0x24, 0x08]).unwrap();
    assert_eq!(parsed.signature(), Signature::new(6, 8).unwrap());
    assert_eq!(parsed.clocks_per_click, 0x24);

    assert_eq!(
        TimeSignature::parse(&[0x06, 0x03, 0x24]),
        Err(TimeSignatureError::Length(3))
    );
    assert_eq!(
        TimeSignature::parse(&[0x00, 0x02, 0x18, 0x08]),
        Err(TimeSignatureError::ZeroBeats)
    );
    assert_eq!(
        TimeSignature::parse(&[0x04, 0x20, 0x18, 0x08]),
        Err(TimeSignatureError::UnitExponent(0x20))
    );
}
