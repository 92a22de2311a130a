#![doc = r#"
Meta events of a track chunk

A meta event is `FF <type> <length> <data>`, where the length is a
variable-length quantity. A track written by this crate uses three of
them: the tempo, the time signature and the end of the track. Any other
type is skipped by the reader.
"#]

use num_enum::{IntoPrimitive, TryFromPrimitive};

mod tempo;
pub use tempo::*;

mod time_signature;
pub use time_signature::*;

/// The status byte shared by every meta event
pub const META_STATUS: u8 = 0xFF;

/// The meta event types understood by the codec
#[derive(Copy, Clone, PartialEq, Eq, Debug, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum MetaType {
    /// `FF 2F 00`
    EndOfTrack = 0x2F,
    /// `FF 51 03 tt tt tt`
    Tempo = 0x51,
    /// `FF 58 04 nn dd cc bb`
    TimeSignature = 0x58,
}

/// A meta event with its data
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MetaMessage {
    /// Set the tempo
    Tempo(Tempo),
    /// Set the time signature
    TimeSignature(TimeSignature),
    /// Marks the end of the track chunk
    EndOfTrack,
}

impl MetaMessage {
    /// Returns the type byte of the message
    pub const fn meta_type(&self) -> MetaType {
        match self {
            Self::Tempo(_) => MetaType::Tempo,
            Self::TimeSignature(_) => MetaType::TimeSignature,
            Self::EndOfTrack => MetaType::EndOfTrack,
        }
    }

    /// Appends `FF <type> <length> <data>` to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.push(META_STATUS);
        out.push(self.meta_type().into());
        // every length here is below 0x80, so it is a one-byte quantity
        match self {
            Self::Tempo(tempo) => {
                out.push(3);
                out.extend_from_slice(&tempo.to_bytes());
            }
            Self::TimeSignature(signature) => {
                out.push(4);
                out.extend_from_slice(&signature.to_bytes());
            }
            Self::EndOfTrack => out.push(0),
        }
    }
}

#[test]
fn meta_bytes() {
    use pretty_assertions::assert_eq;
    let mut out = Vec::new();
    MetaMessage::Tempo(Tempo::DEFAULT).write_to(&mut out);
    assert_eq!(out, [0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20]);

    out.clear();
    MetaMessage::EndOfTrack.write_to(&mut out);
    assert_eq!(out, [0xFF, 0x2F, 0x00]);

    out.clear();
    let signature = TimeSignature::parse(&[0x04, 0x02, 0x18, 0x08]).unwrap();
    MetaMessage::TimeSignature(signature).write_to(&mut out);
    assert_eq!(out, [0xFF, 0x58, 0x04, 0x04, 0x02, 0x18, 0x08]);

    assert_eq!(MetaType::try_from(0x58).ok(), Some(MetaType::TimeSignature));
    assert_eq!(MetaType::try_from(0x03).ok(), None);
}
