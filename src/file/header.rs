use crate::prelude::*;

#[doc = r#"
The contents of the `MThd` chunk.

```text
MThd 00 00 00 06 | ff ff | nn nn | dd dd
                   format  tracks  division
```

Only tick-based divisions are supported; a division with the leading
bit set (SMPTE timing) is rejected when reading.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidiFileHeader {
    format: FormatType,
    num_tracks: u16,
    timing: TicksPerQuarterNote,
}

impl MidiFileHeader {
    /// The length of the header chunk body
    pub const LEN: u32 = 6;

    /// Create a new header
    pub const fn new(format: FormatType, num_tracks: u16, timing: TicksPerQuarterNote) -> Self {
        Self {
            format,
            num_tracks,
            timing,
        }
    }

    /// The header of a format 0 file with one track
    pub const fn single_track(timing: TicksPerQuarterNote) -> Self {
        Self::new(FormatType::SingleMultiChannel, 1, timing)
    }

    /// Get the format
    pub const fn format(&self) -> FormatType {
        self.format
    }

    /// Get the number of track chunks the file announces
    pub const fn num_tracks(&self) -> u16 {
        self.num_tracks
    }

    /// Get the timing props
    pub const fn timing(&self) -> TicksPerQuarterNote {
        self.timing
    }

    /// Returns the six bytes of the chunk body
    pub fn to_bytes(&self) -> [u8; 6] {
        let [f0, f1] = u16::from(self.format).to_be_bytes();
        let [n0, n1] = self.num_tracks.to_be_bytes();
        let [d0, d1] = self.timing.get().to_be_bytes();
        [f0, f1, n0, n1, d0, d1]
    }
}

#[test]
fn header_bytes() {
    use pretty_assertions::assert_eq;
    let header = MidiFileHeader::single_track(TicksPerQuarterNote::new(1).unwrap());
    assert_eq!(header.to_bytes(), [0x00, 0x00, 0x00, 0x01, 0x00, 0x01]);

    let header = MidiFileHeader::new(
        FormatType::SequentiallyIndependent,
        0x1996,
        TicksPerQuarterNote::new(0x2007).unwrap(),
    );
    assert_eq!(header.to_bytes(), [0x00, 0x02, 0x19, 0x96, 0x20, 0x07]);
}
