use num_enum::{IntoPrimitive, TryFromPrimitive};

#[doc = r#"
The format word of a MIDI file header.

This crate writes [`FormatType::SingleMultiChannel`] files: one track
chunk holding every event. A reader also accepts a
[`FormatType::Simultaneous`] file as long as it has a single track, since
such a file is laid out the same way.
"#]
#[derive(Copy, Clone, PartialEq, Eq, Debug, TryFromPrimitive, IntoPrimitive)]
#[repr(u16)]
pub enum FormatType {
    /// Format 0
    SingleMultiChannel = 0,
    /// Format 1
    Simultaneous = 1,
    /// Format 2
    SequentiallyIndependent = 2,
}

impl FormatType {
    /// True if a file of this format can hold a single-track melody
    pub const fn is_single_track_compatible(&self) -> bool {
        matches!(self, Self::SingleMultiChannel | Self::Simultaneous)
    }
}
