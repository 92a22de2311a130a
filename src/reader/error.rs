use crate::{
    TempoError, TimeSignatureError,
    vlq::VlqError,
};
use thiserror::Error;

#[doc = r#"
A set of errors that can occur while reading a MIDI file into a [`Track`](crate::Track)
"#]
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Reading at Position {position}, {kind}")]
pub struct ReaderError {
    position: usize,
    pub(crate) kind: ReaderErrorKind,
}

/// A kind of error that a reader can produce
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReaderErrorKind {
    /// The bytes are not a MIDI file this crate can read
    #[error("Malformed MIDI: {0}")]
    Malformed(#[from] MalformedError),
    /// The file is well formed but has no time signature meta event
    #[error("The track has no time signature")]
    MissingSignature,
}

/// Why a byte stream was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedError {
    /// A chunk type other than the one required at this point
    #[error("Expected a {} chunk, found {:?}", ascii(.expected), ascii(.found))]
    InvalidChunkId {
        /// The chunk type required
        expected: [u8; 4],
        /// The chunk type read
        found: [u8; 4],
    },
    /// The input ended in the middle of something
    #[error("Needed {needed} more bytes, only {available} left")]
    Truncated {
        /// Bytes required
        needed: usize,
        /// Bytes remaining
        available: usize,
    },
    /// A header chunk shorter than six bytes
    #[error("Header chunk is {0} bytes, expected at least 6")]
    HeaderLength(u32),
    /// A format other than 0 or 1
    #[error("Unsupported file format {0}")]
    UnsupportedFormat(u16),
    /// More or fewer than one track announced
    #[error("Expected exactly one track, the header announces {0}")]
    TrackCount(u16),
    /// A second track chunk after the first
    #[error("Found more than one track chunk")]
    ExtraTrack,
    /// A second header chunk
    #[error("Found a second header chunk")]
    DuplicateHeader,
    /// No track chunk at all
    #[error("The file has no track chunk")]
    MissingTrack,
    /// Division with the leading bit set
    #[error("SMPTE timing is not supported")]
    SmpteTiming,
    /// A division of zero ticks per quarter note
    #[error("Division of zero ticks per quarter note")]
    ZeroDivision,
    /// A broken delta time or length
    #[error("Invalid variable-length quantity: {0}")]
    Vlq(#[from] VlqError),
    /// A data byte where a status byte was needed, with no status to repeat
    #[error("Running status with no previous status")]
    MissingStatus,
    /// A system common or real-time status, which can't appear in a file
    #[error("Unexpected status byte {0:#04x}")]
    UnexpectedStatus(u8),
    /// A data byte with the leading bit set
    #[error("Invalid data byte {0:#04x}")]
    InvalidDataByte(u8),
    /// A known meta event with the wrong length
    #[error("Meta event {meta_type:#04x} has length {len}")]
    MetaLength {
        /// The meta event type
        meta_type: u8,
        /// The length read
        len: u32,
    },
    /// An unusable tempo
    #[error("Invalid tempo: {0}")]
    Tempo(#[from] TempoError),
    /// An unusable time signature
    #[error("Invalid time signature: {0}")]
    TimeSignature(#[from] TimeSignatureError),
    /// A note-off for a key that isn't sounding
    #[error("Note off for key {key} at tick {tick} without a note on")]
    UnmatchedNoteOff {
        /// MIDI key number
        key: u8,
        /// Absolute tick of the event
        tick: u64,
    },
    /// A note-on while another note is still sounding
    #[error("Note on for key {key} at tick {tick} overlaps the sounding note")]
    OverlappingNotes {
        /// MIDI key number
        key: u8,
        /// Absolute tick of the event
        tick: u64,
    },
    /// A note released on the tick it was struck
    #[error("Note for key {key} at tick {tick} has no length")]
    ZeroLengthNote {
        /// MIDI key number
        key: u8,
        /// Absolute tick of the event
        tick: u64,
    },
    /// A note still sounding when the track ends
    #[error("Note for key {key} is never released")]
    UnterminatedNote {
        /// MIDI key number
        key: u8,
    },
    /// The track chunk has no end-of-track meta event
    #[error("The track has no end-of-track event")]
    MissingEndOfTrack,
    /// Events after the end-of-track meta event
    #[error("Data after the end-of-track event")]
    DataAfterEndOfTrack,
}

fn ascii(id: &[u8; 4]) -> String {
    String::from_utf8_lossy(id).into_owned()
}

impl ReaderError {
    /// Create a reader error from a position and kind
    pub const fn new(position: usize, kind: ReaderErrorKind) -> Self {
        Self { position, kind }
    }

    /// Create a new malformed data error
    pub const fn malformed(position: usize, error: MalformedError) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::Malformed(error),
        }
    }

    /// True if the input ended early
    pub const fn is_out_of_bounds(&self) -> bool {
        matches!(
            self.kind,
            ReaderErrorKind::Malformed(MalformedError::Truncated { .. })
        )
    }

    /// True if the bytes are structurally invalid
    pub const fn is_malformed(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::Malformed(_))
    }

    /// Returns the error kind of the reader.
    pub fn error_kind(&self) -> &ReaderErrorKind {
        &self.kind
    }

    /// Returns the byte offset where the read error occurred.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// The Read Result type (see [`ReaderError`])
pub type ReadResult<T> = Result<T, ReaderError>;
