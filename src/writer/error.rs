use thiserror::Error;

use crate::prelude::*;

/// Reasons a [`Track`] can't be written as MIDI
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WriterError {
    /// A note or rest isn't a whole number of ticks at the file's resolution
    #[error(transparent)]
    Quantization(#[from] QuantizationError),
    /// A tone maps to a key outside 0-127
    #[error("{tone} maps to MIDI key {key}, outside 0-127")]
    KeyOutOfRange {
        /// The tone that was being written
        tone: Tone,
        /// The key it maps to
        key: i64,
    },
    /// The track signature can't be stored in a time signature meta event
    #[error("Can't write time signature {signature}: {source}")]
    Signature {
        /// The signature of the track
        signature: Signature,
        /// Why it can't be encoded
        source: TimeSignatureError,
    },
    /// Two events are further apart than a delta time can express
    #[error("Delta time of {0} ticks is too long")]
    DeltaTooLong(u64),
    /// The track chunk is longer than a 32-bit length can describe
    #[error("Track chunk of {0} bytes is too long")]
    ChunkTooLong(usize),
}
