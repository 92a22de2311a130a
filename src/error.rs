use std::io;

use thiserror::Error;

use crate::prelude::*;

/// Any error this crate produces
#[derive(Debug, Error)]
pub enum Error {
    /// Bad note notation
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A zero duration
    #[error(transparent)]
    Duration(#[from] DurationError),
    /// A zero time signature
    #[error(transparent)]
    Signature(#[from] SignatureError),
    /// A velocity above 127
    #[error(transparent)]
    Velocity(#[from] VelocityError),
    /// A tempo a file can't hold
    #[error(transparent)]
    Tempo(#[from] TempoError),
    /// A resolution a file can't hold
    #[error(transparent)]
    Timing(#[from] TimingError),
    /// A track that can't be encoded
    #[error(transparent)]
    Write(#[from] WriterError),
    /// Bytes that can't be decoded
    #[error(transparent)]
    Read(#[from] ReaderError),
    /// Reading or writing bytes failed
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A `Result` with the crate [`Error`]
pub type Result<T, E = Error> = core::result::Result<T, E>;
