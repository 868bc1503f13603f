use crate::chunk::ChunkTag;
use std::io;
use thiserror::Error;

/// Error type for writing and parsing failures
#[derive(Error, Debug)]
pub enum Error {
    /// The underlying sink failed to write, seek or report its position
    #[error(transparent)]
    Io(#[from] io::Error),
    /// Sample value does not fit in a signed 16 bit integer
    #[error("sample {0} is outside of the 16 bit range")]
    SampleOutOfRange(i32),
    /// The writer was already finished, no more samples or metadata can be written
    #[error("wav writer is already finished")]
    AlreadyFinished,
    /// Sample rate is zero or too large to derive a byte rate from
    #[error("invalid sample rate {0}")]
    InvalidSampleRate(u32),
    /// Metadata text does not fit in a sub chunk
    #[error("metadata text of {0} bytes is too long")]
    MetadataTooLong(usize),
    /// Chunk size does not fit in a 32 bit size field
    #[error("chunk size {0} does not fit in 32 bits")]
    TooLarge(u64),
    /// Sweep parameters can't produce samples
    #[error("invalid sweep: {0}")]
    InvalidSweep(&'static str),
    /// Input ended in the middle of a chunk
    #[error("unexpected end of input")]
    UnexpectedEof,
    /// No WAVE tag found
    #[error("no WAVE tag found")]
    NoWaveTagFound,
    /// No riff chunk found
    #[error("no RIFF chunk found")]
    NoRiffChunkFound,
    /// No data chunk found
    #[error("no data chunk found")]
    NoDataChunkFound,
    /// No fmt/header chunk found
    #[error("no fmt chunk found")]
    NoFmtChunkFound,
    /// Text in a chunk is not valid UTF-8
    #[error("invalid text in {0:?} chunk")]
    InvalidText(ChunkTag),
    /// Unsupported bit depth
    #[error("unsupported bit depth {0}")]
    UnsupportedBitDepth(u16),
    /// Unsupported number of channels
    #[error("unsupported number of channels {0}")]
    UnsupportedChannels(u16),
    /// Unsupported format
    #[error("unsupported audio format {0}")]
    UnsupportedFormat(u16),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
