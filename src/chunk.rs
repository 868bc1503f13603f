use crate::error::{Error, Result};

/// RIFF chunks are tagged with 4 byte identifiers.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ChunkTag {
    /// Root level "chunk"
    Riff,
    /// Mandatory chunk for WAV files, contains data such as the sample rate, bit depth, and number of channels.
    Fmt,
    /// Mandatory chunk for WAV files, contains the samples.
    Data,
    /// File identifier, should be located right after the RIFF tag and chunk size
    Wave,
    /// Container chunk, its payload starts with a list type tag
    List,
    /// List type for textual metadata, located right after the LIST tag and chunk size
    Info,
    /// Unkown/unhandled chunk tag, useful for parsing [`Chunk`] bytes.
    Unknown([u8; 4]),
}

impl ChunkTag {
    pub(crate) fn from_bytes(bytes: &[u8; 4]) -> Self {
        match bytes {
            b"RIFF" => ChunkTag::Riff,
            b"fmt " => ChunkTag::Fmt,
            b"data" => ChunkTag::Data,
            b"WAVE" => ChunkTag::Wave,
            b"LIST" => ChunkTag::List,
            b"INFO" => ChunkTag::Info,
            _ => ChunkTag::Unknown(*bytes),
        }
    }

    pub(crate) fn to_bytes(self) -> [u8; 4] {
        match self {
            ChunkTag::Riff => *b"RIFF",
            ChunkTag::Fmt => *b"fmt ",
            ChunkTag::Data => *b"data",
            ChunkTag::Wave => *b"WAVE",
            ChunkTag::List => *b"LIST",
            ChunkTag::Info => *b"INFO",
            ChunkTag::Unknown(bytes) => bytes,
        }
    }
}

/// Resource Interchange File Format (RIFF) tagged chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// Chunk tag
    pub id: ChunkTag,
    /// Raw bytes for parsing based on the associated tag.
    pub bytes: Vec<u8>,
}

impl Chunk {
    pub(crate) fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let id = read_tag(bytes, 0).map(|b| ChunkTag::from_bytes(&b))?;
        let size = read_u32(bytes, 4)? as usize;

        let start: usize = 8;
        let end = start.checked_add(size).ok_or(Error::UnexpectedEof)?;
        let bytes = bytes.get(start..end).ok_or(Error::UnexpectedEof)?.to_vec();

        Ok(Chunk { id, bytes })
    }

    /// Size on disk including tag, size field and padding byte.
    pub(crate) fn padded_len(&self) -> usize {
        8 + self.bytes.len() + (self.bytes.len() & 1)
    }
}

pub(crate) fn read_tag(bytes: &[u8], offset: usize) -> Result<[u8; 4]> {
    bytes
        .get(offset..offset + 4)
        .and_then(|b| b.try_into().ok())
        .ok_or(Error::UnexpectedEof)
}

pub(crate) fn read_u16(bytes: &[u8], offset: usize) -> Result<u16> {
    bytes
        .get(offset..offset + 2)
        .and_then(|b| b.try_into().ok())
        .map(u16::from_le_bytes)
        .ok_or(Error::UnexpectedEof)
}

pub(crate) fn read_u32(bytes: &[u8], offset: usize) -> Result<u32> {
    read_tag(bytes, offset).map(u32::from_le_bytes)
}

/// Splits the payload of a RIFF/WAVE file into its top level chunks.
pub(crate) fn parse_chunks(bytes: &[u8]) -> Result<Vec<Chunk>> {
    let riff = Chunk::from_bytes(bytes).map_err(|e| match e {
        Error::UnexpectedEof if bytes.len() < 8 => Error::NoRiffChunkFound,
        e => e,
    })?;

    if riff.id != ChunkTag::Riff {
        return Err(Error::NoRiffChunkFound);
    }

    let tag = read_tag(&riff.bytes, 0).map_err(|_| Error::NoWaveTagFound)?;

    if ChunkTag::from_bytes(&tag) != ChunkTag::Wave {
        return Err(Error::NoWaveTagFound);
    }

    let mut chunks = vec![];
    let mut index = 4;

    while index < riff.bytes.len() {
        let chunk = Chunk::from_bytes(&riff.bytes[index..])?;

        // Chunks with an odd number of bytes are followed by an empty padding byte
        index += chunk.padded_len();

        chunks.push(chunk);
    }

    Ok(chunks)
}
