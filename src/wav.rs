use crate::chunk::{parse_chunks, Chunk, ChunkTag};
use crate::data::decode_samples;
use crate::error::{Error, Result};
use crate::fmt::Fmt;
use crate::info::{parse_info_list, InfoEntry, InfoTag};
use crate::writer::WaveWriter;
use std::io::Cursor;

/// Struct representing a mono 16 bit WAV file
#[derive(Debug, Clone, PartialEq)]
pub struct Wav {
    /// Contains data from the fmt chunk / header part of the file
    pub fmt: Fmt,
    /// Audio samples
    pub samples: Vec<i16>,
    /// Metadata from the `LIST`/`INFO` chunk, in file order
    pub info: Vec<InfoEntry>,
    /// Contains raw chunk data that is either unimplemented or unknown
    pub chunks: Vec<Chunk>,
}

impl Wav {
    /// Create new [`Wav`] instance from a slice of bytes
    ///
    /// ```
    /// use std::io::Cursor;
    /// use simplewave::{InfoEntry, InfoTag, Wav, WaveWriter};
    ///
    /// let mut writer = WaveWriter::new(Cursor::new(vec![]), 48_000).unwrap();
    /// writer.write_samples(vec![1, 2, 3]).unwrap();
    /// writer.finish(&[InfoEntry::new(InfoTag::Artist, "me")]).unwrap();
    ///
    /// let wav = Wav::from_bytes(&writer.into_inner().into_inner()).unwrap();
    ///
    /// assert_eq!(wav.fmt.sample_rate, 48_000);
    /// assert_eq!(wav.samples, vec![1, 2, 3]);
    /// assert_eq!(wav.info(InfoTag::Artist), Some("me"));
    /// ```
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let parsed_chunks = parse_chunks(bytes)?;

        let fmt = parsed_chunks
            .iter()
            .find(|c| c.id == ChunkTag::Fmt)
            .ok_or(Error::NoFmtChunkFound)
            .and_then(Fmt::from_chunk)?;

        let samples = parsed_chunks
            .iter()
            .find(|c| c.id == ChunkTag::Data)
            .ok_or(Error::NoDataChunkFound)
            .map(decode_samples)?;

        let mut info = vec![];
        let mut chunks = vec![];

        for chunk in parsed_chunks {
            match chunk.id {
                ChunkTag::Fmt | ChunkTag::Data => {}
                ChunkTag::List => match parse_info_list(&chunk.bytes)? {
                    Some(entries) => info.extend(entries),
                    None => chunks.push(chunk),
                },
                _ => chunks.push(chunk),
            }
        }

        Ok(Wav {
            fmt,
            samples,
            info,
            chunks,
        })
    }

    /// Create a [`Wav`] struct from samples.
    pub fn from_samples(samples: Vec<i16>, sample_rate: u32) -> Result<Self> {
        Ok(Wav {
            fmt: Fmt::new(sample_rate)?,
            samples,
            info: vec![],
            chunks: vec![],
        })
    }

    /// Text of the first metadata entry with the given tag
    pub fn info(&self, tag: InfoTag) -> Option<&str> {
        self.info
            .iter()
            .find(|e| e.tag == tag)
            .map(|e| e.text.as_str())
    }

    /// Length of the audio in seconds
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.fmt.sample_rate as f64
    }

    /// Convert a [`Wav`] instance into bytes.
    ///
    /// Writes the samples and metadata through an in-memory [`WaveWriter`],
    /// chunks in [`Wav::chunks`] are not written.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = WaveWriter::new(Cursor::new(vec![]), self.fmt.sample_rate)?;

        writer.write_samples(self.samples.iter().copied())?;
        writer.finish(&self.info)?;

        Ok(writer.into_inner().into_inner())
    }
}
