//! Streaming writer for mono 16 bit PCM wav files.
//!
//! The header is written up front with placeholder sizes, samples are appended
//! one by one or in batches, and finishing the file optionally adds a
//! `LIST`/`INFO` metadata chunk before patching the sizes.
//!
//! Writing a WAV file:
//! ```no_run
//! use std::fs::File;
//! use std::io::BufWriter;
//! use simplewave::{InfoEntry, InfoTag, WaveWriter};
//!
//! fn main() -> simplewave::Result<()> {
//!     let file = BufWriter::new(File::create("output.wav")?);
//!     let mut writer = WaveWriter::new(file, 48_000)?;
//!
//!     // Enjoy the silence
//!     writer.write_samples(vec![0i16; 48_000])?;
//!     writer.finish(&[InfoEntry::new(InfoTag::TrackTitle, "silence")])?;
//!
//!     Ok(())
//! }
//! ```
//!
//! Reading it back:
//! ```
//! use std::io::Cursor;
//! use simplewave::{Wav, WaveWriter};
//!
//! let mut writer = WaveWriter::new(Cursor::new(vec![]), 8_000).unwrap();
//! writer.write_sample(-1).unwrap();
//! writer.finish(&[]).unwrap();
//!
//! let wav = Wav::from_bytes(writer.into_inner().get_ref()).unwrap();
//!
//! assert_eq!(wav.samples, vec![-1]);
//! ```

#![warn(missing_docs)]

mod chunk;
mod data;
mod error;
mod fmt;
mod info;
mod sweep;
mod wav;
mod writer;

pub use chunk::{Chunk, ChunkTag};
pub use error::{Error, Result};
pub use fmt::Fmt;
pub use info::{InfoEntry, InfoTag};
pub use sweep::Sweep;
pub use wav::Wav;
pub use writer::{WaveWriter, HEADER_LEN};
