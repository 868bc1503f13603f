use crate::chunk::{read_u16, read_u32, Chunk, ChunkTag};
use crate::error::{Error, Result};

/// Audio format tag for uncompressed PCM
pub const PCM_FORMAT: u16 = 1;

/// Size of the PCM format block following the `fmt ` tag and size field
pub const FMT_BLOCK_SIZE: u32 = 16;

/// Struct representing the `fmt_` section of a mono 16 bit PCM WAV file
///
/// for more information see [`here`]
///
/// [`here`]: http://soundfile.sapp.org/doc/WaveFormat/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fmt {
    /// sample rate in frames per second, typical values are `8_000`, `44_100` or `48_000`
    pub sample_rate: u32,
}

impl Fmt {
    /// Number of audio channels, always mono
    pub const NUM_CHANNELS: u16 = 1;
    /// Bit depth of each sample
    pub const BIT_DEPTH: u16 = 16;

    /// Create a format for the given sample rate.
    ///
    /// Fails when the sample rate is zero or when the byte rate would not fit in 32 bits.
    pub fn new(sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 || sample_rate.checked_mul(Self::block_align() as u32).is_none() {
            return Err(Error::InvalidSampleRate(sample_rate));
        }

        Ok(Fmt { sample_rate })
    }

    /// Bytes per frame
    pub const fn block_align() -> u16 {
        Self::NUM_CHANNELS * Self::BIT_DEPTH / 8
    }

    /// Bytes per second
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * Self::block_align() as u32
    }

    pub(crate) fn from_chunk(chunk: &Chunk) -> Result<Self> {
        let format = read_u16(&chunk.bytes, 0)?;

        if format != PCM_FORMAT {
            return Err(Error::UnsupportedFormat(format));
        }

        let num_channels = read_u16(&chunk.bytes, 2)?;

        if num_channels != Self::NUM_CHANNELS {
            return Err(Error::UnsupportedChannels(num_channels));
        }

        let sample_rate = read_u32(&chunk.bytes, 4)?;
        let bit_depth = read_u16(&chunk.bytes, 14)?;

        if bit_depth != Self::BIT_DEPTH {
            return Err(Error::UnsupportedBitDepth(bit_depth));
        }

        Fmt::new(sample_rate)
    }

    /// The `fmt ` tag, size field and PCM block, 24 bytes in total.
    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let br = self.byte_rate().to_le_bytes();
        let ba = Self::block_align().to_le_bytes();
        let nc = Self::NUM_CHANNELS.to_le_bytes();
        let sr = self.sample_rate.to_le_bytes();
        let bd = Self::BIT_DEPTH.to_le_bytes();
        let pcm = PCM_FORMAT.to_le_bytes();

        let mut bytes = Vec::with_capacity(24);
        bytes.extend_from_slice(&ChunkTag::Fmt.to_bytes());
        bytes.extend_from_slice(&FMT_BLOCK_SIZE.to_le_bytes());
        bytes.extend_from_slice(&[
            pcm[0], pcm[1], // audio format
            nc[0], nc[1], // num channels
            sr[0], sr[1], sr[2], sr[3], // sample rate
            br[0], br[1], br[2], br[3], // byte rate
            ba[0], ba[1], // block align
            bd[0], bd[1], // bits per sample
        ]);

        bytes
    }
}
