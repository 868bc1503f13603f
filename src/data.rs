use crate::chunk::Chunk;
use crate::error::{Error, Result};

/// Number of bytes a single encoded sample takes up
pub const BYTES_PER_SAMPLE: usize = 2;

/// Most samples a `data` chunk can hold with a 32 bit size field
pub const MAX_SAMPLES: u64 = u32::MAX as u64 / BYTES_PER_SAMPLE as u64;

/// Encode samples as little-endian two's-complement 16 bit values.
///
/// Values outside of `i16` are rejected instead of being truncated, nothing is
/// returned in that case so callers can treat a batch as all-or-nothing.
pub(crate) fn encode_samples<I>(samples: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = i32>,
{
    let samples = samples.into_iter();
    let mut bytes = Vec::with_capacity(samples.size_hint().0.saturating_mul(BYTES_PER_SAMPLE));

    for s in samples {
        let sample = i16::try_from(s).map_err(|_| Error::SampleOutOfRange(s))?;
        bytes.extend_from_slice(&sample.to_le_bytes());
    }

    Ok(bytes)
}

/// Decode the samples of a 16 bit `data` chunk.
pub(crate) fn decode_samples(chunk: &Chunk) -> Vec<i16> {
    // A trailing odd byte can't form a sample and is ignored
    chunk
        .bytes
        .chunks_exact(BYTES_PER_SAMPLE)
        .map(|b| i16::from_le_bytes([b[0], b[1]]))
        .collect()
}
