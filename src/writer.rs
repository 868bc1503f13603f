use crate::chunk::ChunkTag;
use crate::data::{encode_samples, BYTES_PER_SAMPLE, MAX_SAMPLES};
use crate::error::{Error, Result};
use crate::fmt::Fmt;
use crate::info::InfoEntry;
use std::io::{Seek, SeekFrom, Write};

/// Length of the canonical header written by [`WaveWriter::new`]
pub const HEADER_LEN: u64 = 44;

/// Size fields hold this value until the writer is finished
const PLACEHOLDER: [u8; 4] = [0xff; 4];

// Relative to the position of the sink when the writer was created
const RIFF_SIZE_OFFSET: u64 = 4;
const DATA_SIZE_OFFSET: u64 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Writing,
    Finished,
}

/// Streaming writer for mono 16 bit PCM WAV files.
///
/// The header is written on creation with placeholder sizes, samples are
/// appended as they come in and [`WaveWriter::finish`] writes the optional
/// `LIST`/`INFO` chunk and patches the sizes once the length is known.
///
/// ```
/// use std::io::Cursor;
/// use simplewave::{InfoEntry, InfoTag, WaveWriter};
///
/// let mut writer = WaveWriter::new(Cursor::new(vec![]), 8_000).unwrap();
///
/// writer.write_samples(vec![0, 16383, -16384, -1]).unwrap();
/// writer
///     .finish(&[InfoEntry::new(InfoTag::CreatingSoftware, "x")])
///     .unwrap();
///
/// let bytes = writer.into_inner().into_inner();
///
/// assert_eq!(bytes.len(), 74);
/// assert_eq!(&bytes[4..8], &66u32.to_le_bytes());
/// assert_eq!(&bytes[40..44], &8u32.to_le_bytes());
/// ```
#[derive(Debug)]
pub struct WaveWriter<W>
where
    W: Write + Seek,
{
    sink: W,
    fmt: Fmt,
    sample_count: u64,
    start: u64,
    state: State,
}

impl<W> WaveWriter<W>
where
    W: Write + Seek,
{
    /// Write the WAV header to `sink` and return a writer ready for samples.
    ///
    /// The file starts at the current position of the sink, usually offset 0.
    pub fn new(mut sink: W, sample_rate: u32) -> Result<Self> {
        let fmt = Fmt::new(sample_rate)?;
        let start = sink.stream_position()?;

        let mut header = Vec::with_capacity(HEADER_LEN as usize);
        header.extend_from_slice(&ChunkTag::Riff.to_bytes());
        header.extend_from_slice(&PLACEHOLDER); // chunk size
        header.extend_from_slice(&ChunkTag::Wave.to_bytes());
        header.extend_from_slice(&fmt.to_bytes());
        header.extend_from_slice(&ChunkTag::Data.to_bytes());
        header.extend_from_slice(&PLACEHOLDER); // data chunk size

        sink.write_all(&header)?;

        tracing::debug!(sample_rate, start, "wrote wav header");

        Ok(WaveWriter {
            sink,
            fmt,
            sample_count: 0,
            start,
            state: State::Writing,
        })
    }

    /// Append samples in the range `[-32768, 32767]`.
    ///
    /// A batch containing an out of range value, or one that would grow the
    /// data chunk past its 32 bit size field, is rejected as a whole. Nothing is
    /// written to the sink in that case.
    pub fn write_samples<I>(&mut self, samples: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<i32>,
    {
        self.ensure_writing()?;

        let samples = samples.into_iter();
        self.ensure_room(samples.size_hint().0 as u64)?;

        // One sample past the limit is enough to know the batch doesn't fit
        let limit = (MAX_SAMPLES - self.sample_count + 1) as usize;
        let bytes = encode_samples(samples.map(Into::into).take(limit))?;

        let count = (bytes.len() / BYTES_PER_SAMPLE) as u64;
        self.ensure_room(count)?;

        self.sink.write_all(&bytes)?;
        self.sample_count += count;

        tracing::trace!(count, total = self.sample_count, "wrote samples");

        Ok(())
    }

    /// Append a single sample, see [`WaveWriter::write_samples`].
    pub fn write_sample(&mut self, sample: i32) -> Result<()> {
        self.write_samples(std::iter::once(sample))
    }

    /// Write the metadata, if any, and patch the RIFF and data chunk sizes.
    ///
    /// Can only be called once. A failed finish also counts, the sink is left
    /// in an unspecified state. The sink is flushed but not closed, use
    /// [`WaveWriter::into_inner`] to get it back.
    pub fn finish(&mut self, metadata: &[InfoEntry]) -> Result<()> {
        self.ensure_writing()?;
        self.state = State::Finished;

        let data_size = size_field(self.sample_count * BYTES_PER_SAMPLE as u64)?;

        if !metadata.is_empty() {
            self.write_info_list(metadata)?;
        }

        let end = self.sink.stream_position()?;
        let riff_size = size_field(end - self.start - 8)?;

        self.patch(self.start + RIFF_SIZE_OFFSET, riff_size)?;
        self.patch(self.start + DATA_SIZE_OFFSET, data_size)?;

        self.sink.seek(SeekFrom::Start(end))?;
        self.sink.flush()?;

        tracing::debug!(
            samples = self.sample_count,
            riff_size,
            data_size,
            metadata = metadata.len(),
            "finished wav file"
        );

        Ok(())
    }

    /// Number of samples written so far
    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    /// Sample rate the header was written with
    pub fn sample_rate(&self) -> u32 {
        self.fmt.sample_rate
    }

    /// Whether [`WaveWriter::finish`] has been called
    pub fn is_finished(&self) -> bool {
        self.state == State::Finished
    }

    /// Give the sink back to the caller.
    pub fn into_inner(self) -> W {
        self.sink
    }

    fn ensure_writing(&self) -> Result<()> {
        match self.state {
            State::Writing => Ok(()),
            State::Finished => Err(Error::AlreadyFinished),
        }
    }

    fn ensure_room(&self, additional: u64) -> Result<()> {
        let total = self.sample_count.saturating_add(additional);

        if total > MAX_SAMPLES {
            return Err(Error::TooLarge(total.saturating_mul(BYTES_PER_SAMPLE as u64)));
        }

        Ok(())
    }

    fn write_info_list(&mut self, metadata: &[InfoEntry]) -> Result<()> {
        // Check every entry before touching the sink
        let sizes = metadata
            .iter()
            .map(InfoEntry::size)
            .collect::<Result<Vec<u32>>>()?;

        let list_start = self.sink.stream_position()?;

        self.sink.write_all(&ChunkTag::List.to_bytes())?;
        self.sink.write_all(&PLACEHOLDER)?;
        self.sink.write_all(&ChunkTag::Info.to_bytes())?;

        for (entry, size) in metadata.iter().zip(sizes) {
            self.sink.write_all(&entry.tag.to_bytes())?;
            self.sink.write_all(&size.to_le_bytes())?;
            self.sink.write_all(entry.text.as_bytes())?;
            self.sink.write_all(&[0])?;
            self.pad_to_even()?;
        }

        let list_end = self.sink.stream_position()?;
        self.pad_to_even()?;
        let end = self.sink.stream_position()?;

        self.patch(list_start + 4, size_field(list_end - list_start - 8)?)?;
        self.sink.seek(SeekFrom::Start(end))?;

        Ok(())
    }

    fn pad_to_even(&mut self) -> Result<()> {
        let position = self.sink.stream_position()?;

        if (position - self.start) % 2 == 1 {
            self.sink.write_all(&[0])?;
        }

        Ok(())
    }

    fn patch(&mut self, position: u64, value: u32) -> Result<()> {
        self.sink.seek(SeekFrom::Start(position))?;
        self.sink.write_all(&value.to_le_bytes())?;

        Ok(())
    }
}

fn size_field(size: u64) -> Result<u32> {
    u32::try_from(size).map_err(|_| Error::TooLarge(size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::InfoTag;
    use crate::wav::Wav;
    use std::io::{self, Cursor};

    fn write(samples: &[i32], metadata: &[InfoEntry]) -> Vec<u8> {
        let mut writer = WaveWriter::new(Cursor::new(vec![]), 8_000).unwrap();
        writer.write_samples(samples.iter().copied()).unwrap();
        writer.finish(metadata).unwrap();
        writer.into_inner().into_inner()
    }

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes([
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
        ])
    }

    #[test]
    fn header_has_placeholders_until_finished() {
        let mut writer = WaveWriter::new(Cursor::new(vec![]), 44_100).unwrap();
        writer.write_sample(1).unwrap();

        let bytes = writer.into_inner().into_inner();

        assert_eq!(bytes.len(), 46);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[4..8], &[0xff, 0xff, 0xff, 0xff]);
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(&bytes[40..44], &[0xff, 0xff, 0xff, 0xff]);
        assert_eq!(&bytes[44..46], &[0x01, 0x00]);
    }

    #[test]
    fn write_mono_16_bit() {
        let bytes: [u8; 52] = [
            0x52, 0x49, 0x46, 0x46, // RIFF
            0x2c, 0x00, 0x00, 0x00, // chunk size
            0x57, 0x41, 0x56, 0x45, // WAVE
            0x66, 0x6d, 0x74, 0x20, // fmt_
            0x10, 0x00, 0x00, 0x00, // chunk size
            0x01, 0x00, // audio format
            0x01, 0x00, // num channels
            0x40, 0x1f, 0x00, 0x00, // sample rate
            0x80, 0x3e, 0x00, 0x00, // byte rate
            0x02, 0x00, // block align
            0x10, 0x00, // bits per sample
            0x64, 0x61, 0x74, 0x61, // data
            0x08, 0x00, 0x00, 0x00, // chunk size
            0x00, 0x00, 0xff, 0x3f, // sample 1, 2
            0x00, 0xc0, 0xff, 0xff, // sample 3, 4
        ];

        assert_eq!(write(&[0, 16383, -16384, -1], &[]), bytes);
    }

    #[test]
    fn write_mono_16_bit_with_metadata() {
        let bytes: [u8; 74] = [
            0x52, 0x49, 0x46, 0x46, // RIFF
            0x42, 0x00, 0x00, 0x00, // chunk size
            0x57, 0x41, 0x56, 0x45, // WAVE
            0x66, 0x6d, 0x74, 0x20, // fmt_
            0x10, 0x00, 0x00, 0x00, // chunk size
            0x01, 0x00, // audio format
            0x01, 0x00, // num channels
            0x40, 0x1f, 0x00, 0x00, // sample rate
            0x80, 0x3e, 0x00, 0x00, // byte rate
            0x02, 0x00, // block align
            0x10, 0x00, // bits per sample
            0x64, 0x61, 0x74, 0x61, // data
            0x08, 0x00, 0x00, 0x00, // chunk size
            0x00, 0x00, 0xff, 0x3f, // sample 1, 2
            0x00, 0xc0, 0xff, 0xff, // sample 3, 4
            0x4c, 0x49, 0x53, 0x54, // LIST
            0x0e, 0x00, 0x00, 0x00, // chunk size
            0x49, 0x4e, 0x46, 0x4f, // INFO
            0x49, 0x53, 0x46, 0x54, // ISFT
            0x02, 0x00, 0x00, 0x00, // chunk size
            0x78, 0x00, // "x\0"
        ];

        let metadata = [InfoEntry::new(InfoTag::CreatingSoftware, "x")];

        assert_eq!(write(&[0, 16383, -16384, -1], &metadata), bytes);
    }

    #[test]
    fn pads_odd_metadata_entries() {
        let metadata = [
            InfoEntry::new(InfoTag::TrackTitle, "ab"),
            InfoEntry::new(InfoTag::Artist, "xyz"),
        ];

        let bytes = write(&[7], &metadata);

        // 44 header + 2 data, LIST + size + INFO, "INAM" 8 + "ab\0" + pad, "IART" 8 + "xyz\0"
        assert_eq!(bytes.len(), 46 + 12 + 12 + 12);
        assert_eq!(&bytes[46..50], b"LIST");
        assert_eq!(u32_at(&bytes, 50), 28);
        assert_eq!(&bytes[58..62], b"INAM");
        assert_eq!(u32_at(&bytes, 62), 3);
        assert_eq!(&bytes[66..70], &[b'a', b'b', 0x00, 0x00]);
        assert_eq!(&bytes[70..74], b"IART");
        assert_eq!(u32_at(&bytes, 74), 4);
        assert_eq!(&bytes[78..82], b"xyz\0");
        assert_eq!(u32_at(&bytes, 4) as usize, bytes.len() - 8);
        assert_eq!(u32_at(&bytes, 50) % 2, 0);
    }

    #[test]
    fn empty_file() {
        let bytes = write(&[], &[]);

        assert_eq!(bytes.len(), 44);
        assert_eq!(u32_at(&bytes, 4), 36);
        assert_eq!(u32_at(&bytes, 40), 0);
    }

    #[test]
    fn empty_metadata_writes_no_list() {
        assert_eq!(write(&[1, 2], &[]).len(), 48);
    }

    #[test]
    fn sizes_match_content() {
        let samples: Vec<i32> = (-500..500).map(|s| s * 31).collect();
        let metadata = [
            InfoEntry::new(InfoTag::Comment, "sweep from 20 Hz to 20000 Hz"),
            InfoEntry::new(InfoTag::Genre, "test"),
        ];

        let bytes = write(&samples, &metadata);

        assert_eq!(u32_at(&bytes, 4) as usize, bytes.len() - 8);
        assert_eq!(u32_at(&bytes, 40) as usize, samples.len() * 2);
        assert_eq!(bytes.len() % 2, 0);
    }

    #[test]
    fn output_is_deterministic() {
        let metadata = [InfoEntry::new(InfoTag::Keywords, "a, b")];

        assert_eq!(write(&[1, -1, 3], &metadata), write(&[1, -1, 3], &metadata));
    }

    #[test]
    fn round_trips_through_reader() {
        let samples = [32767, -32768, 0, 1, -1, 12345];
        let metadata = [
            InfoEntry::new(InfoTag::CreatingSoftware, "simplewave"),
            InfoEntry::new(InfoTag::CreatorName, "someone"),
        ];

        let wav = Wav::from_bytes(&write(&samples, &metadata)).unwrap();

        assert_eq!(wav.fmt.sample_rate, 8_000);
        assert_eq!(wav.samples, vec![32767, -32768, 0, 1, -1, 12345]);
        assert_eq!(wav.info, metadata);
    }

    #[test]
    fn rejects_out_of_range_samples() {
        let mut writer = WaveWriter::new(Cursor::new(vec![]), 8_000).unwrap();

        writer.write_samples(vec![1, 2]).unwrap();

        assert!(matches!(
            writer.write_samples(vec![3, 32768, 4]),
            Err(Error::SampleOutOfRange(32768))
        ));
        assert!(matches!(
            writer.write_sample(-32769),
            Err(Error::SampleOutOfRange(-32769))
        ));
        assert_eq!(writer.sample_count(), 2);

        writer.finish(&[]).unwrap();
        let bytes = writer.into_inner().into_inner();

        assert_eq!(bytes.len(), 48);
        assert_eq!(u32_at(&bytes, 40), 4);
    }

    #[test]
    fn accepts_narrow_sample_types() {
        let mut writer = WaveWriter::new(Cursor::new(vec![]), 8_000).unwrap();

        writer.write_samples(vec![i16::MIN, i16::MAX]).unwrap();
        writer.write_samples([1u8, 2u8]).unwrap();

        assert_eq!(writer.sample_count(), 4);
    }

    #[test]
    fn finish_only_once() {
        let mut writer = WaveWriter::new(Cursor::new(vec![]), 8_000).unwrap();
        writer.write_sample(0).unwrap();
        writer.finish(&[]).unwrap();

        assert!(writer.is_finished());
        assert!(matches!(writer.finish(&[]), Err(Error::AlreadyFinished)));
        assert!(matches!(writer.write_sample(0), Err(Error::AlreadyFinished)));
        assert!(matches!(
            writer.write_samples(vec![0]),
            Err(Error::AlreadyFinished)
        ));
        assert_eq!(writer.into_inner().into_inner().len(), 46);
    }

    #[test]
    fn offsets_are_relative_to_the_start_position() {
        let mut sink = Cursor::new(vec![0xaa; 3]);
        sink.set_position(3);

        let mut writer = WaveWriter::new(sink, 8_000).unwrap();
        writer.write_sample(5).unwrap();
        writer
            .finish(&[InfoEntry::new(InfoTag::Subject, "odd")])
            .unwrap();

        let bytes = writer.into_inner().into_inner();
        let wav = &bytes[3..];

        assert_eq!(&bytes[0..3], &[0xaa, 0xaa, 0xaa]);
        assert_eq!(u32_at(wav, 4) as usize, wav.len() - 8);
        assert_eq!(u32_at(wav, 40), 2);
        assert_eq!(wav.len() % 2, 0);
        assert_eq!(Wav::from_bytes(wav).unwrap().samples, vec![5]);
    }

    #[test]
    fn rejects_zero_sample_rate() {
        assert!(matches!(
            WaveWriter::new(Cursor::new(vec![]), 0),
            Err(Error::InvalidSampleRate(0))
        ));
    }

    #[test]
    fn rejects_batches_that_can_never_fit() {
        let mut writer = WaveWriter::new(Cursor::new(vec![]), 8_000).unwrap();

        assert!(matches!(
            writer.write_samples(std::iter::repeat(0i32).take(usize::MAX)),
            Err(Error::TooLarge(_))
        ));
        assert_eq!(writer.sample_count(), 0);
        assert_eq!(writer.into_inner().into_inner().len(), 44);
    }

    #[test]
    fn rejects_samples_past_the_data_size_limit() {
        let mut writer = WaveWriter::new(Cursor::new(vec![]), 8_000).unwrap();
        writer.sample_count = MAX_SAMPLES - 2;

        writer.write_samples(vec![1]).unwrap();
        writer.write_sample(2).unwrap();

        assert!(matches!(
            writer.write_sample(3),
            Err(Error::TooLarge(size)) if size == (MAX_SAMPLES + 1) * 2
        ));

        // No size hint, only counting the encoded batch catches it
        assert!(matches!(
            writer.write_samples(vec![4, 5, 6].into_iter().filter(|_| true)),
            Err(Error::TooLarge(_))
        ));
        assert_eq!(writer.sample_count(), MAX_SAMPLES);

        let bytes = writer.into_inner().into_inner();

        assert_eq!(bytes.len(), 48);
        assert_eq!(&bytes[44..48], &[0x01, 0x00, 0x02, 0x00]);
    }

    #[test]
    fn size_field_must_fit_32_bits() {
        assert_eq!(size_field(u32::MAX as u64).unwrap(), u32::MAX);
        assert!(matches!(
            size_field(u32::MAX as u64 + 1),
            Err(Error::TooLarge(4_294_967_296))
        ));
    }

    #[test]
    fn failed_finish_still_finishes() {
        let mut writer = WaveWriter::new(Cursor::new(vec![]), 8_000).unwrap();
        writer.sample_count = MAX_SAMPLES + 1;

        assert!(matches!(
            writer.finish(&[InfoEntry::new(InfoTag::Comment, "late")]),
            Err(Error::TooLarge(_))
        ));
        assert!(writer.is_finished());
        assert!(matches!(writer.finish(&[]), Err(Error::AlreadyFinished)));
        assert_eq!(writer.into_inner().into_inner().len(), 44);
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Seek for BrokenSink {
        fn seek(&mut self, _: SeekFrom) -> io::Result<u64> {
            Ok(0)
        }
    }

    #[test]
    fn propagates_sink_errors() {
        assert!(matches!(
            WaveWriter::new(BrokenSink, 8_000),
            Err(Error::Io(e)) if e.to_string() == "disk on fire"
        ));
    }
}
