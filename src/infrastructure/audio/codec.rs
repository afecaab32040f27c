use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::io::Cursor;

/// Sample rate of the raw PCM stream returned by the speech provider
pub const PROVIDER_SAMPLE_RATE: u32 = 24_000;

/// Size of the canonical PCM container header written by `encode_container`
pub const CONTAINER_HEADER_LEN: usize = 44;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("payload is not valid base64: {0}")]
    Transport(#[from] base64::DecodeError),
    #[error("sample stream of {len} bytes is not a multiple of the {block_align}-byte frame")]
    Misaligned { len: usize, block_align: usize },
    #[error("unsupported sample layout: {0}")]
    Unsupported(String),
    #[error("container error: {0}")]
    Container(#[from] hound::Error),
}

/// Layout of a raw little-endian PCM stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl Default for PcmFormat {
    fn default() -> Self {
        Self {
            sample_rate: PROVIDER_SAMPLE_RATE,
            channels: 1,
            bits_per_sample: 16,
        }
    }
}

impl PcmFormat {
    pub fn block_align(&self) -> usize {
        self.channels as usize * (self.bits_per_sample as usize / 8)
    }

    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * self.block_align() as u32
    }

    fn wav_spec(&self) -> hound::WavSpec {
        hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: self.bits_per_sample,
            sample_format: hound::SampleFormat::Int,
        }
    }
}

/// Turn the provider's text-safe payload back into raw sample bytes.
pub fn decode_payload(encoded: &str) -> Result<Vec<u8>, CodecError> {
    Ok(BASE64.decode(encoded.trim())?)
}

/// Wrap a raw 16-bit PCM stream in a RIFF/WAVE container.
///
/// The header is the canonical 44-byte PCM layout, all fields little-endian,
/// and the data chunk length equals `samples.len()`.
pub fn encode_container(samples: &[u8], format: PcmFormat) -> Result<Vec<u8>, CodecError> {
    if format.bits_per_sample != 16 || format.channels == 0 || format.channels > 2 {
        return Err(CodecError::Unsupported(format!(
            "{} channel(s) at {} bits",
            format.channels, format.bits_per_sample
        )));
    }

    let block_align = format.block_align();
    if samples.len() % block_align != 0 {
        return Err(CodecError::Misaligned {
            len: samples.len(),
            block_align,
        });
    }

    let mut cursor = Cursor::new(Vec::with_capacity(CONTAINER_HEADER_LEN + samples.len()));
    {
        let mut writer = hound::WavWriter::new(&mut cursor, format.wav_spec())?;
        for frame in samples.chunks_exact(2) {
            writer.write_sample(i16::from_le_bytes([frame[0], frame[1]]))?;
        }
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}

/// Read a container produced by `encode_container` back into its format and
/// raw sample bytes.
pub fn decode_container(container: &[u8]) -> Result<(PcmFormat, Vec<u8>), CodecError> {
    let mut reader = hound::WavReader::new(Cursor::new(container))?;
    let spec = reader.spec();
    if spec.bits_per_sample != 16 || spec.sample_format != hound::SampleFormat::Int {
        return Err(CodecError::Unsupported(format!(
            "{:?} at {} bits",
            spec.sample_format, spec.bits_per_sample
        )));
    }

    let mut samples = Vec::with_capacity(reader.len() as usize * 2);
    for sample in reader.samples::<i16>() {
        samples.extend_from_slice(&sample?.to_le_bytes());
    }

    let format = PcmFormat {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        bits_per_sample: spec.bits_per_sample,
    };
    Ok((format, samples))
}

/// Byte-level concatenation in input order. No resampling or padding; the
/// buffers are assumed to share one `PcmFormat`.
pub fn concatenate<B: AsRef<[u8]>>(buffers: &[B]) -> Vec<u8> {
    let total = buffers.iter().map(|b| b.as_ref().len()).sum();
    let mut merged = Vec::with_capacity(total);
    for buffer in buffers {
        merged.extend_from_slice(buffer.as_ref());
    }
    merged
}
