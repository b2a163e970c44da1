//! Encoding format negotiation and WAV assembly.
//!
//! Capture formats are never assumed: [`negotiate_format`] probes a fixed
//! preference list against the active encoder and the first supported entry
//! wins.  [`encode`] then downmixes the buffered chunks to mono and writes
//! an in-memory WAV payload with `hound`.

use std::io::Cursor;

use thiserror::Error;

use super::capture::AudioChunk;

// ---------------------------------------------------------------------------
// AudioFormat
// ---------------------------------------------------------------------------

/// Encodings the capture pipeline knows how to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    /// 16-bit integer PCM in a WAV container.
    WavPcm16,
    /// 32-bit float PCM in a WAV container.
    WavFloat32,
}

impl AudioFormat {
    /// Declared MIME type, including the codec parameter.
    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioFormat::WavPcm16 => "audio/wav;codecs=pcm_s16le",
            AudioFormat::WavFloat32 => "audio/wav;codecs=pcm_f32le",
        }
    }

    /// File extension used when the payload is uploaded as a named file.
    pub fn file_extension(&self) -> &'static str {
        "wav"
    }
}

/// Probe order: first environment-supported format wins.
pub const PREFERRED_FORMATS: &[AudioFormat] = &[AudioFormat::WavPcm16, AudioFormat::WavFloat32];

// ---------------------------------------------------------------------------
// FormatProbe / negotiation
// ---------------------------------------------------------------------------

/// Capability check for a runtime encoder.
pub trait FormatProbe {
    /// Whether this encoder can produce `format`.
    fn supports(&self, format: AudioFormat) -> bool;
}

/// Walk [`PREFERRED_FORMATS`] and return the first format `probe` supports.
pub fn negotiate_format(probe: &dyn FormatProbe) -> Option<AudioFormat> {
    PREFERRED_FORMATS
        .iter()
        .copied()
        .find(|&format| probe.supports(format))
}

// ---------------------------------------------------------------------------
// EncodeError
// ---------------------------------------------------------------------------

/// Failure while serializing captured samples.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EncodeError {
    /// Nothing to encode — the chunk buffer carried no frames.
    #[error("no audio frames to encode")]
    NoFrames,

    /// The WAV writer rejected the data.
    #[error("wav encoding failed: {0}")]
    Wav(String),
}

// ---------------------------------------------------------------------------
// WavEncoder
// ---------------------------------------------------------------------------

/// Production encoder backed by `hound`.  Supports both WAV variants.
#[derive(Debug, Default)]
pub struct WavEncoder;

impl FormatProbe for WavEncoder {
    fn supports(&self, format: AudioFormat) -> bool {
        matches!(format, AudioFormat::WavPcm16 | AudioFormat::WavFloat32)
    }
}

/// Downmix interleaved samples to mono by averaging channels per frame.
pub fn downmix_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => samples.to_vec(),
        n => samples
            .chunks_exact(n as usize)
            .map(|frame| frame.iter().sum::<f32>() / n as f32)
            .collect(),
    }
}

/// Serialize `chunks` into a single mono WAV payload in `format`.
///
/// The sample rate of the first chunk is used for the whole payload; the
/// capture stream never changes rate mid-session.
pub fn encode(format: AudioFormat, chunks: &[AudioChunk]) -> Result<Vec<u8>, EncodeError> {
    let sample_rate = chunks
        .iter()
        .find(|c| c.frames() > 0)
        .map(|c| c.sample_rate)
        .ok_or(EncodeError::NoFrames)?;

    let mono: Vec<f32> = chunks
        .iter()
        .flat_map(|c| downmix_to_mono(&c.samples, c.channels))
        .collect();

    if mono.is_empty() {
        return Err(EncodeError::NoFrames);
    }

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: match format {
            AudioFormat::WavPcm16 => 16,
            AudioFormat::WavFloat32 => 32,
        },
        sample_format: match format {
            AudioFormat::WavPcm16 => hound::SampleFormat::Int,
            AudioFormat::WavFloat32 => hound::SampleFormat::Float,
        },
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| EncodeError::Wav(e.to_string()))?;

        match format {
            AudioFormat::WavPcm16 => {
                for &sample in &mono {
                    let clamped = sample.clamp(-1.0, 1.0);
                    let value = (clamped * i16::MAX as f32) as i16;
                    writer
                        .write_sample(value)
                        .map_err(|e| EncodeError::Wav(e.to_string()))?;
                }
            }
            AudioFormat::WavFloat32 => {
                for &sample in &mono {
                    writer
                        .write_sample(sample)
                        .map_err(|e| EncodeError::Wav(e.to_string()))?;
                }
            }
        }

        writer
            .finalize()
            .map_err(|e| EncodeError::Wav(e.to_string()))?;
    }

    Ok(cursor.into_inner())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
