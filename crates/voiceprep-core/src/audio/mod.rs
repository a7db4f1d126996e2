//! Audio data model, format validation, decoding and encoding.

pub mod decoder;
pub mod encoder;
pub mod format;

use std::fmt;

use crate::error::DecodeError;

pub use decoder::{AudioDecoder, default_decoder};
#[cfg(feature = "ffmpeg")]
pub use decoder::FfmpegDecoder;
#[cfg(feature = "symphonia-decoder")]
pub use decoder::SymphoniaDecoder;
pub use encoder::{
    AudioEncoder, DEFAULT_BITRATE_KBPS, MP3_BLOCK_SIZE, Mp3Codec, Mp3CodecFactory, Mp3Encoder,
    WavEncoder, default_codec_factory, encode_mp3, encode_wav,
};
pub use format::{ACCEPTED_AUDIO_FORMATS, mime_for_extension, normalize_mime, validate};

/// Most channels a 16-bit WAV header can describe (block align is a u16).
pub const MAX_CHANNELS: usize = (u16::MAX / 2) as usize;

/// Decoded audio: per-channel float samples at a native sample rate.
///
/// Every channel holds the same number of frames. Samples are not clamped;
/// encoders clamp before quantizing.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl PcmBuffer {
    /// Build a buffer from per-channel sample arrays.
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> Result<Self, DecodeError> {
        if sample_rate == 0 {
            return Err(DecodeError::Malformed("sample rate must be positive".into()));
        }
        let Some(first) = channels.first() else {
            return Err(DecodeError::Malformed("audio has no channels".into()));
        };
        if channels.len() > MAX_CHANNELS {
            return Err(DecodeError::Malformed(format!(
                "{} channels exceed the limit of {MAX_CHANNELS}",
                channels.len()
            )));
        }
        let frames = first.len();
        if channels.iter().any(|c| c.len() != frames) {
            return Err(DecodeError::Malformed(
                "channels have different sample counts".into(),
            ));
        }
        Ok(Self {
            sample_rate,
            channels,
        })
    }

    /// Build a buffer from channel-interleaved samples.
    ///
    /// A trailing partial frame is dropped.
    pub fn from_interleaved(
        sample_rate: u32,
        channel_count: u16,
        samples: &[f32],
    ) -> Result<Self, DecodeError> {
        let count = channel_count as usize;
        if count == 0 {
            return Err(DecodeError::Malformed("audio has no channels".into()));
        }
        let mut channels = vec![Vec::with_capacity(samples.len() / count); count];
        for frame in samples.chunks_exact(count) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }
        Self::new(sample_rate, channels)
    }

    /// Single-channel silence of the given length.
    pub fn silence(sample_rate: u32, frames: usize) -> Result<Self, DecodeError> {
        Self::new(sample_rate, vec![vec![0.0; frames]])
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> u16 {
        self.channels.len() as u16
    }

    /// Per-channel sample count.
    pub fn frame_count(&self) -> usize {
        self.channels[0].len()
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Channel 0 as its own mono buffer. Other channels are dropped, not mixed.
    pub fn first_channel(self) -> Self {
        let Self {
            sample_rate,
            mut channels,
        } = self;
        channels.truncate(1);
        Self {
            sample_rate,
            channels,
        }
    }

    pub fn duration_secs(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate as f64
    }
}

/// MIME type of encoder output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioMime {
    Wav,
    Mp3,
}

impl AudioMime {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioMime::Wav => "audio/wav",
            AudioMime::Mp3 => "audio/mp3",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            AudioMime::Wav => "wav",
            AudioMime::Mp3 => "mp3",
        }
    }
}

impl fmt::Display for AudioMime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Encoder output, immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedAudio {
    mime: AudioMime,
    bytes: Vec<u8>,
}

impl EncodedAudio {
    pub fn new(mime: AudioMime, bytes: Vec<u8>) -> Self {
        Self { mime, bytes }
    }

    pub fn mime(&self) -> AudioMime {
        self.mime
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime.as_str()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_ragged_channels() {
        let result = PcmBuffer::new(16000, vec![vec![0.0; 4], vec![0.0; 3]]);
        assert!(matches!(result, Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn test_rejects_empty_and_zero_rate() {
        assert!(PcmBuffer::new(16000, vec![]).is_err());
        assert!(PcmBuffer::new(0, vec![vec![0.0]]).is_err());
    }

    #[test]
    fn test_channel_count_fits_wav_block_align() {
        let max = PcmBuffer::new(8000, vec![Vec::new(); MAX_CHANNELS]).unwrap();
        assert_eq!(max.channel_count() as usize, MAX_CHANNELS);

        let too_many = PcmBuffer::new(8000, vec![Vec::new(); MAX_CHANNELS + 1]);
        assert!(matches!(too_many, Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn test_from_interleaved() {
        let pcm = PcmBuffer::from_interleaved(8000, 2, &[0.1, -0.1, 0.2, -0.2, 0.3]).unwrap();
        assert_eq!(pcm.channel_count(), 2);
        assert_eq!(pcm.frame_count(), 2);
        assert_eq!(pcm.channel(0), Some(&[0.1, 0.2][..]));
        assert_eq!(pcm.channel(1), Some(&[-0.1, -0.2][..]));
    }

    #[test]
    fn test_first_channel_drops_the_rest() {
        let pcm = PcmBuffer::new(44100, vec![vec![0.5, 0.5], vec![-0.5, -0.5]]).unwrap();
        let mono = pcm.first_channel();
        assert_eq!(mono.channel_count(), 1);
        assert_eq!(mono.channel(0), Some(&[0.5, 0.5][..]));
        assert_eq!(mono.sample_rate(), 44100);
    }

    #[test]
    fn test_silence_duration() {
        let pcm = PcmBuffer::silence(16000, 16000).unwrap();
        assert!((pcm.duration_secs() - 1.0).abs() < f64::EPSILON);
    }
}
