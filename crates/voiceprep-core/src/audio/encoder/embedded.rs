//! Embedded LAME codec behind the [`Mp3Codec`] boundary.

use mp3lame_encoder::{Bitrate, Builder, FlushNoGap, MonoPcm, Quality};

use super::mp3::{Mp3Codec, Mp3CodecFactory};
use crate::error::EncodeError;

/// Builds [`LameCodec`] instances using the mp3lame-encoder crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct LameCodecFactory;

impl Mp3CodecFactory for LameCodecFactory {
    fn create(
        &self,
        channels: u16,
        sample_rate: u32,
        bitrate_kbps: u32,
    ) -> Result<Box<dyn Mp3Codec>, EncodeError> {
        Ok(Box::new(LameCodec::new(channels, sample_rate, bitrate_kbps)?))
    }
}

/// One LAME encoder instance. Never shared between encode calls.
pub struct LameCodec {
    encoder: mp3lame_encoder::Encoder,
    samples_in: usize,
}

impl LameCodec {
    /// Build and configure the LAME encoder.
    pub fn new(channels: u16, sample_rate: u32, bitrate_kbps: u32) -> Result<Self, EncodeError> {
        if channels != 1 {
            return Err(EncodeError::UnsupportedChannels(channels));
        }
        let bitrate = bitrate_from_kbps(bitrate_kbps)?;

        let mut builder = Builder::new().ok_or_else(|| {
            EncodeError::EncoderUnavailable("Failed to create LAME builder".to_string())
        })?;

        builder
            .set_num_channels(1)
            .map_err(|e| unavailable("Failed to set channels", e))?;

        builder
            .set_sample_rate(sample_rate)
            .map_err(|e| unavailable("Failed to set sample rate", e))?;

        builder
            .set_brate(bitrate)
            .map_err(|e| unavailable("Failed to set bitrate", e))?;

        builder
            .set_quality(Quality::Best)
            .map_err(|e| unavailable("Failed to set quality", e))?;

        let encoder = builder
            .build()
            .map_err(|e| unavailable("Failed to initialize LAME encoder", e))?;

        Ok(Self {
            encoder,
            samples_in: 0,
        })
    }
}

impl Mp3Codec for LameCodec {
    fn encode_block(&mut self, block: &[f32]) -> Result<Vec<u8>, EncodeError> {
        let i16_samples = samples_to_i16(block);

        let mut mp3_data = Vec::new();
        mp3_data.reserve(mp3lame_encoder::max_required_buffer_size(i16_samples.len()));

        let encoded_size = self
            .encoder
            .encode(MonoPcm(i16_samples.as_slice()), mp3_data.spare_capacity_mut())
            .map_err(|e| EncodeError::Codec(format!("Failed to encode MP3: {e:?}")))?;

        // SAFETY: encode returns the number of bytes it initialized at the
        // start of the spare capacity.
        unsafe {
            mp3_data.set_len(encoded_size);
        }
        self.samples_in += block.len();

        Ok(mp3_data)
    }

    fn flush(&mut self) -> Result<Vec<u8>, EncodeError> {
        // LAME reports "strange error flushing buffer" on stderr when it
        // never saw a sample; there is nothing to drain in that case.
        if self.samples_in == 0 {
            return Ok(Vec::new());
        }

        let mut mp3_data = Vec::new();
        mp3_data.reserve(mp3lame_encoder::max_required_buffer_size(0));

        let flush_size = self
            .encoder
            .flush::<FlushNoGap>(mp3_data.spare_capacity_mut())
            .map_err(|e| EncodeError::Codec(format!("Failed to flush MP3 encoder: {e:?}")))?;

        // SAFETY: flush returns the number of bytes it initialized.
        unsafe {
            mp3_data.set_len(flush_size);
        }

        Ok(mp3_data)
    }
}

fn unavailable(what: &str, err: impl std::fmt::Debug) -> EncodeError {
    EncodeError::EncoderUnavailable(format!("{what}: {err:?}"))
}

fn bitrate_from_kbps(kbps: u32) -> Result<Bitrate, EncodeError> {
    let bitrate = match kbps {
        8 => Bitrate::Kbps8,
        16 => Bitrate::Kbps16,
        24 => Bitrate::Kbps24,
        32 => Bitrate::Kbps32,
        40 => Bitrate::Kbps40,
        48 => Bitrate::Kbps48,
        64 => Bitrate::Kbps64,
        80 => Bitrate::Kbps80,
        96 => Bitrate::Kbps96,
        112 => Bitrate::Kbps112,
        128 => Bitrate::Kbps128,
        160 => Bitrate::Kbps160,
        192 => Bitrate::Kbps192,
        224 => Bitrate::Kbps224,
        256 => Bitrate::Kbps256,
        320 => Bitrate::Kbps320,
        other => {
            return Err(EncodeError::EncoderUnavailable(format!(
                "unsupported MP3 bitrate: {other} kbps"
            )));
        }
    };
    Ok(bitrate)
}

/// LAME takes 16-bit input; clamp and scale here.
fn samples_to_i16(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|&s| {
            let clamped = s.clamp(-1.0, 1.0);
            (clamped * i16::MAX as f32) as i16
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::encoder::{MP3_BLOCK_SIZE, encode_mp3};
    use crate::audio::PcmBuffer;

    #[test]
    fn test_rejects_unknown_bitrate() {
        assert!(matches!(
            LameCodec::new(1, 44100, 100),
            Err(EncodeError::EncoderUnavailable(_))
        ));
    }

    #[test]
    fn test_encodes_tone_to_mp3_frames() {
        let samples: Vec<f32> = (0..MP3_BLOCK_SIZE * 20)
            .map(|i| (i as f32 * 440.0 * 2.0 * std::f32::consts::PI / 44100.0).sin() * 0.5)
            .collect();
        let pcm = PcmBuffer::new(44100, vec![samples]).unwrap();

        let mp3 = encode_mp3(pcm, &LameCodecFactory).unwrap();
        let bytes = mp3.bytes();

        assert!(!bytes.is_empty());
        // MPEG audio frame sync: 11 set bits
        let has_sync = bytes
            .windows(2)
            .any(|w| w[0] == 0xFF && (w[1] & 0xE0) == 0xE0);
        assert!(has_sync);
    }

    #[test]
    fn test_empty_input_yields_empty_mp3() {
        let pcm = PcmBuffer::silence(16000, 0).unwrap();
        let mp3 = encode_mp3(pcm, &LameCodecFactory).unwrap();
        assert_eq!(mp3.byte_len(), 0);

        let mut codec = LameCodec::new(1, 16000, 128).unwrap();
        assert_eq!(codec.flush().unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_flush_drains_buffered_frames() {
        let mut codec = LameCodec::new(1, 44100, 128).unwrap();
        let block = vec![0.25f32; MP3_BLOCK_SIZE];

        let head = codec.encode_block(&block).unwrap();
        let tail = codec.flush().unwrap();

        assert!(!head.is_empty() || !tail.is_empty());
        assert!(tail.len() <= mp3lame_encoder::max_required_buffer_size(0));
        assert!(head.len() + tail.len() < 4 * 1441);
    }
}
