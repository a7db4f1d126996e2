//! Canonical 44-byte RIFF/WAVE writer for 16-bit linear PCM.

use super::AudioEncoder;
use crate::audio::{AudioMime, EncodedAudio, PcmBuffer};
use crate::error::EncodeError;

const WAV_HEADER_LEN: usize = 44;
const BITS_PER_SAMPLE: u16 = 16;
const BYTES_PER_SAMPLE: u16 = 2;
const PCM_FORMAT_TAG: u16 = 1;
const FMT_CHUNK_LEN: u32 = 16;

/// WAV encoder. Channel count and sample rate pass through unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct WavEncoder;

impl AudioEncoder for WavEncoder {
    fn encode(&self, pcm: PcmBuffer) -> Result<EncodedAudio, EncodeError> {
        Ok(encode_wav(pcm))
    }
}

/// Encode PCM as a 16-bit WAV file, interleaving channels frame by frame.
pub fn encode_wav(pcm: PcmBuffer) -> EncodedAudio {
    let num_channels = pcm.channel_count();
    let sample_rate = pcm.sample_rate();
    let frame_count = pcm.frame_count();
    let data_len = frame_count * num_channels as usize * BYTES_PER_SAMPLE as usize;

    let mut out = Vec::with_capacity(WAV_HEADER_LEN + data_len);
    write_header(&mut out, num_channels, sample_rate, data_len as u32);

    let channels = pcm.channels();
    for frame in 0..frame_count {
        for channel in channels {
            out.extend_from_slice(&quantize(channel[frame]).to_le_bytes());
        }
    }

    tracing::debug!(
        channels = num_channels,
        sample_rate,
        frames = frame_count,
        bytes = out.len(),
        "encoded WAV"
    );

    EncodedAudio::new(AudioMime::Wav, out)
}

fn write_header(out: &mut Vec<u8>, num_channels: u16, sample_rate: u32, data_len: u32) {
    let block_align = num_channels * BYTES_PER_SAMPLE;
    let byte_rate = sample_rate * BYTES_PER_SAMPLE as u32 * num_channels as u32;

    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&FMT_CHUNK_LEN.to_le_bytes());
    out.extend_from_slice(&PCM_FORMAT_TAG.to_le_bytes());
    out.extend_from_slice(&num_channels.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
}

/// Clamp to [-1.0, 1.0] and scale: negatives by 0x8000, the rest by 0x7FFF.
pub(crate) fn quantize(sample: f32) -> i16 {
    let clamped = sample.clamp(-1.0, 1.0);
    let scaled = if clamped < 0.0 {
        clamped * 0x8000 as f32
    } else {
        clamped * 0x7FFF as f32
    };
    scaled.round() as i16
}
