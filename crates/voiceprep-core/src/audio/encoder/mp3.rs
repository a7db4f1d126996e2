//! Block-wise MP3 encoding over an injected codec.
//!
//! The codec itself (bit reservoir, psychoacoustics, frame packing) lives
//! behind [`Mp3Codec`]. This module only owns block sequencing: channel 0 is
//! fed in 1152-sample blocks, non-empty chunks are kept in emission order,
//! and the codec is flushed exactly once at the end.

use super::AudioEncoder;
use crate::audio::{AudioMime, EncodedAudio, PcmBuffer};
use crate::error::EncodeError;

/// Samples per block (one MPEG-1 Layer III frame).
pub const MP3_BLOCK_SIZE: usize = 1152;

/// Constant bitrate used unless the caller picks another.
pub const DEFAULT_BITRATE_KBPS: u32 = 128;

/// A stateful streaming MP3 codec, owned by a single encode call.
pub trait Mp3Codec {
    /// Feed one block of samples. May return an empty chunk while the codec buffers.
    fn encode_block(&mut self, block: &[f32]) -> Result<Vec<u8>, EncodeError>;

    /// Drain buffered state. Called once after the last block.
    fn flush(&mut self) -> Result<Vec<u8>, EncodeError>;
}

/// Creates a fresh codec per encode call.
pub trait Mp3CodecFactory: Send + Sync {
    fn create(
        &self,
        channels: u16,
        sample_rate: u32,
        bitrate_kbps: u32,
    ) -> Result<Box<dyn Mp3Codec>, EncodeError>;
}

impl<F> Mp3CodecFactory for F
where
    F: Fn(u16, u32, u32) -> Result<Box<dyn Mp3Codec>, EncodeError> + Send + Sync,
{
    fn create(
        &self,
        channels: u16,
        sample_rate: u32,
        bitrate_kbps: u32,
    ) -> Result<Box<dyn Mp3Codec>, EncodeError> {
        self(channels, sample_rate, bitrate_kbps)
    }
}

/// Mono MP3 encoder bound to a codec factory.
pub struct Mp3Encoder {
    factory: Box<dyn Mp3CodecFactory>,
    bitrate_kbps: u32,
}

impl Mp3Encoder {
    pub fn new(factory: Box<dyn Mp3CodecFactory>) -> Self {
        Self {
            factory,
            bitrate_kbps: DEFAULT_BITRATE_KBPS,
        }
    }

    /// Encoder using the codec compiled into this build.
    pub fn with_default_codec() -> Result<Self, EncodeError> {
        Ok(Self::new(super::default_codec_factory()?))
    }

    pub fn with_bitrate(mut self, bitrate_kbps: u32) -> Self {
        self.bitrate_kbps = bitrate_kbps;
        self
    }

    pub fn bitrate_kbps(&self) -> u32 {
        self.bitrate_kbps
    }
}

impl AudioEncoder for Mp3Encoder {
    fn encode(&self, pcm: PcmBuffer) -> Result<EncodedAudio, EncodeError> {
        encode_blocks(self.factory.as_ref(), pcm, self.bitrate_kbps)
    }
}

/// Encode mono PCM to MP3 at [`DEFAULT_BITRATE_KBPS`].
pub fn encode_mp3(
    pcm: PcmBuffer,
    factory: &dyn Mp3CodecFactory,
) -> Result<EncodedAudio, EncodeError> {
    encode_blocks(factory, pcm, DEFAULT_BITRATE_KBPS)
}

fn encode_blocks(
    factory: &dyn Mp3CodecFactory,
    pcm: PcmBuffer,
    bitrate_kbps: u32,
) -> Result<EncodedAudio, EncodeError> {
    if pcm.channel_count() != 1 {
        return Err(EncodeError::UnsupportedChannels(pcm.channel_count()));
    }

    let mut codec = factory.create(1, pcm.sample_rate(), bitrate_kbps)?;
    let samples = &pcm.channels()[0];

    let mut mp3_data = Vec::new();
    let mut blocks = 0usize;
    for block in samples.chunks(MP3_BLOCK_SIZE) {
        let chunk = codec.encode_block(block)?;
        if !chunk.is_empty() {
            mp3_data.extend_from_slice(&chunk);
        }
        blocks += 1;
    }

    let tail = codec.flush()?;
    if !tail.is_empty() {
        mp3_data.extend_from_slice(&tail);
    }

    tracing::debug!(
        sample_rate = pcm.sample_rate(),
        bitrate_kbps,
        blocks,
        bytes = mp3_data.len(),
        "encoded MP3"
    );

    Ok(EncodedAudio::new(AudioMime::Mp3, mp3_data))
}
