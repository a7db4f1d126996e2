//! Audio encoding: 16-bit PCM WAV and block-wise MP3.

#[cfg(feature = "embedded-encoder")]
mod embedded;
mod mp3;
mod wav;

use super::{EncodedAudio, PcmBuffer};
use crate::error::EncodeError;

#[cfg(feature = "embedded-encoder")]
pub use embedded::{LameCodec, LameCodecFactory};
pub use mp3::{DEFAULT_BITRATE_KBPS, MP3_BLOCK_SIZE, Mp3Codec, Mp3CodecFactory, Mp3Encoder, encode_mp3};
pub use wav::{WavEncoder, encode_wav};

/// Trait for turning decoded PCM into an uploadable byte stream.
pub trait AudioEncoder: Send + Sync {
    /// Encode a PCM buffer. The buffer is consumed.
    fn encode(&self, pcm: PcmBuffer) -> Result<EncodedAudio, EncodeError>;
}

/// Create the MP3 codec factory for the enabled features.
///
/// Without the `embedded-encoder` feature there is no codec, and callers get
/// `EncoderUnavailable` here instead of a failure halfway through encoding.
pub fn default_codec_factory() -> Result<Box<dyn Mp3CodecFactory>, EncodeError> {
    #[cfg(feature = "embedded-encoder")]
    {
        Ok(Box::new(embedded::LameCodecFactory))
    }

    #[cfg(not(feature = "embedded-encoder"))]
    {
        Err(EncodeError::EncoderUnavailable(
            "built without the 'embedded-encoder' feature".to_string(),
        ))
    }
}
