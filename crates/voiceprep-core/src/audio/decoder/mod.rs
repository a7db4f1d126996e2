//! Decoding compressed recordings into [`PcmBuffer`]s.
//!
//! Container and codec parsing is not done here. Callers inject an
//! [`AudioDecoder`]; the `ffmpeg` and `symphonia-decoder` features provide one
//! each.

#[cfg(feature = "symphonia-decoder")]
mod container;
#[cfg(feature = "ffmpeg")]
mod ffmpeg;

use super::PcmBuffer;
use crate::error::DecodeError;

#[cfg(feature = "symphonia-decoder")]
pub use container::SymphoniaDecoder;
#[cfg(feature = "ffmpeg")]
pub use ffmpeg::FfmpegDecoder;

/// Trait for decoding compressed audio bytes to float PCM at the native rate.
pub trait AudioDecoder: Send + Sync {
    /// Decode a complete container.
    ///
    /// # Parameters
    /// - `bytes`: The compressed container (WebM/Opus, WAV, MP3, ...)
    /// - `mime_hint`: Declared MIME type, used to improve probing
    fn decode(&self, bytes: &[u8], mime_hint: Option<&str>) -> Result<PcmBuffer, DecodeError>;
}

impl<D: AudioDecoder + ?Sized> AudioDecoder for &D {
    fn decode(&self, bytes: &[u8], mime_hint: Option<&str>) -> Result<PcmBuffer, DecodeError> {
        (**self).decode(bytes, mime_hint)
    }
}

impl<D: AudioDecoder + ?Sized> AudioDecoder for Box<D> {
    fn decode(&self, bytes: &[u8], mime_hint: Option<&str>) -> Result<PcmBuffer, DecodeError> {
        (**self).decode(bytes, mime_hint)
    }
}

/// Create the decoder for the enabled features, if any.
///
/// FFmpeg is preferred when the `ffmpeg` feature is on and the binary can be
/// started, since it is the only built-in option that reads WebM/Opus.
pub fn default_decoder() -> Option<Box<dyn AudioDecoder>> {
    #[cfg(feature = "ffmpeg")]
    {
        let ffmpeg = FfmpegDecoder::new();
        if ffmpeg.is_available() {
            return Some(Box::new(ffmpeg));
        }
        tracing::warn!("ffmpeg not found; WebM/Opus recordings cannot be decoded");
    }

    fallback_decoder()
}

#[cfg(feature = "symphonia-decoder")]
fn fallback_decoder() -> Option<Box<dyn AudioDecoder>> {
    Some(Box::new(SymphoniaDecoder::new()))
}

#[cfg(not(feature = "symphonia-decoder"))]
fn fallback_decoder() -> Option<Box<dyn AudioDecoder>> {
    None
}
