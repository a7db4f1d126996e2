//! Recorded-audio pipeline: validate, decode, encode, upload.
//!
//! Steps run strictly in order and each run owns its buffers. Validation and
//! decode failures stop the run before any WAV or MP3 bytes exist.

use std::sync::Arc;

use crate::audio::format::{is_webm, normalize_mime};
use crate::audio::{
    AudioDecoder, EncodedAudio, Mp3CodecFactory, PcmBuffer, encode_mp3, encode_wav, validate,
};
use crate::error::{DecodeError, ErrorKind, PipelineError};
use crate::upload::{UploadClient, UploadResult, UploadTarget};

/// Name used when the capture has no filename.
pub const DEFAULT_RECORDING_NAME: &str = "recording";

/// File ready for upload: what gets transferred, under which name and type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedUpload {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Replace the extension of a WebM capture's filename with `.wav`.
pub fn converted_filename(filename: &str) -> String {
    let name = filename.trim();
    if name.is_empty() {
        return format!("{DEFAULT_RECORDING_NAME}.wav");
    }
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.contains(['/', '\\']) => {
            format!("{stem}.wav")
        }
        _ => format!("{name}.wav"),
    }
}

/// Validate a capture and turn it into an uploadable file.
///
/// WebM input is decoded and re-encoded as 16-bit WAV with a `.wav` name.
/// Other accepted types pass through unchanged.
pub fn prepare_recording(
    bytes: Vec<u8>,
    mime_type: &str,
    filename: &str,
    decoder: &dyn AudioDecoder,
) -> Result<PreparedUpload, PipelineError> {
    validate(mime_type)?;

    if !is_webm(mime_type) {
        return Ok(PreparedUpload {
            filename: filename.to_string(),
            mime_type: normalize_mime(mime_type),
            bytes,
        });
    }

    tracing::debug!(bytes = bytes.len(), "converting WebM capture to WAV");
    let pcm = decoder.decode(&bytes, Some(mime_type))?;
    let wav = encode_wav(pcm);
    tracing::debug!(bytes = wav.byte_len(), "WAV conversion complete");

    Ok(PreparedUpload {
        filename: converted_filename(filename),
        mime_type: wav.mime_type().to_string(),
        bytes: wav.into_bytes(),
    })
}

/// Prepare a capture and upload it to the recorded-audio endpoint.
///
/// Decoding runs on the blocking pool. Pipeline errors are reported as
/// [`UploadResult::Failure`] with the matching kind, like upload errors.
pub async fn upload_recording(
    client: &UploadClient,
    bytes: Vec<u8>,
    mime_type: &str,
    filename: &str,
    decoder: Arc<dyn AudioDecoder>,
) -> UploadResult {
    let mime = mime_type.to_string();
    let name = filename.to_string();
    let prepared = tokio::task::spawn_blocking(move || {
        prepare_recording(bytes, &mime, &name, decoder.as_ref())
    })
    .await;

    let prepared = match prepared {
        Ok(Ok(prepared)) => prepared,
        Ok(Err(e)) => {
            tracing::warn!(kind = %e.kind(), "recording rejected: {e}");
            return UploadResult::failure(e.kind(), e.to_string());
        }
        Err(e) => {
            tracing::warn!("conversion task failed: {e}");
            return UploadResult::failure(
                ErrorKind::DecodeError,
                "Audio conversion failed unexpectedly",
            );
        }
    };

    client
        .upload(
            UploadTarget::RecordedAudio,
            &prepared.filename,
            prepared.bytes,
            &prepared.mime_type,
        )
        .await
}

fn decode_accepted(
    bytes: &[u8],
    mime_type: &str,
    decoder: &dyn AudioDecoder,
) -> Result<PcmBuffer, PipelineError> {
    validate(mime_type)?;
    let pcm = decoder.decode(bytes, Some(mime_type))?;
    Ok(pcm)
}

/// Decode any accepted input and encode it as 16-bit WAV.
pub fn convert_to_wav(
    bytes: &[u8],
    mime_type: &str,
    decoder: &dyn AudioDecoder,
) -> Result<EncodedAudio, PipelineError> {
    let pcm = decode_accepted(bytes, mime_type, decoder)?;
    Ok(encode_wav(pcm))
}

/// Decode any accepted input and encode channel 0 as 128 kbps MP3.
pub fn convert_to_mp3(
    bytes: &[u8],
    mime_type: &str,
    decoder: &dyn AudioDecoder,
    factory: &dyn Mp3CodecFactory,
) -> Result<EncodedAudio, PipelineError> {
    let pcm = decode_accepted(bytes, mime_type, decoder)?;
    if pcm.channel_count() > 1 {
        tracing::debug!(
            channels = pcm.channel_count(),
            "MP3 output keeps channel 0 only"
        );
    }
    Ok(encode_mp3(pcm.first_channel(), factory)?)
}

/// Decoder that always fails; stands in when no decoder is compiled in.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableDecoder;

impl AudioDecoder for UnavailableDecoder {
    fn decode(&self, _bytes: &[u8], mime_hint: Option<&str>) -> Result<PcmBuffer, DecodeError> {
        Err(DecodeError::UnsupportedCodec(format!(
            "no decoder available for {}",
            mime_hint.unwrap_or("this input")
        )))
    }
}
