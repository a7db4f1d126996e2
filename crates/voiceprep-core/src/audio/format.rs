//! MIME-type checks run before any decode or encode work.

use crate::error::FormatError;

/// Container types accepted for recorded audio.
pub const ACCEPTED_AUDIO_FORMATS: &[&str] = &["audio/wav", "audio/mp3", "audio/mpeg", "audio/webm"];

/// Lowercase a MIME type and drop parameters (`audio/webm;codecs=opus` -> `audio/webm`).
pub fn normalize_mime(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// Check an observed MIME type against [`ACCEPTED_AUDIO_FORMATS`].
pub fn validate(mime_type: &str) -> Result<(), FormatError> {
    let normalized = normalize_mime(mime_type);
    if !ACCEPTED_AUDIO_FORMATS.contains(&normalized.as_str()) {
        tracing::warn!(mime_type, "rejected unsupported audio format");
        return Err(FormatError::InvalidFormat {
            mime_type: mime_type.to_string(),
        });
    }
    tracing::debug!(mime_type = %normalized, "audio format accepted");
    Ok(())
}

pub(crate) fn is_webm(mime_type: &str) -> bool {
    normalize_mime(mime_type) == "audio/webm"
}

/// Best-effort MIME type for a file extension.
pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    match extension.to_ascii_lowercase().as_str() {
        "wav" => Some("audio/wav"),
        "mp3" => Some("audio/mpeg"),
        "webm" => Some("audio/webm"),
        "ogg" | "oga" => Some("audio/ogg"),
        "flac" => Some("audio/flac"),
        "m4a" => Some("audio/mp4"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        _ => None,
    }
}
