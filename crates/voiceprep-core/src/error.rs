//! Error types for the ingestion pipeline.
//!
//! Validation, decode and encode failures are returned as typed errors and
//! abort the pipeline. Upload failures never surface here; they are folded
//! into [`crate::upload::UploadResult::Failure`] instead.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure category shared by pipeline errors and upload results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    InvalidFormat,
    DecodeError,
    EncoderUnavailable,
    NetworkError,
    ServerRejected,
    MalformedResponse,
    ApplicationError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidFormat => "invalid-format",
            ErrorKind::DecodeError => "decode-error",
            ErrorKind::EncoderUnavailable => "encoder-unavailable",
            ErrorKind::NetworkError => "network-error",
            ErrorKind::ServerRejected => "server-rejected",
            ErrorKind::MalformedResponse => "malformed-response",
            ErrorKind::ApplicationError => "application-error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rejected before any decode or encode work.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Unsupported audio format: {mime_type}. Supported formats: WAV, MP3, WebM")]
    InvalidFormat { mime_type: String },
}

/// Compressed input could not be turned into PCM.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Could not read the audio container: {0}")]
    Malformed(String),

    #[error("The audio codec in this file is not supported: {0}")]
    UnsupportedCodec(String),

    #[error("The audio data is incomplete: {0}")]
    Truncated(String),
}

/// Encoding failed or the codec dependency is missing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("MP3 encoder is not available: {0}")]
    EncoderUnavailable(String),

    #[error("MP3 encoding requires mono input, got {0} channels")]
    UnsupportedChannels(u16),

    #[error("MP3 encoding failed: {0}")]
    Codec(String),
}

impl EncodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EncodeError::UnsupportedChannels(_) => ErrorKind::InvalidFormat,
            EncodeError::EncoderUnavailable(_) | EncodeError::Codec(_) => {
                ErrorKind::EncoderUnavailable
            }
        }
    }
}

/// Any failure that aborts a prepare/convert pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Format(_) => ErrorKind::InvalidFormat,
            PipelineError::Decode(_) => ErrorKind::DecodeError,
            PipelineError::Encode(e) => e.kind(),
        }
    }
}
