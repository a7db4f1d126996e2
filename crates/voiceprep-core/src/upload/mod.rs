//! Upload of encoded files to the backend file endpoints.
//!
//! All endpoints share one format:
//! - Multipart form upload with a single `file` field
//! - `POST {api_base}/api/v1/files/upload/{target}`
//! - JSON response `{ success, imageUrl | audioUrl, message }`
//!
//! [`UploadClient::upload`] never returns `Err`; every failure is folded into
//! [`UploadResult::Failure`] with an [`ErrorKind`] and a displayable message.
//! No retries are attempted.

mod response;

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use crate::audio::EncodedAudio;
use crate::audio::format::normalize_mime;
use crate::error::ErrorKind;
use crate::http::build_http_client;
use crate::settings::Settings;

pub use response::{UploadResponse, classify_response, resolve_url};

/// Path prefix shared by all file endpoints.
pub const FILES_API_PREFIX: &str = "/api/v1/files";

/// Destination endpoint for an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadTarget {
    Image,
    TrainingAudio,
    ReferenceAudio,
    RecordedAudio,
}

impl UploadTarget {
    /// Path segment after `/upload/`.
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadTarget::Image => "image",
            UploadTarget::TrainingAudio => "training-audio",
            UploadTarget::ReferenceAudio => "reference-audio",
            UploadTarget::RecordedAudio => "recorded-audio",
        }
    }

    /// Endpoint path relative to the API base.
    pub fn endpoint_path(&self) -> String {
        format!("{FILES_API_PREFIX}/upload/{}", self.as_str())
    }

    /// JSON field carrying the stored file's URL.
    pub fn url_field(&self) -> &'static str {
        match self {
            UploadTarget::Image => "imageUrl",
            _ => "audioUrl",
        }
    }

    /// MIME types the endpoint stores.
    pub fn accepted_mime_types(&self) -> &'static [&'static str] {
        match self {
            UploadTarget::Image => &["image/jpeg", "image/png", "image/jpg"],
            UploadTarget::TrainingAudio | UploadTarget::ReferenceAudio => {
                &["audio/wav", "audio/mpeg", "audio/mp3", "audio/x-wav"]
            }
            UploadTarget::RecordedAudio => &["audio/wav", "audio/x-wav", "audio/mpeg", "audio/mp3"],
        }
    }

    pub fn accepts(&self, mime_type: &str) -> bool {
        let normalized = normalize_mime(mime_type);
        self.accepted_mime_types().contains(&normalized.as_str())
    }

    pub fn all() -> &'static [UploadTarget] {
        &[
            UploadTarget::Image,
            UploadTarget::TrainingAudio,
            UploadTarget::ReferenceAudio,
            UploadTarget::RecordedAudio,
        ]
    }

    /// Human-readable name for messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            UploadTarget::Image => "image",
            UploadTarget::TrainingAudio => "training audio",
            UploadTarget::ReferenceAudio => "reference audio",
            UploadTarget::RecordedAudio => "recorded audio",
        }
    }
}

impl fmt::Display for UploadTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UploadTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" => Ok(UploadTarget::Image),
            "training-audio" | "training" => Ok(UploadTarget::TrainingAudio),
            "reference-audio" | "reference" => Ok(UploadTarget::ReferenceAudio),
            "recorded-audio" | "recorded" => Ok(UploadTarget::RecordedAudio),
            _ => Err(format!(
                "Unknown upload target: {s}. Available: image, training-audio, reference-audio, recorded-audio"
            )),
        }
    }
}

/// Outcome of an upload. Returned as a value, never raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadResult {
    Success { url: String },
    Failure { kind: ErrorKind, message: String },
}

impl UploadResult {
    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        UploadResult::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, UploadResult::Success { .. })
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            UploadResult::Success { url } => Some(url),
            UploadResult::Failure { .. } => None,
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            UploadResult::Success { .. } => None,
            UploadResult::Failure { kind, .. } => Some(*kind),
        }
    }

    /// Convert to a `Result` for callers that want `?`.
    pub fn into_result(self) -> Result<String, (ErrorKind, String)> {
        match self {
            UploadResult::Success { url } => Ok(url),
            UploadResult::Failure { kind, message } => Err((kind, message)),
        }
    }
}

/// Upload client bound to one backend.
#[derive(Debug, Clone)]
pub struct UploadClient {
    client: reqwest::Client,
    api_base: String,
}

impl UploadClient {
    /// Build a client from settings (base URL and timeout).
    pub fn from_settings(settings: &Settings) -> reqwest::Result<Self> {
        Ok(Self::with_client(
            build_http_client(settings)?,
            settings.api_base(),
        ))
    }

    /// Use an existing reqwest client, e.g. to share a connection pool.
    pub fn with_client(client: reqwest::Client, api_base: &str) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Full endpoint URL for a target.
    pub fn endpoint_url(&self, target: UploadTarget) -> String {
        format!("{}{}", self.api_base, target.endpoint_path())
    }

    /// Upload raw bytes as a single multipart `file` field.
    ///
    /// # Parameters
    /// - `target`: Endpoint class; decides path, accepted types and URL field
    /// - `filename`: Name sent with the file part
    /// - `bytes`: File content
    /// - `mime_type`: Declared content type of the file part
    pub async fn upload(
        &self,
        target: UploadTarget,
        filename: &str,
        bytes: Vec<u8>,
        mime_type: &str,
    ) -> UploadResult {
        if !target.accepts(mime_type) {
            tracing::warn!(%target, mime_type, "upload rejected before sending");
            return UploadResult::failure(
                ErrorKind::InvalidFormat,
                format!(
                    "Upload failed: {mime_type} files are not accepted as {}",
                    target.display_name()
                ),
            );
        }

        let part = match reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(mime_type)
        {
            Ok(part) => part,
            Err(e) => {
                tracing::warn!("invalid MIME type {mime_type}: {e}");
                return UploadResult::failure(
                    ErrorKind::InvalidFormat,
                    format!("Upload failed: invalid file type {mime_type}"),
                );
            }
        };
        let form = reqwest::multipart::Form::new().part("file", part);

        let url = self.endpoint_url(target);
        tracing::debug!(%url, filename, mime_type, "uploading file");

        let response = match self.client.post(&url).multipart(form).send().await {
            Ok(response) => response,
            Err(e) => return network_failure(&e),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return network_failure(&e),
        };

        let result = classify_response(status.as_u16(), &body, target, &self.api_base);
        match &result {
            UploadResult::Success { url } => tracing::debug!(%url, "upload stored"),
            UploadResult::Failure { kind, message } => {
                tracing::warn!(%kind, status = status.as_u16(), "{message}")
            }
        }
        result
    }

    /// Upload encoder output under its own MIME type.
    pub async fn upload_audio(
        &self,
        target: UploadTarget,
        filename: &str,
        audio: EncodedAudio,
    ) -> UploadResult {
        let mime_type = audio.mime_type();
        self.upload(target, filename, audio.into_bytes(), mime_type)
            .await
    }

    /// Like [`UploadClient::upload`], but gives up when `cancel` completes first.
    ///
    /// A cancelled upload reports [`ErrorKind::NetworkError`]; nothing is resumed.
    pub async fn upload_until<C>(
        &self,
        target: UploadTarget,
        filename: &str,
        bytes: Vec<u8>,
        mime_type: &str,
        cancel: C,
    ) -> UploadResult
    where
        C: Future<Output = ()>,
    {
        tokio::select! {
            result = self.upload(target, filename, bytes, mime_type) => result,
            () = cancel => {
                tracing::warn!(%target, "upload cancelled");
                UploadResult::failure(ErrorKind::NetworkError, "Upload was cancelled")
            }
        }
    }
}

fn network_failure(err: &reqwest::Error) -> UploadResult {
    tracing::warn!("upload transport error: {err:?}");
    let message = if err.is_timeout() {
        "Upload timed out. Check your connection and try again."
    } else if err.is_connect() {
        "Could not connect to the upload server."
    } else {
        "Network error while uploading."
    };
    UploadResult::failure(ErrorKind::NetworkError, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_paths() {
        let paths: Vec<String> = UploadTarget::all()
            .iter()
            .map(|t| t.endpoint_path())
            .collect();
        assert_eq!(
            paths,
            vec![
                "/api/v1/files/upload/image",
                "/api/v1/files/upload/training-audio",
                "/api/v1/files/upload/reference-audio",
                "/api/v1/files/upload/recorded-audio",
            ]
        );
    }

    #[test]
    fn test_target_round_trips_through_str() {
        for target in UploadTarget::all() {
            assert_eq!(target.as_str().parse::<UploadTarget>(), Ok(*target));
        }
        assert!("video".parse::<UploadTarget>().is_err());
    }

    #[test]
    fn test_accepted_types() {
        assert!(UploadTarget::Image.accepts("image/png"));
        assert!(!UploadTarget::Image.accepts("audio/wav"));
        assert!(UploadTarget::RecordedAudio.accepts("audio/wav"));
        assert!(UploadTarget::TrainingAudio.accepts("Audio/MPEG"));
        assert!(!UploadTarget::RecordedAudio.accepts("audio/webm"));
    }

    #[test]
    fn test_url_field() {
        assert_eq!(UploadTarget::Image.url_field(), "imageUrl");
        assert_eq!(UploadTarget::ReferenceAudio.url_field(), "audioUrl");
    }

    #[test]
    fn test_endpoint_url_trims_base() {
        let client = UploadClient::with_client(reqwest::Client::new(), "http://host:8000/");
        assert_eq!(
            client.endpoint_url(UploadTarget::Image),
            "http://host:8000/api/v1/files/upload/image"
        );
    }

    #[tokio::test]
    async fn test_rejects_mismatched_type_without_network() {
        let client = UploadClient::with_client(reqwest::Client::new(), "http://127.0.0.1:9");
        let result = client
            .upload(UploadTarget::Image, "a.wav", vec![0; 4], "audio/wav")
            .await;
        assert_eq!(result.kind(), Some(ErrorKind::InvalidFormat));
    }

    #[tokio::test]
    async fn test_cancelled_upload_is_network_error() {
        let client = UploadClient::with_client(reqwest::Client::new(), "http://10.255.255.1:81");
        let result = client
            .upload_until(
                UploadTarget::RecordedAudio,
                "a.wav",
                vec![0; 4],
                "audio/wav",
                std::future::ready(()),
            )
            .await;
        assert_eq!(result.kind(), Some(ErrorKind::NetworkError));
    }
}
