//! Classification of upload responses.

use serde::Deserialize;

use super::{UploadResult, UploadTarget};
use crate::error::ErrorKind;

/// JSON envelope returned by the file endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// FastAPI-style error detail
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl UploadResponse {
    fn url_for(&self, target: UploadTarget) -> Option<&str> {
        let url = match target {
            UploadTarget::Image => self.image_url.as_deref(),
            _ => self.audio_url.as_deref(),
        };
        url.filter(|u| !u.trim().is_empty())
    }

    fn server_message(&self) -> Option<String> {
        if let Some(message) = self.message.as_deref().filter(|m| !m.trim().is_empty()) {
            return Some(message.to_string());
        }
        match &self.detail {
            Some(serde_json::Value::String(detail)) => Some(detail.clone()),
            Some(detail) => Some(detail.to_string()),
            None => None,
        }
    }
}

/// Map an HTTP status and body onto an [`UploadResult`].
///
/// Success requires a 2xx status, `success == true` and the target's URL
/// field. Relative URLs are joined onto `api_base`.
pub fn classify_response(
    status: u16,
    body: &str,
    target: UploadTarget,
    api_base: &str,
) -> UploadResult {
    if !(200..300).contains(&status) {
        let server_message = parse_envelope(body)
            .ok()
            .and_then(|r| r.server_message());
        let message = match server_message {
            Some(msg) => format!("Upload failed (HTTP {status}): {msg}"),
            None => format!("Upload failed (HTTP {status})"),
        };
        return UploadResult::failure(ErrorKind::ServerRejected, message);
    }

    let response = match parse_envelope(body) {
        Ok(response) => response,
        Err(reason) => {
            tracing::debug!("unparsable upload response: {reason}");
            return UploadResult::failure(
                ErrorKind::MalformedResponse,
                "Upload failed: the server sent a response that could not be read",
            );
        }
    };

    if response.success != Some(true) {
        let message = response
            .server_message()
            .unwrap_or_else(|| "Upload failed".to_string());
        return UploadResult::failure(ErrorKind::ApplicationError, message);
    }

    match response.url_for(target) {
        Some(url) => UploadResult::Success {
            url: resolve_url(api_base, url),
        },
        None => UploadResult::failure(
            ErrorKind::ApplicationError,
            format!(
                "Upload failed: the server response is missing '{}'",
                target.url_field()
            ),
        ),
    }
}

/// Parse a body as the response envelope. Only a JSON object qualifies;
/// serde would otherwise read a JSON array positionally into the struct.
fn parse_envelope(body: &str) -> Result<UploadResponse, String> {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value @ serde_json::Value::Object(_)) => {
            serde_json::from_value(value).map_err(|e| e.to_string())
        }
        Ok(other) => Err(format!("expected a JSON object, got {other}")),
        Err(e) => Err(e.to_string()),
    }
}

/// Make a server-returned URL absolute.
///
/// Absolute `http(s)` URLs are returned unchanged; anything else is joined
/// onto the base with exactly one `/` between them.
pub fn resolve_url(api_base: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        return url.to_string();
    }
    let base = api_base.trim_end_matches('/');
    if url.starts_with('/') {
        format!("{base}{url}")
    } else {
        format!("{base}/{url}")
    }
}
