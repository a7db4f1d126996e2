//! HTTP client construction for uploads.

use std::time::Duration;

use crate::settings::Settings;

/// Build a reqwest client whose whole-request timeout comes from settings.
///
/// A request that outlives the timeout fails at the transport level, which
/// the upload client reports as a network error.
pub fn build_http_client(settings: &Settings) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .connect_timeout(Duration::from_secs(settings.timeout_secs.min(30)))
        .build()
}
