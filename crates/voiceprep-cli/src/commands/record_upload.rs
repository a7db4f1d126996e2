//! Recorded-audio path: validate, convert WebM to WAV, upload

use anyhow::{Result, anyhow};
use std::path::Path;
use std::sync::Arc;
use voiceprep_core::audio::default_decoder;
use voiceprep_core::{AudioDecoder, upload_recording};

use crate::app;

pub async fn run(file: &Path, mime: Option<&str>) -> Result<()> {
    let input = app::read_input(file, mime)?;
    let client = app::upload_client()?;
    let decoder: Arc<dyn AudioDecoder> = default_decoder()
        .map(Arc::from)
        .ok_or_else(|| {
            anyhow!("This build has no audio decoder (enable 'ffmpeg' or 'symphonia-decoder')")
        })?;

    eprintln!("Uploading recording {}...", input.filename);
    let result = upload_recording(
        &client,
        input.bytes,
        &input.mime_type,
        &input.filename,
        decoder,
    )
    .await;

    app::report(result)
}
