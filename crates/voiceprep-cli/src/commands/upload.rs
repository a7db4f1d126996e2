//! Upload a file without conversion

use anyhow::Result;
use std::path::Path;
use voiceprep_core::UploadTarget;

use crate::app;

pub async fn run(file: &Path, target: UploadTarget, mime: Option<&str>) -> Result<()> {
    let input = app::read_input(file, mime)?;
    let client = app::upload_client()?;

    eprintln!(
        "Uploading {} to {}...",
        input.filename,
        client.endpoint_url(target)
    );
    let result = client
        .upload(target, &input.filename, input.bytes, &input.mime_type)
        .await;

    app::report(result)
}
