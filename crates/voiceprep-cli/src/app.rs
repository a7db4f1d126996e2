use anyhow::{Context, Result, anyhow};
use std::path::Path;
use voiceprep_core::audio::mime_for_extension;
use voiceprep_core::{Settings, UploadClient, UploadResult};

/// A file read from disk with the name and type it will be sent under.
pub struct InputFile {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime_type: String,
}

/// Read a file and resolve its MIME type (explicit, else from the extension).
pub fn read_input(path: &Path, mime: Option<&str>) -> Result<InputFile> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let mime_type = match mime {
        Some(mime) => mime.to_string(),
        None => {
            let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            mime_for_extension(extension)
                .ok_or_else(|| {
                    anyhow!(
                        "Cannot infer the type of '{}'. Pass it with --mime",
                        path.display()
                    )
                })?
                .to_string()
        }
    };

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();

    Ok(InputFile {
        bytes,
        filename,
        mime_type,
    })
}

/// Load settings and build an upload client from them.
pub fn upload_client() -> Result<UploadClient> {
    let settings = Settings::load();
    settings.validate().map_err(|e| anyhow!(e))?;
    tracing::debug!(api_base = settings.api_base(), "using backend");
    UploadClient::from_settings(&settings).context("Failed to create HTTP client")
}

/// Print the URL on success; print the message and exit non-zero on failure.
pub fn report(result: UploadResult) -> Result<()> {
    match result {
        UploadResult::Success { url } => {
            println!("{url}");
            Ok(())
        }
        UploadResult::Failure { kind, message } => {
            eprintln!("Error: {message}");
            tracing::debug!(%kind, "upload failed");
            std::process::exit(1);
        }
    }
}
