//! Offline conversion to WAV or MP3

use anyhow::{Context, Result, anyhow};
use std::path::{Path, PathBuf};
use voiceprep_core::audio::{default_codec_factory, default_decoder};
use voiceprep_core::pipeline::{convert_to_mp3, convert_to_wav};

use crate::app;
use crate::args::OutputFormat;

pub fn run(
    input: &Path,
    output: Option<&Path>,
    format: OutputFormat,
    mime: Option<&str>,
) -> Result<()> {
    let file = app::read_input(input, mime)?;
    let decoder = default_decoder()
        .ok_or_else(|| {
            anyhow!("This build has no audio decoder (enable 'ffmpeg' or 'symphonia-decoder')")
        })?;

    let encoded = match format {
        OutputFormat::Wav => convert_to_wav(&file.bytes, &file.mime_type, decoder.as_ref())?,
        OutputFormat::Mp3 => {
            let factory = default_codec_factory()?;
            convert_to_mp3(
                &file.bytes,
                &file.mime_type,
                decoder.as_ref(),
                factory.as_ref(),
            )?
        }
    };

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output(input, encoded.mime().extension()));
    std::fs::write(&output, encoded.bytes())
        .with_context(|| format!("Failed to write {}", output.display()))?;

    eprintln!(
        "Wrote {} ({:.1} KB, {})",
        output.display(),
        encoded.byte_len() as f64 / 1024.0,
        encoded.mime_type()
    );
    Ok(())
}

fn default_output(input: &Path, extension: &str) -> PathBuf {
    let candidate = input.with_extension(extension);
    if candidate == input {
        // Don't overwrite the source when converting wav -> wav
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        input.with_file_name(format!("{stem}.converted.{extension}"))
    } else {
        candidate
    }
}
