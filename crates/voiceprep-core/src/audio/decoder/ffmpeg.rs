//! FFmpeg-backed decoding for WebM/Opus and anything else FFmpeg reads.
//!
//! The compressed bytes are piped to `ffmpeg` on stdin and decoded to a
//! 32-bit float WAV in the temp directory, which is then read back with hound.
//! Channel count and sample rate are kept as FFmpeg reports them.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};

use super::AudioDecoder;
use crate::audio::PcmBuffer;
use crate::error::DecodeError;

/// Decoder that shells out to the `ffmpeg` binary.
#[derive(Debug, Clone)]
pub struct FfmpegDecoder {
    program: PathBuf,
}

impl Default for FfmpegDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegDecoder {
    pub fn new() -> Self {
        Self::with_program("ffmpeg")
    }

    /// Use a specific ffmpeg executable instead of the one on `PATH`.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Whether the configured ffmpeg executable can be started.
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }
}

impl AudioDecoder for FfmpegDecoder {
    fn decode(&self, bytes: &[u8], mime_hint: Option<&str>) -> Result<PcmBuffer, DecodeError> {
        let output = TempWav::new();

        tracing::debug!(
            bytes = bytes.len(),
            mime_hint = mime_hint.unwrap_or("unknown"),
            "decoding with ffmpeg"
        );

        let mut child = Command::new(&self.program)
            .args([
                "-hide_banner",
                // Truncation is only reported at warning level
                "-loglevel",
                "warning",
                "-i",
                "pipe:0",
                "-vn",
                "-map_metadata",
                "-1",
                "-codec:a",
                "pcm_f32le",
                "-f",
                "wav",
                "-y",
            ])
            .arg(output.path())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                DecodeError::UnsupportedCodec(format!(
                    "ffmpeg could not be started ({e}); install FFmpeg to decode this input"
                ))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            // ffmpeg may stop reading early on bad input; its exit status says why
            if let Err(e) = stdin.write_all(bytes) {
                tracing::debug!("ffmpeg closed stdin early: {e}");
            }
        }

        let result = child
            .wait_with_output()
            .map_err(|e| DecodeError::Malformed(format!("ffmpeg did not finish: {e}")))?;

        let stderr = String::from_utf8_lossy(&result.stderr);
        let stderr = stderr.trim();
        if !result.status.success() {
            return Err(classify_failure(stderr));
        }
        // A cut-off container still exits 0 with whatever was decodable
        if reports_truncation(stderr) {
            return Err(DecodeError::Truncated(stderr.to_string()));
        }

        read_float_wav(output.path())
    }
}

/// Map ffmpeg's error output onto a decode error.
fn classify_failure(stderr: &str) -> DecodeError {
    let lower = stderr.to_ascii_lowercase();
    let detail = if stderr.is_empty() {
        "ffmpeg failed without output".to_string()
    } else {
        stderr.to_string()
    };

    if lower.contains("decoder") && (lower.contains("not found") || lower.contains("unknown")) {
        DecodeError::UnsupportedCodec(detail)
    } else if reports_truncation(stderr) {
        DecodeError::Truncated(detail)
    } else {
        DecodeError::Malformed(detail)
    }
}

fn reports_truncation(stderr: &str) -> bool {
    let lower = stderr.to_ascii_lowercase();
    lower.contains("end of file") || lower.contains("prematurely") || lower.contains("truncat")
}

fn read_float_wav(path: &Path) -> Result<PcmBuffer, DecodeError> {
    let mut reader = hound::WavReader::open(path)
        .map_err(|e| DecodeError::Malformed(format!("ffmpeg output is not readable: {e}")))?;
    let spec = reader.spec();

    let interleaved = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<Vec<_>, _>>(),
        hound::SampleFormat::Int => {
            let scale = (1i64 << spec.bits_per_sample.saturating_sub(1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<Vec<_>, _>>()
        }
    }
    .map_err(|e| DecodeError::Truncated(format!("ffmpeg output ended early: {e}")))?;

    if interleaved.is_empty() {
        return Err(DecodeError::Truncated(
            "no audio frames could be decoded".to_string(),
        ));
    }

    tracing::debug!(
        sample_rate = spec.sample_rate,
        channels = spec.channels,
        samples = interleaved.len(),
        "decoded audio with ffmpeg"
    );

    PcmBuffer::from_interleaved(spec.sample_rate, spec.channels, &interleaved)
}

static NEXT_TEMP_ID: AtomicU64 = AtomicU64::new(0);

/// Output file in the temp directory, removed on drop.
struct TempWav {
    path: PathBuf,
}

impl TempWav {
    fn new() -> Self {
        let unique_id = format!(
            "{}_{}_{}",
            std::process::id(),
            NEXT_TEMP_ID.fetch_add(1, Ordering::Relaxed),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or_default(),
        );
        Self {
            path: std::env::temp_dir().join(format!("voiceprep_decode_{unique_id}.wav")),
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempWav {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}
