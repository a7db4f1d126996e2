use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use voiceprep_core::UploadTarget;

#[derive(Parser)]
#[command(name = "voiceprep")]
#[command(version)]
#[command(about = "Convert voice recordings to WAV/MP3 and upload them")]
pub struct Cli {
    /// Print diagnostic logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode an audio file and write it as WAV or MP3
    Convert {
        /// Input audio file
        input: PathBuf,

        /// Output path (defaults to the input name with the new extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Wav)]
        format: OutputFormat,

        /// MIME type of the input (inferred from the extension if omitted)
        #[arg(long)]
        mime: Option<String>,
    },

    /// Upload a file as-is to one of the file endpoints
    Upload {
        /// File to upload
        file: PathBuf,

        /// Endpoint: image, training-audio, reference-audio, recorded-audio
        #[arg(short, long, value_parser = parse_target)]
        target: UploadTarget,

        /// MIME type of the file (inferred from the extension if omitted)
        #[arg(long)]
        mime: Option<String>,
    },

    /// Convert a recording (WebM becomes WAV) and upload it as recorded audio
    RecordUpload {
        /// Recorded audio file
        file: PathBuf,

        /// MIME type of the recording (inferred from the extension if omitted)
        #[arg(long)]
        mime: Option<String>,
    },

    /// Show or change settings
    Config {
        /// Backend base URL, e.g. http://localhost:8000
        #[arg(long)]
        api_base_url: Option<String>,

        /// Upload timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Print the effective settings
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Wav,
    Mp3,
}

fn parse_target(s: &str) -> Result<UploadTarget, String> {
    s.parse()
}
