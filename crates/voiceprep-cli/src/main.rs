mod app;
mod args;
mod commands;

use anyhow::Result;
use clap::Parser;

use args::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    voiceprep_core::init_logging(cli.verbose);

    match cli.command {
        Commands::Convert {
            input,
            output,
            format,
            mime,
        } => commands::convert::run(&input, output.as_deref(), format, mime.as_deref()),
        Commands::Upload { file, target, mime } => {
            commands::upload::run(&file, target, mime.as_deref()).await
        }
        Commands::RecordUpload { file, mime } => {
            commands::record_upload::run(&file, mime.as_deref()).await
        }
        Commands::Config {
            api_base_url,
            timeout_secs,
            show,
        } => commands::config::run(api_base_url, timeout_secs, show),
    }
}
