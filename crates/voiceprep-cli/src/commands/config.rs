//! Settings management

use anyhow::{Context, Result, anyhow};
use voiceprep_core::Settings;

pub fn run(api_base_url: Option<String>, timeout_secs: Option<u64>, show: bool) -> Result<()> {
    let changed = api_base_url.is_some() || timeout_secs.is_some();

    if changed {
        let mut settings = Settings::load();
        if let Some(url) = api_base_url {
            settings.api_base_url = url.trim().to_string();
        }
        if let Some(secs) = timeout_secs {
            settings.timeout_secs = secs;
        }
        settings.validate().map_err(|e| anyhow!(e))?;
        let path = settings.save().context("Failed to save settings")?;
        println!("Saved settings to {}", path.display());
    }

    if show || !changed {
        let settings = Settings::load();
        println!("{}", serde_json::to_string_pretty(&settings)?);
        if let Some(path) = Settings::path() {
            println!("(file: {})", path.display());
        }
    }

    Ok(())
}
