use crate::config::{ApportionConfig, BackendSettings, CONFIG_FILE_NAME};
use crate::error::ApportionError;
use anyhow::Result;
use colored::Colorize;
use url::Url;

pub fn handle_init(url: Option<String>) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let config_path = cwd.join(CONFIG_FILE_NAME);

    if config_path.exists() {
        return Err(ApportionError::AlreadyInitialized(config_path.display().to_string()).into());
    }

    let mut config = ApportionConfig::default();
    if let Some(url) = url {
        Url::parse(&url).map_err(ApportionError::from)?;
        config.backend = BackendSettings {
            url,
            ..BackendSettings::default()
        };
    }

    config.save(&config_path)?;

    println!(
        "{} apportion config in {}",
        "Initialized".green(),
        cwd.display()
    );
    println!("  Config:  {}", config_path.display());
    println!("  Backend: {}", config.backend.url.cyan());

    Ok(())
}
