use std::path::PathBuf;

use anyhow::Result;

use glide_core::AppConfig;

pub fn run(config: &AppConfig, config_path: Option<PathBuf>, init: bool, path_only: bool) -> Result<()> {
    let path = config_path.unwrap_or_else(AppConfig::config_path);

    if path_only {
        println!("{}", path.display());
        return Ok(());
    }

    if init {
        if path.exists() {
            println!("Config already exists at {}", path.display());
        } else {
            AppConfig::default().save_to(&path)?;
            println!("Wrote default config to {}", path.display());
        }
        return Ok(());
    }

    println!("# {}", path.display());
    print!("{}", config.to_toml()?);
    Ok(())
}
