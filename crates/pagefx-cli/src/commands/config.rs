use std::path::Path;

use anyhow::Result;

use pagefx_core::AppConfig;

pub fn show(config: &AppConfig) -> Result<()> {
    print!("{}", config.to_toml_string()?);
    Ok(())
}

pub fn init(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }

    AppConfig::default().save_to(path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

pub fn path(path: &Path) -> Result<()> {
    println!("{}", path.display());
    Ok(())
}
