use anyhow::Result;

use crate::config::AppConfig;

pub fn show(cfg: &AppConfig) -> Result<()> {
    print!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}
