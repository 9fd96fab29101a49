use crate::config::DeskConfig;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads desk configuration by merging the TOML file with environment
    /// variables. Missing sections fall back to built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load() -> Result<DeskConfig> {
        let config: DeskConfig = Figment::new()
            .merge(Toml::file("config/Desk.toml"))
            .merge(Env::prefixed("TRADE_DESK_").split("__"))
            .extract()?;

        Ok(config)
    }

    /// Loads configuration with a profile-specific overlay file.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load_with_profile(profile: &str) -> Result<DeskConfig> {
        let config: DeskConfig = Figment::new()
            .merge(Toml::file("config/Desk.toml"))
            .merge(Toml::file(format!("config/Desk.{profile}.toml")))
            .merge(Env::prefixed("TRADE_DESK_").split("__"))
            .extract()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_without_files_yields_defaults() {
        // No config file in the test environment: defaults apply.
        let config = ConfigLoader::load().unwrap();
        assert_eq!(config.guardrails.adv_lookback_sessions, 20);
        assert_eq!(config.allocator.max_cards, 5);
    }
}
