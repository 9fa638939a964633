//! `sahayak config`: configuration management commands.

use sahayak_config::AppConfig;

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    let dir = AppConfig::config_dir();
    let config_path = dir.join("config.toml");
    if config_path.exists() {
        println!("   Config already exists at {}", config_path.display());
        return Ok(());
    }

    std::fs::create_dir_all(&dir)?;
    std::fs::write(&config_path, AppConfig::default_toml())?;
    println!("   Wrote default config to {}", config_path.display());
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_dir().join("config.toml");
    println!("{}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    #[test]
    fn config_path_is_valid() {
        let path = sahayak_config::AppConfig::config_dir().join("config.toml");
        assert!(path.to_str().unwrap().contains("config.toml"));
    }

    #[test]
    fn default_toml_parses_back() {
        let text = sahayak_config::AppConfig::default_toml();
        let parsed: sahayak_config::AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.tools.timeout_secs, 10);
    }
}
