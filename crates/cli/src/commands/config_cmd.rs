//! `reverie config`: print the effective or default configuration.

use reverie_config::AppConfig;

pub fn run(default: bool) -> Result<(), Box<dyn std::error::Error>> {
    if default {
        print!("{}", AppConfig::default_toml());
        println!();
        println!(
            "# Save as {} to customize.",
            AppConfig::config_dir().join("config.toml").display()
        );
        return Ok(());
    }

    let config = super::load_config()?;
    let toml_str = toml::to_string_pretty(&redacted(config))?;
    println!("{toml_str}");
    Ok(())
}

/// Replace every API key with a placeholder so the config can be printed.
fn redacted(mut config: AppConfig) -> AppConfig {
    const MASK: &str = "***";
    if config.api_key.is_some() {
        config.api_key = Some(MASK.into());
    }
    for provider in config.providers.values_mut() {
        if provider.api_key.is_some() {
            provider.api_key = Some(MASK.into());
        }
    }
    config
}
