//! `thoughtloop config`: configuration management commands.

use thoughtloop_config::AppConfig;

use super::Overrides;

pub async fn validate(overrides: &Overrides, ping: bool) -> Result<(), Box<dyn std::error::Error>> {
    println!("Validating configuration...");

    let config = match super::load_config(overrides) {
        Ok(config) => config,
        Err(e) => {
            println!("   Config error: {e}");
            return Err(e);
        }
    };
    println!("   Config parsed successfully");

    let warnings = warnings(&config);
    if warnings.is_empty() {
        println!("   All checks passed");
    } else {
        println!();
        for w in &warnings {
            println!("   Warning: {w}");
        }
    }

    println!();
    println!("   Transport: {}", config.transport);
    println!("   Base URL:  {}", config.base_url.as_deref().unwrap_or("(unset)"));
    println!("   Model:     {}", config.model_id.as_deref().unwrap_or("(unset)"));
    println!("   Max turns: {}", config.max_turns);

    if ping {
        println!();
        if reachable(&config).await? {
            println!("   Endpoint reachable");
        } else {
            return Err("Completion endpoint did not answer the health check".into());
        }
    }

    Ok(())
}

/// Run the configured provider's health check.
async fn reachable(config: &AppConfig) -> Result<bool, Box<dyn std::error::Error>> {
    let provider = thoughtloop_providers::build_from_config(config)?;
    Ok(provider.health_check().await?)
}

pub fn show(overrides: &Overrides) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(overrides)?;
    let toml_str = toml::to_string_pretty(&config.redacted())?;
    println!("{toml_str}");
    Ok(())
}

pub fn path() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", AppConfig::config_path().display());
    Ok(())
}

/// Problems that do not stop loading but will stop a run.
fn warnings(config: &AppConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    if let Err(e) = config.require_endpoint() {
        warnings.push(e.to_string());
    }
    if !config.has_api_key() {
        warnings.push("No API key set (requests are sent without Authorization)".to_string());
    }
    warnings
}
