pub mod ask;
pub mod chat;
pub mod config_cmd;
pub mod tools;

use thoughtloop_agent::AgentService;
use thoughtloop_config::{AppConfig, Transport};

/// Command-line values that take precedence over the loaded configuration.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub transport: Option<Transport>,
    pub max_turns: Option<u32>,
}

impl Overrides {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(url) = &self.base_url {
            config.base_url = Some(url.clone());
        }
        if let Some(model) = &self.model {
            config.model_id = Some(model.clone());
        }
        if let Some(transport) = self.transport {
            config.transport = transport;
        }
        if let Some(max_turns) = self.max_turns {
            config.max_turns = max_turns;
        }
    }
}

/// Load the configuration and apply command-line overrides.
pub fn load_config(overrides: &Overrides) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

/// Build the agent service with the built-in tools.
pub fn build_service(config: &AppConfig) -> Result<AgentService, Box<dyn std::error::Error>> {
    let endpoint = config.require_endpoint()?;
    let provider = thoughtloop_providers::build_from_config(config)?;

    tracing::debug!(
        provider = provider.name(),
        model = %endpoint.model_id,
        "Agent service ready"
    );

    Ok(AgentService::new(provider, endpoint.model_id)
        .with_config(config)
        .with_tools(thoughtloop_tools::default_registry))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_config_values() {
        let mut config = AppConfig {
            base_url: Some("http://from-file".into()),
            model_id: Some("file-model".into()),
            ..AppConfig::default()
        };
        let overrides = Overrides {
            model: Some("flag-model".into()),
            transport: Some(Transport::Responses),
            max_turns: Some(2),
            ..Overrides::default()
        };

        overrides.apply(&mut config);

        assert_eq!(config.base_url.as_deref(), Some("http://from-file"));
        assert_eq!(config.model_id.as_deref(), Some("flag-model"));
        assert_eq!(config.transport, Transport::Responses);
        assert_eq!(config.max_turns, 2);
    }

    #[test]
    fn service_requires_an_endpoint() {
        let config = AppConfig {
            base_url: Some("http://localhost:8321".into()),
            ..AppConfig::default()
        };
        let err = build_service(&config).err().unwrap();
        assert!(err.to_string().contains("MODEL_ID"));
    }
}
