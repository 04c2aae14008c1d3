pub mod schema;

pub use schema::{AgentConfig, Config, CONFIG_DIR_ENV};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reexported_config_default_is_constructible() {
        let config = Config::default();

        assert!(config.default_provider.is_some());
        assert!(config.default_model.is_some());
        assert!(config.default_temperature > 0.0);
        assert!(config.agent.max_history_messages >= 2);
    }
}
