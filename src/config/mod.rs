//! Application configuration.
//!
//! Type-safe configuration loaded from environment variables via the
//! `config` and `dotenvy` crates. Variables use the `ADVISOR_MESH_` prefix
//! with `__` separating nested sections, e.g. `ADVISOR_MESH_SERVER__PORT`
//! or `ADVISOR_MESH_AI__OPENAI_API_KEY`.
//!
//! # Example
//!
//! ```no_run
//! use advisor_mesh::config::AppConfig;
//!
//! let config = AppConfig::load().expect("failed to load configuration");
//! config.validate().expect("invalid configuration");
//! ```

mod ai;
mod error;
mod server;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use server::ServerConfig;

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Model provider configuration.
    #[serde(default)]
    pub ai: AiConfig,
}

impl AppConfig {
    /// Loads configuration from the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let source = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("ADVISOR_MESH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(source.try_deserialize()?)
    }

    /// Validates every configuration section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.socket_addr()?;
        self.ai.validate()?;
        Ok(())
    }
}
