//! Service entry point: configuration, tracing, wiring, and the HTTP server.

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use advisor_mesh::adapters::ai::{OpenAiConfig, OpenAiProvider};
use advisor_mesh::adapters::http;
use advisor_mesh::adapters::storage::InMemoryConversationStore;
use advisor_mesh::application::ConversationService;
use advisor_mesh::config::AppConfig;
use advisor_mesh::domain::advisor::AdvisorRegistry;
use advisor_mesh::ports::AiProvider;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            std::process::exit(1);
        }
    };
    if let Err(err) = config.validate() {
        eprintln!("invalid configuration: {err}");
        std::process::exit(1);
    }

    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let provider: Arc<dyn AiProvider> = match build_provider(&config) {
        Ok(provider) => provider,
        Err(err) => {
            error!(error = %err, "failed to build AI provider");
            std::process::exit(1);
        }
    };

    let registry = Arc::new(AdvisorRegistry::builtin());
    let store = Arc::new(InMemoryConversationStore::new());
    let service = Arc::new(ConversationService::new(store, registry, provider));

    let app = http::router(service, config.server.request_timeout());

    let addr = match config.server.socket_addr() {
        Ok(addr) => addr,
        Err(err) => {
            error!(error = %err, "invalid bind address");
            std::process::exit(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(error = %err, %addr, "failed to bind");
            std::process::exit(1);
        }
    };

    info!(%addr, "advisor-mesh listening");
    if let Err(err) = axum::serve(listener, app).await {
        error!(error = %err, "server error");
        std::process::exit(1);
    }
}

fn build_provider(config: &AppConfig) -> Result<Arc<dyn AiProvider>, String> {
    let api_key = config
        .ai
        .openai_api_key
        .clone()
        .ok_or_else(|| "missing OpenAI API key".to_string())?;

    let provider_config = OpenAiConfig::new(api_key)
        .with_model(config.ai.model.clone())
        .with_timeout(config.ai.timeout())
        .with_max_retries(config.ai.max_retries);

    let provider = OpenAiProvider::new(provider_config).map_err(|e| e.to_string())?;
    Ok(Arc::new(provider))
}
