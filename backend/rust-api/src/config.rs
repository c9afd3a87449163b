use serde::Deserialize;
use std::env;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_ALLOWED_ORIGIN: &str = "https://proyectotesis.netlify.app";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_base_url: String,
    pub port: u16,
    pub allowed_origin: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        // Local .env is optional; real deployments inject plain env vars
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            // Override with environment variables (prefix: APP_)
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        let openai_api_key = settings
            .get_string("openai.api_key")
            .or_else(|_| env::var("OPENAI_API_KEY"))
            .unwrap_or_default();
        if openai_api_key.is_empty() {
            eprintln!("WARNING: OPENAI_API_KEY is not set, every endpoint will serve fallbacks");
        }

        let openai_model = settings
            .get_string("openai.model")
            .or_else(|_| env::var("OPENAI_MODEL"))
            .unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let openai_base_url = settings
            .get_string("openai.base_url")
            .or_else(|_| env::var("OPENAI_BASE_URL"))
            .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string());

        let port = match settings
            .get_string("server.port")
            .or_else(|_| env::var("PORT"))
        {
            Ok(raw) => raw.trim().parse::<u16>().map_err(|e| {
                config::ConfigError::Message(format!("Invalid port {:?}: {}", raw, e))
            })?,
            Err(_) => DEFAULT_PORT,
        };

        let allowed_origin = settings
            .get_string("server.allowed_origin")
            .or_else(|_| env::var("CORS_ALLOWED_ORIGIN"))
            .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGIN.to_string());

        Ok(Config {
            openai_api_key,
            openai_model,
            openai_base_url: openai_base_url.trim_end_matches('/').to_string(),
            port,
            allowed_origin,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            openai_model: DEFAULT_MODEL.to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            port: DEFAULT_PORT,
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
        }
    }
}
