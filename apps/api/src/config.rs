use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Everything has a local-first default; only malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub ollama_host: String,
    pub llm_model: String,
    pub embedding_model: String,
    pub collection_name: String,
    /// When set, chunks persist in PostgreSQL; otherwise they live in memory.
    pub database_url: Option<String>,
    pub llm_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ollama_host: "http://localhost:11434".to_string(),
            llm_model: "llama3".to_string(),
            embedding_model: "mxbai-embed-large".to_string(),
            collection_name: "resume_collection".to_string(),
            database_url: None,
            llm_timeout_secs: 300,
            port: 8000,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            ollama_host: env_or("OLLAMA_HOST", defaults.ollama_host),
            llm_model: env_or("LLM_MODEL", defaults.llm_model),
            embedding_model: env_or("EMBEDDING_MODEL", defaults.embedding_model),
            collection_name: env_or("COLLECTION_NAME", defaults.collection_name),
            database_url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", defaults.llm_timeout_secs)
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            port: parse_env("PORT", defaults.port).context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", defaults.rust_log),
        })
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_local_first() {
        let config = Config::default();
        assert_eq!(config.ollama_host, "http://localhost:11434");
        assert_eq!(config.collection_name, "resume_collection");
        assert!(config.database_url.is_none());
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn test_parse_env_falls_back_when_unset() {
        let value: u16 = parse_env("TAILOR_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("TAILOR_TEST_BAD_PORT", "not-a-port");
        let result: Result<u16> = parse_env("TAILOR_TEST_BAD_PORT", 8000);
        assert!(result.is_err());
        std::env::remove_var("TAILOR_TEST_BAD_PORT");
    }
}
