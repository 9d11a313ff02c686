//! Runtime configuration read from the environment (and `.env` via `dotenv`).

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}")]
    Missing { key: String },
    #[error("Invalid configuration value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

pub const GOOGLE_API_KEY_MISSING: &str =
    "Google API Key is required. Please set GOOGLE_API_KEY in the .env file.";

#[derive(Debug, Clone)]
pub struct EmbeddingSettings {
    pub service_url: String,
    pub model_name: String,
    pub dimension: usize,
    pub max_retries: u32,
    pub timeout_secs: u64,
    pub backoff_factor: f64,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct ChunkingSettings {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub document_storage_path: PathBuf,
    pub processed_documents_path: PathBuf,
    pub vector_db_path: PathBuf,
    pub database_url: Option<String>,
    pub embeddings: EmbeddingSettings,
    pub gemini: GeminiSettings,
    pub chunking: ChunkingSettings,
    pub search_top_k: usize,
    pub worker_count: usize,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let api_key = env.get("GOOGLE_API_KEY").ok_or_else(|| ConfigError::Invalid {
            key: "GOOGLE_API_KEY".to_string(),
            reason: GOOGLE_API_KEY_MISSING.to_string(),
        })?;

        let chunking = ChunkingSettings {
            chunk_size: env.parse_or("CHUNK_SIZE", 1000)?,
            chunk_overlap: env.parse_or("CHUNK_OVERLAP", 200)?,
        };
        if chunking.chunk_size == 0 {
            return Err(ConfigError::Invalid {
                key: "CHUNK_SIZE".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if chunking.chunk_overlap >= chunking.chunk_size {
            return Err(ConfigError::Invalid {
                key: "CHUNK_OVERLAP".to_string(),
                reason: format!(
                    "overlap {} must be smaller than chunk size {}",
                    chunking.chunk_overlap, chunking.chunk_size
                ),
            });
        }

        Ok(Self {
            host: env.get("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: env.parse_or("API_PORT", 8080)?,
            document_storage_path: env
                .get("DOCUMENT_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/documents")),
            processed_documents_path: env
                .get("PROCESSED_DOCUMENTS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/processed_documents")),
            vector_db_path: env
                .get("VECTOR_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./vectordb")),
            database_url: env.get("DATABASE_URL"),
            embeddings: EmbeddingSettings {
                service_url: env.require("EMBEDDINGS_SERVICE_URL")?,
                model_name: env
                    .get("EMBEDDING_MODEL")
                    .unwrap_or_else(|| "all-MiniLM-L6-v2".to_string()),
                dimension: env.parse_or("EMBEDDING_DIMENSION", 384)?,
                max_retries: env.parse_or("EMBEDDING_MAX_RETRIES", 3)?,
                timeout_secs: env.parse_or("EMBEDDING_TIMEOUT_SECS", 30)?,
                backoff_factor: 1.5,
            },
            gemini: GeminiSettings {
                api_key,
                model: env
                    .get("GEMINI_MODEL")
                    .unwrap_or_else(|| "gemini-1.5-flash".to_string()),
                base_url: env.get("GEMINI_API_BASE").unwrap_or_else(|| {
                    "https://generativelanguage.googleapis.com/v1beta".to_string()
                }),
                temperature: 0.1,
                max_output_tokens: 512,
                timeout_secs: 60,
            },
            chunking,
            search_top_k: env.parse_or("SEARCH_TOP_K", 5)?,
            worker_count: env.parse_or("WORKER_COUNT", 3)?,
            max_upload_bytes: env.parse_or("MAX_UPLOAD_BYTES", 250 * 1024 * 1024)?,
        })
    }
}

/// Settings for the web chat UI process.
#[derive(Debug, Clone)]
pub struct UiConfig {
    pub host: String,
    pub port: u16,
    pub backend_url: String,
    pub api_key: Option<String>,
    pub request_timeout_secs: u64,
    pub max_upload_bytes: usize,
}

impl UiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        Ok(Self {
            host: env.get("UI_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: env.parse_or("UI_PORT", 8501)?,
            backend_url: env
                .get("BACKEND_URL")
                .or_else(|| env.get("FASTAPI_BACKEND_URL"))
                .unwrap_or_else(|| "http://api:8080".to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key: env.get("GOOGLE_API_KEY"),
            request_timeout_secs: env.parse_or("UI_REQUEST_TIMEOUT_SECS", 120)?,
            max_upload_bytes: env.parse_or("MAX_UPLOAD_BYTES", 250 * 1024 * 1024)?,
        })
    }
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Blank values count as unset.
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn require(&self, key: &str) -> Result<String, ConfigError> {
        self.get(key).ok_or_else(|| ConfigError::Missing {
            key: key.to_string(),
        })
    }

    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
                key: key.to_string(),
                reason: e.to_string(),
            }),
            None => Ok(default),
        }
    }
}
