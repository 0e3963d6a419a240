use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address
    pub bind_addr: String,
    /// Frontend origin allowed by CORS
    pub cors_origin: String,
    /// Which retrieval backend serves requests
    pub backend: BackendMode,
    /// Create one document retriever per topic at startup
    pub init_retrievers: bool,
    /// Vendor API configuration
    pub vendor: VendorConfig,
}

/// Selects the retrieval implementation behind the HTTP routes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackendMode {
    /// Documents, ranking and completions come from the vendor API.
    #[default]
    Live,
    /// Static local data, no vendor calls.
    Placeholder,
}

impl FromStr for BackendMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "live" => Ok(Self::Live),
            "placeholder" => Ok(Self::Placeholder),
            other => Err(ConfigError::InvalidBackend(other.to_string())),
        }
    }
}

impl std::fmt::Display for BackendMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Live => f.write_str("live"),
            Self::Placeholder => f.write_str("placeholder"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorConfig {
    /// Vendor API key (required)
    pub api_key: String,
    /// Base URL for the vendor API
    pub base_url: String,
    /// Model name for chat completions
    pub chat_model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Vendor project holding the physics documents
    pub project_name: String,
    /// Feature group the retrievers index
    pub feature_group_name: String,
    /// Documents requested per retriever query
    pub max_results: usize,
    /// Characters fetched per document snippet
    pub snippet_length: usize,
}

impl VendorConfig {
    /// Defaults for everything except the key, which has none.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.abacus.ai".to_string(),
            chat_model: "gpt-4".to_string(),
            timeout_secs: 120,
            project_name: "PhysicsRAG".to_string(),
            feature_group_name: "PhysicsDocuments".to_string(),
            max_results: 5,
            snippet_length: 1000,
        }
    }
}

impl Config {
    /// Defaults around the given vendor key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            cors_origin: "http://localhost:3000".to_string(),
            backend: BackendMode::default(),
            init_retrievers: false,
            vendor: VendorConfig::with_api_key(api_key),
        }
    }

    /// Load configuration from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("ABACUS_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let mut config = Self::with_api_key(api_key);

        if let Some(addr) = lookup("PHYSICS_RAG_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(origin) = lookup("PHYSICS_RAG_CORS_ORIGIN") {
            config.cors_origin = origin;
        }
        if let Some(backend) = lookup("PHYSICS_RAG_BACKEND") {
            config.backend = backend.parse()?;
        }
        if let Some(val) = lookup("PHYSICS_RAG_INIT_RETRIEVERS") {
            config.init_retrievers = parse_bool("PHYSICS_RAG_INIT_RETRIEVERS", &val)?;
        }
        if let Some(name) = lookup("PHYSICS_RAG_PROJECT_NAME") {
            config.vendor.project_name = name;
        }
        if let Some(name) = lookup("PHYSICS_RAG_FEATURE_GROUP") {
            config.vendor.feature_group_name = name;
        }

        // Vendor config
        if let Some(url) = lookup("ABACUS_BASE_URL") {
            config.vendor.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(model) = lookup("ABACUS_CHAT_MODEL") {
            config.vendor.chat_model = model;
        }
        if let Some(val) = lookup("ABACUS_TIMEOUT_SECS") {
            config.vendor.timeout_secs = val.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                var: "ABACUS_TIMEOUT_SECS",
                value: val.clone(),
            })?;
        }

        Ok(config)
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: value.to_string(),
        }),
    }
}
