use anyhow::Result;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::warn;

/// Model used when `MODEL` is unset or not in [`SUPPORTED_MODELS`].
pub const DEFAULT_MODEL: &str = "gemma2-9b-it";

/// Groq chat models this relay accepts.
pub const SUPPORTED_MODELS: &[&str] = &[
    "gemma2-9b-it",
    "llama-3.1-8b-instant",
    "llama-3.3-70b-versatile",
    "llama3-8b-8192",
    "llama3-70b-8192",
    "mixtral-8x7b-32768",
];

/// Process settings, layered defaults -> optional file -> environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub groq_api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub groq_base_url: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Endpoint the request form posts to.
    #[serde(default)]
    pub api_url: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

impl Settings {
    /// Load settings from the process environment, honouring `CONFIG_PATH`.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("CONFIG_PATH").ok();
        Self::load_from(config_path.as_deref(), None)
    }

    /// Load settings from an optional file plus an environment map.
    ///
    /// A given `config_path` must exist. `env` replaces the process
    /// environment when given, which keeps tests away from global state.
    /// Blank variables count as unset.
    pub fn load_from(
        config_path: Option<&str>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(::config::File::with_name(path).required(true));
        }

        let settings: Settings = builder
            .add_source(
                ::config::Environment::default()
                    .try_parsing(true)
                    .ignore_empty(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()?;

        Ok(settings.normalized())
    }

    fn normalized(mut self) -> Self {
        self.groq_api_key = self
            .groq_api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        self.model = resolve_model(&self.model);
        self
    }

    pub fn api_key_configured(&self) -> bool {
        self.groq_api_key.is_some()
    }

    /// Where the request form sends translations.
    pub fn form_api_url(&self) -> String {
        self.api_url
            .clone()
            .unwrap_or_else(|| format!("http://127.0.0.1:{}/translate", self.port))
    }
}

/// Map a requested model onto the allow-list, falling back to [`DEFAULT_MODEL`].
pub fn resolve_model(requested: &str) -> String {
    let wanted = requested.trim().to_lowercase();
    match SUPPORTED_MODELS.iter().find(|m| **m == wanted) {
        Some(model) => model.to_string(),
        None => {
            warn!(
                requested = requested,
                fallback = DEFAULT_MODEL,
                "unsupported model requested, falling back to default"
            );
            DEFAULT_MODEL.to_string()
        }
    }
}
