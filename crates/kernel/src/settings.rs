use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use serde::Deserialize;

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "BOOKSEARCH_ENV";
const CONFIG_DIR_ENV: &str = "BOOKSEARCH_CONFIG_DIR";
const ENV_PREFIX: &str = "BOOKSEARCH";

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl Environment {
    fn parse(name: &str) -> anyhow::Result<Self> {
        match name {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unsupported environment '{}'; expected local/staging/production",
                other
            )),
        }
    }
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub openlibrary: OpenLibrarySettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, and environment overlay.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            // Default to the `config` directory next to the working directory.
            Err(_) => std::env::current_dir()
                .with_context(|| "unable to resolve current directory")?
                .join("config"),
        };

        Self::load_from(&config_dir, &environment)
    }

    /// Load configuration from `config_dir` for the named environment.
    ///
    /// `base.toml` is read first, then `<environment>.toml`, then any
    /// `BOOKSEARCH_*` environment variables (nested keys separated by `__`,
    /// e.g. `BOOKSEARCH_OPENLIBRARY__TIMEOUT_SECS`). Every file is optional.
    pub fn load_from(config_dir: &Path, environment: &str) -> anyhow::Result<Self> {
        let parsed_environment = Environment::parse(environment)?;

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment));

        let builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            );

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        // The selected environment wins over anything the files declare.
        settings.environment = parsed_environment;

        if settings.openlibrary.timeout_secs == 0 {
            return Err(anyhow!("openlibrary.timeout_secs must be greater than zero"));
        }

        Ok(settings)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
    #[serde(default = "ServerSettings::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        5000
    }

    fn default_request_timeout_ms() -> u64 {
        15000
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            request_timeout_ms: Self::default_request_timeout_ms(),
        }
    }
}

/// Endpoints and client identity used when talking to OpenLibrary.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenLibrarySettings {
    #[serde(default = "OpenLibrarySettings::default_search_url")]
    pub search_url: String,
    #[serde(default = "OpenLibrarySettings::default_cover_base_url")]
    pub cover_base_url: String,
    #[serde(default = "OpenLibrarySettings::default_site_base_url")]
    pub site_base_url: String,
    #[serde(default = "OpenLibrarySettings::default_user_agent")]
    pub user_agent: String,
    #[serde(default = "OpenLibrarySettings::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl OpenLibrarySettings {
    pub const DEFAULT_SEARCH_URL: &'static str = "https://openlibrary.org/search.json";
    pub const DEFAULT_COVER_BASE_URL: &'static str = "https://covers.openlibrary.org/b/id";
    pub const DEFAULT_SITE_BASE_URL: &'static str = "https://openlibrary.org";
    pub const DEFAULT_USER_AGENT: &'static str = "BookSearchApp/1.0";
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

    fn default_search_url() -> String {
        Self::DEFAULT_SEARCH_URL.to_string()
    }

    fn default_cover_base_url() -> String {
        Self::DEFAULT_COVER_BASE_URL.to_string()
    }

    fn default_site_base_url() -> String {
        Self::DEFAULT_SITE_BASE_URL.to_string()
    }

    fn default_user_agent() -> String {
        Self::DEFAULT_USER_AGENT.to_string()
    }

    fn default_timeout_secs() -> u64 {
        Self::DEFAULT_TIMEOUT_SECS
    }
}

impl Default for OpenLibrarySettings {
    fn default() -> Self {
        Self {
            search_url: Self::default_search_url(),
            cover_base_url: Self::default_cover_base_url(),
            site_base_url: Self::default_site_base_url(),
            user_agent: Self::default_user_agent(),
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default = "TelemetrySettings::default_filter")]
    pub filter: String,
}

impl TelemetrySettings {
    fn default_filter() -> String {
        "info".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            filter: Self::default_filter(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}
