use anyhow::{bail, Result};
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Browser origin allowed to make credentialed requests
    pub allowed_origin: String,
    /// Built web UI served for every path outside `/api`
    pub static_dir: Option<PathBuf>,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub data_file: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Required to register; there is no default
    pub invitation_code: Option<String>,
    pub session_ttl_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

type Builder = ConfigBuilder<config::builder::DefaultState>;

impl Settings {
    /// Load settings from `config.toml` (optional) and `BABY_TRACKER_*`
    /// environment variables, environment taking precedence.
    /// Nested keys use a double underscore: `BABY_TRACKER_SERVER__PORT`.
    pub fn load() -> Result<Self> {
        let builder = Self::defaults()?
            .add_source(File::with_name("config.toml").required(false))
            .add_source(
                Environment::with_prefix("BABY_TRACKER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        Self::finish(builder)
    }

    /// Settings from a TOML document on top of the defaults
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        Self::finish(Self::defaults()?.add_source(File::from_str(toml, FileFormat::Toml)))
    }

    /// The invitation code, or an error when none is configured
    pub fn invitation_code(&self) -> Result<&str> {
        match self.auth.invitation_code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => Ok(code),
            _ => bail!(
                "No invitation code configured; set auth.invitation_code or BABY_TRACKER_AUTH__INVITATION_CODE"
            ),
        }
    }

    fn defaults() -> Result<Builder> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3001)?
            .set_default("server.allowed_origin", "http://localhost:8080")?
            .set_default("storage.data_file", "data/db.json")?
            .set_default("auth.session_ttl_days", 30)?
            .set_default("logging.level", "info")?)
    }

    fn finish(builder: Builder) -> Result<Self> {
        let settings = builder.build()?.try_deserialize::<Settings>()?;
        if settings.auth.session_ttl_days <= 0 {
            bail!("auth.session_ttl_days must be positive");
        }
        Ok(settings)
    }
}

/// Load `.env` (if present) and then the settings
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();
    Settings::load()
}
