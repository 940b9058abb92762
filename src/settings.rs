use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr, time::Duration};
use zeroize::Zeroizing;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default)]
    pub database_url: String,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default)]
    pub cloudinary_cloud_name: String,

    #[serde(default)]
    pub cloudinary_api_key: String,

    #[serde(default)]
    pub cloudinary_api_secret: String,

    #[serde(default = "default_media_api_base")]
    pub media_api_base: String,

    #[serde(default = "default_media_folder")]
    pub media_folder: String,

    #[serde(default = "default_upload_timeout")]
    pub upload_timeout_secs: u64,

    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: usize,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Portfolio-API".to_string()
}
fn default_port() -> u16 {
    8989
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_media_api_base() -> String {
    "https://api.cloudinary.com/v1_1".to_string()
}
fn default_media_folder() -> String {
    "projects".to_string()
}
fn default_upload_timeout() -> u64 {
    30
}
fn default_max_image_bytes() -> usize {
    10 * 1024 * 1024
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name.to_string().to_lowercase())).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .try_parsing(true)
                    .ignore_empty(true)
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        // Inject critical env values if missing
        config.database_url = fill_or_env(config.database_url, "DATABASE_URL")?;
        if !config.is_testing() {
            config.cloudinary_cloud_name = fill_or_env(config.cloudinary_cloud_name, "CLOUDINARY_CLOUD_NAME")?;
            config.cloudinary_api_key = fill_or_env(config.cloudinary_api_key, "CLOUDINARY_API_KEY")?;
            config.cloudinary_api_secret = fill_or_env(config.cloudinary_api_secret, "CLOUDINARY_API_SECRET")?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database_url.trim().is_empty() {
            errors.push("DATABASE_URL cannot be empty");
        }
        if !self.is_testing() {
            if self.cloudinary_cloud_name.trim().is_empty() {
                errors.push("CLOUDINARY_CLOUD_NAME cannot be empty");
            }
            if self.cloudinary_api_key.trim().is_empty() {
                errors.push("CLOUDINARY_API_KEY cannot be empty");
            }
            if self.cloudinary_api_secret.trim().is_empty() {
                errors.push("CLOUDINARY_API_SECRET cannot be empty");
            }
        }
        if self.media_folder.trim_matches('/').is_empty() {
            errors.push("MEDIA_FOLDER cannot be empty");
        }
        if self.upload_timeout_secs == 0 {
            errors.push("UPLOAD_TIMEOUT_SECS must be greater than zero");
        }
        if self.max_image_bytes == 0 {
            errors.push("MAX_IMAGE_BYTES must be greater than zero");
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn is_testing(&self) -> bool {
        self.env == AppEnvironment::Testing
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Falls back to the conventional unprefixed variable (`DATABASE_URL`, `CLOUDINARY_*`).
fn fill_or_env(current: String, env_key: &str) -> Result<String, ConfigError> {
    if current.trim().is_empty() {
        env::var(env_key).map_err(|_| ConfigError::Message(format!("{env_key} must be set")))
    } else {
        Ok(current)
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("database_url", &self.database_url.redact())
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("cloudinary_cloud_name", &self.cloudinary_cloud_name)
            .field("cloudinary_api_key", &self.cloudinary_api_key.redact())
            .field("cloudinary_api_secret", &self.cloudinary_api_secret.redact())
            .field("media_api_base", &self.media_api_base)
            .field("media_folder", &self.media_folder)
            .field("upload_timeout_secs", &self.upload_timeout_secs)
            .field("max_image_bytes", &self.max_image_bytes)
            .finish()
    }
}

/// Media store credentials and upload policy, handed to the adapter at
/// construction.
#[derive(Clone)]
pub struct MediaConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: Zeroizing<String>,
    pub api_base: String,
    pub folder: String,
    pub timeout: Duration,
}

impl From<&AppConfig> for MediaConfig {
    fn from(config: &AppConfig) -> Self {
        MediaConfig {
            cloud_name: config.cloudinary_cloud_name.clone(),
            api_key: config.cloudinary_api_key.clone(),
            api_secret: Zeroizing::new(config.cloudinary_api_secret.clone()),
            api_base: config.media_api_base.trim_end_matches('/').to_string(),
            folder: config.media_folder.trim_matches('/').to_string(),
            timeout: Duration::from_secs(config.upload_timeout_secs),
        }
    }
}

impl fmt::Debug for MediaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key.redact())
            .field("api_secret", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("folder", &self.folder)
            .field("timeout", &self.timeout)
            .finish()
    }
}
