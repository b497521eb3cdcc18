use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_INDEXNOW_KEY: &str = "f5157ccc525e40c7b6d52d34780e2c22";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub admin: AdminConfig,
    pub email: EmailConfig,
    pub indexnow: IndexNowConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Sqlite,
    Hosted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub database_url: String,
    pub max_connections: u32,
    pub hosted_url: String,
    pub anon_key: String,
    pub service_role_key: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Static bearer token for admin routes. Empty means every admin request is refused.
    pub api_token: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub enabled: bool,
    pub api_url: String,
    pub api_key: String,
    pub from: String,
    #[serde(default)]
    pub to: Vec<String>,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexNowConfig {
    pub endpoint: String,
    pub host: String,
    pub key: String,
    #[serde(default)]
    pub key_location: Option<String>,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Empty list allows any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            store: StoreConfig::default(),
            admin: AdminConfig::default(),
            email: EmailConfig::default(),
            indexnow: IndexNowConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            request_timeout_seconds: 30,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Sqlite,
            database_url: "sqlite:./syntax.db?mode=rwc".to_string(),
            max_connections: 10,
            hosted_url: String::new(),
            anon_key: String::new(),
            service_role_key: String::new(),
            timeout_seconds: 15,
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            email: String::new(),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: "https://api.resend.com/emails".to_string(),
            api_key: String::new(),
            from: "Syntax <no-reply@syntax.com.ng>".to_string(),
            to: Vec::new(),
            timeout_seconds: 10,
        }
    }
}

impl Default for IndexNowConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://www.bing.com/indexnow".to_string(),
            host: "syntax.com.ng".to_string(),
            key: DEFAULT_INDEXNOW_KEY.to_string(),
            key_location: None,
            timeout_seconds: 10,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "https://syntax.com.ng".to_string(),
                "https://www.syntax.com.ng".to_string(),
            ],
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?);

        if std::path::Path::new("config.toml").exists() {
            builder = builder.add_source(File::with_name("config"));
        }

        builder = builder.add_source(
            Environment::with_prefix("SYNTAX")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("email.to")
                .with_list_parse_key("cors.allowed_origins")
                .try_parsing(true),
        );

        builder = builder
            .set_override_option("store.database_url", env_value("DATABASE_URL"))?
            .set_override_option("store.hosted_url", env_value("SUPABASE_URL"))?
            .set_override_option("store.anon_key", env_value("SUPABASE_ANON_KEY"))?
            .set_override_option("store.service_role_key", env_value("SUPABASE_SERVICE_ROLE_KEY"))?
            .set_override_option("admin.api_token", env_value("ADMIN_API_TOKEN"))?
            .set_override_option("admin.email", env_value("ADMIN_EMAIL"))?
            .set_override_option("email.api_key", env_value("RESEND_API_KEY"))?
            .set_override_option("email.to", env_value("TO_EMAIL").map(|v| split_list(&v)))?;

        let config = builder.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        app_config.validate()?;

        Ok(app_config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("Server port cannot be 0".to_string()));
        }

        match self.store.backend {
            StoreBackend::Sqlite => {
                if self.store.database_url.is_empty() {
                    return Err(ConfigError::Message(
                        "Database URL cannot be empty".to_string(),
                    ));
                }

                if self.store.max_connections == 0 {
                    return Err(ConfigError::Message(
                        "Database max connections must be greater than 0".to_string(),
                    ));
                }
            }
            StoreBackend::Hosted => {
                if self.store.hosted_url.is_empty() {
                    return Err(ConfigError::Message(
                        "Hosted store URL cannot be empty".to_string(),
                    ));
                }

                if self.store.anon_key.is_empty() || self.store.service_role_key.is_empty() {
                    return Err(ConfigError::Message(
                        "Hosted store needs both an anon key and a service role key".to_string(),
                    ));
                }
            }
        }

        if self.indexnow.host.is_empty() || self.indexnow.key.is_empty() {
            return Err(ConfigError::Message(
                "IndexNow host and key cannot be empty".to_string(),
            ));
        }

        if self.admin.api_token.is_empty() {
            tracing::warn!("No admin API token configured - admin routes will reject every request");
        }

        if self.email.enabled && self.email.api_key.is_empty() {
            tracing::warn!("Email is enabled but no API key is set - notifications will be skipped");
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_seconds)
    }

    /// Notification recipients, falling back to the admin address.
    pub fn notification_recipients(&self) -> Vec<String> {
        if !self.email.to.is_empty() {
            return self.email.to.clone();
        }

        if self.admin.email.is_empty() {
            Vec::new()
        } else {
            vec![self.admin.email.clone()]
        }
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
