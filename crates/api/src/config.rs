use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    pub jwt: JwtAuthConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub payment: PaymentConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SecurityConfig {
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Per-IP limit applied to the auth endpoints; 0 disables.
    #[serde(default = "default_rate_limit")]
    pub auth_rate_limit_per_minute: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtAuthConfig {
    pub secret: String,

    #[serde(default = "default_token_expiry")]
    pub token_expiry_secs: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    #[serde(default)]
    pub enabled: bool,

    /// `console` logs mail in development; `api` posts to an HTTP provider.
    #[serde(default = "default_email_provider")]
    pub provider: String,

    #[serde(default)]
    pub api_url: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_from_email")]
    pub from_email: String,

    #[serde(default = "default_from_name")]
    pub from_name: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: default_email_provider(),
            api_url: String::new(),
            api_key: String::new(),
            from_email: default_from_email(),
            from_name: default_from_name(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// `console` fabricates checkout URLs in development; `paystack` posts
    /// to the provider's transaction endpoint.
    #[serde(default = "default_payment_provider")]
    pub provider: String,

    #[serde(default = "default_payment_api_url")]
    pub api_url: String,

    #[serde(default)]
    pub secret_key: String,

    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            provider: default_payment_provider(),
            api_url: default_payment_api_url(),
            secret_key: String::new(),
            currency: default_currency(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CalendarConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub api_url: String,

    #[serde(default)]
    pub api_key: String,
}

impl Config {
    /// Load configuration from `config/default.toml` (optional) with
    /// `ALUMNIVERSE__`-prefixed environment overrides.
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(
                config::Environment::with_prefix("ALUMNIVERSE")
                    .separator("__")
                    .list_separator(","),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .expect("Invalid server host/port configuration")
    }

    /// Bridge to the persistence crate's pool configuration.
    pub fn database_config(&self) -> persistence::db::DatabaseConfig {
        persistence::db::DatabaseConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
            min_connections: self.database.min_connections,
            connect_timeout_secs: self.database.connect_timeout_secs,
            idle_timeout_secs: self.database.idle_timeout_secs,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    2
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_idle_timeout() -> u64 {
    600
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rate_limit() -> u32 {
    30
}

fn default_token_expiry() -> i64 {
    3600
}

fn default_email_provider() -> String {
    "console".to_string()
}

fn default_from_email() -> String {
    "no-reply@alumniverse.example".to_string()
}

fn default_from_name() -> String {
    "Alumniverse".to_string()
}

fn default_payment_provider() -> String {
    "console".to_string()
}

fn default_payment_api_url() -> String {
    "https://api.paystack.co".to_string()
}

fn default_currency() -> String {
    "NGN".to_string()
}
