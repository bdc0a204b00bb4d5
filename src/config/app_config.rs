use std::fmt;

use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub mail: MailConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served under `/assets`
    pub assets_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL; users are kept in memory when unset
    pub url: Option<String>,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 signing secret; a random one is generated when unset
    pub jwt_secret: Option<String>,
    pub token_expiration_hours: u64,
    /// Argon2 time cost (iterations)
    pub hash_cost: u32,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub smtp_host: String,
    /// Relay account; also the sender address
    pub username: Option<String>,
    pub password: Option<String>,
    /// Operator inbox; defaults to the relay account
    pub to: Option<String>,
    pub from_name: String,
    pub logo_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            assets_dir: "assets".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            connect_timeout_secs: 30,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_expiration_hours: 24,
            hash_cost: 2,
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.gmail.com".to_string(),
            username: None,
            password: None,
            to: None,
            from_name: "Virtua Mod Contact".to_string(),
            logo_path: Some("logo.png".to_string()),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "[hidden]"))
            .field("token_expiration_hours", &self.token_expiration_hours)
            .field("hash_cost", &self.hash_cost)
            .finish()
    }
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[hidden]"))
            .field("to", &self.to)
            .field("from_name", &self.from_name)
            .field("logo_path", &self.logo_path)
            .finish()
    }
}

impl MailConfig {
    /// Operator inbox that receives contact submissions
    pub fn operator_inbox(&self) -> Option<&str> {
        self.to.as_deref().or(self.username.as_deref())
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: Self = config.try_deserialize()?;
        app_config.apply_env_overrides(|key| std::env::var(key).ok())?;

        Ok(app_config)
    }

    /// Apply the flat environment variables used by existing deployments
    /// (`PORT`, `DATABASE_URL`, `JWT_SECRET`, `SALT`, `EMAIL_USER`, ...)
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), config::ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(port) = non_empty("PORT") {
            self.server.port = parse_var("PORT", &port)?;
        }

        if let Some(url) = non_empty("DATABASE_URL").or_else(|| non_empty("MONGO_URI")) {
            self.database.url = Some(url);
        }

        if let Some(secret) = non_empty("JWT_SECRET") {
            self.auth.jwt_secret = Some(secret);
        }

        if let Some(cost) = non_empty("PASSWORD_HASH_COST").or_else(|| non_empty("SALT")) {
            self.auth.hash_cost = parse_var("PASSWORD_HASH_COST", &cost)?;
        }

        if let Some(host) = non_empty("SMTP_HOST") {
            self.mail.smtp_host = host;
        }

        if let Some(user) = non_empty("EMAIL_USER") {
            self.mail.username = Some(user);
        }

        if let Some(pass) = non_empty("EMAIL_PASS") {
            self.mail.password = Some(pass);
        }

        if let Some(inbox) = non_empty("CONTACT_INBOX") {
            self.mail.to = Some(inbox);
        }

        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, config::ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| config::ConfigError::Message(format!("{key} has an invalid value: {value}")))
}
