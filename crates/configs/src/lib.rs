use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub jwt: JwtConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub argon2: Argon2Config,
    #[serde(default)]
    pub rest_countries: RestCountriesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// `/healthz` + `/metrics` listener; disabled when absent.
    #[serde(default)]
    pub admin_addr: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4), admin_addr: None }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    /// Upper bound for one stored routine call, connection acquisition included.
    #[serde(default = "default_command_timeout")]
    pub command_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            command_timeout_secs: default_command_timeout(),
            sqlx_logging: false,
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_command_timeout() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    #[serde(default)]
    pub secret_key: String,
    #[serde(default = "default_expiration_hours")]
    pub expiration_hours: f64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self { secret_key: String::new(), expiration_hours: default_expiration_hours() }
    }
}

fn default_expiration_hours() -> f64 { 6.0 }

/// Longest token lifetime accepted, one year.
pub const MAX_EXPIRATION_HOURS: f64 = 8760.0;

/// The single administrator allowed to sign in.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    #[serde(default)]
    pub email: String,
    /// Base64 Argon2id digest.
    #[serde(default)]
    pub password_hash: String,
    /// Base64 salt used to produce `password_hash`.
    #[serde(default)]
    pub password_salt: String,
    #[serde(default = "default_admin_username")]
    pub username: String,
    #[serde(default = "default_admin_user_id")]
    pub user_id: i64,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            email: String::new(),
            password_hash: String::new(),
            password_salt: String::new(),
            username: default_admin_username(),
            user_id: default_admin_user_id(),
        }
    }
}

fn default_admin_username() -> String { "admin".into() }
fn default_admin_user_id() -> i64 { 1 }

#[derive(Debug, Clone, Deserialize)]
pub struct Argon2Config {
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
    #[serde(default = "default_hash_len")]
    pub hash_len: usize,
}

impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
            hash_len: default_hash_len(),
        }
    }
}

fn default_memory_kib() -> u32 { 65536 }
fn default_iterations() -> u32 { 4 }
fn default_parallelism() -> u32 { 8 }
fn default_hash_len() -> usize { 32 }

#[derive(Debug, Clone, Deserialize)]
pub struct RestCountriesConfig {
    #[serde(default = "default_countries_base_url")]
    pub base_url: String,
    #[serde(default = "default_countries_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_use_cache")]
    pub use_cache: bool,
    #[serde(default = "default_cache_expiration")]
    pub cache_expiration_minutes: u64,
}

impl Default for RestCountriesConfig {
    fn default() -> Self {
        Self {
            base_url: default_countries_base_url(),
            timeout_seconds: default_countries_timeout(),
            use_cache: default_use_cache(),
            cache_expiration_minutes: default_cache_expiration(),
        }
    }
}

fn default_countries_base_url() -> String { "https://restcountries.com/v3.1".into() }
fn default_countries_timeout() -> u64 { 30 }
fn default_use_cache() -> bool { true }
fn default_cache_expiration() -> u64 { 60 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_path")]
    pub path: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { path: default_log_path(), json: false }
    }
}

fn default_log_path() -> String { "./logs".into() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        self.jwt.normalize_from_env();
        self.jwt.validate()?;
        self.rest_countries.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            if !host.trim().is_empty() { self.host = host; }
        }
        if let Ok(port) = std::env::var("SERVER_PORT") {
            self.port = port.trim().parse().map_err(|_| anyhow!("SERVER_PORT must be a port number"))?;
        }
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        // fall back to DATABASE_URL when the TOML leaves the URL empty
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 || self.command_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl JwtConfig {
    pub fn normalize_from_env(&mut self) {
        if self.secret_key.trim().is_empty() {
            if let Ok(secret) = std::env::var("JWT_SECRET") {
                self.secret_key = secret;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.secret_key.trim().is_empty() {
            return Err(anyhow!("jwt.secret_key is not configured"));
        }
        if !(self.expiration_hours > 0.0) {
            return Err(anyhow!("jwt.expiration_hours must be positive"));
        }
        if self.expiration_hours > MAX_EXPIRATION_HOURS {
            return Err(anyhow!("jwt.expiration_hours must not exceed {MAX_EXPIRATION_HOURS}"));
        }
        Ok(())
    }
}

impl RestCountriesConfig {
    pub fn validate(&self) -> Result<()> {
        let lower = self.base_url.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(anyhow!("rest_countries.base_url must start with http(s)"));
        }
        if self.timeout_seconds == 0 {
            return Err(anyhow!("rest_countries.timeout_seconds must be positive"));
        }
        Ok(())
    }
}
