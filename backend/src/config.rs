use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::models::LocaleSet;
use crate::utils::i18n::{DEFAULT_LOCALE, DEFAULT_SUPPORTED_LOCALES};

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub i18n: I18nConfig,
    pub gate: GateConfig,
    pub identity: IdentityConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Ordered list of locale tags usable as the first path segment
    pub locales: Vec<String>,
    pub default_locale: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Path prefixes that require a session (matched after the locale segment)
    pub protected_paths: Vec<String>,
    /// Path prefixes the gate never touches
    pub excluded_paths: Vec<String>,
    pub provider_failure: ProviderFailurePolicy,
}

/// What a failed identity lookup means for the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderFailurePolicy {
    /// Treat the visitor as signed out: protected paths redirect to login.
    #[default]
    Closed,
    /// Let the request through as if no identity provider were configured.
    Open,
}

impl std::str::FromStr for ProviderFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "closed" => Ok(Self::Closed),
            "open" => Ok(Self::Open),
            other => Err(format!("unknown provider failure policy: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Base URL of the identity provider; empty disables session checks
    pub url: String,
    pub anon_key: String,
    pub access_cookie: String,
    pub refresh_cookie: String,
    /// Request timeout in seconds (accepts "5s", "1m")
    #[serde(deserialize_with = "deserialize_duration_secs")]
    pub timeout_secs: u64,
}

impl IdentityConfig {
    /// The capability flag: both connection parameters are present.
    pub fn is_enabled(&self) -> bool {
        !self.url.trim().is_empty() && !self.anon_key.trim().is_empty()
    }
}

impl Config {
    /// Load configuration with environment variable override support
    ///
    /// Loading order:
    /// 1. Load from `explicit_path`, or the first config.toml found
    /// 2. Override with environment variables (prefixed with APP_)
    /// 3. Validate the final configuration
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, anyhow::Error> {
        let mut config = match explicit_path {
            Some(path) => Self::from_toml(path)?,
            None => match Self::find_config_file() {
                Some(path) => Self::from_toml(Path::new(&path))?,
                None => {
                    tracing::warn!("Configuration file not found, using defaults");
                    Config::default()
                },
            },
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - APP_SERVER_HOST / APP_SERVER_PORT
    /// - APP_LOG_LEVEL: Logging level (e.g., "info,arena_gate=debug")
    /// - APP_SUPPORTED_LOCALES: Comma-separated locale tags (e.g., "en,fr,pt-BR")
    /// - APP_DEFAULT_LOCALE
    /// - APP_PROTECTED_PATHS: Comma-separated path prefixes
    /// - APP_PROVIDER_FAILURE: "closed" or "open"
    /// - APP_IDENTITY_URL / APP_IDENTITY_ANON_KEY
    /// - APP_IDENTITY_TIMEOUT: accepts "5", "5s", "1m"
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("APP_SERVER_HOST") {
            self.server.host = host;
            tracing::info!("Override server.host from env: {}", self.server.host);
        }

        if let Ok(port) = std::env::var("APP_SERVER_PORT")
            && let Ok(port) = port.parse()
        {
            self.server.port = port;
            tracing::info!("Override server.port from env: {}", self.server.port);
        }

        if let Ok(level) = std::env::var("APP_LOG_LEVEL") {
            self.logging.level = level;
            tracing::info!("Override logging.level from env: {}", self.logging.level);
        }

        if let Ok(locales) = std::env::var("APP_SUPPORTED_LOCALES") {
            self.i18n.locales = split_list(&locales);
            tracing::info!("Override i18n.locales from env: {:?}", self.i18n.locales);
        }

        if let Ok(default_locale) = std::env::var("APP_DEFAULT_LOCALE") {
            self.i18n.default_locale = default_locale.trim().to_string();
            tracing::info!("Override i18n.default_locale from env: {}", self.i18n.default_locale);
        }

        if let Ok(paths) = std::env::var("APP_PROTECTED_PATHS") {
            self.gate.protected_paths = split_list(&paths);
            tracing::info!("Override gate.protected_paths from env: {:?}", self.gate.protected_paths);
        }

        if let Ok(policy) = std::env::var("APP_PROVIDER_FAILURE") {
            match policy.parse() {
                Ok(val) => {
                    self.gate.provider_failure = val;
                    tracing::info!(
                        "Override gate.provider_failure from env: {:?}",
                        self.gate.provider_failure
                    );
                },
                Err(e) => tracing::warn!(
                    "Invalid APP_PROVIDER_FAILURE '{}': {} (keep {:?})",
                    policy,
                    e,
                    self.gate.provider_failure
                ),
            }
        }

        if let Ok(url) = std::env::var("APP_IDENTITY_URL") {
            self.identity.url = url;
            tracing::info!("Override identity.url from env: {}", self.identity.url);
        }

        if let Ok(key) = std::env::var("APP_IDENTITY_ANON_KEY") {
            self.identity.anon_key = key;
            tracing::info!("Override identity.anon_key from env");
        }

        if let Ok(timeout) = std::env::var("APP_IDENTITY_TIMEOUT") {
            match parse_duration_to_secs(&timeout) {
                Ok(val) => {
                    self.identity.timeout_secs = val;
                    tracing::info!(
                        "Override identity.timeout_secs from env: {}",
                        self.identity.timeout_secs
                    );
                },
                Err(e) => tracing::warn!(
                    "Invalid APP_IDENTITY_TIMEOUT '{}': {} (keep {})",
                    timeout,
                    e,
                    self.identity.timeout_secs
                ),
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.server.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }

        self.locale_set()?;

        for prefix in self.gate.protected_paths.iter().chain(&self.gate.excluded_paths) {
            if !prefix.starts_with('/') {
                anyhow::bail!("Path prefix '{}' must start with '/'", prefix);
            }
        }

        if self.identity.timeout_secs == 0 {
            anyhow::bail!("identity.timeout_secs must be > 0");
        }

        if self.identity.url.trim().is_empty() != self.identity.anon_key.trim().is_empty() {
            tracing::warn!("identity.url and identity.anon_key must both be set; sign-in is disabled");
        }

        Ok(())
    }

    pub fn locale_set(&self) -> Result<LocaleSet, anyhow::Error> {
        LocaleSet::new(&self.i18n.locales, &self.i18n.default_locale)
            .map_err(|e| anyhow::anyhow!("Invalid i18n configuration: {}", e))
    }

    fn find_config_file() -> Option<String> {
        let possible_paths =
            ["conf/config.toml", "config.toml", "./conf/config.toml", "./config.toml"];

        for path in &possible_paths {
            if Path::new(path).exists() {
                return Some(path.to_string());
            }
        }
        None
    }

    fn from_toml(path: &Path) -> Result<Self, anyhow::Error> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, anyhow::Error> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8080 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info,arena_gate=debug".to_string(), file: None }
    }
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            locales: DEFAULT_SUPPORTED_LOCALES.iter().map(|s| s.to_string()).collect(),
            default_locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            protected_paths: ["/dashboard", "/profile", "/settings", "/billing", "/training"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            excluded_paths: ["/api", "/auth/callback", "/_next", "/static"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            provider_failure: ProviderFailurePolicy::Closed,
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            access_cookie: "sb-access-token".to_string(),
            refresh_cookie: "sb-refresh-token".to_string(),
            timeout_secs: 5,
        }
    }
}

// =========================
// Helpers for parsing values
// =========================

fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_duration_to_secs(input: &str) -> Result<u64, String> {
    // Accept plain numbers (treated as seconds)
    if let Ok(val) = input.parse::<u64>() {
        return Ok(val);
    }

    let s = input.trim().to_lowercase();
    let (num_str, unit) = s.split_at(s.chars().take_while(|c| c.is_ascii_digit()).count());
    if num_str.is_empty() || unit.is_empty() {
        return Err("missing number or unit".into());
    }
    let n: u64 = num_str.parse().map_err(|_| "invalid number".to_string())?;
    match unit {
        "s" | "sec" | "secs" | "second" | "seconds" => Ok(n),
        "m" | "min" | "mins" | "minute" | "minutes" => {
            n.checked_mul(60).ok_or_else(|| "duration too large".to_string())
        },
        _ => Err(format!("unsupported unit: {}", unit)),
    }
}

// Accepts a number of seconds or a human-friendly string
fn deserialize_duration_secs<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct Visitor;
    impl<'de> serde::de::Visitor<'de> for Visitor {
        type Value = u64;
        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a number of seconds or a string like '5s', '1m'")
        }
        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v)
        }
        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            if v >= 0 { Ok(v as u64) } else { Err(E::custom("negative not allowed")) }
        }
        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            parse_duration_to_secs(v).map_err(E::custom)
        }
    }
    deserializer.deserialize_any(Visitor)
}
