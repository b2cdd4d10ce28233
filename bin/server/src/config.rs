//! Centralized server configuration.
//!
//! This module provides strongly-typed configuration for the server,
//! loaded via the `config` crate from environment variables. Nested keys
//! use `__` as separator, e.g. `SESSION__MAX_SESSIONS`.

use chrono::Duration;
use cloudbuddy_conversation::SessionStoreConfig;
use cloudbuddy_practice::QuestionCacheConfig;
use serde::Deserialize;

/// Server configuration composed from library configs.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Gemini API key from `GEMINI_API_KEY`.
    #[serde(default)]
    pub gemini_api_key: Option<String>,

    /// Gemini model settings.
    #[serde(default)]
    pub gemini: GeminiSettings,

    /// Session store limits.
    #[serde(default)]
    pub session: SessionConfig,

    /// Practice question cache limits.
    #[serde(default)]
    pub practice: PracticeConfig,
}

fn default_bind_address() -> String {
    "0.0.0.0:5000".to_string()
}

/// Gemini-related configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    /// API key from `GEMINI__API_KEY`. `GEMINI_API_KEY` takes precedence.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// API host.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_model() -> String {
    cloudbuddy_ai::gemini::DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    cloudbuddy_ai::gemini::DEFAULT_BASE_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Session-related configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Maximum sessions held in memory.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Sessions idle for longer than this are dropped, in minutes.
    #[serde(default = "default_idle_ttl_minutes")]
    pub idle_ttl_minutes: i64,

    /// Exchanges kept per session.
    #[serde(default = "default_max_history")]
    pub max_history: usize,

    /// Interval between session cleanup runs, in seconds.
    #[serde(default = "default_cleanup_interval_seconds")]
    pub cleanup_interval_seconds: u64,
}

fn default_max_sessions() -> usize {
    10_000
}

fn default_idle_ttl_minutes() -> i64 {
    24 * 60
}

fn default_max_history() -> usize {
    100
}

fn default_cleanup_interval_seconds() -> u64 {
    300
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions: default_max_sessions(),
            idle_ttl_minutes: default_idle_ttl_minutes(),
            max_history: default_max_history(),
            cleanup_interval_seconds: default_cleanup_interval_seconds(),
        }
    }
}

impl SessionConfig {
    /// Returns the idle TTL as a duration.
    ///
    /// # Errors
    ///
    /// Returns an error if the TTL is not positive or does not fit a
    /// [`Duration`].
    pub fn idle_ttl(&self) -> Result<Duration, config::ConfigError> {
        Duration::try_minutes(self.idle_ttl_minutes)
            .filter(|ttl| *ttl > Duration::zero())
            .ok_or_else(|| {
                config::ConfigError::Message(format!(
                    "session.idle_ttl_minutes must be a positive number of minutes, got {}",
                    self.idle_ttl_minutes
                ))
            })
    }

    /// Returns the store limits described by this config.
    ///
    /// An out-of-range TTL falls back to the store default; [`ServerConfig::from_env`]
    /// rejects such values before they get here.
    #[must_use]
    pub fn store_config(&self) -> SessionStoreConfig {
        SessionStoreConfig {
            max_sessions: self.max_sessions,
            idle_ttl: self
                .idle_ttl()
                .unwrap_or_else(|_| SessionStoreConfig::default().idle_ttl),
            max_history: self.max_history,
        }
    }
}

/// Practice question configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PracticeConfig {
    /// Questions cached per (service, difficulty, topic).
    #[serde(default = "default_max_cached_per_key")]
    pub max_cached_per_key: usize,

    /// Distinct cache keys kept.
    #[serde(default = "default_max_cache_keys")]
    pub max_cache_keys: usize,
}

fn default_max_cached_per_key() -> usize {
    20
}

fn default_max_cache_keys() -> usize {
    500
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            max_cached_per_key: default_max_cached_per_key(),
            max_cache_keys: default_max_cache_keys(),
        }
    }
}

impl PracticeConfig {
    /// Returns the cache limits described by this config.
    #[must_use]
    pub fn cache_config(&self) -> QuestionCacheConfig {
        QuestionCacheConfig {
            max_per_key: self.max_cached_per_key,
            max_keys: self.max_cache_keys,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration values are present but invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_source(
            config::Config::builder()
                .add_source(
                    config::Environment::default()
                        .separator("__")
                        .try_parsing(true),
                )
                .build()?,
        )
    }

    fn from_source(source: config::Config) -> Result<Self, config::ConfigError> {
        let config: Self = source.try_deserialize()?;
        config.session.idle_ttl()?;
        Ok(config)
    }

    /// Returns the Gemini API key, if one is set and non-blank.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.gemini_api_key
            .as_deref()
            .or(self.gemini.api_key.as_deref())
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Returns the Gemini client settings, if an API key is configured.
    #[must_use]
    pub fn gemini_client_config(&self) -> Option<cloudbuddy_ai::GeminiConfig> {
        self.api_key().map(|key| cloudbuddy_ai::GeminiConfig {
            api_key: key.to_string(),
            model: self.gemini.model.clone(),
            base_url: self.gemini.base_url.clone(),
            timeout: std::time::Duration::from_secs(self.gemini.timeout_seconds),
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            gemini_api_key: None,
            gemini: GeminiSettings::default(),
            session: SessionConfig::default(),
            practice: PracticeConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_config_has_correct_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.max_sessions, 10_000);
        assert_eq!(config.idle_ttl_minutes, 1440);
        assert_eq!(config.max_history, 100);
        assert_eq!(config.cleanup_interval_seconds, 300);
        assert_eq!(config.store_config().idle_ttl, Duration::hours(24));
    }

    #[test]
    fn gemini_settings_have_correct_defaults() {
        let config = GeminiSettings::default();
        assert_eq!(config.model, "gemini-2.0-flash-exp");
        assert_eq!(config.base_url, "https://generativelanguage.googleapis.com");
        assert_eq!(config.timeout_seconds, 60);
    }

    #[test]
    fn practice_config_has_correct_defaults() {
        let config = PracticeConfig::default().cache_config();
        assert_eq!(config.max_per_key, 20);
        assert_eq!(config.max_keys, 500);
    }

    #[test]
    fn flat_api_key_wins_over_nested() {
        let config = ServerConfig {
            gemini_api_key: Some("flat".to_string()),
            gemini: GeminiSettings {
                api_key: Some("nested".to_string()),
                ..GeminiSettings::default()
            },
            ..ServerConfig::default()
        };
        assert_eq!(config.api_key(), Some("flat"));
    }

    #[test]
    fn blank_api_key_means_unconfigured() {
        let config = ServerConfig {
            gemini_api_key: Some("   ".to_string()),
            ..ServerConfig::default()
        };
        assert_eq!(config.api_key(), None);
        assert!(config.gemini_client_config().is_none());
    }

    #[test]
    fn deserializes_nested_keys() {
        let config = config::Config::builder()
            .set_override("bind_address", "127.0.0.1:8080")
            .and_then(|b| b.set_override("session.max_history", 5))
            .and_then(|b| b.set_override("gemini.api_key", "key"))
            .and_then(|b| b.build())
            .and_then(ServerConfig::from_source)
            .expect("config");

        assert_eq!(config.bind_address, "127.0.0.1:8080");
        assert_eq!(config.session.max_history, 5);
        assert_eq!(config.session.max_sessions, 10_000);
        assert_eq!(config.api_key(), Some("key"));
    }

    fn session_ttl(minutes: i64) -> Result<ServerConfig, config::ConfigError> {
        config::Config::builder()
            .set_override("session.idle_ttl_minutes", minutes)
            .and_then(|b| b.build())
            .and_then(ServerConfig::from_source)
    }

    #[test]
    fn non_positive_idle_ttl_is_rejected() {
        assert!(session_ttl(0).is_err());
        assert!(session_ttl(-5).is_err());
    }

    #[test]
    fn overflowing_idle_ttl_is_rejected() {
        let err = session_ttl(i64::MAX).expect_err("out of range");
        assert!(err.to_string().contains("idle_ttl_minutes"));

        let config = SessionConfig {
            idle_ttl_minutes: i64::MAX,
            ..SessionConfig::default()
        };
        assert_eq!(config.store_config().idle_ttl, Duration::hours(24));
    }

    #[test]
    fn custom_idle_ttl_is_used() {
        let config = session_ttl(30).expect("config");
        assert_eq!(config.session.store_config().idle_ttl, Duration::minutes(30));
    }
}
