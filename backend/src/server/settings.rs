//! Environment-driven server settings.
//!
//! Centralises every toggle the binary reads so parsing is validated in one
//! place and testable against a mocked environment. Release builds require
//! explicit values; debug builds tolerate defaults and warn.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use reqwest::Url;
use tracing::warn;
use zeroize::Zeroize;

const BIND_ADDR_ENV: &str = "BIND_ADDR";
const BIND_ADDR_DEFAULT: &str = "0.0.0.0:8080";

const DATA_API_URL_ENV: &str = "DATA_API_URL";
const DATA_API_KEY_ENV: &str = "DATA_API_SERVICE_KEY";
const DATA_API_TIMEOUT_ENV: &str = "DATA_API_TIMEOUT_SECS";
const DATA_API_TIMEOUT_DEFAULT_SECS: u64 = 10;

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "SESSION_SAMESITE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Build mode for settings validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for missing toggles.
    Debug,
    /// Release builds require explicit, valid settings.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Cookie session settings.
pub struct SessionSettings {
    /// Signing key for cookie sessions.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// `SameSite` policy for session cookies.
    pub same_site: SameSite,
}

impl std::fmt::Debug for SessionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSettings")
            .field("key", &"<redacted>")
            .field("cookie_secure", &self.cookie_secure)
            .field("same_site", &self.same_site)
            .finish()
    }
}

/// Connection settings for the hosted data API.
#[derive(Debug, Clone)]
pub struct DataApiSettings {
    /// Base URL of the hosted data API.
    pub base_url: Url,
    /// Service key sent as both api key and bearer token.
    pub service_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Everything the binary needs to start serving.
#[derive(Debug)]
pub struct ServerSettings {
    /// Socket the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Cookie session settings.
    pub session: SessionSettings,
    /// Hosted data API connection; `None` selects the in-memory store.
    pub data_api: Option<DataApiSettings>,
}

/// Errors raised while validating server settings.
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv {
        /// The variable that was not set.
        name: &'static str,
    },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        /// The offending variable.
        name: &'static str,
        /// The rejected value.
        value: String,
        /// What a valid value looks like.
        expected: &'static str,
    },
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The session key file exists but is too short for release builds.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        /// Path that was read.
        path: PathBuf,
        /// Actual key length.
        length: usize,
        /// Required minimum length.
        min_len: usize,
    },
    /// `SameSite=None` requires a secure cookie setting in release builds.
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    /// Release builds must not allow ephemeral session keys.
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Build the full server settings from environment variables and build mode.
///
/// # Errors
///
/// Returns a [`SettingsError`] when a toggle is missing or invalid for the
/// given build mode.
pub fn server_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<ServerSettings, SettingsError> {
    Ok(ServerSettings {
        bind_addr: bind_addr_from_env(env, mode)?,
        session: session_settings_from_env(env, mode)?,
        data_api: data_api_settings_from_env(env, mode)?,
    })
}

fn bind_addr_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<SocketAddr, SettingsError> {
    let raw = env
        .string(BIND_ADDR_ENV)
        .unwrap_or_else(|| BIND_ADDR_DEFAULT.to_string());
    raw.parse().map_err(|_| {
        if mode.is_debug() {
            warn!(value = %raw, "invalid BIND_ADDR; refusing to guess");
        }
        SettingsError::InvalidEnv {
            name: BIND_ADDR_ENV,
            value: raw,
            expected: "host:port",
        }
    })
}

/// Build the hosted data API settings.
///
/// Both the URL and the service key must be present together. In debug builds
/// their absence selects the in-memory store; release builds refuse to start
/// without them.
fn data_api_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<Option<DataApiSettings>, SettingsError> {
    let raw_url = env.string(DATA_API_URL_ENV);
    let service_key = env.string(DATA_API_KEY_ENV);

    let (raw_url, service_key) = match (raw_url, service_key) {
        (Some(url), Some(key)) => (url, key),
        (None, None) if mode.is_debug() => {
            warn!("DATA_API_URL not set; using the in-memory store (dev only)");
            return Ok(None);
        }
        (url, _) => {
            let name = if url.is_none() {
                DATA_API_URL_ENV
            } else {
                DATA_API_KEY_ENV
            };
            return Err(SettingsError::MissingEnv { name });
        }
    };

    let base_url: Url = raw_url.parse().map_err(|_| SettingsError::InvalidEnv {
        name: DATA_API_URL_ENV,
        value: raw_url,
        expected: "absolute http(s) URL",
    })?;

    let timeout = match env.string(DATA_API_TIMEOUT_ENV) {
        Some(value) => {
            let secs: u64 = value.parse().map_err(|_| SettingsError::InvalidEnv {
                name: DATA_API_TIMEOUT_ENV,
                value,
                expected: "whole seconds",
            })?;
            Duration::from_secs(secs)
        }
        None => Duration::from_secs(DATA_API_TIMEOUT_DEFAULT_SECS),
    };

    Ok(Some(DataApiSettings {
        base_url,
        service_key,
        timeout,
    }))
}

/// Build session settings from environment variables and build mode.
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SettingsError> {
    let cookie_secure = cookie_secure_from_env(env, mode)?;
    let same_site = same_site_from_env(env, mode, cookie_secure)?;
    let allow_ephemeral = allow_ephemeral_from_env(env, mode)?;
    let key = session_key_from_env(env, mode, allow_ephemeral)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

fn cookie_secure_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, SettingsError> {
    match env.string(COOKIE_SECURE_ENV) {
        Some(value) => match parse_bool(&value) {
            Some(flag) => Ok(flag),
            None if mode.is_debug() => {
                warn!(value = %value, "invalid SESSION_COOKIE_SECURE; defaulting to secure");
                Ok(true)
            }
            None => Err(SettingsError::InvalidEnv {
                name: COOKIE_SECURE_ENV,
                value,
                expected: BOOL_EXPECTED,
            }),
        },
        None if mode.is_debug() => {
            warn!("SESSION_COOKIE_SECURE not set; defaulting to secure");
            Ok(true)
        }
        None => Err(SettingsError::MissingEnv {
            name: COOKIE_SECURE_ENV,
        }),
    }
}

fn same_site_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SettingsError> {
    let default_same_site = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };

    let value = match env.string(SAMESITE_ENV) {
        Some(value) => value,
        None if mode.is_debug() => {
            warn!("SESSION_SAMESITE not set; using default");
            return Ok(default_same_site);
        }
        None => return Err(SettingsError::MissingEnv { name: SAMESITE_ENV }),
    };

    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" if mode.is_debug() => {
            warn!("SESSION_SAMESITE=None with an insecure cookie; browsers may reject it");
            Ok(SameSite::None)
        }
        "none" => Err(SettingsError::InsecureSameSiteNone),
        _ if mode.is_debug() => {
            warn!(value = %value, "invalid SESSION_SAMESITE, using default");
            Ok(default_same_site)
        }
        _ => Err(SettingsError::InvalidEnv {
            name: SAMESITE_ENV,
            value,
            expected: SAMESITE_EXPECTED,
        }),
    }
}

fn allow_ephemeral_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, SettingsError> {
    match env.string(ALLOW_EPHEMERAL_ENV) {
        Some(value) => match parse_bool(&value) {
            Some(true) if mode.is_debug() => Ok(true),
            Some(true) => Err(SettingsError::EphemeralNotAllowed),
            Some(false) => Ok(false),
            None if mode.is_debug() => {
                warn!(value = %value, "invalid SESSION_ALLOW_EPHEMERAL; defaulting to disabled");
                Ok(false)
            }
            None => Err(SettingsError::InvalidEnv {
                name: ALLOW_EPHEMERAL_ENV,
                value,
                expected: BOOL_EXPECTED,
            }),
        },
        None if mode.is_debug() => Ok(false),
        None => Err(SettingsError::MissingEnv {
            name: ALLOW_EPHEMERAL_ENV,
        }),
    }
}

fn session_key_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SettingsError> {
    let key_path = env
        .string(KEY_FILE_ENV)
        .unwrap_or_else(|| SESSION_KEY_DEFAULT_PATH.to_string());
    let path = PathBuf::from(key_path);

    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SettingsError::KeyTooShort {
                    path,
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) => {
            if mode.is_debug() || allow_ephemeral {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "using temporary session key (dev only)"
                );
                Ok(Key::generate())
            } else {
                Err(SettingsError::KeyRead {
                    path,
                    source: error,
                })
            }
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
