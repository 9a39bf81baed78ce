//! Session cookie settings derived from [`ServerSettings`].
//!
//! Debug builds tolerate missing or odd values and warn. Release builds
//! refuse to start with an unsafe cookie setup.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use tracing::warn;
use zeroize::Zeroize;

use crate::settings::ServerSettings;

const SESSION_KEY_MIN_LEN: usize = 64;
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    Debug,
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

/// Validated session cookie settings.
pub struct SessionSettings {
    /// Signing and encryption key for cookie sessions.
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("invalid same_site value '{value}'; expected {SAMESITE_EXPECTED}")]
    InvalidSameSite { value: String },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("same_site=None requires cookie_secure")]
    InsecureSameSiteNone,
    #[error("allow_ephemeral_session_key must be false in release builds")]
    EphemeralNotAllowed,
}

/// Derive session settings for the given build mode.
///
/// # Examples
/// ```rust
/// use enrollment_backend::inbound::http::session_config::{session_settings, BuildMode};
/// use enrollment_backend::settings::ServerSettings;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let key_path = std::env::temp_dir().join("enrollment_session_key_example");
/// std::fs::write(&key_path, vec![b'a'; 64])?;
///
/// let settings = ServerSettings {
///     bind_addr: None,
///     database_url: None,
///     pool_max_size: None,
///     cookie_secure: true,
///     same_site: Some("Strict".to_owned()),
///     session_key_file: Some(key_path.clone()),
///     allow_ephemeral_session_key: false,
/// };
/// let session = session_settings(&settings, BuildMode::Release)?;
/// assert!(session.cookie_secure);
///
/// std::fs::remove_file(&key_path)?;
/// # Ok(())
/// # }
/// ```
pub fn session_settings(
    settings: &ServerSettings,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = settings.cookie_secure;
    let same_site = same_site(settings.same_site.as_deref(), mode, cookie_secure)?;
    if settings.allow_ephemeral_session_key && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let key = session_key(
        settings.session_key_file(),
        mode,
        settings.allow_ephemeral_session_key,
    )?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

fn same_site(
    value: Option<&str>,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let default_same_site = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };
    let Some(value) = value else {
        return Ok(default_same_site);
    };

    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" if mode.is_debug() => {
            warn!("same_site=None without a secure cookie; browsers may drop the session");
            Ok(SameSite::None)
        }
        "none" => Err(SessionConfigError::InsecureSameSiteNone),
        _ if mode.is_debug() => {
            warn!(value, "invalid same_site, using default");
            Ok(default_same_site)
        }
        _ => Err(SessionConfigError::InvalidSameSite {
            value: value.to_owned(),
        }),
    }
}

fn session_key(
    path: PathBuf,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if !mode.is_debug() && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(source) => Err(SessionConfigError::KeyRead { path, source }),
    }
}
