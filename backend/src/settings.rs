//! Service configuration loaded via OrthoConfig.
//!
//! Every value can come from a config file, `ENROLLMENT_*` environment
//! variables or CLI flags. Unset values fall back to development defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("pool_max_size must be at least 1")]
    EmptyPool,
}

/// Runtime settings for the enrollment service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ENROLLMENT")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL. The in-memory demo store is used when
    /// absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Mark the session cookie `Secure`.
    #[ortho_config(default = true)]
    pub cookie_secure: bool,
    /// `SameSite` policy for the session cookie: `Strict`, `Lax` or `None`.
    pub same_site: Option<String>,
    /// File holding the session signing key.
    pub session_key_file: Option<PathBuf>,
    /// Fall back to a generated session key when the key file is
    /// unreadable. Rejected in release builds.
    #[ortho_config(default = false)]
    pub allow_ephemeral_session_key: bool,
}

impl ServerSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    pub fn pool_max_size(&self) -> Result<u32, SettingsError> {
        match self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE) {
            0 => Err(SettingsError::EmptyPool),
            size => Ok(size),
        }
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 7] = [
        "ENROLLMENT_BIND_ADDR",
        "ENROLLMENT_DATABASE_URL",
        "ENROLLMENT_POOL_MAX_SIZE",
        "ENROLLMENT_COOKIE_SECURE",
        "ENROLLMENT_SAME_SITE",
        "ENROLLMENT_SESSION_KEY_FILE",
        "ENROLLMENT_ALLOW_EPHEMERAL_SESSION_KEY",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("enrollment-backend")])
            .expect("config should load")
    }

    fn env_with(overrides: &[(&'static str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(env_with(&[]));

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("default parses"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("valid")
        );
        assert!(settings.database_url.is_none());
        assert_eq!(settings.pool_max_size().expect("default"), DEFAULT_POOL_MAX_SIZE);
        assert!(settings.cookie_secure);
        assert!(!settings.allow_ephemeral_session_key);
        assert_eq!(
            settings.session_key_file(),
            PathBuf::from(DEFAULT_SESSION_KEY_FILE)
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("ENROLLMENT_BIND_ADDR", "127.0.0.1:9090"),
            ("ENROLLMENT_DATABASE_URL", "postgres://localhost/enrollment"),
            ("ENROLLMENT_POOL_MAX_SIZE", "4"),
            ("ENROLLMENT_COOKIE_SECURE", "false"),
            ("ENROLLMENT_SAME_SITE", "Strict"),
            ("ENROLLMENT_SESSION_KEY_FILE", "/tmp/enrollment_key"),
        ]));

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("valid"),
            "127.0.0.1:9090".parse::<SocketAddr>().expect("valid")
        );
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/enrollment")
        );
        assert_eq!(settings.pool_max_size().expect("valid"), 4);
        assert!(!settings.cookie_secure);
        assert_eq!(settings.same_site.as_deref(), Some("Strict"));
        assert_eq!(
            settings.session_key_file(),
            PathBuf::from("/tmp/enrollment_key")
        );
    }

    #[rstest]
    fn malformed_bind_address_is_reported() {
        let _guard = lock_env(env_with(&[("ENROLLMENT_BIND_ADDR", "localhost")]));

        let settings = load_from_empty_args();

        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::BindAddr { .. })
        ));
    }

    #[rstest]
    fn zero_pool_size_is_rejected() {
        let _guard = lock_env(env_with(&[("ENROLLMENT_POOL_MAX_SIZE", "0")]));

        let settings = load_from_empty_args();

        assert!(matches!(
            settings.pool_max_size(),
            Err(SettingsError::EmptyPool)
        ));
    }
}
