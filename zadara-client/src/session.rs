//! The configured connection to one array.

use crate::config::{self, EnvLookup};
use crate::error::{ClientError, Result};
use crate::request::RequestOverride;
use reqwest::Client as HttpClient;
use reqwest::redirect::Policy;
use std::fmt;
use std::path::PathBuf;

/// API timeout used when neither the session nor the call sets one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// A connection to a VPSA or VPSA Object Storage REST API.
///
/// Sessions are immutable. Per-call changes to host, port, key or scheme go
/// through [`CallOptions`](crate::CallOptions) and leave the session as it
/// was, so one session can be shared freely across tasks.
///
/// # Example
///
/// ```no_run
/// use zadara_client::{CallOptions, Session};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let session = Session::builder()
///     .host("vsa-00000001-aws.zadaravpsa.com")
///     .key("SECRETKEY")
///     .build()?;
///
/// let raid_groups = session
///     .get_all_raid_groups(Some(0), Some(10), &CallOptions::default())
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Session {
    host: String,
    port: Option<u32>,
    key: String,
    secure: bool,
    default_timeout: u64,
    pub(crate) http: HttpClient,
}

impl Session {
    /// Creates a session for `host` using `key`, reading nothing from the
    /// environment or the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the host or key is empty or the HTTP client cannot
    /// be created.
    pub fn new(host: impl Into<String>, key: impl Into<String>) -> Result<Self> {
        Self::builder()
            .host(host)
            .key(key)
            .env_lookup(|_| None)
            .no_config_file()
            .build()
    }

    /// Starts a [`SessionBuilder`] that falls back to `ZADARA_*` and the
    /// config file.
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    /// Hostname or IP address of the array.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Explicitly configured port. `None` means the scheme default.
    pub fn port(&self) -> Option<u32> {
        self.port
    }

    pub(crate) fn key(&self) -> &str {
        &self.key
    }

    /// Whether calls use HTTPS.
    pub fn secure(&self) -> bool {
        self.secure
    }

    /// API timeout in seconds for calls that do not set their own.
    pub fn default_timeout(&self) -> u64 {
        self.default_timeout
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("key", &"<redacted>")
            .field("secure", &self.secure)
            .field("default_timeout", &self.default_timeout)
            .finish()
    }
}

/// Builder for [`Session`].
///
/// Anything not set explicitly is resolved as described in
/// [`config`](crate::config).
pub struct SessionBuilder {
    explicit: RequestOverride,
    config_file: Option<PathBuf>,
    skip_config_file: bool,
    default_timeout: u64,
    env: EnvLookup,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self {
            explicit: RequestOverride::default(),
            config_file: None,
            skip_config_file: false,
            default_timeout: DEFAULT_TIMEOUT_SECS,
            env: config::process_env(),
        }
    }
}

impl SessionBuilder {
    /// Hostname or IP address of the array.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.explicit.host = Some(host.into());
        self
    }

    /// Port to connect to instead of the scheme default.
    #[must_use]
    pub fn port(mut self, port: u32) -> Self {
        self.explicit.port = Some(port);
        self
    }

    /// API key sent with every call.
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.explicit.key = Some(key.into());
        self
    }

    /// `false` selects plain HTTP.
    #[must_use]
    pub fn secure(mut self, secure: bool) -> Self {
        self.explicit.secure = Some(secure);
        self
    }

    /// Reads fallback settings from `path` instead of `~/.zadarapy`.
    #[must_use]
    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Never reads a config file, not even one set with
    /// [`config_file`](Self::config_file).
    #[must_use]
    pub fn no_config_file(mut self) -> Self {
        self.skip_config_file = true;
        self
    }

    /// API timeout in seconds for calls that do not set their own.
    #[must_use]
    pub fn default_timeout(mut self, seconds: u64) -> Self {
        self.default_timeout = seconds;
        self
    }

    /// Replaces the process environment as the source of `ZADARA_*`
    /// variables.
    #[must_use]
    pub fn env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Box::new(lookup);
        self
    }

    /// Resolves the connection settings and creates the session.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if no host or key can be found, a port
    /// setting is not a number, or the default timeout is zero.
    pub fn build(self) -> Result<Session> {
        if self.default_timeout == 0 {
            return Err(ClientError::Config(
                "timeout must be greater than 0".to_string(),
            ));
        }

        let settings = if self.skip_config_file {
            let nowhere = PathBuf::new();
            config::resolve(&self.explicit, Some(&nowhere), &*self.env)?
        } else {
            config::resolve(&self.explicit, self.config_file.as_deref(), &*self.env)?
        };

        // The server's own redirects must reach the status check.
        let http = HttpClient::builder().redirect(Policy::none()).build()?;

        tracing::debug!(
            host = %settings.host,
            port = ?settings.port,
            secure = settings.secure,
            "Session created"
        );

        Ok(Session {
            host: settings.host,
            port: settings.port,
            key: settings.key,
            secure: settings.secure,
            default_timeout: self.default_timeout,
            http,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_new() {
        let session = Session::new("example.com", "k").unwrap();
        assert_eq!(session.host(), "example.com");
        assert_eq!(session.port(), None);
        assert!(session.secure());
        assert_eq!(session.default_timeout(), DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_debug_redacts_key() {
        let session = Session::new("example.com", "SECRETKEY").unwrap();
        let debug = format!("{session:?}");
        assert!(!debug.contains("SECRETKEY"));
    }

    #[test]
    fn test_zero_default_timeout_rejected() {
        let result = Session::builder()
            .host("example.com")
            .key("k")
            .default_timeout(0)
            .env_lookup(|_| None)
            .no_config_file()
            .build();
        assert!(matches!(result, Err(ClientError::Config(_))));
    }

    #[test]
    fn test_no_config_file_ignores_file_settings() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[DEFAULT]\nhost = c.example.com\nport = 8443\nsecure = no").unwrap();

        let session = Session::builder()
            .host("example.com")
            .key("k")
            .config_file(file.path())
            .no_config_file()
            .env_lookup(|_| None)
            .build()
            .unwrap();
        assert_eq!(session.host(), "example.com");
        assert_eq!(session.port(), None);
        assert!(session.secure());
    }

    #[test]
    fn test_missing_key_rejected() {
        let result = Session::builder()
            .host("example.com")
            .env_lookup(|_| None)
            .no_config_file()
            .build();
        assert!(matches!(result, Err(ClientError::Config(_))));
    }
}
