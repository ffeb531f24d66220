//! Connection settings resolution.
//!
//! Each of host, port, key and secure is taken from the first source that
//! has it:
//!
//! 1. an explicit value passed to [`SessionBuilder`](crate::SessionBuilder)
//! 2. the `ZADARA_HOST`, `ZADARA_PORT`, `ZADARA_KEY` and `ZADARA_SECURE`
//!    environment variables
//! 3. an INI file (by default `~/.zadarapy`), read from its `[DEFAULT]`
//!    section or from keys above any section header
//!
//! ```ini
//! [DEFAULT]
//! host = vsa-00000001-aws.zadaravpsa.com
//! key = SECRETKEY
//! port = 443
//! secure = true
//! ```

use crate::error::{ClientError, Result};
use crate::request::RequestOverride;
use config::{Config, File, FileFormat};
use std::path::{Path, PathBuf};

/// File name looked up in the user's home directory.
pub const DEFAULT_CONFIG_FILE: &str = ".zadarapy";

pub const ENV_HOST: &str = "ZADARA_HOST";
pub const ENV_PORT: &str = "ZADARA_PORT";
pub const ENV_KEY: &str = "ZADARA_KEY";
pub const ENV_SECURE: &str = "ZADARA_SECURE";

/// Looks an environment variable up by name.
pub type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Fully resolved connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub host: String,
    pub port: Option<u32>,
    pub key: String,
    pub secure: bool,
}

/// Reads from the process environment.
pub fn process_env() -> EnvLookup {
    Box::new(|name| std::env::var(name).ok())
}

/// `~/.zadarapy`, if a home directory can be determined.
pub fn default_config_path() -> Option<PathBuf> {
    home::home_dir().map(|home| home.join(DEFAULT_CONFIG_FILE))
}

/// Interprets a `secure` setting. `false`, `no`, `off` and `n` (any case)
/// select plain HTTP; anything else keeps HTTPS.
pub fn parse_secure(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "false" | "no" | "off" | "n"
    )
}

fn parse_port(value: &str, source: &str) -> Result<u32> {
    value.trim().parse::<u32>().map_err(|_| {
        ClientError::Config(format!("{value} from {source} is not a valid port number"))
    })
}

/// Values found in the configuration file.
#[derive(Debug, Default)]
struct FileValues {
    host: Option<String>,
    port: Option<String>,
    key: Option<String>,
    secure: Option<String>,
}

impl FileValues {
    fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, skipping");
            return Ok(Self::default());
        }

        let settings = Config::builder()
            .add_source(File::new(&path.to_string_lossy(), FileFormat::Ini).required(false))
            .build()
            .map_err(|e| {
                ClientError::Config(format!("Could not read {}: {e}", path.display()))
            })?;

        // Section-less keys land at the top level, `[DEFAULT]` keys under a
        // table whose name casing depends on the parser.
        let lookup = |name: &str| {
            [name.to_string(), format!("DEFAULT.{name}"), format!("default.{name}")]
                .iter()
                .find_map(|key| settings.get_string(key).ok())
        };

        Ok(Self {
            host: lookup("host"),
            port: lookup("port"),
            key: lookup("key"),
            secure: lookup("secure"),
        })
    }
}

/// Resolves connection settings from explicit values, the environment and
/// the config file, in that order.
///
/// The config file is only read when something is still missing after the
/// first two sources.
pub fn resolve(
    explicit: &RequestOverride,
    config_file: Option<&Path>,
    env: &(dyn Fn(&str) -> Option<String> + Send + Sync),
) -> Result<ConnectionSettings> {
    let mut host = explicit.host.clone().or_else(|| env(ENV_HOST));
    let mut key = explicit.key.clone().or_else(|| env(ENV_KEY));
    let mut port = match explicit.port {
        Some(port) => Some(port),
        None => env(ENV_PORT).map(|p| parse_port(&p, ENV_PORT)).transpose()?,
    };
    let mut secure = explicit
        .secure
        .or_else(|| env(ENV_SECURE).map(|s| parse_secure(&s)));

    if host.is_none() || key.is_none() || port.is_none() || secure.is_none() {
        let default_path = default_config_path();
        let path = config_file.or(default_path.as_deref());
        if let Some(path) = path {
            let file = FileValues::load(path)?;
            host = host.or(file.host);
            key = key.or(file.key);
            if port.is_none() {
                let source = path.display().to_string();
                port = file.port.map(|p| parse_port(&p, &source)).transpose()?;
            }
            secure = secure.or_else(|| file.secure.map(|s| parse_secure(&s)));
        }
    }

    let host = host.filter(|h| !h.is_empty()).ok_or_else(|| {
        ClientError::Config(
            "No hostname was supplied. Pass one explicitly, set ZADARA_HOST, or add \
             'host' to the configuration file"
                .to_string(),
        )
    })?;
    let key = key.filter(|k| !k.is_empty()).ok_or_else(|| {
        ClientError::Config(
            "No API key was supplied. Pass one explicitly, set ZADARA_KEY, or add \
             'key' to the configuration file"
                .to_string(),
        )
    })?;

    Ok(ConnectionSettings {
        host,
        port,
        key,
        secure: secure.unwrap_or(true),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env_from(pairs: &[(&str, &str)]) -> EnvLookup {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Box::new(move |name| vars.get(name).cloned())
    }

    fn config_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_explicit_beats_env_and_file() {
        let file = config_file("[DEFAULT]\nhost = c\nkey = filekey\n");
        let env = env_from(&[(ENV_HOST, "b"), (ENV_KEY, "envkey")]);
        let explicit = RequestOverride {
            host: Some("a".into()),
            ..Default::default()
        };

        let settings = resolve(&explicit, Some(file.path()), &*env).unwrap();
        assert_eq!(settings.host, "a");
        assert_eq!(settings.key, "envkey");
    }

    #[test]
    fn test_env_beats_file() {
        let file = config_file("[DEFAULT]\nhost = c\nkey = filekey\n");
        let env = env_from(&[(ENV_HOST, "b")]);

        let settings = resolve(&RequestOverride::default(), Some(file.path()), &*env).unwrap();
        assert_eq!(settings.host, "b");
        assert_eq!(settings.key, "filekey");
    }

    #[test]
    fn test_file_supplies_everything() {
        let file = config_file("[DEFAULT]\nhost = c\nkey = k\nport = 8080\nsecure = false\n");
        let env = env_from(&[]);

        let settings = resolve(&RequestOverride::default(), Some(file.path()), &*env).unwrap();
        assert_eq!(
            settings,
            ConnectionSettings {
                host: "c".into(),
                port: Some(8080),
                key: "k".into(),
                secure: false,
            }
        );
    }

    #[test]
    fn test_missing_host_fails() {
        let env = env_from(&[(ENV_KEY, "k")]);
        let missing = Path::new("/nonexistent/zadarapy-config");

        let err = resolve(&RequestOverride::default(), Some(missing), &*env).unwrap_err();
        assert!(matches!(err, ClientError::Config(ref m) if m.contains("hostname")));
    }

    #[test]
    fn test_missing_key_fails() {
        let env = env_from(&[(ENV_HOST, "h")]);
        let missing = Path::new("/nonexistent/zadarapy-config");

        let err = resolve(&RequestOverride::default(), Some(missing), &*env).unwrap_err();
        assert!(matches!(err, ClientError::Config(ref m) if m.contains("API key")));
    }

    #[test]
    fn test_bad_env_port() {
        let env = env_from(&[(ENV_HOST, "h"), (ENV_KEY, "k"), (ENV_PORT, "https")]);
        let missing = Path::new("/nonexistent/zadarapy-config");

        assert!(resolve(&RequestOverride::default(), Some(missing), &*env).is_err());
    }

    #[test]
    fn test_parse_secure() {
        for value in ["false", "No", "OFF", "n"] {
            assert!(!parse_secure(value), "{value}");
        }
        for value in ["true", "yes", "1", ""] {
            assert!(parse_secure(value), "{value}");
        }
    }
}
