//! # Configuration
//!
//! Resolves [`Options`] into the API root, token and timeout a client runs with.
//!
//! Credentials follow the conventions of `arc`, Phabricator's command-line client: when no
//! token is given it is read from `~/.arcrc`, whose `hosts` map associates API roots with
//! tokens.
//!
//! ```json
//! {
//!   "hosts": {
//!     "https://phabricator.example.com/api/": { "token": "api-..." }
//!   },
//!   "config": { "default": "https://phabricator.example.com/" }
//! }
//! ```
use crate::diagnostics;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{Dispatch, error, info};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use url::Url;

/// Timeout applied to each request when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const ARCRC_FILE: &str = ".arcrc";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid timeout: a request timeout must be greater than zero")]
    InvalidTimeout,
    #[error("A token was given without an API root")]
    TokenWithoutApi,
    #[error(
        "Cannot determine a Phabricator host to connect to: {0} hosts are defined in .arcrc, exactly one must be defined or marked as default"
    )]
    AmbiguousHost(usize),
    #[error("No token found in .arcrc for '{0}'")]
    MissingToken(String),
    #[error("Unable to determine the home directory of the current user")]
    NoHomeDir,
    #[error("Unable to read '{}': '{source}'", path.display())]
    ArcrcRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unable to parse '{}': '{source}'", path.display())]
    ArcrcParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid API URL '{url}': '{source}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Unknown log level '{0}'")]
    InvalidLogLevel(String),
    #[error("Failed to build the HTTP client: '{0}'")]
    HttpClient(#[source] reqwest::Error),
}

/// Client options. Every field is optional.
#[derive(Default)]
pub struct Options {
    /// Root of the Conduit API (e.g., `https://phabricator.example.com/api/`). When absent
    /// it is read from `.arcrc`, which must then define a single host or a default one.
    pub api: Option<String>,
    /// API token. When absent it is looked up in `.arcrc` under `api`.
    pub token: Option<String>,
    /// `error`, `warn`, `info`, `debug` or `trace`. Defaults to `info` when `log_output`
    /// is set.
    pub log_level: Option<String>,
    /// Where diagnostics are written. Defaults to stdout when `log_level` is set.
    pub log_output: Option<BoxMakeWriter>,
    /// Timeout of each request. Defaults to [`DEFAULT_TIMEOUT`].
    pub timeout: Option<Duration>,
    /// Alternate `.arcrc` to read. Defaults to `~/.arcrc`.
    pub arcrc: Option<PathBuf>,
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("api", &self.api)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("log_level", &self.log_level)
            .field("log_output", &self.log_output.is_some())
            .field("timeout", &self.timeout)
            .field("arcrc", &self.arcrc)
            .finish()
    }
}

/// The outcome of resolving [`Options`].
#[derive(Debug)]
pub struct Settings {
    pub api: Url,
    pub token: String,
    pub timeout: Duration,
    pub dispatch: Dispatch,
}

impl Options {
    /// Validates the options and resolves credentials.
    pub fn resolve(self) -> Result<Settings, ConfigError> {
        let timeout = match self.timeout {
            None => DEFAULT_TIMEOUT,
            Some(timeout) if timeout.is_zero() => return Err(ConfigError::InvalidTimeout),
            Some(timeout) => timeout,
        };

        if self.token.is_some() && self.api.is_none() {
            return Err(ConfigError::TokenWithoutApi);
        }

        let dispatch = match (self.log_level, self.log_output) {
            (None, None) => diagnostics::current(),
            (level, output) => {
                let level = level
                    .as_deref()
                    .map(diagnostics::parse_level)
                    .transpose()?
                    .unwrap_or(diagnostics::DEFAULT_LEVEL);
                diagnostics::sink(level, output)
            }
        };

        let credentials = || -> Result<(String, String), ConfigError> {
            match (self.api, self.token) {
                (Some(api), Some(token)) => Ok((api, token)),
                (api, _) => {
                    let path = match self.arcrc {
                        Some(path) => path,
                        None => Arcrc::default_path()?,
                    };
                    let arcrc = Arcrc::load(&path)?;

                    match api {
                        Some(api) => {
                            let token = arcrc.token_for(&api)?.to_string();
                            Ok((api, token))
                        }
                        None => {
                            let (api, token) = arcrc.default_host()?;
                            Ok((api.to_string(), token.to_string()))
                        }
                    }
                }
            }
        };

        tracing::dispatcher::with_default(&dispatch, || {
            let (api, token) = credentials().inspect_err(|err| error!(error = %err))?;
            let api = parse_api_root(&api).inspect_err(|err| error!(error = %err))?;

            info!(url = %api, "Initializing a Conduit client");

            Ok(Settings {
                api,
                token,
                timeout,
                dispatch: dispatch.clone(),
            })
        })
    }
}

/// Parses the API root, making sure it ends with `/` so procedure names resolve beneath it.
pub fn parse_api_root(api: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(api).map_err(|source| ConfigError::InvalidUrl {
        url: api.to_string(),
        source,
    })?;

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

/// The subset of `.arcrc` the client reads.
#[derive(Debug, Default, Deserialize)]
pub struct Arcrc {
    #[serde(default)]
    pub hosts: BTreeMap<String, ArcrcHost>,
    #[serde(default)]
    pub config: ArcrcConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct ArcrcHost {
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ArcrcConfig {
    pub default: Option<String>,
}

impl Arcrc {
    /// `~/.arcrc`.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::home_dir()
            .map(|home| home.join(ARCRC_FILE))
            .ok_or(ConfigError::NoHomeDir)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ArcrcRead {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::ArcrcParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The only host, or the host named by `config.default` when several are defined.
    pub fn default_host(&self) -> Result<(&str, &str), ConfigError> {
        let mut hosts = self.hosts.iter();
        if let (Some((api, host)), None) = (hosts.next(), hosts.next()) {
            return Ok((api.as_str(), host.token.as_str()));
        }

        self.config
            .default
            .as_deref()
            .and_then(|default| self.lookup(default))
            .ok_or(ConfigError::AmbiguousHost(self.hosts.len()))
    }

    /// The token stored for `api`.
    pub fn token_for(&self, api: &str) -> Result<&str, ConfigError> {
        self.lookup(api)
            .map(|(_, token)| token)
            .ok_or_else(|| ConfigError::MissingToken(api.to_string()))
    }

    /// Finds a host by exact key, tolerating a missing or extra trailing slash and a missing
    /// `api/` suffix (`config.default` usually names the site root).
    fn lookup(&self, api: &str) -> Option<(&str, &str)> {
        let trimmed = api.trim_end_matches('/');
        let candidates = [
            api.to_string(),
            trimmed.to_string(),
            format!("{trimmed}/"),
            format!("{trimmed}/api/"),
        ];

        candidates.iter().find_map(|candidate| {
            self.hosts
                .get_key_value(candidate)
                .map(|(api, host)| (api.as_str(), host.token.as_str()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn arcrc(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const SINGLE_HOST: &str = r#"{
        "hosts": { "https://phab.example.com/api/": { "token": "api-single" } }
    }"#;

    const TWO_HOSTS: &str = r#"{
        "hosts": {
            "https://a.example.com/api/": { "token": "api-a" },
            "https://b.example.com/api/": { "token": "api-b" }
        },
        "config": { "default": "https://b.example.com/" }
    }"#;

    #[test]
    fn test_zero_timeout_is_rejected() {
        let err = Options {
            api: Some("https://phab.example.com/api/".into()),
            token: Some("api-x".into()),
            timeout: Some(Duration::ZERO),
            ..Default::default()
        }
        .resolve()
        .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidTimeout));
    }

    #[test]
    fn test_unknown_log_level_is_rejected() {
        let err = Options {
            api: Some("https://phab.example.com/api/".into()),
            token: Some("api-x".into()),
            log_level: Some("apocalypse".into()),
            ..Default::default()
        }
        .resolve()
        .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidLogLevel(_)));
    }

    #[test]
    fn test_token_without_api_is_rejected() {
        let err = Options {
            token: Some("api-x".into()),
            ..Default::default()
        }
        .resolve()
        .unwrap_err();

        assert!(matches!(err, ConfigError::TokenWithoutApi));
    }

    #[test]
    fn test_explicit_credentials_skip_arcrc() {
        let settings = Options {
            api: Some("https://phab.example.com/api".into()),
            token: Some("api-x".into()),
            arcrc: Some(PathBuf::from("/nonexistent/.arcrc")),
            ..Default::default()
        }
        .resolve()
        .unwrap();

        assert_eq!(settings.api.as_str(), "https://phab.example.com/api/");
        assert_eq!(settings.token, "api-x");
        assert_eq!(settings.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_single_host_is_read_from_arcrc() {
        let file = arcrc(SINGLE_HOST);

        let settings = Options {
            arcrc: Some(file.path().to_path_buf()),
            ..Default::default()
        }
        .resolve()
        .unwrap();

        assert_eq!(settings.api.as_str(), "https://phab.example.com/api/");
        assert_eq!(settings.token, "api-single");
    }

    #[test]
    fn test_token_is_looked_up_by_api() {
        let file = arcrc(TWO_HOSTS);

        let settings = Options {
            api: Some("https://a.example.com/api".into()),
            arcrc: Some(file.path().to_path_buf()),
            ..Default::default()
        }
        .resolve()
        .unwrap();

        assert_eq!(settings.token, "api-a");
    }

    #[test]
    fn test_default_host_breaks_ties() {
        let file = arcrc(TWO_HOSTS);
        let arcrc = Arcrc::load(file.path()).unwrap();

        assert_eq!(
            arcrc.default_host().unwrap(),
            ("https://b.example.com/api/", "api-b")
        );
    }

    #[test]
    fn test_several_hosts_without_default_are_ambiguous() {
        let file = arcrc(
            r#"{ "hosts": { "https://a.example.com/api/": { "token": "a" }, "https://b.example.com/api/": { "token": "b" } } }"#,
        );

        let err = Options {
            arcrc: Some(file.path().to_path_buf()),
            ..Default::default()
        }
        .resolve()
        .unwrap_err();

        assert!(matches!(err, ConfigError::AmbiguousHost(2)));
    }

    #[test]
    fn test_missing_token() {
        let file = arcrc(SINGLE_HOST);

        let err = Options {
            api: Some("https://other.example.com/api/".into()),
            arcrc: Some(file.path().to_path_buf()),
            ..Default::default()
        }
        .resolve()
        .unwrap_err();

        assert!(matches!(err, ConfigError::MissingToken(api) if api == "https://other.example.com/api/"));
    }

    #[test]
    fn test_unparseable_arcrc() {
        let file = arcrc("not json");

        let err = Options {
            arcrc: Some(file.path().to_path_buf()),
            ..Default::default()
        }
        .resolve()
        .unwrap_err();

        assert!(matches!(err, ConfigError::ArcrcParse { .. }));
    }

    #[test]
    fn test_invalid_api_url() {
        let err = Options {
            api: Some("localhost".into()),
            token: Some("api-x".into()),
            ..Default::default()
        }
        .resolve()
        .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn test_debug_redacts_token() {
        let options = Options {
            token: Some("api-secret".into()),
            ..Default::default()
        };

        assert!(!format!("{options:?}").contains("api-secret"));
    }
}
