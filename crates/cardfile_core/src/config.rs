//! Environment-sectioned database configuration.
//!
//! # Responsibility
//! - Parse the YAML config file that maps environment names to connection
//!   settings.
//! - Resolve the active environment name from the process environment.
//!
//! # Invariants
//! - YAML merge keys (`<<`) are resolved before any section is read, so a
//!   shared `default` anchor behaves as inheritance.
//! - Sections other than the requested one are never validated; an unused
//!   environment with a broken config does not block startup.
//! - Relative database paths are taken as given and resolve against the
//!   working directory.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::Value;

/// Environment variable naming the active configuration environment.
pub const ENVIRONMENT_ENV_VAR: &str = "CARDFILE_ENV";

/// Environment variable pointing at an alternate config file.
pub const CONFIG_PATH_ENV_VAR: &str = "CARDFILE_CONFIG";

/// Config file consulted when neither flag nor env var names one.
pub const DEFAULT_CONFIG_PATH: &str = "config/database.yml";

/// Environment selected when `CARDFILE_ENV` is unset or blank.
pub const DEFAULT_ENVIRONMENT: &str = "development";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    UnknownEnvironment {
        name: String,
        path: PathBuf,
    },
    InvalidEnvironment {
        name: String,
        source: serde_yaml::Error,
    },
    UnsupportedAdapter {
        environment: String,
        adapter: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "cannot parse config `{}`: {source}", path.display())
            }
            Self::UnknownEnvironment { name, path } => write!(
                f,
                "config `{}` has no environment named `{name}`",
                path.display()
            ),
            Self::InvalidEnvironment { name, source } => write!(
                f,
                "environment `{name}` is not a valid connection config: {source}"
            ),
            Self::UnsupportedAdapter {
                environment,
                adapter,
            } => write!(
                f,
                "environment `{environment}` uses adapter `{adapter}`; only sqlite is supported"
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } | Self::InvalidEnvironment { source, .. } => Some(source),
            Self::UnknownEnvironment { .. } | Self::UnsupportedAdapter { .. } => None,
        }
    }
}

/// Connection settings of one environment section.
///
/// Extra keys such as `pool` or `timeout` are tolerated and ignored; they
/// configure pooling layers this store does not have.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectionConfig {
    /// Storage adapter name; `sqlite3` and `sqlite` are accepted.
    pub adapter: String,
    /// Database file path for this environment.
    pub database: PathBuf,
}

/// All environment sections of one config file, parsed but not yet
/// validated.
#[derive(Debug)]
pub struct Environments {
    path: PathBuf,
    sections: BTreeMap<String, Value>,
}

impl Environments {
    /// Loads and merge-resolves a config file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut value: Value =
            serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        value.apply_merge().map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let sections: BTreeMap<String, Value> =
            serde_yaml::from_value(value).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            sections,
        })
    }

    /// Resolves one environment's connection settings.
    ///
    /// # Errors
    /// - `UnknownEnvironment` when no section carries that name.
    /// - `InvalidEnvironment` when the section exists but lacks required
    ///   keys.
    /// - `UnsupportedAdapter` for anything that is not sqlite.
    pub fn connection(&self, environment: &str) -> ConfigResult<ConnectionConfig> {
        let section = self
            .sections
            .get(environment)
            .ok_or_else(|| ConfigError::UnknownEnvironment {
                name: environment.to_owned(),
                path: self.path.clone(),
            })?;

        let config: ConnectionConfig =
            serde_yaml::from_value(section.clone()).map_err(|source| {
                ConfigError::InvalidEnvironment {
                    name: environment.to_owned(),
                    source,
                }
            })?;

        if !matches!(config.adapter.as_str(), "sqlite3" | "sqlite") {
            return Err(ConfigError::UnsupportedAdapter {
                environment: environment.to_owned(),
                adapter: config.adapter,
            });
        }

        Ok(config)
    }
}

/// Reads the active environment name from `CARDFILE_ENV`.
///
/// Unset or blank falls back to [`DEFAULT_ENVIRONMENT`].
pub fn environment_from_env() -> String {
    match std::env::var(ENVIRONMENT_ENV_VAR) {
        Ok(raw) => {
            let name = raw.trim();
            if name.is_empty() {
                DEFAULT_ENVIRONMENT.to_owned()
            } else {
                name.to_owned()
            }
        }
        Err(_) => DEFAULT_ENVIRONMENT.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SAMPLE: &str = "\
default: &default
  adapter: sqlite3
  pool: 5
  timeout: 5000

development:
  <<: *default
  database: db/development.sqlite3

test:
  <<: *default
  database: db/test.sqlite3

production:
  <<: *default
  adapter: postgresql
  database: cardfile_production
";

    fn write_sample(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("database.yml");
        fs::write(&path, SAMPLE).unwrap();
        path
    }

    #[test]
    fn resolves_sections_through_the_merge_key() {
        let dir = tempfile::tempdir().unwrap();
        let environments = Environments::load(write_sample(&dir)).unwrap();

        let development = environments.connection("development").unwrap();
        assert_eq!(development.adapter, "sqlite3");
        assert_eq!(
            development.database,
            std::path::Path::new("db/development.sqlite3")
        );

        let test = environments.connection("test").unwrap();
        assert_eq!(test.database, std::path::Path::new("db/test.sqlite3"));
    }

    #[test]
    fn unknown_environment_is_reported_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let environments = Environments::load(write_sample(&dir)).unwrap();

        let err = environments.connection("staging").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnknownEnvironment { name, .. } if name == "staging"
        ));
    }

    #[test]
    fn non_sqlite_adapter_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let environments = Environments::load(write_sample(&dir)).unwrap();

        let err = environments.connection("production").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnsupportedAdapter { adapter, .. } if adapter == "postgresql"
        ));
    }

    #[test]
    fn section_missing_database_key_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.yml");
        fs::write(&path, "development:\n  adapter: sqlite3\n").unwrap();

        let environments = Environments::load(&path).unwrap();
        let err = environments.connection("development").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnvironment { name, .. } if name == "development"
        ));
    }

    #[test]
    fn broken_sections_do_not_block_other_environments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.yml");
        fs::write(
            &path,
            "development:\n  adapter: sqlite3\n  database: db/dev.sqlite3\nbroken:\n  adapter: sqlite3\n",
        )
        .unwrap();

        let environments = Environments::load(&path).unwrap();
        assert!(environments.connection("development").is_ok());
        assert!(environments.connection("broken").is_err());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Environments::load(dir.path().join("absent.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn environment_name_comes_from_env_var_or_default() {
        std::env::remove_var(ENVIRONMENT_ENV_VAR);
        assert_eq!(environment_from_env(), DEFAULT_ENVIRONMENT);

        std::env::set_var(ENVIRONMENT_ENV_VAR, "production");
        assert_eq!(environment_from_env(), "production");

        std::env::set_var(ENVIRONMENT_ENV_VAR, "   ");
        assert_eq!(environment_from_env(), DEFAULT_ENVIRONMENT);

        std::env::remove_var(ENVIRONMENT_ENV_VAR);
    }
}
