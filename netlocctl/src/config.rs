use anyhow::{Context, Result, anyhow};
use libnetloc::NETWORK_LOCATION;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs::read_to_string;
use tracing::debug;

#[derive(Debug, Deserialize, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct DatabaseConfig {
    pub(crate) default: PathBuf,
    #[serde(default)]
    pub(crate) networklocation: Option<PathBuf>,
}

impl DatabaseConfig {
    /// The network location database defaults to a file next to the default
    /// database
    pub(crate) fn network_location_path(&self) -> PathBuf {
        self.networklocation.clone().unwrap_or_else(|| {
            self.default
                .with_file_name(format!("{NETWORK_LOCATION}.sqlite3"))
        })
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    pub(crate) databases: DatabaseConfig,
}

impl Config {
    fn parse(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents).with_context(|| "Couldn't parse yaml configuration")
    }

    pub(crate) async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let p = path.as_ref();
        debug!(?p, "Trying to load config");
        let contents = read_to_string(p)
            .await
            .with_context(|| format!("Failed to read config file '{}'", p.display()))?;
        Self::parse(&contents)
    }
}

/// The database files that a command operates on
#[derive(Debug, PartialEq)]
pub(crate) struct DatabasePaths {
    pub(crate) default: PathBuf,
    pub(crate) network_location: PathBuf,
}

pub(crate) fn config_file() -> Result<PathBuf> {
    let project_dirs = directories::ProjectDirs::from("org", "learningequality", "netloc")
        .ok_or_else(|| anyhow!("Cannot find default project config directory"))?;
    Ok(project_dirs.config_dir().join("config.yaml"))
}

/// Combine the database paths given on the command line with those in the
/// configuration file. Command line paths take priority, and the file is only
/// read when a path is missing.
pub(crate) async fn resolve_databases(
    config: Option<PathBuf>,
    default: Option<PathBuf>,
    network_location: Option<PathBuf>,
) -> Result<DatabasePaths> {
    if let (Some(default), Some(network_location)) = (&default, &network_location) {
        return Ok(DatabasePaths {
            default: default.clone(),
            network_location: network_location.clone(),
        });
    }
    let config_path = match config {
        Some(path) => path,
        None => config_file()?,
    };
    let mut databases = Config::load_from_file(&config_path).await?.databases;
    if let Some(default) = default {
        databases.default = default;
    }
    if let Some(network_location) = network_location {
        databases.networklocation = Some(network_location);
    }
    Ok(DatabasePaths {
        network_location: databases.network_location_path(),
        default: databases.default,
    })
}
