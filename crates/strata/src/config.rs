use crate::Result;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Process-level settings, usually read from a `strata.toml` file.
///
/// ```toml
/// system_dsn = "sqlite:///var/lib/strata/system.db"
/// seed_dir = "seeds"
/// event_queue_capacity = 1024
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrataConfig {
    /// DSN of the bootstrap database holding the `Schema` and `Database`
    /// tables.
    pub system_dsn: String,

    /// Directory of `*.json` schema documents registered at startup.
    pub seed_dir: Option<PathBuf>,

    /// Capacity of the reconciliation event queue. Senders wait when the
    /// queue is full.
    pub event_queue_capacity: usize,
}

impl StrataConfig {
    pub fn from_toml(src: &str) -> Result<StrataConfig> {
        let config: StrataConfig = toml::from_str(src).map_err(anyhow::Error::from)?;

        if config.event_queue_capacity == 0 {
            strata_core::bail!("event_queue_capacity must be greater than zero");
        }

        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<StrataConfig> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path).map_err(|err| {
            crate::Error::from(err).context(strata_core::err!(
                "reading configuration file `{}`",
                path.display()
            ))
        })?;
        Self::from_toml(&src)
    }
}

impl Default for StrataConfig {
    fn default() -> Self {
        Self {
            system_dsn: "sqlite::memory:".to_string(),
            seed_dir: None,
            event_queue_capacity: 256,
        }
    }
}
