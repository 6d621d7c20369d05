use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use anyhow::anyhow;
use tracing::info;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub db_file: PathBuf,
    pub public_dir: PathBuf,
    pub body_limit: usize,
}

impl Config {
    /// Reads the process environment. Call `dotenv::dotenv()` first to pick up a `.env` file.
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        Ok(Self {
            port: try_load(&lookup, "PORT", "3000")?,
            db_file: try_load(&lookup, "DB_FILE", "data/db.json")?,
            public_dir: try_load(&lookup, "PUBLIC_DIR", "public")?,
            body_limit: try_load(&lookup, "BODY_LIMIT", "2097152")?,
        })
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> anyhow::Result<T>
where
    T::Err: Display,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse()
        .map_err(|e| anyhow!("invalid {key} value {raw:?}: {e}"))
}
