use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

pub const DEFAULT_CHUNK_SIZE: usize = 64;

/// Driver settings: `plenar.toml` if present, then `PLENAR_*` variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub deputies: Option<PathBuf>,
    pub electoral_period: Option<u32>,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            deputies: None,
            electoral_period: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_config(
            Config::builder()
                .add_source(File::with_name("plenar").required(false))
                .add_source(Environment::with_prefix("PLENAR").try_parsing(true)),
        )
    }

    fn from_config(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let settings: Settings = builder
            .build()
            .context("loading settings")?
            .try_deserialize()
            .context("invalid settings")?;
        Ok(Settings {
            chunk_size: settings.chunk_size.max(1),
            ..settings
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn defaults_when_empty() {
        let s = Settings::from_config(Config::builder()).unwrap();
        assert_eq!(s.deputies, None);
        assert_eq!(s.electoral_period, None);
        assert_eq!(s.chunk_size, DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn reads_toml() {
        let toml = "deputies = \"data/deputies.json\"\nelectoral_period = 18\nchunk_size = 0\n";
        let s = Settings::from_config(
            Config::builder().add_source(File::from_str(toml, FileFormat::Toml)),
        )
        .unwrap();
        assert_eq!(s.deputies, Some(PathBuf::from("data/deputies.json")));
        assert_eq!(s.electoral_period, Some(18));
        assert_eq!(s.chunk_size, 1);
    }
}
