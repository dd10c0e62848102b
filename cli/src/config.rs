// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, fs, path::PathBuf, str::FromStr};

use calvalue_ical::Config;

use crate::APP_NAME;

const CALVALUE_CONFIG_ENV: &str = "CALVALUE_CONFIG";

/// Load the configuration.
///
/// The path given on the command line wins over `$CALVALUE_CONFIG`, which
/// wins over `<config dir>/calvalue/config.toml`. Without any of them the
/// defaults are used.
#[tracing::instrument]
pub fn parse_config(path: Option<PathBuf>) -> Result<Config, Box<dyn Error>> {
    let path = match path {
        Some(path) => path,
        None => match std::env::var(CALVALUE_CONFIG_ENV) {
            Ok(env_path) => PathBuf::from(env_path),
            Err(_) => match default_config_path() {
                Some(path) => path,
                None => {
                    tracing::debug!("no config file found, using defaults");
                    return Ok(Config::default());
                }
            },
        },
    };

    let mut config = fs::read_to_string(&path)
        .map_err(|e| format!("Failed to read config file at {}: {}", path.display(), e))?
        .parse::<ConfigRaw>()?
        .ical;
    config.normalize()?;
    tracing::debug!(path = %path.display(), "config loaded");
    Ok(config)
}

#[derive(Debug, Default, serde::Deserialize)]
struct ConfigRaw {
    #[serde(default)]
    ical: Config,
}

impl FromStr for ConfigRaw {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

fn default_config_path() -> Option<PathBuf> {
    let path = dirs::config_dir()?.join(APP_NAME).join("config.toml");
    path.exists().then_some(path)
}
