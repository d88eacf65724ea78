use super::Config;
use crate::error::{ConfigError, Result};
use directories::UserDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// `~/.chatbridge/config.toml`
pub(super) fn default_config_path() -> Result<PathBuf> {
    let home = UserDirs::new()
        .map(|u| u.home_dir().to_path_buf())
        .ok_or_else(|| ConfigError::Load("could not find home directory".into()))?;
    Ok(home.join(".chatbridge").join("config.toml"))
}

impl Config {
    /// Load config from `explicit` (tilde-expanded) or the default location,
    /// then apply environment overrides and validate.
    ///
    /// A missing default file is not an error; a missing explicit file is.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        let mut config = match explicit {
            Some(raw) => {
                let path = PathBuf::from(shellexpand::tilde(raw).as_ref());
                if !path.exists() {
                    return Err(ConfigError::Load(format!(
                        "config file not found: {}",
                        path.display()
                    ))
                    .into());
                }
                Self::read_file(&path)?
            }
            None => {
                let path = default_config_path()?;
                if path.exists() {
                    Self::read_file(&path)?
                } else {
                    Self {
                        config_path: path,
                        ..Self::default()
                    }
                }
            }
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn read_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
        let mut config: Config = toml::from_str(&contents).map_err(|error| {
            ConfigError::Load(format!("failed to parse {}: {error}", path.display()))
        })?;
        config.config_path = path.to_path_buf();
        Ok(config)
    }
}
