//! Configuration loaded with figment
//!
//! Precedence, lowest to highest: built-in defaults, then `boardkeep.toml`,
//! `boardkeep.yaml` and `boardkeep.json` in the working directory, then
//! `BOARDKEEP_*` environment variables (`BOARDKEEP_STRICT_POSITIONS=true`).

use crate::engine::MoveOptions;
use crate::error::{BoardkeepError, Result};
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

const CONFIG_STEM: &str = "boardkeep";
const ENV_PREFIX: &str = "BOARDKEEP_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardkeepConfig {
    /// Data directory of the file store
    pub root: PathBuf,
    pub strict_positions: bool,
    pub rewrite_unchanged: bool,
    pub max_move_attempts: u32,
    pub lock_timeout_ms: u64,
}

impl Default for BoardkeepConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(".boardkeep"),
            strict_positions: false,
            rewrite_unchanged: false,
            max_move_attempts: 5,
            lock_timeout_ms: 2000,
        }
    }
}

impl BoardkeepConfig {
    /// Load from the current working directory and the environment
    pub fn load() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::load_from(&cwd)
    }

    /// Load with config files looked up in `dir`
    pub fn load_from(dir: &Path) -> Result<Self> {
        let config: Self = Self::figment(dir)
            .extract()
            .map_err(|e| BoardkeepError::Config(e.to_string()))?;
        config.validate()?;
        debug!(?config, "loaded configuration");
        Ok(config)
    }

    fn figment(dir: &Path) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let toml = dir.join(format!("{}.toml", CONFIG_STEM));
        if toml.is_file() {
            figment = figment.merge(Toml::file(toml));
        }
        let yaml = dir.join(format!("{}.yaml", CONFIG_STEM));
        if yaml.is_file() {
            figment = figment.merge(Yaml::file(yaml));
        }
        let json = dir.join(format!("{}.json", CONFIG_STEM));
        if json.is_file() {
            figment = figment.merge(Json::file(json));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).map(|key| key.as_str().to_lowercase().into()))
    }

    fn validate(&self) -> Result<()> {
        if self.max_move_attempts == 0 {
            return Err(BoardkeepError::Config(
                "max_move_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    pub fn move_options(&self) -> MoveOptions {
        MoveOptions {
            strict_positions: self.strict_positions,
            rewrite_unchanged: self.rewrite_unchanged,
            max_move_attempts: self.max_move_attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn clear_env() {
        for key in [
            "BOARDKEEP_ROOT",
            "BOARDKEEP_STRICT_POSITIONS",
            "BOARDKEEP_REWRITE_UNCHANGED",
            "BOARDKEEP_MAX_MOVE_ATTEMPTS",
            "BOARDKEEP_LOCK_TIMEOUT_MS",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let temp = TempDir::new().unwrap();
        let config = BoardkeepConfig::load_from(temp.path()).unwrap();
        assert_eq!(config, BoardkeepConfig::default());
        assert_eq!(config.move_options(), MoveOptions::default());
        assert_eq!(config.lock_timeout(), Duration::from_secs(2));
    }

    #[test]
    #[serial]
    fn test_toml_file_overrides_defaults() {
        clear_env();
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("boardkeep.toml"),
            "strict_positions = true\nroot = \"data\"\n",
        )
        .unwrap();

        let config = BoardkeepConfig::load_from(temp.path()).unwrap();
        assert!(config.strict_positions);
        assert_eq!(config.root, PathBuf::from("data"));
        assert_eq!(config.max_move_attempts, 5);
    }

    #[test]
    #[serial]
    fn test_json_wins_over_yaml() {
        clear_env();
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("boardkeep.yaml"), "lock_timeout_ms: 10\n").unwrap();
        std::fs::write(temp.path().join("boardkeep.json"), r#"{"lock_timeout_ms": 20}"#).unwrap();

        let config = BoardkeepConfig::load_from(temp.path()).unwrap();
        assert_eq!(config.lock_timeout_ms, 20);
    }

    #[test]
    #[serial]
    fn test_env_overrides_files() {
        clear_env();
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("boardkeep.toml"), "max_move_attempts = 2\n").unwrap();
        std::env::set_var("BOARDKEEP_MAX_MOVE_ATTEMPTS", "9");
        std::env::set_var("BOARDKEEP_REWRITE_UNCHANGED", "true");

        let config = BoardkeepConfig::load_from(temp.path());
        clear_env();

        let config = config.unwrap();
        assert_eq!(config.max_move_attempts, 9);
        assert!(config.rewrite_unchanged);
    }

    #[test]
    #[serial]
    fn test_zero_attempts_rejected() {
        clear_env();
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("boardkeep.toml"), "max_move_attempts = 0\n").unwrap();

        let result = BoardkeepConfig::load_from(temp.path());
        assert!(matches!(result, Err(BoardkeepError::Config(_))));
    }
}
