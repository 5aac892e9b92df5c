use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::rules::Ruleset;
use crate::domain::steps::StepCatalog;
use crate::errors::{IntakeError, Result};
use crate::utils::paths::{self, ensure_dir, write_atomic};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeConfig {
    /// Where submissions and drafts are stored. Defaults to the app directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// JSON list of steps replacing the built-in layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::from_base(paths::app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: paths::config_file_in(&base),
            base,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the config file, falling back to defaults when it is absent.
    pub fn load(&self) -> Result<IntakeConfig> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(IntakeConfig::default());
        }
        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data)
            .map_err(|err| IntakeError::Config(format!("{}: {}", self.path.display(), err)))
    }

    pub fn save(&self, config: &IntakeConfig) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        info!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    /// Storage root for `config`; relative paths resolve against the app dir.
    pub fn data_dir(&self, config: &IntakeConfig) -> PathBuf {
        match &config.data_dir {
            Some(dir) if dir.is_relative() => self.base.join(dir),
            Some(dir) => dir.clone(),
            None => self.base.clone(),
        }
    }

    /// The configured step layout, checked against `rules`.
    pub fn load_catalog(&self, config: &IntakeConfig, rules: &Ruleset) -> Result<StepCatalog> {
        let catalog = match &config.steps_file {
            Some(file) => {
                let path = if file.is_relative() {
                    self.base.join(file)
                } else {
                    file.clone()
                };
                info!(path = %path.display(), "loading step layout");
                StepCatalog::load(&path)?
            }
            None => StepCatalog::standard(),
        };
        rules.check_catalog(&catalog)?;
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::steps::{Step, Subpage};
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().expect("temp dir");
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).expect("manager");
        assert_eq!(manager.load().expect("load"), IntakeConfig::default());
        assert_eq!(manager.data_dir(&IntakeConfig::default()), temp.path());
    }

    #[test]
    fn save_then_load() {
        let temp = TempDir::new().expect("temp dir");
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).expect("manager");
        let config = IntakeConfig {
            data_dir: Some(PathBuf::from("records")),
            steps_file: None,
            log_filter: Some("referral_intake=debug".into()),
        };
        manager.save(&config).expect("save");
        assert_eq!(manager.load().expect("load"), config);
        assert_eq!(manager.data_dir(&config), temp.path().join("records"));
    }

    #[test]
    fn custom_steps_file_is_validated() {
        let temp = TempDir::new().expect("temp dir");
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).expect("manager");
        let steps = vec![Step::new(
            "only",
            "Only",
            vec![Subpage::new("a", "A", &["legal_name", "shoe_size"])],
        )];
        fs::write(
            temp.path().join("steps.json"),
            serde_json::to_string(&steps).expect("serialize"),
        )
        .expect("write steps");
        let config = IntakeConfig {
            steps_file: Some(PathBuf::from("steps.json")),
            ..Default::default()
        };
        assert!(matches!(
            manager.load_catalog(&config, &Ruleset::standard()),
            Err(IntakeError::Config(_))
        ));
    }

    #[test]
    fn malformed_config_is_a_config_error() {
        let temp = TempDir::new().expect("temp dir");
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).expect("manager");
        fs::write(manager.path(), "{ not json").expect("write");
        assert!(matches!(manager.load(), Err(IntakeError::Config(_))));
    }
}
