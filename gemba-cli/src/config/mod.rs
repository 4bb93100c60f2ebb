//! Configuration loading
//!
//! Settings come from a TOML file (default `<config_dir>/gemba-cli/config.toml`)
//! and can be overridden per key with environment variables, which may in
//! turn come from a `.env` file.

pub mod repository;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::migration::ColumnLayout;
use crate::migration::driver::DEFAULT_LEGACY_FACILITY_ID;

const APP_DIR: &str = "gemba-cli";

/// Environment variables that override file settings
pub mod env_keys {
    pub const CSV_DIR: &str = "GEMBA_CSV_DIR";
    pub const MASTER_DB: &str = "GEMBA_MASTER_DB";
    pub const STATE_DB: &str = "GEMBA_STATE_DB";
}

/// A column surveyed by `analyze columns`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetColumn {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl TargetColumn {
    fn new(name: &str, description: &str) -> Self {
        TargetColumn {
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzeConfig {
    pub target_columns: Vec<TargetColumn>,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        AnalyzeConfig {
            target_columns: vec![
                TargetColumn::new("大分類", "Category_Major / Type"),
                TargetColumn::new("中分類", "Category_Middle"),
                TargetColumn::new("小分類", "Category_Minor"),
                TargetColumn::new("診断形式", "diagnosis format"),
                TargetColumn::new("設備形式", "Model"),
                TargetColumn::new("保全区分", "Maintenance_Type"),
                TargetColumn::new("状態", "Status"),
                TargetColumn::new("単位", "Unit"),
                TargetColumn::new("デフレータ区分", "deflator class"),
                TargetColumn::new("集約方法", "aggregation method"),
                TargetColumn::new("機器種別", "device type (second section)"),
                TargetColumn::new("登録区分", "registration class (second section)"),
            ],
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Folder holding the CSV exports
    pub csv_dir: PathBuf,
    /// Master workbook with the `M_Facilities` sheet
    pub master_db: PathBuf,
    /// SQLite file holding checkpoints
    pub state_db: PathBuf,
    /// Facility routed to the legacy path
    pub legacy_facility_id: String,
    pub layout: ColumnLayout,
    pub analyze: AnalyzeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            csv_dir: PathBuf::from("raw_data"),
            master_db: PathBuf::from("Master_DB.xlsx"),
            state_db: default_state_db(),
            legacy_facility_id: DEFAULT_LEGACY_FACILITY_ID.to_string(),
            layout: ColumnLayout::default(),
            analyze: AnalyzeConfig::default(),
        }
    }
}

fn default_state_db() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR).join("state.db"))
        .unwrap_or_else(|| PathBuf::from("gemba-state.db"))
}

impl Config {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default location is
    /// used when present, otherwise built-in defaults. Environment overrides
    /// are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => {
                    log::debug!("No config file found, using defaults");
                    Config::default()
                }
            },
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Override paths from environment variables; empty values are ignored
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty()).map(PathBuf::from);

        if let Some(dir) = get(env_keys::CSV_DIR) {
            self.csv_dir = dir;
        }
        if let Some(path) = get(env_keys::MASTER_DB) {
            self.master_db = path;
        }
        if let Some(path) = get(env_keys::STATE_DB) {
            self.state_db = path;
        }
    }

    /// Folder facility workbooks are resolved against
    pub fn store_dir(&self) -> PathBuf {
        self.master_db
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            csv_dir = "/exports"
            legacy_facility_id = "F-009"

            [layout]
            building = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.csv_dir, PathBuf::from("/exports"));
        assert_eq!(config.legacy_facility_id, "F-009");
        assert_eq!(config.layout.building, 3);
        assert_eq!(config.layout.room, 3);
        assert_eq!(config.master_db, PathBuf::from("Master_DB.xlsx"));
        assert_eq!(config.analyze.target_columns.len(), 12);
    }

    #[test]
    fn test_target_columns_from_file() {
        let config = Config::from_toml(
            r#"
            [[analyze.target_columns]]
            name = "状態"
            "#,
        )
        .unwrap();
        assert_eq!(config.analyze.target_columns, vec![TargetColumn::new("状態", "")]);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(Config::from_toml("csv_dir = [").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (env_keys::MASTER_DB, "/srv/master/Master_DB.xlsx"),
            (env_keys::STATE_DB, "  "),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        let state_db = config.state_db.clone();
        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.master_db, PathBuf::from("/srv/master/Master_DB.xlsx"));
        assert_eq!(config.state_db, state_db);
        assert_eq!(config.csv_dir, PathBuf::from("raw_data"));
        assert_eq!(config.store_dir(), PathBuf::from("/srv/master"));
    }

    #[test]
    fn test_store_dir_for_bare_file_name() {
        assert_eq!(Config::default().store_dir(), PathBuf::from("."));
    }
}
