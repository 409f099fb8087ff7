//! Executor configuration stored in `container-goal.toml` at the project root.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::types::{GOAL_DISPLAY_NAME, GOAL_UNIQUE_NAME};

/// Default config file name, relative to the project root.
pub const CONFIG_FILE_NAME: &str = "container-goal.toml";

/// Executor configuration (TOML).
///
/// Missing fields default to running `docker` under the standard goal name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GoalConfig {
    /// Container runtime program (e.g. `docker`, `podman`, or an absolute path).
    pub runtime: String,

    /// Registration name of the dynamic goal.
    pub goal_name: String,

    /// Display name of the dynamic goal.
    pub goal_display_name: String,
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            runtime: "docker".to_string(),
            goal_name: GOAL_UNIQUE_NAME.to_string(),
            goal_display_name: GOAL_DISPLAY_NAME.to_string(),
        }
    }
}

impl GoalConfig {
    pub fn validate(&self) -> Result<()> {
        if self.runtime.trim().is_empty() {
            return Err(anyhow!("runtime must not be empty"));
        }
        if self.goal_name.trim().is_empty() {
            return Err(anyhow!("goal_name must not be empty"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `GoalConfig::default()`.
pub fn load_config(path: &Path) -> Result<GoalConfig> {
    if !path.exists() {
        let cfg = GoalConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: GoalConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
