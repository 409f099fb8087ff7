//! Test-only helpers: goal file fixtures, scripted runtimes and tokens.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, anyhow};
use serde_json::{Value, json};
use tempfile::TempDir;

use crate::core::types::ExecParams;
use crate::io::progress_log::ProgressLog;
use crate::io::runtime::{ContainerRuntime, RuntimeExit};
use crate::io::token::TokenSource;

/// Two valid goal records (one with `preApproval`, one with `retry`).
pub fn sample_records() -> Vec<Value> {
    vec![
        json!({
            "displayName": "Test Container Goal 1",
            "image": "ubuntu",
            "version": "18.04",
            "command": "date",
            "arguments": ["+%s"],
            "preApproval": true,
        }),
        json!({
            "displayName": "Test Container Goal 2",
            "image": "ubuntu",
            "version": "18.04",
            "command": "apt-get",
            "arguments": ["list"],
            "retry": false,
        }),
    ]
}

/// Parameters of the `ubuntu:18.04 date +%s` unit.
pub fn ubuntu_date_params() -> ExecParams {
    ExecParams {
        image: "ubuntu".to_string(),
        version: "18.04".to_string(),
        command: "date".to_string(),
        args: vec!["+%s".to_string()],
    }
}

/// Write `records` to `dir/name`, as JSON for `.json` names and YAML otherwise.
pub fn write_goal_file(dir: &Path, name: &str, records: &[Value]) -> Result<PathBuf> {
    let path = dir.join(name);
    let contents = if name.ends_with(".json") {
        serde_json::to_string_pretty(records).context("serialize goals json")?
    } else {
        serde_yaml::to_string(records).context("serialize goals yaml")?
    };
    fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}

/// Temporary project directory with goal file helpers.
pub struct GoalProject {
    dir: TempDir,
}

impl GoalProject {
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("goal-project")
            .tempdir()
            .context("create project dir")?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_goals(&self, name: &str, records: &[Value]) -> Result<PathBuf> {
        write_goal_file(self.path(), name, records)
    }

    pub fn write_raw(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.path().join(name);
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }
}

/// Scripted outcome for one runtime call. `Err` simulates a launch failure.
pub type ScriptedRun = std::result::Result<RuntimeExit, String>;

/// Runtime that records argv and replays scripted outcomes without spawning.
///
/// Clones share the script and the call record.
#[derive(Clone, Default)]
pub struct ScriptedRuntime {
    script: Arc<Mutex<VecDeque<ScriptedRun>>>,
    calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl ScriptedRuntime {
    pub fn new(script: Vec<ScriptedRun>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            calls: Arc::default(),
        }
    }

    /// Argv of every call so far, in call order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl ContainerRuntime for ScriptedRuntime {
    fn run(&self, args: &[String], _log: &dyn ProgressLog) -> Result<RuntimeExit> {
        self.calls.lock().expect("calls lock").push(args.to_vec());
        let next = self
            .script
            .lock()
            .expect("script lock")
            .pop_front()
            .ok_or_else(|| anyhow!("scripted runtime exhausted"))?;
        next.map_err(|message| anyhow!(message))
    }
}

/// Deterministic tokens: `<prefix>-0`, `<prefix>-1`, ...
pub struct SequentialTokens {
    prefix: String,
    next: AtomicUsize,
}

impl SequentialTokens {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            next: AtomicUsize::new(0),
        }
    }
}

impl TokenSource for SequentialTokens {
    fn fresh_token(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        format!("{}-{n}", self.prefix)
    }
}
