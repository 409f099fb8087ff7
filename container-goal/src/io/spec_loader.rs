//! Discovery and parsing of `goals.json` / `goals.yaml` / `goals.yml`.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, instrument};

use crate::core::types::ContainerTaskSpec;
use crate::core::validate::RecordValidator;
use crate::error::ConfigError;

/// Candidate goal file names, searched at the project root only.
///
/// `goals.yaml` and `goals.yml` are the same format under two spellings.
pub const GOAL_FILE_NAMES: [&str; 3] = ["goals.json", "goals.yaml", "goals.yml"];

/// Goal files present at `root`, in [`GOAL_FILE_NAMES`] order.
pub fn find_goal_files(root: &Path) -> Vec<PathBuf> {
    GOAL_FILE_NAMES
        .iter()
        .map(|name| root.join(name))
        .filter(|path| path.is_file())
        .collect()
}

/// Load and validate the container task specs declared under `root`.
///
/// - No goal file: `Ok(vec![])`.
/// - More than one goal file: [`ConfigError::Ambiguous`], regardless of contents.
/// - One goal file: every record is validated in order; the first invalid
///   record fails the whole load.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn load_specs(root: &Path) -> Result<Vec<ContainerTaskSpec>, ConfigError> {
    let mut files = find_goal_files(root);
    let path = match files.len() {
        0 => {
            debug!("no goal file found");
            return Ok(Vec::new());
        }
        1 => files.remove(0),
        _ => return Err(ConfigError::Ambiguous { files }),
    };

    let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let records = parse_records(&path, &contents)?;
    debug!(path = %path.display(), records = records.len(), "parsed goal file");

    let validator = RecordValidator::new()?;
    validator.validate_all(records)
}

/// Parse goal file contents into raw records.
///
/// A `.json` file is read with the JSON parser; anything else is YAML. An
/// empty (or `null`) document holds zero records.
pub fn parse_records(path: &Path, contents: &str) -> Result<Vec<Value>, ConfigError> {
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }
    let document: Value = if is_json(path) {
        serde_json::from_str(contents).map_err(|source| ConfigError::ParseJson {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        serde_yaml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?
    };
    match document {
        Value::Array(records) => Ok(records),
        Value::Null => Ok(Vec::new()),
        other => Err(ConfigError::NotASequence {
            path: path.to_path_buf(),
            found: kind(&other),
        }),
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
