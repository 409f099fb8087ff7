//! Schema validation for raw goal records.
//!
//! Records are checked against `schemas/goals/v1.schema.json` before they are
//! deserialized, so a record that is missing a required key is reported with
//! its original content rather than a serde path error.

use jsonschema::{Draft, Validator};
use serde_json::Value;

use crate::core::types::ContainerTaskSpec;
use crate::error::ConfigError;

const GOAL_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../schemas/goals/v1.schema.json"
));

/// Keys every goal record must carry.
pub const REQUIRED_FIELDS: [&str; 5] =
    ["image", "version", "command", "arguments", "displayName"];

/// Compiled validator for goal records.
pub struct RecordValidator {
    schema: Validator,
}

impl RecordValidator {
    pub fn new() -> Result<Self, ConfigError> {
        let schema_json: Value = serde_json::from_str(GOAL_SCHEMA)
            .map_err(|err| ConfigError::Schema(format!("parse goal schema: {err}")))?;
        let schema = jsonschema::options()
            .with_draft(Draft::Draft202012)
            .build(&schema_json)
            .map_err(|err| ConfigError::Schema(format!("compile goal schema: {err}")))?;
        Ok(Self { schema })
    }

    /// Validate records in order, stopping at the first invalid one.
    ///
    /// Later records are not inspected once a record fails, and no specs are
    /// returned for a batch that contains an invalid record.
    pub fn validate_all(
        &self,
        records: Vec<Value>,
    ) -> Result<Vec<ContainerTaskSpec>, ConfigError> {
        let mut specs = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            specs.push(self.validate(index, record)?);
        }
        Ok(specs)
    }

    /// Validate a single record and convert it into a typed spec.
    pub fn validate(&self, index: usize, record: Value) -> Result<ContainerTaskSpec, ConfigError> {
        let problems = self.problems(&record);
        if !problems.is_empty() {
            return Err(invalid(index, &record, problems));
        }
        let offender = serialize_record(&record);
        serde_json::from_value(record).map_err(|err| ConfigError::InvalidRecord {
            index,
            offender,
            problems: vec![err.to_string()],
        })
    }

    fn problems(&self, record: &Value) -> Vec<String> {
        let missing = missing_fields(record);
        if !missing.is_empty() {
            return vec![format!("missing required field(s): {}", missing.join(", "))];
        }
        let mut problems: Vec<String> = self
            .schema
            .iter_errors(record)
            .map(|err| err.to_string())
            .collect();
        if let Some(version) = record.get("version").filter(|v| v.is_number()) {
            problems.push(format!(
                "version {version} is a number; quote it so it is read as a string (\"{version}\")"
            ));
        }
        problems
    }
}

/// Required keys absent from `record`, in declaration order.
///
/// Non-object records are missing every required key.
pub fn missing_fields(record: &Value) -> Vec<&'static str> {
    match record.as_object() {
        Some(map) => REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|key| !map.contains_key(*key))
            .collect(),
        None => REQUIRED_FIELDS.to_vec(),
    }
}

fn invalid(index: usize, record: &Value, problems: Vec<String>) -> ConfigError {
    ConfigError::InvalidRecord {
        index,
        offender: serialize_record(record),
        problems,
    }
}

/// Compact JSON rendering of the offending record, as written by the user.
fn serialize_record(record: &Value) -> String {
    record.to_string()
}
