//! Data model shared by the loader, planner and executor.
//!
//! Field names serialize in camelCase because they mirror the keys users
//! write in `goals.json` / `goals.yaml` and the shape the host scheduler
//! stores between planning and execution.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Registration name of the dynamic container goal.
pub const GOAL_UNIQUE_NAME: &str = "dyn-container-goal";
/// Human-facing name of the dynamic container goal.
pub const GOAL_DISPLAY_NAME: &str = "Dynamic Container Goal";

/// One container task declared in a goal file.
///
/// `retry_condition` and `descriptions` are opaque to this crate: they are
/// kept as raw JSON and forwarded to the host untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerTaskSpec {
    pub image: String,
    pub version: String,
    pub command: String,
    pub arguments: Vec<String>,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_approval: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_condition: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptions: Option<Value>,
}

/// Parameters captured at planning time and replayed at execution time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecParams {
    pub image: String,
    pub version: String,
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Scheduling metadata the host scheduler evaluates (approval gates, retry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalDetails {
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_approval: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptions: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_condition: Option<Value>,
}

/// Scheduling-ready projection of a [`ContainerTaskSpec`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedUnit {
    pub details: GoalDetails,
    pub parameters: ExecParams,
}

impl From<ContainerTaskSpec> for PlannedUnit {
    fn from(spec: ContainerTaskSpec) -> Self {
        Self {
            details: GoalDetails {
                display_name: spec.display_name,
                approval: spec.approval,
                pre_approval: spec.pre_approval,
                descriptions: spec.descriptions,
                retry: spec.retry,
                retry_condition: spec.retry_condition,
            },
            parameters: ExecParams {
                image: spec.image,
                version: spec.version,
                command: spec.command,
                args: spec.arguments,
            },
        }
    }
}

/// Planned units grouped the way the host scheduler expects them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GoalPlan {
    pub containers: GoalGroup,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GoalGroup {
    pub goals: Vec<PlannedUnit>,
}

impl GoalPlan {
    pub fn new(goals: Vec<PlannedUnit>) -> Self {
        Self {
            containers: GoalGroup { goals },
        }
    }

    pub fn goals(&self) -> &[PlannedUnit] {
        &self.containers.goals
    }
}

/// Exit code reported for a successful run.
pub const CODE_SUCCESS: i32 = 0;
/// Exit code reported for a failed run.
pub const CODE_FAILURE: i32 = 1;

/// Outcome of executing one planned unit.
///
/// Constructed only through [`ExecutionResult::success`] and
/// [`ExecutionResult::failure`], so a successful result never carries a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl ExecutionResult {
    pub fn success() -> Self {
        Self {
            code: CODE_SUCCESS,
            message: None,
        }
    }

    pub fn failure(message: Option<String>) -> Self {
        Self {
            code: CODE_FAILURE,
            message,
        }
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_success(&self) -> bool {
        self.code == CODE_SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn planned_unit_projects_every_field() {
        let spec = ContainerTaskSpec {
            image: "ubuntu".to_string(),
            version: "18.04".to_string(),
            command: "date".to_string(),
            arguments: vec!["+%s".to_string()],
            display_name: "T1".to_string(),
            approval: Some(true),
            pre_approval: Some(false),
            retry: Some(true),
            retry_condition: Some(json!({"retries": 3})),
            descriptions: Some(json!({"completed": "done"})),
        };

        let unit = PlannedUnit::from(spec);
        assert_eq!(
            unit.parameters,
            ExecParams {
                image: "ubuntu".to_string(),
                version: "18.04".to_string(),
                command: "date".to_string(),
                args: vec!["+%s".to_string()],
            }
        );
        assert_eq!(unit.details.display_name, "T1");
        assert_eq!(unit.details.approval, Some(true));
        assert_eq!(unit.details.pre_approval, Some(false));
        assert_eq!(unit.details.retry, Some(true));
        assert_eq!(unit.details.retry_condition, Some(json!({"retries": 3})));
        assert_eq!(unit.details.descriptions, Some(json!({"completed": "done"})));
    }

    #[test]
    fn success_result_serializes_without_message() {
        let value = serde_json::to_value(ExecutionResult::success()).expect("serialize");
        assert_eq!(value, json!({"code": 0}));
    }

    #[test]
    fn failure_result_keeps_message() {
        let result = ExecutionResult::failure(Some("boom".to_string()));
        assert_eq!(result.code(), CODE_FAILURE);
        assert_eq!(result.message(), Some("boom"));
        assert!(!result.is_success());
    }

    #[test]
    fn plan_serializes_under_containers_group() {
        let plan = GoalPlan::default();
        let value = serde_json::to_value(&plan).expect("serialize");
        assert_eq!(value, json!({"containers": {"goals": []}}));
    }
}
