//! Planning: turn the goal file of a project into scheduling-ready units.

use std::path::Path;

use tracing::{info, instrument};

use crate::core::types::{GoalPlan, PlannedUnit};
use crate::error::ConfigError;
use crate::io::spec_loader::load_specs;

/// Plan one unit per declared container task, in file order.
///
/// A configuration error fails the whole plan; no partial plan is produced.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn plan(root: &Path) -> Result<GoalPlan, ConfigError> {
    let specs = load_specs(root)?;
    let goals: Vec<PlannedUnit> = specs.into_iter().map(PlannedUnit::from).collect();
    info!(goals = goals.len(), "planned container goals");
    Ok(GoalPlan::new(goals))
}
