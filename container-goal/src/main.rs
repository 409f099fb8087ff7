//! `container-goal`: plan and execute dynamic container goals.
//!
//! Thin host adapter over the library: `plan` prints the planned units as
//! JSON, `execute` runs one unit through the container runtime.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};

use container_goal::core::types::{ExecParams, ExecutionResult};
use container_goal::execute::{ContainerGoal, Invocation};
use container_goal::exit_codes;
use container_goal::io::config::{CONFIG_FILE_NAME, load_config};
use container_goal::io::progress_log::{ProgressLog, WriterLog};
use container_goal::io::spec_loader::load_specs;
use container_goal::logging;
use container_goal::plan::plan;

#[derive(Parser)]
#[command(
    name = "container-goal",
    version,
    about = "Plan and run container goals declared in goals.json / goals.yaml"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the planned goals as JSON.
    Plan {
        /// Project root containing the goal file.
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
    /// Check the goal file and report how many goals it declares.
    Validate {
        /// Project root containing the goal file.
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
    /// Run one planned goal in a disposable container.
    Execute(ExecuteArgs),
}

#[derive(Args)]
struct ExecuteArgs {
    /// Project root containing the goal file and config.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Repository name used in the container name (defaults to the root directory name).
    #[arg(long)]
    repo: Option<String>,

    /// Config file (defaults to `<root>/container-goal.toml`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Index of the planned goal to run.
    #[arg(long, conflicts_with = "params", required_unless_present = "params")]
    index: Option<usize>,

    /// Goal parameters as JSON (`{"image","version","command","args"}`).
    #[arg(long)]
    params: Option<String>,

    /// Append the progress log to this file instead of stderr.
    #[arg(long)]
    log: Option<PathBuf>,
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Plan { root } => cmd_plan(&root),
        Command::Validate { root } => cmd_validate(&root),
        Command::Execute(args) => cmd_execute(&args),
    }
}

fn cmd_plan(root: &Path) -> Result<i32> {
    let plan = plan(root)?;
    let payload = serde_json::to_string_pretty(&plan).context("serialize plan")?;
    println!("{payload}");
    Ok(exit_codes::OK)
}

fn cmd_validate(root: &Path) -> Result<i32> {
    let specs = load_specs(root)?;
    println!("{} goal(s) declared", specs.len());
    Ok(exit_codes::OK)
}

fn cmd_execute(args: &ExecuteArgs) -> Result<i32> {
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| args.root.join(CONFIG_FILE_NAME));
    let cfg = load_config(&config_path)?;
    let repo = match &args.repo {
        Some(repo) => repo.clone(),
        None => repo_name(&args.root)?,
    };
    let params = resolve_params(args)?;

    let log: Box<dyn ProgressLog> = match &args.log {
        Some(path) => Box::new(WriterLog::append_to(path)?),
        None => Box::new(WriterLog::new(std::io::stderr())),
    };

    let goal = ContainerGoal::from_config(&cfg);
    let result = goal.run_goal(&Invocation {
        repo: &repo,
        parameters: &params,
        log: log.as_ref(),
    });
    print_result(&result)?;
    Ok(if result.is_success() {
        exit_codes::OK
    } else {
        exit_codes::GOAL_FAILED
    })
}

fn resolve_params(args: &ExecuteArgs) -> Result<ExecParams> {
    if let Some(raw) = &args.params {
        return serde_json::from_str(raw).context("parse --params json");
    }
    let index = args
        .index
        .ok_or_else(|| anyhow!("either --index or --params is required"))?;
    let plan = plan(&args.root)?;
    let Some(unit) = plan.goals().get(index) else {
        bail!(
            "goal index {index} out of range ({} goal(s) planned)",
            plan.goals().len()
        );
    };
    Ok(unit.parameters.clone())
}

/// Name of the project root directory, used as the repository identifier.
fn repo_name(root: &Path) -> Result<String> {
    let root = root
        .canonicalize()
        .with_context(|| format!("resolve project root {}", root.display()))?;
    root.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("cannot derive repo name from {}", root.display()))
}

fn print_result(result: &ExecutionResult) -> Result<()> {
    let payload = serde_json::to_string(result).context("serialize result")?;
    println!("{payload}");
    Ok(())
}
