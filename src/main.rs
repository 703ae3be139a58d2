//! farm-eggs - record an egg harvest against a JSON-described farm.
//!
//! Usage:
//!   farm-eggs --farm farm.json --settings settings.json record submission.json
//!   farm-eggs --farm farm.json form --assets 3,7
//!   farm-eggs --farm farm.json action 3 7 9
//!   farm-eggs workflows
//!
//! Environment variables:
//!   RUST_LOG - log filter (default: info,farm_eggs=debug)

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::error;

use farm_eggs::harvest::{HarvestFormValues, WorkflowMode};
use farm_eggs::logging::init_tracing;
use farm_eggs::memory::{FarmFixture, InMemoryFarm};
use farm_eggs::{AssetId, Collaborators, EggsSettings, HarvestExecutor};

#[derive(Parser, Debug)]
#[command(name = "farm-eggs")]
#[command(about = "Egg harvest quantity and workflow engine")]
#[command(version)]
struct Args {
    /// Farm fixture (egg types, assets, locations) as JSON
    #[arg(long, env = "FARM_EGGS_FARM")]
    farm: Option<PathBuf>,

    /// Module settings as JSON
    #[arg(long, env = "FARM_EGGS_SETTINGS")]
    settings: Option<PathBuf>,

    /// Override the workflow from the settings file
    #[arg(long)]
    workflow: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a submission and print the created harvest log
    Record {
        /// Submitted form values as JSON
        submission: PathBuf,
    },
    /// Print the harvest form for the active workflow
    Form {
        /// Comma-separated asset ids to preselect
        #[arg(long)]
        assets: Option<String>,
    },
    /// Run the "record egg harvest" action over selected assets
    Action { assets: Vec<String> },
    /// List the available workflows
    Workflows,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] farm_eggs::ConfigError),
    #[error(transparent)]
    Harvest(#[from] farm_eggs::harvest::HarvestError),
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn read_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<T, CliError> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.clone(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

async fn run(args: Args) -> Result<(), CliError> {
    let mut settings = match &args.settings {
        Some(path) => EggsSettings::load(path)?,
        None => EggsSettings::default(),
    };
    if let Some(workflow) = args.workflow {
        settings.workflow = Some(workflow);
    }

    let fixture: FarmFixture = match &args.farm {
        Some(path) => read_json(path)?,
        None => FarmFixture::default(),
    };
    let farm = Arc::new(InMemoryFarm::from(fixture));
    let executor = HarvestExecutor::new(Collaborators::from_backend(farm, Arc::new(settings)));

    let output = match args.command {
        Command::Record { submission } => {
            let values: HarvestFormValues = read_json(&submission)?;
            let recorded = executor.record(&values).await?;
            serde_json::to_string_pretty(&serde_json::json!({
                "id": recorded.log_id,
                "log": recorded.payload,
            }))?
        }
        Command::Form { assets } => {
            serde_json::to_string_pretty(&executor.form(assets.as_deref()).await?)?
        }
        Command::Action { assets } => {
            let ids: Vec<AssetId> = assets.into_iter().map(AssetId::new).collect();
            serde_json::to_string_pretty(&executor.record_action(&ids).await?)?
        }
        Command::Workflows => {
            let workflows: Vec<_> = WorkflowMode::ALL
                .iter()
                .map(|mode| {
                    serde_json::json!({
                        "id": mode.id(),
                        "title": mode.title(),
                        "description": mode.description(),
                        "default": *mode == WorkflowMode::default(),
                    })
                })
                .collect();
            serde_json::to_string_pretty(&workflows)?
        }
    };

    println!("{}", output);
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        if let CliError::Harvest(farm_eggs::harvest::HarvestError::Validation(errors)) = &e {
            for err in errors.iter() {
                error!(field = %err.field, "{}", err.message);
            }
        }
        error!("{}", e);
        std::process::exit(1);
    }
}
