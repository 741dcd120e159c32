//! # Cookbook CLI
//!
//! Checks and publishes recipe drafts written as JSON documents.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use cookbook_authoring::{AuthoringConfig, DraftOrchestrator, PublishOutcome};
use cookbook_core::RecipeEntity;
use cookbook_store::InMemoryRecipeRepository;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod document;

use document::DraftDocument;

#[derive(Debug, Parser)]
#[command(name = "cookbook", version, about = "Recipe draft authoring")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Report whether a draft is ready to publish
    Check {
        /// Path to the draft document
        draft: PathBuf,
    },
    /// Publish a draft to an in-memory repository
    Publish {
        /// Path to the draft document
        draft: PathBuf,

        /// Authoring configuration file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Make the repository reject the recipe with this message
        #[arg(long)]
        fail_with: Option<String>,
    },
}

/// What a command ended with.
#[derive(Debug)]
enum Report {
    Ready,
    Invalid(String),
    Published { status: String, recipe: RecipeEntity },
    Failed(String),
}

impl Report {
    fn exit_code(&self) -> ExitCode {
        match self {
            Report::Ready | Report::Published { .. } => ExitCode::SUCCESS,
            Report::Invalid(_) | Report::Failed(_) => ExitCode::FAILURE,
        }
    }

    fn print(&self) -> anyhow::Result<()> {
        match self {
            Report::Ready => println!("ready to publish"),
            Report::Invalid(message) | Report::Failed(message) => println!("{}", message),
            Report::Published { status, recipe } => {
                println!("{}", status);
                println!("{}", serde_json::to_string_pretty(recipe)?);
            }
        }
        Ok(())
    }
}

async fn run(cli: Cli) -> anyhow::Result<Report> {
    match cli.command {
        Command::Check { draft } => check(draft),
        Command::Publish {
            draft,
            config,
            fail_with,
        } => publish(draft, config, fail_with).await,
    }
}

fn load_session(
    draft: &Path,
    repository: Arc<InMemoryRecipeRepository>,
    config: AuthoringConfig,
) -> anyhow::Result<DraftOrchestrator> {
    let document = DraftDocument::load(draft)
        .with_context(|| format!("Failed to load draft {}", draft.display()))?;

    let mut session = DraftOrchestrator::with_config(repository, config);
    document
        .apply(&mut session)
        .with_context(|| format!("Draft {} contains invalid input", draft.display()))?;

    Ok(session)
}

fn check(draft: PathBuf) -> anyhow::Result<Report> {
    let session = load_session(
        &draft,
        Arc::new(InMemoryRecipeRepository::new()),
        AuthoringConfig::default(),
    )?;

    Ok(match session.draft().validate() {
        Ok(()) => Report::Ready,
        Err(failure) => Report::Invalid(failure.message().to_string()),
    })
}

async fn publish(
    draft: PathBuf,
    config: Option<PathBuf>,
    fail_with: Option<String>,
) -> anyhow::Result<Report> {
    let config = match config {
        Some(path) => AuthoringConfig::load(&path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AuthoringConfig::default(),
    };

    let repository = Arc::new(match fail_with {
        Some(message) => InMemoryRecipeRepository::failing(message),
        None => InMemoryRecipeRepository::new(),
    });

    let mut session = load_session(&draft, repository.clone(), config)?;
    let outcome = session.publish_recipe()?.outcome().await;
    let status = session
        .publish_status()
        .message()
        .unwrap_or_default()
        .to_string();

    match outcome {
        PublishOutcome::Published { recipe_id } => {
            info!(recipe_id = %recipe_id, "Draft published");
            let stored = repository
                .get(&recipe_id)
                .await
                .with_context(|| format!("Recipe {} missing after publish", recipe_id))?;
            Ok(Report::Published {
                status,
                recipe: stored.recipe,
            })
        }
        PublishOutcome::Failed { message } => Ok(Report::Failed(message)),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let report = run(Cli::parse()).await?;
    report.print()?;
    Ok(report.exit_code())
}
