use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use restock_core::advisor;
use restock_core::artifacts::ArtifactBundle;
use restock_core::config::Settings;
use restock_core::domain::request::RecommendationRequest;
use restock_core::explain::ExplanationMode;

#[derive(Debug, Parser)]
#[command(name = "restock_cli")]
struct Args {
    /// Artifact directory. Overrides ARTIFACTS_DIR.
    #[arg(long, global = true)]
    artifacts_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load and validate the artifact bundle, then print a summary.
    Check,
    /// Score one request from a JSON file and print the recommendation.
    Recommend {
        /// Path to a JSON file holding a single recommendation request.
        #[arg(long)]
        input: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let dir = args
        .artifacts_dir
        .unwrap_or_else(|| settings.artifacts_dir.clone());

    let result = match args.command {
        Command::Check => check(&dir),
        Command::Recommend { input } => {
            recommend_from_file(&dir, &input, settings.explanation_mode)
        }
    };

    if let Err(e) = &result {
        sentry_anyhow::capture_anyhow(e);
    }
    result
}

fn check(dir: &Path) -> anyhow::Result<()> {
    let bundle = ArtifactBundle::load_from_dir(dir)?;
    println!(
        "artifacts OK: {} model, {} features, residual_q90 = {}",
        bundle.model.kind(),
        bundle.features.len(),
        bundle.residual_q90
    );
    Ok(())
}

fn recommend_from_file(dir: &Path, input: &Path, mode: ExplanationMode) -> anyhow::Result<()> {
    let bundle = ArtifactBundle::load_from_dir(dir)?;

    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read request file {}", input.display()))?;
    let req: RecommendationRequest = serde_json::from_str(&raw).with_context(|| {
        format!(
            "request file {} is not a valid recommendation request",
            input.display()
        )
    })?;

    let rec = advisor::recommend(&bundle, &req, mode)?;
    println!("{}", serde_json::to_string_pretty(&rec)?);
    Ok(())
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
