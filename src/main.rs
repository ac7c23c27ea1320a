//! ecolens — sustainability audit CLI.
//!
//! Entry point and error handling boundary. Uses `anyhow` for ergonomic
//! error propagation and user-facing messages.

use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use ecolens::cli::args::{AuditArgs, Cli, Command, RulesAction, ServeArgs};
use ecolens::config::Config;
use ecolens::constants;
use ecolens::env::Env;
use ecolens::models::AuditInput;
use ecolens::pipeline::{AuditPipeline, PipelineOptions};
use ecolens::providers::{ChatCompletionsClient, CompletionProvider};
use ecolens::rules::RuleStore;
use ecolens::server::{self, AppState};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Audit(args) => run_audit(args).await,
        Command::Serve(args) => run_serve(args).await,
        Command::Rules { action } => run_rules(action),
        Command::Version => run_version(),
    }
}

/// Run an interactive audit and print the report.
async fn run_audit(args: AuditArgs) -> Result<()> {
    let input = args.validate_input().map_err(|e| anyhow::anyhow!("{e}"))?;

    let cwd = std::env::current_dir().context("could not determine working directory")?;
    let config = Config::load(Some(&cwd), &Env::real()).context("failed to load configuration")?;

    let provider: Arc<dyn CompletionProvider> = Arc::new(
        ChatCompletionsClient::new(config.provider.clone()).map_err(|e| anyhow::anyhow!("{e}"))?,
    );

    let mut options = PipelineOptions::interactive();
    if args.max_files.is_some() {
        options.max_files = args.max_files;
    }
    if args.no_file_artifacts {
        options.per_file_artifacts = false;
    }

    ecolens::cli::print_banner();
    let pipeline = AuditPipeline::new(provider, &config, options);

    let outcome = match input {
        AuditInput::RepoUrl(url) => pipeline.run_repo(&url).await?,
        AuditInput::ArchiveFile(path) => {
            let label = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("upload")
                .to_string();
            pipeline.run_archive(&path, &label).await?
        }
    };

    print!("{}", args.format.render(&outcome.issues));
    eprintln!(
        "  {} {} file(s) analyzed, {} skipped by ignore rules",
        "ℹ".dimmed(),
        outcome.file_count,
        outcome.skipped_count,
    );
    eprintln!(
        "  {} Report saved to {}",
        "✔".green().bold(),
        outcome.report_path.display().to_string().bold(),
    );

    Ok(())
}

/// Run the HTTP analysis service.
async fn run_serve(args: ServeArgs) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cwd = std::env::current_dir().context("could not determine working directory")?;
    let config = Config::load(Some(&cwd), &Env::real()).context("failed to load configuration")?;

    let provider: Arc<dyn CompletionProvider> = Arc::new(
        ChatCompletionsClient::new(config.provider.clone()).map_err(|e| anyhow::anyhow!("{e}"))?,
    );

    let pipeline = AuditPipeline::new(provider, &config, PipelineOptions::service());
    let state = AppState {
        pipeline: Arc::new(pipeline),
    };

    server::serve(&args.addr, state)
        .await
        .context("server failed")
}

/// Print or locate the ignore-rule list.
fn run_rules(action: RulesAction) -> Result<()> {
    let cwd = std::env::current_dir().context("could not determine working directory")?;
    let config = Config::load(Some(&cwd), &Env::real()).context("failed to load configuration")?;
    let store = RuleStore::new(&config.audit.ignore_file);

    match action {
        RulesAction::List => {
            let rules = store.load().context("failed to load ignore rules")?;
            for pattern in rules.patterns() {
                println!("{pattern}");
            }
        }
        RulesAction::Path => {
            println!("{}", store.path().display());
        }
    }

    Ok(())
}

/// Print version information.
fn run_version() -> Result<()> {
    println!("{} {}", "ecolens".bold(), constants::VERSION.green().bold());
    Ok(())
}
