use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use git_release::cli::{skipped_outputs, Cli, Command, ReleaseWorkflow, WorkflowOptions};
use git_release::config::{load_config, ReleaseConfig};
use git_release::git::Git2Repository;
use git_release::hooks::HookSet;
use git_release::logging::{init_tracing, Level};
use git_release::{ui, ReleaseError};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.options.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    if let Err(e) = init_tracing(level) {
        ui::display_error(&e.to_string());
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(ReleaseError::NoChanges) = e.downcast_ref::<ReleaseError>() {
                ui::display_status(&e.to_string());
                return match ui::display_outputs(&skipped_outputs()) {
                    Ok(()) => ExitCode::SUCCESS,
                    Err(e) => {
                        ui::display_error(&e.to_string());
                        ExitCode::FAILURE
                    }
                };
            }
            ui::display_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.options.config.as_deref()).context("Error loading config")?;
    cli.options.apply(&mut config);

    let workdir = match cli.options.working_dir.as_deref() {
        Some(dir) => std::fs::canonicalize(dir)
            .with_context(|| format!("Working directory {} does not exist", dir))?,
        None => std::env::current_dir().context("Cannot determine the current directory")?,
    };

    let workflow = build_workflow(config, &workdir)?;

    match cli.command {
        Some(Command::GetVersion) => {
            let (_, version) = workflow.get_version().await?;
            println!("{}", version);
        }
        None => release(&workflow, cli.options.dry_run).await?,
    }
    Ok(())
}

fn build_workflow(config: ReleaseConfig, workdir: &Path) -> Result<ReleaseWorkflow> {
    let repository = Git2Repository::open(workdir)
        .with_context(|| format!("No git repository found at {}", workdir.display()))?;
    let hooks = HookSet::load(
        workdir,
        config.pre_changelog_generation.as_deref(),
        config.pre_commit.as_deref(),
    );

    Ok(ReleaseWorkflow::new(
        config,
        Arc::new(repository),
        Arc::new(hooks),
        workdir,
    ))
}

async fn release(workflow: &ReleaseWorkflow, dry_run: bool) -> Result<()> {
    let config = workflow.config();
    ui::display_status(&format!("Using \"{}\" as version file", config.version_file));
    ui::display_status(&format!("Using \"{}\" as tag prefix", config.tag_prefix));

    let result = workflow.run(WorkflowOptions { dry_run }).await?;

    ui::display_release_plan(
        result.recommendation.release_type.as_str(),
        &result.recommendation.reason,
        &result.version,
    );

    if dry_run {
        ui::display_success(&format!("Dry run: would release {}", result.tag));
    } else if result.pushed {
        ui::display_success(&format!(
            "Released {} to {}",
            result.tag,
            workflow.config().remote
        ));
    } else {
        ui::display_success(&format!("Tag {} created locally", result.tag));
        ui::display_manual_push_instruction(&result.tag, &workflow.config().remote);
    }

    ui::display_outputs(&result.outputs())?;
    Ok(())
}
