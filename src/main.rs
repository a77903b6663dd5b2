use anyhow::{Context, Result};
use stackup::cli::commands::PlanCommand;
use stackup::cli::logging::init_logging;
use stackup::cli::output::*;
use stackup::cli::{Cli, Command};
use stackup::core::{BootstrapConfig, Mode};
use stackup::execution::{ExecutionEngine, ExecutionEvent};
use stackup::process::SubprocessInvoker;
use stackup::profile::{build_pipeline, step_names};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Exit code for configuration and usage errors
const EXIT_USAGE: i32 = 2;

#[tokio::main]
async fn main() {
    let cli = Cli::from_args();

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("{:#}", e);
            eprintln!("{} {}", CROSS, style(format!("{:#}", e)).red());
            std::process::exit(EXIT_USAGE);
        }
    }
}

async fn run(cli: Cli) -> Result<i32> {
    let working_dir = match &cli.dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    let mode = match &cli.command {
        Command::Dev => Mode::Development,
        Command::Prod => Mode::Production,
        Command::Plan(cmd) => Mode::from(cmd.mode),
    };

    let log_dir = if cli.no_log_files || matches!(cli.command, Command::Plan(_)) {
        None
    } else {
        Some(resolve(&working_dir, &cli.log_dir))
    };
    init_logging(cli.verbose, mode, log_dir.as_deref())?;

    let config = BootstrapConfig::discover(cli.config.as_deref(), &working_dir)
        .context("Failed to load configuration")?;

    match &cli.command {
        Command::Plan(cmd) => show_plan(cmd, mode, &config, &working_dir).map(|_| 0),
        Command::Dev | Command::Prod => Ok(bootstrap(mode, &config, working_dir).await),
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn show_plan(cmd: &PlanCommand, mode: Mode, config: &BootstrapConfig, working_dir: &Path) -> Result<()> {
    let pipeline = build_pipeline(mode, config, Arc::new(SubprocessInvoker::new()));
    let ctx = config.settings(mode).to_context(mode, working_dir);

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&plan_json(&pipeline, &ctx))?);
    } else {
        println!("{}", format_plan(&pipeline, &ctx));
    }
    Ok(())
}

/// Run the mode pipeline, returning the process exit code
async fn bootstrap(mode: Mode, config: &BootstrapConfig, working_dir: PathBuf) -> i32 {
    let settings = config.settings(mode);
    let ctx = settings.to_context(mode, working_dir);
    let pipeline = build_pipeline(mode, config, Arc::new(SubprocessInvoker::new()));

    let mut engine =
        ExecutionEngine::new().with_shutdown_grace(Duration::from_secs(config.shutdown_grace_secs));
    let banner = format_banner(mode, &settings, &config.runtime);
    engine.add_event_handler(move |event| {
        // Ignore a closed stdout or stderr
        let _ = write_execution_event(&event, &mut std::io::stdout(), &mut std::io::stderr());

        // The development stack stays attached, so show where it lives before it starts
        if let ExecutionEvent::StepStarted { step, .. } = &event {
            if mode == Mode::Development && step == step_names::STACK_UP {
                println!("{}", banner);
            }
        }
    });

    let shutdown = async {
        if tokio::signal::ctrl_c().await.is_err() {
            // No signal handler available; never interrupt
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl-C");
    };

    println!();
    let outcome = engine.execute_until(&pipeline, &ctx, shutdown).await;

    println!("\n{}", format_outcome(&outcome));
    if outcome.is_completed() && mode == Mode::Production {
        println!("{}", format_banner(mode, &settings, &config.runtime));
    }

    outcome.exit_code()
}
