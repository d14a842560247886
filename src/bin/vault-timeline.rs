use anyhow::{Context, Result};
use chrono::Local;
use std::env;
use std::process::ExitCode;
use vault_timeline::cli::{self, CliArgs, Command};
use vault_timeline::config::Config;
use vault_timeline::context::{AppContext, StandardContext};
use vault_timeline::controller::{RunFailure, TimelineController};

const BINARY: &str = "vault-timeline";

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let cli = match cli::parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            eprintln!("Try '{} --help'.", BINARY);
            return ExitCode::from(2);
        }
    };

    if cli.command == Command::Help {
        cli::print_help(BINARY);
        return ExitCode::SUCCESS;
    }

    let ctx = StandardContext::new(cli.root.clone());
    cli::init_logging(&ctx, cli.verbose);

    let outcome = match cli.command {
        Command::Init => init_config(&ctx, &cli),
        Command::Preview => preview(&ctx, &cli),
        Command::Run | Command::Help => return run(&ctx, &cli),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            cli::print_framed(&format!("ERROR: {:#}", e), '-');
            ExitCode::FAILURE
        }
    }
}

/// Explicit `--config` file, else the context's config file. A missing
/// default file is tolerated when `--vault` is given.
fn load_config(ctx: &dyn AppContext, cli: &CliArgs) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => match Config::load(ctx) {
            Ok(config) => config,
            Err(e) if Config::is_missing_config_error(&e) && cli.vault.is_some() => {
                log::info!("No config file found, using defaults");
                Config::default()
            }
            Err(e) if Config::is_missing_config_error(&e) => {
                let path = Config::get_path_string(ctx)?;
                anyhow::bail!(
                    "No config file at '{}'. Run '{} init --vault <path>' first.",
                    path,
                    BINARY
                );
            }
            Err(e) => return Err(e),
        },
    };
    if let Some(vault) = &cli.vault {
        config.vault = vault.clone();
    }
    Ok(config)
}

fn init_config(ctx: &dyn AppContext, cli: &CliArgs) -> Result<()> {
    let config = Config {
        vault: cli.vault.clone().unwrap_or_default(),
        ..Config::default()
    };
    let path = match &cli.config {
        Some(path) => {
            config.save_to(path)?;
            path.clone()
        }
        None => config.save(ctx)?,
    };
    println!("Config written to {}", path.display());
    Ok(())
}

fn preview(ctx: &dyn AppContext, cli: &CliArgs) -> Result<()> {
    let config = load_config(ctx, cli)?;
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    let preview = TimelineController::new(&config, today)
        .preview()
        .map_err(failure_to_error)?;

    print!("{}", preview.document);
    for warning in preview.warnings.iter() {
        eprintln!("warning: {}", warning);
    }
    Ok(())
}

fn run(ctx: &dyn AppContext, cli: &CliArgs) -> ExitCode {
    let config = match load_config(ctx, cli).context("Cannot load configuration") {
        Ok(c) => c,
        Err(e) => {
            cli::print_framed(&format!("ERROR: {:#}", e), '-');
            return ExitCode::FAILURE;
        }
    };
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());

    match TimelineController::new(&config, today).run() {
        Ok(report) => {
            cli::print_framed(&report.summary(), '·');
            for warning in report.warnings.iter() {
                println!("Skipped: {}", warning);
            }
            ExitCode::SUCCESS
        }
        Err(failure) => {
            let lines: Vec<String> = failure
                .messages
                .iter()
                .map(|m| format!("ERROR: {}", m))
                .collect();
            cli::print_framed(&lines.join("\n"), '-');
            ExitCode::FAILURE
        }
    }
}

fn failure_to_error(failure: RunFailure) -> anyhow::Error {
    let joined: Vec<&str> = failure.messages.iter().map(String::as_str).collect();
    anyhow::anyhow!(joined.join("\n"))
}
