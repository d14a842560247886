// File: ./src/cli.rs
//! Command-line parsing, logging setup and console messages.
use crate::context::AppContext;
use crate::model::parse_date;
use anyhow::{Result, bail};
use chrono::NaiveDate;
use simplelog::{
    ColorChoice, CombinedLogger, LevelFilter, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    #[default]
    Run,
    Preview,
    Init,
    Help,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub command: Command,
    pub root: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub vault: Option<PathBuf>,
    pub today: Option<NaiveDate>,
    pub verbose: bool,
}

/// Parses arguments (without the binary name).
pub fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut cli = CliArgs::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "run" => cli.command = Command::Run,
            "preview" => cli.command = Command::Preview,
            "init" => cli.command = Command::Init,
            "help" | "-h" | "--help" => cli.command = Command::Help,
            "-r" | "--root" => cli.root = Some(PathBuf::from(next_value(&mut iter, arg)?)),
            "-c" | "--config" => cli.config = Some(PathBuf::from(next_value(&mut iter, arg)?)),
            "--vault" => cli.vault = Some(PathBuf::from(next_value(&mut iter, arg)?)),
            "--today" => {
                let raw = next_value(&mut iter, arg)?;
                cli.today = Some(parse_date(&raw)?);
            }
            "-v" | "--verbose" => cli.verbose = true,
            other => bail!("Unknown argument '{}'", other),
        }
    }
    Ok(cli)
}

fn next_value(iter: &mut std::slice::Iter<'_, String>, flag: &str) -> Result<String> {
    match iter.next() {
        Some(v) => Ok(v.clone()),
        None => bail!("Missing value for {}", flag),
    }
}

/// Terminal logger on stderr plus a per-run log file in the data directory.
pub fn init_logging(ctx: &dyn AppContext, verbose: bool) {
    let term_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        term_level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    if let Some(path) = ctx.get_log_path()
        && let Ok(file) = std::fs::File::create(&path)
    {
        loggers.push(WriteLogger::new(
            LevelFilter::Debug,
            simplelog::Config::default(),
            file,
        ));
    }

    // A logger may already be installed when embedded in another program.
    let _ = CombinedLogger::init(loggers);
}

/// Prints `msg` framed by two lines of `sep`.
pub fn print_framed(msg: &str, sep: char) {
    let line: String = std::iter::repeat_n(sep, 20).collect();
    println!("{}", line);
    println!("{}", msg);
    println!("{}", line);
}

pub fn print_help(binary_name: &str) {
    println!(
        "Vault Timeline v{} - Reminder timeline and calendar feed for Markdown notes",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [run] [OPTIONS]       Build the timeline and calendar file", binary_name);
    println!("    {} preview [OPTIONS]     Print the timeline without writing files", binary_name);
    println!("    {} init [--vault <path>] Write a default config file", binary_name);
    println!("    {} --help", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for config and logs.");
    println!("    -c, --config <file>   Read settings from this TOML file.");
    println!("    --vault <path>        Scan this folder instead of the configured vault.");
    println!("    --today <date>        Build the timeline as seen on this day (YYYY-MM-DD).");
    println!("    -v, --verbose         Log debug details to the terminal.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("NOTE SYNTAX:");
    println!("    Reminder: 2025-06-10  Date the note is scheduled for (key is configurable)");
    println!("    Repeat: 365           Repeat every N days; past dates roll forward");
    println!("    Priority: 1-6         Heading level used instead of the folder symbol");
    println!("    Style: **             Wrap the backlink in this Markdown marker");
    println!("    ![[image.png]]        First embedded image is shown next to the note");
    println!();
    println!("FILES:");
    println!("    <vault>/Calendar.md     Generated timeline (never scanned as a note)");
    println!("    <vault>/.Calendar.ics   Generated calendar feed");
    println!("    .<file>.lock            Hidden lock kept next to each output; safe to delete");
    println!("                            when no run is active");
    println!();
    println!("MORE INFO:");
    println!("    License:    GPL-3.0");
}
