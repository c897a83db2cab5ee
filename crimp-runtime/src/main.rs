//! Crimp - Climbing Training Session Runner
//!
//! Runs a guided training tool (timer, callouts, metronome, structured
//! session) from the terminal. The tool comes from a TOML catalog; its
//! config is compiled into timed steps and run on an embassy executor
//! with a 1 Hz heartbeat, a drift-corrected beat clock and a callout timer.
//!
//! Named after the crimp grip: small edges, precise timing.

mod channels;
mod config;
mod controller;
mod input;
mod recorder;
mod tasks;

use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use embassy_executor::Executor;
use static_cell::StaticCell;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crimp_core::compiler::{compile, Program};
use crimp_core::config::ToolDefinition;
use crimp_core::scheduler::Session;
use crimp_cue_term::TerminalCues;

use crate::config::{parse_overrides, Catalog};
use crate::controller::{Controller, SessionEnd};
use crate::recorder::JsonFileRecorder;

#[derive(Debug, Parser)]
#[command(name = "crimp")]
#[command(about = "Guided climbing training sessions", long_about = None)]
#[command(version)]
struct Cli {
    /// Tool to run, by name
    #[arg(required_unless_present = "list")]
    tool: Option<String>,

    /// Tool catalog; the built-in catalog is used when omitted
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// Override a config key (value is JSON, or a plain string)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    overrides: Vec<String>,

    /// Seed for random callouts
    #[arg(long)]
    seed: Option<u64>,

    /// Write completed sessions as JSON into this directory
    #[arg(long, value_name = "DIR")]
    record_dir: Option<PathBuf>,

    /// Notes stored with the completed session
    #[arg(long)]
    notes: Option<String>,

    /// Print the compiled steps and exit
    #[arg(long)]
    dry_run: bool,

    /// Do not ring the terminal bell
    #[arg(long)]
    no_bell: bool,

    /// List the catalog and exit
    #[arg(long)]
    list: bool,
}

static EXECUTOR: StaticCell<Executor> = StaticCell::new();

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let catalog = Catalog::load(cli.catalog.as_deref())?;
    if cli.list {
        print_catalog(&catalog);
        return Ok(());
    }

    let name = cli.tool.as_deref().context("no tool given")?;
    let tool = catalog.find(name)?;
    let overrides = parse_overrides(&cli.overrides)?;
    let config = tool
        .resolve_config(&overrides)
        .with_context(|| format!("invalid config for '{}'", tool.name))?;
    let program = compile(tool, &config);

    if cli.dry_run {
        print_program(tool, &program);
        return Ok(());
    }

    let seed = cli.seed.unwrap_or_else(clock_seed);
    info!(
        tool = %tool.name,
        recipe = program.recipe.unwrap_or("fallback"),
        seed,
        total_s = program.total_duration(),
        "starting session"
    );

    let session = Session::new(program, catalog.settings.clone(), seed);
    let mut cues = TerminalCues::new(io::stdout());
    if cli.no_bell {
        cues = cues.without_bell();
    }
    let recorder = cli.record_dir.map(JsonFileRecorder::new);
    let controller =
        Box::new(Controller::new(session, cues, recorder).with_record_info(tool.id, cli.notes));

    println!("Commands: p = pause, r = resume, s = skip rest, q = stop");
    input::spawn_stdin_reader().context("failed to start keyboard reader")?;

    let (done_tx, done_rx) = mpsc::channel();
    thread::Builder::new()
        .name("executor".into())
        .spawn(move || {
            let executor = EXECUTOR.init(Executor::new());
            executor.run(|spawner| {
                spawner.spawn(tasks::heartbeat_task()).unwrap();
                spawner.spawn(tasks::beat_task()).unwrap();
                spawner.spawn(tasks::callout_task()).unwrap();
                spawner
                    .spawn(tasks::controller_task(controller, done_tx))
                    .unwrap();
            })
        })
        .context("failed to start executor")?;

    match done_rx.recv().context("executor stopped unexpectedly")? {
        SessionEnd::Completed => println!("Session complete."),
        SessionEnd::Discarded => println!("Session discarded."),
    }
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
}

/// Seed from the wall clock when none is given
fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

fn print_catalog(catalog: &Catalog) {
    for tool in &catalog.tools {
        println!("{:<24} {}", tool.name, tool.tool_type);
    }
}

fn print_program(tool: &ToolDefinition, program: &Program) {
    println!(
        "{} ({}, recipe: {})",
        tool.name,
        tool.tool_type,
        program.recipe.unwrap_or("fallback")
    );
    for item in program.summary() {
        let duration = item
            .duration
            .map(format_duration)
            .unwrap_or_else(|| "open".to_owned());
        let marker = if item.is_rest { "  rest" } else { "" };
        println!("  {:>3}. {:<32} {:>7}{}", item.index, item.label, duration, marker);
    }
    println!("Estimated total: {}", format_duration(program.total_duration()));
}

fn format_duration(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
