//! GCP Assistant - Entry Point
//!
//! Answers one query given on the command line, or runs an interactive
//! prompt when no query is given.

use clap::Parser;
use gcp_assistant::core::error::Result;
use gcp_assistant::core::types::{ReplyStatus, Tool, ToolResponse};
use gcp_assistant::{assistant, Assistant, AssistantConfig};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Natural language front end for gcloud and bq
#[derive(Parser, Debug)]
#[command(name = "gcp-assistant")]
#[command(about = "Ask about GCP resources in plain English, or run gcloud/bq commands directly")]
struct Args {
    /// Query or command to run once (interactive prompt when omitted)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    query: Vec<String>,

    /// TOML config file
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Path of the gcloud executable (overrides GCLOUD_PATH)
    #[arg(long)]
    gcloud_path: Option<PathBuf>,

    /// Path of the bq executable (overrides BQ_PATH)
    #[arg(long)]
    bq_path: Option<PathBuf>,

    /// Trace argument vectors and raw tool output
    #[arg(long, short = 'd')]
    debug: bool,

    /// Print the raw tool response as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(config.debug);
    tracing::debug!("Loaded config: {:?}", config);

    match run(&args, &config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Defaults -> config file -> environment -> CLI flags
fn load_config(args: &Args) -> Result<AssistantConfig> {
    let mut config = match &args.config {
        Some(path) => AssistantConfig::load(path)?,
        None => AssistantConfig::default(),
    };
    config.apply_env();

    if let Some(path) = &args.gcloud_path {
        config.gcloud_path = Some(path.clone());
    }
    if let Some(path) = &args.bq_path {
        config.bq_path = Some(path.clone());
    }
    if args.debug {
        config.debug = true;
    }
    Ok(config)
}

fn init_tracing(debug: bool) {
    let default_directive = if debug {
        "gcp_assistant=debug"
    } else {
        "gcp_assistant=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Returns whether the last reply was a success
fn run(args: &Args, config: &AssistantConfig) -> Result<bool> {
    let assistant = assistant(config)?;

    for tool in [Tool::Gcloud, Tool::Bq] {
        if assistant.router().tools().program(tool).is_empty() {
            tracing::warn!(
                "No path configured for {} - its commands will fail to launch",
                tool.name()
            );
        }
    }

    if !args.query.is_empty() {
        let query = args.query.join(" ");
        return answer(&assistant, &query, args.json);
    }

    interactive(&assistant, args.json)?;
    Ok(true)
}

fn answer(assistant: &Assistant, query: &str, json: bool) -> Result<bool> {
    let response = assistant.classify_and_execute(query);
    let ok = response.is_success();
    print_response(response, json)?;
    Ok(ok)
}

fn print_response(response: ToolResponse, json: bool) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if json {
        let text = serde_json::to_string_pretty(&response)?;
        writeln!(stdout, "{}", text)?;
        return Ok(());
    }

    let reply = response.into_message();
    match reply.status {
        ReplyStatus::Success => writeln!(stdout, "{}", reply.message)?,
        ReplyStatus::Error => writeln!(stdout, "Error: {}", reply.message)?,
    }
    Ok(())
}

fn interactive(assistant: &Assistant, json: bool) -> Result<()> {
    println!("\n=== GCP ASSISTANT ===");
    print_help();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let input = line.trim();

        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "q" {
            break;
        }
        if input == "help" || input == "h" {
            print_help();
            continue;
        }

        answer(assistant, input, json)?;
        println!();
    }

    println!("Goodbye!");
    Ok(())
}

fn print_help() {
    println!();
    println!("Ask in plain English, for example:");
    println!("  list all gcp projects");
    println!("  list services in project my-project");
    println!("  show bigquery tables in dataset sales");
    println!("  link billing account 0A1B-2C3D to project my-project");
    println!();
    println!("Or type a command directly:");
    println!("  gcloud compute instances list");
    println!("  bq query \"SELECT 1\"");
    println!();
    println!("  help / h        - Show this help");
    println!("  quit / q        - Exit");
    println!();
}
