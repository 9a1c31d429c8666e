/*!
# Solace - A Diary That Answers Back

This file contains the main application flow: it sets up logging, loads the
configuration, opens the database, loads the prompt template and dispatches
the requested subcommand.

## Usage

```
solace [OPTIONS] <COMMAND>

Commands:
  write   Writes a diary and generates its comment
  show    Shows a diary with its comment
  retry   Regenerates the comment for a diary
  events  Lists safety events recorded for a diary

Options:
  -v, --verbose                  Print verbose output
      --log-format <LOG_FORMAT>  Log output format [default: text] [possible values: text, json]
  -h, --help                     Print help
  -V, --version                  Print version
```

## Configuration

See the `config` module for the `SOLACE_*` environment variables.
*/

use chrono::Local;
use clap::Parser;
use serde::Serialize;
use solace::ai::{build_provider, PromptTemplate};
use solace::cli::{CliArgs, Command, WriteArgs};
use solace::config::Config;
use solace::constants::{DEFAULT_LOG_LEVEL, TRACING_ROOT_SPAN_NAME, TRACING_SERVICE_NAME};
use solace::db::diaries::{require_diary, NewDiary};
use solace::db::{Database, SafetyEventStore};
use solace::errors::{AppError, AppResult};
use solace::ops::{
    create_diary, get_diary_detail, retry_diary_comment, CommentOrchestrator, GenerationLimits,
};
use solace::safety::SafetyClassifier;
use std::fs;
use std::io;
use std::process::ExitCode;
use tracing::{debug, error, info, info_span};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    if let Err(e) = init_logging(&args) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let correlation_id = uuid::Uuid::new_v4();
    let root_span = info_span!(
        TRACING_ROOT_SPAN_NAME,
        service_name = TRACING_SERVICE_NAME,
        correlation_id = %correlation_id
    );
    let _guard = root_span.enter();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Full detail goes to the log; users only see the normalized message
            error!("Command failed: {}", e);
            eprintln!("Error: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects `debug` and the
/// default is `info`. Logs go to stderr so stdout carries only command output.
fn init_logging(args: &CliArgs) -> AppResult<()> {
    let default_level = if args.verbose { "debug" } else { DEFAULT_LOG_LEVEL };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    let result = if args.json_logs() {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| AppError::Config(format!("Failed to initialize logging: {}", e)))
}

fn run(args: CliArgs) -> AppResult<()> {
    info!("Starting solace");

    let config = Config::load()?;
    config.validate()?;
    debug!("Configuration: {:?}", config);

    let db = Database::open(&config.db_path)?;
    db.initialize_schema()?;

    // A missing or malformed template stops the application before any request
    let template = PromptTemplate::load(&config.prompt_version, config.prompt_dir.as_deref())?;
    info!("Loaded prompt template {}", template.version());

    let orchestrator = CommentOrchestrator::new(
        SafetyClassifier::default(),
        template,
        build_provider(&config)?,
        GenerationLimits::from(&config),
    );

    match args.command {
        Command::Write(write) => {
            let new_diary = read_new_diary(&write)?;
            print_json(&create_diary(&db, &orchestrator, &new_diary)?)
        }
        Command::Show { id } => print_json(&get_diary_detail(&db, &orchestrator, id)?),
        Command::Retry { id } => print_json(&retry_diary_comment(&db, &orchestrator, id)?),
        Command::Events { id } => {
            let conn = db.get_conn()?;
            require_diary(&conn, id)?;
            drop(conn);
            print_json(&db.list_for_diary(id)?)
        }
    }
}

fn read_new_diary(write: &WriteArgs) -> AppResult<NewDiary> {
    let content = match (&write.content, &write.file) {
        (Some(content), _) => content.clone(),
        (None, Some(path)) => fs::read_to_string(path)?,
        (None, None) => {
            return Err(AppError::InvalidInput(
                "Either --content or --file is required".to_string(),
            ))
        }
    };

    let diary_date = match write.parse_date() {
        Some(Ok(date)) => date,
        Some(Err(e)) => return Err(AppError::InvalidInput(format!("Invalid date format: {}", e))),
        None => Local::now().date_naive(),
    };

    Ok(NewDiary {
        author: write
            .author
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string),
        content,
        diary_date,
    })
}

fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    let rendered = serde_json::to_string_pretty(value).map_err(io::Error::from)?;
    println!("{}", rendered);
    Ok(())
}
