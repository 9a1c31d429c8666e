/*!
# Solace

Solace is a private diary that answers each entry with a short, warm comment
written by a language model. Before any text leaves the machine, entries are
screened for crisis signals; a flagged entry gets a fixed safety response with
hotline numbers instead of a generated reply, and the detection is recorded.

## Core Features

- One comment per diary, regenerated in place on retry
- Deterministic crisis-keyword screening with an append-only audit trail
- Versioned prompt templates loaded once at startup
- An offline stub provider and an OpenAI-compatible remote provider

## Architecture

- `ai`: Provider trait, stub and remote providers, prompt templates
- `safety`: Crisis-keyword classifier
- `db`: SQLite storage for diaries, comments and safety events
- `ops`: Comment orchestration and the diary boundary
- `config`: Configuration loading and validation
- `cli`: Command-line interface handling using clap
- `errors`: Error handling infrastructure

## Usage Example

```rust,no_run
use solace::ai::{build_provider, PromptTemplate};
use solace::db::diaries::NewDiary;
use solace::db::Database;
use solace::ops::{create_diary, CommentOrchestrator, GenerationLimits};
use solace::safety::SafetyClassifier;
use solace::Config;

fn main() -> solace::AppResult<()> {
    let config = Config::load()?;
    config.validate()?;

    let db = Database::open(&config.db_path)?;
    db.initialize_schema()?;

    let orchestrator = CommentOrchestrator::new(
        SafetyClassifier::default(),
        PromptTemplate::load(&config.prompt_version, config.prompt_dir.as_deref())?,
        build_provider(&config)?,
        GenerationLimits::from(&config),
    );

    let detail = create_diary(
        &db,
        &orchestrator,
        &NewDiary {
            author: Some("Mina".to_string()),
            content: "Long walk by the river today.".to_string(),
            diary_date: chrono::Local::now().date_naive(),
        },
    )?;
    println!("{:?}", detail.comment);
    Ok(())
}
```
*/

/// Language-model providers and prompt templates
pub mod ai;
/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Application-wide constants
pub mod constants;
/// SQLite storage
pub mod db;
/// Error types and utilities for error handling
pub mod errors;
/// Comment orchestration and the diary boundary
pub mod ops;
/// Crisis-keyword screening
pub mod safety;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use errors::{AppError, AppResult};
