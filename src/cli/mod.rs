//! Command-line interface definitions.
//!
//! Parsing only. Dispatch lives in `main.rs`.

use crate::constants::{APP_DESCRIPTION, APP_NAME, DATE_FORMAT_ISO, LOG_FORMAT_JSON, LOG_FORMAT_TEXT};
use chrono::NaiveDate;
use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

/// A private diary that answers with a kind word
#[derive(Parser, Debug)]
#[clap(name = APP_NAME, about = APP_DESCRIPTION)]
#[clap(author, version, long_about = None)]
pub struct CliArgs {
    /// Print verbose output
    #[clap(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[clap(
        long,
        global = true,
        default_value = LOG_FORMAT_TEXT,
        value_parser = [LOG_FORMAT_TEXT, LOG_FORMAT_JSON]
    )]
    pub log_format: String,

    #[clap(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Writes a diary and generates its comment
    Write(WriteArgs),

    /// Shows a diary with its comment
    Show {
        /// Diary id
        id: i64,
    },

    /// Regenerates the comment for a diary
    Retry {
        /// Diary id
        id: i64,
    },

    /// Lists safety events recorded for a diary
    Events {
        /// Diary id
        id: i64,
    },
}

/// Arguments for `write`.
#[derive(Args, Debug)]
#[clap(group(ArgGroup::new("source").required(true).args(["content", "file"])))]
pub struct WriteArgs {
    /// Diary text
    #[clap(short = 'c', long)]
    pub content: Option<String>,

    /// Read diary text from a file
    #[clap(short = 'f', long)]
    pub file: Option<PathBuf>,

    /// Author's display name, used to address them in the comment
    #[clap(short = 'a', long)]
    pub author: Option<String>,

    /// Diary date (format: YYYY-MM-DD or YYYYMMDD), defaults to today
    #[clap(short = 'd', long)]
    pub date: Option<String>,
}

impl WriteArgs {
    /// Get the date if specified, parsing it into a NaiveDate
    pub fn parse_date(&self) -> Option<Result<NaiveDate, chrono::ParseError>> {
        self.date.as_ref().map(|date_str| {
            NaiveDate::parse_from_str(date_str, DATE_FORMAT_ISO)
                .or_else(|_| NaiveDate::parse_from_str(date_str, "%Y%m%d"))
        })
    }
}

impl CliArgs {
    /// True when JSON log output was requested.
    pub fn json_logs(&self) -> bool {
        self.log_format == LOG_FORMAT_JSON
    }
}
