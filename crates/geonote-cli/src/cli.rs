//! Command-line arguments.

use clap::{Parser, Subcommand, ValueEnum};

use geonote_core::defaults::{AROUND_RADIUS_M, NEARBY_RADIUS_M};

#[derive(Parser, Debug)]
#[command(name = "geonote")]
#[command(author, version, about = "Store and search geotagged notes")]
#[command(propagate_version = true)]
pub struct Cli {
    /// PostgreSQL connection URL (overrides DATABASE_URL)
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Per-call store deadline in milliseconds (overrides NOTE_QUERY_TIMEOUT_MS)
    #[arg(long, global = true)]
    pub query_timeout_ms: Option<u64>,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Apply pending database migrations
    Migrate,

    #[command(flatten)]
    Notes(NoteCommand),
}

/// Commands served by a note repository.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum NoteCommand {
    /// Validate and store a new note
    Add {
        /// Owner of the note
        #[arg(short, long)]
        user: i64,

        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Note text (1-500 characters)
        #[arg(short, long)]
        text: String,
    },

    /// List every note
    List,

    /// List the notes owned by a user
    Mine {
        #[arg(short, long)]
        user: i64,
    },

    /// Notes left by other users near a point
    Nearby {
        /// User whose own notes are left out
        #[arg(short, long)]
        user: i64,

        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Search radius in meters
        #[arg(short, long, default_value_t = NEARBY_RADIUS_M)]
        radius: f64,
    },

    /// Notes from every user around a point
    Around {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Search radius in meters
        #[arg(short, long, default_value_t = AROUND_RADIUS_M)]
        radius: f64,
    },
}
