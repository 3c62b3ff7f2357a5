//! CLI command definitions for the `counsel` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod catalog;
pub mod session;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// AI career counseling sessions from the terminal or over HTTP.
#[derive(Parser)]
#[command(name = "counsel", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true, env = "COUNSEL_LOG_JSON")]
    pub log_json: bool,

    /// Export spans to stdout via OpenTelemetry.
    #[arg(long, global = true, env = "COUNSEL_OTEL")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on (defaults to [server].port in config.toml).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to [server].host in config.toml).
        #[arg(long)]
        host: Option<String>,
    },

    /// Start a new counseling session.
    New {
        /// Owner of the session.
        #[arg(long, env = "COUNSEL_USER")]
        user: String,

        /// Session title.
        #[arg(long)]
        title: String,

        /// Short description.
        #[arg(long)]
        description: Option<String>,

        /// Counseling service (career_strategy, resume_review, interview_prep,
        /// salary_guidance, general).
        #[arg(long)]
        service: Option<String>,
    },

    /// List sessions, most recently active first.
    #[command(alias = "ls")]
    Sessions {
        /// Only sessions owned by this user (all sessions when omitted).
        #[arg(long)]
        user: Option<String>,
    },

    /// Show a session and its full conversation.
    Show {
        /// Session ID.
        id: String,
    },

    /// Send a message and print the counselor's reply.
    Send {
        /// Session ID.
        id: String,

        /// Message text.
        message: String,
    },

    /// Answer the last message of a session that never got a reply.
    Retry {
        /// Session ID.
        id: String,
    },

    /// Rename a session.
    Rename {
        /// Session ID.
        id: String,

        /// New title.
        title: String,
    },

    /// Delete a session and all its messages.
    #[command(alias = "rm")]
    Delete {
        /// Session ID.
        id: String,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },

    /// List counseling services and quick actions.
    Services,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Parse a session id argument.
pub(crate) fn parse_session_id(id: &str) -> anyhow::Result<uuid::Uuid> {
    id.parse()
        .map_err(|_| anyhow::anyhow!("'{id}' is not a valid session id"))
}
