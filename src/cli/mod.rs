//! CLI module for the auth service
//!
//! - `serve`: HTTP API server (default)
//! - `migrate`: apply the PostgreSQL schema and exit

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

/// Auth Service - user registration, login and bearer token validation
#[derive(Parser, Debug)]
#[command(name = "auth-service")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Apply pending database migrations
    Migrate,
}

impl Cli {
    /// The subcommand to run; `serve` when none is given
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Serve)
    }
}
