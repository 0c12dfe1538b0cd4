use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Fake REST API over a JSON dataset, guarded by bearer tokens.
#[derive(Debug, Parser)]
#[command(name = "fauxrest", version, about)]
pub struct Cli {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Dataset file served by the resource routes
    #[arg(long, env = "DATABASE_PATH", default_value = "database.json")]
    pub database: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server (the default)
    Serve,

    /// Print a bcrypt hash for seeding a user's `password`
    HashPassword {
        password: String,

        /// bcrypt cost factor
        #[arg(long, default_value_t = bcrypt::DEFAULT_COST)]
        cost: u32,
    },
}

impl Cli {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["fauxrest"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.database, PathBuf::from("database.json"));
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "fauxrest",
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
            "--database",
            "/tmp/db.json",
        ])
        .unwrap();
        assert_eq!(cli.bind_address(), "127.0.0.1:8080");
        assert_eq!(cli.database, PathBuf::from("/tmp/db.json"));
    }

    #[test]
    fn test_hash_password_subcommand() {
        let cli = Cli::try_parse_from(["fauxrest", "hash-password", "secret", "--cost", "4"]).unwrap();
        match cli.command {
            Some(Command::HashPassword { password, cost }) => {
                assert_eq!(password, "secret");
                assert_eq!(cost, 4);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
