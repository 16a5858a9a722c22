// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parlo - a language-learning chat backend with spoken AI replies.
//!
//! This is the binary entry point for the Parlo server.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod serve;

/// Parlo - a language-learning chat backend with spoken AI replies.
#[derive(Parser, Debug)]
#[command(name = "parlo", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Parlo API server.
    Serve,
    /// Manage Parlo configuration.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Load the configuration and report any errors.
    Validate,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match parlo_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            parlo_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("parlo serve failed: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config {
            command: ConfigCommands::Validate,
        }) => {
            println!(
                "configuration is valid (server={}:{}, model={})",
                config.server.host, config.server.port, config.groq.model
            );
        }
        None => {
            println!("parlo: use --help for available commands");
        }
    }
}
