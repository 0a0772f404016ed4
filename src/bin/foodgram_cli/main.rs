// ABOUTME: Foodgram CLI - administrative command-line tool for the recipe database
// ABOUTME: Loads catalog fixtures, creates and promotes users, and removes ingredients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors
//!
//! Usage:
//! ```bash
//! # Load measurement units, ingredients, and tags
//! foodgram-cli load-data --dir ./data
//!
//! # Create an administrator
//! foodgram-cli user create --email admin@example.com --username admin --password s3cret-pass --admin
//!
//! # Grant the admin role to an existing account
//! foodgram-cli user promote --email cook@example.com
//!
//! # Remove an ingredient-unit pair that no recipe uses
//! foodgram-cli ingredient remove 42
//! ```

mod commands;

use std::{env, path::PathBuf};

use clap::{Parser, Subcommand};
use foodgram_core::constants::defaults::DEFAULT_DATABASE_URL;
use foodgram_server::{
    config::environment::ServerConfig,
    database::Database,
    errors::{AppError, AppResult},
};
use tracing::info;

type Result<T> = AppResult<T>;

#[derive(Parser)]
#[command(
    name = "foodgram-cli",
    about = "Foodgram Management CLI",
    long_about = "Command-line tool for loading reference data and administering Foodgram accounts."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Load catalog fixtures from a directory
    LoadData {
        /// Directory holding measurement_units.json, ingredients.json, and tags.json
        #[arg(long, default_value = "./data")]
        dir: PathBuf,
    },

    /// User management commands
    User {
        #[command(subcommand)]
        action: UserCommand,
    },

    /// Ingredient catalog commands
    Ingredient {
        #[command(subcommand)]
        action: IngredientCommand,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum UserCommand {
    /// Create a new account
    Create {
        /// Login email
        #[arg(long)]
        email: String,

        /// Public username
        #[arg(long)]
        username: String,

        /// Password
        #[arg(long)]
        password: String,

        /// Given name (defaults to the username)
        #[arg(long)]
        first_name: Option<String>,

        /// Family name (defaults to the username)
        #[arg(long)]
        last_name: Option<String>,

        /// Create with the admin role
        #[arg(long)]
        admin: bool,
    },

    /// Grant the admin role to an existing account
    Promote {
        /// Login email
        #[arg(long)]
        email: String,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum IngredientCommand {
    /// Delete an ingredient-unit pair; refused while a recipe uses it
    Remove {
        /// Ingredient-unit id
        id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    info!("Foodgram CLI");

    let database_url = cli
        .database_url
        .or_else(|| env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned());

    info!("Connecting to database: {}", database_url);
    let database = Database::new(&database_url, 1).await?;

    match cli.command {
        Command::LoadData { dir } => commands::load_data::run(&database, &dir).await?,
        Command::User { action } => match action {
            UserCommand::Create {
                email,
                username,
                password,
                first_name,
                last_name,
                admin,
            } => {
                let config = ServerConfig::from_env()
                    .map_err(|e| AppError::config(format!("{e:#}")))?;
                commands::user::create(
                    &database,
                    config.auth.bcrypt_cost,
                    commands::user::NewAccount {
                        first_name: first_name.unwrap_or_else(|| username.clone()),
                        last_name: last_name.unwrap_or_else(|| username.clone()),
                        email,
                        username,
                        password,
                        admin,
                    },
                )
                .await?;
            }
            UserCommand::Promote { email } => commands::user::promote(&database, &email).await?,
        },
        Command::Ingredient { action } => match action {
            IngredientCommand::Remove { id } => commands::ingredient::remove(&database, id).await?,
        },
    }

    Ok(())
}
