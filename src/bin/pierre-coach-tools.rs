// ABOUTME: Command-line host for the coaching tools: print the catalog, call a tool, seed users
// ABOUTME: Stands in for the agent runtime and authentication layer during local testing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Local host for the coaching tool framework.
//!
//! Usage:
//! ```bash
//! # Tools a coach may call
//! cargo run --bin pierre-coach-tools -- catalog --role coach
//!
//! # Seed a user
//! cargo run --bin pierre-coach-tools -- add-user --email coach@example.com --name "Coach" --role coach
//!
//! # Call a tool as that user
//! cargo run --bin pierre-coach-tools -- call --caller <uuid> --role coach \
//!     --tool list_clients --args '{"status": "all"}'
//! ```
//!
//! Tool envelopes and catalogs are printed to stdout as JSON; logs go to stderr.

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use pierre_coaching::config::ServerConfig;
use pierre_coaching::database::Database;
use pierre_coaching::logging;
use pierre_coaching::models::User;
use pierre_coaching::permissions::UserRole;
use pierre_coaching::tools::{ToolCollector, ToolContext, ToolRegistry};

#[derive(Parser)]
#[command(
    name = "pierre-coach-tools",
    about = "Pierre coaching tool host",
    long_about = "Inspect the coaching tool catalog and invoke tools as a given caller. \
                  Configuration comes from environment variables (DATABASE_URL, TOOL_*)."
)]
struct CoachToolsArgs {
    #[command(subcommand)]
    command: CoachToolsCommand,

    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,
}

#[derive(Subcommand)]
enum CoachToolsCommand {
    /// Print the tool catalog as JSON
    Catalog {
        /// Only tools this role may call
        #[arg(long)]
        role: Option<UserRole>,
    },

    /// Invoke one tool and print its response envelope
    Call {
        /// Authenticated caller id
        #[arg(long)]
        caller: Uuid,

        /// Caller's role
        #[arg(long)]
        role: UserRole,

        /// Tool name
        #[arg(long)]
        tool: String,

        /// Arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,

        /// Request id for log correlation
        #[arg(long)]
        request_id: Option<String>,
    },

    /// Create a user row
    AddUser {
        /// Email address (unique)
        #[arg(long)]
        email: String,

        /// Display name
        #[arg(long)]
        name: String,

        /// Role
        #[arg(long)]
        role: UserRole,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_from_env()?;

    let args = CoachToolsArgs::parse();
    let mut config = ServerConfig::from_env()?;
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    match args.command {
        CoachToolsCommand::Catalog { role } => print_catalog(role),
        CoachToolsCommand::Call {
            caller,
            role,
            tool,
            args,
            request_id,
        } => call_tool(&config, caller, role, &tool, &args, request_id).await,
        CoachToolsCommand::AddUser { email, name, role } => {
            add_user(&config, &email, &name, role).await
        }
    }
}

fn print_catalog(role: Option<UserRole>) -> Result<()> {
    let registry = ToolRegistry::with_builtin_tools();
    let catalog = match role {
        Some(role) => registry.schemas_for_role(role),
        None => registry.all_schemas(),
    };
    println!("{}", serde_json::to_string_pretty(&catalog)?);
    Ok(())
}

async fn call_tool(
    config: &ServerConfig,
    caller: Uuid,
    role: UserRole,
    tool: &str,
    raw_args: &str,
    request_id: Option<String>,
) -> Result<()> {
    let arguments: Value =
        serde_json::from_str(raw_args).context("--args must be valid JSON")?;

    let database = Arc::new(open_database(&config.database_url).await?);
    let mut context = ToolContext::new(database, caller, role);
    if let Some(request_id) = request_id {
        context = context.with_request_id(request_id);
    }
    let context = Arc::new(context);

    let registry = ToolRegistry::with_builtin_tools();
    let tools = ToolCollector::from_settings(&config.tools).collect(&context, &registry);

    let response = tokio::time::timeout(config.tools.call_timeout, tools.call(tool, arguments))
        .await
        .map_err(|_| {
            anyhow!(
                "Tool '{tool}' did not finish within {}s",
                config.tools.call_timeout.as_secs()
            )
        })?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn add_user(config: &ServerConfig, email: &str, name: &str, role: UserRole) -> Result<()> {
    let database = open_database(&config.database_url).await?;
    let user = User::new(email, name, role);
    database.create_user(&user).await?;
    info!(user_id = %user.id, role = %role, "User created");
    println!("{}", serde_json::to_string_pretty(&user)?);
    Ok(())
}

async fn open_database(database_url: &str) -> Result<Database> {
    if let Some(parent) = sqlite_file_parent(database_url) {
        debug!(directory = %parent.display(), "Ensuring database directory exists");
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Ok(Database::new(database_url).await?)
}

/// Directory holding a file-backed `SQLite` database, if it needs creating
fn sqlite_file_parent(database_url: &str) -> Option<&Path> {
    if database_url.contains(":memory:") {
        return None;
    }
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next().unwrap_or(path);
    Path::new(path)
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
}
