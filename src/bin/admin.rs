//! CLI administration tool for slug-redirector.
//!
//! Manages redirects and reads hit statistics directly against the PostgreSQL
//! store, without going through the HTTP management API.
//!
//! # Usage
//!
//! ```bash
//! # Add a literal redirect
//! cargo run --bin admin -- redirect add docs https://example.com/docs
//!
//! # Add a pattern redirect with a temporary (302) status
//! cargo run --bin admin -- redirect add '^gh/(.+)$' 'https://github.com/$1' --regex --temporary
//!
//! # Change the destination of an existing redirect
//! cargo run --bin admin -- redirect update docs --url https://docs.example.com
//!
//! # List and remove
//! cargo run --bin admin -- redirect list
//! cargo run --bin admin -- redirect remove docs
//!
//! # View hit counters
//! cargo run --bin admin -- stats
//!
//! # Compute the session credential for a password
//! cargo run --bin admin -- hash-password
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required except for `hash-password`): PostgreSQL connection string

use slug_redirector::application::services::hash_password;
use slug_redirector::domain::entities::RedirectFields;
use slug_redirector::state::SharedStore;
use slug_redirector::{config, server};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Password};
use sqlx::PgPool;

/// CLI tool for managing slug-redirector.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage redirects
    Redirect {
        #[command(subcommand)]
        action: RedirectAction,
    },

    /// Show hit counters
    Stats,

    /// Print the session credential (auth cookie / Bearer value) for a password
    HashPassword {
        /// Password to hash (prompted if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Redirect management subcommands.
#[derive(Subcommand)]
enum RedirectAction {
    /// Add a redirect
    Add {
        /// Slug, or a regular expression with --regex
        slug: String,

        /// Absolute destination URL; may contain $1, $2, ... with --regex
        url: String,

        /// Answer with 302 instead of 301
        #[arg(long)]
        temporary: bool,

        /// Treat the slug as a regular expression
        #[arg(long)]
        regex: bool,
    },

    /// Change fields of an existing redirect
    Update {
        slug: String,

        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        permanent: Option<bool>,

        #[arg(long)]
        regex: Option<bool>,
    },

    /// Remove a redirect and its hit counter
    Remove {
        slug: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all redirects in resolution order
    List,
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::HashPassword { password } => handle_hash_password(password)?,
        Commands::Redirect { action } => {
            let store = server::pg_store(connect().await?);
            handle_redirect_action(action, &store).await?
        }
        Commands::Stats => handle_stats(&server::pg_store(connect().await?)).await?,
        Commands::Db { action } => handle_db_action(action, &connect().await?).await?,
    }

    Ok(())
}

/// Connects to `DATABASE_URL` and applies pending migrations.
async fn connect() -> Result<PgPool> {
    let config = config::Config::from_env()?;
    let database_url = config
        .database_url
        .clone()
        .context("DATABASE_URL must be set")?;

    server::connect_database(&config, &database_url).await
}

/// Dispatches redirect management commands.
async fn handle_redirect_action(action: RedirectAction, store: &SharedStore) -> Result<()> {
    match action {
        RedirectAction::Add {
            slug,
            url,
            temporary,
            regex,
        } => {
            let fields = RedirectFields::to(url)
                .permanent(!temporary)
                .allow_regex(regex);
            let redirect = store
                .add(&slug, fields)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to add redirect: {}", e))?;

            println!("{}", "✅ Redirect added".green().bold());
            print_redirect(&slug, &redirect.url, redirect.permanent, redirect.allow_regex);
        }
        RedirectAction::Update {
            slug,
            url,
            permanent,
            regex,
        } => {
            let patch = RedirectFields {
                url,
                permanent,
                allow_regex: regex,
            };
            let redirect = store
                .update(&slug, patch)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to update redirect: {}", e))?;

            println!("{}", "✅ Redirect updated".green().bold());
            print_redirect(&slug, &redirect.url, redirect.permanent, redirect.allow_regex);
        }
        RedirectAction::Remove { slug, yes } => remove_redirect(store, slug, yes).await?,
        RedirectAction::List => list_redirects(store).await?,
    }

    Ok(())
}

fn print_redirect(slug: &str, url: &str, permanent: bool, allow_regex: bool) {
    println!();
    println!("  Slug:   {}", slug.cyan());
    println!("  URL:    {}", url.bright_white());
    println!(
        "  Status: {}",
        (if permanent { "301" } else { "302" }).bright_black()
    );
    if allow_regex {
        println!("  Type:   {}", "pattern".yellow());
    }
    println!();
}

/// Removes a redirect after confirmation.
///
/// # Safety
///
/// - Requires confirmation (default: No) unless `--yes`
/// - The hit counter is removed with the record
async fn remove_redirect(store: &SharedStore, slug: String, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑  Remove Redirect".bright_blue().bold());
    println!();

    let redirect = store
        .get(&slug)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("Redirect not found")?;
    let hits = store
        .hits(&slug)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    println!("  Slug: {}", slug.cyan());
    println!("  URL:  {}", redirect.url.bright_white());
    println!("  Hits: {}", hits.to_string().bright_black());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Remove this redirect and its hit counter?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    store
        .delete(&slug)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to remove redirect: {}", e))?;

    println!("{}", "✅ Redirect removed".green().bold());
    println!();

    Ok(())
}

/// Lists all redirects in insertion order, which is also pattern resolution order.
///
/// # Output Format
///
/// ```text
/// 📋 Redirects
///
///   Slug                           Status  Destination
///   ─────────────────────────────────────────────────────────────────────────
///   docs                           301     https://example.com/docs
///   ^gh/(.+)$                      302 re  https://github.com/$1
/// ```
async fn list_redirects(store: &SharedStore) -> Result<()> {
    println!("{}", "📋 Redirects".bright_blue().bold());
    println!();

    let redirects = store
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list redirects: {}", e))?;

    if redirects.is_empty() {
        println!("{}", "  No redirects found".yellow());
        println!();
        println!(
            "  Add one with: {} admin redirect add <slug> <url>",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<30} {:<7} {}",
        "Slug".bright_white().bold(),
        "Status".bright_white().bold(),
        "Destination".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for entry in &redirects {
        let status = match (entry.redirect.permanent, entry.redirect.allow_regex) {
            (true, false) => "301".green(),
            (false, false) => "302".green(),
            (true, true) => "301 re".yellow(),
            (false, true) => "302 re".yellow(),
        };

        println!(
            "  {:<30} {:<7} {}",
            entry.key.cyan(),
            status,
            entry.redirect.url
        );
    }

    println!();
    println!(
        "  Total: {}",
        redirects.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Displays hit counters, busiest first.
async fn handle_stats(store: &SharedStore) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let stats = store
        .stats()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load statistics: {}", e))?;

    if stats.is_empty() {
        println!("{}", "  No hits recorded".yellow());
        println!();
        return Ok(());
    }

    let mut rows: Vec<(String, u64)> = stats.into_iter().collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let total: u64 = rows.iter().map(|(_, count)| count).sum();

    for (key, count) in &rows {
        println!(
            "  {:<40} {}",
            key.cyan(),
            count.to_string().bright_green().bold()
        );
    }

    println!();
    println!("  Total hits: {}", total.to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Prints the credential a browser stores in the `auth` cookie after login.
///
/// Useful for scripting the management API with `Authorization: Bearer`.
fn handle_hash_password(password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => Password::new().with_prompt("Password").interact()?,
    };

    if password.is_empty() {
        anyhow::bail!("Password must not be empty");
    }

    println!("{}", hash_password(&password).bright_yellow());
    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            let redirects: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM redirects")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Redirects:  {}", redirects.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}
