//! CLI administration tool for shortlink.
//!
//! Manages owners and their API tokens, shows link statistics, and checks the
//! database without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Register an owner
//! cargo run --bin admin -- owner create --username alice --email alice@example.com
//!
//! # Issue a token for them
//! cargo run --bin admin -- token create --owner alice --name laptop
//!
//! # List and revoke tokens
//! cargo run --bin admin -- token list
//! cargo run --bin admin -- token revoke laptop
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_*` components (required)
//! - `TOKEN_SIGNING_SECRET` (required for `token create`), same value as the server

use shortlink::application::services::hash_token;
use shortlink::config::{Config, mask_connection_string};
use shortlink::domain::entities::{NewOwner, Owner};
use shortlink::domain::repositories::OwnerRepository;
use shortlink::infrastructure::persistence::PgOwnerRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing shortlink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage link owners
    Owner {
        #[command(subcommand)]
        action: OwnerAction,
    },

    /// Manage API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum OwnerAction {
    /// Register a new owner
    Create {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,
    },

    /// List all owners
    List,
}

#[derive(Subcommand)]
enum TokenAction {
    /// Issue a new API token for an owner
    Create {
        /// Owner id or username
        #[arg(short, long)]
        owner: String,

        /// Token name (e.g., "laptop", "CI")
        #[arg(short, long)]
        name: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all tokens
    List,

    /// Revoke a token
    Revoke {
        /// Token name or ID to revoke
        name_or_id: String,
    },
}

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

    let database_url = Config::load_database_url()?;
    let pool = PgPool::connect(&database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database at {}",
                mask_connection_string(&database_url)
            )
        })?;

    let repo: Arc<dyn OwnerRepository> = Arc::new(PgOwnerRepository::new(Arc::new(pool.clone())));

    match cli.command {
        Commands::Owner { action } => handle_owner_action(action, repo).await?,
        Commands::Token { action } => handle_token_action(action, repo).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_owner_action(action: OwnerAction, repo: Arc<dyn OwnerRepository>) -> Result<()> {
    match action {
        OwnerAction::Create { username, email } => {
            let owner = repo
                .create_owner(NewOwner { username, email })
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create owner: {}", e))?;

            println!("{}", "✅ Owner created".green().bold());
            println!("  ID:       {}", owner.id.to_string().bright_white());
            println!("  Username: {}", owner.username.cyan());
            println!("  Email:    {}", owner.email);
            println!();
            println!(
                "  Issue a token with: {} admin -- token create --owner {}",
                "cargo run --bin".bright_cyan(),
                owner.username
            );
        }
        OwnerAction::List => {
            let owners = repo
                .list_owners()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to list owners: {}", e))?;

            println!("{}", "👤 Owners".bright_blue().bold());
            println!();

            if owners.is_empty() {
                println!("{}", "  No owners found".yellow());
                return Ok(());
            }

            println!(
                "  {:<5} {:<24} {:<32} {:<16}",
                "ID".bright_white().bold(),
                "Username".bright_white().bold(),
                "Email".bright_white().bold(),
                "Created".bright_white().bold()
            );
            println!("  {}", "─".repeat(80).bright_black());

            for owner in &owners {
                println!(
                    "  {:<5} {:<24} {:<32} {}",
                    owner.id.to_string().bright_black(),
                    owner.username.cyan(),
                    owner.email,
                    owner
                        .created_at
                        .format("%Y-%m-%d %H:%M")
                        .to_string()
                        .bright_black()
                );
            }
            println!();
        }
    }

    Ok(())
}

async fn handle_token_action(action: TokenAction, repo: Arc<dyn OwnerRepository>) -> Result<()> {
    match action {
        TokenAction::Create { owner, name, yes } => create_token(repo, owner, name, yes).await?,
        TokenAction::List => list_tokens(repo).await?,
        TokenAction::Revoke { name_or_id } => revoke_token(repo, name_or_id).await?,
    }

    Ok(())
}

/// Looks an owner up by numeric id, falling back to username.
async fn find_owner(repo: &dyn OwnerRepository, owner: &str) -> Result<Owner> {
    let found = match owner.parse::<i64>() {
        Ok(id) => repo.find_owner_by_id(id).await,
        Err(_) => repo.find_owner_by_username(owner).await,
    }
    .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    found.with_context(|| format!("Owner '{}' not found", owner))
}

/// Issues a token for an owner.
///
/// Only the HMAC-SHA256 digest (keyed by `TOKEN_SIGNING_SECRET`) is stored. The raw
/// token is printed once.
async fn create_token(
    repo: Arc<dyn OwnerRepository>,
    owner: String,
    name: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    let secret = std::env::var("TOKEN_SIGNING_SECRET")
        .context("TOKEN_SIGNING_SECRET must be set to issue tokens")?;
    if secret.is_empty() {
        anyhow::bail!("TOKEN_SIGNING_SECRET must not be empty");
    }

    let owner = find_owner(repo.as_ref(), &owner).await?;

    println!("{}", "🔑 Create API Token".bright_blue().bold());
    println!();

    let token_name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Token name")
            .with_initial_text("default")
            .interact_text()?,
    };

    let token_value = generate_token();

    println!("{}", "Token details:".bright_white().bold());
    println!("  Owner: {} (id {})", owner.username.cyan(), owner.id);
    println!("  Name:  {}", token_name.cyan());
    println!("  Token: {}", token_value.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "⚠️  Save this token now. It cannot be shown again."
            .red()
            .bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this token?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let token_hash = hash_token(&secret, &token_value);

    repo.create_token(owner.id, &token_name, &token_hash)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create token: {}", e))?;

    println!("{}", "✅ Token created".green().bold());
    println!();
    println!("{}", "Example:".bright_white());
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/links",
        token_value.bright_yellow()
    );
    println!();

    Ok(())
}

async fn list_tokens(repo: Arc<dyn OwnerRepository>) -> Result<()> {
    println!("{}", "📋 API Tokens".bright_blue().bold());
    println!();

    let tokens = repo
        .list_tokens()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list tokens: {}", e))?;

    if tokens.is_empty() {
        println!("{}", "  No tokens found".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<7} {:<24} {:<18} {:<18} {:<8}",
        "ID".bright_white().bold(),
        "Owner".bright_white().bold(),
        "Name".bright_white().bold(),
        "Created".bright_white().bold(),
        "Last used".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(85).bright_black());

    for token in &tokens {
        let status = if token.is_revoked() {
            "REVOKED".red()
        } else {
            "ACTIVE".green()
        };
        let last_used = token
            .last_used_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());

        println!(
            "  {:<5} {:<7} {:<24} {:<18} {:<18} {}",
            token.id.to_string().bright_black(),
            token.owner_id,
            token.name.cyan(),
            token.created_at.format("%Y-%m-%d %H:%M").to_string(),
            last_used.bright_black(),
            status
        );
    }

    println!();
    println!(
        "  Total: {}",
        tokens.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Revokes a token by id or name. Numeric input is treated as an id.
async fn revoke_token(repo: Arc<dyn OwnerRepository>, name_or_id: String) -> Result<()> {
    println!("{}", "🔒 Revoke API Token".bright_blue().bold());
    println!();

    let token = match name_or_id.parse::<i64>() {
        Ok(id) => repo.find_token_by_id(id).await,
        Err(_) => repo.find_token_by_name(&name_or_id).await,
    }
    .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
    .context("Token not found")?;

    if token.is_revoked() {
        println!("{}", "⚠️  This token is already revoked".yellow());
        return Ok(());
    }

    println!("  Token: {}", token.name.cyan());
    println!("  ID:    {}", token.id.to_string().bright_black());
    println!();

    let confirmed = Confirm::new()
        .with_prompt("Revoke this token?")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    repo.revoke_token(token.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke token: {}", e))?;

    println!("{}", "✅ Token revoked".green().bold());
    println!();

    Ok(())
}

/// Link counts, total redirects, owners and active tokens.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let (total, active, accesses): (i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT COUNT(*),
               COUNT(*) FILTER (WHERE deleted_at IS NULL),
               COALESCE(SUM(access_count), 0)::BIGINT
        FROM links
        "#,
    )
    .fetch_one(pool)
    .await?;

    let owners: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM owners")
        .fetch_one(pool)
        .await?;

    let tokens: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM api_tokens WHERE revoked_at IS NULL")
            .fetch_one(pool)
            .await?;

    println!("  Links:         {}", total.to_string().bright_green().bold());
    println!("    active:      {}", active.to_string().green());
    println!("    deleted:     {}", (total - active).to_string().bright_black());
    println!("  Redirects:     {}", accesses.to_string().bright_green().bold());
    println!("  Owners:        {}", owners.to_string().bright_green().bold());
    println!("  Active tokens: {}", tokens.to_string().bright_green().bold());
    println!();

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}

/// Generates a random 48-character alphanumeric token.
fn generate_token() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const TOKEN_LEN: usize = 48;

    let mut rng = rand::rng();

    (0..TOKEN_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}
