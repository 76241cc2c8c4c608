//! Clearspring CLI - Database migrations and staff management.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! clearspring-cli migrate
//!
//! # Create the staff accounts configured in the environment
//! clearspring-cli staff seed
//!
//! # Create a single staff account
//! clearspring-cli staff create -u mgr2 -p 'correct horse' -r manager
//!
//! # List staff accounts
//! clearspring-cli staff list
//!
//! # List orders, optionally for one customer
//! clearspring-cli orders list --phone 555-1234
//! ```
//!
//! All commands read the database location from `CLEARSPRING_DATABASE_URL`
//! (or `DATABASE_URL`), the same as the web server.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use secrecy::SecretString;

mod commands;

#[derive(Parser)]
#[command(name = "clearspring-cli")]
#[command(author, version, about = "Clearspring CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage staff accounts
    Staff {
        #[command(subcommand)]
        action: StaffAction,
    },
    /// Inspect orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
}

#[derive(Subcommand)]
enum StaffAction {
    /// Create the accounts configured via `ADMIN_*` / `MANAGER_*`
    Seed,
    /// Create a new staff account
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Login password
        #[arg(short, long)]
        password: String,

        /// Staff role (`admin` or `manager`)
        #[arg(short, long, default_value = "manager")]
        role: String,
    },
    /// List staff accounts
    List,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List orders, newest first
    List {
        /// Only orders placed under this phone number
        #[arg(long)]
        phone: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Staff { action } => match action {
            StaffAction::Seed => commands::staff::seed().await?,
            StaffAction::Create {
                username,
                password,
                role,
            } => {
                commands::staff::create(&username, &SecretString::from(password), &role).await?;
            }
            StaffAction::List => commands::staff::list().await?,
        },
        Commands::Orders { action } => match action {
            OrdersAction::List { phone } => commands::orders::list(phone.as_deref()).await?,
        },
    }
    Ok(())
}
