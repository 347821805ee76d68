//! storecart CLI - Drive the cart service from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Add two units of product 42
//! storecart add -p 42 -q 2
//!
//! # Step a cart line down
//! storecart update -p 42 -a decrement
//!
//! # Remove a line
//! storecart delete -p 42 -a remove
//! ```
//!
//! # Environment Variables
//!
//! - `STORECART_BASE_URL` - Origin of the store (required)
//! - `STORECART_CSRF_TOKEN` - Anti-forgery token for the session (required)
//! - `STORECART_ADD_PATH`, `STORECART_UPDATE_PATH`, `STORECART_DELETE_PATH`
//! - `STORECART_DISPATCH` - `concurrent` (default) or `serialized`
//! - `STORECART_REQUEST_TIMEOUT_SECS`
//! - `STORECART_CURRENCY`
//! - `RUST_LOG` - Log filter (default `storecart=info`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod page;

#[derive(Parser)]
#[command(name = "storecart")]
#[command(author, version, about = "Cart client for storecart shops")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a product to the cart
    Add {
        /// Product id
        #[arg(short, long)]
        product: String,

        /// Quantity, as typed into the quantity input
        #[arg(short, long)]
        qty: Option<String>,
    },
    /// Step a cart line up or down
    Update {
        /// Product id
        #[arg(short, long)]
        product: String,

        /// `increment` or `decrement`
        #[arg(short, long)]
        action: String,
    },
    /// Remove a line from the cart
    Delete {
        /// Product id
        #[arg(short, long)]
        product: String,

        /// Action sent with the delete (usually `remove`)
        #[arg(short, long, default_value = "remove")]
        action: String,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "storecart=info".into());
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    if let Err(e) = run(cli.command).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> Result<(), commands::cart::CartCommandError> {
    let click = match command {
        Commands::Add { product, qty } => commands::cart::Click::Add { product, qty },
        Commands::Update { product, action } => commands::cart::Click::Update { product, action },
        Commands::Delete { product, action } => commands::cart::Click::Delete { product, action },
    };
    commands::cart::run(click).await
}
