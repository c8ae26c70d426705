//! Panier CLI - drives the cart widget engine from a terminal.
//!
//! Every command builds the configured backend adapter, runs one engine
//! operation, and renders the resulting region updates to stdout. Useful for
//! poking at a cart backend without a browser page.
//!
//! # Usage
//!
//! ```bash
//! # Show the current cart (initial full load)
//! panier show
//!
//! # Add a product, price as a human decimal string
//! panier add -p bread-01 -n "Pain de campagne" --price 4,50 -q 2
//!
//! # Remove a line (snapshot flavor only)
//! panier remove -p bread-01
//! ```
//!
//! Configuration comes from the environment (see `panier_widget::config`),
//! loaded through a `.env` file when present. An anti-forgery token can be
//! supplied via `PANIER_CSRF_TOKEN`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use clap::{Parser, Subcommand};

use panier_widget::api::CartBackend;
use panier_widget::config::WidgetConfig;
use panier_widget::engine::{CartWidget, QuickAddForm};
use panier_widget::token::{FixedToken, NoToken, TokenProvider};

mod term;

use term::TermPage;

#[derive(Parser)]
#[command(name = "panier")]
#[command(author, version, about = "Panier cart widget CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the cart and render its regions
    Show,
    /// Add a product to the cart
    Add {
        /// Product identifier
        #[arg(short, long)]
        product_id: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Price as a decimal display string ("4,50" or "4.50")
        #[arg(long)]
        price: String,

        /// Quantity (defaults to 1)
        #[arg(short, long)]
        quantity: Option<u32>,
    },
    /// Remove a line from the cart
    Remove {
        /// Product identifier
        #[arg(short, long)]
        product_id: String,
    },
}

#[tokio::main]
async fn main() {
    // Pick up a local .env before reading configuration
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = WidgetConfig::from_env()?;

    let token: Arc<dyn TokenProvider> = match std::env::var("PANIER_CSRF_TOKEN") {
        Ok(token) => Arc::new(FixedToken(token)),
        Err(_) => Arc::new(NoToken),
    };

    let api = CartBackend::from_config(&config, token)?;
    let page = Arc::new(TermPage::new());
    let widget = CartWidget::new(api, Arc::clone(&page) as _, config.timings);

    match cli.command {
        Commands::Show => widget.init().await,
        Commands::Add {
            product_id,
            name,
            price,
            quantity,
        } => {
            widget
                .quick_add(QuickAddForm {
                    product_id,
                    name,
                    price,
                    quantity,
                })
                .await;
        }
        Commands::Remove { product_id } => widget.remove_from_cart(&product_id).await,
    }

    page.print_regions();
    widget.dispose();
    Ok(())
}
