//! Garval CLI - Inspect and edit the persisted cart, and check it out.
//!
//! # Usage
//!
//! ```bash
//! # Add two bottles to the cart
//! garval add --id ACE-500 --name "Aceite 500ml" --price 12.50 --image files/aceite.jpg -q 2
//!
//! # Show the cart and its total
//! garval list
//! garval total
//!
//! # Change or remove an entry
//! garval update ACE-500 3
//! garval remove ACE-500
//!
//! # Submit the cart as an order
//! garval checkout --name "Lucía Pérez" --email lucia@example.com --address "Calle Mayor 1" --city Toledo
//! ```
//!
//! Configuration comes from the environment (see `garval_cart::config`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::{self, Write};

use clap::{Parser, Subcommand};
use garval_cart::{CART_STORAGE_KEY, CartConfig, CartStore, CustomerInfo, FileStorage};
use garval_core::{Price, ProductId};

mod commands;

#[derive(Parser)]
#[command(name = "garval")]
#[command(author, version, about = "Garval storefront cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a product to the cart
    Add {
        /// Product id
        #[arg(long)]
        id: ProductId,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Unit price, e.g. 12.50
        #[arg(short, long)]
        price: Price,

        /// Image URL or site-relative path
        #[arg(short, long)]
        image: Option<String>,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product from the cart
    Remove {
        /// Product id
        id: String,
    },
    /// Set the quantity of a product already in the cart
    Update {
        /// Product id
        id: String,

        /// New quantity (values below 1 become 1)
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// List cart contents
    List,
    /// Print the cart total
    Total,
    /// Print the number of units in the cart
    Count,
    /// Empty the cart
    Clear,
    /// Submit the cart as an order
    Checkout {
        /// Customer full name
        #[arg(short, long)]
        name: String,

        /// Customer email
        #[arg(short, long)]
        email: String,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        address: Option<String>,

        #[arg(long)]
        city: Option<String>,

        #[arg(long)]
        postal_code: Option<String>,

        #[arg(long)]
        country: Option<String>,

        /// Payment gateway name
        #[arg(long)]
        payment_method: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "garval=info,garval_cart=info".into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = CartConfig::from_env()?;
    let storage = FileStorage::new(&config.cart_dir, CART_STORAGE_KEY);
    tracing::debug!(path = %storage.path().display(), "Using cart file");

    let mut cart =
        CartStore::open(Box::new(storage), config.origin.clone()).with_locale(config.locale);
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Add {
            id,
            name,
            price,
            image,
            quantity,
        } => {
            commands::cart::add(&mut cart, id, name, price, image, quantity, &mut out)?;
        }
        Commands::Remove { id } => commands::cart::remove(&mut cart, &id, &mut out)?,
        Commands::Update { id, quantity } => {
            commands::cart::update(&mut cart, &id, quantity, &mut out)?;
        }
        Commands::List => commands::cart::list(&cart, config.currency, &mut out)?,
        Commands::Total => commands::cart::total(&cart, config.currency, &mut out)?,
        Commands::Count => writeln!(out, "{}", cart.count())?,
        Commands::Clear => commands::cart::clear(&mut cart, &mut out)?,
        Commands::Checkout {
            name,
            email,
            phone,
            address,
            city,
            postal_code,
            country,
            payment_method,
        } => {
            let customer = CustomerInfo {
                full_name: name,
                email,
                phone,
                address,
                city,
                postal_code,
                country,
                payment_method,
                selected_address: None,
            };
            commands::checkout::run(&mut cart, &config, customer, &mut out).await?;
        }
    }

    Ok(())
}
