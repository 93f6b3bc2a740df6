//! Pawcart CLI

use std::{
    io::{self, Write},
    process::ExitCode,
};

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use pawcart::{
    cart::{CartError, CartStore},
    catalog::{Catalog, CatalogError},
    checkout::{Address, CheckoutOutcome, HttpOrderApi},
    config::{CartConfig, ConfigError, LogFormat, LoggingConfig},
    filters::FilterState,
    receipt::{Receipt, ReceiptError},
    storage::FileStorage,
    variants::Listing,
};

#[derive(Debug, Parser)]
#[command(name = "pawcart", about = "Pet shop cart and checkout", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: CartConfig,

    #[command(flatten)]
    logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List catalog products with the variant each would be shown as
    Catalog(CatalogArgs),

    /// Add a product variant to the cart
    Add(AddArgs),

    /// Change the quantity of a cart line
    Update(UpdateArgs),

    /// Remove a cart line
    Remove(RemoveArgs),

    /// Show the cart and its totals
    Show,

    /// Empty the cart
    Clear,

    /// Submit the cart to the order API
    Checkout(CheckoutArgs),
}

#[derive(Debug, Args)]
struct CatalogArgs {
    /// Product type filter; repeat for several
    #[arg(long = "type")]
    product_types: Vec<String>,

    /// Color filter; repeat for several
    #[arg(long = "color")]
    colors: Vec<String>,

    /// Size filter; repeat for several
    #[arg(long = "size")]
    sizes: Vec<String>,

    /// Highest price to show
    #[arg(long)]
    max_price: Option<Decimal>,
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Product id
    product: String,

    /// Variant id
    variant: String,

    /// Units to add
    #[arg(short, long, default_value_t = 1)]
    quantity: u32,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    /// Line number as shown by `show`
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    line: u32,

    /// New quantity
    quantity: String,
}

#[derive(Debug, Args)]
struct RemoveArgs {
    /// Line number as shown by `show`
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    line: u32,
}

#[derive(Debug, Args)]
struct CheckoutArgs {
    /// Delivery address as a JSON object
    #[arg(long)]
    address: String,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    #[error("Invalid address: {0}")]
    Address(#[from] serde_json::Error),

    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Pawcart CLI entry point
#[tokio::main]
async fn main() -> ExitCode {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    init_tracing(&cli.logging);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "command failed");

            #[expect(clippy::print_stderr, reason = "errors are reported to the shopper")]
            {
                eprintln!("{err}");
            }

            ExitCode::FAILURE
        }
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true);

    match logging.log_format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Json => builder.json().with_current_span(true).init(),
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = cli.config;
    let currency = config.currency()?;
    let mut out = io::stdout().lock();

    debug!(command = ?cli.command, "running command");

    match cli.command {
        Commands::Catalog(args) => {
            let catalog = Catalog::from_file(&config.catalog)?;

            write_listings(&mut out, &catalog.listings(&args.filters()), currency)?;
        }
        Commands::Add(args) => {
            let catalog = Catalog::from_file(&config.catalog)?;
            let (product, variant) = catalog.variant(&args.product, &args.variant)?;
            let mut cart = open_cart(&config)?;

            cart.add(product, variant, args.quantity)?;

            Receipt::new(cart.items(), currency).write_to(&mut out)?;
        }
        Commands::Update(args) => {
            let mut cart = open_cart(&config)?;

            cart.update_quantity(line_index(args.line), &args.quantity)?;

            Receipt::new(cart.items(), currency).write_to(&mut out)?;
        }
        Commands::Remove(args) => {
            let mut cart = open_cart(&config)?;

            if let Some(item) = cart.remove_item(line_index(args.line))? {
                writeln!(out, "Removed {}", item.product_name())?;
            }

            Receipt::new(cart.items(), currency).write_to(&mut out)?;
        }
        Commands::Show => {
            let cart = open_cart(&config)?;

            Receipt::new(cart.items(), currency).write_to(&mut out)?;
        }
        Commands::Clear => {
            open_cart(&config)?.clear()?;

            writeln!(out, "Cart cleared")?;
        }
        Commands::Checkout(args) => {
            let address: Address = serde_json::from_str(&args.address)?;
            let order_api = HttpOrderApi::new(config.order_api()?);
            let mut cart = open_cart(&config)?;

            Receipt::new(cart.items(), currency).write_to(&mut out)?;

            match cart.checkout(address, &order_api).await? {
                CheckoutOutcome::Redirect(url) => {
                    writeln!(out, "Continue to payment: {url}")?;
                }
                CheckoutOutcome::Placed { message } => {
                    cart.clear()?;

                    writeln!(out, "{}", message.as_deref().unwrap_or("Order placed"))?;
                }
            }
        }
    }

    Ok(())
}

impl CatalogArgs {
    fn filters(&self) -> FilterState {
        let product_types: Vec<&str> = self.product_types.iter().map(String::as_str).collect();
        let colors: Vec<&str> = self.colors.iter().map(String::as_str).collect();
        let sizes: Vec<&str> = self.sizes.iter().map(String::as_str).collect();

        let filters = FilterState::new()
            .with_product_types(&product_types)
            .with_colors(&colors)
            .with_sizes(&sizes);

        match self.max_price {
            Some(max_price) => filters.with_max_price(max_price),
            None => filters,
        }
    }
}

fn open_cart(config: &CartConfig) -> Result<CartStore<FileStorage>, CartError> {
    CartStore::load_with_key(FileStorage::new(&config.storage_dir), config.cart_key.clone())
}

fn line_index(line: u32) -> usize {
    usize::try_from(line.saturating_sub(1)).unwrap_or(usize::MAX)
}

fn write_listings(
    out: &mut impl Write,
    listings: &[Listing<'_>],
    currency: &'static Currency,
) -> io::Result<()> {
    if listings.is_empty() {
        return writeln!(out, "No products match the selected filters");
    }

    let mut builder = Builder::default();

    builder.push_record(["Product", "Name", "Type", "Variant", "Price", "Stock"]);

    for listing in listings {
        let variant = listing.variant;
        let price = Money::from_decimal(variant.effective_price(), currency);
        let price = if variant.is_on_sale() {
            let regular = Money::from_decimal(variant.regular_price(), currency);
            format!("{price} (was {regular})")
        } else {
            price.to_string()
        };

        builder.push_record([
            listing.product.id.clone(),
            listing.product.name.clone(),
            listing.product.product_type.clone(),
            variant.variant_id().to_string(),
            price,
            variant.stock_quantity().to_string(),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::new(4..6), Alignment::right());

    writeln!(out, "{table}")
}
