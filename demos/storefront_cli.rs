//! Command-line interface for the storefront core

use libcloudbite::{
    api::identity::StaticIdentity,
    core::{catalog::CatalogIndex, types::PaymentMethod},
    AddressRecord, CatalogItem, CheckoutGate, ItemId, StoreConfig, Storefront,
};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CloudBite storefront CLI
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Path to the menu JSON file
    #[clap(short, long, default_value = "data/menu.json")]
    menu: PathBuf,

    /// Optional path to a JSON config file
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Subcommands
    #[clap(subcommand)]
    command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
enum Commands {
    /// List menu categories
    Categories,
    /// List the items of one category
    Browse {
        /// Category id (defaults to the configured category)
        #[clap(short, long)]
        category: Option<String>,
    },
    /// Fuzzy search item names and descriptions
    Search {
        /// Query text
        query: String,
    },
    /// Price a cart without checking out
    Quote {
        /// Cart entries as ITEM_ID:QTY, repeatable
        #[clap(short = 'a', long = "add", required = true)]
        items: Vec<String>,
    },
    /// Build a cart and run the whole checkout
    Order {
        /// Cart entries as ITEM_ID:QTY, repeatable
        #[clap(short = 'a', long = "add", required = true)]
        items: Vec<String>,
        /// Full delivery address
        #[clap(long)]
        address: String,
        /// Optional landmark
        #[clap(long)]
        landmark: Option<String>,
        /// Contact phone number
        #[clap(long)]
        phone: String,
        /// Payment method (cod, upi or card)
        #[clap(long, default_value = "cod")]
        payment: String,
        /// Signed-in user; omit to check out anonymously
        #[clap(long)]
        user: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => StoreConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => StoreConfig::default(),
    };
    let menu = std::fs::read_to_string(&cli.menu)
        .with_context(|| format!("Failed to read menu {}", cli.menu.display()))?;
    let catalog = CatalogIndex::from_json(&menu).context("Failed to parse menu")?;

    match cli.command {
        Commands::Categories => {
            for category in catalog.categories() {
                let count = catalog.by_category(&category.id).len();
                println!(
                    "{} {:<10} {:<12} {} items - {}",
                    category.icon, category.id, category.name, count, category.description
                );
            }
        }
        Commands::Browse { category } => {
            let category = category.unwrap_or_else(|| config.default_category.clone());
            let items = catalog.by_category(&category);
            if items.is_empty() {
                println!("No items in category {}", category);
            }
            for item in items {
                print_item(item);
            }
        }
        Commands::Search { query } => {
            let hits = catalog.search_scored(&query);
            println!("Search Results for \"{}\" ({} items)", query, hits.len());
            for hit in hits {
                print!("[{:.2}] ", hit.score);
                print_item(hit.item);
            }
        }
        Commands::Quote { items } => {
            let mut storefront = Storefront::with_simulated_placer(
                config,
                catalog,
                Box::new(StaticIdentity::anonymous()),
            )?;
            fill_cart(&mut storefront, &items)?;
            print_totals(&storefront);
        }
        Commands::Order {
            items,
            address,
            landmark,
            phone,
            payment,
            user,
        } => {
            let identity = match user {
                Some(user) => StaticIdentity::signed_in(user),
                None => StaticIdentity::anonymous(),
            };
            let method = PaymentMethod::from_str(&payment)
                .ok_or_else(|| anyhow!("Unknown payment method: {}", payment))?;

            let mut storefront =
                Storefront::with_simulated_placer(config, catalog, Box::new(identity))?;
            fill_cart(&mut storefront, &items)?;
            print_totals(&storefront);

            match storefront.request_checkout() {
                CheckoutGate::Opened => {}
                CheckoutGate::SignInRequired => bail!("Login to checkout (pass --user)"),
                CheckoutGate::EmptyCart => bail!("Cart is empty"),
            }

            let mut record = AddressRecord::new(address, phone);
            if let Some(landmark) = landmark {
                record = record.with_landmark(landmark);
            }
            storefront.submit_address(record)?;
            storefront.select_payment_method(method)?;

            println!("Placing order ({})...", method.label());
            storefront.place_order().await?;

            let receipt = storefront
                .close_checkout()
                .ok_or_else(|| anyhow!("Checkout did not complete"))?;
            println!("Order placed! id {} total ₹{}", receipt.order_id, receipt.total);
        }
    }

    Ok(())
}

/// Parses ITEM_ID:QTY entries into the storefront's cart
fn fill_cart(storefront: &mut Storefront, entries: &[String]) -> Result<()> {
    for entry in entries {
        let (id, qty) = match entry.split_once(':') {
            Some((id, qty)) => (id, qty),
            None => (entry.as_str(), "1"),
        };
        let id: ItemId = id
            .trim()
            .parse()
            .with_context(|| format!("Invalid item id in {:?}", entry))?;
        let qty: u32 = qty
            .trim()
            .parse()
            .with_context(|| format!("Invalid quantity in {:?}", entry))?;

        if !storefront.add_to_cart(id, qty.max(1)) {
            bail!("No item with id {}", id);
        }
    }
    Ok(())
}

fn print_item(item: &CatalogItem) {
    println!(
        "#{:<3} {:<30} ₹{:<5} {:.1}★ {:<10} {}{}",
        item.id,
        item.name,
        item.price,
        item.rating,
        item.prep_time,
        if item.is_veg { "Veg" } else { "Non-Veg" },
        if item.is_best_seller { " (Best Seller)" } else { "" }
    );
}

fn print_totals(storefront: &Storefront) {
    let snapshot = storefront.cart_snapshot();
    for line in &snapshot.lines {
        println!(
            "{} x{}  ₹{}",
            line.item.name,
            line.quantity,
            line.line_total()
        );
    }
    println!("Subtotal      ₹{}", snapshot.subtotal);
    if snapshot.has_free_delivery() {
        println!("Delivery Fee  FREE");
    } else {
        println!("Delivery Fee  ₹{}", snapshot.delivery_fee);
        println!(
            "Add ₹{} more for free delivery!",
            snapshot.amount_to_free_delivery
        );
    }
    println!("Total         ₹{}", snapshot.total);
}
