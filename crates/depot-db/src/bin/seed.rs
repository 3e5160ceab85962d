//! # Seed Data Generator
//!
//! Populates the database with a small demo fulfilment network.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p depot-db --bin seed
//!
//! # Specify database path
//! cargo run -p depot-db --bin seed -- --db ./data/depot.db
//! ```
//!
//! ## Generated Data
//! - 3 maintenance warehouses spread over the location table
//! - 5 catalog products
//! - 3 retail stores
//! - A handful of starter associations, all well inside the ceilings
//!
//! The seed is idempotent: if the database already contains warehouses it
//! leaves everything untouched.

use std::env;

use chrono::Utc;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use depot_core::WarehouseDraft;
use depot_db::{Database, DbConfig};

/// Demo warehouses: (business unit code, location, capacity, stock).
const WAREHOUSES: &[(&str, &str, i64, i64)] = &[
    ("MWH.001", "ZWOLLE-001", 40, 30),
    ("MWH.012", "AMSTERDAM-001", 100, 75),
    ("MWH.023", "TILBURG-001", 60, 45),
];

/// Demo products: (name, description, price in cents).
const PRODUCTS: &[(&str, Option<&str>, i64)] = &[
    ("TONSTAD desk", Some("Adjustable office desk, oak veneer"), 24900),
    ("KALLAX shelf", Some("4x4 shelving unit, white"), 8999),
    ("BESTA cabinet", Some("Wall-mounted media cabinet"), 14900),
    ("MALM bed frame", None, 19900),
    ("PAX wardrobe", Some("Two-door wardrobe with mirror"), 49900),
];

/// Demo stores: (name, products currently in stock).
const STORES: &[(&str, i64)] = &[
    ("Amsterdam Centrum", 12),
    ("Utrecht Oost", 8),
    ("Rotterdam Zuid", 0),
];

/// Starter associations: (warehouse code, product index, store index).
///
/// Indices refer to the PRODUCTS and STORES tables above, which on a fresh
/// database receive ids 1..=N in order.
const ASSOCIATIONS: &[(&str, usize, usize)] = &[
    ("MWH.001", 0, 0),
    ("MWH.001", 1, 0),
    ("MWH.012", 0, 1),
    ("MWH.023", 2, 2),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .init();

    let mut db_path = String::from("./depot_dev.db");

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" | "-d" => {
                if let Some(path) = args.next() {
                    db_path = path;
                }
            }
            "--help" | "-h" => {
                println!("Depot seed data generator");
                println!();
                println!("Usage: seed [--db <PATH>]");
                println!();
                println!("  -d, --db <PATH>    Database file (default: ./depot_dev.db)");
                println!("  -h, --help         Print this help");
                return Ok(());
            }
            unknown => {
                eprintln!("Unknown argument: {unknown} (try --help)");
                std::process::exit(2);
            }
        }
    }

    println!("🌱 Depot Seed Data Generator");
    println!("============================");
    println!("Database: {db_path}");
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected, schema up to date");

    // Never stack a second seed on top of real data
    let existing = db.warehouses().count_all().await?;
    if existing > 0 {
        println!("⚠ Database already holds {existing} warehouse rows, nothing to do.");
        println!("  Remove the file to reseed from scratch.");
        return Ok(());
    }

    println!();
    println!("Seeding warehouses...");

    let now = Utc::now();
    for (code, location, capacity, stock) in WAREHOUSES {
        let draft = WarehouseDraft {
            business_unit_code: code.to_string(),
            location: location.to_string(),
            capacity: *capacity,
            stock: *stock,
        };
        db.warehouses().insert(&draft, now).await?;
        println!("  {} @ {} (capacity {}, stock {})", code, location, capacity, stock);
    }

    println!();
    println!("Seeding products...");

    let mut product_ids = Vec::with_capacity(PRODUCTS.len());
    for (name, description, price_cents) in PRODUCTS {
        let product = db.products().insert(name, *description, *price_cents).await?;
        product_ids.push(product.id);
        println!("  #{} {}", product.id, name);
    }

    println!();
    println!("Seeding stores...");

    let mut store_ids = Vec::with_capacity(STORES.len());
    for (name, in_stock) in STORES {
        let store = db.stores().insert(name, *in_stock).await?;
        store_ids.push(store.id);
        println!("  #{} {}", store.id, name);
    }

    println!();
    println!("Seeding associations...");

    for (code, product_idx, store_idx) in ASSOCIATIONS {
        db.associations()
            .insert(code, product_ids[*product_idx], store_ids[*store_idx], now)
            .await?;
    }
    println!("  {} links created", ASSOCIATIONS.len());

    println!();
    println!("✓ Seed complete!");
    println!(
        "  {} warehouses, {} products, {} stores, {} associations",
        WAREHOUSES.len(),
        PRODUCTS.len(),
        STORES.len(),
        ASSOCIATIONS.len()
    );

    Ok(())
}
