//! # Seed Data Generator
//!
//! Populates the database with products for development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 products (default)
//! cargo run -p stockroom-db --bin seed
//!
//! # Generate custom amount into a specific file
//! cargo run -p stockroom-db --bin seed -- --count 1000 --db ./data/stockroom.db
//! ```
//!
//! Each product gets a unique name `{Family} {Variant} #{index}` and a stock
//! level between 0 and 100.

use std::env;

use stockroom_core::Product;
use stockroom_db::{Database, DbConfig};

const FAMILIES: &[&str] = &[
    "Widget", "Gadget", "Sprocket", "Gizmo", "Bracket", "Flange", "Spindle", "Coupler",
];

const VARIANTS: &[&str] = &["Small", "Medium", "Large", "Steel", "Brass"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./stockroom_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if let Some(value) = args.get(i + 1) {
                    count = value.parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if let Some(value) = args.get(i + 1) {
                    db_path = value.clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Stockroom Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./stockroom_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Stockroom Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database, migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicate names.");
        return Ok(());
    }

    let start = std::time::Instant::now();
    let mut generated = 0;

    for seed in 0..count {
        let product = generate_product(seed);
        if let Err(e) = db.products().insert(&product).await {
            eprintln!("Failed to insert {}: {}", product.name, e);
            continue;
        }
        generated += 1;
    }

    println!("✓ Generated {} products in {:?}", generated, start.elapsed());
    Ok(())
}

/// Builds one product with a deterministic name and stock level.
fn generate_product(seed: usize) -> Product {
    let family = FAMILIES[seed % FAMILIES.len()];
    let variant = VARIANTS[(seed / FAMILIES.len()) % VARIANTS.len()];
    let quantity = ((seed * 37) % 101) as i64;

    Product::new(format!("{} {} #{}", family, variant, seed), quantity)
}
