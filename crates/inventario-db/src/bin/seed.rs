//! # Seed Data Generator
//!
//! Populates the database with products for development, so the infinite
//! scroll has more than one page to load.
//!
//! ## Usage
//! ```bash
//! # Generate 200 products (default)
//! cargo run -p inventario-db --bin seed
//!
//! # Generate custom amount into a specific file
//! cargo run -p inventario-db --bin seed -- --count 1000 --db ./data/inventario.db
//! ```

use std::env;

use inventario_core::{NewProduct, Quantity, DEFAULT_CATEGORY_ID};
use inventario_db::{Database, DbConfig};

/// Product families with a base sell price in cents.
const FAMILIES: &[(&str, i64)] = &[
    ("Arroz", 850),
    ("Fideo", 600),
    ("Aceite", 1450),
    ("Azucar", 700),
    ("Leche", 650),
    ("Harina", 900),
    ("Cafe", 2800),
    ("Te", 1200),
    ("Galletas", 450),
    ("Jabon", 550),
];

const SIZES: &[(&str, i64)] = &[
    ("250g", 0),
    ("500g", 150),
    ("1kg", 400),
    ("2kg", 900),
    ("5kg", 2000),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./inventario_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Inventario Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./inventario_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Inventario Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected, migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products, skipping.", existing);
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();
    let mut generated = 0;

    'outer: for round in 0..=count {
        for (family, base) in FAMILIES {
            for (size, addon) in SIZES {
                if generated >= count {
                    break 'outer;
                }
                let product = generate_product(family, size, base + addon, round, generated);
                if let Err(e) = db.products().insert(&product).await {
                    eprintln!("Failed to insert {}: {}", product.name, e);
                    continue;
                }
                generated += 1;
            }
        }
    }

    println!("✓ Generated {} products in {:?}", generated, start.elapsed());
    println!("  First page: {} rows", db.products().list(0, 20).await?.len());

    db.close().await;
    Ok(())
}

fn generate_product(family: &str, size: &str, sell: i64, round: usize, seed: usize) -> NewProduct {
    let name = if round == 0 {
        format!("{family} {size}")
    } else {
        format!("{family} {size} #{round}")
    };

    NewProduct {
        name,
        // loose goods get a half unit now and then
        quantity_hundredths: ((seed * 7) % 60) as i64 * 100 + if seed % 3 == 0 { 50 } else { 0 },
        min_stock_hundredths: Quantity::from_units(5).hundredths(),
        average_quantity_hundredths: Quantity::from_units(20).hundredths(),
        description: format!("{family} presentacion {size}"),
        image: None,
        sell_price_cents: sell,
        // bought at three quarters of the sell price
        buy_price_cents: sell * 3 / 4,
        category_id: Some(DEFAULT_CATEGORY_ID),
        owner: "seed".to_string(),
    }
}
