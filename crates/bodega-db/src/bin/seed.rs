//! # Seed Data Generator
//!
//! Populates a development database with catalog products and an initial
//! set of exchange-rate observations.
//!
//! ## Usage
//! ```bash
//! # Seed the default database (./bodega_dev.db)
//! cargo run -p bodega-db --bin seed
//!
//! # Custom amount / path
//! cargo run -p bodega-db --bin seed -- --count 120 --db ./data/bodega.db
//! ```
//!
//! Product data is derived deterministically from the item index — the
//! same invocation always produces the same catalog.

use chrono::Utc;
use std::env;

use bodega_core::{RateQuote, SOURCE_CRYPTO, SOURCE_OFFICIAL, SOURCE_PARALLEL};
use bodega_db::{Database, DbConfig};

/// Shelf staples, grouped roughly the way the aisles are.
const SHELF: &[(&str, &[&str])] = &[
    (
        "pantry",
        &[
            "Harina de maíz 1kg",
            "Arroz blanco 1kg",
            "Pasta corta 500g",
            "Azúcar 1kg",
            "Sal refinada 1kg",
            "Aceite vegetal 1L",
            "Café molido 500g",
            "Caraotas negras 500g",
            "Lentejas 500g",
            "Avena en hojuelas 400g",
        ],
    ),
    (
        "fridge",
        &[
            "Queso blanco 500g",
            "Mantequilla 250g",
            "Leche pasteurizada 1L",
            "Jamón de pierna 200g",
            "Huevos cartón x30",
        ],
    ),
    (
        "drinks",
        &[
            "Refresco cola 2L",
            "Malta 355ml",
            "Agua mineral 1.5L",
            "Jugo de naranja 1L",
            "Cerveza lager 295ml",
        ],
    ),
    (
        "household",
        &[
            "Jabón en panela",
            "Detergente en polvo 900g",
            "Cloro 1L",
            "Papel higiénico x4",
            "Fósforos caja",
        ],
    ),
];

/// Baseline quotes to make the rate screens non-empty on first launch.
const STARTER_RATES: &[(&str, f64)] = &[
    (SOURCE_OFFICIAL, 36.42),
    (SOURCE_PARALLEL, 39.85),
    (SOURCE_CRYPTO, 38.1),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 50;
    let mut db_path = String::from("./bodega_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(50);
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
                println!("Bodega POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 50)");
                println!("  -d, --db <PATH>    Database file path (default: ./bodega_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Bodega POS Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count_active().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating products...");

    let mut generated = 0usize;
    let start = std::time::Instant::now();

    'outer: for (aisle_idx, (_aisle, names)) in SHELF.iter().enumerate() {
        for (name_idx, name) in names.iter().enumerate() {
            if generated >= count {
                break 'outer;
            }

            let seed = aisle_idx * 100 + name_idx;

            // $0.49 - $8.49, derived from the index
            let price_cents = 49 + ((seed * 37) % 800) as i64;
            // 0 - 60 units on hand; every seventh item starts depleted
            let stock = if seed % 7 == 0 { 0 } else { (seed * 13 % 61) as i64 };
            // Every fifth item carries a shelf promotion
            let discount_bps = if seed % 5 == 0 { 500 } else { 0 };

            if let Err(e) = db
                .products()
                .create(name, price_cents, stock, discount_bps)
                .await
            {
                eprintln!("Failed to insert {}: {}", name, e);
                continue;
            }

            generated += 1;
        }
    }

    let elapsed = start.elapsed();
    println!("✓ Generated {} products in {:?}", generated, elapsed);

    println!();
    println!("Recording starter rates...");

    let quotes: Vec<RateQuote> = STARTER_RATES
        .iter()
        .map(|(source, value)| RateQuote::new(*source, *value))
        .collect();
    db.rates().record(&quotes, Utc::now()).await?;

    for observation in db.rates().latest().await? {
        println!("  {} = {:.2}", observation.source, observation.rate);
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
