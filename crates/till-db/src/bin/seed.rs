//! # Seed Data Generator
//!
//! Populates an empty till database with suppliers, customers and a small
//! catalog, then optionally posts a demo purchase and sale through the
//! ledger.
//!
//! ## Usage
//! ```bash
//! # Use till.toml from the platform config dir (or defaults)
//! cargo run -p till-db --bin seed
//!
//! # Explicit database and config file
//! cargo run -p till-db --bin seed -- --db ./data/till.db --config ./till.toml
//!
//! # Also post a purchase and a sale
//! cargo run -p till-db --bin seed -- --demo
//!
//! # More logging
//! RUST_LOG=debug cargo run -p till-db --bin seed
//! ```

use std::env;
use std::path::PathBuf;

use till_core::{
    LedgerContext, Money, NewCustomer, NewProduct, NewSupplier, PaymentType, PurchaseHeader,
    PurchaseLine, SaleHeader, SaleLine,
};
use till_db::{Database, TillConfig};
use tracing_subscriber::EnvFilter;

/// `(code, name, category, cost, sell, min stock)`, prices in paisa.
const CATALOG: &[(&str, &str, &str, i64, i64, i64)] = &[
    ("BEV-COKE-330", "Coca-Cola 330ml", "Beverages", 6_500, 8_000, 24),
    ("BEV-PEPSI-500", "Pepsi 500ml", "Beverages", 8_000, 10_000, 24),
    ("BEV-WATER-1L", "Mineral Water 1L", "Beverages", 4_000, 6_000, 48),
    ("SNK-LAYS-CLS", "Lays Classic", "Snacks", 4_500, 6_000, 30),
    ("SNK-KITKAT", "Kit Kat", "Snacks", 9_000, 12_000, 20),
    ("DRY-MILK-1L", "Full Cream Milk 1L", "Dairy", 22_000, 26_000, 12),
    ("DRY-YOGURT", "Plain Yogurt 500g", "Dairy", 15_000, 18_500, 10),
    ("GRO-RICE-5KG", "Basmati Rice 5kg", "Grocery", 160_000, 185_000, 5),
    ("GRO-ATTA-10KG", "Wheat Flour 10kg", "Grocery", 110_000, 125_000, 5),
    ("GRO-SUGAR-1KG", "Sugar 1kg", "Grocery", 14_000, 16_000, 15),
    ("GRO-OIL-1L", "Cooking Oil 1L", "Grocery", 48_000, 54_000, 8),
    ("HSE-SOAP", "Bath Soap", "Household", 9_000, 11_500, 12),
];

const SUPPLIERS: &[(&str, &str)] = &[
    ("Metro Wholesale", "Imran Qureshi"),
    ("Karachi Dairy Co.", "Sana Malik"),
];

const CUSTOMERS: &[(&str, i64)] = &[("Ayesha Khan", 500_000), ("Bilal Ahmed", 0)];

/// User id recorded on demo documents.
const SEED_USER: LedgerContext = LedgerContext::new(1);

fn print_help() {
    println!("Till Ledger Seed Data Generator");
    println!();
    println!("Usage: seed [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -d, --db <PATH>       Database file (overrides till.toml / TILL_DB_PATH)");
    println!("  -c, --config <PATH>   Config file (default: platform config dir)");
    println!("      --demo            Post a demo purchase and sale after seeding");
    println!("  -h, --help            Show this help message");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,till=debug,sqlx=warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut db_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut demo = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if let Some(value) = args.get(i + 1) {
                    db_path = Some(PathBuf::from(value));
                    i += 1;
                }
            }
            "--config" | "-c" => {
                if let Some(value) = args.get(i + 1) {
                    config_path = Some(PathBuf::from(value));
                    i += 1;
                }
            }
            "--demo" => demo = true,
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            other => eprintln!("Ignoring unknown argument: {}", other),
        }
        i += 1;
    }

    let mut config = TillConfig::load(config_path)?;
    if let Some(path) = db_path {
        config.database.path = path;
    }

    if let Some(parent) = config.database.path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    println!("🌱 Till Ledger Seed Data Generator");
    println!("==================================");
    println!("Database: {}", config.database.path.display());
    println!();

    let db = Database::new(config.db_config()).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut supplier_ids = Vec::with_capacity(SUPPLIERS.len());
    for (name, contact) in SUPPLIERS {
        let supplier = db
            .suppliers()
            .insert(&NewSupplier {
                name: name.to_string(),
                contact_person: Some(contact.to_string()),
                ..Default::default()
            })
            .await?;
        supplier_ids.push(supplier.id);
    }
    println!("✓ {} suppliers", supplier_ids.len());

    let mut customer_ids = Vec::with_capacity(CUSTOMERS.len());
    for (name, credit_limit) in CUSTOMERS {
        let customer = db
            .customers()
            .insert(&NewCustomer {
                name: name.to_string(),
                credit_limit: Money::from_cents(*credit_limit),
                is_credit_customer: *credit_limit > 0,
                ..Default::default()
            })
            .await?;
        customer_ids.push(customer.id);
    }
    println!("✓ {} customers (plus walk-in)", customer_ids.len());

    let mut products = Vec::with_capacity(CATALOG.len());
    for (idx, (code, name, category, cost, sell, min_stock)) in CATALOG.iter().enumerate() {
        let product = NewProduct {
            code: code.to_string(),
            name: name.to_string(),
            category: Some(category.to_string()),
            cost_price: Money::from_cents(*cost),
            sell_price: Money::from_cents(*sell),
            stock_qty: 0,
            min_stock_level: *min_stock,
            barcode: Some(format!("890{:010}", idx + 1)),
            supplier_id: supplier_ids.get(idx % supplier_ids.len().max(1)).copied(),
        };

        match db.products().insert(&product).await {
            Ok(created) => products.push(created),
            Err(e) => eprintln!("Failed to insert {}: {}", product.code, e),
        }
    }
    println!("✓ {} products (all at zero stock)", products.len());

    if demo {
        if let (Some(&supplier_id), Some(&customer_id)) = (supplier_ids.first(), customer_ids.first()) {
            let receiving: Vec<PurchaseLine> = products
                .iter()
                .map(|p| PurchaseLine::new(p.id, &p.code, &p.name, p.min_stock_level * 2, p.cost_price()))
                .collect();

            let purchase = db
                .ledger()
                .create_purchase(&SEED_USER, &PurchaseHeader::new(supplier_id), &receiving)
                .await?;
            println!("✓ Demo purchase {}", purchase.number);

            let basket: Vec<SaleLine> = products
                .iter()
                .take(3)
                .map(|p| SaleLine::new(p.id, &p.code, &p.name, 2, p.sell_price()))
                .collect();
            let total: Money = basket.iter().map(SaleLine::total).sum();

            let sale = db
                .ledger()
                .create_sale(
                    &SEED_USER,
                    &SaleHeader::new(PaymentType::Credit, total)
                        .for_customer(customer_id)
                        .with_tax(Money::zero()),
                    &basket,
                )
                .await?;
            println!("✓ Demo sale {} ({})", sale.number, total);
        }
    }

    let low = db.products().list_low_stock().await?;
    println!();
    println!("Low stock: {} products", low.len());
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}
