//! # Basket Demo
//!
//! Walks a basket through its lifecycle against a real SQLite file:
//! add (with a duplicate merge), option updates, totals, user attachment,
//! and the destroy-on-empty transition.
//!
//! ## Usage
//! ```bash
//! cargo run -p basket --bin demo
//!
//! # Tax settings and database path come from the environment
//! BASKET_TAX_MODE=flat BASKET_TAX_RATE=8.25 cargo run -p basket --bin demo
//! ```

use std::sync::Arc;

use tracing::info;

use basket::{
    AllowedOptions, BasketConfig, BasketManager, Buyable, MemoryBuyableSource,
    MemorySessionStore, Money, OptionMap, OptionRule, TaxRate,
};
use basket_db::{Database, DbConfig};

/// A small catalog product for the walkthrough.
struct DemoProduct {
    id: i64,
    name: &'static str,
    price: Money,
    fees: Money,
    rate: Option<TaxRate>,
    allowed: AllowedOptions,
}

impl Buyable for DemoProduct {
    fn buyable_id(&self) -> i64 {
        self.id
    }

    fn buyable_type(&self) -> &str {
        "product"
    }

    fn description(&self) -> String {
        self.name.to_string()
    }

    fn price(&self, _options: &OptionMap) -> Money {
        self.price
    }

    fn extra_fees(&self) -> Money {
        self.fees
    }

    fn allowed_options(&self) -> AllowedOptions {
        self.allowed.clone()
    }

    fn tax_rate(&self) -> Option<TaxRate> {
        self.rate
    }
}

fn demo_catalog() -> (MemoryBuyableSource, Arc<dyn Buyable>, Arc<dyn Buyable>) {
    let mut shirt_options = AllowedOptions::new();
    shirt_options.insert(
        "color".to_string(),
        OptionRule::OneOf(vec!["red".into(), "blue".into()]),
    );
    shirt_options.insert("size".to_string(), OptionRule::Any);

    let shirt: Arc<dyn Buyable> = Arc::new(DemoProduct {
        id: 1,
        name: "Crew Neck T-Shirt",
        price: Money::from_cents(1999),
        fees: Money::zero(),
        rate: None,
        allowed: shirt_options,
    });

    let bottled: Arc<dyn Buyable> = Arc::new(DemoProduct {
        id: 2,
        name: "Sparkling Water 1L",
        price: Money::from_cents(250),
        fees: Money::from_cents(25), // bottle deposit
        rate: Some(TaxRate::from_percentage(5.0)),
        allowed: AllowedOptions::new(),
    });

    let mut catalog = MemoryBuyableSource::new();
    catalog.insert(Arc::clone(&shirt));
    catalog.insert(Arc::clone(&bottled));

    (catalog, shirt, bottled)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = BasketConfig::load()?;
    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    let (catalog, shirt, bottled) = demo_catalog();

    // A first-time visitor: no session, no user, no signed reference.
    let mut manager = BasketManager::resolve(
        &db,
        MemorySessionStore::new(),
        catalog,
        &config,
        None,
        None,
    )
    .await?;

    let mut options = OptionMap::new();
    options.insert("size".to_string(), "M".into());
    options.insert("color".to_string(), "red".into());

    manager.add(shirt.as_ref(), 1, options.clone()).await?;
    manager.add(bottled.as_ref(), 6, OptionMap::new()).await?;
    // Same shirt, same options: merges into the existing line.
    manager.add(shirt.as_ref(), 1, options).await?;

    info!(
        basket_id = ?manager.basket_id(),
        lines = manager.line_count(),
        quantity = manager.count(),
        "Basket filled"
    );

    for line in manager.content() {
        info!(
            item_id = line.id(),
            description = %line.description(),
            quantity = line.quantity(),
            unit_price = %line.unit_price(),
            total = %line.total(),
            "Line"
        );
    }

    let totals = manager.totals();
    info!(
        subtotal = %totals.subtotal,
        tax = %totals.tax,
        total = %totals.total,
        "Totals"
    );

    // The visitor logs in as user 7 and keeps the basket.
    manager.load_user_basket(7).await?;
    info!(owner = ?manager.owner_id(), "Basket attached to user");

    // Empty it out: the basket row disappears with the last line.
    let item_ids: Vec<i64> = manager.content().iter().map(|line| line.id()).collect();
    for item_id in item_ids {
        manager.remove(item_id).await?;
    }
    info!(
        basket_id = ?manager.basket_id(),
        is_empty = manager.is_empty(),
        "Basket emptied and destroyed"
    );

    db.close().await;
    Ok(())
}
