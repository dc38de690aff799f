//! Orders Engine Binary
//!
//! Loads the product catalog, fires a burst of concurrent simulated
//! orders (plus a reversal), and prints the resulting statistics.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p orders-engine
//! ```
//!
//! # Environment Variables
//!
//! - `ORDERS_CATALOG`: catalog CSV path (default: `input/products.csv`)
//! - `ORDERS_SIMULATION_COUNT`: concurrent orders to fire (default: 50)
//! - `ORDERS_STATS_WORKERS`: stats worker pool size (default: 3)
//! - `ORDERS_MAX_DELAY_MS`: simulated processing jitter bound (default: 500)
//! - `RUST_LOG`: log level (default: info)

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::time::Instant;

use orders_engine::catalog::load_products;
use orders_engine::config::EngineConfig;
use orders_engine::engine::Engine;
use orders_engine::models::{Item, Order, OrderStatus};
use orders_engine::telemetry::init_telemetry;

/// Default catalog location, relative to the working directory.
const DEFAULT_CATALOG: &str = "input/products.csv";

/// Default number of simulated concurrent orders.
const DEFAULT_SIMULATION_COUNT: usize = 50;

/// Largest simulated order amount.
const MAX_ORDER_AMOUNT: i64 = 15;

/// Deadline allowance for statistics reads.
const STATS_DEADLINE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_telemetry();

    let config = EngineConfig::from_env();
    let catalog_path =
        std::env::var("ORDERS_CATALOG").unwrap_or_else(|_| DEFAULT_CATALOG.to_string());
    let simulation_count = std::env::var("ORDERS_SIMULATION_COUNT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_SIMULATION_COUNT);

    let catalog = load_products(&catalog_path)?;
    anyhow::ensure!(
        !catalog.is_empty(),
        "catalog {catalog_path} contained no usable products"
    );

    tracing::info!(
        products = catalog.len(),
        workers = config.worker_count,
        simulation_count,
        "orders engine starting"
    );

    let engine = Arc::new(Engine::new(&config, catalog));
    let product_ids: Vec<String> = engine
        .find_all_products()
        .into_iter()
        .map(|p| p.id)
        .collect();

    let mut handles = Vec::with_capacity(simulation_count);
    for simulation in 0..simulation_count {
        let engine = Arc::clone(&engine);
        let product_ids = product_ids.clone();
        handles.push(tokio::spawn(async move {
            submit_random_order(&engine, &product_ids, simulation).await
        }));
    }

    let mut completed: Vec<Order> = Vec::new();
    for handle in handles {
        if let Ok(Some(order)) = handle.await {
            if order.status == OrderStatus::Completed {
                completed.push(order);
            }
        }
    }
    tracing::info!(completed = completed.len(), "simulation burst finished");

    // Reverse one completed order to exercise the reversal path.
    if let Some(order) = completed.first() {
        match engine.request_reversal(&order.id).await {
            Ok(reversed) => {
                tracing::info!(order_id = %reversed.id, status = %reversed.status, "order reversed");
            }
            Err(e) => tracing::warn!(order_id = %order.id, error = %e, "reversal failed"),
        }
    }

    match engine.get_stats(Instant::now() + STATS_DEADLINE).await {
        Ok(stats) => tracing::info!(?stats, "interim statistics"),
        Err(e) => tracing::warn!(error = %e, "interim statistics read failed"),
    }

    let engine = Arc::try_unwrap(engine)
        .map_err(|_| anyhow::anyhow!("engine still shared after simulation"))?;
    let final_stats = engine.join().await;
    tracing::info!(?final_stats, "final statistics");
    println!("{}", serde_json::to_string_pretty(&final_stats)?);

    Ok(())
}

/// Submit one randomized order; returns the resolved order if accepted.
async fn submit_random_order(
    engine: &Engine,
    product_ids: &[String],
    simulation: usize,
) -> Option<Order> {
    let item = {
        let mut rng = rand::rng();
        Item {
            product_id: product_ids[rng.random_range(0..product_ids.len())].clone(),
            amount: rng.random_range(1..=MAX_ORDER_AMOUNT),
        }
    };
    tracing::info!(simulation, product = %item.product_id, amount = item.amount, "sending order");

    match engine.submit(item).await {
        Ok(order) => {
            tracing::info!(simulation, order_id = %order.id, status = %order.status, "order resolved");
            Some(order)
        }
        Err(e) => {
            tracing::warn!(simulation, error = %e, "order failed");
            None
        }
    }
}
