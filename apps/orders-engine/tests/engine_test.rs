//! End-to-end tests for the orders engine: submission, rejection,
//! reversal, shutdown, and statistics aggregation.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal_macros::dec;
use test_case::test_case;
use tokio::time::Instant;

use orders_engine::config::EngineConfig;
use orders_engine::engine::Engine;
use orders_engine::models::{Item, OrderStatus, Product};
use orders_engine::pipeline::PipelineError;
use orders_engine::stats::{FixedDelay, NoDelay, StatsError};

const BLUEBERRY: &str = "MWBLU";
const LEMON: &str = "MWLEM";

fn catalog(blueberry_stock: i64) -> Vec<Product> {
    vec![
        Product {
            id: BLUEBERRY.to_string(),
            name: "Mineral Water(Blueberry)".to_string(),
            price: dec!(2.50),
            stock: blueberry_stock,
        },
        Product {
            id: LEMON.to_string(),
            name: "Mineral Water(Lemon)".to_string(),
            price: dec!(3.00),
            stock: 10,
        },
    ]
}

fn test_engine(blueberry_stock: i64) -> Engine {
    let config = EngineConfig {
        worker_count: 3,
        max_simulated_delay: Duration::ZERO,
    };
    Engine::with_delay(&config, catalog(blueberry_stock), Arc::new(NoDelay))
}

fn item(product_id: &str, amount: i64) -> Item {
    Item {
        product_id: product_id.to_string(),
        amount,
    }
}

fn stock_of(engine: &Engine, product_id: &str) -> i64 {
    engine
        .find_all_products()
        .into_iter()
        .find(|p| p.id == product_id)
        .map(|p| p.stock)
        .unwrap()
}

#[tokio::test]
async fn submit_completes_order_and_decrements_stock() {
    let engine = test_engine(50);

    let order = engine.submit(item(BLUEBERRY, 5)).await.unwrap();

    assert_eq!(order.status, OrderStatus::Completed);
    assert_eq!(order.total, Some(dec!(12.50)));
    assert!(order.error.is_none());
    assert_eq!(stock_of(&engine, BLUEBERRY), 45);
}

#[tokio::test]
async fn submit_over_stock_rejects_and_leaves_stock_unchanged() {
    let engine = test_engine(50);

    let order = engine.submit(item(BLUEBERRY, 500)).await.unwrap();

    assert_eq!(order.status, OrderStatus::Rejected);
    assert!(order.total.is_none());
    assert!(order.error.as_deref().unwrap().contains("not enough stock"));
    assert_eq!(stock_of(&engine, BLUEBERRY), 50);
}

#[tokio::test]
async fn exhausting_stock_exactly_then_rejecting() {
    // Stock 5 at price 2.50: the last unit sells, the next request fails.
    let engine = test_engine(5);

    let order = engine.submit(item(BLUEBERRY, 5)).await.unwrap();
    assert_eq!(order.status, OrderStatus::Completed);
    assert_eq!(order.total, Some(dec!(12.50)));
    assert_eq!(stock_of(&engine, BLUEBERRY), 0);

    let rejected = engine.submit(item(BLUEBERRY, 1)).await.unwrap();
    assert_eq!(rejected.status, OrderStatus::Rejected);
    assert_eq!(stock_of(&engine, BLUEBERRY), 0);
}

#[tokio::test]
async fn submit_unknown_product_fails_validation_without_creating_order() {
    let engine = test_engine(50);

    let result = engine.submit(item("BOGUS", 1)).await;

    assert!(matches!(
        result,
        Err(PipelineError::ValidationFailed { .. })
    ));
}

#[tokio::test]
async fn submit_non_positive_amount_fails_validation() {
    let engine = test_engine(50);

    for amount in [0, -5] {
        let result = engine.submit(item(BLUEBERRY, amount)).await;
        assert!(matches!(
            result,
            Err(PipelineError::ValidationFailed { .. })
        ));
    }
}

#[tokio::test]
async fn find_order_returns_latest_version() {
    let engine = test_engine(50);

    let order = engine.submit(item(BLUEBERRY, 2)).await.unwrap();
    let found = engine.find_order(&order.id).unwrap();
    assert_eq!(found, order);

    let missing = engine.find_order("nonexistent");
    assert!(matches!(missing, Err(PipelineError::NotFound { .. })));
}

#[tokio::test]
async fn find_all_products_sorted_by_id() {
    let engine = test_engine(50);
    let ids: Vec<String> = engine
        .find_all_products()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, [BLUEBERRY, LEMON]);
}

#[tokio::test]
async fn reversal_restores_stock_and_resolves_to_reversed() {
    let engine = test_engine(50);

    let order = engine.submit(item(BLUEBERRY, 3)).await.unwrap();
    assert_eq!(stock_of(&engine, BLUEBERRY), 47);

    let reversed = engine.request_reversal(&order.id).await.unwrap();

    assert_eq!(reversed.status, OrderStatus::Reversed);
    assert_eq!(reversed.total, Some(dec!(7.50)));
    assert_eq!(stock_of(&engine, BLUEBERRY), 50);
    assert_eq!(
        engine.find_order(&order.id).unwrap().status,
        OrderStatus::Reversed
    );
}

#[tokio::test]
async fn second_reversal_is_rejected_with_invalid_state() {
    let engine = test_engine(50);

    let order = engine.submit(item(BLUEBERRY, 3)).await.unwrap();
    engine.request_reversal(&order.id).await.unwrap();

    let second = engine.request_reversal(&order.id).await;
    assert_eq!(
        second,
        Err(PipelineError::InvalidState {
            order_id: order.id.clone(),
            status: OrderStatus::Reversed,
        })
    );
    // Stock restored exactly once.
    assert_eq!(stock_of(&engine, BLUEBERRY), 50);
}

#[tokio::test]
async fn reversal_of_rejected_order_is_invalid_state() {
    let engine = test_engine(1);

    let rejected = engine.submit(item(BLUEBERRY, 5)).await.unwrap();
    assert_eq!(rejected.status, OrderStatus::Rejected);

    let result = engine.request_reversal(&rejected.id).await;
    assert!(matches!(result, Err(PipelineError::InvalidState { .. })));
}

#[tokio::test]
async fn reversal_of_unknown_order_is_not_found() {
    let engine = test_engine(50);
    let result = engine.request_reversal("nonexistent").await;
    assert!(matches!(result, Err(PipelineError::NotFound { .. })));
}

#[tokio::test]
async fn close_is_idempotent_and_stops_new_submissions() {
    let engine = test_engine(50);

    engine.close();
    engine.close();
    assert!(engine.is_closed());

    let result = engine.submit(item(BLUEBERRY, 1)).await;
    assert_eq!(result, Err(PipelineError::Closed));

    let reversal = engine.request_reversal("whatever").await;
    assert_eq!(reversal, Err(PipelineError::Closed));
}

#[test_case(1; "single order")]
#[test_case(10; "ten concurrent orders")]
#[test_case(50; "fifty concurrent orders")]
#[tokio::test]
async fn concurrent_submissions_never_lose_updates(k: usize) {
    const STOCK: i64 = 50;
    let engine = Arc::new(test_engine(STOCK));

    let mut handles = Vec::with_capacity(k);
    for _ in 0..k {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(
            async move { engine.submit(item(BLUEBERRY, 1)).await },
        ));
    }

    let mut completed = 0;
    for handle in handles {
        let order = handle.await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
        completed += 1;
    }

    assert_eq!(completed, k);
    assert_eq!(stock_of(&engine, BLUEBERRY), STOCK - k as i64);
}

#[tokio::test]
async fn statistics_reflect_every_terminal_order_exactly_once() {
    let engine = test_engine(50);

    let first = engine.submit(item(BLUEBERRY, 5)).await.unwrap(); // 12.50
    engine.submit(item(BLUEBERRY, 1)).await.unwrap(); // 2.50
    let rejected = engine.submit(item(LEMON, 100)).await.unwrap();
    assert_eq!(rejected.status, OrderStatus::Rejected);
    engine.request_reversal(&first.id).await.unwrap(); // -12.50

    let stats = engine.join().await;

    assert_eq!(stats.completed_orders, 2);
    assert_eq!(stats.rejected_orders, 1);
    assert_eq!(stats.reversed_orders, 1);
    assert_eq!(stats.revenue, dec!(2.50));
}

#[tokio::test]
async fn get_stats_within_deadline_returns_snapshot() {
    let engine = test_engine(50);
    engine.submit(item(BLUEBERRY, 1)).await.unwrap();

    let stats = engine
        .get_stats(Instant::now() + Duration::from_secs(5))
        .await
        .unwrap();
    // Aggregation is eventually consistent; the snapshot is whatever has
    // been reconciled so far, but it is never torn.
    assert!(stats.completed_orders <= 1);
}

#[tokio::test]
async fn get_stats_with_expired_deadline_times_out() {
    let config = EngineConfig {
        worker_count: 1,
        max_simulated_delay: Duration::ZERO,
    };
    let engine = Engine::with_delay(
        &config,
        catalog(50),
        Arc::new(FixedDelay::new(Duration::from_millis(50))),
    );

    let expired = Instant::now() - Duration::from_millis(1);
    assert_eq!(engine.get_stats(expired).await, Err(StatsError::Timeout));
}
