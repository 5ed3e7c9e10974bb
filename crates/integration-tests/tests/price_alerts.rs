//! Background price alert monitoring with deterministic drop policies.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use testmart_core::{Email, Price, ProductId};
use testmart_integration_tests::TestContext;
use testmart_storefront::catalog;
use testmart_storefront::models::PriceAlert;
use testmart_storefront::services::price_alert::{PriceAlertMonitor, RandomPriceDrop};

const INTERVAL: Duration = Duration::from_secs(30);

fn watch(ctx: &TestContext, product: u32, target_cents: i64) -> PriceAlert {
    let product = catalog::product(ProductId::new(product)).unwrap();
    ctx.store
        .alerts()
        .lock()
        .unwrap()
        .create_alert(
            product,
            Price::from_cents(target_cents),
            Email::parse("buyer@test.com").unwrap(),
        )
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_drop_to_target_triggers_and_persists() {
    let ctx = TestContext::new();
    let alert = watch(&ctx, 1, 25_000);
    let history_before = ctx
        .store
        .alerts()
        .lock()
        .unwrap()
        .price_history(ProductId::new(1))
        .len();

    let policy = |alert: &PriceAlert| Some(alert.target_price);
    let mut monitor = PriceAlertMonitor::spawn(ctx.store.alerts().clone(), policy, INTERVAL);

    let fired = monitor.next_triggered().await.unwrap();
    assert_eq!(fired.alert_id, alert.id);
    assert_eq!(fired.new_price, Price::from_cents(25_000));
    assert_eq!(fired.previous_price, Price::from_cents(29_999));
    monitor.stop();

    let reopened = ctx.reopen();
    let store = reopened.alerts().lock().unwrap();
    let restored = &store.alerts()[0];
    assert!(!restored.is_active);
    assert!(restored.triggered_at.is_some());
    assert_eq!(store.active_alerts().count(), 0);

    let history = store.price_history(ProductId::new(1));
    assert_eq!(history.len(), history_before + 1);
    assert!(history.iter().any(|p| p.price == Price::from_cents(25_000)));
}

#[tokio::test(start_paused = true)]
async fn test_price_above_target_never_triggers() {
    let ctx = TestContext::new();
    watch(&ctx, 2, 20_000);

    let policy = |alert: &PriceAlert| Some(alert.target_price + Price::from_cents(1));
    let mut monitor = PriceAlertMonitor::spawn(ctx.store.alerts().clone(), policy, INTERVAL);

    tokio::time::sleep(INTERVAL * 5).await;
    assert!(monitor.try_next_triggered().is_none());
    assert!(monitor.is_running());
    assert_eq!(ctx.store.alerts().lock().unwrap().active_alerts().count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_triggered_alert_fires_once() {
    let ctx = TestContext::new();
    watch(&ctx, 3, 80_000);
    watch(&ctx, 4, 30_000);

    let policy = |alert: &PriceAlert| {
        (alert.product_id == ProductId::new(3)).then_some(alert.target_price)
    };
    let mut monitor = PriceAlertMonitor::spawn(ctx.store.alerts().clone(), policy, INTERVAL);

    let fired = monitor.next_triggered().await.unwrap();
    assert_eq!(fired.product_id, ProductId::new(3));

    tokio::time::sleep(INTERVAL * 4).await;
    assert!(monitor.try_next_triggered().is_none());

    let store = ctx.store.alerts().lock().unwrap();
    let active: Vec<_> = store.active_alerts().map(|a| a.product_id).collect();
    assert_eq!(active, [ProductId::new(4)]);
}

#[tokio::test(start_paused = true)]
async fn test_certain_random_drop_lands_at_or_below_target() {
    let ctx = TestContext::new();
    watch(&ctx, 5, 12_000);

    let policy = RandomPriceDrop::new(1.0, Some(42));
    let mut monitor = PriceAlertMonitor::spawn(ctx.store.alerts().clone(), policy, INTERVAL);

    let fired = monitor.next_triggered().await.unwrap();
    assert!(fired.new_price <= Price::from_cents(12_000));
    assert!(fired.new_price > Price::from_cents(11_000));
}

#[tokio::test(start_paused = true)]
async fn test_reset_keeps_monitor_on_fresh_store() {
    let mut ctx = TestContext::new();
    watch(&ctx, 1, 25_000);

    let policy = |alert: &PriceAlert| Some(alert.target_price);
    let mut monitor = PriceAlertMonitor::spawn(ctx.store.alerts().clone(), policy, INTERVAL);

    ctx.store.reset().unwrap();
    assert!(ctx.store.alerts().lock().unwrap().alerts().is_empty());

    watch(&ctx, 2, 20_000);
    let fired = monitor.next_triggered().await.unwrap();
    assert_eq!(fired.product_id, ProductId::new(2));
}
