mod common;

use common::TestApp;
use fgstore_api::{
    entities::{bulk_inventory, packaged_inventory, price_history, product_price, stock_movement},
    models::{Currency, PriceType},
    services::imports::ImportRow,
    services::pricing::PriceUpdateInput,
};
use rust_decimal_macros::dec;
use sea_orm::EntityTrait;
use serde_json::{json, Value};

fn price_input(price: rust_decimal::Decimal, reason: &str) -> PriceUpdateInput {
    PriceUpdateInput {
        product_name: Some("Green Tea".to_string()),
        price,
        currency: Currency::Lkr,
        price_type: PriceType::Retail,
        change_reason: reason.to_string(),
        effective_date: None,
    }
}

fn import_row(entries: Vec<(&str, Value)>) -> ImportRow {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

#[tokio::test]
async fn price_update_appends_history_and_projects_current() {
    let app = TestApp::new().await;

    app.state
        .services
        .pricing
        .update_price("GT-01", price_input(dec!(1000), "Initial price"), "pricer-1")
        .await
        .unwrap();
    app.state
        .services
        .pricing
        .update_price("GT-01", price_input(dec!(1200), "Season premium"), "pricer-1")
        .await
        .unwrap();

    // Current projection mirrors the latest entry.
    let current = app
        .state
        .services
        .pricing
        .get_price("GT-01")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.price, dec!(1200));

    // Exactly one projection row per key.
    let projections = product_price::Entity::find().all(app.db()).await.unwrap();
    assert_eq!(projections.len(), 1);

    // History is append-only and carries the previous price.
    let history = app
        .state
        .services
        .pricing
        .list_history(Some("GT-01"), 1, 50)
        .await
        .unwrap()
        .0;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].previous_price, dec!(1000));
    assert_eq!(history[0].new_price, dec!(1200));
    assert_eq!(history[1].previous_price, dec!(0));
}

#[tokio::test]
async fn pricing_analytics_aggregates_history() {
    let app = TestApp::new().await;

    for (price, reason) in [
        (dec!(1000), "Initial price"),
        (dec!(1500), "Supply shortage"),
        (dec!(1200), "Correction"),
    ] {
        app.state
            .services
            .pricing
            .update_price("GT-01", price_input(price, reason), "pricer-1")
            .await
            .unwrap();
    }

    let analytics = app.state.services.pricing.analytics("GT-01").await.unwrap();
    assert_eq!(analytics.change_count, 3);
    assert_eq!(analytics.min_price, dec!(1000));
    assert_eq!(analytics.max_price, dec!(1500));
    assert_eq!(analytics.latest_price, dec!(1200));
}

#[tokio::test]
async fn import_commits_bulk_row_into_inventory_and_pricing() {
    let app = TestApp::new().await;

    let rows = vec![import_row(vec![
        ("Product Type", json!("bulk")),
        ("Product Name", json!("Green Tea")),
        ("Product ID", json!("GT-01")),
        ("Batch Number", json!("B-900")),
        ("Quantity", json!(25)),
        ("Unit", json!("kg")),
        ("Price", json!(1200)),
        ("Currency", json!("LKR")),
        ("Price Type", json!("retail")),
    ])];

    let report = app
        .state
        .services
        .imports
        .commit_rows(rows, &app.dispatcher())
        .await
        .unwrap();

    assert_eq!(report.success_count, 1);
    assert_eq!(report.error_count, 0);

    let batches = bulk_inventory::Entity::find().all(app.db()).await.unwrap();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].quantity, dec!(25));
    assert_eq!(batches[0].location, "FG-A1");
    assert_eq!(batches[0].release_code.len(), 10);

    let price = app
        .state
        .services
        .pricing
        .get_price("GT-01")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(price.price, dec!(1200));

    let movements = stock_movement::Entity::find().all(app.db()).await.unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].quantity_change, dec!(25));
}

#[tokio::test]
async fn import_repeating_a_batch_increments_stock() {
    let app = TestApp::new().await;

    let row = || {
        import_row(vec![
            ("Product Type", json!("bulk")),
            ("Product Name", json!("Green Tea")),
            ("Product ID", json!("GT-01")),
            ("Batch Number", json!("B-900")),
            ("Quantity", json!(10)),
            ("Unit", json!("kg")),
            ("Price", json!(1200)),
        ])
    };

    app.state
        .services
        .imports
        .commit_rows(vec![row()], &app.dispatcher())
        .await
        .unwrap();
    app.state
        .services
        .imports
        .commit_rows(vec![row()], &app.dispatcher())
        .await
        .unwrap();

    let batches = bulk_inventory::Entity::find().all(app.db()).await.unwrap();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].quantity, dec!(20));
}

#[tokio::test]
async fn import_units_row_keys_price_by_variant() {
    let app = TestApp::new().await;

    let rows = vec![import_row(vec![
        ("Product Type", json!("units")),
        ("Product Name", json!("Green Tea")),
        ("Product ID", json!("GT-01")),
        ("Batch Number", json!("B-901")),
        ("Variant Name", json!("250g pack")),
        ("Variant Size", json!("250")),
        ("Variant Unit", json!("g")),
        ("Units in Stock", json!(40)),
        ("Price", json!(450)),
    ])];

    let report = app
        .state
        .services
        .imports
        .commit_rows(rows, &app.dispatcher())
        .await
        .unwrap();
    assert_eq!(report.success_count, 1);

    let packaged = packaged_inventory::Entity::find().all(app.db()).await.unwrap();
    assert_eq!(packaged.len(), 1);
    assert_eq!(packaged[0].units_in_stock, 40);

    let price = app
        .state
        .services
        .pricing
        .get_price("GT-01_250g pack")
        .await
        .unwrap();
    assert!(price.is_some());
}

#[tokio::test]
async fn one_bad_row_does_not_block_the_rest() {
    let app = TestApp::new().await;

    let good = import_row(vec![
        ("Product Type", json!("bulk")),
        ("Product Name", json!("Green Tea")),
        ("Product ID", json!("GT-01")),
        ("Batch Number", json!("B-900")),
        ("Quantity", json!(10)),
        ("Unit", json!("kg")),
        ("Price", json!(1200)),
    ]);
    // Invalid: no quantity and no price.
    let bad = import_row(vec![
        ("Product Type", json!("bulk")),
        ("Product Name", json!("Cinnamon")),
        ("Product ID", json!("CN-01")),
        ("Batch Number", json!("B-777")),
    ]);

    let report = app
        .state
        .services
        .imports
        .commit_rows(vec![bad, good], &app.dispatcher())
        .await
        .unwrap();

    assert_eq!(report.attempted, 2);
    assert_eq!(report.success_count, 1);
    assert_eq!(report.skipped_invalid, 1);

    let validations = &report.validations;
    assert!(!validations[0].is_valid);
    assert!(validations[1].is_valid);

    let batches = bulk_inventory::Entity::find().all(app.db()).await.unwrap();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].product_name, "Green Tea");
}

#[tokio::test]
async fn import_price_history_records_bulk_upload_reason() {
    let app = TestApp::new().await;

    let rows = vec![import_row(vec![
        ("Product Type", json!("bulk")),
        ("Product Name", json!("Green Tea")),
        ("Product ID", json!("GT-01")),
        ("Batch Number", json!("B-900")),
        ("Quantity", json!(10)),
        ("Unit", json!("kg")),
        ("Price", json!(1200)),
    ])];

    app.state
        .services
        .imports
        .commit_rows(rows, &app.dispatcher())
        .await
        .unwrap();

    let history = price_history::Entity::find().all(app.db()).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].change_reason, "Bulk upload");
    assert_eq!(history[0].changed_by, "fg-operator-1");
}
