mod common;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use common::TestApp;
use fgstore_api::{
    entities::stock_movement,
    errors::ServiceError,
    models::{MovementType, QualityGrade},
    services::inventory::{BulkReceiptInput, PackagedReceiptInput},
};
use rust_decimal_macros::dec;
use sea_orm::EntityTrait;

fn bulk_receipt(batch_number: &str, quantity: rust_decimal::Decimal) -> BulkReceiptInput {
    BulkReceiptInput {
        product_id: "GT-01".to_string(),
        product_name: "Green Tea".to_string(),
        batch_number: batch_number.to_string(),
        quantity,
        unit: "kg".to_string(),
        quality_grade: QualityGrade::A,
        expiry_date: None,
        release_code: None,
        location: None,
        received_from: None,
    }
}

#[tokio::test]
async fn receipt_creates_row_and_generates_release_code() {
    let app = TestApp::new().await;

    let saved = app
        .state
        .services
        .inventory
        .add_to_inventory(bulk_receipt("B-100", dec!(25)), "store-1")
        .await
        .unwrap();

    assert_eq!(saved.quantity, dec!(25));
    assert_eq!(saved.location, "FG-A1");
    assert_eq!(saved.release_code.len(), 10);
    assert_eq!(saved.received_from, "manual_entry");

    let movements = stock_movement::Entity::find().all(app.db()).await.unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].movement_type, MovementType::Receipt);
    assert_eq!(movements[0].quantity_change, dec!(25));
}

#[tokio::test]
async fn repeated_receipt_increments_the_same_batch() {
    let app = TestApp::new().await;

    app.state
        .services
        .inventory
        .add_to_inventory(bulk_receipt("B-100", dec!(25)), "store-1")
        .await
        .unwrap();
    let second = app
        .state
        .services
        .inventory
        .add_to_inventory(bulk_receipt("B-100", dec!(10)), "store-1")
        .await
        .unwrap();

    assert_eq!(second.quantity, dec!(35));

    let (rows, total) = app.state.services.inventory.list_bulk(1, 20).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(rows[0].quantity, dec!(35));
}

#[tokio::test]
async fn unknown_location_falls_back_to_default() {
    let app = TestApp::new().await;
    app.state
        .services
        .inventory
        .create_location("FG-B2".to_string(), "Cold room".to_string(), Some(10))
        .await
        .unwrap();

    let mut input = bulk_receipt("B-100", dec!(5));
    input.location = Some("NOWHERE".to_string());
    let saved = app
        .state
        .services
        .inventory
        .add_to_inventory(input, "store-1")
        .await
        .unwrap();
    assert_eq!(saved.location, "FG-A1");

    let mut input = bulk_receipt("B-200", dec!(5));
    input.location = Some("FG-B2".to_string());
    let saved = app
        .state
        .services
        .inventory
        .add_to_inventory(input, "store-1")
        .await
        .unwrap();
    assert_eq!(saved.location, "FG-B2");
}

#[tokio::test]
async fn adjustment_below_zero_is_rejected() {
    let app = TestApp::new().await;
    let batch = app.seed_bulk_batch("Green Tea", "B-100", dec!(10)).await;

    let result = app
        .state
        .services
        .inventory
        .adjust_bulk(batch.id, dec!(-12), "Stock count".to_string(), "store-1")
        .await;
    assert_matches!(result, Err(ServiceError::ValidationError(_)));

    let adjusted = app
        .state
        .services
        .inventory
        .adjust_bulk(batch.id, dec!(-4), "Damaged goods".to_string(), "store-1")
        .await
        .unwrap();
    assert_eq!(adjusted.quantity, dec!(6));

    let movements = stock_movement::Entity::find().all(app.db()).await.unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].movement_type, MovementType::Adjustment);
    assert_eq!(movements[0].reason.as_deref(), Some("Damaged goods"));
}

#[tokio::test]
async fn packaged_receipt_upserts_by_variant() {
    let app = TestApp::new().await;

    let input = PackagedReceiptInput {
        product_id: "GT-01".to_string(),
        product_name: "Green Tea".to_string(),
        variant_name: "250g pack".to_string(),
        variant_size: "250".to_string(),
        variant_unit: "g".to_string(),
        batch_number: "B-500".to_string(),
        units_received: 40,
        quality_grade: QualityGrade::B,
        expiry_date: None,
        release_code: None,
        location: None,
        received_from: None,
    };

    app.state
        .services
        .inventory
        .add_packaged_units(input.clone(), "store-1")
        .await
        .unwrap();
    let second = app
        .state
        .services
        .inventory
        .add_packaged_units(input, "store-1")
        .await
        .unwrap();

    assert_eq!(second.units_in_stock, 80);
}

#[tokio::test]
async fn expiry_report_classifies_and_sorts() {
    let app = TestApp::new().await;
    let today = Utc::now().date_naive();

    let mut expired = bulk_receipt("B-OLD", dec!(5));
    expired.expiry_date = Some(today - Duration::days(3));
    let mut critical = bulk_receipt("B-SOON", dec!(5));
    critical.expiry_date = Some(today + Duration::days(2));
    let mut good = bulk_receipt("B-FRESH", dec!(5));
    good.expiry_date = Some(today + Duration::days(90));
    let undated = bulk_receipt("B-NODATE", dec!(5));

    for input in [expired, critical, good, undated] {
        app.state
            .services
            .inventory
            .add_to_inventory(input, "store-1")
            .await
            .unwrap();
    }

    let report = app
        .state
        .services
        .inventory
        .expiry_report(today)
        .await
        .unwrap();

    // Only dated items are tracked, soonest first.
    assert_eq!(report.total, 3);
    assert_eq!(report.expired, 1);
    assert_eq!(report.critical, 1);
    assert_eq!(report.warning, 0);
    assert_eq!(report.items[0].batch_number, "B-OLD");
    assert_eq!(report.items[2].batch_number, "B-FRESH");
}

#[tokio::test]
async fn location_stats_compute_utilization() {
    let app = TestApp::new().await;
    app.state
        .services
        .inventory
        .create_location("FG-A1".to_string(), "Main aisle".to_string(), Some(2))
        .await
        .unwrap();
    app.state
        .services
        .inventory
        .create_location("FG-B2".to_string(), "Cold room".to_string(), Some(10))
        .await
        .unwrap();

    app.seed_bulk_batch("Green Tea", "B-1", dec!(10)).await;
    app.seed_packaged_batch("Green Tea", "B-2", 10).await;

    let stats = app.state.services.inventory.location_stats().await.unwrap();
    assert_eq!(stats.total_locations, 2);
    assert_eq!(stats.used_capacity, 2);
    assert_eq!(stats.full_locations, 1);
    assert_eq!(stats.empty_locations, 1);

    let a1 = stats
        .locations
        .iter()
        .find(|l| l.code == "FG-A1")
        .unwrap();
    assert_eq!(a1.item_count, 2);
    assert_eq!(a1.utilization_percent, 100);
}

#[tokio::test]
async fn duplicate_location_code_is_rejected() {
    let app = TestApp::new().await;
    app.state
        .services
        .inventory
        .create_location("FG-C3".to_string(), "Annex".to_string(), None)
        .await
        .unwrap();

    let duplicate = app
        .state
        .services
        .inventory
        .create_location("fg-c3".to_string(), "Annex again".to_string(), None)
        .await;
    assert_matches!(duplicate, Err(ServiceError::Conflict(_)));
}
