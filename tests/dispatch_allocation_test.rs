mod common;

use std::collections::BTreeMap;

use assert_matches::assert_matches;
use common::TestApp;
use fgstore_api::{
    auth::SessionUser,
    commands::dispatch::{BatchSelection, DispatchItemInput},
    entities::{approval_history, bulk_inventory, dispatch_record, packaged_inventory, stock_movement},
    errors::ServiceError,
    models::InventoryKind,
};
use rust_decimal_macros::dec;
use sea_orm::EntityTrait;
use serde_json::json;
use uuid::Uuid;

async fn approved_history(app: &TestApp, qty: i64) -> approval_history::Model {
    let request = app
        .seed_request(
            Some(json!({"p1": {"name": "Green Tea", "qty": qty}})),
            None,
            None,
            None,
        )
        .await;
    let result = app
        .state
        .services
        .approvals
        .approve(request.id, &app.approver())
        .await
        .unwrap();
    approval_history::Entity::find_by_id(result.history_id)
        .one(app.db())
        .await
        .unwrap()
        .unwrap()
}

fn allocation(
    name: &str,
    dispatch_qty: i32,
    batches: Vec<(Uuid, InventoryKind, i32)>,
) -> BTreeMap<String, DispatchItemInput> {
    let mut items = BTreeMap::new();
    items.insert(
        "p1".to_string(),
        DispatchItemInput {
            name: name.to_string(),
            dispatch_qty,
            batches: batches
                .into_iter()
                .map(|(batch_id, inventory_kind, quantity)| BatchSelection {
                    batch_id,
                    inventory_kind,
                    quantity,
                })
                .collect(),
        },
    );
    items
}

#[tokio::test]
async fn exact_allocation_across_two_batches_commits() {
    let app = TestApp::new().await;
    let history = approved_history(&app, 50).await;
    let batch_a = app.seed_bulk_batch("Green Tea", "B-A", dec!(30)).await;
    let batch_b = app.seed_bulk_batch("Green Tea", "B-B", dec!(40)).await;

    let result = app
        .state
        .services
        .dispatch
        .dispatch(
            history.id,
            allocation(
                "Green Tea",
                50,
                vec![
                    (batch_a.id, InventoryKind::Bulk, 30),
                    (batch_b.id, InventoryKind::Bulk, 20),
                ],
            ),
            Some("first load of the day".to_string()),
            &app.dispatcher(),
        )
        .await
        .expect("dispatch should commit");

    assert_eq!(result.dispatched_items, 1);

    // Inventory decremented exactly.
    let a = bulk_inventory::Entity::find_by_id(batch_a.id)
        .one(app.db())
        .await
        .unwrap()
        .unwrap();
    let b = bulk_inventory::Entity::find_by_id(batch_b.id)
        .one(app.db())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(a.quantity, dec!(0));
    assert_eq!(b.quantity, dec!(20));

    // History flagged, dispatch record persisted, movements logged.
    let refreshed = approval_history::Entity::find_by_id(history.id)
        .one(app.db())
        .await
        .unwrap()
        .unwrap();
    assert!(refreshed.is_dispatched);

    let record = dispatch_record::Entity::find_by_id(result.dispatch_id)
        .one(app.db())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.history_id, history.id);
    assert_eq!(record.dispatched_by, "fg-operator-1");

    let movements = stock_movement::Entity::find().all(app.db()).await.unwrap();
    assert_eq!(movements.len(), 2);
    assert!(movements.iter().all(|m| m.quantity_change < dec!(0)));
}

#[tokio::test]
async fn under_allocation_rejects_with_message() {
    let app = TestApp::new().await;
    let history = approved_history(&app, 50).await;
    let batch = app.seed_bulk_batch("Green Tea", "B-A", dec!(30)).await;

    let result = app
        .state
        .services
        .dispatch
        .dispatch(
            history.id,
            allocation("Green Tea", 50, vec![(batch.id, InventoryKind::Bulk, 30)]),
            None,
            &app.dispatcher(),
        )
        .await;

    match result {
        Err(ServiceError::ValidationError(msg)) => {
            assert_eq!(msg, "Green Tea: Selected 30, need 50");
        }
        other => panic!("expected validation error, got {:?}", other),
    }

    // Nothing committed.
    let batch_after = bulk_inventory::Entity::find_by_id(batch.id)
        .one(app.db())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(batch_after.quantity, dec!(30));
    assert!(dispatch_record::Entity::find()
        .all(app.db())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn over_allocation_rejects() {
    let app = TestApp::new().await;
    let history = approved_history(&app, 50).await;
    let batch_a = app.seed_bulk_batch("Green Tea", "B-A", dec!(40)).await;
    let batch_b = app.seed_bulk_batch("Green Tea", "B-B", dec!(40)).await;

    let result = app
        .state
        .services
        .dispatch
        .dispatch(
            history.id,
            allocation(
                "Green Tea",
                50,
                vec![
                    (batch_a.id, InventoryKind::Bulk, 40),
                    (batch_b.id, InventoryKind::Bulk, 20),
                ],
            ),
            None,
            &app.dispatcher(),
        )
        .await;

    match result {
        Err(ServiceError::ValidationError(msg)) => {
            assert_eq!(msg, "Green Tea: Selected 60, only need 50");
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn stale_snapshot_insufficient_stock_rolls_back_everything() {
    let app = TestApp::new().await;
    let history = approved_history(&app, 50).await;
    let batch_a = app.seed_bulk_batch("Green Tea", "B-A", dec!(30)).await;
    // The operator believes this batch still holds 20; it has 5.
    let batch_b = app.seed_bulk_batch("Green Tea", "B-B", dec!(5)).await;

    let result = app
        .state
        .services
        .dispatch
        .dispatch(
            history.id,
            allocation(
                "Green Tea",
                50,
                vec![
                    (batch_a.id, InventoryKind::Bulk, 30),
                    (batch_b.id, InventoryKind::Bulk, 20),
                ],
            ),
            None,
            &app.dispatcher(),
        )
        .await;

    assert_matches!(result, Err(ServiceError::InsufficientStock(_)));

    // Batch A's decrement must have been rolled back with the rest.
    let a = bulk_inventory::Entity::find_by_id(batch_a.id)
        .one(app.db())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(a.quantity, dec!(30));

    let refreshed = approval_history::Entity::find_by_id(history.id)
        .one(app.db())
        .await
        .unwrap()
        .unwrap();
    assert!(!refreshed.is_dispatched);

    assert!(stock_movement::Entity::find()
        .all(app.db())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn packaged_batches_participate_in_allocation() {
    let app = TestApp::new().await;
    let history = approved_history(&app, 25).await;
    let bulk = app.seed_bulk_batch("Green Tea", "B-A", dec!(20)).await;
    let packaged = app.seed_packaged_batch("Green Tea", "B-P", 10).await;

    app.state
        .services
        .dispatch
        .dispatch(
            history.id,
            allocation(
                "Green Tea",
                25,
                vec![
                    (bulk.id, InventoryKind::Bulk, 20),
                    (packaged.id, InventoryKind::Packaged, 5),
                ],
            ),
            None,
            &app.dispatcher(),
        )
        .await
        .unwrap();

    let packaged_after = packaged_inventory::Entity::find_by_id(packaged.id)
        .one(app.db())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(packaged_after.units_in_stock, 5);
}

#[tokio::test]
async fn dispatching_twice_is_rejected() {
    let app = TestApp::new().await;
    let history = approved_history(&app, 10).await;
    let batch = app.seed_bulk_batch("Green Tea", "B-A", dec!(30)).await;

    app.state
        .services
        .dispatch
        .dispatch(
            history.id,
            allocation("Green Tea", 10, vec![(batch.id, InventoryKind::Bulk, 10)]),
            None,
            &app.dispatcher(),
        )
        .await
        .unwrap();

    let second = app
        .state
        .services
        .dispatch
        .dispatch(
            history.id,
            allocation("Green Tea", 10, vec![(batch.id, InventoryKind::Bulk, 10)]),
            None,
            &app.dispatcher(),
        )
        .await;

    assert_matches!(second, Err(ServiceError::InvalidOperation(_)));
}

#[tokio::test]
async fn dispatch_quantity_above_approved_is_rejected() {
    let app = TestApp::new().await;
    let history = approved_history(&app, 10).await;
    let batch = app.seed_bulk_batch("Green Tea", "B-A", dec!(100)).await;

    let result = app
        .state
        .services
        .dispatch
        .dispatch(
            history.id,
            allocation("Green Tea", 40, vec![(batch.id, InventoryKind::Bulk, 40)]),
            None,
            &app.dispatcher(),
        )
        .await;

    match result {
        Err(ServiceError::ValidationError(msg)) => {
            assert!(msg.contains("exceeds approved"), "message: {}", msg);
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn available_inventory_snapshot_filters_by_product_and_stock() {
    let app = TestApp::new().await;
    let history = approved_history(&app, 10).await;
    app.seed_bulk_batch("Green Tea", "B-A", dec!(30)).await;
    app.seed_bulk_batch("Green Tea", "B-EMPTY", dec!(0)).await;
    app.seed_bulk_batch("Cinnamon", "B-X", dec!(50)).await;
    app.seed_packaged_batch("Green Tea", "B-P", 12).await;

    let snapshot = app
        .state
        .services
        .dispatch
        .available_inventory(history.id)
        .await
        .unwrap();

    let available = snapshot.get("p1").expect("item present in snapshot");
    assert_eq!(available.bulk.len(), 1);
    assert_eq!(available.bulk[0].batch_number, "B-A");
    assert_eq!(available.packaged.len(), 1);
    assert_eq!(available.packaged[0].batch_number, "B-P");
}

#[tokio::test]
async fn empty_submission_is_rejected_without_dispatcher_lookup() {
    let app = TestApp::new().await;
    let history = approved_history(&app, 10).await;

    let result = app
        .state
        .services
        .dispatch
        .dispatch(
            history.id,
            allocation("Green Tea", 0, vec![]),
            None,
            &SessionUser {
                uid: "op".into(),
                display_name: "Op".into(),
                role: "FinishedGoodsStoreManager".into(),
            },
        )
        .await;

    assert_matches!(result, Err(ServiceError::ValidationError(_)));
}
