mod common;

use assert_matches::assert_matches;
use common::TestApp;
use fgstore_api::{
    entities::user,
    errors::ServiceError,
    models::ShowroomStatus,
    services::showrooms::{CreateShowroomInput, UpdateShowroomInput},
};
use rust_decimal_macros::dec;
use sea_orm::EntityTrait;

fn showroom_input(code: &str) -> CreateShowroomInput {
    CreateShowroomInput {
        name: "Colombo Flagship".to_string(),
        code: code.to_string(),
        location: "Galle Road".to_string(),
        city: "Colombo".to_string(),
        contact_number: None,
        email: None,
        manager_id: None,
        status: None,
        opening_hours: None,
        target_sales: None,
    }
}

#[tokio::test]
async fn create_uppercases_code_and_applies_defaults() {
    let app = TestApp::new().await;

    let created = app
        .state
        .services
        .showrooms
        .create(showroom_input("ds001"), &app.approver())
        .await
        .unwrap();

    assert_eq!(created.code, "DS001");
    assert_eq!(created.status, ShowroomStatus::Active);
    assert_eq!(created.target_sales, dec!(0));
    assert_eq!(created.opening_hours["sunday"], "closed");
    assert_eq!(created.opening_hours["monday"], "9:00-18:00");
    assert_eq!(created.created_by, "approver-1");
}

#[tokio::test]
async fn lookup_by_code_is_case_insensitive() {
    let app = TestApp::new().await;
    app.state
        .services
        .showrooms
        .create(showroom_input("ds001"), &app.approver())
        .await
        .unwrap();

    let found = app
        .state
        .services
        .showrooms
        .get_by_code("DS001")
        .await
        .unwrap();
    assert!(found.is_some());

    let found_lower = app
        .state
        .services
        .showrooms
        .get_by_code("ds001")
        .await
        .unwrap();
    assert!(found_lower.is_some());
}

#[tokio::test]
async fn duplicate_code_is_rejected_case_insensitively() {
    let app = TestApp::new().await;
    app.state
        .services
        .showrooms
        .create(showroom_input("ds001"), &app.approver())
        .await
        .unwrap();

    let second = app
        .state
        .services
        .showrooms
        .create(showroom_input("DS001"), &app.approver())
        .await;

    assert_matches!(second, Err(ServiceError::Conflict(_)));
}

#[tokio::test]
async fn manager_reassignment_moves_the_back_reference() {
    let app = TestApp::new().await;
    app.seed_user("mgr-1", "First Manager", "ShowroomManager").await;
    app.seed_user("mgr-2", "Second Manager", "ShowroomManager").await;

    let mut input = showroom_input("ds002");
    input.manager_id = Some("mgr-1".to_string());
    let created = app
        .state
        .services
        .showrooms
        .create(input, &app.approver())
        .await
        .unwrap();

    let first = user::Entity::find_by_id("mgr-1".to_string())
        .one(app.db())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.showroom_id, Some(created.id));
    assert_eq!(first.showroom_code.as_deref(), Some("DS002"));

    app.state
        .services
        .showrooms
        .update(
            created.id,
            UpdateShowroomInput {
                manager_id: Some(Some("mgr-2".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let first_after = user::Entity::find_by_id("mgr-1".to_string())
        .one(app.db())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first_after.showroom_id, None);
    assert_eq!(first_after.showroom_code, None);

    let second = user::Entity::find_by_id("mgr-2".to_string())
        .one(app.db())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second.showroom_id, Some(created.id));
    assert_eq!(second.showroom_name.as_deref(), Some("Colombo Flagship"));
}

#[tokio::test]
async fn assigning_an_unknown_manager_fails_whole_creation() {
    let app = TestApp::new().await;

    let mut input = showroom_input("ds003");
    input.manager_id = Some("ghost".to_string());
    let result = app
        .state
        .services
        .showrooms
        .create(input, &app.approver())
        .await;

    assert_matches!(result, Err(ServiceError::NotFound(_)));

    // The showroom row must not survive the failed transaction.
    let leftover = app
        .state
        .services
        .showrooms
        .get_by_code("DS003")
        .await
        .unwrap();
    assert!(leftover.is_none());
}

#[tokio::test]
async fn code_change_rechecks_uniqueness() {
    let app = TestApp::new().await;
    app.state
        .services
        .showrooms
        .create(showroom_input("ds001"), &app.approver())
        .await
        .unwrap();
    let other = app
        .state
        .services
        .showrooms
        .create(showroom_input("ds002"), &app.approver())
        .await
        .unwrap();

    let result = app
        .state
        .services
        .showrooms
        .update(
            other.id,
            UpdateShowroomInput {
                code: Some("ds001".to_string()),
                ..Default::default()
            },
        )
        .await;

    assert_matches!(result, Err(ServiceError::Conflict(_)));
}

#[tokio::test]
async fn delete_is_a_soft_status_transition() {
    let app = TestApp::new().await;
    app.seed_user("mgr-1", "First Manager", "ShowroomManager").await;

    let mut input = showroom_input("ds004");
    input.manager_id = Some("mgr-1".to_string());
    let created = app
        .state
        .services
        .showrooms
        .create(input, &app.approver())
        .await
        .unwrap();

    app.state.services.showrooms.delete(created.id).await.unwrap();

    let after = app
        .state
        .services
        .showrooms
        .get(&created.id)
        .await
        .unwrap()
        .expect("row must still exist");
    assert_eq!(after.status, ShowroomStatus::Inactive);
    assert_eq!(after.manager_id, None);

    let manager = user::Entity::find_by_id("mgr-1".to_string())
        .one(app.db())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(manager.showroom_id, None);

    let active = app.state.services.showrooms.list_active().await.unwrap();
    assert!(active.is_empty());
}

#[tokio::test]
async fn stats_count_staff_through_back_references() {
    let app = TestApp::new().await;
    app.seed_user("mgr-1", "Manager", "ShowroomManager").await;

    let mut input = showroom_input("ds005");
    input.manager_id = Some("mgr-1".to_string());
    input.target_sales = Some(dec!(250000));
    let created = app
        .state
        .services
        .showrooms
        .create(input, &app.approver())
        .await
        .unwrap();

    let stats = app.state.services.showrooms.stats(created.id).await.unwrap();
    assert_eq!(stats.total_staff, 1);
    assert_eq!(stats.active_staff, 1);
    assert_eq!(stats.target_sales, dec!(250000));
}
