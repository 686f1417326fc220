use std::sync::Arc;

use axum::{routing::get, Router};
use chrono::Utc;
use fgstore_api::{
    auth::SessionUser,
    config::AppConfig,
    db::{self, DbPool},
    entities::{bulk_inventory, packaged_inventory, sales_request, user},
    events::{self, EventSender},
    handlers::AppServices,
    models::{QualityGrade, RequestStatus, RequestType},
    AppState,
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::Value;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Helper harness spinning up application state backed by an in-memory
/// SQLite database with the full schema migrated.
pub struct TestApp {
    pub state: AppState,
    pub router: Router,
    _event_task: tokio::task::JoinHandle<()>,
}

fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
        log_level: "debug".to_string(),
        log_json: false,
        auto_migrate: true,
        db_max_connections: 1,
        db_min_connections: 1,
        db_connect_timeout_secs: 5,
        request_timeout_secs: 30,
        cors_allowed_origins: None,
        default_location: "FG-A1".to_string(),
        dispatch_notify_role: "FinishedGoodsStoreManager".to_string(),
    }
}

impl TestApp {
    pub async fn new() -> Self {
        let cfg = test_config();

        let pool = db::connect(&cfg.database_url)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations");

        let db_arc = Arc::new(pool);
        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let services = AppServices::new(db_arc.clone(), Arc::new(event_sender.clone()), &cfg);

        let state = AppState {
            db: db_arc,
            config: cfg,
            event_sender,
            services,
        };

        let router = Router::new()
            .route("/health", get(fgstore_api::handlers::health::health))
            .nest("/api/v1", fgstore_api::api_v1_routes())
            .with_state(state.clone());

        Self {
            state,
            router,
            _event_task: event_task,
        }
    }

    pub fn db(&self) -> &DbPool {
        &self.state.db
    }

    pub fn approver(&self) -> SessionUser {
        SessionUser {
            uid: "approver-1".to_string(),
            display_name: "Head of Operations".to_string(),
            role: "HeadOfOperations".to_string(),
        }
    }

    pub fn dispatcher(&self) -> SessionUser {
        SessionUser {
            uid: "fg-operator-1".to_string(),
            display_name: "FG Operator".to_string(),
            role: "FinishedGoodsStoreManager".to_string(),
        }
    }

    pub async fn seed_user(&self, uid: &str, display_name: &str, role: &str) -> user::Model {
        user::ActiveModel {
            id: Set(uid.to_string()),
            display_name: Set(display_name.to_string()),
            role: Set(role.to_string()),
            status: Set("active".to_string()),
            showroom_id: Set(None),
            showroom_name: Set(None),
            showroom_code: Set(None),
            created_at: Set(Utc::now()),
        }
        .insert(self.db())
        .await
        .expect("failed to seed user")
    }

    /// Pending direct-representative request with explicit item fields;
    /// pass `None` to leave a legacy column empty.
    pub async fn seed_request(
        &self,
        items: Option<Value>,
        product: Option<&str>,
        quantity: Option<Value>,
        products: Option<Value>,
    ) -> sales_request::Model {
        sales_request::ActiveModel {
            id: Set(Uuid::new_v4()),
            request_type: Set(RequestType::DirectRepresentative),
            requested_by: Set("rep-1".to_string()),
            requested_by_name: Set("Nimal Fernando".to_string()),
            requester_role: Set("DirectRepresentative".to_string()),
            items: Set(items),
            product: Set(product.map(|p| p.to_string())),
            quantity: Set(quantity),
            products: Set(products),
            priority: Set("normal".to_string()),
            notes: Set(None),
            shop_name: Set(None),
            status: Set(RequestStatus::Pending),
            approved_by: Set(None),
            approver_name: Set(None),
            approver_role: Set(None),
            approved_at: Set(None),
            rejected_by: Set(None),
            rejection_reason: Set(None),
            rejected_at: Set(None),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(self.db())
        .await
        .expect("failed to seed request")
    }

    pub async fn seed_bulk_batch(
        &self,
        product_name: &str,
        batch_number: &str,
        quantity: Decimal,
    ) -> bulk_inventory::Model {
        bulk_inventory::ActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(format!("{}-id", product_name)),
            product_name: Set(product_name.to_string()),
            batch_number: Set(batch_number.to_string()),
            quantity: Set(quantity),
            unit: Set("kg".to_string()),
            quality_grade: Set(QualityGrade::A),
            expiry_date: Set(None),
            release_code: Set("2608070001".to_string()),
            location: Set("FG-A1".to_string()),
            received_from: Set("manual_entry".to_string()),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(self.db())
        .await
        .expect("failed to seed bulk batch")
    }

    pub async fn seed_packaged_batch(
        &self,
        product_name: &str,
        batch_number: &str,
        units_in_stock: i32,
    ) -> packaged_inventory::Model {
        packaged_inventory::ActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(format!("{}-id", product_name)),
            product_name: Set(product_name.to_string()),
            variant_name: Set("250g pack".to_string()),
            variant_size: Set("250".to_string()),
            variant_unit: Set("g".to_string()),
            batch_number: Set(batch_number.to_string()),
            units_in_stock: Set(units_in_stock),
            quality_grade: Set(QualityGrade::A),
            expiry_date: Set(None),
            release_code: Set("2608070002".to_string()),
            location: Set("FG-A1".to_string()),
            received_from: Set("manual_entry".to_string()),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(self.db())
        .await
        .expect("failed to seed packaged batch")
    }
}
