pub mod approvals;
pub mod dispatch;
pub mod health;
pub mod imports;
pub mod inventory;
pub mod notifications;
pub mod pricing;
pub mod showrooms;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::events::EventSender;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub approvals: Arc<crate::services::approvals::ApprovalService>,
    pub dispatch: Arc<crate::services::dispatch::DispatchService>,
    pub inventory: Arc<crate::services::inventory::InventoryService>,
    pub pricing: Arc<crate::services::pricing::PricingService>,
    pub showrooms: Arc<crate::services::showrooms::ShowroomService>,
    pub notifications: Arc<crate::services::notifications::NotificationService>,
    pub imports: Arc<crate::services::imports::ImportService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>, cfg: &AppConfig) -> Self {
        let notifications = Arc::new(crate::services::notifications::NotificationService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let approvals = Arc::new(crate::services::approvals::ApprovalService::new(
            db_pool.clone(),
            event_sender.clone(),
            notifications.clone(),
            cfg.dispatch_notify_role.clone(),
        ));
        let dispatch = Arc::new(crate::services::dispatch::DispatchService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let inventory = Arc::new(crate::services::inventory::InventoryService::new(
            db_pool.clone(),
            event_sender.clone(),
            cfg.default_location.clone(),
        ));
        let pricing = Arc::new(crate::services::pricing::PricingService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let showrooms = Arc::new(crate::services::showrooms::ShowroomService::new(
            db_pool,
            event_sender,
        ));
        let imports = Arc::new(crate::services::imports::ImportService::new(
            inventory.clone(),
            pricing.clone(),
        ));

        Self {
            approvals,
            dispatch,
            inventory,
            pricing,
            showrooms,
            notifications,
            imports,
        }
    }
}
