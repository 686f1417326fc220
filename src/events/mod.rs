use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::InventoryKind;

/// Domain events emitted after state changes commit. Consumers are
/// in-process only; delivery is best-effort and never blocks the
/// originating operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    RequestApproved {
        request_id: Uuid,
        history_id: Uuid,
        total_quantity: Decimal,
    },
    RequestRejected {
        request_id: Uuid,
    },
    RequestDispatched {
        history_id: Uuid,
        dispatch_id: Uuid,
        reference_code: String,
    },
    /// Post-commit verification could not read the history row back.
    HistoryVerificationFailed {
        request_id: Uuid,
        history_id: Uuid,
    },
    InventoryReceived {
        kind: InventoryKind,
        product_id: String,
        batch_number: String,
        quantity: Decimal,
    },
    InventoryAdjusted {
        kind: InventoryKind,
        product_id: String,
        batch_number: String,
        quantity_change: Decimal,
        reason: String,
    },
    PriceChanged {
        product_key: String,
        previous_price: Decimal,
        new_price: Decimal,
    },
    ShowroomCreated(Uuid),
    ShowroomUpdated(Uuid),
    ShowroomDeactivated(Uuid),
    NotificationQueued {
        user_id: String,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Fire-and-forget send used after commits where a full channel must
    /// not fail the operation.
    pub async fn send_logged(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            warn!("Dropping event: {}", e);
        }
    }
}

/// Event processing loop. Everything is logged; the verification-failure
/// event is surfaced at error level so operators can reconcile manually.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::HistoryVerificationFailed {
                request_id,
                history_id,
            } => {
                tracing::error!(
                    request_id = %request_id,
                    history_id = %history_id,
                    "approval history record missing on read-back; request remains Approved"
                );
            }
            other => {
                info!("Received event: {:?}", other);
            }
        }
    }

    info!("Event processing loop stopped");
}
