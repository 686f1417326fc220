use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{InventoryKind, MovementType};

/// Append-only log of every stock change: receipts, dispatch draws, and
/// manual adjustments. `quantity_change` is signed.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_movements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub movement_type: MovementType,
    pub inventory_kind: InventoryKind,
    pub product_id: String,
    pub product_name: String,
    pub batch_number: String,
    pub quantity_change: Decimal,
    pub location: String,
    /// Release or dispatch reference code tying the movement to its source.
    pub reference: String,
    pub reason: Option<String>,
    pub recorded_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
