use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::QualityGrade;

/// Bulk stock tracked by continuous quantity and unit (kg, liters).
/// Rows are never hard-deleted; dispatch and adjustments drive the
/// quantity toward zero.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bulk_inventory")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_id: String,
    pub product_name: String,
    pub batch_number: String,
    pub quantity: Decimal,
    pub unit: String,
    pub quality_grade: QualityGrade,
    pub expiry_date: Option<Date>,
    pub release_code: String,
    pub location: String,
    pub received_from: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
