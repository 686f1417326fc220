use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::QualityGrade;

/// Packaged stock tracked by discrete unit count with a size variant.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "packaged_inventory")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_id: String,
    pub product_name: String,
    pub variant_name: String,
    pub variant_size: String,
    pub variant_unit: String,
    pub batch_number: String,
    pub units_in_stock: i32,
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
