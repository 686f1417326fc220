use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::ShowroomStatus;

/// A direct-sales location. `code` is unique and stored uppercase;
/// deletion is a soft transition to `inactive`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "showrooms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[validate(length(min = 1, max = 120, message = "Showroom name must be between 1 and 120 characters"))]
    pub name: String,
    #[sea_orm(unique)]
    pub code: String,
    pub location: String,
    pub city: String,
    pub contact_number: String,
    pub email: String,
    /// Back-reference to the managing user; paired fields live on the
    /// user row and are maintained together with this one.
    pub manager_id: Option<String>,
    pub status: ShowroomStatus,
    /// Per-weekday opening hour strings.
    #[sea_orm(column_type = "Json")]
    pub opening_hours: Json,
    pub target_sales: Decimal,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
