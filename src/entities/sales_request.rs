use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{RequestStatus, RequestType};

/// A sales request as submitted by a requesting channel. The item fields
/// intentionally mirror the legacy record shapes: `items` may hold an
/// object or a JSON-encoded string, and old records carry a flat
/// `product`/`quantity` pair or a `products` field instead.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub request_type: RequestType,
    pub requested_by: String,
    pub requested_by_name: String,
    pub requester_role: String,
    #[sea_orm(column_type = "Json", nullable)]
    pub items: Option<Json>,
    pub product: Option<String>,
    #[sea_orm(column_type = "Json", nullable)]
    pub quantity: Option<Json>,
    #[sea_orm(column_type = "Json", nullable)]
    pub products: Option<Json>,
    pub priority: String,
    pub notes: Option<String>,
    pub shop_name: Option<String>,
    pub status: RequestStatus,
    pub approved_by: Option<String>,
    pub approver_name: Option<String>,
    pub approver_role: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_by: Option<String>,
    pub rejection_reason: Option<String>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
