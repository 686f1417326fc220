use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{RequestStatus, RequestType};

/// Immutable snapshot taken when a sales request is approved. Only the
/// dispatch workflow touches a row afterwards, and only the
/// `is_dispatched` / `is_completed_by_fg` flags.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "approval_history")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub request_id: Uuid,
    /// Canonical items copy, detached from the source request.
    #[sea_orm(column_type = "Json")]
    pub items: Json,
    /// Derived once at approval time; always a finite number.
    pub total_quantity: Decimal,
    pub requester_id: String,
    pub requester_name: String,
    pub requester_role: String,
    pub request_type: RequestType,
    pub record_type: String,
    pub priority: String,
    pub notes: Option<String>,
    pub status: RequestStatus,
    pub approved_by: String,
    pub approver_name: String,
    pub approver_role: String,
    pub approved_at: DateTime<Utc>,
    pub is_dispatched: bool,
    pub is_completed_by_fg: bool,
    pub shop_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
