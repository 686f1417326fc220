use crate::{
    auth::SessionUser,
    db::DbPool,
    entities::{showroom, user},
    errors::ServiceError,
    events::{Event, EventSender},
    models::ShowroomStatus,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionError, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateShowroomInput {
    #[validate(length(min = 1, max = 120, message = "Showroom name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 16, message = "Showroom code is required"))]
    pub code: String,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub manager_id: Option<String>,
    pub status: Option<ShowroomStatus>,
    pub opening_hours: Option<serde_json::Value>,
    pub target_sales: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateShowroomInput {
    pub name: Option<String>,
    pub code: Option<String>,
    pub location: Option<String>,
    pub city: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    /// `Some(None)` clears the manager, `Some(Some(id))` reassigns.
    pub manager_id: Option<Option<String>>,
    pub status: Option<ShowroomStatus>,
    pub opening_hours: Option<serde_json::Value>,
    pub target_sales: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShowroomStats {
    pub showroom: showroom::Model,
    pub total_staff: usize,
    pub active_staff: usize,
    pub target_sales: Decimal,
}

/// Mon-Sat working hours, closed Sundays.
fn default_opening_hours() -> serde_json::Value {
    json!({
        "monday": "9:00-18:00",
        "tuesday": "9:00-18:00",
        "wednesday": "9:00-18:00",
        "thursday": "9:00-18:00",
        "friday": "9:00-18:00",
        "saturday": "9:00-18:00",
        "sunday": "closed",
    })
}

/// Direct showroom administration. Codes are stored uppercase and kept
/// unique; the manager link is bidirectional (showroom.manager_id plus
/// denormalized showroom fields on the user row) and every mutation that
/// touches either side goes through one maintenance routine.
#[derive(Clone)]
pub struct ShowroomService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl ShowroomService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, input, creator))]
    pub async fn create(
        &self,
        input: CreateShowroomInput,
        creator: &SessionUser,
    ) -> Result<showroom::Model, ServiceError> {
        input.validate()?;

        let db = &*self.db_pool;
        let now = Utc::now();
        let id = Uuid::new_v4();
        let code = input.code.trim().to_ascii_uppercase();
        let creator_id = creator.uid.clone();
        let input_clone = input.clone();

        let saved = db
            .transaction::<_, showroom::Model, ServiceError>(move |txn| {
                let input = input_clone;
                let code = code.clone();
                let creator_id = creator_id.clone();
                Box::pin(async move {
                    let duplicate = showroom::Entity::find()
                        .filter(showroom::Column::Code.eq(code.clone()))
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?;
                    if duplicate.is_some() {
                        return Err(ServiceError::Conflict(
                            "Showroom code already exists".to_string(),
                        ));
                    }

                    let row = showroom::ActiveModel {
                        id: Set(id),
                        name: Set(input.name.clone()),
                        code: Set(code.clone()),
                        location: Set(input.location.clone()),
                        city: Set(input.city.clone()),
                        contact_number: Set(input.contact_number.clone().unwrap_or_default()),
                        email: Set(input.email.clone().unwrap_or_default()),
                        manager_id: Set(input.manager_id.clone()),
                        status: Set(input.status.unwrap_or(ShowroomStatus::Active)),
                        opening_hours: Set(input
                            .opening_hours
                            .clone()
                            .unwrap_or_else(default_opening_hours)),
                        target_sales: Set(input.target_sales.unwrap_or(Decimal::ZERO)),
                        created_by: Set(creator_id),
                        created_at: Set(now),
                        updated_at: Set(None),
                    };
                    let saved = row.insert(txn).await.map_err(ServiceError::db_error)?;

                    if let Some(manager_id) = &input.manager_id {
                        set_manager_link(
                            txn,
                            manager_id,
                            Some((saved.id, saved.name.clone(), saved.code.clone())),
                        )
                        .await?;
                    }

                    Ok(saved)
                })
            })
            .await
            .map_err(unwrap_transaction_error)?;

        info!(showroom_id = %saved.id, code = %saved.code, "Showroom created");
        self.event_sender
            .send_logged(Event::ShowroomCreated(saved.id))
            .await;

        Ok(saved)
    }

    #[instrument(skip(self, updates))]
    pub async fn update(
        &self,
        id: Uuid,
        updates: UpdateShowroomInput,
    ) -> Result<showroom::Model, ServiceError> {
        let db = &*self.db_pool;
        let now = Utc::now();
        let updates_clone = updates.clone();

        let saved = db
            .transaction::<_, showroom::Model, ServiceError>(move |txn| {
                let updates = updates_clone;
                Box::pin(async move {
                    let existing = showroom::Entity::find_by_id(id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Showroom {} not found", id))
                        })?;

                    let new_code = match &updates.code {
                        Some(code) => {
                            let code = code.trim().to_ascii_uppercase();
                            if code != existing.code {
                                let clash = showroom::Entity::find()
                                    .filter(showroom::Column::Code.eq(code.clone()))
                                    .filter(showroom::Column::Id.ne(id))
                                    .one(txn)
                                    .await
                                    .map_err(ServiceError::db_error)?;
                                if clash.is_some() {
                                    return Err(ServiceError::Conflict(
                                        "Showroom code already exists".to_string(),
                                    ));
                                }
                            }
                            code
                        }
                        None => existing.code.clone(),
                    };

                    let old_manager = existing.manager_id.clone();
                    let new_manager = match &updates.manager_id {
                        Some(value) => value.clone(),
                        None => old_manager.clone(),
                    };
                    let new_name = updates.name.clone().unwrap_or_else(|| existing.name.clone());

                    let mut active: showroom::ActiveModel = existing.into();
                    active.name = Set(new_name.clone());
                    active.code = Set(new_code.clone());
                    if let Some(location) = updates.location.clone() {
                        active.location = Set(location);
                    }
                    if let Some(city) = updates.city.clone() {
                        active.city = Set(city);
                    }
                    if let Some(contact_number) = updates.contact_number.clone() {
                        active.contact_number = Set(contact_number);
                    }
                    if let Some(email) = updates.email.clone() {
                        active.email = Set(email);
                    }
                    if let Some(status) = updates.status {
                        active.status = Set(status);
                    }
                    if let Some(opening_hours) = updates.opening_hours.clone() {
                        active.opening_hours = Set(opening_hours);
                    }
                    if let Some(target_sales) = updates.target_sales {
                        active.target_sales = Set(target_sales);
                    }
                    active.manager_id = Set(new_manager.clone());
                    active.updated_at = Set(Some(now));

                    let saved = active.update(txn).await.map_err(ServiceError::db_error)?;

                    // Keep both sides of the manager link in step.
                    if let Some(old) = &old_manager {
                        if new_manager.as_deref() != Some(old.as_str()) {
                            set_manager_link(txn, old, None).await?;
                        }
                    }
                    if let Some(new) = &new_manager {
                        set_manager_link(
                            txn,
                            new,
                            Some((saved.id, saved.name.clone(), saved.code.clone())),
                        )
                        .await?;
                    }

                    Ok(saved)
                })
            })
            .await
            .map_err(unwrap_transaction_error)?;

        self.event_sender
            .send_logged(Event::ShowroomUpdated(saved.id))
            .await;

        Ok(saved)
    }

    /// Soft delete: the row stays, status flips to inactive, and the
    /// manager back-reference is cleared.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let now = Utc::now();

        db.transaction::<_, (), ServiceError>(move |txn| {
            Box::pin(async move {
                let existing = showroom::Entity::find_by_id(id)
                    .one(txn)
                    .await
                    .map_err(ServiceError::db_error)?
                    .ok_or_else(|| ServiceError::NotFound(format!("Showroom {} not found", id)))?;

                if let Some(manager_id) = &existing.manager_id {
                    set_manager_link(txn, manager_id, None).await?;
                }

                let mut active: showroom::ActiveModel = existing.into();
                active.manager_id = Set(None);
                active.status = Set(ShowroomStatus::Inactive);
                active.updated_at = Set(Some(now));
                active.update(txn).await.map_err(ServiceError::db_error)?;

                Ok(())
            })
        })
        .await
        .map_err(unwrap_transaction_error)?;

        info!(showroom_id = %id, "Showroom deactivated");
        self.event_sender
            .send_logged(Event::ShowroomDeactivated(id))
            .await;

        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &Uuid) -> Result<Option<showroom::Model>, ServiceError> {
        let db = &*self.db_pool;
        showroom::Entity::find_by_id(*id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// Case-insensitive lookup by code (codes are stored uppercase).
    #[instrument(skip(self))]
    pub async fn get_by_code(&self, code: &str) -> Result<Option<showroom::Model>, ServiceError> {
        let db = &*self.db_pool;
        showroom::Entity::find()
            .filter(showroom::Column::Code.eq(code.trim().to_ascii_uppercase()))
            .one(db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// Lists showrooms with pagination, newest first.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<showroom::Model>, u64), ServiceError> {
        let db = &*self.db_pool;
        let paginator = showroom::Entity::find()
            .order_by_desc(showroom::Column::CreatedAt)
            .paginate(db, limit);
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let rows = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;
        Ok((rows, total))
    }

    #[instrument(skip(self))]
    pub async fn list_active(&self) -> Result<Vec<showroom::Model>, ServiceError> {
        let db = &*self.db_pool;
        showroom::Entity::find()
            .filter(showroom::Column::Status.eq(ShowroomStatus::Active))
            .order_by_desc(showroom::Column::CreatedAt)
            .all(db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// Users whose back-reference points at this showroom.
    #[instrument(skip(self))]
    pub async fn staff(&self, showroom_id: Uuid) -> Result<Vec<user::Model>, ServiceError> {
        let db = &*self.db_pool;
        user::Entity::find()
            .filter(user::Column::ShowroomId.eq(showroom_id))
            .all(db)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn stats(&self, showroom_id: Uuid) -> Result<ShowroomStats, ServiceError> {
        let showroom = self
            .get(&showroom_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Showroom {} not found", showroom_id)))?;
        let staff = self.staff(showroom_id).await?;

        let active_staff = staff.iter().filter(|s| s.status == "active").count();
        let target_sales = showroom.target_sales;

        Ok(ShowroomStats {
            showroom,
            total_staff: staff.len(),
            active_staff,
            target_sales,
        })
    }

    pub async fn assign_manager(
        &self,
        showroom_id: Uuid,
        manager_id: String,
    ) -> Result<showroom::Model, ServiceError> {
        self.update(
            showroom_id,
            UpdateShowroomInput {
                manager_id: Some(Some(manager_id)),
                ..Default::default()
            },
        )
        .await
    }
}

/// The one place the user side of the showroom/manager link is written.
/// `link == None` clears the back-reference.
async fn set_manager_link<C>(
    conn: &C,
    user_id: &str,
    link: Option<(Uuid, String, String)>,
) -> Result<(), ServiceError>
where
    C: ConnectionTrait,
{
    let row = user::Entity::find_by_id(user_id.to_string())
        .one(conn)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| ServiceError::NotFound(format!("Manager user {} not found", user_id)))?;

    let mut active: user::ActiveModel = row.into();
    match link {
        Some((showroom_id, name, code)) => {
            active.showroom_id = Set(Some(showroom_id));
            active.showroom_name = Set(Some(name));
            active.showroom_code = Set(Some(code));
        }
        None => {
            active.showroom_id = Set(None);
            active.showroom_name = Set(None);
            active.showroom_code = Set(None);
        }
    }
    active.update(conn).await.map_err(ServiceError::db_error)?;
    Ok(())
}

fn unwrap_transaction_error(e: TransactionError<ServiceError>) -> ServiceError {
    match e {
        TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
        TransactionError::Transaction(service_err) => service_err,
    }
}
