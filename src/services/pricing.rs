use crate::{
    db::DbPool,
    entities::{price_history, product_price},
    errors::ServiceError,
    events::{Event, EventSender},
    models::{Currency, PriceType},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionError, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PriceUpdateInput {
    pub product_name: Option<String>,
    pub price: Decimal,
    pub currency: Currency,
    pub price_type: PriceType,
    #[validate(length(min = 1, message = "Change reason is required"))]
    pub change_reason: String,
    pub effective_date: Option<DateTime<Utc>>,
}

/// Per-product price statistics over the recorded history.
#[derive(Debug, Clone, Serialize)]
pub struct PricingAnalytics {
    pub product_key: String,
    pub change_count: usize,
    pub min_price: Decimal,
    pub max_price: Decimal,
    pub latest_price: Decimal,
    pub average_abs_change_percent: Decimal,
}

/// Percentage change between two prices; a zero base yields zero rather
/// than a division error.
pub fn price_change_percent(previous: Decimal, new: Decimal) -> Decimal {
    if previous == Decimal::ZERO {
        return Decimal::ZERO;
    }
    ((new - previous) / previous * dec!(100)).round_dp(2)
}

/// Current prices plus their append-only change history. The projection
/// row always mirrors the latest history entry.
#[derive(Clone)]
pub struct PricingService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl PricingService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Upsert the current price for a product key and append the history
    /// entry recording the change, atomically.
    #[instrument(skip(self, input))]
    pub async fn update_price(
        &self,
        product_key: &str,
        input: PriceUpdateInput,
        changed_by: &str,
    ) -> Result<product_price::Model, ServiceError> {
        input.validate()?;
        if input.price <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Price must be a positive number".to_string(),
            ));
        }
        let product_key = product_key.trim().to_string();
        if product_key.is_empty() {
            return Err(ServiceError::ValidationError(
                "Product key is required".to_string(),
            ));
        }

        let db = &*self.db_pool;
        let now = Utc::now();
        let effective_date = input.effective_date.unwrap_or(now);
        let changed_by = changed_by.to_string();
        let key = product_key.clone();
        let input_clone = input.clone();

        let (saved, previous_price) = db
            .transaction::<_, (product_price::Model, Decimal), ServiceError>(move |txn| {
                let input = input_clone;
                let product_key = key;
                let changed_by = changed_by.clone();
                Box::pin(async move {
                    let current = product_price::Entity::find()
                        .filter(product_price::Column::ProductKey.eq(product_key.clone()))
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?;

                    let previous_price =
                        current.as_ref().map(|c| c.price).unwrap_or(Decimal::ZERO);
                    let product_name = input
                        .product_name
                        .clone()
                        .or_else(|| current.as_ref().map(|c| c.product_name.clone()))
                        .unwrap_or_else(|| product_key.clone());

                    let saved = match current {
                        Some(row) => {
                            let mut active: product_price::ActiveModel = row.into();
                            active.product_name = Set(product_name.clone());
                            active.price = Set(input.price);
                            active.currency = Set(input.currency);
                            active.price_type = Set(input.price_type);
                            active.effective_date = Set(effective_date);
                            active.updated_at = Set(now);
                            active.update(txn).await.map_err(ServiceError::db_error)?
                        }
                        None => {
                            let row = product_price::ActiveModel {
                                id: Set(Uuid::new_v4()),
                                product_key: Set(product_key.clone()),
                                product_name: Set(product_name.clone()),
                                price: Set(input.price),
                                currency: Set(input.currency),
                                price_type: Set(input.price_type),
                                effective_date: Set(effective_date),
                                updated_at: Set(now),
                            };
                            row.insert(txn).await.map_err(ServiceError::db_error)?
                        }
                    };

                    let entry = price_history::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        product_key: Set(product_key),
                        product_name: Set(product_name),
                        previous_price: Set(previous_price),
                        new_price: Set(input.price),
                        currency: Set(input.currency),
                        price_type: Set(input.price_type),
                        change_reason: Set(input.change_reason.clone()),
                        changed_by: Set(changed_by),
                        effective_date: Set(effective_date),
                        created_at: Set(now),
                    };
                    entry.insert(txn).await.map_err(ServiceError::db_error)?;

                    Ok((saved, previous_price))
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
                TransactionError::Transaction(service_err) => service_err,
            })?;

        self.event_sender
            .send_logged(Event::PriceChanged {
                product_key: saved.product_key.clone(),
                previous_price,
                new_price: saved.price,
            })
            .await;

        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn get_price(
        &self,
        product_key: &str,
    ) -> Result<Option<product_price::Model>, ServiceError> {
        let db = &*self.db_pool;
        product_price::Entity::find()
            .filter(product_price::Column::ProductKey.eq(product_key))
            .one(db)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn list_prices(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<product_price::Model>, u64), ServiceError> {
        let db = &*self.db_pool;
        let paginator = product_price::Entity::find()
            .order_by_asc(product_price::Column::ProductKey)
            .paginate(db, limit);
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let rows = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;
        Ok((rows, total))
    }

    /// Price change log, newest first, optionally per product key.
    #[instrument(skip(self))]
    pub async fn list_history(
        &self,
        product_key: Option<&str>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<price_history::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = price_history::Entity::find()
            .order_by_desc(price_history::Column::CreatedAt);
        if let Some(key) = product_key {
            query = query.filter(price_history::Column::ProductKey.eq(key));
        }

        let paginator = query.paginate(db, limit);
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let rows = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;
        Ok((rows, total))
    }

    /// Aggregate change statistics for one product key.
    #[instrument(skip(self))]
    pub async fn analytics(&self, product_key: &str) -> Result<PricingAnalytics, ServiceError> {
        let db = &*self.db_pool;

        let entries = price_history::Entity::find()
            .filter(price_history::Column::ProductKey.eq(product_key))
            .order_by_asc(price_history::Column::CreatedAt)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        if entries.is_empty() {
            return Err(ServiceError::NotFound(format!(
                "No price history for {}",
                product_key
            )));
        }

        let mut min_price = entries[0].new_price;
        let mut max_price = entries[0].new_price;
        let mut abs_change_sum = Decimal::ZERO;

        for entry in &entries {
            min_price = min_price.min(entry.new_price);
            max_price = max_price.max(entry.new_price);
            abs_change_sum += price_change_percent(entry.previous_price, entry.new_price).abs();
        }

        let latest_price = entries.last().map(|e| e.new_price).unwrap_or(Decimal::ZERO);
        let average_abs_change_percent =
            (abs_change_sum / Decimal::from(entries.len() as u64)).round_dp(2);

        Ok(PricingAnalytics {
            product_key: product_key.to_string(),
            change_count: entries.len(),
            min_price,
            max_price,
            latest_price,
            average_abs_change_percent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_change_of_zero_base_is_zero() {
        assert_eq!(price_change_percent(dec!(0), dec!(150)), dec!(0));
    }

    #[test]
    fn percent_change_is_signed() {
        assert_eq!(price_change_percent(dec!(100), dec!(150)), dec!(50));
        assert_eq!(price_change_percent(dec!(200), dec!(150)), dec!(-25));
    }

    #[test]
    fn percent_change_rounds_to_two_places() {
        assert_eq!(price_change_percent(dec!(3), dec!(4)), dec!(33.33));
    }
}
