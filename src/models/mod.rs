use chrono::{DateTime, Utc};
use rand::Rng;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub mod request_items;

pub use request_items::{NoItemsFound, RequestItem, RequestItems};

/// Status of a sales request. Pending is the only non-terminal state.
#[derive(
    Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum RequestStatus {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "Approved")]
    Approved,
    #[sea_orm(string_value = "Rejected")]
    Rejected,
}

/// Originating channel of a sales request.
#[derive(
    Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    #[sea_orm(string_value = "direct_representative")]
    #[strum(serialize = "direct_representative")]
    DirectRepresentative,
    #[sea_orm(string_value = "direct_shop")]
    #[strum(serialize = "direct_shop")]
    DirectShop,
    #[sea_orm(string_value = "distributor")]
    #[strum(serialize = "distributor")]
    Distributor,
}

impl RequestType {
    /// Tag stamped on approval-history records for this request kind.
    pub fn history_record_type(&self) -> &'static str {
        match self {
            RequestType::DirectRepresentative => "direct_rep_sale",
            RequestType::DirectShop => "direct_shop_sale",
            RequestType::Distributor => "distributor_sale",
        }
    }
}

/// Which physical stock pool a batch belongs to.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum InventoryKind {
    #[sea_orm(string_value = "bulk")]
    #[strum(serialize = "bulk")]
    Bulk,
    #[sea_orm(string_value = "packaged")]
    #[strum(serialize = "packaged")]
    Packaged,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(4))")]
pub enum QualityGrade {
    #[sea_orm(string_value = "A")]
    A,
    #[sea_orm(string_value = "B")]
    B,
    #[sea_orm(string_value = "C")]
    C,
    #[sea_orm(string_value = "D")]
    D,
}

impl QualityGrade {
    /// Parse a grade letter; anything outside A-D is rejected.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "A" => Some(QualityGrade::A),
            "B" => Some(QualityGrade::B),
            "C" => Some(QualityGrade::C),
            "D" => Some(QualityGrade::D),
            _ => None,
        }
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[sea_orm(string_value = "LKR")]
    Lkr,
    #[sea_orm(string_value = "USD")]
    Usd,
    #[sea_orm(string_value = "EUR")]
    Eur,
}

impl Currency {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "LKR" => Some(Currency::Lkr),
            "USD" => Some(Currency::Usd),
            "EUR" => Some(Currency::Eur),
            _ => None,
        }
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum PriceType {
    #[sea_orm(string_value = "retail")]
    #[strum(serialize = "retail")]
    Retail,
    #[sea_orm(string_value = "wholesale")]
    #[strum(serialize = "wholesale")]
    Wholesale,
    #[sea_orm(string_value = "distributor")]
    #[strum(serialize = "distributor")]
    Distributor,
    #[sea_orm(string_value = "special")]
    #[strum(serialize = "special")]
    Special,
}

impl PriceType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "retail" => Some(PriceType::Retail),
            "wholesale" => Some(PriceType::Wholesale),
            "distributor" => Some(PriceType::Distributor),
            "special" => Some(PriceType::Special),
            _ => None,
        }
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum ShowroomStatus {
    #[sea_orm(string_value = "active")]
    #[strum(serialize = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    #[strum(serialize = "inactive")]
    Inactive,
    #[sea_orm(string_value = "suspended")]
    #[strum(serialize = "suspended")]
    Suspended,
}

/// Kind of entry in the stock movement log.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    #[sea_orm(string_value = "receipt")]
    #[strum(serialize = "receipt")]
    Receipt,
    #[sea_orm(string_value = "dispatch")]
    #[strum(serialize = "dispatch")]
    Dispatch,
    #[sea_orm(string_value = "adjustment")]
    #[strum(serialize = "adjustment")]
    Adjustment,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    #[sea_orm(string_value = "unread")]
    #[strum(serialize = "unread")]
    Unread,
    #[sea_orm(string_value = "read")]
    #[strum(serialize = "read")]
    Read,
}

/// Generate a release code: two-digit year, month, day, then a random
/// four-digit suffix (e.g. `2608070042`).
pub fn release_code(now: DateTime<Utc>) -> String {
    let date_part = now.format("%y%m%d");
    let suffix: u16 = rand::thread_rng().gen_range(0..10_000);
    format!("{}{:04}", date_part, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn release_code_embeds_date_stamp() {
        let ts = Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap();
        let code = release_code(ts);
        assert_eq!(code.len(), 10);
        assert!(code.starts_with("260807"));
        assert!(code[6..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn quality_grade_parse_is_case_insensitive() {
        assert_eq!(QualityGrade::parse("a"), Some(QualityGrade::A));
        assert_eq!(QualityGrade::parse(" d "), Some(QualityGrade::D));
        assert_eq!(QualityGrade::parse("E"), None);
    }

    #[test]
    fn request_type_history_tags() {
        assert_eq!(
            RequestType::DirectRepresentative.history_record_type(),
            "direct_rep_sale"
        );
        assert_eq!(RequestType::DirectShop.history_record_type(), "direct_shop_sale");
    }
}
