//! Bulk product/pricing ingestion.
//!
//! Spreadsheet parsing happens upstream; rows arrive here as header-keyed
//! maps. Every field is read with a header-name fallback (`Product Type`
//! first, then `productType`) so both export formats ingest identically.
//! Rows validate and commit independently: one bad row never blocks the
//! rest, and the final report carries per-row messages.

use crate::{
    auth::SessionUser,
    errors::ServiceError,
    models::{Currency, PriceType, QualityGrade},
    services::inventory::{BulkReceiptInput, InventoryService, PackagedReceiptInput},
    services::pricing::{PriceUpdateInput, PricingService},
};
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, instrument};

pub type ImportRow = Map<String, Value>;

const BULK_UPLOAD_REASON: &str = "Bulk upload";

#[derive(Debug, Clone, Serialize)]
pub struct RowValidation {
    /// 1-based spreadsheet row; +1 more for the header line.
    pub row_number: usize,
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub attempted: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub skipped_invalid: usize,
    pub row_errors: Vec<String>,
    pub validations: Vec<RowValidation>,
}

/// Read a row field by its spreadsheet header, falling back to the
/// camelCase export name.
fn field<'a>(row: &'a ImportRow, header: &str, fallback: &str) -> Option<&'a Value> {
    row.get(header).or_else(|| row.get(fallback))
}

fn string_field(row: &ImportRow, header: &str, fallback: &str) -> String {
    field(row, header, fallback)
        .map(|v| match v {
            Value::String(s) => s.trim().to_string(),
            other => other.to_string().trim_matches('"').trim().to_string(),
        })
        .unwrap_or_default()
}

fn decimal_field(row: &ImportRow, header: &str, fallback: &str) -> Option<Decimal> {
    match field(row, header, fallback)? {
        Value::Number(n) => n.to_string().parse::<Decimal>().ok(),
        Value::String(s) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    }
}

fn has_field(row: &ImportRow, header: &str, fallback: &str) -> bool {
    !string_field(row, header, fallback).is_empty()
}

/// Row-level ingestion over the inventory and pricing services.
#[derive(Clone)]
pub struct ImportService {
    inventory: Arc<InventoryService>,
    pricing: Arc<PricingService>,
}

impl ImportService {
    pub fn new(inventory: Arc<InventoryService>, pricing: Arc<PricingService>) -> Self {
        Self { inventory, pricing }
    }

    /// Validate all rows without touching the database. Errors block the
    /// row; warnings record silently-corrected values.
    pub fn validate_rows(&self, rows: &[ImportRow]) -> Vec<RowValidation> {
        rows.iter()
            .enumerate()
            .map(|(index, row)| validate_row(index, row))
            .collect()
    }

    /// Validate and commit. Valid rows are processed one at a time;
    /// failures are recorded per row and never abort the remainder.
    #[instrument(skip(self, rows, actor))]
    pub async fn commit_rows(
        &self,
        rows: Vec<ImportRow>,
        actor: &SessionUser,
    ) -> Result<ImportReport, ServiceError> {
        let validations = self.validate_rows(&rows);

        let mut success_count = 0;
        let mut error_count = 0;
        let mut row_errors = Vec::new();

        for (row, validation) in rows.iter().zip(&validations) {
            if !validation.is_valid {
                continue;
            }

            match self.commit_row(row, actor).await {
                Ok(()) => success_count += 1,
                Err(e) => {
                    error_count += 1;
                    row_errors.push(format!("Row {}: {}", validation.row_number, e));
                }
            }
        }

        let skipped_invalid = validations.iter().filter(|v| !v.is_valid).count();

        info!(
            attempted = rows.len(),
            success = success_count,
            failed = error_count,
            skipped = skipped_invalid,
            "import commit finished"
        );

        Ok(ImportReport {
            attempted: rows.len(),
            success_count,
            error_count,
            skipped_invalid,
            row_errors,
            validations,
        })
    }

    async fn commit_row(&self, row: &ImportRow, actor: &SessionUser) -> Result<(), ServiceError> {
        let product_type = string_field(row, "Product Type", "productType").to_ascii_lowercase();
        let product_id = string_field(row, "Product ID", "productId");
        let product_name = string_field(row, "Product Name", "productName");
        let batch_number = string_field(row, "Batch Number", "batchNumber");
        let location = string_field(row, "Location", "location");
        let quality_grade = QualityGrade::parse(&string_field(row, "Quality Grade", "qualityGrade"))
            .unwrap_or(QualityGrade::A);
        let expiry_date = parse_expiry(&string_field(
            row,
            "Expiry Date (YYYY-MM-DD)",
            "expiryDate",
        ));
        let variant_name = string_field(row, "Variant Name", "variantName");

        if product_type == "bulk" {
            let quantity =
                decimal_field(row, "Quantity", "quantity").unwrap_or(Decimal::ZERO);
            let unit = {
                let unit = string_field(row, "Unit", "unit");
                if unit.is_empty() {
                    "kg".to_string()
                } else {
                    unit
                }
            };

            self.inventory
                .add_to_inventory(
                    BulkReceiptInput {
                        product_id: product_id.clone(),
                        product_name: product_name.clone(),
                        batch_number,
                        quantity,
                        unit,
                        quality_grade,
                        expiry_date,
                        release_code: None,
                        location: Some(location).filter(|l| !l.is_empty()),
                        received_from: Some("bulk_upload".to_string()),
                    },
                    &actor.uid,
                )
                .await?;
        } else {
            let units_in_stock = decimal_field(row, "Units in Stock", "unitsInStock")
                .and_then(|d| d.trunc().to_i32())
                .unwrap_or(0);

            self.inventory
                .add_packaged_units(
                    PackagedReceiptInput {
                        product_id: product_id.clone(),
                        product_name: product_name.clone(),
                        variant_name: variant_name.clone(),
                        variant_size: string_field(row, "Variant Size", "variantSize"),
                        variant_unit: string_field(row, "Variant Unit", "variantUnit"),
                        batch_number,
                        units_received: units_in_stock,
                        quality_grade,
                        expiry_date,
                        release_code: None,
                        location: Some(location).filter(|l| !l.is_empty()),
                        received_from: Some("bulk_upload".to_string()),
                    },
                    &actor.uid,
                )
                .await?;
        }

        // Non-standard currency or price type already produced a warning
        // at validation time; commit proceeds on the defaults.
        let price = decimal_field(row, "Price", "price").unwrap_or(Decimal::ZERO);
        let currency = Currency::parse(&string_field(row, "Currency", "currency"))
            .unwrap_or(Currency::Lkr);
        let price_type = PriceType::parse(&string_field(row, "Price Type", "priceType"))
            .unwrap_or(PriceType::Retail);

        let product_key = if product_type == "units" && !variant_name.is_empty() {
            format!("{}_{}", product_id, variant_name)
        } else {
            product_id
        };

        self.pricing
            .update_price(
                &product_key,
                PriceUpdateInput {
                    product_name: Some(product_name),
                    price,
                    currency,
                    price_type,
                    change_reason: BULK_UPLOAD_REASON.to_string(),
                    effective_date: None,
                },
                &actor.uid,
            )
            .await?;

        Ok(())
    }
}

fn parse_expiry(raw: &str) -> Option<NaiveDate> {
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

fn validate_row(index: usize, row: &ImportRow) -> RowValidation {
    // Header occupies spreadsheet row 1.
    let row_number = index + 2;
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let product_type = string_field(row, "Product Type", "productType").to_ascii_lowercase();
    let product_name = string_field(row, "Product Name", "productName");
    let product_id = string_field(row, "Product ID", "productId");
    let batch_number = string_field(row, "Batch Number", "batchNumber");

    if product_type != "bulk" && product_type != "units" {
        errors.push("Product Type must be \"bulk\" or \"units\"".to_string());
    }
    if product_name.is_empty() {
        errors.push("Product Name is required".to_string());
    }
    if product_id.is_empty() {
        errors.push("Product ID is required".to_string());
    }
    if batch_number.is_empty() {
        errors.push("Batch Number is required".to_string());
    }

    if product_type == "bulk" {
        let quantity = decimal_field(row, "Quantity", "quantity").unwrap_or(Decimal::ZERO);
        if quantity <= Decimal::ZERO {
            errors.push("Quantity must be greater than 0 for bulk products".to_string());
        }
        if has_field(row, "Variant Name", "variantName") {
            warnings.push("Variant Name should be empty for bulk products".to_string());
        }
        if has_field(row, "Units in Stock", "unitsInStock") {
            warnings.push("Units in Stock should be empty for bulk products".to_string());
        }
    } else if product_type == "units" {
        if !has_field(row, "Variant Name", "variantName") {
            errors.push("Variant Name is required for packaged products".to_string());
        }
        if !has_field(row, "Variant Size", "variantSize")
            || !has_field(row, "Variant Unit", "variantUnit")
        {
            errors.push("Variant Size and Unit are required for packaged products".to_string());
        }
        let units = decimal_field(row, "Units in Stock", "unitsInStock").unwrap_or(Decimal::ZERO);
        if units <= Decimal::ZERO {
            errors.push("Units in Stock must be greater than 0 for packaged products".to_string());
        }
        if has_field(row, "Quantity", "quantity") {
            warnings.push("Quantity should be empty for packaged products".to_string());
        }
    }

    let grade_raw = string_field(row, "Quality Grade", "qualityGrade");
    if !grade_raw.is_empty() && QualityGrade::parse(&grade_raw).is_none() {
        errors.push("Quality Grade must be A, B, C, or D".to_string());
    }

    let expiry_raw = string_field(row, "Expiry Date (YYYY-MM-DD)", "expiryDate");
    if !expiry_raw.is_empty() && parse_expiry(&expiry_raw).is_none() {
        errors.push("Expiry Date must be a valid date in YYYY-MM-DD format".to_string());
    }

    match decimal_field(row, "Price", "price") {
        Some(price) if price > Decimal::ZERO => {}
        _ => errors.push("Price must be a positive number".to_string()),
    }

    let currency_raw = string_field(row, "Currency", "currency");
    if !currency_raw.is_empty() && Currency::parse(&currency_raw).is_none() {
        warnings.push(format!("Currency \"{}\" not standard. Using LKR", currency_raw));
    }

    let price_type_raw = string_field(row, "Price Type", "priceType");
    if !price_type_raw.is_empty() && PriceType::parse(&price_type_raw).is_none() {
        warnings.push(format!(
            "Price Type \"{}\" not standard. Using retail",
            price_type_raw
        ));
    }

    RowValidation {
        row_number,
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(entries: Vec<(&str, Value)>) -> ImportRow {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    fn bulk_row() -> ImportRow {
        row(vec![
            ("Product Type", json!("bulk")),
            ("Product Name", json!("Green Tea")),
            ("Product ID", json!("GT-01")),
            ("Batch Number", json!("B-100")),
            ("Quantity", json!(25)),
            ("Unit", json!("kg")),
            ("Price", json!(1200)),
        ])
    }

    #[test]
    fn valid_bulk_row_passes() {
        let validation = validate_row(0, &bulk_row());
        assert!(validation.is_valid, "errors: {:?}", validation.errors);
        assert_eq!(validation.row_number, 2);
    }

    #[test]
    fn camel_case_fallback_headers_are_accepted() {
        let r = row(vec![
            ("productType", json!("bulk")),
            ("productName", json!("Green Tea")),
            ("productId", json!("GT-01")),
            ("batchNumber", json!("B-100")),
            ("quantity", json!("25")),
            ("unit", json!("kg")),
            ("price", json!("1200")),
        ]);
        let validation = validate_row(0, &r);
        assert!(validation.is_valid, "errors: {:?}", validation.errors);
    }

    #[test]
    fn unknown_product_type_is_an_error() {
        let mut r = bulk_row();
        r.insert("Product Type".into(), json!("loose"));
        let validation = validate_row(0, &r);
        assert!(!validation.is_valid);
        assert!(validation.errors[0].contains("Product Type"));
    }

    #[test]
    fn bulk_row_with_zero_quantity_fails() {
        let mut r = bulk_row();
        r.insert("Quantity".into(), json!(0));
        let validation = validate_row(0, &r);
        assert!(!validation.is_valid);
    }

    #[test]
    fn units_row_requires_variant_fields() {
        let r = row(vec![
            ("Product Type", json!("units")),
            ("Product Name", json!("Green Tea")),
            ("Product ID", json!("GT-01")),
            ("Batch Number", json!("B-100")),
            ("Units in Stock", json!(40)),
            ("Price", json!(450)),
        ]);
        let validation = validate_row(0, &r);
        assert!(!validation.is_valid);
        assert!(validation
            .errors
            .iter()
            .any(|e| e.contains("Variant Name is required")));
    }

    #[test]
    fn variant_on_bulk_row_is_a_warning_not_an_error() {
        let mut r = bulk_row();
        r.insert("Variant Name".into(), json!("250g pack"));
        let validation = validate_row(0, &r);
        assert!(validation.is_valid);
        assert_eq!(validation.warnings.len(), 1);
    }

    #[test]
    fn nonstandard_currency_warns_and_still_validates() {
        let mut r = bulk_row();
        r.insert("Currency".into(), json!("GBP"));
        let validation = validate_row(0, &r);
        assert!(validation.is_valid);
        assert!(validation.warnings[0].contains("GBP"));
    }

    #[test]
    fn bad_expiry_format_is_an_error() {
        let mut r = bulk_row();
        r.insert("Expiry Date (YYYY-MM-DD)".into(), json!("07/08/2026"));
        let validation = validate_row(0, &r);
        assert!(!validation.is_valid);
    }

    #[test]
    fn missing_price_is_an_error() {
        let mut r = bulk_row();
        r.remove("Price");
        let validation = validate_row(0, &r);
        assert!(!validation.is_valid);
        assert!(validation.errors.iter().any(|e| e.contains("Price")));
    }
}
