//! fgstore-api Library
//!
//! Administrative backend for finished-goods inventory, sales approvals,
//! batch dispatch, pricing, and direct showroom management.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod auth;
pub mod commands;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod metrics;
pub mod migrator;
pub mod models;
pub mod services;

use axum::{routing::get, routing::post, routing::put, Router};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

// Common query parameters for list endpoints
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}
fn default_limit() -> u64 {
    20
}

// Common response wrappers
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            errors: None,
        }
    }

    pub fn validation_errors(errors: Vec<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some("Validation failed".to_string()),
            errors: Some(errors),
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<axum::Json<ApiResponse<T>>, errors::ServiceError>;

pub fn api_v1_routes() -> Router<AppState> {
    let requests = Router::new()
        .route("/requests", get(handlers::approvals::list_requests))
        .route("/requests/:id", get(handlers::approvals::get_request))
        .route(
            "/requests/:id/approve",
            post(handlers::approvals::approve_request),
        )
        .route(
            "/requests/:id/reject",
            post(handlers::approvals::reject_request),
        );

    let approvals = Router::new()
        .route("/approvals", get(handlers::approvals::list_history))
        .route("/approvals/:id", get(handlers::approvals::get_history))
        .route(
            "/approvals/:id/available-inventory",
            get(handlers::dispatch::available_inventory),
        );

    let dispatches = Router::new()
        .route(
            "/dispatches",
            get(handlers::dispatch::list_dispatches).post(handlers::dispatch::submit_dispatch),
        )
        .route("/dispatches/:id", get(handlers::dispatch::get_dispatch));

    let inventory = Router::new()
        .route(
            "/inventory/bulk",
            get(handlers::inventory::list_bulk).post(handlers::inventory::receive_bulk),
        )
        .route(
            "/inventory/bulk/:id/adjust",
            post(handlers::inventory::adjust_bulk),
        )
        .route(
            "/inventory/packaged",
            get(handlers::inventory::list_packaged).post(handlers::inventory::receive_packaged),
        )
        .route(
            "/inventory/packaged/:id/adjust",
            post(handlers::inventory::adjust_packaged),
        )
        .route(
            "/inventory/movements",
            get(handlers::inventory::list_movements),
        )
        .route("/inventory/expiry", get(handlers::inventory::expiry_report))
        .route(
            "/inventory/locations",
            get(handlers::inventory::list_locations).post(handlers::inventory::create_location),
        )
        .route(
            "/inventory/locations/stats",
            get(handlers::inventory::location_stats),
        );

    let pricing = Router::new()
        .route("/prices", get(handlers::pricing::list_prices))
        .route(
            "/prices/:key",
            get(handlers::pricing::get_price).put(handlers::pricing::update_price),
        )
        .route("/prices/:key/analytics", get(handlers::pricing::analytics))
        .route("/price-history", get(handlers::pricing::list_history));

    let showrooms = Router::new()
        .route(
            "/showrooms",
            get(handlers::showrooms::list_showrooms).post(handlers::showrooms::create_showroom),
        )
        .route(
            "/showrooms/active",
            get(handlers::showrooms::list_active_showrooms),
        )
        .route(
            "/showrooms/by-code/:code",
            get(handlers::showrooms::get_showroom_by_code),
        )
        .route(
            "/showrooms/:id",
            get(handlers::showrooms::get_showroom)
                .put(handlers::showrooms::update_showroom)
                .delete(handlers::showrooms::delete_showroom),
        )
        .route(
            "/showrooms/:id/manager",
            put(handlers::showrooms::assign_manager),
        )
        .route(
            "/showrooms/:id/staff",
            get(handlers::showrooms::showroom_staff),
        )
        .route(
            "/showrooms/:id/stats",
            get(handlers::showrooms::showroom_stats),
        );

    let notifications = Router::new()
        .route(
            "/notifications",
            get(handlers::notifications::list_notifications),
        )
        .route(
            "/notifications/unread-count",
            get(handlers::notifications::unread_count),
        )
        .route(
            "/notifications/:id/read",
            post(handlers::notifications::mark_read),
        )
        .route(
            "/notifications/:id/unread",
            post(handlers::notifications::mark_unread),
        );

    let imports = Router::new().route("/imports/products", post(handlers::imports::import_products));

    Router::new()
        .merge(requests)
        .merge(approvals)
        .merge(dispatches)
        .merge(inventory)
        .merge(pricing)
        .merge(showrooms)
        .merge(notifications)
        .merge(imports)
}
