use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{BookingStatus, PaymentStatus, Product, Service, SiteSettings};
use crate::state::AppState;

fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

// GET /api/admin/bookings

#[derive(Deserialize)]
pub struct BookingsQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct BookingResponse {
    id: String,
    service_id: String,
    customer_name: String,
    customer_phone: String,
    booking_date: String,
    booking_time: String,
    status: String,
    payment_status: String,
    created_at: String,
    updated_at: String,
}

pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let limit = query.limit.unwrap_or(50);
    let bookings = {
        let db = state.db.lock().unwrap();
        queries::get_all_bookings(&db, query.status.as_deref(), limit)?
    };

    let response = bookings
        .into_iter()
        .map(|b| BookingResponse {
            id: b.id,
            service_id: b.service_id,
            customer_name: b.customer_name,
            customer_phone: b.customer_phone,
            booking_date: b.booking_date.format("%Y-%m-%d").to_string(),
            booking_time: b.booking_time,
            status: b.status.as_str().to_string(),
            payment_status: b.payment_status.as_str().to_string(),
            created_at: b.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            updated_at: b.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
        .collect();

    Ok(Json(response))
}

// POST /api/admin/bookings/:id/status

#[derive(Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

pub async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let next = parse_status(&update.status)?;

    let db = state.db.lock().unwrap();
    let booking = queries::get_booking_by_id(&db, &id)?
        .ok_or_else(|| AppError::NotFound(format!("booking {id}")))?;

    if !booking.status.can_transition_to(next) {
        return Err(AppError::InvalidTransition(format!(
            "{} -> {}",
            booking.status.as_str(),
            next.as_str()
        )));
    }

    queries::update_booking_status(&db, &id, next)?;
    tracing::info!(booking_id = %id, status = next.as_str(), "booking status updated");

    Ok(Json(serde_json::json!({ "ok": true, "status": next.as_str() })))
}

// POST /api/admin/bookings/:id/payment

#[derive(Deserialize)]
pub struct PaymentUpdate {
    pub payment_status: String,
}

pub async fn update_payment_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(update): Json<PaymentUpdate>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let next = parse_payment_status(&update.payment_status)?;

    let updated = {
        let db = state.db.lock().unwrap();
        queries::update_payment_status(&db, &id, next)?
    };
    if !updated {
        return Err(AppError::NotFound(format!("booking {id}")));
    }

    Ok(Json(serde_json::json!({ "ok": true, "payment_status": next.as_str() })))
}

// DELETE /api/admin/bookings/:id

pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let deleted = {
        let db = state.db.lock().unwrap();
        queries::delete_booking(&db, &id)?
    };
    if !deleted {
        return Err(AppError::NotFound(format!("booking {id}")));
    }

    Ok(Json(serde_json::json!({ "ok": true })))
}

// ── Services ──

#[derive(Deserialize)]
pub struct ServicePayload {
    pub name: String,
    pub duration_minutes: i32,
    pub price: f64,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

fn validate_service_payload(payload: &ServicePayload) -> Result<(), AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("service name is required".to_string()));
    }
    if payload.duration_minutes <= 0 {
        return Err(AppError::Validation(
            "duration must be a positive number of minutes".to_string(),
        ));
    }
    if payload.price < 0.0 {
        return Err(AppError::Validation("price must not be negative".to_string()));
    }
    Ok(())
}

pub async fn create_service(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<ServicePayload>,
) -> Result<Json<Service>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    validate_service_payload(&payload)?;

    let service = Service {
        id: Uuid::new_v4().to_string(),
        name: payload.name.trim().to_string(),
        duration_minutes: payload.duration_minutes,
        price: payload.price,
        description: payload.description,
        image_url: payload.image_url,
    };

    {
        let db = state.db.lock().unwrap();
        queries::create_service(&db, &service)?;
    }

    Ok(Json(service))
}

pub async fn update_service(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<ServicePayload>,
) -> Result<Json<Service>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    validate_service_payload(&payload)?;

    let service = Service {
        id: id.clone(),
        name: payload.name.trim().to_string(),
        duration_minutes: payload.duration_minutes,
        price: payload.price,
        description: payload.description,
        image_url: payload.image_url,
    };

    let updated = {
        let db = state.db.lock().unwrap();
        queries::update_service(&db, &service)?
    };
    if !updated {
        return Err(AppError::NotFound(format!("service {id}")));
    }

    Ok(Json(service))
}

pub async fn delete_service(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let deleted = {
        let db = state.db.lock().unwrap();
        queries::delete_service(&db, &id)?
    };
    if !deleted {
        return Err(AppError::NotFound(format!("service {id}")));
    }

    Ok(Json(serde_json::json!({ "ok": true })))
}

// ── Products ──

#[derive(Deserialize)]
pub struct ProductPayload {
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

fn validate_product_payload(payload: &ProductPayload) -> Result<(), AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("product name is required".to_string()));
    }
    if payload.price < 0.0 {
        return Err(AppError::Validation("price must not be negative".to_string()));
    }
    Ok(())
}

pub async fn create_product(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<Product>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    validate_product_payload(&payload)?;

    let product = Product {
        id: Uuid::new_v4().to_string(),
        name: payload.name.trim().to_string(),
        price: payload.price,
        description: payload.description,
        image_url: payload.image_url,
    };

    {
        let db = state.db.lock().unwrap();
        queries::create_product(&db, &product)?;
    }

    Ok(Json(product))
}

pub async fn update_product(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<Product>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    validate_product_payload(&payload)?;

    let product = Product {
        id: id.clone(),
        name: payload.name.trim().to_string(),
        price: payload.price,
        description: payload.description,
        image_url: payload.image_url,
    };

    let updated = {
        let db = state.db.lock().unwrap();
        queries::update_product(&db, &product)?
    };
    if !updated {
        return Err(AppError::NotFound(format!("product {id}")));
    }

    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let deleted = {
        let db = state.db.lock().unwrap();
        queries::delete_product(&db, &id)?
    };
    if !deleted {
        return Err(AppError::NotFound(format!("product {id}")));
    }

    Ok(Json(serde_json::json!({ "ok": true })))
}

// ── Settings ──

pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<SiteSettings>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let settings = {
        let db = state.db.lock().unwrap();
        queries::get_settings(&db)?
    };
    Ok(Json(settings))
}

pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(settings): Json<SiteSettings>,
) -> Result<Json<SiteSettings>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    {
        let db = state.db.lock().unwrap();
        queries::update_settings(&db, &settings)?;
    }
    Ok(Json(settings))
}

fn parse_status(s: &str) -> Result<BookingStatus, AppError> {
    match s {
        "pending" | "confirmed" | "cancelled" | "completed" => Ok(BookingStatus::parse(s)),
        _ => Err(AppError::Validation(format!("unknown status: {s}"))),
    }
}

fn parse_payment_status(s: &str) -> Result<PaymentStatus, AppError> {
    match s {
        "pending" | "paid" | "refunded" => Ok(PaymentStatus::parse(s)),
        _ => Err(AppError::Validation(format!("unknown payment status: {s}"))),
    }
}
