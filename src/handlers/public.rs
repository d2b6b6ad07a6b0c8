use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingStatus, PaymentStatus, Product, Service};
use crate::services::{availability, pix, scheduling, whatsapp};
use crate::state::AppState;

// GET /api/services

pub async fn list_services(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Service>>, AppError> {
    let services = {
        let db = state.db.lock().unwrap();
        queries::get_services(&db)?
    };
    Ok(Json(services))
}

// GET /api/products

pub async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = {
        let db = state.db.lock().unwrap();
        queries::get_products(&db)?
    };
    Ok(Json(products))
}

// GET /api/settings

#[derive(Serialize)]
pub struct PublicSettings {
    phone: String,
}

pub async fn get_settings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PublicSettings>, AppError> {
    let settings = {
        let db = state.db.lock().unwrap();
        queries::get_settings(&db)?
    };
    Ok(Json(PublicSettings {
        phone: settings.phone,
    }))
}

// GET /api/availability?date=YYYY-MM-DD[&service_id=..]

#[derive(Deserialize)]
pub struct AvailabilityQuery {
    pub date: String,
    pub service_id: Option<String>,
}

#[derive(Serialize)]
pub struct SlotView {
    time: String,
    available: bool,
}

#[derive(Serialize)]
pub struct AvailabilityResponse {
    date: String,
    slots: Vec<SlotView>,
    occupied: Vec<String>,
    fully_booked: bool,
}

pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let date = parse_date(&query.date)?;

    let (bookings, services) = {
        let db = state.db.lock().unwrap();
        (
            queries::get_active_bookings_for_date(&db, date)?,
            queries::get_services(&db)?,
        )
    };

    let schedule = &state.config.schedule;
    let occupied = availability::occupied_slots(schedule, date, &bookings, &services);

    // an unknown service id gates like no selection at all
    let selected = query
        .service_id
        .as_deref()
        .and_then(|id| services.iter().find(|s| s.id == id));

    let slots = schedule
        .slots()
        .into_iter()
        .map(|slot| SlotView {
            time: slot.format("%H:%M").to_string(),
            available: availability::is_slot_available(
                slot, &occupied, selected, date, &bookings, &services,
            ),
        })
        .collect();

    let today = Utc::now().date_naive();
    let fully_booked =
        availability::is_date_fully_booked(schedule, date, today, Some(date), &occupied);

    Ok(Json(AvailabilityResponse {
        date: query.date,
        slots,
        occupied: occupied
            .iter()
            .map(|t| t.format("%H:%M").to_string())
            .collect(),
        fully_booked,
    }))
}

// POST /api/bookings

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub service_id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub pay_now: bool,
}

#[derive(Serialize)]
pub struct CreateBookingResponse {
    id: String,
    status: BookingStatus,
    payment_status: PaymentStatus,
    whatsapp_url: String,
    pix_code: Option<String>,
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<CreateBookingResponse>, AppError> {
    if req.customer_name.trim().is_empty() || req.customer_phone.trim().is_empty() {
        return Err(AppError::Validation(
            "customer name and phone are required".to_string(),
        ));
    }

    let date = parse_date(&req.date)?;
    let time = availability::parse_booking_time(&req.time)
        .ok_or_else(|| AppError::Validation(format!("invalid time: {}", req.time)))?;
    let time_label = time.format("%H:%M").to_string();

    let payment_status = if req.pay_now {
        PaymentStatus::Paid
    } else {
        PaymentStatus::Pending
    };

    let today = Utc::now().date_naive();
    let now = Utc::now().naive_utc();
    let booking_id = Uuid::new_v4().to_string();

    // Revalidate against a fresh read and insert under the same lock, so a
    // slot that looked free when the grid was rendered cannot be taken twice
    // by writers on this connection.
    let (service, settings) = {
        let db = state.db.lock().unwrap();

        let service = scheduling::validate_booking(
            &db,
            &state.config.schedule,
            today,
            &req.service_id,
            date,
            time,
        )?;

        let booking = Booking {
            id: booking_id.clone(),
            service_id: req.service_id.clone(),
            customer_name: req.customer_name.trim().to_string(),
            customer_phone: req.customer_phone.trim().to_string(),
            booking_date: date,
            booking_time: time_label.clone(),
            status: BookingStatus::Pending,
            payment_status,
            created_at: now,
            updated_at: now,
        };
        queries::create_booking(&db, &booking)?;

        (service, queries::get_settings(&db)?)
    };

    tracing::info!(
        booking_id = %booking_id,
        date = %req.date,
        time = %time_label,
        service = %service.name,
        duration = %service.format_duration(),
        "booking created"
    );

    let message = whatsapp::booking_message(
        &service.name,
        date,
        &time_label,
        req.customer_name.trim(),
        req.customer_phone.trim(),
        req.pay_now,
    );
    let whatsapp_url = whatsapp::deep_link(&settings.phone, &message);

    let pix_code = if req.pay_now && !settings.pix_key.is_empty() {
        let txid = now.and_utc().timestamp_millis().to_string();
        Some(pix::payload(
            &settings.pix_key,
            &settings.pix_recipient_name,
            &settings.pix_city,
            service.price,
            &txid,
        ))
    } else {
        None
    };

    Ok(Json(CreateBookingResponse {
        id: booking_id,
        status: BookingStatus::Pending,
        payment_status,
        whatsapp_url,
        pix_code,
    }))
}

fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("invalid date, expected YYYY-MM-DD: {s}")))
}
