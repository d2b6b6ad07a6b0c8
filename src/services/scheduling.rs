use chrono::{NaiveDate, NaiveTime};
use rusqlite::Connection;

use crate::db::queries;
use crate::models::Service;
use crate::services::availability::{self, Schedule};

#[derive(Debug)]
pub enum SchedulingError {
    ClosedDate,
    DateInPast,
    InvalidSlot,
    UnknownService,
    Conflict,
    Store(anyhow::Error),
}

impl std::fmt::Display for SchedulingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulingError::ClosedDate => {
                write!(f, "We are closed on that day. Please pick another date.")
            }
            SchedulingError::DateInPast => {
                write!(f, "That date has already passed. Please pick another date.")
            }
            SchedulingError::InvalidSlot => {
                write!(f, "That time is outside our booking hours.")
            }
            SchedulingError::UnknownService => {
                write!(f, "That service is no longer offered.")
            }
            SchedulingError::Conflict => {
                write!(
                    f,
                    "Sorry, that time slot was just taken. Please choose another time."
                )
            }
            SchedulingError::Store(e) => write!(f, "could not check availability: {e}"),
        }
    }
}

/// Submission-time revalidation. Runs against bookings fetched here and now,
/// not against whatever snapshot the client rendered its slot grid from, so
/// the window between "shown as free" and "persisted" is closed for every
/// writer sharing this connection. Returns the resolved service on success.
pub fn validate_booking(
    conn: &Connection,
    schedule: &Schedule,
    today: NaiveDate,
    service_id: &str,
    date: NaiveDate,
    time: NaiveTime,
) -> Result<Service, SchedulingError> {
    if schedule.is_closed_on(date) {
        return Err(SchedulingError::ClosedDate);
    }
    if date < today {
        return Err(SchedulingError::DateInPast);
    }
    if !schedule.contains_slot(time) {
        return Err(SchedulingError::InvalidSlot);
    }

    let services = queries::get_services(conn).map_err(SchedulingError::Store)?;
    let service = services
        .iter()
        .find(|s| s.id == service_id)
        .cloned()
        .ok_or(SchedulingError::UnknownService)?;

    let bookings =
        queries::get_active_bookings_for_date(conn, date).map_err(SchedulingError::Store)?;

    if availability::is_slot_occupied_for_duration(
        time,
        service.duration_minutes,
        date,
        &bookings,
        &services,
    ) {
        return Err(SchedulingError::Conflict);
    }

    Ok(service)
}
