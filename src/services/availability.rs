use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};

use crate::models::{Booking, Service};

pub const SLOT_STEP_MINUTES: u32 = 30;

/// Operating window and closed weekdays for the salon. Passed explicitly into
/// every computation; nothing in this module touches global state or the db.
#[derive(Debug, Clone)]
pub struct Schedule {
    pub opening: NaiveTime,
    pub closing: NaiveTime,
    pub closed_weekdays: Vec<Weekday>,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            opening: NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
            closing: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            closed_weekdays: vec![Weekday::Sun, Weekday::Mon],
        }
    }
}

impl Schedule {
    /// The fixed daily slot ladder: opening through closing inclusive,
    /// at 30-minute spacing. Day-independent.
    pub fn slots(&self) -> Vec<NaiveTime> {
        let mut out = Vec::new();
        let mut minute = self.opening.num_seconds_from_midnight() / 60;
        let last = self.closing.num_seconds_from_midnight() / 60;
        while minute <= last {
            if let Some(t) = NaiveTime::from_hms_opt(minute / 60, minute % 60, 0) {
                out.push(t);
            }
            minute += SLOT_STEP_MINUTES;
        }
        out
    }

    pub fn is_closed_on(&self, date: NaiveDate) -> bool {
        self.closed_weekdays.contains(&date.weekday())
    }

    pub fn contains_slot(&self, time: NaiveTime) -> bool {
        self.slots().contains(&time)
    }
}

/// Accepts both storage forms, `HH:MM` and `HH:MM:SS`, and nothing looser.
/// Field widths are checked up front because chrono's `%H:%M` also accepts
/// single-digit fields like `9:3`.
pub fn parse_booking_time(s: &str) -> Option<NaiveTime> {
    match s.len() {
        5 => NaiveTime::parse_from_str(s, "%H:%M").ok(),
        8 => NaiveTime::parse_from_str(s, "%H:%M:%S").ok(),
        _ => None,
    }
}

/// The one overlap rule everything else reduces to: half-open intervals
/// [a_start, a_end) and [b_start, b_end) overlap iff a_start < b_end and
/// b_start < a_end.
fn intervals_overlap(
    a_start: NaiveDateTime,
    a_end: NaiveDateTime,
    b_start: NaiveDateTime,
    b_end: NaiveDateTime,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Occupied interval of a booking on `date`, or None when the booking does
/// not count: wrong date, non-occupying status, unparsable stored time, or a
/// service id that no longer resolves. Skipped records degrade availability
/// gracefully instead of failing the whole computation.
fn booking_interval(
    date: NaiveDate,
    booking: &Booking,
    services: &[Service],
) -> Option<(NaiveDateTime, NaiveDateTime)> {
    if booking.booking_date != date || !booking.status.occupies_slot() {
        return None;
    }
    let Some(start_time) = parse_booking_time(&booking.booking_time) else {
        tracing::warn!(
            booking_id = %booking.id,
            time = %booking.booking_time,
            "skipping booking with unparsable time"
        );
        return None;
    };
    let service = services.iter().find(|s| s.id == booking.service_id)?;
    let start = date.and_time(start_time);
    Some((start, start + Duration::minutes(service.duration_minutes as i64)))
}

/// Duration-agnostic occupancy: every ladder slot that falls inside any
/// active booking's [start, start + duration) on `date`.
pub fn occupied_slots(
    schedule: &Schedule,
    date: NaiveDate,
    bookings: &[Booking],
    services: &[Service],
) -> BTreeSet<NaiveTime> {
    let ladder = schedule.slots();
    let mut occupied = BTreeSet::new();

    for booking in bookings {
        let Some((start, end)) = booking_interval(date, booking, services) else {
            continue;
        };
        for &slot in &ladder {
            let at = date.and_time(slot);
            if at >= start && at < end {
                occupied.insert(slot);
            }
        }
    }

    occupied
}

/// Would a booking of `duration_minutes` starting at `slot` collide with any
/// active booking on `date`?
pub fn is_slot_occupied_for_duration(
    slot: NaiveTime,
    duration_minutes: i32,
    date: NaiveDate,
    bookings: &[Booking],
    services: &[Service],
) -> bool {
    let candidate_start = date.and_time(slot);
    let candidate_end = candidate_start + Duration::minutes(duration_minutes as i64);

    bookings.iter().any(|booking| {
        booking_interval(date, booking, services)
            .map(|(start, end)| intervals_overlap(candidate_start, candidate_end, start, end))
            .unwrap_or(false)
    })
}

/// A slot is offered iff no booking touches it at all, and, once a service is
/// chosen, a booking of that service's duration would fit. Before a service
/// is chosen only the duration-agnostic set gates, which is conservative: the
/// true footprint is unknown until the duration is.
pub fn is_slot_available(
    slot: NaiveTime,
    occupied: &BTreeSet<NaiveTime>,
    selected_service: Option<&Service>,
    date: NaiveDate,
    bookings: &[Booking],
    services: &[Service],
) -> bool {
    if occupied.contains(&slot) {
        return false;
    }
    match selected_service {
        None => true,
        Some(service) => {
            !is_slot_occupied_for_duration(slot, service.duration_minutes, date, bookings, services)
        }
    }
}

/// A date cannot take new bookings when the salon is closed that weekday, the
/// date is already past, or (only for the date whose bookings are loaded in
/// `occupied`) every ladder slot is taken. Dates other than the loaded one
/// are reported open; the engine does not fetch the whole calendar.
pub fn is_date_fully_booked(
    schedule: &Schedule,
    date: NaiveDate,
    today: NaiveDate,
    loaded_date: Option<NaiveDate>,
    occupied: &BTreeSet<NaiveTime>,
) -> bool {
    if schedule.is_closed_on(date) {
        return true;
    }
    if date < today {
        return true;
    }
    if loaded_date == Some(date) {
        return schedule.slots().iter().all(|slot| occupied.contains(slot));
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookingStatus, PaymentStatus};
    use chrono::Utc;

    fn t(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn svc(id: &str, duration: i32) -> Service {
        Service {
            id: id.to_string(),
            name: format!("service {id}"),
            duration_minutes: duration,
            price: 50.0,
            description: None,
            image_url: None,
        }
    }

    fn booking(date: &str, time: &str, service_id: &str, status: BookingStatus) -> Booking {
        let now = Utc::now().naive_utc();
        Booking {
            id: format!("b-{time}"),
            service_id: service_id.to_string(),
            customer_name: "Ana".to_string(),
            customer_phone: "83999990000".to_string(),
            booking_date: d(date),
            booking_time: time.to_string(),
            status,
            payment_status: PaymentStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_slot_ladder() {
        let slots = Schedule::default().slots();
        assert_eq!(slots.len(), 20);
        assert_eq!(slots[0], t("08:30"));
        assert_eq!(slots[1], t("09:00"));
        assert_eq!(*slots.last().unwrap(), t("18:00"));
    }

    #[test]
    fn test_parse_booking_time_both_forms() {
        assert_eq!(parse_booking_time("09:30"), Some(t("09:30")));
        assert_eq!(parse_booking_time("09:30:00"), Some(t("09:30")));
        assert_eq!(parse_booking_time("not a time"), None);
        assert_eq!(parse_booking_time("25:00"), None);
    }

    #[test]
    fn test_parse_booking_time_rejects_single_digit_fields() {
        assert_eq!(parse_booking_time("9:3"), None);
        assert_eq!(parse_booking_time("9:30"), None);
        assert_eq!(parse_booking_time("09:30:0"), None);
        assert_eq!(parse_booking_time(""), None);
    }

    #[test]
    fn test_overlap_rule_symmetric() {
        let date = d("2025-06-10");
        let cases = [
            // (a_start, a_end, b_start, b_end, expected)
            ("09:00", "10:00", "09:30", "10:30", true),  // partial
            ("09:00", "10:00", "10:00", "11:00", false), // adjacent
            ("09:00", "11:00", "09:30", "10:00", true),  // containment
            ("09:00", "09:30", "09:00", "09:30", true),  // identical
            ("09:00", "09:30", "11:00", "11:30", false), // disjoint
        ];
        for (a1, a2, b1, b2, expected) in cases {
            let (a1, a2) = (date.and_time(t(a1)), date.and_time(t(a2)));
            let (b1, b2) = (date.and_time(t(b1)), date.and_time(t(b2)));
            assert_eq!(intervals_overlap(a1, a2, b1, b2), expected);
            assert_eq!(intervals_overlap(b1, b2, a1, a2), expected, "not symmetric");
        }
    }

    #[test]
    fn test_occupied_slots_ninety_minute_booking() {
        let schedule = Schedule::default();
        let services = vec![svc("S1", 90)];
        let bookings = vec![booking("2025-06-10", "09:00", "S1", BookingStatus::Confirmed)];

        let occupied = occupied_slots(&schedule, d("2025-06-10"), &bookings, &services);
        let expected: BTreeSet<NaiveTime> =
            [t("09:00"), t("09:30"), t("10:00")].into_iter().collect();
        // interval is half-open, so the 10:30 slot stays free
        assert_eq!(occupied, expected);
    }

    #[test]
    fn test_occupied_slots_tolerates_seconds_in_storage() {
        let schedule = Schedule::default();
        let services = vec![svc("S1", 60)];
        let bookings = vec![booking("2025-06-10", "14:00:00", "S1", BookingStatus::Pending)];

        let occupied = occupied_slots(&schedule, d("2025-06-10"), &bookings, &services);
        assert!(occupied.contains(&t("14:00")));
        assert!(occupied.contains(&t("14:30")));
        assert!(!occupied.contains(&t("15:00")));
    }

    #[test]
    fn test_occupied_slots_skips_unknown_service_and_bad_time() {
        let schedule = Schedule::default();
        let services = vec![svc("S1", 60)];
        let bookings = vec![
            booking("2025-06-10", "09:00", "deleted-service", BookingStatus::Confirmed),
            booking("2025-06-10", "garbage", "S1", BookingStatus::Confirmed),
        ];

        let occupied = occupied_slots(&schedule, d("2025-06-10"), &bookings, &services);
        assert!(occupied.is_empty());
    }

    #[test]
    fn test_occupied_slots_ignores_other_dates_and_inactive_statuses() {
        let schedule = Schedule::default();
        let services = vec![svc("S1", 60)];
        let bookings = vec![
            booking("2025-06-11", "09:00", "S1", BookingStatus::Confirmed),
            booking("2025-06-10", "10:00", "S1", BookingStatus::Cancelled),
            booking("2025-06-10", "11:00", "S1", BookingStatus::Completed),
        ];

        let occupied = occupied_slots(&schedule, d("2025-06-10"), &bookings, &services);
        assert!(occupied.is_empty());
    }

    #[test]
    fn test_occupied_slots_idempotent() {
        let schedule = Schedule::default();
        let services = vec![svc("S1", 90)];
        let bookings = vec![booking("2025-06-10", "09:00", "S1", BookingStatus::Confirmed)];

        let first = occupied_slots(&schedule, d("2025-06-10"), &bookings, &services);
        let second = occupied_slots(&schedule, d("2025-06-10"), &bookings, &services);
        assert_eq!(first, second);
    }

    #[test]
    fn test_slot_occupied_for_duration_overlap_cases() {
        // services = [S1/60min], one confirmed booking 09:00
        let date = d("2025-06-10");
        let services = vec![svc("S1", 60)];
        let bookings = vec![booking("2025-06-10", "09:00", "S1", BookingStatus::Confirmed)];

        assert!(is_slot_occupied_for_duration(t("09:00"), 60, date, &bookings, &services));
        // 09:30 + 60 = 10:30 > 09:00 and 09:00 + 60 = 10:00 > 09:30
        assert!(is_slot_occupied_for_duration(t("09:30"), 60, date, &bookings, &services));
        assert!(!is_slot_occupied_for_duration(t("10:00"), 60, date, &bookings, &services));
        // candidate fully containing the booked interval also collides
        assert!(is_slot_occupied_for_duration(t("08:30"), 120, date, &bookings, &services));
    }

    #[test]
    fn test_is_slot_available_composition() {
        let schedule = Schedule::default();
        let date = d("2025-06-10");
        let services = vec![svc("S1", 60)];
        let bookings = vec![booking("2025-06-10", "09:00", "S1", BookingStatus::Confirmed)];
        let occupied = occupied_slots(&schedule, date, &bookings, &services);

        let s1 = &services[0];
        assert!(!is_slot_available(t("09:00"), &occupied, Some(s1), date, &bookings, &services));
        assert!(!is_slot_available(t("09:30"), &occupied, Some(s1), date, &bookings, &services));
        assert!(is_slot_available(t("10:00"), &occupied, Some(s1), date, &bookings, &services));

        // no service selected: only the global occupied set gates
        assert!(!is_slot_available(t("09:30"), &occupied, None, date, &bookings, &services));
        assert!(is_slot_available(t("10:00"), &occupied, None, date, &bookings, &services));
    }

    #[test]
    fn test_empty_date_every_slot_available() {
        let schedule = Schedule::default();
        let date = d("2025-06-10");
        let occupied = occupied_slots(&schedule, date, &[], &[]);

        for slot in schedule.slots() {
            assert!(is_slot_available(slot, &occupied, None, date, &[], &[]));
        }
    }

    #[test]
    fn test_date_fully_booked_closed_weekdays_and_past() {
        let schedule = Schedule::default();
        let today = d("2025-06-10");
        let empty = BTreeSet::new();

        // 2025-06-15 is a Sunday, 2025-06-16 a Monday
        assert!(is_date_fully_booked(&schedule, d("2025-06-15"), today, None, &empty));
        assert!(is_date_fully_booked(&schedule, d("2025-06-16"), today, None, &empty));
        // strictly before today
        assert!(is_date_fully_booked(&schedule, d("2025-06-06"), today, None, &empty));
        // today itself is fine (a Tuesday)
        assert!(!is_date_fully_booked(&schedule, today, today, None, &empty));
    }

    #[test]
    fn test_date_fully_booked_only_for_loaded_date() {
        let schedule = Schedule::default();
        let today = d("2025-06-10");
        let full: BTreeSet<NaiveTime> = schedule.slots().into_iter().collect();

        let loaded = d("2025-06-11");
        assert!(is_date_fully_booked(&schedule, loaded, today, Some(loaded), &full));
        // a different date with the same snapshot stays optimistically open
        assert!(!is_date_fully_booked(&schedule, d("2025-06-12"), today, Some(loaded), &full));

        let mut partial = full.clone();
        partial.remove(&t("17:30"));
        assert!(!is_date_fully_booked(&schedule, loaded, today, Some(loaded), &partial));
    }
}
