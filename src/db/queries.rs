use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{Booking, BookingStatus, PaymentStatus, Product, Service, SiteSettings};

// ── Bookings ──

pub fn create_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, service_id, customer_name, customer_phone, booking_date, booking_time, status, payment_status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            booking.id,
            booking.service_id,
            booking.customer_name,
            booking.customer_phone,
            booking.booking_date.format("%Y-%m-%d").to_string(),
            booking.booking_time,
            booking.status.as_str(),
            booking.payment_status.as_str(),
            booking.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            booking.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ],
    )?;
    Ok(())
}

/// Bookings that count against availability on one date: pending or
/// confirmed only.
pub fn get_active_bookings_for_date(
    conn: &Connection,
    date: NaiveDate,
) -> anyhow::Result<Vec<Booking>> {
    let date_str = date.format("%Y-%m-%d").to_string();
    let mut stmt = conn.prepare(
        "SELECT id, service_id, customer_name, customer_phone, booking_date, booking_time, status, payment_status, created_at, updated_at
         FROM bookings
         WHERE booking_date = ?1 AND status IN ('pending', 'confirmed')
         ORDER BY booking_time ASC",
    )?;

    let rows = stmt.query_map(params![date_str], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn get_all_bookings(
    conn: &Connection,
    status_filter: Option<&str>,
    limit: i64,
) -> anyhow::Result<Vec<Booking>> {
    let (sql, params_vec): (String, Vec<Box<dyn rusqlite::types::ToSql>>) = match status_filter {
        Some(status) => (
            "SELECT id, service_id, customer_name, customer_phone, booking_date, booking_time, status, payment_status, created_at, updated_at \
             FROM bookings WHERE status = ?1 ORDER BY booking_date DESC, booking_time DESC LIMIT ?2"
                .to_string(),
            vec![
                Box::new(status.to_string()) as Box<dyn rusqlite::types::ToSql>,
                Box::new(limit),
            ],
        ),
        None => (
            "SELECT id, service_id, customer_name, customer_phone, booking_date, booking_time, status, payment_status, created_at, updated_at \
             FROM bookings ORDER BY booking_date DESC, booking_time DESC LIMIT ?1"
                .to_string(),
            vec![Box::new(limit) as Box<dyn rusqlite::types::ToSql>],
        ),
    };

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        "SELECT id, service_id, customer_name, customer_phone, booking_date, booking_time, status, payment_status, created_at, updated_at \
         FROM bookings WHERE id = ?1",
        params![id],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn update_booking_status(
    conn: &Connection,
    id: &str,
    status: BookingStatus,
) -> anyhow::Result<bool> {
    let now = Utc::now().naive_utc().format("%Y-%m-%d %H:%M:%S").to_string();
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.as_str(), now, id],
    )?;
    Ok(count > 0)
}

pub fn update_payment_status(
    conn: &Connection,
    id: &str,
    payment_status: PaymentStatus,
) -> anyhow::Result<bool> {
    let now = Utc::now().naive_utc().format("%Y-%m-%d %H:%M:%S").to_string();
    let count = conn.execute(
        "UPDATE bookings SET payment_status = ?1, updated_at = ?2 WHERE id = ?3",
        params![payment_status.as_str(), now, id],
    )?;
    Ok(count > 0)
}

pub fn delete_booking(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM bookings WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let id: String = row.get(0)?;
    let service_id: String = row.get(1)?;
    let customer_name: String = row.get(2)?;
    let customer_phone: String = row.get(3)?;
    let booking_date_str: String = row.get(4)?;
    let booking_time: String = row.get(5)?;
    let status_str: String = row.get(6)?;
    let payment_status_str: String = row.get(7)?;
    let created_at_str: String = row.get(8)?;
    let updated_at_str: String = row.get(9)?;

    let booking_date = NaiveDate::parse_from_str(&booking_date_str, "%Y-%m-%d")
        .unwrap_or_else(|_| Utc::now().date_naive());
    let created_at = NaiveDateTime::parse_from_str(&created_at_str, "%Y-%m-%d %H:%M:%S")
        .unwrap_or_else(|_| Utc::now().naive_utc());
    let updated_at = NaiveDateTime::parse_from_str(&updated_at_str, "%Y-%m-%d %H:%M:%S")
        .unwrap_or_else(|_| Utc::now().naive_utc());

    Ok(Booking {
        id,
        service_id,
        customer_name,
        customer_phone,
        booking_date,
        booking_time,
        status: BookingStatus::parse(&status_str),
        payment_status: PaymentStatus::parse(&payment_status_str),
        created_at,
        updated_at,
    })
}

// ── Services ──

pub fn get_services(conn: &Connection) -> anyhow::Result<Vec<Service>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, duration_minutes, price, description, image_url
         FROM services ORDER BY name ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(Service {
            id: row.get(0)?,
            name: row.get(1)?,
            duration_minutes: row.get(2)?,
            price: row.get(3)?,
            description: row.get(4)?,
            image_url: row.get(5)?,
        })
    })?;

    let mut services = vec![];
    for row in rows {
        services.push(row?);
    }
    Ok(services)
}

pub fn get_service_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Service>> {
    let result = conn.query_row(
        "SELECT id, name, duration_minutes, price, description, image_url
         FROM services WHERE id = ?1",
        params![id],
        |row| {
            Ok(Service {
                id: row.get(0)?,
                name: row.get(1)?,
                duration_minutes: row.get(2)?,
                price: row.get(3)?,
                description: row.get(4)?,
                image_url: row.get(5)?,
            })
        },
    );

    match result {
        Ok(service) => Ok(Some(service)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn create_service(conn: &Connection, service: &Service) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO services (id, name, duration_minutes, price, description, image_url)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            service.id,
            service.name,
            service.duration_minutes,
            service.price,
            service.description,
            service.image_url,
        ],
    )?;
    Ok(())
}

pub fn update_service(conn: &Connection, service: &Service) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE services SET name = ?1, duration_minutes = ?2, price = ?3, description = ?4, image_url = ?5, updated_at = datetime('now')
         WHERE id = ?6",
        params![
            service.name,
            service.duration_minutes,
            service.price,
            service.description,
            service.image_url,
            service.id,
        ],
    )?;
    Ok(count > 0)
}

pub fn delete_service(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM services WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ── Products ──

pub fn get_products(conn: &Connection) -> anyhow::Result<Vec<Product>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, price, description, image_url FROM products ORDER BY name ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(Product {
            id: row.get(0)?,
            name: row.get(1)?,
            price: row.get(2)?,
            description: row.get(3)?,
            image_url: row.get(4)?,
        })
    })?;

    let mut products = vec![];
    for row in rows {
        products.push(row?);
    }
    Ok(products)
}

pub fn create_product(conn: &Connection, product: &Product) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO products (id, name, price, description, image_url)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            product.id,
            product.name,
            product.price,
            product.description,
            product.image_url,
        ],
    )?;
    Ok(())
}

pub fn update_product(conn: &Connection, product: &Product) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE products SET name = ?1, price = ?2, description = ?3, image_url = ?4, updated_at = datetime('now')
         WHERE id = ?5",
        params![
            product.name,
            product.price,
            product.description,
            product.image_url,
            product.id,
        ],
    )?;
    Ok(count > 0)
}

pub fn delete_product(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM products WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ── Site settings ──

pub fn get_settings(conn: &Connection) -> anyhow::Result<SiteSettings> {
    let settings = conn.query_row(
        "SELECT phone, pix_key, pix_recipient_name, pix_city FROM site_settings WHERE id = 1",
        [],
        |row| {
            Ok(SiteSettings {
                phone: row.get(0)?,
                pix_key: row.get(1)?,
                pix_recipient_name: row.get(2)?,
                pix_city: row.get(3)?,
            })
        },
    )?;
    Ok(settings)
}

pub fn update_settings(conn: &Connection, settings: &SiteSettings) -> anyhow::Result<()> {
    conn.execute(
        "UPDATE site_settings SET phone = ?1, pix_key = ?2, pix_recipient_name = ?3, pix_city = ?4, updated_at = datetime('now')
         WHERE id = 1",
        params![
            settings.phone,
            settings.pix_key,
            settings.pix_recipient_name,
            settings.pix_city,
        ],
    )?;
    Ok(())
}
