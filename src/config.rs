use std::env;

use chrono::NaiveTime;

use crate::services::availability::Schedule;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub admin_token: String,
    pub schedule: Schedule,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut schedule = Schedule::default();
        if let Some(t) = env::var("OPENING_TIME").ok().and_then(|v| parse_time(&v)) {
            schedule.opening = t;
        }
        if let Some(t) = env::var("CLOSING_TIME").ok().and_then(|v| parse_time(&v)) {
            schedule.closing = t;
        }

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "salon.db".to_string()),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            schedule,
        }
    }
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").ok()
}
