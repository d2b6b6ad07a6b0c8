use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub duration_minutes: i32,
    pub price: f64,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl Service {
    /// "1h30min" style label shown next to the service name.
    pub fn format_duration(&self) -> String {
        let hours = self.duration_minutes / 60;
        let mins = self.duration_minutes % 60;
        if hours == 0 {
            format!("{mins}min")
        } else if mins == 0 {
            format!("{hours}h")
        } else {
            format!("{hours}h{mins}min")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn svc(duration: i32) -> Service {
        Service {
            id: "s1".to_string(),
            name: "Corte".to_string(),
            duration_minutes: duration,
            price: 50.0,
            description: None,
            image_url: None,
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(svc(30).format_duration(), "30min");
        assert_eq!(svc(60).format_duration(), "1h");
        assert_eq!(svc(90).format_duration(), "1h30min");
    }
}
