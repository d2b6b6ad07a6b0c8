use serde::{Deserialize, Serialize};

/// Single-row operator configuration, loaded from the database per request
/// and passed explicitly to whatever needs it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSettings {
    /// WhatsApp number the booking handoff message is sent to.
    pub phone: String,
    pub pix_key: String,
    pub pix_recipient_name: String,
    pub pix_city: String,
}
