use serde::{Deserialize, Serialize};

/// Retail item shown on the public site. Products never occupy time; they
/// only exist in the catalog and the admin panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    pub image_url: Option<String>,
}
