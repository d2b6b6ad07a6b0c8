pub mod booking;
pub mod product;
pub mod service;
pub mod settings;

pub use booking::{Booking, BookingStatus, PaymentStatus};
pub use product::Product;
pub use service::Service;
pub use settings::SiteSettings;
