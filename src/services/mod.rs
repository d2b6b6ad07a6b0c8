pub mod availability;
pub mod pix;
pub mod scheduling;
pub mod whatsapp;
