//! Client communication: composing, rendering and delivering emails

pub mod deliveries;
pub mod email_addresses;
pub mod mailer;
pub mod rendering;
