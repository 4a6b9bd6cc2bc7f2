//! Application servers

pub mod http;
pub mod https;
