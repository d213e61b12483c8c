pub mod content;
pub mod error;
pub mod http;
pub mod mail;
pub mod telemetry;
pub mod trigger;
