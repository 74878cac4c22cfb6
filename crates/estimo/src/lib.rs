pub mod config;
pub mod error;
pub mod fees;
pub mod rental;
pub mod telemetry;
