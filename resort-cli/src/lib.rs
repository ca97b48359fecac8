pub mod app;
pub mod config;
pub mod logging;
pub mod utils;
pub mod views;

pub use app::{PricingSession, RateBook};
pub use config::{ConfigError, PricingConfig};
