pub mod loader;

pub use loader::{AllInclusiveRateLoader, DecasRateLoader, RateLoaderError};
