//! Stay pricing for the two resort plans.
//!
//! The Decas plan prices rooms in decas per night; the All-Inclusive plan
//! prices guests per night by season.

pub mod all_inclusive;
pub mod common;
pub mod decas;

pub use all_inclusive::{
    AllInclusiveCalculator, AllInclusiveError, AllInclusivePolicy, AllInclusiveQuote,
    AllInclusiveRequest, ChildCharge, ChildTier,
};
pub use decas::{
    DecasCalculator, DecasConfig, DecasError, DecasNight, DecasQuote, DecasRequest,
    DecasRoomBreakdown,
};
