pub mod calculations;
pub mod models;
pub mod selection;

pub use models::*;
pub use selection::{SelectionChange, SelectionObserver, SelectionSnapshot, SelectionState};
