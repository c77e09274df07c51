//! Core data structures: numeric tables, grouped observations and forecasts.

mod forecast;
mod observations;
mod table;

pub use forecast::Forecast;
pub use observations::{GroupHistory, ObservationData, ObservationDataBuilder};
pub use table::Table;
