//! Core data structures: series, frequencies and forecasts.

mod forecast;
mod frequency;
mod time_series;

pub use forecast::Forecast;
pub use frequency::Frequency;
pub use time_series::{MissingValuePolicy, TimeSeries};
