//! Domain types for the departure board.
//!
//! Types here enforce their invariants at construction time, so code that
//! receives them can trust their validity.

mod station;
mod time;
mod train;

pub use station::{Crs, InvalidCrs};
pub use time::{ClockTime, TimeError};
pub use train::{Leg, Operator, Train};
