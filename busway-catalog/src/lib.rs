pub mod availability;
pub mod pricing;
pub mod route;
pub mod seat_map;

pub use availability::{occupancy, Availability};
pub use pricing::{FareBreakdown, FareCalculator};
pub use route::{format_duration, Bus, BusType, Route, RouteContext, TripDuration};
pub use seat_map::{generate_seat_map, BookedSeats, SeatId, SeatMap, SeatStatus};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CatalogError {
    #[error("Invalid capacity: {requested} seats requested, at most {max} supported")]
    InvalidCapacity {
        requested: usize,
        max: usize,
    },

    #[error("Invalid seat identifier: {0}")]
    InvalidSeatId(String),

    #[error("Invalid duration: {0} minutes")]
    InvalidDuration(i64),

    #[error("Invalid fare: {0}")]
    InvalidFare(f64),
}
