pub mod checkout;
pub mod eligibility;
pub mod flow;
pub mod gateway;
pub mod models;
pub mod selection;

pub use checkout::{validate_selection, Checkout, PreparedBooking};
pub use eligibility::{can_cancel, is_past_journey, CancellationPolicy};
pub use flow::{BookingDraft, BookingFlow};
pub use gateway::{BookingGateway, GatewayError, InMemoryGateway};
pub use models::{
    Booking, BookingRequest, BookingRoute, BookingSeat, BookingStatus, Gender, PassengerDetail,
    PassengerField, PassengerUpdate, SelectedSeat,
};
pub use selection::{SelectionTracker, ToggleOutcome};

use busway_catalog::{CatalogError, SeatId};
use busway_core::CoreError;

fn seat_list(seats: &[SeatId]) -> String {
    seats.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Every way a booking step can be refused. None of them end the booking session.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Please select at least one seat")]
    EmptySelection,

    #[error("Passenger details incomplete for seats: {}", seat_list(.seats))]
    IncompletePassengerData {
        seats: Vec<SeatId>,
    },

    #[error("Seat {0} is not selected")]
    SeatNotSelected(SeatId),

    #[error("Invalid {field}: {value:?}")]
    InvalidPassengerField {
        field: PassengerField,
        value: String,
    },

    #[error("Booking {0} can no longer be cancelled")]
    NotCancellable(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Session(#[from] CoreError),

    #[error("Booking API error: {0}")]
    Gateway(#[from] GatewayError),
}
