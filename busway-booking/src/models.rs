use busway_catalog::SeatId;
use busway_core::{PaymentMethod, PaymentStatus};
use busway_shared::Masked;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::eligibility::CancellationPolicy;
use crate::BookingError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

impl std::str::FromStr for Gender {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            "Other" => Ok(Gender::Other),
            other => Err(BookingError::InvalidPassengerField {
                field: PassengerField::Gender,
                value: other.to_string(),
            }),
        }
    }
}

/// Traveller details attached to one selected seat.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PassengerDetail {
    pub name: String,
    pub age: Option<u8>,
    pub gender: Gender,
}

impl PassengerDetail {
    /// Name present after trimming, age filled in.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && self.age.is_some_and(|age| age > 0)
    }

    pub fn apply(&mut self, update: PassengerUpdate) {
        match update {
            PassengerUpdate::Name(name) => self.name = name,
            PassengerUpdate::Age(age) => self.age = age,
            PassengerUpdate::Gender(gender) => self.gender = gender,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassengerField {
    Name,
    Age,
    Gender,
}

impl fmt::Display for PassengerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassengerField::Name => write!(f, "name"),
            PassengerField::Age => write!(f, "age"),
            PassengerField::Gender => write!(f, "gender"),
        }
    }
}

/// One field edit on a passenger form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassengerUpdate {
    Name(String),
    Age(Option<u8>),
    Gender(Gender),
}

impl PassengerUpdate {
    pub const MAX_AGE: u8 = 120;

    pub fn field(&self) -> PassengerField {
        match self {
            PassengerUpdate::Name(_) => PassengerField::Name,
            PassengerUpdate::Age(_) => PassengerField::Age,
            PassengerUpdate::Gender(_) => PassengerField::Gender,
        }
    }

    /// Turn raw form input into a typed update. A blank age clears the field.
    pub fn parse(field: PassengerField, raw: &str) -> Result<Self, BookingError> {
        let invalid = || BookingError::InvalidPassengerField {
            field,
            value: raw.to_string(),
        };

        match field {
            PassengerField::Name => Ok(PassengerUpdate::Name(raw.to_string())),
            PassengerField::Age => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Ok(PassengerUpdate::Age(None));
                }
                let age: u8 = trimmed.parse().map_err(|_| invalid())?;
                if !(1..=Self::MAX_AGE).contains(&age) {
                    return Err(invalid());
                }
                Ok(PassengerUpdate::Age(Some(age)))
            }
            PassengerField::Gender => Ok(PassengerUpdate::Gender(raw.parse()?)),
        }
    }
}

/// Projection of one selected seat handed to the page after each change.
///
/// `is_booked` is always `true`: it marks the seat as part of this booking in progress.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SelectedSeat {
    pub seat_number: SeatId,
    pub is_booked: bool,
    pub passenger: PassengerDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookingSeat {
    pub seat_number: SeatId,
    pub passenger: PassengerDetail,
}

impl From<&SelectedSeat> for BookingSeat {
    fn from(seat: &SelectedSeat) -> Self {
        Self {
            seat_number: seat.seat_number,
            passenger: seat.passenger.clone(),
        }
    }
}

/// Body of the create-booking call. Built once, sent once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub route_id: String,
    pub seats: Vec<BookingSeat>,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<Masked<String>>,
}

impl BookingRequest {
    pub fn seat_numbers(&self) -> Vec<SeatId> {
        self.seats.iter().map(|s| s.seat_number).collect()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// Departure summary embedded in a booking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingRoute {
    #[serde(rename = "_id")]
    pub id: String,
    pub source: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
}

/// A booking as stored by the remote API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: String,
    pub route: BookingRoute,
    pub seats: Vec<BookingSeat>,
    pub total_amount: f64,
    pub booking_status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<Masked<String>>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Cancellation check under the standard two-hour window.
    pub fn can_cancel(&self, now: DateTime<Utc>) -> bool {
        self.can_cancel_with(&CancellationPolicy::default(), now)
    }

    pub fn can_cancel_with(&self, policy: &CancellationPolicy, now: DateTime<Utc>) -> bool {
        policy.allows(self.booking_status, self.route.departure_time, now)
    }

    pub fn is_past_journey(&self, now: DateTime<Utc>) -> bool {
        crate::eligibility::is_past_journey(self.route.departure_time, now)
    }
}
