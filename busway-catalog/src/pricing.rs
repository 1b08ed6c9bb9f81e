use busway_core::BookingRules;
use serde::Serialize;

use crate::CatalogError;

/// Fare summary shown next to the seat picker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FareBreakdown {
    pub seat_count: usize,
    pub fare_per_seat: f64,
    /// `fare_per_seat × seat_count`, no taxes or discounts.
    pub total_fare: f64,
    pub service_fee: f64,
}

impl FareBreakdown {
    pub fn amount_due(&self) -> f64 {
        self.total_fare + self.service_fee
    }
}

/// Flat per-seat pricing. The service fee is an external policy knob, zero by default.
#[derive(Debug, Clone, Default)]
pub struct FareCalculator {
    service_fee: f64,
}

impl FareCalculator {
    pub fn new(service_fee: f64) -> Self {
        Self { service_fee }
    }

    pub fn from_rules(rules: &BookingRules) -> Self {
        Self::new(rules.service_fee)
    }

    pub fn quote(&self, fare_per_seat: f64, seat_count: usize) -> Result<FareBreakdown, CatalogError> {
        if !fare_per_seat.is_finite() || fare_per_seat < 0.0 {
            return Err(CatalogError::InvalidFare(fare_per_seat));
        }

        // Nothing selected, nothing owed
        let service_fee = if seat_count == 0 { 0.0 } else { self.service_fee };

        Ok(FareBreakdown {
            seat_count,
            fare_per_seat,
            total_fare: fare_per_seat * seat_count as f64,
            service_fee,
        })
    }
}
