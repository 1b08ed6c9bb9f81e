use busway_catalog::{FareBreakdown, FareCalculator, RouteContext, SeatId};
use busway_core::{BookingRules, PaymentMethod};
use busway_shared::Masked;

use crate::models::{BookingRequest, BookingSeat, SelectedSeat};
use crate::BookingError;

/// Reject an empty selection, then any seat whose passenger form is incomplete.
pub fn validate_selection(selection: &[SelectedSeat]) -> Result<(), BookingError> {
    if selection.is_empty() {
        return Err(BookingError::EmptySelection);
    }

    let incomplete: Vec<SeatId> = selection
        .iter()
        .filter(|seat| !seat.passenger.is_complete())
        .map(|seat| seat.seat_number)
        .collect();

    if !incomplete.is_empty() {
        return Err(BookingError::IncompletePassengerData { seats: incomplete });
    }

    Ok(())
}

/// A validated, priced request ready for the create-booking call.
#[derive(Debug, Clone)]
pub struct PreparedBooking {
    pub request: BookingRequest,
    pub fare: FareBreakdown,
}

#[derive(Debug, Clone, Default)]
pub struct Checkout {
    calculator: FareCalculator,
}

impl Checkout {
    pub fn new(calculator: FareCalculator) -> Self {
        Self { calculator }
    }

    pub fn from_rules(rules: &BookingRules) -> Self {
        Self::new(FareCalculator::from_rules(rules))
    }

    pub fn calculator(&self) -> &FareCalculator {
        &self.calculator
    }

    pub fn prepare(
        &self,
        context: &RouteContext,
        selection: &[SelectedSeat],
        payment_method: PaymentMethod,
        transaction_id: Option<String>,
    ) -> Result<PreparedBooking, BookingError> {
        validate_selection(selection)?;

        let fare = self.calculator.quote(context.fare_per_seat, selection.len())?;

        // A blank transaction id means "not paid yet"
        let transaction_id = transaction_id
            .filter(|id| !id.trim().is_empty())
            .map(Masked::new);

        let request = BookingRequest {
            route_id: context.route_id.clone(),
            seats: selection.iter().map(BookingSeat::from).collect(),
            payment_method,
            transaction_id,
        };

        Ok(PreparedBooking { request, fare })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, PassengerDetail};
    use chrono::Utc;

    fn context(fare: f64) -> RouteContext {
        RouteContext {
            route_id: "rt-1".to_string(),
            total_seats: 5,
            booked_seats: vec![],
            fare_per_seat: fare,
            departure_time: Utc::now(),
        }
    }

    fn selected(label: &str, name: &str, age: Option<u8>) -> SelectedSeat {
        SelectedSeat {
            seat_number: label.parse().unwrap(),
            is_booked: true,
            passenger: PassengerDetail {
                name: name.to_string(),
                age,
                gender: Gender::Male,
            },
        }
    }

    #[test]
    fn test_empty_selection() {
        assert!(matches!(validate_selection(&[]), Err(BookingError::EmptySelection)));
    }

    #[test]
    fn test_incomplete_seats_are_listed_in_order() {
        let selection = vec![
            selected("B1", "", Some(30)),
            selected("A1", "Anil", Some(30)),
            selected("A2", "Sunita", None),
        ];

        match validate_selection(&selection) {
            Err(BookingError::IncompletePassengerData { seats }) => {
                let labels: Vec<_> = seats.iter().map(ToString::to_string).collect();
                assert_eq!(labels, vec!["B1", "A2"]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_prepare_prices_and_builds_request() {
        let checkout = Checkout::default();
        let selection = vec![selected("A1", "Anil", Some(30)), selected("B1", "Bina", Some(27))];

        let prepared = checkout
            .prepare(&context(500.0), &selection, PaymentMethod::DebitCard, Some("  ".to_string()))
            .unwrap();

        assert_eq!(prepared.fare.total_fare, 1000.0);
        assert_eq!(prepared.request.route_id, "rt-1");
        assert_eq!(prepared.request.seats.len(), 2);
        assert_eq!(prepared.request.payment_method, PaymentMethod::DebitCard);
        assert!(prepared.request.transaction_id.is_none());
    }

    #[test]
    fn test_prepare_keeps_transaction_id() {
        let checkout = Checkout::default();
        let selection = vec![selected("A1", "Anil", Some(30))];

        let prepared = checkout
            .prepare(&context(500.0), &selection, PaymentMethod::Upi, Some("UPI-7781".to_string()))
            .unwrap();

        assert_eq!(prepared.request.transaction_id.unwrap().expose(), "UPI-7781");
    }

    #[test]
    fn test_prepare_rejects_before_pricing() {
        let checkout = Checkout::default();
        let selection = vec![selected("A1", " ", Some(30))];

        let result = checkout.prepare(&context(-5.0), &selection, PaymentMethod::Cash, None);
        assert!(matches!(result, Err(BookingError::IncompletePassengerData { .. })));
    }
}
