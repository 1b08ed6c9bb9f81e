use serde::{Deserialize, Serialize};

/// Emitted once the remote API has accepted a booking submission.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreatedEvent {
    pub booking_id: String,
    pub route_id: String,
    pub seat_numbers: Vec<String>,
    pub total_amount: f64,
    pub timestamp: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingCancelledEvent {
    pub booking_id: String,
    pub route_id: String,
    pub timestamp: i64,
}

/// Everything the booking flow publishes to its subscribers.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingEvent {
    BookingCreated(BookingCreatedEvent),
    BookingCancelled(BookingCancelledEvent),
}

impl BookingEvent {
    pub fn booking_id(&self) -> &str {
        match self {
            BookingEvent::BookingCreated(e) => &e.booking_id,
            BookingEvent::BookingCancelled(e) => &e.booking_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_is_tagged_on_the_wire() {
        let event = BookingEvent::BookingCancelled(BookingCancelledEvent {
            booking_id: "bk-1".to_string(),
            route_id: "rt-9".to_string(),
            timestamp: 1_700_000_000,
        });

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "BOOKING_CANCELLED");
        assert_eq!(value["bookingId"], "bk-1");
        assert_eq!(event.booking_id(), "bk-1");
    }
}
