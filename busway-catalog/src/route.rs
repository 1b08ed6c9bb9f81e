use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::seat_map::{generate_seat_map, BookedSeats, SeatMap};
use crate::CatalogError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BusType {
    #[serde(rename = "AC")]
    Ac,
    #[serde(rename = "Non-AC")]
    NonAc,
    Sleeper,
    #[serde(rename = "Semi-Sleeper")]
    SemiSleeper,
    Luxury,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bus {
    #[serde(rename = "_id")]
    pub id: String,
    pub bus_name: String,
    pub bus_number: String,
    pub bus_type: BusType,
    pub total_seats: usize,
    #[serde(default)]
    pub amenities: Vec<String>,
}

/// A scheduled departure as returned by the route lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    #[serde(rename = "_id")]
    pub id: String,
    pub source: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    /// Minutes.
    pub duration: i64,
    /// Kilometres.
    pub distance: f64,
    pub fare: f64,
    pub available_seats: usize,
    pub bus: Bus,
}

impl Route {
    pub fn trip_duration(&self) -> Result<TripDuration, CatalogError> {
        format_duration(self.duration)
    }
}

/// Everything a booking session needs to know about the departure, supplied once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteContext {
    pub route_id: String,
    pub total_seats: usize,
    /// Raw labels as the API sent them; malformed ones are dropped by `layout`.
    #[serde(default)]
    pub booked_seats: Vec<String>,
    pub fare_per_seat: f64,
    pub departure_time: DateTime<Utc>,
}

impl RouteContext {
    pub fn from_route(route: &Route, booked_seats: Vec<String>) -> Self {
        Self {
            route_id: route.id.clone(),
            total_seats: route.bus.total_seats,
            booked_seats,
            fare_per_seat: route.fare,
            departure_time: route.departure_time,
        }
    }

    /// Build the seat map and the booked set for this departure.
    pub fn layout(&self) -> Result<(SeatMap, BookedSeats), CatalogError> {
        let seat_map = generate_seat_map(self.total_seats)?;
        let booked = BookedSeats::from_labels(&seat_map, &self.booked_seats);
        Ok((seat_map, booked))
    }
}

/// Journey length split for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TripDuration {
    pub hours: i64,
    pub minutes: i64,
}

impl fmt::Display for TripDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m", self.hours, self.minutes)
    }
}

pub fn format_duration(total_minutes: i64) -> Result<TripDuration, CatalogError> {
    if total_minutes < 0 {
        return Err(CatalogError::InvalidDuration(total_minutes));
    }

    Ok(TripDuration {
        hours: total_minutes / 60,
        minutes: total_minutes % 60,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route_json() -> serde_json::Value {
        serde_json::json!({
            "_id": "rt-1",
            "source": "Pune",
            "destination": "Goa",
            "departureTime": "2026-11-02T21:30:00Z",
            "arrivalTime": "2026-11-03T07:15:00Z",
            "duration": 585,
            "distance": 460.5,
            "fare": 850.0,
            "availableSeats": 31,
            "bus": {
                "_id": "bus-7",
                "busName": "Konkan Express",
                "busNumber": "MH12 AB 1234",
                "busType": "Semi-Sleeper",
                "totalSeats": 36,
                "amenities": ["WiFi", "Blanket"]
            }
        })
    }

    #[test]
    fn test_route_from_api_payload() {
        let route: Route = serde_json::from_value(route_json()).unwrap();

        assert_eq!(route.bus.bus_type, BusType::SemiSleeper);
        assert_eq!(route.trip_duration().unwrap().to_string(), "9h 45m");
    }

    #[test]
    fn test_context_layout() {
        let route: Route = serde_json::from_value(route_json()).unwrap();
        let context = RouteContext::from_route(&route, vec!["A1".to_string(), "I4".to_string()]);

        let (seat_map, booked) = context.layout().unwrap();
        assert_eq!(seat_map.len(), 36);
        assert_eq!(booked.len(), 2);
        assert_eq!(context.fare_per_seat, 850.0);
    }

    #[test]
    fn test_context_tolerates_malformed_booked_labels() {
        let context: RouteContext = serde_json::from_value(serde_json::json!({
            "routeId": "rt-1",
            "totalSeats": 8,
            "bookedSeats": ["A1", "Z9", "A01", "", "B2"],
            "farePerSeat": 300.0,
            "departureTime": "2026-11-02T21:30:00Z"
        }))
        .unwrap();

        let (_, booked) = context.layout().unwrap();
        let labels: Vec<_> = booked.iter().map(ToString::to_string).collect();
        assert_eq!(labels, vec!["A1", "B2"]);
    }

    #[test]
    fn test_context_rejects_oversized_bus() {
        let mut route: Route = serde_json::from_value(route_json()).unwrap();
        route.bus.total_seats = 120;

        let context = RouteContext::from_route(&route, vec![]);
        assert!(matches!(context.layout(), Err(CatalogError::InvalidCapacity { .. })));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0).unwrap(), TripDuration { hours: 0, minutes: 0 });
        assert_eq!(format_duration(59).unwrap(), TripDuration { hours: 0, minutes: 59 });
        assert_eq!(format_duration(150).unwrap(), TripDuration { hours: 2, minutes: 30 });
        assert_eq!(format_duration(-1), Err(CatalogError::InvalidDuration(-1)));
    }
}
