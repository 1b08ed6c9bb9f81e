use serde::Serialize;

use crate::route::Route;

/// Seat availability band for a listed departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Availability {
    Plenty,
    Limited,
    SoldOut,
}

impl Availability {
    const LIMITED_THRESHOLD: usize = 10;

    pub fn from_available(available_seats: usize) -> Self {
        if available_seats > Self::LIMITED_THRESHOLD {
            Availability::Plenty
        } else if available_seats > 0 {
            Availability::Limited
        } else {
            Availability::SoldOut
        }
    }

    pub fn of(route: &Route) -> Self {
        Self::from_available(route.available_seats)
    }

    pub fn is_bookable(&self) -> bool {
        *self != Availability::SoldOut
    }
}

/// Fraction of the bus already sold, in `0.0..=1.0`.
pub fn occupancy(total_seats: usize, booked_seats: usize) -> f64 {
    if total_seats == 0 {
        0.0
    } else {
        (booked_seats.min(total_seats) as f64) / total_seats as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability_bands() {
        assert_eq!(Availability::from_available(11), Availability::Plenty);
        assert_eq!(Availability::from_available(10), Availability::Limited);
        assert_eq!(Availability::from_available(1), Availability::Limited);
        assert_eq!(Availability::from_available(0), Availability::SoldOut);
        assert!(!Availability::SoldOut.is_bookable());
        assert!(Availability::Limited.is_bookable());
    }

    #[test]
    fn test_occupancy() {
        assert_eq!(occupancy(0, 0), 0.0);
        assert!((occupancy(40, 10) - 0.25).abs() < f64::EPSILON);
        assert_eq!(occupancy(4, 9), 1.0);
    }
}
