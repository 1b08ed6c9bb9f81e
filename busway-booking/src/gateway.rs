use async_trait::async_trait;
use busway_catalog::{Route, RouteContext, SeatId};
use busway_core::{PaymentStatus, Session};
use chrono::Utc;
use std::collections::{BTreeSet, HashMap};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::{Booking, BookingRequest, BookingRoute, BookingStatus};

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rejected by server: {0}")]
    Rejected(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

/// The remote booking API. Implementations own transport, retries and timeouts.
#[async_trait]
pub trait BookingGateway: Send + Sync {
    /// Route lookup plus the seats already sold on it.
    async fn fetch_route_context(&self, route_id: &str) -> Result<RouteContext, GatewayError>;

    async fn create_booking(&self, session: &Session, request: &BookingRequest) -> Result<Booking, GatewayError>;

    async fn list_my_bookings(&self, session: &Session) -> Result<Vec<Booking>, GatewayError>;

    async fn cancel_booking(&self, session: &Session, booking_id: &str) -> Result<Booking, GatewayError>;
}

#[derive(Default)]
struct GatewayState {
    routes: HashMap<String, Route>,
    // booking id -> (owner user id, booking)
    bookings: HashMap<String, (String, Booking)>,
}

impl GatewayState {
    fn sold_seats(&self, route_id: &str) -> BTreeSet<SeatId> {
        self.bookings
            .values()
            .filter(|(_, b)| b.route.id == route_id && b.booking_status != BookingStatus::Cancelled)
            .flat_map(|(_, b)| b.seats.iter().map(|s| s.seat_number))
            .collect()
    }
}

/// In-process stand-in for the booking API.
///
/// Rejects seats that are already sold at creation time, the same last-line check the
/// real server performs.
#[derive(Default)]
pub struct InMemoryGateway {
    state: Mutex<GatewayState>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, route: Route) -> Self {
        self.state.get_mut().routes.insert(route.id.clone(), route);
        self
    }
}

#[async_trait]
impl BookingGateway for InMemoryGateway {
    async fn fetch_route_context(&self, route_id: &str) -> Result<RouteContext, GatewayError> {
        let state = self.state.lock().await;
        let route = state
            .routes
            .get(route_id)
            .ok_or_else(|| GatewayError::NotFound(format!("route {}", route_id)))?;

        Ok(RouteContext::from_route(route, state.sold_seats(route_id).iter().map(ToString::to_string).collect()))
    }

    async fn create_booking(&self, session: &Session, request: &BookingRequest) -> Result<Booking, GatewayError> {
        let mut state = self.state.lock().await;
        let route = state
            .routes
            .get(&request.route_id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(format!("route {}", request.route_id)))?;

        let sold = state.sold_seats(&route.id);
        if let Some(taken) = request.seats.iter().find(|s| sold.contains(&s.seat_number)) {
            return Err(GatewayError::Rejected(format!("seat {} is already booked", taken.seat_number)));
        }

        let payment_status = if request.transaction_id.is_some() {
            PaymentStatus::Completed
        } else {
            PaymentStatus::Pending
        };

        let booking = Booking {
            id: Uuid::new_v4().to_string(),
            route: BookingRoute {
                id: route.id.clone(),
                source: route.source.clone(),
                destination: route.destination.clone(),
                departure_time: route.departure_time,
                arrival_time: route.arrival_time,
            },
            seats: request.seats.clone(),
            total_amount: route.fare * request.seats.len() as f64,
            booking_status: BookingStatus::Confirmed,
            payment_status,
            payment_method: request.payment_method,
            transaction_id: request.transaction_id.clone(),
            created_at: Utc::now(),
        };

        state
            .bookings
            .insert(booking.id.clone(), (session.user.id.clone(), booking.clone()));
        Ok(booking)
    }

    async fn list_my_bookings(&self, session: &Session) -> Result<Vec<Booking>, GatewayError> {
        let state = self.state.lock().await;
        let mut bookings: Vec<Booking> = state
            .bookings
            .values()
            .filter(|(owner, _)| *owner == session.user.id)
            .map(|(_, b)| b.clone())
            .collect();

        // Newest first
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    async fn cancel_booking(&self, session: &Session, booking_id: &str) -> Result<Booking, GatewayError> {
        let mut state = self.state.lock().await;
        let (owner, booking) = state
            .bookings
            .get_mut(booking_id)
            .ok_or_else(|| GatewayError::NotFound(format!("booking {}", booking_id)))?;

        if *owner != session.user.id && !session.is_admin() {
            return Err(GatewayError::NotFound(format!("booking {}", booking_id)));
        }
        if booking.booking_status == BookingStatus::Cancelled {
            return Err(GatewayError::Rejected(format!("booking {} is already cancelled", booking_id)));
        }

        booking.booking_status = BookingStatus::Cancelled;
        if booking.payment_status == PaymentStatus::Completed {
            booking.payment_status = PaymentStatus::Refunded;
        }
        Ok(booking.clone())
    }
}
