use busway_catalog::{FareBreakdown, RouteContext};
use busway_core::{Config, PaymentMethod, Session};
use busway_shared::models::events::{BookingCancelledEvent, BookingCreatedEvent, BookingEvent};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::checkout::Checkout;
use crate::eligibility::CancellationPolicy;
use crate::gateway::BookingGateway;
use crate::models::Booking;
use crate::selection::SelectionTracker;
use crate::BookingError;

const EVENT_CHANNEL_CAPACITY: usize = 100;

/// One booking attempt on one departure: the route context fetched once, plus the live selection.
pub struct BookingDraft {
    pub context: RouteContext,
    pub tracker: SelectionTracker,
}

/// Drives a booking attempt against the remote API with an explicit session.
pub struct BookingFlow {
    gateway: Arc<dyn BookingGateway>,
    checkout: Checkout,
    policy: CancellationPolicy,
    events: broadcast::Sender<BookingEvent>,
}

impl BookingFlow {
    pub fn new(gateway: Arc<dyn BookingGateway>) -> Self {
        Self::with_parts(gateway, Checkout::default(), CancellationPolicy::default())
    }

    pub fn from_config(gateway: Arc<dyn BookingGateway>, config: &Config) -> Result<Self, BookingError> {
        Ok(Self::with_parts(
            gateway,
            Checkout::from_rules(&config.booking),
            CancellationPolicy::from_rules(&config.booking)?,
        ))
    }

    fn with_parts(gateway: Arc<dyn BookingGateway>, checkout: Checkout, policy: CancellationPolicy) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            gateway,
            checkout,
            policy,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BookingEvent> {
        self.events.subscribe()
    }

    pub fn policy(&self) -> &CancellationPolicy {
        &self.policy
    }

    /// Fetch the departure and lay out its seats. Booked seats are fixed from here on.
    pub async fn open(&self, route_id: &str) -> Result<BookingDraft, BookingError> {
        let context = self.gateway.fetch_route_context(route_id).await?;
        let (seat_map, booked) = context.layout()?;

        tracing::debug!(
            route_id = %context.route_id,
            seats = seat_map.len(),
            booked = booked.len(),
            "Opened booking draft"
        );

        Ok(BookingDraft {
            context,
            tracker: SelectionTracker::new(seat_map, booked),
        })
    }

    pub fn quote(&self, draft: &BookingDraft) -> Result<FareBreakdown, BookingError> {
        Ok(draft.tracker.fare(self.checkout.calculator(), draft.context.fare_per_seat)?)
    }

    /// Validate, price and send the draft. The selection is cleared only after the API accepts it;
    /// on any error it is left as it was so the user can fix and resubmit.
    pub async fn submit(
        &self,
        session: &Session,
        draft: &mut BookingDraft,
        payment_method: PaymentMethod,
        transaction_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Booking, BookingError> {
        let selection = draft.tracker.current_selection();
        let prepared = self
            .checkout
            .prepare(&draft.context, &selection, payment_method, transaction_id)?;

        session.ensure_active(now)?;

        let booking = match self.gateway.create_booking(session, &prepared.request).await {
            Ok(booking) => booking,
            Err(e) => {
                tracing::warn!(route_id = %prepared.request.route_id, error = %e, "Booking rejected");
                return Err(e.into());
            }
        };

        tracing::info!(
            booking_id = %booking.id,
            route_id = %prepared.request.route_id,
            seats = prepared.request.seats.len(),
            total_fare = prepared.fare.total_fare,
            payment_method = %payment_method,
            "Booking created"
        );

        draft.tracker.clear();

        let _ = self.events.send(BookingEvent::BookingCreated(BookingCreatedEvent {
            booking_id: booking.id.clone(),
            route_id: prepared.request.route_id.clone(),
            seat_numbers: prepared.request.seat_numbers().iter().map(ToString::to_string).collect(),
            total_amount: prepared.fare.amount_due(),
            timestamp: now.timestamp(),
        }));

        Ok(booking)
    }

    pub async fn my_bookings(&self, session: &Session, now: DateTime<Utc>) -> Result<Vec<Booking>, BookingError> {
        session.ensure_active(now)?;
        Ok(self.gateway.list_my_bookings(session).await?)
    }

    pub fn can_cancel(&self, booking: &Booking, now: DateTime<Utc>) -> bool {
        booking.can_cancel_with(&self.policy, now)
    }

    /// Cancel after re-checking the window against `now`; a stale "cancellable" view is not trusted.
    pub async fn cancel(&self, session: &Session, booking: &Booking, now: DateTime<Utc>) -> Result<Booking, BookingError> {
        if !self.can_cancel(booking, now) {
            return Err(BookingError::NotCancellable(booking.id.clone()));
        }
        session.ensure_active(now)?;

        let cancelled = self.gateway.cancel_booking(session, &booking.id).await?;
        tracing::info!(booking_id = %cancelled.id, "Booking cancelled");

        let _ = self.events.send(BookingEvent::BookingCancelled(BookingCancelledEvent {
            booking_id: cancelled.id.clone(),
            route_id: cancelled.route.id.clone(),
            timestamp: now.timestamp(),
        }));

        Ok(cancelled)
    }
}
