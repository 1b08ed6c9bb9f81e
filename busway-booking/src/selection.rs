use busway_catalog::{BookedSeats, CatalogError, FareBreakdown, FareCalculator, SeatId, SeatMap, SeatStatus};
use std::collections::HashMap;

use crate::models::{PassengerDetail, PassengerUpdate, SelectedSeat};
use crate::BookingError;

/// Callback fired with the fresh projection after every change.
pub type SelectionListener = Box<dyn FnMut(&[SelectedSeat]) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Selected,
    Deselected,
    /// Booked, or not part of this bus. State is untouched.
    Ignored,
}

/// Seats picked so far in one booking attempt, with a passenger form per seat.
///
/// The selection order and the passenger map always hold exactly the same seats.
pub struct SelectionTracker {
    seat_map: SeatMap,
    booked: BookedSeats,
    order: Vec<SeatId>,
    passengers: HashMap<SeatId, PassengerDetail>,
    listeners: Vec<SelectionListener>,
}

impl SelectionTracker {
    pub fn new(seat_map: SeatMap, booked: BookedSeats) -> Self {
        Self {
            seat_map,
            booked,
            order: Vec::new(),
            passengers: HashMap::new(),
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&[SelectedSeat]) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn toggle_seat(&mut self, seat: SeatId) -> ToggleOutcome {
        if self.booked.contains(&seat) {
            tracing::debug!(seat = %seat, "Ignoring booked seat");
            return ToggleOutcome::Ignored;
        }
        if !self.seat_map.contains(&seat) {
            tracing::warn!(seat = %seat, capacity = self.seat_map.len(), "Ignoring seat outside seat map");
            return ToggleOutcome::Ignored;
        }

        let outcome = if self.passengers.remove(&seat).is_some() {
            self.order.retain(|s| *s != seat);
            ToggleOutcome::Deselected
        } else {
            self.passengers.insert(seat, PassengerDetail::default());
            self.order.push(seat);
            ToggleOutcome::Selected
        };

        tracing::debug!(seat = %seat, ?outcome, selected = self.order.len(), "Seat toggled");
        self.notify();
        outcome
    }

    /// Edit one passenger field. Only selected seats carry a passenger form.
    pub fn update_passenger(&mut self, seat: SeatId, update: PassengerUpdate) -> Result<(), BookingError> {
        let passenger = self
            .passengers
            .get_mut(&seat)
            .ok_or(BookingError::SeatNotSelected(seat))?;

        tracing::debug!(seat = %seat, field = %update.field(), "Passenger field updated");
        passenger.apply(update);
        self.notify();
        Ok(())
    }

    /// Selected seats in the order they were picked.
    pub fn current_selection(&self) -> Vec<SelectedSeat> {
        self.order
            .iter()
            .filter_map(|seat| {
                self.passengers.get(seat).map(|passenger| SelectedSeat {
                    seat_number: *seat,
                    is_booked: true,
                    passenger: passenger.clone(),
                })
            })
            .collect()
    }

    pub fn selected_seats(&self) -> &[SeatId] {
        &self.order
    }

    pub fn passenger(&self, seat: &SeatId) -> Option<&PassengerDetail> {
        self.passengers.get(seat)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn status_of(&self, seat: &SeatId) -> SeatStatus {
        SeatStatus::resolve(self.booked.contains(seat), self.passengers.contains_key(seat))
    }

    /// One render pass over the whole bus.
    pub fn seat_statuses(&self) -> Vec<(SeatId, SeatStatus)> {
        self.seat_map
            .seats()
            .iter()
            .map(|seat| (*seat, self.status_of(seat)))
            .collect()
    }

    pub fn fare(&self, calculator: &FareCalculator, fare_per_seat: f64) -> Result<FareBreakdown, CatalogError> {
        calculator.quote(fare_per_seat, self.order.len())
    }

    /// Drop the whole selection. The booking flow calls this only once the API has accepted it.
    pub fn clear(&mut self) {
        if self.order.is_empty() {
            return;
        }
        self.order.clear();
        self.passengers.clear();
        self.notify();
    }

    pub fn seat_map(&self) -> &SeatMap {
        &self.seat_map
    }

    pub fn booked(&self) -> &BookedSeats {
        &self.booked
    }

    fn notify(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        let selection = self.current_selection();
        for listener in &mut self.listeners {
            listener(&selection);
        }
    }
}
