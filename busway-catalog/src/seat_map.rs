use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::CatalogError;

pub const SEATS_PER_ROW: usize = 4;
const ROW_LABELS: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const MAX_SEATS: usize = ROW_LABELS.len() * SEATS_PER_ROW;

/// A seat label: row letter followed by column number, e.g. `C4`.
///
/// Ordering is row-major, the same order the seat map is generated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeatId {
    row: u8,
    column: u8,
}

impl SeatId {
    fn new(row: usize, column: usize) -> Self {
        Self {
            row: row as u8,
            column: column as u8,
        }
    }

    pub fn row_label(&self) -> char {
        ROW_LABELS[self.row as usize] as char
    }

    /// 1-based column within the row.
    pub fn column(&self) -> u8 {
        self.column
    }

    /// 0-based row index.
    pub fn row_index(&self) -> usize {
        self.row as usize
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row_label(), self.column)
    }
}

impl FromStr for SeatId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CatalogError::InvalidSeatId(s.to_string());

        let mut chars = s.chars();
        let letter = chars.next().ok_or_else(invalid)?;
        let row = ROW_LABELS
            .iter()
            .position(|&l| l as char == letter)
            .ok_or_else(invalid)?;
        // Exactly one digit: no sign, no leading zeros
        let column = match (chars.next().and_then(|c| c.to_digit(10)), chars.next()) {
            (Some(digit), None) if (1..=SEATS_PER_ROW).contains(&(digit as usize)) => digit as usize,
            _ => return Err(invalid()),
        };

        Ok(Self::new(row, column))
    }
}

impl TryFrom<String> for SeatId {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SeatId> for String {
    fn from(seat: SeatId) -> Self {
        seat.to_string()
    }
}

/// The full seat layout of one bus, in generation order. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatMap {
    seats: Vec<SeatId>,
}

impl SeatMap {
    pub fn seats(&self) -> &[SeatId] {
        &self.seats
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn contains(&self, seat: &SeatId) -> bool {
        // Seats are a row-major prefix of the full layout
        self.seats.last().is_some_and(|last| seat <= last)
    }

    /// Seats grouped by row for rendering. The last row may be short.
    pub fn rows(&self) -> impl Iterator<Item = &[SeatId]> {
        self.seats.chunks(SEATS_PER_ROW)
    }
}

/// Deterministically lay out `total_seats` seats, four per row, rows lettered A to Z.
pub fn generate_seat_map(total_seats: usize) -> Result<SeatMap, CatalogError> {
    if total_seats > MAX_SEATS {
        return Err(CatalogError::InvalidCapacity {
            requested: total_seats,
            max: MAX_SEATS,
        });
    }

    let rows = total_seats.div_ceil(SEATS_PER_ROW);
    let mut seats = Vec::with_capacity(total_seats);

    'rows: for row in 0..rows {
        for column in 1..=SEATS_PER_ROW {
            if seats.len() == total_seats {
                break 'rows;
            }
            seats.push(SeatId::new(row, column));
        }
    }

    Ok(SeatMap { seats })
}

/// Seats already sold for this departure, as supplied once by the route lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookedSeats {
    seats: BTreeSet<SeatId>,
}

impl BookedSeats {
    /// Seats outside `seat_map` cannot be rendered or selected, so they are dropped.
    pub fn new(seat_map: &SeatMap, seats: impl IntoIterator<Item = SeatId>) -> Self {
        let seats = seats
            .into_iter()
            .filter(|seat| {
                let known = seat_map.contains(seat);
                if !known {
                    tracing::warn!(seat = %seat, capacity = seat_map.len(), "Ignoring booked seat outside seat map");
                }
                known
            })
            .collect();

        Self { seats }
    }

    /// Parse raw labels from the API. Unparseable labels are skipped.
    pub fn from_labels<S: AsRef<str>>(seat_map: &SeatMap, labels: &[S]) -> Self {
        let parsed = labels.iter().filter_map(|label| match label.as_ref().parse::<SeatId>() {
            Ok(seat) => Some(seat),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed booked seat");
                None
            }
        });

        Self::new(seat_map, parsed)
    }

    pub fn contains(&self, seat: &SeatId) -> bool {
        self.seats.contains(seat)
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeatId> {
        self.seats.iter()
    }
}

/// Render state of a seat, derived on every pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeatStatus {
    Available,
    Selected,
    Booked,
}

impl SeatStatus {
    /// `Booked` wins over `Selected`, which wins over `Available`.
    pub fn resolve(is_booked: bool, is_selected: bool) -> Self {
        if is_booked {
            SeatStatus::Booked
        } else if is_selected {
            SeatStatus::Selected
        } else {
            SeatStatus::Available
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SeatStatus::Available => "available",
            SeatStatus::Selected => "selected",
            SeatStatus::Booked => "booked",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn labels(map: &SeatMap) -> Vec<String> {
        map.seats().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_five_seats() {
        let map = generate_seat_map(5).unwrap();
        assert_eq!(labels(&map), vec!["A1", "A2", "A3", "A4", "B1"]);
    }

    #[test]
    fn test_every_capacity_is_unique_and_row_major() {
        for total in 0..=MAX_SEATS {
            let map = generate_seat_map(total).unwrap();
            assert_eq!(map.len(), total);

            let unique: HashSet<_> = map.seats().iter().collect();
            assert_eq!(unique.len(), total);

            assert!(map.seats().windows(2).all(|w| w[0] < w[1]));
            assert_eq!(map.rows().count(), total.div_ceil(SEATS_PER_ROW));
        }
    }

    #[test]
    fn test_zero_and_full_capacity() {
        assert!(generate_seat_map(0).unwrap().is_empty());

        let full = generate_seat_map(MAX_SEATS).unwrap();
        assert_eq!(full.seats().last().unwrap().to_string(), "Z4");
    }

    #[test]
    fn test_capacity_out_of_range() {
        assert_eq!(
            generate_seat_map(105),
            Err(CatalogError::InvalidCapacity { requested: 105, max: 104 })
        );
    }

    #[test]
    fn test_generation_is_deterministic() {
        assert_eq!(generate_seat_map(37).unwrap(), generate_seat_map(37).unwrap());
    }

    #[test]
    fn test_partial_last_row() {
        let map = generate_seat_map(10).unwrap();
        let rows: Vec<_> = map.rows().map(|r| r.len()).collect();
        assert_eq!(rows, vec![4, 4, 2]);
    }

    #[test]
    fn test_parse_seat_ids() {
        let seat: SeatId = "C4".parse().unwrap();
        assert_eq!(seat.row_label(), 'C');
        assert_eq!(seat.column(), 4);
        assert_eq!(seat.row_index(), 2);

        for bad in ["", "C", "C0", "C5", "c1", "1A", "AA1", "A+1", "A01", "A001", "A1 ", "A11"] {
            assert!(bad.parse::<SeatId>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn test_contains_respects_capacity() {
        let map = generate_seat_map(5).unwrap();
        assert!(map.contains(&"B1".parse().unwrap()));
        assert!(!map.contains(&"B2".parse().unwrap()));
        assert!(!generate_seat_map(0).unwrap().contains(&"A1".parse().unwrap()));
    }

    #[test]
    fn test_booked_seats_drop_unknown_labels() {
        let map = generate_seat_map(6).unwrap();
        let booked = BookedSeats::from_labels(&map, &["A2", "B2", "B3", "??"]);

        assert_eq!(booked.len(), 2);
        assert!(booked.contains(&"A2".parse().unwrap()));
        assert!(booked.contains(&"B2".parse().unwrap()));
        assert!(!booked.contains(&"B3".parse().unwrap()));
    }

    #[test]
    fn test_status_precedence() {
        assert_eq!(SeatStatus::resolve(true, true), SeatStatus::Booked);
        assert_eq!(SeatStatus::resolve(true, false), SeatStatus::Booked);
        assert_eq!(SeatStatus::resolve(false, true), SeatStatus::Selected);
        assert_eq!(SeatStatus::resolve(false, false), SeatStatus::Available);
    }
}
