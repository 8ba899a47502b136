//! Authoritative seat pool and the adjacent-block search.

use glam::Vec3;
use showhouse_core::{
    PurchaseError, ReservationError, SeatCoord, SeatId, SeatSnapshot, SeatStatus, VenueLayout,
};

#[derive(Clone, Debug)]
struct Seat {
    coord: SeatCoord,
    position: Vec3,
    status: SeatStatus,
    has_occupant: bool,
}

/// Row-major seat pool rebuilt only when the venue layout changes.
#[derive(Clone, Debug)]
pub(crate) struct SeatMap {
    seats: Vec<Seat>,
    layout: VenueLayout,
}

impl SeatMap {
    /// Builds a free seat for every grid coordinate of the layout.
    pub(crate) fn new(layout: &VenueLayout) -> Self {
        let seats = (0..layout.rows)
            .flat_map(|row| (0..layout.columns).map(move |column| SeatCoord::new(row, column)))
            .map(|coord| Seat {
                coord,
                position: layout.seat_position(coord),
                status: SeatStatus::Free,
                has_occupant: false,
            })
            .collect();

        Self {
            seats,
            layout: *layout,
        }
    }

    fn seat(&self, id: SeatId) -> Option<&Seat> {
        usize::try_from(id.get())
            .ok()
            .and_then(|index| self.seats.get(index))
    }

    fn seat_mut(&mut self, id: SeatId) -> Option<&mut Seat> {
        usize::try_from(id.get())
            .ok()
            .and_then(|index| self.seats.get_mut(index))
    }

    /// Flips a seat between free and reserved, returning the new status.
    pub(crate) fn toggle_reservation(
        &mut self,
        id: SeatId,
    ) -> Result<SeatStatus, ReservationError> {
        let seat = self.seat_mut(id).ok_or(ReservationError::UnknownSeat)?;
        seat.status = match seat.status {
            SeatStatus::Free => SeatStatus::Reserved,
            SeatStatus::Reserved => SeatStatus::Free,
            SeatStatus::Bought => return Err(ReservationError::SeatBought),
        };
        Ok(seat.status)
    }

    /// Finds `count` adjacent free seats in a single row without straddling the aisle.
    ///
    /// Rows are scanned from row `0` onward and, within a row, the starting
    /// column runs from `columns - count` down to `0`; the first valid block wins.
    pub(crate) fn find_contiguous_free(&self, count: u32) -> Result<Vec<SeatId>, PurchaseError> {
        let columns = self.layout.columns;
        if count == 0 || count > columns {
            return Err(PurchaseError::InvalidCount);
        }

        for row in 0..self.layout.rows {
            for start in (0..=columns - count).rev() {
                if self.layout.crosses_aisle(start, count) {
                    continue;
                }

                let block: Option<Vec<SeatId>> = (start..start + count)
                    .map(|column| self.layout.seat_id(SeatCoord::new(row, column)))
                    .collect();
                let Some(block) = block else {
                    continue;
                };

                let all_free = block.iter().all(|id| {
                    self.seat(*id)
                        .map_or(false, |seat| seat.status == SeatStatus::Free)
                });
                if all_free {
                    return Ok(block);
                }
            }
        }

        Err(PurchaseError::NoContiguousBlock)
    }

    /// Marks the listed seats as bought.
    pub(crate) fn buy(&mut self, ids: &[SeatId]) {
        for id in ids {
            if let Some(seat) = self.seat_mut(*id) {
                seat.status = SeatStatus::Bought;
            }
        }
    }

    /// Identifiers of every reserved or bought seat, in row-major order.
    pub(crate) fn occupied(&self) -> Vec<SeatId> {
        self.ids()
            .filter(|(_, seat)| seat.status.is_occupied())
            .map(|(id, _)| id)
            .collect()
    }

    pub(crate) fn set_occupant(&mut self, id: SeatId, has_occupant: bool) {
        if let Some(seat) = self.seat_mut(id) {
            seat.has_occupant = has_occupant;
        }
    }

    /// Returns every seat to the free, unoccupied state.
    pub(crate) fn reset_all(&mut self) {
        for seat in &mut self.seats {
            seat.status = SeatStatus::Free;
            seat.has_occupant = false;
        }
    }

    pub(crate) fn position(&self, id: SeatId) -> Option<Vec3> {
        self.seat(id).map(|seat| seat.position)
    }

    pub(crate) fn snapshots(&self) -> Vec<SeatSnapshot> {
        self.ids()
            .map(|(id, seat)| SeatSnapshot {
                id,
                coord: seat.coord,
                position: seat.position,
                status: seat.status,
                has_occupant: seat.has_occupant,
            })
            .collect()
    }

    fn ids(&self) -> impl Iterator<Item = (SeatId, &Seat)> {
        self.seats
            .iter()
            .enumerate()
            .filter_map(|(index, seat)| Some((SeatId::new(u32::try_from(index).ok()?), seat)))
    }
}
