#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seat picking from pointer rays.

use glam::Vec3;
use showhouse_core::{Command, SeatId, SeatView, ShowState, VenueLayout};

/// Direction components below this magnitude are treated as parallel to a slab.
const PARALLEL_EPSILON: f32 = 1e-4;

/// World-space ray cast from the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerRay {
    origin: Vec3,
    direction: Vec3,
}

impl PointerRay {
    /// Creates a ray starting at `origin` travelling along `direction`.
    #[must_use]
    pub const fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Start of the ray.
    #[must_use]
    pub const fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Direction of travel; need not be normalised.
    #[must_use]
    pub const fn direction(&self) -> Vec3 {
        self.direction
    }
}

/// Translates pointer rays into reservation toggles.
#[derive(Debug, Default)]
pub struct SeatPicker;

impl SeatPicker {
    /// Creates a new seat picker.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Returns the nearest seat hit by `ray`, or `None` outside the waiting state.
    #[must_use]
    pub fn pick(
        &self,
        state: ShowState,
        seats: &SeatView,
        layout: &VenueLayout,
        ray: PointerRay,
    ) -> Option<SeatId> {
        if state != ShowState::Waiting {
            return None;
        }

        seats
            .iter()
            .filter_map(|seat| {
                let (min, max) = layout.seat_bounds(seat.coord);
                ray_box_intersection(ray.origin(), ray.direction(), min, max)
                    .filter(|distance| *distance > 0.0)
                    .map(|distance| (seat.id, distance))
            })
            .min_by(|(_, left), (_, right)| left.total_cmp(right))
            .map(|(seat, _)| seat)
    }

    /// Emits a reservation toggle for every ray that hits a seat.
    pub fn handle(
        &mut self,
        rays: &[PointerRay],
        state: ShowState,
        seats: &SeatView,
        layout: &VenueLayout,
        out: &mut Vec<Command>,
    ) {
        for ray in rays {
            if let Some(seat) = self.pick(state, seats, layout, *ray) {
                out.push(Command::ToggleReservation { seat });
            }
        }
    }
}

/// Slab test of a ray against an axis-aligned box.
///
/// Returns the entry distance when the origin lies outside the box, the exit
/// distance when it lies inside, and `None` when the box is missed or lies
/// entirely behind the origin.
#[must_use]
pub fn ray_box_intersection(origin: Vec3, direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let mut near = f32::NEG_INFINITY;
    let mut far = f32::INFINITY;

    for axis in 0..3 {
        let (o, d, lo, hi) = (origin[axis], direction[axis], min[axis], max[axis]);
        if d.abs() < PARALLEL_EPSILON {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }

        let (mut t1, mut t2) = ((lo - o) / d, (hi - o) / d);
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }
        near = near.max(t1);
        far = far.min(t2);
        if near > far {
            return None;
        }
    }

    if far < 0.0 {
        return None;
    }
    Some(if near > 0.0 { near } else { far })
}
