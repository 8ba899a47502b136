#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Waypoint planner that turns route requests into per-patron checkpoint lists.
//!
//! Entry routes lead from the door, across the front of the room, up the main
//! aisle and along the seat row. Exit routes mirror them back to the door. Every
//! route carries a staggered start delay so patrons do not move as one block.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use showhouse_core::{
    saturating_seconds, Checkpoint, Command, Event, PatronSnapshot, PatronState, PatronView,
    Route, RouteAssignment, RoutePhase, SeatCoord, VenueLayout,
};

/// Height above the cushion of the final entry checkpoint.
const SEAT_APPROACH_LIFT: f32 = 0.6;

/// Delays used to stagger patrons within a phase.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerTuning {
    /// Fixed delay added between consecutive entering patrons, in seconds.
    pub entry_stagger: f32,
    /// Upper bound of the random delay added on top of the entry stagger.
    pub entry_jitter: f32,
    /// Extra delay per row of distance from the screen-side row, in seconds.
    pub exit_row_delay: f32,
    /// Fixed delay added between consecutive patrons leaving one row.
    pub exit_stagger: f32,
    /// Upper bound of the random delay added on top of the exit stagger.
    pub exit_jitter: f32,
}

impl Default for PlannerTuning {
    fn default() -> Self {
        Self {
            entry_stagger: 0.4,
            entry_jitter: 0.3,
            exit_row_delay: 0.5,
            exit_stagger: 0.15,
            exit_jitter: 0.1,
        }
    }
}

/// Configuration parameters required to construct the planner.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    tuning: PlannerTuning,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided delays and jitter seed.
    #[must_use]
    pub const fn new(tuning: PlannerTuning, rng_seed: u64) -> Self {
        Self { tuning, rng_seed }
    }
}

/// Pure system that answers route requests with route assignments.
#[derive(Debug)]
pub struct Planner {
    tuning: PlannerTuning,
    rng: ChaCha8Rng,
}

impl Planner {
    /// Creates a new planner using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            tuning: config.tuning,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes events and the audience view to emit route assignments.
    pub fn handle(
        &mut self,
        events: &[Event],
        patrons: &PatronView,
        layout: &VenueLayout,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            let Event::RoutesRequested { phase } = event else {
                continue;
            };

            let assignments = match phase {
                RoutePhase::Entry => self.plan_entry(patrons, layout),
                RoutePhase::Exit => self.plan_exit(patrons, layout),
            };
            if !assignments.is_empty() {
                out.push(Command::AssignRoutes {
                    phase: *phase,
                    assignments,
                });
            }
        }
    }

    fn plan_entry(&mut self, patrons: &PatronView, layout: &VenueLayout) -> Vec<RouteAssignment> {
        let mut delay = 0.0_f32;
        let mut assignments = Vec::new();

        for patron in patrons.iter().filter(|patron| awaits_entry_route(patron)) {
            let Some(coord) = layout.seat_coord(patron.seat) else {
                continue;
            };
            assignments.push(RouteAssignment {
                patron: patron.id,
                route: entry_route(layout, coord),
                start_delay: saturating_seconds(delay),
            });
            delay += self.tuning.entry_stagger + self.jitter(self.tuning.entry_jitter);
        }

        assignments
    }

    fn plan_exit(&mut self, patrons: &PatronView, layout: &VenueLayout) -> Vec<RouteAssignment> {
        let aisle_x = layout.aisle_x();
        let mut assignments = Vec::new();

        for row in (0..layout.rows).rev() {
            let mut leaving: Vec<(&PatronSnapshot, SeatCoord)> = patrons
                .iter()
                .filter(|patron| patron.state == PatronState::Seated)
                .filter_map(|patron| Some((patron, layout.seat_coord(patron.seat)?)))
                .filter(|(_, coord)| coord.row() == row)
                .collect();
            leaving.sort_by(|(left, left_coord), (right, right_coord)| {
                let left_gap = (layout.seat_x(left_coord.column()) - aisle_x).abs();
                let right_gap = (layout.seat_x(right_coord.column()) - aisle_x).abs();
                left_gap.total_cmp(&right_gap).then(left.id.cmp(&right.id))
            });

            let tiers_from_front = layout.front_row().saturating_sub(row);
            let mut delay = tiers_from_front as f32 * self.tuning.exit_row_delay;
            for (patron, coord) in leaving {
                assignments.push(RouteAssignment {
                    patron: patron.id,
                    route: exit_route(layout, coord),
                    start_delay: saturating_seconds(delay),
                });
                delay += self.tuning.exit_stagger + self.jitter(self.tuning.exit_jitter);
            }
        }

        assignments
    }

    fn jitter(&mut self, bound: f32) -> f32 {
        self.rng.gen::<f32>() * bound.max(0.0)
    }
}

fn awaits_entry_route(patron: &PatronSnapshot) -> bool {
    patron.state == PatronState::WalkingToAisle && patron.route.is_empty()
}

fn row_walkway(layout: &VenueLayout, coord: SeatCoord, x: f32) -> Vec3 {
    Vec3::new(
        x,
        layout.walking_height(coord.row()),
        layout.walkway_depth(coord.row()),
    )
}

/// Builds the six-checkpoint route from the door to the seat at `coord`.
#[must_use]
pub fn entry_route(layout: &VenueLayout, coord: SeatCoord) -> Route {
    let seat = layout.seat_position(coord);
    let aisle_x = layout.aisle_x();

    Route::new(
        RoutePhase::Entry,
        vec![
            Checkpoint::new(layout.entry_point(), PatronState::WalkingToAisle),
            Checkpoint::new(layout.front_aisle_point(), PatronState::WalkingToAisle),
            Checkpoint::new(
                layout.aisle_point(coord.row()),
                PatronState::WalkingInAisle,
            ),
            Checkpoint::new(
                row_walkway(layout, coord, aisle_x),
                PatronState::WalkingToSeat,
            ),
            Checkpoint::new(
                row_walkway(layout, coord, seat.x),
                PatronState::WalkingToSeat,
            ),
            Checkpoint::new(
                seat + Vec3::new(0.0, SEAT_APPROACH_LIFT, 0.0),
                PatronState::WalkingToSeat,
            ),
        ],
    )
}

/// Builds the route from the seat at `coord` back out through the door.
#[must_use]
pub fn exit_route(layout: &VenueLayout, coord: SeatCoord) -> Route {
    let seat = layout.seat_position(coord);
    let aisle_x = layout.aisle_x();

    Route::new(
        RoutePhase::Exit,
        vec![
            Checkpoint::new(
                row_walkway(layout, coord, seat.x),
                PatronState::WalkingFromSeat,
            ),
            Checkpoint::new(
                row_walkway(layout, coord, aisle_x),
                PatronState::WalkingFromSeat,
            ),
            Checkpoint::new(
                layout.aisle_point(coord.row()),
                PatronState::WalkingOutAisle,
            ),
            Checkpoint::new(layout.front_aisle_point(), PatronState::WalkingOutAisle),
            Checkpoint::new(layout.entry_point(), PatronState::Exiting),
        ],
    )
}
