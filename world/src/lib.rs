#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for the Showhouse venue.

mod audience;
mod seating;
mod show;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use showhouse_core::{
    Command, Event, Lighting, PatronState, PatronStep, PurchaseError, ReservationError,
    RouteAssignment, RoutePhase, SeatId, ShowEffect, ShowState, ShowTiming, ShowTransition,
    ShowTrigger, StartError, VenueError, VenueLayout,
};

use crate::{audience::Audience, seating::SeatMap, show::ShowClock};

const ADMISSION_SEED: u64 = 0x5eed_cafe_f00d_2024;

/// Settings applied when the world is constructed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldConfig {
    /// Initial venue geometry.
    pub layout: VenueLayout,
    /// Show and clock timing.
    pub timing: ShowTiming,
    /// Seed for the admission random source.
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            layout: VenueLayout::default(),
            timing: ShowTiming::default(),
            seed: ADMISSION_SEED,
        }
    }
}

/// Represents the authoritative Showhouse world state.
#[derive(Debug)]
pub struct World {
    layout: VenueLayout,
    timing: ShowTiming,
    seats: SeatMap,
    clock: ShowClock,
    audience: Audience,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a new world with the default venue, timing and seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    /// Creates a new world from explicit settings.
    ///
    /// An invalid layout falls back to the default venue; use
    /// [`Command::ConfigureVenue`] to receive the validation error instead.
    /// Out-of-range timing falls back to [`ShowTiming::default`].
    #[must_use]
    pub fn with_config(config: WorldConfig) -> Self {
        let layout = if config.layout.validate().is_ok() {
            config.layout
        } else {
            VenueLayout::default()
        };
        let timing = if config.timing.validate().is_ok() {
            config.timing
        } else {
            ShowTiming::default()
        };

        Self {
            layout,
            timing,
            seats: SeatMap::new(&layout),
            clock: ShowClock::new(),
            audience: Audience::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureVenue { layout } => configure_venue(world, layout, out_events),
        Command::ToggleReservation { seat } => toggle_reservation(world, seat, out_events),
        Command::BuyAdjacent { count } => buy_adjacent(world, count, out_events),
        Command::StartShow => start_show(world, out_events),
        Command::Tick { dt } => {
            world.clock.advance(dt, &world.timing);
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::AssignRoutes { phase, assignments } => {
            assign_routes(world, phase, assignments, out_events);
        }
        Command::AdvanceCrowd { steps } => advance_crowd(world, &steps, out_events),
        Command::AdvanceShow { trigger } => advance_show(world, trigger, out_events),
    }
}

fn configure_venue(world: &mut World, layout: VenueLayout, out_events: &mut Vec<Event>) {
    if world.clock.state() != ShowState::Waiting {
        out_events.push(Event::VenueRejected {
            reason: VenueError::ShowInProgress,
        });
        return;
    }
    if let Err(reason) = layout.validate() {
        out_events.push(Event::VenueRejected { reason });
        return;
    }

    world.layout = layout;
    world.seats = SeatMap::new(&layout);
    world.audience.clear();
    out_events.push(Event::VenueConfigured { layout });
}

fn toggle_reservation(world: &mut World, seat: SeatId, out_events: &mut Vec<Event>) {
    if world.clock.state() != ShowState::Waiting {
        out_events.push(Event::ReservationRejected {
            seat,
            reason: ReservationError::InvalidState,
        });
        return;
    }

    match world.seats.toggle_reservation(seat) {
        Ok(status) if status.is_occupied() => out_events.push(Event::SeatReserved { seat }),
        Ok(_) => out_events.push(Event::SeatReleased { seat }),
        Err(reason) => out_events.push(Event::ReservationRejected { seat, reason }),
    }
}

fn buy_adjacent(world: &mut World, count: u32, out_events: &mut Vec<Event>) {
    if world.clock.state() != ShowState::Waiting {
        out_events.push(Event::PurchaseRejected {
            count,
            reason: PurchaseError::InvalidState,
        });
        return;
    }

    match world.seats.find_contiguous_free(count) {
        Ok(seats) => {
            world.seats.buy(&seats);
            out_events.push(Event::SeatsPurchased { seats });
        }
        Err(reason) => out_events.push(Event::PurchaseRejected { count, reason }),
    }
}

fn start_show(world: &mut World, out_events: &mut Vec<Event>) {
    let state = world.clock.state();
    let transition = match state.transition(ShowTrigger::StartRequested) {
        Some(transition) => transition,
        None => {
            out_events.push(Event::ShowStartRejected {
                reason: StartError::NotWaiting,
            });
            return;
        }
    };
    if world.seats.occupied().is_empty() {
        out_events.push(Event::ShowStartRejected {
            reason: StartError::NoOccupiedSeats,
        });
        return;
    }

    commit_transition(world, transition, out_events);
}

fn advance_show(world: &mut World, trigger: ShowTrigger, out_events: &mut Vec<Event>) {
    if trigger == ShowTrigger::StartRequested {
        start_show(world, out_events);
        return;
    }

    let state = world.clock.state();
    let guard_holds = match trigger {
        ShowTrigger::StartRequested => false,
        ShowTrigger::AudienceSeated => world.audience.all_in(PatronState::Seated),
        ShowTrigger::MovieFinished => {
            world.clock.elapsed_in_state() >= world.timing.movie_duration()
        }
        ShowTrigger::AudienceExited => world.audience.all_in(PatronState::Exited),
    };

    match state.transition(trigger) {
        Some(transition) if guard_holds => commit_transition(world, transition, out_events),
        _ => out_events.push(Event::ShowTransitionRejected { state, trigger }),
    }
}

fn commit_transition(world: &mut World, transition: ShowTransition, out_events: &mut Vec<Event>) {
    let from = world.clock.state();
    world.clock.enter(transition.next);
    out_events.push(Event::ShowStateChanged {
        from,
        to: transition.next,
    });

    for effect in transition.effects {
        match effect {
            ShowEffect::AdmitAudience => admit_audience(world, out_events),
            ShowEffect::RequestEntryRoutes => out_events.push(Event::RoutesRequested {
                phase: RoutePhase::Entry,
            }),
            ShowEffect::RequestExitRoutes => out_events.push(Event::RoutesRequested {
                phase: RoutePhase::Exit,
            }),
            ShowEffect::RaiseLights => set_lighting(world, Lighting::On, out_events),
            ShowEffect::DimLights => set_lighting(world, Lighting::Off, out_events),
            ShowEffect::ClearAudience => world.audience.clear(),
            ShowEffect::ResetSeats => {
                world.seats.reset_all();
                out_events.push(Event::SeatsReset);
            }
        }
    }
}

fn admit_audience(world: &mut World, out_events: &mut Vec<Event>) {
    let occupied = world.seats.occupied();
    let entry_point = world.layout.entry_point();
    let admitted = world
        .audience
        .admit(&occupied, entry_point, &mut world.rng);

    for (patron, seat, appearance) in admitted {
        world.seats.set_occupant(seat, true);
        out_events.push(Event::PatronAdmitted {
            patron,
            seat,
            appearance,
        });
    }
}

fn set_lighting(world: &mut World, lighting: Lighting, out_events: &mut Vec<Event>) {
    if world.clock.set_lighting(lighting) {
        out_events.push(Event::LightingChanged { lighting });
    }
}

fn assign_routes(
    world: &mut World,
    phase: RoutePhase,
    assignments: Vec<RouteAssignment>,
    out_events: &mut Vec<Event>,
) {
    let expected_state = match phase {
        RoutePhase::Entry => ShowState::Entering,
        RoutePhase::Exit => ShowState::Leaving,
    };
    if world.clock.state() != expected_state {
        return;
    }

    let mut count = 0;
    for assignment in assignments {
        if assignment.route.phase() != phase {
            continue;
        }
        let Some(patron) = world.audience.get_mut(assignment.patron) else {
            continue;
        };
        if patron.assign(assignment) {
            count += 1;
        }
    }

    out_events.push(Event::RoutesAssigned { phase, count });
}

fn advance_crowd(world: &mut World, steps: &[PatronStep], out_events: &mut Vec<Event>) {
    for step in steps {
        let Some(patron) = world.audience.get_mut(step.patron) else {
            continue;
        };
        if step.state < patron.state || step.waypoint_index < patron.waypoint_index {
            continue;
        }
        let final_index = patron.route().len().saturating_sub(1);
        if usize::try_from(step.waypoint_index).map_or(true, |index| index > final_index) {
            continue;
        }

        let was_active = patron.active;
        let previous_index = patron.waypoint_index;
        let previous_state = patron.state;
        let seat = patron.seat;
        let phase = patron.route().phase();
        patron.apply_step(step);

        if step.active && !was_active {
            out_events.push(Event::PatronActivated {
                patron: step.patron,
            });
        }
        for index in previous_index..step.waypoint_index {
            out_events.push(Event::CheckpointReached {
                patron: step.patron,
                index,
            });
        }

        let arrival = phase.arrival_state();
        if step.state == arrival && previous_state != arrival {
            out_events.push(Event::CheckpointReached {
                patron: step.patron,
                index: step.waypoint_index,
            });
            match arrival {
                PatronState::Exited => {
                    world.seats.set_occupant(seat, false);
                    out_events.push(Event::PatronExited {
                        patron: step.patron,
                        seat,
                    });
                }
                _ => out_events.push(Event::PatronSeated {
                    patron: step.patron,
                    seat,
                }),
            }
        }
    }
}

/// Query helpers that expose read-only world state.
pub mod query {
    use showhouse_core::{
        PatronView, SeatId, SeatView, ShowClockView, ShowState, ShowTiming, VenueLayout,
    };

    use super::World;

    /// Geometry of the venue currently in effect.
    #[must_use]
    pub fn layout(world: &World) -> &VenueLayout {
        &world.layout
    }

    /// Timing parameters the world runs with.
    #[must_use]
    pub fn timing(world: &World) -> &ShowTiming {
        &world.timing
    }

    /// Lifecycle state currently active.
    #[must_use]
    pub fn show_state(world: &World) -> ShowState {
        world.clock.state()
    }

    /// Captures the show clock, door and lighting.
    #[must_use]
    pub fn clock_view(world: &World) -> ShowClockView {
        world.clock.view()
    }

    /// Captures a read-only view of every seat.
    #[must_use]
    pub fn seat_view(world: &World) -> SeatView {
        SeatView::from_snapshots(world.seats.snapshots())
    }

    /// Captures a read-only view of the audience.
    #[must_use]
    pub fn patron_view(world: &World) -> PatronView {
        PatronView::from_snapshots(world.audience.snapshots())
    }

    /// Identifiers of every reserved or bought seat.
    #[must_use]
    pub fn occupied_seats(world: &World) -> Vec<SeatId> {
        world.seats.occupied()
    }

    /// Position of the seat cushion for the provided seat.
    #[must_use]
    pub fn seat_position(world: &World, seat: SeatId) -> Option<glam::Vec3> {
        world.seats.position(seat)
    }
}
