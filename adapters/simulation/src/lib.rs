#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Simulation context and fixed-timestep driver for the Showhouse venue.
//!
//! [`Simulation`] owns the world and every system. Adapters feed it real frame
//! time and user input; it turns those into commands, pumps the resulting
//! events through the systems and keeps the full event log until drained.

use std::time::Duration;

use showhouse_core::{Command, CrowdReport, Event, SeatId};
use showhouse_rendering::{FrameInput, PointerInput, Scene};
use showhouse_system_crowd::{self as crowd, Crowd, CrowdTuning};
use showhouse_system_lifecycle::Lifecycle;
use showhouse_system_picking::{PointerRay, SeatPicker};
use showhouse_system_planner::{self as planner, Planner, PlannerTuning};
use showhouse_world::{self as world, query, World, WorldConfig};
use tracing::debug;

const PLANNER_SEED: u64 = 0x0b5e_55ed_1a7e_c0de;

/// Settings for every part of the simulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Venue, timing and admission seed.
    pub world: WorldConfig,
    /// Crowd motion parameters.
    pub crowd: CrowdTuning,
    /// Route stagger parameters.
    pub planner: PlannerTuning,
    /// Seed for the route jitter random source.
    pub planner_seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            crowd: CrowdTuning::default(),
            planner: PlannerTuning::default(),
            planner_seed: PLANNER_SEED,
        }
    }
}

/// Single owner of the world and the systems that react to it.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    planner: Planner,
    crowd: Crowd,
    lifecycle: Lifecycle,
    picker: SeatPicker,
    accumulator: Duration,
    report: CrowdReport,
    log: Vec<Event>,
}

impl Simulation {
    /// Creates a new simulation from the provided settings.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            world: World::with_config(config.world),
            planner: Planner::new(planner::Config::new(config.planner, config.planner_seed)),
            crowd: Crowd::new(crowd::Config::new(config.crowd)),
            lifecycle: Lifecycle::new(),
            picker: SeatPicker::new(),
            accumulator: Duration::ZERO,
            report: CrowdReport::default(),
            log: Vec::new(),
        }
    }

    /// Read-only access to the world for queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Audience progress computed during the most recent tick.
    #[must_use]
    pub fn crowd_report(&self) -> CrowdReport {
        self.report
    }

    /// Applies an external command and lets the planner answer any route request.
    pub fn submit(&mut self, command: Command) {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        self.settle(events);
    }

    /// Seat under the pointer ray, if the venue accepts picks right now.
    #[must_use]
    pub fn pick_seat(&self, pointer: PointerInput) -> Option<SeatId> {
        self.picker.pick(
            query::show_state(&self.world),
            &query::seat_view(&self.world),
            query::layout(&self.world),
            PointerRay::new(pointer.origin, pointer.direction),
        )
    }

    /// Toggles the reservation of the seat under the pointer ray.
    pub fn click(&mut self, pointer: PointerInput) {
        let mut commands = Vec::new();
        self.picker.handle(
            &[PointerRay::new(pointer.origin, pointer.direction)],
            query::show_state(&self.world),
            &query::seat_view(&self.world),
            query::layout(&self.world),
            &mut commands,
        );
        for command in commands {
            self.submit(command);
        }
    }

    /// Accumulates real time and runs at most one tick once a full tick is available.
    ///
    /// Returns whether a tick ran. Leftover time carries into the next call.
    pub fn advance(&mut self, real_dt: Duration) -> bool {
        let tick = query::timing(&self.world).tick();
        if tick.is_zero() {
            return false;
        }

        self.accumulator = self.accumulator.saturating_add(real_dt);
        if self.accumulator < tick {
            return false;
        }
        self.accumulator -= tick;
        self.step();
        true
    }

    /// Runs exactly one simulation tick: clock, crowd, lifecycle, then planning.
    pub fn step(&mut self) {
        let dt = query::timing(&self.world).tick();
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt }, &mut events);

        let mut commands = Vec::new();
        self.report = self.crowd.handle(
            &events,
            &query::clock_view(&self.world),
            &query::patron_view(&self.world),
            query::layout(&self.world),
            &mut commands,
        );
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, &mut events);
        }

        self.lifecycle.handle(
            &query::clock_view(&self.world),
            query::timing(&self.world).movie_duration(),
            &self.report,
            &mut commands,
        );
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }

        self.settle(events);
    }

    /// Applies user input, advances time, and refreshes the scene.
    pub fn update(&mut self, real_dt: Duration, input: FrameInput, scene: &mut Scene) {
        if let Some(pointer) = input.click {
            self.click(pointer);
        }
        if let Some(count) = input.buy_adjacent {
            self.submit(Command::BuyAdjacent { count });
        }
        if input.start_show {
            self.submit(Command::StartShow);
        }

        let _ = self.advance(real_dt);
        *scene = self.scene();
    }

    /// Captures the current scene for presentation.
    #[must_use]
    pub fn scene(&self) -> Scene {
        Scene::capture(
            &query::seat_view(&self.world),
            &query::patron_view(&self.world),
            &query::clock_view(&self.world),
            query::layout(&self.world),
        )
    }

    /// Removes and returns every event recorded since the previous drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.log)
    }

    /// Feeds events to the planner until it stops producing commands, logging everything.
    fn settle(&mut self, mut events: Vec<Event>) {
        loop {
            if events.is_empty() {
                break;
            }
            for event in &events {
                if let Event::ShowStateChanged { from, to } = event {
                    debug!(?from, ?to, "show state changed");
                }
            }

            let mut commands = Vec::new();
            self.planner.handle(
                &events,
                &query::patron_view(&self.world),
                query::layout(&self.world),
                &mut commands,
            );
            self.log.append(&mut events);

            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}
