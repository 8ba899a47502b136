#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Crowd integrator that walks patrons along their planned routes.
//!
//! Every tick reads a single pre-tick snapshot of the audience, so the
//! separation push acting on one patron never observes another patron's
//! position from the same tick. Results are submitted to the world as one
//! [`Command::AdvanceCrowd`] batch.

use std::{f32::consts::PI, time::Duration};

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use showhouse_core::{
    Command, CrowdReport, Event, PatronSnapshot, PatronState, PatronStep, PatronView,
    ShowClockView, ShowState, VenueLayout,
};

/// Facing of a seated patron, looking at the screen.
const SEATED_FACING: f32 = PI;

/// Motion parameters of the crowd.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrowdTuning {
    /// Walking speed while entering, in units per second.
    pub entering_speed: f32,
    /// Walking speed while leaving, in units per second.
    pub leaving_speed: f32,
    /// Horizontal arrival distance for intermediate checkpoints.
    pub waypoint_tolerance: f32,
    /// Horizontal arrival distance for the last checkpoint of a route.
    pub final_tolerance: f32,
    /// Distance under which neighbours push each other apart.
    pub separation_radius: f32,
    /// Push strength per unit of overlap inside the radius.
    pub separation_gain: f32,
    /// Neighbours closer than this are treated as coincident and ignored.
    pub separation_floor: f32,
    /// Walk-cycle phase gained per second of walking.
    pub walk_cycle_rate: f32,
}

impl Default for CrowdTuning {
    fn default() -> Self {
        Self {
            entering_speed: 2.5,
            leaving_speed: 4.5,
            waypoint_tolerance: 0.2,
            final_tolerance: 0.5,
            separation_radius: 0.6,
            separation_gain: 3.0,
            separation_floor: 0.01,
            walk_cycle_rate: 8.0,
        }
    }
}

/// Configuration parameters required to construct the crowd system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    tuning: CrowdTuning,
}

impl Config {
    /// Creates a new configuration using the provided tuning.
    #[must_use]
    pub const fn new(tuning: CrowdTuning) -> Self {
        Self { tuning }
    }
}

/// Pure system that advances every walking patron once per tick.
#[derive(Debug)]
pub struct Crowd {
    tuning: CrowdTuning,
}

impl Crowd {
    /// Creates a new crowd system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            tuning: config.tuning,
        }
    }

    /// Integrates the audience over the time carried by `events`.
    ///
    /// Returns the audience progress expected once the emitted steps apply.
    /// Without a [`Event::TimeAdvanced`] event nothing moves and the report
    /// describes the current snapshot.
    pub fn handle(
        &mut self,
        events: &[Event],
        clock: &ShowClockView,
        patrons: &PatronView,
        layout: &VenueLayout,
        out: &mut Vec<Command>,
    ) -> CrowdReport {
        let dt = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(*dt),
                _ => None,
            })
            .fold(Duration::ZERO, Duration::saturating_add);

        if dt.is_zero() {
            return report(patrons.iter().map(|patron| (patron.active, patron.state)));
        }

        let speed = if clock.state == ShowState::Leaving {
            self.tuning.leaving_speed
        } else {
            self.tuning.entering_speed
        };

        let mut steps = Vec::new();
        let mut outcomes = Vec::with_capacity(patrons.len());
        for patron in patrons.iter() {
            match self.integrate(patron, patrons, clock, layout, speed, dt) {
                Some(step) => {
                    outcomes.push((step.active, step.state));
                    steps.push(step);
                }
                None => outcomes.push((patron.active, patron.state)),
            }
        }

        if !steps.is_empty() {
            out.push(Command::AdvanceCrowd { steps });
        }

        report(outcomes)
    }

    fn integrate(
        &self,
        patron: &PatronSnapshot,
        crowd: &PatronView,
        clock: &ShowClockView,
        layout: &VenueLayout,
        speed: f32,
        dt: Duration,
    ) -> Option<PatronStep> {
        if !patron.state.is_walking() {
            return None;
        }
        let target = patron.route.get(patron.waypoint_index)?;
        if !patron.active && clock.elapsed_in_state < patron.start_delay {
            return None;
        }

        let mut step = PatronStep {
            patron: patron.id,
            position: patron.position,
            facing: patron.facing,
            walk_cycle: patron.walk_cycle,
            active: true,
            waypoint_index: patron.waypoint_index,
            state: patron.state.max(target.heading),
        };

        let is_final = patron.route.is_final(patron.waypoint_index);
        let tolerance = if is_final {
            self.tuning.final_tolerance
        } else {
            self.tuning.waypoint_tolerance
        };
        let offset = target.point - patron.position;
        let distance = Vec2::new(offset.x, offset.z).length();

        if distance > tolerance {
            let seconds = dt.as_secs_f32();
            let direction = offset.normalize_or_zero();
            let push = self.separation(patron, crowd);

            step.position += direction * speed * seconds + push * seconds;
            step.facing = direction.x.atan2(direction.z);
            if !is_final {
                step.position.y = layout.walking_elevation(step.position.z);
            }
            step.walk_cycle += seconds * self.tuning.walk_cycle_rate;
        } else if is_final {
            step.state = patron.route.phase().arrival_state();
            if step.state == PatronState::Seated {
                if let Some(coord) = layout.seat_coord(patron.seat) {
                    step.position = layout.seat_position(coord);
                }
                step.facing = SEATED_FACING;
                step.walk_cycle = 0.0;
            }
        } else {
            step.waypoint_index += 1;
            if let Some(next) = patron.route.get(step.waypoint_index) {
                step.state = step.state.max(next.heading);
            }
        }

        Some(step)
    }

    /// Sums the horizontal push from every moving neighbour inside the radius.
    fn separation(&self, patron: &PatronSnapshot, crowd: &PatronView) -> Vec3 {
        let radius = self.tuning.separation_radius;
        crowd
            .iter()
            .filter(|other| other.id != patron.id && other.is_moving())
            .filter_map(|other| {
                let away = Vec3::new(
                    patron.position.x - other.position.x,
                    0.0,
                    patron.position.z - other.position.z,
                );
                let distance = away.length();
                if distance <= self.tuning.separation_floor || distance >= radius {
                    return None;
                }
                Some(away / distance * (radius - distance) * self.tuning.separation_gain)
            })
            .fold(Vec3::ZERO, |total, push| total + push)
    }
}

fn report(outcomes: impl IntoIterator<Item = (bool, PatronState)>) -> CrowdReport {
    let mut report = CrowdReport::default();
    for (active, state) in outcomes {
        match state {
            PatronState::Seated => report.seated += 1,
            PatronState::Exited => report.exited += 1,
            _ if active => report.walking += 1,
            _ => report.waiting += 1,
        }
    }
    report
}
