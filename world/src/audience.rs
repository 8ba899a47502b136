//! Patron store and audience admission.

use std::time::Duration;

use glam::Vec3;
use rand::{seq::SliceRandom, Rng};
use showhouse_core::{
    Appearance, PatronId, PatronSnapshot, PatronState, PatronStep, Route, RouteAssignment,
    RoutePhase, SeatId, APPEARANCE_VARIANTS,
};

#[derive(Clone, Debug)]
pub(crate) struct Patron {
    pub(crate) id: PatronId,
    pub(crate) seat: SeatId,
    position: Vec3,
    facing: f32,
    walk_cycle: f32,
    appearance: Appearance,
    pub(crate) state: PatronState,
    pub(crate) active: bool,
    pub(crate) waypoint_index: u32,
    route: Route,
    start_delay: Duration,
}

impl Patron {
    fn snapshot(&self) -> PatronSnapshot {
        PatronSnapshot {
            id: self.id,
            seat: self.seat,
            position: self.position,
            facing: self.facing,
            walk_cycle: self.walk_cycle,
            appearance: self.appearance,
            state: self.state,
            active: self.active,
            waypoint_index: self.waypoint_index,
            route: self.route.clone(),
            start_delay: self.start_delay,
        }
    }

    /// Installs a freshly planned route and parks the patron until its delay elapses.
    ///
    /// Returns `false` without changes when the route would move the patron's
    /// state backwards or has no checkpoints.
    pub(crate) fn assign(&mut self, assignment: RouteAssignment) -> bool {
        let Some(first) = assignment.route.checkpoints().first() else {
            return false;
        };
        if first.heading < self.state {
            return false;
        }

        self.state = first.heading;
        self.route = assignment.route;
        self.start_delay = assignment.start_delay;
        self.waypoint_index = 0;
        self.active = false;
        true
    }

    /// Copies the kinematic state computed by the crowd step.
    pub(crate) fn apply_step(&mut self, step: &PatronStep) {
        self.position = step.position;
        self.facing = step.facing;
        self.walk_cycle = step.walk_cycle;
        self.active = step.active;
        self.waypoint_index = step.waypoint_index;
        self.state = step.state;
    }

    pub(crate) fn route(&self) -> &Route {
        &self.route
    }
}

/// Append-only patron collection, cleared between shows.
#[derive(Clone, Debug, Default)]
pub(crate) struct Audience {
    patrons: Vec<Patron>,
}

impl Audience {
    /// Draws attendees from `occupied` seats and creates a patron for each.
    ///
    /// Between one and `occupied.len()` distinct seats are chosen uniformly.
    pub(crate) fn admit<R: Rng>(
        &mut self,
        occupied: &[SeatId],
        entry_point: Vec3,
        rng: &mut R,
    ) -> Vec<(PatronId, SeatId, Appearance)> {
        if occupied.is_empty() {
            return Vec::new();
        }

        let count = rng.gen_range(1..=occupied.len());
        let mut attendees = occupied.to_vec();
        attendees.shuffle(rng);
        attendees.truncate(count);

        attendees
            .into_iter()
            .filter_map(|seat| {
                let id = PatronId::new(u32::try_from(self.patrons.len()).ok()?);
                let appearance = Appearance::new(rng.gen_range(0..APPEARANCE_VARIANTS));
                self.patrons.push(Patron {
                    id,
                    seat,
                    position: entry_point,
                    facing: 0.0,
                    walk_cycle: 0.0,
                    appearance,
                    state: PatronState::WalkingToAisle,
                    active: false,
                    waypoint_index: 0,
                    route: Route::empty(RoutePhase::Entry),
                    start_delay: Duration::ZERO,
                });
                Some((id, seat, appearance))
            })
            .collect()
    }

    pub(crate) fn get_mut(&mut self, id: PatronId) -> Option<&mut Patron> {
        usize::try_from(id.get())
            .ok()
            .and_then(|index| self.patrons.get_mut(index))
            .filter(|patron| patron.id == id)
    }

    pub(crate) fn all_in(&self, state: PatronState) -> bool {
        !self.patrons.is_empty() && self.patrons.iter().all(|patron| patron.state == state)
    }

    pub(crate) fn clear(&mut self) {
        self.patrons.clear();
    }

    pub(crate) fn snapshots(&self) -> Vec<PatronSnapshot> {
        self.patrons.iter().map(Patron::snapshot).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use showhouse_core::{Checkpoint, RoutePhase};

    #[test]
    fn admission_draws_distinct_occupied_seats() {
        let occupied: Vec<SeatId> = [3, 17, 42].into_iter().map(SeatId::new).collect();
        for seed in 0..100 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut audience = Audience::default();
            let admitted = audience.admit(&occupied, Vec3::ZERO, &mut rng);

            assert!((1..=3).contains(&admitted.len()), "seed {seed}");
            let mut seats: Vec<SeatId> = admitted.iter().map(|(_, seat, _)| *seat).collect();
            seats.sort();
            seats.dedup();
            assert_eq!(seats.len(), admitted.len());
            assert!(seats.iter().all(|seat| occupied.contains(seat)));
        }
    }

    #[test]
    fn admission_without_seats_creates_nobody() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut audience = Audience::default();
        assert!(audience.admit(&[], Vec3::ZERO, &mut rng).is_empty());
        assert!(audience.snapshots().is_empty());
    }

    #[test]
    fn assignment_never_moves_state_backwards() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut audience = Audience::default();
        let admitted = audience.admit(&[SeatId::new(0)], Vec3::ZERO, &mut rng);
        let (id, _, _) = admitted[0];
        let patron = audience.get_mut(id).expect("patron");
        patron.state = PatronState::Seated;

        let entry = RouteAssignment {
            patron: id,
            route: Route::new(
                RoutePhase::Entry,
                vec![Checkpoint::new(Vec3::ONE, PatronState::WalkingToAisle)],
            ),
            start_delay: Duration::ZERO,
        };
        assert!(!patron.assign(entry));

        let exit = RouteAssignment {
            patron: id,
            route: Route::new(
                RoutePhase::Exit,
                vec![Checkpoint::new(Vec3::ONE, PatronState::WalkingFromSeat)],
            ),
            start_delay: Duration::from_secs(1),
        };
        assert!(patron.assign(exit));
        assert_eq!(patron.state, PatronState::WalkingFromSeat);
        assert!(!patron.active);
    }
}
