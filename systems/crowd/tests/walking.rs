use std::time::Duration;

use showhouse_core::{Command, Event, PatronState, SeatCoord};
use showhouse_system_crowd::{Config, Crowd, CrowdTuning};
use showhouse_system_planner::{Config as PlannerConfig, Planner, PlannerTuning};
use showhouse_world::{self as world, query, World};

const MAX_TICKS: usize = 5_000;

struct Harness {
    world: World,
    planner: Planner,
    crowd: Crowd,
    log: Vec<Event>,
}

impl Harness {
    fn new() -> Self {
        Self {
            world: World::new(),
            planner: Planner::new(PlannerConfig::new(PlannerTuning::default(), 17)),
            crowd: Crowd::new(Config::new(CrowdTuning::default())),
            log: Vec::new(),
        }
    }

    fn submit(&mut self, command: Command) {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        let mut commands = Vec::new();
        self.planner.handle(
            &events,
            &query::patron_view(&self.world),
            query::layout(&self.world),
            &mut commands,
        );
        self.log.extend(events);
        for command in commands {
            world::apply(&mut self.world, command, &mut self.log);
        }
    }

    fn tick(&mut self) {
        let dt = query::timing(&self.world).tick();
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt }, &mut events);

        let mut commands = Vec::new();
        let _ = self.crowd.handle(
            &events,
            &query::clock_view(&self.world),
            &query::patron_view(&self.world),
            query::layout(&self.world),
            &mut commands,
        );
        self.log.extend(events);
        for command in commands {
            world::apply(&mut self.world, command, &mut self.log);
        }
    }
}

#[test]
fn single_patron_visits_every_checkpoint_then_sits() {
    let mut harness = Harness::new();
    let seat = query::layout(&harness.world)
        .seat_id(SeatCoord::new(0, 2))
        .expect("seat inside grid");
    harness.submit(Command::ToggleReservation { seat });
    harness.submit(Command::StartShow);
    assert_eq!(query::patron_view(&harness.world).len(), 1);

    let mut ticks = 0;
    while !harness
        .log
        .iter()
        .any(|event| matches!(event, Event::PatronSeated { .. }))
    {
        harness.tick();
        ticks += 1;
        assert!(ticks < MAX_TICKS, "patron never sat down");
    }

    let reached: Vec<u32> = harness
        .log
        .iter()
        .filter_map(|event| match event {
            Event::CheckpointReached { index, .. } => Some(*index),
            _ => None,
        })
        .collect();
    assert_eq!(reached, vec![0, 1, 2, 3, 4, 5]);

    let patron = query::patron_view(&harness.world).into_vec().remove(0);
    assert_eq!(patron.state, PatronState::Seated);
    assert_eq!(
        Some(patron.position),
        query::seat_position(&harness.world, seat)
    );
}

#[test]
fn patron_states_never_regress_while_entering() {
    let mut harness = Harness::new();
    harness.submit(Command::BuyAdjacent { count: 4 });
    harness.submit(Command::BuyAdjacent { count: 4 });
    harness.submit(Command::StartShow);

    let mut previous: Vec<PatronState> = query::patron_view(&harness.world)
        .iter()
        .map(|patron| patron.state)
        .collect();
    for _ in 0..2_000 {
        harness.tick();
        let current: Vec<PatronState> = query::patron_view(&harness.world)
            .iter()
            .map(|patron| patron.state)
            .collect();
        assert!(previous
            .iter()
            .zip(&current)
            .all(|(before, after)| before <= after));
        previous = current;
    }

    assert!(previous.iter().all(|state| *state == PatronState::Seated));
}

#[test]
fn activation_waits_for_the_start_delay() {
    let mut harness = Harness::new();
    harness.submit(Command::BuyAdjacent { count: 2 });
    harness.submit(Command::StartShow);

    let patrons = query::patron_view(&harness.world);
    let latest = patrons
        .iter()
        .map(|patron| patron.start_delay)
        .max()
        .expect("audience");

    let tick = query::timing(&harness.world).tick();
    let mut elapsed = Duration::ZERO;
    while elapsed + tick < latest {
        harness.tick();
        elapsed += tick;
    }
    let active = harness
        .log
        .iter()
        .filter(|event| matches!(event, Event::PatronActivated { .. }))
        .count();
    assert!(active < patrons.len() || latest.is_zero());
}
