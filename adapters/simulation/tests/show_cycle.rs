use std::time::Duration;

use glam::Vec3;
use showhouse_core::{Command, Event, PatronState, SeatCoord, SeatStatus, ShowState};
use showhouse_rendering::{FrameInput, PointerInput};
use showhouse_simulation::{Simulation, SimulationConfig};
use showhouse_world::{query, WorldConfig};

const MAX_STEPS: usize = 20_000;

fn seat(simulation: &Simulation, row: u32, column: u32) -> showhouse_core::SeatId {
    query::layout(simulation.world())
        .seat_id(SeatCoord::new(row, column))
        .expect("seat inside grid")
}

fn run_one_show(simulation: &mut Simulation) -> Vec<Event> {
    simulation.submit(Command::StartShow);
    let mut log = simulation.drain_events();
    let mut steps = 0;
    loop {
        simulation.step();
        log.extend(simulation.drain_events());
        steps += 1;

        let door = query::clock_view(simulation.world()).door_open;
        assert!((0.0..=1.0).contains(&door), "door {door} left unit range");

        if query::show_state(simulation.world()) == ShowState::Waiting {
            return log;
        }
        assert!(steps < MAX_STEPS, "show never finished");
    }
}

fn scripted(seed: u64) -> Simulation {
    let mut simulation = Simulation::new(SimulationConfig {
        world: WorldConfig {
            seed,
            ..WorldConfig::default()
        },
        ..SimulationConfig::default()
    });
    let reserved = [(0, 1), (2, 7), (4, 4)];
    for (row, column) in reserved {
        let seat = seat(&simulation, row, column);
        simulation.submit(Command::ToggleReservation { seat });
    }
    simulation.submit(Command::BuyAdjacent { count: 3 });
    simulation
}

#[test]
fn show_cycles_through_every_state_and_resets() {
    let mut simulation = scripted(21);
    let log = run_one_show(&mut simulation);

    let transitions: Vec<(ShowState, ShowState)> = log
        .iter()
        .filter_map(|event| match event {
            Event::ShowStateChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        transitions,
        vec![
            (ShowState::Waiting, ShowState::Entering),
            (ShowState::Entering, ShowState::Movie),
            (ShowState::Movie, ShowState::Leaving),
            (ShowState::Leaving, ShowState::Waiting),
        ]
    );

    let admitted = log
        .iter()
        .filter(|event| matches!(event, Event::PatronAdmitted { .. }))
        .count();
    let seated = log
        .iter()
        .filter(|event| matches!(event, Event::PatronSeated { .. }))
        .count();
    let exited = log
        .iter()
        .filter(|event| matches!(event, Event::PatronExited { .. }))
        .count();
    assert!((1..=6).contains(&admitted));
    assert_eq!(seated, admitted);
    assert_eq!(exited, admitted);
    assert!(log.contains(&Event::SeatsReset));

    assert!(query::patron_view(simulation.world()).is_empty());
    assert!(query::seat_view(simulation.world())
        .iter()
        .all(|seat| seat.status == SeatStatus::Free && !seat.has_occupant));
}

#[test]
fn movie_runs_for_its_full_duration() {
    let mut simulation = scripted(4);
    simulation.submit(Command::StartShow);
    let tick = query::timing(simulation.world()).tick();
    let movie = query::timing(simulation.world()).movie_duration();

    let mut movie_ticks = 0_u32;
    for _ in 0..MAX_STEPS {
        simulation.step();
        match query::show_state(simulation.world()) {
            ShowState::Movie => movie_ticks += 1,
            ShowState::Leaving => break,
            _ => {}
        }
    }

    let played = tick * movie_ticks;
    assert!(played + tick >= movie, "movie cut short after {played:?}");
    assert!(played <= movie + tick * 2, "movie overran to {played:?}");
}

#[test]
fn patron_states_only_move_forward_across_a_show() {
    let mut simulation = scripted(8);
    simulation.submit(Command::StartShow);
    let mut previous: Vec<PatronState> = query::patron_view(simulation.world())
        .iter()
        .map(|patron| patron.state)
        .collect();

    for _ in 0..MAX_STEPS {
        simulation.step();
        if query::show_state(simulation.world()) == ShowState::Waiting {
            break;
        }
        let current: Vec<PatronState> = query::patron_view(simulation.world())
            .iter()
            .map(|patron| patron.state)
            .collect();
        assert_eq!(current.len(), previous.len());
        assert!(previous
            .iter()
            .zip(&current)
            .all(|(before, after)| before <= after));
        previous = current;
    }
    assert_eq!(query::show_state(simulation.world()), ShowState::Waiting);
}

#[test]
fn seats_keep_their_occupant_flag_until_the_patron_leaves() {
    let mut simulation = scripted(13);
    simulation.submit(Command::StartShow);

    let patrons = query::patron_view(simulation.world());
    let seats = query::seat_view(simulation.world());
    for patron in patrons.iter() {
        let snapshot = seats.get(patron.seat).expect("seat");
        assert!(snapshot.has_occupant);
        assert!(snapshot.status.is_occupied());
    }

    for _ in 0..MAX_STEPS {
        simulation.step();
        let events = simulation.drain_events();
        for event in events {
            if let Event::PatronExited { seat, .. } = event {
                let snapshot = query::seat_view(simulation.world())
                    .get(seat)
                    .copied()
                    .expect("seat");
                assert!(!snapshot.has_occupant);
            }
        }
        if query::show_state(simulation.world()) == ShowState::Waiting {
            break;
        }
    }
}

#[test]
fn advance_runs_at_most_one_tick_per_call() {
    let mut simulation = Simulation::default();
    let tick = query::timing(simulation.world()).tick();

    assert!(!simulation.advance(tick / 2));
    assert!(simulation.advance(tick / 2 + Duration::from_micros(10)));
    assert!(!simulation.advance(Duration::ZERO));

    assert_eq!(count_ticks(&mut simulation), 1);
    assert!(simulation.advance(tick * 10));
    assert_eq!(count_ticks(&mut simulation), 1);
    // The backlog drains one tick per call.
    assert!(simulation.advance(Duration::ZERO));
}

fn count_ticks(simulation: &mut Simulation) -> usize {
    simulation
        .drain_events()
        .iter()
        .filter(|event| matches!(event, Event::TimeAdvanced { .. }))
        .count()
}

#[test]
fn frame_input_drives_reservation_purchase_and_start() {
    let mut simulation = Simulation::default();
    let layout = *query::layout(simulation.world());
    let target = layout.seat_position(SeatCoord::new(3, 2));
    let mut scene = simulation.scene();

    let click = FrameInput {
        click: Some(PointerInput {
            origin: target + Vec3::Y * 6.0,
            direction: Vec3::NEG_Y,
        }),
        ..FrameInput::default()
    };
    simulation.update(Duration::ZERO, click, &mut scene);
    let picked = seat(&simulation, 3, 2);
    assert_eq!(
        query::seat_view(simulation.world())
            .get(picked)
            .map(|seat| seat.status),
        Some(SeatStatus::Reserved)
    );
    assert_eq!(
        scene
            .seats
            .iter()
            .find(|seat| seat.id == picked)
            .map(|seat| seat.color),
        Some(showhouse_rendering::Color::for_seat(SeatStatus::Reserved))
    );

    let buy = FrameInput {
        buy_adjacent: Some(2),
        start_show: true,
        ..FrameInput::default()
    };
    simulation.update(Duration::ZERO, buy, &mut scene);
    assert_eq!(scene.show_state, ShowState::Entering);
    assert!(simulation
        .drain_events()
        .iter()
        .any(|event| matches!(event, Event::SeatsPurchased { seats } if seats.len() == 2)));
}

fn pointer_above(simulation: &Simulation, row: u32, column: u32) -> PointerInput {
    let target = query::layout(simulation.world()).seat_position(SeatCoord::new(row, column));
    PointerInput {
        origin: target + Vec3::Y * 6.0,
        direction: Vec3::NEG_Y,
    }
}

#[test]
fn pick_seat_finds_the_seat_under_the_pointer_while_waiting() {
    let simulation = Simulation::default();
    let pointer = pointer_above(&simulation, 2, 6);

    assert_eq!(simulation.pick_seat(pointer), Some(seat(&simulation, 2, 6)));
    // Picking is a query; the seat stays free.
    assert!(query::occupied_seats(simulation.world()).is_empty());
}

#[test]
fn pick_seat_misses_when_the_pointer_looks_away() {
    let simulation = Simulation::default();
    let pointer = PointerInput {
        direction: Vec3::Y,
        ..pointer_above(&simulation, 2, 6)
    };

    assert_eq!(simulation.pick_seat(pointer), None);
}

#[test]
fn pick_seat_is_disabled_once_the_show_starts() {
    let mut simulation = scripted(3);
    simulation.submit(Command::StartShow);
    assert_eq!(query::show_state(simulation.world()), ShowState::Entering);

    let pointer = pointer_above(&simulation, 2, 6);
    assert_eq!(simulation.pick_seat(pointer), None);
}

#[test]
fn crowd_report_tracks_the_audience_through_the_show() {
    let mut simulation = scripted(17);
    assert_eq!(simulation.crowd_report().total(), 0);

    simulation.submit(Command::StartShow);
    let admitted = u32::try_from(query::patron_view(simulation.world()).len()).expect("count");

    let mut saw_walking = false;
    for _ in 0..MAX_STEPS {
        simulation.step();
        let report = simulation.crowd_report();
        saw_walking |= report.walking > 0;
        if query::show_state(simulation.world()) == ShowState::Movie {
            break;
        }
    }

    let report = simulation.crowd_report();
    assert!(saw_walking);
    assert_eq!(report.total(), admitted);
    assert!(report.all_seated(), "{report:?}");
}
