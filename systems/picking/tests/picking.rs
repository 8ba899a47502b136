use glam::Vec3;
use showhouse_core::{Event, SeatCoord, ShowState};
use showhouse_system_picking::{PointerRay, SeatPicker};
use showhouse_world::{self as world, query, World};

#[test]
fn ray_from_above_selects_the_seat_below() {
    let world = World::new();
    let layout = query::layout(&world);
    let coord = SeatCoord::new(3, 6);
    let seat = layout.seat_position(coord);

    let picker = SeatPicker::new();
    let hit = picker.pick(
        ShowState::Waiting,
        &query::seat_view(&world),
        layout,
        PointerRay::new(seat + Vec3::new(0.0, 8.0, 0.0), Vec3::NEG_Y),
    );
    assert_eq!(hit, layout.seat_id(coord));
}

#[test]
fn nearest_seat_along_the_ray_wins() {
    let world = World::new();
    let layout = query::layout(&world);
    let first = layout.seat_position(SeatCoord::new(2, 0));
    let origin = Vec3::new(-20.0, first.y + 0.3, first.z);

    let picker = SeatPicker::new();
    let hit = picker.pick(
        ShowState::Waiting,
        &query::seat_view(&world),
        layout,
        PointerRay::new(origin, Vec3::X),
    );
    assert_eq!(hit, layout.seat_id(SeatCoord::new(2, 0)));
}

#[test]
fn rays_that_miss_every_seat_pick_nothing() {
    let world = World::new();
    let picker = SeatPicker::new();
    let hit = picker.pick(
        ShowState::Waiting,
        &query::seat_view(&world),
        query::layout(&world),
        PointerRay::new(Vec3::new(0.0, 10.0, 0.0), Vec3::Y),
    );
    assert_eq!(hit, None);
}

#[test]
fn picking_is_disabled_once_the_show_starts() {
    let world = World::new();
    let layout = query::layout(&world);
    let seat = layout.seat_position(SeatCoord::new(0, 0));
    let picker = SeatPicker::new();
    let hit = picker.pick(
        ShowState::Entering,
        &query::seat_view(&world),
        layout,
        PointerRay::new(seat + Vec3::Y * 5.0, Vec3::NEG_Y),
    );
    assert_eq!(hit, None);
}

#[test]
fn picked_seats_become_reserved() {
    let mut world = World::new();
    let layout = *query::layout(&world);
    let coord = SeatCoord::new(1, 8);
    let seat = layout.seat_position(coord);

    let mut picker = SeatPicker::new();
    let mut commands = Vec::new();
    picker.handle(
        &[PointerRay::new(seat + Vec3::Y * 5.0, Vec3::NEG_Y)],
        query::show_state(&world),
        &query::seat_view(&world),
        &layout,
        &mut commands,
    );
    assert_eq!(commands.len(), 1);

    let mut events = Vec::new();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }
    assert_eq!(
        query::occupied_seats(&world),
        vec![layout.seat_id(coord).expect("seat")]
    );
    assert!(matches!(events.as_slice(), [Event::SeatReserved { .. }]));
}
