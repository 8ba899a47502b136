#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Showhouse adapters.
//!
//! A [`Scene`] is a read-only picture of the venue taken between ticks. Backends
//! draw it and hand back a [`FrameInput`] describing what the user did.

use std::time::Duration;

use anyhow::Result as AnyResult;
use glam::Vec3;
use showhouse_core::{
    Appearance, Lighting, PatronId, PatronView, SeatId, SeatStatus, SeatView, ShowClockView,
    ShowState, VenueLayout,
};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from floating point channels.
    #[must_use]
    pub const fn opaque(red: f32, green: f32, blue: f32) -> Self {
        Self::new(red, green, blue, 1.0)
    }

    /// Color a seat is painted with for the provided status.
    #[must_use]
    pub const fn for_seat(status: SeatStatus) -> Self {
        match status {
            SeatStatus::Free => Self::opaque(0.15, 0.25, 0.5),
            SeatStatus::Reserved => Self::opaque(0.7, 0.6, 0.1),
            SeatStatus::Bought => Self::opaque(0.6, 0.15, 0.15),
        }
    }

    /// Returns the color scaled toward black by `amount`.
    #[must_use]
    pub fn darken(self, amount: f32) -> Self {
        let keep = 1.0 - amount.clamp(0.0, 1.0);
        Self {
            red: self.red * keep,
            green: self.green * keep,
            blue: self.blue * keep,
            alpha: self.alpha,
        }
    }
}

/// Seat drawn at a fixed position with a status color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeatPresentation {
    /// Identifier used when reporting picks.
    pub id: SeatId,
    /// Centre of the seat cushion.
    pub position: Vec3,
    /// Fill color derived from the seat status.
    pub color: Color,
    /// Whether a patron currently holds the seat.
    pub has_occupant: bool,
}

/// Patron figure drawn at its current position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PatronPresentation {
    /// Identifier of the patron.
    pub id: PatronId,
    /// Position of the figure's feet.
    pub position: Vec3,
    /// Heading about the vertical axis, in radians.
    pub facing: f32,
    /// Animation phase of the walk cycle.
    pub walk_phase: f32,
    /// Model variant to draw.
    pub appearance: Appearance,
}

/// Entry door and how far it is open.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoorPresentation {
    /// Hinge position on the floor.
    pub position: Vec3,
    /// Opening in `[0, 1]`.
    pub open: f32,
}

/// Scene description combining the seats, the audience and venue fixtures.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Every seat of the venue in identifier order.
    pub seats: Vec<SeatPresentation>,
    /// Patrons currently visible inside the venue.
    pub patrons: Vec<PatronPresentation>,
    /// Entry door.
    pub door: DoorPresentation,
    /// Ambient lighting.
    pub lighting: Lighting,
    /// Screen frame to project.
    pub screen_frame: u32,
    /// Lifecycle state of the show.
    pub show_state: ShowState,
}

impl Scene {
    /// Captures a scene from world views.
    #[must_use]
    pub fn capture(
        seats: &SeatView,
        patrons: &PatronView,
        clock: &ShowClockView,
        layout: &VenueLayout,
    ) -> Self {
        let seats = seats
            .iter()
            .map(|seat| SeatPresentation {
                id: seat.id,
                position: seat.position,
                color: Color::for_seat(seat.status),
                has_occupant: seat.has_occupant,
            })
            .collect();

        let patrons = patrons
            .iter()
            .filter(|patron| patron.is_visible())
            .map(|patron| PatronPresentation {
                id: patron.id,
                position: patron.position,
                facing: patron.facing,
                walk_phase: patron.walk_cycle,
                appearance: patron.appearance,
            })
            .collect();

        Self {
            seats,
            patrons,
            door: DoorPresentation {
                position: layout.door_position(),
                open: clock.door_open,
            },
            lighting: clock.lighting,
            screen_frame: clock.screen_frame,
            show_state: clock.state,
        }
    }

    /// Color used to clear the frame under the current lighting.
    #[must_use]
    pub fn ambient(&self) -> Color {
        let base = Color::opaque(0.35, 0.33, 0.3);
        match self.lighting {
            Lighting::On => base,
            Lighting::Off => base.darken(0.85),
        }
    }
}

/// Pointer ray captured by the backend in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerInput {
    /// Camera position the ray starts from.
    pub origin: Vec3,
    /// Direction through the cursor.
    pub direction: Vec3,
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Pointer ray when the user clicked this frame.
    pub click: Option<PointerInput>,
    /// Number of adjacent seats the user asked to buy.
    pub buy_adjacent: Option<u32>,
    /// Whether the user asked the show to start.
    pub start_show: bool,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Scene content that should be displayed first.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            scene,
        }
    }
}

/// Rendering backend capable of presenting Showhouse scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the real frame delta and
    /// the input captured for the frame, and refreshes the scene before it is
    /// drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}
