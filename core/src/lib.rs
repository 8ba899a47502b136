#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Showhouse venue simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod venue;

pub use venue::{VenueError, VenueLayout};

/// Number of distinct patron appearances the renderer can draw.
pub const APPEARANCE_VARIANTS: u8 = 15;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the venue geometry, rebuilding the seat pool.
    ConfigureVenue {
        /// Layout describing rows, columns and spacing of the venue.
        layout: VenueLayout,
    },
    /// Toggles a seat between free and reserved.
    ToggleReservation {
        /// Seat targeted by the toggle.
        seat: SeatId,
    },
    /// Purchases a block of mutually adjacent free seats within one row.
    BuyAdjacent {
        /// Number of seats requested.
        count: u32,
    },
    /// Requests that the show begin admitting the audience.
    StartShow,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Installs freshly planned routes on the listed patrons.
    AssignRoutes {
        /// Phase the routes were planned for.
        phase: RoutePhase,
        /// Per-patron route and staggered start delay.
        assignments: Vec<RouteAssignment>,
    },
    /// Applies one integration step computed for the moving patrons.
    AdvanceCrowd {
        /// Kinematic updates for every patron that changed during the tick.
        steps: Vec<PatronStep>,
    },
    /// Requests a lifecycle transition driven by the provided trigger.
    AdvanceShow {
        /// Condition that prompted the transition request.
        trigger: ShowTrigger,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the venue adopted a new layout.
    VenueConfigured {
        /// Layout now in effect.
        layout: VenueLayout,
    },
    /// Reports that a venue layout was refused.
    VenueRejected {
        /// Reason the layout was refused.
        reason: VenueError,
    },
    /// Confirms that a free seat became reserved.
    SeatReserved {
        /// Seat that was reserved.
        seat: SeatId,
    },
    /// Confirms that a reserved seat became free again.
    SeatReleased {
        /// Seat that was released.
        seat: SeatId,
    },
    /// Reports that a reservation toggle was ignored.
    ReservationRejected {
        /// Seat targeted by the toggle.
        seat: SeatId,
        /// Reason the toggle was ignored.
        reason: ReservationError,
    },
    /// Confirms that a block of seats was purchased.
    SeatsPurchased {
        /// Seats that were purchased, in ascending column order.
        seats: Vec<SeatId>,
    },
    /// Reports that an adjacent purchase could not be satisfied.
    PurchaseRejected {
        /// Number of seats requested.
        count: u32,
        /// Reason the purchase failed.
        reason: PurchaseError,
    },
    /// Reports that a show start request was ignored.
    ShowStartRejected {
        /// Reason the start was refused.
        reason: StartError,
    },
    /// Announces that the venue entered a new lifecycle state.
    ShowStateChanged {
        /// State that was left.
        from: ShowState,
        /// State that became active.
        to: ShowState,
    },
    /// Reports that a lifecycle trigger did not apply to the current state.
    ShowTransitionRejected {
        /// State that was active when the trigger arrived.
        state: ShowState,
        /// Trigger that was refused.
        trigger: ShowTrigger,
    },
    /// Confirms that a patron joined the audience.
    PatronAdmitted {
        /// Identifier allocated to the patron.
        patron: PatronId,
        /// Seat the patron will occupy.
        seat: SeatId,
        /// Appearance drawn for the patron.
        appearance: Appearance,
    },
    /// Asks the planner to produce routes for the given phase.
    RoutesRequested {
        /// Phase that needs routes.
        phase: RoutePhase,
    },
    /// Confirms that planned routes were installed.
    RoutesAssigned {
        /// Phase the routes belong to.
        phase: RoutePhase,
        /// Number of patrons that received a route.
        count: u32,
    },
    /// Announces that a patron's start delay elapsed.
    PatronActivated {
        /// Patron that started walking.
        patron: PatronId,
    },
    /// Announces that a patron arrived at a route checkpoint.
    CheckpointReached {
        /// Patron that arrived.
        patron: PatronId,
        /// Index of the checkpoint within the route.
        index: u32,
    },
    /// Announces that a patron sat down.
    PatronSeated {
        /// Patron that sat down.
        patron: PatronId,
        /// Seat now occupied.
        seat: SeatId,
    },
    /// Announces that a patron left through the door.
    PatronExited {
        /// Patron that left.
        patron: PatronId,
        /// Seat the patron vacated.
        seat: SeatId,
    },
    /// Announces a change of ambient lighting.
    LightingChanged {
        /// Lighting now in effect.
        lighting: Lighting,
    },
    /// Announces that every seat returned to the free state.
    SeatsReset,
}

/// Unique identifier assigned to a seat, in row-major order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeatId(u32);

impl SeatId {
    /// Creates a new seat identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a patron during a show.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatronId(u32);

impl PatronId {
    /// Creates a new patron identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a seat expressed as row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeatCoord {
    row: u32,
    column: u32,
}

impl SeatCoord {
    /// Creates a new seat coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the seat.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the seat.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

/// Visual model index drawn for a patron.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Appearance(u8);

impl Appearance {
    /// Creates an appearance, wrapping out-of-range values into the variant range.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value % APPEARANCE_VARIANTS)
    }

    /// Retrieves the zero-based variant index.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

/// Commercial state of a seat.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeatStatus {
    /// Available for reservation or purchase.
    #[default]
    Free,
    /// Held for a patron without payment.
    Reserved,
    /// Paid for; immune to reservation toggles.
    Bought,
}

impl SeatStatus {
    /// Reports whether a patron may be admitted for this seat.
    #[must_use]
    pub const fn is_occupied(self) -> bool {
        matches!(self, Self::Reserved | Self::Bought)
    }
}

/// Venue-wide lifecycle state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShowState {
    /// Idle between shows; seats may be reserved and bought.
    #[default]
    Waiting,
    /// The audience is walking in.
    Entering,
    /// The film is playing.
    Movie,
    /// The audience is walking out.
    Leaving,
}

impl ShowState {
    /// Door opening the venue eases toward while in this state.
    #[must_use]
    pub const fn door_target(self) -> f32 {
        match self {
            Self::Entering | Self::Leaving => 1.0,
            Self::Waiting | Self::Movie => 0.0,
        }
    }

    /// Ambient lighting expected while in this state.
    #[must_use]
    pub const fn lighting(self) -> Lighting {
        match self {
            Self::Movie => Lighting::Off,
            Self::Waiting | Self::Entering | Self::Leaving => Lighting::On,
        }
    }

    /// Resolves the transition taken when `trigger` fires in this state.
    ///
    /// Returns `None` when the trigger has no meaning for the state. Guard
    /// conditions such as "every patron is seated" are checked by the world
    /// before the transition is committed.
    #[must_use]
    pub const fn transition(self, trigger: ShowTrigger) -> Option<ShowTransition> {
        match (self, trigger) {
            (Self::Waiting, ShowTrigger::StartRequested) => Some(ShowTransition {
                next: Self::Entering,
                effects: &[
                    ShowEffect::AdmitAudience,
                    ShowEffect::RequestEntryRoutes,
                    ShowEffect::RaiseLights,
                ],
            }),
            (Self::Entering, ShowTrigger::AudienceSeated) => Some(ShowTransition {
                next: Self::Movie,
                effects: &[ShowEffect::DimLights],
            }),
            (Self::Movie, ShowTrigger::MovieFinished) => Some(ShowTransition {
                next: Self::Leaving,
                effects: &[ShowEffect::RequestExitRoutes, ShowEffect::RaiseLights],
            }),
            (Self::Leaving, ShowTrigger::AudienceExited) => Some(ShowTransition {
                next: Self::Waiting,
                effects: &[
                    ShowEffect::ClearAudience,
                    ShowEffect::ResetSeats,
                    ShowEffect::RaiseLights,
                ],
            }),
            _ => None,
        }
    }
}

/// Conditions that drive the show lifecycle forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShowTrigger {
    /// An operator asked for the show to begin.
    StartRequested,
    /// Every admitted patron is seated.
    AudienceSeated,
    /// The film ran for its full duration.
    MovieFinished,
    /// Every patron has left the venue.
    AudienceExited,
}

/// Side effect requested by a lifecycle transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShowEffect {
    /// Draw attendees from the occupied seats and create patrons for them.
    AdmitAudience,
    /// Ask the planner for entry routes.
    RequestEntryRoutes,
    /// Ask the planner for exit routes.
    RequestExitRoutes,
    /// Switch ambient lighting on.
    RaiseLights,
    /// Switch ambient lighting off.
    DimLights,
    /// Discard the patron collection.
    ClearAudience,
    /// Return every seat to the free state.
    ResetSeats,
}

/// Outcome of a lifecycle transition: the next state plus requested side effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShowTransition {
    /// State entered by the transition.
    pub next: ShowState,
    /// Effects to execute, in order, when the transition is committed.
    pub effects: &'static [ShowEffect],
}

/// Ambient lighting of the auditorium.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lighting {
    /// House lights on.
    On,
    /// House lights off for projection.
    Off,
}

/// Progress of a patron through a show.
///
/// Variants are declared in lifecycle order so that comparisons reflect
/// progress: a patron's state never compares lower than it did earlier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PatronState {
    /// Walking from the door toward the main aisle.
    WalkingToAisle,
    /// Climbing the main aisle toward the seat row.
    WalkingInAisle,
    /// Walking along the row walkway to the seat.
    WalkingToSeat,
    /// Sitting in the assigned seat.
    Seated,
    /// Walking along the row walkway back toward the aisle.
    WalkingFromSeat,
    /// Descending the main aisle.
    WalkingOutAisle,
    /// Crossing the front of the room toward the door.
    Exiting,
    /// Gone through the door.
    Exited,
}

impl PatronState {
    /// Reports whether the state belongs to a moving patron.
    #[must_use]
    pub const fn is_walking(self) -> bool {
        !matches!(self, Self::Seated | Self::Exited)
    }

    /// Route phase the state belongs to.
    #[must_use]
    pub const fn phase(self) -> RoutePhase {
        match self {
            Self::WalkingToAisle | Self::WalkingInAisle | Self::WalkingToSeat | Self::Seated => {
                RoutePhase::Entry
            }
            Self::WalkingFromSeat | Self::WalkingOutAisle | Self::Exiting | Self::Exited => {
                RoutePhase::Exit
            }
        }
    }
}

/// Direction of travel a route was planned for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoutePhase {
    /// From the door to the seat.
    Entry,
    /// From the seat to the door.
    Exit,
}

impl RoutePhase {
    /// State a patron settles into after reaching the final checkpoint.
    #[must_use]
    pub const fn arrival_state(self) -> PatronState {
        match self {
            Self::Entry => PatronState::Seated,
            Self::Exit => PatronState::Exited,
        }
    }
}

/// Single point along a route, labelled with the state held while heading to it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Checkpoint {
    /// Location of the checkpoint.
    pub point: Vec3,
    /// State a patron reports while walking toward the checkpoint.
    pub heading: PatronState,
}

impl Checkpoint {
    /// Creates a new checkpoint.
    #[must_use]
    pub const fn new(point: Vec3, heading: PatronState) -> Self {
        Self { point, heading }
    }
}

/// Ordered, finite sequence of checkpoints consumed by index.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    phase: RoutePhase,
    checkpoints: Vec<Checkpoint>,
}

impl Route {
    /// Creates a route from checkpoints listed in visiting order.
    #[must_use]
    pub fn new(phase: RoutePhase, checkpoints: Vec<Checkpoint>) -> Self {
        Self { phase, checkpoints }
    }

    /// Creates a route with no checkpoints.
    #[must_use]
    pub fn empty(phase: RoutePhase) -> Self {
        Self::new(phase, Vec::new())
    }

    /// Phase the route was planned for.
    #[must_use]
    pub const fn phase(&self) -> RoutePhase {
        self.phase
    }

    /// Checkpoints in visiting order.
    #[must_use]
    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    /// Checkpoint stored at `index`, if any.
    #[must_use]
    pub fn get(&self, index: u32) -> Option<&Checkpoint> {
        usize::try_from(index)
            .ok()
            .and_then(|index| self.checkpoints.get(index))
    }

    /// Number of checkpoints in the route.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    /// Reports whether the route has no checkpoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// Reports whether `index` addresses the last checkpoint.
    #[must_use]
    pub fn is_final(&self, index: u32) -> bool {
        usize::try_from(index).map_or(false, |index| index + 1 == self.checkpoints.len())
    }
}

/// Planned route handed to a single patron.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteAssignment {
    /// Patron receiving the route.
    pub patron: PatronId,
    /// Route to follow.
    pub route: Route,
    /// Time after the start of the phase before the patron starts walking.
    pub start_delay: Duration,
}

/// Kinematic state computed for one patron during a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PatronStep {
    /// Patron the step applies to.
    pub patron: PatronId,
    /// Position after the tick.
    pub position: Vec3,
    /// Heading about the vertical axis, in radians.
    pub facing: f32,
    /// Animation phase of the walk cycle.
    pub walk_cycle: f32,
    /// Whether the patron has started walking.
    pub active: bool,
    /// Index of the checkpoint the patron is heading to.
    pub waypoint_index: u32,
    /// State after the tick.
    pub state: PatronState,
}

/// Timing parameters of the show and the fixed-step clock.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowTiming {
    /// Length of one simulation tick, in seconds.
    pub tick_seconds: f32,
    /// Running time of the film, in seconds.
    pub movie_seconds: f32,
    /// Fraction of the door opened or closed per second.
    pub door_speed: f32,
    /// Seconds each screen frame stays visible.
    pub frame_period_seconds: f32,
    /// Number of frames the screen cycles through.
    pub frame_count: u32,
}

impl Default for ShowTiming {
    fn default() -> Self {
        Self {
            tick_seconds: 1.0 / 75.0,
            movie_seconds: 20.0,
            door_speed: 1.5,
            frame_period_seconds: 0.5,
            frame_count: 25,
        }
    }
}

impl ShowTiming {
    /// Longest span, in seconds, that a timing value may describe.
    pub const MAX_SECONDS: f32 = 86_400.0;
    /// Shortest tick or screen frame period, in seconds.
    pub const MIN_PERIOD_SECONDS: f32 = 1.0e-3;
    /// Fastest door speed, in fractions of the doorway per second.
    pub const MAX_DOOR_SPEED: f32 = 1_000.0;

    /// Checks that every value is finite and inside its supported range.
    pub fn validate(&self) -> Result<(), TimingError> {
        check_range(
            "tick_seconds",
            self.tick_seconds,
            Self::MIN_PERIOD_SECONDS,
            1.0,
        )?;
        check_range("movie_seconds", self.movie_seconds, 0.0, Self::MAX_SECONDS)?;
        check_range("door_speed", self.door_speed, 0.0, Self::MAX_DOOR_SPEED)?;
        check_range(
            "frame_period_seconds",
            self.frame_period_seconds,
            Self::MIN_PERIOD_SECONDS,
            Self::MAX_SECONDS,
        )?;
        if self.frame_count == 0 {
            return Err(TimingError::NoFrames);
        }
        Ok(())
    }

    /// Length of one simulation tick.
    #[must_use]
    pub fn tick(&self) -> Duration {
        saturating_seconds(self.tick_seconds)
    }

    /// Running time of the film.
    #[must_use]
    pub fn movie_duration(&self) -> Duration {
        saturating_seconds(self.movie_seconds)
    }

    /// Time each screen frame stays visible.
    #[must_use]
    pub fn frame_period(&self) -> Duration {
        saturating_seconds(self.frame_period_seconds)
    }
}

fn check_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), TimingError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(TimingError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

/// Converts seconds to a [`Duration`], mapping negative or NaN input to zero
/// and saturating values too large to represent.
#[must_use]
pub fn saturating_seconds(seconds: f32) -> Duration {
    Duration::try_from_secs_f32(seconds.max(0.0)).unwrap_or(Duration::MAX)
}

/// Reasons a [`ShowTiming`] cannot drive the show clock.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum TimingError {
    /// A value is not finite or lies outside its supported range.
    #[error("{field} = {value} lies outside {min}..={max}")]
    OutOfRange {
        /// Name of the offending setting.
        field: &'static str,
        /// Value that was supplied.
        value: f32,
        /// Smallest accepted value.
        min: f32,
        /// Largest accepted value.
        max: f32,
    },
    /// The screen needs at least one frame to cycle through.
    #[error("frame_count must be at least 1")]
    NoFrames,
}

/// Reasons a reservation toggle may be ignored by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReservationError {
    /// Reservations are only accepted while the venue is waiting.
    InvalidState,
    /// Bought seats cannot be reserved or released.
    SeatBought,
    /// No seat with the provided identifier exists.
    UnknownSeat,
}

/// Reasons an adjacent purchase may fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PurchaseError {
    /// Purchases are only accepted while the venue is waiting.
    InvalidState,
    /// No row holds a suitable block of free seats.
    NoContiguousBlock,
    /// The requested count is zero or wider than a row.
    InvalidCount,
}

/// Reasons a show start may be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StartError {
    /// A show is already in progress.
    NotWaiting,
    /// No seat is reserved or bought.
    NoOccupiedSeats,
}

/// Immutable representation of a single seat used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeatSnapshot {
    /// Identifier of the seat.
    pub id: SeatId,
    /// Row and column of the seat.
    pub coord: SeatCoord,
    /// Centre of the seat cushion.
    pub position: Vec3,
    /// Commercial status of the seat.
    pub status: SeatStatus,
    /// Whether an admitted patron currently holds the seat.
    pub has_occupant: bool,
}

/// Read-only snapshot describing every seat in the venue.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SeatView {
    snapshots: Vec<SeatSnapshot>,
}

impl SeatView {
    /// Creates a new seat view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<SeatSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured seat snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &SeatSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the seat with the provided identifier.
    #[must_use]
    pub fn get(&self, seat: SeatId) -> Option<&SeatSnapshot> {
        self.snapshots
            .binary_search_by_key(&seat, |snapshot| snapshot.id)
            .ok()
            .and_then(|index| self.snapshots.get(index))
    }

}

/// Immutable representation of a single patron used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct PatronSnapshot {
    /// Identifier of the patron.
    pub id: PatronId,
    /// Seat assigned to the patron for the whole show.
    pub seat: SeatId,
    /// Current position.
    pub position: Vec3,
    /// Heading about the vertical axis, in radians.
    pub facing: f32,
    /// Animation phase of the walk cycle.
    pub walk_cycle: f32,
    /// Visual model drawn for the patron.
    pub appearance: Appearance,
    /// Progress through the show.
    pub state: PatronState,
    /// Whether the patron has started walking in the current phase.
    pub active: bool,
    /// Index of the checkpoint the patron is heading to.
    pub waypoint_index: u32,
    /// Route currently followed.
    pub route: Route,
    /// Delay after the start of the phase before walking.
    pub start_delay: Duration,
}

impl PatronSnapshot {
    /// Reports whether the patron participates in crowd separation.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.active && self.state.is_walking()
    }

    /// Reports whether the renderer should draw the patron.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.state != PatronState::Exited && (self.active || self.state == PatronState::Seated)
    }
}

/// Read-only snapshot describing the whole audience.
#[derive(Clone, Debug, Default)]
pub struct PatronView {
    snapshots: Vec<PatronSnapshot>,
}

impl PatronView {
    /// Creates a new patron view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<PatronSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured patron snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &PatronSnapshot> {
        self.snapshots.iter()
    }

    /// Number of patrons captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no patrons.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<PatronSnapshot> {
        self.snapshots
    }
}

/// Read-only snapshot of the show clock and venue fixtures.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShowClockView {
    /// Lifecycle state currently active.
    pub state: ShowState,
    /// Simulated time spent in the current state.
    pub elapsed_in_state: Duration,
    /// Door opening in `[0, 1]`.
    pub door_open: f32,
    /// Ambient lighting in effect.
    pub lighting: Lighting,
    /// Screen frame currently projected.
    pub screen_frame: u32,
}

/// Aggregate audience progress produced after each crowd step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CrowdReport {
    /// Patrons sitting in their seat.
    pub seated: u32,
    /// Patrons walking along a route.
    pub walking: u32,
    /// Patrons whose start delay has not yet elapsed.
    pub waiting: u32,
    /// Patrons that have left the venue.
    pub exited: u32,
}

impl CrowdReport {
    /// Total number of patrons covered by the report.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.seated + self.walking + self.waiting + self.exited
    }

    /// Reports whether a non-empty audience is entirely seated.
    #[must_use]
    pub const fn all_seated(&self) -> bool {
        self.total() > 0 && self.seated == self.total()
    }

    /// Reports whether a non-empty audience has entirely left.
    #[must_use]
    pub const fn all_exited(&self) -> bool {
        self.total() > 0 && self.exited == self.total()
    }
}
