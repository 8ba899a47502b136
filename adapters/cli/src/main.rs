#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Showhouse screening without a window.

mod config;
mod headless;

use std::{path::PathBuf, str::FromStr, time::Duration};

use anyhow::{bail, Context, Result};
use clap::Parser;
use glam::Vec3;
use showhouse_core::{CrowdReport, Event, SeatCoord, ShowState, VenueLayout};
use showhouse_rendering::{FrameInput, PointerInput, Presentation, RenderingBackend};
use showhouse_simulation::{Simulation, SimulationConfig};
use showhouse_world::WorldConfig;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::{config::FileConfig, headless::HeadlessBackend};

const POINTER_HEIGHT: f32 = 20.0;
/// Frames between two crowd status lines.
const REPORT_INTERVAL_FRAMES: u64 = 60;

/// Command-line arguments for a headless screening.
#[derive(Debug, Parser)]
#[command(name = "showhouse", about = "Runs one screening of the Showhouse venue")]
struct CliArgs {
    /// TOML file with `venue`, `timing`, `crowd` and `planner` tables.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Seed for audience admission.
    #[arg(long)]
    seed: Option<u64>,
    /// Seed for route stagger jitter.
    #[arg(long)]
    planner_seed: Option<u64>,
    /// Toggle the reservation of a seat, given as `row,column`.
    #[arg(long, value_name = "ROW,COLUMN", value_parser = parse_pair::<u32>)]
    reserve: Vec<(u32, u32)>,
    /// Click straight down onto the floor plan at `x,z`.
    #[arg(
        long,
        value_name = "X,Z",
        value_parser = parse_pair::<f32>,
        allow_hyphen_values = true
    )]
    pick_above: Vec<(f32, f32)>,
    /// Buy a block of adjacent free seats of the given size.
    #[arg(long, value_name = "COUNT")]
    buy: Vec<u32>,
    /// Stop after this much simulated wall-clock time.
    #[arg(long, default_value_t = 120.0)]
    max_seconds: f32,
    /// Length of one presented frame in milliseconds.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
}

/// Entry point for the Showhouse command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();

    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let config = simulation_config(&args, &file);
    let script = frame_script(&args, &file.venue)?;

    let frame = Duration::from_millis(args.frame_ms.max(1));
    let max_frames = frame_budget(args.max_seconds, frame)?;
    info!(
        rows = file.venue.rows,
        columns = file.venue.columns,
        max_frames,
        "starting screening"
    );

    let mut simulation = Simulation::new(config);
    let presentation = Presentation::new("Showhouse", simulation.scene());
    let backend = HeadlessBackend::new(frame, max_frames, script);

    let mut frame_index = 0_u64;
    backend.run(presentation, move |dt, input, scene| {
        if let Some(pointer) = input.click {
            match simulation.pick_seat(pointer) {
                Some(seat) => debug!(seat = seat.get(), "pointer over seat"),
                None => warn!(origin = ?pointer.origin, "pointer missed every seat"),
            }
        }

        simulation.update(dt, input, scene);
        for event in simulation.drain_events() {
            log_event(&event);
        }

        if reports_on(frame_index, scene.show_state) {
            log_report(&simulation.crowd_report());
        }
        frame_index += 1;
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn simulation_config(args: &CliArgs, file: &FileConfig) -> SimulationConfig {
    let defaults = SimulationConfig::default();
    let world_defaults = WorldConfig::default();
    SimulationConfig {
        world: WorldConfig {
            layout: file.venue,
            timing: file.timing,
            seed: args.seed.unwrap_or(world_defaults.seed),
        },
        crowd: file.crowd,
        planner: file.planner,
        planner_seed: args.planner_seed.unwrap_or(defaults.planner_seed),
    }
}

/// Turns the requested actions into one input frame each, ending with the show start.
fn frame_script(args: &CliArgs, layout: &VenueLayout) -> Result<Vec<FrameInput>> {
    let mut script = Vec::new();

    for &(row, column) in &args.reserve {
        let coord = SeatCoord::new(row, column);
        if layout.seat_id(coord).is_none() {
            bail!(
                "seat {row},{column} lies outside the {}x{} venue",
                layout.rows,
                layout.columns
            );
        }
        let target = layout.seat_position(coord);
        script.push(click_above(target.x, target.z));
    }
    script.extend(args.pick_above.iter().map(|&(x, z)| click_above(x, z)));
    script.extend(args.buy.iter().map(|&count| FrameInput {
        buy_adjacent: Some(count),
        ..FrameInput::default()
    }));
    script.push(FrameInput {
        start_show: true,
        ..FrameInput::default()
    });

    Ok(script)
}

fn click_above(x: f32, z: f32) -> FrameInput {
    FrameInput {
        click: Some(PointerInput {
            origin: Vec3::new(x, POINTER_HEIGHT, z),
            direction: Vec3::NEG_Y,
        }),
        ..FrameInput::default()
    }
}

fn frame_budget(max_seconds: f32, frame: Duration) -> Result<u64> {
    if !max_seconds.is_finite() || max_seconds <= 0.0 {
        bail!("--max-seconds must be a positive number, got {max_seconds}");
    }
    let frames = (f64::from(max_seconds) / frame.as_secs_f64()).ceil();
    Ok(frames as u64)
}

fn reports_on(frame_index: u64, state: ShowState) -> bool {
    state != ShowState::Waiting && frame_index % REPORT_INTERVAL_FRAMES == 0
}

fn log_report(report: &CrowdReport) {
    info!(
        seated = report.seated,
        walking = report.walking,
        waiting = report.waiting,
        exited = report.exited,
        "crowd status"
    );
}

fn log_event(event: &Event) {
    match event {
        Event::TimeAdvanced { .. } => {}
        Event::ShowStateChanged { from, to } => info!(?from, ?to, "show state changed"),
        Event::SeatReserved { seat } => info!(seat = seat.get(), "seat reserved"),
        Event::SeatReleased { seat } => info!(seat = seat.get(), "seat released"),
        Event::SeatsPurchased { seats } => {
            let ids: Vec<u32> = seats.iter().map(|seat| seat.get()).collect();
            info!(?ids, "seats purchased");
        }
        Event::PatronAdmitted {
            patron,
            seat,
            appearance,
        } => info!(
            patron = patron.get(),
            seat = seat.get(),
            appearance = appearance.get(),
            "patron admitted"
        ),
        Event::PatronSeated { patron, seat } => {
            debug!(patron = patron.get(), seat = seat.get(), "patron seated");
        }
        Event::PatronExited { patron, seat } => {
            debug!(patron = patron.get(), seat = seat.get(), "patron exited");
        }
        Event::LightingChanged { lighting } => info!(?lighting, "lighting changed"),
        Event::SeatsReset => info!("seats reset"),
        Event::VenueRejected { reason } => warn!(%reason, "venue rejected"),
        Event::ReservationRejected { seat, reason } => {
            warn!(seat = seat.get(), ?reason, "reservation rejected");
        }
        Event::PurchaseRejected { count, reason } => {
            warn!(count, ?reason, "purchase rejected");
        }
        Event::ShowStartRejected { reason } => warn!(?reason, "show start rejected"),
        Event::ShowTransitionRejected { state, trigger } => {
            debug!(?state, ?trigger, "show transition rejected");
        }
        other => debug!(event = ?other, "simulation event"),
    }
}

fn parse_pair<T>(raw: &str) -> Result<(T, T)>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let (first, second) = raw
        .split_once(',')
        .with_context(|| format!("expected two comma-separated values, got `{raw}`"))?;
    let first = first.trim().parse().context("invalid first value")?;
    let second = second.trim().parse().context("invalid second value")?;
    Ok((first, second))
}
