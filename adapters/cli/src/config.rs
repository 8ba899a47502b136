//! Optional TOML settings file for the command-line driver.

use std::{fs, path::Path};

use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use showhouse_core::{ShowTiming, VenueLayout};
use showhouse_system_crowd::CrowdTuning;
use showhouse_system_planner::PlannerTuning;

/// Largest value accepted for any crowd or planner setting.
const MAX_TUNING: f32 = 10_000.0;

/// Settings read from disk; every table and key is optional.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    pub(crate) venue: VenueLayout,
    pub(crate) timing: ShowTiming,
    pub(crate) crowd: CrowdTuning,
    pub(crate) planner: PlannerTuning,
}

impl FileConfig {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub(crate) fn parse(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("failed to parse TOML")?;
        config
            .venue
            .validate()
            .context("venue layout is not usable")?;
        config
            .timing
            .validate()
            .context("show timing is not usable")?;
        config.check_tuning()?;
        Ok(config)
    }

    fn check_tuning(&self) -> Result<()> {
        let crowd = &self.crowd;
        check_table(
            "crowd",
            &[
                ("entering_speed", crowd.entering_speed),
                ("leaving_speed", crowd.leaving_speed),
                ("waypoint_tolerance", crowd.waypoint_tolerance),
                ("final_tolerance", crowd.final_tolerance),
                ("separation_radius", crowd.separation_radius),
                ("separation_gain", crowd.separation_gain),
                ("separation_floor", crowd.separation_floor),
                ("walk_cycle_rate", crowd.walk_cycle_rate),
            ],
        )?;

        let planner = &self.planner;
        check_table(
            "planner",
            &[
                ("entry_stagger", planner.entry_stagger),
                ("entry_jitter", planner.entry_jitter),
                ("exit_row_delay", planner.exit_row_delay),
                ("exit_stagger", planner.exit_stagger),
                ("exit_jitter", planner.exit_jitter),
            ],
        )
    }
}

fn check_table(table: &str, values: &[(&str, f32)]) -> Result<()> {
    for &(key, value) in values {
        ensure!(
            value.is_finite() && (0.0..=MAX_TUNING).contains(&value),
            "[{table}] {key} = {value} must lie within 0..={MAX_TUNING}"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = FileConfig::parse("").expect("empty config parses");
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn tables_override_individual_keys() {
        let config = FileConfig::parse(
            r#"
            [venue]
            rows = 3
            columns = 8
            aisle_column = 4

            [timing]
            movie_seconds = 5.0

            [crowd]
            leaving_speed = 6.0
            "#,
        )
        .expect("config parses");

        assert_eq!(config.venue.rows, 3);
        assert_eq!(config.venue.columns, 8);
        assert!((config.venue.seat_spacing_x - 1.3).abs() < f32::EPSILON);
        assert!((config.timing.movie_seconds - 5.0).abs() < f32::EPSILON);
        assert!((config.crowd.leaving_speed - 6.0).abs() < f32::EPSILON);
        assert!((config.crowd.entering_speed - 2.5).abs() < f32::EPSILON);
    }

    #[test]
    fn invalid_layouts_are_reported() {
        let error = FileConfig::parse("[venue]\naisle_column = 0\n").expect_err("aisle at zero");
        assert!(format!("{error:#}").contains("aisle column"));
    }

    #[test]
    fn unknown_tables_are_rejected() {
        assert!(FileConfig::parse("[lobby]\nsize = 3\n").is_err());
    }

    #[test]
    fn out_of_range_timing_is_rejected() {
        let error = FileConfig::parse("[timing]\nmovie_seconds = 1e20\n").expect_err("huge movie");
        let message = format!("{error:#}");
        assert!(message.contains("show timing"), "{message}");
        assert!(message.contains("movie_seconds"), "{message}");

        assert!(FileConfig::parse("[timing]\ntick_seconds = 0.0\n").is_err());
        assert!(FileConfig::parse("[timing]\nframe_count = 0\n").is_err());
    }

    #[test]
    fn out_of_range_tuning_is_rejected() {
        let error = FileConfig::parse("[planner]\nentry_stagger = 3e38\n")
            .expect_err("huge stagger");
        assert!(format!("{error:#}").contains("entry_stagger"));

        assert!(FileConfig::parse("[crowd]\nleaving_speed = -1.0\n").is_err());
        assert!(FileConfig::parse("[crowd]\nseparation_gain = inf\n").is_err());
    }
}
