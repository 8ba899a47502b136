//! Venue geometry shared by the world, planner, crowd and picking systems.
//!
//! The auditorium is a tiered block of seats facing a screen at the negative
//! depth end of the room. Row `0` sits furthest from the screen on the highest
//! tier; row `rows - 1` is the screen-side row closest to the entry door. A
//! single walkway splits the columns at [`VenueLayout::aisle_column`].

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{SeatCoord, SeatId};

/// Height of a seat cushion above the tier it stands on.
const SEAT_LIFT: f32 = 0.3;
/// Height at which patrons walk above a tier.
const WALK_LIFT: f32 = 0.2;
/// Height at which patrons walk on the flat floor in front of the tiers.
const FLOOR_LIFT: f32 = 0.1;
/// Fraction of the row spacing between a seat and the walkway in front of it.
const WALKWAY_OFFSET: f32 = 0.35;
/// Distance between the screen-side row and the cross aisle in front of it.
const FRONT_AISLE_GAP: f32 = 1.0;

/// Geometric description of the auditorium.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VenueLayout {
    /// Number of seat rows.
    pub rows: u32,
    /// Number of seats in every row.
    pub columns: u32,
    /// First column located after the walkway.
    pub aisle_column: u32,
    /// Edge length of a seat footprint.
    pub seat_size: f32,
    /// Horizontal distance between neighbouring seat centres.
    pub seat_spacing_x: f32,
    /// Depth distance between neighbouring rows.
    pub seat_spacing_z: f32,
    /// Elevation gained by each tier further from the screen.
    pub row_height_step: f32,
    /// Elevation of the screen-side tier.
    pub step_base: f32,
    /// Width of the walkway separating the two seat blocks.
    pub aisle_width: f32,
    /// Distance between the rear wall and the rear-most row.
    pub rear_offset: f32,
    /// Room extent along the x axis.
    pub room_width: f32,
    /// Room extent along the z axis.
    pub room_depth: f32,
    /// Room extent along the y axis.
    pub room_height: f32,
}

impl Default for VenueLayout {
    fn default() -> Self {
        Self {
            rows: 5,
            columns: 10,
            aisle_column: 5,
            seat_size: 0.7,
            seat_spacing_x: 1.3,
            seat_spacing_z: 1.6,
            row_height_step: 0.5,
            step_base: 0.2,
            aisle_width: 1.5,
            rear_offset: 5.0,
            room_width: 24.0,
            room_depth: 18.0,
            room_height: 12.0,
        }
    }
}

/// Reasons a venue configuration may be rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VenueError {
    /// The layout declares no rows.
    #[error("venue must contain at least one row")]
    NoRows,
    /// The layout declares no columns.
    #[error("venue must contain at least one column")]
    NoColumns,
    /// The aisle does not split the columns into two non-empty blocks.
    #[error("aisle column {aisle_column} must lie within 1..{columns}")]
    AisleOutOfRange {
        /// Aisle column requested by the layout.
        aisle_column: u32,
        /// Number of columns in the layout.
        columns: u32,
    },
    /// A spacing or size parameter is zero, negative or not finite.
    #[error("seat sizes and spacings must be positive and finite")]
    NonPositiveDimension,
    /// The venue cannot be reconfigured while a show is running.
    #[error("venue cannot be reconfigured while a show is in progress")]
    ShowInProgress,
}

impl VenueLayout {
    /// Checks that the layout describes a usable auditorium.
    pub fn validate(&self) -> Result<(), VenueError> {
        if self.rows == 0 {
            return Err(VenueError::NoRows);
        }
        if self.columns == 0 {
            return Err(VenueError::NoColumns);
        }
        if self.aisle_column == 0 || self.aisle_column >= self.columns {
            return Err(VenueError::AisleOutOfRange {
                aisle_column: self.aisle_column,
                columns: self.columns,
            });
        }

        let dimensions = [
            self.seat_size,
            self.seat_spacing_x,
            self.seat_spacing_z,
            self.aisle_width,
            self.room_width,
            self.room_depth,
            self.room_height,
        ];
        if dimensions
            .iter()
            .any(|value| !value.is_finite() || *value <= 0.0)
        {
            return Err(VenueError::NonPositiveDimension);
        }
        if !self.row_height_step.is_finite() || !self.step_base.is_finite() {
            return Err(VenueError::NonPositiveDimension);
        }

        Ok(())
    }

    /// Total number of seats in the venue.
    #[must_use]
    pub const fn seat_count(&self) -> u32 {
        self.rows.saturating_mul(self.columns)
    }

    /// Row-major identifier of the seat at the provided coordinate.
    #[must_use]
    pub fn seat_id(&self, coord: SeatCoord) -> Option<SeatId> {
        if coord.row() < self.rows && coord.column() < self.columns {
            Some(SeatId::new(coord.row() * self.columns + coord.column()))
        } else {
            None
        }
    }

    /// Coordinate of the seat with the provided identifier.
    #[must_use]
    pub fn seat_coord(&self, seat: SeatId) -> Option<SeatCoord> {
        if self.columns == 0 || seat.get() >= self.seat_count() {
            return None;
        }
        Some(SeatCoord::new(
            seat.get() / self.columns,
            seat.get() % self.columns,
        ))
    }

    /// Horizontal centre of a seat column, shifted past the walkway.
    #[must_use]
    pub fn seat_x(&self, column: u32) -> f32 {
        let total_width =
            self.columns.saturating_sub(1) as f32 * self.seat_spacing_x + self.aisle_width;
        let start = -total_width / 2.0;
        let x = start + column as f32 * self.seat_spacing_x;
        if column >= self.aisle_column {
            x + self.aisle_width
        } else {
            x
        }
    }

    /// Depth of the seat centres in a row.
    #[must_use]
    pub fn row_depth(&self, row: u32) -> f32 {
        self.room_depth / 2.0 - self.rear_offset - row as f32 * self.seat_spacing_z
    }

    /// Elevation of the tier carrying a row.
    #[must_use]
    pub fn row_elevation(&self, row: u32) -> f32 {
        let tiers_above_front = self.rows.saturating_sub(1).saturating_sub(row);
        self.step_base + tiers_above_front as f32 * self.row_height_step
    }

    /// Elevation at which patrons walk along a row's tier.
    #[must_use]
    pub fn walking_height(&self, row: u32) -> f32 {
        self.row_elevation(row) + WALK_LIFT
    }

    /// Depth of the walkway running in front of a row.
    #[must_use]
    pub fn walkway_depth(&self, row: u32) -> f32 {
        self.row_depth(row) - self.seat_spacing_z * WALKWAY_OFFSET
    }

    /// Centre of the seat cushion at the provided coordinate.
    #[must_use]
    pub fn seat_position(&self, coord: SeatCoord) -> Vec3 {
        Vec3::new(
            self.seat_x(coord.column()),
            SEAT_LIFT + self.row_elevation(coord.row()),
            self.row_depth(coord.row()),
        )
    }

    /// Horizontal centre of the walkway between the two seat blocks.
    #[must_use]
    pub fn aisle_x(&self) -> f32 {
        let before = self.seat_x(self.aisle_column.saturating_sub(1));
        let after = self.seat_x(self.aisle_column);
        (before + after) / 2.0
    }

    /// Walkway point level with the provided row.
    #[must_use]
    pub fn aisle_point(&self, row: u32) -> Vec3 {
        Vec3::new(self.aisle_x(), self.walking_height(row), self.row_depth(row))
    }

    /// Index of the row closest to the screen and the entry door.
    #[must_use]
    pub const fn front_row(&self) -> u32 {
        self.rows.saturating_sub(1)
    }

    /// Floor-level walkway point just in front of the screen-side row.
    #[must_use]
    pub fn front_aisle_point(&self) -> Vec3 {
        Vec3::new(
            self.aisle_x(),
            FLOOR_LIFT,
            self.row_depth(self.front_row()) - FRONT_AISLE_GAP,
        )
    }

    /// Position of the entry door on the floor.
    #[must_use]
    pub fn door_position(&self) -> Vec3 {
        Vec3::new(
            -self.room_width / 2.0 + 1.5,
            0.0,
            -self.room_depth / 2.0 + 0.5,
        )
    }

    /// Point just inside the entry door where patrons appear and vanish.
    #[must_use]
    pub fn entry_point(&self) -> Vec3 {
        self.door_position() + Vec3::new(0.0, FLOOR_LIFT, 0.5)
    }

    /// Walking elevation for a patron standing at the provided depth.
    ///
    /// The first row whose band starts in front of `z` wins, so patrons climb
    /// the tiers in discrete steps. Anything in front of every band walks on
    /// the screen-side tier height.
    #[must_use]
    pub fn walking_elevation(&self, z: f32) -> f32 {
        let half_spacing = self.seat_spacing_z / 2.0;
        (0..self.rows)
            .find(|row| z > self.row_depth(*row) - half_spacing)
            .map_or(self.step_base + WALK_LIFT, |row| self.walking_height(row))
    }

    /// Axis-aligned volume of a seat: its footprint extruded upward by the seat size.
    #[must_use]
    pub fn seat_bounds(&self, coord: SeatCoord) -> (Vec3, Vec3) {
        let position = self.seat_position(coord);
        let half = self.seat_size / 2.0;
        (
            position - Vec3::new(half, 0.0, half),
            position + Vec3::new(half, self.seat_size, half),
        )
    }

    /// Reports whether a block of `count` seats starting at `start_column`
    /// contains both the column before the walkway and the one after it.
    #[must_use]
    pub fn crosses_aisle(&self, start_column: u32, count: u32) -> bool {
        let Some(last_before_aisle) = self.aisle_column.checked_sub(1) else {
            return false;
        };
        (0..count.saturating_sub(1)).any(|offset| start_column + offset == last_before_aisle)
    }
}
