/*
settings.rs

Copyright 2025 Hervé Quatremain

This file is part of Marble Run.

Marble Run is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Marble Run is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Marble Run. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Marble run settings.
//!
//! The settings are the grid dimensions and the physical parameters of the track.
//! Lengths are in millimeters.
//! The [`crate::saver::settings`] module saves and restores the [`MarbleRunSettings`] object so
//! that the last values are proposed again.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::ops::RangeInclusive;

/// Number of cells allowed in each direction.
pub const GRID_RANGE: RangeInclusive<usize> = 2..=15;

/// Type of errors.
#[derive(Debug, PartialEq)]
pub enum SettingsError {
    /// Width or depth outside [`GRID_RANGE`].
    GridSize(usize),

    /// The marble diameter must be greater than 0.
    Diameter,

    /// The clearance cannot be negative.
    Clearance,

    /// The slope must be greater than 0.
    Slope,
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SettingsError::GridSize(n) => write!(
                f,
                "The number of cells must be between {} and {}, not {n}",
                GRID_RANGE.start(),
                GRID_RANGE.end()
            ),
            SettingsError::Diameter => write!(f, "The marble diameter must be greater than 0"),
            SettingsError::Clearance => write!(f, "The clearance cannot be negative"),
            SettingsError::Slope => write!(f, "The slope must be greater than 0"),
        }
    }
}

impl Error for SettingsError {}

/// Marble run parameters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct MarbleRunSettings {
    /// Number of cells in the X direction.
    pub width: usize,

    /// Number of cells in the Y direction.
    pub depth: usize,

    /// Marble diameter.
    pub ball_diameter: f64,

    /// Clearance between the marble and the track, on each side.
    pub clearance: f64,

    /// Height drop per length unit along the track.
    pub slope: f64,
}

impl Default for MarbleRunSettings {
    fn default() -> Self {
        Self {
            width: 5,
            depth: 5,
            ball_diameter: 13.0,
            clearance: 0.15,
            slope: 0.09,
        }
    }
}

impl MarbleRunSettings {
    /// Verify the settings.
    ///
    /// # Errors
    ///
    /// Return the first invalid parameter.
    pub fn validate(&self) -> Result<(), SettingsError> {
        for n in [self.width, self.depth] {
            if !GRID_RANGE.contains(&n) {
                return Err(SettingsError::GridSize(n));
            }
        }
        if self.ball_diameter.is_nan() || self.ball_diameter <= 0.0 {
            return Err(SettingsError::Diameter);
        }
        if self.clearance.is_nan() || self.clearance < 0.0 {
            return Err(SettingsError::Clearance);
        }
        if self.slope.is_nan() || self.slope <= 0.0 {
            return Err(SettingsError::Slope);
        }
        Ok(())
    }

    /// Width of the channel, which is also the side of a cell.
    pub fn cell_size(&self) -> f64 {
        self.ball_diameter + 2.0 * self.clearance
    }

    /// How much the track goes down from one cell to the next.
    pub fn drop_per_cell(&self) -> f64 {
        self.cell_size() * self.slope
    }

    /// Slope angle in degrees.
    pub fn slope_angle_degrees(&self) -> f64 {
        self.slope.atan2(1.0).to_degrees().abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings: MarbleRunSettings = MarbleRunSettings::default();
        assert_eq!(settings.validate(), Ok(()));
        assert!((settings.cell_size() - 13.3).abs() < 1e-9);
        assert!((settings.drop_per_cell() - 1.197).abs() < 1e-9);
        assert!((settings.slope_angle_degrees() - 5.14).abs() < 0.01);
    }

    #[test]
    fn invalid_values() {
        let mut settings: MarbleRunSettings = MarbleRunSettings {
            width: 16,
            ..Default::default()
        };
        assert_eq!(settings.validate(), Err(SettingsError::GridSize(16)));

        settings.width = 5;
        settings.depth = 1;
        assert_eq!(settings.validate(), Err(SettingsError::GridSize(1)));

        settings.depth = 5;
        settings.slope = 0.0;
        assert_eq!(settings.validate(), Err(SettingsError::Slope));

        settings.slope = 0.1;
        settings.clearance = -0.1;
        assert_eq!(settings.validate(), Err(SettingsError::Clearance));

        settings.clearance = 0.0;
        settings.ball_diameter = f64::NAN;
        assert_eq!(settings.validate(), Err(SettingsError::Diameter));
    }

    #[test]
    fn missing_fields_use_defaults() {
        let settings: MarbleRunSettings =
            serde_json::from_str(r#"{"width": 7, "ball_diameter": 16.0}"#).unwrap();
        assert_eq!(settings.width, 7);
        assert_eq!(settings.depth, 5);
        assert_eq!(settings.ball_diameter, 16.0);
        assert_eq!(settings.slope, 0.09);
    }
}
