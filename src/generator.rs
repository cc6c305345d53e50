/*
generator.rs

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

//! Generate random marble run layouts.
//!
//! A layout is composed of two matrices with the same dimensions:
//!
//! * The visit order, represented by a [`grid::Grid`] object.
//!   Each cell stores the position of the cell along the track, starting at 1.
//!   You create this object by creating a [`random_path::RandomPath`] object and by using its
//!   [`random_path::RandomPath::generate`] method, or by calling [`generate_path`].
//!   The track starts at column 2 of the bottom row and ends in the bottom left corner.
//!   The four cells of the bottom left corner are reserved for the exit chute and are set before
//!   the search starts.
//!
//! * The track types, represented by a [`track_types::TrackGrid`] object.
//!   Each cell stores the [`track_types::TrackType`] piece to place in that cell, which depends on
//!   the direction the marble enters and leaves the cell.
//!   You create this object from the visit order by calling [`derive_types`].
//!
//! The [`layout::Layout`] object gathers the two matrices for printing and serialization.

pub mod grid;
pub mod layout;
pub mod random_path;
pub mod track_types;

use std::error::Error;
use std::fmt;

/// Type of errors.
#[derive(Debug, PartialEq)]
pub enum GeneratorError {
    /// The grid dimensions do not allow a complete track.
    InvalidDimensions { width: usize, height: usize },

    /// The visit order is not a continuous path at the given cell.
    MalformedPath { col: usize, row: usize },
}

impl fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GeneratorError::InvalidDimensions { width, height } => write!(
                f,
                "Invalid grid dimensions {width}x{height}: the width and the depth must be at \
                 least 3 and their product must be odd"
            ),
            GeneratorError::MalformedPath { col, row } => {
                write!(f, "The track is broken at cell ({col}, {row})")
            }
        }
    }
}

impl Error for GeneratorError {}

/// Generate a random visit order for a grid of the given dimensions.
///
/// Provide a `seed` to get a reproducible layout.
///
/// # Errors
///
/// The function returns [`GeneratorError::InvalidDimensions`] if no complete track exists for
/// these dimensions.
pub fn generate_path(
    width: usize,
    height: usize,
    seed: Option<u64>,
) -> Result<grid::Grid, GeneratorError> {
    let mut path: random_path::RandomPath = random_path::RandomPath::new(width, height, seed)?;
    Ok(path.generate())
}

/// Derive the track type of each cell from the visit order.
///
/// # Errors
///
/// The function returns [`GeneratorError::MalformedPath`] if the visit order is not a single
/// continuous path.
pub fn derive_types(visit_order: &grid::Grid) -> Result<track_types::TrackGrid, GeneratorError> {
    track_types::TrackGrid::from_visit_order(visit_order)
}
