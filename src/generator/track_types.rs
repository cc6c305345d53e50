/*
track_types.rs

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

//! Track pieces for the cells of the grid.
//!
//! The marble travels through a cell by entering one side and leaving by another side.
//! Directions are given as headings:
//!
//! | Heading | Direction | Grid move |
//! |---------|-----------|-----------|
//! | 0       | +X        | col + 1   |
//! | 1       | +Y        | row - 1   |
//! | 2       | -X        | col - 1   |
//! | 3       | -Y        | row + 1   |
//!
//! The track piece for a cell is given by the heading the marble has when it enters the cell and
//! the heading it has when it leaves the cell.
//! The first cell of the track is a straight piece in its leaving heading, and the last cell is a
//! straight piece in its entering heading.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::FromRepr;

use super::GeneratorError;
use super::grid::{FREE, Grid};

/// Offsets, as `(col, row)`, probed for the previous cell. The index of the offset is the
/// heading the marble has when it enters the cell.
const PREVIOUS_CELL_OFFSETS: [(isize, isize); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

/// Offsets, as `(col, row)`, probed for the next cell. The index of the offset is the heading
/// the marble has when it leaves the cell.
const NEXT_CELL_OFFSETS: [(isize, isize); 4] = [(1, 0), (0, -1), (-1, 0), (0, 1)];

/// Track piece.
///
/// The variant names give the entering heading then the leaving heading.
/// The discriminant is the code of the piece.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, FromRepr)]
#[repr(u8)]
pub enum TrackType {
    PosXPosX = 0,
    PosYPosY = 1,
    NegXNegX = 2,
    NegYNegY = 3,
    PosYPosX = 4,
    NegXPosY = 5,
    NegYNegX = 6,
    PosXNegY = 7,
    PosYNegX = 8,
    NegXNegY = 9,
    NegYPosX = 10,
    PosXPosY = 11,
}

impl TrackType {
    /// Return the track piece for the given entering and leaving headings, or [`None`] if the
    /// marble would have to go back the way it came.
    ///
    /// Codes 0 to 3 are the straight pieces, indexed by their heading. Codes 4 to 7 are the
    /// clockwise turns, indexed by the leaving heading. Codes 8 to 11 are the counterclockwise
    /// turns, indexed by the entering heading minus one.
    pub fn from_headings(entering: usize, leaving: usize) -> Option<Self> {
        if entering > 3 || leaving > 3 {
            return None;
        }
        let code: usize = if entering == leaving {
            entering
        } else if (leaving + 1) % 4 == entering {
            4 + leaving
        } else if (entering + 1) % 4 == leaving {
            8 + (entering + 3) % 4
        } else {
            return None;
        };
        Self::from_repr(code as u8)
    }

    /// Piece code, between 0 and 11.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Whether the piece is a straight piece.
    pub fn is_straight(self) -> bool {
        self.code() < 4
    }

    /// Name of the piece template, such as `Track +Y+X`.
    pub fn piece_name(self) -> String {
        format!("Track {self}")
    }
}

impl fmt::Display for TrackType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s: &str = match self {
            TrackType::PosXPosX => "+X+X",
            TrackType::PosYPosY => "+Y+Y",
            TrackType::NegXNegX => "-X-X",
            TrackType::NegYNegY => "-Y-Y",
            TrackType::PosYPosX => "+Y+X",
            TrackType::NegXPosY => "-X+Y",
            TrackType::NegYNegX => "-Y-X",
            TrackType::PosXNegY => "+X-Y",
            TrackType::PosYNegX => "+Y-X",
            TrackType::NegXNegY => "-X-Y",
            TrackType::NegYPosX => "-Y+X",
            TrackType::PosXPosY => "+X+Y",
        };
        write!(f, "{s}")
    }
}

/// Track pieces for all the cells of the grid.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TrackGrid {
    width: usize,
    height: usize,

    /// Pieces stored row by row.
    cells: Vec<TrackType>,
}

impl TrackGrid {
    /// Create the [`TrackGrid`] object for the given visit order.
    ///
    /// # Errors
    ///
    /// The method returns an error for the first cell that is not connected to its previous and
    /// next cells. This happens only when the visit order is not a single path through all the
    /// cells.
    pub fn from_visit_order(visit_order: &Grid) -> Result<Self, GeneratorError> {
        let (width, height) = (visit_order.width(), visit_order.height());
        let last: usize = visit_order.num_cells();
        let mut cells: Vec<TrackType> = Vec::with_capacity(last);

        for row in 0..height {
            for col in 0..width {
                let value: usize = visit_order.get(col, row);
                let malformed = || {
                    debug!("Cannot find the track piece for cell ({col}, {row}) = {value}");
                    GeneratorError::MalformedPath { col, row }
                };
                if value == FREE || value > last {
                    return Err(malformed());
                }

                let mut entering: Option<usize> = if value > 1 {
                    find_heading(visit_order, col, row, value - 1, &PREVIOUS_CELL_OFFSETS)
                } else {
                    None
                };
                let mut leaving: Option<usize> = if value < last {
                    find_heading(visit_order, col, row, value + 1, &NEXT_CELL_OFFSETS)
                } else {
                    None
                };
                if value == 1 {
                    entering = leaving;
                }
                if value == last {
                    leaving = entering;
                }

                let track: TrackType = match (entering, leaving) {
                    (Some(e), Some(l)) => TrackType::from_headings(e, l).ok_or_else(malformed)?,
                    _ => return Err(malformed()),
                };
                cells.push(track);
            }
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Return the track piece of the given cell.
    pub fn get(&self, col: usize, row: usize) -> TrackType {
        self.cells[row * self.width + col]
    }

    /// Return the piece codes as a matrix indexed by `[row][col]`.
    pub fn to_matrix(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.width)
            .map(|r| r.iter().map(|t| t.code()).collect())
            .collect()
    }
}

/// Return the index of the first offset that leads to the cell holding `value`.
fn find_heading(
    visit_order: &Grid,
    col: usize,
    row: usize,
    value: usize,
    offsets: &[(isize, isize); 4],
) -> Option<usize> {
    offsets.iter().position(|offset| {
        visit_order
            .offset(col, row, *offset)
            .is_some_and(|(c, r)| visit_order.get(c, r) == value)
    })
}
