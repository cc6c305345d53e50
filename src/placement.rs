/*
placement.rs

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

//! Position of the track pieces.
//!
//! The renderer builds one template per track type and copies it to every cell.
//! Cells are laid out along +X for the columns and -Y for the rows, and each cell is lower than
//! the previous one along the track so that the marble keeps rolling.

use serde::{Deserialize, Serialize};

use crate::generator::grid::Grid;
use crate::generator::track_types::{TrackGrid, TrackType};
use crate::settings::MarbleRunSettings;

/// Track piece to copy into a cell, and the translation to apply to the copy.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PiecePlacement {
    pub col: usize,
    pub row: usize,

    /// Position of the cell along the track, starting at 1.
    pub visit: usize,

    pub track_type: TrackType,

    /// Name of the piece template.
    pub piece: String,

    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Return the placement of every cell, row by row.
pub fn place_pieces(
    visit_order: &Grid,
    track_types: &TrackGrid,
    settings: &MarbleRunSettings,
) -> Vec<PiecePlacement> {
    let size: f64 = settings.cell_size();
    let drop: f64 = settings.drop_per_cell();
    let mut placements: Vec<PiecePlacement> = Vec::with_capacity(visit_order.num_cells());

    for row in 0..visit_order.height() {
        for col in 0..visit_order.width() {
            let visit: usize = visit_order.get(col, row);
            let track_type: TrackType = track_types.get(col, row);
            placements.push(PiecePlacement {
                col,
                row,
                visit,
                track_type,
                piece: track_type.piece_name(),
                x: col as f64 * size,
                y: -(row as f64) * size,
                z: -((visit - 1) as f64) * drop,
            });
        }
    }
    placements
}
