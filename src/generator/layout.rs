/*
layout.rs

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

//! Layout, as handed to the renderer.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::grid::{self, Grid};
use super::track_types::TrackGrid;

/// Visit order and track pieces of a generated marble run.
///
/// Both matrices are indexed by `[row][col]`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Layout {
    pub width: usize,
    pub height: usize,

    /// Visit number of each cell, starting at 1.
    pub visit_order: Vec<Vec<usize>>,

    /// Track piece code of each cell, between 0 and 11.
    pub track_types: Vec<Vec<u8>>,
}

impl Layout {
    /// Create a [`Layout`] object.
    pub fn new(visit_order: &Grid, track_types: &TrackGrid) -> Self {
        Self {
            width: visit_order.width(),
            height: visit_order.height(),
            visit_order: visit_order.to_matrix(),
            track_types: track_types.to_matrix(),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let widest: usize = self.width * self.height;
        writeln!(f, "{}", grid::format_rows(&self.visit_order, widest))?;
        writeln!(f)?;
        // Codes go up to 11
        write!(f, "{}", grid::format_rows(&self.track_types, widest.max(11)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_output() {
        let visit_order: Grid =
            Grid::from_matrix(&[vec![5, 4, 3], vec![6, 7, 2], vec![9, 8, 1]]).unwrap();
        let tracks: TrackGrid = TrackGrid::from_visit_order(&visit_order).unwrap();
        let layout: Layout = Layout::new(&visit_order, &tracks);
        assert_eq!(layout.width, 3);
        assert_eq!(
            layout.to_string(),
            "5 4 3\n6 7 2\n9 8 1\n\n 9  2  8\n10  7  1\n 2  6  1"
        );
    }

    #[test]
    fn json_output() {
        let visit_order: Grid =
            Grid::from_matrix(&[vec![5, 4, 3], vec![6, 7, 2], vec![9, 8, 1]]).unwrap();
        let tracks: TrackGrid = TrackGrid::from_visit_order(&visit_order).unwrap();
        let layout: Layout = Layout::new(&visit_order, &tracks);
        let json: String = serde_json::to_string(&layout).unwrap();
        assert!(json.contains("\"visit_order\":[[5,4,3],[6,7,2],[9,8,1]]"));
        assert!(json.contains("\"track_types\":[[9,2,8],[10,7,1],[2,6,1]]"));
        let back: Layout = serde_json::from_str(&json).unwrap();
        assert_eq!(back, layout);
    }
}
