/*
grid.rs

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

//! Visit order of the cells in the marble run grid.

use log::{Level, debug, log_enabled};
use serde::{Deserialize, Serialize};

use super::GeneratorError;

/// Value of a cell that the track does not visit yet.
pub const FREE: usize = 0;

/// Grid object.
///
/// Cells are addressed with `(col, row)` coordinates. Row 0 is the top row, and the track starts
/// in the bottom row.
///
/// The serialized form is the matrix indexed by `[row][col]`. Deserialization goes through
/// [`Grid::from_matrix`], so a deserialized grid always has `width * height` cells.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "Vec<Vec<usize>>", into = "Vec<Vec<usize>>")]
pub struct Grid {
    /// Number of columns.
    width: usize,

    /// Number of rows.
    height: usize,

    /// Visit numbers stored row by row. [`FREE`] marks an unvisited cell.
    cells: Vec<usize>,
}

impl Grid {
    /// Create a [`Grid`] object with all the cells free.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![FREE; width * height],
        }
    }

    /// Create a [`Grid`] object from a matrix indexed by `[row][col]`.
    ///
    /// # Errors
    ///
    /// The function returns an error if the matrix is empty or if its rows do not have the same
    /// length.
    pub fn from_matrix(matrix: &[Vec<usize>]) -> Result<Self, GeneratorError> {
        let height: usize = matrix.len();
        let width: usize = matrix.first().map_or(0, Vec::len);
        if width == 0 || matrix.iter().any(|r| r.len() != width) {
            return Err(GeneratorError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: matrix.concat(),
        })
    }

    /// Return the grid as a matrix indexed by `[row][col]`.
    pub fn to_matrix(&self) -> Vec<Vec<usize>> {
        self.cells.chunks(self.width).map(<[usize]>::to_vec).collect()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells in the grid, which is also the highest visit number.
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// Return the visit number of the given cell.
    pub fn get(&self, col: usize, row: usize) -> usize {
        self.cells[row * self.width + col]
    }

    /// Set the visit number of the given cell.
    pub fn set(&mut self, col: usize, row: usize, value: usize) {
        self.cells[row * self.width + col] = value;
    }

    /// Return the coordinates of the cell at the given offset from `(col, row)`, or [`None`] if
    /// that cell is outside the grid.
    pub fn offset(
        &self,
        col: usize,
        row: usize,
        offset: (isize, isize),
    ) -> Option<(usize, usize)> {
        let c: usize = col.checked_add_signed(offset.0)?;
        let r: usize = row.checked_add_signed(offset.1)?;
        if c < self.width && r < self.height {
            Some((c, r))
        } else {
            None
        }
    }

    /// Whether the cell is inside the grid and not visited yet.
    pub fn is_free(&self, col: isize, row: isize) -> bool {
        col >= 0
            && row >= 0
            && (col as usize) < self.width
            && (row as usize) < self.height
            && self.get(col as usize, row as usize) == FREE
    }

    /// Return the coordinates of all the unvisited cells.
    pub fn free_cells(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, v)| **v == FREE)
            .map(|(i, _)| (i % self.width, i / self.width))
            .collect()
    }

    /// Number of free cells adjacent to the given cell.
    pub fn num_free_adjacent(&self, col: usize, row: usize) -> usize {
        let (c, r) = (col as isize, row as isize);
        [(c - 1, r), (c + 1, r), (c, r - 1), (c, r + 1)]
            .iter()
            .filter(|(x, y)| self.is_free(*x, *y))
            .count()
    }

    /// Number of separate 4-connected regions of free cells.
    ///
    /// The count stops at `limit`.
    pub fn num_free_regions(&self, limit: usize) -> usize {
        let mut visited: Vec<bool> = self.cells.iter().map(|v| *v != FREE).collect();
        let mut stack: Vec<usize> = Vec::with_capacity(self.cells.len());
        let mut regions: usize = 0;

        for start in 0..self.cells.len() {
            if visited[start] {
                continue;
            }
            regions += 1;
            if regions >= limit {
                break;
            }
            visited[start] = true;
            stack.push(start);
            while let Some(i) = stack.pop() {
                let (col, row) = (i % self.width, i / self.width);
                for offset in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
                    if let Some((c, r)) = self.offset(col, row, offset) {
                        let j: usize = r * self.width + c;
                        if !visited[j] {
                            visited[j] = true;
                            stack.push(j);
                        }
                    }
                }
            }
        }
        regions
    }

    /// Whether every visit number from 1 to [`Grid::num_cells`] appears exactly once.
    pub fn is_complete(&self) -> bool {
        let mut seen: Vec<bool> = vec![false; self.cells.len() + 1];
        for v in &self.cells {
            if *v == FREE || *v > self.cells.len() || seen[*v] {
                return false;
            }
            seen[*v] = true;
        }
        true
    }

    /// Format the grid, one row per line, with the values right-aligned.
    pub fn format_matrix(&self) -> String {
        format_rows(&self.to_matrix(), self.num_cells())
    }

    /// Print the grid.
    pub fn debug(&self) {
        if log_enabled!(Level::Debug) {
            for line in self.format_matrix().lines() {
                debug!("{line}");
            }
        }
    }
}

impl TryFrom<Vec<Vec<usize>>> for Grid {
    type Error = GeneratorError;

    fn try_from(matrix: Vec<Vec<usize>>) -> Result<Self, Self::Error> {
        Grid::from_matrix(&matrix)
    }
}

impl From<Grid> for Vec<Vec<usize>> {
    fn from(grid: Grid) -> Self {
        grid.to_matrix()
    }
}

/// Format a matrix, one row per line, with the values right-aligned on the digit width of
/// `widest`.
pub fn format_rows<T: ToString>(rows: &[Vec<T>], widest: usize) -> String {
    let w: usize = widest.to_string().len();
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|v| format!("{:>w$}", v.to_string()))
                .collect::<Vec<String>>()
                .join(" ")
        })
        .collect::<Vec<String>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_stays_inside() {
        let grid: Grid = Grid::new(3, 2);
        assert_eq!(grid.offset(0, 0, (-1, 0)), None);
        assert_eq!(grid.offset(2, 1, (1, 0)), None);
        assert_eq!(grid.offset(2, 1, (0, 1)), None);
        assert_eq!(grid.offset(1, 1, (0, -1)), Some((1, 0)));
    }

    #[test]
    fn free_cells_and_neighbors() {
        let mut grid: Grid = Grid::new(3, 3);
        grid.set(1, 0, 1);
        grid.set(1, 1, 2);
        assert!(!grid.is_free(1, 1));
        assert!(!grid.is_free(-1, 0));
        assert!(!grid.is_free(3, 0));
        assert!(grid.is_free(0, 0));
        assert_eq!(grid.free_cells().len(), 7);
        assert_eq!(grid.num_free_adjacent(0, 0), 1);
        assert_eq!(grid.num_free_adjacent(1, 2), 2);
    }

    #[test]
    fn regions_split_by_a_wall() {
        let mut grid: Grid = Grid::new(3, 3);
        assert_eq!(grid.num_free_regions(usize::MAX), 1);
        for row in 0..3 {
            grid.set(1, row, row + 1);
        }
        assert_eq!(grid.num_free_regions(usize::MAX), 2);
        assert_eq!(grid.num_free_regions(2), 2);
    }

    #[test]
    fn matrix_conversion() {
        let matrix: Vec<Vec<usize>> = vec![vec![1, 2, 3], vec![6, 5, 4]];
        let grid: Grid = Grid::from_matrix(&matrix).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.get(0, 1), 6);
        assert_eq!(grid.to_matrix(), matrix);
        assert!(grid.is_complete());
        assert_eq!(grid.format_matrix(), "1 2 3\n6 5 4");
    }

    #[test]
    fn ragged_matrix_is_rejected() {
        let matrix: Vec<Vec<usize>> = vec![vec![1, 2, 3], vec![4, 5]];
        assert!(Grid::from_matrix(&matrix).is_err());
        assert!(Grid::from_matrix(&[]).is_err());
    }

    #[test]
    fn json_grid_must_be_rectangular() {
        let grid: Grid = serde_json::from_str("[[1, 2, 3], [6, 5, 4]]").unwrap();
        assert_eq!(grid.num_cells(), 6);
        assert_eq!(grid.get(2, 1), 4);
        assert_eq!(serde_json::to_string(&grid).unwrap(), "[[1,2,3],[6,5,4]]");

        assert!(serde_json::from_str::<Grid>("[[1, 2, 3], [4, 5]]").is_err());
        assert!(serde_json::from_str::<Grid>("[]").is_err());
        // The fields cannot be given separately
        assert!(
            serde_json::from_str::<Grid>(r#"{"width": 3, "height": 3, "cells": [1, 2, 3]}"#)
                .is_err()
        );
    }

    #[test]
    fn duplicated_value_is_not_complete() {
        let grid: Grid = Grid::from_matrix(&[vec![1, 2], vec![2, 4]]).unwrap();
        assert!(!grid.is_complete());
    }
}
