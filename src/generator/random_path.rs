/*
random_path.rs

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

//! Generate a random visit order.
//!
//! The search is a depth-first search that starts at column 2 of the bottom row.
//! The four cells of the bottom left corner are reserved for the exit chute, and the track must
//! reach the exit chute through the cell just above it, the end cell.
//!
//! At each step, a neighbor cell is a candidate for the next move only if:
//!
//! * it does not split the free cells into separate regions,
//! * it does not leave a free cell with a single free neighbor, except the end cell,
//! * it does not close the second access to the end cell too early.
//!
//! The candidates are sorted by their number of onward moves, each one counted with a
//! probability of [`ONWARD_PROBABILITY`] (Warnsdorff's rule with some randomness).

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

use super::GeneratorError;
use super::grid::{FREE, Grid};

/// Number of cell placements after which the current attempt is abandoned and the search
/// restarts from an empty grid.
const MAX_MOVES: usize = 2000;

/// Probability of counting an onward move when sorting the candidates.
pub const ONWARD_PROBABILITY: f64 = 0.8;

/// Neighbor offsets, as `(col, row)`, in the order they are tried: left, right, up, down.
const MOVES: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// [`RandomPath`] object.
pub struct RandomPath {
    /// Number of columns.
    pub width: usize,

    /// Number of rows.
    pub height: usize,

    /// Number of cells, which is also the visit number of the last cell.
    pub num_cells: usize,

    /// Number of cell placements it took to generate the last visit order, including the
    /// abandoned attempts.
    pub iteration: usize,

    /// Number of attempts it took to generate the last visit order.
    pub attempts: usize,

    /// Duration in seconds it took to generate the last visit order.
    pub duration: f32,

    /// Number of cell placements after which an attempt is abandoned.
    max_moves: usize,

    /// Number of cell placements in the current attempt.
    moves: usize,

    /// Time when the generation started. Used to compute the [`RandomPath::duration`].
    start: Instant,

    rng: StdRng,
}

impl RandomPath {
    /// Create the object.
    ///
    /// If `seed` is [`None`], then the random generator is seeded from the operating system.
    ///
    /// # Errors
    ///
    /// The method returns an error if no complete track exists for the given dimensions.
    /// The width and the height must be at least 3 so that the start cell and the end cell exist.
    /// The number of cells must be odd, because the start cell and the end cell have the same
    /// color on a checkerboard.
    pub fn new(width: usize, height: usize, seed: Option<u64>) -> Result<Self, GeneratorError> {
        if width < 3 || height < 3 || (width * height) % 2 == 0 {
            return Err(GeneratorError::InvalidDimensions { width, height });
        }
        let rng: StdRng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            width,
            height,
            num_cells: width * height,
            iteration: 0,
            attempts: 0,
            duration: 0.0,
            max_moves: MAX_MOVES,
            moves: 0,
            start: Instant::now(),
            rng,
        })
    }

    /// Change the number of cell placements after which an attempt is abandoned. The default is
    /// [`MAX_MOVES`].
    pub fn with_max_moves(mut self, max_moves: usize) -> Self {
        self.max_moves = max_moves;
        self
    }

    /// Cell that receives visit number 1.
    pub fn start_cell(&self) -> (usize, usize) {
        (2, self.height - 1)
    }

    /// Cell that receives the last searched visit number, just above the exit chute.
    pub fn end_cell(&self) -> (usize, usize) {
        (0, self.height - 3)
    }

    /// Last visit number set by the search. The following numbers belong to the exit chute.
    fn target(&self) -> usize {
        self.num_cells - 4
    }

    /// Return a grid with only the exit chute set.
    pub fn initial_grid(&self) -> Grid {
        let mut grid: Grid = Grid::new(self.width, self.height);
        let (h, n) = (self.height, self.num_cells);

        grid.set(0, h - 2, n - 3);
        grid.set(1, h - 2, n - 2);
        grid.set(1, h - 1, n - 1);
        grid.set(0, h - 1, n);
        grid
    }

    /// Generate and return a random visit order.
    ///
    /// An attempt that takes more than [`MAX_MOVES`] placements (or the number given to
    /// [`RandomPath::with_max_moves`]) is abandoned, and a new attempt
    /// starts from an empty grid, until one succeeds.
    pub fn generate(&mut self) -> Grid {
        self.iteration = 0;
        self.attempts = 0;
        self.duration = 0.0;
        self.start = Instant::now();

        let (col, row) = self.start_cell();
        debug!(
            "Grid = {}x{}  Start cell = ({col}, {row})",
            self.width, self.height
        );

        loop {
            self.attempts += 1;
            self.moves = 0;
            let mut grid: Grid = self.initial_grid();
            if self.find_path(&mut grid, col, row, 1) {
                self.duration = self.start.elapsed().as_secs_f32();
                debug!(
                    "Attempts = {}  Iterations = {}  Duration = {}",
                    self.attempts, self.iteration, self.duration
                );
                grid.debug();
                return grid;
            }
            debug!(
                "Attempt {} abandoned after {} moves",
                self.attempts, self.moves
            );
        }
    }

    /// Recursively fill the grid, starting by setting `num` in the given cell.
    fn find_path(&mut self, grid: &mut Grid, col: usize, row: usize, num: usize) -> bool {
        self.moves += 1;
        self.iteration += 1;
        if self.moves > self.max_moves {
            return false;
        }

        trace!("== Setting {num} in cell ({col}, {row}) (move {})", self.moves);
        grid.set(col, row, num);

        if num == self.target() {
            if (col, row) == self.end_cell() {
                return true;
            }
            debug!("    Back: the track does not end above the exit chute");
            grid.set(col, row, FREE);
            return false;
        }

        let view: &Grid = grid;
        let accepted: Vec<(usize, usize)> = MOVES
            .iter()
            .filter_map(|offset| view.offset(col, row, *offset))
            .filter(|(c, r)| self.accept_neighbor(view, *c, *r, num + 1))
            .collect();

        let mut candidates: Vec<(usize, usize, usize)> = Vec::with_capacity(accepted.len());
        for (c, r) in accepted {
            let onward: usize = self.onward_moves_randomized(view, c, r);
            candidates.push((c, r, onward));
        }
        // Stable sort: cells with the same score keep the order of MOVES
        candidates.sort_by_key(|t| t.2);

        for (c, r, _) in candidates {
            if self.find_path(grid, c, r, num + 1) {
                return true;
            }
            if self.moves > self.max_moves {
                break;
            }
        }

        trace!("    Back: no eligible neighbor for cell ({col}, {row})");
        grid.set(col, row, FREE);
        false
    }

    /// Whether the given free cell can receive `num`.
    fn accept_neighbor(&self, grid: &Grid, col: usize, row: usize, num: usize) -> bool {
        grid.get(col, row) == FREE
            && !Self::is_subdividing_space(grid, col, row)
            && !self.has_invalid_dead_end(grid, col, row)
            && self.is_valid_exit_access(grid, col, row, num)
    }

    /// Number of free neighbors of the cell, each one counted with a probability of
    /// [`ONWARD_PROBABILITY`].
    fn onward_moves_randomized(&mut self, grid: &Grid, col: usize, row: usize) -> usize {
        let rng: &mut StdRng = &mut self.rng;
        MOVES
            .iter()
            .filter(|(dc, dr)| grid.is_free(col as isize + dc, row as isize + dr))
            .filter(|_| rng.random_bool(ONWARD_PROBABILITY))
            .count()
    }

    /// Whether setting the cell would split the free cells into separate regions.
    fn is_subdividing_space(grid: &Grid, col: usize, row: usize) -> bool {
        let mut scratch: Grid = grid.clone();
        scratch.set(col, row, usize::MAX);
        scratch.num_free_regions(2) > 1
    }

    /// Whether a free cell other than the given cell and the end cell has a single free
    /// neighbor.
    ///
    /// Such a cell could only be the last cell of the track, which must be the end cell.
    fn has_invalid_dead_end(&self, grid: &Grid, col: usize, row: usize) -> bool {
        let end: (usize, usize) = self.end_cell();
        grid.free_cells()
            .into_iter()
            .filter(|cell| *cell != (col, row) && *cell != end)
            .any(|(c, r)| grid.num_free_adjacent(c, r) == 1)
    }

    /// Whether the cell can receive `num` given the accesses to the end cell.
    ///
    /// The end cell has two possible predecessors: the cell above it and the cell to its right.
    /// When one of them is already set (or outside the grid), the other one is the last access
    /// and only the number just before the end cell can go there.
    fn is_valid_exit_access(&self, grid: &Grid, col: usize, row: usize, num: usize) -> bool {
        let h: isize = self.height as isize;
        let accesses: [(isize, isize); 2] = [(0, h - 4), (1, h - 3)];

        match accesses
            .iter()
            .position(|a| *a == (col as isize, row as isize))
        {
            Some(i) => {
                let (oc, or) = accesses[1 - i];
                grid.is_free(oc, or) || num == self.num_cells - 5
            }
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Grid 5x5 with the track going up from the start cell for `len` cells.
    fn straight_up(path: &RandomPath, len: usize) -> Grid {
        let mut grid: Grid = path.initial_grid();
        for i in 0..len {
            grid.set(2, 4 - i, i + 1);
        }
        grid
    }

    #[test]
    fn rejects_unsolvable_dimensions() {
        for (w, h) in [(2, 5), (5, 2), (2, 2), (4, 5), (5, 4), (3, 2), (4, 4)] {
            assert_eq!(
                RandomPath::new(w, h, Some(1)).err(),
                Some(GeneratorError::InvalidDimensions {
                    width: w,
                    height: h
                })
            );
        }
        assert!(RandomPath::new(3, 3, None).is_ok());
        assert!(RandomPath::new(15, 15, None).is_ok());
    }

    #[test]
    fn exit_chute_is_preset() {
        let path: RandomPath = RandomPath::new(5, 5, Some(1)).unwrap();
        let grid: Grid = path.initial_grid();
        assert_eq!(grid.get(0, 3), 22);
        assert_eq!(grid.get(1, 3), 23);
        assert_eq!(grid.get(1, 4), 24);
        assert_eq!(grid.get(0, 4), 25);
        assert_eq!(grid.free_cells().len(), 21);
        assert_eq!(path.start_cell(), (2, 4));
        assert_eq!(path.end_cell(), (0, 2));
    }

    #[test]
    fn splitting_move_is_rejected() {
        let path: RandomPath = RandomPath::new(5, 5, Some(1)).unwrap();
        let grid: Grid = straight_up(&path, 4);
        assert!(RandomPath::is_subdividing_space(&grid, 2, 0));
        assert!(!path.accept_neighbor(&grid, 2, 0, 5));
        assert!(!RandomPath::is_subdividing_space(&grid, 1, 1));
    }

    #[test]
    fn dead_end_is_rejected() {
        let path: RandomPath = RandomPath::new(5, 5, Some(1)).unwrap();
        let mut grid: Grid = path.initial_grid();
        grid.set(2, 4, 1);
        grid.set(3, 4, 2);
        // Going up would leave the corner cell (4, 4) with a single free neighbor
        assert!(path.has_invalid_dead_end(&grid, 3, 3));
        assert!(!path.accept_neighbor(&grid, 3, 3, 3));
        assert!(path.accept_neighbor(&grid, 4, 4, 3));
    }

    #[test]
    fn end_cell_may_be_a_dead_end() {
        let path: RandomPath = RandomPath::new(5, 5, Some(1)).unwrap();
        let mut grid: Grid = path.initial_grid();
        grid.set(1, 2, 7);
        // The end cell (0, 2) now has a single free neighbor
        assert_eq!(grid.num_free_adjacent(0, 2), 1);
        assert!(!path.has_invalid_dead_end(&grid, 2, 4));
    }

    #[test]
    fn last_access_to_end_cell_is_reserved() {
        let path: RandomPath = RandomPath::new(5, 5, Some(1)).unwrap();
        let mut grid: Grid = path.initial_grid();
        assert!(path.is_valid_exit_access(&grid, 1, 2, 8));
        assert!(path.is_valid_exit_access(&grid, 0, 1, 8));
        grid.set(0, 1, 7);
        assert!(!path.is_valid_exit_access(&grid, 1, 2, 8));
        assert!(path.is_valid_exit_access(&grid, 1, 2, 20));
        assert!(path.is_valid_exit_access(&grid, 3, 3, 8));
    }

    #[test]
    fn three_rows_reserve_the_only_access() {
        // With three rows, the cell above the end cell is outside the grid
        let path: RandomPath = RandomPath::new(5, 3, Some(1)).unwrap();
        let grid: Grid = path.initial_grid();
        assert!(!path.is_valid_exit_access(&grid, 1, 0, 4));
        assert!(path.is_valid_exit_access(&grid, 1, 0, 10));
    }

    #[test]
    fn smallest_grid_has_a_single_solution() {
        let mut path: RandomPath = RandomPath::new(3, 3, Some(7)).unwrap();
        let grid: Grid = path.generate();
        assert_eq!(
            grid.to_matrix(),
            vec![vec![5, 4, 3], vec![6, 7, 2], vec![9, 8, 1]]
        );
        assert_eq!(path.attempts, 1);
        assert_eq!(path.iteration, 5);
    }

    #[test]
    fn abandoned_attempt_clears_its_cells() {
        // 7x7 needs at least 45 placements
        let mut path: RandomPath = RandomPath::new(7, 7, Some(1)).unwrap().with_max_moves(10);
        let mut grid: Grid = path.initial_grid();
        assert!(!path.find_path(&mut grid, 2, 6, 1));
        assert_eq!(path.moves, 11);
        assert_eq!(grid, path.initial_grid());
    }

    #[test]
    fn abandoned_attempts_restart() {
        let mut restarted: usize = 0;
        for seed in 0..50 {
            let mut path: RandomPath =
                RandomPath::new(7, 7, Some(seed)).unwrap().with_max_moves(60);
            let grid: Grid = path.generate();
            assert!(grid.is_complete(), "seed {seed}:\n{}", grid.format_matrix());
            assert_eq!(grid.get(2, 6), 1);
            assert_eq!(grid.get(0, 4), 45);
            if path.attempts > 1 {
                restarted += 1;
                assert!(path.iteration > 60);
            }
        }
        assert!(restarted > 0);
    }

    #[test]
    fn same_seed_same_grid() {
        let first: Grid = RandomPath::new(7, 5, Some(42)).unwrap().generate();
        let second: Grid = RandomPath::new(7, 5, Some(42)).unwrap().generate();
        assert_eq!(first, second);
    }

    #[test]
    fn generated_grid_is_complete() {
        let mut path: RandomPath = RandomPath::new(5, 5, Some(3)).unwrap();
        let grid: Grid = path.generate();
        assert!(grid.is_complete());
        assert_eq!(grid.get(2, 4), 1);
        assert_eq!(grid.get(0, 2), 21);
        assert!(path.attempts >= 1);
        assert!(path.iteration >= 21);
    }
}
