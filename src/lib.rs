/*
lib.rs

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

//! Marble run layout generator.
//!
//! A marble run is a grid of track pieces forming a single channel that goes through every cell
//! once, always going down, from a start cell to an exit chute.
//! See [`generator`] for building the layout, [`placement`] for positioning the pieces, and
//! [`settings`] for the physical parameters.

pub mod generator;
pub mod placement;
pub mod saver;
pub mod settings;

pub use generator::{GeneratorError, derive_types, generate_path};
