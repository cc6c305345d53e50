/*
cli_options.rs

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

//! Process command-line options.
//!
//! # Examples
//!
//! Generate a layout for the default 5x5 grid:
//!
//! ```
//! $ marble-run
//! 17 16 15 12 11
//! 18 19 14 13 10
//! 21 20  7  8  9
//! 22 23  6  5  4
//! 25 24  1  2  3
//! ...
//! ```
//!
//! The first matrix gives the position of each cell along the track.
//! The second matrix gives the track piece code of each cell.
//!
//! Generate two 7x5 layouts with the piece positions, in JSON format:
//!
//! ```
//! $ marble-run -x 7 -y 5 -c 2 -j -p
//! ```

use clap::Parser;
use log::{LevelFilter, debug, warn};
use serde::Serialize;
use std::path::PathBuf;

use crate::config::COPYRIGHT_NOTICE;
use marble_run::generator::grid::Grid;
use marble_run::generator::layout::Layout;
use marble_run::generator::random_path::RandomPath;
use marble_run::generator::track_types::TrackGrid;
use marble_run::placement::{self, PiecePlacement};
use marble_run::saver::settings::SaverSettings;
use marble_run::settings::MarbleRunSettings;

/// Generate random marble run layouts.
#[derive(Parser)]
#[command(about, long_about = None, version, long_version = COPYRIGHT_NOTICE)]
struct Args {
    /// Number of cells in the X direction
    #[arg(short = 'x', long)]
    width: Option<usize>,

    /// Number of cells in the Y direction
    #[arg(short = 'y', long)]
    depth: Option<usize>,

    /// Marble diameter in millimeters
    #[arg(long)]
    diameter: Option<f64>,

    /// Clearance between the marble and the track in millimeters
    #[arg(long)]
    clearance: Option<f64>,

    /// Slope of the track
    #[arg(long)]
    slope: Option<f64>,

    /// Seed for the random generator. Layout N uses the seed plus N
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of layouts to generate
    #[arg(short, long, default_value_t = 1)]
    count: usize,

    /// Print the layouts in JSON format
    #[arg(short, long, default_value_t = false)]
    json: bool,

    /// Also print the position of each track piece
    #[arg(short, long, default_value_t = false)]
    placements: bool,

    /// Print some statistics after generating the layouts
    #[arg(long, default_value_t = false)]
    summary: bool,

    /// Directory where the last used settings are stored
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Store the settings in the data directory
    #[arg(long, default_value_t = false, requires = "data_dir")]
    save_settings: bool,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

/// Generated layout with its optional piece positions.
#[derive(Serialize)]
struct GeneratedLayout {
    #[serde(flatten)]
    layout: Layout,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    placements: Vec<PiecePlacement>,
}

/// JSON document.
#[derive(Serialize)]
struct Output<'a> {
    settings: &'a MarbleRunSettings,
    layouts: &'a [GeneratedLayout],
}

/// Parse and process command-line options, and return the exit code.
pub fn parse() -> u8 {
    let args: Args = Args::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if args.debug {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();

    //
    // Retrieve the last used settings and override them with the command-line options
    //
    let saver: Option<SaverSettings> = args.data_dir.clone().map(SaverSettings::new);
    let mut settings: MarbleRunSettings = match saver.as_ref().map(SaverSettings::get_settings) {
        Some(Ok(Some(s))) => s,
        Some(Err(e)) => {
            warn!("Cannot read the saved settings, using the defaults: {e}");
            MarbleRunSettings::default()
        }
        _ => MarbleRunSettings::default(),
    };
    if let Some(v) = args.width {
        settings.width = v;
    }
    if let Some(v) = args.depth {
        settings.depth = v;
    }
    if let Some(v) = args.diameter {
        settings.ball_diameter = v;
    }
    if let Some(v) = args.clearance {
        settings.clearance = v;
    }
    if let Some(v) = args.slope {
        settings.slope = v;
    }
    if let Err(e) = settings.validate() {
        eprintln!("Error: {e}");
        return 1;
    }
    debug!("Settings: {settings:?}");

    //
    // Generate the layouts
    //
    let mut layouts: Vec<GeneratedLayout> = Vec::with_capacity(args.count);
    let mut total: f32 = 0.0;
    let mut max: f32 = 0.0;
    let mut iterations: usize = 0;
    let mut attempts: usize = 0;
    for i in 0..args.count {
        debug!("Layout {i}");

        let seed: Option<u64> = args.seed.map(|s| s.wrapping_add(i as u64));
        let mut path: RandomPath = match RandomPath::new(settings.width, settings.depth, seed) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Error: {e}");
                return 1;
            }
        };
        let visit_order: Grid = path.generate();
        total += path.duration;
        if path.duration > max {
            max = path.duration;
        }
        iterations += path.iteration;
        attempts += path.attempts;

        // Verify that every cell is visited once
        if !visit_order.is_complete() {
            eprintln!("Incomplete visit order:\n{}", visit_order.format_matrix());
            panic!("Bug: incomplete visit order");
        }
        let track_types: TrackGrid = match marble_run::derive_types(&visit_order) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("Broken visit order:\n{}", visit_order.format_matrix());
                panic!("Bug: {e}");
            }
        };

        let placements: Vec<PiecePlacement> = if args.placements {
            placement::place_pieces(&visit_order, &track_types, &settings)
        } else {
            Vec::new()
        };
        layouts.push(GeneratedLayout {
            layout: Layout::new(&visit_order, &track_types),
            placements,
        });
    }

    //
    // Print the layouts
    //
    if args.json {
        let output: Output = Output {
            settings: &settings,
            layouts: &layouts,
        };
        match serde_json::to_string_pretty(&output) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("Error: {e}");
                return 1;
            }
        }
    } else {
        for (i, generated) in layouts.iter().enumerate() {
            if i > 0 {
                println!();
            }
            println!("{}", generated.layout);
            if !generated.placements.is_empty() {
                println!();
            }
            for p in &generated.placements {
                println!(
                    "{:>3} ({}, {}) {:<11} x={:.3} y={:.3} z={:.3}",
                    p.visit, p.col, p.row, p.piece, p.x, p.y, p.z
                );
            }
        }
    }

    if args.save_settings
        && let Some(s) = &saver
        && let Err(e) = s.save_settings(&settings)
    {
        eprintln!("Error: cannot save the settings: {e}");
        return 1;
    }

    // Print some stats
    if args.summary && args.count > 0 {
        println!(
            "
        total time = {}s
      average time = {}s
          max time = {}s
average iterations = {}
  average attempts = {}",
            total,
            total / args.count as f32,
            max,
            iterations / args.count,
            attempts as f32 / args.count as f32
        );
    }
    0
}
