//! Contribution city generation.
//!
//! - Scale functions mapping daily counts to height and color
//! - Grid reindexing of a chronological year into a 14x26 footprint
//! - Procedural window textures for building walls
//! - City model assembly (base platform + one building per day)
//!
//! Everything here is pure computation over in-memory data. Rendering
//! lives in [`crate::render`].

pub mod builder;
pub mod grid;
pub mod model;
pub mod scales;
pub mod window_texture;

pub use builder::CityModelBuilder;
pub use grid::{ActivityGrid, ActivityRecord};
pub use model::{Building, CityModel, CityStats};

/// Logical grid rows.
pub const GRID_ROWS: usize = 14;

/// Logical grid columns.
pub const GRID_COLUMNS: usize = 26;

/// Total cells in the logical grid.
pub const GRID_CELLS: usize = GRID_ROWS * GRID_COLUMNS;

/// Building footprint along X, in world units.
pub const CELL_WIDTH: f32 = 0.25;

/// Building footprint along Y, in world units.
pub const CELL_DEPTH: f32 = 0.25;

/// Gap between neighbouring buildings.
pub const CELL_SPACING: f32 = 0.15;

// Grid dimensions are structural; a zero-sized grid is a programming error.
const _: () = assert!(GRID_ROWS > 0 && GRID_COLUMNS > 0);
const _: () = assert!(GRID_ROWS % 7 == 0, "rows fold whole weeks");
