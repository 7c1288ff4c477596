//! HEXMAP Core - Map editor engine
//!
//! This crate provides the core logic of the hex map editor:
//! - Hex geometry (cube/axial coordinates, pixel layout, rounding)
//! - Three-fold symmetry orbits
//! - Board state with orbit-wide tile placement
//! - Constrained random map generation
//! - JSON and text map formats
//! - Editor session and command dispatch

pub mod coords;
pub mod symmetry;
pub mod board;
pub mod generator;
pub mod codec;
pub mod session;

// Re-exports for convenient access
pub use coords::{board_cells, cell_count, cube_round, Cube, Layout, Point, Sector, DIRECTIONS};
pub use symmetry::{orbit_key, partition_board, Orbit};
pub use board::{BoardState, Tile, TileCounts, TileKind, MAX_GOLD, MAX_RADIUS};
pub use generator::{GenerationReport, GeneratorConfig, MapGenerator, Preserve};
pub use codec::{CodecError, DecodeWarning, Decoded, Format, MapDocument, DEFAULT_MAX_MOVES};
pub use session::{Command, Outcome, Session};
