//! Falling-block puzzle simulation: piece catalog, grid, collision, scoring and
//! the per-frame game state machine. The terminal front end lives in the binary.

pub mod catalog;
pub mod game;
pub mod grid;
pub mod input;
pub mod piece;
pub mod scoring;
