//! Embedding of mission graphs into a grid of connected rooms.

pub mod cell;
pub mod generator;
pub mod grid;
pub mod map;

mod search;

pub use cell::{Cell, CellNode, CellType, Direction, DoorType, GridPos};
pub use generator::LayoutGenerator;
pub use grid::CellGrid;
pub use map::{Map, OpenNode};
