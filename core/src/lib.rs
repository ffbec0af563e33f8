pub mod board;
pub mod grid;
pub mod session;
pub mod slicer;
pub mod source;
pub mod tile;

pub use board::Board;
pub use grid::{CANVAS_SIZE, GRID_MAX, GRID_MIN, GridSize};
pub use session::{DropOutcome, GameSession, NewGameOutcome, TileView};
pub use slicer::{SliceError, TileSlicer};
pub use source::{DirImageSource, ImageSource, VALID_EXTENSIONS, pick_random};
pub use tile::Tile;
