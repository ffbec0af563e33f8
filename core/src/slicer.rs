use crate::grid::GridSize;
use crate::tile::Tile;

#[derive(Debug, thiserror::Error)]
pub enum SliceError {
    #[error("image decode failed: {0}")]
    Decode(String),
    #[error("tile encode failed: {0}")]
    Encode(String),
    #[error("invalid image dimensions")]
    Dimensions,
}

/// Capability that turns raw image bytes into the canonical tile sequence:
/// exactly `grid.tile_count()` tiles in row-major order, tile `i` tagged
/// with `original_index == i`.
///
/// Injected into [`crate::Board`] construction so the engine stays free of
/// codec concerns and tests can substitute a stub.
pub trait TileSlicer {
    fn slice(&self, image: &[u8], grid: GridSize) -> Result<Vec<Tile>, SliceError>;
}
