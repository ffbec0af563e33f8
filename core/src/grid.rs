/// Side length of the square logical canvas every source image is resized
/// onto before slicing.
pub const CANVAS_SIZE: u32 = 400;

pub const GRID_MIN: u32 = 2;
pub const GRID_MAX: u32 = 4;

/// Validated grid dimension N for an N x N board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSize(u32);

impl GridSize {
    /// `None` outside `[GRID_MIN, GRID_MAX]`; out-of-range sizes come from
    /// host bugs and are never clamped.
    pub fn new(n: u32) -> Option<Self> {
        (GRID_MIN..=GRID_MAX).contains(&n).then_some(Self(n))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn tile_count(self) -> usize {
        (self.0 * self.0) as usize
    }

    /// Tile side on the default canvas. Integer division: remainder pixels
    /// at the right/bottom edge belong to no tile.
    pub fn piece_size(self) -> u32 {
        CANVAS_SIZE / self.0
    }

    /// Row-major slot index.
    pub fn slot(self, row: u32, col: u32) -> usize {
        (row * self.0 + col) as usize
    }

    pub fn row_col(self, slot: usize) -> (u32, u32) {
        let slot = slot as u32;
        (slot / self.0, slot % self.0)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self(GRID_MIN)
    }
}
