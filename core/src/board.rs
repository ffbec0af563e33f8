use rand::seq::SliceRandom;

use crate::grid::GridSize;
use crate::slicer::{SliceError, TileSlicer};
use crate::tile::Tile;

/// The full mutable puzzle state for one game: current tile arrangement,
/// move count, lock flag and the source image it was sliced from.
///
/// `positions` always holds exactly `grid.tile_count()` tiles whose
/// `original_index` values are `{0, ..., N^2 - 1}` with no duplicates.
#[derive(Clone, Debug)]
pub struct Board {
    grid: GridSize,
    positions: Vec<Tile>,
    move_count: u32,
    locked: bool,
    source_image: Vec<u8>,
}

impl Board {
    /// Slices `image` and deals a uniformly shuffled board. Every
    /// permutation is equally likely, the already-solved deal included.
    pub fn new(
        slicer: &dyn TileSlicer,
        image: Vec<u8>,
        grid: GridSize,
    ) -> Result<Self, SliceError> {
        let mut positions = slicer.slice(&image, grid)?;
        positions.shuffle(&mut rand::thread_rng());
        Ok(Self {
            grid,
            positions,
            move_count: 0,
            locked: false,
            source_image: image,
        })
    }

    /// Restart: re-slice the stored image at the current grid, deal a fresh
    /// shuffle, reset the counter and the lock. Slices into a temporary
    /// first so a failure leaves the current layout untouched.
    pub fn rebuild(&mut self, slicer: &dyn TileSlicer) -> Result<(), SliceError> {
        let mut positions = slicer.slice(&self.source_image, self.grid)?;
        positions.shuffle(&mut rand::thread_rng());
        self.positions = positions;
        self.move_count = 0;
        self.locked = false;
        Ok(())
    }

    /// Fallback for "new puzzle" when no image is available: shuffle the
    /// existing tiles in place and reset progress.
    pub fn reshuffle(&mut self) {
        self.positions.shuffle(&mut rand::thread_rng());
        self.move_count = 0;
        self.locked = false;
    }

    /// The only gameplay mutation: exchange the tiles at two slots.
    ///
    /// Returns `true` when a move was counted. Locked boards and
    /// `from == to` are silent no-ops. Out-of-range slots are a host
    /// contract violation and panic.
    pub fn swap(&mut self, from: usize, to: usize) -> bool {
        let count = self.positions.len();
        assert!(from < count && to < count, "slot out of range: {from} -> {to}");
        if self.locked || from == to {
            return false;
        }
        self.positions.swap(from, to);
        self.move_count += 1;
        true
    }

    /// Pure win predicate: every tile sits in its original slot.
    pub fn is_solved(&self) -> bool {
        self.positions
            .iter()
            .enumerate()
            .all(|(slot, tile)| tile.original_index() == slot)
    }

    /// Freezes gameplay. Called by the session on the solved transition;
    /// only `rebuild` or a new board clears it.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    /// Current arrangement, index = slot.
    pub fn tiles(&self) -> &[Tile] {
        &self.positions
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn locked(&self) -> bool {
        self.locked
    }

    /// Retained so the board can be rebuilt without re-sourcing the image.
    pub fn source_image(&self) -> &[u8] {
        &self.source_image
    }
}
