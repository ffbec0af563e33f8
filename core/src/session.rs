use crate::board::Board;
use crate::grid::GridSize;
use crate::slicer::{SliceError, TileSlicer};
use crate::source::{ImageSource, pick_random};

/// Result of completing a drag gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    /// No pending drag, no board, locked board, or dropped on the source
    /// slot. Nothing was counted.
    Ignored,
    Swapped { move_count: u32 },
    /// The drop solved the puzzle; the board is now locked. Carries the
    /// final move count.
    Solved { move_count: u32 },
}

/// Result of asking for a new random puzzle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NewGameOutcome {
    /// A fresh image was picked and a new board dealt.
    Loaded,
    /// No image available; the existing board was reshuffled instead.
    Reshuffled,
    /// No image available and no board to fall back on.
    NoImages,
}

/// Renderable descriptor for one slot, in slot order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileView<'a> {
    pub slot: usize,
    pub content: &'a [u8],
    pub is_correct: bool,
}

/// One player-facing game session: the active board (absent until a first
/// image arrives), the selected grid size, and the pending drag source.
///
/// Single-writer by construction: the host's event dispatch calls into the
/// session one gesture at a time, so no internal synchronization exists.
pub struct GameSession {
    board: Option<Board>,
    grid: GridSize,
    drag_from: Option<usize>,
}

impl GameSession {
    pub fn new(grid: GridSize) -> Self {
        Self {
            board: None,
            grid,
            drag_from: None,
        }
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    /// Selects the grid for the next deal. The active board keeps its own
    /// size until `restart`, `load_image` or `new_random` rebuilds it.
    pub fn set_grid(&mut self, grid: GridSize) {
        self.grid = grid;
    }

    /// Records the drag source. Rejected while locked or before the first
    /// board, matching the dimmed, inert tiles of a finished puzzle.
    pub fn begin_drag(&mut self, slot: usize) -> bool {
        let Some(board) = self.board.as_ref() else {
            return false;
        };
        if board.locked() {
            return false;
        }
        self.drag_from = Some(slot);
        true
    }

    pub fn cancel_drag(&mut self) {
        self.drag_from = None;
    }

    pub fn drag_from(&self) -> Option<usize> {
        self.drag_from
    }

    /// Completes the gesture: swaps the pending source with `slot`, then
    /// re-evaluates the win predicate. Locks the board on the first
    /// false-to-true transition. The pending source is cleared whether or
    /// not the drop counted.
    pub fn drop_on(&mut self, slot: usize) -> DropOutcome {
        let Some(from) = self.drag_from.take() else {
            return DropOutcome::Ignored;
        };
        let Some(board) = self.board.as_mut() else {
            return DropOutcome::Ignored;
        };
        if !board.swap(from, slot) {
            return DropOutcome::Ignored;
        }
        if board.is_solved() {
            board.lock();
            DropOutcome::Solved {
                move_count: board.move_count(),
            }
        } else {
            DropOutcome::Swapped {
                move_count: board.move_count(),
            }
        }
    }

    /// Deals a new board from `image` at the selected grid. All-or-nothing:
    /// on error the previous board, if any, survives unchanged.
    pub fn load_image(
        &mut self,
        slicer: &dyn TileSlicer,
        image: Vec<u8>,
    ) -> Result<(), SliceError> {
        let board = Board::new(slicer, image, self.grid)?;
        self.board = Some(board);
        self.drag_from = None;
        Ok(())
    }

    /// Restart with the stored image. `Ok(false)` when no board exists yet.
    /// Applies a grid change made since the last deal.
    pub fn restart(&mut self, slicer: &dyn TileSlicer) -> Result<bool, SliceError> {
        self.drag_from = None;
        let Some(board) = self.board.as_mut() else {
            return Ok(false);
        };
        if board.grid() == self.grid {
            board.rebuild(slicer)?;
            return Ok(true);
        }
        let rebuilt = Board::new(slicer, board.source_image().to_vec(), self.grid)?;
        self.board = Some(rebuilt);
        Ok(true)
    }

    /// "New random puzzle": pick an image from `source`; with none
    /// available, fall back to reshuffling the current board.
    pub fn new_random(
        &mut self,
        slicer: &dyn TileSlicer,
        source: &dyn ImageSource,
    ) -> Result<NewGameOutcome, SliceError> {
        match pick_random(source) {
            Some(bytes) => {
                self.load_image(slicer, bytes)?;
                Ok(NewGameOutcome::Loaded)
            }
            None => {
                self.drag_from = None;
                match self.board.as_mut() {
                    Some(board) => {
                        board.reshuffle();
                        Ok(NewGameOutcome::Reshuffled)
                    }
                    None => Ok(NewGameOutcome::NoImages),
                }
            }
        }
    }

    /// Slot-ordered render descriptors; empty before the first board.
    pub fn tile_views(&self) -> Vec<TileView<'_>> {
        let Some(board) = self.board.as_ref() else {
            return Vec::new();
        };
        board
            .tiles()
            .iter()
            .enumerate()
            .map(|(slot, tile)| TileView {
                slot,
                content: tile.content(),
                is_correct: tile.original_index() == slot,
            })
            .collect()
    }

    pub fn move_count(&self) -> u32 {
        self.board.as_ref().map_or(0, Board::move_count)
    }

    pub fn locked(&self) -> bool {
        self.board.as_ref().is_some_and(Board::locked)
    }

    pub fn is_solved(&self) -> bool {
        self.board.as_ref().is_some_and(Board::is_solved)
    }
}
