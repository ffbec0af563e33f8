/// One rectangular crop of the source image, tagged with the slot it
/// belongs in. Immutable once created; boards move tiles around, they
/// never edit them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    original_index: usize,
    content: Vec<u8>,
}

impl Tile {
    pub fn new(original_index: usize, content: Vec<u8>) -> Self {
        Self {
            original_index,
            content,
        }
    }

    /// The slot this tile occupies in the solved layout.
    pub fn original_index(&self) -> usize {
        self.original_index
    }

    /// Encoded raster blob, ready for the host to display.
    pub fn content(&self) -> &[u8] {
        &self.content
    }
}
