use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;

/// Extensions the asset scan accepts, compared case-insensitively.
pub const VALID_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "webp", "bmp"];

/// Supplier of candidate puzzle images. Implemented over a directory here
/// and over in-memory fixtures in tests.
pub trait ImageSource {
    /// Candidate names the source can fetch.
    fn list(&self) -> Vec<String>;

    fn fetch(&self, name: &str) -> io::Result<Vec<u8>>;
}

/// Uniformly picks one candidate and fetches its bytes. `None` when the
/// source is empty or the chosen candidate cannot be read; the caller
/// treats that as the defined "no images available" state, not an error.
pub fn pick_random(source: &dyn ImageSource) -> Option<Vec<u8>> {
    let candidates = source.list();
    let name = candidates.choose(&mut rand::thread_rng())?;
    source.fetch(name).ok()
}

/// Non-recursive scan of a single assets directory, filtered by
/// [`VALID_EXTENSIONS`]. A missing directory lists nothing.
pub struct DirImageSource {
    dir: PathBuf,
}

impl DirImageSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ImageSource for DirImageSource {
    fn list(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .flatten()
            .filter(|entry| entry.path().is_file() && has_valid_extension(&entry.path()))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        names.sort();
        names
    }

    fn fetch(&self, name: &str) -> io::Result<Vec<u8>> {
        fs::read(self.dir.join(name))
    }
}

fn has_valid_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| VALID_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}
