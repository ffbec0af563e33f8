use std::io::Cursor;

use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbImage};
use img_parts::{Bytes, ImageEXIF};
use mozaiku_core::{CANVAS_SIZE, GridSize, SliceError, Tile, TileSlicer};

/// The engine's slicer: decodes a source image, normalizes its EXIF
/// orientation, squashes it onto a fixed square RGB canvas and cuts the
/// canvas into row-major tiles, each independently encoded as PNG.
pub struct CanvasSlicer {
    canvas_size: u32,
}

impl CanvasSlicer {
    pub fn new(canvas_size: u32) -> Self {
        Self { canvas_size }
    }

    pub fn canvas_size(&self) -> u32 {
        self.canvas_size
    }
}

impl Default for CanvasSlicer {
    fn default() -> Self {
        Self::new(CANVAS_SIZE)
    }
}

impl TileSlicer for CanvasSlicer {
    fn slice(&self, image: &[u8], grid: GridSize) -> Result<Vec<Tile>, SliceError> {
        let canvas = normalize_to_canvas(image, self.canvas_size)?;
        slice_canvas(&canvas, grid)
    }
}

/// Decode, orient and resize onto a `canvas_size` square. Resize, not
/// crop: aspect distortion is accepted in exchange for uniform tile
/// geometry on every source.
pub fn normalize_to_canvas(bytes: &[u8], canvas_size: u32) -> Result<RgbImage, SliceError> {
    if canvas_size == 0 {
        return Err(SliceError::Dimensions);
    }
    let decoded =
        image::load_from_memory(bytes).map_err(|err| SliceError::Decode(err.to_string()))?;
    let rgb = apply_exif_orientation(decoded.to_rgb8(), extract_exif_orientation(bytes));
    Ok(imageops::resize(
        &rgb,
        canvas_size,
        canvas_size,
        FilterType::Lanczos3,
    ))
}

/// Cut an already-normalized canvas into `grid x grid` tiles, row-major,
/// tile (r, c) tagged `r * grid + c`. Piece sides use integer division;
/// remainder pixels at the right/bottom edge fall outside every crop.
pub fn slice_canvas(canvas: &RgbImage, grid: GridSize) -> Result<Vec<Tile>, SliceError> {
    let n = grid.get();
    let piece_w = canvas.width() / n;
    let piece_h = canvas.height() / n;
    if piece_w == 0 || piece_h == 0 {
        return Err(SliceError::Dimensions);
    }

    let mut tiles = Vec::with_capacity(grid.tile_count());
    for row in 0..n {
        for col in 0..n {
            let crop =
                imageops::crop_imm(canvas, col * piece_w, row * piece_h, piece_w, piece_h)
                    .to_image();
            tiles.push(Tile::new(grid.slot(row, col), encode_png(&crop)?));
        }
    }
    Ok(tiles)
}

pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, SliceError> {
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|err| SliceError::Encode(err.to_string()))?;
    Ok(out.into_inner())
}

/// Orientation value from the EXIF payload of a JPEG, PNG or WebP
/// container, when one is present and well-formed.
pub fn extract_exif_orientation(bytes: &[u8]) -> Option<u16> {
    parse_exif_orientation(extract_exif(bytes)?.as_ref())
}

fn extract_exif(bytes: &[u8]) -> Option<Bytes> {
    let data = Bytes::copy_from_slice(bytes);
    if let Ok(jpeg) = img_parts::jpeg::Jpeg::from_bytes(data.clone()) {
        if let Some(exif) = jpeg.exif() {
            return Some(exif);
        }
    }
    if let Ok(png) = img_parts::png::Png::from_bytes(data.clone()) {
        if let Some(exif) = png.exif() {
            return Some(exif);
        }
    }
    if let Ok(webp) = img_parts::webp::WebP::from_bytes(data) {
        if let Some(exif) = webp.exif() {
            return Some(exif);
        }
    }
    None
}

#[derive(Clone, Copy)]
enum Endian {
    Little,
    Big,
}

fn read_u16(data: &[u8], offset: usize, endian: Endian) -> Option<u16> {
    let raw: [u8; 2] = data.get(offset..offset + 2)?.try_into().ok()?;
    Some(match endian {
        Endian::Little => u16::from_le_bytes(raw),
        Endian::Big => u16::from_be_bytes(raw),
    })
}

fn read_u32(data: &[u8], offset: usize, endian: Endian) -> Option<u32> {
    let raw: [u8; 4] = data.get(offset..offset + 4)?.try_into().ok()?;
    Some(match endian {
        Endian::Little => u32::from_le_bytes(raw),
        Endian::Big => u32::from_be_bytes(raw),
    })
}

/// Pulls tag 0x0112 out of the first IFD of a TIFF-wrapped EXIF payload.
fn parse_exif_orientation(exif: &[u8]) -> Option<u16> {
    let tiff = exif.strip_prefix(b"Exif\0\0").unwrap_or(exif);
    let endian = match tiff.get(..2)? {
        b"II" => Endian::Little,
        b"MM" => Endian::Big,
        _ => return None,
    };
    if read_u16(tiff, 2, endian)? != 42 {
        return None;
    }
    let ifd = read_u32(tiff, 4, endian)? as usize;
    let entries = read_u16(tiff, ifd, endian)? as usize;
    for entry in 0..entries {
        let at = ifd + 2 + entry * 12;
        if read_u16(tiff, at, endian)? != 0x0112 {
            continue;
        }
        // SHORT field, value inline in the first two payload bytes
        if read_u16(tiff, at + 2, endian)? != 3 {
            return None;
        }
        let value = read_u16(tiff, at + 8, endian)?;
        return (1..=8).contains(&value).then_some(value);
    }
    None
}

fn apply_exif_orientation(image: RgbImage, orientation: Option<u16>) -> RgbImage {
    match orientation {
        Some(2) => imageops::flip_horizontal(&image),
        Some(3) => imageops::rotate180(&image),
        Some(4) => imageops::flip_vertical(&image),
        Some(5) => imageops::rotate270(&imageops::flip_horizontal(&image)),
        Some(6) => imageops::rotate90(&image),
        Some(7) => imageops::rotate90(&imageops::flip_horizontal(&image)),
        Some(8) => imageops::rotate270(&image),
        _ => image,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const QUADRANT_COLORS: [[u8; 3]; 4] = [
        [255, 0, 0],
        [0, 255, 0],
        [0, 0, 255],
        [255, 255, 0],
    ];

    /// A square painted in four solid quadrant colors, row-major.
    fn quadrant_image(size: u32) -> RgbImage {
        RgbImage::from_fn(size, size, |x, y| {
            let quadrant = match (y < size / 2, x < size / 2) {
                (true, true) => 0,
                (true, false) => 1,
                (false, true) => 2,
                (false, false) => 3,
            };
            Rgb(QUADRANT_COLORS[quadrant])
        })
    }

    fn png_bytes(image: &RgbImage) -> Vec<u8> {
        encode_png(image).expect("encode fixture")
    }

    fn grid(n: u32) -> GridSize {
        GridSize::new(n).expect("grid in range")
    }

    #[test]
    fn slices_canvas_into_tagged_quadrants() {
        let source = png_bytes(&quadrant_image(400));
        let tiles = CanvasSlicer::default()
            .slice(&source, grid(2))
            .expect("slice");

        assert_eq!(tiles.len(), 4);
        for (slot, tile) in tiles.iter().enumerate() {
            assert_eq!(tile.original_index(), slot);
            let decoded = image::load_from_memory(tile.content())
                .expect("tile decodes")
                .to_rgb8();
            assert_eq!(decoded.dimensions(), (200, 200));
            // sample the tile center: resampling only disturbs quadrant borders
            assert_eq!(decoded.get_pixel(100, 100).0, QUADRANT_COLORS[slot]);
        }
    }

    #[test]
    fn odd_sized_source_is_resized_before_slicing() {
        // 401x401 lands on the 400 canvas, so a 2-grid still cuts 200px tiles.
        let source = png_bytes(&quadrant_image(401));
        let tiles = CanvasSlicer::default()
            .slice(&source, grid(2))
            .expect("slice");
        for tile in &tiles {
            let decoded = image::load_from_memory(tile.content())
                .expect("tile decodes")
                .to_rgb8();
            assert_eq!(decoded.dimensions(), (200, 200));
        }
    }

    #[test]
    fn three_grid_drops_the_remainder_pixel() {
        let source = png_bytes(&quadrant_image(64));
        let tiles = CanvasSlicer::default()
            .slice(&source, grid(3))
            .expect("slice");

        assert_eq!(tiles.len(), 9);
        for tile in &tiles {
            let decoded = image::load_from_memory(tile.content())
                .expect("tile decodes")
                .to_rgb8();
            // 400 / 3: the 400th row and column belong to no tile
            assert_eq!(decoded.dimensions(), (133, 133));
        }
    }

    #[test]
    fn crop_rectangles_follow_row_major_order() {
        let canvas = quadrant_image(400);
        let tiles = slice_canvas(&canvas, grid(2)).expect("slice");
        // tile 1 is the crop [200, 0, 400, 200): the top-right quadrant
        let decoded = image::load_from_memory(tiles[1].content())
            .expect("tile decodes")
            .to_rgb8();
        assert_eq!(decoded.get_pixel(0, 0).0, QUADRANT_COLORS[1]);
        assert_eq!(decoded.get_pixel(199, 199).0, QUADRANT_COLORS[1]);
    }

    #[test]
    fn garbage_bytes_fail_with_decode_error() {
        let err = CanvasSlicer::default()
            .slice(b"definitely not an image", GridSize::default())
            .unwrap_err();
        assert!(matches!(err, SliceError::Decode(_)));
    }

    #[test]
    fn degenerate_canvas_sizes_are_rejected() {
        let source = png_bytes(&quadrant_image(8));
        let err = CanvasSlicer::new(0).slice(&source, grid(2)).unwrap_err();
        assert!(matches!(err, SliceError::Dimensions));

        // a 3px canvas cannot host 4 tiles per side
        let err = CanvasSlicer::new(3).slice(&source, grid(4)).unwrap_err();
        assert!(matches!(err, SliceError::Dimensions));
    }

    #[test]
    fn orientation_parses_from_tiff_payload() {
        let mut exif = Vec::new();
        exif.extend_from_slice(b"Exif\0\0");
        exif.extend_from_slice(b"II");
        exif.extend_from_slice(&42u16.to_le_bytes());
        exif.extend_from_slice(&8u32.to_le_bytes()); // first IFD offset
        exif.extend_from_slice(&1u16.to_le_bytes()); // one entry
        exif.extend_from_slice(&0x0112u16.to_le_bytes());
        exif.extend_from_slice(&3u16.to_le_bytes()); // SHORT
        exif.extend_from_slice(&1u32.to_le_bytes()); // count
        exif.extend_from_slice(&6u16.to_le_bytes()); // value
        exif.extend_from_slice(&0u16.to_le_bytes()); // inline padding

        assert_eq!(parse_exif_orientation(&exif), Some(6));
        assert_eq!(parse_exif_orientation(b"junk"), None);
        assert_eq!(parse_exif_orientation(b""), None);
    }

    #[test]
    fn orientation_six_rotates_clockwise() {
        let image = RgbImage::from_fn(2, 1, |x, _| {
            if x == 0 { Rgb([255, 0, 0]) } else { Rgb([0, 0, 255]) }
        });
        let rotated = apply_exif_orientation(image, Some(6));
        assert_eq!(rotated.dimensions(), (1, 2));
        assert_eq!(rotated.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(rotated.get_pixel(0, 1).0, [0, 0, 255]);
    }

    #[test]
    fn missing_orientation_leaves_image_alone() {
        let image = quadrant_image(4);
        let same = apply_exif_orientation(image.clone(), None);
        assert_eq!(same, image);
        let same = apply_exif_orientation(image.clone(), Some(1));
        assert_eq!(same, image);
    }
}
