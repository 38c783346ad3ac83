use thiserror::Error;

use crate::Coord;

/// Width of the display bitmap, in pixels.
pub const WIDTH: usize = 256;

/// Height of the display bitmap, in pixels.
pub const HEIGHT: usize = 192;

/// One bit per pixel, eight pixels per byte.
pub const SCREEN_SIZE: usize = WIDTH / 8 * HEIGHT;

/// Location of a single pixel inside a [`Bitmap`]'s bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelAddress {
    /// Byte offset from the start of the buffer
    pub offset: usize,

    /// Single bit selecting the pixel within the byte. The leftmost pixel is the most significant
    /// bit.
    pub mask: u8,
}

/// Maps a pixel to its byte and bit in the interleaved display layout.
///
/// The 16-bit offset is built from the bits of `y` and `x` like so:
/// ```notrust
///  y7 y6 | y2 y1 y0 | y5 y4 y3 | x7 x6 x5 x4 x3
///  third | scanline | char row |  byte column
/// ```
///
/// So consecutive scanlines of one character row are 256 bytes apart, and each third of the
/// screen occupies a contiguous 2K block.
///
/// No bounds checking happens here. Callers must keep `x < WIDTH` and `y < HEIGHT`, otherwise the
/// result points at an unrelated pixel (or past the end of the buffer).
#[inline]
pub const fn pixel_address(x: Coord, y: Coord) -> PixelAddress {
    let (x, y) = (x as usize, y as usize);

    let offset = ((y & 0xC0) << 5) | ((y & 0x07) << 8) | ((y & 0x38) << 2) | (x >> 3);
    let mask = 0x80 >> (x & 0x07);

    PixelAddress { offset, mask }
}

/// Whether `(x, y)` lies on the bitmap. Coordinates are unsigned, so anything that wrapped below
/// zero is out of bounds too.
#[inline]
pub const fn in_bounds(x: Coord, y: Coord) -> bool {
    (x as usize) < WIDTH && (y as usize) < HEIGHT
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Pixel ({x}, {y}) is outside the 256x192 bitmap")]
pub struct OutOfBounds {
    pub x: Coord,
    pub y: Coord,
}

/// Reads a pixel straight out of a raw screen buffer. Out of bounds pixels are dead.
#[inline]
pub fn get(buf: &[u8; SCREEN_SIZE], x: Coord, y: Coord) -> bool {
    if !in_bounds(x, y) {
        return false;
    }

    let PixelAddress { offset, mask } = pixel_address(x, y);

    buf[offset] & mask != 0
}

/// Sets or clears a pixel in a raw screen buffer. Out of bounds writes are dropped.
#[inline]
pub fn set(buf: &mut [u8; SCREEN_SIZE], x: Coord, y: Coord, value: bool) {
    if !in_bounds(x, y) {
        return;
    }

    let PixelAddress { offset, mask } = pixel_address(x, y);

    if value {
        buf[offset] |= mask;
    } else {
        buf[offset] &= !mask;
    }
}

/// A monochrome, bit-packed display buffer in the interleaved layout of [`pixel_address`].
///
/// Anything reading the raw bytes (see [`Bitmap::as_bytes`]) must apply the same translation to
/// make sense of them.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    bytes: [u8; SCREEN_SIZE],
}

impl Default for Bitmap {
    fn default() -> Self {
        Self::new()
    }
}

impl Bitmap {
    /// An all-dead bitmap
    pub const fn new() -> Self {
        Self {
            bytes: [0; SCREEN_SIZE],
        }
    }

    pub const fn from_bytes(bytes: [u8; SCREEN_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; SCREEN_SIZE] {
        &self.bytes
    }

    /// State of the pixel at `(x, y)`. Out of bounds pixels read as dead.
    #[inline]
    pub fn get(&self, x: Coord, y: Coord) -> bool {
        get(&self.bytes, x, y)
    }

    /// Sets the pixel at `(x, y)`. Out of bounds writes are silently ignored.
    #[inline]
    pub fn set(&mut self, x: Coord, y: Coord, value: bool) {
        set(&mut self.bytes, x, y, value)
    }

    /// Like [`Bitmap::get`], but reports out of bounds coordinates instead of reading them as dead.
    pub fn try_get(&self, x: Coord, y: Coord) -> Result<bool, OutOfBounds> {
        if !in_bounds(x, y) {
            return Err(OutOfBounds { x, y });
        }

        Ok(self.get(x, y))
    }

    /// Like [`Bitmap::set`], but reports out of bounds coordinates instead of dropping the write.
    pub fn try_set(&mut self, x: Coord, y: Coord, value: bool) -> Result<(), OutOfBounds> {
        if !in_bounds(x, y) {
            return Err(OutOfBounds { x, y });
        }

        self.set(x, y, value);

        Ok(())
    }

    /// Overwrites this bitmap with `other`, byte for byte.
    pub fn copy_from(&mut self, other: &Bitmap) {
        self.bytes.copy_from_slice(&other.bytes);
    }

    /// Kill every pixel
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    /// Number of live pixels on the whole bitmap
    pub fn population(&self) -> usize {
        self.bytes.iter().map(|b| b.count_ones() as usize).sum()
    }
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("population", &self.population())
            .finish_non_exhaustive()
    }
}
