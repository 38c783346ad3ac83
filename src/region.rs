use std::fmt;

use thiserror::Error;

use crate::Coord;
use crate::screen::Bitmap;
use crate::screen::HEIGHT;
use crate::screen::WIDTH;

/// Side length of the square region the demo evaluates.
pub const REGION_SIZE: usize = 100;

/// The `REGION_SIZE` square centered on the screen.
pub type ScreenRegion = Region<REGION_SIZE, REGION_SIZE>;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RegionError {
    #[error("A {w}x{h} region at ({x}, {y}) does not fit on the bitmap")]
    OutOfBitmap { x: Coord, y: Coord, w: usize, h: usize },
}

/// A `W`x`H` window onto the bitmap. Only cells inside it are ever evaluated; everything outside
/// is dead as far as the engine is concerned.
///
/// Since the size is part of the type, anything sized to the region (like the
/// [`LivenessMask`](crate::mask::LivenessMask)) is a plain fixed-size array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region<const W: usize, const H: usize> {
    x: Coord,
    y: Coord,
}

impl<const W: usize, const H: usize> Region<W, H> {
    const FITS: () = assert!(
        W > 0 && H > 0 && W <= WIDTH && H <= HEIGHT,
        "region must be non-empty and no larger than the bitmap"
    );

    /// The region centered on the bitmap.
    pub const fn centered() -> Self {
        let () = Self::FITS;

        Self {
            x: ((WIDTH - W) / 2) as Coord,
            y: ((HEIGHT - H) / 2) as Coord,
        }
    }

    /// A region with its top left corner at `(x, y)`.
    pub const fn at(x: Coord, y: Coord) -> Result<Self, RegionError> {
        let () = Self::FITS;

        if x as usize + W > WIDTH || y as usize + H > HEIGHT {
            return Err(RegionError::OutOfBitmap { x, y, w: W, h: H });
        }

        Ok(Self { x, y })
    }

    /// Screen coordinates of the top left corner
    pub const fn origin(&self) -> (Coord, Coord) {
        (self.x, self.y)
    }

    pub const fn width(&self) -> usize {
        W
    }

    pub const fn height(&self) -> usize {
        H
    }

    /// Converts region-local coordinates to screen coordinates.
    #[inline]
    pub const fn to_screen(&self, rx: usize, ry: usize) -> (Coord, Coord) {
        debug_assert!(rx < W && ry < H);

        (self.x + rx as Coord, self.y + ry as Coord)
    }

    /// Converts screen coordinates to region-local ones, if they fall inside the region.
    pub fn to_local(&self, x: Coord, y: Coord) -> Option<(usize, usize)> {
        let rx = x.checked_sub(self.x)? as usize;
        let ry = y.checked_sub(self.y)? as usize;

        (rx < W && ry < H).then_some((rx, ry))
    }

    /// Whether the screen pixel at `(x, y)` lies inside the region.
    pub fn contains(&self, x: Coord, y: Coord) -> bool {
        self.to_local(x, y).is_some()
    }

    /// Reads a cell using region-local coordinates.
    #[inline]
    pub fn get(&self, bitmap: &Bitmap, rx: usize, ry: usize) -> bool {
        let (x, y) = self.to_screen(rx, ry);

        bitmap.get(x, y)
    }

    /// Number of live cells inside the region
    pub fn population(&self, bitmap: &Bitmap) -> usize {
        let mut n = 0;

        for ry in 0..H {
            for rx in 0..W {
                n += self.get(bitmap, rx, ry) as usize;
            }
        }

        n
    }

    /// Borrow a printable view of this region of `bitmap`.
    pub fn view<'a>(&self, bitmap: &'a Bitmap) -> RegionView<'a, W, H> {
        RegionView {
            region: *self,
            bitmap,
        }
    }
}

impl<const W: usize, const H: usize> Default for Region<W, H> {
    fn default() -> Self {
        Self::centered()
    }
}

/// Renders a region as rows of `#` (alive) and `.` (dead).
pub struct RegionView<'a, const W: usize, const H: usize> {
    region: Region<W, H>,
    bitmap: &'a Bitmap,
}

impl<const W: usize, const H: usize> fmt::Display for RegionView<'_, W, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ry in 0..H {
            if ry > 0 {
                writeln!(f)?;
            }

            for rx in 0..W {
                let c = if self.region.get(self.bitmap, rx, ry) {
                    '#'
                } else {
                    '.'
                };

                write!(f, "{c}")?;
            }
        }

        Ok(())
    }
}
