//! Start-up patterns. Everything here only ever writes through [`Bitmap::set`].

use tracing::debug;
use tracing::warn;

use crate::Coord;
use crate::region::Region;
use crate::rle;
use crate::rle::RleError;
use crate::rules::RuleSet;
use crate::screen::Bitmap;
use crate::screen::HEIGHT;
use crate::screen::WIDTH;

/// Radius of the circle in the [`classic`] scene
pub const CIRCLE_RADIUS: i32 = 10;

/// Sets a pixel given signed coordinates. Anything off the bitmap is dropped.
fn plot(bitmap: &mut Bitmap, x: i32, y: i32) {
    let (Ok(x), Ok(y)) = (Coord::try_from(x), Coord::try_from(y)) else {
        return;
    };

    bitmap.set(x, y, true);
}

/// Outlines the region with live cells.
pub fn draw_border<const W: usize, const H: usize>(bitmap: &mut Bitmap, region: &Region<W, H>) {
    for rx in 0..W {
        let (x, top) = region.to_screen(rx, 0);
        let (_, bottom) = region.to_screen(rx, H - 1);

        bitmap.set(x, top, true);
        bitmap.set(x, bottom, true);
    }

    for ry in 0..H {
        let (left, y) = region.to_screen(0, ry);
        let (right, _) = region.to_screen(W - 1, ry);

        bitmap.set(left, y, true);
        bitmap.set(right, y, true);
    }
}

/// Draws the outline of a circle with the midpoint algorithm, one octant at a time.
pub fn draw_circle(bitmap: &mut Bitmap, cx: i32, cy: i32, radius: i32) {
    let (mut x, mut y) = (radius, 0);
    let mut err = 0;

    while x >= y {
        for (dx, dy) in [
            (x, y),
            (y, x),
            (-y, x),
            (-x, y),
            (-x, -y),
            (-y, -x),
            (y, -x),
            (x, -y),
        ] {
            plot(bitmap, cx + dx, cy + dy);
        }

        y += 1;
        err += 1 + 2 * y;

        if 2 * (err - x) + 1 > 0 {
            x -= 1;
            err += 1 - 2 * x;
        }
    }
}

/// The default start: a clear screen, a border around the region, and a circle in the middle of
/// the screen.
pub fn classic<const W: usize, const H: usize>(bitmap: &mut Bitmap, region: &Region<W, H>) {
    bitmap.clear();

    draw_border(bitmap, region);
    draw_circle(
        bitmap,
        WIDTH as i32 / 2,
        HEIGHT as i32 / 2,
        CIRCLE_RADIUS,
    );

    debug!(population = bitmap.population(), "Drew classic scene");
}

/// Stamps an RLE pattern with its top left corner at `(x, y)`. Cells landing off the bitmap are
/// dropped.
///
/// Returns the rule the file asks for, if any.
pub fn stamp_rle(
    bitmap: &mut Bitmap,
    x: Coord,
    y: Coord,
    bytes: &[u8],
) -> Result<Option<RuleSet>, RleError> {
    let file = rle::read_rle(bytes, |px, py| {
        let px = (x as usize).saturating_add(px);
        let py = (y as usize).saturating_add(py);

        let (Ok(px), Ok(py)) = (Coord::try_from(px), Coord::try_from(py)) else {
            return;
        };

        bitmap.set(px, py, true);
    })?;

    Ok(stamped(file))
}

/// Stamps an RLE pattern in the middle of `region`, centered on the extent of its live cells.
///
/// Cells that would land outside `region` are dropped: the engine never evaluates them, so they
/// would sit on the bitmap unchanged forever.
pub fn stamp_rle_centered<const W: usize, const H: usize>(
    bitmap: &mut Bitmap,
    region: &Region<W, H>,
    bytes: &[u8],
) -> Result<Option<RuleSet>, RleError> {
    let mut size: (usize, usize) = (0, 0);
    rle::read_rle(bytes, |x, y| {
        size = (size.0.max(x + 1), size.1.max(y + 1));
    })?;

    let ox = W.saturating_sub(size.0) / 2;
    let oy = H.saturating_sub(size.1) / 2;

    let mut clipped = 0;
    let file = rle::read_rle(bytes, |x, y| {
        let (rx, ry) = (ox + x, oy + y);

        if rx < W && ry < H {
            let (x, y) = region.to_screen(rx, ry);
            bitmap.set(x, y, true);
        } else {
            clipped += 1;
        }
    })?;

    if clipped > 0 {
        warn!(clipped, width = size.0, height = size.1, "Pattern does not fit the region");
    }

    Ok(stamped(file))
}

fn stamped(file: rle::RleFile<'_>) -> Option<RuleSet> {
    if let Some(name) = file.name {
        debug!(name = %String::from_utf8_lossy(name), "Stamped RLE pattern");
    }

    file.rule
}
