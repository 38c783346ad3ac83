use tracing::trace;

use crate::region::Region;
use crate::screen::Bitmap;

/// Flags every cell of a `W`x`H` region that could change state in the coming generation.
///
/// A cell is marked iff it, or one of its up to 8 neighbours inside the region, is alive in the
/// snapshot the mask was built from. Any unmarked cell is dead with no live neighbours, so under
/// a rule without birth on 0 it stays dead and can be skipped.
///
/// Nothing carries over between generations: [`LivenessMask::rebuild`] starts from a clear mask
/// every time.
#[derive(Clone, PartialEq, Eq)]
pub struct LivenessMask<const W: usize, const H: usize> {
    cells: [[bool; W]; H],
}

impl<const W: usize, const H: usize> Default for LivenessMask<W, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize, const H: usize> LivenessMask<W, H> {
    /// An empty mask
    pub const fn new() -> Self {
        Self {
            cells: [[false; W]; H],
        }
    }

    /// Unmark every cell
    pub fn clear(&mut self) {
        for row in &mut self.cells {
            row.fill(false);
        }
    }

    /// Recomputes the mask from `snapshot`. Live cells outside `region` mark nothing.
    pub fn rebuild(&mut self, snapshot: &Bitmap, region: &Region<W, H>) {
        self.clear();

        for ry in 0..H {
            for rx in 0..W {
                if region.get(snapshot, rx, ry) {
                    self.mark_neighbourhood(rx, ry);
                }
            }
        }

        trace!(marked = self.count(), "Liveness mask rebuilt");
    }

    /// Marks `(rx, ry)` and its neighbours, clipped to the region.
    fn mark_neighbourhood(&mut self, rx: usize, ry: usize) {
        let xs = rx.saturating_sub(1)..=(rx + 1).min(W - 1);
        let ys = ry.saturating_sub(1)..=(ry + 1).min(H - 1);

        for row in &mut self.cells[ys] {
            row[xs.clone()].fill(true);
        }
    }

    /// Whether the region-local cell `(rx, ry)` needs evaluating
    #[inline]
    pub fn is_marked(&self, rx: usize, ry: usize) -> bool {
        self.cells[ry][rx]
    }

    /// Number of marked cells
    pub fn count(&self) -> usize {
        self.cells
            .iter()
            .map(|row| row.iter().filter(|&&m| m).count())
            .sum()
    }

    /// Region-local coordinates of every marked cell, row by row
    pub fn iter_marked(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().enumerate().flat_map(|(ry, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &m)| m)
                .map(move |(rx, _)| (rx, ry))
        })
    }
}

impl<const W: usize, const H: usize> std::fmt::Debug for LivenessMask<W, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.cells {
            for &m in row {
                write!(f, "{}", if m { 'x' } else { '.' })?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
