use tracing::debug;
use tracing::trace_span;

use crate::Coord;
use crate::mask::LivenessMask;
use crate::region::Region;
use crate::rules::RuleSet;
use crate::screen::Bitmap;

/// What a single generation did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepSummary {
    /// Cells the transition rule was applied to
    pub evaluated: usize,

    /// Dead cells that came alive
    pub births: usize,

    /// Live cells that died
    pub deaths: usize,
}

/// Advances the live bitmap one generation at a time, inside a fixed region.
///
/// Each generation runs in three phases:
/// 1. the whole live bitmap is copied into the snapshot,
/// 2. the liveness mask is rebuilt from the snapshot,
/// 3. every marked cell is evaluated against the snapshot and written back to the live bitmap.
///
/// The snapshot is owned here and is the only thing phase 3 reads, so every cell sees the same
/// previous generation no matter how many writes have already landed.
pub struct Stepper<const W: usize, const H: usize> {
    region: Region<W, H>,
    rules: RuleSet,
    snapshot: Bitmap,
    mask: LivenessMask<W, H>,
}

impl<const W: usize, const H: usize> Stepper<W, H> {
    /// A stepper running Conway's Game of Life over `region`
    pub fn new(region: Region<W, H>) -> Self {
        Self::with_rules(region, RuleSet::default())
    }

    pub fn with_rules(region: Region<W, H>, rules: RuleSet) -> Self {
        Self {
            region,
            rules,
            snapshot: Bitmap::new(),
            mask: LivenessMask::new(),
        }
    }

    pub fn region(&self) -> &Region<W, H> {
        &self.region
    }

    pub fn rules(&self) -> RuleSet {
        self.rules
    }

    /// The previous generation, as captured by the last step
    pub fn snapshot(&self) -> &Bitmap {
        &self.snapshot
    }

    /// The liveness mask of the last generation, whichever step ran it
    pub fn mask(&self) -> &LivenessMask<W, H> {
        &self.mask
    }

    /// Advance `live` by one generation, only evaluating cells flagged by the liveness mask.
    pub fn step(&mut self, live: &mut Bitmap) -> StepSummary {
        self.step_inspect(live, |_, _, _, _| {})
    }

    /// Like [`Stepper::step`], but calls `observer` with the snapshot and the cell about to be
    /// written, for every write of the transition phase.
    pub fn step_inspect<F>(&mut self, live: &mut Bitmap, observer: F) -> StepSummary
    where
        F: FnMut(&Bitmap, Coord, Coord, bool),
    {
        let span = trace_span!("generation");
        let _guard = span.enter();

        self.snapshot.copy_from(live);
        self.mask.rebuild(&self.snapshot, &self.region);

        let mask = &self.mask;
        let summary = transition(
            &self.snapshot,
            &self.region,
            self.rules,
            live,
            |rx, ry| mask.is_marked(rx, ry),
            observer,
        );

        debug!(
            evaluated = summary.evaluated,
            births = summary.births,
            deaths = summary.deaths,
            "Generation complete"
        );

        summary
    }

    /// Advance `live` by one generation, evaluating every cell in the region.
    ///
    /// Slower than [`Stepper::step`], and must always produce the same bitmap. The mask is still
    /// rebuilt, so [`Stepper::mask`] describes this generation.
    pub fn step_exhaustive(&mut self, live: &mut Bitmap) -> StepSummary {
        self.snapshot.copy_from(live);
        self.mask.rebuild(&self.snapshot, &self.region);

        transition(
            &self.snapshot,
            &self.region,
            self.rules,
            live,
            |_, _| true,
            |_, _, _, _| {},
        )
    }
}

/// Applies `rules` to every region cell accepted by `filter`, reading only `snapshot` and writing
/// only `live`.
fn transition<const W: usize, const H: usize, P, F>(
    snapshot: &Bitmap,
    region: &Region<W, H>,
    rules: RuleSet,
    live: &mut Bitmap,
    filter: P,
    mut observer: F,
) -> StepSummary
where
    P: Fn(usize, usize) -> bool,
    F: FnMut(&Bitmap, Coord, Coord, bool),
{
    let mut summary = StepSummary::default();

    for ry in 0..H {
        for rx in 0..W {
            if !filter(rx, ry) {
                continue;
            }

            let alive = region.get(snapshot, rx, ry);
            let next = rules.next_state(alive, count_neighbours(snapshot, region, rx, ry));

            let (x, y) = region.to_screen(rx, ry);
            observer(snapshot, x, y, next);
            live.set(x, y, next);

            summary.evaluated += 1;
            match (alive, next) {
                (false, true) => summary.births += 1,
                (true, false) => summary.deaths += 1,
                _ => {}
            }
        }
    }

    summary
}

/// Live cells among the 8 neighbours of region-local `(rx, ry)`.
///
/// Neighbours outside the region count as dead, and the region always lies on the bitmap, so
/// this never samples outside the buffer.
#[inline]
fn count_neighbours<const W: usize, const H: usize>(
    snapshot: &Bitmap,
    region: &Region<W, H>,
    rx: usize,
    ry: usize,
) -> u8 {
    let mut n = 0;

    for ny in ry.saturating_sub(1)..=(ry + 1).min(H - 1) {
        for nx in rx.saturating_sub(1)..=(rx + 1).min(W - 1) {
            if (nx, ny) != (rx, ry) && region.get(snapshot, nx, ny) {
                n += 1;
            }
        }
    }

    n
}
