use std::ops::ControlFlow;

use tracing::info;

use crate::engine::Stepper;
use crate::screen::Bitmap;

/// Runs generations back to back.
///
/// The driver owns the stepper (and with it the snapshot and the mask) but not the live bitmap,
/// which stays with whoever displays it.
pub struct Driver<const W: usize, const H: usize> {
    stepper: Stepper<W, H>,
}

impl<const W: usize, const H: usize> Driver<W, H> {
    pub fn new(stepper: Stepper<W, H>) -> Self {
        Self { stepper }
    }

    pub fn stepper(&self) -> &Stepper<W, H> {
        &self.stepper
    }

    /// Steps `live` forever. There is no exit: the process has to be stopped from outside.
    pub fn run(&mut self, live: &mut Bitmap) -> ! {
        info!(population = live.population(), "Starting simulation");

        loop {
            self.stepper.step(live);
        }
    }

    /// Steps `live` forever, handing it to `between` after every generation. Nothing touches
    /// `live` while `between` runs, so this is where rendering and input belong.
    ///
    /// Only `between` can stop the loop, by returning [`ControlFlow::Break`].
    pub fn run_with<B, F>(&mut self, live: &mut Bitmap, mut between: F) -> B
    where
        F: FnMut(&Bitmap) -> ControlFlow<B>,
    {
        info!(population = live.population(), "Starting simulation");

        loop {
            self.stepper.step(live);

            if let ControlFlow::Break(b) = between(live) {
                return b;
            }
        }
    }

    /// Steps `live` exactly `n` times.
    pub fn advance(&mut self, live: &mut Bitmap, n: usize) {
        for _ in 0..n {
            self.stepper.step(live);
        }
    }
}
