pub mod camera;
pub mod driver;
pub mod engine;
pub mod mask;
pub mod region;
pub mod rle;
pub mod rules;
pub mod scene;
pub mod screen;

mod parse_util;

/// Pixel coordinate on the screen. Wide enough that off-screen values can be represented and
/// rejected.
pub type Coord = u16;

pub use driver::Driver;
pub use engine::StepSummary;
pub use engine::Stepper;
pub use region::Region;
pub use region::ScreenRegion;
pub use screen::Bitmap;
