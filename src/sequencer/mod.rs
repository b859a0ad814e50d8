pub mod clock;
pub mod dispatch;
pub mod grid;
pub mod slicer;

pub use clock::{Clock, DEFAULT_BPM, MAX_BPM, MIN_BPM};
pub use dispatch::{slice_window, step_triggers, Trigger};
pub use grid::{StepGrid, INDICATOR_ROW, ROWS, SLICERS, STEPS};
pub use slicer::{SliceBank, SliceParams, DEFAULT_DURATION_MS, MIN_DURATION_MS};
