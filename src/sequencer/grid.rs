/// Number of steps in one full cycle (4 beats of 16th notes)
pub const STEPS: usize = 16;
/// Playable slicer tracks
pub const SLICERS: usize = 5;
/// Grid rows: one indicator row on top plus one row per slicer
pub const ROWS: usize = SLICERS + 1;
/// The top row only visualizes the playhead and never fires
pub const INDICATOR_ROW: usize = 0;

/// Probability that randomize() switches a cell on
pub const RANDOM_DENSITY: f32 = 0.15;

/// The step pattern: which slicer fires on which step.
///
/// Row 0 is the indicator row; it carries no playback state and every
/// mutation skips it, so it can never be treated as a track.
#[derive(Clone, Debug)]
pub struct StepGrid {
    /// cells[row][step]
    cells: [[bool; STEPS]; ROWS],
}

impl StepGrid {
    pub fn new() -> Self {
        Self {
            cells: [[false; STEPS]; ROWS],
        }
    }

    /// Grid row for a slicer index
    pub fn slicer_row(slicer: usize) -> usize {
        slicer + 1
    }

    /// Toggle a cell. No-op on the indicator row or out of bounds.
    /// Returns the new state of the cell.
    pub fn toggle(&mut self, row: usize, step: usize) -> bool {
        if row == INDICATOR_ROW || row >= ROWS || step >= STEPS {
            return false;
        }
        self.cells[row][step] = !self.cells[row][step];
        self.cells[row][step]
    }

    pub fn is_active(&self, row: usize, step: usize) -> bool {
        if row < ROWS && step < STEPS {
            self.cells[row][step]
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.cells = [[false; STEPS]; ROWS];
    }

    /// Re-roll every playable cell, each active with RANDOM_DENSITY probability
    pub fn randomize(&mut self, rng: &mut fastrand::Rng) {
        for row in (INDICATOR_ROW + 1)..ROWS {
            for step in 0..STEPS {
                self.cells[row][step] = rng.f32() > 1.0 - RANDOM_DENSITY;
            }
        }
    }

    pub fn active_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&active| active)
            .count()
    }
}

impl Default for StepGrid {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_and_clear() {
        let mut grid = StepGrid::new();
        assert!(grid.toggle(1, 0));
        assert!(grid.is_active(1, 0));
        assert!(!grid.toggle(1, 0));
        assert!(!grid.is_active(1, 0));

        grid.toggle(5, 15);
        grid.toggle(2, 7);
        grid.clear();
        for row in 0..ROWS {
            for step in 0..STEPS {
                assert!(!grid.is_active(row, step));
            }
        }
    }

    #[test]
    fn test_indicator_row_is_inert() {
        let mut grid = StepGrid::new();
        assert!(!grid.toggle(INDICATOR_ROW, 3));
        assert!(!grid.is_active(INDICATOR_ROW, 3));
        assert_eq!(grid.active_count(), 0);
    }

    #[test]
    fn test_out_of_bounds_is_noop() {
        let mut grid = StepGrid::new();
        assert!(!grid.toggle(ROWS, 0));
        assert!(!grid.toggle(1, STEPS));
        assert!(!grid.is_active(ROWS, 0));
        assert_eq!(grid.active_count(), 0);
    }

    #[test]
    fn test_randomize_never_touches_indicator_row() {
        let mut rng = fastrand::Rng::with_seed(7);
        let mut grid = StepGrid::new();
        for _ in 0..100 {
            grid.randomize(&mut rng);
            for step in 0..STEPS {
                assert!(!grid.is_active(INDICATOR_ROW, step));
            }
        }
    }

    #[test]
    fn test_randomize_density() {
        let mut rng = fastrand::Rng::with_seed(42);
        let mut grid = StepGrid::new();

        let iterations = 1000;
        let mut active = 0usize;
        for _ in 0..iterations {
            grid.randomize(&mut rng);
            active += grid.active_count();
        }

        let cells = (iterations * SLICERS * STEPS) as f32;
        let fraction = active as f32 / cells;
        assert!(
            (fraction - RANDOM_DENSITY).abs() < 0.02,
            "observed density {} too far from {}",
            fraction,
            RANDOM_DENSITY
        );
    }
}
