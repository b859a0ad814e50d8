mod grid;
mod slicers;
mod waveform;

pub use grid::{render_grid, render_transport, GridCursor};
pub use slicers::render_slicers;
pub use waveform::render_waveform;

use ratatui::style::Color;

/// Colors used across the views
pub struct Palette {
    pub border: Color,
    pub label: Color,
    pub dimmed: Color,
    pub active: Color,
    pub playhead: Color,
    pub cursor: Color,
    pub accent: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            border: Color::DarkGray,
            label: Color::Cyan,
            dimmed: Color::DarkGray,
            active: Color::Green,
            playhead: Color::Yellow,
            cursor: Color::Magenta,
            accent: Color::White,
        }
    }
}
