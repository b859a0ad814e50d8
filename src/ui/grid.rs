use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::sequencer::{StepGrid, INDICATOR_ROW, ROWS, SLICERS, STEPS};
use crate::ui::Palette;

/// Grid cursor over the playable rows
pub struct GridCursor {
    pub row: usize,
    pub step: usize,
}

impl GridCursor {
    pub fn new() -> Self {
        Self {
            row: INDICATOR_ROW + 1,
            step: 0,
        }
    }

    /// The slicer the cursor row maps to
    pub fn slicer(&self) -> usize {
        self.row - 1
    }

    pub fn move_cursor(&mut self, dx: i32, dy: i32) {
        self.step = ((self.step as i32 + dx).rem_euclid(STEPS as i32)) as usize;
        // Wrap inside the playable rows, skipping the indicator row
        let playable = (self.row as i32 - 1 + dy).rem_euclid(SLICERS as i32);
        self.row = playable as usize + 1;
    }
}

impl Default for GridCursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Render the step grid with the indicator row on top
pub fn render_grid(
    frame: &mut Frame,
    area: Rect,
    grid: &StepGrid,
    cursor: &GridCursor,
    current_step: usize,
    playing: bool,
    palette: &Palette,
) {
    let block = Block::default()
        .title(Span::styled(" Pattern ", Style::default().fg(palette.label)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let label_width = 5u16;
    let available_width = inner.width.saturating_sub(label_width);
    let cell_width = (available_width / STEPS as u16).max(2);

    for row in 0..ROWS {
        let row_y = inner.y + row as u16;
        if row_y >= inner.y + inner.height {
            break;
        }

        // Row label
        let (label, label_style) = if row == INDICATOR_ROW {
            ("     ".to_string(), Style::default().fg(palette.dimmed))
        } else if row == cursor.row {
            (
                format!("{:>4} ", format!("S{}", row)),
                Style::default().fg(palette.cursor).bold(),
            )
        } else {
            (
                format!("{:>4} ", format!("S{}", row)),
                Style::default().fg(palette.label),
            )
        };
        frame.render_widget(
            Paragraph::new(label).style(label_style),
            Rect::new(inner.x, row_y, label_width, 1),
        );

        for step in 0..STEPS {
            let step_x = inner.x + label_width + (step as u16 * cell_width);
            if step_x >= inner.x + inner.width {
                break;
            }

            let (symbol, style) = if row == INDICATOR_ROW {
                // The indicator row only tracks the playhead
                if playing && step == current_step {
                    ("▼▼", Style::default().fg(palette.playhead).bold())
                } else if step % 4 == 0 {
                    (". ", Style::default().fg(palette.dimmed))
                } else {
                    ("  ", Style::default())
                }
            } else {
                let is_active = grid.is_active(row, step);
                let is_cursor = row == cursor.row && step == cursor.step;
                let is_playhead = playing && step == current_step;

                if is_cursor {
                    if is_active {
                        ("[]", Style::default().fg(Color::Black).bg(palette.cursor).bold())
                    } else {
                        ("[]", Style::default().fg(palette.cursor).bold())
                    }
                } else if is_playhead && is_active {
                    ("##", Style::default().fg(Color::Black).bg(palette.playhead).bold())
                } else if is_playhead {
                    ("::", Style::default().fg(palette.playhead))
                } else if is_active {
                    ("##", Style::default().fg(palette.active))
                } else if step % 4 == 0 {
                    (". ", Style::default().fg(palette.dimmed))
                } else {
                    ("- ", Style::default().fg(palette.border))
                }
            };

            frame.render_widget(
                Paragraph::new(symbol).style(style),
                Rect::new(step_x, row_y, cell_width.min(2), 1),
            );
        }
    }
}

/// Render the transport status bar
pub fn render_transport(
    frame: &mut Frame,
    area: Rect,
    playing: bool,
    bpm: f32,
    current_step: usize,
    sample_name: Option<&str>,
    sample_secs: f64,
    voice_count: usize,
    palette: &Palette,
) {
    let status = if playing { "PLAY" } else { "STOP" };
    let status_style = if playing {
        Style::default().fg(palette.active).bold()
    } else {
        Style::default().fg(palette.dimmed)
    };

    let transport_text = vec![
        Span::styled(format!(" {} ", status), status_style),
        Span::styled(" | ", Style::default().fg(palette.border)),
        Span::styled(format!("BPM: {:.0}", bpm), Style::default().fg(palette.accent)),
        Span::styled(" | ", Style::default().fg(palette.border)),
        Span::styled(
            format!("Step: {:2}/{}", current_step + 1, STEPS),
            Style::default().fg(palette.accent),
        ),
        Span::styled(" | ", Style::default().fg(palette.border)),
        Span::styled(
            match sample_name {
                Some(name) => format!("{} ({:.2}s)", name, sample_secs),
                None => "no sample".to_string(),
            },
            Style::default().fg(if sample_name.is_some() {
                palette.label
            } else {
                palette.dimmed
            }),
        ),
        Span::styled(" | ", Style::default().fg(palette.border)),
        Span::styled(
            format!("voices: {}", voice_count),
            Style::default().fg(palette.dimmed),
        ),
    ];

    let transport = Paragraph::new(Line::from(transport_text)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border)),
    );

    frame.render_widget(transport, area);
}
