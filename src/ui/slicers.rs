use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::sequencer::{SliceParams, SLICERS};
use crate::ui::Palette;

const BAR_LEN: usize = 12;

fn bar(value: f32, max: f32) -> String {
    let filled = if max > 0.0 {
        ((value / max) * BAR_LEN as f32).round() as usize
    } else {
        0
    };
    let filled = filled.min(BAR_LEN);
    format!("{}{}", "=".repeat(filled), " ".repeat(BAR_LEN - filled))
}

/// Render one line per slicer: start position and duration with their
/// current slider bars
pub fn render_slicers(
    frame: &mut Frame,
    area: Rect,
    slices: &[SliceParams; SLICERS],
    duration_ceiling_ms: f32,
    selected: usize,
    palette: &Palette,
) {
    let block = Block::default()
        .title(Span::styled(" Slicers ", Style::default().fg(palette.label)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    for (i, slice) in slices.iter().enumerate() {
        let y = inner.y + i as u16;
        if y >= inner.y + inner.height {
            break;
        }

        let label_style = if i == selected {
            Style::default().fg(palette.cursor).bold()
        } else {
            Style::default().fg(palette.label)
        };
        let value_style = Style::default().fg(palette.accent);
        let bar_style = Style::default().fg(if i == selected {
            palette.cursor
        } else {
            palette.active
        });

        let line = Line::from(vec![
            Span::styled(format!(" S{} ", i + 1), label_style),
            Span::styled("start [", Style::default().fg(palette.dimmed)),
            Span::styled(bar(slice.start_percent, 100.0), bar_style),
            Span::styled("] ", Style::default().fg(palette.dimmed)),
            Span::styled(format!("{:>3.0}%  ", slice.start_percent), value_style),
            Span::styled("dur [", Style::default().fg(palette.dimmed)),
            Span::styled(bar(slice.duration_ms, duration_ceiling_ms), bar_style),
            Span::styled("] ", Style::default().fg(palette.dimmed)),
            Span::styled(
                format!("{:>4.0}/{:.0}ms", slice.duration_ms, duration_ceiling_ms),
                value_style,
            ),
        ]);

        frame.render_widget(
            Paragraph::new(line),
            Rect::new(inner.x, y, inner.width, 1),
        );
    }
}
