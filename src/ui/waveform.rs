use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::sequencer::{SliceParams, SLICERS};
use crate::ui::Palette;

const WAVE_RAMP: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render the sample overview with numbered slice markers.
///
/// Marker position follows the slicer's start percent; marker width is the
/// slice duration relative to one full cycle, like the original's overlay.
pub fn render_waveform(
    frame: &mut Frame,
    area: Rect,
    peaks: &[(f32, f32)],
    slices: &[SliceParams; SLICERS],
    duration_ceiling_ms: f32,
    palette: &Palette,
) {
    let block = Block::default()
        .title(Span::styled(" Sample ", Style::default().fg(palette.label)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border));

    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height < 2 {
        return;
    }

    if peaks.is_empty() {
        frame.render_widget(
            Paragraph::new("no sample loaded").style(Style::default().fg(palette.dimmed)),
            inner,
        );
        return;
    }

    let width = inner.width as usize;

    // Marker row: one digit per slicer at its start position, padded to
    // its duration share of a cycle
    let mut marker_row = vec![(' ', Style::default()); width];
    for (i, slice) in slices.iter().enumerate() {
        let col = ((slice.start_percent / 100.0) * (width as f32 - 1.0)) as usize;
        let span_cols = if duration_ceiling_ms > 0.0 {
            ((slice.duration_ms / duration_ceiling_ms) * width as f32) as usize
        } else {
            0
        };
        let style = Style::default().fg(palette.playhead);
        for c in col..(col + span_cols.max(1)).min(width) {
            marker_row[c] = ('─', style);
        }
        marker_row[col.min(width - 1)] =
            (char::from_digit(i as u32 + 1, 10).unwrap_or('?'), style.bold());
    }
    let marker_line = Line::from(
        marker_row
            .into_iter()
            .map(|(c, s)| Span::styled(c.to_string(), s))
            .collect::<Vec<_>>(),
    );
    frame.render_widget(
        Paragraph::new(marker_line),
        Rect::new(inner.x, inner.y, inner.width, 1),
    );

    // Wave row: peak-to-peak amplitude per column
    let wave: String = (0..width)
        .map(|x| {
            let bucket = x * peaks.len() / width;
            let (min, max) = peaks[bucket.min(peaks.len() - 1)];
            let amp = ((max - min) / 2.0).clamp(0.0, 1.0);
            WAVE_RAMP[(amp * (WAVE_RAMP.len() - 1) as f32).round() as usize]
        })
        .collect();
    frame.render_widget(
        Paragraph::new(wave).style(Style::default().fg(palette.accent)),
        Rect::new(inner.x, inner.y + 1, inner.width, 1),
    );
}
