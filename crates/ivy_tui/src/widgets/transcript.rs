//! Transcript widget.
//!
//! Shows the tail of the session transcript, or an earlier window when the
//! user has scrolled back.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use crate::app::TuiApp;
use crate::state::FocusedPanel;

/// Returns the `[start, end)` line range visible in `height` rows.
pub fn visible_range(total: usize, scroll: usize, height: usize) -> (usize, usize) {
    let end = total - scroll.min(total);
    (end.saturating_sub(height), end)
}

/// Renders the transcript panel into the given buffer area.
pub fn render_transcript(app: &TuiApp, area: Rect, buf: &mut Buffer) {
    let border_style = if app.state.focused == FocusedPanel::Transcript {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let title = if app.state.is_tailing() {
        " Transcript ".to_string()
    } else {
        format!(" Transcript [-{}] ", app.state.transcript_scroll)
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    let transcript = app.session.transcript();
    let height = usize::from(area.height.saturating_sub(2));
    let (start, end) = visible_range(transcript.len(), app.state.transcript_scroll, height);
    let lines: Vec<Line> = transcript
        .lines()
        .skip(start)
        .take(end - start)
        .map(Line::raw)
        .collect();

    Paragraph::new(lines).block(block).render(area, buf);
}
