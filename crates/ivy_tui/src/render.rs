//! Top-level rendering logic.
//!
//! Splits the terminal into panels and delegates to the widget modules.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::TuiApp;
use crate::widgets::{file_tree, status_bar, toolbar, transcript};

const HELP_TEXT: &str = "\
Actions:
  g   Regenerate file list     c   Compile
  r   Run simulation           w   View waveform
  x   Abandon running output

Run time:
  +/- Change value (1-999)     u/U Next/previous unit

Navigation:
  j/k ↑/↓  Select file or scroll transcript
  Tab      Switch panel
  Enter/e  Edit selected file
  ?        Toggle help         q   Quit";

/// Renders the complete TUI layout into the given frame.
///
/// ```text
/// ┌─────────────────────────────────────┐
/// │ Toolbar                             │
/// ├────────────┬────────────────────────┤
/// │ Files      │ Transcript             │
/// │ (30%)      │ (70%)                  │
/// ├────────────┴────────────────────────┤
/// │ Status Bar                          │
/// └─────────────────────────────────────┘
/// ```
pub fn render(app: &TuiApp, frame: &mut Frame) {
    let size = frame.size();

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(size);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(vertical[1]);

    toolbar::render_toolbar(app, vertical[0], frame.buffer_mut());
    file_tree::render_file_tree(app, horizontal[0], frame.buffer_mut());
    transcript::render_transcript(app, horizontal[1], frame.buffer_mut());
    status_bar::render_status_bar(app, vertical[2], frame.buffer_mut());

    if app.state.show_help {
        render_help_popup(frame);
    }
}

fn render_help_popup(frame: &mut Frame) {
    let area = frame.size();
    let popup_width = 60u16.min(area.width.saturating_sub(4));
    let popup_height = 17u16.min(area.height.saturating_sub(4));
    let x = area.width.saturating_sub(popup_width) / 2;
    let y = area.height.saturating_sub(popup_height) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);
    let popup = Paragraph::new(HELP_TEXT)
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: false });
    frame.render_widget(popup, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{row, test_app};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn draw(app: &TuiApp, width: u16, height: u16) -> ratatui::buffer::Buffer {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(app, f)).unwrap();
        terminal.backend().buffer().clone()
    }

    #[test]
    fn render_full_layout() {
        let app = test_app();
        let buf = draw(&app, 100, 24);
        assert!(row(&buf, 0).contains("[c] compile"));
        assert!(row(&buf, 1).contains("Files"));
        assert!(row(&buf, 1).contains("Transcript"));
        assert!(row(&buf, 23).contains("START"));
    }

    #[test]
    fn render_with_help_popup() {
        let mut app = test_app();
        app.state.show_help = true;
        let buf = draw(&app, 100, 24);
        let all: String = (0..24).map(|y| row(&buf, y)).collect();
        assert!(all.contains("Help"));
        assert!(all.contains("View waveform"));
    }

    #[test]
    fn render_small_terminal() {
        let app = test_app();
        draw(&app, 20, 5);
    }
}
