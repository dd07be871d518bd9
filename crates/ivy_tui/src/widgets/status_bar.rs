//! Status bar widget.
//!
//! Renders a single line with the lifecycle state, a busy flag while a
//! simulation runs, the last exit code and the current status message.

use ivy_session::SimulationState;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use crate::app::TuiApp;

fn state_style(state: SimulationState) -> Style {
    let bg = match state {
        SimulationState::Start => Color::Blue,
        SimulationState::Compiled => Color::Yellow,
        SimulationState::Run => Color::Green,
    };
    Style::default()
        .bg(bg)
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD)
}

/// Renders the status bar into the given area.
pub fn render_status_bar(app: &TuiApp, area: Rect, buf: &mut Buffer) {
    if area.height == 0 {
        return;
    }

    let state = app.session.state();
    let busy = if app.session.is_running() {
        " [RUNNING]"
    } else {
        ""
    };
    let exit = app
        .session
        .last_exit_code()
        .map(|code| format!(" | exit {code}"))
        .unwrap_or_default();
    let message = if app.state.status_message.is_empty() {
        String::new()
    } else {
        format!(" | {}", app.state.status_message)
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", state.to_string().to_uppercase()),
            state_style(state),
        ),
        Span::styled(
            format!(" {}", app.session.top()),
            Style::default().fg(Color::White),
        ),
        Span::styled(busy, Style::default().fg(Color::Yellow)),
        Span::styled(exit, Style::default().fg(Color::DarkGray)),
        Span::styled(message, Style::default().fg(Color::Cyan)),
        Span::styled("  ? help", Style::default().fg(Color::DarkGray)),
    ]);

    buf.set_style(area, Style::default().bg(Color::DarkGray));
    Widget::render(line, area, buf);
}
