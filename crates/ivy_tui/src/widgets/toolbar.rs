//! Toolbar widget.
//!
//! Shows the run time with its adjustment keys, then one entry per session
//! action. Actions the session would reject right now are dimmed.

use ivy_session::Action;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use crate::app::TuiApp;

/// Returns the key bound to `action`.
pub fn action_key(action: Action) -> char {
    match action {
        Action::Regenerate => 'g',
        Action::Compile => 'c',
        Action::Run => 'r',
        Action::ViewWave => 'w',
    }
}

fn action_style(enabled: bool) -> Style {
    if enabled {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Renders the toolbar into the given area.
pub fn render_toolbar(app: &TuiApp, area: Rect, buf: &mut Buffer) {
    if area.height == 0 {
        return;
    }

    let run_time = app.session.run_time();
    let mut spans = vec![
        Span::styled(
            format!(" {run_time} "),
            Style::default().bg(Color::Blue).fg(Color::White),
        ),
        Span::styled(" +/- u/U ", Style::default().fg(Color::DarkGray)),
        Span::raw("|"),
    ];
    for action in Action::ALL {
        let style = action_style(app.session.is_enabled(action));
        spans.push(Span::styled(
            format!(" [{}] {action} ", action_key(action)),
            style,
        ));
    }

    Widget::render(Line::from(spans), area, buf);
}
