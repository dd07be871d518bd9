//! File tree widget.
//!
//! A root "Files" entry followed by one entry per file in the session's
//! file set, in compile order. The selected file is highlighted.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, StatefulWidget};

use crate::app::TuiApp;
use crate::state::FocusedPanel;

/// Renders the file tree panel into the given buffer area.
pub fn render_file_tree(app: &TuiApp, area: Rect, buf: &mut Buffer) {
    let border_style = if app.state.focused == FocusedPanel::Files {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .title(" Files ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let files = app.session.files();
    let mut items = Vec::with_capacity(files.len() + 1);
    items.push(ListItem::new(Line::from(Span::styled(
        "Files",
        Style::default().fg(Color::Yellow),
    ))));
    for path in files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| format!("  {}", p.display()))
            .unwrap_or_default();
        items.push(ListItem::new(Line::from(vec![
            Span::styled(format!("  {name}"), Style::default().fg(Color::White)),
            Span::styled(parent, Style::default().fg(Color::DarkGray)),
        ])));
    }

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );

    // Entry 0 is the root.
    let mut list_state = ListState::default();
    if !files.is_empty() {
        list_state.select(Some(app.state.selected_file + 1));
    }

    StatefulWidget::render(list, area, buf, &mut list_state);
}
