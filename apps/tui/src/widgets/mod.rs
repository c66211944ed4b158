//! Reusable TUI widgets.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, ListItem, Paragraph};
use taxcompanion_shared::{Author, MessageLogEntry};

/// Bottom status bar.
pub(crate) fn status_bar(msg: &str) -> Paragraph<'_> {
    Paragraph::new(format!(" {msg}"))
        .style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White),
        )
}

/// Bordered input block; yellow while editing, cyan when focused.
pub(crate) fn input_block(title: &str, focused: bool, editing: bool) -> Block<'_> {
    let style = if focused && editing {
        Style::default().fg(Color::Yellow)
    } else if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .title(format!(" {title} "))
        .border_style(style)
}

/// One transcript entry: assistant on the left, user right-aligned and blue.
pub(crate) fn message_item(entry: &MessageLogEntry) -> ListItem<'_> {
    match entry.author {
        Author::Assistant => ListItem::new(Line::from(vec![
            Span::styled("assistant ", Style::default().fg(Color::DarkGray)),
            Span::raw(entry.text.as_str()),
        ])),
        Author::User => ListItem::new(
            Line::from(vec![
                Span::styled(
                    entry.text.as_str(),
                    Style::default().fg(Color::White).bg(Color::Blue),
                ),
                Span::styled(" you", Style::default().fg(Color::DarkGray)),
            ])
            .alignment(Alignment::Right),
        ),
    }
}
