//! "Checklist" screen — the summary derived from the answers so far.
//!
//! Unlike the summary step this is always available, so the checklist can be
//! watched filling in while the form steps are answered.

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use taxcompanion_core::Conversation;

use super::ScreenEvent;

pub(crate) struct ChecklistScreen;

impl ChecklistScreen {
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) fn draw(&self, f: &mut Frame, area: Rect, conversation: &Conversation) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Min(1),    // Checklist
                Constraint::Length(1), // Hint
            ])
            .split(area);

        let lines: Vec<Line> = conversation
            .summary()
            .iter()
            .flat_map(|l| [Line::from(format!("• {l}")), Line::from("")])
            .collect();

        let card = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Checklist — step: {} ", conversation.step())),
        );
        f.render_widget(card, chunks[0]);

        let hint = Paragraph::new("e: Export as text")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(hint, chunks[1]);
    }

    pub(crate) fn handle_key(&mut self, code: KeyCode, _modifiers: KeyModifiers) -> ScreenEvent {
        match code {
            KeyCode::Char('e') => ScreenEvent::ExportRequested,
            _ => ScreenEvent::Nothing,
        }
    }
}
