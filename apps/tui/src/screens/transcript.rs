//! "Transcript" screen — every exchanged message, oldest first.

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListState};
use taxcompanion_core::Conversation;

use crate::widgets::message_item;

pub(crate) struct TranscriptScreen {
    /// Index of the highlighted entry; `None` follows the newest one.
    selected: Option<usize>,
}

impl TranscriptScreen {
    pub(crate) fn new() -> Self {
        Self { selected: None }
    }

    pub(crate) fn draw(&self, f: &mut Frame, area: Rect, conversation: &Conversation) {
        let messages = conversation.messages();
        let items: Vec<_> = messages.iter().map(message_item).collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" Transcript ({}) ", messages.len())),
            )
            .highlight_style(Style::default().add_modifier(Modifier::BOLD));

        let mut state = ListState::default();
        state.select(Some(self.position(messages.len())));
        f.render_stateful_widget(list, area, &mut state);
    }

    pub(crate) fn handle_key(
        &mut self,
        code: KeyCode,
        _modifiers: KeyModifiers,
        conversation: &Conversation,
    ) {
        let len = conversation.messages().len();
        let current = self.position(len);
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = Some(current.saturating_sub(1));
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = if current + 2 >= len {
                    None
                } else {
                    Some(current + 1)
                };
            }
            KeyCode::End | KeyCode::Char('G') => self.selected = None,
            _ => {}
        }
    }

    fn position(&self, len: usize) -> usize {
        let last = len.saturating_sub(1);
        self.selected.map_or(last, |i| i.min(last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follows_newest_until_scrolled() {
        let mut conv = Conversation::new();
        conv.start();
        conv.advance(&Default::default(), Some("Shared business basics"));
        let mut screen = TranscriptScreen::new();
        assert_eq!(screen.position(conv.messages().len()), 1);

        screen.handle_key(KeyCode::Up, KeyModifiers::NONE, &conv);
        assert_eq!(screen.position(conv.messages().len()), 0);
        screen.handle_key(KeyCode::Up, KeyModifiers::NONE, &conv);
        assert_eq!(screen.position(conv.messages().len()), 0);

        screen.handle_key(KeyCode::Down, KeyModifiers::NONE, &conv);
        assert_eq!(screen.selected, None);

        // back at the bottom, new entries are followed again
        conv.advance(&Default::default(), Some("Shared financial overview"));
        assert_eq!(screen.position(conv.messages().len()), 2);
    }

    #[test]
    fn stays_pinned_while_scrolling_above_the_bottom() {
        let mut conv = Conversation::new();
        conv.start();
        for text in ["Shared business basics", "Shared financial overview", "Shared team info"] {
            conv.advance(&Default::default(), Some(text));
        }
        let mut screen = TranscriptScreen::new();
        for _ in 0..3 {
            screen.handle_key(KeyCode::Up, KeyModifiers::NONE, &conv);
        }
        assert_eq!(screen.selected, Some(0));

        screen.handle_key(KeyCode::Down, KeyModifiers::NONE, &conv);
        assert_eq!(screen.selected, Some(1));
        screen.handle_key(KeyCode::Down, KeyModifiers::NONE, &conv);
        assert_eq!(screen.selected, Some(2));
        screen.handle_key(KeyCode::Down, KeyModifiers::NONE, &conv);
        assert_eq!(screen.selected, None);
    }
}
