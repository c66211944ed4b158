//! "Conversation" screen — the assistant prompt and the current step's form.

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, Paragraph, Wrap};
use taxcompanion_core::catalog::ChoiceOption;
use taxcompanion_core::{Conversation, FieldError, FieldKind, FieldSchema, FormValues};
use taxcompanion_shared::{FieldValue, Step};

use super::ScreenEvent;
use crate::widgets::{input_block, message_item};

/// How many transcript entries stay visible above the form.
const TRANSCRIPT_TAIL: usize = 4;

/// Editable copy of one form field.
struct DraftField {
    schema: FieldSchema,
    text: String,
    selected: Option<usize>,
}

impl DraftField {
    fn new(schema: FieldSchema) -> Self {
        let mut text = String::new();
        let mut selected = None;
        match (&schema.kind, &schema.prefill) {
            (FieldKind::Select { options }, Some(FieldValue::Choice(choice))) => {
                selected = options.iter().position(|o| o.value == choice.value);
            }
            (_, Some(value)) => text = value.display().to_string(),
            (_, None) => {}
        }
        Self {
            schema,
            text,
            selected,
        }
    }

    fn options(&self) -> Option<&'static [ChoiceOption]> {
        match self.schema.kind {
            FieldKind::Select { options } => Some(options),
            _ => None,
        }
    }

    fn is_select(&self) -> bool {
        self.options().is_some()
    }

    fn cycle(&mut self, forward: bool) {
        let Some(options) = self.options() else { return };
        if options.is_empty() {
            return;
        }
        let last = options.len() - 1;
        self.selected = Some(match (self.selected, forward) {
            (None, true) => 0,
            (None, false) => last,
            (Some(i), true) if i >= last => 0,
            (Some(i), true) => i + 1,
            (Some(0), false) => last,
            (Some(i), false) => i - 1,
        });
    }

    fn value(&self) -> Option<FieldValue> {
        match self.options() {
            Some(options) => self
                .selected
                .and_then(|i| options.get(i))
                .map(|o| FieldValue::Choice(o.to_choice())),
            None => Some(FieldValue::Text(self.text.clone())),
        }
    }

    fn display(&self) -> String {
        match self.options() {
            Some(options) => match self.selected.and_then(|i| options.get(i)) {
                Some(opt) => format!("< {} >  (← → to change)", opt.label),
                None => format!("< {} >", self.schema.placeholder),
            },
            None if self.text.is_empty() => self.schema.placeholder.to_string(),
            None => self.text.clone(),
        }
    }
}

pub(crate) struct ConversationScreen {
    step: Step,
    fields: Vec<DraftField>,
    focused: usize,
    editing: bool,
    error: Option<FieldError>,
}

impl ConversationScreen {
    pub(crate) fn new(conversation: &Conversation) -> Self {
        let mut screen = Self {
            step: conversation.step(),
            fields: Vec::new(),
            focused: 0,
            editing: false,
            error: None,
        };
        screen.reset(conversation);
        screen
    }

    /// Rebuild the draft from the conversation's current form.
    fn reset(&mut self, conversation: &Conversation) {
        self.step = conversation.step();
        self.fields = conversation
            .form()
            .fields
            .into_iter()
            .map(DraftField::new)
            .collect();
        self.focused = 0;
        self.editing = false;
        self.error = None;
    }

    pub(crate) fn is_editing(&self) -> bool {
        self.editing
    }

    pub(crate) fn draw(&self, f: &mut Frame, area: Rect, conversation: &Conversation) {
        let form = conversation.form();

        let body_height = match self.step {
            Step::Summary => conversation.summary().len() as u16 * 2 + 2,
            _ => self.fields.len() as u16 * 3,
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Min(3),              // Transcript tail
                Constraint::Length(4),           // Assistant prompt
                Constraint::Length(body_height), // Fields or checklist
                Constraint::Length(1),           // Action hint
                Constraint::Length(3),           // Inline validation
            ])
            .split(area);

        let messages = conversation.messages();
        let tail = &messages[messages.len().saturating_sub(TRANSCRIPT_TAIL)..];
        let transcript = List::new(tail.iter().map(message_item)).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .title(format!(" {} ", self.step)),
        );
        f.render_widget(transcript, chunks[0]);

        let prompt = Paragraph::new(form.prompt)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::White));
        f.render_widget(prompt, chunks[1]);

        if self.step == Step::Summary {
            let lines: Vec<Line> = conversation
                .summary()
                .iter()
                .flat_map(|l| [Line::from(format!("• {l}")), Line::from("")])
                .collect();
            let card = Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::ALL).title(" Checklist "));
            f.render_widget(card, chunks[2]);
        } else {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![Constraint::Length(3); self.fields.len()])
                .split(chunks[2]);
            for (i, (field, row)) in self.fields.iter().zip(rows.iter()).enumerate() {
                let focused = i == self.focused;
                let title = if field.schema.required {
                    format!("{} *", field.schema.label)
                } else {
                    field.schema.label.to_string()
                };
                let style = if field.text.is_empty() && field.selected.is_none() {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default()
                };
                let input = Paragraph::new(field.display())
                    .style(style)
                    .block(input_block(&title, focused, focused && self.editing));
                f.render_widget(input, *row);
            }
        }

        let hint = self.hint(form.submit_label, form.can_go_back);
        let hint_p = Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(hint_p, chunks[3]);

        if let Some(err) = &self.error {
            let msg = Paragraph::new(err.to_string())
                .style(Style::default().fg(Color::Red))
                .block(Block::default().borders(Borders::ALL).title(" Fix this "));
            f.render_widget(msg, chunks[4]);
        }
    }

    fn hint(&self, submit_label: &str, can_go_back: bool) -> String {
        match self.step {
            Step::Intro => format!("Enter: {submit_label}"),
            Step::Summary => format!("r: {submit_label} · e: Export as text"),
            _ if self.editing => "Type to edit · Enter/Esc to stop editing".to_string(),
            _ => {
                let back = if can_go_back { " · b: Back" } else { "" };
                format!(
                    "↑/↓ field · Enter edit/change · Ctrl-S or c: {submit_label}{back}"
                )
            }
        }
    }

    pub(crate) fn handle_key(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        conversation: &mut Conversation,
    ) -> ScreenEvent {
        if self.step != conversation.step() {
            self.reset(conversation);
        }

        if self.editing {
            match code {
                KeyCode::Esc | KeyCode::Enter => self.editing = false,
                KeyCode::Tab => {
                    self.editing = false;
                    self.next_field();
                }
                KeyCode::Backspace => {
                    if let Some(field) = self.fields.get_mut(self.focused) {
                        field.text.pop();
                    }
                }
                KeyCode::Char('s') if modifiers.contains(KeyModifiers::CONTROL) => {
                    self.editing = false;
                    return self.submit(conversation);
                }
                KeyCode::Char(c) => {
                    if let Some(field) = self.fields.get_mut(self.focused) {
                        field.text.push(c);
                    }
                }
                _ => {}
            }
            return ScreenEvent::Nothing;
        }

        match self.step {
            Step::Intro => match code {
                KeyCode::Enter => self.after_move(conversation.start(), conversation),
                _ => ScreenEvent::Nothing,
            },
            Step::Summary => match code {
                KeyCode::Char('r') => self.after_move(conversation.start_over(), conversation),
                KeyCode::Char('e') => ScreenEvent::ExportRequested,
                _ => ScreenEvent::Nothing,
            },
            _ => self.handle_form_key(code, modifiers, conversation),
        }
    }

    fn handle_form_key(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        conversation: &mut Conversation,
    ) -> ScreenEvent {
        match code {
            KeyCode::Char('s') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.submit(conversation)
            }
            KeyCode::Char('c') => self.submit(conversation),
            KeyCode::Char('b') => match conversation.back() {
                Some(step) => self.after_move(step, conversation),
                None => ScreenEvent::Nothing,
            },
            KeyCode::Enter => {
                if let Some(field) = self.fields.get_mut(self.focused) {
                    if field.is_select() {
                        field.cycle(true);
                    } else {
                        self.editing = true;
                    }
                }
                ScreenEvent::Nothing
            }
            KeyCode::Right | KeyCode::Left => {
                if let Some(field) = self.fields.get_mut(self.focused) {
                    field.cycle(code == KeyCode::Right);
                }
                ScreenEvent::Nothing
            }
            KeyCode::Up => {
                self.prev_field();
                ScreenEvent::Nothing
            }
            KeyCode::Down => {
                self.next_field();
                ScreenEvent::Nothing
            }
            _ => ScreenEvent::Nothing,
        }
    }

    fn submit(&mut self, conversation: &mut Conversation) -> ScreenEvent {
        let values: FormValues = self
            .fields
            .iter()
            .filter_map(|f| f.value().map(|v| (f.schema.name, v)))
            .collect();

        match conversation.submit(&values) {
            Ok(step) => self.after_move(step, conversation),
            Err(err) => {
                if let Some(i) = self.fields.iter().position(|f| f.schema.name == err.field()) {
                    self.focused = i;
                }
                let status = err.to_string();
                self.error = Some(err);
                ScreenEvent::Status(status)
            }
        }
    }

    fn after_move(&mut self, step: Step, conversation: &Conversation) -> ScreenEvent {
        self.reset(conversation);
        ScreenEvent::Status(format!("{step}"))
    }

    fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + 1) % self.fields.len();
        }
    }

    fn prev_field(&mut self) {
        if !self.fields.is_empty() {
            self.focused = if self.focused == 0 {
                self.fields.len() - 1
            } else {
                self.focused - 1
            };
        }
    }
}
