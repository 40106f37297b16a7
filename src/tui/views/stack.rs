use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::engine::stack::StackFrame;

/// Call stack panel with a selectable frame
pub struct StackPanel {
    frames: Vec<StackFrame>,
    pub selected: usize,
}

impl StackPanel {
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
            selected: 0,
        }
    }

    pub fn frames(&self) -> &[StackFrame] {
        &self.frames
    }

    pub fn set_frames(&mut self, frames: Vec<StackFrame>) {
        self.frames = frames;
        self.selected = 0;
    }

    pub fn clear(&mut self) {
        self.frames.clear();
        self.selected = 0;
    }

    pub fn select_next(&mut self) {
        if !self.frames.is_empty() {
            self.selected = (self.selected + 1).min(self.frames.len() - 1);
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Frame number of the selected row
    pub fn selected_frame(&self) -> Option<usize> {
        self.frames.get(self.selected).map(|f| f.number)
    }

    pub fn render(&self, f: &mut Frame, area: Rect, focused: bool) {
        let block = Block::default()
            .title("Call stack")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if focused { Color::Green } else { Color::Gray }));

        if self.frames.is_empty() {
            let items = vec![ListItem::new(Line::from(Span::styled(
                "No stack frames available",
                Style::default().fg(Color::Gray),
            )))];
            f.render_widget(List::new(items).block(block), area);
            return;
        }

        let items: Vec<ListItem> = self
            .frames
            .iter()
            .map(|frame| {
                let style = if frame.number == 0 {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(Span::styled(frame.to_string(), style)))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(Some(self.selected.min(self.frames.len() - 1)));
        f.render_stateful_widget(list, area, &mut state);
    }
}

impl Default for StackPanel {
    fn default() -> Self {
        Self::new()
    }
}
