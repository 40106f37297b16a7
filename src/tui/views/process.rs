use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
    Frame,
};

use crate::engine::process::ProcessInfo;

/// Process-selection overlay; filter with typed text, Enter attaches
pub struct ProcessPicker {
    entries: Vec<ProcessInfo>,
    pub filter: String,
    pub selected: usize,
}

impl ProcessPicker {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            filter: String::new(),
            selected: 0,
        }
    }

    pub fn set_entries(&mut self, entries: Vec<ProcessInfo>) {
        self.entries = entries;
        self.selected = 0;
    }

    /// Entries passing the current filter
    pub fn visible(&self) -> Vec<&ProcessInfo> {
        self.entries
            .iter()
            .filter(|p| p.matches(&self.filter))
            .collect()
    }

    pub fn select_next(&mut self) {
        let count = self.visible().len();
        if count > 0 {
            self.selected = (self.selected + 1).min(count - 1);
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Pid of the selected visible entry
    pub fn selected_pid(&self) -> Option<u32> {
        self.visible().get(self.selected).map(|p| p.pid)
    }

    pub fn push_filter(&mut self, c: char) {
        self.filter.push(c);
        self.selected = 0;
    }

    pub fn pop_filter(&mut self) {
        self.filter.pop();
        self.selected = 0;
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        f.render_widget(Clear, area);

        let visible = self.visible();
        let title = format!("Attach to process — filter: {}_", self.filter);
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let items: Vec<ListItem> = if visible.is_empty() {
            vec![ListItem::new(Line::from(Span::styled(
                "No matching processes",
                Style::default().fg(Color::Gray),
            )))]
        } else {
            visible
                .iter()
                .map(|p| ListItem::new(Line::from(p.to_string())))
                .collect()
        };

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(Some(self.selected.min(visible.len().saturating_sub(1))));
        f.render_stateful_widget(list, area, &mut state);
    }
}

impl Default for ProcessPicker {
    fn default() -> Self {
        Self::new()
    }
}
