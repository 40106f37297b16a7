use std::collections::HashSet;

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use crate::engine::registers::Registers;

/// Register panel; values that moved since the previous stop are flagged
pub struct RegistersPanel {
    current: Registers,
    changed: HashSet<String>,
}

impl RegistersPanel {
    pub fn new() -> Self {
        Self {
            current: Registers::new(),
            changed: HashSet::new(),
        }
    }

    pub fn registers(&self) -> &Registers {
        &self.current
    }

    pub fn set_registers(&mut self, registers: Registers) {
        self.changed = registers.changed_since(&self.current);
        self.current = registers;
    }

    pub fn clear(&mut self) {
        self.current = Registers::new();
        self.changed.clear();
    }

    pub fn render(&self, f: &mut Frame, area: Rect, focused: bool) {
        let block = Block::default()
            .title("Registers")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if focused { Color::Green } else { Color::Gray }));

        if self.current.is_empty() {
            let items = vec![ListItem::new(Line::from(Span::styled(
                "No register data available",
                Style::default().fg(Color::Gray),
            )))];
            f.render_widget(List::new(items).block(block), area);
            return;
        }

        let items: Vec<ListItem> = self
            .current
            .iter()
            .map(|(name, value)| {
                let style = if self.changed.contains(name) {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                ListItem::new(Line::from(Span::styled(format!("{:<6} 0x{:016x}", name, value), style)))
            })
            .collect();

        f.render_widget(List::new(items).block(block), area);
    }
}

impl Default for RegistersPanel {
    fn default() -> Self {
        Self::new()
    }
}
