use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::engine::memory::MemoryBlock;

/// Memory dump panel
pub struct MemoryPanel {
    block: Option<MemoryBlock>,
    pub scroll: usize,
    row_bytes: usize,
}

impl MemoryPanel {
    pub fn new(row_bytes: usize) -> Self {
        Self {
            block: None,
            scroll: 0,
            row_bytes: row_bytes.max(1),
        }
    }

    pub fn set_block(&mut self, block: MemoryBlock) {
        self.block = Some(block);
        self.scroll = 0;
    }

    pub fn clear(&mut self) {
        self.block = None;
        self.scroll = 0;
    }

    pub fn scroll_down(&mut self) {
        let rows = self
            .block
            .as_ref()
            .map(|b| b.len().div_ceil(self.row_bytes))
            .unwrap_or(0);
        self.scroll = (self.scroll + 1).min(rows.saturating_sub(1));
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn render(&self, f: &mut Frame, area: Rect, focused: bool) {
        let title = match &self.block {
            Some(block) => format!("Memory @ 0x{:x}", block.address),
            None => "Memory".to_string(),
        };
        let block_widget = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if focused { Color::Green } else { Color::Gray }));

        match &self.block {
            Some(memory) => {
                let inner = block_widget.inner(area);
                f.render_widget(block_widget, area);

                let visible = inner.height as usize;
                let lines: Vec<Line> = memory
                    .hexdump(self.row_bytes)
                    .into_iter()
                    .skip(self.scroll)
                    .take(visible)
                    .map(Line::from)
                    .collect();

                let paragraph = Paragraph::new(lines).style(Style::default().fg(Color::White));
                f.render_widget(paragraph, inner);
            }
            None => {
                let lines = vec![
                    Line::from(Span::styled(
                        "No memory data available.",
                        Style::default().fg(Color::Red),
                    )),
                    Line::from(Span::styled(
                        "Use 'memory <address> <length>' to read memory.",
                        Style::default().fg(Color::Yellow),
                    )),
                ];
                let paragraph = Paragraph::new(lines)
                    .block(block_widget)
                    .alignment(Alignment::Center);
                f.render_widget(paragraph, area);
            }
        }
    }
}
