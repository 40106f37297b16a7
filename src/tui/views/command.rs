use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Command input line
pub struct CommandView;

impl CommandView {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, f: &mut Frame, area: Rect, input: &str, focused: bool) {
        let cursor = if focused { "█" } else { "" };
        let line = Line::from(vec![
            Span::raw("> "),
            Span::styled(input.to_string(), Style::default().fg(Color::Yellow)),
            Span::styled(cursor, Style::default().fg(Color::Yellow)),
        ]);

        let paragraph = Paragraph::new(vec![line]).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Command")
                .border_style(Style::default().fg(if focused {
                    Color::Green
                } else {
                    Color::Gray
                })),
        );

        f.render_widget(paragraph, area);
    }
}

impl Default for CommandView {
    fn default() -> Self {
        Self::new()
    }
}
