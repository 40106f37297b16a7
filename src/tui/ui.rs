#![allow(clippy::uninlined_format_args)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::must_use_candidate)]

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::tui::app::{ActiveBlock, App, SessionState, UiMode, View};

/// Main UI drawing function
pub fn draw_ui(f: &mut Frame, app: &App) {
    // Five-part vertical layout:
    // 1. Title bar with tabs (top)
    // 2. Main content area (middle)
    // 3. Log area
    // 4. Help bar (keyboard shortcuts)
    // 5. Status bar (bottom)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(app.log_pane_height),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(f.size());

    draw_title_bar(f, app, chunks[0]);
    draw_main_area(f, app, chunks[1]);
    draw_log_area(f, app, chunks[2]);
    draw_help_bar(f, app, chunks[3]);
    draw_status_bar(f, app, chunks[4]);

    if app.ui_mode == UiMode::HelpOverlay {
        draw_help_overlay(f);
    }

    if app.ui_mode == UiMode::ProcessPicker {
        let area = centered_rect(70, 60, f.size());
        app.process_picker.render(f, area);
    }
}

/// Draw the title bar with tabs
fn draw_title_bar(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = View::ALL
        .iter()
        .enumerate()
        .map(|(i, view)| {
            let label = format!("[{}] {}", i + 1, view.title());
            let style = if *view == app.current_view {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(Span::styled(label, style))
        })
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.current_view.index())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("scopeview")
                .border_style(Style::default().fg(Color::Cyan)),
        );

    f.render_widget(tabs, area);
}

/// Draw the per-view main area with the command line underneath
fn draw_main_area(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(7), Constraint::Length(3)])
        .split(area);

    let focused = app.active_block == ActiveBlock::MainView;
    match app.current_view {
        View::Locals => app.locals.render(f, chunks[0], focused),
        View::Watch => app.watch.render(f, chunks[0], focused),
        View::Globals => app.globals.render(f, chunks[0], focused),
        View::Stack => app.stack.render(f, chunks[0], focused),
        View::Registers => app.registers.render(f, chunks[0], focused),
        View::Memory => app.memory.render(f, chunks[0], focused),
    }

    app.command_view.render(
        f,
        chunks[1],
        &app.command_input,
        app.active_block == ActiveBlock::CommandInput,
    );
}

/// Draw the scrollable, filterable log pane
fn draw_log_area(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!("Log [{}]", app.log_filter.label()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner_height = area.height.saturating_sub(2) as usize;
    let lines = app.filtered_logs();
    let end = lines.len().saturating_sub(app.log_scroll);
    let start = end.saturating_sub(inner_height);

    let text: Vec<Line> = lines[start..end]
        .iter()
        .map(|line| {
            let style = if line.contains("[ERROR]") {
                Style::default().fg(Color::Red)
            } else if line.contains("[WARN]") {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(Span::styled((*line).clone(), style))
        })
        .collect();

    let paragraph = Paragraph::new(text).block(block);
    f.render_widget(paragraph, area);
}

/// Draw the keyboard shortcut hints
fn draw_help_bar(f: &mut Frame, app: &App, area: Rect) {
    let hints = match app.current_view {
        View::Locals | View::Globals => {
            "↑/↓ select  Enter expand/unfold  : command  s step  g continue  ? help"
        }
        View::Watch => {
            "↑/↓ select  Enter expand/unfold  d unmonitor  : command  ? help"
        }
        View::Stack => "↑/↓ select  Enter switch frame  : command  ? help",
        View::Registers => ": command  s step  g continue  ? help",
        View::Memory => "↑/↓ scroll  :memory <addr> <len>  ? help",
    };

    let paragraph = Paragraph::new(Line::from(hints))
        .block(Block::default().borders(Borders::ALL).title("Keys"))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);

    f.render_widget(paragraph, area);
}

/// Draw the status bar
fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(
            format!(" engine: {} ", app.engine_name()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("| "),
        Span::styled(
            app.session.label(),
            match app.session {
                SessionState::Stopped => Style::default().fg(Color::Yellow),
                SessionState::Running => Style::default().fg(Color::Green),
                SessionState::Detached => Style::default().fg(Color::Gray),
            },
        ),
    ];

    if let Some(pid) = app.attached_pid {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            format!("pid {}", pid),
            Style::default().fg(Color::White),
        ));
    }

    if let Some(reason) = &app.last_stop {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            reason.clone(),
            Style::default().fg(Color::White),
        ));
    }

    spans.push(Span::raw(" | "));
    spans.push(Span::styled(
        format!("{} watched", app.watch.expressions().len()),
        Style::default().fg(Color::White),
    ));

    let paragraph =
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

/// Draw the help overlay
fn draw_help_overlay(f: &mut Frame) {
    let area = centered_rect(70, 70, f.size());
    f.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled(
            "scopeview — debugger front-end",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("  1-6, Tab        switch panel"),
        Line::from("  ↑/↓             move selection / scroll"),
        Line::from("  Enter, Space    expand or collapse a row; unfold pointers"),
        Line::from("  :               command input"),
        Line::from("  r / g / s / n / f   run, continue, step, next, finish"),
        Line::from("  p               pick a process to attach"),
        Line::from("  d               stop monitoring the selected expression"),
        Line::from("  L               cycle log filter, PageUp/PageDown scroll"),
        Line::from(""),
        Line::from("  Commands: monitor EXPR, unmonitor EXPR, print EXPR,"),
        Line::from("  type EXPR, deref EXPR, globals, frame N, attach PID,"),
        Line::from("  memory ADDR LEN, processes, detach, quit"),
        Line::from(""),
        Line::from(Span::styled(
            "press any key to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}

/// Center a rect of the given percentage size inside `area`
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
