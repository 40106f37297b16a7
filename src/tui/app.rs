#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cognitive_complexity)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::must_use_candidate)]

use std::collections::{HashMap, VecDeque};
use std::io;

use anyhow::{Context, Result};
use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use log::{debug, info};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use regex::Regex;

use crate::config::{keys, ConfigStore, MemoryConfig};
use crate::engine::interface::{
    DebuggerEngine, EngineEvent, EngineRequest, StopEvent,
};
use crate::engine::stack::StackFrame;
use crate::tui::events::{Event, Events};
use crate::tui::ui::draw_ui;
use crate::tui::views::{
    CommandView, GlobalsView, LocalsView, MemoryPanel, ProcessPicker, RegistersPanel, StackPanel,
    WatchView,
};

/// Current tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Locals,
    Watch,
    Globals,
    Stack,
    Registers,
    Memory,
}

impl View {
    pub const ALL: [View; 6] = [
        View::Locals,
        View::Watch,
        View::Globals,
        View::Stack,
        View::Registers,
        View::Memory,
    ];

    pub fn title(self) -> &'static str {
        match self {
            View::Locals => "Variables",
            View::Watch => "Watch",
            View::Globals => "Globals",
            View::Stack => "Stack",
            View::Registers => "Registers",
            View::Memory => "Memory",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|v| *v == self).unwrap_or(0)
    }

    fn next(self) -> View {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}

/// UI active block (for focus handling)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveBlock {
    MainView,
    CommandInput,
    LogView,
}

/// Log message severity level filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFilter {
    Debug,
    Info,
    Warn,
    Error,
    Custom,
}

impl LogFilter {
    fn cycle(self) -> LogFilter {
        match self {
            LogFilter::Debug => LogFilter::Info,
            LogFilter::Info => LogFilter::Warn,
            LogFilter::Warn => LogFilter::Error,
            LogFilter::Error => LogFilter::Debug,
            LogFilter::Custom => LogFilter::Debug,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LogFilter::Debug => "debug",
            LogFilter::Info => "info",
            LogFilter::Warn => "warn",
            LogFilter::Error => "error",
            LogFilter::Custom => "custom",
        }
    }
}

/// UI Mode for specialized overlays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    ProcessPicker,
    HelpOverlay,
}

/// Session state shown in the status bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Detached,
    Running,
    Stopped,
}

impl SessionState {
    pub fn label(self) -> &'static str {
        match self {
            SessionState::Detached => "detached",
            SessionState::Running => "running",
            SessionState::Stopped => "stopped",
        }
    }
}

/// Command type for proper parsing and execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Execution
    Run,
    Continue,
    Step,
    Next,
    Finish,

    // Session
    Attach(u32),
    Detach,
    Processes,

    // Inspection
    Monitor(String),
    Unmonitor(String),
    Print(String),
    TypeOf(String),
    Deref(String),
    Globals,
    Frame(usize),
    Memory(u64, usize),

    // Control
    Help(Option<String>),
    Quit,

    // Unknown command
    Unknown(String),
}

/// Parse one command line.
///
/// Errors are reserved for recognizable commands with malformed
/// arguments; unrecognized words degrade to `Unknown` so typos never look
/// like failures of the parser itself.
pub fn parse_command(input: &str) -> Result<Command, String> {
    let trimmed = input.trim();
    let mut words = trimmed.split_whitespace();
    let head = words.next().unwrap_or("");
    let rest = trimmed[head.len()..].trim().to_string();

    let command = match head {
        "run" | "r" => Command::Run,
        "continue" | "c" => Command::Continue,
        "step" | "s" => Command::Step,
        "next" | "n" => Command::Next,
        "finish" => Command::Finish,
        "attach" => {
            let pid = rest
                .parse::<u32>()
                .map_err(|_| format!("usage: attach <pid>, got \"{}\"", rest))?;
            Command::Attach(pid)
        }
        "detach" => Command::Detach,
        "processes" | "ps" => Command::Processes,
        "monitor" | "watch" => {
            if rest.is_empty() {
                return Err("usage: monitor <expression>".to_string());
            }
            Command::Monitor(rest)
        }
        "unmonitor" | "unwatch" => {
            if rest.is_empty() {
                return Err("usage: unmonitor <expression>".to_string());
            }
            Command::Unmonitor(rest)
        }
        "print" | "p" => {
            if rest.is_empty() {
                return Err("usage: print <expression>".to_string());
            }
            Command::Print(rest)
        }
        "type" | "whatis" => {
            if rest.is_empty() {
                return Err("usage: type <expression>".to_string());
            }
            Command::TypeOf(rest)
        }
        "deref" => {
            if rest.is_empty() {
                return Err("usage: deref <expression>".to_string());
            }
            Command::Deref(rest)
        }
        "globals" => Command::Globals,
        "frame" => {
            let number = rest
                .parse::<usize>()
                .map_err(|_| format!("usage: frame <number>, got \"{}\"", rest))?;
            Command::Frame(number)
        }
        "memory" | "mem" | "x" => {
            let mut args = rest.split_whitespace();
            let address = args
                .next()
                .and_then(parse_address)
                .ok_or_else(|| "usage: memory <address> <length>".to_string())?;
            let length = args
                .next()
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(256);
            Command::Memory(address, length)
        }
        "help" | "h" | "?" => Command::Help(if rest.is_empty() { None } else { Some(rest) }),
        "quit" | "q" | "exit" => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    };
    Ok(command)
}

fn parse_address(text: &str) -> Option<u64> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else {
        text.parse::<u64>().ok()
    }
}

/// What kind of completion an in-flight request will produce.
///
/// Keyed by qualified name; entries are cleared as responses arrive, and a
/// response with no entry is routed by panel membership instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingKind {
    MonitorValue,
    OneShotPrint,
    TypeOf,
    Pointed,
    Unfold,
}

/// Application state
pub struct App {
    /// The debugger engine behind the request/response boundary
    engine: Box<dyn DebuggerEngine>,
    /// Is the application running?
    pub running: bool,
    /// Current view
    pub current_view: View,
    /// Currently active/focused UI block
    pub active_block: ActiveBlock,
    /// Current UI mode
    pub ui_mode: UiMode,
    /// Command input text
    pub command_input: String,
    /// Command history
    pub command_history: VecDeque<String>,
    /// Current history position while browsing with Up/Down
    history_index: Option<usize>,
    /// Log messages (with rotation)
    pub log_messages: VecDeque<String>,
    /// Log filter level
    pub log_filter: LogFilter,
    /// Custom regex filter for logs
    pub log_filter_regex: Option<Regex>,
    /// Scroll position for log view
    pub log_scroll: usize,
    /// Maximum log buffer size
    max_log_size: usize,
    /// Rows of the frame granted to the log pane
    pub log_pane_height: u16,

    // Panels
    pub locals: LocalsView,
    pub watch: WatchView,
    pub globals: GlobalsView,
    pub stack: StackPanel,
    pub registers: RegistersPanel,
    pub memory: MemoryPanel,
    pub process_picker: ProcessPicker,
    pub command_view: CommandView,

    /// In-flight variable requests, keyed by qualified name
    pending: HashMap<String, PendingKind>,
    /// Process ID of the attached inferior
    pub attached_pid: Option<u32>,
    /// Session state
    pub session: SessionState,
    /// Last stop reason, for the status bar
    pub last_stop: Option<String>,
    /// Frame of the previous stop, for frame-switch detection
    last_frame: Option<StackFrame>,
    /// Whether the most recent stop switched frames
    is_new_frame: bool,
    /// Members fetched per unfold
    unfold_chunk: usize,
    /// Whether globals were listed at least once (kept refreshed if so)
    globals_seen: bool,
}

impl App {
    /// Build the application around an engine; does not touch the terminal
    pub fn new(engine: Box<dyn DebuggerEngine>, config: &MemoryConfig) -> Self {
        let unfold_chunk = config
            .get_int(keys::UNFOLD_CHUNK)
            .unwrap_or(keys::DEFAULT_UNFOLD_CHUNK)
            .max(1) as usize;
        let max_log_size = config
            .get_int(keys::MAX_LOG_LINES)
            .unwrap_or(keys::DEFAULT_MAX_LOG_LINES)
            .max(10) as usize;
        let log_pane_height = config
            .get_int(keys::LOG_PANE_HEIGHT)
            .unwrap_or(keys::DEFAULT_LOG_PANE_HEIGHT)
            .clamp(3, 20) as u16;
        let row_bytes = config
            .get_int(keys::MEMORY_ROW_BYTES)
            .unwrap_or(keys::DEFAULT_MEMORY_ROW_BYTES)
            .clamp(4, 64) as usize;

        Self {
            engine,
            running: true,
            current_view: View::Locals,
            active_block: ActiveBlock::MainView,
            ui_mode: UiMode::Normal,
            command_input: String::new(),
            command_history: VecDeque::new(),
            history_index: None,
            log_messages: VecDeque::new(),
            log_filter: LogFilter::Info,
            log_filter_regex: None,
            log_scroll: 0,
            max_log_size,
            log_pane_height,
            locals: LocalsView::new(),
            watch: WatchView::new(),
            globals: GlobalsView::new(),
            stack: StackPanel::new(),
            registers: RegistersPanel::new(),
            memory: MemoryPanel::new(row_bytes),
            process_picker: ProcessPicker::new(),
            command_view: CommandView::new(),
            pending: HashMap::new(),
            attached_pid: None,
            session: SessionState::Detached,
            last_stop: None,
            last_frame: None,
            is_new_frame: true,
            unfold_chunk,
            globals_seen: false,
        }
    }

    /// Short engine name for the status bar
    pub fn engine_name(&self) -> String {
        self.engine.name().to_string()
    }

    /// Run the event loop until quit
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("enabling raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("building terminal")?;

        let events = Events::new(100);
        info!("UI started, engine: {}", self.engine.name());
        self.push_log("INFO", &format!("engine: {}", self.engine.name()));

        while self.running {
            self.drain_engine();
            terminal.draw(|f| draw_ui(f, self))?;
            match events.next() {
                Ok(Event::Input(CrosstermEvent::Key(key))) => self.handle_key(key),
                Ok(Event::Input(_)) | Ok(Event::Tick) => {}
                Err(_) => break,
            }
        }

        disable_raw_mode().context("disabling raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("leaving alternate screen")?;
        terminal.show_cursor().context("restoring cursor")?;
        Ok(())
    }

    /// Drain engine completions onto the panels
    pub fn drain_engine(&mut self) {
        for event in self.engine.poll() {
            self.handle_engine_event(event);
        }
    }

    /// Submit a request, logging engine refusals instead of surfacing them
    fn request(&mut self, request: EngineRequest) {
        debug!("submitting {:?}", request);
        if let Err(err) = self.engine.submit(request) {
            self.push_log("WARN", &format!("engine: {}", err));
        }
    }

    /// Append a log pane line
    pub fn push_log(&mut self, level: &str, message: &str) {
        let timestamp = chrono::Local::now().format("%H:%M:%S%.3f").to_string();
        self.log_messages
            .push_back(format!("[{}] [{}] {}", timestamp, level, message));
        while self.log_messages.len() > self.max_log_size {
            self.log_messages.pop_front();
        }
    }

    /// Log lines passing the current filter
    pub fn filtered_logs(&self) -> Vec<&String> {
        self.log_messages
            .iter()
            .filter(|line| match self.log_filter {
                LogFilter::Debug => true,
                LogFilter::Info => !line.contains("[DEBUG]"),
                LogFilter::Warn => line.contains("[WARN]") || line.contains("[ERROR]"),
                LogFilter::Error => line.contains("[ERROR]"),
                LogFilter::Custom => self
                    .log_filter_regex
                    .as_ref()
                    .map(|re| re.is_match(line))
                    .unwrap_or(true),
            })
            .collect()
    }

    /// Install a custom regex log filter
    pub fn set_log_filter_pattern(&mut self, pattern: &str) -> Result<(), regex::Error> {
        self.log_filter_regex = Some(Regex::new(pattern)?);
        self.log_filter = LogFilter::Custom;
        Ok(())
    }

    // ---- keyboard ----

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.ui_mode {
            UiMode::HelpOverlay => {
                self.ui_mode = UiMode::Normal;
            }
            UiMode::ProcessPicker => self.handle_picker_key(key),
            UiMode::Normal => match self.active_block {
                ActiveBlock::CommandInput => self.handle_command_key(key),
                _ => self.handle_view_key(key),
            },
        }
    }

    fn handle_picker_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.ui_mode = UiMode::Normal,
            KeyCode::Up => self.process_picker.select_previous(),
            KeyCode::Down => self.process_picker.select_next(),
            KeyCode::Backspace => self.process_picker.pop_filter(),
            KeyCode::Enter => {
                if let Some(pid) = self.process_picker.selected_pid() {
                    self.ui_mode = UiMode::Normal;
                    self.execute_command(Command::Attach(pid));
                }
            }
            KeyCode::Char(c) => self.process_picker.push_filter(c),
            _ => {}
        }
    }

    fn handle_command_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.command_input.clear();
                self.history_index = None;
                self.active_block = ActiveBlock::MainView;
            }
            KeyCode::Enter => self.submit_command(),
            KeyCode::Backspace => {
                self.command_input.pop();
            }
            KeyCode::Up => self.history_previous(),
            KeyCode::Down => self.history_next(),
            KeyCode::Char(c) => {
                if c == 'c' && key.modifiers.contains(KeyModifiers::CONTROL) {
                    self.command_input.clear();
                    self.active_block = ActiveBlock::MainView;
                } else {
                    self.command_input.push(c);
                }
            }
            _ => {}
        }
    }

    fn handle_view_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(':') => {
                self.active_block = ActiveBlock::CommandInput;
                self.command_input.clear();
                self.history_index = None;
            }
            KeyCode::Char('q') => self.execute_command(Command::Quit),
            KeyCode::Char('?') | KeyCode::F(1) => self.ui_mode = UiMode::HelpOverlay,
            KeyCode::Char('1') => self.current_view = View::Locals,
            KeyCode::Char('2') => self.current_view = View::Watch,
            KeyCode::Char('3') => self.current_view = View::Globals,
            KeyCode::Char('4') => self.current_view = View::Stack,
            KeyCode::Char('5') => self.current_view = View::Registers,
            KeyCode::Char('6') => self.current_view = View::Memory,
            KeyCode::Tab => self.current_view = self.current_view.next(),
            KeyCode::Char('r') => self.execute_command(Command::Run),
            KeyCode::Char('g') => self.execute_command(Command::Continue),
            KeyCode::Char('s') => self.execute_command(Command::Step),
            KeyCode::Char('n') => self.execute_command(Command::Next),
            KeyCode::Char('f') => self.execute_command(Command::Finish),
            KeyCode::Char('p') => self.execute_command(Command::Processes),
            KeyCode::Char('L') => self.log_filter = self.log_filter.cycle(),
            KeyCode::PageUp => self.log_scroll = self.log_scroll.saturating_add(1),
            KeyCode::PageDown => self.log_scroll = self.log_scroll.saturating_sub(1),
            KeyCode::Up => self.select_previous(),
            KeyCode::Down => self.select_next(),
            KeyCode::Enter | KeyCode::Char(' ') => self.activate_selected(),
            KeyCode::Char('d') | KeyCode::Delete => {
                if self.current_view == View::Watch {
                    if let Some(expression) = self.watch.selected_expression() {
                        self.execute_command(Command::Unmonitor(expression));
                    }
                }
            }
            _ => {}
        }
    }

    fn select_previous(&mut self) {
        match self.current_view {
            View::Locals => self.locals.select_previous(),
            View::Watch => self.watch.select_previous(),
            View::Globals => self.globals.select_previous(),
            View::Stack => self.stack.select_previous(),
            View::Memory => self.memory.scroll_up(),
            View::Registers => {}
        }
    }

    fn select_next(&mut self) {
        match self.current_view {
            View::Locals => self.locals.select_next(),
            View::Watch => self.watch.select_next(),
            View::Globals => self.globals.select_next(),
            View::Stack => self.stack.select_next(),
            View::Memory => self.memory.scroll_down(),
            View::Registers => {}
        }
    }

    /// Enter on the current view: expand/collapse rows, select frames
    fn activate_selected(&mut self) {
        match self.current_view {
            View::Locals => {
                if let Some(qname) = self.locals.toggle_selected() {
                    self.unfold(qname);
                }
            }
            View::Watch => {
                if let Some(qname) = self.watch.toggle_selected() {
                    self.unfold(qname);
                }
            }
            View::Globals => self.globals.toggle_selected(),
            View::Stack => {
                if let Some(number) = self.stack.selected_frame() {
                    self.execute_command(Command::Frame(number));
                }
            }
            View::Registers | View::Memory => {}
        }
    }

    fn unfold(&mut self, qname: String) {
        self.pending.insert(qname.clone(), PendingKind::Unfold);
        self.request(EngineRequest::UnfoldVariable { qname });
    }

    fn history_previous(&mut self) {
        if self.command_history.is_empty() {
            return;
        }
        let index = match self.history_index {
            Some(i) => i.saturating_sub(1),
            None => self.command_history.len() - 1,
        };
        self.history_index = Some(index);
        self.command_input = self.command_history[index].clone();
    }

    fn history_next(&mut self) {
        match self.history_index {
            Some(i) if i + 1 < self.command_history.len() => {
                self.history_index = Some(i + 1);
                self.command_input = self.command_history[i + 1].clone();
            }
            Some(_) => {
                self.history_index = None;
                self.command_input.clear();
            }
            None => {}
        }
    }

    fn submit_command(&mut self) {
        let input = self.command_input.trim().to_string();
        self.command_input.clear();
        self.history_index = None;
        if input.is_empty() {
            return;
        }
        if self.command_history.back() != Some(&input) {
            self.command_history.push_back(input.clone());
            while self.command_history.len() > 100 {
                self.command_history.pop_front();
            }
        }
        match parse_command(&input) {
            Ok(command) => self.execute_command(command),
            Err(message) => self.push_log("ERROR", &message),
        }
    }

    // ---- commands ----

    pub fn execute_command(&mut self, command: Command) {
        debug!("executing {:?}", command);
        match command {
            Command::Run => {
                self.session = SessionState::Running;
                self.request(EngineRequest::Run);
            }
            Command::Continue => {
                self.session = SessionState::Running;
                self.request(EngineRequest::Continue);
            }
            Command::Step => {
                self.session = SessionState::Running;
                self.request(EngineRequest::Step);
            }
            Command::Next => {
                self.session = SessionState::Running;
                self.request(EngineRequest::Next);
            }
            Command::Finish => {
                self.session = SessionState::Running;
                self.request(EngineRequest::Finish);
            }
            Command::Attach(pid) => self.request(EngineRequest::Attach { pid }),
            Command::Detach => self.request(EngineRequest::Detach),
            Command::Processes => {
                self.request(EngineRequest::ListProcesses);
                self.ui_mode = UiMode::ProcessPicker;
                self.process_picker.filter.clear();
            }
            Command::Monitor(expression) => {
                if self.watch.add(&expression) {
                    self.current_view = View::Watch;
                    self.pending
                        .insert(expression.clone(), PendingKind::MonitorValue);
                    self.request(EngineRequest::PrintVariableValue { qname: expression });
                } else {
                    self.push_log("WARN", &format!("already monitoring \"{}\"", expression));
                }
            }
            Command::Unmonitor(expression) => match self.watch.remove(&expression) {
                Ok(true) => {
                    self.pending.remove(&expression);
                    self.push_log("INFO", &format!("stopped monitoring \"{}\"", expression));
                }
                Ok(false) => {
                    self.push_log("WARN", &format!("\"{}\" is not monitored", expression));
                }
                Err(err) => self.push_log("ERROR", &err.to_string()),
            },
            Command::Print(expression) => {
                self.pending
                    .insert(expression.clone(), PendingKind::OneShotPrint);
                self.request(EngineRequest::PrintVariableValue { qname: expression });
            }
            Command::TypeOf(expression) => {
                self.pending.insert(expression.clone(), PendingKind::TypeOf);
                self.request(EngineRequest::PrintVariableType { qname: expression });
            }
            Command::Deref(expression) => {
                self.pending
                    .insert(expression.clone(), PendingKind::Pointed);
                self.request(EngineRequest::PrintPointedVariableValue { qname: expression });
            }
            Command::Globals => {
                self.globals_seen = true;
                self.current_view = View::Globals;
                self.request(EngineRequest::ListGlobalVariables);
            }
            Command::Frame(number) => self.request(EngineRequest::SelectFrame { number }),
            Command::Memory(address, length) => {
                self.current_view = View::Memory;
                self.request(EngineRequest::ReadMemory { address, length });
            }
            Command::Help(_) => self.ui_mode = UiMode::HelpOverlay,
            Command::Quit => {
                if self.attached_pid.is_some() {
                    self.request(EngineRequest::Detach);
                }
                self.running = false;
            }
            Command::Unknown(text) => {
                if !text.is_empty() {
                    self.push_log("WARN", &format!("unknown command: {}", text));
                }
            }
        }
    }

    // ---- engine events ----

    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Stopped(stop) => self.on_stopped(stop),
            EngineEvent::Resumed => {
                self.session = SessionState::Running;
            }
            EngineEvent::Attached { pid } => {
                self.attached_pid = Some(pid);
                self.push_log("INFO", &format!("attached to pid {}", pid));
            }
            EngineEvent::Detached => {
                self.attached_pid = None;
                self.session = SessionState::Detached;
                self.last_frame = None;
                self.stack.clear();
                self.registers.clear();
                self.memory.clear();
                self.pending.clear();
                if let Err(err) = self.locals.begin_frame() {
                    self.push_log("ERROR", &err.to_string());
                }
                self.push_log("INFO", "detached");
            }
            EngineEvent::LocalVariablesListed(variables) => {
                let is_new_frame = self.is_new_frame;
                let refetch = self.locals.set_locals(&variables, is_new_frame);
                // Previously unfolded pointers go stale on every stop; the
                // engine only reports fetched targets on unfold
                for qname in refetch {
                    self.unfold(qname);
                }
            }
            EngineEvent::GlobalVariablesListed(variables) => {
                self.globals.set_globals(&variables);
            }
            EngineEvent::VariableValuePrinted { qname, variable } => {
                match self.pending.remove(&qname) {
                    Some(PendingKind::OneShotPrint) => {
                        self.push_log("INFO", &variable.format());
                    }
                    _ => self.route_value(&qname, &variable),
                }
            }
            EngineEvent::VariableTypePrinted { qname, type_name } => {
                self.pending.remove(&qname);
                self.push_log("INFO", &format!("type of {} is {}", qname, type_name));
                match self.locals.apply_type(&qname, &type_name) {
                    Ok(_) => {}
                    Err(err) => debug!("type for \"{}\" not placed: {}", qname, err),
                }
            }
            EngineEvent::PointedVariableValuePrinted { qname, variable } => {
                self.pending.remove(&qname);
                self.push_log("INFO", &variable.format());
                // A visible pointed-value row gets refreshed too
                if let Err(err) = self.locals.apply_value(variable.name(), &variable, false) {
                    debug!("pointed value for \"{}\" not placed: {}", qname, err);
                }
            }
            EngineEvent::VariableUnfolded { qname, mut variable } => {
                self.pending.remove(&qname);
                variable.truncate_members(self.unfold_chunk);
                let is_new_frame = self.is_new_frame;
                let placed = match self.watch.apply_unfold(&qname, &variable, is_new_frame) {
                    Ok(true) => true,
                    Ok(false) => match self.locals.apply_unfold(&qname, &variable, is_new_frame) {
                        Ok(placed) => placed,
                        Err(err) => {
                            self.push_log("ERROR", &format!("unfold {}: {}", qname, err));
                            return;
                        }
                    },
                    Err(err) => {
                        self.push_log("ERROR", &format!("unfold {}: {}", qname, err));
                        return;
                    }
                };
                if !placed {
                    debug!("unfold completion for \"{}\" found no row", qname);
                }
            }
            EngineEvent::FramesListed(frames) => self.stack.set_frames(frames),
            EngineEvent::FrameSelected(frame) => {
                self.push_log("INFO", &format!("frame {}", frame));
                self.is_new_frame = true;
                self.last_frame = Some(frame);
                if let Err(err) = self.locals.begin_frame() {
                    self.push_log("ERROR", &err.to_string());
                }
                self.request(EngineRequest::ListLocalVariables);
            }
            EngineEvent::RegistersListed(registers) => self.registers.set_registers(registers),
            EngineEvent::MemoryRead(block) => self.memory.set_block(block),
            EngineEvent::ProcessesListed(entries) => self.process_picker.set_entries(entries),
            EngineEvent::RequestFailed { request, message } => {
                self.push_log("WARN", &format!("{}: {}", request, message));
            }
        }
    }

    /// Route a value completion to the watch or locals panel
    fn route_value(&mut self, qname: &str, variable: &crate::engine::variable::Variable) {
        if self.watch.is_monitored(qname) {
            let is_new_frame = self.is_new_frame;
            if let Err(err) = self.watch.apply_value(qname, variable, is_new_frame) {
                // Structural mismatches abort this one refresh; the panel
                // catches up on the next stop.
                self.push_log("ERROR", &format!("watch {}: {}", qname, err));
            }
            return;
        }
        let is_new_frame = self.is_new_frame;
        match self.locals.apply_value(qname, variable, is_new_frame) {
            Ok(true) => {}
            Ok(false) => debug!("value for \"{}\" found no row", qname),
            Err(err) => self.push_log("ERROR", &format!("{}: {}", qname, err)),
        }
    }

    fn on_stopped(&mut self, stop: StopEvent) {
        if stop.reason.is_exit() {
            self.push_log("INFO", &format!("inferior {}", stop.reason));
            self.session = SessionState::Detached;
            self.attached_pid = None;
            self.last_stop = Some(stop.reason.to_string());
            self.last_frame = None;
            self.stack.clear();
            self.registers.clear();
            return;
        }

        self.session = SessionState::Stopped;
        self.last_stop = Some(stop.reason.to_string());

        self.is_new_frame = match (&self.last_frame, &stop.frame) {
            (Some(previous), Some(current)) => !previous.same_frame(current),
            _ => true,
        };
        self.last_frame = stop.frame.clone();

        match &stop.frame {
            Some(frame) => self.push_log("INFO", &format!("stopped: {} at {}", stop.reason, frame)),
            None => self.push_log("INFO", &format!("stopped: {}", stop.reason)),
        }

        if !stop.has_frame {
            return;
        }

        if self.is_new_frame {
            if let Err(err) = self.locals.begin_frame() {
                self.push_log("ERROR", &err.to_string());
                return;
            }
        }

        self.request(EngineRequest::ListFrames);
        self.request(EngineRequest::ListLocalVariables);
        self.request(EngineRequest::ListRegisters);
        if self.globals_seen {
            self.request(EngineRequest::ListGlobalVariables);
        }

        // Re-evaluate every monitored expression against the new context
        for expression in self.watch.expressions().to_vec() {
            self.pending
                .insert(expression.clone(), PendingKind::MonitorValue);
            self.request(EngineRequest::PrintVariableValue { qname: expression });
        }
    }
}
