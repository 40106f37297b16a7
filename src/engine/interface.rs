use std::fmt;

use thiserror::Error;

use crate::engine::memory::MemoryBlock;
use crate::engine::process::ProcessInfo;
use crate::engine::registers::Registers;
use crate::engine::stack::StackFrame;
use crate::engine::variable::Variable;

/// Why the inferior stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Stopped at a breakpoint
    Breakpoint,
    /// Finished a step
    Step,
    /// Received a signal
    SignalReceived(i32),
    /// A watched expression changed
    WatchTriggered,
    /// The inferior exited
    Exited(i32),
}

impl StopReason {
    /// Get a human-readable description of the reason
    pub fn description(&self) -> String {
        match self {
            StopReason::Breakpoint => "breakpoint".to_string(),
            StopReason::Step => "step".to_string(),
            StopReason::SignalReceived(signal) => format!("signal {}", signal),
            StopReason::WatchTriggered => "watch triggered".to_string(),
            StopReason::Exited(code) => format!("exited ({})", code),
        }
    }

    /// Whether the inferior is gone after this stop
    pub fn is_exit(&self) -> bool {
        matches!(self, StopReason::Exited(_))
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// An asynchronous "inferior stopped" notification
#[derive(Debug, Clone)]
pub struct StopEvent {
    pub reason: StopReason,
    /// Whether a stack frame is available (signal stops in stubs may not
    /// carry one)
    pub has_frame: bool,
    pub frame: Option<StackFrame>,
    pub thread_id: u32,
}

/// A request submitted to the engine.
///
/// Variable requests carry their correlation key, the qualified name; the
/// matching event echoes it back so responses can be routed to the row
/// that asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineRequest {
    // Inspection
    ListLocalVariables,
    ListGlobalVariables,
    PrintVariableValue { qname: String },
    PrintVariableType { qname: String },
    PrintPointedVariableValue { qname: String },
    UnfoldVariable { qname: String },
    ListFrames,
    SelectFrame { number: usize },
    ListRegisters,
    ReadMemory { address: u64, length: usize },

    // Session
    ListProcesses,
    Attach { pid: u32 },
    Detach,

    // Execution
    Run,
    Continue,
    Step,
    Next,
    Finish,
}

/// A completion or notification drained from the engine
#[derive(Debug, Clone)]
pub enum EngineEvent {
    LocalVariablesListed(Vec<Variable>),
    GlobalVariablesListed(Vec<Variable>),
    VariableValuePrinted { qname: String, variable: Variable },
    VariableTypePrinted { qname: String, type_name: String },
    PointedVariableValuePrinted { qname: String, variable: Variable },
    VariableUnfolded { qname: String, variable: Variable },
    FramesListed(Vec<StackFrame>),
    FrameSelected(StackFrame),
    RegistersListed(Registers),
    MemoryRead(MemoryBlock),
    ProcessesListed(Vec<ProcessInfo>),
    Attached { pid: u32 },
    Detached,
    Resumed,
    Stopped(StopEvent),
    /// A request the engine could not serve; message is display-ready
    RequestFailed { request: String, message: String },
}

/// Errors raised when talking to the engine itself
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// The engine side of the channel is gone
    #[error("debugger engine disconnected")]
    Disconnected,
    /// The request needs an attached inferior
    #[error("not attached to an inferior")]
    NotAttached,
}

/// The debugger engine as seen by the front-end.
///
/// All calls are non-blocking: `submit` queues a request, `poll` drains
/// whatever completions and notifications have arrived. Both are made from
/// the single UI thread; completions for a request are expected (not
/// guaranteed) before the next stop is processed, and late completions are
/// tolerated by validating target rows before use.
pub trait DebuggerEngine {
    /// Short engine name for the status bar
    fn name(&self) -> &str;

    /// Queue a request for the engine
    fn submit(&mut self, request: EngineRequest) -> Result<(), EngineError>;

    /// Drain pending completions and notifications
    fn poll(&mut self) -> Vec<EngineEvent>;
}
