use std::fmt;

/// A stack frame as reported by the debugger engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    /// Frame number (0 is the innermost frame)
    pub number: usize,
    /// Instruction pointer
    pub pc: u64,
    /// Function name, demangled by the engine
    pub function: String,
    /// Source file, if debug info places the frame
    pub file: Option<String>,
    /// Source line, if debug info places the frame
    pub line: Option<u32>,
}

impl StackFrame {
    pub fn new(number: usize, pc: u64, function: &str) -> Self {
        Self {
            number,
            pc,
            function: function.to_string(),
            file: None,
            line: None,
        }
    }

    /// Attach a source location
    pub fn with_location(mut self, file: &str, line: u32) -> Self {
        self.file = Some(file.to_string());
        self.line = Some(line);
        self
    }

    /// Whether two frames describe the same execution point.
    ///
    /// Used to tell a re-stop in the same frame from a frame switch, which
    /// controls changed-value highlighting.
    pub fn same_frame(&self, other: &StackFrame) -> bool {
        self.function == other.function && self.file == other.file
    }
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} 0x{:012x} {}()", self.number, self.pc, self.function)?;
        if let (Some(file), Some(line)) = (&self.file, self.line) {
            write!(f, " at {}:{}", file, line)?;
        }
        Ok(())
    }
}
