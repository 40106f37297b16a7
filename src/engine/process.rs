use std::fmt;

/// A process the engine can attach to; feeds the process-selection overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    pub pid: u32,
    pub user: String,
    pub command: String,
}

impl ProcessInfo {
    pub fn new(pid: u32, user: &str, command: &str) -> Self {
        Self {
            pid,
            user: user.to_string(),
            command: command.to_string(),
        }
    }

    /// Case-insensitive match against pid or command line
    pub fn matches(&self, filter: &str) -> bool {
        if filter.is_empty() {
            return true;
        }
        let filter = filter.to_lowercase();
        self.pid.to_string().contains(&filter) || self.command.to_lowercase().contains(&filter)
    }
}

impl fmt::Display for ProcessInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>7}  {:<10}  {}", self.pid, self.user, self.command)
    }
}
