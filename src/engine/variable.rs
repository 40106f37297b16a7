use std::fmt;

/// Where a variable came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    /// Local variable of the selected frame
    Local,
    /// Function argument of the selected frame
    Argument,
    /// Global variable
    Global,
    /// User-monitored expression
    Monitored,
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableKind::Local => write!(f, "local"),
            VariableKind::Argument => write!(f, "argument"),
            VariableKind::Global => write!(f, "global"),
            VariableKind::Monitored => write!(f, "monitored"),
        }
    }
}

/// One variable or expression as described by the debugger engine.
///
/// The engine reports values and types as display strings; this front-end
/// renders them, it does not interpret them. Members are attached through
/// `add_member`, which derives the member's qualified name from the
/// parent's and flags it as a member so that it can never pose as a
/// root-level monitored expression.
#[derive(Debug, Clone)]
pub struct Variable {
    name: String,
    qualified_name: String,
    internal_name: String,
    value: String,
    type_name: String,
    members: Vec<Variable>,
    in_scope: bool,
    needs_unfolding: bool,
    kind: VariableKind,
    member: bool,
}

impl Variable {
    /// Create a new root-level variable
    pub fn new(name: &str, kind: VariableKind) -> Self {
        Self {
            name: name.to_string(),
            qualified_name: name.to_string(),
            internal_name: String::new(),
            value: String::new(),
            type_name: String::new(),
            members: Vec::new(),
            in_scope: true,
            needs_unfolding: false,
            kind,
            member: false,
        }
    }

    /// Get the display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the dotted/arrow path identifying this variable from its root
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Get the engine-assigned handle; may be empty
    pub fn internal_name(&self) -> &str {
        &self.internal_name
    }

    /// Set the engine-assigned handle
    pub fn set_internal_name(&mut self, internal_name: &str) {
        self.internal_name = internal_name.to_string();
    }

    /// Get the current value string
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Set the current value string
    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
    }

    /// Get the declared type string
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Set the declared type string
    pub fn set_type_name(&mut self, type_name: &str) {
        self.type_name = type_name.to_string();
    }

    /// Get the ordered member variables
    pub fn members(&self) -> &[Variable] {
        &self.members
    }

    /// Check whether the variable is valid in the current execution context
    pub fn in_scope(&self) -> bool {
        self.in_scope
    }

    /// Set the scope flag
    pub fn set_in_scope(&mut self, in_scope: bool) {
        self.in_scope = in_scope;
    }

    /// Check whether children have not been fetched from the engine yet
    pub fn needs_unfolding(&self) -> bool {
        self.needs_unfolding
    }

    /// Set the unfolding flag
    pub fn set_needs_unfolding(&mut self, needs_unfolding: bool) {
        self.needs_unfolding = needs_unfolding;
    }

    /// Get the variable kind
    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    /// Check whether this variable is a member of another variable
    pub fn is_member(&self) -> bool {
        self.member
    }

    /// Whether the declared type reads as a pointer type
    pub fn is_pointer_type(&self) -> bool {
        self.type_name.trim_end().ends_with('*')
    }

    /// Attach a member variable.
    ///
    /// The member's qualified name is derived here: `*name` members name
    /// the value this pointer points to, other members extend the path
    /// with `->` through a pointer parent and `.` otherwise.
    pub fn add_member(&mut self, mut member: Variable) {
        member.member = true;
        member.kind = self.kind;
        member.qualified_name = if member.name.starts_with('*') {
            format!("*{}", self.qualified_name)
        } else if let Some(base) = self.qualified_name.strip_prefix('*') {
            // Members of a pointed value keep the arrow path: the children
            // of `*p` are addressed as `p->member`.
            format!("{}->{}", base, member.name)
        } else if self.is_pointer_type() {
            format!("{}->{}", self.qualified_name, member.name)
        } else {
            format!("{}.{}", self.qualified_name, member.name)
        };
        self.members.push(member);
    }

    /// Drop members beyond `keep` at every level.
    ///
    /// Applies the configured unfold chunk so one expansion of a huge
    /// aggregate cannot flood the tree.
    pub fn truncate_members(&mut self, keep: usize) {
        self.members.truncate(keep);
        for member in &mut self.members {
            member.truncate_members(keep);
        }
    }

    /// Depth-first search through members by qualified name
    pub fn find_member(&self, qualified_name: &str) -> Option<&Variable> {
        if self.qualified_name == qualified_name {
            return Some(self);
        }
        self.members
            .iter()
            .find_map(|m| m.find_member(qualified_name))
    }

    /// Format the variable for one-line display
    pub fn format(&self) -> String {
        let mut result = format!("{} = {}", self.qualified_name, self.value);
        if !self.type_name.is_empty() {
            result.push_str(&format!(" ({})", self.type_name));
        }
        if !self.in_scope {
            result.push_str(" [out of scope]");
        }
        result
    }
}
