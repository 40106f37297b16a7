use std::collections::VecDeque;

use log::{debug, info};

use crate::engine::interface::{
    DebuggerEngine, EngineError, EngineEvent, EngineRequest, StopEvent, StopReason,
};
use crate::engine::memory::MemoryBlock;
use crate::engine::process::ProcessInfo;
use crate::engine::registers::Registers;
use crate::engine::stack::StackFrame;
use crate::engine::variable::{Variable, VariableKind};

/// Base address of the simulated heap node list
const NODE_BASE: u64 = 0x6000_00c0_4010;

/// In-process engine that simulates a small stopped program.
///
/// Serves as the demo backend and as the deterministic test double for the
/// request/response interface: every completion is queued on `submit` and
/// handed out on the next `poll`, mirroring how a real backend's wire
/// traffic is drained on the UI thread. The inferior is an imaginary
/// `orderd` daemon stopped inside `process_order`; stepping perturbs the
/// visible values.
pub struct ScriptedEngine {
    queue: VecDeque<EngineEvent>,
    attached: Option<u32>,
    stopped: bool,
    /// Number of completed steps; most simulated values derive from it
    steps: u64,
    /// Frames popped off the stack by `finish`
    depth: usize,
    /// Frame whose locals are listed
    selected_frame: usize,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            attached: None,
            stopped: false,
            steps: 0,
            depth: 0,
            selected_frame: 0,
        }
    }

    fn push(&mut self, event: EngineEvent) {
        self.queue.push_back(event);
    }

    fn fail(&mut self, request: &EngineRequest, message: &str) {
        self.push(EngineEvent::RequestFailed {
            request: format!("{:?}", request),
            message: message.to_string(),
        });
    }

    fn frames(&self) -> Vec<StackFrame> {
        let all = [
            ("process_order", 0x0001_0000_3f10 + self.steps * 4, "orders.c", 42),
            ("dispatch_loop", 0x0001_0000_2c80, "dispatch.c", 87),
            ("main", 0x0001_0000_1b40, "main.c", 23),
        ];
        all[self.depth.min(all.len() - 1)..]
            .iter()
            .enumerate()
            .map(|(number, (function, pc, file, line))| {
                StackFrame::new(number, *pc, function).with_location(file, *line)
            })
            .collect()
    }

    fn innermost(&self) -> StackFrame {
        self.frames().remove(0)
    }

    fn stop(&mut self, reason: StopReason) {
        self.stopped = true;
        self.selected_frame = 0;
        let frame = self.innermost();
        self.push(EngineEvent::Stopped(StopEvent {
            reason,
            has_frame: true,
            frame: Some(frame),
            thread_id: 1,
        }));
    }

    /// Locals and arguments of the selected frame, pointers folded
    fn locals(&self) -> Vec<Variable> {
        let function = self
            .frames()
            .get(self.selected_frame)
            .map(|f| f.function.clone())
            .unwrap_or_default();
        let mut vars = match function.as_str() {
            "process_order" => vec![
                self.var_count(),
                self.var_ratio(),
                self.var_order(),
                self.var_cursor(false),
                self.var_req(false),
                self.var_flags(),
            ],
            "dispatch_loop" => vec![
                int_var("queue_len", VariableKind::Local, 7 + self.steps as i64 % 3),
                bool_var("shutting_down", VariableKind::Local, false),
            ],
            _ => vec![
                int_var("argc", VariableKind::Argument, 1),
                str_var("argv", VariableKind::Argument, "0x7ff7bfeff688", "char **"),
            ],
        };
        // Engine-assigned handles, the way an MI backend numbers its
        // variable objects
        for (i, var) in vars.iter_mut().enumerate() {
            var.set_internal_name(&format!("var{}", i + 1));
        }
        vars
    }

    fn globals(&self) -> Vec<Variable> {
        let mut config = Variable::new("g_config", VariableKind::Global);
        config.set_type_name("struct config");
        config.set_value("{...}");
        let mut max_orders = Variable::new("max_orders", VariableKind::Global);
        max_orders.set_type_name("int");
        max_orders.set_value("128");
        config.add_member(max_orders);
        let mut log_path = Variable::new("log_path", VariableKind::Global);
        log_path.set_type_name("char *");
        log_path.set_value("0x100004008 \"/var/log/orderd.log\"");
        config.add_member(log_path);

        vec![
            int_var("g_verbose", VariableKind::Global, (self.steps % 2) as i64),
            config,
        ]
    }

    fn var_count(&self) -> Variable {
        int_var("count", VariableKind::Local, 3 + self.steps as i64)
    }

    fn var_ratio(&self) -> Variable {
        let mut v = Variable::new("ratio", VariableKind::Local);
        v.set_type_name("double");
        v.set_value(&format!("{:.2}", 0.25 * (self.steps + 1) as f64));
        v
    }

    fn var_flags(&self) -> Variable {
        let mut v = Variable::new("flags", VariableKind::Argument);
        v.set_type_name("unsigned int");
        v.set_value("0x4");
        v
    }

    fn var_order(&self) -> Variable {
        let mut order = Variable::new("order", VariableKind::Local);
        order.set_type_name("struct order");
        order.set_value("{...}");

        let mut id = Variable::new("id", VariableKind::Local);
        id.set_type_name("int");
        id.set_value("4711");
        order.add_member(id);

        let mut total = Variable::new("total", VariableKind::Local);
        total.set_type_name("double");
        total.set_value(&format!("{:.2}", 19.90 + self.steps as f64));
        order.add_member(total);

        let mut customer = Variable::new("customer", VariableKind::Local);
        customer.set_type_name("struct customer");
        customer.set_value("{...}");
        let mut name = Variable::new("name", VariableKind::Local);
        name.set_type_name("char *");
        name.set_value("0x100004021 \"Ada\"");
        customer.add_member(name);
        let mut tier = Variable::new("tier", VariableKind::Local);
        tier.set_type_name("int");
        tier.set_value("2");
        customer.add_member(tier);
        order.add_member(customer);

        order
    }

    /// `cursor` walks the node list as the program steps
    fn var_cursor(&self, unfolded: bool) -> Variable {
        let address = NODE_BASE + (self.steps % 4) * 0x30;
        let mut cursor = Variable::new("cursor", VariableKind::Local);
        cursor.set_type_name("struct node *");
        cursor.set_value(&format!("0x{:x}", address));
        cursor.set_needs_unfolding(!unfolded);
        if unfolded {
            let mut pointee = Variable::new("*cursor", VariableKind::Local);
            pointee.set_type_name("struct node");
            pointee.set_value("{...}");

            let mut value = Variable::new("value", VariableKind::Local);
            value.set_type_name("int");
            value.set_value(&format!("{}", 10 + (self.steps % 4) * 10));
            pointee.add_member(value);

            let mut next = Variable::new("next", VariableKind::Local);
            next.set_type_name("struct node *");
            next.set_value(&format!("0x{:x}", address + 0x30));
            next.set_needs_unfolding(true);
            pointee.add_member(next);

            cursor.add_member(pointee);
            cursor.set_needs_unfolding(false);
        }
        cursor
    }

    fn var_req(&self, unfolded: bool) -> Variable {
        let mut req = Variable::new("req", VariableKind::Argument);
        req.set_type_name("struct request *");
        req.set_value("0x600000c08000");
        req.set_needs_unfolding(!unfolded);
        if unfolded {
            let mut pointee = Variable::new("*req", VariableKind::Argument);
            pointee.set_type_name("struct request");
            pointee.set_value("{...}");
            let mut id = Variable::new("id", VariableKind::Argument);
            id.set_type_name("unsigned int");
            id.set_value(&format!("{}", 9000 + self.steps));
            pointee.add_member(id);
            let mut payload = Variable::new("payload", VariableKind::Argument);
            payload.set_type_name("char *");
            payload.set_value("0x600000c08020 \"GET /orders\"");
            pointee.add_member(payload);
            req.add_member(pointee);
            req.set_needs_unfolding(false);
        }
        req
    }

    /// Build the unfold completion for one pointer expression.
    ///
    /// The node list supports unfolding at any depth along the `->next`
    /// chain; each hop advances one simulated node.
    fn unfold_target(&self, qname: &str) -> Option<Variable> {
        let last = qname
            .rsplit(|c: char| c == '.' || c == '>')
            .next()
            .unwrap_or(qname)
            .trim();
        match root_of(qname) {
            "cursor" if last == "cursor" || last == "next" => {
                let hops = self.steps % 4 + qname.matches("next").count() as u64;
                let address = NODE_BASE + hops * 0x30;

                let mut ptr = Variable::new(qname, VariableKind::Local);
                ptr.set_type_name("struct node *");
                ptr.set_value(&format!("0x{:x}", address));

                let mut pointee = Variable::new(&format!("*{}", last), VariableKind::Local);
                pointee.set_type_name("struct node");
                pointee.set_value("{...}");
                pointee.add_member(int_var("value", VariableKind::Local, (10 + hops * 10) as i64));
                let mut next = Variable::new("next", VariableKind::Local);
                next.set_type_name("struct node *");
                next.set_value(&format!("0x{:x}", address + 0x30));
                next.set_needs_unfolding(true);
                pointee.add_member(next);

                ptr.add_member(pointee);
                Some(ptr)
            }
            "req" if last == "req" => Some(self.var_req(true)),
            _ => None,
        }
    }

    /// Fully unfolded root for expression evaluation
    fn unfolded_root(&self, name: &str) -> Option<Variable> {
        match name {
            "count" => Some(self.var_count()),
            "ratio" => Some(self.var_ratio()),
            "order" => Some(self.var_order()),
            "cursor" => Some(self.var_cursor(true)),
            "req" => Some(self.var_req(true)),
            "flags" => Some(self.var_flags()),
            _ => self
                .globals()
                .into_iter()
                .find(|g| g.name() == name),
        }
    }

    /// Evaluate a qualified name against the stopped program.
    ///
    /// Only expressions rooted in a visible variable resolve; everything
    /// else reports out of scope, which is what drives the watch panel's
    /// partitioning.
    fn evaluate(&self, qname: &str) -> Variable {
        let root_name = root_of(qname);

        // Frame 0 names fall out of scope once the frame is gone.
        let visible = self.depth == 0 || self.globals().iter().any(|g| g.name() == root_name);

        let mut result = Variable::new(qname, VariableKind::Monitored);
        if !visible {
            result.set_in_scope(false);
            return result;
        }

        match self.unfolded_root(root_name) {
            Some(root) if root.qualified_name() == qname => {
                let mut monitored = root;
                remonitor(&mut monitored);
                monitored
            }
            Some(root) => match root.find_member(qname) {
                Some(member) => {
                    result.set_value(member.value());
                    result.set_type_name(member.type_name());
                    result
                }
                None => {
                    result.set_in_scope(false);
                    result
                }
            },
            None => {
                result.set_in_scope(false);
                result
            }
        }
    }

    fn registers(&self) -> Registers {
        let mut regs = Registers::new();
        regs.set("pc", 0x0001_0000_3f10 + self.steps * 4);
        regs.set("sp", 0x0000_7ff7_bfef_f640);
        regs.set("fp", 0x0000_7ff7_bfef_f6a0);
        regs.set("x0", 3 + self.steps);
        regs.set("x1", self.steps);
        regs.set("x2", NODE_BASE + (self.steps % 4) * 0x30);
        regs.set("cpsr", 0x6000_0000);
        regs
    }

    fn memory(&self, address: u64, length: usize) -> MemoryBlock {
        // Deterministic pseudo-content so dumps are stable across draws
        let bytes = (0..length)
            .map(|i| {
                let a = address + i as u64;
                ((a ^ (a >> 8) ^ self.steps) & 0xff) as u8
            })
            .collect();
        MemoryBlock::new(address, bytes)
    }

    fn processes(&self) -> Vec<ProcessInfo> {
        vec![
            ProcessInfo::new(4242, "orderd", "/usr/local/bin/orderd --workers 4"),
            ProcessInfo::new(4311, "orderd", "/usr/local/bin/orderd-janitor"),
            ProcessInfo::new(512, "root", "/sbin/launchd"),
            ProcessInfo::new(9921, "ada", "vim orders.c"),
        ]
    }
}

impl Default for ScriptedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DebuggerEngine for ScriptedEngine {
    fn name(&self) -> &str {
        "scripted"
    }

    fn submit(&mut self, request: EngineRequest) -> Result<(), EngineError> {
        debug!("engine request: {:?}", request);

        // Session requests work without an inferior
        match &request {
            EngineRequest::ListProcesses => {
                let list = self.processes();
                self.push(EngineEvent::ProcessesListed(list));
                return Ok(());
            }
            EngineRequest::Attach { pid } => {
                info!("attaching to pid {}", pid);
                self.attached = Some(*pid);
                self.steps = 0;
                self.depth = 0;
                self.push(EngineEvent::Attached { pid: *pid });
                self.stop(StopReason::Breakpoint);
                return Ok(());
            }
            EngineRequest::Run => {
                // Launch the bundled target when nothing is attached yet
                let pid = self.attached.unwrap_or(4242);
                self.attached = Some(pid);
                self.steps = 0;
                self.depth = 0;
                self.push(EngineEvent::Attached { pid });
                self.push(EngineEvent::Resumed);
                self.stop(StopReason::Breakpoint);
                return Ok(());
            }
            EngineRequest::Detach => {
                self.attached = None;
                self.stopped = false;
                self.push(EngineEvent::Detached);
                return Ok(());
            }
            _ => {}
        }

        if self.attached.is_none() {
            return Err(EngineError::NotAttached);
        }

        match request {
            EngineRequest::ListLocalVariables => {
                let locals = self.locals();
                self.push(EngineEvent::LocalVariablesListed(locals));
            }
            EngineRequest::ListGlobalVariables => {
                let globals = self.globals();
                self.push(EngineEvent::GlobalVariablesListed(globals));
            }
            EngineRequest::PrintVariableValue { ref qname } => {
                let variable = self.evaluate(qname);
                self.push(EngineEvent::VariableValuePrinted {
                    qname: qname.clone(),
                    variable,
                });
            }
            EngineRequest::PrintVariableType { ref qname } => {
                let variable = self.evaluate(qname);
                if variable.in_scope() {
                    self.push(EngineEvent::VariableTypePrinted {
                        qname: qname.clone(),
                        type_name: variable.type_name().to_string(),
                    });
                } else {
                    self.fail(&request, "expression is not in scope");
                }
            }
            EngineRequest::PrintPointedVariableValue { ref qname } => {
                let variable = self.evaluate(&format!("*{}", qname));
                self.push(EngineEvent::PointedVariableValuePrinted {
                    qname: qname.clone(),
                    variable,
                });
            }
            EngineRequest::UnfoldVariable { ref qname } => match self.unfold_target(qname) {
                Some(variable) => self.push(EngineEvent::VariableUnfolded {
                    qname: qname.clone(),
                    variable,
                }),
                None => self.fail(&request, "nothing to unfold"),
            },
            EngineRequest::ListFrames => {
                let frames = self.frames();
                self.push(EngineEvent::FramesListed(frames));
            }
            EngineRequest::SelectFrame { number } => {
                let frames = self.frames();
                match frames.into_iter().find(|f| f.number == number) {
                    Some(frame) => {
                        self.selected_frame = number;
                        self.push(EngineEvent::FrameSelected(frame));
                    }
                    None => self.fail(&request, "no such frame"),
                }
            }
            EngineRequest::ListRegisters => {
                let regs = self.registers();
                self.push(EngineEvent::RegistersListed(regs));
            }
            EngineRequest::ReadMemory { address, length } => {
                let block = self.memory(address, length.min(4096));
                self.push(EngineEvent::MemoryRead(block));
            }
            EngineRequest::Continue => {
                self.push(EngineEvent::Resumed);
                self.steps += 5;
                self.depth = 0;
                self.stop(StopReason::Breakpoint);
            }
            EngineRequest::Step | EngineRequest::Next => {
                self.push(EngineEvent::Resumed);
                self.steps += 1;
                self.stop(StopReason::Step);
            }
            EngineRequest::Finish => {
                self.push(EngineEvent::Resumed);
                self.steps += 1;
                if self.depth < 2 {
                    self.depth += 1;
                }
                self.stop(StopReason::Step);
            }
            // Session requests were handled above
            EngineRequest::ListProcesses
            | EngineRequest::Attach { .. }
            | EngineRequest::Detach
            | EngineRequest::Run => {}
        }
        Ok(())
    }

    fn poll(&mut self) -> Vec<EngineEvent> {
        self.queue.drain(..).collect()
    }
}

fn int_var(name: &str, kind: VariableKind, value: i64) -> Variable {
    let mut v = Variable::new(name, kind);
    v.set_type_name("int");
    v.set_value(&value.to_string());
    v
}

fn bool_var(name: &str, kind: VariableKind, value: bool) -> Variable {
    let mut v = Variable::new(name, kind);
    v.set_type_name("bool");
    v.set_value(if value { "true" } else { "false" });
    v
}

fn str_var(name: &str, kind: VariableKind, value: &str, type_name: &str) -> Variable {
    let mut v = Variable::new(name, kind);
    v.set_type_name(type_name);
    v.set_value(value);
    v
}

/// First element of a qualified name, dereference prefix stripped
fn root_of(qname: &str) -> &str {
    let stripped = qname.trim().trim_start_matches('*').trim_start();
    let end = stripped
        .find(|c| c == '.' || c == '-')
        .unwrap_or(stripped.len());
    stripped[..end].trim_end()
}

/// Rebrand an evaluated root as a monitored expression
fn remonitor(variable: &mut Variable) {
    // Kind propagates to members on attach, so rebuilding the root is
    // enough for the panel's bookkeeping.
    let mut rebranded = Variable::new(variable.name(), VariableKind::Monitored);
    rebranded.set_value(variable.value());
    rebranded.set_type_name(variable.type_name());
    rebranded.set_needs_unfolding(variable.needs_unfolding());
    for member in variable.members() {
        rebranded.add_member(member.clone());
    }
    *variable = rebranded;
}
