//! Per-method feature extraction.
//!
//! Each method body is folded once, left to right, into an immutable
//! [`Counters`] value. No instruction is looked at twice and nothing is
//! shared between methods.

use crate::classfile::{ClassFile, Instruction, Invocation, MethodBody};

pub const CLIENT_SUFFIX: &str = "Client";
pub const REPOSITORY_SUFFIX: &str = "Repository";
pub const BUILDER_SUFFIX: &str = "Builder";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub monitor_acquire_count: u32,
    pub invocation_count: u32,
    pub branch_count: u32,
    pub has_client_style_call: bool,
    pub has_repository_style_call: bool,
}

impl Counters {
    /// Folds one instruction into the running counters.
    pub fn accumulate(self, insn: &Instruction) -> Self {
        match insn {
            Instruction::MonitorEnter => Self {
                monitor_acquire_count: self.monitor_acquire_count.saturating_add(1),
                ..self
            },
            Instruction::Invoke(call) => Self {
                invocation_count: self.invocation_count.saturating_add(1),
                has_client_style_call: self.has_client_style_call
                    || is_dependency_call(call, CLIENT_SUFFIX),
                has_repository_style_call: self.has_repository_style_call
                    || is_dependency_call(call, REPOSITORY_SUFFIX),
                ..self
            },
            // A switch counts once, however many cases it dispatches to.
            Instruction::ConditionalBranch | Instruction::Switch(_) => Self {
                branch_count: self.branch_count.saturating_add(1),
                ..self
            },
            Instruction::Other(_) => self,
        }
    }
}

/// True when `call` goes out to a `*<suffix>` type and is not a fluent,
/// builder or factory call returning the same kind of object.
fn is_dependency_call(call: &Invocation, suffix: &str) -> bool {
    let Some(owner) = call.owner.as_deref() else {
        return false;
    };
    let ret = call.return_type.as_str();
    owner != ret
        && owner.ends_with(suffix)
        && !ret.ends_with(suffix)
        && !ret.ends_with(BUILDER_SUFFIX)
}

pub fn count_instructions(instructions: &[Instruction]) -> Counters {
    instructions
        .iter()
        .fold(Counters::default(), Counters::accumulate)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodUnit {
    pub name: String,
    pub is_synchronized: bool,
    pub counters: Counters,
}

impl MethodUnit {
    pub fn from_body(body: &MethodBody) -> Self {
        Self {
            name: body.name.clone(),
            is_synchronized: body.access.is_synchronized(),
            counters: count_instructions(&body.instructions),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassUnit {
    pub name: String,
    pub methods: Vec<MethodUnit>,
}

impl ClassUnit {
    pub fn from_class_file(class: &ClassFile) -> Self {
        Self {
            name: class.name.clone(),
            methods: class.methods.iter().map(MethodUnit::from_body).collect(),
        }
    }
}
