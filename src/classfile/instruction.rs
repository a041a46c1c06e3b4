use super::constant_pool::ConstantPool;
use super::descriptor;
use super::reader::ByteReader;
use crate::error::DecodeError;

pub const MONITORENTER: u8 = 0xC2;
pub const INVOKEVIRTUAL: u8 = 0xB6;
pub const INVOKESPECIAL: u8 = 0xB7;
pub const INVOKESTATIC: u8 = 0xB8;
pub const INVOKEINTERFACE: u8 = 0xB9;
pub const INVOKEDYNAMIC: u8 = 0xBA;
pub const TABLESWITCH: u8 = 0xAA;
pub const LOOKUPSWITCH: u8 = 0xAB;
const IFEQ: u8 = 0x99;
const IF_ACMPNE: u8 = 0xA6;
const IFNULL: u8 = 0xC6;
const IFNONNULL: u8 = 0xC7;
const WIDE: u8 = 0xC4;
const IINC: u8 = 0x84;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvokeKind {
    Virtual,
    Special,
    Static,
    Interface,
    Dynamic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub kind: InvokeKind,
    /// Declaring type, internal form. Absent for invokedynamic call sites.
    pub owner: Option<String>,
    pub name: String,
    pub descriptor: String,
    pub return_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchKind {
    Table,
    Lookup,
}

/// One decoded bytecode instruction, reduced to what classification reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    MonitorEnter,
    Invoke(Invocation),
    ConditionalBranch,
    Switch(SwitchKind),
    Other(u8),
}

/// Decodes a method's `Code` array into a flat, ordered instruction stream.
pub fn decode_code(code: &[u8], pool: &ConstantPool) -> Result<Vec<Instruction>, DecodeError> {
    let mut r = ByteReader::new(code);
    let mut out = Vec::new();

    while !r.is_empty() {
        let offset = r.position();
        let opcode = r.u8()?;
        let insn = match opcode {
            MONITORENTER => Instruction::MonitorEnter,
            INVOKEVIRTUAL | INVOKESPECIAL | INVOKESTATIC => {
                let kind = match opcode {
                    INVOKEVIRTUAL => InvokeKind::Virtual,
                    INVOKESPECIAL => InvokeKind::Special,
                    _ => InvokeKind::Static,
                };
                invocation(kind, r.u16()?, pool)?
            }
            INVOKEINTERFACE => {
                let index = r.u16()?;
                r.skip(2)?;
                invocation(InvokeKind::Interface, index, pool)?
            }
            INVOKEDYNAMIC => {
                let index = r.u16()?;
                r.skip(2)?;
                let (name, descriptor) = pool.invoke_dynamic(index)?;
                Instruction::Invoke(Invocation {
                    kind: InvokeKind::Dynamic,
                    owner: None,
                    name: name.to_string(),
                    descriptor: descriptor.to_string(),
                    return_type: descriptor::return_type(descriptor)?.to_string(),
                })
            }
            // Conditional jumps only. goto and jsr are left as Other, so loops
            // score lower than under a visitor that counts every jump insn.
            IFEQ..=IF_ACMPNE | IFNULL | IFNONNULL => {
                r.skip(2)?;
                Instruction::ConditionalBranch
            }
            TABLESWITCH => {
                skip_padding(&mut r)?;
                r.skip(4)?;
                let low = r.i32()?;
                let high = r.i32()?;
                if high < low {
                    return Err(DecodeError::MalformedSwitch { offset });
                }
                let targets = (high as i64 - low as i64 + 1) as usize;
                r.skip(targets * 4)
                    .map_err(|_| DecodeError::MalformedSwitch { offset })?;
                Instruction::Switch(SwitchKind::Table)
            }
            LOOKUPSWITCH => {
                skip_padding(&mut r)?;
                r.skip(4)?;
                let pairs = r.i32()?;
                if pairs < 0 {
                    return Err(DecodeError::MalformedSwitch { offset });
                }
                r.skip(pairs as usize * 8)
                    .map_err(|_| DecodeError::MalformedSwitch { offset })?;
                Instruction::Switch(SwitchKind::Lookup)
            }
            WIDE => {
                let widened = r.u8()?;
                r.skip(if widened == IINC { 4 } else { 2 })?;
                Instruction::Other(opcode)
            }
            _ => {
                let width = operand_width(opcode)
                    .ok_or(DecodeError::InvalidOpcode { offset, opcode })?;
                r.skip(width)?;
                Instruction::Other(opcode)
            }
        };
        out.push(insn);
    }

    Ok(out)
}

fn invocation(kind: InvokeKind, index: u16, pool: &ConstantPool) -> Result<Instruction, DecodeError> {
    let (owner, name, descriptor) = pool.method_ref(index)?;
    Ok(Instruction::Invoke(Invocation {
        kind,
        owner: Some(owner.to_string()),
        name: name.to_string(),
        descriptor: descriptor.to_string(),
        return_type: descriptor::return_type(descriptor)?.to_string(),
    }))
}

/// Switch operands start on a 4-byte boundary relative to the code start.
fn skip_padding(r: &mut ByteReader<'_>) -> Result<(), DecodeError> {
    let pad = (4 - r.position() % 4) % 4;
    r.skip(pad)
}

/// Operand bytes following fixed-width opcodes; `None` for opcodes that
/// may not appear in a class file.
fn operand_width(opcode: u8) -> Option<usize> {
    let width = match opcode {
        0x00..=0x0F => 0,
        0x10 => 1,
        0x11 => 2,
        0x12 => 1,
        0x13 | 0x14 => 2,
        0x15..=0x19 => 1,
        0x1A..=0x35 => 0,
        0x36..=0x3A => 1,
        0x3B..=0x83 => 0,
        0x84 => 2,
        0x85..=0x98 => 0,
        0xA7 | 0xA8 => 2,
        0xA9 => 1,
        0xAC..=0xB1 => 0,
        0xB2..=0xB5 => 2,
        0xBB => 2,
        0xBC => 1,
        0xBD => 2,
        0xBE | 0xBF => 0,
        0xC0 | 0xC1 => 2,
        0xC3 => 0,
        0xC5 => 3,
        0xC8 | 0xC9 => 4,
        _ => return None,
    };
    Some(width)
}
