//! Decoder for compiled JVM class files.
//!
//! Only the parts classification reads are kept: the class name and, per
//! method, its name, descriptor, access flags and a flat instruction stream.
//! Fields and attributes other than `Code` are skipped without inspection.

mod constant_pool;
mod descriptor;
mod instruction;
mod reader;

pub use constant_pool::ConstantPool;
pub use descriptor::return_type;
pub use instruction::{Instruction, Invocation, InvokeKind, SwitchKind, decode_code};

use crate::error::DecodeError;
use reader::ByteReader;

pub const MAGIC: u32 = 0xCAFE_BABE;
pub const MIN_MAJOR_VERSION: u16 = 45;
/// Java 25.
pub const MAX_MAJOR_VERSION: u16 = 69;

pub const ACC_SYNCHRONIZED: u16 = 0x0020;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MethodAccess(pub u16);

impl MethodAccess {
    pub fn is_synchronized(self) -> bool {
        self.0 & ACC_SYNCHRONIZED != 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodBody {
    pub name: String,
    pub access: MethodAccess,
    pub instructions: Vec<Instruction>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassFile {
    /// Binary name with dots, e.g. `com.acme.OrderService$1`.
    pub name: String,
    pub methods: Vec<MethodBody>,
}

impl ClassFile {
    pub fn parse(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = ByteReader::new(bytes);

        let magic = r.u32()?;
        if magic != MAGIC {
            return Err(DecodeError::BadMagic(magic));
        }
        let minor = r.u16()?;
        let major = r.u16()?;
        if !(MIN_MAJOR_VERSION..=MAX_MAJOR_VERSION).contains(&major) {
            return Err(DecodeError::UnsupportedVersion { major, minor });
        }

        let pool = ConstantPool::parse(&mut r)?;

        let _access = r.u16()?;
        let name = pool.class_name(r.u16()?)?.replace('/', ".");
        let _super_class = r.u16()?;
        let interfaces = r.u16()? as usize;
        r.skip(interfaces * 2)?;

        let fields = r.u16()?;
        for _ in 0..fields {
            r.skip(6)?;
            skip_attributes(&mut r)?;
        }

        let method_count = r.u16()?;
        let mut methods = Vec::with_capacity(method_count as usize);
        for _ in 0..method_count {
            methods.push(parse_method(&mut r, &pool)?);
        }

        Ok(Self {
            name,
            methods,
        })
    }
}

fn parse_method(r: &mut ByteReader<'_>, pool: &ConstantPool) -> Result<MethodBody, DecodeError> {
    let access = MethodAccess(r.u16()?);
    let name = pool.utf8(r.u16()?)?.to_string();
    // Descriptor: overloads collapse by name, so it is only validated.
    pool.utf8(r.u16()?)?;

    let mut instructions = Vec::new();
    let attributes = r.u16()?;
    for _ in 0..attributes {
        let attr_name = pool.utf8(r.u16()?)?;
        let len = r.u32()? as usize;
        let body = r.bytes(len)?;
        if attr_name == "Code" {
            let mut code_attr = ByteReader::new(body);
            code_attr.skip(4)?;
            let code_len = code_attr.u32()? as usize;
            instructions = decode_code(code_attr.bytes(code_len)?, pool)?;
        }
    }

    Ok(MethodBody {
        name,
        access,
        instructions,
    })
}

fn skip_attributes(r: &mut ByteReader<'_>) -> Result<(), DecodeError> {
    let count = r.u16()?;
    for _ in 0..count {
        r.skip(2)?;
        let len = r.u32()? as usize;
        r.skip(len)?;
    }
    Ok(())
}
