#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_STATIC: u16 = 0x0008;
pub const ACC_SYNCHRONIZED: u16 = 0x0020;
pub const ACC_SYNTHETIC: u16 = 0x1000;
pub const ACC_ABSTRACT: u16 = 0x0400;

pub const ICONST_1: u8 = 0x04;
pub const ILOAD_1: u8 = 0x1B;
pub const ALOAD_0: u8 = 0x2A;
pub const ALOAD_1: u8 = 0x2B;
pub const ASTORE_1: u8 = 0x4C;
pub const POP: u8 = 0x57;
pub const DUP: u8 = 0x59;
pub const IRETURN: u8 = 0xAC;
pub const ARETURN: u8 = 0xB0;
pub const RETURN: u8 = 0xB1;
pub const MONITOREXIT: u8 = 0xC3;

/// Minimal class-file assembler for tests.
pub struct ClassBuilder {
    pool: Vec<Vec<u8>>,
    utf8: HashMap<String, u16>,
    this_class: u16,
    super_class: u16,
    fields: Vec<Vec<u8>>,
    methods: Vec<Vec<u8>>,
    major: u16,
}

impl ClassBuilder {
    pub fn new(internal_name: &str) -> Self {
        let mut b = Self {
            pool: Vec::new(),
            utf8: HashMap::new(),
            this_class: 0,
            super_class: 0,
            fields: Vec::new(),
            methods: Vec::new(),
            major: 52,
        };
        b.this_class = b.class(internal_name);
        b.super_class = b.class("java/lang/Object");
        b
    }

    pub fn major_version(mut self, major: u16) -> Self {
        self.major = major;
        self
    }

    fn push(&mut self, entry: Vec<u8>) -> u16 {
        self.pool.push(entry);
        self.pool.len() as u16
    }

    pub fn utf8(&mut self, s: &str) -> u16 {
        if let Some(index) = self.utf8.get(s) {
            return *index;
        }
        let mut entry = vec![1u8];
        entry.extend((s.len() as u16).to_be_bytes());
        entry.extend(s.as_bytes());
        let index = self.push(entry);
        self.utf8.insert(s.to_string(), index);
        index
    }

    pub fn class(&mut self, internal_name: &str) -> u16 {
        let name = self.utf8(internal_name);
        let mut entry = vec![7u8];
        entry.extend(name.to_be_bytes());
        self.push(entry)
    }

    fn name_and_type(&mut self, name: &str, descriptor: &str) -> u16 {
        let name = self.utf8(name);
        let descriptor = self.utf8(descriptor);
        let mut entry = vec![12u8];
        entry.extend(name.to_be_bytes());
        entry.extend(descriptor.to_be_bytes());
        self.push(entry)
    }

    fn member_ref(&mut self, tag: u8, owner: &str, name: &str, descriptor: &str) -> u16 {
        let class = self.class(owner);
        let nat = self.name_and_type(name, descriptor);
        let mut entry = vec![tag];
        entry.extend(class.to_be_bytes());
        entry.extend(nat.to_be_bytes());
        self.push(entry)
    }

    pub fn method_ref(&mut self, owner: &str, name: &str, descriptor: &str) -> u16 {
        self.member_ref(10, owner, name, descriptor)
    }

    pub fn interface_method_ref(&mut self, owner: &str, name: &str, descriptor: &str) -> u16 {
        self.member_ref(11, owner, name, descriptor)
    }

    pub fn long_constant(&mut self, value: i64) -> u16 {
        let mut entry = vec![5u8];
        entry.extend(value.to_be_bytes());
        let index = self.push(entry);
        // Longs occupy two slots; the second is never referenced.
        self.pool.push(Vec::new());
        index
    }

    pub fn invoke_dynamic(&mut self, name: &str, descriptor: &str) -> u16 {
        let nat = self.name_and_type(name, descriptor);
        let mut entry = vec![18u8, 0, 0];
        entry.extend(nat.to_be_bytes());
        self.push(entry)
    }

    pub fn field(mut self, name: &str, descriptor: &str) -> Self {
        let name = self.utf8(name);
        let descriptor = self.utf8(descriptor);
        let signature = self.utf8("Signature");
        let mut f = Vec::new();
        f.extend(0x0002u16.to_be_bytes());
        f.extend(name.to_be_bytes());
        f.extend(descriptor.to_be_bytes());
        f.extend(1u16.to_be_bytes());
        f.extend(signature.to_be_bytes());
        f.extend(2u32.to_be_bytes());
        f.extend(descriptor.to_be_bytes());
        self.fields.push(f);
        self
    }

    pub fn method(mut self, access: u16, name: &str, descriptor: &str, code: Code) -> Self {
        let name = self.utf8(name);
        let descriptor = self.utf8(descriptor);
        let code_name = self.utf8("Code");
        let code = code.into_bytes();

        let mut m = Vec::new();
        m.extend(access.to_be_bytes());
        m.extend(name.to_be_bytes());
        m.extend(descriptor.to_be_bytes());
        m.extend(1u16.to_be_bytes());
        m.extend(code_name.to_be_bytes());
        m.extend(((12 + code.len()) as u32).to_be_bytes());
        m.extend(4u16.to_be_bytes());
        m.extend(4u16.to_be_bytes());
        m.extend((code.len() as u32).to_be_bytes());
        m.extend(&code);
        m.extend(0u16.to_be_bytes());
        m.extend(0u16.to_be_bytes());
        self.methods.push(m);
        self
    }

    pub fn abstract_method(mut self, name: &str, descriptor: &str) -> Self {
        let name = self.utf8(name);
        let descriptor = self.utf8(descriptor);
        let mut m = Vec::new();
        m.extend((ACC_PUBLIC | ACC_ABSTRACT).to_be_bytes());
        m.extend(name.to_be_bytes());
        m.extend(descriptor.to_be_bytes());
        m.extend(0u16.to_be_bytes());
        self.methods.push(m);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend(0xCAFE_BABEu32.to_be_bytes());
        out.extend(0u16.to_be_bytes());
        out.extend(self.major.to_be_bytes());
        out.extend(((self.pool.len() + 1) as u16).to_be_bytes());
        for entry in &self.pool {
            out.extend(entry);
        }
        out.extend((ACC_PUBLIC | 0x0020).to_be_bytes());
        out.extend(self.this_class.to_be_bytes());
        out.extend(self.super_class.to_be_bytes());
        out.extend(0u16.to_be_bytes());
        out.extend((self.fields.len() as u16).to_be_bytes());
        for f in &self.fields {
            out.extend(f);
        }
        out.extend((self.methods.len() as u16).to_be_bytes());
        for m in &self.methods {
            out.extend(m);
        }
        out.extend(0u16.to_be_bytes());
        out
    }
}

/// Bytecode assembler; offsets are relative to the start of the method body.
#[derive(Default)]
pub struct Code(Vec<u8>);

impl Code {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn op(mut self, opcode: u8) -> Self {
        self.0.push(opcode);
        self
    }

    fn op_u16(mut self, opcode: u8, operand: u16) -> Self {
        self.0.push(opcode);
        self.0.extend(operand.to_be_bytes());
        self
    }

    pub fn new_object(self, class_index: u16) -> Self {
        self.op_u16(0xBB, class_index)
    }

    pub fn invoke_virtual(self, index: u16) -> Self {
        self.op_u16(0xB6, index)
    }

    pub fn invoke_special(self, index: u16) -> Self {
        self.op_u16(0xB7, index)
    }

    pub fn invoke_static(self, index: u16) -> Self {
        self.op_u16(0xB8, index)
    }

    pub fn invoke_interface(mut self, index: u16, args: u8) -> Self {
        self.0.push(0xB9);
        self.0.extend(index.to_be_bytes());
        self.0.extend([args, 0]);
        self
    }

    pub fn invoke_dynamic(mut self, index: u16) -> Self {
        self.0.push(0xBA);
        self.0.extend(index.to_be_bytes());
        self.0.extend([0, 0]);
        self
    }

    pub fn ldc2_w(self, index: u16) -> Self {
        self.op_u16(0x14, index)
    }

    pub fn monitor_enter(self) -> Self {
        self.op(0xC2)
    }

    /// `if_icmpne` with a dummy forward offset.
    pub fn if_icmpne(self) -> Self {
        self.op_u16(0xA0, 3)
    }

    pub fn goto(self) -> Self {
        self.op_u16(0xA7, 3)
    }

    pub fn bipush(mut self, value: i8) -> Self {
        self.0.extend([0x10, value as u8]);
        self
    }

    pub fn table_switch(mut self, low: i32, high: i32) -> Self {
        self.0.push(0xAA);
        while self.0.len() % 4 != 0 {
            self.0.push(0);
        }
        self.0.extend(0i32.to_be_bytes());
        self.0.extend(low.to_be_bytes());
        self.0.extend(high.to_be_bytes());
        for _ in low..=high {
            self.0.extend(0i32.to_be_bytes());
        }
        self
    }

    pub fn lookup_switch(mut self, keys: &[i32]) -> Self {
        self.0.push(0xAB);
        while self.0.len() % 4 != 0 {
            self.0.push(0);
        }
        self.0.extend(0i32.to_be_bytes());
        self.0.extend((keys.len() as i32).to_be_bytes());
        for key in keys {
            self.0.extend(key.to_be_bytes());
            self.0.extend(0i32.to_be_bytes());
        }
        self
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

pub fn temp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!(
        "flashlight_it_{}_{}_{}",
        std::process::id(),
        nanos,
        name
    ))
}

pub fn write_class(root: &Path, internal_name: &str, bytes: &[u8]) -> anyhow::Result<PathBuf> {
    let path = root.join(format!("{internal_name}.class"));
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, bytes)?;
    Ok(path)
}

pub fn write_jar(path: &Path, entries: &[(&str, &[u8])]) -> anyhow::Result<()> {
    use zip::write::FileOptions;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    let mut zip = zip::ZipWriter::new(file);
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (name, content) in entries {
        zip.start_file(*name, options)?;
        zip.write_all(content)?;
    }
    zip.finish()?;
    Ok(())
}
