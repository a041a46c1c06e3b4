use std::path::PathBuf;
use thiserror::Error;

/// Fatal conditions raised while enumerating, reading or decoding class units.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("path does not exist: {}", path.display())]
    PathNotFound { path: PathBuf },

    #[error("cannot open archive {}: {reason}", path.display())]
    Archive { path: PathBuf, reason: String },

    #[error("class resource unavailable: {resource}: {reason}")]
    ResourceUnavailable { resource: String, reason: String },

    #[error("failed to decode {class}")]
    Decode {
        class: String,
        #[source]
        source: DecodeError,
    },
}

/// Class-file level decoding failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unexpected end of data at offset {offset} (wanted {wanted} bytes)")]
    Truncated { offset: usize, wanted: usize },

    #[error("bad magic number 0x{0:08X}")]
    BadMagic(u32),

    #[error("unsupported class file version {major}.{minor}")]
    UnsupportedVersion { major: u16, minor: u16 },

    #[error("constant pool index {index} is out of range")]
    BadConstantIndex { index: u16 },

    #[error("constant pool entry {index} is not a {expected}")]
    UnexpectedConstant { index: u16, expected: &'static str },

    #[error("unknown constant pool tag {tag} at index {index}")]
    UnknownConstantTag { index: u16, tag: u8 },

    #[error("invalid opcode 0x{opcode:02X} at bytecode offset {offset}")]
    InvalidOpcode { offset: usize, opcode: u8 },

    #[error("malformed switch at bytecode offset {offset}")]
    MalformedSwitch { offset: usize },

    #[error("malformed method descriptor: {0}")]
    MalformedDescriptor(String),
}
