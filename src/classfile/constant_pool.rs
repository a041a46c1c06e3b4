use super::reader::ByteReader;
use crate::error::DecodeError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Constant {
    /// Slot 0, and the second slot taken by a long or double.
    Unusable,
    Utf8(String),
    Class { name: u16 },
    NameAndType { name: u16, descriptor: u16 },
    MethodRef { class: u16, name_and_type: u16 },
    InvokeDynamic { name_and_type: u16 },
    Other,
}

/// Resolved view of the entries the instruction decoder needs.
#[derive(Debug, Clone, Default)]
pub struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    pub fn parse(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let count = r.u16()?;
        let mut entries = Vec::with_capacity(count as usize);
        entries.push(Constant::Unusable);

        while entries.len() < count as usize {
            let index = entries.len() as u16;
            let tag = r.u8()?;
            let entry = match tag {
                1 => {
                    let len = r.u16()? as usize;
                    Constant::Utf8(decode_modified_utf8(r.bytes(len)?))
                }
                3 | 4 => {
                    r.skip(4)?;
                    Constant::Other
                }
                5 | 6 => {
                    r.skip(8)?;
                    entries.push(Constant::Other);
                    Constant::Unusable
                }
                7 => Constant::Class { name: r.u16()? },
                8 | 16 | 19 | 20 => {
                    r.skip(2)?;
                    Constant::Other
                }
                9 => {
                    r.skip(4)?;
                    Constant::Other
                }
                10 | 11 => Constant::MethodRef {
                    class: r.u16()?,
                    name_and_type: r.u16()?,
                },
                12 => Constant::NameAndType {
                    name: r.u16()?,
                    descriptor: r.u16()?,
                },
                15 => {
                    r.skip(3)?;
                    Constant::Other
                }
                17 => {
                    r.skip(4)?;
                    Constant::Other
                }
                18 => {
                    r.skip(2)?;
                    Constant::InvokeDynamic {
                        name_and_type: r.u16()?,
                    }
                }
                _ => return Err(DecodeError::UnknownConstantTag { index, tag }),
            };
            entries.push(entry);
        }

        // A trailing long/double may push one slot past the declared count.
        entries.truncate(count.max(1) as usize);
        Ok(Self { entries })
    }

    fn get(&self, index: u16) -> Result<&Constant, DecodeError> {
        match self.entries.get(index as usize) {
            Some(Constant::Unusable) | None => Err(DecodeError::BadConstantIndex { index }),
            Some(c) => Ok(c),
        }
    }

    pub fn utf8(&self, index: u16) -> Result<&str, DecodeError> {
        match self.get(index)? {
            Constant::Utf8(s) => Ok(s),
            _ => Err(DecodeError::UnexpectedConstant {
                index,
                expected: "Utf8",
            }),
        }
    }

    /// Internal (slash separated) name of a `CONSTANT_Class` entry.
    pub fn class_name(&self, index: u16) -> Result<&str, DecodeError> {
        match self.get(index)? {
            Constant::Class { name } => self.utf8(*name),
            _ => Err(DecodeError::UnexpectedConstant {
                index,
                expected: "Class",
            }),
        }
    }

    fn name_and_type(&self, index: u16) -> Result<(&str, &str), DecodeError> {
        match self.get(index)? {
            Constant::NameAndType { name, descriptor } => {
                Ok((self.utf8(*name)?, self.utf8(*descriptor)?))
            }
            _ => Err(DecodeError::UnexpectedConstant {
                index,
                expected: "NameAndType",
            }),
        }
    }

    /// Owner, name and descriptor of a method or interface-method reference.
    pub fn method_ref(&self, index: u16) -> Result<(&str, &str, &str), DecodeError> {
        match self.get(index)? {
            Constant::MethodRef {
                class,
                name_and_type,
            } => {
                let owner = self.class_name(*class)?;
                let (name, descriptor) = self.name_and_type(*name_and_type)?;
                Ok((owner, name, descriptor))
            }
            _ => Err(DecodeError::UnexpectedConstant {
                index,
                expected: "Methodref",
            }),
        }
    }

    /// Name and descriptor of an invokedynamic call site.
    pub fn invoke_dynamic(&self, index: u16) -> Result<(&str, &str), DecodeError> {
        match self.get(index)? {
            Constant::InvokeDynamic { name_and_type } => self.name_and_type(*name_and_type),
            _ => Err(DecodeError::UnexpectedConstant {
                index,
                expected: "InvokeDynamic",
            }),
        }
    }
}

/// Decodes the JVM's modified UTF-8 (two-byte NUL, CESU-style surrogates).
fn decode_modified_utf8(bytes: &[u8]) -> String {
    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut i = 0usize;
    while i < bytes.len() {
        let b = bytes[i];
        if b & 0x80 == 0 {
            units.push(b as u16);
            i += 1;
        } else if b & 0xE0 == 0xC0 && i + 1 < bytes.len() {
            units.push((((b & 0x1F) as u16) << 6) | (bytes[i + 1] & 0x3F) as u16);
            i += 2;
        } else if b & 0xF0 == 0xE0 && i + 2 < bytes.len() {
            units.push(
                (((b & 0x0F) as u16) << 12)
                    | (((bytes[i + 1] & 0x3F) as u16) << 6)
                    | (bytes[i + 2] & 0x3F) as u16,
            );
            i += 3;
        } else {
            units.push(0xFFFD);
            i += 1;
        }
    }
    String::from_utf16_lossy(&units)
}
