use crate::error::DecodeError;

/// Internal name of the type a method descriptor returns.
///
/// Object types yield their internal name (`java/lang/String`), arrays keep
/// their descriptor form (`[Ljava/lang/String;`) and primitives or `void`
/// yield their single-letter descriptor.
pub fn return_type(descriptor: &str) -> Result<&str, DecodeError> {
    let malformed = || DecodeError::MalformedDescriptor(descriptor.to_string());

    if !descriptor.starts_with('(') {
        return Err(malformed());
    }
    let (_, ret) = descriptor.split_once(')').ok_or_else(malformed)?;

    match ret.as_bytes() {
        [b'B' | b'C' | b'D' | b'F' | b'I' | b'J' | b'S' | b'Z' | b'V'] => Ok(ret),
        [b'L', .., b';'] if ret.len() > 2 => Ok(&ret[1..ret.len() - 1]),
        [b'[', ..] if !ret.trim_start_matches('[').is_empty() => Ok(ret),
        _ => Err(malformed()),
    }
}
