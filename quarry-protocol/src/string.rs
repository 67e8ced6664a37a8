use crate::varint::{parse_varint, serialize_varint};
use crate::{ProtocolError, Result};
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use quarry_std::checked;
use quarry_std::io::{Sink, Source};

///
/// Parses a length-prefixed string payload from a [`Source`], returning the raw bytes.
///
/// The length prefix is an unsigned 32-bit varint counting *encoded bytes*, not code points. The
/// bytes are not validated as UTF-8; well-formedness is the application's responsibility. For a
/// validating variant see [`parse_string`].
///
/// # Errors
/// * [`ProtocolError::Unrepresentable`] if the length does not fit the platform's size type.
/// * [`ProtocolError::EndOfFile`] if fewer than `length` bytes are available.
/// * Any varint error from the prefix.
pub fn parse_string_bytes<S>(src: &mut S) -> Result<Vec<u8>>
where
    S: Source + ?Sized,
{
    let length = parse_varint::<u32, S>(src)?;
    let size = checked::cast::<usize, u32>(length).ok_or(ProtocolError::Unrepresentable)?;

    let mut bytes = vec![0_u8; size];
    if src.pull(&mut bytes) != size {
        return Err(ProtocolError::EndOfFile);
    }

    Ok(bytes)
}

///
/// Parses a length-prefixed UTF-8 string from a [`Source`].
///
/// # Errors
/// Everything [`parse_string_bytes`] can return, plus [`ProtocolError::Unexpected`] if the bytes
/// are not valid UTF-8 (Rust's `String` cannot hold them; callers that want the protocol's
/// "bytes are the application's problem" behavior should use [`parse_string_bytes`]).
pub fn parse_string<S>(src: &mut S) -> Result<String>
where
    S: Source + ?Sized,
{
    String::from_utf8(parse_string_bytes(src)?).map_err(|_| ProtocolError::Unexpected)
}

///
/// Serializes raw bytes with an unsigned varint length prefix.
///
/// # Errors
/// * [`ProtocolError::Unrepresentable`] if the length does not fit `u32`.
/// * [`ProtocolError::SinkOverflow`] if the sink does not accept everything.
pub fn serialize_string_bytes<K>(value: &[u8], sink: &mut K) -> Result<()>
where
    K: Sink + ?Sized,
{
    let length = checked::cast::<u32, usize>(value.len()).ok_or(ProtocolError::Unrepresentable)?;
    serialize_varint(length, sink)?;

    let written = sink.push(value);
    if written != value.len() {
        return Err(ProtocolError::SinkOverflow {
            attempted: value.len(),
            written,
        });
    }

    Ok(())
}

///
/// Serializes a UTF-8 string with an unsigned varint length prefix counting encoded bytes.
///
/// # Errors
/// See [`serialize_string_bytes`].
pub fn serialize_string<K>(value: &str, sink: &mut K) -> Result<()>
where
    K: Sink + ?Sized,
{
    serialize_string_bytes(value.as_bytes(), sink)
}
