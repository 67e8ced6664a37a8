//!
//! Primitive codecs for the Minecraft
//! [Java Edition protocol](https://minecraft.wiki/w/Java_Edition_protocol). Can be used in a
//! `no_std` environment, but can't be used without `alloc`.
//!
//! This crate does not know about packets (see `quarry-packet` for that), but provides the
//! encodings that packets are built out of:
//!
//! * Variable-width integers, signed, unsigned, and ZigZag-mapped ([`varint`])
//! * Fixed-width big-endian integers ([`int`])
//! * Varint-length-prefixed UTF-8 strings ([`string`])
//! * An incremental varint parser that survives arbitrarily chopped input ([`incremental`])
//!
//! The implementation of these encodings is stable across protocol versions, so this crate rarely
//! needs to change when packet definitions do.
//!
//! # Features
//!
//! * `std` (default): Forwarded to `quarry-std`; this crate itself has no `std` requirement.

#![no_std]

pub(crate) extern crate alloc;

#[cfg(target_pointer_width = "16")]
///
/// We may need to index slices larger than 65535 for full support of the MC protocol.
compile_error!("This crate does not support 16-bit targets");

///
/// Variable-width integer encoding and decoding.
pub mod varint;

///
/// Fixed-width big-endian integer encoding and decoding.
pub mod int;

///
/// Length-prefixed UTF-8 string encoding and decoding.
pub mod string;

///
/// Incremental (resumable) varint parsing.
pub mod incremental;

use core::fmt::{Display, Formatter};

///
/// Type alias used for the result of every parse and serialize operation in this crate.
pub type Result<T> = core::result::Result<T, ProtocolError>;

///
/// An error encountered while parsing or serializing the wire protocol.
///
/// Every variant is recoverable from the caller's perspective: no state leaks across frames,
/// because the framing layer resets itself at the start of each frame. This enum is
/// non-exhaustive so that variants can be added in minor releases.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProtocolError {
    ///
    /// The input ended before a complete value could be parsed.
    EndOfFile,

    ///
    /// The encoded value does not fit into the type used to represent it.
    Unrepresentable,

    ///
    /// A variable-width encoding was wider than it needed to be.
    Overlong,

    ///
    /// Integer arithmetic on encoded lengths overflowed.
    Overflow,

    ///
    /// A well-formed value was read, but its content is invalid in context (for example an
    /// unknown enum discriminant).
    Unexpected,

    ///
    /// A packet body was longer or shorter than indicated by its length prefix.
    InconsistentLength,

    ///
    /// A frame was sent uncompressed although its size requires compression.
    UncompressedWhereCompressedExpected,

    ///
    /// A frame was sent compressed although its size forbids compression.
    CompressedWhereUncompressedExpected,

    ///
    /// No serializer is registered for the named packet kind.
    SerializerMissing(&'static str),

    ///
    /// A sink accepted fewer bytes than a serializer needed to write. This indicates a caller
    /// bug (an undersized sink); nothing is silently truncated.
    SinkOverflow {
        ///
        /// How many bytes the serializer attempted to write.
        attempted: usize,

        ///
        /// How many bytes the sink actually accepted.
        written: usize,
    },
}

impl Display for ProtocolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            ProtocolError::EndOfFile => f.write_str("Unexpected EOF"),
            ProtocolError::Unrepresentable => {
                f.write_str("Encoded value unrepresentable by destination type")
            }
            ProtocolError::Overlong => {
                f.write_str("Encoded representation longer than necessary")
            }
            ProtocolError::Overflow => f.write_str("Integer overflow"),
            ProtocolError::Unexpected => f.write_str("Unexpected value"),
            ProtocolError::InconsistentLength => {
                f.write_str("Body length inconsistent with length prefix")
            }
            ProtocolError::UncompressedWhereCompressedExpected => {
                f.write_str("Uncompressed data where compressed data was expected")
            }
            ProtocolError::CompressedWhereUncompressedExpected => {
                f.write_str("Compressed data where uncompressed data was expected")
            }
            ProtocolError::SerializerMissing(kind) => {
                write!(f, "No serializer registered for packet kind {kind}")
            }
            ProtocolError::SinkOverflow { attempted, written } => {
                write!(f, "Sink accepted {written} of {attempted} bytes")
            }
        }
    }
}

impl core::error::Error for ProtocolError {}
