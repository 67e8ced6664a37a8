//!
//! Framing for Minecraft packets: turns a stream of bytes into typed packets
//! ([`quarry_packet::Packet`]) and back, honoring the protocol's two frame formats (plain
//! length-prefixed, and compression-enabled with an inner uncompressed-length field).
//!
//! The central type is [`serializer::StreamSerializer`]. Its parse path is incremental: input
//! may be chopped at arbitrary byte boundaries, and the engine buffers exactly as much as it
//! needs, reporting [`serializer::Progress::Pending`] until a whole frame is available. The
//! serialize path is the exact inverse and writes complete frames to a caller-supplied sink.
//!
//! Similarly to [`quarry_protocol`], this crate is protocol version-agnostic.

#![no_std]

pub(crate) extern crate alloc;

#[cfg(target_pointer_width = "16")]
///
/// For proper protocol support, we need to index slices larger than what we'd be able to do with
/// a 16-bit usize!
compile_error!("This crate does not support 16-bit targets");

///
/// The two-mode framing state machine.
pub mod serializer;

pub use serializer::{Progress, StreamSerializer};

///
/// Type alias for [`quarry_protocol::Result`].
pub type Result<T> = quarry_protocol::Result<T>;
