//!
//! Small building blocks shared by the rest of the `quarry` workspace. Usable in a `no_std`
//! environment, but requires `alloc`.
//!
//! This crate intentionally knows nothing about the Minecraft protocol. It provides:
//!
//! * [`io::Source`] and [`io::Sink`], capability traits for pulling and pushing bytes
//! * [`io::SliceBuf`], a seekable read/write window over a byte slice
//! * [`io::LimitingSource`], a quota-enforcing source adapter
//! * [`checked`], overflow-checked casts and arithmetic
//!
//! # Features
//!
//! * `std` (default): Enables conversions between [`io::SeekFrom`] and `std::io::SeekFrom`.

#![no_std]

pub(crate) extern crate alloc;

#[cfg(feature = "std")]
pub(crate) extern crate std;

#[cfg(target_pointer_width = "16")]
///
/// Protocol frames may be larger than 65535 bytes, so we need a bigger `usize`.
compile_error!("This crate does not support 16-bit targets");

///
/// Byte-oriented `Source`/`Sink` traits and buffer types.
pub mod io;

///
/// Overflow-checked narrowing casts, addition, and multiplication.
pub mod checked;
