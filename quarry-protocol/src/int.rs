use crate::{ProtocolError, Result};
use quarry_std::io::{Sink, Source};

mod sealed {
    pub trait Sealed {}
}

///
/// An integer type with a fixed-width big-endian representation on the wire. Signed values are
/// two's complement.
///
/// This trait is sealed; it is implemented for every primitive integer up to 64 bits.
pub trait FixedInt: sealed::Sealed + Copy + Eq + core::fmt::Debug {
    ///
    /// Width of the representation in bytes.
    const WIDTH: usize;

    #[doc(hidden)]
    fn from_be_slice(bytes: &[u8]) -> Self;

    #[doc(hidden)]
    fn write_be_slice(self, bytes: &mut [u8]);
}

macro_rules! fixed_int_impl {
    ( $( $int:ty ),* ) => {
        $(
            impl sealed::Sealed for $int {}

            impl FixedInt for $int {
                const WIDTH: usize = size_of::<$int>();

                #[inline]
                fn from_be_slice(bytes: &[u8]) -> Self {
                    <$int>::from_be_bytes(bytes.try_into().unwrap())
                }

                #[inline]
                fn write_be_slice(self, bytes: &mut [u8]) {
                    bytes.copy_from_slice(&self.to_be_bytes());
                }
            }
        )*
    };
}

fixed_int_impl!(u8, i8, u16, i16, u32, i32, u64, i64);

///
/// Parses a fixed-width big-endian integer from a [`Source`], reading exactly `T::WIDTH` bytes.
///
/// # Errors
/// Returns [`ProtocolError::EndOfFile`] if fewer than `T::WIDTH` bytes are available.
pub fn parse_int<T, S>(src: &mut S) -> Result<T>
where
    T: FixedInt,
    S: Source + ?Sized,
{
    let mut buffer = [0_u8; 8];
    let slot = &mut buffer[..T::WIDTH];

    if src.pull(slot) != T::WIDTH {
        return Err(ProtocolError::EndOfFile);
    }

    Ok(T::from_be_slice(slot))
}

///
/// Serializes a fixed-width big-endian integer to a [`Sink`], writing exactly `T::WIDTH` bytes.
///
/// # Errors
/// Returns [`ProtocolError::SinkOverflow`] if the sink accepts fewer than `T::WIDTH` bytes.
pub fn serialize_int<T, K>(value: T, sink: &mut K) -> Result<()>
where
    T: FixedInt,
    K: Sink + ?Sized,
{
    let mut buffer = [0_u8; 8];
    let slot = &mut buffer[..T::WIDTH];
    value.write_be_slice(slot);

    let written = sink.push(slot);
    if written != T::WIDTH {
        return Err(ProtocolError::SinkOverflow {
            attempted: T::WIDTH,
            written,
        });
    }

    Ok(())
}
