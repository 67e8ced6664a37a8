use crate::varint::{parse_varint, VarScalar, CONTINUE_BIT, MAX_VAR64_BYTES};
use crate::{ProtocolError, Result};
use quarry_std::io::Source;

///
/// Incrementally parses a varint.
///
/// As opposed to [`parse_varint`], which fails with [`ProtocolError::EndOfFile`] when there are
/// insufficient bytes, this parser retains consumed bytes between calls to
/// [`IncrementalVarParser::feed`] and reuses them as more become available, until an entire
/// varint has been assembled. This is what lets the framing layer accept input chopped at
/// arbitrary byte boundaries without re-parsing completed prefixes.
///
/// Once a value has been produced it is latched: `feed` keeps returning it without consuming any
/// further input until [`IncrementalVarParser::reset`] is called.
pub struct IncrementalVarParser<T>
where
    T: VarScalar,
{
    buffer: [u8; MAX_VAR64_BYTES],
    len: usize,
    value: Option<T>,
}

impl<T> IncrementalVarParser<T>
where
    T: VarScalar,
{
    ///
    /// Creates an empty parser.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: [0; MAX_VAR64_BYTES],
            len: 0,
            value: None,
        }
    }

    ///
    /// Attempts to complete a varint, caching consumed bytes for the next call if the source runs
    /// dry. `Ok(None)` means "pending": call again with more input.
    ///
    /// A latched value is returned unconditionally, without touching `src`.
    ///
    /// # Errors
    /// The error conditions of [`parse_varint`], except [`ProtocolError::EndOfFile`], which is
    /// reported as pending instead.
    pub fn feed<S>(&mut self, src: &mut S) -> Result<Option<T>>
    where
        S: Source + ?Sized,
    {
        if let Some(value) = self.value {
            return Ok(Some(value));
        }

        loop {
            let mut byte = [0_u8; 1];
            if src.pull(&mut byte) != 1 {
                return Ok(None);
            }

            self.buffer[self.len] = byte[0];
            self.len += 1;

            // a cleared continuation flag ends the encoding; hitting the maximum width without
            // one is the parse function's problem to report
            if byte[0] & CONTINUE_BIT == 0 || self.len == T::MAX_BYTES {
                let mut cursor: &[u8] = &self.buffer[..self.len];
                let value = parse_varint::<T, _>(&mut cursor)?;

                self.value = Some(value);
                return Ok(Some(value));
            }
        }
    }

    ///
    /// Resets the internal state, clearing all cached bytes and any latched value.
    pub fn reset(&mut self) {
        self.len = 0;
        self.value = None;
    }

    ///
    /// The number of bytes cached by the parser. After a varint has been successfully parsed,
    /// this is the length of its representation, until [`IncrementalVarParser::reset`] is
    /// called.
    #[inline]
    #[must_use]
    pub fn cached(&self) -> usize {
        self.len
    }

    ///
    /// Whether this parser has no cached bytes. Equivalent to `cached() == 0`.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    ///
    /// The latched value, if a varint has been completed since the last reset.
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<T> {
        self.value
    }
}

impl<T> Default for IncrementalVarParser<T>
where
    T: VarScalar,
{
    fn default() -> Self {
        Self::new()
    }
}
