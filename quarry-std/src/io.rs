use alloc::vec::Vec;
use bytes::Buf;

///
/// Position to seek to within a [`SliceBuf`]. Mirrors `std::io::SeekFrom`, but exists so that
/// seeking works in `no_std` builds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SeekFrom {
    ///
    /// Seeks from the start of the data.
    Start(u64),

    ///
    /// Seeks relative to the end of the data.
    End(i64),

    ///
    /// Seeks relative to the current position.
    Current(i64),
}

#[cfg(feature = "std")]
impl From<std::io::SeekFrom> for SeekFrom {
    fn from(value: std::io::SeekFrom) -> Self {
        match value {
            std::io::SeekFrom::Start(start) => SeekFrom::Start(start),
            std::io::SeekFrom::End(end) => SeekFrom::End(end),
            std::io::SeekFrom::Current(current) => SeekFrom::Current(current),
        }
    }
}

#[cfg(feature = "std")]
impl From<SeekFrom> for std::io::SeekFrom {
    fn from(value: SeekFrom) -> Self {
        match value {
            SeekFrom::Start(start) => std::io::SeekFrom::Start(start),
            SeekFrom::End(end) => std::io::SeekFrom::End(end),
            SeekFrom::Current(current) => std::io::SeekFrom::Current(current),
        }
    }
}

///
/// A type bytes can be pulled from.
///
/// Unlike `std::io::Read`, a `Source` is infallible at this layer: a short read is reported by
/// simply returning fewer bytes than requested. Consumers decide what a short read means; protocol
/// codecs typically treat it as an unexpected end of input.
pub trait Source {
    ///
    /// Copies up to `buf.len()` bytes into `buf`, returning how many were actually copied. A
    /// return value smaller than `buf.len()` means the source is (currently) exhausted.
    fn pull(&mut self, buf: &mut [u8]) -> usize;
}

///
/// A type bytes can be pushed into.
///
/// A short write is reported by returning fewer bytes than were offered. Consumers decide what a
/// short write means; protocol codecs typically treat it as a fatal sink-overflow condition
/// rather than retrying.
pub trait Sink {
    ///
    /// Copies up to `buf.len()` bytes out of `buf`, returning how many were actually accepted. A
    /// return value smaller than `buf.len()` means the sink is out of capacity.
    fn push(&mut self, buf: &[u8]) -> usize;
}

impl Source for &[u8] {
    #[inline]
    fn pull(&mut self, buf: &mut [u8]) -> usize {
        let len = core::cmp::min(self.len(), buf.len());

        buf[..len].copy_from_slice(&self[..len]);
        *self = &self[len..];

        len
    }
}

impl Sink for Vec<u8> {
    #[inline]
    fn push(&mut self, buf: &[u8]) -> usize {
        self.extend_from_slice(buf);
        buf.len()
    }
}

impl<S> Source for &mut S
where
    S: Source + ?Sized,
{
    #[inline]
    fn pull(&mut self, buf: &mut [u8]) -> usize {
        (**self).pull(buf)
    }
}

impl<K> Sink for &mut K
where
    K: Sink + ?Sized,
{
    #[inline]
    fn push(&mut self, buf: &[u8]) -> usize {
        (**self).push(buf)
    }
}

///
/// A read/write window over a borrowed byte slice, with independent `read` and `write` cursors.
///
/// The cursors always satisfy `0 <= read <= write <= capacity`: only bytes that have been written
/// (or were marked readable via [`SliceBuf::filled`]) can be read back. Both cursors can be
/// repositioned with [`SliceBuf::seek_read`] and [`SliceBuf::seek_write`].
///
/// `SliceBuf` implements [`Source`] (draining the readable region), [`Sink`] (appending to the
/// writable region, bounded by the slice's length), and [`bytes::Buf`] over the readable region.
///
/// # Usage
/// ```rust
/// use quarry_std::io::{Sink, Source, SliceBuf};
///
/// let mut backing = [0_u8; 8];
/// let mut buf = SliceBuf::new(&mut backing);
///
/// assert_eq!(buf.push(&[1, 2, 3]), 3);
/// assert_eq!(buf.written(), 3);
///
/// let mut out = [0_u8; 2];
/// assert_eq!(buf.pull(&mut out), 2);
/// assert_eq!(out, [1, 2]);
/// assert_eq!(buf.remaining_read(), 1);
/// ```
pub struct SliceBuf<'a> {
    data: &'a mut [u8],
    read: usize,
    write: usize,
}

impl<'a> SliceBuf<'a> {
    ///
    /// Creates an empty buffer over `data`. Nothing is readable until something is written.
    #[inline]
    pub fn new(data: &'a mut [u8]) -> Self {
        Self {
            data,
            read: 0,
            write: 0,
        }
    }

    ///
    /// Creates a buffer over `data` whose entire contents are considered already written, and
    /// therefore readable. Useful for parsing out of an existing slice.
    #[inline]
    pub fn filled(data: &'a mut [u8]) -> Self {
        let write = data.len();
        Self {
            data,
            read: 0,
            write,
        }
    }

    ///
    /// Number of bytes written so far; equivalently, the write cursor's position.
    #[inline]
    pub fn written(&self) -> usize {
        self.write
    }

    ///
    /// The read cursor's position.
    #[inline]
    pub fn read_pos(&self) -> usize {
        self.read
    }

    ///
    /// Number of bytes that can still be read before catching up with the write cursor.
    #[inline]
    pub fn remaining_read(&self) -> usize {
        self.write - self.read
    }

    ///
    /// Number of bytes that can still be written before the backing slice is full.
    #[inline]
    pub fn remaining_write(&self) -> usize {
        self.data.len() - self.write
    }

    ///
    /// Total length of the backing slice.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    ///
    /// The readable region: everything between the read and write cursors.
    #[inline]
    pub fn readable(&self) -> &[u8] {
        &self.data[self.read..self.write]
    }

    ///
    /// Everything written so far, regardless of the read cursor.
    #[inline]
    pub fn filled_slice(&self) -> &[u8] {
        &self.data[..self.write]
    }

    fn resolve(pos: SeekFrom, current: usize, end: usize) -> Option<usize> {
        let target = match pos {
            SeekFrom::Start(start) => checked_to_usize(start)?,
            SeekFrom::End(offset) => offset_from(end, offset)?,
            SeekFrom::Current(offset) => offset_from(current, offset)?,
        };

        Some(target)
    }

    ///
    /// Moves the read cursor. The target must stay within `[0, written()]`.
    ///
    /// Returns the new position, or `None` if the seek would break the cursor invariant (in which
    /// case the cursor is unchanged).
    pub fn seek_read(&mut self, pos: SeekFrom) -> Option<usize> {
        let target = Self::resolve(pos, self.read, self.write)?;
        if target > self.write {
            return None;
        }

        self.read = target;
        Some(target)
    }

    ///
    /// Moves the write cursor. The target must stay within `[read_pos(), capacity()]`.
    ///
    /// Returns the new position, or `None` if the seek would break the cursor invariant (in which
    /// case the cursor is unchanged).
    pub fn seek_write(&mut self, pos: SeekFrom) -> Option<usize> {
        let target = Self::resolve(pos, self.write, self.data.len())?;
        if target < self.read || target > self.data.len() {
            return None;
        }

        self.write = target;
        Some(target)
    }
}

#[inline]
fn checked_to_usize(value: u64) -> Option<usize> {
    usize::try_from(value).ok()
}

#[inline]
fn offset_from(base: usize, offset: i64) -> Option<usize> {
    if offset < 0 {
        let back = checked_to_usize(offset.unsigned_abs())?;
        base.checked_sub(back)
    } else {
        base.checked_add(checked_to_usize(offset as u64)?)
    }
}

impl Source for SliceBuf<'_> {
    #[inline]
    fn pull(&mut self, buf: &mut [u8]) -> usize {
        let len = core::cmp::min(self.remaining_read(), buf.len());

        buf[..len].copy_from_slice(&self.data[self.read..self.read + len]);
        self.read += len;

        len
    }
}

impl Sink for SliceBuf<'_> {
    #[inline]
    fn push(&mut self, buf: &[u8]) -> usize {
        let len = core::cmp::min(self.remaining_write(), buf.len());

        self.data[self.write..self.write + len].copy_from_slice(&buf[..len]);
        self.write += len;

        len
    }
}

impl Buf for SliceBuf<'_> {
    #[inline]
    fn remaining(&self) -> usize {
        self.remaining_read()
    }

    #[inline]
    fn chunk(&self) -> &[u8] {
        self.readable()
    }

    #[inline]
    fn advance(&mut self, cnt: usize) {
        assert!(
            cnt <= self.remaining_read(),
            "cannot advance past the write cursor"
        );

        self.read += cnt;
    }
}

///
/// A [`Source`] adapter that refuses to pull more than a fixed number of bytes from the
/// underlying source.
///
/// Used for bounding reads to the extent of a single protocol frame: once the quota is spent the
/// adapter reports exhaustion even if the underlying source has more bytes.
pub struct LimitingSource<'a, S>
where
    S: ?Sized,
{
    inner: &'a mut S,
    quota: usize,
}

impl<'a, S> LimitingSource<'a, S>
where
    S: Source + ?Sized,
{
    ///
    /// Creates a limiting source that will pull at most `quota` bytes from `inner`.
    #[inline]
    pub fn new(inner: &'a mut S, quota: usize) -> Self {
        Self { inner, quota }
    }

    ///
    /// The number of bytes that may still be pulled through this adapter.
    #[inline]
    pub fn remaining_quota(&self) -> usize {
        self.quota
    }
}

impl<S> Source for LimitingSource<'_, S>
where
    S: Source + ?Sized,
{
    #[inline]
    fn pull(&mut self, buf: &mut [u8]) -> usize {
        let len = core::cmp::min(self.quota, buf.len());
        let pulled = self.inner.pull(&mut buf[..len]);

        self.quota -= pulled;
        pulled
    }
}

#[cfg(test)]
mod tests {
    use crate::io::{LimitingSource, SeekFrom, Sink, SliceBuf, Source};
    use alloc::vec::Vec;

    #[test]
    fn slice_source_advances() {
        let data = [1_u8, 2, 3, 4, 5];
        let mut src: &[u8] = &data;

        let mut out = [0_u8; 3];
        assert_eq!(src.pull(&mut out), 3);
        assert_eq!(out, [1, 2, 3]);

        assert_eq!(src.pull(&mut out), 2);
        assert_eq!(&out[..2], &[4, 5]);
    }

    #[test]
    fn vec_sink_accepts_everything() {
        let mut sink: Vec<u8> = Vec::new();

        assert_eq!(Sink::push(&mut sink, &[1, 2, 3]), 3);
        assert_eq!(Sink::push(&mut sink, &[]), 0);
        assert_eq!(sink, [1, 2, 3]);
    }

    #[test]
    fn slice_buf_read_write_round_trip() {
        let mut backing = [0_u8; 4];
        let mut buf = SliceBuf::new(&mut backing);

        assert_eq!(buf.push(&[9, 8, 7]), 3);
        assert_eq!(buf.remaining_read(), 3);

        let mut out = [0_u8; 4];
        assert_eq!(buf.pull(&mut out), 3);
        assert_eq!(&out[..3], &[9, 8, 7]);
        assert_eq!(buf.remaining_read(), 0);
    }

    #[test]
    fn slice_buf_short_write() {
        let mut backing = [0_u8; 2];
        let mut buf = SliceBuf::new(&mut backing);

        assert_eq!(buf.push(&[1, 2, 3, 4]), 2);
        assert_eq!(buf.written(), 2);
        assert_eq!(buf.push(&[5]), 0);
    }

    #[test]
    fn slice_buf_seek_read_bounds() {
        let mut backing = [1_u8, 2, 3, 4];
        let mut buf = SliceBuf::filled(&mut backing);

        assert_eq!(buf.seek_read(SeekFrom::Start(2)), Some(2));
        assert_eq!(buf.seek_read(SeekFrom::Current(1)), Some(3));
        assert_eq!(buf.seek_read(SeekFrom::End(0)), Some(4));

        // cannot read past the write cursor
        assert_eq!(buf.seek_read(SeekFrom::Start(5)), None);
        assert_eq!(buf.read_pos(), 4);
    }

    #[test]
    fn slice_buf_seek_write_cannot_pass_read() {
        let mut backing = [0_u8; 8];
        let mut buf = SliceBuf::new(&mut backing);

        buf.push(&[1, 2, 3, 4]);
        let mut out = [0_u8; 2];
        buf.pull(&mut out);

        // read cursor sits at 2; the write cursor may not back up over it
        assert_eq!(buf.seek_write(SeekFrom::Start(1)), None);
        assert_eq!(buf.seek_write(SeekFrom::Start(2)), Some(2));
    }

    #[test]
    fn limiting_source_enforces_quota() {
        let data = [1_u8, 2, 3, 4, 5];
        let mut src: &[u8] = &data;
        let mut limited = LimitingSource::new(&mut src, 3);

        let mut out = [0_u8; 5];
        assert_eq!(limited.pull(&mut out), 3);
        assert_eq!(limited.remaining_quota(), 0);
        assert_eq!(limited.pull(&mut out), 0);

        // the underlying source keeps its unread tail
        assert_eq!(src.len(), 2);
    }

    #[test]
    fn limiting_source_short_underlying() {
        let data = [1_u8];
        let mut src: &[u8] = &data;
        let mut limited = LimitingSource::new(&mut src, 4);

        let mut out = [0_u8; 4];
        assert_eq!(limited.pull(&mut out), 1);
        assert_eq!(limited.remaining_quota(), 3);
    }
}
