use crate::Result;
use alloc::vec::Vec;
use libdeflater::{CompressionLvl, Compressor, DecompressionError, Decompressor};
use quarry_packet::registry::PacketRegistry;
use quarry_packet::{Direction, Packet, PacketId, State};
use quarry_protocol::incremental::IncrementalVarParser;
use quarry_protocol::varint::{serialize_varint, var_len};
use quarry_protocol::ProtocolError;
use quarry_std::checked;
use quarry_std::io::{LimitingSource, Sink, Source};

///
/// Outcome of a successful call to [`StreamSerializer::parse`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[must_use]
pub enum Progress {
    ///
    /// The frame is incomplete; call [`StreamSerializer::parse`] again once the source has more
    /// bytes. Everything consumed so far is retained (see [`StreamSerializer::cached`]).
    Pending,

    ///
    /// A whole frame was consumed. The decoded result is available through the `last_*`
    /// accessors until the next call to [`StreamSerializer::parse`].
    Done,
}

///
/// A push/pull framing engine for one logical connection.
///
/// The parse path consumes bytes from a [`Source`] and produces typed packets; the serialize
/// path consumes packets and writes framed bytes to a [`Sink`]. Both paths share the
/// [`PacketRegistry`], the current [`Direction`]/[`State`], and the optional compression
/// threshold, and both reuse their internal buffers across frames.
///
/// A `StreamSerializer` is exclusively owned by one logical connection. The embedded zlib
/// contexts are not independently shareable; sharing the whole engine requires external
/// synchronization.
///
/// # Frame formats
///
/// Without compression:
///
/// ```text
/// frame = varint(length) || body
/// body  = varint(packet_id) || payload
/// ```
///
/// With compression enabled (threshold `T`):
///
/// ```text
/// frame = varint(outer_length) || varint(uncompressed_length) || either(body, zlib(body))
/// ```
///
/// where `uncompressed_length == 0` marks a literal body (which must be shorter than `T`), and
/// any other value is the decompressed size of a zlib body (which must be at least `T`).
/// `outer_length` counts the `uncompressed_length` varint together with what follows it.
///
/// # Errors and reuse
///
/// When `parse` returns an error the connection should generally be closed; reusing the engine
/// afterwards results in unspecified (though memory-safe) behavior. No state leaks between
/// *successfully* parsed frames: each call after a completed frame starts fresh.
pub struct StreamSerializer {
    registry: PacketRegistry,
    direction: Direction,
    state: State,
    threshold: Option<usize>,

    // parse path
    outer_len: IncrementalVarParser<u32>,
    inner_len: IncrementalVarParser<u32>,
    body: Vec<u8>,
    staging: Vec<u8>,
    body_consumed: usize,
    compressed_size: usize,
    last_id: Option<PacketId>,
    last_packet: Option<Packet>,
    inflate: Decompressor,

    // serialize path
    out_body: Vec<u8>,
    out_compressed: Vec<u8>,
    out_is_compressed: bool,
    deflate: Compressor,
}

impl StreamSerializer {
    ///
    /// Creates a new engine in the [`State::Handshaking`] state, with compression disabled.
    #[must_use]
    pub fn new(registry: PacketRegistry, direction: Direction) -> Self {
        Self {
            registry,
            direction,
            state: State::Handshaking,
            threshold: None,
            outer_len: IncrementalVarParser::new(),
            inner_len: IncrementalVarParser::new(),
            body: Vec::new(),
            staging: Vec::new(),
            body_consumed: 0,
            compressed_size: 0,
            last_id: None,
            last_packet: None,
            inflate: Decompressor::new(),
            out_body: Vec::new(),
            out_compressed: Vec::new(),
            out_is_compressed: false,
            deflate: Compressor::new(CompressionLvl::default()),
        }
    }

    ///
    /// True when no partial frame is buffered: either nothing has been consumed since the last
    /// completed frame, or the engine is fresh.
    fn between_frames(&self) -> bool {
        self.last_id.is_some()
            || (self.body.is_empty()
                && self.staging.is_empty()
                && self.outer_len.is_empty()
                && self.inner_len.is_empty()
                && self.body_consumed == 0
                && self.compressed_size == 0)
    }

    ///
    /// Drops the previous frame's results. A completed frame is recognized by the presence of a
    /// decoded id; mid-frame state is left alone so a `Pending` parse can resume.
    fn reset_if_complete(&mut self) {
        if self.last_id.is_none() {
            return;
        }

        self.body.clear();
        self.staging.clear();
        self.outer_len.reset();
        self.inner_len.reset();
        self.body_consumed = 0;
        self.compressed_size = 0;
        self.last_id = None;
        self.last_packet = None;
    }

    ///
    /// Attempts to parse one frame from `src`.
    ///
    /// Returns [`Progress::Pending`] when the source ran dry mid-frame; call again with more
    /// input. Returns [`Progress::Done`] when a frame was fully consumed, after which
    /// [`StreamSerializer::last_packet`] and friends describe the result. Calling `parse` again
    /// after `Done` drops the previous result and starts the next frame.
    ///
    /// # Errors
    /// Any [`ProtocolError`] raised by the length prefixes, the compression envelope, or the
    /// packet codec. After an error the engine should be discarded.
    pub fn parse<S>(&mut self, src: &mut S) -> Result<Progress>
    where
        S: Source + ?Sized,
    {
        self.reset_if_complete();

        match self.threshold {
            Some(threshold) => self.parse_compressed(src, threshold),
            None => self.parse_uncompressed(src),
        }
    }

    fn parse_uncompressed<S>(&mut self, src: &mut S) -> Result<Progress>
    where
        S: Source + ?Sized,
    {
        let Some(outer) = self.outer_len.feed(src)? else {
            return Ok(Progress::Pending);
        };

        let size = checked::cast::<usize, u32>(outer).ok_or(ProtocolError::Unrepresentable)?;

        fill_vec(&mut self.body, src, size);
        if self.body.len() < size {
            return Ok(Progress::Pending);
        }

        self.decode(size)
    }

    fn parse_compressed<S>(&mut self, src: &mut S, threshold: usize) -> Result<Progress>
    where
        S: Source + ?Sized,
    {
        let Some(outer) = self.outer_len.feed(src)? else {
            return Ok(Progress::Pending);
        };

        let outer = checked::cast::<usize, u32>(outer).ok_or(ProtocolError::Unrepresentable)?;

        let mut frame = LimitingSource::new(src, outer - self.body_consumed);
        let result = self.parse_frame(&mut frame, outer, threshold);

        let quota_left = frame.remaining_quota();
        self.body_consumed = outer - quota_left;

        // an exhausted outer frame that still couldn't complete can never complete
        match result {
            Ok(Progress::Pending) if self.body_consumed == outer => Err(ProtocolError::EndOfFile),
            other => other,
        }
    }

    fn parse_frame<S>(
        &mut self,
        frame: &mut LimitingSource<'_, S>,
        outer: usize,
        threshold: usize,
    ) -> Result<Progress>
    where
        S: Source + ?Sized,
    {
        let Some(inner) = self.inner_len.feed(frame)? else {
            return Ok(Progress::Pending);
        };

        // whatever follows the inner varint, literal or zlib, is the compressed-side data
        self.compressed_size = outer - self.inner_len.cached();

        if inner == 0 {
            // the body was sent literally; only allowed below the threshold
            let body_len = self.compressed_size;
            if body_len >= threshold {
                return Err(ProtocolError::UncompressedWhereCompressedExpected);
            }

            fill_vec(&mut self.body, frame, body_len);
            if self.body.len() < body_len {
                return Ok(Progress::Pending);
            }

            return self.decode(body_len);
        }

        let uncompressed =
            checked::cast::<usize, u32>(inner).ok_or(ProtocolError::Unrepresentable)?;
        if uncompressed < threshold {
            return Err(ProtocolError::CompressedWhereUncompressedExpected);
        }

        fill_vec(&mut self.staging, frame, self.compressed_size);
        if self.staging.len() < self.compressed_size {
            return Ok(Progress::Pending);
        }

        self.body.resize(uncompressed, 0);
        let written = self
            .inflate
            .zlib_decompress(&self.staging, &mut self.body)
            .map_err(|e| match e {
                DecompressionError::BadData => ProtocolError::Unexpected,
                DecompressionError::InsufficientSpace => ProtocolError::InconsistentLength,
            })?;

        if written != uncompressed {
            return Err(ProtocolError::EndOfFile);
        }

        self.decode(uncompressed)
    }

    ///
    /// Decodes a completed body: the packet id varint, then (if a codec is registered) the
    /// payload. `expected` is the body's total length including the id varint.
    fn decode(&mut self, expected: usize) -> Result<Progress> {
        debug_assert_eq!(self.body.len(), expected);

        let mut cursor: &[u8] = &self.body;
        let id = quarry_protocol::varint::parse_varint::<u32, _>(&mut cursor)?;

        let packet_id = PacketId::new(id, self.direction, self.state);
        self.last_id = Some(packet_id);

        let Some(codec) = self.registry.by_id(&packet_id) else {
            // unknown packet: the caller can still observe the id and the raw body
            return Ok(Progress::Done);
        };

        let parsed = codec.parse(&mut cursor);

        // the codec must consume the body exactly, whether or not it succeeded
        if !cursor.is_empty() {
            return Err(ProtocolError::InconsistentLength);
        }

        self.last_packet = Some(parsed?);
        Ok(Progress::Done)
    }

    ///
    /// The decoded value of the last parsed packet, or `None` if the last frame carried an id
    /// without a registered codec. Only meaningful after [`StreamSerializer::parse`] returned
    /// [`Progress::Done`]; the reference does not remain valid past the next `parse` call.
    #[must_use]
    pub fn last_packet(&self) -> Option<&Packet> {
        self.last_packet.as_ref()
    }

    ///
    /// The id of the last parsed packet. `None` until the first frame completes.
    #[must_use]
    pub fn last_id(&self) -> Option<PacketId> {
        self.last_id
    }

    ///
    /// The uncompressed body of the last parsed packet, *including* the packet id varint but
    /// excluding all length prefixes.
    #[must_use]
    pub fn last_body(&self) -> &[u8] {
        &self.body
    }

    ///
    /// Length of [`StreamSerializer::last_body`].
    #[must_use]
    pub fn last_body_size(&self) -> usize {
        self.body.len()
    }

    ///
    /// Whether the last parsed frame was actually compressed. Frames below the threshold are
    /// sent literally even when compression is enabled, so this is not the same as
    /// [`StreamSerializer::compression_threshold`] being set.
    #[must_use]
    pub fn last_compressed(&self) -> bool {
        self.threshold.is_some() && self.inner_len.value().is_some_and(|inner| inner != 0)
    }

    ///
    /// Size of the last parsed frame's compressed data region. Only meaningful when
    /// [`StreamSerializer::last_compressed`] is true.
    #[must_use]
    pub fn last_compressed_size(&self) -> usize {
        self.compressed_size
    }

    ///
    /// The total number of input bytes currently buffered across the incremental parsers and
    /// the body buffer: everything consumed from the source since the last completed frame.
    /// This is what the engine will reuse on its next call after a [`Progress::Pending`].
    #[must_use]
    pub fn cached(&self) -> usize {
        let prefix = self.outer_len.cached();

        if self.threshold.is_some() {
            prefix + self.body_consumed
        } else {
            prefix + self.body.len()
        }
    }

    ///
    /// Whether the engine has no cached bytes. Equivalent to `cached() == 0`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cached() == 0
    }

    ///
    /// Serializes one packet as a complete frame into `sink`.
    ///
    /// # Errors
    /// * [`ProtocolError::SerializerMissing`] if the registry has no codec for the packet.
    /// * [`ProtocolError::Unrepresentable`] if a length does not fit `u32`.
    /// * [`ProtocolError::SinkOverflow`] if the sink does not accept the whole frame.
    /// * Any error of the packet's own serializer.
    pub fn serialize<K>(&mut self, packet: &Packet, sink: &mut K) -> Result<()>
    where
        K: Sink + ?Sized,
    {
        self.out_body.clear();
        self.out_compressed.clear();
        self.out_is_compressed = false;

        let codec = self
            .registry
            .for_packet(packet)
            .ok_or(ProtocolError::SerializerMissing(packet.kind().name()))?;

        serialize_varint(codec.id().id(), &mut self.out_body)?;
        codec.serialize(packet, &mut self.out_body)?;

        match self.threshold {
            Some(threshold) => self.write_compressed(threshold, sink),
            None => self.write_uncompressed(sink),
        }
    }

    fn write_uncompressed<K>(&mut self, sink: &mut K) -> Result<()>
    where
        K: Sink + ?Sized,
    {
        let length =
            checked::cast::<u32, usize>(self.out_body.len()).ok_or(ProtocolError::Unrepresentable)?;

        serialize_varint(length, sink)?;
        push_all(sink, &self.out_body)
    }

    fn write_compressed<K>(&mut self, threshold: usize, sink: &mut K) -> Result<()>
    where
        K: Sink + ?Sized,
    {
        let body_len = self.out_body.len();
        self.out_is_compressed = body_len >= threshold;

        if !self.out_is_compressed {
            let length =
                checked::cast::<u32, usize>(body_len).ok_or(ProtocolError::Unrepresentable)?;
            let outer = checked::add(length, 1).ok_or(ProtocolError::Overflow)?;

            serialize_varint(outer, sink)?;
            serialize_varint(0_u32, sink)?;
            return push_all(sink, &self.out_body);
        }

        let uncompressed =
            checked::cast::<u32, usize>(body_len).ok_or(ProtocolError::Unrepresentable)?;

        let bound = self.deflate.zlib_compress_bound(body_len);
        self.out_compressed.resize(bound, 0);
        let compressed_len = self
            .deflate
            .zlib_compress(&self.out_body, &mut self.out_compressed)
            .map_err(|_| ProtocolError::Unexpected)?;
        self.out_compressed.truncate(compressed_len);

        let outer = checked::add(compressed_len, var_len(uncompressed))
            .ok_or(ProtocolError::Overflow)?;
        let outer = checked::cast::<u32, usize>(outer).ok_or(ProtocolError::Unrepresentable)?;

        serialize_varint(outer, sink)?;
        serialize_varint(uncompressed, sink)?;
        push_all(sink, &self.out_compressed)
    }

    ///
    /// The body of the last serialized packet (id varint plus payload), before any compression.
    #[must_use]
    pub fn last_serialized_body(&self) -> &[u8] {
        &self.out_body
    }

    ///
    /// Length of [`StreamSerializer::last_serialized_body`].
    #[must_use]
    pub fn last_serialized_size(&self) -> usize {
        self.out_body.len()
    }

    ///
    /// Whether the last emitted frame actually used compression.
    #[must_use]
    pub fn last_serialized_compressed(&self) -> bool {
        self.out_is_compressed
    }

    ///
    /// Size of the last emitted frame's compressed body. Only meaningful when
    /// [`StreamSerializer::last_serialized_compressed`] is true.
    #[must_use]
    pub fn last_serialized_compressed_size(&self) -> usize {
        self.out_compressed.len()
    }

    ///
    /// Enables compression (or updates the threshold if already enabled). Packet bodies of at
    /// least `threshold` bytes are compressed; shorter bodies travel literally inside the
    /// compressed frame format.
    ///
    /// Must only be called between frames: on a fresh engine, or when the last `parse` returned
    /// [`Progress::Done`].
    pub fn enable_compression(&mut self, threshold: usize) {
        debug_assert!(self.between_frames(), "compression change mid-frame");
        self.threshold = Some(threshold);
    }

    ///
    /// Disables compression. Must only be called between frames.
    pub fn disable_compression(&mut self) {
        debug_assert!(self.between_frames(), "compression change mid-frame");
        self.threshold = None;
    }

    ///
    /// The compression threshold, if compression is enabled.
    #[must_use]
    pub fn compression_threshold(&self) -> Option<usize> {
        self.threshold
    }

    ///
    /// The direction packets are currently parsed for.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    ///
    /// Changes the parse direction. Must only be called between frames.
    pub fn set_direction(&mut self, direction: Direction) {
        debug_assert!(self.between_frames(), "direction change mid-frame");
        self.direction = direction;
    }

    ///
    /// The connection state packets are currently parsed for.
    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    ///
    /// Changes the connection state. Must only be called between frames.
    pub fn set_state(&mut self, state: State) {
        debug_assert!(self.between_frames(), "state change mid-frame");
        self.state = state;
    }
}

///
/// Grows `vec` toward `target` bytes with whatever `src` can currently provide.
fn fill_vec<S>(vec: &mut Vec<u8>, src: &mut S, target: usize)
where
    S: Source + ?Sized,
{
    let start = vec.len();
    debug_assert!(start <= target);

    vec.resize(target, 0);
    let pulled = src.pull(&mut vec[start..]);
    vec.truncate(start + pulled);
}

fn push_all<K>(sink: &mut K, bytes: &[u8]) -> Result<()>
where
    K: Sink + ?Sized,
{
    let written = sink.push(bytes);
    if written != bytes.len() {
        return Err(ProtocolError::SinkOverflow {
            attempted: bytes.len(),
            written,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::serializer::{Progress, StreamSerializer};
    use alloc::string::String;
    use alloc::vec::Vec;
    use quarry_packet::registry::PacketRegistry;
    use quarry_packet::{Direction, Handshake, Packet, State};
    use quarry_protocol::ProtocolError;

    fn engine() -> StreamSerializer {
        StreamSerializer::new(PacketRegistry::vanilla(), Direction::Serverbound)
    }

    fn example_handshake() -> Handshake {
        Handshake {
            protocol_version: 316,
            server_address: String::from("test"),
            server_port: 25565,
            next_state: State::Status,
        }
    }

    const EXAMPLE_BODY: &[u8] = &[
        0,
        0b1011_1100,
        0b0000_0010,
        4,
        b't',
        b'e',
        b's',
        b't',
        0b0110_0011,
        0b1101_1101,
        1,
    ];

    const EXAMPLE_FRAME: &[u8] = &[
        11,
        0,
        0b1011_1100,
        0b0000_0010,
        4,
        b't',
        b'e',
        b's',
        b't',
        0b0110_0011,
        0b1101_1101,
        1,
    ];

    fn assert_example_packet(ser: &StreamSerializer) {
        match ser.last_packet() {
            Some(Packet::Handshake(handshake)) => {
                assert_eq!(handshake.protocol_version, 316);
                assert_eq!(handshake.server_address, "test");
                assert_eq!(handshake.server_port, 25565);
                assert_eq!(handshake.next_state, State::Status);
            }
            other => panic!("expected a handshake, got {other:?}"),
        }

        let id = ser.last_id().expect("id should be decoded");
        assert_eq!(id.id(), 0);
        assert_eq!(id.direction(), Direction::Serverbound);
        assert_eq!(id.state(), State::Handshaking);
    }

    #[test]
    fn parse_uncompressed() {
        let mut ser = engine();

        let mut src: &[u8] = EXAMPLE_FRAME;
        assert_eq!(ser.parse(&mut src), Ok(Progress::Done));

        assert_eq!(ser.cached(), EXAMPLE_FRAME.len());
        assert!(!ser.last_compressed());
        assert_eq!(ser.last_body_size(), 11);
        assert_eq!(ser.last_body(), EXAMPLE_BODY);
        assert_example_packet(&ser);
    }

    #[test]
    fn parse_uncompressed_chopped_input() {
        let mut ser = engine();

        for chunk in EXAMPLE_FRAME.chunks(1).take(EXAMPLE_FRAME.len() - 1) {
            let mut src: &[u8] = chunk;
            assert_eq!(ser.parse(&mut src), Ok(Progress::Pending));
        }

        let mut src: &[u8] = &EXAMPLE_FRAME[EXAMPLE_FRAME.len() - 1..];
        assert_eq!(ser.parse(&mut src), Ok(Progress::Done));
        assert_example_packet(&ser);
    }

    #[test]
    fn parse_length_prefix_too_short() {
        let mut ser = engine();

        let mut frame = EXAMPLE_FRAME.to_vec();
        frame[0] = 10;

        let mut src: &[u8] = &frame;
        assert_eq!(ser.parse(&mut src), Err(ProtocolError::EndOfFile));

        // the byte not covered by the length prefix is left unread
        assert_eq!(src.len(), 1);
    }

    #[test]
    fn parse_length_prefix_too_long() {
        let mut ser = engine();

        let mut frame = EXAMPLE_FRAME.to_vec();
        frame[0] = 12;
        frame.push(0);

        let mut src: &[u8] = &frame;
        assert_eq!(ser.parse(&mut src), Err(ProtocolError::InconsistentLength));
    }

    #[test]
    fn parse_unknown_id() {
        let mut ser = engine();

        let frame = [10_u8, 127, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        let mut src: &[u8] = &frame;
        assert_eq!(ser.parse(&mut src), Ok(Progress::Done));

        assert!(ser.last_packet().is_none());
        assert_eq!(ser.cached(), frame.len());
        assert!(!ser.last_compressed());

        let id = ser.last_id().expect("id should be decoded even without a codec");
        assert_eq!(id.id(), 127);
        assert_eq!(id.direction(), Direction::Serverbound);
        assert_eq!(id.state(), State::Handshaking);

        assert_eq!(ser.last_body(), &frame[1..]);
        assert_eq!(ser.last_body_size(), 10);
    }

    #[test]
    fn parse_compressed_literal_body() {
        let mut ser = engine();
        ser.enable_compression(1000);

        let mut frame = Vec::new();
        frame.push(12_u8);
        frame.push(0);
        frame.extend_from_slice(EXAMPLE_BODY);

        let mut src: &[u8] = &frame;
        assert_eq!(ser.parse(&mut src), Ok(Progress::Done));

        assert_eq!(ser.cached(), frame.len());
        assert!(!ser.last_compressed());
        assert_eq!(ser.last_body_size(), 11);
        assert_example_packet(&ser);
    }

    #[test]
    fn parse_compressed_literal_body_over_threshold() {
        let mut ser = engine();
        ser.enable_compression(0);

        let mut frame = Vec::new();
        frame.push(12_u8);
        frame.push(0);
        frame.extend_from_slice(EXAMPLE_BODY);

        let mut src: &[u8] = &frame;
        assert_eq!(
            ser.parse(&mut src),
            Err(ProtocolError::UncompressedWhereCompressedExpected)
        );
    }

    #[test]
    fn parse_compressed_body_under_threshold() {
        // a frame claiming an uncompressed length in (0, threshold) is malformed
        let mut ser = engine();
        ser.enable_compression(1000);

        let frame = [8_u8, 11, 1, 2, 3, 4, 5, 6, 7];
        let mut src: &[u8] = &frame;
        assert_eq!(
            ser.parse(&mut src),
            Err(ProtocolError::CompressedWhereUncompressedExpected)
        );
    }

    #[test]
    fn round_trip_compressed() {
        let mut writer = engine();
        writer.enable_compression(0);

        let packet = Packet::Handshake(example_handshake());
        let mut frame = Vec::new();
        writer
            .serialize(&packet, &mut frame)
            .expect("serialization should succeed");

        assert!(writer.last_serialized_compressed());
        assert_eq!(writer.last_serialized_body(), EXAMPLE_BODY);

        let mut reader = engine();
        reader.enable_compression(0);

        let mut src: &[u8] = &frame;
        assert_eq!(reader.parse(&mut src), Ok(Progress::Done));
        assert!(src.is_empty());

        assert!(reader.last_compressed());
        assert_eq!(
            reader.last_compressed_size(),
            writer.last_serialized_compressed_size()
        );
        assert_eq!(reader.last_body_size(), 11);
        assert_eq!(reader.cached(), frame.len());
        assert_example_packet(&reader);
    }

    #[test]
    fn round_trip_compressed_chopped_input() {
        let mut writer = engine();
        writer.enable_compression(0);

        let packet = Packet::Handshake(example_handshake());
        let mut frame = Vec::new();
        writer
            .serialize(&packet, &mut frame)
            .expect("serialization should succeed");

        let mut reader = engine();
        reader.enable_compression(0);

        let mut progress = Progress::Pending;
        for chunk in frame.chunks(3) {
            let mut src: &[u8] = chunk;
            progress = reader.parse(&mut src).expect("no error on chopped input");
        }

        assert_eq!(progress, Progress::Done);
        assert_example_packet(&reader);
    }

    #[test]
    fn serialize_uncompressed() {
        let mut ser = engine();

        let packet = Packet::Handshake(example_handshake());
        let mut frame = Vec::new();
        ser.serialize(&packet, &mut frame)
            .expect("serialization should succeed");

        assert_eq!(frame, EXAMPLE_FRAME);
        assert!(!ser.last_serialized_compressed());
        assert_eq!(ser.last_serialized_body(), EXAMPLE_BODY);
        assert_eq!(ser.last_serialized_size(), 11);
    }

    #[test]
    fn serialize_below_threshold_stays_literal() {
        let mut ser = engine();
        ser.enable_compression(12);

        let packet = Packet::Handshake(example_handshake());
        let mut frame = Vec::new();
        ser.serialize(&packet, &mut frame)
            .expect("serialization should succeed");

        assert!(!ser.last_serialized_compressed());

        let mut expected = Vec::new();
        expected.push(12_u8);
        expected.push(0);
        expected.extend_from_slice(EXAMPLE_BODY);
        assert_eq!(frame, expected);
    }

    #[test]
    fn serialize_at_threshold_compresses() {
        // the boundary is inclusive: a body exactly at the threshold must compress
        let mut ser = engine();
        ser.enable_compression(11);

        let packet = Packet::Handshake(example_handshake());
        let mut frame = Vec::new();
        ser.serialize(&packet, &mut frame)
            .expect("serialization should succeed");

        assert!(ser.last_serialized_compressed());
        assert_eq!(ser.last_serialized_body(), EXAMPLE_BODY);

        // frame = varint(C + 1) || varint(11) || zlib(body)
        let compressed_size = ser.last_serialized_compressed_size();
        assert_eq!(frame[0] as usize, compressed_size + 1);
        assert_eq!(frame[1], 11);

        let mut inflate = libdeflater::Decompressor::new();
        let mut body = [0_u8; 11];
        let written = inflate
            .zlib_decompress(&frame[2..], &mut body)
            .expect("compressed region should be valid zlib");
        assert_eq!(written, 11);
        assert_eq!(body, EXAMPLE_BODY);
    }

    #[test]
    fn serialize_sink_overflow() {
        let mut ser = engine();

        let packet = Packet::Handshake(example_handshake());
        let mut backing = [0_u8; 4];
        let mut sink = quarry_std::io::SliceBuf::new(&mut backing);

        assert!(matches!(
            ser.serialize(&packet, &mut sink),
            Err(ProtocolError::SinkOverflow { .. })
        ));
    }

    #[test]
    fn successive_frames_reset_state() {
        let mut ser = engine();

        let mut src: &[u8] = EXAMPLE_FRAME;
        assert_eq!(ser.parse(&mut src), Ok(Progress::Done));
        assert!(ser.last_packet().is_some());

        let frame = [10_u8, 127, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        let mut src: &[u8] = &frame;
        assert_eq!(ser.parse(&mut src), Ok(Progress::Done));

        assert!(ser.last_packet().is_none());
        assert_eq!(ser.last_id().map(|id| id.id()), Some(127));
        assert_eq!(ser.cached(), frame.len());
    }

    #[test]
    fn truncated_compressed_frame_is_end_of_file() {
        // outer length says 2 bytes, but the inner varint never completes
        let mut ser = engine();
        ser.enable_compression(0);

        let frame = [2_u8, 0x80, 0x80];
        let mut src: &[u8] = &frame;
        assert_eq!(ser.parse(&mut src), Err(ProtocolError::EndOfFile));
    }
}
