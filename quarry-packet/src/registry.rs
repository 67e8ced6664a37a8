use crate::{Direction, Handshake, Packet, PacketId, PacketKind, Result, State};
use alloc::vec::Vec;
use hashbrown::HashMap;
use quarry_std::io::Sink;

///
/// A packet codec: one parse function and one serialize function, together with the [`PacketId`]
/// the codec claims on the wire and the [`PacketKind`] it produces in memory.
///
/// Parsing always happens out of a reassembled in-memory body, so the parse function takes a
/// plain byte cursor. Serialization targets any [`Sink`].
pub struct PacketCodec {
    id: PacketId,
    kind: PacketKind,
    parse: fn(&mut &[u8]) -> Result<Packet>,
    serialize: fn(&Packet, &mut dyn Sink) -> Result<()>,
}

impl PacketCodec {
    ///
    /// The [`PacketId`] this codec claims.
    #[inline]
    #[must_use]
    pub fn id(&self) -> PacketId {
        self.id
    }

    ///
    /// The [`PacketKind`] this codec produces and consumes.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> PacketKind {
        self.kind
    }

    ///
    /// Parses a packet body (not including the id varint) from `src`.
    ///
    /// # Errors
    /// Whatever the underlying packet's body parser returns.
    pub fn parse(&self, src: &mut &[u8]) -> Result<Packet> {
        (self.parse)(src)
    }

    ///
    /// Serializes `packet`'s body (not including the id varint) into `sink`.
    ///
    /// # Errors
    /// Whatever the underlying packet's body serializer returns.
    pub fn serialize(&self, packet: &Packet, sink: &mut dyn Sink) -> Result<()> {
        (self.serialize)(packet, sink)
    }
}

fn parse_handshake(src: &mut &[u8]) -> Result<Packet> {
    Handshake::read_body(src).map(Packet::Handshake)
}

fn serialize_handshake(packet: &Packet, sink: &mut dyn Sink) -> Result<()> {
    match packet {
        Packet::Handshake(handshake) => handshake.write_body(sink),
    }
}

///
/// Maps [`PacketId`]s and [`PacketKind`]s to [`PacketCodec`]s.
///
/// The registry is populated at construction and never mutated afterwards, so sharing it behind
/// a reference across connections is safe. Both indices are maintained through a single insert
/// helper and therefore always contain exactly the same set of codecs.
pub struct PacketRegistry {
    codecs: Vec<PacketCodec>,
    by_id: HashMap<PacketId, usize>,
    by_kind: HashMap<PacketKind, usize>,
}

impl PacketRegistry {
    ///
    /// Creates a registry holding a codec for every packet type this crate defines.
    #[must_use]
    pub fn vanilla() -> Self {
        let mut registry = Self {
            codecs: Vec::new(),
            by_id: HashMap::new(),
            by_kind: HashMap::new(),
        };

        registry.insert(PacketCodec {
            id: PacketId::new(0, Direction::Serverbound, State::Handshaking),
            kind: PacketKind::Handshake,
            parse: parse_handshake,
            serialize: serialize_handshake,
        });

        registry
    }

    ///
    /// Registers `codec` under both indices. Each id and each kind may only be claimed once.
    fn insert(&mut self, codec: PacketCodec) {
        let index = self.codecs.len();

        let prev_id = self.by_id.insert(codec.id, index);
        let prev_kind = self.by_kind.insert(codec.kind, index);
        debug_assert!(
            prev_id.is_none() && prev_kind.is_none(),
            "duplicate codec registration"
        );

        self.codecs.push(codec);
    }

    ///
    /// Looks up the codec claiming `id`.
    #[must_use]
    pub fn by_id(&self, id: &PacketId) -> Option<&PacketCodec> {
        self.by_id.get(id).map(|index| &self.codecs[*index])
    }

    ///
    /// Looks up the codec producing `kind`.
    #[must_use]
    pub fn by_kind(&self, kind: PacketKind) -> Option<&PacketCodec> {
        self.by_kind.get(&kind).map(|index| &self.codecs[*index])
    }

    ///
    /// Looks up the codec for a packet value, deriving its [`PacketKind`].
    #[must_use]
    pub fn for_packet(&self, packet: &Packet) -> Option<&PacketCodec> {
        self.by_kind(packet.kind())
    }

    ///
    /// The number of registered codecs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    ///
    /// Whether the registry has no codecs at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }
}

impl Default for PacketRegistry {
    fn default() -> Self {
        Self::vanilla()
    }
}

#[cfg(test)]
mod tests {
    use crate::registry::PacketRegistry;
    use crate::{Direction, Handshake, Packet, PacketId, PacketKind, State};
    use alloc::string::String;
    use alloc::vec::Vec;

    #[test]
    fn lookup_by_id() {
        let registry = PacketRegistry::vanilla();

        let id = PacketId::new(0, Direction::Serverbound, State::Handshaking);
        let codec = registry.by_id(&id).expect("handshake should be registered");
        assert_eq!(codec.id(), id);
        assert_eq!(codec.kind(), PacketKind::Handshake);
    }

    #[test]
    fn lookup_unknown_id() {
        let registry = PacketRegistry::vanilla();

        let id = PacketId::new(127, Direction::Serverbound, State::Handshaking);
        assert!(registry.by_id(&id).is_none());

        // same numeric id, wrong direction
        let id = PacketId::new(0, Direction::Clientbound, State::Handshaking);
        assert!(registry.by_id(&id).is_none());
    }

    #[test]
    fn both_indices_agree() {
        let registry = PacketRegistry::vanilla();
        assert_eq!(registry.len(), 1);

        let by_kind = registry
            .by_kind(PacketKind::Handshake)
            .expect("kind index should know the handshake");
        let by_id = registry
            .by_id(&by_kind.id())
            .expect("id index should know the handshake");

        assert_eq!(by_id.kind(), by_kind.kind());
    }

    #[test]
    fn codec_round_trip() {
        let registry = PacketRegistry::vanilla();

        let packet = Packet::Handshake(Handshake {
            protocol_version: 316,
            server_address: String::from("test"),
            server_port: 25565,
            next_state: State::Status,
        });

        let codec = registry
            .for_packet(&packet)
            .expect("reverse lookup should find the handshake codec");

        let mut body = Vec::new();
        codec
            .serialize(&packet, &mut body)
            .expect("serialization should succeed");

        let mut src: &[u8] = &body;
        let parsed = codec.parse(&mut src).expect("parse should succeed");
        assert_eq!(parsed, packet);
        assert!(src.is_empty());
    }
}
