//!
//! Packet identity and packet values for the Minecraft
//! [Java Edition protocol](https://minecraft.wiki/w/Java_Edition_protocol).
//!
//! A packet on the wire is identified by the triple of numeric id, [`Direction`], and [`State`]
//! ([`PacketId`]); its decoded form is a variant of the [`Packet`] sum type. The
//! [`registry::PacketRegistry`] maps between the two, in both directions.
//!
//! Only the handshake packet is defined here; it serves as the template for wiring further
//! packet types into the registry. The framing layer (`quarry-packet-io`) treats ids without a
//! registered codec as "unknown" and still surfaces their raw bodies.

#![no_std]

pub(crate) extern crate alloc;

///
/// The handshake packet, the first packet of every Minecraft connection.
pub mod handshake;

///
/// The codec registry, double-indexed by [`PacketId`] and [`PacketKind`].
pub mod registry;

pub use handshake::Handshake;

///
/// Type alias for [`quarry_protocol::Result`].
pub type Result<T> = quarry_protocol::Result<T>;

///
/// Whether a packet travels from the client to the server or vice versa. The protocol contains
/// no packet that is both.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    ///
    /// Sent by the server, bound for the client.
    Clientbound,

    ///
    /// Sent by the client, bound for the server.
    Serverbound,
}

impl Direction {
    ///
    /// A human-readable name, for diagnostics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Clientbound => "Clientbound",
            Direction::Serverbound => "Serverbound",
        }
    }
}

///
/// The four phases of a Minecraft connection. Which packet an id refers to depends on the state
/// the connection is in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum State {
    ///
    /// The initial state; the only packet here is the handshake.
    Handshaking,

    ///
    /// Server list ping and friends.
    Status,

    ///
    /// Authentication and encryption negotiation.
    Login,

    ///
    /// Everything else.
    Play,
}

impl State {
    ///
    /// A human-readable name, for diagnostics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            State::Handshaking => "Handshaking",
            State::Status => "Status",
            State::Login => "Login",
            State::Play => "Play",
        }
    }
}

///
/// Identifies a packet type on the wire as the triple of numeric id, [`Direction`], and
/// [`State`]. Equality, ordering, and hashing are structural over the triple.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PacketId {
    id: u32,
    direction: Direction,
    state: State,
}

impl PacketId {
    ///
    /// Creates a `PacketId` from its parts.
    #[must_use]
    pub fn new(id: u32, direction: Direction, state: State) -> Self {
        Self {
            id,
            direction,
            state,
        }
    }

    ///
    /// The numeric id identifying the packet on the wire.
    #[inline]
    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    ///
    /// The direction in which the identified packet is sent.
    #[inline]
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    ///
    /// The connection state in which the identified packet is sent and received.
    #[inline]
    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }
}

///
/// A decoded packet value.
///
/// Created by parsing, consumed by the application; the registry never retains packet values.
/// Packets without a registered codec are not represented here -- the framing layer reports them
/// as "no packet" while still exposing the raw id and body bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Packet {
    ///
    /// The serverbound handshake.
    Handshake(Handshake),
}

impl Packet {
    ///
    /// The runtime type tag of this packet, used for reverse lookup in the registry.
    #[must_use]
    pub fn kind(&self) -> PacketKind {
        match self {
            Packet::Handshake(_) => PacketKind::Handshake,
        }
    }
}

///
/// A lightweight runtime type tag, one per [`Packet`] variant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PacketKind {
    ///
    /// See [`Handshake`].
    Handshake,
}

impl PacketKind {
    ///
    /// The variant's name, used in diagnostics such as
    /// [`quarry_protocol::ProtocolError::SerializerMissing`].
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            PacketKind::Handshake => "Handshake",
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Direction, PacketId, State};
    use core::cmp::Ordering;

    #[test]
    fn packet_id_structural_equality() {
        let a = PacketId::new(0, Direction::Serverbound, State::Handshaking);
        let b = PacketId::new(0, Direction::Serverbound, State::Handshaking);
        let c = PacketId::new(0, Direction::Clientbound, State::Handshaking);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn packet_id_ordering_is_total() {
        let small = PacketId::new(0, Direction::Serverbound, State::Handshaking);
        let large = PacketId::new(1, Direction::Serverbound, State::Handshaking);

        assert_eq!(small.cmp(&large), Ordering::Less);
        assert_eq!(large.cmp(&small), Ordering::Greater);
        assert_eq!(small.cmp(&small), Ordering::Equal);
    }
}
