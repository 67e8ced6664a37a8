use crate::{Result, State};
use alloc::string::String;
use quarry_protocol::int::{parse_int, serialize_int};
use quarry_protocol::string::{parse_string, serialize_string};
use quarry_protocol::varint::{parse_varint, serialize_varint};
use quarry_protocol::ProtocolError;
use quarry_std::io::{Sink, Source};

///
/// Causes the server to switch into the target state.
///
/// The first packet of every connection. The vanilla server ignores `server_address` and
/// `server_port`; proxies use them for routing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Handshake {
    ///
    /// The client's protocol version number.
    pub protocol_version: u32,

    ///
    /// Host name or IP that was used to connect.
    pub server_address: String,

    ///
    /// Port that was used to connect.
    pub server_port: u16,

    ///
    /// Either [`State::Status`] or [`State::Login`]; the connection switches to the designated
    /// state. Holding any other state is representable in memory but not on the wire.
    pub next_state: State,
}

impl Handshake {
    ///
    /// Reads a handshake body (everything after the packet id) from a [`Source`].
    ///
    /// # Errors
    /// Any error of the field codecs, plus [`ProtocolError::Unexpected`] if the next-state byte
    /// is not 1 (status) or 2 (login).
    pub fn read_body<S>(src: &mut S) -> Result<Self>
    where
        S: Source + ?Sized,
    {
        let protocol_version = parse_varint::<u32, S>(src)?;
        let server_address = parse_string(src)?;
        let server_port = parse_int::<u16, S>(src)?;

        let next_state = match parse_int::<u8, S>(src)? {
            1 => State::Status,
            2 => State::Login,
            _ => return Err(ProtocolError::Unexpected),
        };

        Ok(Self {
            protocol_version,
            server_address,
            server_port,
            next_state,
        })
    }

    ///
    /// Writes this handshake's body (everything after the packet id) to a [`Sink`].
    ///
    /// # Errors
    /// Any error of the field codecs, plus [`ProtocolError::Unrepresentable`] if `next_state` is
    /// neither [`State::Status`] nor [`State::Login`].
    pub fn write_body<K>(&self, sink: &mut K) -> Result<()>
    where
        K: Sink + ?Sized,
    {
        serialize_varint(self.protocol_version, sink)?;
        serialize_string(&self.server_address, sink)?;
        serialize_int(self.server_port, sink)?;

        let next_state: u8 = match self.next_state {
            State::Status => 1,
            State::Login => 2,
            _ => return Err(ProtocolError::Unrepresentable),
        };

        serialize_int(next_state, sink)
    }
}

#[cfg(test)]
mod tests {
    use crate::handshake::Handshake;
    use crate::State;
    use alloc::string::String;
    use alloc::vec::Vec;
    use quarry_protocol::ProtocolError;

    fn example() -> Handshake {
        Handshake {
            protocol_version: 316,
            server_address: String::from("test"),
            server_port: 25565,
            next_state: State::Status,
        }
    }

    const EXAMPLE_BODY: &[u8] = &[
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

    #[test]
    fn write_body_matches_wire_format() {
        let mut sink = Vec::new();
        example().write_body(&mut sink).expect("serialization should succeed");

        assert_eq!(sink, EXAMPLE_BODY);
    }

    #[test]
    fn read_body_matches_wire_format() {
        let mut src: &[u8] = EXAMPLE_BODY;
        let parsed = Handshake::read_body(&mut src).expect("parse should succeed");

        assert_eq!(parsed, example());
        assert!(src.is_empty());
    }

    #[test]
    fn unknown_next_state_is_unexpected() {
        let mut body = EXAMPLE_BODY.to_vec();
        *body.last_mut().unwrap() = 7;

        let mut src: &[u8] = &body;
        assert_eq!(Handshake::read_body(&mut src), Err(ProtocolError::Unexpected));
    }

    #[test]
    fn non_wire_next_state_is_unrepresentable() {
        let mut handshake = example();
        handshake.next_state = State::Play;

        let mut sink = Vec::new();
        assert_eq!(
            handshake.write_body(&mut sink),
            Err(ProtocolError::Unrepresentable)
        );
    }

    #[test]
    fn truncated_body_is_end_of_file() {
        let mut src: &[u8] = &EXAMPLE_BODY[..6];
        assert_eq!(Handshake::read_body(&mut src), Err(ProtocolError::EndOfFile));
    }
}
