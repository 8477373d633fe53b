use std::fmt;

/// The phase of a proxied connection. Each state numbers its packets
/// independently per direction; which state follows which is decided by the
/// session layer, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    Handshake,
    Status,
    Login,
    Play,
}

/// Which endpoint originates a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Serverbound,
    Clientbound,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Serverbound => f.write_str("serverbound"),
            Direction::Clientbound => f.write_str("clientbound"),
        }
    }
}
