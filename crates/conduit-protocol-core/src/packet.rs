use std::fmt;

use crate::ProtocolVersion;

/// Stable symbolic identity of a packet type, independent of the numeric id
/// it carries at any given protocol version. Assigned once at registration
/// and carried by instances via [`Packet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PacketKind(pub &'static str);

impl fmt::Display for PacketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Implemented by the version-independent packet representation so the
/// encode path can recover the kind tag from an instance.
pub trait Packet {
    fn kind(&self) -> PacketKind;
}

/// Pure factory producing a fresh instance of one packet kind. Stateless and
/// callable any number of times; there are no shared packet templates.
pub type PacketFactory<P> = fn() -> P;

/// An explicit assertion that a kind uses `id` at exactly `version`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketMapping {
    pub id: i32,
    pub version: ProtocolVersion,
}

/// Shorthand for building mapping lists at registration call sites.
pub fn map(id: i32, version: ProtocolVersion) -> PacketMapping {
    PacketMapping { id, version }
}
