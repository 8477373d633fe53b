use std::sync::Arc;

use crate::{
    ConnectionState, Direction, Packet, PacketRegistry, ProtocolVersion, RegistryError,
    VersionLinks, VersionTable,
};

/// The serverbound and clientbound registries for one connection state.
/// The same raw id in two directions means nothing to each other.
#[derive(Debug)]
struct DirectionPair<P> {
    serverbound: PacketRegistry<P>,
    clientbound: PacketRegistry<P>,
}

impl<P> DirectionPair<P> {
    fn new(supported: &[ProtocolVersion], links: &Arc<VersionLinks>) -> Self {
        Self {
            serverbound: PacketRegistry::new(Direction::Serverbound, supported, Arc::clone(links)),
            clientbound: PacketRegistry::new(Direction::Clientbound, supported, Arc::clone(links)),
        }
    }

    fn get(&self, direction: Direction) -> &PacketRegistry<P> {
        match direction {
            Direction::Serverbound => &self.serverbound,
            Direction::Clientbound => &self.clientbound,
        }
    }

    fn get_mut(&mut self, direction: Direction) -> &mut PacketRegistry<P> {
        match direction {
            Direction::Serverbound => &mut self.serverbound,
            Direction::Clientbound => &mut self.clientbound,
        }
    }
}

/// All packet-identity tables for the protocol: a pair of directional
/// registries per connection state.
///
/// Built once at bootstrap, then shared immutably (typically behind an
/// `Arc`) with every connection task. All lookups take `&self`, so
/// concurrent reads need no synchronization; there are no writes after
/// bootstrap.
#[derive(Debug)]
pub struct ProtocolRegistry<P> {
    handshake: DirectionPair<P>,
    status: DirectionPair<P>,
    login: DirectionPair<P>,
    play: DirectionPair<P>,
}

impl<P> ProtocolRegistry<P> {
    /// Pre-create empty tables for every supported version in every state
    /// and direction. Registration afterwards only fills entries.
    pub fn new(supported: &[ProtocolVersion], links: VersionLinks) -> Self {
        let links = Arc::new(links);
        Self {
            handshake: DirectionPair::new(supported, &links),
            status: DirectionPair::new(supported, &links),
            login: DirectionPair::new(supported, &links),
            play: DirectionPair::new(supported, &links),
        }
    }

    fn pair(&self, state: ConnectionState) -> &DirectionPair<P> {
        match state {
            ConnectionState::Handshake => &self.handshake,
            ConnectionState::Status => &self.status,
            ConnectionState::Login => &self.login,
            ConnectionState::Play => &self.play,
        }
    }

    fn pair_mut(&mut self, state: ConnectionState) -> &mut DirectionPair<P> {
        match state {
            ConnectionState::Handshake => &mut self.handshake,
            ConnectionState::Status => &mut self.status,
            ConnectionState::Login => &mut self.login,
            ConnectionState::Play => &mut self.play,
        }
    }

    pub fn registry(&self, state: ConnectionState, direction: Direction) -> &PacketRegistry<P> {
        self.pair(state).get(direction)
    }

    /// Mutable access for bootstrap registration calls only; nothing
    /// mutates the registry once connections are being served.
    pub fn registry_mut(
        &mut self,
        state: ConnectionState,
        direction: Direction,
    ) -> &mut PacketRegistry<P> {
        self.pair_mut(state).get_mut(direction)
    }

    /// Resolve the frozen table for a negotiated connection context.
    pub fn table(
        &self,
        state: ConnectionState,
        direction: Direction,
        version: ProtocolVersion,
    ) -> Result<&VersionTable<P>, RegistryError> {
        self.registry(state, direction).table(version)
    }

    /// Resolve a raw id read off the wire to a fresh packet instance.
    /// `Ok(None)` means the id is unknown in this context, which the decode
    /// pipeline is free to skip or treat as fatal.
    pub fn decode(
        &self,
        state: ConnectionState,
        direction: Direction,
        version: ProtocolVersion,
        id: i32,
    ) -> Result<Option<P>, RegistryError> {
        Ok(self.table(state, direction, version)?.create(id))
    }

    /// Resolve a packet instance back to the raw id to write on the wire.
    pub fn encode(
        &self,
        state: ConnectionState,
        direction: Direction,
        version: ProtocolVersion,
        packet: &P,
    ) -> Result<i32, RegistryError>
    where
        P: Packet,
    {
        self.table(state, direction, version)?.packet_id(packet.kind())
    }
}
