use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::{Direction, PacketFactory, PacketKind, PacketMapping, ProtocolVersion, VersionLinks};

/// Errors surfaced by registration and lookup.
///
/// Everything except `UnregisteredKind` is a configuration defect that shows
/// up at bootstrap and must abort startup. `UnregisteredKind` is a
/// programmer error: code tried to send a packet kind that was never
/// registered for the active state/direction/version.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("at least one mapping must be provided")]
    EmptyMappings,
    #[error("unknown protocol version {0}")]
    UnknownVersion(ProtocolVersion),
    #[error("version link graph cycles back through {0}")]
    CyclicLinkGraph(ProtocolVersion),
    #[error("no id for packet {kind} in {direction} protocol {version}")]
    UnregisteredKind {
        kind: PacketKind,
        direction: Direction,
        version: ProtocolVersion,
    },
}

/// The per-version bijection between raw packet ids and kinds for one
/// direction. Frozen once bootstrap finishes; lookups take `&self` and the
/// decode/encode pipeline reads tables concurrently without locking.
#[derive(Debug)]
pub struct VersionTable<P> {
    version: ProtocolVersion,
    direction: Direction,
    by_id: HashMap<i32, (PacketKind, PacketFactory<P>)>,
    by_kind: HashMap<PacketKind, i32>,
}

impl<P> VersionTable<P> {
    fn new(version: ProtocolVersion, direction: Direction) -> Self {
        Self {
            version,
            direction,
            by_id: HashMap::new(),
            by_kind: HashMap::new(),
        }
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    /// Build a fresh instance for a raw id. `None` means the id is unknown
    /// at this state/direction/version; that is an expected runtime
    /// condition and the caller decides whether to skip the packet, log it,
    /// or drop the connection.
    pub fn create(&self, id: i32) -> Option<P> {
        self.by_id.get(&id).map(|(_, factory)| factory())
    }

    /// The kind registered at a raw id, without instantiating it.
    pub fn kind_of(&self, id: i32) -> Option<PacketKind> {
        self.by_id.get(&id).map(|(kind, _)| *kind)
    }

    /// The raw id registered for a kind. Failing here means code attempted
    /// to send a packet that was never registered for the active protocol
    /// context; surface it loudly rather than guessing an id.
    pub fn packet_id(&self, kind: PacketKind) -> Result<i32, RegistryError> {
        self.by_kind
            .get(&kind)
            .copied()
            .ok_or(RegistryError::UnregisteredKind {
                kind,
                direction: self.direction,
                version: self.version,
            })
    }

    /// Last write wins on either key; stale entries are removed so the
    /// table stays bijective over registered entries.
    fn insert(&mut self, id: i32, kind: PacketKind, factory: PacketFactory<P>) {
        if let Some((prev_kind, _)) = self.by_id.insert(id, (kind, factory)) {
            if prev_kind != kind {
                warn!(
                    "{} protocol {}: id {:#04X} reassigned from {} to {}",
                    self.direction, self.version, id, prev_kind, kind
                );
                if self.by_kind.get(&prev_kind) == Some(&id) {
                    self.by_kind.remove(&prev_kind);
                }
            }
        }
        if let Some(prev_id) = self.by_kind.insert(kind, id) {
            if prev_id != id && matches!(self.by_id.get(&prev_id), Some((k, _)) if *k == kind) {
                self.by_id.remove(&prev_id);
            }
        }
    }
}

/// Owns one [`VersionTable`] per supported protocol version for a single
/// traffic direction, and implements the registration/propagation
/// algorithm. Tables are pre-created empty at construction, so registration
/// only fills entries.
#[derive(Debug)]
pub struct PacketRegistry<P> {
    direction: Direction,
    links: Arc<VersionLinks>,
    versions: HashMap<ProtocolVersion, VersionTable<P>>,
}

impl<P> PacketRegistry<P> {
    pub fn new(
        direction: Direction,
        supported: &[ProtocolVersion],
        links: Arc<VersionLinks>,
    ) -> Self {
        let versions = supported
            .iter()
            .map(|&version| (version, VersionTable::new(version, direction)))
            .collect();
        Self {
            direction,
            links,
            versions,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The table for a negotiated version. Failing here means the version
    /// was never configured into this registry; negotiation upstream is
    /// supposed to rule that out before we are queried.
    pub fn table(&self, version: ProtocolVersion) -> Result<&VersionTable<P>, RegistryError> {
        self.versions
            .get(&version)
            .ok_or(RegistryError::UnknownVersion(version))
    }

    /// Register a packet kind under the given explicit mappings.
    ///
    /// Every version reachable through the link graph that no mapping in
    /// this call names inherits the nearest preceding explicit id along the
    /// chain. An explicit mapping always wins over inheritance and restarts
    /// propagation with its own id from that point on. The outcome does not
    /// depend on the order of `mappings`: each explicit version is decided
    /// solely by its own mapping, and propagation only ever targets
    /// versions absent from the explicit set.
    pub fn register(
        &mut self,
        kind: PacketKind,
        factory: PacketFactory<P>,
        mappings: &[PacketMapping],
    ) -> Result<(), RegistryError> {
        if mappings.is_empty() {
            return Err(RegistryError::EmptyMappings);
        }
        let mut explicit = HashSet::with_capacity(mappings.len());
        for mapping in mappings {
            if !self.versions.contains_key(&mapping.version) {
                return Err(RegistryError::UnknownVersion(mapping.version));
            }
            if !explicit.insert(mapping.version) {
                warn!(
                    "{} registration for {} names protocol {} twice; the last mapping wins",
                    self.direction, kind, mapping.version
                );
            }
        }
        for mapping in mappings {
            let mut visiting = HashSet::new();
            self.apply(kind, factory, mapping.id, mapping.version, &explicit, &mut visiting)?;
        }
        Ok(())
    }

    /// Write one (id, version) entry and cascade it through the version's
    /// linked successors. `visiting` holds the active recursion path: the
    /// link graph is configuration data, so a cycle in it must fail instead
    /// of recursing forever.
    fn apply(
        &mut self,
        kind: PacketKind,
        factory: PacketFactory<P>,
        id: i32,
        version: ProtocolVersion,
        explicit: &HashSet<ProtocolVersion>,
        visiting: &mut HashSet<ProtocolVersion>,
    ) -> Result<(), RegistryError> {
        if !visiting.insert(version) {
            return Err(RegistryError::CyclicLinkGraph(version));
        }
        self.versions
            .get_mut(&version)
            .ok_or(RegistryError::UnknownVersion(version))?
            .insert(id, kind, factory);

        let links = Arc::clone(&self.links);
        for &successor in links.successors(version) {
            // An explicit mapping for the successor handles its own
            // propagation with its own id; stop this branch there.
            if !explicit.contains(&successor) {
                self.apply(kind, factory, id, successor, explicit, visiting)?;
            }
        }
        visiting.remove(&version);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Probe {
        KeepAlive,
        Chat,
    }

    const KEEP_ALIVE: PacketKind = PacketKind("keep_alive");
    const CHAT: PacketKind = PacketKind("chat");

    fn keep_alive() -> Probe {
        Probe::KeepAlive
    }

    fn chat() -> Probe {
        Probe::Chat
    }

    const V11: ProtocolVersion = ProtocolVersion(315);
    const V11_1: ProtocolVersion = ProtocolVersion(316);
    const V12: ProtocolVersion = ProtocolVersion(335);
    const V12_1: ProtocolVersion = ProtocolVersion(338);
    const V12_2: ProtocolVersion = ProtocolVersion(340);
    const SUPPORTED: &[ProtocolVersion] = &[V11, V11_1, V12, V12_1, V12_2];

    fn links() -> VersionLinks {
        VersionLinks::new()
            .link(V11, &[V11_1, V12])
            .link(V12, &[V12_1])
            .link(V12_1, &[V12_2])
    }

    fn registry() -> PacketRegistry<Probe> {
        PacketRegistry::new(Direction::Serverbound, SUPPORTED, Arc::new(links()))
    }

    fn resolved_ids(registry: &PacketRegistry<Probe>, kind: PacketKind) -> Vec<i32> {
        SUPPORTED
            .iter()
            .map(|&v| registry.table(v).unwrap().packet_id(kind).unwrap())
            .collect()
    }

    #[test]
    fn keep_alive_scenario() {
        let mut registry = registry();
        registry
            .register(
                KEEP_ALIVE,
                keep_alive,
                &[map(0x0B, V11), map(0x0C, V12), map(0x0B, V12_1)],
            )
            .unwrap();

        assert_eq!(
            resolved_ids(&registry, KEEP_ALIVE),
            vec![0x0B, 0x0B, 0x0C, 0x0B, 0x0B]
        );
        for (&version, id) in SUPPORTED.iter().zip([0x0B, 0x0B, 0x0C, 0x0B, 0x0B]) {
            let table = registry.table(version).unwrap();
            assert_eq!(table.create(id), Some(Probe::KeepAlive));
        }
    }

    #[test]
    fn inherits_down_linked_chain() {
        let mut registry = registry();
        registry
            .register(KEEP_ALIVE, keep_alive, &[map(0x0B, V11)])
            .unwrap();

        // One mapping at the oldest version reaches every supported version.
        assert_eq!(
            resolved_ids(&registry, KEEP_ALIVE),
            vec![0x0B, 0x0B, 0x0B, 0x0B, 0x0B]
        );
    }

    #[test]
    fn explicit_mapping_restarts_propagation() {
        let mut registry = registry();
        registry
            .register(CHAT, chat, &[map(0x02, V11), map(0x03, V12)])
            .unwrap();

        // 1.12's explicit id flows to its own successors, not 1.11's.
        assert_eq!(resolved_ids(&registry, CHAT), vec![0x02, 0x02, 0x03, 0x03, 0x03]);
    }

    #[test]
    fn order_independent() {
        let mappings = [map(0x0B, V11), map(0x0C, V12), map(0x0B, V12_1)];
        let permutations: &[[usize; 3]] = &[
            [0, 1, 2],
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0],
        ];

        for order in permutations {
            let shuffled: Vec<_> = order.iter().map(|&i| mappings[i]).collect();
            let mut registry = registry();
            registry.register(KEEP_ALIVE, keep_alive, &shuffled).unwrap();
            assert_eq!(
                resolved_ids(&registry, KEEP_ALIVE),
                vec![0x0B, 0x0B, 0x0C, 0x0B, 0x0B],
                "order {:?} diverged",
                order
            );
        }
    }

    #[test]
    fn idempotent_reregistration() {
        let mappings = [map(0x0B, V11), map(0x0C, V12), map(0x0B, V12_1)];
        let mut registry = registry();
        registry.register(KEEP_ALIVE, keep_alive, &mappings).unwrap();
        registry.register(KEEP_ALIVE, keep_alive, &mappings).unwrap();

        assert_eq!(
            resolved_ids(&registry, KEEP_ALIVE),
            vec![0x0B, 0x0B, 0x0C, 0x0B, 0x0B]
        );
        for (&version, id) in SUPPORTED.iter().zip([0x0B, 0x0B, 0x0C, 0x0B, 0x0B]) {
            assert_eq!(registry.table(version).unwrap().kind_of(id), Some(KEEP_ALIVE));
        }
    }

    #[test]
    fn empty_mappings_rejected() {
        let mut registry = registry();
        assert_eq!(
            registry.register(KEEP_ALIVE, keep_alive, &[]),
            Err(RegistryError::EmptyMappings)
        );
    }

    #[test]
    fn unknown_mapping_version_rejected() {
        let mut registry = registry();
        let bogus = ProtocolVersion(999);
        assert_eq!(
            registry.register(KEEP_ALIVE, keep_alive, &[map(0x0B, V11), map(0x0B, bogus)]),
            Err(RegistryError::UnknownVersion(bogus))
        );
    }

    #[test]
    fn unknown_version_table_lookup_fails() {
        let registry = registry();
        assert_eq!(
            registry.table(ProtocolVersion(999)).err(),
            Some(RegistryError::UnknownVersion(ProtocolVersion(999)))
        );
    }

    #[test]
    fn unregistered_id_yields_none() {
        let mut registry = registry();
        registry
            .register(KEEP_ALIVE, keep_alive, &[map(0x0B, V11)])
            .unwrap();
        let table = registry.table(V11).unwrap();
        assert_eq!(table.version(), V11);
        assert_eq!(table.create(0x7F), None);
    }

    #[test]
    fn unregistered_kind_is_an_error() {
        let registry = registry();
        assert_eq!(
            registry.table(V12).unwrap().packet_id(CHAT),
            Err(RegistryError::UnregisteredKind {
                kind: CHAT,
                direction: Direction::Serverbound,
                version: V12,
            })
        );
    }

    #[test]
    fn link_into_unconfigured_version_is_a_config_error() {
        let stray = ProtocolVersion(999);
        let links = VersionLinks::new().link(V11, &[stray]);
        let mut registry: PacketRegistry<Probe> =
            PacketRegistry::new(Direction::Serverbound, SUPPORTED, Arc::new(links));
        assert_eq!(
            registry.register(KEEP_ALIVE, keep_alive, &[map(0x0B, V11)]),
            Err(RegistryError::UnknownVersion(stray))
        );
    }

    #[test]
    fn cyclic_links_detected() {
        // V11 -> V11_1 -> V12 -> V11_1 never terminates without the guard.
        let links = VersionLinks::new()
            .link(V11, &[V11_1])
            .link(V11_1, &[V12])
            .link(V12, &[V11_1]);
        let mut registry: PacketRegistry<Probe> =
            PacketRegistry::new(Direction::Serverbound, SUPPORTED, Arc::new(links));
        assert_eq!(
            registry.register(KEEP_ALIVE, keep_alive, &[map(0x0B, V11)]),
            Err(RegistryError::CyclicLinkGraph(V11_1))
        );
    }

    #[test]
    fn diamond_links_are_not_a_cycle() {
        // Two branches converging on the same successor inherit the same id.
        let links = VersionLinks::new()
            .link(V11, &[V11_1, V12])
            .link(V11_1, &[V12_1])
            .link(V12, &[V12_1]);
        let mut registry: PacketRegistry<Probe> =
            PacketRegistry::new(Direction::Serverbound, SUPPORTED, Arc::new(links));
        registry
            .register(KEEP_ALIVE, keep_alive, &[map(0x0B, V11)])
            .unwrap();
        assert_eq!(registry.table(V12_1).unwrap().packet_id(KEEP_ALIVE), Ok(0x0B));
    }

    #[test]
    fn duplicate_explicit_versions_last_wins() {
        // Caller error; warned about, but the last mapping processed wins.
        let mut registry = registry();
        registry
            .register(KEEP_ALIVE, keep_alive, &[map(0x01, V11), map(0x02, V11)])
            .unwrap();
        assert_eq!(registry.table(V11).unwrap().packet_id(KEEP_ALIVE), Ok(0x02));
    }

    #[test]
    fn last_write_wins_on_id_collision() {
        let mut registry = registry();
        registry
            .register(KEEP_ALIVE, keep_alive, &[map(0x0B, V11)])
            .unwrap();
        registry.register(CHAT, chat, &[map(0x0B, V11)]).unwrap();

        let table = registry.table(V11).unwrap();
        assert_eq!(table.create(0x0B), Some(Probe::Chat));
        // The displaced kind no longer resolves to a stale id.
        assert!(table.packet_id(KEEP_ALIVE).is_err());
    }

    #[test]
    fn remapping_a_kind_drops_its_old_id() {
        let mut registry = registry();
        registry
            .register(KEEP_ALIVE, keep_alive, &[map(0x0B, V11)])
            .unwrap();
        registry
            .register(KEEP_ALIVE, keep_alive, &[map(0x0C, V11)])
            .unwrap();

        let table = registry.table(V11).unwrap();
        assert_eq!(table.packet_id(KEEP_ALIVE), Ok(0x0C));
        assert_eq!(table.create(0x0B), None);
    }
}
