use std::collections::HashMap;
use std::fmt;

/// A protocol revision number. Packet ids are only meaningful relative to
/// one version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProtocolVersion(pub i32);

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which versions silently inherit a predecessor's packet mappings when a
/// registration call does not name them explicitly.
///
/// Supplied as static configuration at bootstrap. Versions absent from the
/// map have no linked successors. The data is expected to form a
/// forward-only chain; the registry still guards against cycles because
/// this is externally supplied configuration, not a structural guarantee.
#[derive(Debug, Clone, Default)]
pub struct VersionLinks {
    links: HashMap<ProtocolVersion, Vec<ProtocolVersion>>,
}

impl VersionLinks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that `successors` inherit `version`'s mappings, in order.
    pub fn link(mut self, version: ProtocolVersion, successors: &[ProtocolVersion]) -> Self {
        self.links.insert(version, successors.to_vec());
        self
    }

    /// The linked successors of `version`, or an empty slice if it has none.
    pub fn successors(&self, version: ProtocolVersion) -> &[ProtocolVersion] {
        self.links.get(&version).map(Vec::as_slice).unwrap_or(&[])
    }
}
