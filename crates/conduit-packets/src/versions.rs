use conduit_protocol_core::{ProtocolVersion, VersionLinks};

pub const PROTOCOL_1_11: ProtocolVersion = ProtocolVersion(315);
pub const PROTOCOL_1_11_1: ProtocolVersion = ProtocolVersion(316);
pub const PROTOCOL_1_12: ProtocolVersion = ProtocolVersion(335);
pub const PROTOCOL_1_12_1: ProtocolVersion = ProtocolVersion(338);
pub const PROTOCOL_1_12_2: ProtocolVersion = ProtocolVersion(340);

/// Every protocol version the proxy accepts, oldest first.
pub const SUPPORTED_VERSIONS: &[ProtocolVersion] = &[
    PROTOCOL_1_11,
    PROTOCOL_1_11_1,
    PROTOCOL_1_12,
    PROTOCOL_1_12_1,
    PROTOCOL_1_12_2,
];

/// Which versions inherit a predecessor's packet ids when a registration
/// call does not name them. 1.11.1 and 1.12 both pick up 1.11's ids; the
/// 1.12 point releases chain forward from there.
pub fn version_links() -> VersionLinks {
    VersionLinks::new()
        .link(PROTOCOL_1_11, &[PROTOCOL_1_11_1, PROTOCOL_1_12])
        .link(PROTOCOL_1_12, &[PROTOCOL_1_12_1])
        .link(PROTOCOL_1_12_1, &[PROTOCOL_1_12_2])
}
