use conduit_protocol_core::{
    map, ConnectionState, Direction, PacketMapping, ProtocolRegistry, RegistryError,
};
use uuid::Uuid;

use crate::packet::{kind, InternalPacket};
use crate::versions::{version_links, PROTOCOL_1_11, PROTOCOL_1_12, PROTOCOL_1_12_1,
    PROTOCOL_1_12_2, SUPPORTED_VERSIONS};

/// An id introduced at the oldest supported version; the link graph carries
/// it forward unchanged to every later version.
fn lowest(id: i32) -> PacketMapping {
    map(id, PROTOCOL_1_11)
}

/// Build the complete frozen registry for every state and direction.
///
/// Runs once at startup, before any connection is accepted; an error here
/// is a defect in the catalogue itself and must abort the process. The
/// returned registry is immutable — share it behind an `Arc` and read from
/// as many connection tasks as needed.
pub fn bootstrap() -> Result<ProtocolRegistry<InternalPacket>, RegistryError> {
    let mut registry = ProtocolRegistry::new(SUPPORTED_VERSIONS, version_links());

    let sb = registry.registry_mut(ConnectionState::Handshake, Direction::Serverbound);
    sb.register(kind::HANDSHAKE, handshake, &[lowest(0x00)])?;

    let sb = registry.registry_mut(ConnectionState::Status, Direction::Serverbound);
    sb.register(kind::STATUS_REQUEST, status_request, &[lowest(0x00)])?;
    sb.register(kind::STATUS_PING, status_ping, &[lowest(0x01)])?;

    let cb = registry.registry_mut(ConnectionState::Status, Direction::Clientbound);
    cb.register(kind::STATUS_RESPONSE, status_response, &[lowest(0x00)])?;
    cb.register(kind::STATUS_PING, status_ping, &[lowest(0x01)])?;

    let sb = registry.registry_mut(ConnectionState::Login, Direction::Serverbound);
    sb.register(kind::SERVER_LOGIN, server_login, &[lowest(0x00)])?;
    sb.register(kind::ENCRYPTION_RESPONSE, encryption_response, &[lowest(0x01)])?;

    let cb = registry.registry_mut(ConnectionState::Login, Direction::Clientbound);
    cb.register(kind::DISCONNECT, disconnect, &[lowest(0x00)])?;
    cb.register(kind::ENCRYPTION_REQUEST, encryption_request, &[lowest(0x01)])?;
    cb.register(kind::SERVER_LOGIN_SUCCESS, server_login_success, &[lowest(0x02)])?;
    cb.register(kind::SET_COMPRESSION, set_compression, &[lowest(0x03)])?;

    let sb = registry.registry_mut(ConnectionState::Play, Direction::Serverbound);
    sb.register(
        kind::CHAT,
        chat,
        &[
            map(0x02, PROTOCOL_1_11),
            map(0x03, PROTOCOL_1_12),
            map(0x02, PROTOCOL_1_12_2),
        ],
    )?;
    sb.register(
        kind::KEEP_ALIVE,
        keep_alive,
        &[
            map(0x0B, PROTOCOL_1_11),
            map(0x0C, PROTOCOL_1_12),
            map(0x0B, PROTOCOL_1_12_1),
        ],
    )?;
    sb.register(
        kind::CLIENT_SETTINGS,
        client_settings,
        &[
            map(0x04, PROTOCOL_1_11),
            map(0x05, PROTOCOL_1_12),
            map(0x04, PROTOCOL_1_12_1),
        ],
    )?;

    let cb = registry.registry_mut(ConnectionState::Play, Direction::Clientbound);
    cb.register(kind::BOSS_BAR, boss_bar, &[lowest(0x0C)])?;
    cb.register(kind::CHAT, chat, &[lowest(0x0F)])?;
    cb.register(kind::DISCONNECT, disconnect, &[lowest(0x1A)])?;
    cb.register(kind::KEEP_ALIVE, keep_alive, &[lowest(0x1F)])?;
    cb.register(kind::JOIN_GAME, join_game, &[lowest(0x23)])?;
    cb.register(
        kind::RESPAWN,
        respawn,
        &[
            map(0x33, PROTOCOL_1_11),
            map(0x34, PROTOCOL_1_12),
            map(0x35, PROTOCOL_1_12_2),
        ],
    )?;

    Ok(registry)
}

// Factories hand the decoder a blank instance to fill from the wire.

fn handshake() -> InternalPacket {
    InternalPacket::Handshake {
        protocol_version: 0,
        server_address: String::new(),
        server_port: 0,
        next_state: 0,
    }
}

fn status_request() -> InternalPacket {
    InternalPacket::StatusRequest
}

fn status_ping() -> InternalPacket {
    InternalPacket::StatusPing { payload: 0 }
}

fn status_response() -> InternalPacket {
    InternalPacket::StatusResponse {
        status: String::new(),
    }
}

fn server_login() -> InternalPacket {
    InternalPacket::ServerLogin {
        username: String::new(),
    }
}

fn encryption_response() -> InternalPacket {
    InternalPacket::EncryptionResponse {
        shared_secret: Vec::new(),
        verify_token: Vec::new(),
    }
}

fn encryption_request() -> InternalPacket {
    InternalPacket::EncryptionRequest {
        server_id: String::new(),
        public_key: Vec::new(),
        verify_token: Vec::new(),
    }
}

fn server_login_success() -> InternalPacket {
    InternalPacket::ServerLoginSuccess {
        uuid: Uuid::nil(),
        username: String::new(),
    }
}

fn set_compression() -> InternalPacket {
    InternalPacket::SetCompression { threshold: 0 }
}

fn disconnect() -> InternalPacket {
    InternalPacket::Disconnect {
        reason: String::new(),
    }
}

fn chat() -> InternalPacket {
    InternalPacket::Chat {
        message: String::new(),
    }
}

fn keep_alive() -> InternalPacket {
    InternalPacket::KeepAlive { random_id: 0 }
}

fn client_settings() -> InternalPacket {
    InternalPacket::ClientSettings {
        locale: String::new(),
        view_distance: 0,
        chat_visibility: 0,
        chat_colors: false,
        skin_parts: 0,
        main_hand: 0,
    }
}

fn boss_bar() -> InternalPacket {
    InternalPacket::BossBar {
        uuid: Uuid::nil(),
        action: 0,
    }
}

fn join_game() -> InternalPacket {
    InternalPacket::JoinGame {
        entity_id: 0,
        gamemode: 0,
        dimension: 0,
        difficulty: 0,
        max_players: 0,
        level_type: String::new(),
        reduced_debug_info: false,
    }
}

fn respawn() -> InternalPacket {
    InternalPacket::Respawn {
        dimension: 0,
        difficulty: 0,
        gamemode: 0,
        level_type: String::new(),
    }
}
