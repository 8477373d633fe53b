use conduit_protocol_core::{Packet, PacketKind};
use uuid::Uuid;

/// Kind tags for every packet in the catalogue. These are the stable keys
/// the registry indexes by; raw numeric ids vary per version, these never
/// do.
pub mod kind {
    use conduit_protocol_core::PacketKind;

    pub const HANDSHAKE: PacketKind = PacketKind("handshake");
    pub const STATUS_REQUEST: PacketKind = PacketKind("status_request");
    pub const STATUS_PING: PacketKind = PacketKind("status_ping");
    pub const STATUS_RESPONSE: PacketKind = PacketKind("status_response");
    pub const SERVER_LOGIN: PacketKind = PacketKind("server_login");
    pub const ENCRYPTION_RESPONSE: PacketKind = PacketKind("encryption_response");
    pub const ENCRYPTION_REQUEST: PacketKind = PacketKind("encryption_request");
    pub const SERVER_LOGIN_SUCCESS: PacketKind = PacketKind("server_login_success");
    pub const SET_COMPRESSION: PacketKind = PacketKind("set_compression");
    pub const DISCONNECT: PacketKind = PacketKind("disconnect");
    pub const CHAT: PacketKind = PacketKind("chat");
    pub const KEEP_ALIVE: PacketKind = PacketKind("keep_alive");
    pub const CLIENT_SETTINGS: PacketKind = PacketKind("client_settings");
    pub const BOSS_BAR: PacketKind = PacketKind("boss_bar");
    pub const JOIN_GAME: PacketKind = PacketKind("join_game");
    pub const RESPAWN: PacketKind = PacketKind("respawn");
}

/// Version-independent internal packet representation for the 1.11–1.12.2
/// protocol family. The wire pipeline fills these in after the registry has
/// resolved the raw id; field codecs live there, not here.
#[derive(Debug, Clone, PartialEq)]
pub enum InternalPacket {
    // === Handshake (serverbound) ===
    Handshake {
        protocol_version: i32,
        server_address: String,
        server_port: u16,
        next_state: i32,
    },

    // === Status ===
    StatusRequest,
    StatusPing {
        payload: i64,
    },
    StatusResponse {
        status: String,
    },

    // === Login (serverbound) ===
    ServerLogin {
        username: String,
    },
    EncryptionResponse {
        shared_secret: Vec<u8>,
        verify_token: Vec<u8>,
    },

    // === Login (clientbound) ===
    EncryptionRequest {
        server_id: String,
        public_key: Vec<u8>,
        verify_token: Vec<u8>,
    },
    ServerLoginSuccess {
        uuid: Uuid,
        username: String,
    },
    SetCompression {
        threshold: i32,
    },

    // === Play ===
    Chat {
        message: String,
    },
    KeepAlive {
        random_id: i64,
    },
    ClientSettings {
        locale: String,
        view_distance: i8,
        chat_visibility: i32,
        chat_colors: bool,
        skin_parts: u8,
        main_hand: i32,
    },
    BossBar {
        uuid: Uuid,
        action: i32,
    },
    JoinGame {
        entity_id: i32,
        gamemode: u8,
        dimension: i32,
        difficulty: u8,
        max_players: u8,
        level_type: String,
        reduced_debug_info: bool,
    },
    Respawn {
        dimension: i32,
        difficulty: u8,
        gamemode: u8,
        level_type: String,
    },

    // === Shared ===
    Disconnect {
        reason: String,
    },
}

impl Packet for InternalPacket {
    fn kind(&self) -> PacketKind {
        match self {
            InternalPacket::Handshake { .. } => kind::HANDSHAKE,
            InternalPacket::StatusRequest => kind::STATUS_REQUEST,
            InternalPacket::StatusPing { .. } => kind::STATUS_PING,
            InternalPacket::StatusResponse { .. } => kind::STATUS_RESPONSE,
            InternalPacket::ServerLogin { .. } => kind::SERVER_LOGIN,
            InternalPacket::EncryptionResponse { .. } => kind::ENCRYPTION_RESPONSE,
            InternalPacket::EncryptionRequest { .. } => kind::ENCRYPTION_REQUEST,
            InternalPacket::ServerLoginSuccess { .. } => kind::SERVER_LOGIN_SUCCESS,
            InternalPacket::SetCompression { .. } => kind::SET_COMPRESSION,
            InternalPacket::Chat { .. } => kind::CHAT,
            InternalPacket::KeepAlive { .. } => kind::KEEP_ALIVE,
            InternalPacket::ClientSettings { .. } => kind::CLIENT_SETTINGS,
            InternalPacket::BossBar { .. } => kind::BOSS_BAR,
            InternalPacket::JoinGame { .. } => kind::JOIN_GAME,
            InternalPacket::Respawn { .. } => kind::RESPAWN,
            InternalPacket::Disconnect { .. } => kind::DISCONNECT,
        }
    }
}
