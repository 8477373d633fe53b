pub mod bootstrap;
pub mod packet;
pub mod versions;

pub use bootstrap::bootstrap;
pub use packet::{kind, InternalPacket};
pub use versions::*;
