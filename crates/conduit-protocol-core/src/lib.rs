pub mod packet;
pub mod protocol;
pub mod registry;
pub mod state;
pub mod version;

pub use packet::*;
pub use protocol::*;
pub use registry::*;
pub use state::*;
pub use version::*;
