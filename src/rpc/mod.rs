pub mod codec;
pub mod handler;
pub mod model;
pub mod peer;

pub use peer::PeerRuntime;
