//! Audio-thread endpoint of the crosstalk channel.
//!
//! Everything here runs on the real-time thread: draining is bounded per
//! block, sending never blocks, and nothing allocates after construction.
//!
//! - [`EngineDispatcher`] - drains UI messages into the parameter store, the
//!   block's MIDI list, and a [`MessageHandler`]
//! - [`EngineSender`] - parameter echoes, control values, MIDI, data packets
//! - [`PacketPacer`] - configurable cadence for plot/VU packets
//! - [`EngineEndpoint`] - all of the above behind one handle

pub mod dispatch;
pub mod endpoint;
pub mod events;
pub mod pacer;
pub mod params;
pub mod sender;

pub use dispatch::{DrainReport, EngineDispatcher, MessageHandler};
pub use endpoint::EngineEndpoint;
pub use events::{BlockEvents, MAX_BLOCK_EVENTS};
pub use pacer::PacketPacer;
pub use params::ParameterStore;
pub use sender::EngineSender;
