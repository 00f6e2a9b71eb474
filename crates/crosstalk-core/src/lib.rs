//! Core of the crosstalk UI <-> audio engine channel.
//!
//! Provides the message model, the fixed-size envelope codec and the
//! lock-free single-producer/single-consumer queues both endpoints are built on.
//!
//! # Example
//!
//! ```
//! use crosstalk_core::{message_queue, Message, ParamIndex};
//!
//! let (mut tx, mut rx) = message_queue(64)?;
//! tx.push(&Message::parameter_change(ParamIndex(0), 1.7))?;
//!
//! let envelope = rx.try_pop().unwrap();
//! assert_eq!(
//!     envelope.decode()?,
//!     Message::parameter_change(ParamIndex(0), 1.0)
//! );
//! # Ok::<(), crosstalk_core::Error>(())
//! ```

pub mod config;
pub mod envelope;
pub mod error;
pub mod message;
pub mod midi;
pub mod queue;
pub mod tags;

pub use config::{ChannelConfig, PacketCadence};
pub use envelope::{read_f32s, Envelope};
pub use error::{Error, Result};
pub use message::{
    clamp_normalized, Message, MessageKind, DATA_PACKET_SIZE, MAX_PAYLOAD_SIZE,
};
pub use midi::MidiEvent;
pub use queue::{message_queue, MessageConsumer, MessageProducer, QueueStats, DEFAULT_CAPACITY};
pub use tags::{ControlSpec, ControlTag, MsgTag, ParamIndex, ParamSpec, TagMap, TagMapBuilder};
