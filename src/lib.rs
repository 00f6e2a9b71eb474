//! # Crosstalk - UI <-> audio engine messaging
//!
//! Bidirectional, lock-free channel between a plugin's editor and its
//! real-time audio engine.
//!
//! ## Architecture
//!
//! Crosstalk is an umbrella crate over:
//! - **crosstalk-core** - message model, fixed-size envelopes, SPSC queues, tag map, config
//! - **crosstalk-engine** - audio-thread drain, parameter store, block MIDI list, sender, pacer
//! - **crosstalk-ui** - UI-thread endpoint, dispatch table, echo suppression, plot buffer
//!
//! Each direction is one single-producer/single-consumer ring. Sending never
//! blocks or allocates; a full ring drops the message and counts it.
//!
//! ## Quick Start
//!
//! ```
//! use crosstalk::prelude::*;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let tags = TagMap::builder().param("gain", 0.5).build()?;
//! let (mut ui, mut engine) = ChannelBuilder::new().tags(tags).build()?;
//!
//! // UI thread: user moves the slider
//! ui.send_parameter_value(ParamIndex(0), 0.75)?;
//!
//! // Audio thread: apply and echo
//! engine.process_inbound(256, &mut ());
//! assert_eq!(engine.params().get(ParamIndex(0)), Some(0.75));
//!
//! // UI thread: idle tick updates the slider
//! let slider = Rc::new(Cell::new(0.0));
//! let mut table = DispatchTable::new();
//! let s = Rc::clone(&slider);
//! table.on_param_change(move |_, value| s.set(value));
//! ui.tick(&mut table);
//! assert_eq!(slider.get(), 0.75);
//! # Ok::<(), crosstalk::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `webview` - JSON command bridge for web-based editors

/// Re-export of crosstalk-core for direct access
pub use crosstalk_core as core;

/// Audio-thread side
pub use crosstalk_engine as engine;

/// UI-thread side
pub use crosstalk_ui as ui;

pub use crosstalk_core::{
    ChannelConfig, ControlTag, Envelope, Message, MessageKind, MidiEvent, MsgTag, PacketCadence,
    ParamIndex, TagMap, DATA_PACKET_SIZE, MAX_PAYLOAD_SIZE,
};
pub use crosstalk_engine::{DrainReport, EngineEndpoint, MessageHandler};
pub use crosstalk_ui::{DispatchTable, PlotBuffer, TickReport, UiEndpoint};

mod builder;
mod error;

pub use builder::ChannelBuilder;
pub use error::{Error, Result};

/// Build a channel with default settings for `tags`.
pub fn channel(tags: TagMap) -> Result<(UiEndpoint, EngineEndpoint)> {
    ChannelBuilder::new().tags(tags).build()
}

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{channel, ChannelBuilder};

    pub use crate::core::{
        ChannelConfig, ControlTag, Message, MidiEvent, MsgTag, PacketCadence, ParamIndex, TagMap,
        DATA_PACKET_SIZE,
    };

    // Audio thread
    pub use crate::engine::{DrainReport, EngineEndpoint, MessageHandler};

    // UI thread
    pub use crate::ui::{DispatchTable, PlotBuffer, TickReport, UiEndpoint};
}
