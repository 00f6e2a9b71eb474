//! Builder for a UI <-> engine channel pair.

use std::sync::Arc;

use crosstalk_core::{message_queue, ChannelConfig, PacketCadence, TagMap};
use crosstalk_engine::EngineEndpoint;
use crosstalk_ui::UiEndpoint;

use crate::Result;

/// Creates both queues and hands back the two endpoints.
///
/// The UI endpoint stays on the UI thread; the engine endpoint moves to the
/// audio thread. Both are `Send`.
///
/// # Example
///
/// ```
/// use crosstalk::prelude::*;
///
/// let tags = TagMap::builder()
///     .param("gain", 0.5)
///     .message("data")
///     .build()?;
///
/// let (mut ui, mut engine) = ChannelBuilder::new()
///     .tags(tags)
///     .packet_cadence(PacketCadence::EveryNthBlock(4))
///     .build()?;
///
/// ui.send_parameter_value(ParamIndex(0), 0.75)?;
/// let report = engine.process_inbound(512, &mut ());
/// assert_eq!(report.parameters, 1);
/// # Ok::<(), crosstalk::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChannelBuilder {
    config: ChannelConfig,
    tags: TagMap,
}

impl ChannelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration (e.g. one loaded from a preset file).
    pub fn config(mut self, config: ChannelConfig) -> Self {
        self.config = config;
        self
    }

    pub fn tags(mut self, tags: TagMap) -> Self {
        self.tags = tags;
        self
    }

    /// Default: 128. Must be a power of two.
    pub fn ui_to_engine_capacity(mut self, capacity: usize) -> Self {
        self.config.ui_to_engine_capacity = capacity;
        self
    }

    /// Default: 128. Must be a power of two.
    pub fn engine_to_ui_capacity(mut self, capacity: usize) -> Self {
        self.config.engine_to_ui_capacity = capacity;
        self
    }

    /// Max UI messages handled per audio block. Default: 64
    pub fn engine_drain_limit(mut self, limit: usize) -> Self {
        self.config.engine_drain_limit = limit;
        self
    }

    /// Max engine messages handled per UI tick. Default: 256
    pub fn ui_drain_limit(mut self, limit: usize) -> Self {
        self.config.ui_drain_limit = limit;
        self
    }

    pub fn packet_cadence(mut self, cadence: PacketCadence) -> Self {
        self.config.packet_cadence = cadence;
        self
    }

    /// Default: true
    pub fn echo_parameter_changes(mut self, echo: bool) -> Self {
        self.config.echo_parameter_changes = echo;
        self
    }

    pub fn build(self) -> Result<(UiEndpoint, EngineEndpoint)> {
        self.config.validate()?;
        self.tags.validate()?;

        let (ui_tx, engine_rx) = message_queue(self.config.ui_to_engine_capacity)?;
        let (engine_tx, ui_rx) = message_queue(self.config.engine_to_ui_capacity)?;

        tracing::debug!(
            "Channel created: {} params, capacities {}/{}, cadence {:?}",
            self.tags.param_count(),
            self.config.ui_to_engine_capacity,
            self.config.engine_to_ui_capacity,
            self.config.packet_cadence
        );

        let tags = Arc::new(self.tags);
        let ui = UiEndpoint::new(ui_tx, ui_rx, Arc::clone(&tags), &self.config);
        let engine = EngineEndpoint::new(engine_rx, engine_tx, tags, &self.config);
        Ok((ui, engine))
    }
}
