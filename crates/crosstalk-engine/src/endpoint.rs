//! Audio-thread side of a channel.

use std::sync::Arc;

use crosstalk_core::{
    ChannelConfig, ControlTag, MessageConsumer, MessageProducer, MsgTag, QueueStats, Result,
    TagMap,
};

use crate::dispatch::{DrainReport, EngineDispatcher, MessageHandler};
use crate::events::BlockEvents;
use crate::params::ParameterStore;
use crate::sender::EngineSender;

/// Everything the audio thread needs: inbound drain, parameter store, outbound sender.
///
/// Typical block:
///
/// ```ignore
/// let report = endpoint.process_inbound(block_len, &mut handler);
/// for event in endpoint.events() { /* render */ }
/// endpoint.send_paced_packet(data_tag, None, &scope, block_len)?;
/// ```
pub struct EngineEndpoint {
    dispatcher: EngineDispatcher,
    sender: EngineSender,
    tags: Arc<TagMap>,
}

impl EngineEndpoint {
    pub fn new(
        inbound: MessageConsumer,
        outbound: MessageProducer,
        tags: Arc<TagMap>,
        config: &ChannelConfig,
    ) -> Self {
        let params = ParameterStore::from_tags(&tags);
        Self {
            dispatcher: EngineDispatcher::new(
                inbound,
                params,
                Arc::clone(&tags),
                config.engine_drain_limit,
                config.echo_parameter_changes,
            ),
            sender: EngineSender::new(outbound, config.packet_cadence),
            tags,
        }
    }

    /// Drain UI messages for the coming block. See [`EngineDispatcher::process`].
    pub fn process_inbound<H: MessageHandler + ?Sized>(
        &mut self,
        block_len: usize,
        handler: &mut H,
    ) -> DrainReport {
        self.dispatcher.process(block_len, handler, &mut self.sender)
    }

    #[inline]
    pub fn events(&self) -> &BlockEvents {
        self.dispatcher.events()
    }

    #[inline]
    pub fn params(&self) -> &ParameterStore {
        self.dispatcher.params()
    }

    #[inline]
    pub fn sender(&mut self) -> &mut EngineSender {
        &mut self.sender
    }

    /// Send a plot/VU packet if the configured cadence says one is due.
    pub fn send_paced_packet(
        &mut self,
        tag: MsgTag,
        control: Option<ControlTag>,
        samples: &[f32],
        block_len: usize,
    ) -> Result<bool> {
        self.sender.send_paced_packet(tag, control, samples, block_len)
    }

    pub fn tags(&self) -> &TagMap {
        &self.tags
    }

    /// Drop queued UI messages and reset packet pacing.
    pub fn reset(&mut self) {
        let discarded = self.dispatcher.clear();
        if discarded > 0 {
            tracing::debug!("Engine reset discarded {} queued messages", discarded);
        }
        self.sender.pacer_mut().reset();
    }

    pub fn inbound_stats(&self) -> Arc<QueueStats> {
        self.dispatcher.stats()
    }

    pub fn outbound_stats(&self) -> Arc<QueueStats> {
        self.sender.stats()
    }
}
