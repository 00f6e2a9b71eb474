//! Audio-thread drain of the UI -> engine queue.

use std::sync::Arc;

use crosstalk_core::{
    ControlTag, Message, MessageConsumer, MidiEvent, MsgTag, ParamIndex, QueueStats, TagMap,
};

use crate::events::BlockEvents;
use crate::params::ParameterStore;
use crate::sender::EngineSender;

/// Receives the messages the dispatcher does not handle itself.
///
/// Called on the audio thread; implementations must not block or allocate.
pub trait MessageHandler {
    /// Arbitrary data from the UI.
    fn on_message(&mut self, _tag: MsgTag, _control: Option<ControlTag>, _data: &[u8]) {}

    fn on_sysex(&mut self, _data: &[u8], _sample_offset: u32) {}

    /// Edit gesture on `param` started (`true`) or ended (`false`).
    fn on_edit(&mut self, _param: ParamIndex, _begin: bool) {}

    /// A parameter value was applied to the store.
    fn on_parameter_applied(&mut self, _param: ParamIndex, _value: f64) {}
}

impl MessageHandler for () {}

/// What one drain did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DrainReport {
    pub parameters: usize,
    pub midi: usize,
    pub forwarded: usize,
    /// Malformed, undeclared, out-of-range or wrong-direction messages.
    pub ignored: usize,
    /// True if the drain limit was hit with messages still queued.
    pub more_pending: bool,
}

impl DrainReport {
    pub fn total(&self) -> usize {
        self.parameters + self.midi + self.forwarded + self.ignored
    }
}

/// Drains the inbound queue once per processing block.
pub struct EngineDispatcher {
    inbound: MessageConsumer,
    params: ParameterStore,
    tags: Arc<TagMap>,
    events: BlockEvents,
    drain_limit: usize,
    echo: bool,
}

impl EngineDispatcher {
    pub fn new(
        inbound: MessageConsumer,
        params: ParameterStore,
        tags: Arc<TagMap>,
        drain_limit: usize,
        echo: bool,
    ) -> Self {
        Self {
            inbound,
            params,
            tags,
            events: BlockEvents::new(),
            drain_limit: drain_limit.max(1),
            echo,
        }
    }

    /// Handle up to `drain_limit` messages for a block of `block_len` samples.
    ///
    /// Clears the previous block's events first. MIDI offsets past the block
    /// are clamped to its last sample. Applied parameter changes are echoed
    /// through `outbound` when echo is enabled. Arbitrary messages whose tag
    /// the tag map does not declare are ignored.
    pub fn process<H: MessageHandler + ?Sized>(
        &mut self,
        block_len: usize,
        handler: &mut H,
        outbound: &mut EngineSender,
    ) -> DrainReport {
        self.events.clear();
        let last_sample = block_len.saturating_sub(1).min(u32::MAX as usize) as u32;
        let mut report = DrainReport::default();

        for _ in 0..self.drain_limit {
            let Some(envelope) = self.inbound.try_pop() else {
                return report;
            };

            let message = match envelope.decode() {
                Ok(message) => message,
                Err(e) => {
                    tracing::debug!(
                        "Ignoring inbound envelope (kind {}): {}",
                        envelope.raw_kind(),
                        e
                    );
                    report.ignored += 1;
                    continue;
                }
            };

            match message {
                Message::ParameterChange { param, value, .. } => {
                    match self.params.set(param, value) {
                        Some(applied) => {
                            handler.on_parameter_applied(param, applied);
                            if self.echo {
                                // Drop is counted by the sender.
                                let _ = outbound.send_parameter_change(param, applied);
                            }
                            report.parameters += 1;
                        }
                        None => {
                            tracing::debug!("Ignoring change to unknown parameter {}", param.0);
                            report.ignored += 1;
                        }
                    }
                }
                Message::Midi(event) => {
                    let event = MidiEvent {
                        sample_offset: event.sample_offset.min(last_sample),
                        ..event
                    };
                    if self.events.push(event) {
                        report.midi += 1;
                    } else {
                        report.ignored += 1;
                    }
                }
                Message::Sysex {
                    data,
                    sample_offset,
                } => {
                    handler.on_sysex(data, sample_offset.min(last_sample));
                    report.forwarded += 1;
                }
                Message::Arbitrary { tag, .. } if self.tags.message_name(tag).is_none() => {
                    tracing::debug!("Ignoring undeclared message tag {}", tag.0);
                    report.ignored += 1;
                }
                Message::Arbitrary { tag, control, data } => {
                    handler.on_message(tag, control, data);
                    report.forwarded += 1;
                }
                Message::BeginEdit { param } | Message::EndEdit { param }
                    if !self.params.contains(param) =>
                {
                    tracing::debug!("Ignoring edit gesture on unknown parameter {}", param.0);
                    report.ignored += 1;
                }
                Message::BeginEdit { param } => {
                    handler.on_edit(param, true);
                    report.forwarded += 1;
                }
                Message::EndEdit { param } => {
                    handler.on_edit(param, false);
                    report.forwarded += 1;
                }
                Message::ControlValue { control, .. } => {
                    tracing::debug!("Ignoring control value for {} sent to engine", control.0);
                    report.ignored += 1;
                }
            }
        }

        report.more_pending = !self.inbound.is_empty();
        report
    }

    /// MIDI events collected by the last [`process`](Self::process) call.
    #[inline]
    pub fn events(&self) -> &BlockEvents {
        &self.events
    }

    #[inline]
    pub fn params(&self) -> &ParameterStore {
        &self.params
    }

    pub fn set_echo(&mut self, echo: bool) {
        self.echo = echo;
    }

    /// Discard queued messages, e.g. on transport reset.
    pub fn clear(&mut self) -> usize {
        self.events.clear();
        self.inbound.clear()
    }

    pub fn stats(&self) -> Arc<QueueStats> {
        self.inbound.stats()
    }
}
