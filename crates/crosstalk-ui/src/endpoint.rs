//! UI-thread side of a channel.

use std::sync::Arc;

use crosstalk_core::{
    ChannelConfig, ControlTag, Message, MessageConsumer, MessageProducer, MidiEvent, MsgTag,
    ParamIndex, QueueStats, TagMap,
};

use crate::edit::EditState;
use crate::table::DispatchTable;
use crate::{Error, Result};

/// What one UI tick did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Messages a handler accepted.
    pub delivered: usize,
    /// Parameter changes skipped because the parameter is being edited.
    pub suppressed: usize,
    /// Messages with no handler, or that no handler consumed.
    pub unhandled: usize,
    /// Malformed or wrong-direction messages.
    pub ignored: usize,
    pub more_pending: bool,
}

/// Sends user gestures to the engine and routes engine messages to widgets.
///
/// Lives on the UI thread. `tick` should run from the toolkit's idle timer or
/// vsync callback; it never blocks.
pub struct UiEndpoint {
    outbound: MessageProducer,
    inbound: MessageConsumer,
    edits: EditState,
    tags: Arc<TagMap>,
    drain_limit: usize,
}

impl UiEndpoint {
    pub fn new(
        outbound: MessageProducer,
        inbound: MessageConsumer,
        tags: Arc<TagMap>,
        config: &ChannelConfig,
    ) -> Self {
        Self {
            outbound,
            inbound,
            edits: EditState::new(tags.param_count()),
            tags,
            drain_limit: config.ui_drain_limit.max(1),
        }
    }

    fn check_param(&self, param: ParamIndex) -> Result<()> {
        if param.index() >= self.tags.param_count() {
            return Err(Error::InvalidParameter(i64::from(param.0)));
        }
        Ok(())
    }

    fn send(&mut self, message: &Message<'_>) -> Result<()> {
        self.outbound
            .push(message)
            .inspect_err(|e| tracing::debug!("UI->engine send failed: {}", e))
            .map_err(Into::into)
    }

    /// User grabbed the control for `param`. Engine echoes for it are
    /// suppressed until [`end_edit`](Self::end_edit).
    ///
    /// The editing flag is only set once the gesture is queued, so a full
    /// queue leaves both sides out of the gesture.
    pub fn begin_edit(&mut self, param: ParamIndex) -> Result<()> {
        self.check_param(param)?;
        self.send(&Message::BeginEdit { param })?;
        self.edits.begin(param);
        Ok(())
    }

    pub fn send_parameter_value(&mut self, param: ParamIndex, value: f64) -> Result<()> {
        self.check_param(param)?;
        self.send(&Message::parameter_change(param, value))
    }

    /// Send a value for the parameter bound to `control` in the tag map.
    pub fn send_control_change(&mut self, control: ControlTag, value: f64) -> Result<()> {
        let param = self
            .tags
            .param_for_control(control)
            .ok_or(Error::UnboundControl(control.0))?;
        self.send(&Message::parameter_change(param, value).with_control(control))
    }

    /// User released the control for `param`.
    ///
    /// On a full queue the flag stays set; retry so echoes resume.
    pub fn end_edit(&mut self, param: ParamIndex) -> Result<()> {
        self.check_param(param)?;
        self.send(&Message::EndEdit { param })?;
        self.edits.end(param);
        Ok(())
    }

    /// Rejects a status byte without its high bit or data bytes with it.
    pub fn send_midi(&mut self, event: MidiEvent) -> Result<()> {
        if event.status & 0x80 == 0 || event.data1 > 0x7F || event.data2 > 0x7F {
            return Err(crosstalk_core::Error::InvalidMidi {
                status: event.status,
                data1: event.data1,
                data2: event.data2,
            }
            .into());
        }
        self.send(&Message::midi(event))
    }

    /// Virtual keyboard note-on, channel 1, applied at the start of the next block.
    pub fn note_on(&mut self, note: u8, velocity: u8) -> Result<()> {
        self.send_midi(MidiEvent::note_on(0, 0, note, velocity)?)
    }

    pub fn note_off(&mut self, note: u8) -> Result<()> {
        self.send_midi(MidiEvent::note_off(0, 0, note)?)
    }

    pub fn send_sysex(&mut self, data: &[u8]) -> Result<()> {
        let message = Message::sysex(data, 0)?;
        self.send(&message)
    }

    pub fn send_message(
        &mut self,
        tag: MsgTag,
        control: Option<ControlTag>,
        data: &[u8],
    ) -> Result<()> {
        let message = Message::arbitrary(tag, control, data)?;
        self.send(&message)
    }

    /// Drain engine messages into `table`, up to the configured limit.
    pub fn tick(&mut self, table: &mut DispatchTable) -> TickReport {
        let mut report = TickReport::default();

        for _ in 0..self.drain_limit {
            let Some(envelope) = self.inbound.try_pop() else {
                return report;
            };

            let message = match envelope.decode() {
                Ok(message) => message,
                Err(e) => {
                    tracing::debug!(
                        "Ignoring envelope from engine (kind {}): {}",
                        envelope.raw_kind(),
                        e
                    );
                    report.ignored += 1;
                    continue;
                }
            };

            let handled = match message {
                Message::ParameterChange { param, value, .. } => {
                    if self.edits.is_editing(param) {
                        report.suppressed += 1;
                        continue;
                    }
                    table.param_change(param, value)
                }
                Message::ControlValue { control, value } => table.control_value(control, value),
                Message::Midi(event) => table.midi(event),
                Message::Sysex {
                    data,
                    sample_offset,
                } => table.sysex(data, sample_offset),
                Message::Arbitrary { tag, control, data } => {
                    let consumed = table.message(tag, control, data);
                    if !consumed {
                        tracing::debug!(
                            "Unhandled message tag {} ({})",
                            tag.0,
                            self.tags.message_name(tag).unwrap_or("unknown")
                        );
                    }
                    consumed
                }
                Message::BeginEdit { param } | Message::EndEdit { param } => {
                    tracing::debug!("Ignoring edit gesture for {} sent to UI", param.0);
                    report.ignored += 1;
                    continue;
                }
            };

            if handled {
                report.delivered += 1;
            } else {
                report.unhandled += 1;
            }
        }

        report.more_pending = !self.inbound.is_empty();
        report
    }

    #[inline]
    pub fn is_editing(&self, param: ParamIndex) -> bool {
        self.edits.is_editing(param)
    }

    pub fn tags(&self) -> &TagMap {
        &self.tags
    }

    pub fn outbound_stats(&self) -> Arc<QueueStats> {
        self.outbound.stats()
    }

    pub fn inbound_stats(&self) -> Arc<QueueStats> {
        self.inbound.stats()
    }
}
