//! Handler registry for engine -> UI messages.
//!
//! The UI layer registers one closure per message kind (and one per custom
//! message tag) at startup. Handlers run on the UI thread only, so they may
//! capture non-`Send` widget state.

use std::collections::HashMap;
use std::fmt;

use crosstalk_core::{ControlTag, MidiEvent, MsgTag, ParamIndex};

type ParamHandler = Box<dyn FnMut(ParamIndex, f64)>;
type ControlHandler = Box<dyn FnMut(ControlTag, f64)>;
type MidiHandler = Box<dyn FnMut(MidiEvent)>;
type SysexHandler = Box<dyn FnMut(&[u8], u32)>;
type MessageHandler = Box<dyn FnMut(Option<ControlTag>, &[u8]) -> bool>;
type FallbackHandler = Box<dyn FnMut(MsgTag, Option<ControlTag>, &[u8]) -> bool>;

/// Maps message kinds and tags to UI callbacks.
///
/// # Example
///
/// ```
/// use crosstalk_ui::DispatchTable;
/// use crosstalk_core::MsgTag;
///
/// let mut table = DispatchTable::new();
/// table
///     .on_param_change(|param, value| println!("param {} -> {value}", param.0))
///     .on_midi(|event| println!("MIDI received in UI: {:?}", event.bytes()))
///     .on_message(MsgTag(1), |_control, data| !data.is_empty());
/// ```
#[derive(Default)]
pub struct DispatchTable {
    param: Option<ParamHandler>,
    control: Option<ControlHandler>,
    midi: Option<MidiHandler>,
    sysex: Option<SysexHandler>,
    messages: HashMap<MsgTag, MessageHandler>,
    fallback: Option<FallbackHandler>,
}

impl DispatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameter value changed outside the UI (engine echo, host automation).
    pub fn on_param_change(&mut self, f: impl FnMut(ParamIndex, f64) + 'static) -> &mut Self {
        self.param = Some(Box::new(f));
        self
    }

    pub fn on_control_value(&mut self, f: impl FnMut(ControlTag, f64) + 'static) -> &mut Self {
        self.control = Some(Box::new(f));
        self
    }

    pub fn on_midi(&mut self, f: impl FnMut(MidiEvent) + 'static) -> &mut Self {
        self.midi = Some(Box::new(f));
        self
    }

    pub fn on_sysex(&mut self, f: impl FnMut(&[u8], u32) + 'static) -> &mut Self {
        self.sysex = Some(Box::new(f));
        self
    }

    /// Handler for arbitrary messages tagged `tag`. Return true if consumed.
    pub fn on_message(
        &mut self,
        tag: MsgTag,
        f: impl FnMut(Option<ControlTag>, &[u8]) -> bool + 'static,
    ) -> &mut Self {
        self.messages.insert(tag, Box::new(f));
        self
    }

    /// Handler for arbitrary messages with no tag-specific handler.
    pub fn on_any_message(
        &mut self,
        f: impl FnMut(MsgTag, Option<ControlTag>, &[u8]) -> bool + 'static,
    ) -> &mut Self {
        self.fallback = Some(Box::new(f));
        self
    }

    pub(crate) fn param_change(&mut self, param: ParamIndex, value: f64) -> bool {
        self.param.as_mut().map(|f| f(param, value)).is_some()
    }

    pub(crate) fn control_value(&mut self, control: ControlTag, value: f64) -> bool {
        self.control.as_mut().map(|f| f(control, value)).is_some()
    }

    pub(crate) fn midi(&mut self, event: MidiEvent) -> bool {
        self.midi.as_mut().map(|f| f(event)).is_some()
    }

    pub(crate) fn sysex(&mut self, data: &[u8], sample_offset: u32) -> bool {
        self.sysex.as_mut().map(|f| f(data, sample_offset)).is_some()
    }

    /// Tag handler first, then the fallback. False if neither consumed it.
    pub(crate) fn message(
        &mut self,
        tag: MsgTag,
        control: Option<ControlTag>,
        data: &[u8],
    ) -> bool {
        if let Some(f) = self.messages.get_mut(&tag) {
            if f(control, data) {
                return true;
            }
        }
        self.fallback.as_mut().is_some_and(|f| f(tag, control, data))
    }
}

impl fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchTable")
            .field("param", &self.param.is_some())
            .field("control", &self.control.is_some())
            .field("midi", &self.midi.is_some())
            .field("sysex", &self.sysex.is_some())
            .field("messages", &self.messages.keys().collect::<Vec<_>>())
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}
