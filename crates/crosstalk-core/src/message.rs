//! Typed messages exchanged between the UI and the audio engine.
//!
//! A [`Message`] borrows its payload, so building one never allocates. The
//! queue stores the encoded [`Envelope`](crate::Envelope) instead.

use crate::midi::MidiEvent;
use crate::tags::{ControlTag, MsgTag, ParamIndex};
use crate::{Error, Result};

/// Largest payload carried by a sysex or arbitrary message (256 `f32`s).
pub const MAX_PAYLOAD_SIZE: usize = 1024;

/// Number of floats in a plot/VU data packet.
pub const DATA_PACKET_SIZE: usize = 256;

/// Discriminant stored in the envelope header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageKind {
    ParameterChange = 1,
    Midi = 2,
    Sysex = 3,
    Arbitrary = 4,
    ControlValue = 5,
    BeginEdit = 6,
    EndEdit = 7,
}

impl MessageKind {
    pub fn from_u8(raw: u8) -> Option<Self> {
        Some(match raw {
            1 => Self::ParameterChange,
            2 => Self::Midi,
            3 => Self::Sysex,
            4 => Self::Arbitrary,
            5 => Self::ControlValue,
            6 => Self::BeginEdit,
            7 => Self::EndEdit,
            _ => return None,
        })
    }
}

/// A message travelling in either direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Message<'a> {
    /// Normalized parameter value.
    ParameterChange {
        param: ParamIndex,
        value: f64,
        control: Option<ControlTag>,
    },
    Midi(MidiEvent),
    Sysex {
        data: &'a [u8],
        sample_offset: u32,
    },
    /// Custom payload; `tag` lets the receiver tell kinds apart.
    Arbitrary {
        tag: MsgTag,
        control: Option<ControlTag>,
        data: &'a [u8],
    },
    /// Normalized value aimed at a control rather than a parameter (meters, LEDs).
    ControlValue { control: ControlTag, value: f64 },
    /// User grabbed the control for `param`.
    BeginEdit { param: ParamIndex },
    /// User released the control for `param`.
    EndEdit { param: ParamIndex },
}

/// Clamp to 0.0-1.0, mapping NaN to 0.0.
#[inline]
pub fn clamp_normalized(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[inline]
pub(crate) fn check_payload(len: usize) -> Result<()> {
    if len > MAX_PAYLOAD_SIZE {
        return Err(Error::PayloadTooLarge {
            len,
            max: MAX_PAYLOAD_SIZE,
        });
    }
    Ok(())
}

impl<'a> Message<'a> {
    pub fn parameter_change(param: ParamIndex, value: f64) -> Self {
        Message::ParameterChange {
            param,
            value: clamp_normalized(value),
            control: None,
        }
    }

    pub fn control_value(control: ControlTag, value: f64) -> Self {
        Message::ControlValue {
            control,
            value: clamp_normalized(value),
        }
    }

    pub fn midi(event: MidiEvent) -> Self {
        Message::Midi(event)
    }

    pub fn sysex(data: &'a [u8], sample_offset: u32) -> Result<Self> {
        check_payload(data.len())?;
        Ok(Message::Sysex {
            data,
            sample_offset,
        })
    }

    pub fn arbitrary(tag: MsgTag, control: Option<ControlTag>, data: &'a [u8]) -> Result<Self> {
        check_payload(data.len())?;
        Ok(Message::Arbitrary { tag, control, data })
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            Message::ParameterChange { .. } => MessageKind::ParameterChange,
            Message::Midi(_) => MessageKind::Midi,
            Message::Sysex { .. } => MessageKind::Sysex,
            Message::Arbitrary { .. } => MessageKind::Arbitrary,
            Message::ControlValue { .. } => MessageKind::ControlValue,
            Message::BeginEdit { .. } => MessageKind::BeginEdit,
            Message::EndEdit { .. } => MessageKind::EndEdit,
        }
    }

    /// Originating or target control, if the message carries one.
    pub fn control(&self) -> Option<ControlTag> {
        match *self {
            Message::ParameterChange { control, .. } | Message::Arbitrary { control, .. } => {
                control
            }
            Message::ControlValue { control, .. } => Some(control),
            _ => None,
        }
    }

    /// Attach the originating control to a parameter change or arbitrary message.
    pub fn with_control(self, tag: ControlTag) -> Self {
        match self {
            Message::ParameterChange { param, value, .. } => Message::ParameterChange {
                param,
                value,
                control: Some(tag),
            },
            Message::Arbitrary { tag: msg_tag, data, .. } => Message::Arbitrary {
                tag: msg_tag,
                control: Some(tag),
                data,
            },
            other => other,
        }
    }
}
