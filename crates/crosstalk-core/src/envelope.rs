//! Fixed-size slot representation of a [`Message`].
//!
//! Every envelope has the same size (header + `MAX_PAYLOAD_SIZE` inline bytes),
//! so the ring buffer is allocated once and pushing never touches the heap.

use std::fmt;

use crate::message::{check_payload, clamp_normalized, Message, MessageKind, MAX_PAYLOAD_SIZE};
use crate::midi::MidiEvent;
use crate::tags::{ControlTag, MsgTag, ParamIndex};
use crate::{Error, Result};

/// Header value for "no control".
const NO_CONTROL: i32 = -1;

/// Encoded message slot.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct Envelope {
    value: f64,
    control: i32,
    /// Parameter index, message tag or control tag, depending on `kind`.
    id: u32,
    sample_offset: u32,
    len: u16,
    kind: u8,
    midi: [u8; 3],
    payload: [u8; MAX_PAYLOAD_SIZE],
}

impl Envelope {
    /// An envelope with no valid kind. Decoding it fails with `UnknownKind(0)`.
    pub const fn empty() -> Self {
        Self {
            value: 0.0,
            control: NO_CONTROL,
            id: 0,
            sample_offset: 0,
            len: 0,
            kind: 0,
            midi: [0; 3],
            payload: [0; MAX_PAYLOAD_SIZE],
        }
    }

    /// Pack a message into a slot.
    pub fn encode(message: &Message<'_>) -> Result<Self> {
        let mut env = Self::empty();
        env.kind = message.kind() as u8;
        env.control = message.control().map_or(NO_CONTROL, |c| c.0);

        match *message {
            Message::ParameterChange { param, value, .. } => {
                env.id = param.0;
                env.value = clamp_normalized(value);
            }
            Message::ControlValue { value, .. } => {
                env.value = clamp_normalized(value);
            }
            Message::Midi(event) => {
                env.midi = event.bytes();
                env.sample_offset = event.sample_offset;
            }
            Message::Sysex {
                data,
                sample_offset,
            } => {
                env.write_payload(data)?;
                env.sample_offset = sample_offset;
            }
            Message::Arbitrary { tag, data, .. } => {
                env.write_payload(data)?;
                env.id = tag.0 as u32;
            }
            Message::BeginEdit { param } | Message::EndEdit { param } => {
                env.id = param.0;
            }
        }

        Ok(env)
    }

    /// Arbitrary message whose payload is `samples` as little-endian `f32`s.
    pub fn data_packet(tag: MsgTag, control: Option<ControlTag>, samples: &[f32]) -> Result<Self> {
        let len = samples.len() * 4;
        check_payload(len)?;

        let mut env = Self::empty();
        env.kind = MessageKind::Arbitrary as u8;
        env.control = control.map_or(NO_CONTROL, |c| c.0);
        env.id = tag.0 as u32;
        for (chunk, sample) in env.payload[..len].chunks_exact_mut(4).zip(samples) {
            chunk.copy_from_slice(&sample.to_le_bytes());
        }
        env.len = len as u16;
        Ok(env)
    }

    fn write_payload(&mut self, data: &[u8]) -> Result<()> {
        check_payload(data.len())?;
        self.payload[..data.len()].copy_from_slice(data);
        self.len = data.len() as u16;
        Ok(())
    }

    /// Unpack into a message borrowing this slot's payload.
    pub fn decode(&self) -> Result<Message<'_>> {
        let kind = MessageKind::from_u8(self.kind).ok_or(Error::UnknownKind(self.kind))?;
        let len = self.len as usize;
        if len > MAX_PAYLOAD_SIZE {
            return Err(Error::CorruptEnvelope(len));
        }
        let data = &self.payload[..len];
        let control = (self.control != NO_CONTROL).then_some(ControlTag(self.control));

        Ok(match kind {
            MessageKind::ParameterChange => Message::ParameterChange {
                param: ParamIndex(self.id),
                value: self.value,
                control,
            },
            MessageKind::Midi => Message::Midi(MidiEvent::new(
                self.sample_offset,
                self.midi[0],
                self.midi[1],
                self.midi[2],
            )),
            MessageKind::Sysex => Message::Sysex {
                data,
                sample_offset: self.sample_offset,
            },
            MessageKind::Arbitrary => Message::Arbitrary {
                tag: MsgTag(self.id as i32),
                control,
                data,
            },
            MessageKind::ControlValue => Message::ControlValue {
                control: ControlTag(self.control),
                value: self.value,
            },
            MessageKind::BeginEdit => Message::BeginEdit {
                param: ParamIndex(self.id),
            },
            MessageKind::EndEdit => Message::EndEdit {
                param: ParamIndex(self.id),
            },
        })
    }

    /// Raw kind byte, for logging envelopes that fail to decode.
    #[inline]
    pub fn raw_kind(&self) -> u8 {
        self.kind
    }

    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload[..(self.len as usize).min(MAX_PAYLOAD_SIZE)]
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for Envelope {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.control == other.control
            && self.id == other.id
            && self.sample_offset == other.sample_offset
            && self.value.to_bits() == other.value.to_bits()
            && self.midi == other.midi
            && self.payload() == other.payload()
    }
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("kind", &self.kind)
            .field("control", &self.control)
            .field("id", &self.id)
            .field("value", &self.value)
            .field("midi", &self.midi)
            .field("sample_offset", &self.sample_offset)
            .field("len", &self.len)
            .finish()
    }
}

impl TryFrom<&Message<'_>> for Envelope {
    type Error = Error;

    fn try_from(message: &Message<'_>) -> Result<Self> {
        Envelope::encode(message)
    }
}

/// Read little-endian `f32`s from `bytes` into `out`. Returns how many were written.
pub fn read_f32s(bytes: &[u8], out: &mut [f32]) -> usize {
    let mut written = 0;
    for (dst, chunk) in out.iter_mut().zip(bytes.chunks_exact(4)) {
        *dst = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        written += 1;
    }
    written
}
