//! Short MIDI events with sample-accurate timing.

use midi_msg::{Channel, ChannelVoiceMsg, MidiMsg};

use crate::{Error, Result};

pub const NOTE_OFF: u8 = 0x80;
pub const NOTE_ON: u8 = 0x90;
pub const CONTROL_CHANGE: u8 = 0xB0;

/// Three-byte MIDI message with a frame offset into the current block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MidiEvent {
    /// Offset within the current buffer (0 = first sample).
    pub sample_offset: u32,
    pub status: u8,
    pub data1: u8,
    pub data2: u8,
}

impl MidiEvent {
    #[inline]
    pub fn new(sample_offset: u32, status: u8, data1: u8, data2: u8) -> Self {
        Self {
            sample_offset,
            status,
            data1,
            data2,
        }
    }

    /// Note-on. Rejects note or velocity above 127.
    pub fn note_on(sample_offset: u32, channel: u8, note: u8, velocity: u8) -> Result<Self> {
        Self::checked(sample_offset, NOTE_ON | (channel & 0x0F), note, velocity)
    }

    pub fn note_off(sample_offset: u32, channel: u8, note: u8) -> Result<Self> {
        Self::checked(sample_offset, NOTE_OFF | (channel & 0x0F), note, 0)
    }

    pub fn control_change(sample_offset: u32, channel: u8, cc: u8, value: u8) -> Result<Self> {
        Self::checked(sample_offset, CONTROL_CHANGE | (channel & 0x0F), cc, value)
    }

    fn checked(sample_offset: u32, status: u8, data1: u8, data2: u8) -> Result<Self> {
        if data1 > 0x7F || data2 > 0x7F {
            return Err(Error::InvalidMidi {
                status,
                data1,
                data2,
            });
        }
        Ok(Self::new(sample_offset, status, data1, data2))
    }

    /// Status nibble (0x80, 0x90, ...).
    #[inline]
    pub fn kind(&self) -> u8 {
        self.status & 0xF0
    }

    #[inline]
    pub fn channel(&self) -> u8 {
        self.status & 0x0F
    }

    #[inline]
    pub fn is_note_on(&self) -> bool {
        self.kind() == NOTE_ON && self.data2 > 0
    }

    #[inline]
    pub fn is_note_off(&self) -> bool {
        self.kind() == NOTE_OFF || (self.kind() == NOTE_ON && self.data2 == 0)
    }

    #[inline]
    pub fn note(&self) -> Option<u8> {
        match self.kind() {
            NOTE_ON | NOTE_OFF | 0xA0 => Some(self.data1),
            _ => None,
        }
    }

    #[inline]
    pub fn bytes(&self) -> [u8; 3] {
        [self.status, self.data1, self.data2]
    }

    /// Parse into a typed channel-voice message.
    pub fn to_channel_voice(&self) -> Result<(Channel, ChannelVoiceMsg)> {
        let invalid = || Error::InvalidMidi {
            status: self.status,
            data1: self.data1,
            data2: self.data2,
        };
        let bytes = self.bytes();
        let len = match self.kind() {
            0xC0 | 0xD0 => 2,
            _ => 3,
        };
        let (msg, _len) = MidiMsg::from_midi(&bytes[..len]).map_err(|_| invalid())?;
        match msg {
            MidiMsg::ChannelVoice { channel, msg } => Ok((channel, msg)),
            _ => Err(invalid()),
        }
    }
}
