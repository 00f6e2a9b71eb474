//! Engine -> UI sending, callable from the audio thread.

use std::sync::Arc;

use crosstalk_core::{
    ControlTag, Envelope, Error, Message, MessageProducer, MidiEvent, MsgTag, ParamIndex,
    PacketCadence, QueueStats, Result,
};

use crate::pacer::PacketPacer;

/// Drops between two log lines (~one per 1024 dropped messages).
const DROP_LOG_INTERVAL: u64 = 1024;

/// Sends parameter confirmations, MIDI, control values and data packets to the UI.
///
/// Every method is wait-free and allocation-free. A full queue yields
/// `Err(Error::QueueFull)`; callers on the audio thread normally ignore it, the
/// drop is already counted in [`QueueStats`].
pub struct EngineSender {
    outbound: MessageProducer,
    pacer: PacketPacer,
    drops_since_log: u64,
}

impl EngineSender {
    pub fn new(outbound: MessageProducer, cadence: PacketCadence) -> Self {
        Self {
            outbound,
            pacer: PacketPacer::new(cadence),
            drops_since_log: 0,
        }
    }

    pub fn send_parameter_change(&mut self, param: ParamIndex, value: f64) -> Result<()> {
        self.send(&Message::parameter_change(param, value))
    }

    pub fn send_control_value(&mut self, control: ControlTag, value: f64) -> Result<()> {
        self.send(&Message::control_value(control, value))
    }

    pub fn send_midi(&mut self, event: MidiEvent) -> Result<()> {
        self.send(&Message::midi(event))
    }

    pub fn send_sysex(&mut self, data: &[u8], sample_offset: u32) -> Result<()> {
        self.send(&Message::sysex(data, sample_offset)?)
    }

    pub fn send_message(
        &mut self,
        tag: MsgTag,
        control: Option<ControlTag>,
        data: &[u8],
    ) -> Result<()> {
        self.send(&Message::arbitrary(tag, control, data)?)
    }

    /// Send `samples` as a float data packet, regardless of cadence.
    pub fn send_data_packet(
        &mut self,
        tag: MsgTag,
        control: Option<ControlTag>,
        samples: &[f32],
    ) -> Result<()> {
        let envelope = Envelope::data_packet(tag, control, samples)?;
        self.push(envelope)
    }

    /// Advance the pacer by one block and send `samples` if a packet is due.
    ///
    /// Returns `Ok(true)` if a packet was sent.
    pub fn send_paced_packet(
        &mut self,
        tag: MsgTag,
        control: Option<ControlTag>,
        samples: &[f32],
        block_len: usize,
    ) -> Result<bool> {
        if !self.pacer.tick(block_len) {
            return Ok(false);
        }
        self.send_data_packet(tag, control, samples)?;
        Ok(true)
    }

    #[inline]
    pub fn send(&mut self, message: &Message<'_>) -> Result<()> {
        let envelope = Envelope::encode(message)?;
        self.push(envelope)
    }

    #[inline]
    fn push(&mut self, envelope: Envelope) -> Result<()> {
        if self.outbound.try_push(envelope) {
            return Ok(());
        }

        self.drops_since_log += 1;
        if self.drops_since_log >= DROP_LOG_INTERVAL {
            tracing::warn!(
                "Engine->UI queue full: {} messages dropped in total",
                self.outbound.stats().dropped()
            );
            self.drops_since_log = 0;
        }
        Err(Error::QueueFull)
    }

    pub fn pacer_mut(&mut self) -> &mut PacketPacer {
        &mut self.pacer
    }

    pub fn stats(&self) -> Arc<QueueStats> {
        self.outbound.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crosstalk_core::{message_queue, read_f32s};

    #[test]
    fn test_send_parameter_change() {
        let (tx, mut rx) = message_queue(4).unwrap();
        let mut sender = EngineSender::new(tx, PacketCadence::EveryBlock);

        sender.send_parameter_change(ParamIndex(0), 0.75).unwrap();
        let env = rx.try_pop().unwrap();
        assert_eq!(
            env.decode().unwrap(),
            Message::parameter_change(ParamIndex(0), 0.75)
        );
    }

    #[test]
    fn test_full_queue_returns_queue_full() {
        let (tx, _rx) = message_queue(2).unwrap();
        let mut sender = EngineSender::new(tx, PacketCadence::EveryBlock);

        sender.send_control_value(ControlTag(0), 0.1).unwrap();
        sender.send_control_value(ControlTag(0), 0.2).unwrap();
        assert_eq!(
            sender.send_control_value(ControlTag(0), 0.3),
            Err(Error::QueueFull)
        );
        assert_eq!(sender.stats().dropped(), 1);
    }

    #[test]
    fn test_paced_packets() {
        let (tx, mut rx) = message_queue(8).unwrap();
        let mut sender = EngineSender::new(tx, PacketCadence::EveryNthBlock(2));
        let samples = [0.5f32; 4];

        assert!(!sender.send_paced_packet(MsgTag(1), None, &samples, 64).unwrap());
        assert!(sender.send_paced_packet(MsgTag(1), None, &samples, 64).unwrap());
        assert_eq!(rx.pending(), 1);

        let env = rx.try_pop().unwrap();
        let mut out = [0.0f32; 4];
        assert_eq!(read_f32s(env.payload(), &mut out), 4);
        assert_eq!(out, samples);
    }

    #[test]
    fn test_oversized_message_rejected() {
        let (tx, _rx) = message_queue(2).unwrap();
        let mut sender = EngineSender::new(tx, PacketCadence::EveryBlock);
        let data = [0u8; 2000];
        assert!(matches!(
            sender.send_message(MsgTag(0), None, &data),
            Err(Error::PayloadTooLarge { .. })
        ));
        assert_eq!(sender.stats().dropped(), 0);
    }
}
