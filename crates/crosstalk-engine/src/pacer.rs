//! Decides which blocks carry a plot/VU data packet.

use crosstalk_core::PacketCadence;

#[derive(Debug, Clone)]
pub struct PacketPacer {
    cadence: PacketCadence,
    blocks: u32,
    samples: u64,
}

impl PacketPacer {
    pub fn new(cadence: PacketCadence) -> Self {
        Self {
            cadence,
            blocks: 0,
            samples: 0,
        }
    }

    #[inline]
    pub fn cadence(&self) -> PacketCadence {
        self.cadence
    }

    /// Advance by one block of `block_len` samples. True if a packet is due.
    #[inline]
    pub fn tick(&mut self, block_len: usize) -> bool {
        match self.cadence {
            PacketCadence::EveryBlock => true,
            PacketCadence::Disabled => false,
            PacketCadence::EveryNthBlock(n) => {
                self.blocks += 1;
                if self.blocks >= n.max(1) {
                    self.blocks = 0;
                    true
                } else {
                    false
                }
            }
            PacketCadence::SampleInterval(interval) => {
                let interval = u64::from(interval.max(1));
                self.samples += block_len as u64;
                if self.samples >= interval {
                    // Keep the remainder so the long-run rate stays exact.
                    self.samples %= interval;
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn reset(&mut self) {
        self.blocks = 0;
        self.samples = 0;
    }
}
