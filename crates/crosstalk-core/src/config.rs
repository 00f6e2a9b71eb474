//! Channel configuration.

use serde::{Deserialize, Serialize};

use crate::queue::DEFAULT_CAPACITY;
use crate::{Error, Result};

/// How often the engine sends plot/VU data packets to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacketCadence {
    /// One packet per processing block.
    #[default]
    EveryBlock,
    /// One packet every `n` blocks.
    EveryNthBlock(u32),
    /// One packet each time at least this many samples have been processed.
    SampleInterval(u32),
    /// Never send packets.
    Disabled,
}

/// Configuration for both directions of a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub ui_to_engine_capacity: usize,
    pub engine_to_ui_capacity: usize,
    /// Max messages the engine handles per block.
    pub engine_drain_limit: usize,
    /// Max messages the UI handles per tick.
    pub ui_drain_limit: usize,
    pub packet_cadence: PacketCadence,
    /// Engine echoes applied parameter changes back to the UI.
    pub echo_parameter_changes: bool,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            ui_to_engine_capacity: DEFAULT_CAPACITY,
            engine_to_ui_capacity: DEFAULT_CAPACITY,
            engine_drain_limit: 64,
            ui_drain_limit: 256,
            packet_cadence: PacketCadence::EveryBlock,
            echo_parameter_changes: true,
        }
    }
}

impl ChannelConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, capacity) in [
            ("ui_to_engine_capacity", self.ui_to_engine_capacity),
            ("engine_to_ui_capacity", self.engine_to_ui_capacity),
        ] {
            if capacity < 2 || !capacity.is_power_of_two() {
                return Err(Error::InvalidConfig(format!(
                    "{name} {capacity} must be a power of two >= 2"
                )));
            }
        }
        if self.engine_drain_limit == 0 || self.ui_drain_limit == 0 {
            return Err(Error::InvalidConfig(
                "drain limits must be at least 1".to_string(),
            ));
        }
        match self.packet_cadence {
            PacketCadence::EveryNthBlock(0) | PacketCadence::SampleInterval(0) => Err(
                Error::InvalidConfig("packet cadence interval must be non-zero".to_string()),
            ),
            _ => Ok(()),
        }
    }
}
