//! Float buffer fed by engine data packets (scopes, VU meters, waveform plots).

use crosstalk_core::{read_f32s, DATA_PACKET_SIZE};

#[derive(Debug, Clone)]
pub struct PlotBuffer {
    samples: Vec<f32>,
    revision: u64,
}

impl PlotBuffer {
    pub fn new(len: usize) -> Self {
        Self {
            samples: vec![0.0; len],
            revision: 0,
        }
    }

    /// Overwrite from a little-endian `f32` payload. Returns the number of values read.
    ///
    /// Values past the end of the payload keep their previous contents.
    pub fn update_from_bytes(&mut self, payload: &[u8]) -> usize {
        let read = read_f32s(payload, &mut self.samples);
        self.revision += 1;
        read
    }

    pub fn update(&mut self, samples: &[f32]) {
        let n = samples.len().min(self.samples.len());
        self.samples[..n].copy_from_slice(&samples[..n]);
        self.revision += 1;
    }

    #[inline]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Bumped on every update; compare against a stored value to know when to redraw.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
    }
}

impl Default for PlotBuffer {
    fn default() -> Self {
        Self::new(DATA_PACKET_SIZE)
    }
}
