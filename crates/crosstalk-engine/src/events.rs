//! Per-block MIDI event list.

use crosstalk_core::MidiEvent;
use smallvec::SmallVec;

/// Events one block can hold. Anything beyond is dropped, never spilled to the heap.
pub const MAX_BLOCK_EVENTS: usize = 256;

/// MIDI events for the current block, kept sorted by `sample_offset`.
///
/// Events with equal offsets keep arrival order.
#[derive(Debug, Default)]
pub struct BlockEvents {
    events: SmallVec<[MidiEvent; MAX_BLOCK_EVENTS]>,
    overflowed: u64,
}

impl BlockEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert in offset order. Returns false if the block is full.
    #[inline]
    pub fn push(&mut self, event: MidiEvent) -> bool {
        if self.events.len() >= MAX_BLOCK_EVENTS {
            self.overflowed += 1;
            return false;
        }
        let pos = self
            .events
            .partition_point(|e| e.sample_offset <= event.sample_offset);
        self.events.insert(pos, event);
        true
    }

    #[inline]
    pub fn clear(&mut self) {
        self.events.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, MidiEvent> {
        self.events.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[MidiEvent] {
        &self.events
    }

    /// Events that start in `[start, end)`.
    pub fn range(&self, start: u32, end: u32) -> &[MidiEvent] {
        let lo = self.events.partition_point(|e| e.sample_offset < start);
        let hi = self.events.partition_point(|e| e.sample_offset < end);
        &self.events[lo..hi.max(lo)]
    }

    /// Events dropped because a block was full, since creation.
    #[inline]
    pub fn overflow_count(&self) -> u64 {
        self.overflowed
    }
}

impl<'a> IntoIterator for &'a BlockEvents {
    type Item = &'a MidiEvent;
    type IntoIter = std::slice::Iter<'a, MidiEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
