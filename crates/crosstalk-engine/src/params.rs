//! Lock-free store of normalized parameter values.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use atomic_float::AtomicF64;
use crosstalk_core::{clamp_normalized, ParamIndex, TagMap};

/// Normalized values written by the audio thread, readable from anywhere.
///
/// Cloning is cheap - the values live behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ParameterStore {
    values: Arc<[AtomicF64]>,
}

impl ParameterStore {
    /// One slot per parameter, initialised to `0.0`.
    pub fn new(count: usize) -> Self {
        Self {
            values: (0..count).map(|_| AtomicF64::new(0.0)).collect(),
        }
    }

    /// One slot per parameter in `tags`, initialised to its default.
    pub fn from_tags(tags: &TagMap) -> Self {
        Self {
            values: tags
                .defaults()
                .map(|v| AtomicF64::new(clamp_normalized(v)))
                .collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn contains(&self, param: ParamIndex) -> bool {
        param.index() < self.values.len()
    }

    #[inline]
    pub fn get(&self, param: ParamIndex) -> Option<f64> {
        self.values
            .get(param.index())
            .map(|v| v.load(Ordering::Acquire))
    }

    /// Store a clamped value. Returns it, or `None` for an unknown parameter.
    #[inline]
    pub fn set(&self, param: ParamIndex, value: f64) -> Option<f64> {
        let slot = self.values.get(param.index())?;
        let value = clamp_normalized(value);
        slot.store(value, Ordering::Release);
        Some(value)
    }

    /// Copy all values into `out`. Returns how many were copied.
    pub fn snapshot_into(&self, out: &mut [f64]) -> usize {
        let mut copied = 0;
        for (dst, src) in out.iter_mut().zip(self.values.iter()) {
            *dst = src.load(Ordering::Acquire);
            copied += 1;
        }
        copied
    }
}
