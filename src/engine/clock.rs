use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/*
Block Clock
===========

The engine wants a time estimate between blocks. It gets one from the
pipeline in the coarsest possible form:

    elapsed = sample_rate * last_block_length

Two things about this are deliberate and must stay as they are:

  1. Granularity is one block. Nothing inside a block is timed.

  2. The length is the PREVIOUS block's. The pipeline records a block's
     length only after rendering it, so while the engine advances block k
     it sees the length of block k-1 (and 0 before the first block).

Engines tune their downstream timing against exactly this formula, units
and all. Do not "correct" it here.
*/

/// Shared, lock-free block-length clock.
///
/// Clones share the same counter: the pipeline records, the engine reads.
#[derive(Debug, Clone)]
pub struct BlockClock {
    sample_rate: f64,
    last_block: Arc<AtomicUsize>,
}

impl BlockClock {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            sample_rate,
            last_block: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// `sample_rate * last_block_len()`.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.sample_rate * self.last_block_len() as f64
    }

    #[inline]
    pub fn last_block_len(&self) -> usize {
        self.last_block.load(Ordering::Relaxed)
    }

    /// Called by the pipeline after a block has been rendered.
    #[inline]
    pub fn record_block(&self, block_len: usize) {
        self.last_block.store(block_len, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_zero_before_first_block() {
        let clock = BlockClock::new(48_000.0);
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn clones_share_the_recorded_length() {
        let pipeline_side = BlockClock::new(44_100.0);
        let engine_side = pipeline_side.clone();

        pipeline_side.record_block(256);

        assert_eq!(engine_side.last_block_len(), 256);
        assert_eq!(engine_side.elapsed(), 44_100.0 * 256.0);
    }
}
