//! Per-voice output buffers owned by the render pipeline.
//!
//! # Pattern
//!
//! 1. Allocate once at configuration with a capacity (non-realtime)
//! 2. Grow with [`VoiceBufferPool::ensure_capacity`] when the host announces
//!    a larger block; smaller or equal requests are a no-op
//! 3. Hand the engine a [`VoiceBlock`] view trimmed to the current block
//! 4. Rebuild from scratch with [`VoiceBufferPool::reconfigure_voice_count`]
//!    when the voice count changes
//!
//! # Layout
//!
//! All voices live in one flat arena. Voice `v` occupies
//! `samples[v * capacity .. (v + 1) * capacity]`, so every voice has the
//! same length by construction and one allocation serves the whole pool.
//!
//! # Real-Time Safety
//!
//! - [`VoiceBufferPool::block`] and the [`VoiceBlock`] accessors never allocate
//! - `ensure_capacity` allocates only when the block grows past capacity
//! - Allocation goes through `try_reserve_exact`, so an exhausted allocator
//!   surfaces as [`AllocationFailure`] instead of aborting the audio thread

use crate::error::AllocationFailure;

pub struct VoiceBufferPool {
    samples: Vec<f32>,
    voice_count: usize,
    capacity: usize,
}

impl VoiceBufferPool {
    /// Allocate `voice_count` zeroed buffers of `capacity` samples each.
    pub fn new(voice_count: usize, capacity: usize) -> Result<Self, AllocationFailure> {
        Ok(Self {
            samples: allocate_zeroed(voice_count, capacity)?,
            voice_count,
            capacity,
        })
    }

    /// An empty pool with no voices, used once the pipeline is torn down.
    pub fn empty() -> Self {
        Self {
            samples: Vec::new(),
            voice_count: 0,
            capacity: 0,
        }
    }

    /// Number of voice buffers.
    #[inline]
    pub fn voice_count(&self) -> usize {
        self.voice_count
    }

    /// Length of every voice buffer, in samples.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Grow every buffer to at least `block_len` samples.
    ///
    /// Returns `Ok(true)` when the pool grew. Requests at or below the current
    /// capacity return `Ok(false)` without touching the buffers. Existing
    /// samples are kept and the grown tail of each voice is zeroed.
    ///
    /// On failure the pool is left exactly as it was.
    pub fn ensure_capacity(&mut self, block_len: usize) -> Result<bool, AllocationFailure> {
        if block_len <= self.capacity {
            return Ok(false);
        }

        let mut grown = allocate_zeroed(self.voice_count, block_len)?;
        if self.capacity > 0 {
            for (dst, src) in grown
                .chunks_exact_mut(block_len)
                .zip(self.samples.chunks_exact(self.capacity))
            {
                dst[..self.capacity].copy_from_slice(src);
            }
        }

        log::debug!(
            "voice buffers grown from {} to {} samples ({} voices)",
            self.capacity,
            block_len,
            self.voice_count
        );

        self.samples = grown;
        self.capacity = block_len;
        Ok(true)
    }

    /// Discard every buffer and allocate `voice_count` zeroed buffers of
    /// `capacity_hint` samples.
    ///
    /// Anything still in the old buffers is lost. On failure the pool is
    /// left exactly as it was.
    pub fn reconfigure_voice_count(
        &mut self,
        voice_count: usize,
        capacity_hint: usize,
    ) -> Result<(), AllocationFailure> {
        self.samples = allocate_zeroed(voice_count, capacity_hint)?;
        self.voice_count = voice_count;
        self.capacity = capacity_hint;
        Ok(())
    }

    /// Full-capacity view of one voice buffer.
    pub fn voice(&self, voice: usize) -> Option<&[f32]> {
        if voice >= self.voice_count {
            return None;
        }
        let start = voice * self.capacity;
        Some(&self.samples[start..start + self.capacity])
    }

    /// Borrow the first `block_len` samples of every voice.
    ///
    /// `block_len` is clamped to the capacity; callers grow the pool first.
    pub fn block(&mut self, block_len: usize) -> VoiceBlock<'_> {
        debug_assert!(block_len <= self.capacity, "block exceeds pool capacity");
        VoiceBlock {
            samples: &mut self.samples,
            stride: self.capacity,
            len: block_len.min(self.capacity),
            voices: self.voice_count,
        }
    }
}

impl Default for VoiceBufferPool {
    fn default() -> Self {
        Self::empty()
    }
}

fn allocate_zeroed(voices: usize, capacity: usize) -> Result<Vec<f32>, AllocationFailure> {
    let failure = AllocationFailure {
        voices,
        samples: capacity,
    };
    let total = voices.checked_mul(capacity).ok_or(failure)?;

    let mut samples = Vec::new();
    samples.try_reserve_exact(total).map_err(|_| failure)?;
    samples.resize(total, 0.0);
    Ok(samples)
}

/// Mutable view over one block of every voice buffer.
///
/// Each voice is exposed as a slice of exactly [`VoiceBlock::len`] samples,
/// so an engine cannot write past the block or resize a buffer.
pub struct VoiceBlock<'a> {
    samples: &'a mut [f32],
    stride: usize,
    len: usize,
    voices: usize,
}

impl<'a> VoiceBlock<'a> {
    /// View a caller-owned flat buffer of `voices * len` samples as a block.
    ///
    /// # Panics
    /// Panics if `samples` is shorter than `voices * len`.
    pub fn from_flat(samples: &'a mut [f32], voices: usize, len: usize) -> Self {
        assert!(samples.len() >= voices * len, "flat buffer too short");
        Self {
            samples,
            stride: len,
            len,
            voices,
        }
    }

    #[inline]
    pub fn voice_count(&self) -> usize {
        self.voices
    }

    /// Samples per voice in this block.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// # Panics
    /// Panics if `voice >= voice_count()`.
    #[inline]
    pub fn voice(&self, voice: usize) -> &[f32] {
        assert!(voice < self.voices, "voice index out of range");
        let start = voice * self.stride;
        &self.samples[start..start + self.len]
    }

    /// # Panics
    /// Panics if `voice >= voice_count()`.
    #[inline]
    pub fn voice_mut(&mut self, voice: usize) -> &mut [f32] {
        assert!(voice < self.voices, "voice index out of range");
        let start = voice * self.stride;
        &mut self.samples[start..start + self.len]
    }

    pub fn iter(&self) -> impl Iterator<Item = &[f32]> + '_ {
        (0..self.voices).map(move |v| self.voice(v))
    }

    pub fn iter_mut(&mut self) -> VoicesMut<'_> {
        VoicesMut {
            rest: &mut self.samples[..self.voices * self.stride],
            stride: self.stride,
            len: self.len,
            remaining: self.voices,
        }
    }

    /// Set every sample of every voice in the block.
    pub fn fill(&mut self, value: f32) {
        for voice in self.iter_mut() {
            voice.fill(value);
        }
    }
}

/// Iterator over mutable per-voice slices of a [`VoiceBlock`].
pub struct VoicesMut<'a> {
    rest: &'a mut [f32],
    stride: usize,
    len: usize,
    remaining: usize,
}

impl<'a> Iterator for VoicesMut<'a> {
    type Item = &'a mut [f32];

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let rest = std::mem::take(&mut self.rest);
        let (head, tail) = rest.split_at_mut(self.stride);
        self.rest = tail;
        self.remaining -= 1;
        Some(&mut head[..self.len])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for VoicesMut<'_> {}
