//! Per-block orchestration: grow → decode/dispatch → advance → render → mix.
//!
//! ```text
//!   Uninitialized ──configure──→ Configured ⇄ Rendering (one block)
//!                                    │  ↑
//!                                    │  └── reconfigure_voice_count / configure
//!                                    └──teardown──→ TornDown
//! ```
//!
//! All entry points take `&mut self`, so a reconfiguration can never overlap a
//! block in flight. `Rendering` is only observable after a block unwound
//! (engine panic); the next entry point recovers from it.

use crate::buffer::VoiceBufferPool;
use crate::dsp::mix::mix_voices;
use crate::engine::{EngineAdapter, EngineConfig, EngineFactory};
use crate::error::{EngineConfigError, RenderError, Result};
use crate::io::decoder::EventDecoder;
use crate::io::midi::TimedEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Uninitialized,
    Configured,
    Rendering,
    TornDown,
}

/// Host inputs for one block. Borrowed for the call only.
#[derive(Debug, Clone, Copy)]
pub struct BlockInputs<'a> {
    /// Seed signal, at least as long as the block.
    pub seed: &'a [f32],
    /// Raw events in arrival order.
    pub events: &'a [TimedEvent],
    /// Output gain in decibels.
    pub gain_db: f32,
}

/// What happened to one block's events.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BlockReport {
    /// Events the engine accepted.
    pub dispatched: usize,
    /// Raw events dropped as unsupported or malformed.
    pub skipped: usize,
    /// Decoded events the engine refused.
    pub rejected: usize,
    /// The voice buffers had to grow for this block.
    pub grew: bool,
}

/// Running totals since configuration.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderStats {
    pub blocks: u64,
    pub silenced_blocks: u64,
    pub dispatched: u64,
    pub skipped: u64,
    pub rejected: u64,
}

impl RenderStats {
    fn record(&mut self, report: &BlockReport) {
        self.dispatched += report.dispatched as u64;
        self.skipped += report.skipped as u64;
        self.rejected += report.rejected as u64;
    }
}

pub struct RenderPipeline<F: EngineFactory> {
    factory: F,
    state: PipelineState,
    engine: Option<EngineAdapter<F::Engine>>,
    pool: VoiceBufferPool,
    stats: RenderStats,
}

impl<F: EngineFactory> RenderPipeline<F> {
    /// An unconfigured pipeline that will build engines with `factory`.
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            state: PipelineState::Uninitialized,
            engine: None,
            pool: VoiceBufferPool::empty(),
            stats: RenderStats::default(),
        }
    }

    /// Build a mono engine and its voice buffers.
    pub fn configure(
        &mut self,
        voice_count: usize,
        sample_rate: f64,
        max_block_len: usize,
    ) -> Result<()> {
        self.configure_with(EngineConfig::new(voice_count, sample_rate, 1), max_block_len)
    }

    /// Build the engine for `config` and voice buffers of `max_block_len`
    /// samples, replacing any previous configuration.
    ///
    /// On failure the previous configuration, if any, is left in place.
    pub fn configure_with(&mut self, config: EngineConfig, max_block_len: usize) -> Result<()> {
        self.recover();
        if self.state == PipelineState::TornDown {
            return Err(RenderError::InvalidState {
                operation: "configure",
                state: self.state,
            });
        }
        if max_block_len == 0 {
            return Err(EngineConfigError::ZeroBlockLength.into());
        }

        let engine = EngineAdapter::new(&self.factory, config)?;
        let pool = VoiceBufferPool::new(engine.voice_count(), max_block_len)?;

        log::info!(
            "pipeline configured: {} voices x {} samples",
            pool.voice_count(),
            pool.capacity()
        );

        self.engine = Some(engine);
        self.pool = pool;
        self.stats = RenderStats::default();
        self.state = PipelineState::Configured;
        Ok(())
    }

    /// Grow the voice buffers ahead of time for blocks up to `max_block_len`.
    ///
    /// Call from a non-realtime context when the host announces its maximum
    /// block size, so the render path never allocates.
    pub fn reserve(&mut self, max_block_len: usize) -> Result<bool> {
        self.recover();
        if self.state != PipelineState::Configured {
            return Err(RenderError::NotConfigured);
        }
        Ok(self.pool.ensure_capacity(max_block_len)?)
    }

    /// Render one block of `output.len()` samples.
    ///
    /// `output` is always fully overwritten. On any error it holds silence and
    /// the pipeline stays usable for the next block. Engine refusals of single
    /// events are not errors; they are logged and counted in the report.
    pub fn render_block(
        &mut self,
        inputs: BlockInputs<'_>,
        output: &mut [f32],
    ) -> Result<BlockReport> {
        self.recover();

        let block_len = output.len();
        let engine = match (self.state, self.engine.as_mut()) {
            (PipelineState::Configured, Some(engine)) => engine,
            _ => {
                output.fill(0.0);
                return Err(RenderError::NotConfigured);
            }
        };

        if inputs.seed.len() < block_len {
            output.fill(0.0);
            self.stats.silenced_blocks += 1;
            return Err(RenderError::InputLength {
                expected: block_len,
                actual: inputs.seed.len(),
            });
        }

        self.state = PipelineState::Rendering;
        self.stats.blocks += 1;
        let mut report = BlockReport::default();

        match self.pool.ensure_capacity(block_len) {
            Ok(grew) => report.grew = grew,
            Err(failure) => {
                output.fill(0.0);
                self.stats.silenced_blocks += 1;
                self.state = PipelineState::Configured;
                return Err(failure.into());
            }
        }

        let mut decoder = EventDecoder::new(inputs.events);
        for event in decoder.by_ref() {
            match engine.dispatch(event) {
                Ok(()) => report.dispatched += 1,
                Err(err) => {
                    report.rejected += 1;
                    log::warn!("engine rejected {event:?}: {err}");
                }
            }
        }
        report.skipped = decoder.skipped();
        self.stats.record(&report);

        let rendered = engine.advance().and_then(|()| {
            let mut voices = self.pool.block(block_len);
            engine.render(inputs.seed, &mut voices)
        });
        engine.finish_block(block_len);
        self.state = PipelineState::Configured;

        match rendered {
            Ok(()) => {
                let voices = self.pool.block(block_len);
                mix_voices(voices.iter(), inputs.gain_db, output);
                Ok(report)
            }
            Err(err) => {
                output.fill(0.0);
                self.stats.silenced_blocks += 1;
                Err(err.into())
            }
        }
    }

    /// Replace the engine and voice buffers with `voice_count` voices.
    ///
    /// Audio in flight for the old voices is dropped with no crossfade. The
    /// buffers keep the current capacity and start zeroed. On failure the
    /// previous engine and buffers stay in place.
    pub fn reconfigure_voice_count(&mut self, voice_count: usize) -> Result<()> {
        self.recover();
        let current = match (self.state, self.engine.as_ref()) {
            (PipelineState::Configured, Some(engine)) => *engine.config(),
            _ => {
                return Err(RenderError::InvalidState {
                    operation: "reconfigure_voice_count",
                    state: self.state,
                })
            }
        };

        let engine = EngineAdapter::new(
            &self.factory,
            EngineConfig {
                voice_count,
                ..current
            },
        )?;
        let capacity = self.pool.capacity();
        self.pool
            .reconfigure_voice_count(engine.voice_count(), capacity)?;

        log::info!(
            "voice count changed from {} to {}",
            current.voice_count,
            engine.voice_count()
        );
        self.engine = Some(engine);
        Ok(())
    }

    /// Release the engine and buffers. Terminal.
    pub fn teardown(&mut self) {
        if self.state == PipelineState::TornDown {
            return;
        }
        self.engine = None;
        self.pool = VoiceBufferPool::empty();
        self.state = PipelineState::TornDown;
        log::info!("pipeline torn down after {} blocks", self.stats.blocks);
    }

    /// Return to `Configured` after a block that unwound mid-flight.
    pub fn recover(&mut self) {
        if self.state == PipelineState::Rendering {
            log::warn!("previous block did not complete; resuming from a fresh block");
            self.state = PipelineState::Configured;
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Current voice count, or 0 when not configured.
    pub fn voice_count(&self) -> usize {
        self.pool.voice_count()
    }

    pub fn harmonic_count(&self) -> Option<usize> {
        self.engine.as_ref().map(EngineAdapter::harmonic_count)
    }

    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    pub fn pool(&self) -> &VoiceBufferPool {
        &self.pool
    }

    pub fn engine(&self) -> Option<&EngineAdapter<F::Engine>> {
        self.engine.as_ref()
    }

    pub fn engine_mut(&mut self) -> Option<&mut EngineAdapter<F::Engine>> {
        self.engine.as_mut()
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }
}
