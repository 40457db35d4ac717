//! Host-facing plugin lifecycle.
//!
//! `instantiate → activate → run* → deactivate → cleanup`. Configuration
//! failures surface from `instantiate`/`activate`; nothing that happens in
//! `run` is reported to the host beyond a [`BlockStatus`].

pub mod ports;

use std::panic::{self, AssertUnwindSafe};

use crate::config::PluginConfig;
use crate::engine::{EngineConfig, EngineFactory};
use crate::error::Result;
use crate::pipeline::{BlockInputs, BlockReport, RenderPipeline};

pub use ports::{PortIndex, RunPorts, UnknownPort};

/// Outcome of one `run` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStatus {
    Rendered(BlockReport),
    /// The block failed and the output holds silence.
    Silenced,
}

pub struct CantinaPlugin<F: EngineFactory> {
    pipeline: RenderPipeline<F>,
    config: PluginConfig,
    sample_rate: f64,
    active: bool,
    /// Last value seen on the harmonic-count port.
    requested_voices: Option<i32>,
}

impl<F: EngineFactory> CantinaPlugin<F> {
    /// Build the engine with the default voice count and buffer size.
    pub fn instantiate(factory: F, sample_rate: f64, config: PluginConfig) -> Result<Self> {
        config.validate()?;

        let mut pipeline = RenderPipeline::new(factory);
        pipeline.configure_with(
            EngineConfig::new(config.default_voice_count, sample_rate, config.channel_count),
            config.default_block_size,
        )?;

        Ok(Self {
            pipeline,
            config,
            sample_rate,
            active: false,
            requested_voices: None,
        })
    }

    /// Grow the voice buffers for the host's maximum block length.
    pub fn activate(&mut self, max_block_len: usize) -> Result<()> {
        self.pipeline.reserve(max_block_len)?;
        self.active = true;
        log::info!(
            "activated at {} Hz, buffers hold {} samples",
            self.sample_rate,
            self.pipeline.capacity()
        );
        Ok(())
    }

    /// Render one block. Never fails; problems silence the block.
    pub fn run(&mut self, ports: RunPorts<'_>) -> BlockStatus {
        let RunPorts {
            control,
            harmonic_count,
            gain,
            input,
            output,
        } = ports;

        if let Some(requested) = harmonic_count {
            let applied =
                panic::catch_unwind(AssertUnwindSafe(|| self.apply_harmonic_count(requested)));
            if applied.is_err() {
                log::warn!(
                    "engine factory panicked; keeping {} voices",
                    self.pipeline.voice_count()
                );
            }
        }

        let inputs = BlockInputs {
            seed: input,
            events: control,
            gain_db: gain.unwrap_or(0.0),
        };

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            self.pipeline.render_block(inputs, &mut *output)
        }));

        match result {
            Ok(Ok(report)) => BlockStatus::Rendered(report),
            Ok(Err(err)) => {
                log::warn!("block silenced: {err}");
                BlockStatus::Silenced
            }
            Err(_) => {
                output.fill(0.0);
                self.pipeline.recover();
                log::warn!("engine panicked; block silenced");
                BlockStatus::Silenced
            }
        }
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        log::info!("deactivated");
    }

    /// Release the engine and buffers.
    pub fn cleanup(mut self) {
        self.pipeline.teardown();
    }

    fn apply_harmonic_count(&mut self, requested: i32) {
        if self.requested_voices == Some(requested) {
            return;
        }
        self.requested_voices = Some(requested);

        let Ok(count) = usize::try_from(requested) else {
            log::warn!("ignoring harmonic count {requested}");
            return;
        };
        if count == self.pipeline.voice_count() {
            return;
        }
        if let Err(err) = self.config.check_voice_count(count) {
            log::warn!("ignoring harmonic count {requested}: {err}");
            return;
        }
        if let Err(err) = self.pipeline.reconfigure_voice_count(count) {
            log::warn!("could not switch to {count} voices: {err}");
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &RenderPipeline<F> {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut RenderPipeline<F> {
        &mut self.pipeline
    }
}
