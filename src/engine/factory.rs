use crate::engine::{EngineConfig, SynthEngine};
use crate::error::EngineConfigError;

/// Factory for building engines for a given configuration
///
/// Handed to the plugin once at instantiation. The pipeline calls it again
/// whenever the voice count changes, so the same engine design is rebuilt
/// with the new size.
pub trait EngineFactory: Send {
    type Engine: SynthEngine;

    fn create(&self, config: &EngineConfig) -> Result<Self::Engine, EngineConfigError>;
}

impl<F, E> EngineFactory for F
where
    F: Fn(&EngineConfig) -> Result<E, EngineConfigError> + Send,
    E: SynthEngine,
{
    type Engine = E;

    fn create(&self, config: &EngineConfig) -> Result<Self::Engine, EngineConfigError> {
        self(config)
    }
}
