//! Plugin-level configuration.
//!
//! Values here apply before the host has told us anything: how many voices to
//! build at instantiation, how large the voice buffers start out, and the
//! ceiling on voice counts accepted from the harmonic-count port.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::EngineConfigError;
use crate::{DEFAULT_BLOCK_SIZE, DEFAULT_VOICE_COUNT};

/// Upper bound on voices accepted from the host unless configured otherwise.
pub const DEFAULT_MAX_VOICE_COUNT: usize = 128;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginConfig {
    /// Voices built at instantiation, before the harmonic-count port is read.
    pub default_voice_count: usize,
    /// Initial capacity of every voice buffer, in samples.
    pub default_block_size: usize,
    /// Channels requested from the engine. The host output is mono.
    pub channel_count: usize,
    /// Largest voice count the harmonic-count port may request.
    pub max_voice_count: usize,
}

impl PluginConfig {
    pub fn with_default_voice_count(mut self, count: usize) -> Self {
        self.default_voice_count = count;
        self
    }

    pub fn with_default_block_size(mut self, samples: usize) -> Self {
        self.default_block_size = samples;
        self
    }

    pub fn with_max_voice_count(mut self, count: usize) -> Self {
        self.max_voice_count = count;
        self
    }

    /// Check the configuration is usable for instantiation.
    pub fn validate(&self) -> Result<(), EngineConfigError> {
        if self.channel_count == 0 {
            return Err(EngineConfigError::ZeroChannels);
        }
        if self.default_block_size == 0 {
            return Err(EngineConfigError::ZeroBlockLength);
        }
        self.check_voice_count(self.default_voice_count)
    }

    /// Check a voice count against the `1..=max_voice_count` range.
    pub fn check_voice_count(&self, count: usize) -> Result<(), EngineConfigError> {
        if count == 0 {
            return Err(EngineConfigError::ZeroVoices);
        }
        if count > self.max_voice_count {
            return Err(EngineConfigError::TooManyVoices {
                requested: count,
                max: self.max_voice_count,
            });
        }
        Ok(())
    }
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            default_voice_count: DEFAULT_VOICE_COUNT,
            default_block_size: DEFAULT_BLOCK_SIZE,
            channel_count: 1,
            max_voice_count: DEFAULT_MAX_VOICE_COUNT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = PluginConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_voice_count, 4);
        assert_eq!(config.default_block_size, 1024);
    }

    #[test]
    fn voice_count_bounds() {
        let config = PluginConfig::default().with_max_voice_count(8);

        assert_eq!(config.check_voice_count(0), Err(EngineConfigError::ZeroVoices));
        assert!(config.check_voice_count(8).is_ok());
        assert_eq!(
            config.check_voice_count(9),
            Err(EngineConfigError::TooManyVoices { requested: 9, max: 8 })
        );
    }

    #[test]
    fn zero_block_size_rejected() {
        let config = PluginConfig::default().with_default_block_size(0);
        assert_eq!(config.validate(), Err(EngineConfigError::ZeroBlockLength));
    }
}
