//! Buffer ownership for the realtime path.

/// Flat per-voice buffer arena and block views.
pub mod pool;

pub use pool::{VoiceBlock, VoiceBufferPool, VoicesMut};
