use thiserror::Error;

use crate::io::midi::TimedEvent;

/// Port indices in the plugin's descriptor order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PortIndex {
    /// Atom/event input carrying MIDI.
    Control = 0,
    /// Integer control: number of voices (harmonics).
    HarmonicCount = 1,
    /// Float control: output gain in dB.
    Gain = 2,
    /// Audio input: seed signal.
    Input = 3,
    /// Audio output.
    Output = 4,
}

impl PortIndex {
    pub const ALL: [PortIndex; 5] = [
        PortIndex::Control,
        PortIndex::HarmonicCount,
        PortIndex::Gain,
        PortIndex::Input,
        PortIndex::Output,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no port with index {0}")]
pub struct UnknownPort(pub u32);

impl TryFrom<u32> for PortIndex {
    type Error = UnknownPort;

    fn try_from(index: u32) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(PortIndex::Control),
            1 => Ok(PortIndex::HarmonicCount),
            2 => Ok(PortIndex::Gain),
            3 => Ok(PortIndex::Input),
            4 => Ok(PortIndex::Output),
            other => Err(UnknownPort(other)),
        }
    }
}

impl From<PortIndex> for u32 {
    fn from(port: PortIndex) -> Self {
        port as u32
    }
}

/// Everything the host has connected for one `run` call.
///
/// Control ports are optional: a host may leave them unconnected.
pub struct RunPorts<'a> {
    pub control: &'a [TimedEvent],
    pub harmonic_count: Option<i32>,
    pub gain: Option<f32>,
    pub input: &'a [f32],
    pub output: &'a mut [f32],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_round_trip() {
        for port in PortIndex::ALL {
            assert_eq!(PortIndex::try_from(u32::from(port)), Ok(port));
        }
    }

    #[test]
    fn unknown_index_is_an_error() {
        assert_eq!(PortIndex::try_from(5), Err(UnknownPort(5)));
        assert_eq!(UnknownPort(9).to_string(), "no port with index 9");
    }
}
