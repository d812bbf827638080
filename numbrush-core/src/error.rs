//! Error types for the core crate
//!
//! The puzzle state machine itself never fails. Errors only surface when
//! level data is loaded, when a tone is specified with impossible parameters,
//! or when an output device rejects a request.

/// Problems found while validating authored level data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LevelError {
    #[error("level '{0}' has no sections")]
    NoSections(String),
    #[error("level '{level}' lists section {number} more than once")]
    DuplicateSection { level: String, number: u32 },
    #[error("level '{level}' section {number} uses {color}, which is not in the palette")]
    ColorNotInPalette {
        level: String,
        number: u32,
        color: String,
    },
    #[error("level catalogue is empty")]
    NoLevels,
}

/// Invalid tone parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SynthError {
    #[error("frequency must be a positive number of Hz, got {0}")]
    InvalidFrequency(f32),
    #[error("duration must be a positive number of seconds, got {0}")]
    InvalidDuration(f32),
}

/// Failures reported by an [`AudioOutputDevice`](crate::audio::AudioOutputDevice).
///
/// The scheduler catches every one of these at the point of use and logs it;
/// none of them reach game code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    #[error("failed to resume output: {0}")]
    Resume(String),
    #[error("failed to emit audio: {0}")]
    Emit(String),
    #[error("unknown gain bus {0}")]
    UnknownGain(u64),
}
