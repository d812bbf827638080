//! Audio configuration types
//!
//! Pure data shared by the synthesizer, the scheduler and output devices:
//! waveforms, tone specifications and the gain envelopes used for
//! oscillator notes. Nothing in here touches a sample buffer.

use crate::error::SynthError;

/// Available waveform types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Waveform {
    #[default]
    Sine,
    Triangle,
    Sawtooth,
}

impl Waveform {
    /// Parse waveform from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Waveform> {
        match s.to_lowercase().as_str() {
            "sine" | "sin" => Some(Waveform::Sine),
            "triangle" | "tri" => Some(Waveform::Triangle),
            "sawtooth" | "saw" => Some(Waveform::Sawtooth),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Triangle => "triangle",
            Waveform::Sawtooth => "sawtooth",
        }
    }
}

/// A single synthesized tone: pitch, length and shape
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ToneSpec {
    /// Hz, always > 0
    pub frequency: f32,
    /// Seconds, always > 0
    pub duration: f32,
    pub waveform: Waveform,
}

impl ToneSpec {
    pub fn new(frequency: f32, duration: f32, waveform: Waveform) -> Result<Self, SynthError> {
        if !(frequency.is_finite() && frequency > 0.0) {
            return Err(SynthError::InvalidFrequency(frequency));
        }
        if !(duration.is_finite() && duration > 0.0) {
            return Err(SynthError::InvalidDuration(duration));
        }
        Ok(Self {
            frequency,
            duration,
            waveform,
        })
    }

    /// Constructor for compile-time tables whose values are known to be valid.
    pub(crate) const fn preset(frequency: f32, duration: f32, waveform: Waveform) -> Self {
        Self {
            frequency,
            duration,
            waveform,
        }
    }

    /// Number of samples a buffer for this tone holds at `sample_rate`
    pub fn sample_count(&self, sample_rate: u32) -> usize {
        (self.duration as f64 * sample_rate as f64) as usize
    }
}

/// Gain shape for a live oscillator note.
///
/// Starts silent, ramps linearly to `peak` over `attack` seconds, then falls
/// exponentially to `floor` at the end of the note.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OscillatorEnvelope {
    pub peak: f32,
    pub attack: f32,
    pub floor: f32,
}

impl OscillatorEnvelope {
    /// Short blips: success-sequence notes and ambient sparkles
    pub const fn raw_tone() -> Self {
        Self {
            peak: 0.1,
            attack: 0.01,
            floor: 0.001,
        }
    }

    /// Soft melody notes played under the background-music bus
    pub const fn background_note() -> Self {
        Self {
            peak: 0.3,
            attack: 0.1,
            floor: 0.001,
        }
    }

    /// Envelope gain at `t` seconds into a note lasting `duration` seconds.
    pub fn gain_at(&self, t: f32, duration: f32) -> f32 {
        if t <= 0.0 || t >= duration {
            return 0.0;
        }
        if t < self.attack {
            return self.peak * (t / self.attack);
        }
        let span = (duration - self.attack).max(f32::EPSILON);
        let progress = (t - self.attack) / span;
        self.peak * (self.floor / self.peak).powf(progress)
    }
}

/// Fixed output levels used by the engine
pub mod gain {
    /// Scale applied inside every synthesized buffer
    pub const MASTER: f32 = 0.15;
    /// Playback gain for cached named sounds
    pub const NAMED_SOUND: f32 = 0.4;
    /// Persistent bus for the background melody
    pub const BACKGROUND_MUSIC: f32 = 0.1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waveform_parsing() {
        assert_eq!(Waveform::from_str("sine"), Some(Waveform::Sine));
        assert_eq!(Waveform::from_str("TRI"), Some(Waveform::Triangle));
        assert_eq!(Waveform::from_str("Saw"), Some(Waveform::Sawtooth));
        assert_eq!(Waveform::from_str("square"), None);
    }

    #[test]
    fn test_default_waveform_is_sine() {
        assert_eq!(Waveform::default(), Waveform::Sine);
    }

    #[test]
    fn test_tone_spec_validation() {
        assert!(ToneSpec::new(440.0, 0.5, Waveform::Sine).is_ok());
        assert_eq!(
            ToneSpec::new(0.0, 0.5, Waveform::Sine),
            Err(SynthError::InvalidFrequency(0.0))
        );
        assert_eq!(
            ToneSpec::new(440.0, -1.0, Waveform::Sine),
            Err(SynthError::InvalidDuration(-1.0))
        );
        assert!(ToneSpec::new(f32::NAN, 0.5, Waveform::Sine).is_err());
    }

    #[test]
    fn test_sample_count() {
        let tone = ToneSpec::new(800.0, 0.15, Waveform::Triangle).unwrap();
        assert_eq!(tone.sample_count(44100), 6615);
        assert_eq!(tone.sample_count(48000), 7200);
    }

    #[test]
    fn test_envelope_shape() {
        let env = OscillatorEnvelope::background_note();
        assert_eq!(env.gain_at(0.0, 1.5), 0.0);
        assert!((env.gain_at(0.05, 1.5) - 0.15).abs() < 1e-6);
        assert!((env.gain_at(0.1, 1.5) - 0.3).abs() < 1e-4);
        // Decays monotonically after the attack
        let mid = env.gain_at(0.8, 1.5);
        let late = env.gain_at(1.4, 1.5);
        assert!(mid > late && late > 0.0);
        assert_eq!(env.gain_at(1.5, 1.5), 0.0);
    }
}
