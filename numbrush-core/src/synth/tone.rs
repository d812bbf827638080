//! Tone synthesizer
//!
//! Turns a [`ToneSpec`] into a fixed-length mono buffer. Sample values are
//! computed directly from time (no running phase), so the same inputs always
//! produce the same buffer, bit for bit.

use crate::types::audio_config::{gain, ToneSpec, Waveform};
use std::f64::consts::PI;
use std::sync::Arc;

/// Frequency above which triangle tones get the bright, shimmering envelope
pub const BRIGHT_THRESHOLD_HZ: f32 = 800.0;

/// An immutable mono sample buffer. Cloning shares the samples.
#[derive(Debug, Clone, PartialEq)]
pub struct ToneBuffer {
    samples: Arc<[f32]>,
    sample_rate: u32,
}

impl ToneBuffer {
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Playback length in seconds
    pub fn duration(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Amplitude envelope applied to a raw waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// Soft pluck: `exp(-2t)·(1 - exp(-10t))`
    Standard,
    /// Coin-like shimmer: `exp(-3t)·(1 - exp(-15t))·(1 + 0.3·sin(2π·2f·t))`
    Bright,
}

impl Envelope {
    /// Pick the envelope a tone is rendered with
    pub fn for_tone(spec: &ToneSpec) -> Self {
        if spec.waveform == Waveform::Triangle && spec.frequency > BRIGHT_THRESHOLD_HZ {
            Envelope::Bright
        } else {
            Envelope::Standard
        }
    }

    #[inline]
    fn amplitude(&self, t: f64, frequency: f64) -> f64 {
        match self {
            Envelope::Standard => (-2.0 * t).exp() * (1.0 - (-10.0 * t).exp()),
            Envelope::Bright => {
                (-3.0 * t).exp()
                    * (1.0 - (-15.0 * t).exp())
                    * (1.0 + 0.3 * (2.0 * PI * 2.0 * frequency * t).sin())
            }
        }
    }
}

/// Raw waveform value at time `t`, in [-1, 1]
#[inline]
fn waveform_at(waveform: Waveform, frequency: f64, t: f64) -> f64 {
    match waveform {
        Waveform::Sine => (2.0 * PI * frequency * t).sin(),
        Waveform::Triangle => {
            let cycles = t * frequency;
            2.0 * (2.0 * (cycles - (cycles + 0.5).floor())).abs() - 1.0
        }
        Waveform::Sawtooth => {
            let cycles = t * frequency;
            2.0 * (cycles - (cycles + 0.5).floor())
        }
    }
}

/// Render `spec` at `sample_rate` into an enveloped buffer scaled by the
/// master gain.
pub fn synthesize(spec: &ToneSpec, sample_rate: u32) -> ToneBuffer {
    let frequency = spec.frequency as f64;
    let rate = sample_rate as f64;
    let envelope = Envelope::for_tone(spec);

    let samples: Arc<[f32]> = (0..spec.sample_count(sample_rate))
        .map(|i| {
            let t = i as f64 / rate;
            let value = waveform_at(spec.waveform, frequency, t)
                * envelope.amplitude(t, frequency)
                * gain::MASTER as f64;
            value as f32
        })
        .collect();

    ToneBuffer {
        samples,
        sample_rate,
    }
}
