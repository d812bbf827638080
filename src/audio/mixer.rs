//! Software mixer behind the cpal output stream
//!
//! Holds the voices that are currently sounding and the persistent gain
//! buses they may be routed through. The stream callback pulls mono samples
//! from here; the dispatcher thread adds voices and buses.

use numbrush_core::audio::{GainId, OscillatorNote, Route};
use numbrush_core::synth::ToneBuffer;
use numbrush_core::types::Waveform;
use std::collections::HashMap;
use std::f32::consts::PI;

/// A finished buffer being played back once
struct BufferVoice {
    buffer: ToneBuffer,
    position: usize,
    gain: f32,
}

/// Per-note oscillator state with its gain envelope
struct OscillatorVoice {
    note: OscillatorNote,
    phase: f32,
    elapsed: usize,
    total: usize,
}

impl OscillatorVoice {
    fn new(note: OscillatorNote, sample_rate: f32) -> Self {
        Self {
            note,
            phase: 0.0,
            elapsed: 0,
            total: (note.duration * sample_rate) as usize,
        }
    }

    /// Raw waveform value based on current phase (0.0 to 1.0)
    fn waveform(&self) -> f32 {
        match self.note.waveform {
            Waveform::Sine => (2.0 * PI * self.phase).sin(),
            Waveform::Triangle => {
                if self.phase < 0.5 {
                    4.0 * self.phase - 1.0
                } else {
                    3.0 - 4.0 * self.phase
                }
            }
            Waveform::Sawtooth => {
                // Zero-centred ramp, matching the synthesizer's sawtooth
                let shifted = self.phase + 0.5;
                2.0 * (shifted - shifted.floor()) - 1.0
            }
        }
    }

    fn next_sample(&mut self, sample_rate: f32) -> f32 {
        let t = self.elapsed as f32 / sample_rate;
        let value = self.waveform() * self.note.envelope.gain_at(t, self.note.duration);

        self.phase += self.note.frequency / sample_rate;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        self.elapsed += 1;
        value
    }

    fn is_finished(&self) -> bool {
        self.elapsed >= self.total
    }
}

enum Voice {
    Buffer(BufferVoice),
    Oscillator(OscillatorVoice),
}

impl Voice {
    fn is_finished(&self) -> bool {
        match self {
            Voice::Buffer(v) => v.position >= v.buffer.len(),
            Voice::Oscillator(v) => v.is_finished(),
        }
    }

    fn route(&self) -> Route {
        match self {
            Voice::Buffer(_) => Route::Destination,
            Voice::Oscillator(v) => v.note.route,
        }
    }
}

pub struct Mixer {
    sample_rate: f32,
    voices: Vec<Voice>,
    buses: HashMap<GainId, f32>,
    next_bus: GainId,
}

impl Mixer {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate: sample_rate as f32,
            voices: Vec::new(),
            buses: HashMap::new(),
            next_bus: 1,
        }
    }

    pub fn add_buffer(&mut self, buffer: ToneBuffer, gain: f32) {
        self.voices.push(Voice::Buffer(BufferVoice {
            buffer,
            position: 0,
            gain,
        }));
    }

    /// Add an oscillator note. Returns false if it is routed to a bus that
    /// does not exist.
    pub fn add_oscillator(&mut self, note: OscillatorNote) -> bool {
        if let Route::Gain(id) = note.route {
            if !self.buses.contains_key(&id) {
                return false;
            }
        }
        self.voices
            .push(Voice::Oscillator(OscillatorVoice::new(note, self.sample_rate)));
        true
    }

    pub fn add_bus(&mut self, gain: f32) -> GainId {
        let id = self.next_bus;
        self.next_bus += 1;
        self.buses.insert(id, gain);
        id
    }

    /// Drop a bus and every voice routed through it
    pub fn remove_bus(&mut self, id: GainId) {
        self.buses.remove(&id);
        self.voices.retain(|voice| voice.route() != Route::Gain(id));
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// Mix the next `out.len()` mono samples, then retire finished voices
    pub fn render(&mut self, out: &mut [f32]) {
        out.fill(0.0);
        let sample_rate = self.sample_rate;

        for voice in &mut self.voices {
            match voice {
                Voice::Buffer(v) => {
                    let samples = v.buffer.samples();
                    let remaining = &samples[v.position.min(samples.len())..];
                    let count = remaining.len().min(out.len());
                    for (slot, sample) in out.iter_mut().zip(&remaining[..count]) {
                        *slot += sample * v.gain;
                    }
                    v.position += count;
                }
                Voice::Oscillator(v) => {
                    let bus_gain = match v.note.route {
                        Route::Destination => 1.0,
                        Route::Gain(id) => self.buses.get(&id).copied().unwrap_or(0.0),
                    };
                    for slot in out.iter_mut() {
                        if v.is_finished() {
                            break;
                        }
                        *slot += v.next_sample(sample_rate) * bus_gain;
                    }
                }
            }
        }

        for slot in out.iter_mut() {
            *slot = slot.clamp(-1.0, 1.0);
        }
        self.voices.retain(|voice| !voice.is_finished());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use numbrush_core::synth::{synthesize, SoundName};
    use numbrush_core::types::OscillatorEnvelope;

    const SAMPLE_RATE: u32 = 8000;

    fn note(route: Route) -> OscillatorNote {
        OscillatorNote {
            frequency: 523.0,
            waveform: Waveform::Sine,
            duration: 0.01,
            envelope: OscillatorEnvelope::raw_tone(),
            route,
        }
    }

    #[test]
    fn test_buffer_voice_plays_once_and_retires() {
        let mut mixer = Mixer::new(SAMPLE_RATE);
        let buffer = synthesize(&SoundName::Sparkle.tone_spec(), SAMPLE_RATE);
        let len = buffer.len();
        mixer.add_buffer(buffer.clone(), 0.4);

        let mut out = vec![0.0; len];
        mixer.render(&mut out);
        for (mixed, source) in out.iter().zip(buffer.samples()) {
            assert!((mixed - source * 0.4).abs() < 1e-6);
        }
        assert_eq!(mixer.active_voices(), 0);
    }

    #[test]
    fn test_buffer_voice_spans_callbacks() {
        let mut mixer = Mixer::new(SAMPLE_RATE);
        let buffer = synthesize(&SoundName::Click.tone_spec(), SAMPLE_RATE);
        let len = buffer.len();
        mixer.add_buffer(buffer, 1.0);

        let mut out = vec![0.0; len / 2];
        mixer.render(&mut out);
        assert_eq!(mixer.active_voices(), 1);
        let mut rest = vec![0.0; len];
        mixer.render(&mut rest);
        assert_eq!(mixer.active_voices(), 0);
        assert!(rest[len - len / 2..].iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_oscillator_needs_live_bus() {
        let mut mixer = Mixer::new(SAMPLE_RATE);
        assert!(!mixer.add_oscillator(note(Route::Gain(42))));
        let bus = mixer.add_bus(0.1);
        assert!(mixer.add_oscillator(note(Route::Gain(bus))));
        assert!(mixer.add_oscillator(note(Route::Destination)));
        assert_eq!(mixer.active_voices(), 2);
    }

    #[test]
    fn test_removing_bus_silences_its_voices() {
        let mut mixer = Mixer::new(SAMPLE_RATE);
        let bus = mixer.add_bus(0.1);
        mixer.add_oscillator(note(Route::Gain(bus)));
        mixer.add_oscillator(note(Route::Destination));

        mixer.remove_bus(bus);
        assert_eq!(mixer.active_voices(), 1);
    }

    #[test]
    fn test_oscillator_voice_finishes_after_duration() {
        let mut mixer = Mixer::new(SAMPLE_RATE);
        mixer.add_oscillator(note(Route::Destination));
        // 0.01 s at 8 kHz
        let mut out = vec![0.0; 80];
        mixer.render(&mut out);
        assert_eq!(mixer.active_voices(), 0);
        assert!(out.iter().any(|s| *s != 0.0));
        assert!(out.iter().all(|s| s.abs() <= 0.1 + 1e-6));
    }

    #[test]
    fn test_output_is_clamped() {
        let mut mixer = Mixer::new(SAMPLE_RATE);
        let buffer = synthesize(&SoundName::Celebration.tone_spec(), SAMPLE_RATE);
        for _ in 0..64 {
            mixer.add_buffer(buffer.clone(), 1.0);
        }
        let mut out = vec![0.0; 2000];
        mixer.render(&mut out);
        assert!(out.iter().all(|s| (-1.0..=1.0).contains(s)));
    }
}
