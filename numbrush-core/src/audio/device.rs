//! Output device capability interface
//!
//! The scheduler never talks to a platform audio API directly. Anything that
//! can resume itself, play a finished buffer, hold a persistent gain bus and
//! run a short enveloped oscillator can stand in as the output.

use crate::error::DeviceError;
use crate::synth::ToneBuffer;
use crate::types::audio_config::{OscillatorEnvelope, Waveform};

/// Handle to a persistent gain bus created on a device
pub type GainId = u64;

/// Where an oscillator note is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Straight to the device output
    Destination,
    /// Through a persistent gain bus
    Gain(GainId),
}

/// A live oscillator note: plays for `duration` seconds and then stops
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorNote {
    pub frequency: f32,
    pub waveform: Waveform,
    pub duration: f32,
    pub envelope: OscillatorEnvelope,
    pub route: Route,
}

pub trait AudioOutputDevice {
    /// Rate that buffers handed to `play_buffer` are rendered at
    fn sample_rate(&self) -> u32;

    /// Whether output is paused and needs `resume` before anything is audible
    fn is_suspended(&self) -> bool;

    fn resume(&mut self) -> Result<(), DeviceError>;

    fn play_buffer(&mut self, buffer: &ToneBuffer, gain: f32) -> Result<(), DeviceError>;

    fn create_persistent_gain(&mut self, gain: f32) -> Result<GainId, DeviceError>;

    /// Disconnect a gain bus. Notes still routed through it go silent.
    fn release_gain(&mut self, id: GainId);

    fn play_oscillator(&mut self, note: OscillatorNote) -> Result<(), DeviceError>;
}

/// Resume `device` if it is suspended. Returns false, after logging, if it
/// could not be resumed.
pub fn ensure_running(device: &mut dyn AudioOutputDevice) -> bool {
    if !device.is_suspended() {
        return true;
    }
    match device.resume() {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "audio output could not be resumed");
            false
        }
    }
}
