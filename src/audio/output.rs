use super::mixer::Mixer;
use anyhow::{anyhow, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use numbrush_core::audio::{AudioOutputDevice, GainId, OscillatorNote, Route};
use numbrush_core::error::DeviceError;
use numbrush_core::synth::ToneBuffer;
use std::sync::{Arc, Mutex, MutexGuard};

/// The default system output, driven by a cpal stream pulling from a [`Mixer`].
///
/// The stream is built paused and only starts on the first `resume`, so
/// nothing is audible until the player's first interaction.
pub struct CpalOutputDevice {
    stream: Stream,
    mixer: Arc<Mutex<Mixer>>,
    sample_rate: u32,
    suspended: bool,
}

impl CpalOutputDevice {
    pub fn open() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("No output device available"))?;
        let config = device.default_output_config()?;

        let sample_format = config.sample_format();
        let config: StreamConfig = config.into();
        let sample_rate = config.sample_rate.0;

        let mixer = Arc::new(Mutex::new(Mixer::new(sample_rate)));
        let stream = match sample_format {
            SampleFormat::F32 => Self::build_stream::<f32>(&device, &config, mixer.clone())?,
            SampleFormat::I16 => Self::build_stream::<i16>(&device, &config, mixer.clone())?,
            SampleFormat::U16 => Self::build_stream::<u16>(&device, &config, mixer.clone())?,
            _ => return Err(anyhow!("Unsupported sample format: {:?}", sample_format)),
        };

        // Some backends start streams on creation
        stream
            .pause()
            .map_err(|e| anyhow!("Failed to pause new stream: {}", e))?;

        tracing::debug!(
            sample_rate,
            channels = config.channels,
            ?sample_format,
            "opened audio output"
        );

        Ok(CpalOutputDevice {
            stream,
            mixer,
            sample_rate,
            suspended: true,
        })
    }

    fn build_stream<T>(
        device: &cpal::Device,
        config: &StreamConfig,
        mixer: Arc<Mutex<Mixer>>,
    ) -> Result<Stream>
    where
        T: Sample + SizedSample + Send + 'static + cpal::FromSample<f32>,
    {
        let channels = config.channels as usize;
        let mut mono: Vec<f32> = Vec::new();

        let err_fn = |err| tracing::warn!("an error occurred on the output audio stream: {}", err);

        let stream = device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    let frames = data.len() / channels;
                    mono.resize(frames, 0.0);
                    match mixer.lock() {
                        Ok(mut mixer) => mixer.render(&mut mono),
                        Err(_) => mono.fill(0.0),
                    }

                    for (frame, value) in data.chunks_mut(channels).zip(&mono) {
                        let value: T = cpal::Sample::from_sample(*value);
                        for sample in frame.iter_mut() {
                            *sample = value;
                        }
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| anyhow!("Failed to build output stream: {}", e))?;

        Ok(stream)
    }

    fn mixer(&self) -> Result<MutexGuard<'_, Mixer>, DeviceError> {
        self.mixer
            .lock()
            .map_err(|e| DeviceError::Emit(format!("mixer lock poisoned: {}", e)))
    }
}

impl AudioOutputDevice for CpalOutputDevice {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn is_suspended(&self) -> bool {
        self.suspended
    }

    fn resume(&mut self) -> Result<(), DeviceError> {
        self.stream
            .play()
            .map_err(|e| DeviceError::Resume(e.to_string()))?;
        self.suspended = false;
        Ok(())
    }

    fn play_buffer(&mut self, buffer: &ToneBuffer, gain: f32) -> Result<(), DeviceError> {
        self.mixer()?.add_buffer(buffer.clone(), gain);
        Ok(())
    }

    fn create_persistent_gain(&mut self, gain: f32) -> Result<GainId, DeviceError> {
        Ok(self.mixer()?.add_bus(gain))
    }

    fn release_gain(&mut self, id: GainId) {
        match self.mixer() {
            Ok(mut mixer) => mixer.remove_bus(id),
            Err(e) => tracing::warn!(error = %e, gain = id, "could not release gain bus"),
        }
    }

    fn play_oscillator(&mut self, note: OscillatorNote) -> Result<(), DeviceError> {
        if self.mixer()?.add_oscillator(note) {
            return Ok(());
        }
        match note.route {
            Route::Gain(id) => Err(DeviceError::UnknownGain(id)),
            Route::Destination => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_opens_suspended() {
        // This test may fail on systems without audio devices
        match CpalOutputDevice::open() {
            Ok(device) => {
                assert!(device.is_suspended());
                assert!(device.sample_rate() > 0);
            }
            Err(_) => {
                println!("CpalOutputDevice::open failed - likely no audio device available");
            }
        }
    }
}
