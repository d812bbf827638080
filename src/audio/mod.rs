//! Native audio output: the cpal-backed device and the dispatcher thread

pub mod dispatcher;
pub mod mixer;
pub mod output;

pub use dispatcher::{AudioStatus, SchedulerCommand, SchedulerHandle};
pub use output::CpalOutputDevice;

use numbrush_core::audio::AudioOutputDevice;

/// Open the default output device, or log why it could not be opened and
/// fall back to a silent engine.
pub fn open_default_device() -> Option<Box<dyn AudioOutputDevice>> {
    match CpalOutputDevice::open() {
        Ok(device) => Some(Box::new(device)),
        Err(e) => {
            tracing::warn!(error = %e, "audio output unavailable, continuing without sound");
            None
        }
    }
}
