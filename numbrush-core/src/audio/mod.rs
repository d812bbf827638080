//! Audio engine: the device seam, engine state and the scheduler
pub mod device;
pub mod scheduler;
pub mod state;

pub use device::{ensure_running, AudioOutputDevice, GainId, OscillatorNote, Route};
pub use scheduler::AudioScheduler;
pub use state::EngineState;
