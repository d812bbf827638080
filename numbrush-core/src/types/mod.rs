pub mod audio_config;
pub mod level;
pub mod scheduled_event;

pub use audio_config::{gain, OscillatorEnvelope, ToneSpec, Waveform};
pub use level::{Color, Geometry, Instruction, Level, LevelData, Section};
pub use scheduled_event::{Liveness, ScheduledAction, ScheduledEvent};
