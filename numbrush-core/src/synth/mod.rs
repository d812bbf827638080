//! Procedural sound synthesis
//!
//! - `tone`: the tone synthesizer (waveform × envelope × master gain)
//! - `catalogue`: named sound effects and their render cache

pub mod catalogue;
pub mod tone;

pub use catalogue::{SoundCache, SoundName, UnknownSound};
pub use tone::{synthesize, Envelope, ToneBuffer};
