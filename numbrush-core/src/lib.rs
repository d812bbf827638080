//! # Numbrush Core
//!
//! Platform-free core of the Numbrush color-by-numbers game: the puzzle state
//! machine, level progression, the procedural tone synthesizer and the
//! audio scheduler. Output hardware is reached only through the
//! [`audio::AudioOutputDevice`] trait, so everything here runs the same
//! natively, under test and in WebAssembly.
//!
//! ## Features
//!
//! - **serde**: Enable (de)serialization of levels and audio types
//! - **wasm**: Enable WASM bindings via wasm-bindgen
//!
//! ## Example
//!
//! ```
//! use numbrush_core::game::{ClickOutcome, GameSession};
//! use numbrush_core::types::{Level, Section};
//! use std::sync::Arc;
//!
//! let level = Level::new(
//!     "Dot",
//!     vec![Section::new(1, "#FFD700")],
//!     vec!["#FFD700".into()],
//! )?;
//! let mut session = GameSession::new(Arc::new(level));
//! session.select_color("#FFD700");
//! assert_eq!(session.click_section(1), ClickOutcome::LevelComplete);
//! # Ok::<(), numbrush_core::error::LevelError>(())
//! ```

pub mod audio;
pub mod error;
pub mod game;
pub mod synth;
pub mod types;
pub mod wasm;

// Re-export commonly used types
pub use audio::{AudioOutputDevice, AudioScheduler};
pub use error::{DeviceError, LevelError, SynthError};
pub use game::{Campaign, ClickOutcome, GameSession, SoundCue};
pub use synth::{SoundName, ToneBuffer};
pub use types::{Color, Level, Section, ToneSpec, Waveform};
