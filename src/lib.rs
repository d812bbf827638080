//! # Numbrush
//!
//! Terminal front end for the Numbrush color-by-numbers game. The game
//! rules, tone synthesis and audio scheduling live in `numbrush-core`; this
//! crate adds what a desktop needs around them:
//!
//! - `audio`: a cpal output device with a small software mixer, and the
//!   dispatcher thread that owns the scheduler and drives its timers.
//! - `commands`: the REPL command registry and handlers.
//! - `levels`: the embedded level catalogue and JSON loading.
//! - `repl`: the interactive loop, level-advance timer and file watching.

pub mod audio;
pub mod commands;
pub mod levels;
pub mod repl;

pub use crate::audio::SchedulerHandle;
pub use crate::commands::{CommandContext, GameOptions};
pub use crate::repl::Repl;
