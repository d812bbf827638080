pub mod campaign;
pub mod session;

pub use campaign::{Campaign, LEVEL_ADVANCE_DELAY};
pub use session::{ClickOutcome, GameSession, SessionState, SoundCue};
