//! Engine flags: sound on/off and the background-music run
//!
//! Every scheduling decision reads from here, so the enabled flag, the
//! music-active flag, the loop generation and the music bus always change
//! together.

use super::device::GainId;

#[derive(Debug, Clone)]
pub struct EngineState {
    enabled: bool,
    music_active: bool,
    /// Bumped whenever a melody run starts or stops
    generation: u64,
    music_bus: Option<GainId>,
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            enabled: true,
            music_active: false,
            generation: 0,
            music_bus: None,
        }
    }
}

impl EngineState {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Flip the enabled flag and return the new value
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    pub fn is_music_active(&self) -> bool {
        self.music_active
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn music_bus(&self) -> Option<GainId> {
        self.music_bus
    }

    /// Mark a new melody run as active on `bus`, returning its generation
    pub fn begin_music(&mut self, bus: GainId) -> u64 {
        self.generation += 1;
        self.music_active = true;
        self.music_bus = Some(bus);
        self.generation
    }

    /// End the current run, handing back its bus for release
    pub fn end_music(&mut self) -> Option<GainId> {
        if self.music_active {
            self.generation += 1;
        }
        self.music_active = false;
        self.music_bus.take()
    }

    /// Whether an event tagged with `generation` may still produce output
    pub fn is_current_melody(&self, generation: u64) -> bool {
        self.enabled
            && self.music_active
            && self.music_bus.is_some()
            && self.generation == generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = EngineState::default();
        assert!(state.is_enabled());
        assert!(!state.is_music_active());
        assert_eq!(state.music_bus(), None);
    }

    #[test]
    fn test_toggle_twice_restores() {
        let mut state = EngineState::default();
        assert!(!state.toggle());
        assert!(state.toggle());
    }

    #[test]
    fn test_generation_invalidates_previous_run() {
        let mut state = EngineState::default();
        let first = state.begin_music(7);
        assert!(state.is_current_melody(first));

        assert_eq!(state.end_music(), Some(7));
        assert!(!state.is_current_melody(first));

        let second = state.begin_music(8);
        assert_ne!(first, second);
        assert!(!state.is_current_melody(first));
        assert!(state.is_current_melody(second));
    }

    #[test]
    fn test_end_music_is_idempotent() {
        let mut state = EngineState::default();
        state.begin_music(1);
        assert_eq!(state.end_music(), Some(1));
        let generation = state.generation();
        assert_eq!(state.end_music(), None);
        assert_eq!(state.generation(), generation);
    }

    #[test]
    fn test_disabled_engine_has_no_current_melody() {
        let mut state = EngineState::default();
        let generation = state.begin_music(1);
        state.toggle();
        assert!(!state.is_current_melody(generation));
    }
}
