//! Audio scheduler
//!
//! Owns the named-sound cache, the engine flags and a timer queue of
//! [`ScheduledEvent`]s. It never sleeps or spawns: callers push work in, and
//! a driver calls [`AudioScheduler::run_due`] with the current time to fire
//! whatever has come due. Cancellation is cooperative. Stopping flips a flag
//! and bumps a generation, and each event checks both right before it
//! produces output.
//!
//! Device failures are logged and swallowed here; nothing in this module
//! returns an error to the caller.

use super::device::{ensure_running, AudioOutputDevice, OscillatorNote, Route};
use super::state::EngineState;
use crate::synth::{SoundCache, SoundName};
use crate::types::audio_config::{gain, OscillatorEnvelope, ToneSpec, Waveform};
use crate::types::scheduled_event::{Liveness, ScheduledAction, ScheduledEvent};
use rand::Rng;
use std::collections::BinaryHeap;
use std::time::Duration;

/// C major pentatonic: C, D, E, G, A
pub const MELODY: [f32; 5] = [523.0, 587.0, 659.0, 784.0, 880.0];
/// Each melody note lasts this long and the next starts right after it
pub const MELODY_NOTE: Duration = Duration::from_millis(1500);
/// One full pass over the melody
pub const MELODY_PERIOD: Duration = Duration::from_millis(1500 * MELODY.len() as u64);

/// C, E, G, C, E: an extended major chord
pub const SUCCESS_ARPEGGIO: [f32; 5] = [523.0, 659.0, 784.0, 1047.0, 1319.0];
pub const SUCCESS_STEP: Duration = Duration::from_millis(120);
pub const SUCCESS_TONE_SECONDS: f32 = 0.3;
pub const SUCCESS_SPARKLE_AT: Duration = Duration::from_millis(600);
pub const SUCCESS_MAGICAL_AT: Duration = Duration::from_millis(800);

pub const AMBIENT_SPARKLE_FREQUENCIES: [f32; 4] = [1047.0, 1319.0, 1568.0, 1760.0];
pub const AMBIENT_SPARKLE_MAX_DELAY_MS: u64 = 2000;
pub const AMBIENT_SPARKLE_SECONDS: f32 = 0.3;

pub struct AudioScheduler {
    device: Option<Box<dyn AudioOutputDevice>>,
    sounds: SoundCache,
    state: EngineState,
    queue: BinaryHeap<ScheduledEvent>,
    /// Latest time seen by `run_due`; new events are scheduled from here
    clock: Duration,
    next_sequence: u64,
}

impl AudioScheduler {
    /// Build an engine and render the sound catalogue at the device's rate.
    ///
    /// With no device the engine still constructs, and every call on it is a
    /// silent no-op.
    pub fn new(device: Option<Box<dyn AudioOutputDevice>>) -> Self {
        let sounds = match &device {
            Some(device) => SoundCache::build(device.sample_rate()),
            None => {
                tracing::warn!("no audio output available; sound is disabled for this session");
                SoundCache::empty()
            }
        };

        Self {
            device,
            sounds,
            state: EngineState::default(),
            queue: BinaryHeap::new(),
            clock: Duration::ZERO,
            next_sequence: 0,
        }
    }

    pub fn has_output(&self) -> bool {
        self.device.is_some()
    }

    pub fn is_enabled(&self) -> bool {
        self.state.is_enabled()
    }

    pub fn is_music_playing(&self) -> bool {
        self.state.is_music_active()
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn sounds(&self) -> &SoundCache {
        &self.sounds
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// Due time of the earliest pending event
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.peek().map(|event| event.due)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Advance the clock to `now` and fire every event due by then, in due
    /// order. Returns how many events were taken off the queue.
    ///
    /// The clock never moves backwards.
    pub fn run_due(&mut self, now: Duration) -> usize {
        self.clock = self.clock.max(now);
        let mut fired = 0;
        while self
            .queue
            .peek()
            .is_some_and(|event| event.due <= self.clock)
        {
            if let Some(event) = self.queue.pop() {
                self.fire(event);
                fired += 1;
            }
        }
        fired
    }

    /// Play a catalogue sound by its key. Unknown keys are ignored.
    pub fn play_sound(&mut self, name: &str) {
        match name.parse::<SoundName>() {
            Ok(sound) => self.play(sound),
            Err(e) => tracing::debug!(%e, "ignoring request"),
        }
    }

    /// Play a catalogue sound at the named-sound gain
    pub fn play(&mut self, sound: SoundName) {
        if !self.state.is_enabled() {
            tracing::debug!(%sound, "sound disabled");
            return;
        }
        let Some(device) = self.device.as_deref_mut() else {
            return;
        };
        let Some(buffer) = self.sounds.get(sound) else {
            return;
        };
        if !ensure_running(device) {
            return;
        }
        if let Err(e) = device.play_buffer(buffer, gain::NAMED_SOUND) {
            tracing::warn!(%sound, error = %e, "failed to play sound");
        }
    }

    /// Start the looping background melody. Does nothing if it is already
    /// running or sound is off.
    pub fn start_background_music(&mut self) {
        if !self.state.is_enabled() || self.state.is_music_active() {
            return;
        }
        let Some(device) = self.device.as_deref_mut() else {
            return;
        };
        if !ensure_running(device) {
            return;
        }
        let bus = match device.create_persistent_gain(gain::BACKGROUND_MUSIC) {
            Ok(bus) => bus,
            Err(e) => {
                tracing::warn!(error = %e, "failed to start background music");
                return;
            }
        };

        let generation = self.state.begin_music(bus);
        tracing::info!(generation, "background music started");
        self.schedule_melody_pass(generation);
    }

    /// Stop the background melody and release its bus. Safe to call at any
    /// time, any number of times.
    pub fn stop_background_music(&mut self) {
        let was_active = self.state.is_music_active();
        if let Some(bus) = self.state.end_music() {
            if let Some(device) = self.device.as_deref_mut() {
                device.release_gain(bus);
            }
        }
        self.queue
            .retain(|event| !matches!(event.liveness, Liveness::Melody(_)));
        if was_active {
            tracing::info!("background music stopped");
        }
    }

    /// Rising arpeggio followed by the sparkle and magical cues
    pub fn play_success_sequence(&mut self) {
        if !self.state.is_enabled() || self.device.is_none() {
            return;
        }
        for (step, frequency) in SUCCESS_ARPEGGIO.into_iter().enumerate() {
            let tone = ToneSpec::preset(frequency, SUCCESS_TONE_SECONDS, Waveform::Sine);
            self.schedule(
                SUCCESS_STEP * step as u32,
                ScheduledAction::PlayTone(tone),
                Liveness::Engine,
            );
        }
        self.schedule(
            SUCCESS_SPARKLE_AT,
            ScheduledAction::PlaySound(SoundName::Sparkle),
            Liveness::Engine,
        );
        self.schedule(
            SUCCESS_MAGICAL_AT,
            ScheduledAction::PlaySound(SoundName::Magical),
            Liveness::Engine,
        );
    }

    /// One high, soft tone at a random pitch after a random short delay
    pub fn play_ambient_sparkle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if !self.state.is_enabled() || self.device.is_none() {
            return;
        }
        let frequency =
            AMBIENT_SPARKLE_FREQUENCIES[rng.gen_range(0..AMBIENT_SPARKLE_FREQUENCIES.len())];
        let delay = Duration::from_millis(rng.gen_range(0..AMBIENT_SPARKLE_MAX_DELAY_MS));
        let tone = ToneSpec::preset(frequency, AMBIENT_SPARKLE_SECONDS, Waveform::Sine);
        self.schedule(delay, ScheduledAction::PlayTone(tone), Liveness::Engine);
    }

    /// Flip sound on or off and return the new setting. Turning sound off
    /// also stops the music; turning it on starts nothing.
    pub fn toggle_sound(&mut self) -> bool {
        let enabled = self.state.toggle();
        if !enabled {
            self.stop_background_music();
        }
        tracing::debug!(enabled, "sound toggled");
        enabled
    }

    fn schedule(&mut self, delay: Duration, action: ScheduledAction, liveness: Liveness) {
        let event = ScheduledEvent::new(self.clock + delay, self.next_sequence, action, liveness);
        self.next_sequence += 1;
        self.queue.push(event);
    }

    /// Queue one pass of the melody plus the continuation that queues the next
    fn schedule_melody_pass(&mut self, generation: u64) {
        for (index, frequency) in MELODY.into_iter().enumerate() {
            self.schedule(
                MELODY_NOTE * index as u32,
                ScheduledAction::MelodyNote(frequency),
                Liveness::Melody(generation),
            );
        }
        self.schedule(
            MELODY_PERIOD,
            ScheduledAction::MelodyContinue,
            Liveness::Melody(generation),
        );
    }

    fn fire(&mut self, event: ScheduledEvent) {
        match event.liveness {
            Liveness::Engine if !self.state.is_enabled() => {
                tracing::debug!(action = ?event.action, "dropping event, sound disabled");
                return;
            }
            Liveness::Melody(generation) if !self.state.is_current_melody(generation) => {
                tracing::debug!(generation, "dropping stale melody event");
                return;
            }
            _ => {}
        }

        match event.action {
            ScheduledAction::PlaySound(sound) => self.play(sound),
            ScheduledAction::PlayTone(tone) => self.emit_oscillator(OscillatorNote {
                frequency: tone.frequency,
                waveform: tone.waveform,
                duration: tone.duration,
                envelope: OscillatorEnvelope::raw_tone(),
                route: Route::Destination,
            }),
            ScheduledAction::MelodyNote(frequency) => {
                if let Some(bus) = self.state.music_bus() {
                    self.emit_oscillator(OscillatorNote {
                        frequency,
                        waveform: Waveform::Sine,
                        duration: MELODY_NOTE.as_secs_f32(),
                        envelope: OscillatorEnvelope::background_note(),
                        route: Route::Gain(bus),
                    });
                }
            }
            ScheduledAction::MelodyContinue => {
                if let Liveness::Melody(generation) = event.liveness {
                    self.schedule_melody_pass(generation);
                }
            }
        }
    }

    fn emit_oscillator(&mut self, note: OscillatorNote) {
        let Some(device) = self.device.as_deref_mut() else {
            return;
        };
        if !ensure_running(device) {
            return;
        }
        if let Err(e) = device.play_oscillator(note) {
            tracing::warn!(frequency = note.frequency, error = %e, "failed to play tone");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::device::GainId;
    use crate::error::DeviceError;
    use crate::synth::ToneBuffer;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        buffers: usize,
        notes: Vec<OscillatorNote>,
        resumes: usize,
    }

    struct StubDevice {
        log: Rc<RefCell<Log>>,
        suspended: bool,
    }

    impl AudioOutputDevice for StubDevice {
        fn sample_rate(&self) -> u32 {
            8000
        }
        fn is_suspended(&self) -> bool {
            self.suspended
        }
        fn resume(&mut self) -> Result<(), DeviceError> {
            self.log.borrow_mut().resumes += 1;
            self.suspended = false;
            Ok(())
        }
        fn play_buffer(&mut self, _buffer: &ToneBuffer, _gain: f32) -> Result<(), DeviceError> {
            self.log.borrow_mut().buffers += 1;
            Ok(())
        }
        fn create_persistent_gain(&mut self, _gain: f32) -> Result<GainId, DeviceError> {
            Ok(1)
        }
        fn release_gain(&mut self, _id: GainId) {}
        fn play_oscillator(&mut self, note: OscillatorNote) -> Result<(), DeviceError> {
            self.log.borrow_mut().notes.push(note);
            Ok(())
        }
    }

    fn scheduler() -> (AudioScheduler, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        let device = StubDevice {
            log: log.clone(),
            suspended: true,
        };
        (AudioScheduler::new(Some(Box::new(device))), log)
    }

    #[test]
    fn test_melody_period() {
        assert_eq!(MELODY_PERIOD, Duration::from_millis(7500));
    }

    #[test]
    fn test_first_sound_resumes_device_once() {
        let (mut engine, log) = scheduler();
        engine.play_sound("click");
        engine.play_sound("sparkle");
        assert_eq!(log.borrow().resumes, 1);
        assert_eq!(log.borrow().buffers, 2);
    }

    #[test]
    fn test_unknown_sound_is_ignored() {
        let (mut engine, log) = scheduler();
        engine.play_sound("trumpet");
        assert_eq!(log.borrow().buffers, 0);
        assert_eq!(log.borrow().resumes, 0);
    }

    #[test]
    fn test_clock_never_moves_backwards() {
        let (mut engine, _log) = scheduler();
        engine.run_due(Duration::from_secs(5));
        engine.run_due(Duration::from_secs(2));
        assert_eq!(engine.clock(), Duration::from_secs(5));
    }

    #[test]
    fn test_success_sequence_offsets_follow_clock() {
        let (mut engine, log) = scheduler();
        engine.run_due(Duration::from_secs(10));
        engine.play_success_sequence();
        assert_eq!(engine.next_due(), Some(Duration::from_secs(10)));

        engine.run_due(Duration::from_millis(10_250));
        let frequencies: Vec<f32> = log.borrow().notes.iter().map(|n| n.frequency).collect();
        assert_eq!(frequencies, vec![523.0, 659.0, 784.0]);
    }

    #[test]
    fn test_ambient_sparkle_uses_catalogue_pitches() {
        use rand::rngs::SmallRng;
        use rand::SeedableRng;

        let (mut engine, log) = scheduler();
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..8 {
            engine.play_ambient_sparkle(&mut rng);
        }
        assert_eq!(engine.pending(), 8);
        assert!(engine.next_due().unwrap() < Duration::from_millis(2000));

        engine.run_due(Duration::from_millis(2000));
        let log = log.borrow();
        assert_eq!(log.notes.len(), 8);
        for note in &log.notes {
            assert!(AMBIENT_SPARKLE_FREQUENCIES.contains(&note.frequency));
            assert_eq!(note.route, Route::Destination);
        }
    }
}
