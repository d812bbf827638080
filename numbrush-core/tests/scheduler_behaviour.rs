use numbrush_core::audio::{AudioOutputDevice, AudioScheduler, GainId, OscillatorNote, Route};
use numbrush_core::error::DeviceError;
use numbrush_core::synth::ToneBuffer;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// What reached the device, stamped with the scheduler clock at the time
#[derive(Debug, Clone, PartialEq)]
enum Output {
    Buffer { samples: usize, gain: f32 },
    Note(OscillatorNote),
}

#[derive(Default)]
struct Recording {
    outputs: Vec<Output>,
    resumes: usize,
    gains_created: Vec<(GainId, f32)>,
    gains_released: Vec<GainId>,
    fail_resume: bool,
    fail_emit: bool,
}

struct RecordingDevice {
    rec: Rc<RefCell<Recording>>,
    suspended: bool,
    next_gain: GainId,
}

impl AudioOutputDevice for RecordingDevice {
    fn sample_rate(&self) -> u32 {
        8000
    }

    fn is_suspended(&self) -> bool {
        self.suspended
    }

    fn resume(&mut self) -> Result<(), DeviceError> {
        let mut rec = self.rec.borrow_mut();
        rec.resumes += 1;
        if rec.fail_resume {
            return Err(DeviceError::Resume("blocked by autoplay policy".into()));
        }
        self.suspended = false;
        Ok(())
    }

    fn play_buffer(&mut self, buffer: &ToneBuffer, gain: f32) -> Result<(), DeviceError> {
        let mut rec = self.rec.borrow_mut();
        if rec.fail_emit {
            return Err(DeviceError::Emit("device lost".into()));
        }
        rec.outputs.push(Output::Buffer {
            samples: buffer.len(),
            gain,
        });
        Ok(())
    }

    fn create_persistent_gain(&mut self, gain: f32) -> Result<GainId, DeviceError> {
        self.next_gain += 1;
        self.rec.borrow_mut().gains_created.push((self.next_gain, gain));
        Ok(self.next_gain)
    }

    fn release_gain(&mut self, id: GainId) {
        self.rec.borrow_mut().gains_released.push(id);
    }

    fn play_oscillator(&mut self, note: OscillatorNote) -> Result<(), DeviceError> {
        let mut rec = self.rec.borrow_mut();
        if rec.fail_emit {
            return Err(DeviceError::Emit("device lost".into()));
        }
        rec.outputs.push(Output::Note(note));
        Ok(())
    }
}

fn engine() -> (AudioScheduler, Rc<RefCell<Recording>>) {
    let rec = Rc::new(RefCell::new(Recording::default()));
    let device = RecordingDevice {
        rec: rec.clone(),
        suspended: true,
        next_gain: 0,
    };
    (AudioScheduler::new(Some(Box::new(device))), rec)
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn melody_notes(rec: &Recording) -> Vec<f32> {
    rec.outputs
        .iter()
        .filter_map(|o| match o {
            Output::Note(note) if matches!(note.route, Route::Gain(_)) => Some(note.frequency),
            _ => None,
        })
        .collect()
}

#[test]
fn test_play_sound_uses_cached_buffer_at_fixed_gain() {
    let (mut engine, rec) = engine();
    engine.play_sound("levelComplete");

    let rec = rec.borrow();
    assert_eq!(rec.resumes, 1);
    // 0.6 s at 8 kHz
    assert_eq!(
        rec.outputs,
        vec![Output::Buffer {
            samples: 4800,
            gain: 0.4
        }]
    );
}

#[test]
fn test_no_device_means_silent_no_ops() {
    let mut engine = AudioScheduler::new(None);
    assert!(!engine.has_output());
    assert!(engine.sounds().is_empty());

    engine.play_sound("click");
    engine.start_background_music();
    engine.play_success_sequence();
    engine.stop_background_music();
    assert_eq!(engine.pending(), 0);
    assert!(!engine.is_music_playing());

    // Toggling still works as a flag
    assert!(!engine.toggle_sound());
    assert!(engine.toggle_sound());
}

#[test]
fn test_failed_resume_drops_output_quietly() {
    let (mut engine, rec) = engine();
    rec.borrow_mut().fail_resume = true;

    engine.play_sound("click");
    engine.start_background_music();

    let rec = rec.borrow();
    assert!(rec.outputs.is_empty());
    assert!(rec.gains_created.is_empty());
    assert!(!engine.is_music_playing());
}

#[test]
fn test_emit_failure_is_swallowed() {
    let (mut engine, rec) = engine();
    rec.borrow_mut().fail_emit = true;
    engine.play_sound("click");
    engine.play_success_sequence();
    engine.run_due(ms(1000));
    assert!(rec.borrow().outputs.is_empty());
    assert_eq!(engine.pending(), 0);
}

#[test]
fn test_melody_loop_plays_and_repeats() {
    let (mut engine, rec) = engine();
    engine.start_background_music();
    assert!(engine.is_music_playing());
    assert_eq!(rec.borrow().gains_created, vec![(1, 0.1)]);

    engine.run_due(ms(0));
    assert_eq!(melody_notes(&rec.borrow()), vec![523.0]);

    engine.run_due(ms(7499));
    assert_eq!(
        melody_notes(&rec.borrow()),
        vec![523.0, 587.0, 659.0, 784.0, 880.0]
    );

    // The continuation fires at 7.5 s and immediately starts the next pass
    engine.run_due(ms(7500));
    assert_eq!(melody_notes(&rec.borrow()).len(), 6);

    let rec = rec.borrow();
    let Some(Output::Note(note)) = rec.outputs.last() else {
        panic!("expected a melody note");
    };
    assert_eq!(note.frequency, 523.0);
    assert_eq!(note.duration, 1.5);
    assert_eq!(note.route, Route::Gain(1));
}

#[test]
fn test_start_twice_is_one_chain() {
    let (mut engine, rec) = engine();
    engine.start_background_music();
    engine.start_background_music();
    assert_eq!(rec.borrow().gains_created.len(), 1);

    // Tick the clock the way the dispatcher does so each continuation fires
    // on time
    for t in (0..=15_000).step_by(100) {
        engine.run_due(ms(t));
    }
    // Two full passes plus the first note of the third, never doubled
    assert_eq!(melody_notes(&rec.borrow()).len(), 11);
    assert_eq!(rec.borrow().gains_created.len(), 1);
}

#[test]
fn test_stop_silences_within_one_period() {
    let (mut engine, rec) = engine();
    engine.start_background_music();
    engine.run_due(ms(3000));
    let before = melody_notes(&rec.borrow()).len();

    engine.stop_background_music();
    assert!(!engine.is_music_playing());
    assert_eq!(rec.borrow().gains_released, vec![1]);

    engine.run_due(ms(3000) + ms(7500));
    engine.run_due(ms(60_000));
    assert_eq!(melody_notes(&rec.borrow()).len(), before);
    assert_eq!(engine.pending(), 0);

    // Stopping again changes nothing
    engine.stop_background_music();
    assert_eq!(rec.borrow().gains_released, vec![1]);
}

#[test]
fn test_quick_restart_does_not_resurrect_old_chain() {
    let (mut engine, rec) = engine();
    engine.start_background_music();
    engine.run_due(ms(1000));
    engine.stop_background_music();
    engine.start_background_music();

    engine.run_due(ms(1000 + 7499));
    // Only the new run's notes: the first at 1.0 s plus one pass from there
    let notes = melody_notes(&rec.borrow());
    assert_eq!(notes.len(), 1 + 5);
    assert_eq!(&notes[1..], &[523.0, 587.0, 659.0, 784.0, 880.0]);
}

#[test]
fn test_success_sequence_timing_and_contents() {
    let (mut engine, rec) = engine();
    engine.play_success_sequence();
    assert_eq!(engine.pending(), 7);

    let mut fired_at = Vec::new();
    for t in (0..=800).step_by(40) {
        let before = rec.borrow().outputs.len();
        engine.run_due(ms(t));
        for _ in before..rec.borrow().outputs.len() {
            fired_at.push(t);
        }
    }
    assert_eq!(fired_at, vec![0, 120, 240, 360, 480, 600, 800]);

    let rec = rec.borrow();
    let tones: Vec<f32> = rec.outputs[..5]
        .iter()
        .map(|o| match o {
            Output::Note(note) => {
                assert_eq!(note.route, Route::Destination);
                assert_eq!(note.duration, 0.3);
                note.frequency
            }
            other => panic!("expected a tone, got {:?}", other),
        })
        .collect();
    assert_eq!(tones, vec![523.0, 659.0, 784.0, 1047.0, 1319.0]);

    // sparkle (0.2 s) then magical (0.3 s) at 8 kHz
    assert_eq!(
        rec.outputs[5..],
        [
            Output::Buffer {
                samples: 1600,
                gain: 0.4
            },
            Output::Buffer {
                samples: 2400,
                gain: 0.4
            },
        ]
    );
}

#[test]
fn test_disabling_mid_sequence_drops_remaining_steps() {
    let (mut engine, rec) = engine();
    engine.play_success_sequence();
    engine.run_due(ms(130));
    assert_eq!(rec.borrow().outputs.len(), 2);

    assert!(!engine.toggle_sound());
    engine.run_due(ms(1000));
    assert_eq!(rec.borrow().outputs.len(), 2);
    assert_eq!(engine.pending(), 0);
}

#[test]
fn test_toggle_off_stops_music_and_blocks_everything() {
    let (mut engine, rec) = engine();
    engine.start_background_music();
    assert!(!engine.toggle_sound());
    assert!(!engine.is_enabled());
    assert!(!engine.is_music_playing());
    assert_eq!(rec.borrow().gains_released, vec![1]);

    engine.play_sound("click");
    engine.play_success_sequence();
    engine.start_background_music();
    engine.run_due(ms(20_000));
    assert!(rec.borrow().outputs.is_empty());

    // Re-enabling resumes nothing by itself
    assert!(engine.toggle_sound());
    assert!(!engine.is_music_playing());
    engine.run_due(ms(40_000));
    assert!(rec.borrow().outputs.is_empty());
}
