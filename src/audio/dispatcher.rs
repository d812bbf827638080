//! Audio dispatcher thread
//!
//! Owns the [`AudioScheduler`] and its output device on a dedicated thread.
//! The game side talks to it through a cloneable [`SchedulerHandle`]; the
//! thread sleeps until either a command arrives or the next timer is due,
//! then fires everything that has come due against a monotonic clock.

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use numbrush_core::audio::{AudioOutputDevice, AudioScheduler};
use numbrush_core::game::SoundCue;
use rand::rngs::ThreadRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// How long to wait for commands when nothing is scheduled
const IDLE_WAIT: Duration = Duration::from_secs(1);

/// Snapshot of the engine flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioStatus {
    pub enabled: bool,
    pub music_playing: bool,
    pub has_output: bool,
    pub pending: usize,
}

/// Commands that can be sent to the dispatcher
#[derive(Debug)]
pub enum SchedulerCommand {
    /// Play a named sound by key
    PlaySound(String),
    StartMusic,
    StopMusic,
    SuccessSequence,
    AmbientSparkle,
    /// Flip the enabled flag and report the new value
    ToggleSound(Sender<bool>),
    Status(Sender<AudioStatus>),
    Shutdown,
}

/// Handle for sending commands to the dispatcher thread
#[derive(Clone)]
pub struct SchedulerHandle {
    command_tx: Sender<SchedulerCommand>,
    is_running: Arc<AtomicBool>,
}

impl SchedulerHandle {
    /// Start the dispatcher thread. `open_device` runs on that thread, since
    /// platform streams generally can't move between threads.
    pub fn spawn<F>(open_device: F) -> Self
    where
        F: FnOnce() -> Option<Box<dyn AudioOutputDevice>> + Send + 'static,
    {
        let (command_tx, command_rx) = unbounded();
        let is_running = Arc::new(AtomicBool::new(true));
        let is_running_clone = is_running.clone();

        thread::spawn(move || {
            let dispatcher = AudioDispatcher {
                scheduler: AudioScheduler::new(open_device()),
                command_rx,
                started: Instant::now(),
                rng: rand::thread_rng(),
                is_running: is_running_clone,
            };
            dispatcher.run_loop();
        });

        SchedulerHandle {
            command_tx,
            is_running,
        }
    }

    /// A dispatcher with no output device: every sound is a no-op
    pub fn silent() -> Self {
        Self::spawn(|| None)
    }

    pub fn play_sound(&self, name: &str) {
        let _ = self
            .command_tx
            .send(SchedulerCommand::PlaySound(name.to_string()));
    }

    pub fn start_background_music(&self) {
        let _ = self.command_tx.send(SchedulerCommand::StartMusic);
    }

    pub fn stop_background_music(&self) {
        let _ = self.command_tx.send(SchedulerCommand::StopMusic);
    }

    pub fn play_success_sequence(&self) {
        let _ = self.command_tx.send(SchedulerCommand::SuccessSequence);
    }

    pub fn play_ambient_sparkle(&self) {
        let _ = self.command_tx.send(SchedulerCommand::AmbientSparkle);
    }

    /// Send the sounds attached to a click outcome
    pub fn play_cues(&self, cues: &[SoundCue]) {
        for cue in cues {
            match cue {
                SoundCue::Named(sound) => self.play_sound(sound.as_str()),
                SoundCue::SuccessSequence => self.play_success_sequence(),
            }
        }
    }

    /// Flip sound on or off. Returns the new value, or false if the
    /// dispatcher has gone away.
    pub fn toggle_sound(&self) -> bool {
        let (reply_tx, reply_rx) = bounded(1);
        if self
            .command_tx
            .send(SchedulerCommand::ToggleSound(reply_tx))
            .is_err()
        {
            return false;
        }
        reply_rx.recv().unwrap_or(false)
    }

    pub fn status(&self) -> Option<AudioStatus> {
        let (reply_tx, reply_rx) = bounded(1);
        self.command_tx
            .send(SchedulerCommand::Status(reply_tx))
            .ok()?;
        reply_rx.recv().ok()
    }

    /// Shutdown the dispatcher. Background music is stopped first.
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(SchedulerCommand::Shutdown);
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Relaxed)
    }
}

struct AudioDispatcher {
    scheduler: AudioScheduler,
    command_rx: Receiver<SchedulerCommand>,
    started: Instant,
    rng: ThreadRng,
    is_running: Arc<AtomicBool>,
}

impl AudioDispatcher {
    fn run_loop(mut self) {
        loop {
            let wait = match self.scheduler.next_due() {
                Some(due) => due.saturating_sub(self.started.elapsed()),
                None => IDLE_WAIT,
            };

            crossbeam_channel::select! {
                recv(self.command_rx) -> msg => match msg {
                    Ok(cmd) => {
                        // Timers that came due while we were blocked fire first
                        self.scheduler.run_due(self.started.elapsed());
                        if !self.handle_command(cmd) {
                            break;
                        }
                    }
                    Err(_) => break,
                },
                default(wait) => {}
            }

            self.scheduler.run_due(self.started.elapsed());
        }

        self.scheduler.stop_background_music();
        self.is_running.store(false, Ordering::Relaxed);
        tracing::debug!("audio dispatcher stopped");
    }

    /// Handle a command, returns false if should shutdown
    fn handle_command(&mut self, cmd: SchedulerCommand) -> bool {
        match cmd {
            SchedulerCommand::PlaySound(name) => self.scheduler.play_sound(&name),
            SchedulerCommand::StartMusic => self.scheduler.start_background_music(),
            SchedulerCommand::StopMusic => self.scheduler.stop_background_music(),
            SchedulerCommand::SuccessSequence => self.scheduler.play_success_sequence(),
            SchedulerCommand::AmbientSparkle => {
                self.scheduler.play_ambient_sparkle(&mut self.rng)
            }
            SchedulerCommand::ToggleSound(reply) => {
                let _ = reply.send(self.scheduler.toggle_sound());
            }
            SchedulerCommand::Status(reply) => {
                let _ = reply.send(AudioStatus {
                    enabled: self.scheduler.is_enabled(),
                    music_playing: self.scheduler.is_music_playing(),
                    has_output: self.scheduler.has_output(),
                    pending: self.scheduler.pending(),
                });
            }
            SchedulerCommand::Shutdown => return false,
        }
        true
    }
}
