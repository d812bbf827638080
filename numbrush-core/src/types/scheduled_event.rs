//! Scheduled event types for the audio timer queue
//!
//! Every delayed action the engine performs is one of these. Events are
//! ordered by due time, and by scheduling order among events due at the same
//! instant, so a `BinaryHeap` pops them in the order they were meant to fire.

use crate::synth::SoundName;
use crate::types::audio_config::ToneSpec;
use std::cmp::Ordering;
use std::time::Duration;

/// Which owner an event belongs to, checked again right before it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    /// Lives as long as the engine is enabled
    Engine,
    /// Belongs to one run of the melody loop
    Melody(u64),
}

/// Actions that can be scheduled for future execution
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduledAction {
    /// Play a cached named sound
    PlaySound(SoundName),
    /// Play a one-off oscillator tone straight to the output
    PlayTone(ToneSpec),
    /// Play one melody note into the background-music bus
    MelodyNote(f32),
    /// Schedule the next pass of the melody loop
    MelodyContinue,
}

/// An action due at a point on the scheduler's clock
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledEvent {
    /// When to fire, measured from the scheduler's epoch
    pub due: Duration,
    /// Tie-breaker: lower fires first among equal `due`
    pub sequence: u64,
    pub action: ScheduledAction,
    pub liveness: Liveness,
}

impl ScheduledEvent {
    pub fn new(due: Duration, sequence: u64, action: ScheduledAction, liveness: Liveness) -> Self {
        Self {
            due,
            sequence,
            action,
            liveness,
        }
    }
}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap behavior (earliest first)
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl Eq for ScheduledEvent {}
