//! Puzzle state machine for a single attempt at a level
//!
//! The player selects a color, then clicks a section. Only the current
//! instruction's section, clicked with the instruction's color, makes
//! progress. Everything else is either ignored or answered with soft
//! feedback. No input is an error.

use crate::synth::SoundName;
use crate::types::{Color, Instruction, Level};
use std::collections::HashMap;
use std::sync::Arc;

/// Coarse session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// There is an instruction waiting to be satisfied
    InProgress,
    /// Every section is filled; waiting for the caller to move on
    LevelComplete,
}

/// What a click did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Nothing to do: no instruction, or no color selected
    NoOp,
    /// The instruction was satisfied and another one follows
    CorrectMatch,
    /// Wrong section or wrong color; nothing changed
    Feedback,
    /// The instruction was satisfied and it was the last one
    LevelComplete,
}

/// A sound the surrounding UI should trigger in response to an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Named(SoundName),
    SuccessSequence,
}

impl ClickOutcome {
    /// Both a plain match and the final match filled a section
    pub fn is_correct_match(&self) -> bool {
        matches!(self, ClickOutcome::CorrectMatch | ClickOutcome::LevelComplete)
    }

    pub fn cues(&self) -> &'static [SoundCue] {
        match self {
            ClickOutcome::NoOp => &[],
            ClickOutcome::CorrectMatch => &[SoundCue::Named(SoundName::CorrectMatch)],
            ClickOutcome::Feedback => &[SoundCue::Named(SoundName::Click)],
            ClickOutcome::LevelComplete => &[
                SoundCue::Named(SoundName::CorrectMatch),
                SoundCue::SuccessSequence,
            ],
        }
    }
}

/// One attempt at a level
#[derive(Debug, Clone)]
pub struct GameSession {
    level: Arc<Level>,
    /// Completed section numbers, in the order they were filled
    completed: Vec<u32>,
    fills: HashMap<u32, Color>,
    selected: Option<Color>,
    instruction: Option<Instruction>,
}

impl GameSession {
    pub fn new(level: Arc<Level>) -> Self {
        let mut session = Self {
            level,
            completed: Vec::new(),
            fills: HashMap::new(),
            selected: None,
            instruction: None,
        };
        session.reset();
        session
    }

    pub fn level(&self) -> &Arc<Level> {
        &self.level
    }

    pub fn select_color(&mut self, color: impl Into<Color>) {
        self.selected = Some(color.into());
    }

    pub fn click_section(&mut self, number: u32) -> ClickOutcome {
        let (Some(instruction), Some(selected)) = (&self.instruction, &self.selected) else {
            return ClickOutcome::NoOp;
        };

        if number != instruction.number || *selected != instruction.color {
            return ClickOutcome::Feedback;
        }

        let color = instruction.color.clone();
        self.fills.insert(number, color);
        self.completed.push(number);
        self.selected = None;
        self.instruction = self.next_instruction();

        if self.instruction.is_none() {
            tracing::info!(level = self.level.name(), "level complete");
            ClickOutcome::LevelComplete
        } else {
            ClickOutcome::CorrectMatch
        }
    }

    /// Clear all progress and point back at the first authored section
    pub fn reset(&mut self) {
        self.completed.clear();
        self.fills.clear();
        self.selected = None;
        self.instruction = self.next_instruction();
    }

    /// First section, in authored order, that has not been filled
    fn next_instruction(&self) -> Option<Instruction> {
        self.level
            .sections()
            .iter()
            .find(|section| !self.fills.contains_key(&section.number))
            .map(|section| section.instruction())
    }

    pub fn state(&self) -> SessionState {
        if self.instruction.is_some() {
            SessionState::InProgress
        } else {
            SessionState::LevelComplete
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state() == SessionState::LevelComplete
    }

    pub fn current_instruction(&self) -> Option<&Instruction> {
        self.instruction.as_ref()
    }

    pub fn selected_color(&self) -> Option<&Color> {
        self.selected.as_ref()
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    pub fn total_sections(&self) -> usize {
        self.level.len()
    }

    pub fn progress_percentage(&self) -> f32 {
        self.completed.len() as f32 / self.level.len() as f32 * 100.0
    }

    pub fn fill_for(&self, number: u32) -> Option<&Color> {
        self.fills.get(&number)
    }

    /// Filled sections with their colors, in completion order
    pub fn fills(&self) -> impl Iterator<Item = (u32, &Color)> + '_ {
        self.completed
            .iter()
            .filter_map(|number| self.fills.get(number).map(|color| (*number, color)))
    }
}
