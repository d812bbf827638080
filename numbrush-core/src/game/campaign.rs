//! Level progression across a play-through
//!
//! Holds the level catalogue, the 1-based level number the player is on and
//! the session for that level. Past the last level the final level repeats.

use super::session::GameSession;
use crate::error::LevelError;
use crate::types::Level;
use std::sync::Arc;
use std::time::Duration;

/// Pause between a completed level and the next one starting
pub const LEVEL_ADVANCE_DELAY: Duration = Duration::from_millis(3000);

pub struct Campaign {
    levels: Vec<Arc<Level>>,
    level_number: usize,
    session: GameSession,
}

impl Campaign {
    pub fn new(levels: Vec<Level>) -> Result<Self, LevelError> {
        Self::starting_at(levels, 1)
    }

    /// Start on `level_number` (1-based; 0 is treated as 1)
    pub fn starting_at(levels: Vec<Level>, level_number: usize) -> Result<Self, LevelError> {
        if levels.is_empty() {
            return Err(LevelError::NoLevels);
        }
        let levels: Vec<Arc<Level>> = levels.into_iter().map(Arc::new).collect();
        let level_number = level_number.max(1);
        let session = GameSession::new(Self::resolve(&levels, level_number));
        Ok(Self {
            levels,
            level_number,
            session,
        })
    }

    fn resolve(levels: &[Arc<Level>], level_number: usize) -> Arc<Level> {
        let index = (level_number - 1).min(levels.len() - 1);
        levels[index].clone()
    }

    pub fn level_number(&self) -> usize {
        self.level_number
    }

    pub fn current_level(&self) -> &Arc<Level> {
        self.session.level()
    }

    pub fn levels(&self) -> &[Arc<Level>] {
        &self.levels
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    /// Move to the next level with a fresh session
    pub fn advance(&mut self) {
        self.level_number += 1;
        self.session = GameSession::new(Self::resolve(&self.levels, self.level_number));
        tracing::info!(
            level_number = self.level_number,
            level = self.session.level().name(),
            "advanced to next level"
        );
    }

    /// Return to the first level with a fresh session
    pub fn back_to_home(&mut self) {
        self.level_number = 1;
        self.session = GameSession::new(Self::resolve(&self.levels, 1));
    }
}
