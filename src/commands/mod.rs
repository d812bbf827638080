//! Command registry for REPL commands
//!
//! Provides a clean, extensible pattern for handling REPL commands.

pub mod game;
pub mod general;
pub mod sound;

use crate::audio::SchedulerHandle;
use numbrush_core::game::Campaign;

/// Result of executing a command
#[derive(Debug)]
pub enum CommandResult {
    /// Command executed successfully, continue REPL
    Success,
    /// Command executed, show this message
    Message(String),
    /// The level was just finished; show this message and schedule the advance
    LevelComplete(String),
    /// Exit the REPL
    Exit,
    /// No command matched this input
    NotACommand,
    /// Error occurred
    Error(String),
    /// Watch a level file for changes
    Watch(String),
}

/// Start-up choices that commands need to honour
#[derive(Debug, Clone, Copy)]
pub struct GameOptions {
    /// Start the background loop when a game starts
    pub music: bool,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self { music: true }
    }
}

/// Context passed to command handlers
pub struct CommandContext {
    pub campaign: Campaign,
    pub audio: SchedulerHandle,
    pub options: GameOptions,
}

impl CommandContext {
    pub fn new(campaign: Campaign, audio: SchedulerHandle, options: GameOptions) -> Self {
        Self {
            campaign,
            audio,
            options,
        }
    }
}

/// A command handler function
pub type CommandHandler = fn(&str, &mut CommandContext) -> CommandResult;

/// Registry of available commands
pub struct CommandRegistry {
    /// Commands indexed by their prefix (e.g., "music start")
    /// Sorted by prefix length descending for longest-match-first lookup
    commands: Vec<(String, CommandHandler)>,
}

impl CommandRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Register a command with its prefix
    pub fn register(&mut self, prefix: &str, handler: CommandHandler) {
        self.commands.push((prefix.to_string(), handler));
        self.commands.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    }

    /// Execute a command, returning NotACommand if no match found
    pub fn execute(&self, input: &str, ctx: &mut CommandContext) -> CommandResult {
        for (prefix, handler) in &self.commands {
            if input == prefix || input.starts_with(&format!("{} ", prefix)) {
                let args = input[prefix.len()..].trim();
                return handler(args, ctx);
            }
        }
        CommandResult::NotACommand
    }

    /// Get all registered command prefixes
    pub fn list_commands(&self) -> Vec<&str> {
        self.commands.iter().map(|(p, _)| p.as_str()).collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a fully populated command registry with all built-in commands
pub fn create_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    // Game
    registry.register("start", game::cmd_start);
    registry.register("status", game::cmd_status);
    registry.register("show", game::cmd_status);
    registry.register("select", game::cmd_select);
    registry.register("click", game::cmd_click);
    registry.register("reset", game::cmd_reset);
    registry.register("home", game::cmd_home);
    registry.register("levels", game::cmd_levels);

    // Sound
    registry.register("sound status", sound::cmd_sound_status);
    registry.register("sound", sound::cmd_sound_toggle);
    registry.register("music start", sound::cmd_music_start);
    registry.register("music stop", sound::cmd_music_stop);
    registry.register("play", sound::cmd_play);
    registry.register("sequence", sound::cmd_sequence);
    registry.register("sparkle", sound::cmd_sparkle);

    // General commands
    registry.register("help", general::cmd_help);
    registry.register("quit", general::cmd_quit);
    registry.register("exit", general::cmd_quit);
    registry.register("watch", general::cmd_watch);

    registry
}
