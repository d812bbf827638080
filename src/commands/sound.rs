//! Sound commands (sound, music, play, sequence, sparkle)

use crate::commands::{CommandContext, CommandResult};
use colored::*;
use numbrush_core::synth::SoundName;

/// Handle `sound` command: flip sound on or off
pub fn cmd_sound_toggle(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    if ctx.audio.toggle_sound() {
        ctx.audio.play_sound(SoundName::Click.as_str());
        CommandResult::Message(format!("🔊 Sound {}", "on".bright_green()))
    } else {
        CommandResult::Message(format!("🔇 Sound {}", "off".bright_red()))
    }
}

/// Handle `sound status` command
pub fn cmd_sound_status(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    match ctx.audio.status() {
        Some(status) => {
            let flag = |on: bool| {
                if on {
                    "on".bright_green()
                } else {
                    "off".bright_red()
                }
            };
            CommandResult::Message(format!(
                "Sound: {}  Music: {}  Output device: {}",
                flag(status.enabled),
                flag(status.music_playing),
                if status.has_output {
                    "open".bright_green()
                } else {
                    "none".dimmed()
                }
            ))
        }
        None => CommandResult::Error("Audio engine is not running".to_string()),
    }
}

/// Handle `music start` command
pub fn cmd_music_start(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    ctx.audio.start_background_music();
    CommandResult::Message("🎶 Background music on".to_string())
}

/// Handle `music stop` command
pub fn cmd_music_stop(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    ctx.audio.stop_background_music();
    CommandResult::Message("Background music off".to_string())
}

/// Handle `play <name>` command
pub fn cmd_play(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        let names: Vec<&str> = SoundName::ALL.iter().map(|s| s.as_str()).collect();
        return CommandResult::Message(format!("Sounds: {}", names.join(", ")));
    }
    match args.parse::<SoundName>() {
        Ok(sound) => {
            ctx.audio.play_sound(sound.as_str());
            CommandResult::Success
        }
        Err(e) => CommandResult::Message(format!("{}. Type {} to list sounds", e, "play".cyan())),
    }
}

/// Handle `sequence` command
pub fn cmd_sequence(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    ctx.audio.play_success_sequence();
    CommandResult::Success
}

/// Handle `sparkle` command
pub fn cmd_sparkle(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    ctx.audio.play_ambient_sparkle();
    CommandResult::Success
}
