//! General REPL commands (help, quit, watch)

use crate::commands::{CommandContext, CommandResult};
use colored::*;

/// Handle `help` command
pub fn cmd_help(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    print_help();
    CommandResult::Success
}

/// Handle `quit` or `exit` command
pub fn cmd_quit(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    CommandResult::Exit
}

/// Handle `watch <file>` command
pub fn cmd_watch(args: &str, _ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: watch <levels.json>".to_string());
    }
    CommandResult::Watch(args.to_string())
}

fn print_help() {
    println!("{}", "🎨 Numbrush Help".bold());
    println!("{}", "================".bold());
    println!();
    println!("{}", "Playing:".green());
    println!("  {}                - Begin the current level", "start".cyan());
    println!("  {}               - Show the picture and your progress", "status".cyan());
    println!("  {}  - Pick a paint: palette number, hex or name", "select <n|#hex|name>".cyan());
    println!("  {}            - Paint a section (a bare number works too)", "click <n>".cyan());
    println!("  {}                - Clear this level and start over", "reset".cyan());
    println!("  {}                 - Back to level 1", "home".cyan());
    println!("  {}               - List all levels", "levels".cyan());
    println!();
    println!("{}", "Sound:".green());
    println!("  {}                - Turn sound on or off", "sound".cyan());
    println!("  {}         - Show sound and music state", "sound status".cyan());
    println!("  {} / {}", "music start".cyan(), "music stop".cyan());
    println!("  {}          - Play a sound (no name lists them)", "play <name>".cyan());
    println!("  {}             - Play the success fanfare", "sequence".cyan());
    println!("  {}              - A single random sparkle", "sparkle".cyan());
    println!();
    println!("{}", "Other:".green());
    println!("  {}  - Reload a level file whenever it changes", "watch <levels.json>".cyan());
    println!("  {}          - Leave the game", "quit / exit".cyan());
    println!();
    println!("{}", "Example:".green());
    println!("  numbrush> {}", "start".cyan());
    println!("  numbrush> {}", "select 1".cyan());
    println!("  numbrush> {}", "click 1".cyan());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::test_context;

    #[test]
    fn test_watch_needs_a_path() {
        let mut ctx = test_context();
        assert!(matches!(cmd_watch("", &mut ctx), CommandResult::Error(_)));
        match cmd_watch("levels.json", &mut ctx) {
            CommandResult::Watch(path) => assert_eq!(path, "levels.json"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_quit_exits() {
        let mut ctx = test_context();
        assert!(matches!(cmd_quit("", &mut ctx), CommandResult::Exit));
    }
}
