//! Game commands (start, status, select, click, reset, home, levels)

use crate::commands::{CommandContext, CommandResult};
use colored::*;
use numbrush_core::game::{Campaign, ClickOutcome};
use numbrush_core::synth::SoundName;
use numbrush_core::types::Color;

const PROGRESS_WIDTH: usize = 20;

/// A two-cell color block for the terminal
pub fn swatch(color: &Color) -> ColoredString {
    match color.rgb() {
        Some((r, g, b)) => "■■".truecolor(r, g, b),
        None => "■■".normal(),
    }
}

fn describe(color: &Color) -> String {
    format!("{} {} ({})", swatch(color), color.name(), color)
}

/// Level header, progress, instruction, palette and fills
pub fn render_status(campaign: &Campaign) -> String {
    let session = campaign.session();
    let level = session.level();

    let mut output = format!(
        "{} {}\n",
        format!("Level {}:", campaign.level_number()).bold(),
        level.name().bright_cyan().bold()
    );

    let filled = ((session.progress_percentage() / 100.0) * PROGRESS_WIDTH as f32).round() as usize;
    output.push_str(&format!(
        "  [{}{}] {}/{}\n",
        "█".repeat(filled).bright_green(),
        "░".repeat(PROGRESS_WIDTH - filled.min(PROGRESS_WIDTH)),
        session.completed_count(),
        session.total_sections()
    ));

    match session.current_instruction() {
        Some(instruction) => output.push_str(&format!(
            "  Find section {} and color it {}\n",
            instruction.number.to_string().bright_yellow().bold(),
            describe(&instruction.color)
        )),
        None => output.push_str(&format!("  {}\n", "Level complete!".bright_green().bold())),
    }

    output.push_str("  Palette:\n");
    for (index, color) in level.palette().iter().enumerate() {
        let marker = if session.selected_color() == Some(color) {
            " ◀ selected".bright_magenta().to_string()
        } else {
            String::new()
        };
        output.push_str(&format!("    {}) {}{}\n", index + 1, describe(color), marker));
    }

    let fills: Vec<String> = session
        .fills()
        .map(|(number, color)| format!("{} {}", number, swatch(color)))
        .collect();
    if !fills.is_empty() {
        output.push_str(&format!("  Filled: {}\n", fills.join("  ")));
    }

    output.trim_end().to_string()
}

/// Resolve a palette index (1-based), a hex value or a color name
fn parse_color(args: &str, palette: &[Color]) -> Result<Color, String> {
    if let Ok(index) = args.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|i| palette.get(i))
            .cloned()
            .ok_or_else(|| format!("No palette entry {} (1-{})", index, palette.len()));
    }
    if args.starts_with('#') {
        // Hex case differs between catalogues; answer with the palette's own spelling
        let color = palette
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(args))
            .cloned()
            .unwrap_or_else(|| Color::new(args));
        return Ok(color);
    }
    palette
        .iter()
        .find(|c| c.name().eq_ignore_ascii_case(args))
        .cloned()
        .ok_or_else(|| format!("Unknown color '{}'", args))
}

/// Handle `start` command
pub fn cmd_start(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    ctx.audio.play_sound(SoundName::Click.as_str());
    if ctx.options.music {
        ctx.audio.start_background_music();
    }
    CommandResult::Message(render_status(&ctx.campaign))
}

/// Handle `status` / `show` command
pub fn cmd_status(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    CommandResult::Message(render_status(&ctx.campaign))
}

/// Handle `select <index|#hex|name>` command
pub fn cmd_select(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: select <index|#hex|name>".to_string());
    }
    let palette = ctx.campaign.current_level().palette();
    match parse_color(args, palette) {
        Ok(color) => {
            let message = format!("Selected {}", describe(&color));
            ctx.campaign.session_mut().select_color(color);
            ctx.audio.play_sound(SoundName::CoinEarned.as_str());
            CommandResult::Message(message)
        }
        Err(e) => CommandResult::Error(e),
    }
}

/// Handle `click <section>` command
pub fn cmd_click(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let number = match args.parse::<u32>() {
        Ok(n) => n,
        Err(_) => return CommandResult::Error("Usage: click <section number>".to_string()),
    };

    let outcome = ctx.campaign.session_mut().click_section(number);
    ctx.audio.play_cues(outcome.cues());

    let session = ctx.campaign.session();
    match outcome {
        ClickOutcome::NoOp if session.is_complete() => {
            CommandResult::Message("This level is already complete.".to_string())
        }
        ClickOutcome::NoOp => CommandResult::Message(format!(
            "{} Pick a color first with {}",
            "·".dimmed(),
            "select".cyan()
        )),
        ClickOutcome::Feedback => {
            let hint = session
                .current_instruction()
                .map(|i| format!(" Look for section {} in {}.", i.number, i.color.name()))
                .unwrap_or_default();
            CommandResult::Message(format!("{}{}", "Not quite.".yellow(), hint))
        }
        ClickOutcome::CorrectMatch => CommandResult::Message(format!(
            "{} Section {} filled!\n{}",
            "✓".bright_green(),
            number,
            render_status(&ctx.campaign)
        )),
        ClickOutcome::LevelComplete => {
            ctx.audio.play_sound(SoundName::Celebration.as_str());
            tracing::debug!(level = ctx.campaign.level_number(), "advance scheduled");
            CommandResult::LevelComplete(format!(
                "{} {} {}\n{}",
                "🎉".bright_yellow(),
                format!("You finished {}!", ctx.campaign.current_level().name())
                    .bright_green()
                    .bold(),
                "🎉".bright_yellow(),
                render_status(&ctx.campaign)
            ))
        }
    }
}

/// Handle `reset` command
pub fn cmd_reset(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    ctx.audio.play_sound(SoundName::Click.as_str());
    ctx.campaign.session_mut().reset();
    CommandResult::Message(render_status(&ctx.campaign))
}

/// Handle `home` command
pub fn cmd_home(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    ctx.audio.play_sound(SoundName::Click.as_str());
    ctx.audio.stop_background_music();
    ctx.campaign.back_to_home();
    CommandResult::Message(format!(
        "Back to the start. Type {} to play.",
        "start".bright_green()
    ))
}

/// Handle `levels` command
pub fn cmd_levels(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    let mut output = format!("{}\n", "Levels:".bold());
    // Past the end of the catalogue the last level repeats
    let current = ctx.campaign.level_number().min(ctx.campaign.levels().len());
    for (index, level) in ctx.campaign.levels().iter().enumerate() {
        let number = index + 1;
        let line = format!(
            "  {:>2}. {} ({} sections)",
            number,
            level.name(),
            level.len()
        );
        if number == current {
            output.push_str(&format!("{} {}\n", line.bright_cyan(), "◀".bright_cyan()));
        } else {
            output.push_str(&format!("{}\n", line));
        }
    }
    CommandResult::Message(output.trim_end().to_string())
}
