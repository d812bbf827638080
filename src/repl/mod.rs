//! Interactive terminal front end for Numbrush

use crate::commands::game::render_status;
use crate::commands::{create_registry, CommandContext, CommandRegistry, CommandResult};
use crate::levels;
use crate::repl::watcher::FileWatcher;
use anyhow::{Context, Result};
use colored::*;
use crossbeam_channel::{never, unbounded, Receiver, Sender};
use notify::Event;
use numbrush_core::game::{Campaign, LEVEL_ADVANCE_DELAY};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;

pub mod watcher;

/// Types of events the REPL loop handles
enum ReplEvent {
    Input(Result<String, ReadlineError>),
}

/// Interactive REPL driving one campaign
pub struct Repl {
    ctx: CommandContext,
    registry: CommandRegistry,

    // Event channels
    tx_input: Sender<ReplEvent>,
    rx_input: Receiver<ReplEvent>,
    tx_watcher: Sender<notify::Result<Event>>,
    rx_watcher: Receiver<notify::Result<Event>>,

    // File watcher
    watcher: Option<FileWatcher>,

    /// Fires once the finished level should give way to the next
    advance_timer: Receiver<Instant>,
    /// Level number that was completed when the timer was armed
    advance_from: Option<usize>,
}

impl Repl {
    /// Create a new REPL instance
    pub fn new(ctx: CommandContext) -> Self {
        let (tx_input, rx_input) = unbounded();
        let (tx_watcher, rx_watcher) = unbounded();

        Repl {
            ctx,
            registry: create_registry(),
            tx_input,
            rx_input,
            tx_watcher,
            rx_watcher,
            watcher: None,
            advance_timer: never(),
            advance_from: None,
        }
    }

    /// Start the REPL loop
    pub fn run(&mut self) -> Result<()> {
        println!(
            "{} {}",
            "🎨".bright_yellow(),
            "Numbrush - color by numbers".bright_cyan().bold()
        );
        println!(
            "Type '{}' to begin, then {} and {} to paint.",
            "start".bright_green(),
            "select <n>".cyan(),
            "click <n>".cyan()
        );
        println!(
            "Type '{}' for more information, '{}' or {} to exit.\n",
            "help".bright_green(),
            "quit".bright_red(),
            "Ctrl+C".bright_red()
        );

        let mut editor = DefaultEditor::new().context("failed to initialize the line editor")?;
        let tx_input = self.tx_input.clone();

        thread::spawn(move || loop {
            let prompt = format!("{} ", "numbrush>".bright_magenta().bold());
            match editor.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim().to_string();
                    if !line.is_empty() {
                        let _ = editor.add_history_entry(&line);
                    }
                    if tx_input.send(ReplEvent::Input(Ok(line))).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    let _ = tx_input.send(ReplEvent::Input(Err(err)));
                    break;
                }
            }
        });

        loop {
            let rx_input = self.rx_input.clone();
            let rx_watcher = self.rx_watcher.clone();
            let advance_timer = self.advance_timer.clone();

            crossbeam_channel::select! {
                recv(rx_input) -> msg => match msg {
                    Ok(ReplEvent::Input(Ok(line))) => {
                        if !self.handle_line(&line) {
                            break;
                        }
                    }
                    Ok(ReplEvent::Input(Err(ReadlineError::Interrupted)))
                    | Ok(ReplEvent::Input(Err(ReadlineError::Eof))) => {
                        println!("{} 🎨", "Goodbye!".bright_cyan());
                        break;
                    }
                    Ok(ReplEvent::Input(Err(err))) => {
                        println!(
                            "{} {}",
                            "Error reading input:".bright_red().bold(),
                            err.to_string().red()
                        );
                        break;
                    }
                    Err(_) => break, // Channel closed
                },
                recv(rx_watcher) -> msg => match msg {
                    Ok(Ok(event)) if FileWatcher::is_reload_event(&event) => {
                        let path = self.watcher.as_ref().and_then(|w| w.path()).map(Path::to_path_buf);
                        if let Some(path) = path {
                            println!("{} File changed: {}", "⚡".bright_yellow(), path.display());
                            self.reload_levels(&path);
                        }
                    }
                    Ok(Ok(_)) => {}
                    Ok(Err(e)) => println!("{} Watch error: {}", "Error:".red(), e),
                    Err(_) => break, // Channel closed
                },
                recv(advance_timer) -> _ => self.advance_level(),
            }
        }

        self.ctx.audio.shutdown();
        Ok(())
    }

    /// Run one input line. Returns false when the REPL should exit.
    fn handle_line(&mut self, line: &str) -> bool {
        if line.is_empty() {
            return true;
        }

        let result = match self.registry.execute(line, &mut self.ctx) {
            // A bare number paints that section
            CommandResult::NotACommand if line.parse::<u32>().is_ok() => self
                .registry
                .execute(&format!("click {}", line), &mut self.ctx),
            other => other,
        };

        match result {
            CommandResult::Success => {}
            CommandResult::Message(msg) => println!("{}", msg),
            CommandResult::LevelComplete(msg) => {
                println!("{}", msg);
                self.advance_timer = crossbeam_channel::after(LEVEL_ADVANCE_DELAY);
                self.advance_from = Some(self.ctx.campaign.level_number());
            }
            CommandResult::Exit => {
                println!("{} 🎨", "Goodbye!".bright_cyan());
                return false;
            }
            CommandResult::Error(e) => {
                println!("{} {}", "Error:".bright_red().bold(), e.red());
            }
            CommandResult::Watch(path) => self.start_watching(PathBuf::from(path)),
            CommandResult::NotACommand => println!(
                "{} Unknown command '{}'. Type {} for a list.",
                "?".bright_yellow(),
                line,
                "help".bright_green()
            ),
        }
        true
    }

    /// Move on to the next level if the one that armed the timer is still
    /// the finished current level.
    fn advance_level(&mut self) {
        self.advance_timer = never();
        let armed_at = self.advance_from.take();
        let campaign = &mut self.ctx.campaign;
        if armed_at != Some(campaign.level_number()) || !campaign.session().is_complete() {
            tracing::debug!("level advance skipped, campaign moved on");
            return;
        }
        campaign.advance();
        println!("\n{}\n{}", "Next picture!".bright_cyan().bold(), render_status(campaign));
    }

    fn start_watching(&mut self, path: PathBuf) {
        // Initialize watcher if needed
        if self.watcher.is_none() {
            match FileWatcher::new(self.tx_watcher.clone()) {
                Ok(w) => self.watcher = Some(w),
                Err(e) => {
                    println!("{} Failed to create watcher: {}", "Error:".red(), e);
                    return;
                }
            }
        }

        if let Some(w) = &mut self.watcher {
            match w.watch_file(&path) {
                Ok(()) => println!(
                    "{} Watching {} for changes...",
                    "👀".bright_cyan(),
                    path.display().to_string().bright_green()
                ),
                Err(e) => println!("{} Failed to watch {}: {}", "Error:".red(), path.display(), e),
            }
        }
    }

    /// Swap in a freshly loaded catalogue, restarting at level 1. A broken
    /// file leaves the current game untouched.
    fn reload_levels(&mut self, path: &Path) {
        let campaign =
            levels::load(path).and_then(|levels| Campaign::new(levels).map_err(anyhow::Error::from));
        match campaign {
            Ok(campaign) => {
                let count = campaign.levels().len();
                self.ctx.campaign = campaign;
                self.advance_timer = never();
                self.advance_from = None;
                println!(
                    "{} Reloaded {} levels\n{}",
                    "✓".bright_green(),
                    count,
                    render_status(&self.ctx.campaign)
                );
            }
            Err(e) => println!("{} {:#}", "Reload failed:".red(), e),
        }
    }
}
