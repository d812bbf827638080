use anyhow::{Context, Result};
use clap::Parser;
use numbrush::audio::{open_default_device, SchedulerHandle};
use numbrush::commands::{CommandContext, GameOptions};
use numbrush::levels;
use numbrush::repl::Repl;
use numbrush_core::game::Campaign;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Color-by-numbers in the terminal, with a synthesized soundtrack", long_about = None)]
struct Cli {
    /// JSON level catalogue to play instead of the built-in levels
    #[arg(long, value_name = "FILE")]
    levels: Option<PathBuf>,

    /// Level to start at (1-based)
    #[arg(long, value_name = "N", default_value_t = 1)]
    level: usize,

    /// Start with sound turned off
    #[arg(long)]
    mute: bool,

    /// Don't start the background music when a game starts
    #[arg(long)]
    no_music: bool,

    /// Don't open an audio device at all
    #[arg(long)]
    no_audio: bool,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

/// Keep the default quiet so log lines don't land in the middle of the prompt
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let catalogue = match &cli.levels {
        Some(path) => levels::load(path)?,
        None => levels::builtin()?,
    };
    let campaign =
        Campaign::starting_at(catalogue, cli.level).context("could not set up the campaign")?;

    let audio = if cli.no_audio {
        SchedulerHandle::silent()
    } else {
        SchedulerHandle::spawn(open_default_device)
    };
    if cli.mute {
        audio.toggle_sound();
    }

    let options = GameOptions {
        music: !cli.no_music,
    };
    let mut repl = Repl::new(CommandContext::new(campaign, audio, options));
    repl.run()
}
