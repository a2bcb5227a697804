//! Bukola Workspaces command-line entry point

use std::io::{self, IsTerminal};

use anyhow::Context;
use jiff::tz::TimeZone;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bukola::{
    clock::SystemClock,
    config::{Command, Config, LayoutArgs, QuoteArgs, ShellArgs},
    layout::Layout,
    pricing::tier_or_basic,
    render::Renderer,
    session::Session,
    shell::Shell,
};

fn main() -> anyhow::Result<()> {
    let config = Config::load().unwrap_or_else(|err| err.exit());

    // Logs go to stderr; stdout carries the views.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    match config.command() {
        Command::Shell(args) => shell(&args),
        Command::Quote(args) => quote(&args),
    }
}

fn load_layout(args: &LayoutArgs) -> anyhow::Result<Layout> {
    let Some(path) = &args.layout else {
        return Ok(Layout::default());
    };

    info!("Loading layout from {}", path.display());

    Layout::from_path(path).with_context(|| format!("loading layout {}", path.display()))
}

fn shell(args: &ShellArgs) -> anyhow::Result<()> {
    let layout = load_layout(&args.layout)?;
    let mut session = Session::new(layout.inventory()?, layout.rate_card()?, SystemClock);

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let renderer = Renderer::new(!args.no_color && io::stdout().is_terminal(), TimeZone::system());

    Shell::new(renderer, interactive).run(&mut session, stdin.lock(), io::stdout().lock())?;

    Ok(())
}

fn quote(args: &QuoteArgs) -> anyhow::Result<()> {
    let rates = load_layout(&args.layout)?.rate_card()?;
    let tier = tier_or_basic(&args.tier);
    let quote = rates.quote(args.desk_type, tier, args.hours)?;

    let renderer = Renderer::new(io::stdout().is_terminal(), TimeZone::system());
    renderer.quote(&mut io::stdout().lock(), args.desk_type, tier, &quote)?;

    Ok(())
}
