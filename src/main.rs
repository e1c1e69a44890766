use std::io;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskman::{config::Config, shell::Shell, view::View, JsonFileStorage, TaskBoard};

/// Logs go to stderr; stdout belongs to the menu.
fn init_tracing(config: &Config) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_filter()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_tracing(&config);

    let storage = JsonFileStorage::new(&config.file);
    tracing::debug!(path = %storage.path().display(), "using task file");
    let board = TaskBoard::open(storage, config.id_policy());

    let view = View::new(!config.no_color);
    let farewell = view.exiting();
    // Every mutation is already on disk, so an interrupt only needs a goodbye.
    if let Err(err) = ctrlc::set_handler(move || {
        println!("{farewell}");
        std::process::exit(0);
    }) {
        tracing::warn!(error = %err, "could not install interrupt handler");
    }

    let stdin = io::stdin();
    let mut shell = Shell::new(board, stdin.lock(), io::stdout(), view);
    shell.run()?;
    Ok(())
}
