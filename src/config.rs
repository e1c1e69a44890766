use std::path::PathBuf;

use clap::Parser;

use crate::{storage::DEFAULT_FILE, task_board::IdPolicy};

#[derive(Parser, Debug)]
#[command(name = "taskman")]
#[command(about = "Interactive command-line task tracker")]
pub struct Config {
    /// Task document to load and overwrite
    #[arg(short, long, env = "TASKMAN_FILE", default_value = DEFAULT_FILE)]
    pub file: PathBuf,

    /// Number new tasks as `count + 1`, which can reuse ids after deletes
    #[arg(long)]
    pub legacy_ids: bool,

    /// Print without terminal colors
    #[arg(long)]
    pub no_color: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    pub fn id_policy(&self) -> IdPolicy {
        if self.legacy_ids {
            IdPolicy::CountBased
        } else {
            IdPolicy::Monotonic
        }
    }

    /// `RUST_LOG` wins; otherwise warnings only unless `--verbose`.
    pub fn log_filter(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| {
            if self.verbose {
                "taskman=debug".into()
            } else {
                "taskman=warn".into()
            }
        })
    }
}
