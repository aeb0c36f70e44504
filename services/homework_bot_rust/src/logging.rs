//! Log file setup for the bot process.
//!
//! Lines look like `2024-05-01 12:00:00,123 - INFO - message`. The file is
//! truncated on every start.

use anyhow::{Context, Result};
use chrono::Local;
use env_logger::{Builder, Env, Target};
use std::fs::File;
use std::io::Write;

/// Route the `log` facade into `path`. `RUST_LOG` overrides the default `debug` level.
pub fn init_file_logger(path: &str) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create log file {path}"))?;

    Builder::from_env(Env::default().default_filter_or("debug,hyper=info,reqwest=info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
                record.level(),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .context("Logger already initialized")?;

    Ok(())
}
