use std::fs::OpenOptions;
use std::path::PathBuf;

use env_logger::{Env, Target};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

pub fn default_log_file() -> PathBuf {
    std::env::temp_dir().join("tarefas.log")
}

/// Installs `env_logger`, filtered by `RUST_LOG` (default `info`).
pub fn init(target: LogTarget) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    if let LogTarget::File(path) = target {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder.target(Target::Pipe(Box::new(file)));
    }
    builder.try_init()?;
    Ok(())
}
