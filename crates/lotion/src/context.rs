//! Runtime context for command execution.
//!
//! The [`RuntimeContext`] holds the resolved configuration and global
//! flags every command handler needs.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use lotion_config::{LotionConfig, find_config_file, load_config};
use lotion_core::StoreOffset;
use tracing::debug;

use crate::cli::GlobalArgs;

/// Runtime context passed to every command handler.
///
/// Constructed once in `main` after CLI parsing, before command dispatch.
#[derive(Debug)]
pub struct RuntimeContext {
    /// The config file that was loaded, if any.
    pub config_path: Option<PathBuf>,

    /// Merged configuration (defaults, file, environment).
    pub config: LotionConfig,

    /// Offset timestamps are normalized to.
    pub offset: StoreOffset,

    /// Verbose output.
    pub verbose: bool,

    /// Quiet mode: suppress non-essential output.
    pub quiet: bool,
}

impl RuntimeContext {
    /// Build a `RuntimeContext` from parsed global arguments.
    ///
    /// The config file is `--config` if given, otherwise the one discovered
    /// from the current directory.
    pub fn from_global_args(global: &GlobalArgs) -> Result<Self> {
        let config_path = match &global.config {
            Some(path) => {
                anyhow::ensure!(path.is_file(), "config file not found: {}", path.display());
                Some(path.clone())
            }
            None => env::current_dir()
                .ok()
                .and_then(|dir| find_config_file(&dir)),
        };
        debug!(config_path = ?config_path, "resolved config file");

        let config = load_config(config_path.as_deref()).with_context(|| match &config_path {
            Some(path) => format!("failed to load config from {}", path.display()),
            None => "failed to load config".to_string(),
        })?;
        let offset = config.store_offset()?;

        Ok(Self {
            config_path,
            config,
            offset,
            verbose: global.verbose,
            quiet: global.quiet,
        })
    }
}
