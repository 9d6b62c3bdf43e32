//! Configuration for the lotion toolkit.
//!
//! This crate loads `lotion.yaml`, layering built-in defaults, the file and
//! `LOTION_*` environment variables, and discovers the file by walking up
//! the directory tree.

pub mod config;
pub mod config_file;

pub use config::{ConfigError, LotionConfig, load_config, save_config};
pub use config_file::find_config_file;
