//! `lotion version` -- print version and platform.

use anyhow::Result;

use crate::context::RuntimeContext;

/// Version string. Set at compile time via Cargo.toml (workspace version).
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Execute the `lotion version` command.
pub fn run(ctx: &RuntimeContext) -> Result<()> {
    let os = std::env::consts::OS;
    let arch = std::env::consts::ARCH;

    if ctx.quiet {
        println!("{}", VERSION);
    } else {
        println!("lotion version {} {}/{}", VERSION, os, arch);
    }
    if ctx.verbose {
        match &ctx.config_path {
            Some(path) => println!("config: {}", path.display()),
            None => println!("config: defaults"),
        }
    }
    Ok(())
}
