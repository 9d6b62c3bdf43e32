//! Command handlers, one module per subcommand.

pub mod filter;
pub mod properties;
pub mod version;
