//! `lotion filter` -- build a query filter from `--where` clauses.

use anyhow::{Context, Result};
use lotion_core::Builder;

use crate::cli::FilterArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `lotion filter` command.
pub fn run(ctx: &RuntimeContext, args: &FilterArgs) -> Result<()> {
    let mut builder = Builder::create();
    for clause in &args.clauses {
        builder = builder
            .add(clause.prop, &clause.name, clause.cond, clause.value.clone())
            .with_context(|| format!("invalid clause for property {:?}", clause.name))?;
    }
    output_json(&builder.build()?, ctx.config.pretty);
    Ok(())
}
