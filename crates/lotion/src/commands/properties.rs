//! `lotion properties` -- parse a page or properties map and print it.

use std::io::Read;

use anyhow::{Context, Result};
use lotion_core::{BasePage, Properties};
use serde_json::Value;
use tracing::debug;

use crate::cli::PropertiesArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `lotion properties` command.
pub fn run(ctx: &RuntimeContext, args: &PropertiesArgs) -> Result<()> {
    let input = read_input(args)?;
    let wire: Value = serde_json::from_str(&input).context("input is not valid JSON")?;

    let properties = if is_page(&wire) {
        debug!("input is a page object");
        BasePage::from_wire_in(&wire, ctx.offset)
            .context("failed to parse page")?
            .properties
    } else {
        Properties::from_wire_in(&wire, ctx.offset).context("failed to parse properties")?
    };

    if args.title {
        println!("{}", properties.get_title()?.text());
        return Ok(());
    }

    let properties = if args.submittable || ctx.config.submittable_only {
        properties.submittable()
    } else {
        properties
    };
    output_json(&properties.to_wire(), ctx.config.pretty);
    Ok(())
}

fn read_input(args: &PropertiesArgs) -> Result<String> {
    match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

/// Page objects carry `"object": "page"` or a nested `properties` map.
fn is_page(wire: &Value) -> bool {
    wire.get("object").and_then(Value::as_str) == Some("page")
        || wire.get("properties").is_some_and(Value::is_object)
}
