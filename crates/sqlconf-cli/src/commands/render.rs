//! Render command implementation

use anyhow::{Context, Result};
use sqlconf_core::DescriptorSpec;
use sqlconf_materialize::TreeMaterializer;
use std::fs;

use crate::cli::{GlobalArgs, RenderArgs};
use crate::commands::common::{build_connector, load_settings};

/// Execute the render command
pub fn execute(args: &RenderArgs, global: &GlobalArgs) -> Result<()> {
    let settings = load_settings(global)?;
    let spec = DescriptorSpec::parse(&args.descriptor).context("Failed to parse descriptor")?;

    let connector = build_connector(global, &settings);
    let gateway = connector
        .connect(&spec.connection)
        .context("Failed to connect to database")?;

    if global.verbose {
        eprintln!("[verbose] Materializing {} via {}", spec, gateway.db_type());
    }

    let result = TreeMaterializer::new(&spec, gateway.as_ref())
        .run()
        .context("Failed to materialize configuration")?;

    if global.verbose {
        eprintln!(
            "[verbose] Rendered {} lines from {} contexts and {} directives ({} queries)",
            result.lines.len(),
            result.stats.contexts,
            result.stats.directives,
            result.stats.queries
        );
    }

    let text = result.lines.to_text();
    match &args.output {
        Some(path) => {
            fs::write(path, &text).with_context(|| format!("Failed to write {}", path))?;
            println!("Wrote {} lines to {}", result.lines.len(), path);
        }
        None => print!("{}", text),
    }

    Ok(())
}
