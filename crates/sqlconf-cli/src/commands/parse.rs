//! Parse command implementation

use anyhow::{Context, Result};
use sqlconf_core::DescriptorSpec;

use crate::cli::{GlobalArgs, ParseArgs, ParseOutput};

/// Execute the parse command
pub fn execute(args: &ParseArgs, global: &GlobalArgs) -> Result<()> {
    let spec = DescriptorSpec::parse(&args.descriptor).context("Failed to parse descriptor")?;

    if global.verbose {
        eprintln!("[verbose] Parsed {}", spec);
    }

    match args.output {
        ParseOutput::Json => {
            let json =
                serde_json::to_string_pretty(&spec).context("Failed to serialize to JSON")?;
            println!("{}", json);
        }
        ParseOutput::Pretty => print!("{}", format_pretty(&spec)),
    }

    Ok(())
}

/// Human-readable summary; the password is never printed.
pub(crate) fn format_pretty(spec: &DescriptorSpec) -> String {
    let conn = &spec.connection;
    let ctx = &spec.contexts;
    let conf = &spec.directives;
    let map = &spec.mapping;

    let mut out = String::new();
    out.push_str(&format!("scheme:     {}\n", spec.scheme));
    out.push_str(&format!("user:       {}\n", conn.user));
    out.push_str(&format!("server:     {}\n", conn.server));
    out.push_str(&format!(
        "database:   {}\n",
        conn.database.as_deref().unwrap_or("-")
    ));
    out.push_str(&format!(
        "contexts:   {} ({}, {}, {}, {}){}\n",
        ctx.table,
        ctx.id_column,
        ctx.parent_id_column,
        ctx.key_column,
        ctx.value_column,
        where_suffix(ctx.where_clause.as_deref())
    ));
    out.push_str(&format!(
        "directives: {} ({}, {}, {}){}\n",
        conf.table,
        conf.id_column,
        conf.key_column,
        conf.value_column,
        where_suffix(conf.where_clause.as_deref())
    ));
    out.push_str(&format!(
        "mapping:    {} ({}, {}){}\n",
        map.table,
        map.directive_id_column,
        map.context_id_column,
        where_suffix(map.where_clause.as_deref())
    ));
    out.push_str(&format!(
        "root:       {}\n",
        match spec.base_context_id() {
            Some(id) => format!("id = {}", id),
            None => format!("{} IS NULL", ctx.parent_id_column),
        }
    ));
    out
}

fn where_suffix(clause: Option<&str>) -> String {
    clause
        .map(|c| format!(" where {}", c))
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
