//! SQL text for the four lookups the materializer performs.
//!
//! Table and column names come verbatim from the descriptor. Context ids are
//! always embedded as quoted string literals; the backend casts them to the
//! id column's type. Extra where clauses are parenthesised and AND-ed onto
//! the id condition.

use sqlconf_core::DescriptorSpec;

/// Render a context id as a quoted SQL string literal.
pub fn sql_literal(id: &str) -> String {
    format!("'{}'", id.replace('\'', "''"))
}

fn with_extra(condition: String, extra: &[Option<&str>]) -> String {
    extra.iter().flatten().fold(condition, |acc, clause| {
        format!("{} AND ({})", acc, clause)
    })
}

/// Root context lookup: the base id if the descriptor names one, otherwise
/// the row with a NULL parent.
pub fn root_context(spec: &DescriptorSpec) -> String {
    let ctx = &spec.contexts;
    let condition = match &ctx.base_context_id {
        Some(base) => format!("{} = {}", ctx.id_column, sql_literal(base)),
        None => format!("{} IS NULL", ctx.parent_id_column),
    };
    format!(
        "SELECT {} FROM {} WHERE {}",
        ctx.id_column,
        ctx.table,
        with_extra(condition, &[ctx.where_clause.as_deref()])
    )
}

/// Key/value label of one context.
pub fn context_tag(spec: &DescriptorSpec, id: &str) -> String {
    let ctx = &spec.contexts;
    format!(
        "SELECT {}, {} FROM {} WHERE {}",
        ctx.key_column,
        ctx.value_column,
        ctx.table,
        with_extra(
            format!("{} = {}", ctx.id_column, sql_literal(id)),
            &[ctx.where_clause.as_deref()]
        )
    )
}

/// Directives mapped to one context, joined through the mapping table.
pub fn context_directives(spec: &DescriptorSpec, id: &str) -> String {
    let conf = &spec.directives;
    let map = &spec.mapping;
    format!(
        "SELECT {conf}.{key}, {conf}.{value} FROM {conf} INNER JOIN {map} ON {conf}.{conf_id} = {map}.{map_conf_id} WHERE {condition}",
        conf = conf.table,
        key = conf.key_column,
        value = conf.value_column,
        map = map.table,
        conf_id = conf.id_column,
        map_conf_id = map.directive_id_column,
        condition = with_extra(
            format!("{}.{} = {}", map.table, map.context_id_column, sql_literal(id)),
            &[conf.where_clause.as_deref(), map.where_clause.as_deref()]
        ),
    )
}

/// Ids of the direct children of one context.
pub fn child_contexts(spec: &DescriptorSpec, id: &str) -> String {
    let ctx = &spec.contexts;
    format!(
        "SELECT {} FROM {} WHERE {}",
        ctx.id_column,
        ctx.table,
        with_extra(
            format!("{} = {}", ctx.parent_id_column, sql_literal(id)),
            &[ctx.where_clause.as_deref()]
        )
    )
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;
